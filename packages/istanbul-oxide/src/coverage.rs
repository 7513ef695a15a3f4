use serde::Serialize;

/// Covered / total counts of branch arms found on a single line.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Coverage {
    covered: u32,
    total: u32,
    coverage: f32,
}

impl Coverage {
    pub fn new(covered: u32, total: u32, coverage: f32) -> Coverage {
        Coverage {
            covered,
            total,
            coverage,
        }
    }

    pub fn covered(&self) -> u32 {
        self.covered
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn coverage(&self) -> f32 {
        self.coverage
    }
}
