use serde::{Serialize, Serializer};

use crate::percent;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum CoveragePercentage {
    #[default]
    Unknown,
    Value(f32),
}

impl CoveragePercentage {
    /// Numeric value, `Unknown` reading as 0.
    pub fn value(&self) -> f32 {
        match self {
            CoveragePercentage::Unknown => 0.0,
            CoveragePercentage::Value(v) => *v,
        }
    }
}

impl Serialize for CoveragePercentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CoveragePercentage::Unknown => serializer.serialize_str("Unknown"),
            CoveragePercentage::Value(v) => serializer.serialize_f32(*v),
        }
    }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Totals {
    pub total: u32,
    pub covered: u32,
    pub skipped: u32,
    pub pct: CoveragePercentage,
}

impl Totals {
    pub fn new(covered: u32, total: u32) -> Totals {
        Totals {
            total,
            covered,
            skipped: 0,
            pct: CoveragePercentage::Value(percent(covered, total)),
        }
    }

    fn merge(&mut self, other: &Totals) {
        self.total += other.total;
        self.covered += other.covered;
        self.skipped += other.skipped;
        self.pct = CoveragePercentage::Value(percent(self.covered, self.total));
    }
}

#[derive(Default, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    pub lines: Totals,
    pub statements: Totals,
    pub functions: Totals,
    pub branches: Totals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches_true: Option<Totals>,
}

impl CoverageSummary {
    pub fn new() -> CoverageSummary {
        Default::default()
    }

    /// Merges a second summary coverage object into this one
    pub fn merge(&mut self, summary: &CoverageSummary) {
        self.lines.merge(&summary.lines);
        self.statements.merge(&summary.statements);
        self.functions.merge(&summary.functions);
        self.branches.merge(&summary.branches);

        if let Some(branches_true) = &summary.branches_true {
            self.branches_true
                .get_or_insert_with(Default::default)
                .merge(branches_true);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.total == 0
    }
}
