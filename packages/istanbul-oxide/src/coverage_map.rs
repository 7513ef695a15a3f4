use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{CoverageError, CoverageSummary, FileCoverage};

/// a map of `FileCoverage` objects keyed by file paths
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageMap {
    inner: IndexMap<String, FileCoverage>,
}

impl CoverageMap {
    pub fn new() -> CoverageMap {
        CoverageMap {
            inner: Default::default(),
        }
    }

    /// Parses a `coverage-final.json` document and checks every file entry
    /// for structural validity.
    pub fn from_json(json: &str) -> Result<CoverageMap, CoverageError> {
        let parsed: IndexMap<String, FileCoverage> = serde_json::from_str(json)?;
        let mut ret = CoverageMap::new();

        for (key, mut coverage) in parsed {
            if coverage.path.is_empty() {
                coverage.path = key;
            }
            coverage.validate()?;
            ret.add_coverage_for_file(coverage);
        }

        Ok(ret)
    }

    pub fn to_json(&self) -> Result<String, CoverageError> {
        Ok(serde_json::to_string(&self.inner)?)
    }

    /// Merges a second coverage map into this one
    pub fn merge(&mut self, map: &CoverageMap) {
        for coverage in map.inner.values() {
            self.add_coverage_for_file(coverage.clone());
        }
    }

    /// Filter the coverage map with a predicate. If the predicate returns false,
    /// the coverage is removed from the map.
    pub fn filter(&mut self, predicate: impl Fn(&FileCoverage) -> bool) {
        self.inner.retain(|_, coverage| predicate(coverage));
    }

    pub fn get_files(&self) -> Vec<&String> {
        self.inner.keys().collect()
    }

    pub fn get_coverage_for_file(&self, file_path: &str) -> Option<&FileCoverage> {
        self.inner.get(file_path)
    }

    pub fn add_coverage_for_file(&mut self, coverage: FileCoverage) {
        if let Some(value) = self.inner.get_mut(coverage.path.as_str()) {
            value.merge(&coverage);
        } else {
            self.inner.insert(coverage.path.clone(), coverage);
        }
    }

    pub fn get_coverage_summary(&self) -> CoverageSummary {
        let mut ret = CoverageSummary::new();

        for coverage in self.inner.values() {
            ret.merge(&coverage.to_summary());
        }

        ret
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileCoverage)> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sorts entries by file path so renderings do not depend on the order
    /// producers were merged in.
    pub fn sort(&mut self) {
        self.inner.sort_keys();
    }
}

impl IntoIterator for CoverageMap {
    type Item = FileCoverage;
    type IntoIter = indexmap::map::IntoValues<String, FileCoverage>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}

impl FromIterator<FileCoverage> for CoverageMap {
    fn from_iter<I: IntoIterator<Item = FileCoverage>>(iter: I) -> Self {
        let mut ret = CoverageMap::new();
        for coverage in iter {
            ret.add_coverage_for_file(coverage);
        }
        ret
    }
}
