use std::{
    fs, io,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use istanbul_oxide::{CoverageMap, CoverageSummary};

pub const COVERAGE_FINAL_FILE: &str = "coverage-final.json";
pub const COVERAGE_SUMMARY_FILE: &str = "coverage-summary.json";

/// `total` followed by one summary per file, as istanbul's `json-summary`.
pub fn summary_document(coverage_map: &CoverageMap) -> IndexMap<String, CoverageSummary> {
    let mut ret = IndexMap::with_capacity(coverage_map.len() + 1);
    ret.insert("total".to_string(), coverage_map.get_coverage_summary());
    for (path, coverage) in coverage_map.iter() {
        ret.insert(path.clone(), coverage.to_summary());
    }
    ret
}

/// Writes the merged coverage data itself as `coverage-final.json`.
pub fn write_coverage(coverage_map: &CoverageMap, report_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(report_dir)?;
    let path = report_dir.join(COVERAGE_FINAL_FILE);
    let json = serde_json::to_string(coverage_map)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn write_summary(coverage_map: &CoverageMap, report_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(report_dir)?;
    let path = report_dir.join(COVERAGE_SUMMARY_FILE);
    let json = serde_json::to_string(&summary_document(coverage_map))?;
    fs::write(&path, json)?;
    Ok(path)
}
