use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use istanbul_oxide::{CoverageMap, CoverageSummary};
use istanbul_oxide_report::{html, json, text, ReportKind};
use tracing::{debug, info, info_span, warn};
use typed_path::Utf8TypedPath;
use wax::Pattern;

use crate::{
    staging::{stage_producers, staged_files},
    MergeError, MergeOptions, MergeResult,
};

/// What a pipeline run did.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutcome {
    pub contributed: Vec<String>,
    pub missing: Vec<String>,
    pub summary: CoverageSummary,
    pub files: usize,
    /// Report files written under the report directory.
    pub written: Vec<PathBuf>,
}

/// Normalize a file path to use forward slashes, so both producers key the
/// same source file identically and exclude globs match on every platform.
pub fn normalize_path(path: &str) -> String {
    let typed_path = Utf8TypedPath::derive(path);
    if typed_path.is_windows() {
        typed_path.with_unix_encoding().to_string()
    } else if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Reads and merges every staged file. Paths are normalized and files
/// matching an `exclude` glob dropped before merging. Any unreadable or
/// malformed file fails the whole merge.
pub fn merge_files(files: &[PathBuf], exclude: &[String]) -> MergeResult<CoverageMap> {
    let normalized_patterns = exclude
        .iter()
        .map(|s| normalize_path(s))
        .collect::<Vec<_>>();
    let excluded = if normalized_patterns.is_empty() {
        None
    } else {
        Some(
            wax::any(normalized_patterns.iter().map(|s| s.as_str())).map_err(|e| {
                MergeError::Pattern {
                    message: e.to_string(),
                }
            })?,
        )
    };

    let mut merged = CoverageMap::new();

    for file in files {
        let json = fs::read_to_string(file).map_err(MergeError::io(file))?;
        let coverage_map = CoverageMap::from_json(&json).map_err(MergeError::coverage(file))?;
        debug!(
            file = %file.display(),
            files = coverage_map.len(),
            "read staged coverage"
        );

        for mut coverage in coverage_map {
            coverage.path = normalize_path(&coverage.path);

            if let Some(excluded) = &excluded {
                if excluded.is_match(coverage.path.as_str()) {
                    debug!(path = coverage.path.as_str(), "excluded from merge");
                    continue;
                }
            }

            merged.add_coverage_for_file(coverage);
        }
    }

    merged.sort();
    Ok(merged)
}

/// Writes the consolidated coverage to `<workspaceDir>/out.json`.
pub fn write_merged(options: &MergeOptions, coverage_map: &CoverageMap) -> MergeResult<PathBuf> {
    let path = options.merged_output();
    fs::create_dir_all(&options.workspace_dir).map_err(MergeError::io(&options.workspace_dir))?;

    let json = coverage_map
        .to_json()
        .map_err(MergeError::coverage(&path))?;
    fs::write(&path, json).map_err(MergeError::io(&path))?;

    Ok(path)
}

pub fn read_merged(path: &Path) -> MergeResult<CoverageMap> {
    let json = fs::read_to_string(path).map_err(MergeError::io(path))?;
    CoverageMap::from_json(&json).map_err(MergeError::coverage(path))
}

/// Runs every configured reporter. Terminal reporters write to `out`; file
/// reporters write under `reportDir` and their files are returned.
pub fn render(
    options: &MergeOptions,
    coverage_map: &CoverageMap,
    out: &mut impl Write,
) -> MergeResult<Vec<PathBuf>> {
    let report_dir = &options.report_dir;
    let mut written = vec![];

    for reporter in &options.reporters {
        let _span = info_span!("report", reporter = %reporter).entered();

        match reporter {
            ReportKind::Text => {
                let table = text::render_table(coverage_map);
                out.write_all(table.as_bytes())
                    .map_err(MergeError::io("<stdout>"))?;

                if let Some(text_file) = &options.text_file {
                    write_text_file(text_file, &table)?;
                    written.push(text_file.clone());
                }
            }
            ReportKind::TextSummary => {
                out.write_all(text::render_summary(coverage_map).as_bytes())
                    .map_err(MergeError::io("<stdout>"))?;
            }
            ReportKind::Html => {
                let pages =
                    html::write_report(coverage_map, report_dir).map_err(MergeError::io(report_dir))?;
                info!(
                    index = %report_dir.join("index.html").display(),
                    pages = pages.len(),
                    "wrote html report"
                );
                written.extend(pages);
            }
            ReportKind::Json => {
                let path =
                    json::write_coverage(coverage_map, report_dir).map_err(MergeError::io(report_dir))?;
                info!(path = %path.display(), "wrote json report");
                written.push(path);
            }
            ReportKind::JsonSummary => {
                let path =
                    json::write_summary(coverage_map, report_dir).map_err(MergeError::io(report_dir))?;
                info!(path = %path.display(), "wrote json summary");
                written.push(path);
            }
        }
    }

    out.flush().map_err(MergeError::io("<stdout>"))?;
    Ok(written)
}

fn write_text_file(path: &Path, table: &str) -> MergeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(MergeError::io(parent))?;
    }
    fs::write(path, table).map_err(MergeError::io(path))
}

/// Removes the workspace directory and the staged files that were merged.
pub fn cleanup(options: &MergeOptions, staged: &[PathBuf]) -> MergeResult<()> {
    if options.workspace_dir.exists() {
        fs::remove_dir_all(&options.workspace_dir)
            .map_err(MergeError::io(&options.workspace_dir))?;
    }

    for file in staged {
        match fs::remove_file(file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(MergeError::io(file)(e)),
        }
    }

    Ok(())
}

/// stage -> merge -> write `out.json` -> render from `out.json` -> cleanup.
/// Each stage finishes before the next starts; the first error aborts the
/// run and leaves intermediates in place.
pub fn run_with_output(options: &MergeOptions, out: &mut impl Write) -> MergeResult<PipelineOutcome> {
    options.validate()?;

    let staging = {
        let _span = info_span!("stage").entered();
        stage_producers(options)?
    };

    if staging.staged.is_empty() {
        warn!("no producer contributed coverage data, the merged report will be empty");
    }

    let files = staged_files(&options.reports_dir)?;
    let merged_path = {
        let _span = info_span!("merge", files = files.len()).entered();
        let merged = merge_files(&files, &options.exclude)?;
        write_merged(options, &merged)?
    };

    let coverage_map = read_merged(&merged_path)?;
    info!(
        files = coverage_map.len(),
        path = %merged_path.display(),
        "merged coverage"
    );

    let written = render(options, &coverage_map, out)?;

    {
        let _span = info_span!("cleanup").entered();
        cleanup(options, &files)?;
    }

    Ok(PipelineOutcome {
        contributed: staging.staged.into_iter().map(|s| s.producer).collect(),
        missing: staging.missing,
        summary: coverage_map.get_coverage_summary(),
        files: coverage_map.len(),
        written,
    })
}

/// Runs the pipeline with the text reports going to stdout.
pub fn run(options: &MergeOptions) -> MergeResult<PipelineOutcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(options, &mut out)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::{cleanup, merge_files, normalize_path};
    use crate::{MergeError, MergeOptions};

    const COUNTER: &str = r#"{"src/utils/counter.ts": {
        "path": "src/utils/counter.ts",
        "statementMap": {"0": {"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 9}}},
        "fnMap": {}, "branchMap": {}, "s": {"0": 1}, "f": {}, "b": {}
    }}"#;

    #[test]
    fn normalizes_windows_paths() {
        assert_eq!(normalize_path(r"src\utils\counter.ts"), "src/utils/counter.ts");
        assert_eq!(normalize_path("src/App.tsx"), "src/App.tsx");
    }

    #[test]
    fn merges_same_file_reported_with_different_separators() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("coverage-a.json");
        let b = dir.path().join("coverage-b.json");
        fs::write(&a, COUNTER).unwrap();
        fs::write(&b, COUNTER.replace("src/utils/counter.ts", r"src\\utils\\counter.ts")).unwrap();

        let merged = merge_files(&[a, b], &[]).unwrap();

        assert_eq!(merged.len(), 1);
        let coverage = merged.get_coverage_for_file("src/utils/counter.ts").unwrap();
        assert_eq!(coverage.s.get(&0), Some(&2));
    }

    #[test]
    fn excludes_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("coverage-a.json");
        fs::write(&a, COUNTER).unwrap();

        let merged = merge_files(&[a], &["src/utils/**".to_string()]).unwrap();

        assert!(merged.is_empty());
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("coverage-a.json");
        fs::write(&a, "{\"src/App.tsx\": [").unwrap();

        assert!(matches!(
            merge_files(&[a], &[]),
            Err(MergeError::Parse { .. })
        ));
    }

    #[test]
    fn structurally_invalid_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("coverage-a.json");
        fs::write(&a, COUNTER.replace(r#""s": {"0": 1}"#, r#""s": {"4": 1}"#)).unwrap();

        assert!(matches!(
            merge_files(&[a], &[]),
            Err(MergeError::InvalidCoverage { .. })
        ));
    }

    #[test]
    fn cleanup_tolerates_already_removed_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = MergeOptions::default().resolve(dir.path());
        fs::create_dir_all(&options.workspace_dir).unwrap();

        cleanup(&options, &[dir.path().join("coverage-unit.json")]).unwrap();

        assert!(!options.workspace_dir.exists());
    }
}
