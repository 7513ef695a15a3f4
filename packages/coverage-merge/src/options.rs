use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use istanbul_oxide_report::ReportKind;
use serde::{Deserialize, Serialize};

use crate::{MergeError, MergeResult};

/// Config file picked up from the invocation directory when no `--config`
/// is given.
pub const DEFAULT_CONFIG_FILE: &str = ".coverage-merge.json";
/// Consolidated coverage written into the workspace directory.
pub const MERGED_FILE_NAME: &str = "out.json";
/// Staged producer files are named `coverage-<producer>.json`.
pub const STAGED_FILE_PATTERN: &str = "coverage-*.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeLogOptions {
    pub level: Option<String>,
    pub enable_trace: bool,
}

impl Default for MergeLogOptions {
    fn default() -> Self {
        MergeLogOptions {
            level: Some("info".to_string()),
            enable_trace: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeOptions {
    /// Holds one `<producer>/<inputFileName>` per test runner, and the staged
    /// `coverage-<producer>.json` files.
    pub reports_dir: PathBuf,
    pub producers: Vec<String>,
    pub input_file_name: String,
    /// Scratch directory for the consolidated `out.json`; removed on success.
    pub workspace_dir: PathBuf,
    /// Where the html / json reports land. Kept after the run.
    pub report_dir: PathBuf,
    pub reporters: Vec<ReportKind>,
    /// Also capture the `text` table into this file.
    pub text_file: Option<PathBuf>,
    /// Globs of source files to leave out of the merged report.
    pub exclude: Vec<String>,
    pub log: MergeLogOptions,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            reports_dir: PathBuf::from("reports"),
            producers: vec!["unit".to_string(), "component".to_string()],
            input_file_name: "coverage-final.json".to_string(),
            workspace_dir: PathBuf::from(".nyc_output"),
            report_dir: PathBuf::from("coverage"),
            reporters: vec![ReportKind::Html, ReportKind::Text],
            text_file: None,
            exclude: Default::default(),
            log: Default::default(),
        }
    }
}

/// Lexically resolves `.` and `..` so differently spelled paths compare equal.
fn normalize_dir(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(ret.components().next_back(), Some(Component::Normal(_))) {
                    ret.pop();
                } else {
                    ret.push("..");
                }
            }
            component => ret.push(component),
        }
    }
    ret
}

impl MergeOptions {
    pub fn from_json(json: &str) -> MergeResult<MergeOptions> {
        let options: MergeOptions = serde_json::from_str(json)
            .map_err(|e| MergeError::config(format!("could not deserialize options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from `config` if given, else from
    /// [`DEFAULT_CONFIG_FILE`] in `base_dir` when it exists, else defaults.
    pub fn load(config: Option<&Path>, base_dir: &Path) -> MergeResult<MergeOptions> {
        let path = match config {
            Some(config) => base_dir.join(config),
            None => {
                let default = base_dir.join(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Default::default());
                }
                default
            }
        };

        let json = fs::read_to_string(&path).map_err(MergeError::io(&path))?;
        MergeOptions::from_json(&json)
    }

    /// Rejects layouts the pipeline cannot run safely, such as a report
    /// directory that cleanup would delete.
    pub fn validate(&self) -> MergeResult<()> {
        if self.input_file_name.is_empty() {
            return Err(MergeError::config("inputFileName must not be empty"));
        }

        for producer in &self.producers {
            if producer.is_empty() || producer.contains(['/', '\\']) {
                return Err(MergeError::config(format!(
                    "producer name `{}` must be a plain directory name",
                    producer
                )));
            }
        }

        let report_dir = normalize_dir(&self.report_dir);
        if report_dir == normalize_dir(&self.reports_dir) {
            return Err(MergeError::config("reportDir must differ from reportsDir"));
        }

        // Cleanup removes the whole workspace directory.
        let workspace_dir = normalize_dir(&self.workspace_dir);
        if report_dir.starts_with(&workspace_dir) || workspace_dir.starts_with(&report_dir) {
            return Err(MergeError::config(
                "reportDir and workspaceDir must not contain each other",
            ));
        }

        Ok(())
    }

    /// Resolves every relative path against `base_dir`.
    pub fn resolve(mut self, base_dir: &Path) -> MergeOptions {
        self.reports_dir = base_dir.join(&self.reports_dir);
        self.workspace_dir = base_dir.join(&self.workspace_dir);
        self.report_dir = base_dir.join(&self.report_dir);
        self.text_file = self.text_file.map(|f| base_dir.join(f));
        self
    }

    /// `<reportsDir>/<producer>/<inputFileName>`
    pub fn producer_input(&self, producer: &str) -> PathBuf {
        self.reports_dir.join(producer).join(&self.input_file_name)
    }

    /// `<reportsDir>/coverage-<producer>.json`
    pub fn staged_path(&self, producer: &str) -> PathBuf {
        self.reports_dir.join(format!("coverage-{}.json", producer))
    }

    /// `<workspaceDir>/out.json`
    pub fn merged_output(&self) -> PathBuf {
        self.workspace_dir.join(MERGED_FILE_NAME)
    }
}
