//! Moves each producer's coverage file into the flat staging directory the
//! merge step reads from.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};
use wax::{Glob, Pattern};

use crate::{options::STAGED_FILE_PATTERN, MergeError, MergeOptions, MergeResult};

#[derive(Clone, Debug, PartialEq)]
pub struct StagedProducer {
    pub producer: String,
    pub source: PathBuf,
    pub staged: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Staging {
    pub staged: Vec<StagedProducer>,
    /// Producers with no coverage file this run.
    pub missing: Vec<String>,
}

/// Renames `<reportsDir>/<producer>/<inputFileName>` to
/// `<reportsDir>/coverage-<producer>.json` for every configured producer.
/// A producer without a coverage file is skipped with a warning. The rename
/// consumes the producer's file, so a second run without fresh test runs
/// sees every producer as missing.
pub fn stage_producers(options: &MergeOptions) -> MergeResult<Staging> {
    let mut ret = Staging::default();

    for producer in &options.producers {
        let source = options.producer_input(producer);

        if !source.is_file() {
            warn!(
                producer = producer.as_str(),
                path = %source.display(),
                "no coverage data found, skipping producer"
            );
            ret.missing.push(producer.clone());
            continue;
        }

        let staged = options.staged_path(producer);
        fs::rename(&source, &staged).map_err(MergeError::io(&source))?;
        info!(
            producer = producer.as_str(),
            staged = %staged.display(),
            "staged coverage data"
        );

        ret.staged.push(StagedProducer {
            producer: producer.clone(),
            source,
            staged,
        });
    }

    Ok(ret)
}

/// Lists the `coverage-*.json` files directly inside `staging_dir`, sorted by
/// name. This includes files left behind by an earlier run that failed before
/// cleanup. A missing directory is an empty staging area.
pub fn staged_files(staging_dir: &Path) -> MergeResult<Vec<PathBuf>> {
    if !staging_dir.is_dir() {
        return Ok(vec![]);
    }

    let glob = Glob::new(STAGED_FILE_PATTERN).map_err(|e| MergeError::Pattern {
        message: e.to_string(),
    })?;

    let mut ret = vec![];
    for entry in fs::read_dir(staging_dir).map_err(MergeError::io(staging_dir))? {
        let entry = entry.map_err(MergeError::io(staging_dir))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if path.is_file() && glob.is_match(name) {
            ret.push(path);
        }
    }

    ret.sort();
    Ok(ret)
}
