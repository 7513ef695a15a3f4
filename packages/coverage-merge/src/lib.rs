//! Merges the istanbul coverage written by several test runners (a unit test
//! run and a component test run by default) into a single report.
//!
//! ```text
//! reports/unit/coverage-final.json       -> reports/coverage-unit.json
//! reports/component/coverage-final.json  -> reports/coverage-component.json
//!                                        -> .nyc_output/out.json
//!                                        -> coverage/index.html + stdout table
//! ```

mod error;
mod logging;
mod options;
mod pipeline;
mod staging;

pub use error::{MergeError, MergeResult};
pub use logging::initialize_merge_log;
pub use options::{
    MergeLogOptions, MergeOptions, DEFAULT_CONFIG_FILE, MERGED_FILE_NAME, STAGED_FILE_PATTERN,
};
pub use pipeline::{
    cleanup, merge_files, normalize_path, read_merged, render, run, run_with_output,
    write_merged, PipelineOutcome,
};
pub use staging::{stage_producers, staged_files, StagedProducer, Staging};
