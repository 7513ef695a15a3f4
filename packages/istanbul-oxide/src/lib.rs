mod coverage;
mod coverage_map;
mod coverage_summary;
mod error;
mod file_coverage;
mod percent;
mod range;
pub mod types;

pub use coverage::Coverage;
pub use coverage_map::CoverageMap;
pub use coverage_summary::*;
pub use error::CoverageError;
pub use file_coverage::FileCoverage;
pub use percent::*;
pub use range::*;
pub use types::*;
