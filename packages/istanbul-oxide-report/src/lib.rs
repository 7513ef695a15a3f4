//! Renders a merged [`istanbul_oxide::CoverageMap`] the way istanbul's
//! reporters do: terminal tables, a browsable html tree and json dumps.

mod format;
pub mod html;
pub mod json;
pub mod text;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use format::{format_pct, line_ranges};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Text,
    TextSummary,
    Html,
    Json,
    JsonSummary,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportKind::Text => "text",
            ReportKind::TextSummary => "text-summary",
            ReportKind::Html => "html",
            ReportKind::Json => "json",
            ReportKind::JsonSummary => "json-summary",
        };
        f.write_str(name)
    }
}
