//! Terminal reporters: the per-file `text` table and the four line
//! `text-summary`.

use istanbul_oxide::{CoverageMap, CoverageSummary, Totals};

use crate::format::{common_root, relative_to};
use crate::{format_pct, line_ranges};

const NAME_HEADER: &str = "File";
const ALL_FILES: &str = "All files";
const PCT_HEADERS: [&str; 4] = ["% Stmts", "% Branch", "% Funcs", "% Lines"];
const UNCOVERED_HEADER: &str = "Uncovered Line #s";

struct Row {
    name: String,
    pcts: [String; 4],
    uncovered: String,
}

impl Row {
    fn new(name: String, summary: &CoverageSummary, uncovered: String) -> Row {
        Row {
            name,
            pcts: [
                format_pct(&summary.statements.pct),
                format_pct(&summary.branches.pct),
                format_pct(&summary.functions.pct),
                format_pct(&summary.lines.pct),
            ],
            uncovered,
        }
    }
}

fn write_separator(out: &mut String, name_width: usize, uncovered_width: usize) {
    out.push_str(&"-".repeat(name_width + 1));
    for header in PCT_HEADERS {
        out.push('|');
        out.push_str(&"-".repeat(header.len() + 2));
    }
    out.push('|');
    out.push_str(&"-".repeat(uncovered_width + 2));
    out.push('\n');
}

fn write_row(
    out: &mut String,
    name: &str,
    cells: &[String; 4],
    uncovered: &str,
    name_width: usize,
    uncovered_width: usize,
) {
    out.push_str(&format!("{:<name_width$} ", name));
    for (cell, header) in cells.iter().zip(PCT_HEADERS) {
        out.push_str(&format!("| {:>width$} ", cell, width = header.len()));
    }
    out.push_str(&format!("| {:<uncovered_width$} \n", uncovered));
}

/// Renders istanbul's `text` table: one aggregate `All files` row followed by
/// a row per file with its uncovered lines collapsed into ranges. An empty
/// map still renders the header and an all-zero aggregate row.
pub fn render_table(coverage_map: &CoverageMap) -> String {
    let root = common_root(coverage_map.iter().map(|(path, _)| path.as_str()));

    let mut rows = vec![Row::new(
        ALL_FILES.to_string(),
        &coverage_map.get_coverage_summary(),
        String::new(),
    )];
    for (path, coverage) in coverage_map.iter() {
        rows.push(Row::new(
            format!(" {}", relative_to(&root, path)),
            &coverage.to_summary(),
            line_ranges(&coverage.get_uncovered_lines()),
        ));
    }

    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or_default();
    let uncovered_width = rows
        .iter()
        .map(|r| r.uncovered.chars().count())
        .chain(std::iter::once(UNCOVERED_HEADER.len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    write_separator(&mut out, name_width, uncovered_width);
    out.push_str(&format!("{:<name_width$} ", NAME_HEADER));
    for header in PCT_HEADERS {
        out.push_str(&format!("| {} ", header));
    }
    out.push_str(&format!("| {:<uncovered_width$} \n", UNCOVERED_HEADER));
    write_separator(&mut out, name_width, uncovered_width);

    for row in &rows {
        write_row(
            &mut out,
            &row.name,
            &row.pcts,
            &row.uncovered,
            name_width,
            uncovered_width,
        );
    }
    write_separator(&mut out, name_width, uncovered_width);

    out
}

fn write_summary_line(out: &mut String, label: &str, totals: &Totals) {
    out.push_str(&format!(
        "{:<13}: {}% ( {}/{} )\n",
        label,
        format_pct(&totals.pct),
        totals.covered,
        totals.total
    ));
}

/// Renders istanbul's `text-summary` block of aggregate totals.
pub fn render_summary(coverage_map: &CoverageMap) -> String {
    let summary = coverage_map.get_coverage_summary();
    let mut out = String::new();

    out.push_str(&format!("{:=^80}\n", " Coverage summary "));
    write_summary_line(&mut out, "Statements", &summary.statements);
    write_summary_line(&mut out, "Branches", &summary.branches);
    write_summary_line(&mut out, "Functions", &summary.functions);
    write_summary_line(&mut out, "Lines", &summary.lines);
    out.push_str(&"=".repeat(80));
    out.push('\n');

    out
}
