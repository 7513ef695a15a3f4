//! Browsable html report: a root `index.html` summarising every file and
//! one detail page per file, laid out under the report directory by the
//! file's path relative to the common source root.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Component, Path, PathBuf},
};

use istanbul_oxide::{CoverageMap, CoverageSummary, FileCoverage, Totals};
use tracing::debug;

use crate::format::{common_root, escape_html, relative_to};
use crate::format_pct;

const STYLE: &str = r#"
body { font-family: Helvetica Neue, Helvetica, Arial, sans-serif; margin: 0; padding: 1em 2em; color: #333; }
h1 { font-size: 20px; }
a { color: #0074D9; text-decoration: none; }
table.coverage-summary { border-collapse: collapse; margin-top: 1em; }
table.coverage-summary th, table.coverage-summary td { border: 1px solid #bbb; padding: 4px 8px; text-align: right; }
table.coverage-summary td.file, table.coverage-summary th.file { text-align: left; }
.strong { font-weight: bold; }
.high { background: #e6f5d0; }
.medium { background: #fff4c2; }
.low { background: #fce1e5; }
table.source { border-collapse: collapse; font-family: Consolas, monospace; font-size: 13px; }
table.source td { padding: 0 6px; white-space: pre; vertical-align: top; }
td.line-count { color: #999; text-align: right; }
td.cline-yes { background: #e6f5d0; text-align: right; }
td.cline-no { background: #fce1e5; text-align: right; }
td.cline-neutral { text-align: right; }
td.branch { color: #666; text-align: right; }
"#;

/// Coverage class used to colour a cell, with istanbul's default watermarks.
fn watermark(totals: &Totals) -> &'static str {
    let pct = totals.pct.value();
    if pct >= 80.0 {
        "high"
    } else if pct >= 50.0 {
        "medium"
    } else {
        "low"
    }
}

fn write_page_start(out: &mut String, title: &str) {
    out.push_str("<!doctype html>\n");
    out.push_str("<html lang=\"en\">\n");
    out.push_str("<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>Code coverage report for {}</title>\n",
        escape_html(title)
    ));
    out.push_str(&format!("<style>{}</style>\n", STYLE));
    out.push_str("</head>\n");
    out.push_str("<body>\n");
}

fn write_page_end(out: &mut String) {
    out.push_str("</body>\n");
    out.push_str("</html>\n");
}

fn write_totals_cells(out: &mut String, totals: &Totals) {
    out.push_str(&format!(
        "<td class=\"{}\">{}%</td><td class=\"{}\">{}/{}</td>",
        watermark(totals),
        format_pct(&totals.pct),
        watermark(totals),
        totals.covered,
        totals.total
    ));
}

fn write_summary_header(out: &mut String, summary: &CoverageSummary) {
    out.push_str("<div class=\"summary\">\n");
    for (label, totals) in [
        ("Statements", &summary.statements),
        ("Branches", &summary.branches),
        ("Functions", &summary.functions),
        ("Lines", &summary.lines),
    ] {
        out.push_str(&format!(
            "<span class=\"{}\"><span class=\"strong\">{}% </span>{} <span>{}/{}</span></span>\n",
            watermark(totals),
            format_pct(&totals.pct),
            label,
            totals.covered,
            totals.total
        ));
    }
    out.push_str("</div>\n");
}

fn render_index(coverage_map: &CoverageMap, root: &str) -> String {
    let mut out = String::new();
    write_page_start(&mut out, "All files");
    out.push_str("<h1>All files</h1>\n");
    write_summary_header(&mut out, &coverage_map.get_coverage_summary());

    out.push_str("<table class=\"coverage-summary\">\n");
    out.push_str(
        "<thead><tr><th class=\"file\">File</th><th colspan=\"2\">Statements</th><th colspan=\"2\">Branches</th><th colspan=\"2\">Functions</th><th colspan=\"2\">Lines</th></tr></thead>\n",
    );
    out.push_str("<tbody>\n");
    for (path, coverage) in coverage_map.iter() {
        let relative = escape_html(&relative_to(root, path));
        let summary = coverage.to_summary();

        out.push_str(&format!(
            "<tr><td class=\"file\"><a href=\"{}.html\">{}</a></td>",
            relative, relative
        ));
        for totals in [
            &summary.statements,
            &summary.branches,
            &summary.functions,
            &summary.lines,
        ] {
            write_totals_cells(&mut out, totals);
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n");
    out.push_str("</table>\n");
    write_page_end(&mut out);

    out
}

fn render_file(coverage: &FileCoverage, relative: &str, source: Option<&str>) -> String {
    let depth = relative.matches('/').count();
    let index_href = format!("{}index.html", "../".repeat(depth));
    let line_coverage = coverage.get_line_coverage();
    let branch_coverage = coverage.get_branch_coverage_by_line();

    let mut out = String::new();
    write_page_start(&mut out, relative);
    out.push_str(&format!(
        "<h1><a href=\"{}\">All files</a> / {}</h1>\n",
        index_href,
        escape_html(relative)
    ));
    write_summary_header(&mut out, &coverage.to_summary());

    let source_lines: Vec<&str> = source.map(|s| s.lines().collect()).unwrap_or_default();
    if source.is_none() {
        out.push_str("<p>Source not available, showing instrumented lines only.</p>\n");
    }

    // Only lines that exist in the source or carry coverage get a row.
    let lines: BTreeSet<u32> = (1..=source_lines.len() as u32)
        .chain(line_coverage.keys().copied())
        .chain(branch_coverage.keys().copied())
        .collect();

    out.push_str("<table class=\"source\">\n");
    for line in lines {
        let (class, hits) = match line_coverage.get(&line) {
            Some(0) => ("cline-no", "!".to_string()),
            Some(hits) => ("cline-yes", format!("{}x", hits)),
            None => ("cline-neutral", String::new()),
        };
        let branches = branch_coverage
            .get(&line)
            .map(|b| format!("{}/{}", b.covered(), b.total()))
            .unwrap_or_default();
        let text = line
            .checked_sub(1)
            .and_then(|i| source_lines.get(i as usize))
            .map(|l| escape_html(l))
            .unwrap_or_default();

        out.push_str(&format!(
            "<tr><td class=\"line-count\">{}</td><td class=\"{}\">{}</td><td class=\"branch\">{}</td><td>{}</td></tr>\n",
            line, class, hits, branches, text
        ));
    }
    out.push_str("</table>\n");
    write_page_end(&mut out);

    out
}

fn write_page(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Writes the html report into `report_dir` and returns the pages written,
/// `index.html` first. Source text is read from each file's recorded path;
/// files that cannot be read are rendered with line hits only. Every page
/// lands below `report_dir`, whatever the covered paths look like.
pub fn write_report(coverage_map: &CoverageMap, report_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let root = common_root(coverage_map.iter().map(|(path, _)| path.as_str()));
    let mut written = vec![];

    fs::create_dir_all(report_dir)?;

    let index = report_dir.join("index.html");
    write_page(&index, &render_index(coverage_map, &root))?;
    written.push(index);

    for (path, coverage) in coverage_map.iter() {
        let relative = relative_to(&root, path);
        let page = report_dir.join(format!("{}.html", relative));
        if page
            .components()
            .any(|c| matches!(c, Component::ParentDir))
            || !page.starts_with(report_dir)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("report page for {} falls outside {}", path, report_dir.display()),
            ));
        }

        let source = fs::read_to_string(path).ok();
        if source.is_none() {
            debug!(path = path.as_str(), "source not readable");
        }

        write_page(&page, &render_file(coverage, &relative, source.as_deref()))?;
        debug!(page = %page.display(), "wrote coverage page");
        written.push(page);
    }

    Ok(written)
}
