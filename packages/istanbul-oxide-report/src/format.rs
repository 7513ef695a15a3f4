use istanbul_oxide::CoveragePercentage;

/// Percentage as istanbul prints it: no trailing zeros, `Unknown` as 0.
pub fn format_pct(pct: &CoveragePercentage) -> String {
    format!("{}", pct.value())
}

/// Collapses ascending line numbers into `a-b` runs: `[3, 4, 5, 9]` -> `3-5,9`.
pub fn line_ranges(lines: &[u32]) -> String {
    let mut runs: Vec<String> = vec![];
    let mut iter = lines.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }

        if start == end {
            runs.push(start.to_string());
        } else {
            runs.push(format!("{}-{}", start, end));
        }
    }

    runs.join(",")
}

/// Escapes text for use in html element content and attribute values.
pub(crate) fn escape_html(value: &str) -> String {
    let mut ret = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => ret.push_str("&amp;"),
            '<' => ret.push_str("&lt;"),
            '>' => ret.push_str("&gt;"),
            '"' => ret.push_str("&quot;"),
            '\'' => ret.push_str("&#39;"),
            _ => ret.push(c),
        }
    }
    ret
}

/// Longest directory prefix shared by every path, without trailing slash.
pub(crate) fn common_root<'a>(paths: impl IntoIterator<Item = &'a str>) -> String {
    let mut root: Option<Vec<&str>> = None;

    for path in paths {
        let mut dirs: Vec<&str> = path.split('/').collect();
        dirs.pop();

        root = Some(match root {
            None => dirs,
            Some(current) => current
                .into_iter()
                .zip(dirs)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }

    root.unwrap_or_default().join("/")
}

/// Prefix used in report file names for a `..` segment of a source path.
pub(crate) const PARENT_DIR_NAME: &str = "__parent__";

/// `path` with `root` stripped off, as used for report file names. The
/// result never escapes the report directory: a leading `/` and `.` segments
/// are dropped and `..` segments become [`PARENT_DIR_NAME`].
pub(crate) fn relative_to(root: &str, path: &str) -> String {
    let rest = if root.is_empty() {
        path
    } else {
        path.strip_prefix(root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };

    rest.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| if segment == ".." { PARENT_DIR_NAME } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use istanbul_oxide::CoveragePercentage;
    use pretty_assertions::assert_eq;

    use super::{common_root, escape_html, format_pct, line_ranges, relative_to};

    #[test]
    fn collapses_consecutive_lines() {
        assert_eq!(line_ranges(&[3, 4, 5, 9, 11, 12]), "3-5,9,11-12");
        assert_eq!(line_ranges(&[]), "");
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_pct(&CoveragePercentage::Value(100.0)), "100");
        assert_eq!(format_pct(&CoveragePercentage::Value(86.66)), "86.66");
        assert_eq!(format_pct(&CoveragePercentage::Unknown), "0");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn finds_common_directory() {
        let root = common_root(["src/utils/counter.ts", "src/App.tsx"]);

        assert_eq!(root, "src");
        assert_eq!(relative_to(&root, "src/utils/counter.ts"), "utils/counter.ts");
        assert_eq!(common_root(["/repo/src/App.tsx"]), "/repo/src");
        assert_eq!(common_root(["a.ts", "lib/b.ts"]), "");
        assert_eq!(relative_to("", "a.ts"), "a.ts");
    }

    #[test]
    fn relative_paths_stay_below_report_root() {
        assert_eq!(
            relative_to("", "../shared/util.ts"),
            "__parent__/shared/util.ts"
        );
        assert_eq!(relative_to("", "/repo/./src/App.tsx"), "repo/src/App.tsx");
        assert_eq!(relative_to("src", "src/../../x.ts"), "__parent__/__parent__/x.ts");
    }
}
