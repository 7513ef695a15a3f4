use serde::{Deserialize, Deserializer, Serialize};

/// Some producers emit `null` for positions they could not resolve
/// (v8-to-istanbul does this for open-ended columns). Treat them as 0.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub line: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub column: u32,
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Range {
        Range {
            start: Location {
                line: start_line,
                column: start_column,
            },
            end: Location {
                line: end_line,
                column: end_column,
            },
        }
    }

    /// Identity of a source location across independently produced coverage
    /// data. Two runs instrumenting the same file agree on ranges, not on the
    /// numeric indices they assigned to them.
    pub fn key_from_loc(range: &Range) -> String {
        format!(
            "{}|{}|{}|{}",
            range.start.line, range.start.column, range.end.line, range.end.column
        )
    }
}
