use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{coverage::Coverage, Range};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub decl: Range,
    pub loc: Range,
    #[serde(default)]
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub loc: Range,
    #[serde(rename = "type")]
    pub branch_type: String,
    pub locations: Vec<Range>,
    #[serde(default)]
    pub line: u32,
}

impl Branch {
    /// Branches are identified by where their first arm starts; the
    /// enclosing `loc` is only a fallback for producers emitting no arms.
    pub(crate) fn key(&self) -> String {
        Range::key_from_loc(self.locations.first().unwrap_or(&self.loc))
    }

    /// Line a branch is reported on.
    pub fn reported_line(&self) -> u32 {
        if self.line > 0 {
            self.line
        } else {
            self.loc.start.line
        }
    }
}

/// Hit count keyed by statement / function index.
pub type HitMap = IndexMap<u32, u32>;
/// Hit count keyed by source line number, ascending.
pub type LineHitMap = BTreeMap<u32, u32>;
pub type StatementMap = IndexMap<u32, Range>;
pub type FunctionMap = IndexMap<u32, Function>;
pub type BranchMap = IndexMap<u32, Branch>;
pub type BranchHitMap = IndexMap<u32, Vec<u32>>;
pub type BranchCoverageMap = BTreeMap<u32, Coverage>;
