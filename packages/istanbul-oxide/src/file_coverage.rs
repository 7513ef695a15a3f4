use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    coverage::Coverage, BranchCoverageMap, BranchHitMap, BranchMap, CoverageError,
    CoverageSummary, FunctionMap, HitMap, LineHitMap, Range, StatementMap, Totals,
};

/// Coverage for a single file, in the shape of one entry of istanbul's
/// `coverage-final.json`:
/// `path` - the file path for which coverage is being tracked
/// `statementMap` - map of statement locations keyed by statement index
/// `fnMap` - map of function metadata keyed by function index
/// `branchMap` - map of branch metadata keyed by branch index
/// `s` - hit counts for statements
/// `f` - hit count for functions
/// `b` - hit count for branches
/// `bT` - hit count for the truthy evaluation of logical branches, if reported
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCoverage {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
    pub path: String,
    pub statement_map: StatementMap,
    pub fn_map: FunctionMap,
    pub branch_map: BranchMap,
    pub s: HitMap,
    pub f: HitMap,
    pub b: BranchHitMap,
    #[serde(rename = "bT", default, skip_serializing_if = "Option::is_none")]
    pub b_t: Option<BranchHitMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_source_map: Option<serde_json::Value>,
    #[serde(
        rename = "_coverageSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coverage_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Pairs each hit entry with its map entry under a location key, dropping the
/// producer-local numeric index.
fn keyed_items<H: Clone, T: Clone>(
    hits: &IndexMap<u32, H>,
    map: &IndexMap<u32, T>,
    item_key: &impl Fn(&T) -> String,
) -> IndexMap<String, (H, T)> {
    hits.iter()
        .filter_map(|(index, hit)| {
            map.get(index)
                .map(|item| (item_key(item), (hit.clone(), item.clone())))
        })
        .collect()
}

/// Merges two (hits, map) pairs by location. Items present on both sides have
/// their hits combined with `merge_hits`; the rest are carried over as is.
/// Result is re-indexed from 0, items of `a` first.
fn merge_prop<H: Clone, T: Clone>(
    a_hits: &IndexMap<u32, H>,
    a_map: &IndexMap<u32, T>,
    b_hits: &IndexMap<u32, H>,
    b_map: &IndexMap<u32, T>,
    item_key: impl Fn(&T) -> String,
    merge_hits: impl Fn(&mut (H, T), &(H, T)),
) -> (IndexMap<u32, H>, IndexMap<u32, T>) {
    let mut merged = keyed_items(a_hits, a_map, &item_key);

    for (key, b_value) in keyed_items(b_hits, b_map, &item_key) {
        if let Some(a_value) = merged.get_mut(&key) {
            merge_hits(a_value, &b_value);
        } else {
            merged.insert(key, b_value);
        }
    }

    let mut hits = IndexMap::with_capacity(merged.len());
    let mut map = IndexMap::with_capacity(merged.len());
    for (index, (_, (hit, item))) in merged.into_iter().enumerate() {
        hits.insert(index as u32, hit);
        map.insert(index as u32, item);
    }

    (hits, map)
}

fn sum_hits<T>(a: &mut (u32, T), b: &(u32, T)) {
    a.0 = a.0.saturating_add(b.0);
}

/// Element-wise sum of branch arm hits. When the other side knows about more
/// arms its mapping is the more complete one and replaces ours.
fn sum_branch_hits<T: Clone>(a: &mut (Vec<u32>, T), b: &(Vec<u32>, T)) {
    if b.0.len() > a.0.len() {
        a.0.resize(b.0.len(), 0);
        a.1 = b.1.clone();
    }

    for (existing, hits) in a.0.iter_mut().zip(&b.0) {
        *existing = existing.saturating_add(*hits);
    }
}

impl FileCoverage {
    pub fn empty(file_path: String, report_logic: bool) -> FileCoverage {
        FileCoverage {
            all: false,
            path: file_path,
            statement_map: Default::default(),
            fn_map: Default::default(),
            branch_map: Default::default(),
            s: Default::default(),
            f: Default::default(),
            b: Default::default(),
            b_t: if report_logic {
                Some(Default::default())
            } else {
                None
            },
            input_source_map: None,
            coverage_schema: None,
            hash: None,
        }
    }

    /// Checks that every hit counter refers to an entry of its location map
    /// and that branch hit vectors match the number of declared arms.
    pub fn validate(&self) -> Result<(), CoverageError> {
        if let Some(index) = self.s.keys().find(|k| !self.statement_map.contains_key(*k)) {
            return Err(CoverageError::MissingStatement {
                path: self.path.clone(),
                index: *index,
            });
        }

        if let Some(index) = self.f.keys().find(|k| !self.fn_map.contains_key(*k)) {
            return Err(CoverageError::MissingFunction {
                path: self.path.clone(),
                index: *index,
            });
        }

        let branch_hits = self.b.iter().chain(self.b_t.iter().flatten());
        for (index, hits) in branch_hits {
            let branch = self
                .branch_map
                .get(index)
                .ok_or_else(|| CoverageError::MissingBranch {
                    path: self.path.clone(),
                    index: *index,
                })?;

            if !branch.locations.is_empty() && branch.locations.len() != hits.len() {
                return Err(CoverageError::BranchArity {
                    path: self.path.clone(),
                    index: *index,
                    expected: branch.locations.len(),
                    actual: hits.len(),
                });
            }
        }

        Ok(())
    }

    /// Returns computed line coverage from statement coverage.
    /// This is a map of hits keyed by line number in the source.
    pub fn get_line_coverage(&self) -> LineHitMap {
        let mut line_map: LineHitMap = Default::default();

        for (st, count) in &self.s {
            let Some(range) = self.statement_map.get(st) else {
                continue;
            };

            let hits = line_map.entry(range.start.line).or_insert(*count);
            if *hits < *count {
                *hits = *count;
            }
        }

        line_map
    }

    /// Returns uncovered line numbers, ascending.
    pub fn get_uncovered_lines(&self) -> Vec<u32> {
        self.get_line_coverage()
            .into_iter()
            .filter_map(|(line, hits)| if hits == 0 { Some(line) } else { None })
            .collect()
    }

    pub fn get_branch_coverage_by_line(&self) -> BranchCoverageMap {
        let mut prefilter_data: LineHitMap = Default::default();
        let mut covered_data: LineHitMap = Default::default();

        for (k, map) in &self.branch_map {
            let Some(branch_data) = self.b.get(k) else {
                continue;
            };
            let line = map.reported_line();

            *prefilter_data.entry(line).or_default() += branch_data.len() as u32;
            *covered_data.entry(line).or_default() +=
                branch_data.iter().filter(|x| **x > 0).count() as u32;
        }

        prefilter_data
            .into_iter()
            .map(|(line, total)| {
                let covered = covered_data.get(&line).copied().unwrap_or_default();
                let coverage = if total > 0 {
                    covered as f32 / total as f32 * 100_f32
                } else {
                    100_f32
                };
                (line, Coverage::new(covered, total, coverage))
            })
            .collect()
    }

    /// Merges another coverage object for the same file into this one.
    /// Statements, functions and branches are matched by source location, so
    /// both sides may have numbered them differently. Matched hit counts are
    /// summed, unmatched entries are kept from either side.
    pub fn merge(&mut self, other: &FileCoverage) {
        if other.all {
            return;
        }

        if self.all {
            let path = std::mem::take(&mut self.path);
            *self = other.clone();
            self.path = path;
            return;
        }

        let (s, statement_map) = merge_prop(
            &self.s,
            &self.statement_map,
            &other.s,
            &other.statement_map,
            Range::key_from_loc,
            sum_hits,
        );
        self.s = s;
        self.statement_map = statement_map;

        let (f, fn_map) = merge_prop(
            &self.f,
            &self.fn_map,
            &other.f,
            &other.fn_map,
            |f| Range::key_from_loc(&f.loc),
            sum_hits,
        );
        self.f = f;
        self.fn_map = fn_map;

        // bT shares branchMap with b, so it has to be merged against the
        // maps as they were before b rewrote them.
        let b_t = match (&self.b_t, &other.b_t) {
            (Some(self_b_t), Some(other_b_t)) => Some(
                merge_prop(
                    self_b_t,
                    &self.branch_map,
                    other_b_t,
                    &other.branch_map,
                    |b| b.key(),
                    sum_branch_hits,
                )
                .0,
            ),
            _ => None,
        };

        let (b, branch_map) = merge_prop(
            &self.b,
            &self.branch_map,
            &other.b,
            &other.branch_map,
            |b| b.key(),
            sum_branch_hits,
        );
        self.b = b;
        self.branch_map = branch_map;

        if b_t.is_some() {
            self.b_t = b_t;
        }
    }

    pub fn compute_simple_totals(hits: &IndexMap<u32, u32>) -> Totals {
        Totals::new(
            hits.values().filter(|&x| *x > 0).count() as u32,
            hits.len() as u32,
        )
    }

    fn compute_branch_totals(branch_map: &BranchHitMap) -> Totals {
        let mut covered = 0;
        let mut total = 0;

        branch_map.values().for_each(|branches| {
            covered += branches.iter().filter(|hits| **hits > 0).count() as u32;
            total += branches.len() as u32;
        });

        Totals::new(covered, total)
    }

    pub fn reset_hits(&mut self) {
        for val in self.s.values_mut() {
            *val = 0;
        }

        for val in self.f.values_mut() {
            *val = 0;
        }

        for val in self.b.values_mut() {
            val.iter_mut().for_each(|x| *x = 0);
        }

        if let Some(branches_true) = &mut self.b_t {
            for val in branches_true.values_mut() {
                val.iter_mut().for_each(|x| *x = 0);
            }
        }
    }

    pub fn to_summary(&self) -> CoverageSummary {
        let line_coverage = self.get_line_coverage();
        let lines = Totals::new(
            line_coverage.values().filter(|&x| *x > 0).count() as u32,
            line_coverage.len() as u32,
        );

        CoverageSummary {
            lines,
            statements: FileCoverage::compute_simple_totals(&self.s),
            functions: FileCoverage::compute_simple_totals(&self.f),
            branches: FileCoverage::compute_branch_totals(&self.b),
            branches_true: self.b_t.as_ref().map(FileCoverage::compute_branch_totals),
        }
    }
}
