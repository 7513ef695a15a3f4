#![allow(dead_code)]

use std::{fs, path::Path};

use coverage_merge::MergeOptions;
use serde_json::{json, Value};

/// Istanbul file entry with one single-line statement per hit count, on
/// lines 1..=n, and one branch per entry of `branches`.
pub fn file_coverage(path: &str, statement_hits: &[u32], branches: &[Vec<u32>]) -> Value {
    let mut statement_map = serde_json::Map::new();
    let mut s = serde_json::Map::new();
    for (i, hits) in statement_hits.iter().enumerate() {
        let line = i + 1;
        statement_map.insert(
            i.to_string(),
            json!({"start": {"line": line, "column": 0}, "end": {"line": line, "column": 20}}),
        );
        s.insert(i.to_string(), json!(hits));
    }

    let mut branch_map = serde_json::Map::new();
    let mut b = serde_json::Map::new();
    for (i, hits) in branches.iter().enumerate() {
        let line = 100 + i * 10;
        let locations: Vec<Value> = (0..hits.len())
            .map(|arm| {
                json!({
                    "start": {"line": line + arm + 1, "column": 4},
                    "end": {"line": line + arm + 1, "column": 12}
                })
            })
            .collect();
        branch_map.insert(
            i.to_string(),
            json!({
                "loc": {"start": {"line": line, "column": 0}, "end": {"line": line + 9, "column": 1}},
                "type": "switch",
                "locations": locations,
                "line": line
            }),
        );
        b.insert(i.to_string(), json!(hits));
    }

    json!({
        "path": path,
        "statementMap": statement_map,
        "fnMap": {},
        "branchMap": branch_map,
        "s": s,
        "f": {},
        "b": b,
        "_coverageSchema": "1a1c01bbd47fc00a2c39e90264f33305004495a9",
        "hash": "3b1c"
    })
}

pub fn coverage_document(files: &[Value]) -> String {
    let mut doc = serde_json::Map::new();
    for file in files {
        let path = file["path"].as_str().unwrap().to_string();
        doc.insert(path, file.clone());
    }
    Value::Object(doc).to_string()
}

pub fn write_producer(options: &MergeOptions, producer: &str, contents: &str) {
    let input = options.producer_input(producer);
    fs::create_dir_all(input.parent().unwrap()).unwrap();
    fs::write(input, contents).unwrap();
}

pub fn options_in(dir: &Path) -> MergeOptions {
    MergeOptions::default().resolve(dir)
}
