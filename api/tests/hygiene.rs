//! Hygiene: source-level budgets for the api crate.
//!
//! Every request and forced logout passes through this crate, so it must
//! never crash the process or throw errors away unseen. Budgets only shrink.

use std::fs;
use std::path::Path;

/// (pattern, budget, why)
const BUDGETS: &[(&str, usize, &str)] = &[
    (".unwrap()", 0, "panics"),
    (".expect(", 0, "panics"),
    ("panic!(", 0, "panics"),
    ("unreachable!(", 0, "panics"),
    ("todo!(", 0, "stub"),
    ("unimplemented!(", 0, "stub"),
    ("let _ =", 0, "silent discard"),
    (".ok()", 0, "silent discard"),
    ("#[allow(dead_code)]", 0, "dead code"),
    ("println!(", 0, "use tracing"),
    ("dbg!(", 0, "debug leftover"),
];

/// Production `.rs` files under `src/`, skipping `*_test.rs`.
fn source_files(dir: &Path, out: &mut Vec<(String, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            source_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let name = path.to_string_lossy().to_string();
            if name.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((name, content));
            }
        }
    }
}

#[test]
fn source_budgets_hold() {
    let mut files = Vec::new();
    source_files(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found; run from the crate root");

    let mut failures = Vec::new();
    for (pattern, budget, why) in BUDGETS {
        let hits: Vec<(String, usize)> = files
            .iter()
            .map(|(path, content)| (path.clone(), content.lines().filter(|l| l.contains(pattern)).count()))
            .filter(|(_, count)| *count > 0)
            .collect();
        let count: usize = hits.iter().map(|(_, c)| c).sum();
        if count > *budget {
            let detail = hits
                .iter()
                .map(|(path, c)| format!("    {path}: {c}"))
                .collect::<Vec<_>>()
                .join("\n");
            failures.push(format!("  `{pattern}` ({why}): found {count}, max {budget}\n{detail}"));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
