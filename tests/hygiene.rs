//! Hygiene: production sources must not panic or drop errors silently.
//!
//! Every pattern below has a budget of zero in `src/` (sibling `*_test.rs`
//! files are exempt). Matches count per line, comments included.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    Budget { pattern: ".unwrap()", max: 0, why: "panics on None/Err" },
    Budget { pattern: ".expect(", max: 0, why: "panics on None/Err" },
    Budget { pattern: "panic!(", max: 0, why: "crashes the host" },
    Budget { pattern: "unreachable!(", max: 0, why: "crashes the host" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished stub" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished stub" },
    Budget { pattern: "let _ =", max: 0, why: "discards a result unread" },
    Budget { pattern: ".ok()", max: 0, why: "discards the error" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
];

fn production_sources(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

fn hits(files: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|(path, content)| {
            content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(move |(n, line)| format!("  {}:{}: {}", path.display(), n + 1, line.trim()))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);
    assert!(files.iter().any(|(path, _)| path.ends_with("lib.rs")), "run from the crate root");
}

#[test]
fn production_code_stays_within_budgets() {
    let mut files = Vec::new();
    production_sources(Path::new("src"), &mut files);

    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        if found.len() > budget.max {
            failures.push(format!(
                "`{}` ({}): found {}, max {}\n{}",
                budget.pattern,
                budget.why,
                found.len(),
                budget.max,
                found.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}
