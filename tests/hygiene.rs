//! Hygiene: enforces coding standards at test time
//!
//! These tests scan the crate's `src/` tree for patterns that would let a
//! failure escape into the host's event loop or vanish without a trace. The
//! detector and controller run inside mutation-observer and input callbacks,
//! so a panic there stops detection for the rest of the session. Each pattern
//! has a budget (ideally zero). The budget never grows.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics abort the callback that invoked us.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or log instead" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or log instead" },
    Budget { pattern: "panic!(", max: 0, why: "degrade to a no-op instead" },
    Budget { pattern: "unreachable!(", max: 0, why: "degrade to a no-op instead" },
    Budget { pattern: "todo!(", max: 0, why: "finish the stub" },
    Budget { pattern: "unimplemented!(", max: 0, why: "finish the stub" },
    // Silent loss: discards errors without inspecting.
    Budget { pattern: "let _ =", max: 0, why: "log the error with tracing" },
    Budget { pattern: ".ok()", max: 0, why: "log the error with tracing" },
    // Output: everything goes through tracing.
    Budget { pattern: "println!(", max: 0, why: "use tracing macros" },
    Budget { pattern: "eprintln!(", max: 0, why: "use tracing macros" },
    Budget { pattern: "dbg!(", max: 0, why: "use tracing macros" },
    // Style / structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Collect production `.rs` files from `src/`, excluding `*_test.rs` files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn count_in_source(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn source_tree_is_not_empty() {
    let files = source_files();
    assert!(
        files.iter().any(|f| f.path.ends_with("lib.rs")),
        "hygiene scan found no lib.rs; run from the crate root"
    );
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let hits = count_in_source(&files, budget.pattern);
        let count: usize = hits.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            failures.push(format!(
                "{} budget exceeded: found {count}, max {} ({}).\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                format_hits(&hits)
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn core_modules_do_not_touch_web_sys() {
    let files = source_files();
    let offenders: Vec<&str> = files
        .iter()
        .filter(|f| !f.path.ends_with("web.rs"))
        .filter(|f| f.content.contains("web_sys") || f.content.contains("wasm_bindgen"))
        .map(|f| f.path.as_str())
        .collect();
    assert!(
        offenders.is_empty(),
        "browser APIs must stay in the web binding: {offenders:?}"
    );
}
