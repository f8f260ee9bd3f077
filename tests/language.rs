use std::fs;

use cassia::{EvaluationContext, eval_source};
use walkdir::WalkDir;

/// Every fenced `cassia` block in the documentation must evaluate
/// cleanly, line by line, in one shared context per block.
#[test]
fn doc_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("docs").into_iter()
                            .filter_map(Result::ok)
                            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, block) in extract_example_blocks(&content).into_iter().enumerate() {
            count += 1;
            let mut ctx = EvaluationContext::new();
            for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
                if let Err(e) = eval_source(line, &mut ctx) {
                    panic!("Example {} in {:?} failed on {:?}:\n{}", i + 1, path, line, e);
                }
            }
        }
    }

    assert!(count > 0, "No cassia examples found in docs");
}

fn extract_example_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```cassia") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

/// A whole-session script: expressions evaluated in order with shared
/// state, finishing on a checkable result.
#[test]
fn session_script_works() {
    let script = fs::read_to_string("tests/session.cas").expect("missing tests/session.cas");

    let mut ctx = EvaluationContext::new();
    let mut last = None;
    for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match eval_source(line, &mut ctx) {
            Ok(result) => last = Some(result),
            Err(e) => panic!("Session script failed on {line:?}: {e}"),
        }
    }

    assert_eq!(last.expect("empty session script").to_string(), "3");
}
