//! Integration Test: Core/Surface Separation
//!
//! **Policy**: `desk-core` holds every piece of application logic and MUST NOT
//! know how it is displayed. Terminal crates live in `botdesk-tui` only.
//!
//! **Policy**: production code in `desk-core` returns `Result` and lets the
//! surface decide what to show. No `.unwrap()`, `.expect(`, `println!` or
//! `eprintln!` outside of test code.

use std::fs;
use std::path::Path;

use architectural_enforcement::workspace_root;

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = workspace_root().join("desk/core/Cargo.toml");
    let content = fs::read_to_string(&manifest).expect("desk/core/Cargo.toml is readable");

    let offenders: Vec<&str> = UI_CRATES
        .iter()
        .copied()
        .filter(|name| {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#'))
                .any(|line| line.starts_with(name))
        })
        .collect();

    assert!(
        offenders.is_empty(),
        "desk-core depends on terminal crates: {offenders:?}"
    );
}

#[test]
fn test_core_sources_do_not_import_terminal_crates() {
    let mut violations = Vec::new();
    check_directory(&workspace_root().join("desk/core/src"), &mut violations, |line| {
        UI_CRATES
            .iter()
            .find(|name| line.contains(&format!("{name}::")))
            .map(|name| format!("uses {name}"))
    });

    report(&violations, "terminal crate usage in desk-core");
}

#[test]
fn test_core_production_code_does_not_panic_or_print() {
    let mut violations = Vec::new();
    check_directory(&workspace_root().join("desk/core/src"), &mut violations, |line| {
        if line.contains(".unwrap()") {
            Some("unwrap() in production code".to_string())
        } else if line.contains(".expect(") {
            Some("expect() in production code".to_string())
        } else if line.contains("println!") || line.contains("eprintln!") {
            Some("prints instead of logging through tracing".to_string())
        } else {
            None
        }
    });

    report(&violations, "panicking or printing code in desk-core");
}

#[test]
fn test_no_blocking_http_client() {
    let mut violations = Vec::new();
    for dir in ["desk/core/src", "tui/src"] {
        check_directory(&workspace_root().join(dir), &mut violations, |line| {
            line.contains("reqwest::blocking")
                .then(|| "blocking HTTP client".to_string())
        });
    }

    report(&violations, "blocking HTTP client usage");
}

fn report(violations: &[String], what: &str) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ Found {what}:");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!("\nFound {} violation(s). Fix these before merging!", violations.len());
}

/// Walks every `.rs` file under `dir`, applying `check` to each production line.
fn check_directory<F>(dir: &Path, violations: &mut Vec<String>, check: F)
where
    F: Fn(&str) -> Option<String>,
{
    if !dir.exists() {
        return;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        // test-only helper module
        if path.file_name().and_then(|s| s.to_str()) == Some("testing.rs") {
            continue;
        }
        check_file(path, violations, &check);
    }
}

fn check_file<F>(path: &Path, violations: &mut Vec<String>, check: &F)
where
    F: Fn(&str) -> Option<String>,
{
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };

    for (idx, line) in content.lines().enumerate() {
        // Test modules sit at the bottom of each file.
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }

        let code_part = line.split("//").next().unwrap_or(line);
        if code_part.trim().is_empty() {
            continue;
        }

        if let Some(reason) = check(code_part) {
            violations.push(format!(
                "{}:{} - {}: {}",
                path.display(),
                idx + 1,
                reason,
                line.trim()
            ));
        }
    }
}
