//! Architectural Enforcement Integration Tests
//!
//! The tests in this package scan the workspace sources and fail when a
//! layering rule is broken:
//!
//! - `desk-core` stays headless (no terminal crates, no printing to stdout)
//! - production code in `desk-core` propagates errors instead of panicking
//! - no blocking HTTP client anywhere in the async code paths
//!
//! All paths are resolved from the workspace root, so the tests work no
//! matter which directory `cargo test` is started from.

use std::path::PathBuf;

/// Absolute path to the workspace root.
#[must_use]
pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}
