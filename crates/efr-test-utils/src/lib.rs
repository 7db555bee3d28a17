//! Shared test fixtures for the efr workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repositories with and without history or an `origin`
//! - [`platformio`]: [`platformio::FakePlatformIo`], a PlatformIO home with
//!   chosen toolchain versions
//! - [`boards`]: [`boards::BoardSourceFixture`], a motorgo boards checkout

pub mod boards;
pub mod git;
pub mod platformio;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

/// Snapshot every file under `root` as `relative path -> contents`.
///
/// Used to assert that a directory is byte-for-byte unchanged, or that two
/// trees are identical.
///
/// # Panics
/// Panics if the tree cannot be read.
pub fn snapshot_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root) {
        let entry = entry.unwrap_or_else(|e| panic!("snapshot_tree: walk failed: {e}"));
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|e| panic!("snapshot_tree: {e}"))
            .to_string_lossy()
            .replace('\\', "/");
        let bytes = fs::read(entry.path())
            .unwrap_or_else(|e| panic!("snapshot_tree: read {}: {e}", entry.path().display()));
        files.insert(relative, bytes);
    }
    files
}
