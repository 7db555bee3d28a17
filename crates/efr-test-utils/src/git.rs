//! Git repository fixtures.
//!
//! Prefer [`real_git_repo`] when no history is needed; it does not depend on
//! a `git` binary.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Initialise a repository with `git2`. No commits, no config.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialise a repository with an `origin` remote pointing at `url`.
///
/// # Panics
/// Panics if the repository or the remote cannot be created.
pub fn git_repo_with_origin(path: &Path, url: &str) -> git2::Repository {
    let repo = real_git_repo(path);
    repo.remote("origin", url)
        .unwrap_or_else(|e| panic!("git_repo_with_origin: failed to add origin: {e}"));
    repo
}

/// Initialise a repository with one commit on `main` using the `git` CLI.
///
/// Configures a local identity and disables commit signing so that later
/// `git commit` calls in tests succeed on any machine.
///
/// # Panics
/// Panics if any git command fails.
pub fn real_git_repo_with_commit(path: &Path) {
    let run = |args: &[&str]| {
        let output = Command::new("git")
            .args(args)
            .current_dir(path)
            .output()
            .unwrap_or_else(|e| panic!("real_git_repo_with_commit: `git {args:?}`: {e}"));
        if !output.status.success() {
            panic!(
                "real_git_repo_with_commit: `git {args:?}` failed:\n{}",
                String::from_utf8_lossy(&output.stderr)
            );
        }
    };

    run(&["init"]);
    run(&["config", "user.email", "test@test.com"]);
    run(&["config", "user.name", "Test User"]);
    run(&["config", "commit.gpgsign", "false"]);

    fs::write(path.join("README.md"), "# Test")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: write README.md: {e}"));

    run(&["add", "."]);
    run(&["commit", "-m", "Initial commit"]);
    // Older git versions may not support renaming the unborn default branch
    let _ = Command::new("git")
        .args(["branch", "-m", "main"])
        .current_dir(path)
        .output();
}
