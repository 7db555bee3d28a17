//! Filesystem helpers for efr
//!
//! Provides overwrite-aware copies of files and directory trees, atomic
//! writes, and identifier validation for names that end up as path segments.

pub mod copy;
pub mod error;
pub mod io;
pub mod name;

pub use copy::{CopyOutcome, Overwrite, RemoveOutcome, copy_dir, copy_file, remove_path};
pub use error::{Error, Result};
pub use name::validate_identifier;
