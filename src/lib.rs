//! replace-chars library for finding and fixing unwanted characters in text
//! files.
//!
//! The workflow has three phases:
//!
//! 1. **Enumeration**: Collect candidate paths from arguments or stdin
//! 2. **Fixing**: Apply a character replacement table to every line
//! 3. **Reporting**: Render changed files, diffs and per-file errors
//!
//! # Example
//!
//! ```no_run
//! use replace_chars::{Mode, ReplacementMap, recorder, scanner};
//! use std::path::PathBuf;
//!
//! let map = ReplacementMap::builtin();
//! let files = scanner::Enumerator::new(vec![PathBuf::from("README.md")], vec![]);
//! let result = recorder::record_all(&map, files, Mode::Check);
//!
//! println!("{} file(s) need changes", result.changes().len());
//! ```

pub mod error;
pub mod recorder;
pub mod replacements;
pub mod report;
pub mod rewriter;
pub mod scanner;

pub use error::{FileError, MapError};
pub use recorder::{DiffRecorder, FileRecord, Mode};
pub use replacements::ReplacementMap;
