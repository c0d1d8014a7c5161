//! Error types.
//!
//! [`FileError`] covers everything that can go wrong with a single input
//! file. None of these abort a run: the recorder collects them and the
//! report lists them after the changes. [`MapError`] covers building the
//! replacement table, which happens once before any file is touched.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure tied to one input file.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{}: file not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{}: not a regular file", path.display())]
    NotAFile { path: PathBuf },

    #[error("{}: failed to read: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The file needed changes but the corrected content could not be saved.
    #[error("{}: failed to write fixes: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            FileError::NotFound { path }
            | FileError::NotAFile { path }
            | FileError::Read { path, .. }
            | FileError::Decode { path, .. }
            | FileError::Write { path, .. } => path,
        }
    }
}

/// A problem with the replacement table or its configuration file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid character '{0}', expected a single character or a codepoint like U+2013")]
    InvalidChar(String),

    #[error("conflicting replacements for {}: '{existing}' and '{new}'", codepoint(*key))]
    Conflict {
        key: char,
        existing: char,
        new: char,
    },

    #[error("line terminator {} cannot be replaced", codepoint(*key))]
    TerminatorKey { key: char },

    #[error("invalid map entry '{0}', expected 'SRC=DST'")]
    Entry(String),

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Formats a char as `U+XXXX` for messages.
pub fn codepoint(c: char) -> String {
    format!("U+{:04X}", c as u32)
}
