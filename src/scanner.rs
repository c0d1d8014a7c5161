//! Input file enumeration.
//!
//! Candidates come from positional arguments, or from a newline-separated
//! list on stdin when no arguments are given (the form file watchers and
//! `xargs`-less hook runners pipe in). Directories are not expanded: each
//! entry must already name a file.
//!
//! The [`Enumerator`] is lazy. Paths are checked for existence only when
//! yielded, duplicates are dropped on first repeat, and input order is kept.

use crate::error::FileError;
use glob::Pattern;
use std::collections::HashSet;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Reads a newline-separated path list.
///
/// Lines are split on raw bytes, so names that are not valid UTF-8 still
/// come through as paths. Trailing `\r` is trimmed and blank lines are
/// skipped. Only a failed read is an error.
pub fn read_path_list(reader: impl BufRead) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if !line.iter().all(u8::is_ascii_whitespace) {
            paths.push(path_from_bytes(line));
        }
    }
    Ok(paths)
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}

/// Compiles `--exclude` glob patterns.
pub fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>, glob::PatternError> {
    patterns.iter().map(|p| Pattern::new(p)).collect()
}

/// Lazy, order-preserving, deduplicating sequence of candidate files.
#[derive(Debug)]
pub struct Enumerator<I> {
    inner: I,
    seen: HashSet<PathBuf>,
    excludes: Vec<Pattern>,
}

impl<I> Enumerator<I>
where
    I: Iterator<Item = PathBuf>,
{
    pub fn new(paths: impl IntoIterator<IntoIter = I>, excludes: Vec<Pattern>) -> Self {
        Self {
            inner: paths.into_iter(),
            seen: HashSet::new(),
            excludes,
        }
    }

    fn is_excluded(&self, path: &std::path::Path) -> bool {
        self.excludes.iter().any(|pattern| {
            pattern.matches_path(path)
                || path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| pattern.matches(name))
        })
    }
}

impl<I> Iterator for Enumerator<I>
where
    I: Iterator<Item = PathBuf>,
{
    type Item = Result<PathBuf, FileError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.inner.next()?;
            if !self.seen.insert(path.clone()) {
                continue;
            }
            if self.is_excluded(&path) {
                log::debug!("excluded {}", path.display());
                continue;
            }
            return Some(check_file(path));
        }
    }
}

/// Confirms `path` names an existing regular file.
fn check_file(path: PathBuf) -> Result<PathBuf, FileError> {
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(FileError::NotAFile { path }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(FileError::NotFound { path }),
        Err(source) => Err(FileError::Read { path, source }),
    }
}

/// Builds the enumerator for a run.
///
/// Uses `paths` when non-empty, otherwise reads the list from `stdin`. A
/// failure to read `stdin` is returned as an error; per-file problems are
/// yielded by the enumerator instead.
pub fn collect_files(
    paths: Vec<PathBuf>,
    stdin: impl BufRead,
    excludes: Vec<Pattern>,
) -> io::Result<Enumerator<std::vec::IntoIter<PathBuf>>> {
    let paths = if paths.is_empty() {
        read_path_list(stdin)?
    } else {
        paths
    };
    Ok(Enumerator::new(paths, excludes))
}
