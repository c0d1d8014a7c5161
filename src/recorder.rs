//! Applying the line fixer to files and recording what changed.
//!
//! The [`DiffRecorder`] owns the run's [`FileRecord`]s for changed files
//! (the change set) and the per-file errors. Files whose content would not
//! change are never written, so their modification times are left alone.

use crate::error::FileError;
use crate::replacements::ReplacementMap;
use crate::rewriter::{fix_raw_line, split_lines};
use std::path::{Path, PathBuf};

/// Whether detected changes are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rewrite changed files in place.
    #[default]
    Fix,
    /// Report would-be changes without writing.
    Check,
}

/// One file's original and corrected lines, terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original: Vec<String>,
    pub fixed: Vec<String>,
    /// Set when fix mode could not save the corrected content.
    pub write_failed: bool,
}

impl FileRecord {
    /// True iff some line differs at the same index.
    pub fn changed(&self) -> bool {
        self.original
            .iter()
            .zip(&self.fixed)
            .any(|(before, after)| before != after)
    }

    /// 1-indexed numbers of the lines that differ.
    pub fn changed_lines(&self) -> Vec<usize> {
        self.original
            .iter()
            .zip(&self.fixed)
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn original_text(&self) -> String {
        self.original.concat()
    }

    pub fn fixed_text(&self) -> String {
        self.fixed.concat()
    }
}

/// Accumulates change records and errors across a run.
#[derive(Debug, Default)]
pub struct DiffRecorder {
    mode: Mode,
    changes: Vec<FileRecord>,
    errors: Vec<FileError>,
    files_checked: usize,
}

impl DiffRecorder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Reads `path`, fixes every line and records the file if it changed.
    ///
    /// In fix mode a changed file is rewritten; a failed write is recorded
    /// as an error and the record is kept with `write_failed` set. Read and
    /// decode failures are recorded as errors and the file is skipped.
    pub fn run_line_fixer(&mut self, map: &ReplacementMap, path: &Path) {
        match self.fix_file(map, path) {
            Ok(Some(record)) => self.changes.push(record),
            Ok(None) => {}
            Err(err) => self.record_error(err),
        }
    }

    fn fix_file(
        &mut self,
        map: &ReplacementMap,
        path: &Path,
    ) -> Result<Option<FileRecord>, FileError> {
        let bytes = std::fs::read(path).map_err(|source| read_error(path, source))?;
        let content = std::str::from_utf8(&bytes).map_err(|source| FileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        self.files_checked += 1;

        let original: Vec<String> = split_lines(content)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let fixed: Vec<String> = original.iter().map(|line| fix_raw_line(line, map)).collect();

        let mut record = FileRecord {
            path: path.to_path_buf(),
            original,
            fixed,
            write_failed: false,
        };
        if !record.changed() {
            log::debug!("unchanged {}", path.display());
            return Ok(None);
        }

        match self.mode {
            Mode::Check => log::debug!("needs changes {}", path.display()),
            Mode::Fix => {
                if let Err(source) = std::fs::write(path, record.fixed_text()) {
                    record.write_failed = true;
                    self.errors.push(FileError::Write {
                        path: path.to_path_buf(),
                        source,
                    });
                } else {
                    log::debug!("fixed {}", path.display());
                }
            }
        }
        Ok(Some(record))
    }

    /// Records an error that occurred outside `run_line_fixer`, such as a
    /// missing input path.
    pub fn record_error(&mut self, err: FileError) {
        log::debug!("{err}");
        self.errors.push(err);
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The change set, in processing order.
    pub fn changes(&self) -> &[FileRecord] {
        &self.changes
    }

    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    /// Files that were read and decoded successfully.
    pub fn files_checked(&self) -> usize {
        self.files_checked
    }

    /// No file needed changes and no file failed.
    pub fn is_success(&self) -> bool {
        self.changes.is_empty() && self.errors.is_empty()
    }
}

/// Runs the fixer over every enumerated file.
///
/// Enumeration errors are recorded alongside read and write errors, and
/// never stop the remaining files from being processed.
pub fn record_all<I>(map: &ReplacementMap, files: I, mode: Mode) -> DiffRecorder
where
    I: IntoIterator<Item = Result<PathBuf, FileError>>,
{
    let mut recorder = DiffRecorder::new(mode);
    for file in files {
        match file {
            Ok(path) => recorder.run_line_fixer(map, &path),
            Err(err) => recorder.record_error(err),
        }
    }
    recorder
}

fn read_error(path: &Path, source: std::io::Error) -> FileError {
    if source.kind() == std::io::ErrorKind::NotFound {
        FileError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        FileError::Read {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn quotes() -> ReplacementMap {
        ReplacementMap::from_pairs([('\u{2019}', '\''), ('\u{2013}', '-')]).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Backdates the mtime so a rewrite would be observable.
    fn backdate(path: &Path) -> SystemTime {
        let old = SystemTime::now() - Duration::from_secs(3600);
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(old).unwrap();
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn record_changed_compares_by_index() {
        let record = FileRecord {
            path: PathBuf::from("a"),
            original: vec!["x\n".into(), "y\u{2019}\n".into()],
            fixed: vec!["x\n".into(), "y'\n".into()],
            write_failed: false,
        };
        assert!(record.changed());
        assert_eq!(record.changed_lines(), vec![2]);

        let same = FileRecord {
            fixed: record.original.clone(),
            ..record
        };
        assert!(!same.changed());
    }

    #[test]
    fn fix_mode_rewrites_only_the_matching_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "notes.txt", "one\ntwo \u{2013} three\nfour\n".as_bytes());

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo - three\nfour\n");
        assert!(recorder.has_changes());
        assert_eq!(recorder.changes().len(), 1);
        assert_eq!(recorder.changes()[0].changed_lines(), vec![2]);
        assert!(recorder.errors().is_empty());
        assert!(!recorder.is_success());
    }

    #[test]
    fn check_mode_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let content = "it\u{2019}s\n".as_bytes();
        let path = write(dir.path(), "a.md", content);

        let mut recorder = DiffRecorder::new(Mode::Check);
        recorder.run_line_fixer(&quotes(), &path);

        assert_eq!(std::fs::read(&path).unwrap(), content);
        assert_eq!(recorder.changes().len(), 1);
        assert_eq!(recorder.changes()[0].fixed_text(), "it's\n");
    }

    #[test]
    fn unchanged_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let content = b"plain\r\ntext without matches";
        let path = write(dir.path(), "plain.txt", content);
        let before = backdate(&path);

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);

        assert!(recorder.is_success());
        assert_eq!(recorder.files_checked(), 1);
        assert_eq!(std::fs::read(&path).unwrap(), content);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn preserves_crlf_and_missing_final_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "win.txt",
            "a\u{2019}\r\nb\r\nc\u{2013}".as_bytes(),
        );

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);

        assert_eq!(std::fs::read(&path).unwrap(), b"a'\r\nb\r\nc-");
    }

    #[test]
    fn preserves_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bom.txt", "\u{feff}x\u{2013}y\n".as_bytes());

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\u{feff}x-y\n");
    }

    #[test]
    fn all_matching_file_reaches_fixed_point_in_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "dashes.txt", "\u{2013}\u{2013}\n\u{2019}".as_bytes());
        let map = quotes();

        let mut first = DiffRecorder::new(Mode::Fix);
        first.run_line_fixer(&map, &path);
        assert!(first.has_changes());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "--\n'");

        let mut second = DiffRecorder::new(Mode::Fix);
        second.run_line_fixer(&map, &path);
        assert!(second.is_success());
    }

    #[test]
    fn invalid_utf8_is_a_decode_error_and_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let content = b"caf\xe9 \xe2\x80\x93\n";
        let path = write(dir.path(), "latin1.txt", content);

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);

        assert!(!recorder.has_changes());
        assert!(matches!(recorder.errors(), [FileError::Decode { .. }]));
        assert_eq!(recorder.files_checked(), 0);
        assert_eq!(std::fs::read(&path).unwrap(), content);
    }

    #[test]
    fn missing_file_is_recorded_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &dir.path().join("gone.txt"));
        assert!(matches!(recorder.errors(), [FileError::NotFound { .. }]));
        assert!(!recorder.is_success());
    }

    #[test]
    fn empty_file_has_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty.txt", b"");
        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&quotes(), &path);
        assert!(recorder.is_success());
    }

    // procfs files read fine but reject writes, even for root.
    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_keeps_record_and_reports_error() {
        let path = Path::new("/proc/version");
        let map = ReplacementMap::from_pairs([('L', 'l')]).unwrap();

        let mut recorder = DiffRecorder::new(Mode::Fix);
        recorder.run_line_fixer(&map, path);

        assert_eq!(recorder.changes().len(), 1);
        assert!(recorder.changes()[0].write_failed);
        assert!(matches!(recorder.errors(), [FileError::Write { .. }]));
        assert_eq!(recorder.errors()[0].path(), path);
        assert!(!recorder.is_success());
        assert!(std::fs::read_to_string(path).unwrap().contains("Linux"));
    }

    #[test]
    fn record_all_continues_past_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let dirty = write(dir.path(), "dirty.txt", "a\u{2013}b\n".as_bytes());
        let clean = write(dir.path(), "clean.txt", b"ab\n");
        let missing = dir.path().join("missing.txt");
        let files = crate::scanner::Enumerator::new(
            vec![missing.clone(), dirty.clone(), clean.clone()],
            vec![],
        );

        let recorder = record_all(&quotes(), files, Mode::Check);

        assert_eq!(recorder.files_checked(), 2);
        assert_eq!(recorder.changes().len(), 1);
        assert_eq!(recorder.changes()[0].path, dirty);
        assert_eq!(recorder.errors().len(), 1);
        assert_eq!(recorder.errors()[0].path(), missing.as_path());
        assert_eq!(std::fs::read(&dirty).unwrap(), "a\u{2013}b\n".as_bytes());
    }

    #[test]
    fn changes_keep_processing_order() {
        let dir = tempfile::tempdir().unwrap();
        let b = write(dir.path(), "b.txt", "\u{2013}".as_bytes());
        let a = write(dir.path(), "a.txt", "\u{2013}".as_bytes());
        let mut recorder = DiffRecorder::new(Mode::Check);
        for path in [&b, &a] {
            recorder.run_line_fixer(&quotes(), path);
        }
        let paths: Vec<_> = recorder.changes().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec![b, a]);
    }
}
