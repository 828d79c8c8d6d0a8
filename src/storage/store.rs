//! Flat File Store
//!
//! CRUD operations over a single data file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, MalformedLines, RecordLimits, SyncMode};
use crate::error::Result;
use crate::record::{encode_line, Student};

use super::rewrite::{rewrite, RewriteOptions};
use super::{RecordAction, RecordScanner, ScannedLine};

/// A data file of student records
///
/// ## Matching
/// - `read` returns the first record with the id, in file order
/// - `update` replaces and `delete` removes *every* record with the id
/// - ids are never checked for uniqueness
///
/// Nothing guards against two processes using the same file at once.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    path: PathBuf,
    options: RewriteOptions,
}

impl FlatFileStore {
    /// Create a store over `path`; the file itself is created by the first `create`
    pub fn new(
        path: impl Into<PathBuf>,
        limits: RecordLimits,
        sync_mode: SyncMode,
        malformed_lines: MalformedLines,
    ) -> Self {
        Self {
            path: path.into(),
            options: RewriteOptions {
                limits,
                sync_mode,
                malformed_lines,
            },
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.data_file.clone(),
            config.limits,
            config.sync_mode,
            config.malformed_lines,
        )
    }

    /// Append a record as a new line
    ///
    /// Creates the file if needed. Duplicate ids are not checked.
    pub fn create(&self, student: &Student) -> Result<()> {
        let mut line = String::new();
        // Keep a hand-edited file without a final newline from gluing lines together
        if !ends_with_newline(&self.path) {
            line.push('\n');
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        line.push_str(&encode_line(student));
        line.push('\n');

        file.write_all(line.as_bytes())?;
        if self.options.sync_mode == SyncMode::Always {
            file.sync_all()?;
        }

        tracing::debug!(path = %self.path.display(), id = student.id(), "Created record");
        Ok(())
    }

    /// Find the first record with `id`
    ///
    /// A missing data file is simply "not found".
    pub fn read(&self, id: i64) -> Result<Option<Student>> {
        let Some(scanner) = self.scanner()? else {
            return Ok(None);
        };

        for scanned in scanner {
            if let ScannedLine::Record(student) = scanned? {
                if student.id() == id {
                    tracing::debug!(path = %self.path.display(), id, "Read record");
                    return Ok(Some(student));
                }
            }
        }

        tracing::debug!(path = %self.path.display(), id, "Record not found");
        Ok(None)
    }

    /// Replace every record whose id matches `student.id()` with `student`
    ///
    /// This is whole-record replacement. Returns whether any record matched;
    /// the file is rewritten either way, but never created.
    pub fn update(&self, student: &Student) -> Result<bool> {
        let summary = rewrite(&self.path, self.options, |current| {
            if current.id() == student.id() {
                RecordAction::Replace(student.clone())
            } else {
                RecordAction::Keep(current)
            }
        })?;

        let found = summary.map_or(false, |s| s.replaced > 0);
        tracing::debug!(path = %self.path.display(), id = student.id(), found, "Update finished");
        Ok(found)
    }

    /// Remove every record with `id`, keeping the order of the rest
    ///
    /// Returns whether any record matched.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let summary = rewrite(&self.path, self.options, |current| {
            if current.id() == id {
                RecordAction::Remove
            } else {
                RecordAction::Keep(current)
            }
        })?;

        let found = summary.map_or(false, |s| s.removed > 0);
        tracing::debug!(path = %self.path.display(), id, found, "Delete finished");
        Ok(found)
    }

    /// Every decodable record, in file order
    pub fn list(&self) -> Result<Vec<Student>> {
        let Some(scanner) = self.scanner()? else {
            return Ok(Vec::new());
        };

        let mut students = Vec::new();
        for scanned in scanner {
            if let ScannedLine::Record(student) = scanned? {
                students.push(student);
            }
        }
        Ok(students)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limits(&self) -> RecordLimits {
        self.options.limits
    }

    /// Scanner over the data file, or `None` if it does not exist yet
    fn scanner(&self) -> Result<Option<RecordScanner<BufReader<File>>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(RecordScanner::new(
                BufReader::new(file),
                self.options.limits,
            ))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// False only when `path` can be read and its last byte is not '\n'
///
/// A missing, empty or unreadable file counts as ending with a newline,
/// so appending never depends on read access.
fn ends_with_newline(path: &Path) -> bool {
    let last_byte = || -> io::Result<Option<u8>> {
        let mut file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(None);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(Some(last[0]))
    };

    match last_byte() {
        Ok(Some(byte)) => byte == b'\n',
        Ok(None) => true,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot inspect data file tail");
            }
            true
        }
    }
}
