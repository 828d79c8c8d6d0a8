//! Atomic Rewrite
//!
//! Rebuilds the data file through a same-directory temp file.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::config::{MalformedLines, RecordLimits, SyncMode};
use crate::error::Result;
use crate::record::{encode_line, Student};

use super::{RecordScanner, ScannedLine};

/// What a rewrite does with one decoded record
#[derive(Debug)]
pub enum RecordAction {
    /// Copy the record through unchanged
    Keep(Student),

    /// Write this record in place of the scanned one
    Replace(Student),

    /// Leave the record out of the new file
    Remove,
}

/// Counts from one completed rewrite
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteSummary {
    pub kept: usize,
    pub replaced: usize,
    pub removed: usize,
    pub malformed: usize,
}

/// Options shared by every rewrite of one store
#[derive(Debug, Clone, Copy)]
pub(super) struct RewriteOptions {
    pub limits: RecordLimits,
    pub sync_mode: SyncMode,
    pub malformed_lines: MalformedLines,
}

/// Scan `path`, pass each record through `edit`, and atomically replace the file
///
/// Returns `Ok(None)` without creating anything when `path` does not exist.
/// On any error the temp file is removed and `path` is left as it was.
pub(super) fn rewrite<F>(
    path: &Path,
    options: RewriteOptions,
    mut edit: F,
) -> Result<Option<RewriteSummary>>
where
    F: FnMut(Student) -> RecordAction,
{
    let source = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let permissions = source.metadata()?.permissions();

    let dir = parent_dir(path);
    let mut temp = NamedTempFile::new_in(dir)?;
    let mut summary = RewriteSummary::default();

    {
        let mut writer = BufWriter::new(temp.as_file_mut());

        // The scanner owns the source handle; it is closed when the loop ends.
        for scanned in RecordScanner::new(BufReader::new(source), options.limits) {
            match scanned? {
                ScannedLine::Record(student) => {
                    let out = match edit(student) {
                        RecordAction::Keep(student) => {
                            summary.kept += 1;
                            student
                        }
                        RecordAction::Replace(student) => {
                            summary.replaced += 1;
                            student
                        }
                        RecordAction::Remove => {
                            summary.removed += 1;
                            continue;
                        }
                    };
                    writeln!(writer, "{}", encode_line(&out))?;
                }
                ScannedLine::Malformed { raw, .. } => {
                    summary.malformed += 1;
                    if options.malformed_lines == MalformedLines::Preserve {
                        writer.write_all(&raw)?;
                        writer.write_all(b"\n")?;
                    }
                }
            }
        }

        writer.flush()?;
    }

    fs::set_permissions(temp.path(), permissions)?;
    if options.sync_mode == SyncMode::Always {
        temp.as_file().sync_all()?;
    }

    temp.persist(path)?;

    // The rename has committed: a failed directory sync is logged, not returned
    if options.sync_mode == SyncMode::Always {
        if let Err(e) = sync_dir(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Directory sync after rewrite failed");
        }
    }

    tracing::debug!(
        path = %path.display(),
        kept = summary.kept,
        replaced = summary.replaced,
        removed = summary.removed,
        malformed = summary.malformed,
        "Rewrote data file"
    );

    Ok(Some(summary))
}

/// Directory holding `path` ("." for a bare file name)
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Make the rename itself durable
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
