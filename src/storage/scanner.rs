//! Record Scanner
//!
//! Sequential line-by-line decoding of a data file.

use std::io::BufRead;

use crate::config::RecordLimits;
use crate::error::{GradebookError, Result};
use crate::record::{decode_line, Student};

/// One non-blank line of the data file
#[derive(Debug, Clone, PartialEq)]
pub enum ScannedLine {
    /// A line that decoded into a record
    Record(Student),

    /// A line that did not decode, kept byte-for-byte (without its newline)
    Malformed {
        line_no: usize,
        raw: Vec<u8>,
        reason: String,
    },
}

/// Iterator over the lines of a data file
///
/// Blank and whitespace-only lines are skipped. Each malformed line is
/// reported once with a warning and yielded as `ScannedLine::Malformed`.
pub struct RecordScanner<R> {
    reader: R,
    limits: RecordLimits,
    line_no: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> RecordScanner<R> {
    pub fn new(reader: R, limits: RecordLimits) -> Self {
        Self {
            reader,
            limits,
            line_no: 0,
            buf: Vec::new(),
        }
    }

    /// Read the next raw line into `buf`, stripped of its line ending
    ///
    /// Returns `false` at end of input.
    fn read_raw_line(&mut self) -> Result<bool> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line_no += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }

    fn decode_current(&self) -> Result<ScannedLine> {
        let decoded = std::str::from_utf8(&self.buf)
            .map_err(|_| GradebookError::MalformedRecord("line is not valid UTF-8".to_string()))
            .and_then(|line| decode_line(line, self.limits));

        match decoded {
            Ok(student) => Ok(ScannedLine::Record(student)),
            Err(GradebookError::MalformedRecord(reason)) => {
                tracing::warn!(line = self.line_no, %reason, "Skipping malformed record line");
                Ok(ScannedLine::Malformed {
                    line_no: self.line_no,
                    raw: self.buf.clone(),
                    reason,
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl<R: BufRead> Iterator for RecordScanner<R> {
    type Item = Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_raw_line() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }

            if self.buf.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return Some(self.decode_current());
        }
    }
}
