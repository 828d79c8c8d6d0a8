//! Record codec
//!
//! Encoding and decoding of single record lines.

use std::fmt::Write as _;

use crate::config::RecordLimits;
use crate::error::{GradebookError, Result};

use super::Student;

/// Encode a student as one line, without the trailing newline
///
/// Format: `id name count score_1 ... score_count`
pub fn encode_line(student: &Student) -> String {
    let mut line = format!(
        "{} {} {}",
        student.id(),
        student.name(),
        student.scores().len()
    );
    for score in student.scores() {
        // Writing into a String cannot fail
        let _ = write!(line, " {:.2}", score);
    }
    line
}

/// Decode one line into a student
///
/// - A line holding fewer scores than its count keeps the scores present.
/// - Scores past `limits.max_scores` are dropped by `Student::add_score`.
/// - Missing or unparseable header fields, unparseable scores and tokens
///   after the declared scores are `MalformedRecord`.
pub fn decode_line(line: &str, limits: RecordLimits) -> Result<Student> {
    let mut fields = line.split_whitespace();

    let id: i64 = parse_field(fields.next(), "id")?;
    let name = fields
        .next()
        .ok_or_else(|| GradebookError::MalformedRecord("missing name".to_string()))?;
    let count: usize = parse_field(fields.next(), "count")?;

    let mut student = Student::new(id, name, limits);

    let mut read = 0;
    while read < count {
        let Some(token) = fields.next() else {
            tracing::warn!(
                id,
                declared = count,
                found = read,
                "Record line ends before its declared scores"
            );
            break;
        };
        let score: f64 = token.parse().map_err(|_| {
            GradebookError::MalformedRecord(format!("invalid score {:?}", token))
        })?;
        student.add_score(score);
        read += 1;
    }

    if let Some(extra) = fields.next() {
        return Err(GradebookError::MalformedRecord(format!(
            "unexpected token {:?} after {} scores",
            extra, count
        )));
    }

    Ok(student)
}

/// Parse a required header field
fn parse_field<T: std::str::FromStr>(token: Option<&str>, field: &str) -> Result<T> {
    let token =
        token.ok_or_else(|| GradebookError::MalformedRecord(format!("missing {}", field)))?;
    token
        .parse()
        .map_err(|_| GradebookError::MalformedRecord(format!("invalid {} {:?}", field, token)))
}
