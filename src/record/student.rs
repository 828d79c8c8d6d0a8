//! Student record
//!
//! In-memory form of one line of the data file.

use std::fmt;

use crate::config::RecordLimits;

/// Placeholder stored when a name is empty after normalisation
const EMPTY_NAME: &str = "_";

/// One student: id, name and a bounded list of scores
///
/// Instances are transient. The data file is the only durable copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: i64,
    name: String,
    scores: Vec<f64>,
    limits: RecordLimits,
}

impl Student {
    /// Create a student with no scores
    ///
    /// The name is normalised to a single token and truncated to
    /// `limits.name_capacity()` characters.
    pub fn new(id: i64, name: &str, limits: RecordLimits) -> Self {
        Self {
            id,
            name: normalize_name(name, limits.name_capacity()),
            scores: Vec::with_capacity(limits.max_scores.min(RecordLimits::DEFAULT_MAX_SCORES)),
            limits,
        }
    }

    /// Append a score if there is room
    ///
    /// Returns `false` (and logs a warning) when the record is already full.
    pub fn add_score(&mut self, score: f64) -> bool {
        if self.is_full() {
            tracing::warn!(
                id = self.id,
                max_scores = self.limits.max_scores,
                "Cannot add score, record is full"
            );
            return false;
        }
        self.scores.push(score);
        true
    }

    /// Replace the name, with the same normalisation as `new`
    pub fn rename(&mut self, name: &str) {
        self.name = normalize_name(name, self.limits.name_capacity());
    }

    /// Arithmetic mean of the scores, 0.0 when there are none
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn limits(&self) -> RecordLimits {
        self.limits
    }

    pub fn is_full(&self) -> bool {
        self.scores.len() >= self.limits.max_scores
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {} | Name: {}", self.id, self.name)?;
        write!(f, "Scores:")?;
        for score in &self.scores {
            write!(f, " {:.2}", score)?;
        }
        writeln!(f)?;
        writeln!(f, "Average: {:.2}", round_cents(self.average()))?;
        write!(f, "--------------------")
    }
}

/// Round half away from zero to two decimals (`{:.2}` alone rounds ties to even)
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Collapse whitespace runs to `_`, trim the ends and cut to `capacity` chars
fn normalize_name(raw: &str, capacity: usize) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(capacity).collect();

    if truncated.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        truncated
    }
}
