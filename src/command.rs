//! Command definitions
//!
//! Requests the front-ends send to the engine, and what comes back.

use crate::record::Student;

/// A request against the data file
#[derive(Debug, Clone)]
pub enum Command {
    /// Append a new record
    Create(Student),

    /// Look up the first record with an id
    Read { id: i64 },

    /// Replace every record sharing the student's id
    Update(Student),

    /// Remove every record with an id
    Delete { id: i64 },

    /// Return all records in file order
    List,
}

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created,
    Found(Student),
    Updated,
    Deleted,
    Listed(Vec<Student>),

    /// No record carries the requested id
    NotFound,
}

impl Command {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Create(_) => "create",
            Command::Read { .. } => "read",
            Command::Update(_) => "update",
            Command::Delete { .. } => "delete",
            Command::List => "list",
        }
    }
}
