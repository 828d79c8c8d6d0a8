//! Configuration for Gradebook
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{GradebookError, Result};

/// Main configuration for a Gradebook instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Flat file holding one record per line.
    /// Update/delete write a temp file next to it, so its directory must be writable.
    pub data_file: PathBuf,

    /// Whether rewrites and appends are fsynced before returning
    pub sync_mode: SyncMode,

    /// What a rewrite does with lines that fail to decode
    pub malformed_lines: MalformedLines,

    // -------------------------------------------------------------------------
    // Record Configuration
    // -------------------------------------------------------------------------
    /// Capacity bounds applied to every record built or decoded
    pub limits: RecordLimits,
}

/// Capacity bounds for a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLimits {
    /// Name buffer size; stored names hold at most `max_name_len - 1` characters
    pub max_name_len: usize,

    /// Maximum number of scores per record
    pub max_scores: usize,
}

impl RecordLimits {
    pub const DEFAULT_MAX_NAME_LEN: usize = 50;
    pub const DEFAULT_MAX_SCORES: usize = 20;

    pub fn new(max_name_len: usize, max_scores: usize) -> Self {
        Self {
            max_name_len,
            max_scores,
        }
    }

    /// Longest name (in characters) a record may hold
    pub fn name_capacity(&self) -> usize {
        self.max_name_len.saturating_sub(1)
    }
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_NAME_LEN, Self::DEFAULT_MAX_SCORES)
    }
}

/// Durability of writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Leave flushing to the OS (fastest, a crash may lose the last write)
    Never,

    /// fsync appends and the rewritten temp file before it replaces the original
    Always,
}

/// Handling of undecodable lines during update/delete rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedLines {
    /// Copy the line into the rewritten file untouched
    Preserve,

    /// Omit the line from the rewritten file
    Drop,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("etudiants.txt"),
            sync_mode: SyncMode::Always,
            malformed_lines: MalformedLines::Preserve,
            limits: RecordLimits::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject limits no record could satisfy
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_name_len < 2 {
            return Err(GradebookError::Config(format!(
                "max_name_len must be at least 2, got {}",
                self.limits.max_name_len
            )));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(GradebookError::Config("data_file must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the sync mode
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    /// Set the malformed line policy for rewrites
    pub fn malformed_lines(mut self, policy: MalformedLines) -> Self {
        self.config.malformed_lines = policy;
        self
    }

    /// Set the name buffer size (names keep `len - 1` characters)
    pub fn max_name_len(mut self, len: usize) -> Self {
        self.config.limits.max_name_len = len;
        self
    }

    /// Set the maximum score count per record
    pub fn max_scores(mut self, count: usize) -> Self {
        self.config.limits.max_scores = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
