//! Engine Module
//!
//! Entry point shared by the shell and the CLI.
//!
//! ## Responsibilities
//! - Validate configuration and prepare the data directory
//! - Route commands to the flat file store
//! - Build records with the configured limits

use std::fs;
use std::path::Path;

use crate::command::{Command, Outcome};
use crate::config::Config;
use crate::error::Result;
use crate::record::Student;
use crate::storage::FlatFileStore;

/// Owns the configuration and the store
///
/// Single-threaded: every call runs to completion before returning.
pub struct Engine {
    config: Config,
    store: FlatFileStore,
}

impl Engine {
    /// Validate `config` and open the engine
    ///
    /// Creates the data file's directory if missing; the file itself is
    /// created on first insert.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(dir) = config.data_file.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let store = FlatFileStore::from_config(&config);
        tracing::debug!(
            path = %config.data_file.display(),
            max_name_len = config.limits.max_name_len,
            max_scores = config.limits.max_scores,
            "Engine opened"
        );

        Ok(Self { config, store })
    }

    /// Open with a data file path (convenience method)
    ///
    /// Uses default config with the specified data file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_file(path).build())
    }

    /// Execute a command
    ///
    /// Routes commands to the store; an absent id is `Outcome::NotFound`.
    pub fn execute(&self, command: Command) -> Result<Outcome> {
        tracing::debug!(command = command.name(), "Executing command");

        match command {
            Command::Create(student) => {
                self.store.create(&student)?;
                Ok(Outcome::Created)
            }
            Command::Read { id } => Ok(self
                .store
                .read(id)?
                .map_or(Outcome::NotFound, Outcome::Found)),
            Command::Update(student) => Ok(if self.store.update(&student)? {
                Outcome::Updated
            } else {
                Outcome::NotFound
            }),
            Command::Delete { id } => Ok(if self.store.delete(id)? {
                Outcome::Deleted
            } else {
                Outcome::NotFound
            }),
            Command::List => Ok(Outcome::Listed(self.store.list()?)),
        }
    }

    /// A fresh record using the configured limits
    pub fn new_student(&self, id: i64, name: &str) -> Student {
        Student::new(id, name, self.config.limits)
    }

    pub fn store(&self) -> &FlatFileStore {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }
}
