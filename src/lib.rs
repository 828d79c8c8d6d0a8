//! # Gradebook
//!
//! A student record manager persisted in a flat text file:
//! - One record per line: id, name, score count, scores
//! - Linear-scan lookups, no index
//! - Update/delete rewrite the whole file and atomically swap it in
//! - Record capacity limits supplied by configuration
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │   Interactive Shell  │     │     One-shot CLI     │
//! │   (numbered menu)    │     │   (clap subcommands) │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            │        Command / Outcome   │
//!            └─────────────┬──────────────┘
//!                          ▼
//!                ┌───────────────────┐
//!                │      Engine       │
//!                └─────────┬─────────┘
//!                          ▼
//!                ┌───────────────────┐      ┌──────────────┐
//!                │  FlatFileStore    │─────►│ Record codec │
//!                │ scan / rewrite    │      └──────────────┘
//!                └─────────┬─────────┘
//!                          ▼
//!                    etudiants.txt
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod command;
pub mod engine;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GradebookError, Result};
pub use config::{Config, RecordLimits};
pub use engine::Engine;
pub use record::Student;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Gradebook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
