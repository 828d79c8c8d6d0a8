//! Storage Module
//!
//! Flat-file persistence: one record per line, no index.
//!
//! ## Responsibilities
//! - Append new records (create)
//! - Linear scan for lookups (read, list)
//! - Rewrite-on-match for mutations (update, delete)
//!
//! ## Rewrite Protocol
//! ```text
//!   data file ──scan──► edit each record ──► temp file (same dir)
//!                                                 │ flush + fsync
//!                                                 ▼
//!                                   rename(temp, data file)   (atomic)
//! ```
//! The original is never removed before its replacement is complete, and the
//! source handle is closed before the rename. Any failure before the rename
//! deletes the temp file and leaves the data file untouched.
//!
//! Every mutation costs O(file size) time and temporary disk space.

mod rewrite;
mod scanner;
mod store;

pub use rewrite::{RecordAction, RewriteSummary};
pub use scanner::{RecordScanner, ScannedLine};
pub use store::FlatFileStore;
