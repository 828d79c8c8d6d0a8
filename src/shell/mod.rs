//! Shell Module
//!
//! Interactive numbered-menu front-end.
//!
//! ## Responsibilities
//! - Prompt for menu choices and record fields
//! - Re-prompt on invalid choices and unparseable numbers
//! - Translate engine outcomes into messages
//!
//! The shell is generic over its input and output so it can be driven by
//! stdin/stdout or by in-memory buffers.

mod prompt;
mod session;

pub use prompt::Prompter;
pub use session::{MenuChoice, Shell};
