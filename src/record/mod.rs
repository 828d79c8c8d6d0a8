//! Record Module
//!
//! The student record and its one-line text encoding.
//!
//! ## Line Format
//! ```text
//! ┌──────┬────────┬─────────┬─────────┬─────┬─────────┐
//! │  id  │  name  │  count  │ score_1 │ ... │ score_n │
//! └──────┴────────┴─────────┴─────────┴─────┴─────────┘
//!   space separated, scores with two decimals, '\n' terminated
//!
//!   1 Jean 2 12.50 15.75
//! ```
//!
//! Names carry no quoting, so the model never stores whitespace in them.

mod codec;
mod student;

pub use codec::{decode_line, encode_line};
pub use student::Student;
