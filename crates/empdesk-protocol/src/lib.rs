//! Empdesk protocol types
//!
//! Payloads exchanged with the employee REST backend.

pub mod types;

pub use types::*;
