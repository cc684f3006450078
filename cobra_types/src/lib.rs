//! Descriptor Type Definitions
//!
//! This crate contains the descriptor data model consumed by the cobra
//! command generator: files, messages, fields, services and methods.
//! It provides pure data structures without any file I/O or code
//! generation logic.

pub mod names;
pub mod types;

// Re-export commonly used types at the crate root
pub use names::*;
pub use types::*;
