//! Descriptor Loading
//!
//! This crate turns schema inputs into the descriptor model used by the
//! generator: protoc plugin requests, binary `FileDescriptorSet`s written by
//! `protoc -o`, and hand-written YAML/JSON schema files with path imports.

pub mod descriptor;
pub mod error;
pub mod file;
pub mod loader;
pub mod request;

// Re-export commonly used types at the crate root
pub use descriptor::convert_file;
pub use error::{LoadError, LoadResult};
pub use file::SchemaFile;
pub use loader::{SchemaFormat, SchemaLoader, decode_descriptor_set, root_file_names};
pub use request::PluginRequest;

// Re-export cobra_types for convenience
pub use cobra_types;
