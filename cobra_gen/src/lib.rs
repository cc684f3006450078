//! Generator for cobra command-line gRPC clients.
//!
//! Reads protobuf service descriptors and emits, per proto file, one Go
//! source file with a cobra command per service and a subcommand per method.
//! Each subcommand accepts its request from stdin, a file, or one flag per
//! scalar request field.

pub mod codegen;
pub mod config;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use codegen::{FileOutcome, GeneratedFile, ImportMap, build_file, generate_file, generate_files};
pub use config::{GeneratorConfig, PathsMode};
pub use error::{ConfigError, GenError, GenResult};
pub use resolve::{PassContext, Resolution, TypeCache};
