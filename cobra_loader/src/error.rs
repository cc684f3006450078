use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the loader crate.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors produced while turning schema inputs into descriptors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML schema '{path}': {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to parse JSON schema '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Binary input that is not a valid descriptor set or plugin request.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },

    #[error("unsupported schema file extension for '{0}' (expected .yaml, .yml, .json, .pb or .desc)")]
    UnsupportedFormat(PathBuf),

    #[error("import '{import}' not found relative to '{base}' or in include directories")]
    ImportNotFound { import: String, base: PathBuf },

    /// Two inputs declare the same `.proto` file name with different contents.
    #[error("descriptor for '{0}' was loaded twice with different contents")]
    ConflictingFile(String),
}
