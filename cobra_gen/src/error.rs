use thiserror::Error;

/// Result alias used by the assembly and rendering stages.
pub type GenResult<T> = Result<T, GenError>;

/// Structural failures that abort generation of one file.
///
/// Per-field anomalies (unresolved types, repeated/map/enum fields, cycles)
/// never surface here; they degrade to a missing flag instead.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("{what} in '{parent}' has an empty name")]
    EmptyName { what: &'static str, parent: String },

    #[error("{what} name '{name}' is not a valid Go identifier")]
    InvalidIdentifier { what: &'static str, name: String },

    /// Two methods of one service map to the same cobra `Use` name.
    #[error("service '{service}' has more than one method named '{use_name}' (case-insensitive)")]
    DuplicateSubcommand { service: String, use_name: String },

    #[error("method '{service}.{method}' has no usable input type")]
    MissingInputType { service: String, method: String },

    #[error("no descriptor loaded for '{0}'")]
    UnknownFile(String),

    #[error("failed to render generated code: {0}")]
    Render(#[from] std::fmt::Error),
}

/// Errors raised while building a [`crate::config::GeneratorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown generator parameter '{0}'")]
    UnknownParameter(String),

    #[error("invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yml::Error,
    },
}
