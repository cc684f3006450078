use cobra_types::FileDescriptor;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;

/// Where generated files are placed, mirroring protoc-gen-go's `paths=`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathsMode {
    /// Under the Go import path of the file's `go_package`.
    #[default]
    Import,
    /// Next to the `.proto` file, relative to the include root.
    SourceRelative,
}

/// Generator options, from plugin parameters or a YAML config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneratorConfig {
    pub paths: PathsMode,
    /// Prefix joined onto every Go import path.
    pub import_prefix: String,
    /// Go import path overrides per proto file (`Mfoo.proto=example.com/foo`).
    pub import_overrides: BTreeMap<String, String>,
    /// Default for the generated `--server-addr` flag.
    pub server_addr: String,
    /// Default for the generated `--response-format` flag.
    pub response_format: String,
    /// Default for the generated `--timeout` flag, in seconds.
    pub timeout_secs: u64,
    /// Default for the generated `--auth-token-type` flag.
    pub auth_token_type: String,
    /// Help text attached to every field flag.
    pub help_text: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            paths: PathsMode::Import,
            import_prefix: String::new(),
            import_overrides: BTreeMap::new(),
            server_addr: "localhost:8080".to_string(),
            response_format: "json".to_string(),
            timeout_secs: 10,
            auth_token_type: "Bearer".to_string(),
            help_text: "get-comment-from-proto".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parses protoc's `--cobra_out=<parameter>:<dir>` parameter string.
    ///
    /// Accepts comma separated `key=value` pairs; keys starting with `M` map a
    /// proto file to a Go import path.
    pub fn from_parameter(parameter: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));

            if let Some(proto_file) = key.strip_prefix('M') {
                config
                    .import_overrides
                    .insert(proto_file.to_string(), value.to_string());
                continue;
            }

            match key {
                "plugins" => {
                    if !value.split('+').any(|plugin| plugin == "client") {
                        warn!(plugins = value, "only the 'client' plugin is available");
                    }
                }
                "paths" => {
                    config.paths = match value {
                        "import" => PathsMode::Import,
                        "source_relative" => PathsMode::SourceRelative,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "import_prefix" => config.import_prefix = value.to_string(),
                "server_addr" => config.server_addr = value.to_string(),
                "response_format" => config.response_format = value.to_string(),
                "timeout" => {
                    let secs = value.strip_suffix('s').unwrap_or(value);
                    config.timeout_secs = secs.parse().map_err(|_| invalid(key, value))?;
                }
                "auth_token_type" => config.auth_token_type = value.to_string(),
                "help" => config.help_text = value.to_string(),
                _ => return Err(ConfigError::UnknownParameter(key.to_string())),
            }
        }

        Ok(config)
    }

    /// Loads a YAML config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    /// Go import path for a proto file, honouring `M` overrides.
    pub fn go_import_path(&self, file: &FileDescriptor) -> Option<String> {
        self.import_overrides
            .get(&file.name)
            .cloned()
            .or_else(|| file.go_import_path())
    }

    /// Joins `import_prefix` onto an import path.
    pub fn prefixed_import(&self, path: &str) -> String {
        if self.import_prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.import_prefix.trim_end_matches('/'), path)
        }
    }

    /// Name of the generated file for `file`: `<stem>.cobra.pb.go`.
    pub fn output_name(&self, file: &FileDescriptor) -> String {
        let stem = file.name.strip_suffix(".proto").unwrap_or(&file.name);
        match (self.paths, self.go_import_path(file)) {
            (PathsMode::Import, Some(import_path)) => {
                let base = stem.rsplit('/').next().unwrap_or(stem);
                format!("{import_path}/{base}.cobra.pb.go")
            }
            _ => format!("{stem}.cobra.pb.go"),
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
