/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use cobra_gen::GeneratorConfig;
use cobra_loader::SchemaLoader;
use cobra_loader::cobra_types::FileDescriptor;
use std::path::{Path, PathBuf};
use tracing::info;

/* Load schema files with their imports.
 *
 * Returns every loaded descriptor plus the proto file names that should
 * produce output. */
pub fn load_schemas(
  files: &[PathBuf],
  include_dirs: Vec<PathBuf>,
) -> anyhow::Result<(Vec<FileDescriptor>, Vec<String>)> {
  let mut loader = SchemaLoader::new(include_dirs);
  for file in files {
    loader
      .load_file(file)
      .with_context(|| format!("failed to load schema '{}'", file.display()))?;
  }

  info!(
    schemas = loader.loaded_file_count(),
    descriptors = loader.files().len(),
    targets = loader.targets().len(),
    "schemas loaded"
  );
  Ok(loader.into_parts())
}

/* Generator config from an optional YAML file; defaults otherwise */
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GeneratorConfig> {
  match path {
    Some(path) => Ok(GeneratorConfig::load(path)?),
    None => Ok(GeneratorConfig::default()),
  }
}
