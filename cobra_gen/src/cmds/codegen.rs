/* Codegen command - generate cobra clients from service descriptors */

use super::common::{load_config, load_schemas};
use cobra_gen::{PathsMode, generate_files};
use std::path::{Path, PathBuf};
use tracing::error;

/* Execute the codegen command */
pub fn run(
  files: Vec<PathBuf>,
  include_dirs: Vec<PathBuf>,
  output_dir: PathBuf,
  config_path: Option<PathBuf>,
  paths: Option<PathsMode>,
  verbose: bool,
) -> anyhow::Result<()> {
  let mut config = load_config(config_path.as_deref())?;
  if let Some(paths) = paths {
    config.paths = paths;
  }

  if verbose {
    println!("Cobra Generator - Code Generation Tool");
    println!("======================================\n");
    println!("[~] Configuration:");
    println!("  Output directory: {}", output_dir.display());
    println!("  Paths mode: {:?}", config.paths);
    println!("  Input files: {}", files.len());
    for file in &files {
      println!("    - {}", file.display());
    }
    if !include_dirs.is_empty() {
      println!("  Include directories: {}", include_dirs.len());
      for dir in &include_dirs {
        println!("    - {}", dir.display());
      }
    }
    println!();
  }

  let (descriptors, targets) = load_schemas(&files, include_dirs)?;

  if verbose {
    println!("[~] Loaded {} descriptor(s), {} target(s)", descriptors.len(), targets.len());
  }

  let mut failures = 0;
  for outcome in generate_files(&descriptors, &targets, &config) {
    match outcome.result {
      Ok(Some(generated)) => {
        let path = write_output(&output_dir, &generated.name, &generated.content)?;
        if verbose {
          println!("[+] {} -> {}", outcome.source, path.display());
        }
      }
      Ok(None) => {
        if verbose {
          println!("[-] {} has no services, skipped", outcome.source);
        }
      }
      Err(err) => {
        error!(file = %outcome.source, "{err}");
        failures += 1;
      }
    }
  }

  if failures > 0 {
    anyhow::bail!("{failures} file(s) failed to generate");
  }
  Ok(())
}

fn write_output(output_dir: &Path, name: &str, content: &str) -> anyhow::Result<PathBuf> {
  let path = output_dir.join(name);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&path, content)?;
  Ok(path)
}
