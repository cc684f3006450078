/* Analyze command - print the assembled command IR */

use super::common::{load_config, load_schemas};
use anyhow::anyhow;
use clap::ValueEnum;
use cobra_gen::codegen::ir::GoFile;
use cobra_gen::{ImportMap, build_file};
use std::path::PathBuf;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum IrOutputFormat {
  Json,
  Yaml,
}

/* Execute the analyze command */
pub fn run(
  files: Vec<PathBuf>,
  include_dirs: Vec<PathBuf>,
  config_path: Option<PathBuf>,
  format: IrOutputFormat,
  method: Option<String>,
) -> anyhow::Result<()> {
  let config = load_config(config_path.as_deref())?;
  let (descriptors, targets) = load_schemas(&files, include_dirs)?;
  let imports = ImportMap::from_files(&descriptors, &config);

  let mut go_files = Vec::new();
  for target in &targets {
    let descriptor = descriptors
      .iter()
      .find(|d| &d.name == target)
      .ok_or_else(|| anyhow!("no descriptor loaded for '{target}'"))?;
    if let Some(go_file) = build_file(descriptor, &imports, &config)? {
      go_files.push(go_file);
    }
  }

  match method {
    /* `Service.Method` narrows the output to one subcommand */
    Some(selector) => {
      let (service, method) = selector
        .split_once('.')
        .ok_or_else(|| anyhow!("expected Service.Method, got '{selector}'"))?;
      let subcommand = find_subcommand(&go_files, service, method)
        .ok_or_else(|| anyhow!("no method '{selector}' in the loaded services"))?;
      print(format, subcommand)
    }
    None => print(format, &go_files),
  }
}

fn find_subcommand<'a>(
  go_files: &'a [GoFile],
  service: &str,
  method: &str,
) -> Option<&'a cobra_gen::codegen::ir::Subcommand> {
  go_files
    .iter()
    .flat_map(|f| f.subcommands())
    .find(|s| s.service.eq_ignore_ascii_case(service) && s.method.eq_ignore_ascii_case(method))
}

fn print<T: serde::Serialize + ?Sized>(format: IrOutputFormat, value: &T) -> anyhow::Result<()> {
  let text = match format {
    IrOutputFormat::Json => serde_json::to_string_pretty(value)?,
    IrOutputFormat::Yaml => serde_yml::to_string(value)?,
  };
  println!("{text}");
  Ok(())
}
