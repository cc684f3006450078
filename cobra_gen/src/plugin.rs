/* protoc plugin protocol: request in, response out.
 *
 * Per-file failures are reported through the response's `error` field so
 * protoc prints them; files that generated cleanly are still returned. */

use cobra_loader::PluginRequest;
use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response::{Feature, File};
use tracing::{debug, error};

use crate::codegen::generate_files;
use crate::config::GeneratorConfig;

pub fn respond(request: &PluginRequest) -> CodeGeneratorResponse {
  let mut response = CodeGeneratorResponse {
    supported_features: Some(Feature::Proto3Optional as u64),
    ..Default::default()
  };

  let config = match GeneratorConfig::from_parameter(&request.parameter) {
    Ok(config) => config,
    Err(err) => {
      error!(parameter = %request.parameter, error = %err, "invalid plugin parameter");
      response.error = Some(err.to_string());
      return response;
    }
  };
  debug!(?config, targets = request.file_to_generate.len(), "plugin request");

  let mut errors = Vec::new();
  for outcome in generate_files(&request.files, &request.file_to_generate, &config) {
    match outcome.result {
      Ok(Some(generated)) => response.file.push(File {
        name: Some(generated.name),
        content: Some(generated.content),
        ..Default::default()
      }),
      Ok(None) => {}
      Err(err) => errors.push(format!("{}: {err}", outcome.source)),
    }
  }

  if !errors.is_empty() {
    response.error = Some(errors.join("\n"));
  }
  response
}
