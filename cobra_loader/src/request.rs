//! protoc plugin request decoding.

use cobra_types::FileDescriptor;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;

use crate::descriptor::convert_file;
use crate::error::{LoadError, LoadResult};

/// Descriptors and options handed to the plugin by protoc.
#[derive(Debug, Clone, Default)]
pub struct PluginRequest {
    /// Every file in the request, dependencies first, in protoc's order.
    pub files: Vec<FileDescriptor>,
    /// Files named on the protoc command line.
    pub file_to_generate: Vec<String>,
    /// Raw `--cobra_out=<parameter>:<dir>` parameter string.
    pub parameter: String,
}

impl PluginRequest {
    pub fn decode(bytes: &[u8]) -> LoadResult<Self> {
        let request = CodeGeneratorRequest::decode(bytes).map_err(|source| LoadError::Decode {
            what: "CodeGeneratorRequest",
            source,
        })?;
        Ok(Self::from_request(&request))
    }

    pub fn from_request(request: &CodeGeneratorRequest) -> Self {
        Self {
            files: request.proto_file.iter().map(convert_file).collect(),
            file_to_generate: request.file_to_generate.clone(),
            parameter: request.parameter().to_string(),
        }
    }
}
