/* protoc plugin entry point: `protoc --cobra_out=<params>:<dir> ...` */

use anyhow::Context;
use cobra_loader::PluginRequest;
use prost::Message;
use std::io::{Read, Write};
use tracing::info;

fn main() -> anyhow::Result<()> {
    cobra_gen::logging::init("warn");

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read CodeGeneratorRequest from stdin")?;

    let request = PluginRequest::decode(&input)?;
    info!(
        files = request.files.len(),
        targets = request.file_to_generate.len(),
        "received plugin request"
    );

    let response = cobra_gen::plugin::respond(&request);

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush()?;

    Ok(())
}
