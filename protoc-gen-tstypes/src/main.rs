//! protoc-gen-tstypes - a protoc plugin emitting TypeScript type declarations.
//!
//! Reads a `CodeGeneratorRequest` from stdin and writes a
//! `CodeGeneratorResponse` to stdout. Options come from the protoc parameter
//! string, e.g. `--tstypes_out=async_iterators,outpattern={{.BaseName}}.d.ts:out`.
//! Diagnostics go to stderr; stdout carries only the response.

use std::io::{self, Read, Write};

use anyhow::Context;
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use tracing_subscriber::EnvFilter;
use ts_generator::{GenerateError, GenerationConfig, GeneratedFile, generate};

fn main() -> anyhow::Result<()> {
    let mut buf = Vec::new();
    io::stdin()
        .read_to_end(&mut buf)
        .context("couldn't read request from stdin")?;
    let request = CodeGeneratorRequest::decode(buf.as_slice())
        .context("couldn't decode CodeGeneratorRequest, is this running as a protoc plugin?")?;

    let response = match run(&request) {
        Ok(files) => response(files),
        Err(e) => {
            tracing::error!("{e}");
            CodeGeneratorResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    let mut out = Vec::new();
    response
        .encode(&mut out)
        .context("couldn't encode CodeGeneratorResponse")?;
    io::stdout()
        .write_all(&out)
        .context("couldn't write response to stdout")?;
    Ok(())
}

fn run(request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>, GenerateError> {
    let config = GenerationConfig::from_parameter(request.parameter.as_deref());
    init_tracing(config.as_ref().map_or(0, |c| c.verbose));
    let config = config?;

    if config.dump_request_descriptor {
        eprintln!("{request:#?}");
    }

    let model = descriptor::build_request(request)?;
    let files = generate(&model, &config)?;
    tracing::debug!(count = files.len(), "generation finished");
    Ok(files)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn response(files: Vec<GeneratedFile>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: files
            .into_iter()
            .map(|f| File {
                name: Some(f.path),
                content: Some(f.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
