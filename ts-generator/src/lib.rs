//! TypeScript declarations from protobuf descriptors.
//!
//! [`generate`] turns a [`GenerationRequest`] into one `.d.ts`-style file per
//! requested input file: enums, message interfaces with optional fields, and
//! service interfaces whose method signatures depend on the streaming flags
//! and [`GenerationConfig::async_iterators`].

pub mod config;
pub mod emitter;
pub mod output_name;
pub mod signature;
pub mod types;

use descriptor::{DescriptorError, GenerationRequest};
use thiserror::Error;

pub use config::{ConfigError, GenerationConfig};
pub use emitter::{Emitter, emit};
pub use output_name::{OutputNameContext, OutputNameTemplate, TemplateError, compute_path};

pub const HEADER: &str = "// Code generated by protoc-gen-tstypes. DO NOT EDIT.";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("invalid parameter: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot name output file: {0}")]
    Template(#[from] TemplateError),
    #[error("file to generate {0} is not in the descriptor set")]
    UnknownFile(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Generate one file per requested input file, in lexicographic order of the
/// input names. Any error aborts the whole run; no partial output is returned.
pub fn generate(
    request: &GenerationRequest,
    config: &GenerationConfig,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let template = OutputNameTemplate::parse(&config.output_name_pattern)?;

    let mut names: Vec<&String> = request.file_to_generate.iter().collect();
    names.sort();

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let file = request
            .files
            .get(name)
            .ok_or_else(|| GenerateError::UnknownFile(name.clone()))?;

        let path = template.render(&OutputNameContext::new(file, request))?;
        if config.verbose > 0 {
            tracing::info!("generating {}", path);
        }

        let mut content = format!("{HEADER}\n\n");
        content.push_str(&emit(file, config));
        out.push(GeneratedFile { path, content });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_generates_nothing() {
        let files = generate(&GenerationRequest::default(), &GenerationConfig::default())
            .expect("generation should succeed");
        assert!(files.is_empty());
    }

    #[test]
    fn unknown_requested_file_aborts() {
        let request = GenerationRequest {
            file_to_generate: vec!["missing.proto".into()],
            ..Default::default()
        };
        let err = generate(&request, &GenerationConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownFile(ref n) if n == "missing.proto"));
    }

    #[test]
    fn bad_pattern_aborts_before_any_file() {
        let config = GenerationConfig {
            output_name_pattern: "{{ .Nope }".into(),
            ..Default::default()
        };
        let err = generate(&GenerationRequest::default(), &config).unwrap_err();
        assert!(matches!(err, GenerateError::Template(TemplateError::Syntax(_))));
    }
}
