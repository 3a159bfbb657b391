//! Generator options, parsed from the protoc parameter string.
//!
//! protoc passes everything after `--tstypes_out=` and before the `:` as one
//! string, e.g. `declare_namespace=false,outpattern={{.BaseName}}.d.ts,v=1`.
//! Entries are comma separated; a bare boolean key means `true`.

use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_OUTPUT_NAME_PATTERN: &str = "{{.Dir}}/{{.BaseName}}.d.ts";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid boolean for {key}: {value}")]
    InvalidBool { key: String, value: String },
    #[error("invalid verbosity level: {0}")]
    InvalidVerbosity(String),
    #[error("parameter {0} needs a value")]
    MissingValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Render every streaming method with `AsyncIterator` instead of callbacks.
    pub async_iterators: bool,
    /// Wrap each file in `declare namespace <package> { ... }`.
    pub declare_namespace: bool,
    pub output_name_pattern: String,
    /// Emit enum members as their numbers instead of their names.
    pub enums_as_int: bool,
    pub verbose: u8,
    pub dump_request_descriptor: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            async_iterators: false,
            declare_namespace: true,
            output_name_pattern: DEFAULT_OUTPUT_NAME_PATTERN.to_string(),
            enums_as_int: false,
            verbose: 0,
            dump_request_descriptor: false,
        }
    }
}

impl GenerationConfig {
    /// Parse an optional protoc parameter string; `None` yields the defaults.
    pub fn from_parameter(parameter: Option<&str>) -> Result<Self, ConfigError> {
        parameter.map_or_else(|| Ok(Self::default()), |p| p.parse())
    }
}

impl FromStr for GenerationConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = Self::default();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match part.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (part, None),
            };
            match key {
                "async_iterators" => config.async_iterators = parse_bool(key, value)?,
                "declare_namespace" => config.declare_namespace = parse_bool(key, value)?,
                "enums_as_int" => config.enums_as_int = parse_bool(key, value)?,
                "dump_request_descriptor" => {
                    config.dump_request_descriptor = parse_bool(key, value)?
                }
                "outpattern" => {
                    config.output_name_pattern = value
                        .ok_or_else(|| ConfigError::MissingValue(key.to_string()))?
                        .to_string()
                }
                "v" => {
                    config.verbose = match value {
                        None => 1,
                        Some(v) => v
                            .parse()
                            .map_err(|_| ConfigError::InvalidVerbosity(v.to_string()))?,
                    }
                }
                other => return Err(ConfigError::UnknownParameter(other.to_string())),
            }
        }
        Ok(config)
    }
}

fn parse_bool(key: &str, value: Option<&str>) -> Result<bool, ConfigError> {
    match value {
        None | Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}
