//! Output path templates.
//!
//! The pattern is literal text with `{{ ... }}` actions evaluated against a
//! fixed per-file context:
//!
//! | Field | Value |
//! |-------|-------|
//! | `.Dir` | directory part of the input file name, `.` when there is none |
//! | `.BaseName` | file name without directory and `.proto` suffix |
//! | `.Descriptor.Name` | full input file name |
//! | `.Descriptor.Package` | package of the input file |
//! | `.Request.Parameter` | raw protoc parameter string |
//! | `.Request.CompilerVersion` | protoc version, empty when unknown |
//! | `.Request.FileToGenerate` | requested files, comma separated |
//!
//! Functions take the piped value as their last argument:
//! `{{ .Descriptor.Package | replace "." "/" }}/{{ .BaseName }}.d.ts`.

use descriptor::{FileDescriptor, GenerationRequest};
use pest::Parser as _;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "resources/output_name.pest"]
struct OutputNameParser;

/// Name and argument count (piped value included) of every template function.
const FUNCTIONS: &[(&str, usize)] = &[
    ("lower", 1),
    ("upper", 1),
    ("replace", 3),
    ("trimPrefix", 2),
    ("trimSuffix", 2),
    ("default", 2),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid output name pattern: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("unknown field {0}")]
    UnknownField(String),
    #[error("field {0} is not a string")]
    NotAScalar(String),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("{function} takes {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("{0} is a function, not a value")]
    NotAValue(String),
    #[error("cannot call {0}: only functions take arguments")]
    NotAFunction(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Action(Vec<Command>),
}

#[derive(Debug, Clone, PartialEq)]
struct Command {
    operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Field(Vec<String>),
    Literal(String),
    Function(String),
}

impl Operand {
    fn describe(&self) -> String {
        match self {
            Operand::Field(path) => format!(".{}", path.join(".")),
            Operand::Literal(s) => format!("{s:?}"),
            Operand::Function(name) => name.clone(),
        }
    }
}

/// Per-file values visible to a template.
#[derive(Debug, Clone)]
pub struct OutputNameContext<'a> {
    pub dir: String,
    pub base_name: String,
    pub descriptor: &'a FileDescriptor,
    pub request: &'a GenerationRequest,
}

impl<'a> OutputNameContext<'a> {
    pub fn new(descriptor: &'a FileDescriptor, request: &'a GenerationRequest) -> Self {
        let (dir, file_name) = match descriptor.name.rsplit_once('/') {
            Some(("", file_name)) => ("/", file_name),
            Some((dir, file_name)) => (dir, file_name),
            None => (".", descriptor.name.as_str()),
        };
        let base_name = file_name.strip_suffix(".proto").unwrap_or(file_name);
        Self {
            dir: dir.to_string(),
            base_name: base_name.to_string(),
            descriptor,
            request,
        }
    }

    fn lookup(&self, path: &[String]) -> Result<String, TemplateError> {
        let parts: Vec<&str> = path.iter().map(String::as_str).collect();
        let display = || format!(".{}", path.join("."));
        match parts.as_slice() {
            ["Dir"] => Ok(self.dir.clone()),
            ["BaseName"] => Ok(self.base_name.clone()),
            ["Descriptor", "Name"] => Ok(self.descriptor.name.clone()),
            ["Descriptor", "Package"] => Ok(self.descriptor.package.clone()),
            ["Request", "Parameter"] => Ok(self.request.parameter.clone().unwrap_or_default()),
            ["Request", "CompilerVersion"] => {
                Ok(self.request.compiler_version.clone().unwrap_or_default())
            }
            ["Request", "FileToGenerate"] => Ok(self.request.file_to_generate.join(",")),
            [] | ["Descriptor"] | ["Request"] => Err(TemplateError::NotAScalar(display())),
            _ => Err(TemplateError::UnknownField(display())),
        }
    }
}

/// A parsed output name pattern, ready to render once per file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputNameTemplate {
    segments: Vec<Segment>,
}

impl OutputNameTemplate {
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let pairs = OutputNameParser::parse(Rule::template, pattern).map_err(Box::new)?;
        let mut segments = Vec::new();
        for pair in pairs.flat_map(|root| root.into_inner()) {
            match pair.as_rule() {
                Rule::text => segments.push(Segment::Text(pair.as_str().to_string())),
                Rule::action => segments.push(Segment::Action(parse_pipeline(pair))),
                _ => {}
            }
        }
        Ok(Self { segments })
    }

    pub fn render(&self, ctx: &OutputNameContext<'_>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Action(commands) => out.push_str(&eval_pipeline(commands, ctx)?),
            }
        }
        Ok(out)
    }
}

/// Parse `pattern` and render it for one file.
pub fn compute_path(
    file: &FileDescriptor,
    request: &GenerationRequest,
    pattern: &str,
) -> Result<String, TemplateError> {
    OutputNameTemplate::parse(pattern)?.render(&OutputNameContext::new(file, request))
}

fn parse_pipeline(action: Pair<Rule>) -> Vec<Command> {
    action
        .into_inner()
        .flat_map(|pipeline| pipeline.into_inner())
        .map(|command| Command {
            operands: command.into_inner().filter_map(parse_operand).collect(),
        })
        .collect()
}

fn parse_operand(pair: Pair<Rule>) -> Option<Operand> {
    match pair.as_rule() {
        Rule::field => Some(Operand::Field(
            pair.as_str()
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Rule::literal => Some(Operand::Literal(unescape(
            pair.into_inner()
                .next()
                .map(|inner| inner.as_str())
                .unwrap_or_default(),
        ))),
        Rule::ident => Some(Operand::Function(pair.as_str().to_string())),
        _ => None,
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn eval_pipeline(commands: &[Command], ctx: &OutputNameContext<'_>) -> Result<String, TemplateError> {
    let mut piped = None;
    for command in commands {
        piped = Some(eval_command(command, piped, ctx)?);
    }
    Ok(piped.unwrap_or_default())
}

fn eval_command(
    command: &Command,
    piped: Option<String>,
    ctx: &OutputNameContext<'_>,
) -> Result<String, TemplateError> {
    match command.operands.split_first() {
        Some((Operand::Function(name), args)) => {
            let mut values = args
                .iter()
                .map(|arg| eval_value(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            values.extend(piped);
            call(name, values)
        }
        Some((value, [])) if piped.is_none() => eval_value(value, ctx),
        Some((value, _)) => Err(TemplateError::NotAFunction(value.describe())),
        None => Ok(piped.unwrap_or_default()),
    }
}

fn eval_value(operand: &Operand, ctx: &OutputNameContext<'_>) -> Result<String, TemplateError> {
    match operand {
        Operand::Field(path) => ctx.lookup(path),
        Operand::Literal(s) => Ok(s.clone()),
        Operand::Function(name) => Err(TemplateError::NotAValue(name.clone())),
    }
}

fn call(name: &str, args: Vec<String>) -> Result<String, TemplateError> {
    let result = match (name, args.as_slice()) {
        ("lower", [s]) => s.to_lowercase(),
        ("upper", [s]) => s.to_uppercase(),
        ("replace", [old, new, s]) => s.replace(old.as_str(), new),
        ("trimPrefix", [prefix, s]) => s.strip_prefix(prefix.as_str()).unwrap_or(s).to_string(),
        ("trimSuffix", [suffix, s]) => s.strip_suffix(suffix.as_str()).unwrap_or(s).to_string(),
        ("default", [fallback, s]) => {
            if s.is_empty() {
                fallback.clone()
            } else {
                s.clone()
            }
        }
        _ => {
            return Err(match FUNCTIONS.iter().find(|(f, _)| *f == name) {
                Some((_, expected)) => TemplateError::Arity {
                    function: name.to_string(),
                    expected: *expected,
                    got: args.len(),
                },
                None => TemplateError::UnknownFunction(name.to_string()),
            });
        }
    };
    Ok(result)
}
