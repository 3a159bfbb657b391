//! Declaration text for one file: enums, then messages, then services.

use descriptor::{EnumDescriptor, FileDescriptor, MessageDescriptor, ServiceDescriptor};

use crate::config::GenerationConfig;
use crate::signature::synthesize;
use crate::types::map_type;

const INDENT: &str = "  ";

pub const SERVICE_SUFFIX: &str = "Service";

/// Emits declarations into an owned buffer. One emitter per file.
pub struct Emitter<'a> {
    config: &'a GenerationConfig,
    package: &'a str,
    out: String,
    depth: usize,
}

impl<'a> Emitter<'a> {
    /// `package` is the package of the file being generated; references to
    /// other packages are qualified against it.
    pub fn new(config: &'a GenerationConfig, package: &'a str) -> Self {
        Self {
            config,
            package,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        debug_assert_eq!(self.depth, 0, "unbalanced indentation");
        self.out
    }

    fn line(&mut self, s: &str) {
        if !s.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(s);
        }
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
        self.line("");
    }

    /// Every declaration of the file, optionally wrapped in a namespace named after its package.
    pub fn emit_file(&mut self, file: &FileDescriptor) {
        let namespace = self.config.declare_namespace && !file.package.is_empty();
        if namespace {
            self.open(&format!("declare namespace {}", file.package));
        }
        for e in &file.enums {
            self.emit_enum(e);
        }
        for m in &file.messages {
            self.emit_message(m);
        }
        for s in &file.services {
            self.emit_service(s);
        }
        if namespace {
            self.close();
        }
    }

    pub fn emit_enum(&mut self, e: &EnumDescriptor) {
        tracing::debug!(name = %e.full_name, "emitting enum");
        self.open(&format!("export enum {}", e.name));
        for v in &e.values {
            if self.config.enums_as_int {
                self.line(&format!("{} = {},", v.name, v.number));
            } else {
                self.line(&format!("{} = \"{}\",", v.name, v.name));
            }
        }
        self.close();
    }

    /// Nested enums and messages are flattened in front of their parent.
    pub fn emit_message(&mut self, m: &MessageDescriptor) {
        for e in &m.nested_enums {
            self.emit_enum(e);
        }
        for nested in &m.nested_messages {
            self.emit_message(nested);
        }

        tracing::debug!(name = %m.full_name, "emitting message");
        self.open(&format!("export interface {}", m.name));
        for f in &m.fields {
            let ty = map_type(f, self.package);
            self.line(&format!("{}?: {};", f.name, ty));
        }
        self.close();
    }

    pub fn emit_service(&mut self, s: &ServiceDescriptor) {
        tracing::debug!(name = %s.name, "emitting service");
        self.open(&format!("export interface {}{}", s.name, SERVICE_SUFFIX));
        for m in &s.methods {
            let signature = synthesize(m, self.package, self.config);
            self.line(&signature);
        }
        self.close();
    }
}

/// Declaration text of one file.
pub fn emit(file: &FileDescriptor, config: &GenerationConfig) -> String {
    let mut emitter = Emitter::new(config, &file.package);
    emitter.emit_file(file);
    emitter.finish()
}
