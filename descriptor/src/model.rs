// Read-only view over a protoc descriptor set.
// - Files own their top-level enums, messages and services.
// - Nested enums/messages hang off their parent message; map entries are folded into the field.
// - Type references are resolved at construction, so the generator never sees a dangling name.

use std::collections::BTreeMap;

// ---------------- Request ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationRequest {
    pub files: DescriptorSet,
    pub file_to_generate: Vec<String>,
    pub parameter: Option<String>,
    /// `major.minor.patch[-suffix]` of the invoking protoc, when it says.
    pub compiler_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptorSet {
    files: BTreeMap<String, FileDescriptor>,
}

impl DescriptorSet {
    pub(crate) fn insert(&mut self, file: FileDescriptor) -> Option<FileDescriptor> {
        self.files.insert(file.name.clone(), file)
    }

    pub fn get(&self, name: &str) -> Option<&FileDescriptor> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Files in lexicographic order of their names.
    pub fn iter(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// ---------------- File ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileDescriptor {
    pub name: String,
    pub package: String,
    pub dependencies: Vec<String>,
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<MessageDescriptor>,
    pub services: Vec<ServiceDescriptor>,
}

// ---------------- Message & Fields ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageDescriptor {
    pub name: String,
    pub full_name: String,
    pub fields: Vec<Field>,
    pub nested_enums: Vec<EnumDescriptor>,
    pub nested_messages: Vec<MessageDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub number: i32,
    pub ty: FieldType,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cardinality {
    Singular,
    Repeated,
    Map { key: FieldType, value: FieldType },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum(TypeRef),
    Message(TypeRef),
    /// A kind this version does not model (groups, kinds added by newer protoc releases).
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

/// A resolved reference to a message or enum declared somewhere in the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    /// Package-qualified name without the leading dot, e.g. `shop.Order.Status`.
    pub full_name: String,
    /// Package of the file declaring the type.
    pub package: String,
}

// ---------------- Enum ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDescriptor {
    pub name: String,
    pub full_name: String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

// ---------------- Service ----------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceDescriptor {
    pub name: String,
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub name: String,
    pub input: TypeRef,
    pub output: TypeRef,
    pub client_streaming: bool,
    pub server_streaming: bool,
}
