mod model;

use std::collections::HashMap;

use prost_types::compiler::{CodeGeneratorRequest, Version};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, ServiceDescriptorProto,
};
use thiserror::Error;

pub use model::*;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("file descriptor #{0} has no name")]
    MissingFileName(usize),
    #[error("file {0} is described more than once")]
    DuplicateFile(String),
    #[error("{file} imports {dependency}, which is not in the descriptor set")]
    MissingDependency { file: String, dependency: String },
    #[error("{file}: {element} refers to unknown type {type_name}")]
    UnresolvedType {
        file: String,
        element: String,
        type_name: String,
    },
    #[error("{file}: {element} has no type name")]
    MissingTypeName { file: String, element: String },
}

/// Build the read-only request model from a decoded protoc request.
pub fn build_request(request: &CodeGeneratorRequest) -> Result<GenerationRequest, DescriptorError> {
    let files = build_descriptor_set(&request.proto_file)?;
    Ok(GenerationRequest {
        files,
        file_to_generate: request.file_to_generate.clone(),
        parameter: request.parameter.clone(),
        compiler_version: request.compiler_version.as_ref().map(render_version),
    })
}

/// Build the descriptor model for a full set of files, resolving every type reference.
pub fn build_descriptor_set(
    protos: &[FileDescriptorProto],
) -> Result<DescriptorSet, DescriptorError> {
    for (idx, proto) in protos.iter().enumerate() {
        if proto.name.is_none() {
            return Err(DescriptorError::MissingFileName(idx));
        }
    }

    let index = TypeIndex::new(protos);
    let mut set = DescriptorSet::default();
    for proto in protos {
        let file = index.build_file(proto)?;
        tracing::debug!(file = %file.name, package = %file.package, "built file descriptor");
        if let Some(prev) = set.insert(file) {
            return Err(DescriptorError::DuplicateFile(prev.name));
        }
    }

    for file in set.iter() {
        if let Some(missing) = file.dependencies.iter().find(|d| !set.contains(d)) {
            return Err(DescriptorError::MissingDependency {
                file: file.name.clone(),
                dependency: missing.clone(),
            });
        }
    }

    Ok(set)
}

fn render_version(v: &Version) -> String {
    let base = format!("{}.{}.{}", v.major(), v.minor(), v.patch());
    match v.suffix() {
        "" => base,
        suffix => format!("{base}-{suffix}"),
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}

fn is_map_entry(message: &DescriptorProto) -> bool {
    message
        .options
        .as_ref()
        .and_then(|o| o.map_entry)
        .unwrap_or(false)
}

enum Indexed<'a> {
    Message {
        type_ref: TypeRef,
        map_entry: Option<&'a DescriptorProto>,
    },
    Enum {
        type_ref: TypeRef,
    },
}

/// Every message and enum of the set, keyed by fully-qualified name without the leading dot.
struct TypeIndex<'a> {
    types: HashMap<String, Indexed<'a>>,
}

impl<'a> TypeIndex<'a> {
    fn new(protos: &'a [FileDescriptorProto]) -> Self {
        let mut index = TypeIndex {
            types: HashMap::new(),
        };
        for proto in protos {
            let package = proto.package();
            for e in &proto.enum_type {
                index.add_enum(package, package, e);
            }
            for m in &proto.message_type {
                index.add_message(package, package, m);
            }
        }
        index
    }

    fn add_enum(&mut self, package: &str, scope: &str, e: &EnumDescriptorProto) {
        let type_ref = TypeRef {
            name: e.name().to_string(),
            full_name: qualify(scope, e.name()),
            package: package.to_string(),
        };
        self.types
            .insert(type_ref.full_name.clone(), Indexed::Enum { type_ref });
    }

    fn add_message(&mut self, package: &str, scope: &str, m: &'a DescriptorProto) {
        let full_name = qualify(scope, m.name());
        for e in &m.enum_type {
            self.add_enum(package, &full_name, e);
        }
        for nested in &m.nested_type {
            self.add_message(package, &full_name, nested);
        }
        let type_ref = TypeRef {
            name: m.name().to_string(),
            full_name: full_name.clone(),
            package: package.to_string(),
        };
        let map_entry = is_map_entry(m).then_some(m);
        self.types.insert(
            full_name,
            Indexed::Message {
                type_ref,
                map_entry,
            },
        );
    }

    fn lookup(
        &self,
        file: &str,
        element: &str,
        type_name: Option<&str>,
    ) -> Result<&Indexed<'a>, DescriptorError> {
        let type_name = type_name.ok_or_else(|| DescriptorError::MissingTypeName {
            file: file.to_string(),
            element: element.to_string(),
        })?;
        // protoc always emits `.pkg.Name`; tolerate hand-built sets that drop the dot.
        let key = type_name.strip_prefix('.').unwrap_or(type_name);
        self.types
            .get(key)
            .ok_or_else(|| DescriptorError::UnresolvedType {
                file: file.to_string(),
                element: element.to_string(),
                type_name: type_name.to_string(),
            })
    }

    fn build_file(&self, proto: &FileDescriptorProto) -> Result<FileDescriptor, DescriptorError> {
        let file = proto.name();
        let package = proto.package();
        let messages = proto
            .message_type
            .iter()
            .map(|m| self.build_message(file, package, m))
            .collect::<Result<Vec<_>, _>>()?;
        let services = proto
            .service
            .iter()
            .map(|s| self.build_service(file, s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileDescriptor {
            name: file.to_string(),
            package: package.to_string(),
            dependencies: proto.dependency.clone(),
            enums: proto
                .enum_type
                .iter()
                .map(|e| build_enum(package, e))
                .collect(),
            messages,
            services,
        })
    }

    fn build_message(
        &self,
        file: &str,
        scope: &str,
        m: &DescriptorProto,
    ) -> Result<MessageDescriptor, DescriptorError> {
        let full_name = qualify(scope, m.name());
        let fields = m
            .field
            .iter()
            .map(|f| self.build_field(file, &full_name, f))
            .collect::<Result<Vec<_>, _>>()?;
        let nested_messages = m
            .nested_type
            .iter()
            .filter(|nested| !is_map_entry(nested))
            .map(|nested| self.build_message(file, &full_name, nested))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MessageDescriptor {
            name: m.name().to_string(),
            nested_enums: m
                .enum_type
                .iter()
                .map(|e| build_enum(&full_name, e))
                .collect(),
            full_name,
            fields,
            nested_messages,
        })
    }

    fn build_field(
        &self,
        file: &str,
        message: &str,
        f: &FieldDescriptorProto,
    ) -> Result<Field, DescriptorError> {
        let element = format!("field {message}.{}", f.name());
        let ty = self.field_type(file, &element, f)?;

        let cardinality = if f.label() != Label::Repeated {
            Cardinality::Singular
        } else {
            match self.map_entry(&ty) {
                Some(entry) => self.map_cardinality(file, &element, entry)?,
                None => Cardinality::Repeated,
            }
        };

        Ok(Field {
            name: f.name().to_string(),
            number: f.number(),
            ty,
            cardinality,
        })
    }

    fn map_entry(&self, ty: &FieldType) -> Option<&'a DescriptorProto> {
        let FieldType::Message(type_ref) = ty else {
            return None;
        };
        match self.types.get(&type_ref.full_name) {
            Some(Indexed::Message { map_entry, .. }) => *map_entry,
            _ => None,
        }
    }

    fn map_cardinality(
        &self,
        file: &str,
        element: &str,
        entry: &DescriptorProto,
    ) -> Result<Cardinality, DescriptorError> {
        let slot = |number: i32| -> Result<FieldType, DescriptorError> {
            match entry.field.iter().find(|f| f.number() == number) {
                Some(f) => self.field_type(file, element, f),
                None => Ok(FieldType::Unknown(format!("missing map entry field {number}"))),
            }
        };
        Ok(Cardinality::Map {
            key: slot(1)?,
            value: slot(2)?,
        })
    }

    fn field_type(
        &self,
        file: &str,
        element: &str,
        f: &FieldDescriptorProto,
    ) -> Result<FieldType, DescriptorError> {
        let Some(raw) = f.r#type else {
            // Unset kind: protoc leaves it to the type name to say message or enum.
            return match f.type_name {
                Some(_) => self.reference(file, element, f),
                None => Ok(FieldType::Unknown("unset".to_string())),
            };
        };

        let scalar = match Type::try_from(raw) {
            Ok(Type::Double) => ScalarType::Double,
            Ok(Type::Float) => ScalarType::Float,
            Ok(Type::Int32) => ScalarType::Int32,
            Ok(Type::Int64) => ScalarType::Int64,
            Ok(Type::Uint32) => ScalarType::Uint32,
            Ok(Type::Uint64) => ScalarType::Uint64,
            Ok(Type::Sint32) => ScalarType::Sint32,
            Ok(Type::Sint64) => ScalarType::Sint64,
            Ok(Type::Fixed32) => ScalarType::Fixed32,
            Ok(Type::Fixed64) => ScalarType::Fixed64,
            Ok(Type::Sfixed32) => ScalarType::Sfixed32,
            Ok(Type::Sfixed64) => ScalarType::Sfixed64,
            Ok(Type::Bool) => ScalarType::Bool,
            Ok(Type::String) => ScalarType::String,
            Ok(Type::Bytes) => ScalarType::Bytes,
            Ok(Type::Message | Type::Enum) => return self.reference(file, element, f),
            Ok(Type::Group) => return Ok(FieldType::Unknown("group".to_string())),
            Err(_) => return Ok(FieldType::Unknown(format!("type {raw}"))),
        };
        Ok(FieldType::Scalar(scalar))
    }

    fn reference(
        &self,
        file: &str,
        element: &str,
        f: &FieldDescriptorProto,
    ) -> Result<FieldType, DescriptorError> {
        Ok(match self.lookup(file, element, f.type_name.as_deref())? {
            Indexed::Message { type_ref, .. } => FieldType::Message(type_ref.clone()),
            Indexed::Enum { type_ref } => FieldType::Enum(type_ref.clone()),
        })
    }

    fn build_service(
        &self,
        file: &str,
        s: &ServiceDescriptorProto,
    ) -> Result<ServiceDescriptor, DescriptorError> {
        let methods = s
            .method
            .iter()
            .map(|m| self.build_method(file, s.name(), m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ServiceDescriptor {
            name: s.name().to_string(),
            methods,
        })
    }

    fn build_method(
        &self,
        file: &str,
        service: &str,
        m: &MethodDescriptorProto,
    ) -> Result<MethodDescriptor, DescriptorError> {
        let message_ref = |slot: &str, type_name: Option<&str>| -> Result<TypeRef, DescriptorError> {
            let element = format!("method {service}.{} {slot}", m.name());
            match self.lookup(file, &element, type_name)? {
                Indexed::Message { type_ref, .. } => Ok(type_ref.clone()),
                Indexed::Enum { type_ref } => Err(DescriptorError::UnresolvedType {
                    file: file.to_string(),
                    element,
                    type_name: type_ref.full_name.clone(),
                }),
            }
        };

        Ok(MethodDescriptor {
            name: m.name().to_string(),
            input: message_ref("input", m.input_type.as_deref())?,
            output: message_ref("output", m.output_type.as_deref())?,
            client_streaming: m.client_streaming(),
            server_streaming: m.server_streaming(),
        })
    }
}

fn build_enum(scope: &str, e: &EnumDescriptorProto) -> EnumDescriptor {
    EnumDescriptor {
        name: e.name().to_string(),
        full_name: qualify(scope, e.name()),
        values: e
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name().to_string(),
                number: v.number(),
            })
            .collect(),
    }
}
