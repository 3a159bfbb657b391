use descriptor::{Cardinality, Field, FieldType, ScalarType, TypeRef};

pub const UNKNOWN_TYPE: &str = "any /*unknown*/";

/// TypeScript type of a field as seen from a file in `package`, cardinality included.
pub fn map_type(field: &Field, package: &str) -> String {
    match &field.cardinality {
        Cardinality::Map { key, value } => format!(
            "{{ [key: {}]: {} }}",
            raw_type(key, package),
            raw_type(value, package)
        ),
        Cardinality::Repeated => format!("Array<{}>", raw_type(&field.ty, package)),
        Cardinality::Singular => raw_type(&field.ty, package),
    }
}

/// TypeScript type of a single value, without cardinality.
pub fn raw_type(ty: &FieldType, package: &str) -> String {
    match ty {
        FieldType::Scalar(scalar) => scalar_type(*scalar).to_string(),
        FieldType::Enum(r) | FieldType::Message(r) => resolve_type_name(r, package),
        FieldType::Unknown(_) => UNKNOWN_TYPE.to_string(),
    }
}

fn scalar_type(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::Double
        | ScalarType::Float
        | ScalarType::Int32
        | ScalarType::Int64
        | ScalarType::Uint32
        | ScalarType::Uint64
        | ScalarType::Sint32
        | ScalarType::Sint64
        | ScalarType::Fixed32
        | ScalarType::Fixed64
        | ScalarType::Sfixed32
        | ScalarType::Sfixed64 => "number",
        ScalarType::Bool => "boolean",
        ScalarType::String => "string",
        ScalarType::Bytes => "Uint8Array",
    }
}

/// Bare name inside the declaring package, fully qualified name everywhere else.
pub fn resolve_type_name(type_ref: &TypeRef, package: &str) -> String {
    if type_ref.package == package {
        type_ref.name.clone()
    } else {
        type_ref.full_name.clone()
    }
}
