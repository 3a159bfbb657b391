#![allow(dead_code)]

// Builders for the descriptor protos protoc would hand the plugin.

use descriptor::GenerationRequest;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, MethodDescriptorProto, ServiceDescriptorProto,
};

pub fn file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        ..Default::default()
    }
}

pub fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

pub fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, Type::Message)
    }
}

pub fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, Type::Enum)
    }
}

pub fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// The synthetic `<Field>Entry` message protoc generates for a map field.
pub fn map_entry(name: &str, key: FieldDescriptorProto, value: FieldDescriptorProto) -> DescriptorProto {
    DescriptorProto {
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(name, vec![key, value])
    }
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(n, v)| EnumValueDescriptorProto {
                name: Some(n.to_string()),
                number: Some(*v),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn method(
    name: &str,
    input: &str,
    output: &str,
    client_streaming: bool,
    server_streaming: bool,
) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        client_streaming: Some(client_streaming),
        server_streaming: Some(server_streaming),
        ..Default::default()
    }
}

pub fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        ..Default::default()
    }
}

pub fn request(files: Vec<FileDescriptorProto>, to_generate: &[&str]) -> GenerationRequest {
    let raw = CodeGeneratorRequest {
        file_to_generate: to_generate.iter().map(|s| s.to_string()).collect(),
        proto_file: files,
        ..Default::default()
    };
    descriptor::build_request(&raw).expect("descriptor set should resolve")
}

/// `common/money.proto`: a type referenced from another package.
pub fn money_proto() -> FileDescriptorProto {
    let mut f = file("common/money.proto", "common");
    f.enum_type
        .push(enumeration("Currency", &[("EUR", 0), ("USD", 1)]));
    f.message_type.push(message(
        "Money",
        vec![
            scalar("cents", 1, Type::Int64),
            enum_field("currency", 2, ".common.Currency"),
        ],
    ));
    f
}

/// `shop/order.proto`: enums, nested types, maps, cross-package references and a streaming service.
pub fn order_proto() -> FileDescriptorProto {
    let mut f = file("shop/order.proto", "shop");
    f.dependency.push("common/money.proto".to_string());

    f.enum_type.push(enumeration(
        "OrderStatus",
        &[("UNKNOWN", 0), ("PENDING", 1), ("SHIPPED", 2)],
    ));

    f.message_type.push(message(
        "LineItem",
        vec![
            scalar("sku", 1, Type::String),
            scalar("quantity", 2, Type::Int32),
            scalar("price", 3, Type::Double),
            message_field("total", 4, ".common.Money"),
        ],
    ));

    let mut order = message(
        "Order",
        vec![
            scalar("id", 1, Type::String),
            enum_field("status", 2, ".shop.OrderStatus"),
            repeated(message_field("items", 3, ".shop.LineItem")),
            repeated(message_field("attributes", 4, ".shop.Order.AttributesEntry")),
            scalar("paid", 5, Type::Bool),
            scalar("receipt", 6, Type::Bytes),
            repeated(scalar("tags", 7, Type::String)),
            message_field("shipping", 8, ".shop.Order.Address"),
            enum_field("channel", 9, ".shop.Order.Channel"),
        ],
    );
    order
        .enum_type
        .push(enumeration("Channel", &[("WEB", 0), ("STORE", 1)]));
    order.nested_type.push(message(
        "Address",
        vec![scalar("street", 1, Type::String), scalar("city", 2, Type::String)],
    ));
    order.nested_type.push(map_entry(
        "AttributesEntry",
        scalar("key", 1, Type::String),
        message_field("value", 2, ".common.Money"),
    ));
    f.message_type.push(order);

    f.service.push(service(
        "OrderDesk",
        vec![
            method("Place", ".shop.Order", ".shop.Order", false, false),
            method("Track", ".shop.Order", ".shop.Order", false, true),
            method("Upload", ".shop.LineItem", ".shop.Order", true, false),
            method("Chat", ".shop.LineItem", ".common.Money", true, true),
        ],
    ));
    f
}
