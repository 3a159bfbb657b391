//! RPC method signatures.
//!
//! Without async iterators, streaming is spelled with an explicit pull
//! function for the request side and a push callback for the response side.
//! With async iterators both directions collapse to `AsyncIterator<T>`.

use descriptor::MethodDescriptor;

use crate::config::GenerationConfig;
use crate::types::resolve_type_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureShape {
    /// `(request: In) => Out`, with either side wrapped in `AsyncIterator` when it streams.
    Iterator {
        client_streaming: bool,
        server_streaming: bool,
    },
    /// `(request: In) => Out`.
    Unary,
    /// `(request: In, callback: ...) => void`.
    ServerCallback,
    /// `(requestSource: () => ...) => Out`.
    ClientSource,
    /// `(requestSource: () => ..., callback: ...) => void`.
    BidiCallback,
}

impl SignatureShape {
    pub fn select(method: &MethodDescriptor, async_iterators: bool) -> Self {
        match (
            async_iterators,
            method.client_streaming,
            method.server_streaming,
        ) {
            (_, false, false) => SignatureShape::Unary,
            (true, client_streaming, server_streaming) => SignatureShape::Iterator {
                client_streaming,
                server_streaming,
            },
            (false, false, true) => SignatureShape::ServerCallback,
            (false, true, false) => SignatureShape::ClientSource,
            (false, true, true) => SignatureShape::BidiCallback,
        }
    }
}

/// `Name: <signature>;` for one method, as declared inside a service interface.
pub fn synthesize(method: &MethodDescriptor, package: &str, config: &GenerationConfig) -> String {
    let input = resolve_type_name(&method.input, package);
    let output = resolve_type_name(&method.output, package);
    let signature = render(
        SignatureShape::select(method, config.async_iterators),
        &input,
        &output,
    );
    format!("{}: {};", method.name, signature)
}

pub fn render(shape: SignatureShape, input: &str, output: &str) -> String {
    match shape {
        SignatureShape::Unary => format!("(request: {input}) => {output}"),
        SignatureShape::Iterator {
            client_streaming,
            server_streaming,
        } => format!(
            "(request: {}) => {}",
            async_iterator(input, client_streaming),
            async_iterator(output, server_streaming)
        ),
        SignatureShape::ServerCallback => {
            format!("(request: {input}, {}) => void", callback(output))
        }
        SignatureShape::ClientSource => format!("({}) => {output}", request_source(input)),
        SignatureShape::BidiCallback => format!(
            "({}, {}) => void",
            request_source(input),
            callback(output)
        ),
    }
}

fn async_iterator(ty: &str, streaming: bool) -> String {
    if streaming {
        format!("AsyncIterator<{ty}>")
    } else {
        ty.to_string()
    }
}

fn request_source(input: &str) -> String {
    format!("requestSource: () => {{value: {input}, done: boolean}}")
}

fn callback(output: &str) -> String {
    format!("callback: (item: {{value: {output}, done: boolean}}) => void")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use descriptor::TypeRef;
    use test_case::test_case;

    fn msg(name: &str, package: &str) -> TypeRef {
        TypeRef {
            name: name.into(),
            full_name: format!("{package}.{name}"),
            package: package.into(),
        }
    }

    fn method(client_streaming: bool, server_streaming: bool) -> MethodDescriptor {
        MethodDescriptor {
            name: "M".into(),
            input: msg("In", "pkg"),
            output: msg("Out", "pkg"),
            client_streaming,
            server_streaming,
        }
    }

    fn config(async_iterators: bool) -> GenerationConfig {
        GenerationConfig {
            async_iterators,
            ..Default::default()
        }
    }

    #[test_case(true, false, false, "M: (request: In) => Out;")]
    #[test_case(true, true, false, "M: (request: AsyncIterator<In>) => Out;")]
    #[test_case(true, false, true, "M: (request: In) => AsyncIterator<Out>;")]
    #[test_case(true, true, true, "M: (request: AsyncIterator<In>) => AsyncIterator<Out>;")]
    #[test_case(false, false, false, "M: (request: In) => Out;")]
    #[test_case(
        false, false, true,
        "M: (request: In, callback: (item: {value: Out, done: boolean}) => void) => void;"
    )]
    #[test_case(
        false, true, false,
        "M: (requestSource: () => {value: In, done: boolean}) => Out;"
    )]
    #[test_case(
        false, true, true,
        "M: (requestSource: () => {value: In, done: boolean}, callback: (item: {value: Out, done: boolean}) => void) => void;"
    )]
    fn synthesize___follows_decision_table(
        async_iterators: bool,
        client_streaming: bool,
        server_streaming: bool,
        expected: &str,
    ) {
        let m = method(client_streaming, server_streaming);
        assert_eq!(synthesize(&m, "pkg", &config(async_iterators)), expected);
    }

    #[test]
    fn synthesize___unary_is_mode_independent() {
        let m = method(false, false);
        assert_eq!(
            synthesize(&m, "pkg", &config(true)),
            synthesize(&m, "pkg", &config(false))
        );
    }

    #[test]
    fn synthesize___qualifies_foreign_messages() {
        let m = MethodDescriptor {
            name: "Get".into(),
            input: msg("Query", "search"),
            output: msg("Page", "common"),
            client_streaming: false,
            server_streaming: false,
        };
        assert_eq!(
            synthesize(&m, "search", &config(false)),
            "Get: (request: Query) => common.Page;"
        );
    }

    #[test]
    fn select___picks_callback_shapes_without_iterators() {
        assert_eq!(
            SignatureShape::select(&method(false, true), false),
            SignatureShape::ServerCallback
        );
        assert_eq!(
            SignatureShape::select(&method(true, false), false),
            SignatureShape::ClientSource
        );
        assert_eq!(
            SignatureShape::select(&method(true, true), false),
            SignatureShape::BidiCallback
        );
    }
}
