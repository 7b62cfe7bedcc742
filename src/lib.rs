//! A parser and runtime for the HXL configuration language.
//!
//! HXL documents describe a flat list of typed, named nodes with
//! optional inheritance and cross-references, written with an
//! indentation-sensitive syntax similar to YAML. This crate takes a
//! source string all the way from raw text to caller-defined Rust
//! values, through six stages:
//!
//! Stage               | Input        | Output
//! ---------------------|--------------|------------------------------
//! Tokenizer            | `&str`       | `Vec<`[`Token`]`>`
//! Parser               | tokens       | [`Document`]
//! Semantic Analyzer    | document     | `ErrorList`
//! Transformer          | document     | document, with inheritance resolved
//! Schema Validator     | document     | `ErrorList`
//! Deserializer         | document     | caller structures, via [`DeserializationProtocol`]
//!
//! Most callers only need [`process()`], which drives all six stages and
//! times each one. The per-stage functions ([`tokenizer::tokenize`],
//! [`parser::parse`], etc.) are exposed for callers that want to stop
//! partway, for example a syntax-only check.

mod document;
mod error;
mod newtypes;

pub mod deserialize;
pub mod parser;
pub mod pipeline;
pub mod schema;
pub mod semantic;
pub mod token;
pub mod tokenizer;
pub mod transformer;

pub use crate::deserialize::{
    DeserializationHandle, DeserializationProtocol, DeserializedNode, DeserializedNodeProperty, DeserializedValue,
    NodeRef,
};
pub use crate::document::{DataType, Document, Inheritance, Node, NodeProperty};
pub use crate::error::{Error, ErrorCode, ErrorList, Position};
pub use crate::newtypes::TabWidth;
pub use crate::pipeline::{process, PerformanceResults, ProcessResult};
pub use crate::schema::{Schema, SchemaNodeProperty, SchemaNodeType, ValueStructure};
pub use crate::token::{SourcePosition, Token, TokenKind};

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn full_pipeline_runs_end_to_end() {
        let schema = Schema::new(vec![SchemaNodeType::new("Cube")
            .property(SchemaNodeProperty::new("size", DataType::Int))
            .property(SchemaNodeProperty::new("label", DataType::String))]);

        let protocol = DeserializationProtocol::new().on("Cube", |node| {
            assert_eq!(node.name, "A");
            assert_eq!(node.get("size"), Some(&DeserializedValue::Int(5)));
        });

        let source = "<Cube> A\n\tsize: 5\n\tlabel: \"hello\"\n";
        let result = process(source, &schema, &protocol);
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn inheritance_flows_through_the_whole_pipeline() {
        let schema = Schema::new(vec![SchemaNodeType::new("Cube")
            .property(SchemaNodeProperty::new("size", DataType::Int))]);
        let protocol = DeserializationProtocol::new().on("Cube", |_| {});

        let source = "<Cube> A\n\tsize: 5\n<Cube> B <= A\n";
        let result = process(source, &schema, &protocol);
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn unknown_node_type_is_reported_through_process() {
        let schema = Schema::default();
        let protocol = DeserializationProtocol::new();
        let result = process("<Sphere> A\n", &schema, &protocol);
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].code, ErrorCode::UnknownNodeType);
    }
}
