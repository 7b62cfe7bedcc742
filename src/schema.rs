//! Schema: the set of node types a document is allowed to declare, and
//! the validator that checks a document against one.
//!
//! The original node-type and array-structure checks come from the
//! reference implementation; the required/unknown-property checks are
//! additions this crate needs that the reference snapshot didn't yet
//! implement.

use crate::document::{DataType, Document};
use crate::error::{
    not_declared_as_array_error, required_property_not_found_error, unknown_node_type_error,
    unknown_property_error, ErrorList,
};

/// Whether a schema property expects exactly one value or an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueStructure {
    Single,
    Array,
}

/// The expected shape of one property on a schema node type.
#[derive(Debug, Clone)]
pub struct SchemaNodeProperty {
    pub name: String,
    pub data_type: DataType,
    pub structure: ValueStructure,
    pub required: bool,
}

impl SchemaNodeProperty {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        SchemaNodeProperty {
            name: name.into(),
            data_type,
            structure: ValueStructure::Single,
            required: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.structure = ValueStructure::Array;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A node type the schema allows, and the properties it expects.
#[derive(Debug, Clone)]
pub struct SchemaNodeType {
    pub name: String,
    pub properties: Vec<SchemaNodeProperty>,
}

impl SchemaNodeType {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaNodeType {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: SchemaNodeProperty) -> Self {
        self.properties.push(property);
        self
    }
}

/// The set of node types a document may use.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub types: Vec<SchemaNodeType>,
}

impl Schema {
    pub fn new(types: Vec<SchemaNodeType>) -> Self {
        Schema { types }
    }

    fn find(&self, name: &str) -> Option<&SchemaNodeType> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// Validate a document against a schema, collecting every violation.
pub fn validate(schema: &Schema, document: &Document) -> ErrorList {
    let mut errors = ErrorList::new();

    for node in &document.nodes {
        let Some(schema_type) = schema.find(&node.node_type) else {
            errors.push(unknown_node_type_error(&node.node_type));
            continue;
        };

        for property in &node.properties {
            let Some(schema_property) = schema_type.properties.iter().find(|p| p.name == property.name) else {
                errors.push(unknown_property_error(&node.name, &property.name));
                continue;
            };

            if schema_property.structure == ValueStructure::Single && property.values.len() != 1 {
                errors.push(not_declared_as_array_error(&property.name));
            }
        }

        for schema_property in &schema_type.properties {
            if schema_property.required && node.property(&schema_property.name).is_none() {
                errors.push(required_property_not_found_error(&node.name, &schema_property.name));
            }
        }
    }

    errors
}
