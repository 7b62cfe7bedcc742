//! The syntax tree produced by the parser and mutated by the transformer.

use smallvec::SmallVec;

/// Data types a raw property value can be inferred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Bool,
    Int,
    Float,
    String,
    NodeRef,
}

/// An `<= Parent` inheritance clause on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inheritance {
    pub from: String,
}

/// A raw, string-valued node property, as produced by the parser.
///
/// `values` holds one entry for scalar properties and more than one for
/// arrays; empty arrays are not expressible by the grammar, so this is
/// always non-empty. Most properties are scalar, so a `SmallVec` with
/// inline capacity for one value avoids a heap allocation for the common
/// case.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeProperty {
    pub name: String,
    pub values: SmallVec<[String; 1]>,
    pub data_type: DataType,
    /// Whether this property was declared with the `[]` array marker.
    /// Independent of `values.len()`: `key[]: { 5 }` is a one-element
    /// array, not a scalar.
    pub is_array: bool,
}

impl NodeProperty {
    pub fn is_array(&self) -> bool {
        self.is_array
    }
}

/// A node, as parsed: `<Type> Name [<= Parent]` followed by indented
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub node_type: String,
    pub name: String,
    pub properties: Vec<NodeProperty>,
    pub inheritance: Option<Inheritance>,
}

impl Node {
    pub fn new(node_type: impl Into<String>) -> Self {
        Node {
            node_type: node_type.into(),
            name: String::new(),
            properties: Vec::new(),
            inheritance: None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The parsed document: an ordered sequence of nodes. Insertion order is
/// the source declaration order and is preserved through every later
/// stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }
}
