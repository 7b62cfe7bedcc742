//! Deserializer: the final stage, converting a validated [`Document`]
//! into caller-defined structures via a small handle-based protocol.
//!
//! Coverage is checked in a dedicated pass before any handle runs: if
//! even one node type in the document has no registered handle, nothing
//! is deserialized and the caller gets back every missing type at once,
//! rather than partially running side effects before discovering a gap.

use std::collections::BTreeMap;

use crate::document::{DataType, Document, Node, NodeProperty};
use crate::error::{cannot_deserialize_node_error, ErrorList};

/// A deserialized reference to another node, carried by `&`-marked
/// properties.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub references: String,
}

/// The value of one deserialized property.
#[derive(Debug, Clone, PartialEq)]
pub enum DeserializedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    NodeRef(NodeRef),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    StringArray(Vec<String>),
}

/// A single deserialized property.
#[derive(Debug, Clone, PartialEq)]
pub struct DeserializedNodeProperty {
    pub value: DeserializedValue,
}

/// A node after deserialization: its name plus its properties, keyed by
/// name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeserializedNode {
    pub name: String,
    pub properties: BTreeMap<String, DeserializedNodeProperty>,
}

impl DeserializedNode {
    pub fn get(&self, name: &str) -> Option<&DeserializedValue> {
        self.properties.get(name).map(|p| &p.value)
    }
}

/// A callback registered for one node type.
pub struct DeserializationHandle {
    pub node_type: String,
    pub handle: Box<dyn Fn(&DeserializedNode)>,
}

impl DeserializationHandle {
    pub fn new(node_type: impl Into<String>, handle: impl Fn(&DeserializedNode) + 'static) -> Self {
        DeserializationHandle {
            node_type: node_type.into(),
            handle: Box::new(handle),
        }
    }
}

/// A caller-assembled set of handles, one per node type it knows how to
/// consume.
#[derive(Default)]
pub struct DeserializationProtocol {
    pub handles: Vec<DeserializationHandle>,
}

impl DeserializationProtocol {
    pub fn new() -> Self {
        DeserializationProtocol { handles: Vec::new() }
    }

    pub fn on(mut self, node_type: impl Into<String>, handle: impl Fn(&DeserializedNode) + 'static) -> Self {
        self.handles.push(DeserializationHandle::new(node_type, handle));
        self
    }
}

/// Deserialize every node in `document` through `protocol`.
pub fn deserialize(protocol: &DeserializationProtocol, document: &Document) -> ErrorList {
    let mut errors = ErrorList::new();

    for node in &document.nodes {
        if !protocol.handles.iter().any(|h| h.node_type == node.node_type) {
            errors.push(cannot_deserialize_node_error(&node.node_type));
        }
    }

    if !errors.is_empty() {
        return errors;
    }

    for node in &document.nodes {
        let deserialized = generate_node(node);
        for handle in &protocol.handles {
            if handle.node_type == node.node_type {
                (handle.handle)(&deserialized);
            }
        }
    }

    errors
}

fn generate_node(node: &Node) -> DeserializedNode {
    let mut properties = BTreeMap::new();
    for property in &node.properties {
        properties.insert(
            property.name.clone(),
            DeserializedNodeProperty {
                value: to_value(property),
            },
        );
    }
    DeserializedNode {
        name: node.name.clone(),
        properties,
    }
}

fn to_value(property: &NodeProperty) -> DeserializedValue {
    if property.values.len() > 1 {
        return match property.data_type {
            DataType::Int => DeserializedValue::IntArray(property.values.iter().map(|v| parse_int(v)).collect()),
            DataType::Float => {
                DeserializedValue::FloatArray(property.values.iter().map(|v| parse_float(v)).collect())
            }
            DataType::String => DeserializedValue::StringArray(property.values.iter().cloned().collect()),
            DataType::Bool | DataType::NodeRef => {
                unreachable!("data type not allowed in arrays: {:?}", property.data_type)
            }
        };
    }

    let raw = &property.values[0];
    match property.data_type {
        DataType::Bool => DeserializedValue::Bool(raw == "true"),
        DataType::Float => DeserializedValue::Float(parse_float(raw)),
        DataType::Int => DeserializedValue::Int(parse_int(raw)),
        DataType::NodeRef => DeserializedValue::NodeRef(NodeRef {
            references: raw.clone(),
        }),
        DataType::String => DeserializedValue::String(raw.clone()),
    }
}

fn parse_int(raw: &str) -> i64 {
    raw.parse()
        .unwrap_or_else(|_| panic!("tokenizer classified {:?} as an integer", raw))
}

fn parse_float(raw: &str) -> f64 {
    raw.parse()
        .unwrap_or_else(|_| panic!("tokenizer classified {:?} as a float", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use smallvec::smallvec;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn node(node_type: &str, name: &str) -> Node {
        let mut n = Node::new(node_type.to_string());
        n.name = name.to_string();
        n
    }

    #[test]
    fn missing_handle_is_reported_without_running_any() {
        let protocol = DeserializationProtocol::new();
        let doc = Document::new(vec![node("Cube", "A")]);
        let errors = deserialize(&protocol, &doc);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::CannotDeserializeNode);
    }

    #[test]
    fn scalar_values_convert() {
        let mut n = node("Cube", "A");
        n.properties.push(NodeProperty {
            name: "size".into(),
            values: smallvec!["5".into()],
            data_type: DataType::Int,
            is_array: false,
        });

        let seen: Rc<RefCell<Vec<DeserializedNode>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let protocol = DeserializationProtocol::new().on("Cube", move |n| {
            seen_clone.borrow_mut().push(n.clone());
        });

        let doc = Document::new(vec![n]);
        let errors = deserialize(&protocol, &doc);
        assert!(errors.is_empty());

        let captured = seen.borrow();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].get("size"), Some(&DeserializedValue::Int(5)));
    }

    #[test]
    fn array_values_convert() {
        let mut n = node("Cube", "A");
        n.properties.push(NodeProperty {
            name: "points".into(),
            values: smallvec!["1".into(), "2".into(), "3".into()],
            data_type: DataType::Int,
            is_array: true,
        });

        let seen: Rc<RefCell<Vec<DeserializedNode>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let protocol = DeserializationProtocol::new().on("Cube", move |n| {
            seen_clone.borrow_mut().push(n.clone());
        });

        let doc = Document::new(vec![n]);
        deserialize(&protocol, &doc);

        let captured = seen.borrow();
        assert_eq!(
            captured[0].get("points"),
            Some(&DeserializedValue::IntArray(vec![1, 2, 3]))
        );
    }

    #[test]
    fn single_element_array_marked_property_deserializes_as_a_scalar() {
        let mut n = node("Cube", "A");
        n.properties.push(NodeProperty {
            name: "points".into(),
            values: smallvec!["5".into()],
            data_type: DataType::Int,
            is_array: true,
        });

        let seen: Rc<RefCell<Vec<DeserializedNode>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let protocol = DeserializationProtocol::new().on("Cube", move |n| {
            seen_clone.borrow_mut().push(n.clone());
        });

        let doc = Document::new(vec![n]);
        deserialize(&protocol, &doc);

        let captured = seen.borrow();
        assert_eq!(captured[0].get("points"), Some(&DeserializedValue::Int(5)));
    }
}
