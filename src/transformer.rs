//! Transformer: resolves `<=` inheritance by copying a parent's
//! properties onto a child wherever the child doesn't already declare
//! its own value for that property name.
//!
//! Inheritance is resolved node-by-node with memoization rather than in
//! a single linear pass over declaration order, so that transitive
//! chains (`C <= B <= A`) compose correctly no matter which order the
//! nodes appear in the source: a child's own inherited set is only
//! computed once its parent's has been fully resolved.

use std::collections::{HashMap, HashSet};

use crate::document::{Document, NodeProperty};

/// Resolve inheritance across every node in `document`, in place.
pub fn transform(document: &mut Document) {
    let name_to_index: HashMap<String, usize> = document
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.name.clone(), i))
        .collect();

    let len = document.nodes.len();
    let mut resolved: Vec<Option<Vec<NodeProperty>>> = vec![None; len];
    let mut in_progress: HashSet<usize> = HashSet::new();

    for i in 0..len {
        if resolved[i].is_none() {
            let props = resolve(i, document, &name_to_index, &mut resolved, &mut in_progress);
            resolved[i] = Some(props);
        }
    }

    for (node, props) in document.nodes.iter_mut().zip(resolved.into_iter()) {
        node.properties = props.unwrap();
    }
}

fn resolve(
    index: usize,
    document: &Document,
    name_to_index: &HashMap<String, usize>,
    resolved: &mut Vec<Option<Vec<NodeProperty>>>,
    in_progress: &mut HashSet<usize>,
) -> Vec<NodeProperty> {
    if let Some(props) = &resolved[index] {
        return props.clone();
    }

    // A malformed (never user-reachable, since the semantic analyzer's
    // forward pass doesn't reject self-referential chains) inheritance
    // cycle would recurse forever without this guard; fall back to the
    // node's own properties rather than raising an error nobody can see.
    if !in_progress.insert(index) {
        return document.nodes[index].properties.clone();
    }

    let mut props = document.nodes[index].properties.clone();

    if let Some(inheritance) = &document.nodes[index].inheritance {
        if let Some(&parent_index) = name_to_index.get(&inheritance.from) {
            let parent_props = resolve(parent_index, document, name_to_index, resolved, in_progress);
            for parent_property in parent_props {
                if !props.iter().any(|p| p.name == parent_property.name) {
                    props.push(parent_property);
                }
            }
        }
        // A missing parent is reported by the semantic analyzer; the
        // transformer itself stays silent and just skips inheritance.
    }

    in_progress.remove(&index);
    resolved[index] = Some(props.clone());
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DataType, Inheritance, Node};
    use smallvec::smallvec;

    fn scalar(name: &str, value: &str, data_type: DataType) -> NodeProperty {
        NodeProperty {
            name: name.into(),
            values: smallvec![value.into()],
            data_type,
            is_array: false,
        }
    }

    #[test]
    fn child_inherits_parent_properties() {
        let mut parent = Node::new("Cube");
        parent.name = "A".into();
        parent.properties.push(scalar("size", "5", DataType::Int));

        let mut child = Node::new("Cube");
        child.name = "B".into();
        child.inheritance = Some(Inheritance { from: "A".into() });

        let mut document = Document::new(vec![parent, child]);
        transform(&mut document);

        assert_eq!(document.nodes[1].properties.len(), 1);
        assert_eq!(document.nodes[1].properties[0].name, "size");
    }

    #[test]
    fn child_own_property_is_not_overridden() {
        let mut parent = Node::new("Cube");
        parent.name = "A".into();
        parent.properties.push(scalar("size", "5", DataType::Int));

        let mut child = Node::new("Cube");
        child.name = "B".into();
        child.inheritance = Some(Inheritance { from: "A".into() });
        child.properties.push(scalar("size", "9", DataType::Int));

        let mut document = Document::new(vec![parent, child]);
        transform(&mut document);

        assert_eq!(document.nodes[1].properties.len(), 1);
        assert_eq!(document.nodes[1].properties[0].values[0], "9");
    }

    #[test]
    fn transitive_inheritance_composes_regardless_of_declaration_order() {
        // C inherits from B inherits from A, but declared out of order.
        let mut a = Node::new("Cube");
        a.name = "A".into();
        a.properties.push(scalar("depth", "1", DataType::Int));

        let mut c = Node::new("Cube");
        c.name = "C".into();
        c.inheritance = Some(Inheritance { from: "B".into() });

        let mut b = Node::new("Cube");
        b.name = "B".into();
        b.inheritance = Some(Inheritance { from: "A".into() });
        b.properties.push(scalar("width", "2", DataType::Int));

        let mut document = Document::new(vec![a, c, b]);
        transform(&mut document);

        let resolved_c = &document.nodes[1];
        let names: Vec<&str> = resolved_c.properties.iter().map(|p| p.name.as_str()).collect();
        assert!(names.contains(&"depth"));
        assert!(names.contains(&"width"));
    }

    #[test]
    fn missing_parent_is_a_silent_no_op() {
        let mut child = Node::new("Cube");
        child.name = "B".into();
        child.inheritance = Some(Inheritance { from: "Ghost".into() });

        let mut document = Document::new(vec![child]);
        transform(&mut document);
        assert!(document.nodes[0].properties.is_empty());
    }
}
