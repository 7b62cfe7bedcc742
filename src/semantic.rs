//! Semantic analyzer: structural checks that go beyond the grammar.
//!
//! Unlike the tokenizer and parser, this stage collects every violation
//! it finds rather than aborting on the first one, so a single run can
//! report more than one problem. It never raises
//! [`ErrorCode::CircularNodeReference`]: resolving whether a reference or
//! inheritance chain forms a cycle would need a second, backward-looking
//! pass, and nothing downstream depends on that distinction, so only a
//! single forward pass over declaration order is made.

use std::collections::HashSet;

use crate::document::{DataType, Document};
use crate::error::{
    illegal_inheritance_error, illegal_reference_error, node_reference_not_found_error,
    non_unique_node_error, non_unique_property_error, ErrorList,
};

/// Run every semantic check against a parsed document.
///
/// A single forward pass over declaration order grows `seen_names` one
/// node at a time; a node's inheritance clause and `&`-references are
/// checked against only the names seen *before* it, so forward
/// references (to a node declared later, or to itself, since a node's
/// own name isn't inserted until after it's been checked) are rejected
/// exactly like references to a name that never appears at all.
pub fn analyze(document: &Document) -> ErrorList {
    let mut errors = ErrorList::new();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for node in &document.nodes {
        if let Some(inheritance) = &node.inheritance {
            if !seen_names.contains(inheritance.from.as_str()) {
                errors.push(illegal_inheritance_error(&node.name, &inheritance.from));
            }
        }

        let mut seen_props: HashSet<&str> = HashSet::new();
        for property in &node.properties {
            if !seen_props.insert(property.name.as_str()) {
                errors.push(non_unique_property_error(&property.name, &node.name));
            }

            if property.data_type != DataType::NodeRef {
                continue;
            }
            for target in &property.values {
                if target == &node.name {
                    errors.push(illegal_reference_error(&node.name, &property.name));
                } else if !seen_names.contains(target.as_str()) {
                    errors.push(node_reference_not_found_error(target, &node.name, &property.name));
                }
            }
        }

        if !seen_names.insert(node.name.as_str()) {
            errors.push(non_unique_node_error(&node.name));
        }
    }

    errors
}
