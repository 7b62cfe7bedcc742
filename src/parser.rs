//! Parser: turns a token stream into a [`Document`] syntax tree.
//!
//! The grammar is line-oriented rather than expression-oriented, so
//! rather than a recursive-descent parser this walks the token stream
//! once while tracking a small "grammatical context" state machine: what
//! kind of token we just saw, and what that implies about what can
//! legally come next. Any token that doesn't fit the current context is
//! an `UNEXPECTED_TOKEN` error.

use smallvec::SmallVec;

use crate::document::{DataType, Document, Inheritance, Node, NodeProperty};
use crate::error::{empty_source_error, invalid_eof_error, not_declared_as_array_error, unexpected_token_error, Error};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrammaticalContext {
    StartOfLine,
    PropertyKey,
    PropertyValue,
    NodeType,
    Inheritance,
    AfterNodeType,
    AfterNodeName,
    ExpandingArrayExpectsValue,
    ExpandingArrayGotValue,
    EndedArrayExpansion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sentence {
    NotDetermined,
    Node,
    NodeProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertySpecialization {
    None,
    Reference,
    Array,
}

struct BuildingProperty {
    key: String,
    specialization: PropertySpecialization,
    values: SmallVec<[String; 1]>,
    data_type: Option<DataType>,
}

impl BuildingProperty {
    fn new(key: String) -> Self {
        BuildingProperty {
            key,
            specialization: PropertySpecialization::None,
            values: SmallVec::new(),
            data_type: None,
        }
    }

    fn push_value(&mut self, token: &Token) {
        let Some(value) = &token.value else { return };
        self.values.push(value.clone());

        if self.specialization == PropertySpecialization::Reference {
            self.data_type = Some(DataType::NodeRef);
            return;
        }

        self.data_type = Some(match token.kind {
            TokenKind::StringLiteral => DataType::String,
            TokenKind::Bool => DataType::Bool,
            TokenKind::Int => DataType::Int,
            TokenKind::Float => DataType::Float,
            _ => unreachable!("non-value token kind pushed as a property value"),
        });
    }
}

/// Parse a token stream into a [`Document`].
///
/// Fails fast on the first malformed token; parsing never produces a
/// partial document.
pub fn parse(tokens: &[Token]) -> Result<Document, Error> {
    if tokens.is_empty() {
        return Err(empty_source_error());
    }
    if tokens.last().unwrap().kind != TokenKind::Newline {
        return Err(invalid_eof_error());
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut current_node: Option<usize> = None;
    let mut context = GrammaticalContext::StartOfLine;
    let mut sentence = Sentence::NotDetermined;
    let mut building: Option<BuildingProperty> = None;

    for (i, token) in tokens.iter().enumerate() {
        let peek = tokens.get(i + 1);

        match token.kind {
            TokenKind::Delimiter => {
                let tk = token.value.as_deref().ok_or_else(|| unexpected_token_error(token))?;

                if context == GrammaticalContext::AfterNodeName && tk == "<=" {
                    context = GrammaticalContext::Inheritance;
                } else if context == GrammaticalContext::ExpandingArrayGotValue && tk == "," {
                    context = GrammaticalContext::ExpandingArrayExpectsValue;
                } else if sentence == Sentence::NotDetermined && tk == "<" {
                    context = GrammaticalContext::NodeType;
                    sentence = Sentence::Node;
                } else if context == GrammaticalContext::NodeType && tk == ">" {
                    context = GrammaticalContext::AfterNodeType;
                } else if context == GrammaticalContext::PropertyKey && tk == ":" {
                    context = GrammaticalContext::PropertyValue;
                    if let Some(peek) = peek {
                        if peek.kind != TokenKind::Whitespace {
                            return Err(unexpected_token_error(peek));
                        }
                    }
                } else if context == GrammaticalContext::PropertyKey && tk == "[]" {
                    building
                        .as_mut()
                        .ok_or_else(|| unexpected_token_error(token))?
                        .specialization = PropertySpecialization::Array;
                } else if context == GrammaticalContext::PropertyKey && tk == "&" {
                    building
                        .as_mut()
                        .ok_or_else(|| unexpected_token_error(token))?
                        .specialization = PropertySpecialization::Reference;
                } else {
                    return Err(unexpected_token_error(token));
                }
            }

            TokenKind::Punctuator => {
                let tk = token.value.as_deref().ok_or_else(|| unexpected_token_error(token))?;

                if context == GrammaticalContext::PropertyValue && tk == "{" {
                    let prop = building.as_ref().ok_or_else(|| unexpected_token_error(token))?;
                    if prop.specialization != PropertySpecialization::Array {
                        return Err(not_declared_as_array_error(&prop.key));
                    }
                    context = GrammaticalContext::ExpandingArrayExpectsValue;
                } else if context == GrammaticalContext::ExpandingArrayGotValue && tk == "}" {
                    context = GrammaticalContext::EndedArrayExpansion;
                } else {
                    return Err(unexpected_token_error(token));
                }
            }

            TokenKind::Identifier => {
                let tk = token.value.as_deref().ok_or_else(|| unexpected_token_error(token))?.to_string();

                match context {
                    GrammaticalContext::NodeType => {
                        nodes.push(Node::new(tk));
                        current_node = Some(nodes.len() - 1);
                    }
                    GrammaticalContext::Inheritance => {
                        let idx = current_node.ok_or_else(|| unexpected_token_error(token))?;
                        nodes[idx].inheritance = Some(Inheritance { from: tk });
                    }
                    GrammaticalContext::AfterNodeType => {
                        let idx = current_node.ok_or_else(|| unexpected_token_error(token))?;
                        nodes[idx].name = tk;
                        context = GrammaticalContext::AfterNodeName;
                    }
                    GrammaticalContext::PropertyKey => {
                        building = Some(BuildingProperty::new(tk));
                    }
                    GrammaticalContext::PropertyValue
                        if building
                            .as_ref()
                            .map(|b| b.specialization == PropertySpecialization::Reference)
                            .unwrap_or(false) =>
                    {
                        building.as_mut().unwrap().push_value(token);
                    }
                    _ => return Err(unexpected_token_error(token)),
                }
            }

            TokenKind::Whitespace => {
                if context == GrammaticalContext::PropertyKey {
                    return Err(unexpected_token_error(token));
                }
            }

            TokenKind::Newline => {
                if current_node.is_some() && sentence == Sentence::NodeProperty {
                    let prop = building.take().ok_or_else(|| unexpected_token_error(token))?;
                    let data_type = prop.data_type.ok_or_else(|| unexpected_token_error(token))?;
                    let idx = current_node.unwrap();
                    nodes[idx].properties.push(NodeProperty {
                        name: prop.key,
                        values: prop.values,
                        data_type,
                        is_array: prop.specialization == PropertySpecialization::Array,
                    });
                }
                context = GrammaticalContext::StartOfLine;
                sentence = Sentence::NotDetermined;
                building = None;
            }

            TokenKind::Tab => match context {
                GrammaticalContext::StartOfLine => {
                    if current_node.is_none() {
                        return Err(unexpected_token_error(token));
                    }
                    context = GrammaticalContext::PropertyKey;
                    sentence = Sentence::NodeProperty;
                }
                _ => return Err(unexpected_token_error(token)),
            },

            TokenKind::StringLiteral | TokenKind::Int | TokenKind::Float | TokenKind::Bool => {
                if context == GrammaticalContext::PropertyValue
                    || context == GrammaticalContext::ExpandingArrayExpectsValue
                {
                    building
                        .as_mut()
                        .ok_or_else(|| unexpected_token_error(token))?
                        .push_value(token);
                    context = GrammaticalContext::ExpandingArrayGotValue;
                } else {
                    return Err(unexpected_token_error(token));
                }
            }
        }
    }

    Ok(Document::new(nodes))
}
