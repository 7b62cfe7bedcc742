//! Error taxonomy shared by every stage of the pipeline.
//!
//! Errors are values, not exceptional control flow: the early stages
//! (tokenizer, parser) return a single [`Error`] and abort at the first
//! problem, while the later stages collect every violation they find into
//! an `ErrorList` so a caller can fix more than one problem per run.

use thiserror::Error as ThisError;

use crate::token::{SourcePosition, Token, TokenKind};

/// The closed set of diagnostic codes HXL can raise. Numeric values are
/// part of the stable external interface and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    Empty = 100,
    InvalidEof = 101,
    UnexpectedToken = 105,
    SyntaxError = 107,
    IllegalWhitespace = 110,
    IllegalComment = 140,
    NodeReferenceNotFound = 230,
    /// Reserved: never raised. See `DESIGN.md`.
    CircularNodeReference = 231,
    IllegalInheritance = 251,
    IllegalReference = 252,
    NonUniqueNode = 500,
    NonUniqueProperty = 510,
    UnknownNodeType = 800,
    IllegalDataType = 830,
    RequiredPropertyNotFound = 900,
    UnknownProperty = 910,
    CannotDeserializeNode = 1000,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// A single diagnostic: a stable code plus a human-readable message.
///
/// The message formats are compatibility-sensitive (`spec.md` §6) and are
/// constructed by the free functions below rather than by a generic
/// `Display` impl, so that each call site matches the spec's wording
/// exactly.
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

/// A list of errors, as returned by the stages that collect rather than
/// abort (Semantic Analyzer, Schema Validator, Deserializer coverage).
pub type ErrorList = Vec<Error>;

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
        }
    }
}

/// `HXL_EMPTY` (100).
pub fn empty_source_error() -> Error {
    Error::new(ErrorCode::Empty, "Source is empty.")
}

/// `HXL_INVALID_EOF` (101).
pub fn invalid_eof_error() -> Error {
    Error::new(
        ErrorCode::InvalidEof,
        "Source must end with an empty line.",
    )
}

/// `HXL_SYNTAX_ERROR` (107), raised by the tokenizer: `[Line {L}] Unexpected token: {CHAR}`.
pub fn tokenizer_syntax_error(line: u16, c: char) -> Error {
    Error::new(
        ErrorCode::SyntaxError,
        format!("[Line {}] Unexpected token: {}", line, c),
    )
}

/// `HXL_ILLEGAL_WHITESPACE` (110): `[Line {L}] Illegal whitespace`.
pub fn illegal_whitespace_error(line: u16) -> Error {
    Error::new(
        ErrorCode::IllegalWhitespace,
        format!("[Line {}] Illegal whitespace", line),
    )
}

/// `HXL_ILLEGAL_COMMENT` (140): `[Line {L}] Illegal comment`.
pub fn illegal_comment_error(line: u16) -> Error {
    Error::new(
        ErrorCode::IllegalComment,
        format!("[Line {}] Illegal comment", line),
    )
}

/// `HXL_UNEXPECTED_TOKEN` (105), raised by the parser:
/// `[Line {L}, Col {C}] Unexpected token: {TEXT}`.
///
/// The column reported is the token's *start* column: the position
/// recorded on a token is where the tokenizer flushed it (the boundary
/// character that ended it), so we walk back by the rendered text's
/// length to recover the start, exactly as the original implementation's
/// `unexpectedTokenError` helper does.
pub fn unexpected_token_error(token: &Token) -> Error {
    let text = token_text(token);
    let mut col = token.position.col;
    col = col.saturating_sub(text.chars().count() as u16);
    Error::new(
        ErrorCode::UnexpectedToken,
        format!(
            "[Line {}, Col {}] Unexpected token: {}",
            token.position.line, col, text
        ),
    )
}

/// Render a token the way diagnostics expect: its value if it has one,
/// otherwise a name for the kind.
pub fn token_text(token: &Token) -> String {
    if let Some(value) = &token.value {
        return value.clone();
    }
    kind_name(token.kind).to_string()
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Delimiter => "T_DELIMITER",
        TokenKind::Punctuator => "T_PUNCTUATOR",
        TokenKind::Identifier => "T_IDENTIFIER",
        TokenKind::Whitespace => "T_WHITESPACE",
        TokenKind::Newline => "T_NEWLINE",
        TokenKind::Tab => "T_TAB",
        TokenKind::StringLiteral => "T_STRING_LITERAL",
        TokenKind::Int => "T_INT",
        TokenKind::Float => "T_FLOAT",
        TokenKind::Bool => "T_BOOL",
    }
}

/// `HXL_NON_UNIQUE_NODE` (500): `Node name "{N}" is not unique.`
pub fn non_unique_node_error(name: &str) -> Error {
    Error::new(
        ErrorCode::NonUniqueNode,
        format!("Node name \"{}\" is not unique.", name),
    )
}

/// `HXL_NON_UNIQUE_PROPERTY` (510): `Property "{P}" under "{N}" is not unique.`
pub fn non_unique_property_error(property: &str, node: &str) -> Error {
    Error::new(
        ErrorCode::NonUniqueProperty,
        format!("Property \"{}\" under \"{}\" is not unique.", property, node),
    )
}

/// `HXL_NODE_REFERENCE_NOT_FOUND` (230): `Referenced node "{T}" under {N}:{P} was not found.`
pub fn node_reference_not_found_error(target: &str, node: &str, property: &str) -> Error {
    Error::new(
        ErrorCode::NodeReferenceNotFound,
        format!(
            "Referenced node \"{}\" under {}:{} was not found.",
            target, node, property
        ),
    )
}

/// `HXL_ILLEGAL_REFERENCE` (252): `{N}:{P} is referencing itself.`
pub fn illegal_reference_error(node: &str, property: &str) -> Error {
    Error::new(
        ErrorCode::IllegalReference,
        format!("{}:{} is referencing itself.", node, property),
    )
}

/// `HXL_ILLEGAL_INHERITANCE` (251): `Node {N} attempts to inherit {P} which does not exist.`
pub fn illegal_inheritance_error(node: &str, parent: &str) -> Error {
    Error::new(
        ErrorCode::IllegalInheritance,
        format!(
            "Node {} attempts to inherit {} which does not exist.",
            node, parent
        ),
    )
}

/// `HXL_UNKNOWN_NODE_TYPE` (800): `Node type not declared in schema: {T}`.
pub fn unknown_node_type_error(node_type: &str) -> Error {
    Error::new(
        ErrorCode::UnknownNodeType,
        format!("Node type not declared in schema: {}", node_type),
    )
}

/// `HXL_UNKNOWN_PROPERTY` (910): `Node {N} has an unknown property: {P}`.
pub fn unknown_property_error(node: &str, property: &str) -> Error {
    Error::new(
        ErrorCode::UnknownProperty,
        format!("Node {} has an unknown property: {}", node, property),
    )
}

/// `HXL_REQUIRED_PROPERTY_NOT_FOUND` (900): `Node {N} is missing required property: {P}`.
pub fn required_property_not_found_error(node: &str, property: &str) -> Error {
    Error::new(
        ErrorCode::RequiredPropertyNotFound,
        format!("Node {} is missing required property: {}", node, property),
    )
}

/// `HXL_ILLEGAL_DATA_TYPE` (830): `Property not declared as array: {P}`.
pub fn not_declared_as_array_error(property: &str) -> Error {
    Error::new(
        ErrorCode::IllegalDataType,
        format!("Property not declared as array: {}", property),
    )
}

/// `HXL_CANNOT_DESERIALIZE_NODE` (1000): `Missing deserializer for: {T}`.
pub fn cannot_deserialize_node_error(node_type: &str) -> Error {
    Error::new(
        ErrorCode::CannotDeserializeNode,
        format!("Missing deserializer for: {}", node_type),
    )
}

/// Also exposes `SourcePosition` for callers building their own diagnostics
/// (e.g. the CLI).
pub type Position = SourcePosition;

#[cfg(test)]
mod test {
    use super::*;
    use crate::token::SourcePosition;

    #[test]
    fn unexpected_token_strips_value_length_from_column() {
        let token = Token {
            kind: TokenKind::Identifier,
            value: Some("NodeName".to_string()),
            position: SourcePosition { line: 1, col: 20 },
        };
        let err = unexpected_token_error(&token);
        assert_eq!(err.code, ErrorCode::UnexpectedToken);
        assert_eq!(
            err.message,
            "[Line 1, Col 12] Unexpected token: NodeName"
        );
    }

    #[test]
    fn tokenizer_error_has_only_line() {
        let err = tokenizer_syntax_error(3, '?');
        assert_eq!(err.message, "[Line 3] Unexpected token: ?");
    }
}
