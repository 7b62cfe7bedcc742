//! Tokenizer: breaks an HXL source string into a flat stream of [`Token`]s.
//!
//! The source is scanned once, left to right, maintaining a small
//! character buffer that accumulates the current run of digits or
//! letters. Structural characters (delimiters, punctuators, whitespace,
//! newlines) flush that buffer into a token before being handled
//! themselves, following the state machine described in `spec.md` §4.1.

use crate::error::{illegal_comment_error, illegal_whitespace_error, tokenizer_syntax_error, Error};
use crate::newtypes::TabWidth;
use crate::token::{SourcePosition, Token, TokenKind};

/// How the in-progress character buffer currently looks. `Bool` and
/// `String` tokens are resolved at flush time (by exact text, and by the
/// quote-delimited scanning context, respectively) rather than tracked
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BufferKind {
    Empty,
    Integer,
    Float,
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Ordinary scanning.
    None,
    /// Inside a `"..."` string literal.
    StringLiteral,
    /// At the start of a line, before any non-whitespace character.
    Indentation,
}

struct Scanner<'a> {
    chars: &'a [char],
    tokens: Vec<Token>,
    buffer: String,
    buffer_kind: BufferKind,
    context: Context,
    line: u16,
    col: u16,
    /// Count of consecutive leading spaces seen so far on this line,
    /// used to detect the exactly-four-spaces indent fold.
    leading_spaces: u16,
    /// Line on which the current string literal's opening quote sits,
    /// used to report `ILLEGAL_WHITESPACE` at the right line if a raw
    /// newline is found inside the string.
    string_start_line: u16,
}

/// Tokenize an HXL source string.
///
/// The returned stream ends in a [`TokenKind::Newline`] whenever the
/// source is non-empty and well-formed; no synthetic end-of-file token is
/// ever emitted. On failure, a single [`Error`] is returned and no
/// partial token list is produced.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let chars: Vec<char> = source.chars().collect();
    let mut scanner = Scanner {
        chars: &chars,
        tokens: Vec::with_capacity(200),
        buffer: String::with_capacity(50),
        buffer_kind: BufferKind::Empty,
        context: Context::Indentation,
        line: 1,
        col: 0,
        leading_spaces: 0,
        string_start_line: 1,
    };
    scanner.run()?;
    Ok(scanner.tokens)
}

impl<'a> Scanner<'a> {
    fn pos(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            col: self.col,
        }
    }

    fn peek(&self, i: usize) -> Option<char> {
        let next = self.chars.get(i + 1).copied();
        match next {
            Some('\n') | None => None,
            some => some,
        }
    }

    fn run(&mut self) -> Result<(), Error> {
        let mut i = 0;
        while i < self.chars.len() {
            let c = self.chars[i];
            let was_indentation = self.context == Context::Indentation;

            if self.context == Context::StringLiteral {
                if c == '"' {
                    self.context = Context::None;
                    let value = std::mem::take(&mut self.buffer);
                    self.tokens
                        .push(Token::new(TokenKind::StringLiteral, Some(value), self.pos()));
                } else if c == '\n' {
                    return Err(illegal_whitespace_error(self.string_start_line));
                } else {
                    self.buffer.push(c);
                }
                self.advance(c);
                i += 1;
                continue;
            }

            if self.context == Context::Indentation && c != ' ' && c != '\r' {
                self.context = Context::None;
            }

            match c {
                '<' => {
                    self.flush_buffer()?;
                    if self.peek(i) == Some('=') {
                        self.tokens.push(Token::new(
                            TokenKind::Delimiter,
                            Some("<=".to_string()),
                            self.pos(),
                        ));
                        self.advance(c);
                        i += 1;
                        self.advance('=');
                        i += 1;
                        continue;
                    } else {
                        self.tokens
                            .push(Token::new(TokenKind::Delimiter, Some("<".to_string()), self.pos()));
                    }
                }
                '>' | ':' | ',' | '&' => {
                    self.flush_buffer()?;
                    self.tokens
                        .push(Token::new(TokenKind::Delimiter, Some(c.to_string()), self.pos()));
                }
                '[' => {
                    self.flush_buffer()?;
                    if self.peek(i) == Some(']') {
                        self.tokens.push(Token::new(
                            TokenKind::Delimiter,
                            Some("[]".to_string()),
                            self.pos(),
                        ));
                        self.advance(c);
                        i += 1;
                        self.advance(']');
                        i += 1;
                        continue;
                    } else {
                        self.tokens
                            .push(Token::new(TokenKind::Delimiter, Some("[".to_string()), self.pos()));
                    }
                }
                '"' => {
                    self.flush_buffer()?;
                    self.context = Context::StringLiteral;
                    self.string_start_line = self.line;
                }
                '{' | '}' => {
                    self.flush_buffer()?;
                    self.tokens
                        .push(Token::new(TokenKind::Punctuator, Some(c.to_string()), self.pos()));
                }
                '\t' => {
                    self.flush_buffer()?;
                    self.tokens.push(Token::new(TokenKind::Tab, None, self.pos()));
                }
                '\n' => {
                    self.flush_buffer()?;
                    self.tokens.push(Token::new(TokenKind::Newline, None, self.pos()));
                    self.line += 1;
                    self.col = 0;
                    self.leading_spaces = 0;
                    self.context = Context::Indentation;
                    i += 1;
                    continue;
                }
                ' ' => {
                    if self.context == Context::Indentation {
                        self.leading_spaces += 1;
                        if self.leading_spaces == TabWidth::default().get() as u16 {
                            self.tokens.push(Token::new(TokenKind::Tab, None, self.pos()));
                            self.context = Context::None;
                        }
                    } else {
                        self.flush_buffer()?;
                        self.tokens
                            .push(Token::new(TokenKind::Whitespace, None, self.pos()));
                    }
                }
                '\r' => {}
                '#' => {
                    i = self.handle_comment(i, was_indentation)?;
                    continue;
                }
                _ => {
                    self.accumulate(c)?;
                }
            }

            self.advance(c);
            i += 1;
        }

        Ok(())
    }

    fn advance(&mut self, _c: char) {
        self.col += 1;
    }

    fn accumulate(&mut self, c: char) -> Result<(), Error> {
        let is_digit = c.is_ascii_digit();
        let is_alpha = c.is_ascii_alphabetic();

        if (is_digit || c == '-') && self.buffer_kind == BufferKind::Empty {
            self.buffer_kind = BufferKind::Integer;
        } else if c == '.' && self.buffer_kind == BufferKind::Integer {
            self.buffer_kind = BufferKind::Float;
        } else if is_alpha || (c == '_' && self.buffer_kind == BufferKind::Identifier) {
            self.buffer_kind = BufferKind::Identifier;
        } else if is_digit
            && matches!(
                self.buffer_kind,
                BufferKind::Integer | BufferKind::Float | BufferKind::Identifier
            )
        {
            // Extend the current numeric/identifier run; classification unchanged.
        } else {
            return Err(tokenizer_syntax_error(self.line, c));
        }

        self.buffer.push(c);
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let value = std::mem::take(&mut self.buffer);
        let kind = if value == "true" || value == "false" {
            TokenKind::Bool
        } else {
            match self.buffer_kind {
                BufferKind::Integer => TokenKind::Int,
                BufferKind::Float => TokenKind::Float,
                BufferKind::Identifier => TokenKind::Identifier,
                BufferKind::Empty => unreachable!("buffer populated without a classification"),
            }
        };

        self.tokens.push(Token::new(kind, Some(value), self.pos()));
        self.buffer_kind = BufferKind::Empty;
        Ok(())
    }

    /// Handle a `#` comment. Returns the index of the character that
    /// should be processed next (the newline that ends the comment, or
    /// one past the end of source).
    fn handle_comment(&mut self, i: usize, was_indentation: bool) -> Result<usize, Error> {
        let line = self.line;

        if was_indentation {
            if self.leading_spaces > 0 {
                return Err(illegal_whitespace_error(line));
            }
            // `#` is the very first character of the line.
            if self.chars.get(i + 1) != Some(&' ') {
                return Err(illegal_whitespace_error(line));
            }
            self.require_nonempty_comment_text(i + 2, line)?;
        } else {
            let preceded_by_single_space =
                i > 0 && self.chars[i - 1] == ' ' && (i < 2 || self.chars[i - 2] != ' ');
            if !preceded_by_single_space {
                return Err(illegal_whitespace_error(line));
            }
            if self.chars.get(i + 1) != Some(&' ') {
                return Err(illegal_whitespace_error(line));
            }
            self.require_nonempty_comment_text(i + 2, line)?;
        }

        let end = self.end_of_line(i);

        self.col += (end - i) as u16;
        self.context = Context::None;
        Ok(end)
    }

    fn require_nonempty_comment_text(&self, from: usize, line: u16) -> Result<(), Error> {
        let text_end = self.end_of_line(from);
        let text: String = self.chars[from..text_end].iter().collect();
        if text.trim().is_empty() {
            return Err(illegal_comment_error(line));
        }
        Ok(())
    }

    /// Index of the next `\n` at or after `from`, or the end of source.
    fn end_of_line(&self, from: usize) -> usize {
        self.chars[from..]
            .iter()
            .position(|&c| c == '\n')
            .map(|rel| from + rel)
            .unwrap_or(self.chars.len())
    }
}
