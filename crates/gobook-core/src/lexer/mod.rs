//! Lexer for Go source files
//!
//! The lexer converts source code into a stream of tokens, handling:
//! - Keywords, identifiers, and operators
//! - Numeric, string, and rune literals
//! - Comments (line and block), which are kept in the stream
//! - Automatic semicolon insertion at line ends

#![allow(clippy::cast_possible_truncation)] // offsets are stored as u32 in `Span`

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// The source text of the token; "\n" for inserted semicolons
    pub lexeme: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }

    /// True for a semicolon the lexer inserted at a line end
    #[must_use]
    pub fn is_implicit_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.lexeme != ";"
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("malformed rune literal")]
    MalformedRune,
}

/// A lexer error with location information
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// The Go lexer
pub struct Lexer<'source> {
    source: &'source str,
    /// Current position in the source (byte offset)
    position: usize,
    /// Whether a line break here would end a statement
    insert_semi: bool,
    /// Collected errors during lexing
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            insert_semi: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors.
    ///
    /// Newlines never appear in the output; they either become semicolons or
    /// are dropped. Comments are preserved. The last token is always `Eof`.
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.collect_all();
        (tokens, lexer.errors)
    }

    /// Collect all tokens from the source
    pub fn collect_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let Some(raw) = self.next_raw() else {
                let end = self.source.len() as u32;
                if self.insert_semi {
                    tokens.push(Token::new(TokenKind::Semicolon, Span::at(end), "\n"));
                }
                tokens.push(Token::new(TokenKind::Eof, Span::at(end), ""));
                return tokens;
            };

            match raw.kind {
                TokenKind::Newline => {
                    if self.insert_semi {
                        self.insert_semi = false;
                        tokens.push(Token::new(TokenKind::Semicolon, raw.span, "\n"));
                    }
                }
                TokenKind::LineComment => tokens.push(raw),
                TokenKind::BlockComment => {
                    let spans_lines = raw.lexeme.contains('\n');
                    let end = raw.span.end;
                    tokens.push(raw);
                    if self.insert_semi && spans_lines {
                        self.insert_semi = false;
                        tokens.push(Token::new(TokenKind::Semicolon, Span::at(end), "\n"));
                    }
                }
                kind => {
                    self.insert_semi = kind.ends_statement();
                    tokens.push(raw);
                }
            }
        }
    }

    /// Lex the next raw token using logos, or None at end of input
    fn next_raw(&mut self) -> Option<Token> {
        if self.position >= self.source.len() {
            return None;
        }

        let remaining = &self.source[self.position..];
        let mut logos_lexer = TokenKind::lexer(remaining);

        match logos_lexer.next() {
            Some(Ok(kind)) => {
                // span is relative to remaining, after any skipped whitespace
                let span_range = logos_lexer.span();
                let start = self.position + span_range.start;
                let end = self.position + span_range.end;
                self.position = end;
                Some(Token::new(
                    kind,
                    Span::from_range(start..end),
                    logos_lexer.slice(),
                ))
            }
            Some(Err(())) => {
                let start = self.position + logos_lexer.span().start;
                Some(self.recover(start))
            }
            None => {
                // Only trailing whitespace remained
                self.position = self.source.len();
                None
            }
        }
    }

    /// Produce an error token for malformed input starting at `start`
    fn recover(&mut self, start: usize) -> Token {
        let rest = &self.source[start..];
        let (error, len) = if rest.starts_with("/*") {
            (LexError::UnterminatedBlockComment, rest.len())
        } else if rest.starts_with('`') {
            (LexError::UnterminatedRawString, rest.len())
        } else if rest.starts_with('"') {
            let len = rest.find('\n').unwrap_or(rest.len());
            (LexError::UnterminatedString, len)
        } else if rest.starts_with('\'') {
            let len = rest.find('\n').unwrap_or(rest.len());
            (LexError::MalformedRune, len)
        } else {
            let c = rest.chars().next().unwrap_or('\0');
            (LexError::UnexpectedChar(c), c.len_utf8().max(1))
        };

        let end = (start + len).min(self.source.len());
        self.position = end;
        // An error token still ends a statement so the parser reports it in place
        self.insert_semi = true;
        let span = Span::from_range(start..end);
        self.errors.push(SpannedError::new(error, span));
        Token::new(TokenKind::Error, span, &self.source[start..end])
    }
}
