//! Parser error types

use crate::lexer::{Span, TokenKind};
use thiserror::Error;

/// A parser error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub span: Span,
    /// Optional hint for fixing the error
    pub hint: Option<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("unexpected token: found {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: ExpectedToken,
    },

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("expected declaration")]
    ExpectedDeclaration,

    #[error("expected identifier")]
    ExpectedIdentifier,

    #[error("expected type")]
    ExpectedType,

    #[error("expected expression")]
    ExpectedExpression,

    #[error("expected field name or embedded type")]
    ExpectedField,

    #[error("expected ';' or newline after {0}")]
    ExpectedSemicolon(&'static str),

    #[error("mixed named and unnamed parameters")]
    MixedParameters,

    #[error("missing parameter type")]
    MissingParameterType,
}

/// What token was expected
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedToken {
    /// A specific token kind
    Token(TokenKind),
    /// A description of what was expected
    Description(String),
}

impl std::fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedToken::Token(kind) => write!(f, "{kind}"),
            ExpectedToken::Description(desc) => write!(f, "{desc}"),
        }
    }
}
