//! gobook core - documentation engine for Go packages
//!
//! This crate provides:
//! - Lexer: tokenization of Go source with automatic semicolons
//! - AST: declaration-level syntax tree
//! - Parser: declarations, signatures and comment attachment (bodies skipped)
//! - Formatter: gofmt-style printing of declarations
//! - Doc: the extraction pipeline producing a [`PackageDoc`]
//! - Render: markdown pages built from a [`PackageDoc`]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of Go source code
pub mod lexer;

/// Source files and positions shared by parser and formatter
pub mod source;

/// Abstract Syntax Tree - declarations of a Go file
pub mod ast;

/// Parser module - converts tokens into AST
pub mod parser;

/// Declaration printer
pub mod formatter;

/// Documentation extraction
pub mod doc;

/// Markdown rendering
pub mod render;

pub use doc::{DocError, ExtractOptions, PackageDoc, Pipeline, TypeKind};
pub use parser::{ParseError, Parser};
pub use render::{RenderError, RenderOptions, RepoMeta, TemplateRenderer};
pub use source::{FileId, SourceMap};
