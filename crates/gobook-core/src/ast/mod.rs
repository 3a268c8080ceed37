//! Syntax tree for Go declarations
//!
//! Only the declaration level of a file is modelled in detail: package
//! clause, imports, constants, variables, types and function signatures.
//! Function bodies and initializer expressions are kept as source spans.
//! All nodes carry a [`Span`] into the file identified by [`File::file_id`].

mod comment;
mod decl;
mod types;

pub use comment::{Comment, CommentGroup, CommentKind};
pub use decl::*;
pub use types::*;

// Re-export Span from lexer for convenience
pub use crate::lexer::Span;

use crate::source::FileId;

/// A trait for syntax nodes that have associated source location information
pub trait Spanned {
    /// Returns the source span of this node
    fn span(&self) -> Span;
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// Whether the name starts with an upper-case letter
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// Whether a Go identifier is visible outside its package
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// An expression kept as raw source text (array lengths, initializers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expr {
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub const fn new(span: Span) -> Self {
        Self { span }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// One parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub file_id: FileId,
    /// Comment group directly above the package clause
    pub doc: Option<CommentGroup>,
    pub package: Ident,
    pub decls: Vec<Decl>,
}

impl File {
    /// Iterate over every function declaration in the file
    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Func(f) => Some(f),
            Decl::Gen(_) => None,
        })
    }

    /// Iterate over every generic declaration with the given keyword
    pub fn gen_decls(&self, keyword: DeclKeyword) -> impl Iterator<Item = &GenDecl> {
        self.decls.iter().filter_map(move |d| match d {
            Decl::Gen(g) if g.keyword == keyword => Some(g),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_names() {
        assert!(is_exported("Widget"));
        assert!(is_exported("Ünicode"));
        assert!(!is_exported("widget"));
        assert!(!is_exported("_Hidden"));
        assert!(!is_exported(""));
    }
}
