//! Top-level declarations

use super::{CommentGroup, Expr, FieldList, FuncType, Ident, Spanned, TypeExpr};
use crate::lexer::Span;

/// A top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Gen(GenDecl),
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        match self {
            Decl::Func(f) => f.span,
            Decl::Gen(g) => g.span,
        }
    }
}

/// A function or method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    /// Receiver list; `None` for plain functions
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    pub ty: FuncType,
    /// Span of the body including braces; `None` for external functions
    pub body: Option<Span>,
    /// Comment trailing the declaration on its last line
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

impl FuncDecl {
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.recv.is_some()
    }

    /// Name of the receiver's base type: `func (l *List[T]) Len()` yields `List`
    #[must_use]
    pub fn receiver_base(&self) -> Option<&str> {
        let recv = self.recv.as_ref()?;
        let field = recv.fields.first()?;
        field.ty.base_name().map(|i| i.name.as_str())
    }
}

/// The keyword that introduced a [`GenDecl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Import,
    Const,
    Var,
    Type,
}

impl DeclKeyword {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Const => "const",
            Self::Var => "var",
            Self::Type => "type",
        }
    }
}

impl std::fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import, const, var or type declaration, possibly grouped with `( ... )`
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub keyword: DeclKeyword,
    /// Span of `(` when the specs are grouped
    pub lparen: Option<Span>,
    pub specs: Vec<Spec>,
    pub span: Span,
}

impl GenDecl {
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.lparen.is_some()
    }
}

/// A single specification inside a [`GenDecl`]
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spanned for Spec {
    fn span(&self) -> Span {
        match self {
            Spec::Import(s) => s.span,
            Spec::Value(s) => s.span,
            Spec::Type(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    /// Local name, `.` or `_`
    pub name: Option<Ident>,
    /// Raw path literal including quotes
    pub path: String,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

/// `Name1, Name2 Type = value1, value2`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

/// `Name[TypeParams] Type` or `Name = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    /// True for alias declarations (`type A = B`)
    pub assign: bool,
    pub ty: TypeExpr,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}
