//! Type expressions, field lists and function types

use super::{CommentGroup, Expr, Ident, Spanned};
use crate::lexer::Span;

/// A type expression with its source span
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

impl TypeExpr {
    #[must_use]
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The bare type name after removing pointers, parentheses, package
    /// qualifiers and type arguments: `*pkg.List[T]` yields `List`.
    #[must_use]
    pub fn base_name(&self) -> Option<&Ident> {
        match &self.kind {
            TypeExprKind::Name(ident) => Some(ident),
            TypeExprKind::Qualified { name, .. } => Some(name),
            TypeExprKind::Pointer(inner)
            | TypeExprKind::Paren(inner)
            | TypeExprKind::Instance { base: inner, .. } => inner.base_name(),
            _ => None,
        }
    }
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        self.span
    }
}

/// The different shapes a type expression can take
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// A named type: `string`, `Widget`
    Name(Ident),
    /// A type from another package: `io.Reader`
    Qualified { package: Ident, name: Ident },
    /// A generic instantiation: `List[int]`, `Pair[K, V]`
    Instance {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[N]T`; the length is `None` for `[...]T`
    Array {
        len: Option<Expr>,
        elem: Box<TypeExpr>,
    },
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `...T` in a variadic parameter
    Ellipsis(Box<TypeExpr>),
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(...) ...`
    Func(FuncType),
    /// `struct { ... }`
    Struct(FieldList),
    /// `interface { ... }`
    Interface(FieldList),
    /// `(T)`
    Paren(Box<TypeExpr>),
    /// A constraint union: `~int | ~string`
    Union(Vec<TypeExpr>),
    /// An underlying-type term: `~int`
    Tilde(Box<TypeExpr>),
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A function signature without its name
#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

/// A struct field, interface element, parameter or result
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    /// Empty for embedded fields and unnamed parameters
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    /// Raw tag literal including its quotes
    pub tag: Option<String>,
    pub comment: Option<CommentGroup>,
    pub span: Span,
}

impl Field {
    /// Field without names, docs or tags
    #[must_use]
    pub fn anonymous(ty: TypeExpr) -> Self {
        let span = ty.span;
        Self {
            doc: None,
            names: Vec::new(),
            ty,
            tag: None,
            comment: None,
            span,
        }
    }

    #[must_use]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

impl Spanned for Field {
    fn span(&self) -> Span {
        self.span
    }
}

/// A delimited list of fields: `(...)`, `[...]` or `{...}`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    /// Span of the opening delimiter
    pub opening: Span,
    pub fields: Vec<Field>,
    /// Span of the closing delimiter
    pub closing: Span,
}

impl FieldList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of names declared; an unnamed field counts once
    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.fields.iter().map(|f| f.names.len().max(1)).sum()
    }
}

impl Spanned for FieldList {
    fn span(&self) -> Span {
        self.opening.merge(self.closing)
    }
}
