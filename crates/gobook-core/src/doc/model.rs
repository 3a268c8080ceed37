//! The documentation model handed to renderers
//!
//! Built fresh for every extraction and never mutated afterwards. Every list
//! keeps declaration order.

use serde::{Deserialize, Serialize};

use super::classify::TypeKind;

/// Documentation of one package
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDoc {
    pub name: String,
    /// Always `<import root>/<requested package name>`
    pub import_path: String,
    pub doc: String,
    pub functions: Vec<FunctionDoc>,
    pub types: Vec<TypeDoc>,
    pub constants: Vec<ValueDoc>,
    pub variables: Vec<ValueDoc>,
    /// Declarations printed with a fallback signature
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format_warnings: Vec<FormatWarning>,
}

impl PackageDoc {
    /// Whether there is nothing to document besides the package itself
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
            && self.types.is_empty()
            && self.constants.is_empty()
            && self.variables.is_empty()
    }

    /// Total number of methods across all types
    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}

/// A function or method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDoc {
    pub name: String,
    pub doc: String,
    pub signature: String,
}

/// A declared type with its members and methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDoc {
    pub name: String,
    pub doc: String,
    /// The full declaration, `type Name ...`
    pub decl: String,
    pub kind: TypeKind,
    /// Struct members; empty for every other kind
    pub fields: Vec<FieldDoc>,
    pub methods: Vec<FunctionDoc>,
    /// Right-hand side of non-struct, non-interface types
    pub underlying: String,
}

/// A struct member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDoc {
    /// Field name, or the bare type name of an embedded field
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Raw tag literal including its quotes
    pub tag: String,
    pub doc: String,
}

/// One name of a constant or variable declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDoc {
    pub name: String,
    /// Doc comment of the enclosing declaration
    pub doc: String,
    pub decl: String,
}

/// A declaration that could not be printed faithfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatWarning {
    /// What was being printed, e.g. `func New` or `field Widget.ID`
    pub item: String,
    pub reason: String,
}
