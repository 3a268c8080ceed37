//! Classification of type declarations by their right-hand side

use serde::{Deserialize, Serialize};

use crate::ast::{TypeExpr, TypeExprKind};

/// The shape of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Interface,
    Function,
    /// Arrays and slices
    Array,
    Map,
    Channel,
    /// Any other named type: basic types, pointers, other named types
    Type,
}

impl TypeKind {
    /// Classify the type on the right-hand side of a type declaration
    pub fn classify(ty: &TypeExpr) -> Self {
        match &ty.kind {
            TypeExprKind::Struct(_) => TypeKind::Struct,
            TypeExprKind::Interface(_) => TypeKind::Interface,
            TypeExprKind::Func(_) => TypeKind::Function,
            TypeExprKind::Array { .. } | TypeExprKind::Slice(_) => TypeKind::Array,
            TypeExprKind::Map { .. } => TypeKind::Map,
            TypeExprKind::Chan { .. } => TypeKind::Channel,
            TypeExprKind::Name(_)
            | TypeExprKind::Qualified { .. }
            | TypeExprKind::Instance { .. }
            | TypeExprKind::Pointer(_)
            | TypeExprKind::Ellipsis(_)
            | TypeExprKind::Paren(_)
            | TypeExprKind::Union(_)
            | TypeExprKind::Tilde(_) => TypeKind::Type,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Function => "function",
            TypeKind::Array => "array",
            TypeKind::Map => "map",
            TypeKind::Channel => "channel",
            TypeKind::Type => "type",
        }
    }

    /// Only structs list their members
    pub const fn has_members(self) -> bool {
        matches!(self, TypeKind::Struct)
    }

    /// Everything but structs and interfaces reports its underlying type
    pub const fn has_underlying(self) -> bool {
        !matches!(self, TypeKind::Struct | TypeKind::Interface)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DeclKeyword, Spec};
    use crate::parser::Parser;
    use crate::source::SourceMap;

    fn kinds(source: &str) -> Vec<TypeKind> {
        let mut map = SourceMap::new();
        let id = map.add_file("k.go", source);
        let file = Parser::parse_file(source, id).unwrap();
        file.gen_decls(DeclKeyword::Type)
            .flat_map(|d| d.specs.iter())
            .filter_map(|s| match s {
                Spec::Type(t) => Some(TypeKind::classify(&t.ty)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn classifies_every_shape() {
        let source = "package p\ntype (\n\tS struct{}\n\tI interface{}\n\tF func()\n\tA [4]int\n\tL []string\n\tM map[string]int\n\tC chan int\n\tN int\n\tP *S\n\tQ time.Duration\n\tG List[int]\n\tX = S\n)\n";
        assert_eq!(
            kinds(source),
            vec![
                TypeKind::Struct,
                TypeKind::Interface,
                TypeKind::Function,
                TypeKind::Array,
                TypeKind::Array,
                TypeKind::Map,
                TypeKind::Channel,
                TypeKind::Type,
                TypeKind::Type,
                TypeKind::Type,
                TypeKind::Type,
                TypeKind::Type,
            ]
        );
    }

    #[test]
    fn members_and_underlying_are_exclusive() {
        for kind in [
            TypeKind::Struct,
            TypeKind::Interface,
            TypeKind::Function,
            TypeKind::Array,
            TypeKind::Map,
            TypeKind::Channel,
            TypeKind::Type,
        ] {
            assert!(!(kind.has_members() && kind.has_underlying()), "{kind}");
        }
        assert!(!TypeKind::Interface.has_members());
        assert!(!TypeKind::Interface.has_underlying());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TypeKind::Channel).unwrap(), "\"channel\"");
    }
}
