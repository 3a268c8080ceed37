//! Printing declarations for the model, with fallbacks
//!
//! A declaration the formatter cannot print never stops extraction. It gets
//! a minimal synthetic signature instead, a `warn` log line, and an entry in
//! [`PackageDoc::format_warnings`](super::PackageDoc::format_warnings).

use tracing::warn;

use super::model::FormatWarning;
use crate::ast::{DeclKeyword, FuncDecl, TypeExpr, TypeSpec, ValueSpec};
use crate::formatter::{FormatError, Formatter};
use crate::source::{FileId, SourceMap};

/// Placeholder for type text that could not be printed
pub const ELISION: &str = "...";

/// Formats nodes of one package and collects fallback warnings
pub struct SignaturePrinter<'a> {
    map: &'a SourceMap,
    warnings: Vec<FormatWarning>,
}

impl<'a> SignaturePrinter<'a> {
    pub fn new(map: &'a SourceMap) -> Self {
        Self {
            map,
            warnings: Vec::new(),
        }
    }

    pub fn func(&mut self, file_id: FileId, decl: &FuncDecl) -> String {
        let name = &decl.name.name;
        let printed = Formatter::format_func(self.map, file_id, decl);
        self.or_fallback(printed, || format!("func {name}"), || {
            format!("func {name}({ELISION})")
        })
    }

    pub fn type_spec(&mut self, file_id: FileId, spec: &TypeSpec) -> String {
        let name = &spec.name.name;
        let printed = Formatter::format_type_spec(self.map, file_id, spec);
        self.or_fallback(printed, || format!("type {name}"), || {
            format!("type {name} {ELISION}")
        })
    }

    pub fn value_spec(&mut self, file_id: FileId, keyword: DeclKeyword, spec: &ValueSpec) -> String {
        let first = spec.names.first().map_or("", |n| n.name.as_str());
        let printed = Formatter::format_value_spec(self.map, file_id, keyword, spec);
        self.or_fallback(printed, || format!("{keyword} {first}"), || {
            format!("{keyword} {first} {ELISION}")
        })
    }

    /// A member or underlying type; `item` names it in warnings
    pub fn type_expr(&mut self, file_id: FileId, ty: &TypeExpr, item: impl FnOnce() -> String) -> String {
        let printed = Formatter::format_type(self.map, file_id, ty);
        self.or_fallback(printed, item, || ELISION.to_string())
    }

    pub fn into_warnings(self) -> Vec<FormatWarning> {
        self.warnings
    }

    fn or_fallback(
        &mut self,
        printed: Result<String, FormatError>,
        item: impl FnOnce() -> String,
        fallback: impl FnOnce() -> String,
    ) -> String {
        match printed {
            Ok(text) => text,
            Err(e) => {
                let item = item();
                warn!(item = %item, error = %e, "falling back to synthetic signature");
                self.warnings.push(FormatWarning {
                    item,
                    reason: e.to_string(),
                });
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn unknown_file_falls_back() {
        let source = "package p\nfunc New() *Widget\n";
        let mut map = SourceMap::new();
        let id = map.add_file("w.go", source);
        let file = Parser::parse_file(source, id).unwrap();
        let decl = file.funcs().next().unwrap();

        let empty = SourceMap::new();
        let mut printer = SignaturePrinter::new(&empty);
        assert_eq!(printer.func(id, decl), "func New(...)");
        let warnings = printer.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "func New");
    }

    #[test]
    fn printed_text_is_passed_through() {
        let source = "package p\nfunc New() *Widget\n";
        let mut map = SourceMap::new();
        let id = map.add_file("w.go", source);
        let file = Parser::parse_file(source, id).unwrap();
        let decl = file.funcs().next().unwrap();

        let mut printer = SignaturePrinter::new(&map);
        assert_eq!(printer.func(id, decl), "func New() *Widget");
        assert!(printer.into_warnings().is_empty());
    }
}
