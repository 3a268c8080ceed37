//! Documentation extractor - walks a parsed package and builds the model

use std::collections::HashMap;

use tracing::debug;

use super::classify::TypeKind;
use super::fields::FieldExtractor;
use super::model::{FunctionDoc, PackageDoc, TypeDoc, ValueDoc};
use super::package::ParsedPackage;
use super::signature::SignaturePrinter;
use crate::ast::{
    is_exported, CommentGroup, Decl, DeclKeyword, FuncDecl, GenDecl, Spec, TypeExprKind,
};
use crate::source::FileId;

/// Name prefixes of functions run by `go test`
const TEST_PREFIXES: &[&str] = &["Test", "Benchmark"];

/// What to include in the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Also document unexported declarations
    pub include_unexported: bool,
}

/// Builds a [`PackageDoc`] from a parsed package
pub struct DocExtractor;

impl DocExtractor {
    /// Visit every declaration once, in file and declaration order
    pub fn extract(pkg: &ParsedPackage, import_path: String, options: &ExtractOptions) -> PackageDoc {
        let mut state = State {
            printer: SignaturePrinter::new(&pkg.map),
            options: *options,
            doc: PackageDoc {
                name: pkg.name.clone(),
                import_path,
                doc: pkg.doc(),
                ..PackageDoc::default()
            },
            type_index: HashMap::new(),
            methods: Vec::new(),
        };

        for file in &pkg.files {
            for decl in &file.decls {
                match decl {
                    Decl::Func(func) => state.func(file.file_id, func),
                    Decl::Gen(gen) => state.gen_decl(file.file_id, gen),
                }
            }
        }

        state.finish()
    }

    /// Whether a top-level function is a test or benchmark
    pub fn is_test_function(name: &str) -> bool {
        TEST_PREFIXES.iter().any(|p| name.starts_with(p))
    }
}

struct State<'a> {
    printer: SignaturePrinter<'a>,
    options: ExtractOptions,
    doc: PackageDoc,
    /// Position of each documented type in `doc.types`
    type_index: HashMap<String, usize>,
    /// Methods seen so far with their receiver type name
    methods: Vec<(String, FunctionDoc)>,
}

impl State<'_> {
    fn visible(&self, name: &str) -> bool {
        self.options.include_unexported || is_exported(name)
    }

    fn func(&mut self, file_id: FileId, func: &FuncDecl) {
        let name = &func.name.name;
        // init functions cannot be referenced
        if !self.visible(name) || name == "_" || (name == "init" && !func.is_method()) {
            return;
        }

        let entry = FunctionDoc {
            name: name.clone(),
            doc: doc_text(func.doc.as_ref().or(func.comment.as_ref())),
            signature: self.printer.func(file_id, func),
        };

        if func.is_method() {
            match func.receiver_base() {
                Some(receiver) => self.methods.push((receiver.to_string(), entry)),
                None => debug!(method = %name, "method without resolvable receiver"),
            }
        } else if DocExtractor::is_test_function(name) {
            debug!(function = %name, "skipping test function");
        } else {
            self.doc.functions.push(entry);
        }
    }

    fn gen_decl(&mut self, file_id: FileId, gen: &GenDecl) {
        match gen.keyword {
            DeclKeyword::Import => {}
            DeclKeyword::Type => self.types(file_id, gen),
            DeclKeyword::Const | DeclKeyword::Var => self.values(file_id, gen),
        }
    }

    fn types(&mut self, file_id: FileId, gen: &GenDecl) {
        // the declaration's doc belongs to its type unless the group holds several
        let decl_doc = if gen.specs.len() == 1 {
            gen.doc.as_ref()
        } else {
            None
        };

        for spec in &gen.specs {
            let Spec::Type(spec) = spec else {
                continue;
            };
            let name = &spec.name.name;
            if !self.visible(name) {
                continue;
            }

            let kind = TypeKind::classify(&spec.ty);
            let fields = match &spec.ty.kind {
                TypeExprKind::Struct(list) if kind.has_members() => {
                    FieldExtractor::extract(&mut self.printer, file_id, name, list)
                }
                _ => Vec::new(),
            };
            let underlying = if kind.has_underlying() {
                self.printer
                    .type_expr(file_id, &spec.ty, || format!("underlying type of {name}"))
            } else {
                String::new()
            };

            let entry = TypeDoc {
                name: name.clone(),
                doc: doc_text(spec.doc.as_ref().or(decl_doc).or(spec.comment.as_ref())),
                decl: self.printer.type_spec(file_id, spec),
                kind,
                fields,
                methods: Vec::new(),
                underlying,
            };
            self.type_index.insert(name.clone(), self.doc.types.len());
            self.doc.types.push(entry);
        }
    }

    fn values(&mut self, file_id: FileId, gen: &GenDecl) {
        let doc = doc_text(gen.doc.as_ref());
        let keyword = gen.keyword;

        for spec in &gen.specs {
            let Spec::Value(spec) = spec else {
                continue;
            };
            let names: Vec<&str> = spec
                .names
                .iter()
                .map(|n| n.name.as_str())
                .filter(|n| *n != "_" && self.visible(n))
                .collect();
            if names.is_empty() {
                continue;
            }

            let decl = self.printer.value_spec(file_id, keyword, spec);
            let target = if keyword == DeclKeyword::Const {
                &mut self.doc.constants
            } else {
                &mut self.doc.variables
            };
            target.extend(names.into_iter().map(|name| ValueDoc {
                name: name.to_string(),
                doc: doc.clone(),
                decl: decl.clone(),
            }));
        }
    }

    fn finish(mut self) -> PackageDoc {
        for (receiver, method) in std::mem::take(&mut self.methods) {
            match self.type_index.get(&receiver) {
                Some(&index) => self.doc.types[index].methods.push(method),
                None => debug!(
                    receiver = %receiver,
                    method = %method.name,
                    "dropping method of undocumented type"
                ),
            }
        }
        self.doc.format_warnings = self.printer.into_warnings();
        self.doc
    }
}

fn doc_text(group: Option<&CommentGroup>) -> String {
    group.map(|g| g.text().trim().to_string()).unwrap_or_default()
}
