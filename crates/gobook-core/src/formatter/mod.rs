//! Signature formatter for Go declarations
//!
//! Prints declaration nodes back to source text the way gofmt lays them out:
//! - tab indentation
//! - struct and interface members aligned in columns (see [`tabwriter`])
//! - at most one blank line kept between members
//! - member comments preserved
//! - multi-line parameter lists kept multi-line
//!
//! Function bodies and doc comments are never printed. Array lengths and
//! initializer expressions are copied from the source, re-indented.

mod tabwriter;

use thiserror::Error;

use crate::ast::{
    ChanDir, CommentGroup, DeclKeyword, Field, FieldList, FuncDecl, FuncType, TypeExpr,
    TypeExprKind, TypeSpec, ValueSpec,
};
use crate::lexer::Span;
use crate::source::{FileId, SourceFile, SourceMap};
use tabwriter::Line;

/// Indentation unit
const INDENT: &str = "\t";

/// Longest single member a one-line struct or interface may hold
const ONE_LINE_LIMIT: usize = 30;

/// Errors raised while printing a node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("file {0:?} is not part of the source map")]
    UnknownFile(FileId),

    #[error("span {0} does not resolve to source text")]
    UnresolvedSpan(Span),
}

pub type FormatResult<T> = Result<T, FormatError>;

/// The declaration printer
pub struct Formatter<'a> {
    file: &'a SourceFile,
    /// Output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl<'a> Formatter<'a> {
    /// Create a formatter for nodes of the given file
    pub fn new(map: &'a SourceMap, file_id: FileId) -> FormatResult<Self> {
        let file = map.get(file_id).ok_or(FormatError::UnknownFile(file_id))?;
        Ok(Self::for_file(file, 0))
    }

    fn for_file(file: &'a SourceFile, indent_level: usize) -> Self {
        Self {
            file,
            output: String::new(),
            indent_level,
            at_line_start: false,
        }
    }

    /// `func (r *T) Name[P any](a int) error`
    pub fn format_func(map: &SourceMap, file_id: FileId, decl: &FuncDecl) -> FormatResult<String> {
        let mut f = Formatter::new(map, file_id)?;
        f.write_func_decl(decl)?;
        Ok(f.output)
    }

    /// `type Name[P any] T` or `type Name = T`, with its trailing comment
    pub fn format_type_spec(map: &SourceMap, file_id: FileId, spec: &TypeSpec) -> FormatResult<String> {
        let mut f = Formatter::new(map, file_id)?;
        f.write_type_spec(spec)?;
        Ok(f.output)
    }

    /// `const A, B = 1, 2 // comment`
    pub fn format_value_spec(
        map: &SourceMap,
        file_id: FileId,
        keyword: DeclKeyword,
        spec: &ValueSpec,
    ) -> FormatResult<String> {
        let mut f = Formatter::new(map, file_id)?;
        f.write(keyword.as_str());
        f.write(" ");
        f.write_value_spec(spec)?;
        Ok(f.output)
    }

    /// A bare type expression
    pub fn format_type(map: &SourceMap, file_id: FileId, ty: &TypeExpr) -> FormatResult<String> {
        let mut f = Formatter::new(map, file_id)?;
        f.write_type(ty)?;
        Ok(f.output)
    }

    // ==================== Output Helpers ====================

    fn write(&mut self, s: &str) {
        if self.at_line_start && !s.is_empty() {
            self.write_indent();
            self.at_line_start = false;
        }
        self.output.push_str(s);
    }

    fn writeln(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn line(&self, offset: u32) -> u32 {
        self.file.line(offset)
    }

    /// Copy source text, stripping the indentation of its first line from
    /// every continuation line
    fn write_raw(&mut self, span: Span) -> FormatResult<()> {
        let text = self
            .file
            .snippet(span)
            .ok_or(FormatError::UnresolvedSpan(span))?;
        let base = self.file.indentation_at(span.start);
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                self.writeln();
            }
            self.write(line.strip_prefix(base).unwrap_or(line));
        }
        Ok(())
    }

    fn write_comment(&mut self, group: &CommentGroup) {
        for (i, comment) in group.list.iter().enumerate() {
            if i > 0 {
                self.write(" ");
            }
            self.write(&comment.text);
        }
    }

    /// Render a node with a fresh formatter at the current indentation
    fn nested<F>(&self, indent_level: usize, print: F) -> FormatResult<String>
    where
        F: FnOnce(&mut Formatter<'a>) -> FormatResult<()>,
    {
        let mut f = Formatter::for_file(self.file, indent_level);
        print(&mut f)?;
        Ok(f.output)
    }

    // ==================== Declarations ====================

    fn write_func_decl(&mut self, decl: &FuncDecl) -> FormatResult<()> {
        self.write("func ");
        if let Some(recv) = &decl.recv {
            self.write_params(recv, "(", ")")?;
            self.write(" ");
        }
        self.write(&decl.name.name);
        if let Some(type_params) = &decl.type_params {
            self.write_params(type_params, "[", "]")?;
        }
        self.write_signature(&decl.ty)
    }

    fn write_type_spec(&mut self, spec: &TypeSpec) -> FormatResult<()> {
        self.write("type ");
        self.write(&spec.name.name);
        if let Some(type_params) = &spec.type_params {
            self.write_params(type_params, "[", "]")?;
        }
        self.write(if spec.assign { " = " } else { " " });
        self.write_type(&spec.ty)?;
        if let Some(comment) = &spec.comment {
            self.write(" ");
            self.write_comment(comment);
        }
        Ok(())
    }

    fn write_value_spec(&mut self, spec: &ValueSpec) -> FormatResult<()> {
        let names: Vec<&str> = spec.names.iter().map(|n| n.name.as_str()).collect();
        self.write(&names.join(", "));
        if let Some(ty) = &spec.ty {
            self.write(" ");
            self.write_type(ty)?;
        }
        if !spec.values.is_empty() {
            self.write(" = ");
            for (i, value) in spec.values.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write_raw(value.span)?;
            }
        }
        if let Some(comment) = &spec.comment {
            self.write(" ");
            self.write_comment(comment);
        }
        Ok(())
    }

    // ==================== Signatures ====================

    fn write_signature(&mut self, func: &FuncType) -> FormatResult<()> {
        self.write_params(&func.params, "(", ")")?;
        let Some(results) = &func.results else {
            return Ok(());
        };
        match results.fields.as_slice() {
            [] => Ok(()),
            [single] if single.names.is_empty() => {
                self.write(" ");
                self.write_type(unparen(&single.ty))
            }
            _ => {
                self.write(" ");
                self.write_params(results, "(", ")")
            }
        }
    }

    /// Parameter, result, receiver or type parameter list.
    ///
    /// A line break in the source before a parameter or before the closing
    /// delimiter is kept; the broken part is indented one level.
    fn write_params(&mut self, list: &FieldList, open: &str, close: &str) -> FormatResult<()> {
        self.write(open);
        let mut prev_line = self.line(list.opening.start);
        let mut indented = false;

        for (i, field) in list.fields.iter().enumerate() {
            let begin = self.line(field.span.start);
            if i > 0 {
                self.write(",");
            }
            if prev_line < begin {
                if !indented {
                    self.indent();
                    indented = true;
                }
                self.writeln();
            } else if i > 0 {
                self.write(" ");
            }

            if !field.names.is_empty() {
                let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
                self.write(&names.join(", "));
                self.write(" ");
            }
            self.write_type(&field.ty)?;
            prev_line = self.line(field.span.end);
        }

        let closing_line = self.line(list.closing.start);
        if indented {
            self.dedent();
        }
        if !list.fields.is_empty() && prev_line < closing_line {
            self.write(",");
            self.writeln();
        }
        self.write(close);
        Ok(())
    }

    // ==================== Types ====================

    fn write_type(&mut self, ty: &TypeExpr) -> FormatResult<()> {
        match &ty.kind {
            TypeExprKind::Name(ident) => self.write(&ident.name),
            TypeExprKind::Qualified { package, name } => {
                self.write(&package.name);
                self.write(".");
                self.write(&name.name);
            }
            TypeExprKind::Instance { base, args } => {
                self.write_type(base)?;
                self.write("[");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write_type(arg)?;
                }
                self.write("]");
            }
            TypeExprKind::Pointer(inner) => {
                self.write("*");
                self.write_type(inner)?;
            }
            TypeExprKind::Array { len, elem } => {
                self.write("[");
                match len {
                    Some(len) => self.write_raw(len.span)?,
                    None => self.write("..."),
                }
                self.write("]");
                self.write_type(elem)?;
            }
            TypeExprKind::Slice(elem) => {
                self.write("[]");
                self.write_type(elem)?;
            }
            TypeExprKind::Ellipsis(elem) => {
                self.write("...");
                self.write_type(elem)?;
            }
            TypeExprKind::Map { key, value } => {
                self.write("map[");
                self.write_type(key)?;
                self.write("]");
                self.write_type(value)?;
            }
            TypeExprKind::Chan { dir, elem } => {
                self.write(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(elem)?;
            }
            TypeExprKind::Func(func) => {
                self.write("func");
                self.write_signature(func)?;
            }
            TypeExprKind::Struct(fields) => self.write_body("struct", fields, true)?,
            TypeExprKind::Interface(elems) => self.write_body("interface", elems, false)?,
            TypeExprKind::Paren(inner) => {
                self.write("(");
                self.write_type(inner)?;
                self.write(")");
            }
            TypeExprKind::Union(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.write_type(term)?;
                }
            }
            TypeExprKind::Tilde(inner) => {
                self.write("~");
                self.write_type(inner)?;
            }
        }
        Ok(())
    }

    // ==================== Struct and interface bodies ====================

    fn write_body(&mut self, keyword: &str, list: &FieldList, is_struct: bool) -> FormatResult<()> {
        let one_line_source = self.line(list.opening.start) == self.line(list.closing.start);
        let has_comments = list
            .fields
            .iter()
            .any(|f| f.doc.is_some() || f.comment.is_some());

        if one_line_source && !has_comments {
            if list.fields.is_empty() {
                self.write(keyword);
                self.write("{}");
                return Ok(());
            }
            if let [field] = list.fields.as_slice() {
                let member = self.member_inline(field, is_struct)?;
                if field.tag.is_none() && member.chars().count() <= ONE_LINE_LIMIT {
                    self.write(keyword);
                    self.write("{ ");
                    self.write(&member);
                    self.write(" }");
                    return Ok(());
                }
            }
        }

        self.write(keyword);
        self.write(" {");
        let lines = self.body_lines(list, is_struct)?;
        if !lines.is_empty() {
            let prefix = INDENT.repeat(self.indent_level + 1);
            let body = tabwriter::render(&lines, &prefix);
            self.output.push('\n');
            self.output.push_str(&body);
        }
        self.writeln();
        self.write("}");
        Ok(())
    }

    /// A member on one line, without tag or comment
    fn member_inline(&self, field: &Field, is_struct: bool) -> FormatResult<String> {
        let ty = self.nested(self.indent_level, |f| f.write_member_type(field, is_struct))?;
        let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
        Ok(match (names.is_empty(), is_struct) {
            (true, _) => ty,
            (false, true) => format!("{} {ty}", names.join(", ")),
            (false, false) => format!("{}{ty}", names.join(", ")),
        })
    }

    /// Interface methods print only their signature after the name
    fn write_member_type(&mut self, field: &Field, is_struct: bool) -> FormatResult<()> {
        match &field.ty.kind {
            TypeExprKind::Func(func) if !is_struct && !field.names.is_empty() => {
                self.write_signature(func)
            }
            _ => self.write_type(&field.ty),
        }
    }

    fn body_lines(&self, list: &FieldList, is_struct: bool) -> FormatResult<Vec<Line>> {
        let member_level = self.indent_level + 1;
        let mut lines = Vec::new();
        let mut prev_end: Option<u32> = None;

        for field in &list.fields {
            let first_line = field
                .doc
                .as_ref()
                .map_or(field.span.start, |d| d.span().start);
            let first_line = self.line(first_line);
            if prev_end.is_some_and(|prev| first_line > prev + 1) {
                lines.push(Line::blank());
            }

            if let Some(doc) = &field.doc {
                for comment in &doc.list {
                    let base = self.file.indentation_at(comment.span.start);
                    for text in comment.text.lines() {
                        lines.push(Line::text(text.strip_prefix(base).unwrap_or(text)));
                    }
                }
            }

            let ty = self.nested(member_level, |f| f.write_member_type(field, is_struct))?;
            self.member_lines(field, is_struct, &ty, &mut lines);
            prev_end = Some(self.line(field.span.end));
        }

        Ok(lines)
    }

    fn member_lines(&self, field: &Field, is_struct: bool, ty: &str, lines: &mut Vec<Line>) {
        let names: Vec<&str> = field.names.iter().map(|n| n.name.as_str()).collect();
        let names = names.join(", ");
        let tag = field.tag.clone();
        let comment = field.comment.as_ref().map(|c| {
            let mut f = Formatter::for_file(self.file, 0);
            f.write_comment(c);
            f.output
        });

        let mut type_lines = ty.lines();
        let first = type_lines.next().unwrap_or_default();
        let rest: Vec<&str> = type_lines.collect();

        if !rest.is_empty() {
            // a multi-line type ends alignment after its first line
            let head = match (names.is_empty(), is_struct) {
                (true, _) => Line::text(first),
                (false, true) => Line::row(vec![names], first),
                (false, false) => Line::text(format!("{names}{first}")),
            };
            lines.push(head);
            let last = rest.len() - 1;
            for (i, text) in rest.iter().enumerate() {
                let mut text = (*text).to_string();
                if i == last {
                    for extra in tag.iter().chain(comment.iter()) {
                        text.push(' ');
                        text.push_str(extra);
                    }
                }
                lines.push(Line::verbatim(text));
            }
            return;
        }

        let mut items: Vec<String> = Vec::new();
        if names.is_empty() {
            items.push(first.to_string());
        } else if is_struct {
            items.push(names);
            items.push(first.to_string());
        } else {
            items.push(format!("{names}{first}"));
        }

        match (tag, &comment) {
            (Some(tag), _) => items.push(tag),
            (None, Some(_)) if is_struct && field.names.is_empty() => items.push(String::new()),
            _ => {}
        }
        if let Some(comment) = comment {
            items.push(comment);
        }

        let trailing = items.pop().unwrap_or_default();
        lines.push(Line::row(items, trailing));
    }
}

/// `(T)` as a lone result prints without parentheses
fn unparen(ty: &TypeExpr) -> &TypeExpr {
    match &ty.kind {
        TypeExprKind::Paren(inner) => unparen(inner),
        _ => ty,
    }
}
