//! Type expressions, parameter lists and struct/interface bodies

use super::{ParseResult, Parser};
use crate::ast::{ChanDir, Field, FieldList, FuncType, Ident, TypeExpr, TypeExprKind};
use crate::lexer::{Span, TokenKind};
use crate::parser::{ParseError, ParseErrorKind};

/// One entry of a parameter list before names and types are grouped
type ParamEntry = (Option<Ident>, Option<TypeExpr>);

impl Parser {
    /// Parse a type expression
    pub(super) fn type_expr(&mut self) -> ParseResult<TypeExpr> {
        let start = self.current().span.start;

        match self.current_kind() {
            kind if kind.is_ident() => {
                let first = self.expect_ident()?;
                let named = if self.eat(TokenKind::Dot).is_some() {
                    let name = self.expect_ident()?;
                    TypeExpr::new(
                        TypeExprKind::Qualified {
                            package: first,
                            name,
                        },
                        Span::new(start, self.last_end),
                    )
                } else {
                    let span = first.span;
                    TypeExpr::new(TypeExprKind::Name(first), span)
                };

                if self.check(TokenKind::LBracket) {
                    let args = self.type_args()?;
                    Ok(TypeExpr::new(
                        TypeExprKind::Instance {
                            base: Box::new(named),
                            args,
                        },
                        Span::new(start, self.last_end),
                    ))
                } else {
                    Ok(named)
                }
            }
            TokenKind::Star => {
                self.advance();
                let inner = self.type_expr()?;
                Ok(self.finish(TypeExprKind::Pointer(Box::new(inner)), start))
            }
            TokenKind::LBracket => {
                self.advance();
                if self.eat(TokenKind::RBracket).is_some() {
                    let elem = self.type_expr()?;
                    return Ok(self.finish(TypeExprKind::Slice(Box::new(elem)), start));
                }
                let len = if self.check(TokenKind::Ellipsis)
                    && self.peek_kind(1) == TokenKind::RBracket
                {
                    self.advance();
                    None
                } else {
                    Some(self.raw_expr()?)
                };
                self.expect(TokenKind::RBracket)?;
                let elem = self.type_expr()?;
                Ok(self.finish(
                    TypeExprKind::Array {
                        len,
                        elem: Box::new(elem),
                    },
                    start,
                ))
            }
            TokenKind::Map => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let key = self.type_expr()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.type_expr()?;
                Ok(self.finish(
                    TypeExprKind::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    start,
                ))
            }
            TokenKind::Chan => {
                self.advance();
                let dir = if self.eat(TokenKind::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.type_expr()?;
                Ok(self.finish(
                    TypeExprKind::Chan {
                        dir,
                        elem: Box::new(elem),
                    },
                    start,
                ))
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect(TokenKind::Chan)?;
                let elem = self.type_expr()?;
                Ok(self.finish(
                    TypeExprKind::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(elem),
                    },
                    start,
                ))
            }
            TokenKind::Func => {
                self.advance();
                let func = self.func_type(start)?;
                let span = func.span;
                Ok(TypeExpr::new(TypeExprKind::Func(func), span))
            }
            TokenKind::Struct => {
                let fields = self.struct_body()?;
                Ok(self.finish(TypeExprKind::Struct(fields), start))
            }
            TokenKind::Interface => {
                let elems = self.interface_body()?;
                Ok(self.finish(TypeExprKind::Interface(elems), start))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(self.finish(TypeExprKind::Paren(Box::new(inner)), start))
            }
            TokenKind::Eof => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                self.current().span,
            )),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                self.current().span,
            )),
        }
    }

    fn finish(&self, kind: TypeExprKind, start: u32) -> TypeExpr {
        TypeExpr::new(kind, Span::new(start, self.last_end))
    }

    /// `[A, B]` after a generic type name
    fn type_args(&mut self) -> ParseResult<Vec<TypeExpr>> {
        self.expect(TokenKind::LBracket)?;
        let mut args = vec![self.type_expr()?];
        while self.eat(TokenKind::Comma).is_some() {
            if self.check(TokenKind::RBracket) {
                break;
            }
            args.push(self.type_expr()?);
        }
        self.expect(TokenKind::RBracket)?;
        Ok(args)
    }

    /// A constraint element: a union of optionally `~`-prefixed terms
    fn type_elem(&mut self) -> ParseResult<TypeExpr> {
        let start = self.current().span.start;
        let mut terms = vec![self.type_term()?];
        while self.eat(TokenKind::Pipe).is_some() {
            terms.push(self.type_term()?);
        }
        if terms.len() == 1 {
            Ok(terms.remove(0))
        } else {
            Ok(self.finish(TypeExprKind::Union(terms), start))
        }
    }

    fn type_term(&mut self) -> ParseResult<TypeExpr> {
        let start = self.current().span.start;
        if self.eat(TokenKind::Tilde).is_some() {
            let inner = self.type_expr()?;
            Ok(self.finish(TypeExprKind::Tilde(Box::new(inner)), start))
        } else {
            self.type_expr()
        }
    }

    /// Signature after the `func` keyword (and name, for declarations)
    pub(super) fn func_type(&mut self, start: u32) -> ParseResult<FuncType> {
        let params = self.parameters()?;
        let results = self.results()?;
        Ok(FuncType {
            params,
            results,
            span: Span::new(start, self.last_end),
        })
    }

    /// `(a, b int, c string)`
    pub(super) fn parameters(&mut self) -> ParseResult<FieldList> {
        self.field_list(TokenKind::LParen, TokenKind::RParen, false)
    }

    /// `[K comparable, V any]`
    pub(super) fn type_params(&mut self) -> ParseResult<FieldList> {
        self.field_list(TokenKind::LBracket, TokenKind::RBracket, true)
    }

    /// Result list: parenthesized, a single bare type, or nothing
    pub(super) fn results(&mut self) -> ParseResult<Option<FieldList>> {
        if self.check(TokenKind::LParen) {
            return self.parameters().map(Some);
        }
        if self.current_kind().starts_type() {
            let ty = self.type_expr()?;
            let (opening, closing) = (Span::at(ty.span.start), Span::at(ty.span.end));
            return Ok(Some(FieldList {
                opening,
                fields: vec![Field::anonymous(ty)],
                closing,
            }));
        }
        Ok(None)
    }

    fn field_list(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        type_params: bool,
    ) -> ParseResult<FieldList> {
        let opening = self.expect(open)?.span;
        let mut entries = Vec::new();

        while !self.check(close) && !self.is_eof() {
            entries.push(self.param_entry(close, type_params)?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let closing = self.expect(close)?.span;
        let fields = group_params(entries, type_params)?;

        Ok(FieldList {
            opening,
            fields,
            closing,
        })
    }

    fn param_entry(&mut self, close: TokenKind, type_params: bool) -> ParseResult<ParamEntry> {
        if !self.current_kind().is_ident() {
            return Ok((None, Some(self.param_type(type_params)?)));
        }

        match self.peek_kind(1) {
            kind if kind == close || kind == TokenKind::Comma => {
                Ok((Some(self.expect_ident()?), None))
            }
            TokenKind::Dot => Ok((None, Some(self.type_expr()?))),
            TokenKind::LBracket if !self.bracket_then_type() => {
                Ok((None, Some(self.type_expr()?)))
            }
            _ => {
                let name = self.expect_ident()?;
                let ty = self.param_type(type_params)?;
                Ok((Some(name), Some(ty)))
            }
        }
    }

    fn param_type(&mut self, type_params: bool) -> ParseResult<TypeExpr> {
        let start = self.current().span.start;
        if self.eat(TokenKind::Ellipsis).is_some() {
            let elem = self.type_expr()?;
            return Ok(self.finish(TypeExprKind::Ellipsis(Box::new(elem)), start));
        }
        if type_params {
            self.type_elem()
        } else {
            self.type_expr()
        }
    }

    /// With the current token an identifier followed by `[`: whether the
    /// token after the matching `]` starts a type.
    ///
    /// `a [4]byte` is a name with an array type; `List[int]` is an
    /// instantiated type.
    fn bracket_then_type(&self) -> bool {
        let mut index = self.position + 1;
        let mut depth = 0u32;
        loop {
            match self.kind_at(index) {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return self.kind_at(index + 1).starts_type();
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            index += 1;
        }
    }

    // ==================== Struct and interface bodies ====================

    fn struct_body(&mut self) -> ParseResult<FieldList> {
        self.expect(TokenKind::Struct)?;
        let opening = self.expect(TokenKind::LBrace)?.span;
        let mut fields = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            fields.push(self.struct_field()?);
        }
        let closing = self.expect(TokenKind::RBrace)?.span;
        Ok(FieldList {
            opening,
            fields,
            closing,
        })
    }

    fn struct_field(&mut self) -> ParseResult<Field> {
        let doc = self.lead_comment();
        let start = self.current().span.start;

        let (names, ty) = match self.current_kind() {
            kind if kind.is_ident() => match self.peek_kind(1) {
                TokenKind::Dot => (Vec::new(), self.type_expr()?),
                TokenKind::LBracket if !self.bracket_then_type() => {
                    (Vec::new(), self.type_expr()?)
                }
                TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::String
                | TokenKind::RawString => (Vec::new(), self.type_expr()?),
                TokenKind::Comma => {
                    let names = self.ident_list()?;
                    (names, self.type_expr()?)
                }
                _ => {
                    let name = self.expect_ident()?;
                    (vec![name], self.type_expr()?)
                }
            },
            TokenKind::Star => (Vec::new(), self.type_expr()?),
            TokenKind::Eof => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedEof,
                    self.current().span,
                ))
            }
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedField,
                    self.current().span,
                ))
            }
        };

        let tag = match self.current_kind() {
            TokenKind::String | TokenKind::RawString => Some(self.advance().lexeme),
            _ => None,
        };
        let span = Span::new(start, self.last_end);
        let comment = self.expect_semi("struct field")?;

        Ok(Field {
            doc,
            names,
            ty,
            tag,
            comment,
            span,
        })
    }

    fn interface_body(&mut self) -> ParseResult<FieldList> {
        self.expect(TokenKind::Interface)?;
        let opening = self.expect(TokenKind::LBrace)?.span;
        let mut elems = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_eof() {
            elems.push(self.interface_elem()?);
        }
        let closing = self.expect(TokenKind::RBrace)?.span;
        Ok(FieldList {
            opening,
            fields: elems,
            closing,
        })
    }

    fn interface_elem(&mut self) -> ParseResult<Field> {
        let doc = self.lead_comment();
        let start = self.current().span.start;

        let (names, ty) =
            if self.current_kind().is_ident() && self.peek_kind(1) == TokenKind::LParen {
                let name = self.expect_ident()?;
                let func = self.func_type(start)?;
                let span = func.span;
                (vec![name], TypeExpr::new(TypeExprKind::Func(func), span))
            } else {
                (Vec::new(), self.type_elem()?)
            };

        let span = Span::new(start, self.last_end);
        let comment = self.expect_semi("interface element")?;

        Ok(Field {
            doc,
            names,
            ty,
            tag: None,
            comment,
            span,
        })
    }
}

/// Resolve a parameter list into fields.
///
/// If any entry carries both a name and a type, every bare identifier is a
/// name sharing the next type (`a, b int`). Otherwise every entry is a type,
/// except in type parameter lists, where a bare name still needs a constraint.
fn group_params(entries: Vec<ParamEntry>, type_params: bool) -> ParseResult<Vec<Field>> {
    let named = entries.iter().any(|(n, t)| n.is_some() && t.is_some());
    let mut fields = Vec::new();

    if !named {
        for entry in entries {
            let ty = match entry {
                (_, Some(ty)) => ty,
                (Some(ident), None) if type_params => {
                    return Err(missing_type(&ident));
                }
                (Some(ident), None) => {
                    let span = ident.span;
                    TypeExpr::new(TypeExprKind::Name(ident), span)
                }
                (None, None) => continue,
            };
            fields.push(Field::anonymous(ty));
        }
        return Ok(fields);
    }

    let mut pending: Vec<Ident> = Vec::new();
    for entry in entries {
        match entry {
            (Some(ident), None) => pending.push(ident),
            (Some(ident), Some(ty)) => {
                pending.push(ident);
                let names = std::mem::take(&mut pending);
                let start = names.first().map_or(ty.span.start, |n| n.span.start);
                let span = Span::new(start, ty.span.end);
                fields.push(Field {
                    names,
                    span,
                    ..Field::anonymous(ty)
                });
            }
            (None, Some(ty)) => {
                return Err(ParseError::new(ParseErrorKind::MixedParameters, ty.span));
            }
            (None, None) => {}
        }
    }

    // bare names after the last named entry read as unnamed parameters
    if let Some(first) = pending.first() {
        return Err(ParseError::new(ParseErrorKind::MixedParameters, first.span)
            .with_hint(format!("give '{}' a type or drop the other names", first.name)));
    }
    Ok(fields)
}

fn missing_type(ident: &Ident) -> ParseError {
    ParseError::new(ParseErrorKind::MissingParameterType, ident.span)
        .with_hint(format!("add a constraint after '{}'", ident.name))
}

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, DeclKeyword, File, Spec, TypeExpr, TypeExprKind};
    use crate::parser::{ParseErrorKind, Parser};
    use crate::source::SourceMap;

    fn parse(source: &str) -> File {
        let mut map = SourceMap::new();
        let id = map.add_file("types.go", source);
        match Parser::parse_file(source, id) {
            Ok(file) => file,
            Err(errors) => panic!("parse failed: {errors:?}"),
        }
    }

    fn first_type(source: &str) -> TypeExpr {
        let file = parse(source);
        let decl = file.gen_decls(DeclKeyword::Type).next().unwrap();
        match &decl.specs[0] {
            Spec::Type(spec) => spec.ty.clone(),
            _ => panic!("expected type spec"),
        }
    }

    #[test]
    fn struct_fields_with_tags_and_comments() {
        let ty = first_type(
            "package p\ntype W struct {\n\t// Name is shown.\n\tName string `json:\"name\"` // label\n\tA, B int\n\tio.Reader\n\t*Base\n\tList[int]\n\tbuf [4]byte\n}\n",
        );
        let TypeExprKind::Struct(fields) = ty.kind else {
            panic!("expected struct")
        };
        assert_eq!(fields.fields.len(), 6);
        let name = &fields.fields[0];
        assert_eq!(name.doc.as_ref().unwrap().text(), "Name is shown.");
        assert_eq!(name.tag.as_deref(), Some("`json:\"name\"`"));
        assert_eq!(name.comment.as_ref().unwrap().text(), "label");
        assert_eq!(fields.fields[1].names.len(), 2);
        assert!(fields.fields[2].is_embedded());
        assert!(fields.fields[3].is_embedded());
        assert!(fields.fields[4].is_embedded());
        assert!(matches!(
            fields.fields[4].ty.kind,
            TypeExprKind::Instance { .. }
        ));
        assert_eq!(fields.fields[5].names[0].name, "buf");
        assert!(matches!(fields.fields[5].ty.kind, TypeExprKind::Array { .. }));
    }

    #[test]
    fn single_line_struct() {
        let ty = first_type("package p\ntype P struct{ X, Y int; Label string }\n");
        let TypeExprKind::Struct(fields) = ty.kind else {
            panic!("expected struct")
        };
        assert_eq!(fields.num_fields(), 3);
    }

    #[test]
    fn interface_methods_and_constraints() {
        let ty = first_type(
            "package p\ntype RW interface {\n\tio.Reader\n\tWrite(p []byte) (n int, err error)\n\t~int | ~string\n}\n",
        );
        let TypeExprKind::Interface(elems) = ty.kind else {
            panic!("expected interface")
        };
        assert_eq!(elems.fields.len(), 3);
        assert!(elems.fields[0].is_embedded());
        assert_eq!(elems.fields[1].names[0].name, "Write");
        assert!(matches!(elems.fields[2].ty.kind, TypeExprKind::Union(_)));
    }

    #[test]
    fn parameter_grouping() {
        let file = parse(
            "package p\nfunc F(a, b int, opts ...Option) (n int, err error)\nfunc G(int, string) error\nfunc H(l List[int], xs [2]int)\n",
        );
        let funcs: Vec<_> = file.funcs().collect();
        assert_eq!(funcs[0].ty.params.fields.len(), 2);
        assert!(matches!(
            funcs[0].ty.params.fields[1].ty.kind,
            TypeExprKind::Ellipsis(_)
        ));
        assert_eq!(funcs[0].ty.results.as_ref().unwrap().fields.len(), 2);
        assert_eq!(funcs[1].ty.params.fields.len(), 2);
        assert!(funcs[1].ty.params.fields.iter().all(|f| f.is_embedded()));
        assert_eq!(funcs[2].ty.params.num_fields(), 2);
    }

    #[test]
    fn generic_function_type_params() {
        let file = parse("package p\nfunc Map[S ~[]E, E any, R any](s S, f func(E) R) []R { return nil }\n");
        let f = file.funcs().next().unwrap();
        assert_eq!(f.type_params.as_ref().unwrap().num_fields(), 3);
    }

    #[test]
    fn channel_and_func_types() {
        let file = parse("package p\nvar (\n\tIn <-chan int\n\tOut chan<- string\n\tHook func(string) error\n)\n");
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected gen decl")
        };
        assert_eq!(decl.specs.len(), 3);
    }

    #[test]
    fn mixed_parameters_are_rejected() {
        let mut map = SourceMap::new();
        let source = "package p\nfunc F(a int, string)\n";
        let id = map.add_file("bad.go", source);
        let errors = Parser::parse_file(source, id).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::MixedParameters)));
    }

    #[test]
    fn trailing_bare_names_in_named_list_are_mixed() {
        let source = "package p\nfunc F(a, b int, c, d)\n";
        let mut map = SourceMap::new();
        let id = map.add_file("bad.go", source);
        let errors = Parser::parse_file(source, id).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::MixedParameters)));
        assert!(!errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::MissingParameterType)));
    }

    #[test]
    fn unnamed_parameters_are_types() {
        let file = parse("package p\nfunc F(int, string) error\n");
        let f = file.funcs().next().unwrap();
        assert_eq!(f.ty.params.num_fields(), 2);
    }

    #[test]
    fn type_parameter_needs_a_constraint() {
        let source = "package p\nfunc F[T](x T) {}\n";
        let mut map = SourceMap::new();
        let id = map.add_file("bad.go", source);
        let errors = Parser::parse_file(source, id).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::MissingParameterType)));
    }
}
