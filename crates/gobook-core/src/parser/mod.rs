//! Parser for Go source files
//!
//! A recursive-descent parser over the token stream produced by
//! [`Lexer`](crate::lexer::Lexer). It understands the complete declaration
//! grammar (package clause, imports, constants, variables, types including
//! generics, function and method signatures) and skips function bodies by
//! brace matching. Initializer expressions are captured as source spans.
//!
//! # Example
//!
//! ```
//! use gobook_core::parser::Parser;
//! use gobook_core::source::SourceMap;
//!
//! let source = "package widget\n\nfunc New() *Widget { return nil }\n";
//! let mut map = SourceMap::new();
//! let id = map.add_file("widget.go", source);
//! let file = Parser::parse_file(source, id).unwrap();
//! assert_eq!(file.package.name, "widget");
//! assert_eq!(file.funcs().count(), 1);
//! ```

mod comments;
mod error;
mod types;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};

use crate::ast::{
    CommentGroup, Decl, DeclKeyword, Expr, File, FuncDecl, FuncType, GenDecl, Ident, ImportSpec,
    Spec, TypeSpec, ValueSpec,
};
use crate::lexer::{Lexer, LineIndex, Span, Token, TokenKind};
use crate::source::FileId;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// The Go declaration parser
pub struct Parser {
    /// Significant tokens (comments removed), ending with `Eof`
    tokens: Vec<Token>,
    /// Doc comment group attached to each token
    lead: Vec<Option<CommentGroup>>,
    /// Line comment group attached to each token
    line: Vec<Option<CommentGroup>>,
    /// Returned by `current` once the stream is exhausted
    eof: Token,
    /// Current position in the token stream
    position: usize,
    /// End offset of the most recently consumed token
    last_end: u32,
    /// Collected parse errors
    errors: Vec<ParseError>,
    file_id: FileId,
}

impl Parser {
    /// Create a new parser from source code
    #[must_use]
    pub fn new(source: &str, file_id: FileId) -> Self {
        let (raw, lex_errors) = Lexer::tokenize(source);
        let lines = LineIndex::new(source);
        let annotated = comments::annotate(raw, &lines);
        let eof = Token::new(TokenKind::Eof, Span::at(source.len() as u32), "");

        let errors = lex_errors
            .into_iter()
            .map(|e| ParseError::new(ParseErrorKind::InvalidToken(e.error.to_string()), e.span))
            .collect();

        Self {
            tokens: annotated.tokens,
            lead: annotated.lead,
            line: annotated.line,
            eof,
            position: 0,
            last_end: 0,
            errors,
            file_id,
        }
    }

    /// Parse an entire source file.
    ///
    /// Returns every error found; a file with any lexical or syntax error is
    /// rejected as a whole.
    pub fn parse_file(source: &str, file_id: FileId) -> Result<File, Vec<ParseError>> {
        let mut parser = Parser::new(source, file_id);
        match parser.file() {
            Ok(file) if parser.errors.is_empty() => Ok(file),
            Ok(_) => Err(parser.errors),
            Err(e) => {
                parser.errors.push(e);
                Err(parser.errors)
            }
        }
    }

    // ==================== Token Management ====================

    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` positions ahead of the current one
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.kind_at(self.position + n)
    }

    fn kind_at(&self, index: usize) -> TokenKind {
        self.tokens.get(index).map_or(TokenKind::Eof, |t| t.kind)
    }

    fn is_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        if token.kind != TokenKind::Eof {
            self.last_end = token.span.end;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(ExpectedToken::Token(kind)))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        let token = self.current();
        if token.kind.is_ident() {
            let token = self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else if token.kind == TokenKind::Eof {
            Err(ParseError::new(ParseErrorKind::UnexpectedEof, token.span))
        } else {
            Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                token.span,
            ))
        }
    }

    fn unexpected(&self, expected: ExpectedToken) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            return ParseError::new(ParseErrorKind::UnexpectedEof, token.span);
        }
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                found: token.kind,
                expected,
            },
            token.span,
        )
    }

    /// Doc comment group attached to the current token
    fn lead_comment(&self) -> Option<CommentGroup> {
        self.lead.get(self.position).cloned().flatten()
    }

    /// Line comment group attached to the current token
    fn line_comment(&self) -> Option<CommentGroup> {
        self.line.get(self.position).cloned().flatten()
    }

    /// Consume a statement terminator and return the comment trailing the
    /// construct it ends.
    ///
    /// A closing `)` or `}` also terminates without being consumed.
    fn expect_semi(&mut self, context: &'static str) -> ParseResult<Option<CommentGroup>> {
        match self.current_kind() {
            TokenKind::RParen | TokenKind::RBrace => Ok(None),
            TokenKind::Semicolon => {
                if self.current().is_implicit_semicolon() {
                    // the comment sits before the line break
                    let comment = self.line_comment();
                    self.advance();
                    Ok(comment)
                } else {
                    self.advance();
                    Ok(self.line_comment())
                }
            }
            TokenKind::Eof => Ok(None),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedSemicolon(context),
                self.current().span,
            )),
        }
    }

    fn at_decl_keyword(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Func
                | TokenKind::Type
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::Import
        )
    }

    /// Skip ahead to the next top-level declaration after an error
    fn synchronize(&mut self) {
        let mut depth: i32 = 0;
        while !self.is_eof() {
            let after_semi =
                self.position > 0 && self.kind_at(self.position - 1) == TokenKind::Semicolon;
            if depth <= 0 && after_semi && self.at_decl_keyword() {
                return;
            }
            match self.current_kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.advance();
        }
    }

    // ==================== Declarations ====================

    fn file(&mut self) -> ParseResult<File> {
        let doc = self.lead_comment();
        self.expect(TokenKind::Package)?;
        let package = self.expect_ident()?;
        self.expect_semi("package clause")?;

        let mut decls = Vec::new();
        while !self.is_eof() {
            let start = self.position;
            match self.decl() {
                Ok(decl) => decls.push(decl),
                Err(e) => {
                    self.errors.push(e);
                    if self.position == start {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }

        Ok(File {
            file_id: self.file_id,
            doc,
            package,
            decls,
        })
    }

    fn decl(&mut self) -> ParseResult<Decl> {
        match self.current_kind() {
            TokenKind::Func => self.func_decl().map(Decl::Func),
            TokenKind::Import => self.gen_decl(DeclKeyword::Import).map(Decl::Gen),
            TokenKind::Const => self.gen_decl(DeclKeyword::Const).map(Decl::Gen),
            TokenKind::Var => self.gen_decl(DeclKeyword::Var).map(Decl::Gen),
            TokenKind::Type => self.gen_decl(DeclKeyword::Type).map(Decl::Gen),
            TokenKind::Eof => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                self.current().span,
            )),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedDeclaration,
                self.current().span,
            )
            .with_hint("top-level code must start with func, type, var, const or import")),
        }
    }

    fn func_decl(&mut self) -> ParseResult<FuncDecl> {
        let doc = self.lead_comment();
        let start = self.expect(TokenKind::Func)?.span;

        let recv = if self.check(TokenKind::LParen) {
            Some(self.parameters()?)
        } else {
            None
        };
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenKind::LBracket) {
            Some(self.type_params()?)
        } else {
            None
        };
        let params = self.parameters()?;
        let results = self.results()?;
        let ty = FuncType {
            params,
            results,
            span: Span::new(start.start, self.last_end),
        };

        let body = if self.check(TokenKind::LBrace) {
            Some(self.skip_block()?)
        } else {
            None
        };
        let span = Span::new(start.start, self.last_end);
        let comment = self.expect_semi("function declaration")?;

        Ok(FuncDecl {
            doc,
            recv,
            name,
            type_params,
            ty,
            body,
            comment,
            span,
        })
    }

    /// Skip a `{ ... }` block, returning its span
    fn skip_block(&mut self) -> ParseResult<Span> {
        let open = self.expect(TokenKind::LBrace)?.span;
        let mut depth = 1u32;
        loop {
            match self.current_kind() {
                TokenKind::Eof => {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedEof, open)
                        .with_hint("unclosed '{'"))
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.advance().span;
                        return Ok(open.merge(close));
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn gen_decl(&mut self, keyword: DeclKeyword) -> ParseResult<GenDecl> {
        let doc = self.lead_comment();
        let start = self.advance().span;
        let mut specs = Vec::new();

        let lparen = if let Some(lparen) = self.eat(TokenKind::LParen) {
            while !self.check(TokenKind::RParen) && !self.is_eof() {
                let spec_doc = self.lead_comment();
                specs.push(self.spec(keyword, spec_doc)?);
            }
            self.expect(TokenKind::RParen)?;
            Some(lparen.span)
        } else {
            specs.push(self.spec(keyword, None)?);
            None
        };

        let span = Span::new(start.start, self.last_end);
        if lparen.is_some() {
            self.expect_semi("declaration group")?;
        }

        Ok(GenDecl {
            doc,
            keyword,
            lparen,
            specs,
            span,
        })
    }

    fn spec(&mut self, keyword: DeclKeyword, doc: Option<CommentGroup>) -> ParseResult<Spec> {
        match keyword {
            DeclKeyword::Import => self.import_spec(doc).map(Spec::Import),
            DeclKeyword::Const | DeclKeyword::Var => self.value_spec(doc).map(Spec::Value),
            DeclKeyword::Type => self.type_spec(doc).map(Spec::Type),
        }
    }

    fn import_spec(&mut self, doc: Option<CommentGroup>) -> ParseResult<ImportSpec> {
        let start = self.current().span.start;
        let name = if self.current_kind().is_ident() {
            Some(self.expect_ident()?)
        } else if let Some(dot) = self.eat(TokenKind::Dot) {
            Some(Ident::new(".", dot.span))
        } else {
            None
        };

        let path = match self.current_kind() {
            TokenKind::String | TokenKind::RawString => self.advance().lexeme,
            _ => {
                return Err(self.unexpected(ExpectedToken::Description(
                    "import path".to_string(),
                )))
            }
        };
        let span = Span::new(start, self.last_end);
        let comment = self.expect_semi("import")?;

        Ok(ImportSpec {
            doc,
            name,
            path,
            comment,
            span,
        })
    }

    fn value_spec(&mut self, doc: Option<CommentGroup>) -> ParseResult<ValueSpec> {
        let start = self.current().span.start;
        let names = self.ident_list()?;

        let ty = if matches!(
            self.current_kind(),
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.type_expr()?)
        };

        let values = if self.eat(TokenKind::Assign).is_some() {
            self.expr_list()?
        } else {
            Vec::new()
        };
        let span = Span::new(start, self.last_end);
        let comment = self.expect_semi("value specification")?;

        Ok(ValueSpec {
            doc,
            names,
            ty,
            values,
            comment,
            span,
        })
    }

    fn type_spec(&mut self, doc: Option<CommentGroup>) -> ParseResult<TypeSpec> {
        let name = self.expect_ident()?;
        let type_params = if self.check(TokenKind::LBracket) && self.at_type_params() {
            Some(self.type_params()?)
        } else {
            None
        };
        let assign = self.eat(TokenKind::Assign).is_some();
        let ty = self.type_expr()?;
        let span = Span::new(name.span.start, self.last_end);
        let comment = self.expect_semi("type declaration")?;

        Ok(TypeSpec {
            doc,
            name,
            type_params,
            assign,
            ty,
            comment,
            span,
        })
    }

    /// Decide whether `[` after a type name opens a type parameter list
    /// rather than an array length: `type Set[T comparable]` versus
    /// `type Buf [N]byte`.
    fn at_type_params(&self) -> bool {
        let first = self.peek_kind(1);
        let second = self.peek_kind(2);
        first.is_ident()
            && (second.is_ident()
                || matches!(
                    second,
                    TokenKind::Comma
                        | TokenKind::Tilde
                        | TokenKind::Interface
                        | TokenKind::LBracket
                        | TokenKind::Func
                        | TokenKind::Map
                        | TokenKind::Chan
                        | TokenKind::Struct
                        | TokenKind::Arrow
                ))
    }

    fn ident_list(&mut self) -> ParseResult<Vec<Ident>> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(TokenKind::Comma).is_some() {
            names.push(self.expect_ident()?);
        }
        Ok(names)
    }

    fn expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut exprs = vec![self.raw_expr()?];
        while self.eat(TokenKind::Comma).is_some() {
            exprs.push(self.raw_expr()?);
        }
        Ok(exprs)
    }

    /// Consume one expression without interpreting it.
    ///
    /// Stops before a `,` or `;` at nesting depth zero, or before a closing
    /// delimiter that belongs to an enclosing construct.
    fn raw_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let mut depth = 0u32;
        let mut consumed = false;

        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
            consumed = true;
        }

        if !consumed {
            return Err(self.expected_expression());
        }
        if depth > 0 {
            return Err(ParseError::new(ParseErrorKind::UnexpectedEof, self.current().span));
        }
        Ok(Expr::new(Span::new(start, self.last_end)))
    }

    fn expected_expression(&self) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            ParseError::new(ParseErrorKind::UnexpectedEof, token.span)
        } else {
            ParseError::new(ParseErrorKind::ExpectedExpression, token.span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Spec, TypeExprKind};
    use crate::source::SourceMap;

    fn parse(source: &str) -> File {
        let mut map = SourceMap::new();
        let id = map.add_file("test.go", source);
        match Parser::parse_file(source, id) {
            Ok(file) => file,
            Err(errors) => panic!("parse failed: {errors:?}"),
        }
    }

    fn parse_err(source: &str) -> Vec<ParseError> {
        let mut map = SourceMap::new();
        let id = map.add_file("test.go", source);
        Parser::parse_file(source, id).unwrap_err()
    }

    #[test]
    fn parses_package_clause_and_doc() {
        let file = parse("// Package widget builds widgets.\npackage widget\n");
        assert_eq!(file.package.name, "widget");
        assert_eq!(file.doc.unwrap().text(), "Package widget builds widgets.");
        assert!(file.decls.is_empty());
    }

    #[test]
    fn parses_function_with_body_skipped() {
        let file = parse(
            "package p\n\n// Add sums.\nfunc Add(a, b int) int {\n\tif a > 0 {\n\t\treturn a + b\n\t}\n\treturn b\n}\n",
        );
        let f = file.funcs().next().unwrap();
        assert_eq!(f.name.name, "Add");
        assert_eq!(f.doc.as_ref().unwrap().text(), "Add sums.");
        assert_eq!(f.ty.params.fields.len(), 1);
        assert_eq!(f.ty.params.fields[0].names.len(), 2);
        assert!(f.body.is_some());
    }

    #[test]
    fn bodyless_function_keeps_trailing_comment() {
        let file = parse("package widget\n\nfunc New() *Widget // New creates a Widget.\n");
        let f = file.funcs().next().unwrap();
        assert!(f.body.is_none());
        assert!(f.doc.is_none());
        assert_eq!(f.comment.as_ref().unwrap().text(), "New creates a Widget.");
    }

    #[test]
    fn parses_methods_and_receivers() {
        let file = parse("package p\nfunc (l *List[T]) Len() int { return 0 }\n");
        let f = file.funcs().next().unwrap();
        assert!(f.is_method());
        assert_eq!(f.receiver_base(), Some("List"));
    }

    #[test]
    fn parses_grouped_consts_with_iota() {
        let file = parse(
            "package p\n\n// Colors.\nconst (\n\tRed Color = iota // red\n\tGreen\n\tBlue\n)\n",
        );
        let decl = file.gen_decls(DeclKeyword::Const).next().unwrap();
        assert!(decl.is_grouped());
        assert_eq!(decl.doc.as_ref().unwrap().text(), "Colors.");
        assert_eq!(decl.specs.len(), 3);
        let Spec::Value(red) = &decl.specs[0] else {
            panic!("expected value spec")
        };
        assert_eq!(red.values.len(), 1);
        assert_eq!(red.comment.as_ref().unwrap().text(), "red");
    }

    #[test]
    fn parses_var_with_composite_literal() {
        let file = parse(
            "package p\nvar Defaults = map[string]int{\n\t\"a\": 1,\n\t\"b\": 2,\n}\nvar X, Y = f(1, 2), 3\n",
        );
        let decls: Vec<_> = file.gen_decls(DeclKeyword::Var).collect();
        assert_eq!(decls.len(), 2);
        let Spec::Value(xy) = &decls[1].specs[0] else {
            panic!("expected value spec")
        };
        assert_eq!(xy.names.len(), 2);
        assert_eq!(xy.values.len(), 2);
    }

    #[test]
    fn distinguishes_type_params_from_array_length() {
        let file = parse("package p\ntype Set[T comparable] map[T]struct{}\ntype Buf [N]byte\n");
        let specs: Vec<_> = file
            .gen_decls(DeclKeyword::Type)
            .map(|d| match &d.specs[0] {
                Spec::Type(t) => t.clone(),
                _ => panic!("expected type spec"),
            })
            .collect();
        assert!(specs[0].type_params.is_some());
        assert!(matches!(specs[0].ty.kind, TypeExprKind::Map { .. }));
        assert!(specs[1].type_params.is_none());
        assert!(matches!(specs[1].ty.kind, TypeExprKind::Array { .. }));
    }

    #[test]
    fn parses_imports() {
        let file = parse("package p\n\nimport (\n\t\"fmt\"\n\tio \"io\"\n\t_ \"embed\"\n)\n");
        let decl = file.gen_decls(DeclKeyword::Import).next().unwrap();
        assert_eq!(decl.specs.len(), 3);
    }

    #[test]
    fn reports_missing_package_clause() {
        let errors = parse_err("func F() {}\n");
        assert!(matches!(
            errors[0].kind,
            ParseErrorKind::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn recovers_and_reports_multiple_errors() {
        let errors = parse_err("package p\nfunc (\nvar x = \nfunc G() {}\ntype T struct {\n");
        assert!(errors.len() >= 2, "got {errors:?}");
    }

    #[test]
    fn lex_errors_fail_the_file() {
        let errors = parse_err("package p\nvar s = \"unterminated\n");
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParseErrorKind::InvalidToken(_))));
    }
}
