//! Comment grouping and attachment
//!
//! Runs before parsing proper. Comments are removed from the token stream and
//! each remaining token is annotated with at most one *lead* group (the doc
//! comment ending on the line directly above it) and one *line* group (the
//! comment trailing the previous token on that token's line).

use std::iter::Peekable;

use crate::ast::{Comment, CommentGroup};
use crate::lexer::{LineIndex, Token, TokenKind};

/// Significant tokens with their attached comment groups, index-aligned
#[derive(Debug, Default)]
pub(super) struct Annotated {
    pub tokens: Vec<Token>,
    pub lead: Vec<Option<CommentGroup>>,
    pub line: Vec<Option<CommentGroup>>,
}

pub(super) fn annotate(raw: Vec<Token>, lines: &LineIndex) -> Annotated {
    let mut out = Annotated::default();
    let mut raw = raw.into_iter().peekable();
    // Line of the previous significant token; 0 before the first one
    let mut prev_line = 0;

    loop {
        let mut line_comment = None;
        let mut lead_comment = None;

        let first_comment_line = raw
            .peek()
            .filter(|t| t.kind.is_comment())
            .map(|t| lines.line(t.span.start));

        if let Some(first_line) = first_comment_line {
            if first_line == prev_line {
                // Same line as the previous token: only a line comment candidate
                let (group, end_line) = consume_group(&mut raw, lines, 0);
                let ends_line = raw.peek().map_or(true, |next| {
                    lines.line(next.span.start) != end_line
                        || matches!(next.kind, TokenKind::Semicolon | TokenKind::Eof)
                });
                if ends_line {
                    line_comment = Some(group);
                }
            }

            let mut last = None;
            while raw.peek().is_some_and(|t| t.kind.is_comment()) {
                last = Some(consume_group(&mut raw, lines, 1));
            }
            if let (Some((group, end_line)), Some(next)) = (last, raw.peek()) {
                if end_line + 1 == lines.line(next.span.start) {
                    lead_comment = Some(group);
                }
            }
        }

        let Some(token) = raw.next() else {
            break;
        };
        prev_line = lines.line(token.span.start);
        let is_eof = token.kind == TokenKind::Eof;
        out.tokens.push(token);
        out.lead.push(lead_comment);
        out.line.push(line_comment);
        if is_eof {
            break;
        }
    }

    out
}

/// Consume adjacent comments; `gap` is how many lines may separate them
fn consume_group<I>(raw: &mut Peekable<I>, lines: &LineIndex, gap: u32) -> (CommentGroup, u32)
where
    I: Iterator<Item = Token>,
{
    let mut list = Vec::new();
    let mut end_line = raw.peek().map_or(0, |t| lines.line(t.span.start));

    while let Some(token) =
        raw.next_if(|t| t.kind.is_comment() && lines.line(t.span.start) <= end_line + gap)
    {
        let comment = if token.kind == TokenKind::BlockComment {
            Comment::block(token.lexeme, token.span)
        } else {
            Comment::line(token.lexeme, token.span)
        };
        end_line = lines.line(comment.span.start) + comment.newlines();
        list.push(comment);
    }

    (CommentGroup::new(list), end_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn annotated(source: &str) -> Annotated {
        let (tokens, _) = Lexer::tokenize(source);
        annotate(tokens, &LineIndex::new(source))
    }

    fn index_of(a: &Annotated, lexeme: &str) -> usize {
        a.tokens.iter().position(|t| t.lexeme == lexeme).unwrap()
    }

    #[test]
    fn doc_comment_attaches_to_next_line() {
        let a = annotated("package p\n\n// Widget is a thing.\n// More.\ntype Widget int\n");
        let i = index_of(&a, "type");
        assert_eq!(a.lead[i].as_ref().unwrap().text(), "Widget is a thing.\nMore.");
        assert!(a.tokens.iter().all(|t| !t.kind.is_comment()));
    }

    #[test]
    fn blank_line_detaches_doc() {
        let a = annotated("package p\n\n// Floating.\n\ntype Widget int\n");
        let i = index_of(&a, "type");
        assert!(a.lead[i].is_none());
    }

    #[test]
    fn trailing_comment_attaches_to_semicolon() {
        let a = annotated("package p\nvar X int // the x\nvar Y int\n");
        let semi = a
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::Semicolon)
            .map(|(i, _)| i)
            .nth(1)
            .unwrap();
        assert_eq!(a.line[semi].as_ref().unwrap().text(), "the x");
        let y = index_of(&a, "Y");
        assert!(a.line[y].is_none());
    }

    #[test]
    fn trailing_comment_is_not_a_doc() {
        let a = annotated("package p\nvar X int // the x\nvar Y int\n");
        let var_y = a
            .tokens
            .iter()
            .rposition(|t| t.kind == TokenKind::Var)
            .unwrap();
        assert!(a.lead[var_y].is_none());
    }

    #[test]
    fn package_doc_on_first_token() {
        let a = annotated("// Package p does things.\npackage p\n");
        assert_eq!(a.lead[0].as_ref().unwrap().text(), "Package p does things.");
    }
}
