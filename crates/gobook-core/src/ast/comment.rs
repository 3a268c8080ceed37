//! Comment handling for the Go syntax tree
//!
//! Comments are collected into groups and attached to declarations, specs and
//! fields either as a doc comment (the group directly above) or as a line
//! comment (the group trailing on the same line).

use crate::lexer::Span;

/// A single `//` or `/* */` comment
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// The comment text including its markers
    pub text: String,
    pub span: Span,
    pub kind: CommentKind,
}

impl Comment {
    #[must_use]
    pub fn line(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            kind: CommentKind::Line,
        }
    }

    #[must_use]
    pub fn block(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
            kind: CommentKind::Block,
        }
    }

    /// Number of line breaks inside the comment
    #[must_use]
    pub fn newlines(&self) -> u32 {
        u32::try_from(self.text.matches('\n').count()).unwrap_or(u32::MAX)
    }
}

/// The kind of comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Line comment: // ...
    Line,
    /// Block comment: /* ... */
    Block,
}

/// A run of comments with no blank line or token between them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    #[must_use]
    pub fn new(list: Vec<Comment>) -> Self {
        Self { list }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match (self.list.first(), self.list.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::default(),
        }
    }

    /// The documentation text of the group.
    ///
    /// Comment markers are removed, along with the first space after `//`.
    /// Tool directives such as `//go:generate` or `//line` are dropped,
    /// trailing whitespace is stripped from every line, leading and trailing
    /// blank lines are removed and interior runs of blank lines collapse into
    /// one.
    #[must_use]
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.list {
            let body = match comment.kind {
                CommentKind::Line => {
                    let body = comment.text.strip_prefix("//").unwrap_or(&comment.text);
                    if let Some(rest) = body.strip_prefix(' ') {
                        rest
                    } else if is_directive(body) {
                        continue;
                    } else {
                        body
                    }
                }
                CommentKind::Block => {
                    let body = comment.text.strip_prefix("/*").unwrap_or(&comment.text);
                    body.strip_suffix("*/").unwrap_or(body)
                }
            };
            lines.extend(body.split('\n').map(|l| l.trim_end().to_string()));
        }

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            let blank = line.is_empty();
            if blank && out.last().map_or(true, String::is_empty) {
                continue;
            }
            out.push(line);
        }
        while out.last().is_some_and(String::is_empty) {
            out.pop();
        }
        out.join("\n")
    }
}

/// Whether a `//` comment body (marker already removed) is a tool directive
fn is_directive(body: &str) -> bool {
    if ["line ", "extern ", "export "]
        .iter()
        .any(|p| body.starts_with(p))
    {
        return true;
    }

    // [a-z0-9]+:[a-z0-9]
    let bytes = body.as_bytes();
    let Some(colon) = body.find(':') else {
        return false;
    };
    if colon == 0 || colon + 1 >= bytes.len() {
        return false;
    }
    bytes[..=colon + 1]
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != colon)
        .all(|(_, b)| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(lines: &[&str]) -> CommentGroup {
        CommentGroup::new(
            lines
                .iter()
                .map(|l| {
                    if l.starts_with("/*") {
                        Comment::block(*l, Span::default())
                    } else {
                        Comment::line(*l, Span::default())
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn strips_markers_and_one_space() {
        let g = group(&["// Widget is a thing.", "//   indented", "//tight"]);
        assert_eq!(g.text(), "Widget is a thing.\n  indented\ntight");
    }

    #[test]
    fn drops_directives() {
        let g = group(&["// Run does work.", "//go:noinline", "//line foo.go:10"]);
        assert_eq!(g.text(), "Run does work.");
        assert!(is_directive("go:generate stringer"));
        assert!(is_directive("export Foo"));
        assert!(!is_directive("TODO: later"));
        assert!(!is_directive(":x"));
    }

    #[test]
    fn collapses_blank_lines() {
        let g = group(&["//", "// First.", "//", "//", "// Second.", "//"]);
        assert_eq!(g.text(), "First.\n\nSecond.");
    }

    #[test]
    fn block_comment_body() {
        let g = group(&["/* Package widget\n   builds widgets.   \n*/"]);
        assert_eq!(g.text(), " Package widget\n   builds widgets.");
    }

    #[test]
    fn empty_group_has_empty_text() {
        assert_eq!(CommentGroup::default().text(), "");
        assert!(CommentGroup::default().is_empty());
    }
}
