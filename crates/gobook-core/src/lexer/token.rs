//! Token types for the Go lexer

use logos::Logos;

/// The kind of token produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // ========== Literals ==========
    /// Decimal integer literal
    #[regex(r"[0-9][0-9_]*")]
    Int,

    /// Hexadecimal integer literal
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,

    /// Binary integer literal
    #[regex(r"0[bB][01_]+")]
    BinaryInt,

    /// Explicit octal integer literal (`0o17`)
    #[regex(r"0[oO][0-7_]+")]
    OctalInt,

    /// Decimal or hexadecimal floating point literal
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?[pP][+-]?[0-9_]+")]
    Float,

    /// Imaginary literal (`3i`, `1.5e3i`)
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i")]
    Imaginary,

    /// Interpreted string literal: "..."
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    /// Raw string literal: `...`
    #[regex(r"`[^`]*`")]
    RawString,

    /// Rune literal: 'x'
    #[regex(r"'([^'\\\n]|\\[^\n])+'")]
    Rune,

    // ========== Identifiers ==========
    /// ASCII identifier
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 3)]
    Ident,

    /// Identifier starting with a non-ASCII letter
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", priority = 2)]
    UnicodeIdent,

    // ========== Operators ==========
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AndNot,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&^=")]
    AndNotAssign,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("!")]
    Not,
    #[token("~")]
    Tilde,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    Define,
    #[token("...")]
    Ellipsis,

    // ========== Delimiters ==========
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    /// Explicit `;` or one inserted at a line end (lexeme "\n")
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    // ========== Trivia ==========
    #[regex(r"//[^\n]*")]
    LineComment,

    /// Runs to the first `*/`; an unclosed comment is a lex error
    #[token("/*", block_comment)]
    BlockComment,

    #[token("\n")]
    Newline,

    // ========== Special ==========
    Eof,
    Error,
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

impl TokenKind {
    #[must_use]
    pub const fn is_ident(&self) -> bool {
        matches!(self, Self::Ident | Self::UnicodeIdent)
    }

    /// Returns true for basic literals (numbers, strings, runes)
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::HexInt
                | Self::BinaryInt
                | Self::OctalInt
                | Self::Float
                | Self::Imaginary
                | Self::String
                | Self::RawString
                | Self::Rune
        )
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Whether a line break directly after this token terminates the statement
    #[must_use]
    pub const fn ends_statement(&self) -> bool {
        self.is_ident()
            || self.is_literal()
            || matches!(
                self,
                Self::Break
                    | Self::Continue
                    | Self::Fallthrough
                    | Self::Return
                    | Self::Inc
                    | Self::Dec
                    | Self::RParen
                    | Self::RBracket
                    | Self::RBrace
            )
    }

    /// Whether this token can begin a type expression
    #[must_use]
    pub const fn starts_type(&self) -> bool {
        self.is_ident()
            || matches!(
                self,
                Self::Star
                    | Self::LBracket
                    | Self::Map
                    | Self::Chan
                    | Self::Func
                    | Self::Struct
                    | Self::Interface
                    | Self::LParen
                    | Self::Arrow
            )
    }
}

impl std::fmt::Display for TokenKind {
    #[allow(clippy::match_same_arms)] // one arm per token
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Break => "break",
            Self::Case => "case",
            Self::Chan => "chan",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Defer => "defer",
            Self::Else => "else",
            Self::Fallthrough => "fallthrough",
            Self::For => "for",
            Self::Func => "func",
            Self::Go => "go",
            Self::Goto => "goto",
            Self::If => "if",
            Self::Import => "import",
            Self::Interface => "interface",
            Self::Map => "map",
            Self::Package => "package",
            Self::Range => "range",
            Self::Return => "return",
            Self::Select => "select",
            Self::Struct => "struct",
            Self::Switch => "switch",
            Self::Type => "type",
            Self::Var => "var",
            Self::Int => "integer",
            Self::HexInt => "hex integer",
            Self::BinaryInt => "binary integer",
            Self::OctalInt => "octal integer",
            Self::Float => "float",
            Self::Imaginary => "imaginary",
            Self::String => "string",
            Self::RawString => "raw string",
            Self::Rune => "rune",
            Self::Ident => "identifier",
            Self::UnicodeIdent => "identifier",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::AndNot => "&^",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::AmpAssign => "&=",
            Self::PipeAssign => "|=",
            Self::CaretAssign => "^=",
            Self::ShlAssign => "<<=",
            Self::ShrAssign => ">>=",
            Self::AndNotAssign => "&^=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Arrow => "<-",
            Self::Inc => "++",
            Self::Dec => "--",
            Self::EqEq => "==",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Assign => "=",
            Self::Not => "!",
            Self::Tilde => "~",
            Self::NotEq => "!=",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Define => ":=",
            Self::Ellipsis => "...",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::LineComment => "// comment",
            Self::BlockComment => "/* comment */",
            Self::Newline => "newline",
            Self::Eof => "end of file",
            Self::Error => "error",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        TokenKind::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn keywords_beat_identifiers() {
        assert_eq!(
            kinds("func funcs go gopher"),
            vec![
                TokenKind::Func,
                TokenKind::Ident,
                TokenKind::Go,
                TokenKind::Ident
            ]
        );
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(
            kinds("42 0x1F 0b101 0o17 1.5 .5 1e9 0x1p-2 2i 1_000"),
            vec![
                TokenKind::Int,
                TokenKind::HexInt,
                TokenKind::BinaryInt,
                TokenKind::OctalInt,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Imaginary,
                TokenKind::Int,
            ]
        );
    }

    #[test]
    fn strings_and_runes() {
        assert_eq!(
            kinds(r#""a\"b" `raw
line` 'x' '\n'"#),
            vec![
                TokenKind::String,
                TokenKind::RawString,
                TokenKind::Rune,
                TokenKind::Rune
            ]
        );
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            kinds("&^= <- := ... ~"),
            vec![
                TokenKind::AndNotAssign,
                TokenKind::Arrow,
                TokenKind::Define,
                TokenKind::Ellipsis,
                TokenKind::Tilde
            ]
        );
    }

    #[test]
    fn comments_are_tokens() {
        assert_eq!(
            kinds("// line\n/* block\n** still */"),
            vec![
                TokenKind::LineComment,
                TokenKind::Newline,
                TokenKind::BlockComment
            ]
        );
    }
}
