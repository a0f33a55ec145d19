use std::fmt;
use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Token {
    pub kind: Kind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub(crate) fn new(kind: Kind, offset: usize, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: None,
            offset,
            line,
            column,
        }
    }

    pub(crate) fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Position in the form used by diagnostics, e.g. `line 3 column 7`.
    pub fn location(&self) -> String {
        format!("line {} column {}", self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == Kind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.kind)?;
        if let Some(text) = &self.text {
            write!(f, " {:?}", text)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    // Special
    Eof,
    Illegal,
    Ws,          // run of ' ', '\t', '\r'
    Nl,          // \n
    Comment,     // // comment

    // Identifiers and literals
    Ident,
    NumLit,
    StringLit,

    // Operators
    Assign,      // =
    Eq,          // ==
    Bang,        // !
    NotEq,       // !=
    Plus,        // +
    Minus,       // -
    Slash,       // /
    Asterisk,    // *
    Percent,     // %
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    Colon,       // :
    Declare,     // :=
    Dot,         // .
    Dot3,        // ...

    // Brackets
    LCurly,      // {
    RCurly,      // }
    LParen,      // (
    RParen,      // )
    LBracket,    // [
    RBracket,    // ]

    // Keywords
    Num,
    String,
    Bool,
    Any,
    True,
    False,
    And,
    Or,
    If,
    Else,
    Func,
    Return,
    On,
    For,
    Range,
    While,
    Break,
    End,
}

impl Kind {
    /// Looks up the keyword kind for an identifier, `None` for plain identifiers.
    pub fn keyword(ident: &str) -> Option<Kind> {
        match ident {
            "num" => Some(Kind::Num),
            "string" => Some(Kind::String),
            "bool" => Some(Kind::Bool),
            "any" => Some(Kind::Any),
            "true" => Some(Kind::True),
            "false" => Some(Kind::False),
            "and" => Some(Kind::And),
            "or" => Some(Kind::Or),
            "if" => Some(Kind::If),
            "else" => Some(Kind::Else),
            "func" => Some(Kind::Func),
            "return" => Some(Kind::Return),
            "on" => Some(Kind::On),
            "for" => Some(Kind::For),
            "range" => Some(Kind::Range),
            "while" => Some(Kind::While),
            "break" => Some(Kind::Break),
            "end" => Some(Kind::End),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        Kind::keyword(self.as_str()) == Some(*self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Eof => "EOF",
            Kind::Illegal => "ILLEGAL",
            Kind::Ws => "WS",
            Kind::Nl => "NL",
            Kind::Comment => "COMMENT",
            Kind::Ident => "IDENT",
            Kind::NumLit => "NUM_LIT",
            Kind::StringLit => "STRING_LIT",
            Kind::Assign => "=",
            Kind::Eq => "==",
            Kind::Bang => "!",
            Kind::NotEq => "!=",
            Kind::Plus => "+",
            Kind::Minus => "-",
            Kind::Slash => "/",
            Kind::Asterisk => "*",
            Kind::Percent => "%",
            Kind::Lt => "<",
            Kind::LtEq => "<=",
            Kind::Gt => ">",
            Kind::GtEq => ">=",
            Kind::Colon => ":",
            Kind::Declare => ":=",
            Kind::Dot => ".",
            Kind::Dot3 => "...",
            Kind::LCurly => "{",
            Kind::RCurly => "}",
            Kind::LParen => "(",
            Kind::RParen => ")",
            Kind::LBracket => "[",
            Kind::RBracket => "]",
            Kind::Num => "num",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Any => "any",
            Kind::True => "true",
            Kind::False => "false",
            Kind::And => "and",
            Kind::Or => "or",
            Kind::If => "if",
            Kind::Else => "else",
            Kind::Func => "func",
            Kind::Return => "return",
            Kind::On => "on",
            Kind::For => "for",
            Kind::Range => "range",
            Kind::While => "while",
            Kind::Break => "break",
            Kind::End => "end",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
