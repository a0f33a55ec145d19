//! Scanner turning evy source text into [`Token`]s.
//!
//! The lexer is pull based: every call to [`Lexer::next_token`] yields exactly
//! one token. Whitespace, newlines and comments are tokens too, so the token
//! offsets tile the whole input. Malformed input never fails the scan, it
//! produces [`Kind::Illegal`] tokens instead.

use crate::token::{Kind, Token};
use crate::unquote::unquote;
use unicode_general_category::{get_general_category, GeneralCategory};

const INVALID_STRING: &str = "invalid string";

pub struct Lexer {
    chars: Vec<char>,
    cur: Option<char>, // code point under examination, None past the end
    pos: usize,        // index of `cur`, clamped to chars.len()
    line: usize,
    column: usize,
    started: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            cur: None,
            pos: 0,
            line: 1,
            column: 0,
            started: false,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.advance();
        let token = Token::new(Kind::Eof, self.pos, self.line, self.column);

        let Some(ch) = self.cur else {
            return token;
        };

        match ch {
            ' ' | '\t' => {
                self.consume_horizontal_whitespace();
                Token { kind: Kind::Ws, ..token }
            }
            '\n' => Token { kind: Kind::Nl, ..token },
            '=' => Token { kind: self.with_equals(Kind::Eq, Kind::Assign), ..token },
            '!' => Token { kind: self.with_equals(Kind::NotEq, Kind::Bang), ..token },
            '<' => Token { kind: self.with_equals(Kind::LtEq, Kind::Lt), ..token },
            '>' => Token { kind: self.with_equals(Kind::GtEq, Kind::Gt), ..token },
            ':' => Token { kind: self.with_equals(Kind::Declare, Kind::Colon), ..token },
            '+' => Token { kind: Kind::Plus, ..token },
            '-' => Token { kind: Kind::Minus, ..token },
            '*' => Token { kind: Kind::Asterisk, ..token },
            '%' => Token { kind: Kind::Percent, ..token },
            '{' => Token { kind: Kind::LCurly, ..token },
            '}' => Token { kind: Kind::RCurly, ..token },
            '(' => Token { kind: Kind::LParen, ..token },
            ')' => Token { kind: Kind::RParen, ..token },
            '[' => Token { kind: Kind::LBracket, ..token },
            ']' => Token { kind: Kind::RBracket, ..token },
            '/' => {
                if self.peek() == Some('/') {
                    let comment = self.read_comment();
                    Token { kind: Kind::Comment, ..token }.with_text(comment)
                } else {
                    Token { kind: Kind::Slash, ..token }
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek2() == Some('.') {
                    self.advance();
                    self.advance();
                    Token { kind: Kind::Dot3, ..token }
                } else {
                    Token { kind: Kind::Dot, ..token }
                }
            }
            '"' => match self.read_string() {
                Some(literal) => Token { kind: Kind::StringLit, ..token }.with_text(literal),
                None => Token { kind: Kind::Illegal, ..token }.with_text(INVALID_STRING),
            },
            c if is_letter(c) => {
                let ident = self.read_ident();
                match Kind::keyword(&ident) {
                    Some(keyword) => Token { kind: keyword, ..token },
                    None => Token { kind: Kind::Ident, ..token }.with_text(ident),
                }
            }
            c if c.is_ascii_digit() => {
                let number = self.read_number();
                Token { kind: Kind::NumLit, ..token }.with_text(number)
            }
            c => Token { kind: Kind::Illegal, ..token }.with_text(c.to_string()),
        }
    }

    /// Moves the cursor one code point forward. Line and column follow the
    /// code point being left behind, so a newline token reports the line it
    /// ends. Past the end the cursor stays put.
    fn advance(&mut self) {
        if self.cur == Some('\n') {
            self.line += 1;
            self.column = 0;
        }
        if !self.started {
            self.started = true;
            self.column += 1;
        } else if self.pos < self.chars.len() {
            self.pos += 1;
            self.column += 1;
        }
        self.cur = self.chars.get(self.pos).copied();
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 2).copied()
    }

    fn with_equals(&mut self, compound: Kind, single: Kind) -> Kind {
        if self.peek() == Some('=') {
            self.advance();
            compound
        } else {
            single
        }
    }

    fn consume_horizontal_whitespace(&mut self) {
        while self.peek().is_some_and(is_horizontal_whitespace) {
            self.advance();
        }
    }

    /// Consumes while `pred` holds for the next code point and returns the
    /// text from the current code point up to the new cursor, inclusive.
    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        self.chars[start..=self.pos].iter().collect()
    }

    fn read_comment(&mut self) -> String {
        self.read_while(|c| c != '\n')
    }

    fn read_number(&mut self) -> String {
        self.read_while(|c| c.is_ascii_digit() || c == '.')
    }

    fn read_ident(&mut self) -> String {
        self.read_while(|c| is_letter(c) || is_digit(c))
    }

    /// Reads a quoted string starting at the opening quote. An unterminated
    /// literal stops before the newline or end of input that cut it short.
    fn read_string(&mut self) -> Option<String> {
        let start = self.pos;
        let mut escaped = false;
        loop {
            escaped = self.cur == Some('\\') && !escaped;
            match self.peek() {
                Some('"') if !escaped => {
                    self.advance();
                    break;
                }
                None | Some('\n') => break,
                Some(_) => self.advance(),
            }
        }
        let raw: String = self.chars[start..=self.pos].iter().collect();
        unquote(&raw)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to, but not including, end of input.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Scans `input` to the end and renders one token per line, end of input
/// included. Used for debugging the lexing phase on its own.
pub fn run(input: &str) -> String {
    let mut lexer = Lexer::new(input);
    let mut out = String::new();
    loop {
        let token = lexer.next_token();
        out.push_str(&token.to_string());
        out.push('\n');
        if token.is_eof() {
            return out;
        }
    }
}

fn is_horizontal_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

/// Any code point in a letter category (Lu, Ll, Lt, Lm, Lo), or `_`.
fn is_letter(c: char) -> bool {
    c == '_'
        || matches!(
            get_general_category(c),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
        )
}

/// Decimal digits of any script (Nd). Superscripts and roman numerals are
/// numbers but not digits.
fn is_digit(c: char) -> bool {
    matches!(get_general_category(c), GeneralCategory::DecimalNumber)
}
