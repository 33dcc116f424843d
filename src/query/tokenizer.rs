//! Query tokenizer
//!
//! Splits a raw query into terms and AND/OR connectors. Grammar:
//!
//! ```text
//! query    := (term | connector)*
//! term     := ["-"] key op operand | ["-"] operand
//! key      := ALPHA (ALPHA | "_")*
//! op       := "!=" | ">=" | "<=" | ":" | "=" | ">" | "<"
//! operand  := '"' chars '"' | "'" chars "'" | word
//! word     := any run of characters except whitespace and parentheses
//! ```
//!
//! Parentheses are not part of the grammar and act as separators.
//! Anything that cannot be read as a term is discarded.

use super::ast::ComparisonOp;

/// A term as written, before key resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTerm {
    pub negated: bool,
    /// Raw key and operator, None for bare values
    pub key: Option<(String, ComparisonOp)>,
    pub value: String,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Term(RawTerm),
    And,
    Or,
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(is_separator) {
            self.pos += 1;
        }
    }

    fn read_key(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            self.pos += 1;
        }
        Some(self.chars[start..self.pos].iter().collect())
    }

    fn read_op(&mut self) -> Option<ComparisonOp> {
        for (symbol, op) in ComparisonOp::SYMBOLS {
            let len = symbol.chars().count();
            let matches = self
                .chars
                .get(self.pos..self.pos + len)
                .is_some_and(|window| window.iter().copied().eq(symbol.chars()));
            if matches {
                self.pos += len;
                return Some(op);
            }
        }
        None
    }

    /// Reads an operand. Returns `(value, quoted)`; the value may be empty.
    fn read_operand(&mut self) -> (String, bool) {
        if let Some(quote) = self.peek().filter(|c| *c == '"' || *c == '\'') {
            let body_start = self.pos + 1;
            let close = self.chars[body_start..]
                .iter()
                .position(|c| *c == quote)
                .map(|offset| body_start + offset);
            if let Some(close) = close {
                let value = self.chars[body_start..close].iter().collect();
                self.pos = close + 1;
                return (value, true);
            }
        }

        let start = self.pos;
        while self.peek().is_some_and(|c| !is_separator(c)) {
            self.pos += 1;
        }
        (self.chars[start..self.pos].iter().collect(), false)
    }

    /// Tries `key op operand` from the current position, rewinding on failure.
    fn read_keyed(&mut self) -> Option<(String, ComparisonOp, String, bool)> {
        let start = self.pos;
        let attempt = (|| {
            let key = self.read_key()?;
            let op = self.read_op()?;
            let (value, quoted) = self.read_operand();
            if value.is_empty() && !quoted {
                return None;
            }
            Some((key, op, value, quoted))
        })();
        if attempt.is_none() {
            self.pos = start;
        }
        attempt
    }

    fn next_token(&mut self) -> Option<Option<Token>> {
        self.skip_separators();
        let c = self.peek()?;

        let negated = c == '-' && self.chars.get(self.pos + 1).is_some_and(|n| !is_separator(*n));
        if negated {
            self.pos += 1;
        }

        if let Some((key, op, value, quoted)) = self.read_keyed() {
            if value.is_empty() {
                return Some(None);
            }
            return Some(Some(Token::Term(RawTerm {
                negated,
                key: Some((key, op)),
                value,
                quoted,
            })));
        }

        let (value, quoted) = self.read_operand();
        if value.is_empty() {
            // empty quoted pair; the scanner is already past it
            if !quoted {
                self.pos += 1;
            }
            return Some(None);
        }

        if !negated && !quoted {
            if value.eq_ignore_ascii_case("and") {
                return Some(Some(Token::And));
            }
            if value.eq_ignore_ascii_case("or") {
                return Some(Some(Token::Or));
            }
        }

        Some(Some(Token::Term(RawTerm {
            negated,
            key: None,
            value,
            quoted,
        })))
    }
}

/// Splits `input` into tokens. Never fails.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(input);
    let mut tokens = Vec::new();
    while let Some(next) = scanner.next_token() {
        if let Some(token) = next {
            tokens.push(token);
        }
    }
    tokens
}
