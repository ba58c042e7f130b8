//! Condition mini-language parser.
//!
//! Grammar: `<field> <op> <literal>` with `<op>` one of `>= <= == != > <`.
//! The scanner finds every operator token in the input, trying
//! two-character operators before one-character ones at every position.
//! The parser then takes the first operator with non-blank text on both
//! sides; everything after it is the literal.
//!
//! Parsing never fails. Input without a usable operator becomes a bare-field
//! truthiness probe on the whole trimmed string.

use crate::domain::condition::{ComparisonOp, Condition};

/// An operator occurrence, with its byte span in the scanned input.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OperatorToken {
    op: ComparisonOp,
    start: usize,
    end: usize,
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn consume_operator(&mut self) -> Option<ComparisonOp> {
        let remaining = self.remaining();
        let op = ComparisonOp::ALL
            .into_iter()
            .find(|op| remaining.starts_with(op.symbol()))?;
        self.pos += op.symbol().len();
        Some(op)
    }

    fn tokenize(mut self) -> Vec<OperatorToken> {
        let mut tokens = Vec::new();
        while self.peek().is_some() {
            let start = self.pos;
            match self.consume_operator() {
                Some(op) => tokens.push(OperatorToken {
                    op,
                    start,
                    end: self.pos,
                }),
                None => {
                    self.advance();
                }
            }
        }
        tokens
    }
}

pub fn parse(input: &str) -> Condition {
    let trimmed = input.trim();
    let tokens = Scanner::new(trimmed).tokenize();

    for token in &tokens {
        let field = trimmed[..token.start].trim();
        let literal = trimmed[token.end..].trim();
        if !field.is_empty() && !literal.is_empty() {
            return Condition::Compare {
                field: field.to_string(),
                op: token.op,
                literal: literal.to_string(),
            };
        }
    }

    if !tokens.is_empty() {
        tracing::debug!(
            condition = %trimmed,
            "no operator with text on both sides, probing as bare field"
        );
    }
    Condition::Truthy {
        field: trimmed.to_string(),
    }
}
