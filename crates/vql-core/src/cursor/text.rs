//! Textual cursor wire format: `(updated_at:2012-09-01T00:00:00Z,id:aokaoskox)`.
//!
//! Ordered `field:value` pairs, comma-separated and parenthesized; the last
//! pair is the tie-breaker. Unquoted values go through literal inference.
//! Whitespace around the punctuation is ignored when parsing; the printed
//! form never contains any.

use crate::{
    cursor::{Cursor, CursorError},
    value::{LiteralContext, Value, infer_literal, write_literal},
    vql::is_field_name,
};
use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (name, value) in self.fields() {
            write_pair(f, name, value)?;
            f.write_char(',')?;
        }
        write_pair(f, self.tie_breaker(), self.id())?;
        f.write_char(')')
    }
}

fn write_pair(f: &mut fmt::Formatter<'_>, name: &str, value: &Value) -> fmt::Result {
    f.write_str(name)?;
    f.write_char(':')?;
    write_literal(f, value, LiteralContext::Cursor)
}

impl FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s)
    }
}

/// Parse the textual form; the last pair becomes the tie-breaker.
pub(crate) fn parse_text(source: &str) -> Result<Cursor, CursorError> {
    let mut reader = TextReader::new(source);

    reader.skip_whitespace();
    reader.expect('(', "'('")?;
    let mut pairs = Vec::new();
    loop {
        pairs.push(reader.read_pair()?);

        reader.skip_whitespace();
        let position = reader.pos;
        match reader.advance() {
            Some(',') => {}
            Some(')') => break,
            _ => return Err(malformed_at(position, "',' or ')'")),
        }
    }

    reader.skip_whitespace();
    if reader.peek().is_some() {
        return Err(reader.malformed("end of input"));
    }

    let Some((tie_breaker, id)) = pairs.pop() else {
        return Err(reader.malformed("a field"));
    };

    Cursor::with_tie_breaker(pairs, tie_breaker, id)
}

const fn malformed_at(position: usize, expected: &'static str) -> CursorError {
    CursorError::MalformedText { position, expected }
}

///
/// TextReader
///

struct TextReader {
    input: Vec<char>,
    pos: usize,
}

impl TextReader {
    fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }

        ch
    }

    const fn malformed(&self, expected: &'static str) -> CursorError {
        malformed_at(self.pos, expected)
    }

    fn expect(&mut self, ch: char, expected: &'static str) -> Result<(), CursorError> {
        if self.peek() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.malformed(expected))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn read_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if stop(ch) {
                break;
            }
            out.push(ch);
            self.pos += 1;
        }

        out
    }

    fn read_pair(&mut self) -> Result<(String, Value), CursorError> {
        self.skip_whitespace();
        let start = self.pos;
        let name = self.read_until(|ch| {
            ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | '"')
        });
        if !is_field_name(&name) {
            return Err(malformed_at(start, "a field name"));
        }
        self.skip_whitespace();
        self.expect(':', "':'")?;
        self.skip_whitespace();

        let value = if self.peek() == Some('"') {
            Value::Text(self.read_quoted()?)
        } else {
            let start = self.pos;
            let raw = self.read_until(|ch| matches!(ch, ',' | ')' | '"'));
            let raw = raw.trim_end();
            if raw.is_empty() {
                return Err(malformed_at(start, "a value"));
            }
            infer_literal(raw)
        };

        Ok((name, value))
    }

    fn read_quoted(&mut self) -> Result<String, CursorError> {
        self.pos += 1;

        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(out),
                Some('\\') => match self.advance() {
                    Some(ch) => out.push(ch),
                    None => break,
                },
                Some(ch) => out.push(ch),
                None => break,
            }
        }

        Err(self.malformed("closing '\"'"))
    }
}
