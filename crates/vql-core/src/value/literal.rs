//! Literal text <-> typed value conversion shared by the VQL printer and the
//! textual cursor format.
//!
//! Inference is deliberately conservative: text only becomes a number when it
//! is already in canonical numeric form, so identifiers such as `00123`
//! stay text. Canonical integers outside the `i64` range read as floats.

use crate::{
    types::{Float64, Timestamp},
    value::Value,
};
use std::fmt::{self, Write as _};

///
/// LiteralContext
///
/// Where a literal is rendered; decides which characters force quoting.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LiteralContext {
    /// Right-hand side of a `field<op>value` term.
    FieldValue,
    /// Field-less indexed token.
    BareToken,
    /// Value slot inside a textual cursor.
    Cursor,
}

/// Infer a typed value from unquoted literal text.
#[must_use]
pub fn infer_literal(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if is_canonical_integer(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
        // past the i64 range: widen to the nearest float
        if let Some(float) = raw.parse::<f64>().ok().and_then(Float64::try_new) {
            return Value::Float(float);
        }
    }

    if is_canonical_decimal(raw)
        && let Some(float) = raw.parse::<f64>().ok().and_then(Float64::try_new)
    {
        return Value::Float(float);
    }

    if looks_like_date(raw)
        && let Ok(ts) = Timestamp::parse(raw)
    {
        return Value::Timestamp(ts);
    }

    Value::Text(raw.to_string())
}

/// Render a value so that reading it back in `ctx` yields the same value.
pub fn write_literal(out: &mut impl fmt::Write, value: &Value, ctx: LiteralContext) -> fmt::Result {
    match value {
        Value::Text(text) if needs_quotes(text, ctx) => write_quoted(out, text),
        Value::Text(text) => out.write_str(text),
        other => write!(out, "{other}"),
    }
}

/// Render text between double quotes, escaping `"` and `\`.
pub fn write_quoted(out: &mut impl fmt::Write, text: &str) -> fmt::Result {
    out.write_char('"')?;
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            out.write_char('\\')?;
        }
        out.write_char(ch)?;
    }
    out.write_char('"')
}

/// Whether unquoted `text` would be misread in `ctx`.
#[must_use]
pub fn needs_quotes(text: &str, ctx: LiteralContext) -> bool {
    if text.is_empty() || text.ends_with('*') {
        return true;
    }

    if text
        .chars()
        .any(|ch| ch.is_whitespace() || is_reserved_char(ch))
    {
        return true;
    }

    match ctx {
        LiteralContext::FieldValue | LiteralContext::Cursor => {
            !matches!(infer_literal(text), Value::Text(_))
        }
        LiteralContext::BareToken => {
            text.starts_with(['-', '!']) || text.contains([':', '<', '>', '!'])
        }
    }
}

/// Characters that terminate an unquoted literal in either text format.
#[must_use]
pub const fn is_reserved_char(ch: char) -> bool {
    matches!(ch, '(' | ')' | '|' | '&' | ',' | '"' | '\\')
}

// Optional sign, then `0` or a digit run without leading zeros.
fn is_canonical_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);

    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

// Canonical integer part, a dot, and at least one fractional digit.
fn is_canonical_decimal(raw: &str) -> bool {
    let Some((whole, fraction)) = raw.split_once('.') else {
        return false;
    };

    is_canonical_integer(whole)
        && !fraction.is_empty()
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

// Cheap pre-check so arbitrary text does not go through the date parsers.
fn looks_like_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();

    bytes.len() >= 10 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}
