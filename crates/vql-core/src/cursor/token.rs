//! Opaque cursor token: lowercase hex over a versioned binary payload.
//!
//! Layout (version 2):
//!
//!   [version u8][field count u16]
//!   per field:   [name len u16][name][tag u8][ordered payload]
//!   tie-breaker: [name len u16][name][tag u8][ordered payload]
//!
//! Integers are big-endian. Version 2 writes ints and floats under one number
//! tag; version 1 tokens, which tagged them separately, still decode. A
//! layout change needs a new version tag.

use crate::{
    cursor::{
        Cursor, CursorError,
        ordered::{ByteReader, encode_value},
    },
    value::Value,
};

/// Longest token text accepted, checked before any decoding work.
pub(crate) const MAX_TOKEN_HEX_LEN: usize = 8 * 1024;

// Largest payload whose hex form still fits the decode bound.
pub(crate) const MAX_TOKEN_BYTES: usize = MAX_TOKEN_HEX_LEN / 2;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

///
/// CursorTokenVersion
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CursorTokenVersion {
    V1,
    V2,
}

impl CursorTokenVersion {
    const V1_TAG: u8 = 1;
    const V2_TAG: u8 = 2;

    /// Version written by [`encode`].
    pub(crate) const CURRENT: Self = Self::V2;

    pub(crate) const fn encode(self) -> u8 {
        match self {
            Self::V1 => Self::V1_TAG,
            Self::V2 => Self::V2_TAG,
        }
    }

    pub(crate) const fn decode(raw: u8) -> Result<Self, CursorError> {
        match raw {
            Self::V1_TAG => Ok(Self::V1),
            Self::V2_TAG => Ok(Self::V2),
            version => Err(CursorError::UnsupportedVersion { version }),
        }
    }
}

/// Binary payload before hex transport.
pub(crate) fn encode_bytes(
    fields: &[(String, Value)],
    tie_breaker: &str,
    id: &Value,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(CursorTokenVersion::CURRENT.encode());
    push_len(&mut out, fields.len());

    for (name, value) in fields {
        push_name(&mut out, name);
        encode_value(&mut out, value);
    }
    push_name(&mut out, tie_breaker);
    encode_value(&mut out, id);

    out
}

// Lengths are bounded by `Cursor` construction, which caps the payload size.
fn push_len(out: &mut Vec<u8>, len: usize) {
    let len = u16::try_from(len).unwrap_or(u16::MAX);
    out.extend_from_slice(&len.to_be_bytes());
}

fn push_name(out: &mut Vec<u8>, name: &str) {
    push_len(out, name.len());
    out.extend_from_slice(name.as_bytes());
}

/// Opaque token for a cursor.
#[must_use]
pub fn encode(cursor: &Cursor) -> String {
    let bytes = encode_bytes(cursor.fields(), cursor.tie_breaker(), cursor.id());

    bytes
        .iter()
        .flat_map(|&byte| [byte >> 4, byte & 0x0F])
        .map(|nibble| char::from(HEX_DIGITS[usize::from(nibble)]))
        .collect()
}

/// Decode an opaque token produced by [`encode`].
///
/// Surrounding whitespace is ignored and hex digits may be either case.
pub fn decode(token: &str) -> Result<Cursor, CursorError> {
    let bytes = token_bytes(token)?;
    tracing::trace!(bytes = bytes.len(), "decoding cursor token");

    let mut reader = ByteReader::new(&bytes);
    let version = CursorTokenVersion::decode(reader.read_u8()?)?;

    let count = usize::from(reader.read_u16()?);
    let mut fields = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        let name = reader.read_name()?;
        let value = reader.read_value(version)?;
        fields.push((name, value));
    }

    let tie_breaker = reader.read_name()?;
    let id = reader.read_value(version)?;

    match reader.remaining() {
        0 => Cursor::with_tie_breaker(fields, tie_breaker, id),
        len => Err(CursorError::TrailingBytes { len }),
    }
}

// Hex transport. Bounds are checked on the trimmed text before digits are
// read; an invalid digit reports its 1-based position in that text.
fn token_bytes(token: &str) -> Result<Vec<u8>, CursorError> {
    let text = token.trim();
    let len = text.len();

    if len == 0 {
        return Err(CursorError::Empty);
    }
    if len > MAX_TOKEN_HEX_LEN {
        return Err(CursorError::TooLong {
            len,
            max: MAX_TOKEN_HEX_LEN,
        });
    }
    if !len.is_multiple_of(2) {
        return Err(CursorError::OddLength);
    }

    let nibbles = text
        .bytes()
        .zip(1..)
        .map(|(byte, position)| hex_value(byte).ok_or(CursorError::InvalidHex { position }))
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
