//! Order-preserving value encoding for cursor tokens.
//!
//! Each value is a tag byte followed by a payload whose byte order matches
//! canonical order. Ints and floats share the number tag so a mixed pair
//! orders the way `canonical_cmp` does:
//!
//!   [number tag][ordered f64 key][class u8]([ordered i64] for ints)
//!
//! The key is the nearest float to the number. The class byte places ints
//! that round to the same key below, on, or above it, with an int that
//! equals the key sorting ahead of the float itself.

use crate::{
    cursor::{CursorError, token::CursorTokenVersion},
    types::{Float64, Timestamp},
    value::{Value, ValueTag},
};
use std::cmp::Ordering;

const SIGN_BIT: u64 = 1 << 63;

// Ints and floats are both written under the int tag.
const NUMBER_TAG: u8 = ValueTag::Int.to_u8();

///
/// NumberClass
///
/// Position of a number relative to its f64 key.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NumberClass {
    IntBelow = 0,
    IntExact = 1,
    Float = 2,
    IntAbove = 3,
}

impl NumberClass {
    const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Append `value` as tag + ordered payload.
pub(crate) fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Bool(v) => {
            out.push(ValueTag::Bool.to_u8());
            out.push(u8::from(*v));
        }
        Value::Int(v) => {
            let (key, class) = int_number_key(*v);
            out.push(NUMBER_TAG);
            out.extend_from_slice(&ordered_f64_bytes(key));
            out.push(class.to_u8());
            out.extend_from_slice(&ordered_i64_bytes(*v));
        }
        Value::Float(v) => {
            out.push(NUMBER_TAG);
            out.extend_from_slice(&ordered_f64_bytes(v.get()));
            out.push(NumberClass::Float.to_u8());
        }
        Value::Timestamp(v) => {
            out.push(ValueTag::Timestamp.to_u8());
            out.extend_from_slice(&ordered_i64_bytes(v.as_micros()));
        }
        Value::Text(v) => {
            out.push(ValueTag::Text.to_u8());
            push_terminated_bytes(out, v.as_bytes());
        }
    }
}

// Nearest f64 to `value` plus where the exact integer sits around it.
#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn int_number_key(value: i64) -> (f64, NumberClass) {
    let key = value as f64;
    let class = match i128::from(value).cmp(&(key as i128)) {
        Ordering::Less => NumberClass::IntBelow,
        Ordering::Equal => NumberClass::IntExact,
        Ordering::Greater => NumberClass::IntAbove,
    };

    (key, class)
}

const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    (value.cast_unsigned() ^ SIGN_BIT).to_be_bytes()
}

const fn ordered_i64_from_bytes(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ SIGN_BIT).cast_signed()
}

const fn ordered_f64_bytes(value: f64) -> [u8; 8] {
    let bits = value.to_bits();
    let ordered = if bits & SIGN_BIT == 0 {
        bits ^ SIGN_BIT
    } else {
        !bits
    };

    ordered.to_be_bytes()
}

const fn f64_bits_from_ordered(bytes: [u8; 8]) -> u64 {
    let ordered = u64::from_be_bytes(bytes);
    if ordered & SIGN_BIT == 0 {
        !ordered
    } else {
        ordered ^ SIGN_BIT
    }
}

fn float_from_ordered(bytes: [u8; 8]) -> Result<Value, CursorError> {
    Float64::try_from_bits(f64_bits_from_ordered(bytes))
        .map(Value::Float)
        .map_err(|_| CursorError::NonFiniteFloat)
}

// 0x00 escapes as 0x00 0xFF; the value ends with 0x00 0x00.
fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == 0 {
            out.extend_from_slice(&[0, 0xFF]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&[0, 0]);
}

///
/// ByteReader
///
/// Bounds-checked cursor over token bytes; running out is `Truncated`.
///

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CursorError> {
        let (&byte, rest) = self.bytes.split_first().ok_or(CursorError::Truncated)?;
        self.bytes = rest;

        Ok(byte)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, CursorError> {
        self.read_array().map(u16::from_be_bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let (head, rest) = self
            .bytes
            .split_first_chunk::<N>()
            .ok_or(CursorError::Truncated)?;
        self.bytes = rest;

        Ok(*head)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        if self.bytes.len() < len {
            return Err(CursorError::Truncated);
        }
        let (head, rest) = self.bytes.split_at(len);
        self.bytes = rest;

        Ok(head)
    }

    /// `[u16 len][utf-8 bytes]`.
    pub(crate) fn read_name(&mut self) -> Result<String, CursorError> {
        let len = usize::from(self.read_u16()?);
        let bytes = self.read_slice(len)?;

        String::from_utf8(bytes.to_vec()).map_err(|_| CursorError::InvalidUtf8)
    }

    /// Tag byte plus ordered payload, laid out as `version` wrote it.
    ///
    /// Version 1 tokens carry ints and floats under separate tags with bare
    /// sign-biased payloads.
    pub(crate) fn read_value(&mut self, version: CursorTokenVersion) -> Result<Value, CursorError> {
        let raw = self.read_u8()?;
        let tag = ValueTag::from_u8(raw).ok_or(CursorError::UnknownValueTag { tag: raw })?;

        match (tag, version) {
            (ValueTag::Bool, _) => match self.read_u8()? {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                byte => Err(CursorError::InvalidBool { byte }),
            },
            (ValueTag::Int, CursorTokenVersion::V2) => self.read_number(),
            (ValueTag::Int, CursorTokenVersion::V1) => {
                Ok(Value::Int(ordered_i64_from_bytes(self.read_array()?)))
            }
            (ValueTag::Float, CursorTokenVersion::V1) => float_from_ordered(self.read_array()?),
            (ValueTag::Float, CursorTokenVersion::V2) => {
                Err(CursorError::UnknownValueTag { tag: raw })
            }
            (ValueTag::Timestamp, _) => {
                let micros = ordered_i64_from_bytes(self.read_array()?);
                Timestamp::from_micros(micros)
                    .map(Value::Timestamp)
                    .ok_or(CursorError::InvalidTimestamp { micros })
            }
            (ValueTag::Text, _) => {
                let bytes = self.read_terminated_bytes()?;
                String::from_utf8(bytes)
                    .map(Value::Text)
                    .map_err(|_| CursorError::InvalidUtf8)
            }
        }
    }

    // An int must carry exactly the key and class its value implies.
    fn read_number(&mut self) -> Result<Value, CursorError> {
        let key = self.read_array()?;
        let class = self.read_u8()?;
        if class == NumberClass::Float.to_u8() {
            return float_from_ordered(key);
        }

        let value = ordered_i64_from_bytes(self.read_array()?);
        let (expected_key, expected_class) = int_number_key(value);
        if ordered_f64_bytes(expected_key) != key || expected_class.to_u8() != class {
            return Err(CursorError::NonCanonicalNumber);
        }

        Ok(Value::Int(value))
    }

    fn read_terminated_bytes(&mut self) -> Result<Vec<u8>, CursorError> {
        let mut out = Vec::new();
        loop {
            match self.read_u8()? {
                0 => match self.read_u8()? {
                    0 => return Ok(out),
                    0xFF => out.push(0),
                    _ => return Err(CursorError::InvalidTextEscape),
                },
                byte => out.push(byte),
            }
        }
    }
}

///
/// TESTS
///
