//! Conversion between wire bytes and [`ParamValue`]s.
//!
//! Stateless. The declared length of the owning descriptor is passed in by the
//! caller because only fixed strings and custom codecs depend on it.

use crate::error::CodecError;
use crate::value::{EnumDomain, ParamValue, ValueKind};
use std::fmt;
use std::sync::Arc;

type DecodeFn = dyn Fn(&[u8]) -> Option<ParamValue> + Send + Sync;
type EncodeFn = dyn Fn(&ParamValue) -> Result<Vec<u8>, CodecError> + Send + Sync;

const ASCII_SPACE: u8 = 0x20;

/// User-supplied converter pair for values no built-in codec covers.
#[derive(Clone)]
pub struct CustomCodec {
    kind: ValueKind,
    decode: Arc<DecodeFn>,
    encode: Arc<EncodeFn>,
}

impl CustomCodec {
    /// `decode` must return a value for every well-formed input, and `encode`
    /// must return exactly the descriptor's declared length. Breaking either
    /// surfaces as a [`CodecError`] at conversion time.
    pub fn new<D, E>(kind: ValueKind, decode: D, encode: E) -> Self
    where
        D: Fn(&[u8]) -> Option<ParamValue> + Send + Sync + 'static,
        E: Fn(&ParamValue) -> Result<Vec<u8>, CodecError> + Send + Sync + 'static,
    {
        Self {
            kind,
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl fmt::Debug for CustomCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCodec")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum ValueCodec {
    /// Raw bytes in both directions.
    None,
    BooleanInByte,
    /// Zero-based ordinal into the domain.
    EnumInByte(EnumDomain),
    IntInByte,
    /// US-ASCII, right-padded with spaces to the declared length.
    FixedAsciiString,
    Custom(CustomCodec),
}

impl ValueCodec {
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ValueCodec::None => ValueKind::Bytes,
            ValueCodec::BooleanInByte => ValueKind::Bool,
            ValueCodec::EnumInByte(_) => ValueKind::Enum,
            ValueCodec::IntInByte => ValueKind::Int,
            ValueCodec::FixedAsciiString => ValueKind::Text,
            ValueCodec::Custom(custom) => custom.kind,
        }
    }

    /// Codecs whose wire form is always exactly one byte.
    pub fn is_single_byte(&self) -> bool {
        matches!(
            self,
            ValueCodec::BooleanInByte | ValueCodec::EnumInByte(_) | ValueCodec::IntInByte
        )
    }

    pub fn decode(&self, bytes: &[u8], declared_len: usize) -> Result<ParamValue, CodecError> {
        match self {
            ValueCodec::None => Ok(ParamValue::Bytes(bytes.to_vec())),
            ValueCodec::BooleanInByte => match single_byte(bytes)? {
                0 => Ok(ParamValue::Bool(false)),
                1 => Ok(ParamValue::Bool(true)),
                other => Err(CodecError::InvalidBoolean(other)),
            },
            ValueCodec::EnumInByte(domain) => {
                let ordinal = single_byte(bytes)?;
                domain
                    .label(ordinal as usize)
                    .map(|label| ParamValue::Enum(label.to_string()))
                    .ok_or(CodecError::EnumOrdinalOutOfRange {
                        ordinal,
                        len: domain.len(),
                    })
            }
            ValueCodec::IntInByte => match single_byte(bytes)? {
                b @ 0..=0x7F => Ok(ParamValue::Int(b.into())),
                b => Err(CodecError::IntOutOfRange(b.into())),
            },
            ValueCodec::FixedAsciiString => {
                expect_len(bytes.len(), declared_len)?;
                if let Some(&b) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(CodecError::NonAscii(b));
                }
                Ok(ParamValue::Text(bytes.iter().map(|&b| b as char).collect()))
            }
            ValueCodec::Custom(custom) => {
                let value = (custom.decode)(bytes).ok_or(CodecError::CustomDecodeAbsent)?;
                expect_kind(custom.kind, &value)?;
                Ok(value)
            }
        }
    }

    pub fn encode(&self, value: &ParamValue, declared_len: usize) -> Result<Vec<u8>, CodecError> {
        expect_kind(self.value_kind(), value)?;
        match (self, value) {
            (ValueCodec::None, ParamValue::Bytes(bytes)) => Ok(bytes.clone()),
            (ValueCodec::BooleanInByte, ParamValue::Bool(b)) => Ok(vec![u8::from(*b)]),
            (ValueCodec::EnumInByte(domain), ParamValue::Enum(label)) => {
                let ordinal = domain
                    .ordinal_of(label)
                    .ok_or_else(|| CodecError::UnknownEnumLabel(label.clone()))?;
                let byte = u8::try_from(ordinal)
                    .ok()
                    .filter(|b| *b <= 0x7F)
                    .ok_or(CodecError::IntOutOfRange(ordinal as i64))?;
                Ok(vec![byte])
            }
            (ValueCodec::IntInByte, ParamValue::Int(i)) => match *i {
                0..=0x7F => Ok(vec![*i as u8]),
                other => Err(CodecError::IntOutOfRange(other.into())),
            },
            (ValueCodec::FixedAsciiString, ParamValue::Text(text)) => {
                if let Some(&b) = text.as_bytes().iter().find(|b| !b.is_ascii()) {
                    return Err(CodecError::NonAscii(b));
                }
                let mut bytes: Vec<u8> = text.bytes().take(declared_len).collect();
                bytes.resize(declared_len, ASCII_SPACE);
                Ok(bytes)
            }
            (ValueCodec::Custom(custom), value) => {
                let bytes = (custom.encode)(value)?;
                expect_len(bytes.len(), declared_len)?;
                Ok(bytes)
            }
            (codec, value) => Err(CodecError::TypeMismatch {
                expected: codec.value_kind(),
                actual: value.kind(),
            }),
        }
    }
}

fn single_byte(bytes: &[u8]) -> Result<u8, CodecError> {
    match *bytes {
        [b] => Ok(b),
        _ => Err(CodecError::LengthMismatch {
            expected: 1,
            actual: bytes.len(),
        }),
    }
}

fn expect_len(actual: usize, expected: usize) -> Result<(), CodecError> {
    if actual != expected {
        return Err(CodecError::LengthMismatch { expected, actual });
    }
    Ok(())
}

fn expect_kind(expected: ValueKind, value: &ParamValue) -> Result<(), CodecError> {
    if value.kind() != expected {
        return Err(CodecError::TypeMismatch {
            expected,
            actual: value.kind(),
        });
    }
    Ok(())
}
