//! Typed parameter values.
//!
//! Every parameter exposes one [`ValueKind`]. Values cross the device boundary as
//! [`ParamValue`]; Rust enums plug in through [`ParamEnum`], which gives the
//! ordered constant list that `EnumInByte` indexes into.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Enum,
    Text,
    Bytes,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Enum => "enum",
            ValueKind::Text => "string",
            ValueKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    /// Label of an enumeration constant.
    Enum(String),
    Text(String),
    Bytes(Vec<u8>),
}

impl ParamValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Bool(_) => ValueKind::Bool,
            ParamValue::Int(_) => ValueKind::Int,
            ParamValue::Enum(_) => ValueKind::Enum,
            ParamValue::Text(_) => ValueKind::Text,
            ParamValue::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn enum_of<E: ParamEnum>(value: E) -> Self {
        ParamValue::Enum(value.label().to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParamValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            ParamValue::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Text of a string or the label of an enum constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) | ParamValue::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ParamValue::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn to_enum<E: ParamEnum>(&self) -> Option<E> {
        match self {
            ParamValue::Enum(label) => E::from_label(label),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", if *b { "on" } else { "off" }),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Enum(label) => f.write_str(label),
            ParamValue::Text(s) => write!(f, "{:?}", s),
            ParamValue::Bytes(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02X}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u8> for ParamValue {
    fn from(value: u8) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(value: Vec<u8>) -> Self {
        ParamValue::Bytes(value)
    }
}

/// A Rust enum usable with `EnumInByte`.
///
/// `VARIANTS` order is the wire order: the byte on the wire is the index into it.
///
/// ```
/// use bosswire_params::ParamEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Bank { User, Preset }
///
/// impl ParamEnum for Bank {
///     const VARIANTS: &'static [Self] = &[Bank::User, Bank::Preset];
///     fn label(self) -> &'static str {
///         match self {
///             Bank::User => "USER",
///             Bank::Preset => "PRESET",
///         }
///     }
/// }
///
/// assert_eq!(Bank::Preset.ordinal(), 1);
/// assert_eq!(Bank::from_label("USER"), Some(Bank::User));
/// ```
pub trait ParamEnum: Copy + PartialEq + 'static {
    const VARIANTS: &'static [Self];

    fn label(self) -> &'static str;

    fn ordinal(self) -> usize {
        Self::VARIANTS
            .iter()
            .position(|&v| v == self)
            .unwrap_or(usize::MAX)
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.label() == label)
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VARIANTS.get(ordinal).copied()
    }
}

/// Ordered constant labels of an enumeration parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDomain {
    labels: Arc<[String]>,
}

impl EnumDomain {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self {
            labels: labels.into(),
        }
    }

    pub fn of<E: ParamEnum>() -> Self {
        Self::new(E::VARIANTS.iter().map(|v| v.label()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, ordinal: usize) -> Option<&str> {
        self.labels.get(ordinal).map(String::as_str)
    }

    pub fn ordinal_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
