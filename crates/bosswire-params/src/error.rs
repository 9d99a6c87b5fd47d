//! Error types for the parameter subsystem.

use thiserror::Error;

/// Value conversion failures, raised by [`crate::codec`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("expected a {expected} value, got {actual}")]
    TypeMismatch {
        expected: crate::value::ValueKind,
        actual: crate::value::ValueKind,
    },

    #[error("boolean byte must be 0 or 1, got {0}")]
    InvalidBoolean(u8),

    #[error("enum ordinal {ordinal} out of range for {len} constants")]
    EnumOrdinalOutOfRange { ordinal: u8, len: usize },

    #[error("'{0}' is not a member of the enumeration")]
    UnknownEnumLabel(String),

    #[error("integer {0} does not fit in a 7-bit byte")]
    IntOutOfRange(i64),

    #[error("byte {0:#04X} is not ASCII")]
    NonAscii(u8),

    #[error("custom decoder returned no value")]
    CustomDecodeAbsent,

    #[error("custom codec: {0}")]
    Custom(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter already registered: {0}")]
    DuplicateParameter(String),

    #[error("Invalid descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Unsupported operation on '{name}': {reason}")]
    UnsupportedOperation { name: String, reason: &'static str },

    #[error("Conversion failed for '{name}': {source}")]
    Codec {
        name: String,
        #[source]
        source: CodecError,
    },

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("Wire format: {0}")]
    Wire(#[from] bosswire_sysex::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn codec(name: &str, source: CodecError) -> Self {
        Error::Codec {
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_descriptor(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidDescriptor {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
