//! Error types for the SysEx wire layer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("data byte {byte:#04X} at index {index} is not 7-bit")]
    InvalidDataByte { index: usize, byte: u8 },

    #[error("channel {0} out of range 0-15")]
    InvalidChannel(u8),

    #[error("size {0} does not fit in four 7-bit bytes")]
    SizeOutOfRange(u32),

    #[error("not a SysEx message")]
    NotSysEx,

    #[error("MIDI parse error: {0}")]
    Parse(String),

    #[error("Unsupported MIDI message: {0}")]
    UnsupportedMessage(String),
}

impl From<midly::Error> for Error {
    fn from(e: midly::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
