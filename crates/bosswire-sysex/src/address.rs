//! Parameter-memory addresses and request sizes.
//!
//! Roland devices expose their parameters as a memory map addressed by four
//! bytes. Every byte on the wire is a SysEx data byte, so only the low seven
//! bits of each are usable. [`Address`] keeps the raw big-endian value (which is
//! what lookups are keyed on) and can also linearize it for range arithmetic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Four-byte parameter address, ordered by its big-endian value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(u32);

impl Address {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Fails unless `bytes` is exactly four bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 4] = bytes.try_into().map_err(|_| Error::InvalidLength {
            field: "address",
            expected: 4,
            actual: bytes.len(),
        })?;
        Ok(Self::from_bytes(bytes))
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// True when every byte is usable as a SysEx data byte.
    pub fn is_seven_bit(self) -> bool {
        self.to_bytes().iter().all(|&b| b < 0x80)
    }

    /// Position in the 28-bit memory map, treating each byte as 7 bits.
    ///
    /// Only meaningful for [seven-bit](Self::is_seven_bit) addresses.
    pub fn linear(self) -> u32 {
        self.to_bytes()
            .iter()
            .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
    }
}

impl From<[u8; 4]> for Address {
    fn from(bytes: [u8; 4]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let [a, b, c, d] = self.to_bytes();
        write!(f, "{:02X} {:02X} {:02X} {:02X}", a, b, c, d)
    }
}

/// RQ1 size field: a byte count spread over four 7-bit bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size([u8; 4]);

impl Size {
    pub const MAX: u32 = (1 << 28) - 1;

    pub fn from_len(len: u32) -> Result<Self> {
        if len > Self::MAX {
            return Err(Error::SizeOutOfRange(len));
        }
        Ok(Self([
            ((len >> 21) & 0x7F) as u8,
            ((len >> 14) & 0x7F) as u8,
            ((len >> 7) & 0x7F) as u8,
            (len & 0x7F) as u8,
        ]))
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    pub fn len(self) -> u32 {
        Address::from_bytes(self.0).linear()
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}
