//! Outbound message builders: RQ1, DT1, Identity Request and Control Change.
//!
//! ```text
//! RQ1  F0 41 <dev> <model x4> 11 <address x4> <size x4> <sum> F7
//! DT1  F0 41 <dev> <model x4> 12 <address x4> <data ...>  <sum> F7
//! ```
//!
//! The checksum covers address through the last data (or size) byte, never the
//! header.

use crate::checksum::checksum;
use crate::error::{Error, Result};

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

pub const MF_ID_ROLAND: u8 = 0x41;
pub const MF_ID_UNIVERSAL_NON_REAL_TIME: u8 = 0x7E;

pub const DEFAULT_DEVICE_ID: u8 = 0x10;
/// "All call" device id for universal messages.
pub const DV_ID_BROADCAST: u8 = 0x7F;

/// "Request data 1" aka "RQ1".
pub const CM_ID_RQ1: u8 = 0x11;
/// "Data set 1" aka "DT1".
pub const CM_ID_DT1: u8 = 0x12;

/// `F0 41 <dev> <model x4>`
pub const HEADER_LEN: usize = 7;
pub const DATA_REQUEST_LEN: usize = 18;
/// Everything in a DT1 except the data bytes.
pub const DATA_SET_OVERHEAD: usize = 14;

/// Device and model ids that prefix every Roland exclusive message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolandHeader {
    pub device_id: u8,
    pub model_id: [u8; 4],
}

impl RolandHeader {
    pub const fn new(device_id: u8, model_id: [u8; 4]) -> Self {
        Self {
            device_id,
            model_id,
        }
    }

    /// Header with the default device id (`10h`).
    pub const fn for_model(model_id: [u8; 4]) -> Self {
        Self::new(DEFAULT_DEVICE_ID, model_id)
    }

    fn begin(&self, capacity: usize, command: u8) -> Vec<u8> {
        let mut msg = Vec::with_capacity(capacity);
        msg.extend_from_slice(&[SYSEX_START, MF_ID_ROLAND, self.device_id]);
        msg.extend_from_slice(&self.model_id);
        msg.push(command);
        msg
    }

    /// Builds an 18-byte RQ1 asking the device to dump `size` bytes from
    /// `address`.
    pub fn data_request(&self, address: &[u8], size: &[u8]) -> Result<Vec<u8>> {
        require_four("address", address)?;
        require_four("size", size)?;

        let mut msg = self.begin(DATA_REQUEST_LEN, CM_ID_RQ1);
        msg.extend_from_slice(address);
        msg.extend_from_slice(size);
        msg.push(checksum(&msg[HEADER_LEN + 1..]));
        msg.push(SYSEX_END);
        Ok(msg)
    }

    /// Builds a DT1 writing `value` at `address`.
    ///
    /// Every value byte must be 7-bit, otherwise it would terminate or corrupt
    /// the exclusive message on the wire.
    pub fn data_set(&self, address: &[u8], value: &[u8]) -> Result<Vec<u8>> {
        require_four("address", address)?;
        if let Some((index, &byte)) = value.iter().enumerate().find(|&(_, &b)| b >= 0x80) {
            return Err(Error::InvalidDataByte { index, byte });
        }

        let mut msg = self.begin(DATA_SET_OVERHEAD + value.len(), CM_ID_DT1);
        msg.extend_from_slice(address);
        msg.extend_from_slice(value);
        msg.push(checksum(&msg[HEADER_LEN + 1..]));
        msg.push(SYSEX_END);
        Ok(msg)
    }
}

impl Default for RolandHeader {
    fn default() -> Self {
        Self::for_model([0; 4])
    }
}

/// Universal non-realtime Identity Request: `F0 7E <dev> 06 01 F7`.
pub fn identity_request(device_id: u8) -> Vec<u8> {
    vec![
        SYSEX_START,
        MF_ID_UNIVERSAL_NON_REAL_TIME,
        device_id & 0x7F,
        0x06,
        0x01,
        SYSEX_END,
    ]
}

/// Builds a Control Change. Channel is zero-based; controller and value must
/// be 7-bit.
pub fn control_change(channel: u8, controller: u8, value: u8) -> Result<Vec<u8>> {
    if channel > 15 {
        return Err(Error::InvalidChannel(channel));
    }
    if let Some((index, &byte)) = [controller, value]
        .iter()
        .enumerate()
        .find(|&(_, &b)| b >= 0x80)
    {
        return Err(Error::InvalidDataByte { index, byte });
    }
    Ok(vec![0xB0 | channel, controller, value])
}

/// Re-checks the checksum of a complete DT1 or RQ1 frame.
pub fn verify_frame_checksum(msg: &[u8]) -> bool {
    msg.len() > HEADER_LEN + 2
        && crate::checksum::verify_checksum(&msg[HEADER_LEN + 1..msg.len() - 1])
}

fn require_four(field: &'static str, bytes: &[u8]) -> Result<()> {
    if bytes.len() != 4 {
        return Err(Error::InvalidLength {
            field,
            expected: 4,
            actual: bytes.len(),
        });
    }
    Ok(())
}
