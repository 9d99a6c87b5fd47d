//! Device configuration.

use crate::error::{Error, Result};
use bosswire_sysex::{RolandHeader, DEFAULT_DEVICE_ID};
use serde::{Deserialize, Serialize};

/// Identity and wire options for one connected device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// SysEx device id, 10h unless the unit is set otherwise.
    pub device_id: u8,
    pub model_id: [u8; 4],
    /// Zero-based MIDI channel for Control Change writes.
    pub channel: u8,
    /// Drop DT1 dumps whose checksum does not verify.
    pub verify_checksum: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID,
            model_id: [0; 4],
            channel: 0,
            verify_checksum: false,
        }
    }
}

impl DeviceConfig {
    pub fn for_model(model_id: [u8; 4]) -> Self {
        Self {
            model_id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel > 15 {
            return Err(Error::InvalidConfig(format!(
                "channel {} out of range (0-15)",
                self.channel
            )));
        }
        if self.device_id > 0x7F {
            return Err(Error::InvalidConfig(format!(
                "device id {:02X}h is not a 7-bit value",
                self.device_id
            )));
        }
        if let Some(b) = self.model_id.iter().find(|&&b| b > 0x7F) {
            return Err(Error::InvalidConfig(format!(
                "model id byte {:02X}h is not a 7-bit value",
                b
            )));
        }
        Ok(())
    }

    pub fn header(&self) -> RolandHeader {
        RolandHeader::new(self.device_id, self.model_id)
    }
}
