//! Recognition of the inbound exclusive messages a Roland driver cares about.

use crate::address::Address;
use crate::checksum::verify_checksum;
use crate::outbound::{
    CM_ID_DT1, DATA_SET_OVERHEAD, HEADER_LEN, MF_ID_ROLAND, MF_ID_UNIVERSAL_NON_REAL_TIME,
    SYSEX_END, SYSEX_START,
};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

pub const IDENTITY_REPLY_LEN: usize = 15;

/// Offset of the first data byte in a DT1 frame.
pub const DATA_SET_PAYLOAD_OFFSET: usize = 12;

/// Reply to a universal Identity Request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityReply {
    pub device_id: u8,
    pub family_code: [u8; 2],
    pub family_number: [u8; 4],
    pub software_revision: [u8; 2],
}

impl Display for IdentityReply {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Device {:02X}h, family {:02X} {:02X}, number {}, revision {:02X} {:02X}",
            self.device_id,
            self.family_code[0],
            self.family_code[1],
            Address::from_bytes(self.family_number),
            self.software_revision[0],
            self.software_revision[1],
        )
    }
}

/// A DT1 received from the device, borrowing from the raw frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSetDump<'a> {
    pub device_id: u8,
    pub model_id: [u8; 4],
    pub address: Address,
    pub payload: &'a [u8],
    pub checksum: u8,
    checked: &'a [u8],
}

impl DataSetDump<'_> {
    /// Wrong checksums are tolerated unless the caller asks; devices in the
    /// field are not always strict about them.
    pub fn checksum_valid(&self) -> bool {
        verify_checksum(self.checked)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysExKind<'a> {
    IdentityReply(IdentityReply),
    DataSet(DataSetDump<'a>),
    Unrecognized,
}

/// Sorts a complete exclusive message (`F0` .. `F7`) into one of the shapes
/// the dispatcher handles.
pub fn classify(bytes: &[u8]) -> SysExKind<'_> {
    if let Some(reply) = parse_identity_reply(bytes) {
        return SysExKind::IdentityReply(reply);
    }
    if let Some(dump) = parse_data_set(bytes) {
        return SysExKind::DataSet(dump);
    }
    SysExKind::Unrecognized
}

pub fn parse_identity_reply(bytes: &[u8]) -> Option<IdentityReply> {
    let &[SYSEX_START, MF_ID_UNIVERSAL_NON_REAL_TIME, device_id, 0x06, 0x02, MF_ID_ROLAND, f0, f1, n0, n1, n2, n3, r0, r1, SYSEX_END] =
        bytes
    else {
        return None;
    };
    Some(IdentityReply {
        device_id,
        family_code: [f0, f1],
        family_number: [n0, n1, n2, n3],
        software_revision: [r0, r1],
    })
}

pub fn parse_data_set(bytes: &[u8]) -> Option<DataSetDump<'_>> {
    if bytes.len() <= DATA_SET_OVERHEAD {
        return None;
    }
    let &[SYSEX_START, MF_ID_ROLAND, device_id, m0, m1, m2, m3, CM_ID_DT1, a0, a1, a2, a3, ref rest @ ..] =
        bytes
    else {
        return None;
    };
    let &[ref payload @ .., checksum, SYSEX_END] = rest else {
        return None;
    };
    debug_assert_eq!(payload.len(), bytes.len() - DATA_SET_OVERHEAD);

    Some(DataSetDump {
        device_id,
        model_id: [m0, m1, m2, m3],
        address: Address::from_bytes([a0, a1, a2, a3]),
        payload,
        checksum,
        checked: &bytes[HEADER_LEN + 1..bytes.len() - 1],
    })
}
