//! Roland/Boss SysEx wire layer.
//!
//! Pure functions and types, no I/O:
//!
//! - **Checksum**: Roland 7-bit checksum and verification
//! - **Addresses**: four-byte parameter addresses and RQ1 size packing
//! - **Outbound**: RQ1 (data request), DT1 (data set), Identity Request, Control Change
//! - **Inbound**: raw message classification, Identity Reply and DT1 dump recognition
//!
//! # Example
//!
//! ```
//! use bosswire_sysex::{classify, RolandHeader, SysExKind};
//!
//! let header = RolandHeader::for_model([0x00, 0x00, 0x00, 0x2F]);
//! let msg = header.data_set(&[0x20, 0x00, 0x00, 0x10], &[0x01])?;
//!
//! match classify(&msg) {
//!     SysExKind::DataSet(dump) => assert_eq!(dump.payload, &[0x01]),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok::<(), bosswire_sysex::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod address;
pub use address::{Address, Size};

pub mod checksum;
pub use checksum::{checksum, verify_checksum};

pub mod outbound;
pub use outbound::{
    control_change, identity_request, verify_frame_checksum, RolandHeader, CM_ID_DT1, CM_ID_RQ1,
    DATA_REQUEST_LEN, DATA_SET_OVERHEAD, DEFAULT_DEVICE_ID, DV_ID_BROADCAST, MF_ID_ROLAND,
    SYSEX_END, SYSEX_START,
};

pub mod classify;
pub use classify::{
    classify, parse_data_set, parse_identity_reply, DataSetDump, IdentityReply, SysExKind,
    DATA_SET_PAYLOAD_OFFSET, IDENTITY_REPLY_LEN,
};

pub mod inbound;
pub use inbound::InboundMessage;
