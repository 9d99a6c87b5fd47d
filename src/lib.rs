//! # bosswire - Roland/Boss MIDI parameter control
//!
//! Drives Roland and Boss hardware over MIDI through named, typed parameters.
//!
//! ## Architecture
//!
//! bosswire is an umbrella crate that coordinates:
//! - **bosswire-sysex** - Wire layer (checksum, RQ1/DT1 builders, Identity Request, inbound classification)
//! - **bosswire-params** - Parameter registry, value codecs, write path and inbound dispatch
//!
//! ## Quick Start
//!
//! ```
//! use bosswire::prelude::*;
//!
//! let (transport, mut sent) = outbound_channel();
//! let device = RolandDevice::builder()
//!     .model_id([0x00, 0x00, 0x00, 0x2F])
//!     .register(ParamDescriptor::sysex(
//!         "patch_name",
//!         [0x20, 0x00, 0x00, 0x00],
//!         16,
//!         ValueCodec::FixedAsciiString,
//!     )?)
//!     .transport(transport)
//!     .build()?;
//!
//! device.start();
//! device.request("patch_name")?;
//! assert_eq!(sent.pop().map(|msg| msg.len()), Some(18));
//!
//! // The reply comes back through the transport's receive side
//! let reply = device.header().data_set(&[0x20, 0x00, 0x00, 0x00], b"CLEAN LEAD      ")?;
//! device.dispatch_raw(&reply)?;
//! assert_eq!(device.get("patch_name"), Some(ParamValue::from("CLEAN LEAD      ")));
//! # Ok::<(), bosswire::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Wire layer plus parameter layer
//! - `params` - Parameter registry and device handle

/// Re-export of bosswire-sysex for direct access
pub use bosswire_sysex as sysex;

#[cfg(feature = "params")]
pub use bosswire_params as params;

pub use bosswire_sysex::{
    checksum, classify, identity_request, verify_checksum, Address, IdentityReply,
    InboundMessage, RolandHeader, Size, SysExKind,
};

#[cfg(feature = "params")]
pub use bosswire_params::{
    outbound_channel, Binding, CustomCodec, DeviceConfig, DeviceStatus, Dispatched, EnumDomain,
    MidiTransport, ParamCatalog, ParamChange, ParamDescriptor, ParamEnum, ParamRegistry,
    ParamValue, ParameterListener, RolandDevice, RolandDeviceBuilder, ValueCodec, ValueKind,
};

pub mod error;
pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Error, Result};

    // Wire layer
    pub use crate::sysex::{Address, InboundMessage, RolandHeader};

    // Devices and parameters
    #[cfg(feature = "params")]
    pub use crate::params::{
        outbound_channel, Binding, DeviceConfig, Dispatched, EnumDomain, ParamCatalog,
        ParamChange, ParamDescriptor, ParamEnum, ParamRegistry, ParamValue, RolandDevice,
        ValueCodec,
    };
}
