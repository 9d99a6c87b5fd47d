//! Parameter layer for Roland/Boss devices.
//!
//! A device model is described as a catalog of named parameters, each with a
//! value codec and a wire binding (Program Change, Control Change or a SysEx
//! address). [`RolandDevice`] ties a registry to a transport:
//!
//! - **Write path**: `put(name, value)` encodes and sends CC or DT1
//! - **Read requests**: RQ1 per parameter, or for every top-level block
//! - **Inbound dispatch**: CC, Program Change and DT1 dumps update a value cache
//!   and notify listeners
//!
//! No threads are spawned. Writes serialize on a per-device lock; dispatch runs
//! lock-free on the caller's thread.

pub mod error;
pub use error::{CodecError, Error, Result};

pub mod value;
pub use value::{EnumDomain, ParamEnum, ParamValue, ValueKind};

pub mod codec;
pub use codec::{CustomCodec, ValueCodec};

pub mod descriptor;
pub use descriptor::{Binding, ParamDescriptor};

pub mod registry;
pub use registry::{ParamCatalog, ParamRegistry};

pub mod listener;
pub use listener::{
    param_change_channel, ChannelListener, IdentityListener, ParamChange, ParameterListener,
};

pub mod transport;
pub use transport::{
    outbound_channel, outbound_channel_with_capacity, MidiTransport, OutboundConsumer,
    OutboundProducer, TransportError,
};

pub mod device;
pub use device::{
    raw_patch_passthrough, DeviceConfig, DeviceStatus, Dispatched, PatchDecoder, RolandDevice,
    RolandDeviceBuilder,
};

pub use bosswire_sysex::{Address, IdentityReply, InboundMessage};
