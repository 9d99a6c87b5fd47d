//! Test helpers and fixtures for bosswire integration tests
//!
//! Provides a small amplifier catalog in the shape real device tables take:
//! a patch-bound program number, Control Change switches, one SysEx block with
//! child views into it, and a fixed-width patch name.

#![allow(dead_code)]

use bosswire::params::{outbound_channel, OutboundConsumer};
use bosswire::prelude::*;

/// Model id used by every fixture.
pub const TEST_MODEL_ID: [u8; 4] = [0x00, 0x00, 0x00, 0x33];

pub const PATCH_NAME_ADDR: [u8; 4] = [0x60, 0x00, 0x00, 0x00];
pub const AMP_BLOCK_ADDR: [u8; 4] = [0x60, 0x00, 0x00, 0x21];
pub const AMP_TYPE_ADDR: [u8; 4] = [0x60, 0x00, 0x00, 0x22];
pub const AMP_GAIN_ADDR: [u8; 4] = [0x60, 0x00, 0x00, 0x23];

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmpType {
    Acoustic,
    Clean,
    Crunch,
    Lead,
    Brown,
}

impl ParamEnum for AmpType {
    const VARIANTS: &'static [Self] = &[
        AmpType::Acoustic,
        AmpType::Clean,
        AmpType::Crunch,
        AmpType::Lead,
        AmpType::Brown,
    ];

    fn label(self) -> &'static str {
        match self {
            AmpType::Acoustic => "ACOUSTIC",
            AmpType::Clean => "CLEAN",
            AmpType::Crunch => "CRUNCH",
            AmpType::Lead => "LEAD",
            AmpType::Brown => "BROWN",
        }
    }
}

pub struct AmpCatalog;

impl ParamCatalog for AmpCatalog {
    fn populate(&self, registry: &mut ParamRegistry) -> bosswire::params::Result<()> {
        registry.register_all([
            ParamDescriptor::program_change("patch")?,
            ParamDescriptor::control_change("booster_on", 16, ValueCodec::BooleanInByte)?,
            ParamDescriptor::control_change("booster_level", 16, ValueCodec::IntInByte)?,
            ParamDescriptor::control_change("reverb_on", 19, ValueCodec::BooleanInByte)?,
            ParamDescriptor::sysex(
                "patch_name",
                PATCH_NAME_ADDR,
                16,
                ValueCodec::FixedAsciiString,
            )?,
            ParamDescriptor::sysex("amp_block", AMP_BLOCK_ADDR, 5, ValueCodec::None)?,
            ParamDescriptor::sysex(
                "amp_type",
                AMP_TYPE_ADDR,
                1,
                ValueCodec::EnumInByte(EnumDomain::of::<AmpType>()),
            )?
            .with_parent("amp_block")?,
            ParamDescriptor::sysex("amp_gain", AMP_GAIN_ADDR, 1, ValueCodec::IntInByte)?
                .with_parent("amp_block")?,
        ])
    }
}

/// A running device over the amp catalog and the consumer end of its transport.
pub fn test_device() -> (RolandDevice, OutboundConsumer) {
    init_tracing();
    let (transport, sent) = outbound_channel();
    let device = RolandDevice::builder()
        .model_id(TEST_MODEL_ID)
        .catalog(AmpCatalog)
        .transport(transport)
        .build()
        .expect("Failed to create test device");
    device.start();
    (device, sent)
}
