//! Inbound MIDI messages as seen by a device driver.
//!
//! Transports normally hand over messages already split by kind; [`InboundMessage::parse`]
//! covers the ones that deliver raw bytes.

use crate::error::{Error, Result};
use crate::outbound::SYSEX_START;
use midly::{live::LiveEvent, MidiMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Full exclusive message, `F0` through `F7`. The vendor id is the byte
    /// after `F0`, peeled off for convenience.
    SysEx { vendor_id: u8, bytes: Vec<u8> },
}

impl InboundMessage {
    /// Wraps a complete exclusive message.
    pub fn sysex(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        match bytes.as_slice() {
            &[SYSEX_START, vendor_id, ..] => Ok(Self::SysEx { vendor_id, bytes }),
            _ => Err(Error::NotSysEx),
        }
    }

    /// Classifies one raw MIDI message.
    ///
    /// Channel voice messages other than notes, program and control changes
    /// are rejected, as are system common and realtime messages.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        match raw.first() {
            None => Err(Error::InvalidLength {
                field: "message",
                expected: 1,
                actual: 0,
            }),
            Some(&SYSEX_START) => Self::sysex(raw),
            Some(_) => match LiveEvent::parse(raw)? {
                LiveEvent::Midi { channel, message } => {
                    let channel = channel.as_int();
                    match message {
                        MidiMessage::NoteOn { key, vel } => Ok(Self::NoteOn {
                            channel,
                            note: key.as_int(),
                            velocity: vel.as_int(),
                        }),
                        MidiMessage::NoteOff { key, vel } => Ok(Self::NoteOff {
                            channel,
                            note: key.as_int(),
                            velocity: vel.as_int(),
                        }),
                        MidiMessage::ProgramChange { program } => Ok(Self::ProgramChange {
                            channel,
                            program: program.as_int(),
                        }),
                        MidiMessage::Controller { controller, value } => Ok(Self::ControlChange {
                            channel,
                            controller: controller.as_int(),
                            value: value.as_int(),
                        }),
                        other => Err(Error::UnsupportedMessage(format!("{:?}", other))),
                    }
                }
                other => Err(Error::UnsupportedMessage(format!("{:?}", other))),
            },
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ControlChange { channel, .. } => Some(channel),
            Self::SysEx { .. } => None,
        }
    }

    #[inline]
    pub fn is_note(&self) -> bool {
        matches!(self, Self::NoteOn { .. } | Self::NoteOff { .. })
    }
}
