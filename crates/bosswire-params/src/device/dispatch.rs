//! Inbound dispatch: messages from the device into the parameter cache.
//!
//! Runs on whatever thread the transport delivers on and never takes the write
//! lock. Every descriptor a message addresses is decoded before anything is
//! applied, so a message that fails to decode leaves the cache untouched.

use super::RolandDevice;
use crate::descriptor::ParamDescriptor;
use crate::error::{Error, Result};
use crate::listener::ParamChange;
use bosswire_sysex::{classify, DataSetDump, IdentityReply, InboundMessage, SysExKind};
use std::sync::Arc;

/// What a dispatched message amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Parameters whose cached value was updated, in registration order.
    Parameters(Vec<ParamChange>),
    /// Not a parameter message; the host should handle it.
    PassThrough(InboundMessage),
    Identity(IdentityReply),
    /// Nothing addressed it. Already logged.
    Dropped,
}

impl RolandDevice {
    pub fn dispatch(&self, message: &InboundMessage) -> Result<Dispatched> {
        match *message {
            InboundMessage::NoteOn { .. } | InboundMessage::NoteOff { .. } => {
                Ok(Dispatched::PassThrough(message.clone()))
            }
            InboundMessage::ProgramChange { program, .. } => Ok(self.program_change(program)),
            InboundMessage::ControlChange {
                controller, value, ..
            } => self.control_change(controller, value),
            InboundMessage::SysEx { ref bytes, .. } => self.sysex(bytes),
        }
    }

    /// Parses one raw message and dispatches it.
    pub fn dispatch_raw(&self, raw: &[u8]) -> Result<Dispatched> {
        let message = InboundMessage::parse(raw)?;
        self.dispatch(&message)
    }

    fn program_change(&self, program: u8) -> Dispatched {
        let targets = self.inner.registry.patch_bound();
        if targets.is_empty() {
            tracing::debug!("Program change {} with no patch parameter", program);
            return Dispatched::Dropped;
        }
        let value = (self.inner.patch_decoder)(program);
        let changes = targets
            .iter()
            .map(|d| ParamChange::new(d.name(), Some(value.clone())))
            .collect();
        Dispatched::Parameters(self.apply(changes))
    }

    fn control_change(&self, controller: u8, value: u8) -> Result<Dispatched> {
        if controller > 0x7F || value > 0x7F {
            tracing::warn!(
                "Control change out of range: controller {}, value {}",
                controller,
                value
            );
            return Err(Error::Protocol(format!(
                "control change {} = {} is not 7-bit",
                controller, value
            )));
        }

        let targets = self.inner.registry.by_controller(controller);
        if targets.is_empty() {
            tracing::debug!("No parameter at controller {}", controller);
            return Ok(Dispatched::Dropped);
        }
        let changes = decode_all(targets, &[value])?;
        Ok(Dispatched::Parameters(self.apply(changes)))
    }

    fn sysex(&self, bytes: &[u8]) -> Result<Dispatched> {
        match classify(bytes) {
            SysExKind::IdentityReply(reply) => {
                match &*self.inner.identity_listener.load() {
                    Some(listener) => listener.identity_received(&reply),
                    None => tracing::debug!("Identity reply: {}", reply),
                }
                Ok(Dispatched::Identity(reply))
            }
            SysExKind::DataSet(dump) => self.data_set(&dump),
            SysExKind::Unrecognized => {
                tracing::warn!("Dropping unrecognized SysEx ({} bytes)", bytes.len());
                Ok(Dispatched::Dropped)
            }
        }
    }

    fn data_set(&self, dump: &DataSetDump<'_>) -> Result<Dispatched> {
        let config = &self.inner.config;
        if dump.device_id != config.device_id {
            tracing::warn!(
                "Dropping DT1 for device {:02X}h, expected {:02X}h",
                dump.device_id,
                config.device_id
            );
            return Ok(Dispatched::Dropped);
        }
        if config.verify_checksum && !dump.checksum_valid() {
            tracing::warn!("Dropping DT1 at {} with bad checksum", dump.address);
            return Ok(Dispatched::Dropped);
        }

        let bucket = self.inner.registry.by_address(dump.address);
        if bucket.is_empty() {
            tracing::warn!("Dropping DT1 for unknown address {}", dump.address);
            return Ok(Dispatched::Dropped);
        }

        // Descriptors sharing an address are told apart by length.
        let targets: Vec<Arc<ParamDescriptor>> = bucket
            .iter()
            .filter(|d| d.declared_len() == dump.payload.len())
            .cloned()
            .collect();
        if targets.is_empty() {
            tracing::warn!(
                "Dropping DT1 at {}: no parameter of length {}",
                dump.address,
                dump.payload.len()
            );
            return Ok(Dispatched::Dropped);
        }

        let changes = decode_all(&targets, dump.payload)?;
        Ok(Dispatched::Parameters(self.apply(changes)))
    }

    /// Stores decoded values and notifies listeners.
    fn apply(&self, changes: Vec<ParamChange>) -> Vec<ParamChange> {
        for change in &changes {
            if let Some(value) = &change.value {
                self.inner.cache.insert(change.name.clone(), value.clone());
            }
            self.notify(change);
        }
        changes
    }
}

fn decode_all(targets: &[Arc<ParamDescriptor>], bytes: &[u8]) -> Result<Vec<ParamChange>> {
    targets
        .iter()
        .map(|d| {
            d.codec()
                .decode(bytes, d.declared_len())
                .map(|value| ParamChange::new(d.name(), Some(value)))
                .map_err(|e| Error::codec(d.name(), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ValueCodec;
    use crate::value::{EnumDomain, ParamValue};
    use bosswire_sysex::RolandHeader;
    use std::sync::Mutex;

    const MODEL: [u8; 4] = [0x00, 0x00, 0x00, 0x2F];

    fn header() -> RolandHeader {
        RolandHeader::for_model(MODEL)
    }

    fn device() -> RolandDevice {
        RolandDevice::builder()
            .model_id(MODEL)
            .register(ParamDescriptor::program_change("patch").unwrap())
            .register(
                ParamDescriptor::control_change("comp_on", 16, ValueCodec::BooleanInByte).unwrap(),
            )
            .register(ParamDescriptor::control_change("comp_level", 16, ValueCodec::IntInByte).unwrap())
            .register(
                ParamDescriptor::sysex("short", [0x20, 0x00, 0x01, 0x00], 1, ValueCodec::IntInByte)
                    .unwrap(),
            )
            .register(
                ParamDescriptor::sysex("long", [0x20, 0x00, 0x01, 0x00], 4, ValueCodec::None)
                    .unwrap(),
            )
            .register(
                ParamDescriptor::sysex(
                    "reverb",
                    [0x20, 0x00, 0x06, 0x00],
                    1,
                    ValueCodec::EnumInByte(EnumDomain::new(["OFF", "ROOM"])),
                )
                .unwrap(),
            )
            .build()
            .unwrap()
    }

    fn dt1(address: [u8; 4], payload: &[u8]) -> InboundMessage {
        InboundMessage::sysex(header().data_set(&address, payload).unwrap()).unwrap()
    }

    fn names(dispatched: &Dispatched) -> Vec<&str> {
        match dispatched {
            Dispatched::Parameters(changes) => changes.iter().map(|c| c.name.as_str()).collect(),
            other => panic!("expected parameters, got {:?}", other),
        }
    }

    fn seeded() -> RolandDevice {
        let device = device();
        device.dispatch(&dt1([0x20, 0x00, 0x01, 0x00], &[0x05])).unwrap();
        device
            .dispatch(&dt1([0x20, 0x00, 0x01, 0x00], &[1, 2, 3, 4]))
            .unwrap();
        device.dispatch(&dt1([0x20, 0x00, 0x06, 0x00], &[1])).unwrap();
        device
    }

    fn cached(device: &RolandDevice) -> Vec<(String, Option<ParamValue>)> {
        device
            .registry()
            .descriptors()
            .map(|d| (d.name().to_string(), device.get(d.name())))
            .collect()
    }

    #[test]
    fn test_notes_pass_through() {
        let device = device();
        let note = InboundMessage::NoteOn {
            channel: 0,
            note: 60,
            velocity: 100,
        };
        assert_eq!(
            device.dispatch(&note).unwrap(),
            Dispatched::PassThrough(note.clone())
        );
    }

    #[test]
    fn test_program_change_raw_passthrough() {
        let device = device();
        let result = device
            .dispatch(&InboundMessage::ProgramChange {
                channel: 0,
                program: 42,
            })
            .unwrap();
        assert_eq!(names(&result), vec!["patch"]);
        assert_eq!(device.get("patch"), Some(ParamValue::Int(42)));
    }

    #[test]
    fn test_control_change_fans_out() {
        let device = device();
        let result = device
            .dispatch(&InboundMessage::ControlChange {
                channel: 0,
                controller: 16,
                value: 1,
            })
            .unwrap();
        assert_eq!(names(&result), vec!["comp_on", "comp_level"]);
        assert_eq!(device.get("comp_on"), Some(ParamValue::Bool(true)));
        assert_eq!(device.get("comp_level"), Some(ParamValue::Int(1)));
    }

    #[test]
    fn test_control_change_decode_failure_is_atomic() {
        let device = device();
        // 5 is a valid int but not a valid boolean byte
        let err = device
            .dispatch(&InboundMessage::ControlChange {
                channel: 0,
                controller: 16,
                value: 5,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Codec { ref name, .. } if name == "comp_on"));
        assert_eq!(device.get("comp_level"), None);
    }

    #[test]
    fn test_control_change_out_of_range_rejected() {
        let device = device();
        let err = device
            .dispatch(&InboundMessage::ControlChange {
                channel: 0,
                controller: 16,
                value: 0x80,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(device.get("comp_on"), None);

        // still usable afterwards
        device
            .dispatch(&InboundMessage::ControlChange {
                channel: 0,
                controller: 16,
                value: 0,
            })
            .unwrap();
        assert_eq!(device.get("comp_on"), Some(ParamValue::Bool(false)));
    }

    #[test]
    fn test_unmapped_controller_dropped() {
        let device = device();
        let result = device
            .dispatch(&InboundMessage::ControlChange {
                channel: 0,
                controller: 17,
                value: 1,
            })
            .unwrap();
        assert_eq!(result, Dispatched::Dropped);
    }

    #[test]
    fn test_data_set_selects_by_length() {
        let device = device();

        let result = device.dispatch(&dt1([0x20, 0x00, 0x01, 0x00], &[0x05])).unwrap();
        assert_eq!(names(&result), vec!["short"]);
        assert_eq!(device.get("short"), Some(ParamValue::Int(5)));
        assert_eq!(device.get("long"), None);

        let result = device
            .dispatch(&dt1([0x20, 0x00, 0x01, 0x00], &[1, 2, 3, 4]))
            .unwrap();
        assert_eq!(names(&result), vec!["long"]);
        assert_eq!(device.get("long"), Some(ParamValue::Bytes(vec![1, 2, 3, 4])));
        assert_eq!(device.get("short"), Some(ParamValue::Int(5)));
    }

    #[test]
    fn test_data_set_length_without_match_dropped() {
        let device = seeded();
        let before = cached(&device);
        let changes = device.subscribe(4);

        let result = device
            .dispatch(&dt1([0x20, 0x00, 0x01, 0x00], &[1, 2]))
            .unwrap();
        assert_eq!(result, Dispatched::Dropped);
        assert_eq!(cached(&device), before);
        assert!(changes.try_recv().is_err());
    }

    #[test]
    fn test_unknown_address_is_not_fatal() {
        let device = seeded();
        let before = cached(&device);
        assert_eq!(device.get("reverb"), Some(ParamValue::Enum("ROOM".into())));

        let result = device.dispatch(&dt1([0x7F, 0x7F, 0x7F, 0x7F], &[0])).unwrap();
        assert_eq!(result, Dispatched::Dropped);
        assert_eq!(cached(&device), before);

        let result = device.dispatch(&dt1([0x20, 0x00, 0x06, 0x00], &[0])).unwrap();
        assert_eq!(names(&result), vec!["reverb"]);
        assert_eq!(device.get("reverb"), Some(ParamValue::Enum("OFF".into())));
        assert_eq!(device.get("short"), Some(ParamValue::Int(5)));
    }

    #[test]
    fn test_data_set_for_other_device_dropped() {
        let device = device();
        let other = RolandHeader::new(0x11, MODEL)
            .data_set(&[0x20, 0x00, 0x06, 0x00], &[1])
            .unwrap();
        let result = device.dispatch_raw(&other).unwrap();
        assert_eq!(result, Dispatched::Dropped);
    }

    #[test]
    fn test_bad_checksum_tolerated_unless_verifying() {
        let mut msg = header().data_set(&[0x20, 0x00, 0x06, 0x00], &[1]).unwrap();
        let checksum_index = msg.len() - 2;
        msg[checksum_index] ^= 0x01;

        let lenient = device();
        assert!(matches!(
            lenient.dispatch_raw(&msg).unwrap(),
            Dispatched::Parameters(_)
        ));

        let strict = RolandDevice::builder()
            .model_id(MODEL)
            .verify_checksum(true)
            .register(
                ParamDescriptor::sysex("reverb", [0x20, 0x00, 0x06, 0x00], 1, ValueCodec::IntInByte)
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(strict.dispatch_raw(&msg).unwrap(), Dispatched::Dropped);
        assert_eq!(strict.get("reverb"), None);
    }

    #[test]
    fn test_identity_reply_reaches_listener() {
        let device = device();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        device.set_identity_listener(move |reply: &IdentityReply| {
            *sink.lock().unwrap() = Some(*reply);
        });

        let raw = [
            0xF0, 0x7E, 0x10, 0x06, 0x02, 0x41, 0x2F, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
            0xF7,
        ];
        let result = device.dispatch_raw(&raw).unwrap();
        let Dispatched::Identity(reply) = result else {
            panic!("expected identity, got {:?}", result);
        };
        assert_eq!(reply.family_code, [0x2F, 0x03]);
        assert_eq!(*seen.lock().unwrap(), Some(reply));

        device.clear_identity_listener();
        assert!(matches!(
            device.dispatch_raw(&raw).unwrap(),
            Dispatched::Identity(_)
        ));
    }

    #[test]
    fn test_unrecognized_sysex_dropped() {
        let device = device();
        let result = device.dispatch_raw(&[0xF0, 0x43, 0x10, 0x00, 0xF7]).unwrap();
        assert_eq!(result, Dispatched::Dropped);
    }

    #[test]
    fn test_dispatch_notifies_listeners() {
        let device = device();
        let changes = device.subscribe(4);
        device.dispatch(&dt1([0x20, 0x00, 0x06, 0x00], &[0])).unwrap();
        assert_eq!(
            changes.try_recv().unwrap(),
            ParamChange::new("reverb", Some(ParamValue::Enum("OFF".into())))
        );
    }

    #[test]
    fn test_dispatch_raw_parse_error() {
        let device = device();
        assert!(matches!(device.dispatch_raw(&[]), Err(Error::Wire(_))));
    }
}
