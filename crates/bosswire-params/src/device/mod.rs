//! A connected Roland/Boss unit: parameter cache, write path and inbound dispatch.
//!
//! ## Quick Start
//!
//! ```
//! use bosswire_params::{outbound_channel, ParamDescriptor, RolandDevice, ValueCodec};
//!
//! let (transport, mut sent) = outbound_channel();
//! let device = RolandDevice::builder()
//!     .model_id([0x00, 0x00, 0x00, 0x2F])
//!     .register(ParamDescriptor::control_change("fx_on", 16, ValueCodec::BooleanInByte)?)
//!     .transport(transport)
//!     .build()?;
//!
//! device.start();
//! device.put("fx_on", true)?;
//! assert_eq!(sent.pop(), Some(vec![0xB0, 16, 1]));
//! # Ok::<(), bosswire_params::Error>(())
//! ```

mod builder;
pub mod config;
mod dispatch;

pub use builder::RolandDeviceBuilder;
pub use config::DeviceConfig;
pub use dispatch::Dispatched;

use crate::descriptor::{Binding, ParamDescriptor};
use crate::error::{CodecError, Error, Result};
use crate::listener::{param_change_channel, IdentityListener, ParamChange, ParameterListener};
use crate::registry::ParamRegistry;
use crate::transport::MidiTransport;
use crate::value::ParamValue;
use arc_swap::ArcSwapOption;
use bosswire_sysex::{control_change, identity_request, RolandHeader, Size, DV_ID_BROADCAST};
use crossbeam_channel::Receiver;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Turns a Program Change number into the value of every patch-bound parameter.
pub type PatchDecoder = fn(u8) -> ParamValue;

/// Delivers the program number unchanged, without going through a codec.
pub fn raw_patch_passthrough(program: u8) -> ParamValue {
    ParamValue::Int(program.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    #[default]
    Stopped,
    Running,
}

/// Handle to one device. Clone is cheap (Arc internally).
#[derive(Clone)]
pub struct RolandDevice {
    inner: Arc<DeviceInner>,
}

struct DeviceInner {
    registry: Arc<ParamRegistry>,
    config: DeviceConfig,
    header: RolandHeader,
    cache: DashMap<String, ParamValue>,
    listeners: RwLock<Vec<Arc<dyn ParameterListener>>>,
    identity_listener: ArcSwapOption<Box<dyn IdentityListener>>,
    patch_decoder: PatchDecoder,
    /// Serializes every outbound send with the status and transport checks.
    state: Mutex<WriteState>,
}

struct WriteState {
    status: DeviceStatus,
    transport: Option<Arc<dyn MidiTransport>>,
}

impl WriteState {
    /// The transport, if writes are currently allowed.
    fn active_transport(&self) -> Option<&Arc<dyn MidiTransport>> {
        match self.status {
            DeviceStatus::Running => self.transport.as_ref(),
            DeviceStatus::Stopped => None,
        }
    }
}

impl RolandDevice {
    pub fn builder() -> RolandDeviceBuilder {
        RolandDeviceBuilder::default()
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.inner.config
    }

    pub fn header(&self) -> RolandHeader {
        self.inner.header
    }

    // ==================== Lifecycle ====================

    pub fn status(&self) -> DeviceStatus {
        self.inner.state.lock().status
    }

    pub fn start(&self) {
        self.inner.state.lock().status = DeviceStatus::Running;
        tracing::debug!("Device {:02X}h started", self.inner.config.device_id);
    }

    /// Stops writes and forgets every cached value. Listeners see each
    /// previously known parameter change to `None`.
    pub fn stop(&self) {
        let mut state = self.inner.state.lock();
        state.status = DeviceStatus::Stopped;
        let names: Vec<String> = self
            .inner
            .cache
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        self.inner.cache.clear();
        drop(state);
        tracing::debug!("Device {:02X}h stopped", self.inner.config.device_id);

        for name in names {
            self.notify(&ParamChange::new(name, None));
        }
    }

    pub fn attach_transport<T: MidiTransport + 'static>(&self, transport: T) {
        self.attach_transport_arc(Arc::new(transport));
    }

    pub fn attach_transport_arc(&self, transport: Arc<dyn MidiTransport>) {
        self.inner.state.lock().transport = Some(transport);
    }

    /// Detaches and returns the transport. Writes become no-ops.
    pub fn detach_transport(&self) -> Option<Arc<dyn MidiTransport>> {
        self.inner.state.lock().transport.take()
    }

    pub fn has_transport(&self) -> bool {
        self.inner.state.lock().transport.is_some()
    }

    // ==================== Values ====================

    /// Last value seen from the device or written to it.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.inner.cache.get(name).map(|v| v.value().clone())
    }

    fn descriptor(&self, name: &str) -> Result<&Arc<ParamDescriptor>> {
        self.inner
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }

    /// Writes a value to the device and returns the previously cached one.
    ///
    /// Without a running device and an attached transport this does nothing
    /// and returns the cached value. Program-change parameters are read-only.
    pub fn put(&self, name: &str, value: impl Into<ParamValue>) -> Result<Option<ParamValue>> {
        let value = value.into();
        let state = self.inner.state.lock();
        let descriptor = self.descriptor(name)?;
        let previous = self.get(name);

        let Some(transport) = state.active_transport() else {
            tracing::debug!("Write to {} ignored, device not available", name);
            return Ok(previous);
        };

        let bytes = match descriptor.binding() {
            Binding::ProgramChange => {
                return Err(Error::UnsupportedOperation {
                    name: name.to_string(),
                    reason: "program change parameters are read-only",
                })
            }
            Binding::ControlChange { controller } => {
                let encoded = self.encode(descriptor, &value)?;
                control_change(self.inner.config.channel, *controller, encoded[0])?
            }
            Binding::SysEx { address, .. } => {
                let encoded = self.encode(descriptor, &value)?;
                self.inner.header.data_set(&address.to_bytes(), &encoded)?
            }
        };

        transport.send_raw(&bytes)?;
        tracing::debug!("Sent {} = {} ({} bytes)", name, value, bytes.len());

        self.inner.cache.insert(name.to_string(), value.clone());
        drop(state);

        self.notify(&ParamChange::new(name, Some(value)));
        Ok(previous)
    }

    /// Encodes and enforces the declared wire length.
    fn encode(&self, descriptor: &ParamDescriptor, value: &ParamValue) -> Result<Vec<u8>> {
        let declared = descriptor.declared_len();
        let bytes = descriptor
            .codec()
            .encode(value, declared)
            .map_err(|e| Error::codec(descriptor.name(), e))?;
        if bytes.len() != declared {
            return Err(Error::codec(
                descriptor.name(),
                CodecError::LengthMismatch {
                    expected: declared,
                    actual: bytes.len(),
                },
            ));
        }
        Ok(bytes)
    }

    // ==================== Read requests ====================

    /// Asks the device to dump a SysEx parameter. The answer arrives later as
    /// an inbound DT1.
    ///
    /// Returns `false` when the device is not available.
    pub fn request(&self, name: &str) -> Result<bool> {
        let state = self.inner.state.lock();
        let descriptor = self.descriptor(name)?;
        if descriptor.address().is_none() {
            return Err(Error::UnsupportedOperation {
                name: name.to_string(),
                reason: "only SysEx parameters can be requested",
            });
        }
        let Some(transport) = state.active_transport() else {
            return Ok(false);
        };
        self.send_request(&**transport, descriptor)?;
        Ok(true)
    }

    /// Requests every top-level SysEx parameter; children are covered by their
    /// parent's dump. Returns the number of requests sent.
    pub fn request_all(&self) -> Result<usize> {
        let state = self.inner.state.lock();
        let Some(transport) = state.active_transport() else {
            return Ok(0);
        };

        let mut sent = 0;
        for descriptor in self.inner.registry.descriptors() {
            if descriptor.address().is_some() && descriptor.parent_key().is_none() {
                self.send_request(&**transport, descriptor)?;
                sent += 1;
            }
        }
        Ok(sent)
    }

    fn send_request(&self, transport: &dyn MidiTransport, descriptor: &ParamDescriptor) -> Result<()> {
        let Some(address) = descriptor.address() else {
            return Ok(());
        };
        let size = Size::from_len(descriptor.declared_len() as u32)?;
        let msg = self
            .inner
            .header
            .data_request(&address.to_bytes(), &size.to_bytes())?;
        transport.send_raw(&msg)?;
        tracing::debug!("Requested {} at {}", descriptor.name(), address);
        Ok(())
    }

    /// Broadcasts an Identity Request. Returns `false` when the device is not
    /// available.
    pub fn request_identity(&self) -> Result<bool> {
        let state = self.inner.state.lock();
        let Some(transport) = state.active_transport() else {
            return Ok(false);
        };
        transport.send_raw(&identity_request(DV_ID_BROADCAST))?;
        Ok(true)
    }

    // ==================== Listeners ====================

    pub fn add_listener<L: ParameterListener + 'static>(&self, listener: L) {
        self.add_listener_arc(Arc::new(listener));
    }

    pub fn add_listener_arc(&self, listener: Arc<dyn ParameterListener>) {
        self.inner.listeners.write().push(listener);
    }

    /// Registers a channel listener and returns its receiving end.
    pub fn subscribe(&self, capacity: usize) -> Receiver<ParamChange> {
        let (listener, receiver) = param_change_channel(capacity);
        self.add_listener(listener);
        receiver
    }

    pub fn set_identity_listener<L: IdentityListener + 'static>(&self, listener: L) {
        let listener: Box<dyn IdentityListener> = Box::new(listener);
        self.inner.identity_listener.store(Some(Arc::new(listener)));
    }

    pub fn clear_identity_listener(&self) {
        self.inner.identity_listener.store(None);
    }

    fn notify(&self, change: &ParamChange) {
        for listener in self.inner.listeners.read().iter() {
            listener.parameter_changed(change);
        }
    }
}
