//! RolandDevice builder for assembling the registry and wiring.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use crate::descriptor::ParamDescriptor;
use crate::error::Result;
use crate::listener::ParameterListener;
use crate::registry::{ParamCatalog, ParamRegistry};
use crate::transport::MidiTransport;

use super::{
    raw_patch_passthrough, DeviceConfig, DeviceInner, DeviceStatus, PatchDecoder, RolandDevice,
    WriteState,
};

pub struct RolandDeviceBuilder {
    pub(super) config: DeviceConfig,
    pub(super) catalogs: Vec<Box<dyn ParamCatalog>>,
    pub(super) descriptors: Vec<ParamDescriptor>,
    pub(super) transport: Option<Arc<dyn MidiTransport>>,
    pub(super) listeners: Vec<Arc<dyn ParameterListener>>,
    pub(super) patch_decoder: PatchDecoder,
}

impl Default for RolandDeviceBuilder {
    fn default() -> Self {
        Self {
            config: DeviceConfig::default(),
            catalogs: Vec::new(),
            descriptors: Vec::new(),
            transport: None,
            listeners: Vec::new(),
            patch_decoder: raw_patch_passthrough,
        }
    }
}

impl RolandDeviceBuilder {
    /// Replaces the whole configuration. Later setters override its fields.
    pub fn config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model_id(mut self, model_id: [u8; 4]) -> Self {
        self.config.model_id = model_id;
        self
    }

    pub fn device_id(mut self, device_id: u8) -> Self {
        self.config.device_id = device_id;
        self
    }

    /// Zero-based channel used for Control Change writes.
    pub fn channel(mut self, channel: u8) -> Self {
        self.config.channel = channel;
        self
    }

    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.config.verify_checksum = verify;
        self
    }

    /// Catalogs populate the registry in the order added, before any
    /// individually registered descriptor.
    pub fn catalog<C: ParamCatalog + 'static>(mut self, catalog: C) -> Self {
        self.catalogs.push(Box::new(catalog));
        self
    }

    pub fn register(mut self, descriptor: ParamDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn transport<T: MidiTransport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn listener<L: ParameterListener + 'static>(mut self, listener: L) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn patch_decoder(mut self, decoder: PatchDecoder) -> Self {
        self.patch_decoder = decoder;
        self
    }

    /// Validates the configuration and freezes the registry. The device starts
    /// out stopped.
    pub fn build(self) -> Result<RolandDevice> {
        self.config.validate()?;

        let mut registry = ParamRegistry::new();
        for catalog in &self.catalogs {
            registry.populate_from(catalog.as_ref())?;
        }
        registry.register_all(self.descriptors)?;

        for (a, b) in registry.overlapping_ranges() {
            tracing::debug!(
                "Address ranges of {} and {} overlap",
                a.name(),
                b.name()
            );
        }

        Ok(RolandDevice {
            inner: Arc::new(DeviceInner {
                registry: Arc::new(registry),
                header: self.config.header(),
                config: self.config,
                cache: DashMap::new(),
                listeners: RwLock::new(self.listeners),
                identity_listener: ArcSwapOption::empty(),
                patch_decoder: self.patch_decoder,
                state: Mutex::new(WriteState {
                    status: DeviceStatus::Stopped,
                    transport: self.transport,
                }),
            }),
        })
    }
}
