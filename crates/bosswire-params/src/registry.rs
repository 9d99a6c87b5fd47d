//! Parameter registry: the per-device catalog of descriptors.
//!
//! Indexed by name, by controller, by address and by program-change binding so
//! that inbound dispatch never scans. Append-only: nothing is ever removed, and
//! once a device is built its registry sits behind an `Arc` and is no longer
//! mutable at all.

use crate::descriptor::{Binding, ParamDescriptor};
use crate::error::{Error, Result};
use bosswire_sysex::Address;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Descriptors sharing one controller or one address.
pub type Bucket = SmallVec<[Arc<ParamDescriptor>; 2]>;

/// Populates a registry with one device model's parameters.
pub trait ParamCatalog {
    fn populate(&self, registry: &mut ParamRegistry) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ParamRegistry {
    descriptors: Vec<Arc<ParamDescriptor>>,
    by_name: HashMap<String, usize>,
    by_controller: HashMap<u8, Bucket>,
    by_address: BTreeMap<Address, Bucket>,
    patch_bound: Vec<Arc<ParamDescriptor>>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor. Names are unique; a second descriptor with the same
    /// name is rejected.
    ///
    /// Distinct descriptors may share a controller or an address, and SysEx
    /// ranges may overlap. See [`overlapping_ranges`](Self::overlapping_ranges).
    pub fn register(&mut self, descriptor: ParamDescriptor) -> Result<Arc<ParamDescriptor>> {
        if self.by_name.contains_key(descriptor.name()) {
            return Err(Error::DuplicateParameter(descriptor.name().to_string()));
        }

        let descriptor = Arc::new(descriptor);
        match descriptor.binding() {
            Binding::ProgramChange => self.patch_bound.push(Arc::clone(&descriptor)),
            Binding::ControlChange { controller } => self
                .by_controller
                .entry(*controller)
                .or_default()
                .push(Arc::clone(&descriptor)),
            Binding::SysEx { address, .. } => self
                .by_address
                .entry(*address)
                .or_default()
                .push(Arc::clone(&descriptor)),
        }

        self.by_name
            .insert(descriptor.name().to_string(), self.descriptors.len());
        self.descriptors.push(Arc::clone(&descriptor));

        tracing::debug!(
            "Registered parameter {} ({:?})",
            descriptor.name(),
            descriptor.binding()
        );
        Ok(descriptor)
    }

    pub fn register_all<I>(&mut self, descriptors: I) -> Result<()>
    where
        I: IntoIterator<Item = ParamDescriptor>,
    {
        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    pub fn populate_from(&mut self, catalog: &dyn ParamCatalog) -> Result<()> {
        catalog.populate(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ParamDescriptor>> {
        self.by_name.get(name).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn by_controller(&self, controller: u8) -> &[Arc<ParamDescriptor>] {
        self.by_controller
            .get(&controller)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    pub fn by_address(&self, address: Address) -> &[Arc<ParamDescriptor>] {
        self.by_address
            .get(&address)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    pub fn patch_bound(&self) -> &[Arc<ParamDescriptor>] {
        &self.patch_bound
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<ParamDescriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Pairs of SysEx descriptors whose address ranges intersect, excluding
    /// children that declare the other as their parent.
    ///
    /// Diagnostic only: registration accepts overlaps, since alternate views of
    /// the same memory are common in device catalogs.
    pub fn overlapping_ranges(&self) -> Vec<(Arc<ParamDescriptor>, Arc<ParamDescriptor>)> {
        let mut ranges: Vec<(u64, u64, &Arc<ParamDescriptor>)> = self
            .by_address
            .values()
            .flatten()
            .map(|d| {
                let start = u64::from(d.address().map_or(0, Address::linear));
                (start, start + d.declared_len() as u64, d)
            })
            .collect();
        ranges.sort_by_key(|&(start, end, _)| (start, end));

        let mut overlaps = Vec::new();
        for (i, &(_, end, a)) in ranges.iter().enumerate() {
            for &(start_b, _, b) in &ranges[i + 1..] {
                if start_b >= end {
                    break;
                }
                let related = a.parent_key() == Some(b.name()) || b.parent_key() == Some(a.name());
                if !related {
                    overlaps.push((Arc::clone(a), Arc::clone(b)));
                }
            }
        }
        overlaps
    }
}
