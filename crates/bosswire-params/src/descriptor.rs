//! Parameter descriptors: name, codec and transport binding.

use crate::codec::ValueCodec;
use crate::error::{Error, Result};
use crate::value::ValueKind;
use bosswire_sysex::{Address, Size};

/// How a parameter travels on the wire. Exactly one per descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Driven by Program Change from the device. Read-only.
    ProgramChange,
    ControlChange {
        controller: u8,
    },
    SysEx {
        address: Address,
        /// Payload byte count.
        length: u32,
        /// Key of the enclosing block parameter, for parameters that are a view
        /// into a larger dump.
        parent_key: Option<String>,
    },
}

impl Binding {
    pub fn sysex(address: impl Into<Address>, length: u32) -> Self {
        Binding::SysEx {
            address: address.into(),
            length,
            parent_key: None,
        }
    }

    /// Byte count of the wire form.
    pub fn declared_len(&self) -> usize {
        match self {
            Binding::ProgramChange | Binding::ControlChange { .. } => 1,
            Binding::SysEx { length, .. } => *length as usize,
        }
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    name: String,
    codec: ValueCodec,
    binding: Binding,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, codec: ValueCodec, binding: Binding) -> Result<Self> {
        let descriptor = Self {
            name: name.into(),
            codec,
            binding,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn program_change(name: impl Into<String>) -> Result<Self> {
        Self::new(name, ValueCodec::IntInByte, Binding::ProgramChange)
    }

    pub fn control_change(name: impl Into<String>, controller: u8, codec: ValueCodec) -> Result<Self> {
        Self::new(name, codec, Binding::ControlChange { controller })
    }

    pub fn sysex(
        name: impl Into<String>,
        address: impl Into<Address>,
        length: u32,
        codec: ValueCodec,
    ) -> Result<Self> {
        Self::new(name, codec, Binding::sysex(address, length))
    }

    /// Marks a SysEx parameter as a view into the block named `parent`.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Result<Self> {
        match &mut self.binding {
            Binding::SysEx { parent_key, .. } => {
                *parent_key = Some(parent.into());
                Ok(self)
            }
            _ => Err(Error::invalid_descriptor(
                &self.name,
                "only SysEx parameters can have a parent",
            )),
        }
    }

    fn validate(&self) -> Result<()> {
        let name = &self.name;
        if name.is_empty() {
            return Err(Error::invalid_descriptor(name, "name is empty"));
        }

        match &self.binding {
            Binding::ProgramChange => {}
            Binding::ControlChange { controller } => {
                if *controller > 0x7F {
                    return Err(Error::invalid_descriptor(
                        name,
                        format!("controller {} out of range 0-127", controller),
                    ));
                }
            }
            Binding::SysEx {
                address, length, ..
            } => {
                if !address.is_seven_bit() {
                    return Err(Error::invalid_descriptor(
                        name,
                        format!("address {} has a byte above 7Fh", address),
                    ));
                }
                if *length == 0 {
                    return Err(Error::invalid_descriptor(name, "length is zero"));
                }
                if *length > Size::MAX {
                    return Err(Error::invalid_descriptor(
                        name,
                        format!("length {} does not fit an RQ1 size", length),
                    ));
                }
                if self.codec.is_single_byte() && *length != 1 {
                    return Err(Error::invalid_descriptor(
                        name,
                        format!("single-byte codec with declared length {}", length),
                    ));
                }
            }
        }

        if let ValueCodec::EnumInByte(domain) = &self.codec {
            if domain.is_empty() || domain.len() > 0x80 {
                return Err(Error::invalid_descriptor(
                    name,
                    format!("enum domain must have 1-128 constants, has {}", domain.len()),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn codec(&self) -> &ValueCodec {
        &self.codec
    }

    #[inline]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    #[inline]
    pub fn value_kind(&self) -> ValueKind {
        self.codec.value_kind()
    }

    #[inline]
    pub fn declared_len(&self) -> usize {
        self.binding.declared_len()
    }

    pub fn address(&self) -> Option<Address> {
        match self.binding {
            Binding::SysEx { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn controller(&self) -> Option<u8> {
        match self.binding {
            Binding::ControlChange { controller } => Some(controller),
            _ => None,
        }
    }

    pub fn parent_key(&self) -> Option<&str> {
        match &self.binding {
            Binding::SysEx { parent_key, .. } => parent_key.as_deref(),
            _ => None,
        }
    }
}
