//! Outbound transport seam.
//!
//! The device never opens ports itself. Hosts hand it something that can send
//! raw bytes: a port wrapper, or the ring-buffer channel below when output is
//! pumped from another thread.

use parking_lot::Mutex;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use thiserror::Error;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Output buffer full")]
    BufferFull,

    #[error("Port closed")]
    Closed,

    #[error("MIDI port error: {0}")]
    Port(String),
}

/// Sends complete MIDI messages to the device.
pub trait MidiTransport: Send + Sync {
    fn send_raw(&self, bytes: &[u8]) -> Result<(), TransportError>;
}

impl<F> MidiTransport for F
where
    F: Fn(&[u8]) -> Result<(), TransportError> + Send + Sync,
{
    fn send_raw(&self, bytes: &[u8]) -> Result<(), TransportError> {
        self(bytes)
    }
}

/// Producer side. Each `send_raw` pushes one whole message.
pub struct OutboundProducer {
    producer: Mutex<HeapProd<Vec<u8>>>,
}

impl MidiTransport for OutboundProducer {
    fn send_raw(&self, bytes: &[u8]) -> Result<(), TransportError> {
        self.producer
            .lock()
            .try_push(bytes.to_vec())
            .map_err(|_| TransportError::BufferFull)
    }
}

/// Consumer side, drained by whoever owns the real port.
pub struct OutboundConsumer {
    consumer: HeapCons<Vec<u8>>,
}

impl OutboundConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.consumer.try_pop()
    }

    pub fn drain_all(&mut self) -> Vec<Vec<u8>> {
        let mut messages = Vec::with_capacity(self.consumer.occupied_len());
        while let Some(message) = self.consumer.try_pop() {
            messages.push(message);
        }
        messages
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }
}

pub fn outbound_channel() -> (OutboundProducer, OutboundConsumer) {
    outbound_channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn outbound_channel_with_capacity(capacity: usize) -> (OutboundProducer, OutboundConsumer) {
    let rb = HeapRb::new(capacity);
    let (producer, consumer) = rb.split();
    (
        OutboundProducer {
            producer: Mutex::new(producer),
        },
        OutboundConsumer { consumer },
    )
}
