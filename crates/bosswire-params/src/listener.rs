//! Change notification.

use crate::value::ParamValue;
use bosswire_sysex::IdentityReply;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// A parameter's cached value changed. `None` means the value is unknown,
/// for example after the device stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamChange {
    pub name: String,
    pub value: Option<ParamValue>,
}

impl ParamChange {
    pub fn new(name: impl Into<String>, value: Option<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Called synchronously on the thread that caused the change, so keep it short.
pub trait ParameterListener: Send + Sync {
    fn parameter_changed(&self, change: &ParamChange);
}

impl<F> ParameterListener for F
where
    F: Fn(&ParamChange) + Send + Sync,
{
    fn parameter_changed(&self, change: &ParamChange) {
        self(change)
    }
}

/// Receives Identity Replies.
pub trait IdentityListener: Send + Sync {
    fn identity_received(&self, reply: &IdentityReply);
}

impl<F> IdentityListener for F
where
    F: Fn(&IdentityReply) + Send + Sync,
{
    fn identity_received(&self, reply: &IdentityReply) {
        self(reply)
    }
}

/// Listener that forwards changes into a bounded channel.
pub struct ChannelListener {
    sender: Sender<ParamChange>,
}

impl ParameterListener for ChannelListener {
    fn parameter_changed(&self, change: &ParamChange) {
        match self.sender.try_send(change.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(change)) => {
                tracing::debug!("Change channel full, dropping update for {}", change.name);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

pub fn param_change_channel(capacity: usize) -> (ChannelListener, Receiver<ParamChange>) {
    let (sender, receiver) = bounded(capacity);
    (ChannelListener { sender }, receiver)
}
