//! Centralized error type for the bosswire umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SysEx: {0}")]
    SysEx(#[from] bosswire_sysex::Error),

    #[cfg(feature = "params")]
    #[error(transparent)]
    Params(#[from] bosswire_params::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
