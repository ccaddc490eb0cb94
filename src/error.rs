//! Centralized error type for the audiomod umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("TSM: {0}")]
    Tsm(#[from] audiomod_tsm::TsmError),

    #[error("Audio I/O: {0}")]
    AudioIo(#[from] audiomod_io::IoError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
