//! Error types for spirepl-core

use thiserror::Error;

/// Errors raised while building a configuration or decoding user input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Device path is empty
    #[error("No device specified")]
    NoDevice,

    /// Clock speed of zero
    #[error("Invalid SPI speed: must be at least 1 Hz")]
    InvalidSpeed,

    /// Word size the kernel cannot handle
    #[error("Invalid bits per word: {0} (must be 1-32)")]
    InvalidBitsPerWord(u8),

    /// Request text is not valid hexadecimal
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Result type for spirepl-core operations
pub type Result<T> = std::result::Result<T, Error>;
