//! Error types for Linux SPI operations

use thiserror::Error;

/// Linux SPI specific errors
#[derive(Debug, Error)]
pub enum LinuxSpiError {
    /// Configuration rejected before touching the device
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] spirepl_core::Error),

    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set SPI mode
    #[error("Failed to set SPI mode of {path} to 0x{mode:02x}: {source}")]
    SetModeFailed {
        path: String,
        mode: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read SPI mode back
    #[error("Failed to read SPI mode of {path}: {source}")]
    ReadModeFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set bits per word
    #[error("Failed to set bits per word of {path} to {bits}: {source}")]
    SetBitsPerWordFailed {
        path: String,
        bits: u8,
        #[source]
        source: std::io::Error,
    },

    /// Failed to set clock speed
    #[error("Failed to set clock speed of {path} to {speed} Hz: {source}")]
    SetSpeedFailed {
        path: String,
        speed: u32,
        #[source]
        source: std::io::Error,
    },

    /// SPI transfer failed
    #[error("SPI transfer failed: {0}")]
    TransferFailed(#[source] std::io::Error),

    /// Request does not fit in the kernel transfer buffer
    #[error("Transfer of {len} bytes exceeds the spidev buffer size of {max} bytes")]
    TransferTooLarge { len: usize, max: usize },
}

/// Result type for Linux SPI operations
pub type Result<T> = std::result::Result<T, LinuxSpiError>;
