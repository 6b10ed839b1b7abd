//! spirepl-linux-spi - Linux spidev support
//!
//! This crate opens SPI controllers exposed through the `/dev/spidevX.Y`
//! character devices and drives them with the spidev ioctls.
//!
//! # Overview
//!
//! The Linux SPI driver exposes SPI controllers through character devices
//! at `/dev/spidevX.Y` where X is the bus number and Y is the chip select.
//! Opening a [`LinuxSpi`] applies the mode byte, word size and clock speed
//! from a [`TransferConfig`](spirepl_core::TransferConfig); each
//! [`transfer`](spirepl_core::SpiTransfer::transfer) is a single
//! full-duplex `SPI_IOC_MESSAGE(1)`.
//!
//! # Example
//!
//! ```no_run
//! use spirepl_core::{SpiMode, SpiTransfer, TransferConfig};
//! use spirepl_linux_spi::LinuxSpi;
//!
//! let config = TransferConfig::new("/dev/spidev0.0")
//!     .with_speed(4_000_000)
//!     .with_mode(SpiMode::LOOP);
//! let mut spi = LinuxSpi::open(&config)?;
//!
//! let rx = spi.transfer(&[0x9f, 0x00, 0x00, 0x00], 0)?;
//! assert_eq!(rx.len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device
//! - May require adding user to `spi` group or using udev rules

pub mod device;
pub mod error;

// Re-exports
pub use device::LinuxSpi;
pub use error::{LinuxSpiError, Result};
