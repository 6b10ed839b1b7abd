//! Transfer configuration
//!
//! A [`TransferConfig`] is built once from the command line and handed to a
//! device backend when it is opened. It never changes afterwards.

use crate::error::{Error, Result};
use bitflags::bitflags;

/// Default spidev character device
pub const DEFAULT_DEVICE: &str = "/dev/spidev0.0";

/// Default SPI clock speed in Hz (1 MHz)
pub const DEFAULT_SPEED_HZ: u32 = 1_000_000;

/// Default word size
pub const DEFAULT_BITS_PER_WORD: u8 = 8;

/// Largest word size accepted by the kernel
pub const MAX_BITS_PER_WORD: u8 = 32;

bitflags! {
    /// SPI mode flags
    ///
    /// Bit layout matches the mode byte written with `SPI_IOC_WR_MODE`
    /// (see `include/uapi/linux/spi/spi.h`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpiMode: u8 {
        /// Clock phase: sample on the trailing edge
        const CPHA       = 1 << 0;
        /// Clock polarity: clock idles high
        const CPOL       = 1 << 1;
        /// Chip select is active high
        const CS_HIGH    = 1 << 2;
        /// Least significant bit is shifted out first
        const LSB_FIRST  = 1 << 3;
        /// Shared MOSI/MISO line (half duplex)
        const THREE_WIRE = 1 << 4;
        /// Internal loopback, MOSI is fed back to MISO
        const LOOP       = 1 << 5;
        /// Do not toggle chip select around transfers
        const NO_CS      = 1 << 6;
        /// Peripheral pulls low to pause the transfer
        const READY      = 1 << 7;
    }
}

impl Default for SpiMode {
    fn default() -> Self {
        SpiMode::empty()
    }
}

impl SpiMode {
    /// Classic SPI mode number (0-3) derived from CPOL and CPHA
    pub fn mode_number(self) -> u8 {
        (self & (Self::CPOL | Self::CPHA)).bits()
    }
}

/// Parameters for opening and driving an SPI device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    /// Device path (e.g., "/dev/spidev0.0")
    pub device: String,
    /// Maximum SPI clock speed in Hz
    pub speed_hz: u32,
    /// Word size for transfers
    pub bits_per_word: u8,
    /// Mode flags applied when the device is opened
    pub mode: SpiMode,
    /// Delay after each transfer before chip select is released, in microseconds
    pub delay_us: u16,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            speed_hz: DEFAULT_SPEED_HZ,
            bits_per_word: DEFAULT_BITS_PER_WORD,
            mode: SpiMode::default(),
            delay_us: 0,
        }
    }
}

impl TransferConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the SPI clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    /// Set the word size
    pub fn with_bits_per_word(mut self, bits: u8) -> Self {
        self.bits_per_word = bits;
        self
    }

    /// Set the mode flags
    pub fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-transfer delay in microseconds
    pub fn with_delay(mut self, delay_us: u16) -> Self {
        self.delay_us = delay_us;
        self
    }

    /// Check the values a backend cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.device.is_empty() {
            return Err(Error::NoDevice);
        }
        if self.speed_hz == 0 {
            return Err(Error::InvalidSpeed);
        }
        if self.bits_per_word == 0 || self.bits_per_word > MAX_BITS_PER_WORD {
            return Err(Error::InvalidBitsPerWord(self.bits_per_word));
        }
        Ok(())
    }
}
