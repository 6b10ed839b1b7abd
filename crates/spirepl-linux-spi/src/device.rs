//! Linux SPI device implementation
//!
//! This module provides the `LinuxSpi` struct that implements the
//! `SpiTransfer` trait using Linux's spidev interface.

use crate::error::{LinuxSpiError, Result};

use spirepl_core::{SpiMode, SpiTransfer, TransferConfig};

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// Path to kernel spidev buffer size parameter
const BUF_SIZE_SYSFS: &str = "/sys/module/spidev/parameters/bufsiz";

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_read;
    use nix::ioctl_write_ptr;

    // SPI ioctl magic number
    const SPI_IOC_MAGIC: u8 = b'k';

    // SPI ioctl type numbers
    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    // Generate ioctl functions
    ioctl_read!(spi_ioc_rd_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    // SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[SPI_MSGSIZE(n)])
    // where SPI_MSGSIZE(n) = (n) * sizeof(struct spi_ioc_transfer)

    /// Size of struct spi_ioc_transfer (fixed, pointers are carried as __u64)
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// Calculate ioctl number for SPI_IOC_MESSAGE(n)
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        // _IOC(dir, type, nr, size) = ((dir)<<30)|((size)<<16)|((type)<<8)|(nr)
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// SPI transfer structure for ioctl
/// This must match the kernel's struct spi_ioc_transfer layout
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,          // __u64 tx_buf
    rx_buf: u64,          // __u64 rx_buf
    len: u32,             // __u32 len
    speed_hz: u32,        // __u32 speed_hz
    delay_usecs: u16,     // __u16 delay_usecs
    bits_per_word: u8,    // __u8 bits_per_word
    cs_change: u8,        // __u8 cs_change
    tx_nbits: u8,         // __u8 tx_nbits
    rx_nbits: u8,         // __u8 rx_nbits
    word_delay_usecs: u8, // __u8 word_delay_usecs
    _pad: u8,             // padding
}

/// SPI device opened through `/dev/spidevX.Y`
///
/// The file descriptor is closed when the value is dropped.
pub struct LinuxSpi {
    /// File handle for spidev device
    file: File,
    /// Device path, kept for prompts and messages
    device: String,
    /// Maximum kernel buffer size
    max_kernel_buf_size: usize,
    /// Speed in Hz
    speed_hz: u32,
    /// Word size
    bits_per_word: u8,
}

impl LinuxSpi {
    /// Open a Linux SPI device and apply every setting in `config`
    ///
    /// Either all settings are applied or an error is returned and the
    /// device is closed again.
    pub fn open(config: &TransferConfig) -> Result<Self> {
        config.validate()?;

        log::debug!("linux_spi: Opening device {}", config.device);

        // Open the device
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        // Set SPI mode
        let mode = config.mode.bits();
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::SetModeFailed {
                path: config.device.clone(),
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        // Set bits per word
        let bits = config.bits_per_word;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LinuxSpiError::SetBitsPerWordFailed {
                    path: config.device.clone(),
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        // Set clock speed
        let speed = config.speed_hz;
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxSpiError::SetSpeedFailed {
                    path: config.device.clone(),
                    speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        // Some controllers silently drop mode bits they cannot do
        let mut applied: u8 = 0;
        unsafe {
            ioctl::spi_ioc_rd_mode(fd, &mut applied).map_err(|e| LinuxSpiError::ReadModeFailed {
                path: config.device.clone(),
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }
        let applied = SpiMode::from_bits_retain(applied);
        if applied != config.mode {
            log::warn!(
                "linux_spi: Requested mode {:?} but driver reports {:?}",
                config.mode,
                applied
            );
        }

        log::info!(
            "linux_spi: Opened {} (mode={}, flags=0x{:02x}, speed={} kHz, bits={})",
            config.device,
            applied.mode_number(),
            applied.bits(),
            speed / 1000,
            bits
        );

        // Read max kernel buffer size
        let max_kernel_buf_size = get_max_kernel_buf_size();
        log::debug!(
            "linux_spi: Max kernel buffer size: {} bytes",
            max_kernel_buf_size
        );

        Ok(Self {
            file,
            device: config.device.clone(),
            max_kernel_buf_size,
            speed_hz: speed,
            bits_per_word: bits,
        })
    }

    /// Perform one full-duplex SPI_IOC_MESSAGE(1) transfer
    fn spi_transfer(&mut self, write_data: &[u8], delay_us: u16) -> Result<Vec<u8>> {
        if write_data.is_empty() {
            return Ok(Vec::new());
        }

        if write_data.len() > self.max_kernel_buf_size {
            return Err(LinuxSpiError::TransferTooLarge {
                len: write_data.len(),
                max: self.max_kernel_buf_size,
            });
        }

        let mut read_buf = vec![0u8; write_data.len()];

        let transfer = SpiIocTransfer {
            tx_buf: write_data.as_ptr() as u64,
            rx_buf: read_buf.as_mut_ptr() as u64,
            len: write_data.len() as u32,
            speed_hz: self.speed_hz,
            delay_usecs: delay_us,
            bits_per_word: self.bits_per_word,
            ..Default::default()
        };

        log::trace!(
            "linux_spi: transfer {} bytes, delay {} us",
            write_data.len(),
            delay_us
        );

        // Perform ioctl
        let fd = self.file.as_raw_fd();
        let ioctl_num = ioctl::spi_ioc_message(1);
        let ret = unsafe { libc::ioctl(fd, ioctl_num, &transfer as *const SpiIocTransfer) };

        if ret < 0 {
            return Err(LinuxSpiError::TransferFailed(
                std::io::Error::last_os_error(),
            ));
        }

        Ok(read_buf)
    }
}

impl SpiTransfer for LinuxSpi {
    type Error = LinuxSpiError;

    fn device(&self) -> &str {
        &self.device
    }

    fn transfer(&mut self, tx: &[u8], delay_us: u16) -> Result<Vec<u8>> {
        self.spi_transfer(tx, delay_us)
    }
}

impl Drop for LinuxSpi {
    fn drop(&mut self) {
        log::debug!("linux_spi: Closing {}", self.device);
    }
}

/// Read the maximum kernel buffer size from sysfs, or use page size as fallback
fn get_max_kernel_buf_size() -> usize {
    // Try to read from sysfs
    if let Ok(content) = std::fs::read_to_string(BUF_SIZE_SYSFS) {
        if let Ok(size) = content.trim().parse::<usize>() {
            if size > 0 {
                log::debug!("linux_spi: Using buffer size {} from sysfs", size);
                return size;
            }
        }
        log::warn!("linux_spi: Invalid buffer size in {}", BUF_SIZE_SYSFS);
    } else {
        log::debug!("linux_spi: Cannot read {}, using page size", BUF_SIZE_SYSFS);
    }

    // Fall back to page size
    let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
    log::debug!("linux_spi: Using page size {} as buffer size", page_size);
    page_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_struct_matches_kernel_layout() {
        assert_eq!(
            std::mem::size_of::<SpiIocTransfer>(),
            ioctl::SPI_IOC_TRANSFER_SIZE
        );
    }

    #[test]
    fn test_spi_ioc_message_number() {
        // _IOW('k', 0, char[32]) from <linux/spi/spidev.h>
        assert_eq!(ioctl::spi_ioc_message(1), 0x4020_6b00);
        assert_eq!(ioctl::spi_ioc_message(2), 0x4040_6b00);
    }

    #[test]
    fn test_open_missing_device_reports_path() {
        let config = TransferConfig::new("/dev/spidev-does-not-exist.7");
        let err = match LinuxSpi::open(&config) {
            Ok(_) => panic!("opening a missing device should fail"),
            Err(e) => e,
        };
        assert!(matches!(err, LinuxSpiError::OpenFailed { .. }));
        assert!(err.to_string().contains("/dev/spidev-does-not-exist.7"));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let err = match LinuxSpi::open(&TransferConfig::new("")) {
            Ok(_) => panic!("empty device path should be rejected"),
            Err(e) => e,
        };
        assert!(matches!(
            err,
            LinuxSpiError::InvalidConfig(spirepl_core::Error::NoDevice)
        ));
    }

    #[test]
    fn test_open_non_spi_file_fails_on_mode() {
        // /dev/null opens fine but rejects the spidev ioctls
        let err = match LinuxSpi::open(&TransferConfig::new("/dev/null")) {
            Ok(_) => panic!("/dev/null is not an SPI device"),
            Err(e) => e,
        };
        assert!(matches!(err, LinuxSpiError::SetModeFailed { mode: 0, .. }));
        assert!(err.to_string().contains("/dev/null"));
    }

    #[test]
    fn test_config_errors_name_the_device() {
        let path = || "/dev/spidev3.1".to_string();
        let source = || std::io::Error::from_raw_os_error(libc::EINVAL);
        let errors = [
            LinuxSpiError::SetModeFailed {
                path: path(),
                mode: 0x03,
                source: source(),
            },
            LinuxSpiError::ReadModeFailed {
                path: path(),
                source: source(),
            },
            LinuxSpiError::SetBitsPerWordFailed {
                path: path(),
                bits: 9,
                source: source(),
            },
            LinuxSpiError::SetSpeedFailed {
                path: path(),
                speed: 500_000,
                source: source(),
            },
        ];
        for err in errors {
            assert!(err.to_string().contains("/dev/spidev3.1"), "{}", err);
        }
    }

    #[test]
    fn test_kernel_buf_size_is_positive() {
        assert!(get_max_kernel_buf_size() > 0);
    }
}
