//! spirepl-core - Platform independent pieces of the SPI REPL
//!
//! This crate holds everything the interactive loop needs that does not
//! touch hardware:
//!
//! - [`TransferConfig`] and the [`SpiMode`] flag set, built once from the
//!   command line and consumed when the device is opened
//! - the [`SpiTransfer`] trait, implemented by device backends
//! - the [`hex`] request/response codec
//!
//! # Example
//!
//! ```
//! use spirepl_core::{hex, SpiMode, TransferConfig};
//!
//! let config = TransferConfig::new("/dev/spidev1.0")
//!     .with_speed(500_000)
//!     .with_mode(SpiMode::CPOL | SpiMode::CPHA);
//! assert_eq!(config.mode.mode_number(), 3);
//!
//! let request = hex::decode_request("0xabc").unwrap();
//! assert_eq!(request, vec![0x0a, 0xbc]);
//! assert_eq!(hex::encode_response(&request), "0abc");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod hex;
pub mod transfer;

pub use config::{SpiMode, TransferConfig};
pub use error::{Error, Result};
pub use transfer::SpiTransfer;
