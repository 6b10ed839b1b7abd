//! Device trait
//!
//! [`SpiTransfer`] is the only thing the REPL needs from a device: one
//! blocking full-duplex exchange. Backends own their OS resources and
//! release them on drop.

/// A full-duplex SPI device
///
/// ## Example: loopback device
///
/// ```
/// use spirepl_core::SpiTransfer;
///
/// struct Echo;
///
/// impl SpiTransfer for Echo {
///     type Error = std::convert::Infallible;
///
///     fn device(&self) -> &str {
///         "echo"
///     }
///
///     fn transfer(&mut self, tx: &[u8], _delay_us: u16) -> Result<Vec<u8>, Self::Error> {
///         Ok(tx.to_vec())
///     }
/// }
///
/// assert_eq!(Echo.transfer(&[1, 2, 3], 0).unwrap(), vec![1, 2, 3]);
/// ```
pub trait SpiTransfer {
    /// Error raised by a failed transfer
    type Error: std::error::Error;

    /// Path or name of the underlying device, used in prompts
    fn device(&self) -> &str;

    /// Clock `tx` out while clocking the same number of bytes in
    ///
    /// `delay_us` is how long to wait after the last word before chip
    /// select is released. The returned vector always has `tx.len()` bytes.
    fn transfer(&mut self, tx: &[u8], delay_us: u16) -> Result<Vec<u8>, Self::Error>;
}
