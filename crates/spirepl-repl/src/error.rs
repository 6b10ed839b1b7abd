//! Error types for the REPL

use thiserror::Error;

/// Errors that can occur in the REPL outside of a transfer
#[derive(Error, Debug)]
pub enum ReplError {
    /// I/O error (writing stdout/stderr)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line editor failure other than EOF or interrupt
    #[error("Readline error: {0}")]
    ReadlineError(#[from] rustyline::error::ReadlineError),
}
