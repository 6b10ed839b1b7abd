//! Ctrl+C outside the line editor
//!
//! While rustyline reads a line the terminal is in raw mode and Ctrl+C
//! arrives as `ReadlineError::Interrupted`. During a transfer, or when
//! stdin is not a terminal, it arrives as SIGINT instead. The handler
//! below reports it the same way and exits with status 1.

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

/// Written by the handler; matches `SessionEnd::Interrupted`
const INTERRUPTED_MESSAGE: &[u8] = b"CTRL+C pressed\n";

extern "C" fn on_sigint(_signal: libc::c_int) {
    // Only async-signal-safe calls in here
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            INTERRUPTED_MESSAGE.as_ptr().cast(),
            INTERRUPTED_MESSAGE.len(),
        );
        libc::_exit(1);
    }
}

/// Install the SIGINT handler for the rest of the process
pub fn install_interrupt_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_sigint),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGINT, &action) }.map(|_| ())
}
