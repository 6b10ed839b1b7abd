//! spirepl - poke at SPI peripherals from a terminal
//!
//! Opens a Linux spidev device with the settings given on the command
//! line, then sends every hex string typed at the prompt as one
//! full-duplex transfer and prints the bytes that came back.
//!
//! ```text
//! $ spirepl --device /dev/spidev0.0 --speed 500000 --loop
//! SPI device: /dev/spidev0.0 speed: 500000 bits_per_word: 8
//! now enter hex strings to send to the device
//! /dev/spidev0.0 <<< 0xdeadbeef
//! /dev/spidev0.0 >>> deadbeef
//! ```

#[cfg(target_os = "linux")]
mod cli;
#[cfg(target_os = "linux")]
mod signal;

use std::process::ExitCode;

#[cfg(not(target_os = "linux"))]
fn main() -> ExitCode {
    eprintln!(
        "{} is not supported: spirepl needs Linux spidev devices",
        std::env::consts::OS
    );
    ExitCode::FAILURE
}

#[cfg(target_os = "linux")]
fn main() -> ExitCode {
    use clap::Parser;
    use spirepl_linux_spi::LinuxSpi;

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    let config = cli.transfer_config();
    log::debug!("Transfer configuration: {:?}", config);

    let device = match LinuxSpi::open(&config) {
        Ok(device) => device,
        Err(e) => {
            eprintln!("Failed to open SPI device: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = signal::install_interrupt_handler() {
        log::warn!("Cannot install SIGINT handler: {}", e);
    }

    let history = if cli.no_history {
        None
    } else {
        spirepl_repl::default_history_path()
    };

    // The session owns the device and closes it before returning
    match spirepl_repl::run_repl(device, &config, history) {
        Ok(end) => ExitCode::from(end.exit_code()),
        Err(e) => {
            eprintln!("Unexpected error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logger; `RUST_LOG` overrides the verbosity flag
#[cfg(target_os = "linux")]
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}
