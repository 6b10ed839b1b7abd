//! CLI argument parsing

use clap::Parser;
use spirepl_core::config::{DEFAULT_BITS_PER_WORD, DEFAULT_DEVICE, DEFAULT_SPEED_HZ};
use spirepl_core::{SpiMode, TransferConfig};

#[derive(Parser, Debug)]
#[command(name = "spirepl")]
#[command(author, version, about = "SPI REPL: send hex strings to a spidev device", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// SPI device
    #[arg(long, default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// SPI speed in Hz
    #[arg(long, default_value_t = DEFAULT_SPEED_HZ, value_parser = clap::value_parser!(u32).range(1..))]
    pub speed: u32,

    /// SPI bits per word
    #[arg(long, default_value_t = DEFAULT_BITS_PER_WORD, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub bits_per_word: u8,

    /// SPI clock phase (CPHA)
    #[arg(long)]
    pub phase: bool,

    /// SPI clock polarity (CPOL)
    #[arg(long)]
    pub polarity: bool,

    /// SPI chip select is active high
    #[arg(long)]
    pub cs_high: bool,

    /// SPI bit order: least significant bit first
    #[arg(long)]
    pub lsb_first: bool,

    /// SPI 3-wire mode
    #[arg(long)]
    pub three_wire: bool,

    /// SPI loopback mode
    #[arg(long = "loop")]
    pub loopback: bool,

    /// SPI no chip select
    #[arg(long)]
    pub no_cs: bool,

    /// SPI slave pulls low to pause
    #[arg(long)]
    pub ready: bool,

    /// SPI delay in usecs
    #[arg(long, default_value_t = 0, help_heading = "Transfer options")]
    pub delay: u16,

    /// Don't load or save line history
    #[arg(long)]
    pub no_history: bool,
}

impl Cli {
    /// Mode flags selected on the command line
    pub fn mode(&self) -> SpiMode {
        let mut mode = SpiMode::empty();
        mode.set(SpiMode::CPHA, self.phase);
        mode.set(SpiMode::CPOL, self.polarity);
        mode.set(SpiMode::CS_HIGH, self.cs_high);
        mode.set(SpiMode::LSB_FIRST, self.lsb_first);
        mode.set(SpiMode::THREE_WIRE, self.three_wire);
        mode.set(SpiMode::LOOP, self.loopback);
        mode.set(SpiMode::NO_CS, self.no_cs);
        mode.set(SpiMode::READY, self.ready);
        mode
    }

    /// Build the transfer configuration
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig::new(self.device.clone())
            .with_speed(self.speed)
            .with_bits_per_word(self.bits_per_word)
            .with_mode(self.mode())
            .with_delay(self.delay)
    }
}
