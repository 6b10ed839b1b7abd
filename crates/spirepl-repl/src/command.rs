//! Classification of a single input line

use spirepl_core::hex;

/// Any line starting with this ends the session
pub const EXIT_COMMAND: &str = "exit";

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Leave the REPL
    Exit,
    /// Nothing to send; prompt again
    Empty,
    /// Send these bytes
    Transfer(Vec<u8>),
    /// Not a hex string
    BadHex(spirepl_core::Error),
}

impl Command {
    /// Classify one line of input
    ///
    /// Only the line terminator is dropped; any other whitespace makes the
    /// line bad hex. `exit` is matched as a prefix, so `exit now` and
    /// `exitstuff` both end the session.
    pub fn parse(line: &str) -> Self {
        let input = line.trim_end_matches(['\r', '\n']);

        if input.starts_with(EXIT_COMMAND) {
            return Command::Exit;
        }

        if input.trim().is_empty() {
            return Command::Empty;
        }

        match hex::decode_request(input) {
            Ok(bytes) if bytes.is_empty() => Command::Empty,
            Ok(bytes) => Command::Transfer(bytes),
            Err(e) => Command::BadHex(e),
        }
    }
}
