//! Interactive hex REPL over an SPI device
//!
//! Every line typed at the prompt is decoded as hex, clocked out through a
//! [`SpiTransfer`] device, and the bytes clocked in are printed back.
//!
//! # Example Session
//!
//! ```text
//! /dev/spidev0.0 <<< 9f000000
//! /dev/spidev0.0 >>> ffef4018
//! /dev/spidev0.0 <<< 0x5
//! /dev/spidev0.0 >>> ff
//! /dev/spidev0.0 <<< zz
//! expected hex string ('00112233445566778899aabbccddeeff')
//! /dev/spidev0.0 <<< exit
//! Bye!
//! ```
//!
//! Bad hex is reported and the loop carries on. End of input, Ctrl+C and a
//! failed transfer end the session with exit code 1; only `exit` ends it
//! with 0.

mod command;
mod error;
pub mod highlight;
mod reader;

pub use command::{Command, EXIT_COMMAND};
pub use error::ReplError;
pub use reader::{default_history_path, EditorReader, Input, LineReader};

use colored::Colorize;
use spirepl_core::{hex, SpiTransfer, TransferConfig};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

/// Printed when a line is not a hex string
pub const HEX_USAGE: &str = "expected hex string ('00112233445566778899aabbccddeeff')";

/// Outcome of one prompt/response iteration
#[derive(Debug)]
pub enum Step<E> {
    /// Transfer completed with these bytes clocked in
    Response(Vec<u8>),
    /// Nothing was sent
    Skipped,
    /// Line was not hex; the loop continues
    BadHex(spirepl_core::Error),
    /// `exit` was typed
    Exit,
    /// Standard input was closed
    Eof,
    /// Ctrl+C at the prompt
    Interrupted,
    /// The device failed the transfer
    TransferFailed(E),
    /// Reading input failed for another reason
    InputFailed(ReplError),
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The exit command
    Bye,
    /// End of input
    Eof,
    /// Ctrl+C
    Interrupted,
    /// Unrecoverable error, with its message
    Fatal(String),
}

impl SessionEnd {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionEnd::Bye => 0,
            SessionEnd::Eof | SessionEnd::Interrupted | SessionEnd::Fatal(_) => 1,
        }
    }
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::Bye => write!(f, "Bye!"),
            SessionEnd::Eof => write!(f, "EOF"),
            SessionEnd::Interrupted => write!(f, "CTRL+C pressed"),
            SessionEnd::Fatal(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

/// One REPL session over a device
///
/// The session owns the device; dropping the session closes it.
pub struct Session<D, R, O, E> {
    device: D,
    reader: R,
    out: O,
    err: E,
    delay_us: u16,
}

impl<D, R, O, E> Session<D, R, O, E>
where
    D: SpiTransfer,
    R: LineReader,
    O: Write,
    E: Write,
{
    /// Create a session writing responses to `out` and diagnostics to `err`
    pub fn new(device: D, reader: R, out: O, err: E, delay_us: u16) -> Self {
        Self {
            device,
            reader,
            out,
            err,
            delay_us,
        }
    }

    /// Prompt shown before every line
    pub fn prompt(&self) -> String {
        format!("{} <<< ", self.device.device())
    }

    /// Read one line and act on it
    pub fn step(&mut self) -> Step<D::Error> {
        let prompt = self.prompt();
        let line = match self.reader.read_line(&prompt) {
            Ok(Input::Line(line)) => line,
            Ok(Input::Eof) => return Step::Eof,
            Ok(Input::Interrupted) => return Step::Interrupted,
            Err(e) => return Step::InputFailed(e),
        };

        match Command::parse(&line) {
            Command::Exit => Step::Exit,
            Command::Empty => Step::Skipped,
            Command::BadHex(e) => Step::BadHex(e),
            Command::Transfer(tx) => {
                log::debug!("tx {} bytes: {}", tx.len(), hex::encode_response(&tx));
                match self.device.transfer(&tx, self.delay_us) {
                    Ok(rx) => Step::Response(rx),
                    Err(e) => Step::TransferFailed(e),
                }
            }
        }
    }

    /// Run until the session ends
    ///
    /// The reason is written to the error stream before it is returned.
    pub fn run(&mut self) -> Result<SessionEnd, ReplError> {
        let end = loop {
            match self.step() {
                Step::Response(rx) => {
                    writeln!(
                        self.out,
                        "{} >>> {}",
                        self.device.device(),
                        hex::encode_response(&rx)
                    )?;
                }
                Step::Skipped => {}
                Step::BadHex(e) => {
                    log::debug!("{}", e);
                    writeln!(self.out, "{}", HEX_USAGE)?;
                }
                Step::Exit => break SessionEnd::Bye,
                Step::Eof => break SessionEnd::Eof,
                Step::Interrupted => break SessionEnd::Interrupted,
                Step::TransferFailed(e) => break SessionEnd::Fatal(e.to_string()),
                Step::InputFailed(e) => break SessionEnd::Fatal(e.to_string()),
            }
            self.out.flush()?;
        };

        writeln!(self.err, "{}", end)?;
        Ok(end)
    }
}

/// Lines printed once before the first prompt
pub fn intro(config: &TransferConfig) -> String {
    format!(
        "{}\nnow enter hex strings to send to the device",
        format!(
            "SPI device: {} speed: {} bits_per_word: {}",
            config.device, config.speed_hz, config.bits_per_word
        )
        .bright_yellow()
        .bold()
    )
}

/// Run the interactive REPL on stdin/stdout with the given device
///
/// Takes ownership of the device and closes it before returning.
pub fn run_repl<D: SpiTransfer>(
    device: D,
    config: &TransferConfig,
    history_path: Option<PathBuf>,
) -> Result<SessionEnd, ReplError> {
    let reader = EditorReader::new(history_path)?;

    println!("{}", intro(config));

    let mut session = Session::new(
        device,
        reader,
        std::io::stdout(),
        std::io::stderr(),
        config.delay_us,
    );
    session.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    struct MockError(String);

    /// Device that answers with the request bit-inverted
    #[derive(Default)]
    struct MockDevice {
        calls: Vec<(Vec<u8>, u16)>,
        fail_with: Option<String>,
    }

    impl SpiTransfer for MockDevice {
        type Error = MockError;

        fn device(&self) -> &str {
            "/dev/mock"
        }

        fn transfer(&mut self, tx: &[u8], delay_us: u16) -> Result<Vec<u8>, MockError> {
            self.calls.push((tx.to_vec(), delay_us));
            if let Some(msg) = &self.fail_with {
                return Err(MockError(msg.clone()));
            }
            Ok(tx.iter().map(|b| !b).collect())
        }
    }

    /// Reader that replays canned input, then reports EOF
    struct ScriptedReader {
        inputs: VecDeque<Input>,
        prompts: Vec<String>,
    }

    impl ScriptedReader {
        fn lines(lines: &[&str]) -> Self {
            Self::inputs(lines.iter().map(|l| Input::Line(l.to_string())).collect())
        }

        fn inputs(inputs: Vec<Input>) -> Self {
            Self {
                inputs: inputs.into(),
                prompts: Vec::new(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, prompt: &str) -> Result<Input, ReplError> {
            self.prompts.push(prompt.to_string());
            Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
        }
    }

    type TestSession = Session<MockDevice, ScriptedReader, Vec<u8>, Vec<u8>>;

    fn session(reader: ScriptedReader) -> TestSession {
        Session::new(MockDevice::default(), reader, Vec::new(), Vec::new(), 7)
    }

    fn stdout(s: &TestSession) -> String {
        String::from_utf8(s.out.clone()).unwrap()
    }

    fn stderr(s: &TestSession) -> String {
        String::from_utf8(s.err.clone()).unwrap()
    }

    #[test]
    fn test_transfer_prints_response() {
        let mut s = session(ScriptedReader::lines(&["00112233", "exit"]));
        let end = s.run().unwrap();

        assert_eq!(end, SessionEnd::Bye);
        assert_eq!(s.device.calls, vec![(vec![0x00, 0x11, 0x22, 0x33], 7)]);
        assert_eq!(stdout(&s), "/dev/mock >>> ffeeddcc\n");
    }

    #[test]
    fn test_prompt_echoes_device() {
        let mut s = session(ScriptedReader::lines(&["01", "exit"]));
        s.run().unwrap();
        assert_eq!(s.reader.prompts, vec!["/dev/mock <<< "; 2]);
    }

    #[test]
    fn test_prefix_and_padding() {
        let mut s = session(ScriptedReader::lines(&["0xAB", "A", "exit"]));
        s.run().unwrap();

        assert_eq!(s.device.calls, vec![(vec![0xab], 7), (vec![0x0a], 7)]);
        assert_eq!(stdout(&s), "/dev/mock >>> 54\n/dev/mock >>> f5\n");
    }

    #[test]
    fn test_response_is_twice_request_length() {
        let mut s = session(ScriptedReader::lines(&["0123456789abcdef0", "exit"]));
        s.run().unwrap();

        let out = stdout(&s);
        let hex = out.trim_end().strip_prefix("/dev/mock >>> ").unwrap();
        assert_eq!(hex.len(), 2 * s.device.calls[0].0.len());
        assert_eq!(s.device.calls[0].0.len(), 9);
    }

    #[test]
    fn test_exit_prefix_ends_without_transfer() {
        let mut s = session(ScriptedReader::lines(&["exit now", "00"]));
        let end = s.run().unwrap();

        assert_eq!(end, SessionEnd::Bye);
        assert_eq!(end.exit_code(), 0);
        assert!(s.device.calls.is_empty());
        assert_eq!(stderr(&s), "Bye!\n");
        // The line after exit is never read
        assert_eq!(s.reader.prompts.len(), 1);
    }

    #[test]
    fn test_bad_hex_continues() {
        let mut s = session(ScriptedReader::lines(&["zz", "0xg", "ff", "exitstuff"]));
        let end = s.run().unwrap();

        assert_eq!(end, SessionEnd::Bye);
        assert_eq!(s.device.calls, vec![(vec![0xff], 7)]);
        assert_eq!(
            stdout(&s),
            format!("{}\n{}\n/dev/mock >>> 00\n", HEX_USAGE, HEX_USAGE)
        );
    }

    #[test]
    fn test_blank_line_is_skipped() {
        let mut s = session(ScriptedReader::lines(&["", "   ", "0x", "exit"]));
        s.run().unwrap();

        assert!(s.device.calls.is_empty());
        assert_eq!(stdout(&s), "");
        assert_eq!(s.reader.prompts.len(), 4);
    }

    #[test]
    fn test_eof() {
        let mut s = session(ScriptedReader::lines(&["01"]));
        let end = s.run().unwrap();

        assert_eq!(end, SessionEnd::Eof);
        assert_eq!(end.exit_code(), 1);
        assert_eq!(stderr(&s), "EOF\n");
    }

    #[test]
    fn test_interrupt() {
        let mut s = session(ScriptedReader::inputs(vec![
            Input::Interrupted,
            Input::Line("01".to_string()),
        ]));
        let end = s.run().unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert_eq!(end.exit_code(), 1);
        assert_eq!(stderr(&s), "CTRL+C pressed\n");
        assert!(s.device.calls.is_empty());
    }

    #[test]
    fn test_transfer_failure_is_fatal() {
        let device = MockDevice {
            fail_with: Some("Remote I/O error (os error 121)".to_string()),
            ..Default::default()
        };
        let reader = ScriptedReader::lines(&["01", "02", "exit"]);
        let mut s = Session::new(device, reader, Vec::new(), Vec::new(), 0);
        let end = s.run().unwrap();

        assert_eq!(
            end,
            SessionEnd::Fatal("Remote I/O error (os error 121)".to_string())
        );
        assert_eq!(end.exit_code(), 1);
        assert_eq!(s.device.calls.len(), 1);
        assert_eq!(String::from_utf8(s.out.clone()).unwrap(), "");
        assert_eq!(
            String::from_utf8(s.err.clone()).unwrap(),
            "Unexpected error: Remote I/O error (os error 121)\n"
        );
    }

    #[test]
    fn test_step_outcomes() {
        let mut s = session(ScriptedReader::lines(&["ab", "q", "", "exit"]));
        assert!(matches!(s.step(), Step::Response(rx) if rx == vec![0x54]));
        assert!(matches!(s.step(), Step::BadHex(_)));
        assert!(matches!(s.step(), Step::Skipped));
        assert!(matches!(s.step(), Step::Exit));
        assert!(matches!(s.step(), Step::Eof));
    }

    #[test]
    fn test_intro_mentions_settings() {
        let config = TransferConfig::new("/dev/spidev1.2")
            .with_speed(250_000)
            .with_bits_per_word(16);
        let text = intro(&config);
        assert!(text.contains("SPI device: /dev/spidev1.2 speed: 250000 bits_per_word: 16"));
        assert!(text.ends_with("now enter hex strings to send to the device"));
    }
}
