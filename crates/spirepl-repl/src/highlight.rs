//! Line editor helper
//!
//! Marks characters that will make a request fail to decode, hints the
//! number of bytes a valid request will clock out, and completes `exit`.

use crate::command::{Command, EXIT_COMMAND};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use spirepl_core::hex::HEX_PREFIX;
use std::borrow::Cow;

/// Helper struct for rustyline that provides hex highlighting, byte count
/// hints and completion of the exit command.
#[derive(Helper, Default)]
pub struct ReplHelper;

impl ReplHelper {
    /// Create a new helper
    pub fn new() -> Self {
        Self
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        if line.is_empty() || !EXIT_COMMAND.starts_with(line) {
            return Ok((0, Vec::new()));
        }

        Ok((
            0,
            vec![Pair {
                display: EXIT_COMMAND.to_string(),
                replacement: EXIT_COMMAND.to_string(),
            }],
        ))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        byte_count_hint(line, pos)
    }
}

impl Validator for ReplHelper {}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        highlight_line(line)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        // Any keystroke can turn a valid request invalid and back
        true
    }
}

/// Hint shown after the cursor: how many bytes the line will send
fn byte_count_hint(line: &str, pos: usize) -> Option<String> {
    if pos < line.len() {
        return None;
    }

    match Command::parse(line) {
        Command::Transfer(bytes) if bytes.len() == 1 => Some("  (1 byte)".to_string()),
        Command::Transfer(bytes) => Some(format!("  ({} bytes)", bytes.len())),
        _ => None,
    }
}

/// Colour the exit command, and mark non-hex characters in red
fn highlight_line(line: &str) -> Cow<'_, str> {
    if line.starts_with(EXIT_COMMAND) {
        return Cow::Owned(line.bright_cyan().to_string());
    }

    // Blank lines are skipped, not rejected
    if line.trim().is_empty() {
        return Cow::Borrowed(line);
    }

    let body = line.strip_prefix(HEX_PREFIX).unwrap_or(line);
    if body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Cow::Borrowed(line);
    }

    let body_start = line.len() - body.len();
    let mut highlighted = String::with_capacity(line.len() * 2);
    highlighted.push_str(&line[..body_start]);
    for c in body.chars() {
        if c.is_ascii_hexdigit() {
            highlighted.push(c);
        } else {
            highlighted.push_str(&c.to_string().bright_red().bold().to_string());
        }
    }

    Cow::Owned(highlighted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_count_hint() {
        assert_eq!(byte_count_hint("ab", 2), Some("  (1 byte)".to_string()));
        assert_eq!(
            byte_count_hint("0x00112", 7),
            Some("  (3 bytes)".to_string())
        );
        // Cursor in the middle of the line
        assert_eq!(byte_count_hint("0011", 1), None);
        assert_eq!(byte_count_hint("zz", 2), None);
        assert_eq!(byte_count_hint("", 0), None);
        assert_eq!(byte_count_hint("exit", 4), None);
    }

    #[test]
    fn test_valid_hex_is_not_rewritten() {
        assert!(matches!(highlight_line("deadBEEF"), Cow::Borrowed(_)));
        assert!(matches!(highlight_line("0x0011"), Cow::Borrowed(_)));
        assert!(matches!(highlight_line(""), Cow::Borrowed(_)));
        assert!(matches!(highlight_line("   "), Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_hex_is_rewritten() {
        let highlighted = highlight_line("00zz11");
        assert!(matches!(highlighted, Cow::Owned(_)));
        assert!(highlighted.starts_with("00"));
        assert!(highlighted.ends_with("11"));

        // Padding around the digits is rejected too
        assert!(matches!(highlight_line(" 9f"), Cow::Owned(_)));
        assert!(matches!(highlight_line("0011 "), Cow::Owned(_)));
    }
}
