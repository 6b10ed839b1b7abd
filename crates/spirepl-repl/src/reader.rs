//! Line input
//!
//! The session reads through the [`LineReader`] trait so the loop can be
//! driven by a real terminal or by a script in tests.

use crate::error::ReplError;
use crate::highlight::ReplHelper;
use directories::ProjectDirs;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::Editor;
use std::path::PathBuf;

/// Result of waiting for one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line of text, without the trailing newline
    Line(String),
    /// Standard input was closed
    Eof,
    /// The user pressed Ctrl+C
    Interrupted,
}

/// Source of input lines
pub trait LineReader {
    /// Show `prompt` and block until a line, EOF or an interrupt arrives
    fn read_line(&mut self, prompt: &str) -> Result<Input, ReplError>;
}

/// Get the default history file path
pub fn default_history_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "spirepl")?;
    let mut path = proj_dirs.data_dir().to_path_buf();
    if let Err(e) = std::fs::create_dir_all(&path) {
        log::debug!("Cannot create {}: {}", path.display(), e);
        return None;
    }
    path.push("history");
    Some(path)
}

/// Terminal line reader backed by rustyline
///
/// When stdin is not a terminal rustyline falls back to plain line reads,
/// so piping a file of hex strings into the REPL works too.
pub struct EditorReader {
    editor: Editor<ReplHelper, FileHistory>,
    history_path: Option<PathBuf>,
}

impl EditorReader {
    /// Create a reader, loading history from `history_path` if given
    pub fn new(history_path: Option<PathBuf>) -> Result<Self, ReplError> {
        let mut editor = Editor::<ReplHelper, FileHistory>::new()?;
        editor.set_helper(Some(ReplHelper::new()));

        if let Some(path) = &history_path {
            if editor.load_history(path).is_err() {
                // History file doesn't exist yet, that's fine
                log::debug!("No history loaded from {}", path.display());
            }
        }

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<Input, ReplError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for EditorReader {
    fn drop(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                log::warn!("Failed to save history to {}: {}", path.display(), e);
            }
        }
    }
}
