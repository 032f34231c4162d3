//! Line editing for the REPL
//!
//! Lines are not added to history as they are read. The session decides what
//! to keep through [`InputHandler::remember`] so that profile assignments
//! (name, medical history) never reach the history file.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::{debug, warn};

/// One read from the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line, trimmed; may be empty
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D or closed stdin
    Eof,
}

pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
        })
    }

    /// Editor backed by a history file, loaded now and written on save
    pub fn with_history(history_path: PathBuf) -> Result<Self> {
        let mut handler = InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
        };

        if history_path.exists() {
            match handler.editor.load_history(&history_path) {
                Ok(()) => debug!(path = %history_path.display(), entries = handler.history_len(), "history loaded"),
                Err(e) => warn!(path = %history_path.display(), error = %e, "could not load REPL history"),
            }
        }

        handler.history_path = Some(history_path);
        Ok(handler)
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line.trim().to_string())),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(anyhow::anyhow!("Readline error: {}", err)),
        }
    }

    /// Add a line to history (kept in memory until [`save_history`](Self::save_history))
    pub fn remember(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!(error = %e, "could not record history entry");
        }
    }

    pub fn save_history(&mut self) -> Result<()> {
        if let Some(path) = &self.history_path {
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_without_history_file() {
        let mut handler = InputHandler::new().unwrap();
        handler.remember("fever");
        assert_eq!(handler.history_len(), 1);
        handler.save_history().unwrap();
    }

    #[test]
    fn test_blank_lines_not_remembered() {
        let mut handler = InputHandler::new().unwrap();
        handler.remember("");
        assert_eq!(handler.history_len(), 0);
    }

    #[test]
    fn test_history_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history");

        {
            let mut handler = InputHandler::with_history(path.clone()).unwrap();
            handler.remember("/select fever");
            handler.remember("/analyze");
            handler.save_history().unwrap();
        }

        let handler = InputHandler::with_history(path).unwrap();
        assert_eq!(handler.history_len(), 2);
    }

    #[test]
    fn test_unreadable_history_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be
        let handler = InputHandler::with_history(dir.path().to_path_buf());
        assert!(handler.is_ok());
    }
}
