//! Interactive symptom checker
//!
//! Profile form, symptom browsing and selection, theme toggle and the
//! analyze trigger, driven from a readline prompt. One analysis runs at a
//! time; the loop waits for it before reading the next line.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;
pub mod theme;

use crate::advisor::SuggestionModel;
use crate::analysis::analyze;
use crate::dataset::DatasetIndex;
use crate::errors::CheckerError;
use anyhow::Result;
use std::path::PathBuf;

pub use commands::{Command, ReplAction};
pub use display::DisplayManager;
pub use input::{InputHandler, ReadOutcome};
pub use session::SessionState;
pub use theme::Theme;

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    state: SessionState,
    display: DisplayManager,
}

impl ReplSession {
    pub fn new(display: DisplayManager) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::new()?,
            state: SessionState::new(),
            display,
        })
    }

    /// Create REPL session with persistent command history
    pub fn with_history(display: DisplayManager, history_path: PathBuf) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::with_history(history_path)?,
            state: SessionState::new(),
            display,
        })
    }

    /// Parse and execute one line
    pub fn handle_input(&mut self, input: &str, index: &DatasetIndex) -> Result<ReplAction> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(ReplAction::Continue);
        }

        let command = commands::parse(input);
        // Profile lines carry name and medical history; keep them out of history
        if !matches!(command, Command::Profile { .. }) {
            self.input_handler.remember(input);
        }
        commands::execute(command, &mut self.state, index, &mut self.display)
    }

    /// Write remembered lines to the history file, if there is one
    pub fn save_history(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }

    fn prompt(&self) -> String {
        match self.state.selection().len() {
            0 => "symptomcheck> ".to_string(),
            n => format!("symptomcheck [{} selected]> ", n),
        }
    }

    /// Run one analysis for the current selection and render it
    pub async fn run_analysis(
        &mut self,
        index: &DatasetIndex,
        model: &dyn SuggestionModel,
    ) -> Result<()> {
        if self.state.selection().is_empty() {
            self.display.show_warning(&CheckerError::NoSelection.to_string());
            return Ok(());
        }

        let spinner = self.display.start_analyzing();
        let result = analyze(index, model, &self.state.profile, self.state.selection()).await;
        spinner.finish_and_clear();

        match result {
            Ok(analysis) => {
                self.display.show_analysis(&analysis);
                self.state.record_analysis(analysis);
            }
            Err(CheckerError::NoSelection) => {
                self.display.show_warning(&CheckerError::NoSelection.to_string());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Read-eval-print until `/exit` or EOF
    pub async fn run(&mut self, index: &DatasetIndex, model: &dyn SuggestionModel) -> Result<()> {
        self.display
            .show_banner(env!("CARGO_PKG_VERSION"), model.name(), index.symptom_set().len());

        loop {
            let prompt = self.prompt();
            match self.input_handler.read_line(&prompt)? {
                ReadOutcome::Line(input) => match self.handle_input(&input, index) {
                    Ok(ReplAction::Continue) => {}
                    Ok(ReplAction::Analyze) => self.run_analysis(index, model).await?,
                    Ok(ReplAction::Exit) => break,
                    Err(e) => self.display.show_error(&e.to_string()),
                },
                ReadOutcome::Interrupted => println!("\nUse /exit to quit"),
                ReadOutcome::Eof => break,
            }
        }

        self.save_history()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}
