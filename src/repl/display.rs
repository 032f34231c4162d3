//! Terminal rendering for symptoms, profile and analysis results

use crate::advisor::PatientProfile;
use crate::analysis::Analysis;
use crate::repl::theme::Theme;
use crate::retrieval::UserSelection;
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// Symptoms printed per row in listings
const COLUMNS: usize = 3;

/// Width of one symptom cell in listings
const CELL_WIDTH: usize = 26;

/// Display manager for REPL UI
pub struct DisplayManager {
    theme: Theme,
    show_progress: bool,
    verbose: bool,
}

impl DisplayManager {
    pub fn new(theme: Theme) -> Self {
        DisplayManager {
            theme,
            show_progress: true,
            verbose: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str, symptom_count: usize) {
        let width = 64;
        let rule = "=".repeat(width);

        println!("\n{}", self.theme.accent(&rule));
        println!("{}", self.theme.heading(&format!("  Smart Health Symptom Checker {}", version)));
        println!(
            "{}",
            format!("  Model: {} | Symptoms available: {}", model, symptom_count).dimmed()
        );
        println!("{}\n", self.theme.accent(&rule));
        println!(
            "Type symptoms separated by commas to select them, {} to run, {} for commands\n",
            "/analyze".green(),
            "/help".green()
        );
    }

    /// Section header used across listings
    pub fn show_section(&self, title: &str) {
        println!("\n{}", self.theme.heading(title));
        println!("{}", self.theme.accent(&"=".repeat(60)));
    }

    /// List symptoms, marking selected ones
    pub fn show_symptoms(&self, symptoms: &[String], selection: &UserSelection) {
        if symptoms.is_empty() {
            println!("{}", "No symptoms match.".yellow());
            return;
        }

        self.show_section(&format!("Symptoms ({})", symptoms.len()));
        for row in symptoms.chunks(COLUMNS) {
            let line: String = row
                .iter()
                .map(|symptom| {
                    let marker = if selection.contains(symptom) { "✓" } else { " " };
                    let cell = format!("{} {:<width$}", marker, symptom, width = CELL_WIDTH - 2);
                    if selection.contains(symptom) {
                        cell.green().to_string()
                    } else {
                        self.theme.text(&cell).to_string()
                    }
                })
                .collect();
            println!("  {}", line.trim_end());
        }
        println!();
    }

    pub fn show_selection(&self, selection: &UserSelection) {
        if selection.is_empty() {
            println!("{}", "No symptoms selected.".yellow());
            return;
        }
        println!(
            "{} {}",
            self.theme.heading("Selected:"),
            self.theme.text(&selection.display_names().join(", "))
        );
    }

    pub fn show_profile(&self, profile: &PatientProfile) {
        self.show_section("Patient Profile");
        let name = if profile.name.is_empty() { "-" } else { profile.name.as_str() };
        let history = if profile.history.is_empty() { "-" } else { profile.history.as_str() };
        println!("  {:<10} {}", "Name:".cyan(), self.theme.text(name));
        println!("  {:<10} {}", "Age:".cyan(), self.theme.text(&profile.age.to_string()));
        println!("  {:<10} {}", "Gender:".cyan(), self.theme.text(&profile.gender.to_string()));
        println!("  {:<10} {}", "History:".cyan(), self.theme.text(history));
        println!();
    }

    /// Spinner shown while the model is working
    pub fn start_analyzing(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.red} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Analyzing with AI...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Render the three result blocks
    pub fn show_analysis(&self, analysis: &Analysis) {
        let suggestion = analysis.suggestion();

        println!();
        self.show_card("Possible Conditions", &suggestion.possible_conditions.join(", "));
        self.show_card("Recommended Next Steps", &suggestion.next_steps);
        self.show_card("Disclaimer", &suggestion.disclaimer);

        if self.verbose {
            let retrieved = analysis.retrieved.iter().cloned().collect::<Vec<_>>().join(", ");
            println!(
                "{}",
                format!("Dataset matches: {}", if retrieved.is_empty() { "none" } else { retrieved.as_str() }).dimmed()
            );
            if let Some(reason) = analysis.outcome.fallback_reason() {
                println!("{}", format!("Model unavailable ({}); showing fallback.", reason).dimmed());
            }
            println!("{}", format!("({}ms)", analysis.duration_ms).dimmed());
        }
        println!();
    }

    fn show_card(&self, title: &str, body: &str) {
        println!("{}", self.theme.heading(title));
        for line in render_card(body) {
            println!("  {}", self.theme.card(&line));
        }
        println!();
    }

    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

/// Pad a text block into fixed-width card lines
pub fn render_card(body: &str) -> Vec<String> {
    const CARD_WIDTH: usize = 60;

    let mut lines = vec![" ".repeat(CARD_WIDTH + 2)];
    for paragraph in body.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > CARD_WIDTH {
                lines.push(pad_line(&current, CARD_WIDTH));
                current.clear();
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(pad_line(&current, CARD_WIDTH));
    }
    lines.push(" ".repeat(CARD_WIDTH + 2));
    lines
}

fn pad_line(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!(" {}{} ", text, " ".repeat(width.saturating_sub(len)))
}
