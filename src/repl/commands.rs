//! Command handler for REPL built-in commands

use crate::dataset::DatasetIndex;
use crate::repl::display::DisplayManager;
use crate::repl::session::SessionState;
use crate::repl::theme::Theme;
use anyhow::Result;
use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Symptoms { filter: Option<String> },
    Select { symptoms: String },
    Deselect { symptoms: String },
    Selected,
    ClearSelection,
    Profile { assignments: Option<String> },
    Theme { choice: Option<Theme> },
    Verbose { enable: bool },
    Analyze,
    Clear,
    Exit,
    Unknown { input: String },
}

/// What the REPL loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplAction {
    Continue,
    Analyze,
    Exit,
}

/// Parse input into a command; plain text selects symptoms
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(body) = trimmed.strip_prefix('/') else {
        return Command::Select {
            symptoms: trimmed.to_string(),
        };
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    match name.to_lowercase().as_str() {
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        "symptoms" | "list" | "ls" => Command::Symptoms { filter: arg },
        "select" | "add" => match arg {
            Some(symptoms) => Command::Select { symptoms },
            None => Command::Unknown { input: input.to_string() },
        },
        "deselect" | "remove" | "rm" => match arg {
            Some(symptoms) => Command::Deselect { symptoms },
            None => Command::Unknown { input: input.to_string() },
        },
        "selected" | "sel" => Command::Selected,
        "clear-selection" | "reset" => Command::ClearSelection,
        "profile" => Command::Profile { assignments: arg },
        "theme" => match arg.as_deref().map(str::parse::<Theme>) {
            None => Command::Theme { choice: None },
            Some(Ok(theme)) => Command::Theme { choice: Some(theme) },
            Some(Err(_)) => Command::Unknown { input: input.to_string() },
        },
        "verbose" => {
            let enable = arg
                .as_deref()
                .map(|s| matches!(s.to_lowercase().as_str(), "on" | "1" | "true"))
                .unwrap_or(true);
            Command::Verbose { enable }
        }
        "analyze" | "analyse" | "check" | "run" => Command::Analyze,
        "clear" | "cls" => Command::Clear,
        _ => Command::Unknown { input: input.to_string() },
    }
}

/// Execute a command against the session state
pub fn execute(
    command: Command,
    state: &mut SessionState,
    index: &DatasetIndex,
    display: &mut DisplayManager,
) -> Result<ReplAction> {
    match command {
        Command::Help => show_help(),
        Command::Exit => {
            println!("{}", "Goodbye!".green());
            return Ok(ReplAction::Exit);
        }
        Command::Symptoms { filter } => {
            let needle = filter.as_deref().map(|f| f.trim().to_lowercase().replace('_', " "));
            let symptoms: Vec<String> = index
                .display_symptoms()
                .into_iter()
                .filter(|s| needle.as_deref().map_or(true, |n| s.contains(n)))
                .collect();
            display.show_symptoms(&symptoms, state.selection());
        }
        Command::Select { symptoms } => {
            let change = state.select_from(&symptoms, index);
            if !change.added.is_empty() {
                display.show_info(&format!("Selected: {}", change.added.join(", ")));
            }
            if !change.already_selected.is_empty() {
                display.show_info(&format!("Already selected: {}", change.already_selected.join(", ")));
            }
            if !change.unknown.is_empty() {
                display.show_warning(&format!(
                    "Not in dataset: {} (use /symptoms to browse)",
                    change.unknown.join(", ")
                ));
            }
        }
        Command::Deselect { symptoms } => {
            let removed = state.deselect_from(&symptoms);
            if removed.is_empty() {
                display.show_warning("None of those symptoms were selected.");
            } else {
                display.show_info(&format!("Removed: {}", removed.join(", ")));
            }
        }
        Command::Selected => display.show_selection(state.selection()),
        Command::ClearSelection => {
            state.clear_selection();
            println!("{}", "Selection cleared.".yellow());
        }
        Command::Profile { assignments } => {
            if let Some(assignments) = assignments {
                for assignment in assignments.split(';').filter(|a| !a.trim().is_empty()) {
                    let result = match assignment.split_once('=') {
                        Some((field, value)) => state.profile.set_field(field, value),
                        None => Err(format!("expected field=value, got '{}'", assignment.trim())),
                    };
                    if let Err(e) = result {
                        display.show_error(&e);
                    }
                }
            }
            display.show_profile(&state.profile);
        }
        Command::Theme { choice } => {
            let theme = choice.unwrap_or_else(|| display.theme().toggled());
            display.set_theme(theme);
            display.show_info(&format!("Theme: {}", theme));
        }
        Command::Verbose { enable } => {
            display.set_verbose(enable);
            let status = if enable { "enabled" } else { "disabled" };
            println!("{}", format!("Verbose mode {}", status).cyan());
        }
        Command::Analyze => return Ok(ReplAction::Analyze),
        Command::Clear => display.clear_screen()?,
        Command::Unknown { input } => {
            println!("{}", format!("Unknown command: {}", input).red());
            println!("Type {} for available commands", "/help".cyan());
        }
    }
    Ok(ReplAction::Continue)
}

fn show_help() {
    println!("\n{}", "Available Commands:".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let commands = [
        ("/symptoms [filter]", "List selectable symptoms"),
        ("/select a, b", "Select symptoms (plain text works too)"),
        ("/deselect a, b", "Remove symptoms from the selection"),
        ("/selected", "Show the current selection"),
        ("/clear-selection", "Deselect everything"),
        ("/profile [f=v; ...]", "Show or set name, age, gender, history"),
        ("/theme [light|dark]", "Toggle or set the color theme"),
        ("/verbose [on|off]", "Show dataset matches and fallback reasons"),
        ("/analyze", "Analyze the selected symptoms"),
        ("/clear, /cls", "Clear screen"),
        ("/exit, /quit, /q", "Exit"),
    ];

    for (cmd, desc) in commands {
        println!("  {:<22} {}", cmd.green(), desc);
    }

    println!("\n{}", "Example:".bold());
    println!("  /profile name=Ada; age=36; gender=female");
    println!("  fever, chest pain");
    println!("  /analyze");
    println!();
}
