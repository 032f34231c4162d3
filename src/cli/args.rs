//! Command-line argument parsing for SymptomCheck
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::advisor::{Gender, PatientProfile};
use crate::advisor::prompt::{MAX_AGE, MIN_AGE};
use crate::retrieval::UserSelection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SymptomCheck - match symptoms to known conditions and get non-diagnostic guidance
#[derive(Parser, Debug)]
#[command(name = "symptomcheck")]
#[command(version)]
#[command(about = "Match symptoms to known conditions and get non-diagnostic guidance", long_about = None)]
pub struct Args {
    /// Dataset CSV (overrides dataset.path from config)
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand (interactive mode when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start interactive mode
    Start,

    /// List selectable symptoms
    Symptoms {
        /// Only show symptoms containing this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show dataset conditions sharing any of the given symptoms
    Lookup {
        /// Symptoms (comma-separated or repeated)
        #[arg(required = true, value_name = "SYMPTOM")]
        symptoms: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Analyze symptoms with the language model
    Check {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Symptom to analyze (repeatable, or comma-separated)
        #[arg(short, long = "symptom", value_name = "SYMPTOM")]
        symptoms: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run system diagnostics and health checks
    Doctor,

    /// Display current configuration
    Config,
}

/// Patient profile fields
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct ProfileArgs {
    /// Patient name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Patient age
    #[arg(long, default_value_t = MIN_AGE, value_parser = clap::value_parser!(u8).range(MIN_AGE as i64..=MAX_AGE as i64))]
    pub age: u8,

    /// Patient gender
    #[arg(long, value_enum, default_value_t = Gender::Male)]
    pub gender: Gender,

    /// Free-text medical history
    #[arg(long, default_value = "")]
    pub history: String,
}

impl From<ProfileArgs> for PatientProfile {
    fn from(args: ProfileArgs) -> Self {
        PatientProfile {
            name: args.name.trim().to_string(),
            age: args.age,
            gender: args.gender,
            history: args.history.trim().to_string(),
        }
    }
}

/// Collect symptom arguments, each possibly a comma-separated list
pub fn selection_from_args(values: &[String]) -> UserSelection {
    let mut selection = UserSelection::new();
    for value in values {
        selection.extend(UserSelection::parse_list(value).tokens());
    }
    selection
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, interactive mode by default
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

impl Commands {
    /// Whether this command talks to the language model
    pub fn needs_model(&self) -> bool {
        matches!(self, Commands::Start | Commands::Check { .. })
    }
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter for this level (RUST_LOG takes precedence)
    pub fn log_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "symptomcheck=error",
            Verbosity::Normal => "symptomcheck=warn",
            Verbosity::Verbose => "symptomcheck=info",
            Verbosity::VeryVerbose => "symptomcheck=debug",
        }
    }

    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Show dataset matches and fallback reasons alongside results
    pub fn show_details(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
