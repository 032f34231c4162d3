//! CLI module for SymptomCheck
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::{selection_from_args, Args, Commands, ProfileArgs, Verbosity};
