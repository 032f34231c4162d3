//! SymptomCheck - symptom lookup assistant
//!
//! Matches user-selected symptoms against a static condition dataset and asks
//! a language model for structured, non-diagnostic guidance.
//!
//! # Architecture
//!
//! - **dataset**: CSV loading, normalization, reverse symptom index
//! - **retrieval**: selection-to-condition matching
//! - **advisor**: prompt, model client, JSON extraction, fallback
//! - **analysis**: one analyze action end to end
//! - **repl** / **cli**: terminal surfaces

pub mod errors;

pub use errors::{CheckerError, ModelResponseError, Result};

pub mod config;
pub mod dataset;
pub mod retrieval;

pub mod advisor;
pub mod analysis;

pub mod cli;
pub mod doctor;
pub mod repl;

pub use analysis::{analyze, Analysis};
pub use dataset::DatasetIndex;
pub use retrieval::{retrieve, retrieve_indexed, UserSelection};
