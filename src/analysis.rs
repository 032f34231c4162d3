//! One analyze action: selection check, retrieval, model call
//!
//! Shared by the one-shot `check` command and the REPL so both surfaces run
//! the same sequence.

use crate::advisor::{advise, AdvisorOutcome, PatientProfile, Suggestion, SuggestionModel};
use crate::dataset::DatasetIndex;
use crate::errors::{CheckerError, Result};
use crate::retrieval::{retrieve, UserSelection};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Everything produced by one analysis
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Selected symptoms, human-readable
    pub symptoms: Vec<String>,
    /// Conditions found in the dataset
    pub retrieved: BTreeSet<String>,
    pub outcome: AdvisorOutcome,
    pub generated_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Analysis {
    pub fn suggestion(&self) -> &Suggestion {
        self.outcome.suggestion()
    }
}

/// Run retrieval and ask the model.
///
/// Fails only with [`CheckerError::NoSelection`]; model problems are
/// absorbed into a fallback outcome.
pub async fn analyze(
    index: &DatasetIndex,
    model: &dyn SuggestionModel,
    profile: &PatientProfile,
    selection: &UserSelection,
) -> Result<Analysis> {
    if selection.is_empty() {
        return Err(CheckerError::NoSelection);
    }

    let start = Instant::now();
    let retrieved = retrieve(selection, index);
    debug!(?retrieved, "dataset candidates");

    let outcome = advise(model, profile, selection, &retrieved).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    info!(
        symptoms = selection.len(),
        retrieved = retrieved.len(),
        fallback = outcome.is_fallback(),
        duration_ms,
        "analysis complete"
    );

    Ok(Analysis {
        symptoms: selection.display_names(),
        retrieved,
        outcome,
        generated_at: Utc::now(),
        duration_ms,
    })
}
