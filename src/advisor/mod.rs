//! Language model advisor
//!
//! Turns a selection plus its retrieved candidates into a [`Suggestion`].
//! Model failures of any kind (transport, status, timeout, unparseable
//! output) come back as [`AdvisorOutcome::Fallback`] carrying the reason, so
//! callers always have something to show and the cause stays inspectable.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::GeminiClient;
pub use prompt::{build_user_prompt, Gender, PatientProfile, SYSTEM_PROMPT};
pub use response::{extract_json_object, parse_suggestion, Suggestion};

use crate::errors::{CheckerError, ModelResponseError};
use crate::retrieval::UserSelection;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// A text-completion backend
#[async_trait]
pub trait SuggestionModel: Send + Sync {
    /// Model identifier, for logs and diagnostics
    fn name(&self) -> &str;

    /// Send one system + user exchange and return the raw reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelResponseError>;
}

/// Result of asking the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AdvisorOutcome {
    /// Parsed model answer
    Model { suggestion: Suggestion },

    /// Locally built payload; the model call did not yield a usable answer
    Fallback {
        suggestion: Suggestion,
        #[serde(serialize_with = "serialize_reason")]
        reason: ModelResponseError,
    },
}

fn serialize_reason<S: serde::Serializer>(
    reason: &ModelResponseError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

impl AdvisorOutcome {
    /// Suggestion to display, whichever path produced it
    pub fn suggestion(&self) -> &Suggestion {
        match self {
            AdvisorOutcome::Model { suggestion } | AdvisorOutcome::Fallback { suggestion, .. } => {
                suggestion
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AdvisorOutcome::Fallback { .. })
    }

    /// Why the fallback was used, if it was
    pub fn fallback_reason(&self) -> Option<&ModelResponseError> {
        match self {
            AdvisorOutcome::Fallback { reason, .. } => Some(reason),
            AdvisorOutcome::Model { .. } => None,
        }
    }

    /// Strict view: the model answer, or the failure as an error
    pub fn into_result(self) -> Result<Suggestion, CheckerError> {
        match self {
            AdvisorOutcome::Model { suggestion } => Ok(suggestion),
            AdvisorOutcome::Fallback { reason, .. } => Err(CheckerError::ModelResponse(reason)),
        }
    }
}

/// Ask `model` for guidance, falling back to the dataset lookup on failure
pub async fn advise(
    model: &dyn SuggestionModel,
    profile: &PatientProfile,
    selection: &UserSelection,
    retrieved: &BTreeSet<String>,
) -> AdvisorOutcome {
    let user_prompt = build_user_prompt(profile, selection, retrieved);

    let reply = model.complete(SYSTEM_PROMPT, &user_prompt).await;
    match reply.and_then(|text| parse_suggestion(&text)) {
        Ok(suggestion) => {
            info!(model = model.name(), conditions = suggestion.possible_conditions.len(), "model suggestion received");
            AdvisorOutcome::Model { suggestion }
        }
        Err(reason) => {
            warn!(model = model.name(), %reason, "model response unusable, using fallback");
            AdvisorOutcome::Fallback {
                suggestion: Suggestion::fallback(retrieved),
                reason,
            }
        }
    }
}
