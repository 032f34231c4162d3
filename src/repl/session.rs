//! In-memory state for one REPL run
//!
//! Profile, current selection and the most recent analysis. Nothing here is
//! written to disk and it is dropped when the REPL exits.

use crate::advisor::PatientProfile;
use crate::analysis::Analysis;
use crate::dataset::{normalize_token, DatasetIndex};
use crate::retrieval::UserSelection;

/// Outcome of adding symptoms to the selection
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub added: Vec<String>,
    pub already_selected: Vec<String>,
    /// Not offered by the dataset, so not selectable
    pub unknown: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SessionState {
    pub profile: PatientProfile,
    selection: UserSelection,
    last_analysis: Option<Analysis>,
    analyses_run: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &UserSelection {
        &self.selection
    }

    /// Select symptoms from a list, accepting only dataset symptoms
    pub fn select_from(&mut self, input: &str, index: &DatasetIndex) -> SelectionChange {
        let mut change = SelectionChange::default();

        for raw in input.split([',', ';']) {
            let raw = raw.trim();
            let token = normalize_token(raw);
            if token.is_empty() {
                continue;
            }
            if !index.contains_symptom(&token) {
                change.unknown.push(raw.to_string());
            } else if self.selection.insert(&token) {
                change.added.push(raw.to_string());
            } else {
                change.already_selected.push(raw.to_string());
            }
        }

        change
    }

    /// Remove symptoms; returns the ones that were actually selected
    pub fn deselect_from(&mut self, input: &str) -> Vec<String> {
        input
            .split([',', ';'])
            .map(str::trim)
            .filter(|raw| self.selection.remove(raw))
            .map(str::to_string)
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn record_analysis(&mut self, analysis: Analysis) {
        self.analyses_run += 1;
        self.last_analysis = Some(analysis);
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last_analysis.as_ref()
    }

    pub fn analyses_run(&self) -> usize {
        self.analyses_run
    }
}
