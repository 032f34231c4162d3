//! User symptom selection

use crate::dataset::record::{humanize_token, normalize_token};
use serde::Serialize;
use std::collections::BTreeSet;

/// Unordered set of normalized symptom tokens chosen for one lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserSelection {
    tokens: BTreeSet<String>,
}

impl UserSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma- or semicolon-separated list (`"fever, chest pain"`)
    pub fn parse_list(input: &str) -> Self {
        input.split([',', ';']).collect()
    }

    /// Add a symptom; returns false if it was blank or already selected
    pub fn insert(&mut self, symptom: &str) -> bool {
        let token = normalize_token(symptom);
        if token.is_empty() {
            return false;
        }
        self.tokens.insert(token)
    }

    /// Remove a symptom; returns false if it was not selected
    pub fn remove(&mut self, symptom: &str) -> bool {
        self.tokens.remove(&normalize_token(symptom))
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.tokens.contains(&normalize_token(symptom))
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Normalized tokens, sorted
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens in human-readable form, sorted
    pub fn display_names(&self) -> Vec<String> {
        self.tokens().map(humanize_token).collect()
    }

    pub(crate) fn as_set(&self) -> &BTreeSet<String> {
        &self.tokens
    }
}

impl<S: AsRef<str>> FromIterator<S> for UserSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for symptom in iter {
            selection.insert(symptom.as_ref());
        }
        selection
    }
}

impl<S: AsRef<str>> Extend<S> for UserSelection {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for symptom in iter {
            self.insert(symptom.as_ref());
        }
    }
}
