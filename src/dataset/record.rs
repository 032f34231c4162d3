//! Condition records and symptom token normalization

use serde::Serialize;
use std::collections::BTreeSet;

/// Placeholder pandas writes for absent cells; treated as an empty slot
const MISSING_CELL: &str = "nan";

/// Normalize a symptom into its token form.
///
/// Lowercases, trims, and joins inner whitespace runs with underscores, so
/// `" Chest Pain "`, `"chest pain"` and `"chest_pain"` all become
/// `"chest_pain"`. Applied identically to dataset cells and user input.
pub fn normalize_token(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Human-readable form of a token (`chest_pain` -> `chest pain`)
pub fn humanize_token(token: &str) -> String {
    token.replace('_', " ")
}

/// Normalize a dataset cell, returning `None` for empty slots
pub(crate) fn normalize_cell(raw: &str) -> Option<String> {
    let token = normalize_token(raw);
    if token.is_empty() || token == MISSING_CELL {
        None
    } else {
        Some(token)
    }
}

/// One dataset row: a condition and its ordered symptom slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRecord {
    condition: String,
    slots: Vec<Option<String>>,
}

impl ConditionRecord {
    /// Build a record from raw cells, applying the load-time normalization
    pub fn from_raw<'a, I>(condition: &str, cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            condition: condition.trim().to_string(),
            slots: cells.into_iter().map(normalize_cell).collect(),
        }
    }

    /// Condition name, trimmed
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Symptom slots in column order; `None` marks an empty slot
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Non-empty symptom tokens in column order
    pub fn symptoms(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }

    /// Distinct non-empty symptom tokens
    pub fn symptom_set(&self) -> BTreeSet<&str> {
        self.symptoms().collect()
    }

    pub fn has_symptom(&self, token: &str) -> bool {
        self.symptoms().any(|s| s == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants_agree() {
        assert_eq!(normalize_token("Chest Pain"), "chest_pain");
        assert_eq!(normalize_token("chest_pain"), "chest_pain");
        assert_eq!(normalize_token(" chest pain "), "chest_pain");
        assert_eq!(normalize_token("CHEST\tpain"), "chest_pain");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_token(""), "");
        assert_eq!(normalize_token("   "), "");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize_token("chest_pain"), "chest pain");
        assert_eq!(humanize_token("fever"), "fever");
    }

    #[test]
    fn test_missing_cells_are_empty_slots() {
        assert_eq!(normalize_cell(""), None);
        assert_eq!(normalize_cell(" NaN "), None);
        assert_eq!(normalize_cell(" Fever"), Some("fever".to_string()));
    }

    #[test]
    fn test_record_from_raw() {
        let record = ConditionRecord::from_raw("  Flu ", [" Fever", "", "cough", "nan"]);
        assert_eq!(record.condition(), "Flu");
        assert_eq!(record.slots().len(), 4);
        assert_eq!(record.symptoms().collect::<Vec<_>>(), vec!["fever", "cough"]);
        assert!(record.has_symptom("cough"));
        assert!(!record.has_symptom("sneezing"));
    }

    #[test]
    fn test_symptom_set_dedups() {
        let record = ConditionRecord::from_raw("Cold", ["cough", "Cough", "sneezing"]);
        assert_eq!(record.symptom_set().len(), 2);
    }
}
