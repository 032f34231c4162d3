//! Symptom-to-condition retrieval
//!
//! A record matches when its non-empty symptom set shares at least one token
//! with the selection. The result is the deduplicated set of matched
//! condition names; callers supply their own label when it is empty.

pub mod selection;

pub use selection::UserSelection;

use crate::dataset::DatasetIndex;
use std::collections::BTreeSet;
use tracing::debug;

/// Conditions sharing at least one symptom with `selected`.
///
/// Scans every record: O(records x symptom columns).
pub fn retrieve(selected: &UserSelection, index: &DatasetIndex) -> BTreeSet<String> {
    if selected.is_empty() {
        return BTreeSet::new();
    }

    let wanted = selected.as_set();
    let matched: BTreeSet<String> = index
        .records()
        .iter()
        .filter(|record| record.symptoms().any(|token| wanted.contains(token)))
        .map(|record| record.condition().to_string())
        .collect();

    debug!(selected = selected.len(), matched = matched.len(), "retrieval scan");
    matched
}

/// Same result as [`retrieve`], answered from the reverse index
pub fn retrieve_indexed(selected: &UserSelection, index: &DatasetIndex) -> BTreeSet<String> {
    selected
        .tokens()
        .filter_map(|token| index.conditions_for(token))
        .flat_map(|conditions| conditions.iter().cloned())
        .collect()
}
