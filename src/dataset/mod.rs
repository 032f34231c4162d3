//! Condition dataset: loading, normalization and symptom lookup tables

pub mod index;
pub mod record;
pub mod schema;

pub use index::DatasetIndex;
pub use record::{humanize_token, normalize_token, ConditionRecord};
pub use schema::{SymptomColumnRule, CONDITION_COLUMN, DEFAULT_SYMPTOM_PREFIX};
