//! Column contract for the condition dataset
//!
//! The dataset has no fixed schema. A file is accepted when it has:
//!
//! - a `condition` column (header compared trimmed, case-insensitively)
//! - one or more symptom columns, i.e. any header whose lowercase form
//!   starts with [`SymptomColumnRule::prefix`] (`"symptom"` by default)
//!
//! Every other column is ignored. Symptom columns are read in file order.
//! Prefix matching is loose: a column such as `symptom_notes` would also be
//! swept in, so headers that do not look like `Symptom_<n>` are reported
//! through [`ColumnLayout::suspicious`] and logged at load time.

use csv::StringRecord;

/// Header of the condition column
pub const CONDITION_COLUMN: &str = "condition";

/// Default prefix identifying symptom columns
pub const DEFAULT_SYMPTOM_PREFIX: &str = "symptom";

/// How symptom columns are recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomColumnRule {
    prefix: String,
}

impl SymptomColumnRule {
    /// Rule with a custom prefix (compared case-insensitively)
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim().to_lowercase(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `header` names a symptom column
    pub fn matches(&self, header: &str) -> bool {
        header.trim().to_lowercase().starts_with(&self.prefix)
    }

    /// Whether a matched header has the conventional `Symptom_<n>` shape
    pub fn is_conventional(&self, header: &str) -> bool {
        let lowered = header.trim().to_lowercase();
        let Some(rest) = lowered.strip_prefix(&self.prefix) else {
            return false;
        };
        let rest = rest.trim_start_matches(['_', ' ', '-']);
        rest.is_empty() || rest == "s" || rest.chars().all(|c| c.is_ascii_digit())
    }
}

impl Default for SymptomColumnRule {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_SYMPTOM_PREFIX)
    }
}

/// Resolved column positions for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub condition: usize,
    /// (position, header) for each symptom column, in file order
    pub symptoms: Vec<(usize, String)>,
    /// Symptom headers that matched the prefix but not the usual shape
    pub suspicious: Vec<String>,
}

impl ColumnLayout {
    /// Resolve the layout from a header row, or explain what is missing
    pub fn resolve(headers: &StringRecord, rule: &SymptomColumnRule) -> Result<Self, String> {
        let condition = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(CONDITION_COLUMN));

        let symptoms: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| rule.matches(h))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        match (condition, symptoms.is_empty()) {
            (None, true) => Err(format!(
                "dataset must contain a '{}' column and at least one '{}*' column",
                CONDITION_COLUMN,
                rule.prefix()
            )),
            (None, false) => Err(format!("missing '{}' column", CONDITION_COLUMN)),
            (Some(_), true) => Err(format!(
                "no symptom columns (headers starting with '{}')",
                rule.prefix()
            )),
            (Some(condition), false) => {
                let suspicious = symptoms
                    .iter()
                    .filter(|(_, h)| !rule.is_conventional(h))
                    .map(|(_, h)| h.clone())
                    .collect();
                Ok(Self {
                    condition,
                    symptoms,
                    suspicious,
                })
            }
        }
    }

    pub fn symptom_headers(&self) -> Vec<String> {
        self.symptoms.iter().map(|(_, h)| h.clone()).collect()
    }
}
