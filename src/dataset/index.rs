//! Immutable, load-once dataset index
//!
//! Built once at startup and passed by reference to every lookup. Besides the
//! row list it keeps a reverse index (symptom token -> conditions) so large
//! datasets can be queried without a full scan.

use crate::dataset::record::{humanize_token, ConditionRecord};
use crate::dataset::schema::{ColumnLayout, SymptomColumnRule};
use crate::errors::{CheckerError, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Origin label used when parsing from an in-memory reader
const READER_ORIGIN: &str = "<reader>";

/// Condition-to-symptom dataset, normalized and read-only
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    symptom_columns: Vec<String>,
    records: Vec<ConditionRecord>,
    by_symptom: HashMap<String, BTreeSet<String>>,
}

impl DatasetIndex {
    /// Load and normalize the dataset at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_rule(path, &SymptomColumnRule::default())
    }

    /// Load with a non-default symptom column rule
    pub fn load_with_rule(path: impl AsRef<Path>, rule: &SymptomColumnRule) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CheckerError::dataset(path, "file not found"));
        }

        let file = File::open(path)
            .map_err(|e| CheckerError::dataset(path, format!("cannot open file: {}", e)))?;

        let index = Self::parse(file, path, rule)?;
        info!(
            path = %path.display(),
            records = index.len(),
            symptoms = index.by_symptom.len(),
            "dataset loaded"
        );
        Ok(index)
    }

    /// Build an index from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse(reader, Path::new(READER_ORIGIN), &SymptomColumnRule::default())
    }

    fn parse<R: Read>(reader: R, origin: &Path, rule: &SymptomColumnRule) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| CheckerError::dataset(origin, format!("cannot read header row: {}", e)))?
            .clone();

        let layout =
            ColumnLayout::resolve(&headers, rule).map_err(|reason| CheckerError::dataset(origin, reason))?;

        for header in &layout.suspicious {
            warn!(
                column = %header,
                "column matched the symptom prefix but is not shaped like Symptom_<n>; its values are treated as symptoms"
            );
        }

        let mut records = Vec::new();
        for (line, row) in csv_reader.records().enumerate() {
            let row = row.map_err(|e| {
                CheckerError::dataset(origin, format!("malformed row {}: {}", line + 2, e))
            })?;

            let condition = row.get(layout.condition).unwrap_or("").trim();
            if condition.is_empty() {
                warn!(row = line + 2, "skipping row without a condition");
                continue;
            }

            let cells = layout
                .symptoms
                .iter()
                .map(|(pos, _)| row.get(*pos).unwrap_or(""));
            records.push(ConditionRecord::from_raw(condition, cells));
        }

        debug!(rows = records.len(), columns = layout.symptoms.len(), "dataset parsed");

        Ok(Self::from_records(layout.symptom_headers(), records))
    }

    fn from_records(symptom_columns: Vec<String>, records: Vec<ConditionRecord>) -> Self {
        let mut by_symptom: HashMap<String, BTreeSet<String>> = HashMap::new();
        for record in &records {
            for token in record.symptoms() {
                by_symptom
                    .entry(token.to_string())
                    .or_default()
                    .insert(record.condition().to_string());
            }
        }

        Self {
            symptom_columns,
            records,
            by_symptom,
        }
    }

    /// Headers picked as symptom columns, in file order
    pub fn symptom_columns(&self) -> &[String] {
        &self.symptom_columns
    }

    pub fn records(&self) -> &[ConditionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All distinct non-empty symptom tokens, sorted
    pub fn symptom_set(&self) -> BTreeSet<&str> {
        self.by_symptom.keys().map(String::as_str).collect()
    }

    /// Selectable symptoms in human-readable form, sorted
    pub fn display_symptoms(&self) -> Vec<String> {
        self.symptom_set()
            .into_iter()
            .map(humanize_token)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct condition names, sorted
    pub fn conditions(&self) -> BTreeSet<&str> {
        self.records.iter().map(ConditionRecord::condition).collect()
    }

    /// Conditions listing `token` in any slot (token must be normalized)
    pub fn conditions_for(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.by_symptom.get(token)
    }

    pub fn contains_symptom(&self, token: &str) -> bool {
        self.by_symptom.contains_key(token)
    }
}
