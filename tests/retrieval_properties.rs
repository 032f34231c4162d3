//! Retrieval behavior against datasets loaded from disk

use std::collections::BTreeSet;
use std::io::Write;
use symptomcheck::{retrieve, retrieve_indexed, CheckerError, DatasetIndex, UserSelection};
use tempfile::NamedTempFile;

const FLU_COLD: &str = "\
condition,Symptom_1,Symptom_2,Symptom_3
Flu,fever,cough,
Cold,runny nose,cough,nan
";

const WIDER: &str = "\
Condition,Symptom_1,Symptom_2,Symptom_3,Symptom_4
Heart Attack, Chest Pain ,shortness_of_breath,sweating,
Angina,chest_pain,fatigue,,
Migraine,headache,nausea,light sensitivity,
Food Poisoning,nausea,vomiting,Stomach  Pain,fever
Flu,fever,cough,fatigue,headache
";

fn write_dataset(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn names(conditions: &[&str]) -> BTreeSet<String> {
    conditions.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_flu_cold_scenario() {
    let file = write_dataset(FLU_COLD);
    let index = DatasetIndex::load(file.path()).unwrap();

    let cough = UserSelection::parse_list("cough");
    let fever = UserSelection::parse_list("fever");
    let headache = UserSelection::parse_list("headache");

    assert_eq!(retrieve(&cough, &index), names(&["Cold", "Flu"]));
    assert_eq!(retrieve(&fever, &index), names(&["Flu"]));
    assert!(retrieve(&headache, &index).is_empty());
}

#[test]
fn test_display_names_retrieve_their_conditions() {
    let file = write_dataset(WIDER);
    let index = DatasetIndex::load(file.path()).unwrap();

    for display in index.display_symptoms() {
        let selection = UserSelection::parse_list(&display);
        let found = retrieve(&selection, &index);

        for record in index.records() {
            if record.has_symptom(&symptomcheck::dataset::normalize_token(&display)) {
                assert!(
                    found.contains(record.condition()),
                    "{} should retrieve {}",
                    display,
                    record.condition()
                );
            }
        }
    }
}

#[test]
fn test_order_does_not_matter() {
    let file = write_dataset(WIDER);
    let index = DatasetIndex::load(file.path()).unwrap();

    let forward = UserSelection::parse_list("fatigue, nausea, chest pain");
    let backward: UserSelection = ["chest pain", "nausea", "fatigue"].into_iter().collect();

    assert_eq!(retrieve(&forward, &index), retrieve(&backward, &index));
    assert_eq!(
        retrieve(&forward, &index),
        names(&["Angina", "Flu", "Food Poisoning", "Heart Attack", "Migraine"])
    );
}

#[test]
fn test_case_and_spacing_ignored() {
    let file = write_dataset(WIDER);
    let index = DatasetIndex::load(file.path()).unwrap();

    let expected = names(&["Angina", "Heart Attack"]);
    for variant in ["Chest Pain", "chest_pain", " chest pain ", "CHEST   PAIN"] {
        let selection = UserSelection::parse_list(variant);
        assert_eq!(retrieve(&selection, &index), expected, "variant {:?}", variant);
    }

    // Cell side: "Stomach  Pain" with a double space
    let stomach = UserSelection::parse_list("stomach pain");
    assert_eq!(retrieve(&stomach, &index), names(&["Food Poisoning"]));
}

#[test]
fn test_empty_selection_is_empty() {
    let file = write_dataset(WIDER);
    let index = DatasetIndex::load(file.path()).unwrap();

    assert!(retrieve(&UserSelection::new(), &index).is_empty());
    assert!(retrieve_indexed(&UserSelection::new(), &index).is_empty());
    assert!(retrieve(&UserSelection::parse_list(" , ;"), &index).is_empty());
}

#[test]
fn test_loading_twice_is_deterministic() {
    let file = write_dataset(WIDER);
    let first = DatasetIndex::load(file.path()).unwrap();
    let second = DatasetIndex::load(file.path()).unwrap();

    assert_eq!(first.display_symptoms(), second.display_symptoms());
    assert_eq!(first.conditions(), second.conditions());
    assert_eq!(first.records(), second.records());

    let selection = UserSelection::parse_list("fever, fatigue");
    assert_eq!(retrieve(&selection, &first), retrieve(&selection, &second));
}

#[test]
fn test_scan_and_reverse_index_agree() {
    let file = write_dataset(WIDER);
    let index = DatasetIndex::load(file.path()).unwrap();

    let symptoms = index.display_symptoms();
    for window in symptoms.windows(3) {
        let selection: UserSelection = window.iter().collect();
        assert_eq!(retrieve(&selection, &index), retrieve_indexed(&selection, &index));
    }

    let unknown = UserSelection::parse_list("itchy elbow");
    assert_eq!(retrieve(&unknown, &index), retrieve_indexed(&unknown, &index));
}

#[test]
fn test_missing_file_is_dataset_error() {
    let err = DatasetIndex::load("/nonexistent/symptoms.csv").unwrap_err();
    assert!(matches!(err, CheckerError::DatasetLoad { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_missing_condition_column_is_dataset_error() {
    let file = write_dataset("disease,Symptom_1\nFlu,fever\n");
    let err = DatasetIndex::load(file.path()).unwrap_err();
    assert!(matches!(err, CheckerError::DatasetLoad { .. }));
}
