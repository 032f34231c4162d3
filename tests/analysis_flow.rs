//! End-to-end analysis with scripted models
//!
//! Runs without network access; the model is a fake behind `SuggestionModel`.

use async_trait::async_trait;
use std::sync::Mutex;
use symptomcheck::{
    advisor::{Gender, PatientProfile, SuggestionModel},
    analyze,
    config::ApiKey,
    repl::{DisplayManager, ReplSession, Theme},
    CheckerError, DatasetIndex, ModelResponseError, UserSelection,
};

const DATASET: &str = "\
condition,Symptom_1,Symptom_2,Symptom_3
Flu,fever,cough,
Cold,runny nose,cough,nan
";

/// Replies with a fixed result and remembers the prompts it saw
struct ScriptedModel {
    reply: Result<String, ModelResponseError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: ModelResponseError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl SuggestionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<String, ModelResponseError> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.reply.clone()
    }
}

fn index() -> DatasetIndex {
    DatasetIndex::from_reader(DATASET.as_bytes()).unwrap()
}

fn patient() -> PatientProfile {
    PatientProfile {
        name: "Ada".to_string(),
        age: 36,
        gender: Gender::Female,
        history: "asthma".to_string(),
    }
}

#[tokio::test]
async fn test_model_answer_is_used() {
    let model = ScriptedModel::replying(
        "Here you go:\n```json\n{\"possible_conditions\": [\"Influenza\", \"Common cold\"], \
         \"next_steps\": \"Rest and drink fluids.\", \"disclaimer\": \"Not a diagnosis.\"}\n```",
    );
    let selection = UserSelection::parse_list("cough");

    let analysis = analyze(&index(), &model, &patient(), &selection).await.unwrap();

    assert!(!analysis.outcome.is_fallback());
    assert_eq!(
        analysis.suggestion().possible_conditions,
        vec!["Influenza".to_string(), "Common cold".to_string()]
    );
    assert_eq!(analysis.suggestion().next_steps, "Rest and drink fluids.");
    assert_eq!(analysis.symptoms, vec!["cough".to_string()]);
    assert_eq!(analysis.retrieved.len(), 2);
}

#[tokio::test]
async fn test_prompt_carries_profile_and_candidates() {
    let model = ScriptedModel::replying("no json here");
    let selection = UserSelection::parse_list("fever, cough");

    analyze(&index(), &model, &patient(), &selection).await.unwrap();

    let prompt = model.last_prompt().unwrap();
    assert!(prompt.contains("Patient: Ada, Age: 36, Gender: Female"));
    assert!(prompt.contains("Medical History: asthma"));
    assert!(prompt.contains("Symptoms: cough, fever"));
    assert!(prompt.contains("Possible dataset conditions: Cold, Flu"));
}

#[tokio::test]
async fn test_unparseable_reply_falls_back_to_dataset() {
    let model = ScriptedModel::replying("I think it might be the flu.");
    let selection = UserSelection::parse_list("fever");

    let analysis = analyze(&index(), &model, &patient(), &selection).await.unwrap();

    assert!(analysis.outcome.is_fallback());
    assert_eq!(
        analysis.outcome.fallback_reason(),
        Some(&ModelResponseError::NoJsonObject)
    );
    let suggestion = analysis.suggestion();
    assert_eq!(suggestion.possible_conditions, vec!["Flu".to_string()]);
    assert_eq!(suggestion.next_steps, "Consult a healthcare professional.");
    assert_eq!(suggestion.disclaimer, "This is not medical advice");
}

#[tokio::test]
async fn test_transport_failure_with_no_match_reports_unknown() {
    let model = ScriptedModel::failing(ModelResponseError::Timeout);
    let selection = UserSelection::parse_list("headache");

    let analysis = analyze(&index(), &model, &patient(), &selection).await.unwrap();

    assert!(analysis.retrieved.is_empty());
    assert_eq!(
        analysis.suggestion().possible_conditions,
        vec!["Unknown".to_string()]
    );
    assert!(matches!(
        analysis.outcome.clone().into_result(),
        Err(CheckerError::ModelResponse(ModelResponseError::Timeout))
    ));
}

#[tokio::test]
async fn test_empty_selection_never_calls_model() {
    let model = ScriptedModel::replying("{}");

    let err = analyze(&index(), &model, &patient(), &UserSelection::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckerError::NoSelection));
    assert!(!err.is_fatal());
    assert_eq!(model.calls(), 0);
}

#[test]
fn test_analysis_serializes_with_source_tag() {
    let model = ScriptedModel::replying("not json");
    let selection = UserSelection::parse_list("cough");

    let analysis =
        tokio_test::block_on(analyze(&index(), &model, &patient(), &selection)).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["outcome"]["source"], "fallback");
    assert_eq!(json["outcome"]["suggestion"]["possible_conditions"][0], "Cold");
    assert_eq!(json["symptoms"][0], "cough");
    assert!(json["outcome"]["reason"].is_string());
}

#[tokio::test]
async fn test_repl_select_then_analyze() {
    let index = index();
    let model = ScriptedModel::replying("not json");
    let display = DisplayManager::new(Theme::Dark).with_progress(false);
    let mut session = ReplSession::new(display).unwrap();

    session.handle_input("/select fever, Runny Nose", &index).unwrap();
    session.handle_input("/profile age=40", &index).unwrap();
    assert_eq!(session.state().selection().len(), 2);
    assert_eq!(session.state().profile.age, 40);

    session.run_analysis(&index, &model).await.unwrap();

    let analysis = session.state().last_analysis().unwrap();
    assert_eq!(
        analysis.suggestion().possible_conditions,
        vec!["Cold".to_string(), "Flu".to_string()]
    );
    assert_eq!(session.state().analyses_run(), 1);
}

#[test]
fn test_missing_credential_is_config_error() {
    let err = ApiKey::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, CheckerError::Config(_)));
    assert!(err.is_fatal());

    let blank = ApiKey::from_lookup(|_| Some("   ".to_string())).unwrap_err();
    assert!(matches!(blank, CheckerError::Config(_)));
}
