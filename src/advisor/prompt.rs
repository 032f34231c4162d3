//! Prompt construction for the suggestion model

use crate::retrieval::UserSelection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Lowest accepted patient age
pub const MIN_AGE: u8 = 1;

/// Highest accepted patient age
pub const MAX_AGE: u8 = 120;

/// System instruction sent with every request
pub const SYSTEM_PROMPT: &str = r#"You are a health assistant.
STRICT RULES:
- DO NOT diagnose diseases
- DO NOT suggest medicines
- Output ONLY valid JSON
JSON FORMAT:
{
  "possible_conditions": ["Condition1"],
  "next_steps": "General health guidance",
  "disclaimer": "This is not medical advice"
}"#;

/// Patient gender as offered by the profile form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{}' (expected male, female or other)", other)),
        }
    }
}

/// Profile fields forwarded to the model; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub history: String,
}

impl Default for PatientProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: MIN_AGE,
            gender: Gender::default(),
            history: String::new(),
        }
    }
}

impl PatientProfile {
    /// Parse and range-check an age value
    pub fn parse_age(value: &str) -> Result<u8, String> {
        let age: u8 = value
            .trim()
            .parse()
            .map_err(|_| format!("age must be a number between {} and {}", MIN_AGE, MAX_AGE))?;
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(format!("age must be between {} and {}", MIN_AGE, MAX_AGE));
        }
        Ok(age)
    }

    /// Set one field by name (`name`, `age`, `gender`, `history`)
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field.trim().to_lowercase().as_str() {
            "name" => self.name = value.trim().to_string(),
            "age" => self.age = Self::parse_age(value)?,
            "gender" | "sex" => self.gender = value.parse()?,
            "history" | "medical_history" => self.history = value.trim().to_string(),
            other => return Err(format!("unknown profile field '{}'", other)),
        }
        Ok(())
    }
}

/// Build the user turn from the profile, selection and retrieved candidates
pub fn build_user_prompt(
    profile: &PatientProfile,
    selection: &UserSelection,
    retrieved: &BTreeSet<String>,
) -> String {
    let symptoms = selection.display_names().join(", ");
    let conditions = retrieved.iter().map(String::as_str).collect::<Vec<_>>().join(", ");

    format!(
        "Patient: {}, Age: {}, Gender: {}\nMedical History: {}\nSymptoms: {}\nPossible dataset conditions: {}\n",
        profile.name, profile.age, profile.gender, profile.history, symptoms, conditions
    )
}
