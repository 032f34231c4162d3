//! Doctor command for startup diagnostics
//!
//! Checks the dataset, the configuration, the API credential and whether the
//! model endpoint accepts that credential.

use crate::advisor::GeminiClient;
use crate::config::{ApiKey, Config};
use crate::dataset::{DatasetIndex, SymptomColumnRule};
use crate::errors::Result;
use colored::*;
use std::path::PathBuf;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    /// Loaded config, or built-in defaults when loading failed
    config: Config,
    config_error: Option<String>,
    dataset_path: PathBuf,
    api_key: std::result::Result<ApiKey, String>,
}

impl Doctor {
    /// Takes the config and credential as loaded, failures included, so they
    /// can be reported as checks. The remaining checks run against defaults
    /// when the config could not be loaded.
    pub fn new(
        config: Result<Config>,
        dataset_override: Option<PathBuf>,
        api_key: Result<ApiKey>,
    ) -> Self {
        let (config, config_error) = match config {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e.to_string())),
        };
        let dataset_path = dataset_override.unwrap_or_else(|| config.dataset.path.clone());

        Self {
            config,
            config_error,
            dataset_path,
            api_key: api_key.map_err(|e| e.to_string()),
        }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        vec![
            self.check_config(),
            self.check_dataset(),
            self.check_credential(),
            self.check_model_endpoint().await,
        ]
    }

    fn check_config(&self) -> HealthCheck {
        if let Some(error) = &self.config_error {
            return HealthCheck::new("Configuration", HealthStatus::Fail(error.clone()));
        }
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Configuration", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Configuration", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_dataset(&self) -> HealthCheck {
        let rule = SymptomColumnRule::with_prefix(&self.config.dataset.symptom_prefix);
        match DatasetIndex::load_with_rule(&self.dataset_path, &rule) {
            Ok(index) if index.is_empty() => {
                HealthCheck::new("Dataset", HealthStatus::Warn("dataset has no usable rows".to_string()))
            }
            Ok(index) => {
                let odd: Vec<&String> = index
                    .symptom_columns()
                    .iter()
                    .filter(|h| !rule.is_conventional(h))
                    .collect();
                if odd.is_empty() {
                    HealthCheck::new("Dataset", HealthStatus::Pass)
                } else {
                    HealthCheck::new(
                        "Dataset",
                        HealthStatus::Warn(format!(
                            "columns treated as symptoms by prefix only: {}",
                            odd.iter().map(|h| h.as_str()).collect::<Vec<_>>().join(", ")
                        )),
                    )
                }
            }
            Err(e) => HealthCheck::new("Dataset", HealthStatus::Fail(e.to_string())),
        }
    }

    fn check_credential(&self) -> HealthCheck {
        match &self.api_key {
            Ok(_) => HealthCheck::new("API Key", HealthStatus::Pass),
            Err(e) => HealthCheck::new("API Key", HealthStatus::Fail(e.clone())),
        }
    }

    async fn check_model_endpoint(&self) -> HealthCheck {
        let Ok(key) = &self.api_key else {
            return HealthCheck::new(
                "Model Endpoint",
                HealthStatus::Warn("skipped: no API key".to_string()),
            );
        };

        let client = match GeminiClient::new(&self.config.model, key.clone()) {
            Ok(client) => client,
            Err(e) => return HealthCheck::new("Model Endpoint", HealthStatus::Fail(e.to_string())),
        };

        match client.probe().await {
            Ok(()) => HealthCheck::new("Model Endpoint", HealthStatus::Pass),
            Err(e) => HealthCheck::new(
                "Model Endpoint",
                HealthStatus::Warn(format!("{} (analysis will use the dataset fallback)", e)),
            ),
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "SymptomCheck Diagnostics".bold().cyan());
        println!("{:<20} {}", "Check", "Status");
        println!("{}", "=".repeat(50));

        for check in checks {
            let message = match &check.status {
                HealthStatus::Pass => "PASS".green().to_string(),
                HealthStatus::Warn(msg) => format!("WARN: {}", msg).yellow().to_string(),
                HealthStatus::Fail(msg) => format!("FAIL: {}", msg).red().to_string(),
            };
            println!("{:<20} {}", check.name, message);
        }
        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CheckerError;
    use std::io::Write;

    fn dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_diagnostics_without_key() {
        let file = dataset("condition,Symptom_1\nFlu,fever\n");
        let doctor = Doctor::new(
            Ok(Config::default()),
            Some(file.path().to_path_buf()),
            Err(CheckerError::Config("GOOGLE_API_KEY not found".to_string())),
        );

        let checks = doctor.run_diagnostics().await;
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[0].status, HealthStatus::Pass);
        assert_eq!(checks[1].status, HealthStatus::Pass);
        assert!(matches!(checks[2].status, HealthStatus::Fail(_)));
        assert!(matches!(checks[3].status, HealthStatus::Warn(_)));
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_dataset_prefix_warning() {
        let file = dataset("condition,Symptom_1,symptom_notes\nFlu,fever,seasonal\n");
        let doctor = Doctor::new(Ok(Config::default()), Some(file.path().to_path_buf()), ApiKey::new("k"));
        assert!(matches!(doctor.check_dataset().status, HealthStatus::Warn(_)));
    }

    #[test]
    fn test_dataset_missing() {
        let doctor = Doctor::new(
            Ok(Config::default()),
            Some(PathBuf::from("/nonexistent/dataset.csv")),
            ApiKey::new("k"),
        );
        assert!(matches!(doctor.check_dataset().status, HealthStatus::Fail(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_reported_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("bad.toml");
        std::fs::write(&config_path, "[model]\ntimeout_secs = 0\n").unwrap();
        let file = dataset("condition,Symptom_1\nFlu,fever\n");

        let doctor = Doctor::new(
            Config::load(Some(config_path.as_path())),
            Some(file.path().to_path_buf()),
            Err(CheckerError::Config("GOOGLE_API_KEY not found".to_string())),
        );
        let checks = doctor.run_diagnostics().await;

        match &checks[0].status {
            HealthStatus::Fail(msg) => assert!(msg.contains("timeout_secs")),
            other => panic!("expected config failure, got {:?}", other),
        }
        assert_eq!(checks[1].status, HealthStatus::Pass);
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_dataset_path_from_config() {
        let file = dataset("condition,Symptom_1\nFlu,fever\n");
        let mut config = Config::default();
        config.dataset.path = file.path().to_path_buf();

        let doctor = Doctor::new(Ok(config), None, ApiKey::new("k"));
        assert_eq!(doctor.check_dataset().status, HealthStatus::Pass);
    }

    #[test]
    fn test_overall_status_pass_with_warnings() {
        let checks = vec![
            HealthCheck::new("A", HealthStatus::Pass),
            HealthCheck::new("B", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&checks));
    }
}
