//! SymptomCheck - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use symptomcheck::{
    advisor::{GeminiClient, PatientProfile},
    analyze,
    cli::{selection_from_args, Args, Commands, Verbosity},
    config::{ApiKey, Config},
    dataset::{humanize_token, SymptomColumnRule},
    doctor::Doctor,
    repl::{DisplayManager, ReplSession},
    retrieve, CheckerError, DatasetIndex, UserSelection,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.verbosity());

    let command = args.command();
    let loaded = Config::load(args.config.as_deref());

    // Doctor reports an unusable config as a failed check instead of stopping
    if command == Commands::Doctor {
        return run_doctor(loaded, args.dataset.clone()).await;
    }

    let config = loaded.unwrap_or_else(|e| fatal(e));
    let dataset_path = args
        .dataset
        .clone()
        .unwrap_or_else(|| config.dataset.path.clone());

    if command == Commands::Config {
        show_config(&config, &dataset_path);
        return Ok(());
    }

    // Missing credential is reported before dataset problems
    let api_key = if command.needs_model() {
        Some(ApiKey::from_env().unwrap_or_else(|e| {
            fatal_with_hint(e, "Set GOOGLE_API_KEY in the environment or a .env file.")
        }))
    } else {
        None
    };

    let rule = SymptomColumnRule::with_prefix(&config.dataset.symptom_prefix);
    let index = DatasetIndex::load_with_rule(&dataset_path, &rule).unwrap_or_else(|e| fatal(e));

    match (command, api_key) {
        (Commands::Symptoms { filter }, _) => list_symptoms(&index, filter.as_deref()),
        (Commands::Lookup { symptoms, json }, _) => lookup(&index, &symptoms, json)?,
        (Commands::Check { profile, symptoms, json }, Some(key)) => {
            let client = GeminiClient::new(&config.model, key)?;
            run_check(&index, &client, profile.into(), &symptoms, json, &config, args.verbosity()).await?;
        }
        (Commands::Start, Some(key)) => {
            let client = GeminiClient::new(&config.model, key)?;
            run_repl(&index, &client, &config, args.verbosity()).await?;
        }
        (command, _) => anyhow::bail!("{:?} has no API key to run with", command),
    }

    Ok(())
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Print a startup failure and stop
fn fatal(err: CheckerError) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err.to_string().red());
    std::process::exit(2);
}

fn fatal_with_hint(err: CheckerError, hint: &str) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err.to_string().red());
    eprintln!("\n{}", hint);
    std::process::exit(2);
}

/// Keep dataset symptoms, warn about the rest
fn known_selection(index: &DatasetIndex, values: &[String]) -> UserSelection {
    let requested = selection_from_args(values);
    let (known, unknown): (Vec<&str>, Vec<&str>) =
        requested.tokens().partition(|t| index.contains_symptom(t));

    if !unknown.is_empty() {
        let names: Vec<String> = unknown.into_iter().map(humanize_token).collect();
        eprintln!(
            "{} not in dataset, ignored: {}",
            "Warning:".yellow().bold(),
            names.join(", ")
        );
    }

    known.into_iter().collect()
}

fn list_symptoms(index: &DatasetIndex, filter: Option<&str>) {
    let needle = filter.map(|f| f.trim().to_lowercase().replace('_', " "));
    for symptom in index.display_symptoms() {
        if needle.as_deref().map_or(true, |n| symptom.contains(n)) {
            println!("{}", symptom);
        }
    }
}

fn lookup(index: &DatasetIndex, symptoms: &[String], json: bool) -> Result<()> {
    let selection = known_selection(index, symptoms);
    let conditions = retrieve(&selection, index);

    if json {
        let out = serde_json::json!({
            "symptoms": selection.display_names(),
            "conditions": conditions,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if conditions.is_empty() {
        println!("No matching conditions.");
    } else {
        for condition in conditions {
            println!("{}", condition);
        }
    }
    Ok(())
}

async fn run_check(
    index: &DatasetIndex,
    client: &GeminiClient,
    profile: PatientProfile,
    symptoms: &[String],
    json: bool,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let selection = known_selection(index, symptoms);

    let mut display = DisplayManager::new(config.display.theme)
        .with_progress(config.display.show_progress && verbosity.show_progress() && !json);
    display.set_verbose(verbosity.show_details());

    let spinner = display.start_analyzing();
    let result = analyze(index, client, &profile, &selection).await;
    spinner.finish_and_clear();

    match result {
        Ok(analysis) if json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        Ok(analysis) => display.show_analysis(&analysis),
        Err(CheckerError::NoSelection) => {
            display.show_warning(&CheckerError::NoSelection.to_string());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn run_repl(
    index: &DatasetIndex,
    client: &GeminiClient,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".symptomcheck_history");

    let mut display = DisplayManager::new(config.display.theme)
        .with_progress(config.display.show_progress && verbosity.show_progress());
    display.set_verbose(verbosity.show_details());

    let mut session = ReplSession::with_history(display, history_path)?;
    session.run(index, client).await
}

async fn run_doctor(config: symptomcheck::Result<Config>, dataset: Option<PathBuf>) -> Result<()> {
    let doctor = Doctor::new(config, dataset, ApiKey::from_env());
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn show_config(config: &Config, dataset_path: &Path) {
    println!("\n{}", "SymptomCheck Configuration".bold().cyan());
    println!("{}\n", "=".repeat(50).cyan());

    let source = Config::default_path()
        .filter(|p| p.exists())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!("Source: {}", source);
    println!();

    println!("Model:");
    println!("  Endpoint:    {}", config.model.base_url);
    println!("  Model:       {}", config.model.model);
    println!("  Temperature: {}", config.model.temperature);
    println!("  Timeout:     {}s", config.model.timeout_secs);
    println!(
        "  API key:     {}",
        match ApiKey::from_env() {
            Ok(key) => key.masked(),
            Err(_) => "not set".to_string(),
        }
    );
    println!();

    println!("Dataset:");
    println!("  Path:           {}", dataset_path.display());
    println!("  Symptom prefix: {}", config.dataset.symptom_prefix);
    println!();

    println!("Display:");
    println!("  Theme:    {}", config.display.theme);
    println!("  Progress: {}", if config.display.show_progress { "enabled" } else { "disabled" });
    println!();
}
