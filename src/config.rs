use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use crate::dataset::Columns;
use crate::errors::TaggerError;

/// Environment variable holding the API key. May also come from `.env`.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

#[derive(Parser, Debug)]
#[command(
    name = "ticket-tagger",
    version,
    about = "Zero-shot vs few-shot LLM tagging of support tickets"
)]
pub struct Cli {
    /// CSV file of support tickets
    #[arg(long, default_value = "/content/support_tickets.csv")]
    pub dataset: PathBuf,

    /// Column holding the free-text ticket description
    #[arg(long, default_value = "Ticket Description")]
    pub description_column: String,

    /// Column holding the true category
    #[arg(long, default_value = "Ticket Type")]
    pub label_column: String,

    /// Number of tickets to evaluate
    #[arg(long, default_value_t = 25)]
    pub sample_size: usize,

    /// Seed for the sample draw
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Worked examples per tag in the few-shot prompt
    #[arg(long, default_value_t = 5)]
    pub examples_per_tag: usize,

    /// Model identifier sent to the completion endpoint
    #[arg(long, default_value = "llama-3.1-8b-instant")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, default_value = "https://api.groq.com/openai/v1")]
    pub api_base: String,

    /// Zero-shot evaluation table
    #[arg(long, default_value = "classified_tickets_eval_zshot.csv")]
    pub zero_shot_output: PathBuf,

    /// Few-shot evaluation table
    #[arg(long, default_value = "classified_tickets_few_shot_eval.csv")]
    pub few_shot_output: PathBuf,

    /// Hide the per-ticket progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.sample_size > 0, "--sample-size must be positive");
        ensure!(self.examples_per_tag > 0, "--examples-per-tag must be positive");
        ensure!(
            !self.description_column.is_empty() && !self.label_column.is_empty(),
            "column names must not be empty"
        );
        Ok(())
    }

    pub fn settings(&self) -> RunSettings {
        RunSettings {
            dataset: self.dataset.clone(),
            description_column: self.description_column.clone(),
            label_column: self.label_column.clone(),
            sample_size: self.sample_size,
            seed: self.seed,
            examples_per_tag: self.examples_per_tag,
            zero_shot_output: self.zero_shot_output.clone(),
            few_shot_output: self.few_shot_output.clone(),
            show_progress: !self.no_progress,
        }
    }
}

/// Everything the pipeline needs besides the classifier.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub dataset: PathBuf,
    pub description_column: String,
    pub label_column: String,
    pub sample_size: usize,
    pub seed: u64,
    pub examples_per_tag: usize,
    pub zero_shot_output: PathBuf,
    pub few_shot_output: PathBuf,
    pub show_progress: bool,
}

impl RunSettings {
    pub fn columns(&self) -> Columns<'_> {
        Columns {
            description: &self.description_column,
            label: &self.label_column,
        }
    }
}

/// Resolve the API key from an already-read environment value.
pub fn api_key_from(value: Option<String>) -> Result<String, TaggerError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        Some(_) => Err(TaggerError::Configuration(format!("{API_KEY_VAR} is empty"))),
        None => Err(TaggerError::Configuration(format!(
            "{API_KEY_VAR} is not set (export it or add it to .env)"
        ))),
    }
}

/// Read the API key from the process environment.
pub fn api_key() -> Result<String, TaggerError> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}
