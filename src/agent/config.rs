//! Per-team agent configuration.
//!
//! One JSON file per agent: model/prompt settings for the spymaster and
//! the guesser, plus the candidate-selection policy. Missing fields fall
//! back to the documented defaults.

use std::path::Path;

use serde::Deserialize;

use crate::evaluation::aggregate::AggregateMode;
use crate::llm::OutputMode;
use crate::{BenchError, Result};

/// How the spymaster produces its K candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// K independent single-candidate calls (more diverse)
    #[default]
    KCalls,
    /// One call returning a bounded candidate list
    OneCallList,
}

/// Spymaster model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SpymasterConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: String,
    pub prompt_id: String,
    #[serde(default = "default_spymaster_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub output_mode: OutputMode,
    #[serde(default = "default_candidates_per_turn")]
    pub candidates_per_turn: usize,
    #[serde(default)]
    pub generation_mode: GenerationMode,
}

/// Guesser model settings. Temperature defaults to 0.0 so the live guess
/// is deterministic and cache-eligible.
#[derive(Debug, Clone, Deserialize)]
pub struct GuesserConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: String,
    pub prompt_id: String,
    #[serde(default = "default_guesser_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default)]
    pub output_mode: OutputMode,
}

/// How candidate clues are evaluated and picked.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// G: guesser rollouts per candidate
    #[serde(default = "default_eval_samples")]
    pub eval_samples_per_candidate: usize,
    #[serde(default = "default_eval_temperature")]
    pub eval_temperature: f64,
    #[serde(default = "default_top_p")]
    pub eval_top_p: f64,
    #[serde(default)]
    pub aggregate: AggregateMode,
    #[serde(default = "default_lambda_std")]
    pub lambda_std: f64,
    /// Evaluate only the first N legal candidates when set
    #[serde(default)]
    pub max_eval_candidates: Option<usize>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            eval_samples_per_candidate: default_eval_samples(),
            eval_temperature: default_eval_temperature(),
            eval_top_p: default_top_p(),
            aggregate: AggregateMode::default(),
            lambda_std: default_lambda_std(),
            max_eval_candidates: None,
        }
    }
}

/// One team's full configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub spymaster: SpymasterConfig,
    pub guesser: GuesserConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Load an agent configuration from a JSON file.
pub fn load_agent_config<P: AsRef<Path>>(path: P) -> Result<AgentConfig> {
    let text = std::fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&text).map_err(|e| {
        BenchError::Config(format!(
            "bad agent config {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

fn default_provider() -> String {
    "openai_responses".to_string()
}

fn default_spymaster_temperature() -> f64 {
    0.8
}

fn default_guesser_temperature() -> f64 {
    0.0
}

fn default_top_p() -> f64 {
    1.0
}

fn default_max_output_tokens() -> u32 {
    256
}

fn default_candidates_per_turn() -> usize {
    8
}

fn default_eval_samples() -> usize {
    2
}

fn default_eval_temperature() -> f64 {
    0.3
}

fn default_lambda_std() -> f64 {
    0.7
}
