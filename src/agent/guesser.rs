//! Guesser stage: one structured call against the current board.
//!
//! The response schema is rebuilt per call so its word enum matches the
//! unrevealed words exactly; the parsed output is then sanitized before it
//! ever reaches the rules engine.

use serde_json::Value;

use crate::agent::config::GuesserConfig;
use crate::agent::prompts::guesser_messages;
use crate::game::state::GameState;
use crate::llm::client::{LlmRequest, OpenAiResponsesClient};
use crate::llm::schema::guesser_schema;
use crate::Result;

/// Sanitized guesses with the confidences as parsed (clamped to [0, 1]).
#[derive(Debug, Clone)]
pub struct GuessSet {
    pub guesses: Vec<String>,
    pub confidences: Vec<f64>,
}

/// Pull `(word, confidence)` pairs out of a parsed guesser payload,
/// trimming and uppercasing words, dropping empties, clamping confidences.
pub fn parse_guesser_output(parsed: &Value) -> (Vec<String>, Vec<f64>) {
    let mut guesses = Vec::new();
    let mut confidences = Vec::new();

    if let Some(items) = parsed.get("guesses").and_then(Value::as_array) {
        for item in items {
            if !item.is_object() {
                continue;
            }
            let word = item
                .get("word")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_uppercase();
            if word.is_empty() {
                continue;
            }
            let confidence = item
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(0.5)
                .clamp(0.0, 1.0);
            guesses.push(word);
            confidences.push(confidence);
        }
    }

    (guesses, confidences)
}

/// Drop duplicates preserving order, truncate to `max_allowed`.
pub fn sanitize_guesses(guesses: &[String], max_allowed: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for g in guesses {
        let gg = g.trim().to_uppercase();
        if gg.is_empty() || !seen.insert(gg.clone()) {
            continue;
        }
        out.push(gg);
        if out.len() >= max_allowed {
            break;
        }
    }
    out
}

/// Issue one guesser call at the given sampling settings and return the
/// sanitized guess list.
pub async fn run_guesser(
    cfg: &GuesserConfig,
    client: &OpenAiResponsesClient,
    state: &GameState,
    clue: &str,
    number: u32,
    temperature: f64,
    top_p: f64,
) -> Result<GuessSet> {
    let unrevealed = state.unrevealed_words();
    let max_allowed = (number as usize + 1).min(unrevealed.len());
    let max_schema_guesses = max_allowed.min(10);

    let req = LlmRequest {
        model: cfg.model.clone(),
        input: guesser_messages(&cfg.prompt_id, state, clue, number, max_allowed as u32)?,
        schema_name: "guesser_output".to_string(),
        schema: guesser_schema(&unrevealed, max_schema_guesses),
        temperature,
        top_p,
        max_output_tokens: cfg.max_output_tokens,
        mode: cfg.output_mode,
        cache_deterministic_only: true,
    };

    let resp = client.create_json(&req).await?;
    let (raw_guesses, confidences) = parse_guesser_output(&resp.parsed);
    let guesses = sanitize_guesses(&raw_guesses, max_allowed);

    Ok(GuessSet {
        guesses,
        confidences,
    })
}
