//! Spymaster stage: candidate clue generation.
//!
//! Two modes: `k_calls` issues K independent single-candidate calls (call
//! failures become rejection entries, never abort the batch) and
//! `one_call_list` asks for one bounded candidate list. The raw parsed
//! JSON of every proposal is kept for the turn log.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::agent::config::{GenerationMode, SpymasterConfig};
use crate::agent::prompts::spymaster_messages;
use crate::game::state::GameState;
use crate::game::types::Team;
use crate::llm::client::{LlmRequest, OpenAiResponsesClient};
use crate::llm::schema::{spymaster_list_schema, spymaster_single_schema};
use crate::Result;

/// A clue proposal before evaluation. `number` stays unvalidated until the
/// number-range filter; `raw` is the verbatim parsed model output.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub clue: String,
    pub number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_targets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl Candidate {
    /// Lenient extraction from one parsed proposal object.
    pub fn from_value(value: &Value) -> Self {
        let string_list = |v: &Value| -> Option<Vec<String>> {
            v.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(|s| s.as_str().map(String::from))
                    .collect()
            })
        };

        Self {
            clue: value
                .get("clue")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string(),
            number: value.get("number").and_then(Value::as_i64),
            intended_targets: value.get("intended_targets").and_then(|v| string_list(v)),
            danger_words: value.get("danger_words").and_then(|v| string_list(v)),
            raw: Some(value.clone()),
        }
    }

    /// Minimal candidate without model provenance (fallbacks, tests).
    pub fn bare(clue: &str, number: Option<i64>) -> Self {
        Self {
            clue: clue.to_string(),
            number,
            intended_targets: None,
            danger_words: None,
            raw: None,
        }
    }
}

/// One entry of the turn log's rejected-candidates list.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl RejectedCandidate {
    pub fn from_candidate(cand: Candidate, reason: String) -> Self {
        Self {
            clue: Some(cand.clue),
            number: cand.number,
            reason,
            error: None,
            raw: cand.raw,
        }
    }

    pub fn call_failure(reason: &str, error: String) -> Self {
        Self {
            clue: None,
            number: None,
            reason: reason.to_string(),
            error: Some(error),
            raw: None,
        }
    }
}

fn single_request(cfg: &SpymasterConfig, state: &GameState, team: Team) -> Result<LlmRequest> {
    Ok(LlmRequest {
        model: cfg.model.clone(),
        input: spymaster_messages(&cfg.prompt_id, state, team)?,
        schema_name: "spymaster_clue".to_string(),
        schema: spymaster_single_schema(),
        temperature: cfg.temperature,
        top_p: cfg.top_p,
        max_output_tokens: cfg.max_output_tokens,
        mode: cfg.output_mode,
        cache_deterministic_only: true,
    })
}

/// Generate up to K candidates. Call failures and unusable payloads are
/// returned as rejection entries alongside the parsed proposals.
pub async fn generate_candidates(
    cfg: &SpymasterConfig,
    client: &OpenAiResponsesClient,
    state: &GameState,
    team: Team,
) -> Result<(Vec<Candidate>, Vec<RejectedCandidate>)> {
    let k = cfg.candidates_per_turn.max(1);
    let mut candidates = Vec::new();
    let mut rejected = Vec::new();

    match cfg.generation_mode {
        GenerationMode::OneCallList => {
            let req = LlmRequest {
                schema_name: "spymaster_candidates".to_string(),
                schema: spymaster_list_schema(k),
                ..single_request(cfg, state, team)?
            };
            match client.create_json(&req).await {
                Ok(resp) => {
                    let items = resp
                        .parsed
                        .get("candidates")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();
                    for item in items {
                        if item.is_object() {
                            candidates.push(Candidate::from_value(&item));
                        } else {
                            rejected.push(RejectedCandidate {
                                clue: None,
                                number: None,
                                reason: "non_object_candidate".to_string(),
                                error: None,
                                raw: Some(item),
                            });
                        }
                    }
                }
                Err(e) => {
                    log::warn!("spymaster list call failed for {}: {}", team, e);
                    rejected.push(RejectedCandidate::call_failure(
                        "spymaster_call_failed",
                        e.to_string(),
                    ));
                }
            }
        }
        GenerationMode::KCalls => {
            let req = single_request(cfg, state, team)?;
            let calls = (0..k).map(|_| client.create_json(&req));
            for result in join_all(calls).await {
                match result {
                    Ok(resp) if resp.parsed.is_object() => {
                        candidates.push(Candidate::from_value(&resp.parsed));
                    }
                    Ok(resp) => rejected.push(RejectedCandidate {
                        clue: None,
                        number: None,
                        reason: "non_object_candidate".to_string(),
                        error: None,
                        raw: Some(resp.parsed),
                    }),
                    Err(e) => {
                        log::warn!("spymaster call failed for {}: {}", team, e);
                        rejected.push(RejectedCandidate::call_failure(
                            "spymaster_call_failed",
                            e.to_string(),
                        ));
                    }
                }
            }
        }
    }

    Ok((candidates, rejected))
}

/// Best-effort fallback when no candidate survives the filters: one
/// near-deterministic call, else the hardcoded safe clue.
pub async fn fallback_candidate(
    cfg: &SpymasterConfig,
    client: &OpenAiResponsesClient,
    state: &GameState,
    team: Team,
) -> Candidate {
    let request = single_request(cfg, state, team).map(|req| LlmRequest {
        temperature: cfg.temperature.min(0.2),
        top_p: 1.0,
        ..req
    });

    let attempt = match request {
        Ok(req) => client.create_json(&req).await,
        Err(e) => Err(e),
    };

    match attempt {
        Ok(resp) if resp.parsed.is_object() => {
            let mut cand = Candidate::from_value(&resp.parsed);
            if cand.clue.is_empty() {
                cand.clue = "MYSTERY".to_string();
            }
            cand.number = Some(cand.number.unwrap_or(1).clamp(1, 9));
            cand
        }
        Ok(_) | Err(_) => {
            log::warn!("fallback spymaster call failed for {}, using safe clue", team);
            Candidate {
                clue: "MYSTERY".to_string(),
                number: Some(1),
                intended_targets: None,
                danger_words: None,
                raw: Some(serde_json::json!({"fallback": true})),
            }
        }
    }
}
