//! OpenAI Responses API client.
//!
//! One logical call = structured-output request, retry with exponential
//! backoff on 429/5xx/transport errors, optional cache lookup for
//! deterministic calls, then JSON parsing of the first assistant
//! `output_text` payload (with a single salvage attempt on malformed
//! output). Refusals and schema-violating output are fatal to the call and
//! never retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::llm::cache::{cache_key, SqliteCache};
use crate::llm::{ChatMessage, OutputMode};
use crate::{BenchError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/responses";

/// Client tuning knobs. `max_in_flight` is the single bound shared by all
/// concurrent requests of a process: spymaster fan-out, evaluation
/// rollouts and the live guesser call all draw from the same pool.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retries: u32,
    pub initial_backoff: Duration,
    pub max_in_flight: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            retries: 5,
            initial_backoff: Duration::from_secs(1),
            max_in_flight: 8,
        }
    }
}

/// One structured-JSON call.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub input: Vec<ChatMessage>,
    pub schema_name: String,
    pub schema: Value,
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
    pub mode: OutputMode,
    /// When true (the default for rollouts), the cache is consulted only
    /// for deterministic calls (temperature 0, top_p 1.0).
    pub cache_deterministic_only: bool,
}

/// Parsed result of one call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub parsed: Value,
    pub raw: Value,
    pub output_text: String,
    pub usage: Value,
    pub response_id: Option<String>,
    pub model: Option<String>,
}

/// Shared client: reqwest connection pool, request semaphore and the
/// optional deterministic-call cache. Safe to clone-by-Arc across tasks.
pub struct OpenAiResponsesClient {
    api_key: String,
    config: ClientConfig,
    http: Client,
    cache: Option<SqliteCache>,
    semaphore: Arc<Semaphore>,
}

impl OpenAiResponsesClient {
    /// Build a client with the API key from `OPENAI_API_KEY`.
    pub fn new(config: ClientConfig, cache: Option<SqliteCache>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| BenchError::Config("OPENAI_API_KEY not set".to_string()))?;
        Self::with_api_key(api_key, config, cache)
    }

    /// Build a client with an explicit API key.
    pub fn with_api_key(
        api_key: impl Into<String>,
        config: ClientConfig,
        cache: Option<SqliteCache>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(BenchError::Config("empty API key".to_string()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BenchError::Config(format!("failed to build HTTP client: {}", e)))?;

        let semaphore = Arc::new(Semaphore::new(config.max_in_flight));
        Ok(Self {
            api_key,
            config,
            http,
            cache,
            semaphore,
        })
    }

    /// Issue one structured-JSON call and parse the assistant output.
    pub async fn create_json(&self, req: &LlmRequest) -> Result<LlmResponse> {
        let payload = build_payload(req);

        let use_cache = self.cache.is_some()
            && (!req.cache_deterministic_only || is_deterministic(req));
        let key = if use_cache {
            Some(cache_key(&payload))
        } else {
            None
        };

        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key.as_deref()) {
            if let Some(cached) = cache.get(key)? {
                log::debug!("cache hit for {} ({})", req.schema_name, &key[..12]);
                return parse_response(cached);
            }
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| BenchError::Transport("request pool closed".to_string()))?;

        let data = self.post_with_retry(&payload).await?;

        if let (Some(cache), Some(key)) = (self.cache.as_ref(), key.as_deref()) {
            cache.set(key, &data)?;
        }

        parse_response(data)
    }

    /// POST the payload, retrying 429/5xx/transport errors with doubling
    /// backoff. Other HTTP errors are fatal without retry.
    async fn post_with_retry(&self, payload: &Value) -> Result<Value> {
        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..self.config.retries {
            let sent = self
                .http
                .post(&self.config.base_url)
                .bearer_auth(&self.api_key)
                .json(payload)
                .send()
                .await;

            match sent {
                Ok(resp) => {
                    let status = resp.status();
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = format!("HTTP {}", status);
                        log::warn!(
                            "retryable response {} (attempt {}/{}), backing off {:?}",
                            status,
                            attempt + 1,
                            self.config.retries,
                            backoff
                        );
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                        continue;
                    }
                    if !status.is_success() {
                        let body = resp.text().await.unwrap_or_default();
                        return Err(BenchError::Protocol(format!("HTTP {}: {}", status, body)));
                    }
                    return resp
                        .json::<Value>()
                        .await
                        .map_err(|e| BenchError::Protocol(format!("non-JSON body: {}", e)));
                }
                Err(e) => {
                    last_err = e.to_string();
                    log::warn!(
                        "transport error (attempt {}/{}): {}, backing off {:?}",
                        attempt + 1,
                        self.config.retries,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }

        Err(BenchError::Transport(format!(
            "request failed after {} retries: {}",
            self.config.retries, last_err
        )))
    }
}

fn is_deterministic(req: &LlmRequest) -> bool {
    req.temperature == 0.0 && req.top_p == 1.0
}

/// Assemble the Responses API payload. Field values are everything that
/// identifies the call, so this is also the cache-key input.
fn build_payload(req: &LlmRequest) -> Value {
    let mut format = json!({ "type": req.mode.as_str() });
    if req.mode == OutputMode::JsonSchema {
        format["name"] = json!(&req.schema_name);
        format["schema"] = req.schema.clone();
        format["strict"] = json!(true);
    }

    json!({
        "model": &req.model,
        "input": &req.input,
        "temperature": req.temperature,
        "top_p": req.top_p,
        "max_output_tokens": req.max_output_tokens,
        "store": false,
        "text": { "format": format },
    })
}

/// Extract the first assistant `output_text` from a raw response.
/// A refusal content part is fatal.
fn extract_output_text(data: &Value) -> Result<String> {
    if let Some(items) = data.get("output").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_str) == Some("message")
                && item.get("role").and_then(Value::as_str) == Some("assistant")
            {
                if let Some(parts) = item.get("content").and_then(Value::as_array) {
                    for part in parts {
                        match part.get("type").and_then(Value::as_str) {
                            Some("output_text") => {
                                return Ok(part
                                    .get("text")
                                    .and_then(Value::as_str)
                                    .unwrap_or_default()
                                    .to_string());
                            }
                            Some("refusal") => {
                                return Err(BenchError::Refusal(
                                    part.get("refusal")
                                        .and_then(Value::as_str)
                                        .unwrap_or_default()
                                        .to_string(),
                                ));
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    // Some payload shapes put the helper field at the top level
    if let Some(text) = data.get("output_text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }

    Err(BenchError::Protocol(
        "no output_text found in response JSON".to_string(),
    ))
}

/// Best-effort recovery when the model wrapped its JSON in extra text:
/// parse the largest `{...}` substring, exactly once.
fn salvage_json(text: &str) -> Result<Value> {
    let start = text.find('{');
    let end = text.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if end > start {
            return serde_json::from_str(&text[start..=end])
                .map_err(|e| BenchError::Protocol(format!("salvage parse failed: {}", e)));
        }
    }
    Err(BenchError::Protocol(format!(
        "no JSON object in output: {}",
        text
    )))
}

fn parse_response(data: Value) -> Result<LlmResponse> {
    let output_text = extract_output_text(&data)?;
    let parsed = match serde_json::from_str::<Value>(&output_text) {
        Ok(v) => v,
        Err(_) => salvage_json(&output_text)?,
    };

    let usage = data.get("usage").cloned().unwrap_or_else(|| json!({}));
    let response_id = data.get("id").and_then(Value::as_str).map(String::from);
    let model = data.get("model").and_then(Value::as_str).map(String::from);

    Ok(LlmResponse {
        parsed,
        raw: data,
        output_text,
        usage,
        response_id,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request(mode: OutputMode, temperature: f64, top_p: f64) -> LlmRequest {
        LlmRequest {
            model: "gpt-test".to_string(),
            input: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            schema_name: "test_schema".to_string(),
            schema: json!({"type": "object"}),
            temperature,
            top_p,
            max_output_tokens: 256,
            mode,
            cache_deterministic_only: true,
        }
    }

    fn response_with_text(text: &str) -> Value {
        json!({
            "id": "resp_123",
            "model": "gpt-test",
            "usage": {"total_tokens": 42},
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{"type": "output_text", "text": text}]
            }]
        })
    }

    #[test]
    fn test_payload_carries_schema_in_json_schema_mode() {
        let payload = build_payload(&request(OutputMode::JsonSchema, 0.0, 1.0));

        assert_eq!(payload["text"]["format"]["type"], "json_schema");
        assert_eq!(payload["text"]["format"]["name"], "test_schema");
        assert_eq!(payload["text"]["format"]["strict"], true);
        assert_eq!(payload["store"], false);
        assert_eq!(payload["input"][0]["role"], "system");
    }

    #[test]
    fn test_payload_omits_schema_in_json_object_mode() {
        let payload = build_payload(&request(OutputMode::JsonObject, 0.3, 1.0));

        assert_eq!(payload["text"]["format"]["type"], "json_object");
        assert!(payload["text"]["format"].get("schema").is_none());
    }

    #[test]
    fn test_deterministic_gate() {
        assert!(is_deterministic(&request(OutputMode::JsonSchema, 0.0, 1.0)));
        assert!(!is_deterministic(&request(OutputMode::JsonSchema, 0.3, 1.0)));
        assert!(!is_deterministic(&request(OutputMode::JsonSchema, 0.0, 0.9)));
    }

    #[test]
    fn test_parse_response_extracts_json() {
        let data = response_with_text("{\"clue\": \"OCEAN\", \"number\": 2}");
        let resp = parse_response(data).unwrap();

        assert_eq!(resp.parsed["clue"], "OCEAN");
        assert_eq!(resp.response_id.as_deref(), Some("resp_123"));
        assert_eq!(resp.model.as_deref(), Some("gpt-test"));
        assert_eq!(resp.usage["total_tokens"], 42);
    }

    #[test]
    fn test_parse_response_salvages_wrapped_json() {
        let data = response_with_text("Here you go: {\"clue\": \"OCEAN\"} hope that helps");
        let resp = parse_response(data).unwrap();
        assert_eq!(resp.parsed["clue"], "OCEAN");
    }

    #[test]
    fn test_unsalvageable_output_is_protocol_error() {
        let data = response_with_text("no json here at all");
        assert_matches!(parse_response(data), Err(BenchError::Protocol(_)));
    }

    #[test]
    fn test_refusal_is_fatal() {
        let data = json!({
            "output": [{
                "type": "message",
                "role": "assistant",
                "content": [{"type": "refusal", "refusal": "I cannot help with that."}]
            }]
        });
        assert_matches!(parse_response(data), Err(BenchError::Refusal(_)));
    }

    #[test]
    fn test_missing_output_is_protocol_error() {
        assert_matches!(
            parse_response(json!({"output": []})),
            Err(BenchError::Protocol(_))
        );
    }

    #[test]
    fn test_top_level_output_text_fallback() {
        let data = json!({"output_text": "{\"guesses\": []}"});
        let resp = parse_response(data).unwrap();
        assert_eq!(resp.parsed["guesses"], json!([]));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        match OpenAiResponsesClient::with_api_key("", ClientConfig::default(), None) {
            Err(BenchError::Config(_)) => {}
            Err(other) => panic!("expected config error, got {}", other),
            Ok(_) => panic!("expected config error"),
        }
    }

    #[tokio::test]
    async fn test_deterministic_call_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SqliteCache::open(dir.path().join("cache.sqlite")).unwrap();

        let req = request(OutputMode::JsonSchema, 0.0, 1.0);
        let key = cache_key(&build_payload(&req));
        cache
            .set(&key, &response_with_text("{\"clue\": \"OCEAN\", \"number\": 2}"))
            .unwrap();

        // Unreachable base URL: any network attempt would fail fast
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/responses".to_string(),
            retries: 1,
            initial_backoff: std::time::Duration::from_millis(1),
            ..ClientConfig::default()
        };
        let client =
            OpenAiResponsesClient::with_api_key("test-key", config, Some(cache)).unwrap();

        let first = client.create_json(&req).await.unwrap();
        let second = client.create_json(&req).await.unwrap();
        assert_eq!(first.parsed["clue"], "OCEAN");
        assert_eq!(first.parsed, second.parsed);
    }

    #[tokio::test]
    async fn test_nondeterministic_call_skips_cache_and_surfaces_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SqliteCache::open(dir.path().join("cache.sqlite")).unwrap();

        // Same payload cached, but the call is stochastic so the cache is
        // bypassed and the dead endpoint shows through
        let req = request(OutputMode::JsonSchema, 0.3, 1.0);
        let key = cache_key(&build_payload(&req));
        cache
            .set(&key, &response_with_text("{\"clue\": \"OCEAN\"}"))
            .unwrap();

        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/responses".to_string(),
            retries: 1,
            initial_backoff: std::time::Duration::from_millis(1),
            ..ClientConfig::default()
        };
        let client =
            OpenAiResponsesClient::with_api_key("test-key", config, Some(cache)).unwrap();

        match client.create_json(&req).await {
            Err(BenchError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|r| r.parsed)),
        }
    }
}
