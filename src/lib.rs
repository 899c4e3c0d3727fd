//! # Codenames LLM Benchmark Library
//!
//! A benchmarking harness for two-agent Codenames play where both the
//! spymaster and the guesser of each team are language models.
//!
//! ## Features
//!
//! - **Rules Engine**: Deterministic board state, turn application and
//!   win/loss detection
//! - **Turn Engine**: Candidate clue generation, legality filtering,
//!   guesser rollouts on state copies and risk-aware clue selection
//! - **LLM Client**: Structured-JSON calls against the OpenAI Responses
//!   API with retry, backoff and a deterministic-call cache
//! - **Match Runner**: Full games with mirror matches, emitted as
//!   newline-delimited JSON records
//!
//! ## Usage
//!
//! ```rust,no_run
//! use codenames_bench::{
//!     game::board::read_boards_jsonl,
//!     llm::client::{ClientConfig, OpenAiResponsesClient},
//!     runner::match_runner::{run_match, MatchOptions},
//! };
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Core game logic: boards, state, rules, board generation
pub mod game;

/// Clue legality checks
pub mod legality;

/// LLM client, response cache and output schemas
pub mod llm;

/// Agent configuration, prompts and the turn engine
pub mod agent;

/// Utility scoring and rollout aggregation
pub mod evaluation;

/// Game and match runners, result records and analysis
pub mod runner;

/// Logging setup for the binaries
pub mod logging;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the benchmark library
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("model refusal: {0}")]
    Refusal(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("wordlist error: {0}")]
    Wordlist(String),

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BenchError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
