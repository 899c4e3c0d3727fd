//! Plays a full match between two LLM agent configurations.
//!
//! Reads a boards JSONL file and two agent config JSON files, plays every
//! board (optionally mirrored with swapped colours) and writes one JSON
//! record per game. Requires OPENAI_API_KEY.
//!
//! Usage: cargo run --release --bin run_match -- \
//!            --boards boards.jsonl --red red.json --blue blue.json --out results.jsonl

use std::sync::Arc;

use clap::Parser;

use codenames_bench::agent::config::load_agent_config;
use codenames_bench::game::board::read_boards_jsonl;
use codenames_bench::llm::cache::SqliteCache;
use codenames_bench::llm::client::{ClientConfig, OpenAiResponsesClient};
use codenames_bench::logging::setup_logging;
use codenames_bench::runner::match_runner::{run_match, MatchOptions};

#[derive(Parser)]
#[command(name = "run_match", about = "Run a benchmark match between two agents")]
struct Args {
    /// Boards JSONL file
    #[arg(long)]
    boards: String,

    /// Agent config JSON for the RED team
    #[arg(long)]
    red: String,

    /// Agent config JSON for the BLUE team
    #[arg(long)]
    blue: String,

    /// Output JSONL results file
    #[arg(long)]
    out: String,

    /// Games per board per orientation
    #[arg(long, default_value_t = 1)]
    replicates: usize,

    /// Also play a swapped-colour mirror game per board
    #[arg(long, default_value_t = false)]
    mirror: bool,

    /// Per-game turn budget
    #[arg(long, default_value_t = 100)]
    max_turns: usize,

    /// Optional SQLite cache path (hits only for deterministic calls)
    #[arg(long)]
    cache: Option<String>,

    /// Maximum concurrent LLM requests
    #[arg(long, default_value_t = 8)]
    max_in_flight: usize,
}

#[tokio::main]
async fn main() -> codenames_bench::Result<()> {
    setup_logging();
    let args = Args::parse();

    let boards = read_boards_jsonl(&args.boards)?;
    let red_cfg = load_agent_config(&args.red)?;
    let blue_cfg = load_agent_config(&args.blue)?;

    let cache = match &args.cache {
        Some(path) => Some(SqliteCache::open(path)?),
        None => None,
    };
    let client_config = ClientConfig {
        max_in_flight: args.max_in_flight,
        ..ClientConfig::default()
    };
    let client = Arc::new(OpenAiResponsesClient::new(client_config, cache)?);

    let options = MatchOptions {
        replicates: args.replicates,
        mirror: args.mirror,
        max_turns: args.max_turns,
    };
    run_match(&boards, &red_cfg, &blue_cfg, client, &args.out, &options).await?;

    println!("Done. Results written to {}", args.out);
    Ok(())
}
