//! Summarises a match results file.
//!
//! Usage: cargo run --release --bin analyze_results -- --results results.jsonl

use clap::Parser;

use codenames_bench::runner::summary::{analyze_results, print_summary};

#[derive(Parser)]
#[command(name = "analyze_results", about = "Summarise a results JSONL file")]
struct Args {
    /// Results JSONL produced by run_match
    #[arg(long)]
    results: String,
}

fn main() -> codenames_bench::Result<()> {
    let args = Args::parse();
    let summary = analyze_results(&args.results)?;
    print_summary(&summary);
    Ok(())
}
