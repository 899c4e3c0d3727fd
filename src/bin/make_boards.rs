//! Board file generation for Codenames benchmark runs.
//!
//! Samples 25-word boards from a wordlist with a seeded RNG and writes
//! them as newline-delimited JSON.
//!
//! Usage: cargo run --release --bin make_boards -- --wordlist words.txt --out boards.jsonl

use clap::Parser;

use codenames_bench::game::board::write_boards_jsonl;
use codenames_bench::game::generator::generate_boards;
use codenames_bench::game::wordlist::load_wordlist;
use codenames_bench::logging::setup_logging;

#[derive(Parser)]
#[command(name = "make_boards", about = "Generate a boards JSONL file from a wordlist")]
struct Args {
    /// Path to a wordlist (one word per line, # for comments)
    #[arg(long)]
    wordlist: String,

    /// Number of boards to generate
    #[arg(long, default_value_t = 50)]
    num_boards: usize,

    /// RNG seed; the same (wordlist, seed) pair reproduces the file
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output JSONL file
    #[arg(long)]
    out: String,

    /// Prefix for board ids
    #[arg(long, default_value = "board")]
    id_prefix: String,
}

fn main() -> codenames_bench::Result<()> {
    setup_logging();
    let args = Args::parse();

    let wordlist = load_wordlist(&args.wordlist)?;
    let boards = generate_boards(&wordlist, args.num_boards, args.seed, &args.id_prefix)?;
    write_boards_jsonl(&args.out, &boards)?;

    println!("Wrote {} boards to {}", boards.len(), args.out);
    Ok(())
}
