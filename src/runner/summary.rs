//! Aggregation of a results file into a printable summary.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::Result;

/// Win/loss tallies over one results file.
#[derive(Debug, Default)]
pub struct MatchSummary {
    pub total_games: usize,
    pub draws: usize,
    pub winners_by_color: HashMap<String, usize>,
    pub wins_by_agent: HashMap<String, usize>,
    pub wins_by_agent_color: HashMap<String, usize>,
    pub end_reasons: HashMap<String, usize>,
}

/// Read a newline-delimited results file and tally outcomes. Games without
/// a winner (max_turns, errors) count as draws.
pub fn analyze_results<P: AsRef<Path>>(path: P) -> Result<MatchSummary> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut summary = MatchSummary::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Value = serde_json::from_str(&line)?;
        summary.total_games += 1;

        let end_reason = row
            .get("end_reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        *summary.end_reasons.entry(end_reason).or_insert(0) += 1;

        let winner = match row.get("winner").and_then(Value::as_str) {
            Some(w) => w.to_string(),
            None => {
                summary.draws += 1;
                continue;
            }
        };
        *summary.winners_by_color.entry(winner.clone()).or_insert(0) += 1;

        let agent_key = match winner.as_str() {
            "RED" => "red_agent",
            _ => "blue_agent",
        };
        let agent = row
            .get(agent_key)
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        *summary.wins_by_agent.entry(agent.clone()).or_insert(0) += 1;
        *summary
            .wins_by_agent_color
            .entry(format!("{}::{}", agent, winner))
            .or_insert(0) += 1;
    }

    Ok(summary)
}

/// Print the summary the way the analyze binary shows it.
pub fn print_summary(summary: &MatchSummary) {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  Match results summary                       ║");
    println!("╚══════════════════════════════════════════════╝\n");
    println!(
        "Games: {}  Draws: {}\n",
        summary.total_games, summary.draws
    );

    print_counter("Winners by color", &summary.winners_by_color);
    print_counter("Wins by agent name", &summary.wins_by_agent);
    print_counter("Wins by agent and color", &summary.wins_by_agent_color);
    print_counter("End reasons", &summary.end_reasons);
}

fn print_counter(title: &str, counts: &HashMap<String, usize>) {
    println!("{}:", title);
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (key, count) in rows {
        println!("  {:<32} {}", key, count);
    }
    println!();
}
