//! Runs a set of boards between two agents and streams results to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::agent::config::AgentConfig;
use crate::game::board::Board;
use crate::llm::client::OpenAiResponsesClient;
use crate::runner::game::play_game;
use crate::runner::record::GameRecord;
use crate::Result;

/// Match-level options.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Games per board per orientation
    pub replicates: usize,
    /// Also play each board with the colour assignments swapped
    pub mirror: bool,
    /// Per-game turn budget
    pub max_turns: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            replicates: 1,
            mirror: false,
            max_turns: 100,
        }
    }
}

/// Play every board (with replicates and optional mirror games) and write
/// one JSON record per game. Each line is flushed as soon as the game
/// finishes, so an interrupted run still leaves valid newline-delimited
/// JSON behind.
pub async fn run_match<P: AsRef<Path>>(
    boards: &[Board],
    red_cfg: &AgentConfig,
    blue_cfg: &AgentConfig,
    client: Arc<OpenAiResponsesClient>,
    out_path: P,
    options: &MatchOptions,
) -> Result<()> {
    if let Some(parent) = out_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(out_path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let match_id = Uuid::new_v4().to_string();
    log::info!(
        "match {}: {} vs {} over {} board(s), replicates={}, mirror={}",
        match_id,
        red_cfg.name,
        blue_cfg.name,
        boards.len(),
        options.replicates,
        options.mirror
    );

    for board in boards {
        let board = Arc::new(board.clone());
        for rep in 0..options.replicates {
            let played = play_game(
                Arc::clone(&board),
                red_cfg,
                blue_cfg,
                Arc::clone(&client),
                options.max_turns,
            )
            .await;
            let record = GameRecord::new(
                format!("{}::rep{}::Ared", board.board_id, rep),
                match_id.clone(),
                red_cfg.name.clone(),
                blue_cfg.name.clone(),
                false,
                &board,
                played,
            );
            write_record(&mut writer, &record)?;

            if options.mirror {
                let played = play_game(
                    Arc::clone(&board),
                    blue_cfg, // swapped colours
                    red_cfg,
                    Arc::clone(&client),
                    options.max_turns,
                )
                .await;
                let record = GameRecord::new(
                    format!("{}::rep{}::Ablue", board.board_id, rep),
                    match_id.clone(),
                    blue_cfg.name.clone(),
                    red_cfg.name.clone(),
                    true,
                    &board,
                    played,
                );
                write_record(&mut writer, &record)?;
            }
        }
    }

    Ok(())
}

fn write_record(writer: &mut BufWriter<File>, record: &GameRecord) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
