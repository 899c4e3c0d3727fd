//! Plays one full game between two configured agents.

use std::sync::Arc;

use crate::agent::config::AgentConfig;
use crate::agent::engine::TurnEngine;
use crate::game::board::Board;
use crate::game::rules::StoppedReason;
use crate::game::state::GameState;
use crate::game::types::Team;
use crate::llm::client::OpenAiResponsesClient;
use crate::runner::record::{EndReason, PlayedGame};

/// Alternate team-turns starting with the board's starting team until the
/// game ends, the turn budget runs out, or a turn fails fatally.
///
/// Engine errors never escape: the game is closed with
/// `end_reason = "error"` and the turns played so far are kept, so no
/// failure crosses a game boundary.
pub async fn play_game(
    board: Arc<Board>,
    red_cfg: &AgentConfig,
    blue_cfg: &AgentConfig,
    client: Arc<OpenAiResponsesClient>,
    max_turns: usize,
) -> PlayedGame {
    let red_engine = TurnEngine::new(red_cfg.clone(), Arc::clone(&client));
    let blue_engine = TurnEngine::new(blue_cfg.clone(), Arc::clone(&client));

    let mut state = GameState::new(Arc::clone(&board));
    let mut turns = Vec::new();
    let mut winner = None;
    let mut loser = None;
    let mut end_reason = EndReason::MaxTurns;
    let mut error = None;

    for turn_idx in 0..max_turns {
        let team = state.current_team;
        let engine = match team {
            Team::Red => &red_engine,
            Team::Blue => &blue_engine,
        };

        match engine.take_turn(&mut state, team).await {
            Ok(log) => {
                let outcome = &log.actual_outcome;
                let game_over = outcome.game_over;
                let stopped = outcome.stopped_reason;
                winner = outcome.winner;
                loser = outcome.loser;
                turns.push(log);

                if game_over {
                    end_reason = if stopped == StoppedReason::Assassin {
                        EndReason::Assassin
                    } else {
                        EndReason::CompletedAgents
                    };
                    break;
                }
                state.current_team = team.opponent();
            }
            Err(e) => {
                log::error!(
                    "game {} aborted on turn {} ({}): {}",
                    board.board_id,
                    turn_idx,
                    team,
                    e
                );
                winner = None;
                loser = None;
                end_reason = EndReason::Error;
                error = Some(e.to_string());
                break;
            }
        }
    }

    log::info!(
        "game {} finished: winner={:?} reason={} after {} turn(s)",
        board.board_id,
        winner,
        end_reason,
        turns.len()
    );

    PlayedGame {
        winner,
        loser,
        end_reason,
        error,
        turns,
    }
}
