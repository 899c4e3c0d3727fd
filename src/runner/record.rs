//! Per-game result records, one JSON line each in the results file.

use serde::Serialize;

use crate::agent::engine::TurnLog;
use crate::game::board::Board;
use crate::game::types::{CardType, Team};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A team revealed the assassin
    Assassin,
    /// A team's words were fully revealed
    CompletedAgents,
    /// Turn budget exhausted without a winner
    MaxTurns,
    /// A fatal error aborted the game mid-turn
    Error,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Assassin => write!(f, "assassin"),
            EndReason::CompletedAgents => write!(f, "completed_agents"),
            EndReason::MaxTurns => write!(f, "max_turns"),
            EndReason::Error => write!(f, "error"),
        }
    }
}

/// Outcome of one played game, before run metadata is attached.
#[derive(Debug)]
pub struct PlayedGame {
    pub winner: Option<Team>,
    pub loser: Option<Team>,
    pub end_reason: EndReason,
    pub error: Option<String>,
    pub turns: Vec<TurnLog>,
}

/// One line of the match results file.
#[derive(Debug, Serialize)]
pub struct GameRecord {
    pub run_id: String,
    pub match_id: String,
    pub red_agent: String,
    pub blue_agent: String,
    pub mirror: bool,
    pub timestamp: i64,
    pub board_id: String,
    pub words: Vec<String>,
    pub key: Vec<CardType>,
    pub starting_team: Team,
    pub winner: Option<Team>,
    pub loser: Option<Team>,
    pub end_reason: EndReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub turns: Vec<TurnLog>,
}

impl GameRecord {
    pub fn new(
        run_id: String,
        match_id: String,
        red_agent: String,
        blue_agent: String,
        mirror: bool,
        board: &Board,
        played: PlayedGame,
    ) -> Self {
        Self {
            run_id,
            match_id,
            red_agent,
            blue_agent,
            mirror,
            timestamp: chrono::Utc::now().timestamp(),
            board_id: board.board_id.clone(),
            words: board.words.clone(),
            key: board.key.clone(),
            starting_team: board.starting_team,
            winner: played.winner,
            loser: played.loser,
            end_reason: played.end_reason,
            error: played.error,
            turns: played.turns,
        }
    }
}
