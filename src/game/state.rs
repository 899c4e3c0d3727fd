//! Mutable game state layered over an immutable board.

use std::collections::HashMap;
use std::sync::Arc;

use crate::game::board::Board;
use crate::game::types::{CardType, Team};

/// Live state of one game: which cards are revealed and whose turn it is.
///
/// The board itself never changes; rollouts take a [`GameState::copy`] and
/// replay guesses on that copy while the real state stays untouched.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Arc<Board>,
    pub revealed: Vec<bool>,
    pub current_team: Team,
}

impl GameState {
    /// Fresh state: nothing revealed, starting team to move.
    pub fn new(board: Arc<Board>) -> Self {
        let current_team = board.starting_team;
        Self {
            board,
            revealed: vec![false; 25],
            current_team,
        }
    }

    /// Cheap copy for rollouts: duplicates the reveal bitmap and the team
    /// pointer, shares the board.
    pub fn copy(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
            revealed: self.revealed.clone(),
            current_team: self.current_team,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.board.words
    }

    pub fn key(&self) -> &[CardType] {
        &self.board.key
    }

    /// Unrevealed words in board order.
    pub fn unrevealed_words(&self) -> Vec<String> {
        self.board
            .words
            .iter()
            .zip(&self.revealed)
            .filter(|(_, &r)| !r)
            .map(|(w, _)| w.clone())
            .collect()
    }

    /// Count of unrevealed cards belonging to `team`.
    pub fn remaining(&self, team: Team) -> usize {
        let t = team.card_type();
        self.board
            .key
            .iter()
            .zip(&self.revealed)
            .filter(|(&k, &r)| !r && k == t)
            .count()
    }

    /// Unrevealed card counts per card type.
    pub fn remaining_by_type(&self) -> HashMap<CardType, usize> {
        let mut out = HashMap::from([
            (CardType::Red, 0),
            (CardType::Blue, 0),
            (CardType::Neutral, 0),
            (CardType::Assassin, 0),
        ]);
        for (&k, &r) in self.board.key.iter().zip(&self.revealed) {
            if !r {
                *out.get_mut(&k).unwrap() += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::test_support::fixture_board;

    #[test]
    fn test_new_state_counts() {
        let state = GameState::new(Arc::new(fixture_board()));
        assert_eq!(state.current_team, Team::Red);
        assert_eq!(state.remaining(Team::Red), 9);
        assert_eq!(state.remaining(Team::Blue), 8);
        assert_eq!(state.unrevealed_words().len(), 25);

        let by_type = state.remaining_by_type();
        assert_eq!(by_type[&CardType::Neutral], 7);
        assert_eq!(by_type[&CardType::Assassin], 1);
    }

    #[test]
    fn test_copy_isolates_reveals() {
        let state = GameState::new(Arc::new(fixture_board()));
        let mut rollout = state.copy();
        rollout.revealed[0] = true;
        rollout.current_team = Team::Blue;

        assert!(!state.revealed[0]);
        assert_eq!(state.current_team, Team::Red);
        assert_eq!(rollout.remaining(Team::Red), 8);
        assert_eq!(state.remaining(Team::Red), 9);
    }

    #[test]
    fn test_unrevealed_words_preserve_board_order() {
        let mut state = GameState::new(Arc::new(fixture_board()));
        state.revealed[1] = true;
        let words = state.unrevealed_words();
        assert_eq!(words[0], "APPLE");
        assert_eq!(words[1], "MOON");
        assert_eq!(words.len(), 24);
    }
}
