//! Turn resolution for Codenames.
//!
//! [`apply_turn`] is the single mutation point of a [`GameState`]: it walks
//! a guess sequence in order, reveals cards and decides how the turn (and
//! possibly the game) ends. All branches are deterministic given the state
//! and the inputs, which is what makes guesser rollouts on state copies
//! comparable across candidates.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::game::state::GameState;
use crate::game::types::{CardType, Team};

/// Why a turn stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoppedReason {
    /// Guess list exhausted without a stop rule firing (also the empty list)
    Stop,
    /// Guess index reached `max_allowed`
    Limit,
    /// A non-team card (opponent or neutral) was revealed
    Wrong,
    /// The assassin was revealed
    Assassin,
    /// Empty token, repeat, unknown word or already-revealed card
    InvalidOrRepeat,
}

impl std::fmt::Display for StoppedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoppedReason::Stop => write!(f, "stop"),
            StoppedReason::Limit => write!(f, "limit"),
            StoppedReason::Wrong => write!(f, "wrong"),
            StoppedReason::Assassin => write!(f, "assassin"),
            StoppedReason::InvalidOrRepeat => write!(f, "invalid_or_repeat"),
        }
    }
}

/// One successful reveal within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedGuess {
    pub word: String,
    pub index: usize,
    pub card_type: CardType,
}

/// Everything that happened during one team-turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub team: Team,
    pub clue: String,
    pub number: u32,
    pub max_allowed: u32,
    pub guesses: Vec<String>,
    pub applied: Vec<AppliedGuess>,
    pub stopped_reason: StoppedReason,
    pub game_over: bool,
    pub winner: Option<Team>,
    pub loser: Option<Team>,
}

/// Apply a clue and its guess sequence to `state`, mutating the reveal
/// bitmap in place. Callers needing isolation pass a [`GameState::copy`].
///
/// Stop rules, checked per guess in order:
/// 1. guess index at `max_allowed` (= number + 1) -> `limit`
/// 2. empty / repeated / off-board / already-revealed token -> `invalid_or_repeat`
/// 3. assassin reveal -> game over, opponent wins, `assassin`
/// 4. non-team reveal -> `wrong`; if it exposed the opponent's last card
///    the opponent wins immediately
/// 5. team reveal leaving the team at zero remaining -> game over, team wins
pub fn apply_turn(
    state: &mut GameState,
    team: Team,
    clue: &str,
    number: u32,
    guesses: &[String],
) -> TurnOutcome {
    let max_allowed = number + 1;
    let mut applied: Vec<AppliedGuess> = Vec::new();
    let mut game_over = false;
    let mut winner: Option<Team> = None;
    let mut loser: Option<Team> = None;

    let mut seen: HashSet<String> = HashSet::new();
    let mut stopped_reason = StoppedReason::Stop;

    for (j, guess) in guesses.iter().enumerate() {
        if j as u32 >= max_allowed {
            stopped_reason = StoppedReason::Limit;
            break;
        }

        let g = guess.trim().to_uppercase();
        if g.is_empty() || seen.contains(&g) {
            stopped_reason = StoppedReason::InvalidOrRepeat;
            break;
        }
        seen.insert(g.clone());

        let idx = match state.words().iter().position(|w| *w == g) {
            Some(idx) => idx,
            None => {
                stopped_reason = StoppedReason::InvalidOrRepeat;
                break;
            }
        };
        if state.revealed[idx] {
            stopped_reason = StoppedReason::InvalidOrRepeat;
            break;
        }

        state.revealed[idx] = true;
        let ctype = state.key()[idx];
        applied.push(AppliedGuess {
            word: g,
            index: idx,
            card_type: ctype,
        });

        if ctype == CardType::Assassin {
            game_over = true;
            winner = Some(team.opponent());
            loser = Some(team);
            stopped_reason = StoppedReason::Assassin;
            break;
        }

        if !ctype.is_team(team) {
            // Opponent or neutral card ends the turn. An accidental reveal
            // that exposed the opponent's last card ends the game for them.
            stopped_reason = StoppedReason::Wrong;
            if state.remaining(team.opponent()) == 0 {
                game_over = true;
                winner = Some(team.opponent());
                loser = Some(team);
            }
            break;
        }

        if state.remaining(team) == 0 {
            game_over = true;
            winner = Some(team);
            loser = Some(team.opponent());
            break;
        }
    }

    TurnOutcome {
        team,
        clue: clue.to_string(),
        number,
        max_allowed,
        guesses: guesses.to_vec(),
        applied,
        stopped_reason,
        game_over,
        winner,
        loser,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::test_support::fixture_board;
    use std::sync::Arc;

    fn red_state() -> GameState {
        GameState::new(Arc::new(fixture_board()))
    }

    fn guesses(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    // Fixture layout: 0..9 RED, 9..17 BLUE, 17..24 NEUTRAL, 24 = VIOLIN assassin.

    #[test]
    fn test_assassin_ends_game_immediately() {
        let mut state = red_state();
        let outcome = apply_turn(&mut state, Team::Red, "BEACH", 2, &guesses(&["VIOLIN"]));

        assert_eq!(outcome.stopped_reason, StoppedReason::Assassin);
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(Team::Blue));
        assert_eq!(outcome.loser, Some(Team::Red));
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied[0].word, "VIOLIN");
        assert_eq!(outcome.applied[0].index, 24);
        assert_eq!(outcome.applied[0].card_type, CardType::Assassin);
    }

    #[test]
    fn test_correct_then_neutral_ends_turn_not_game() {
        let mut state = red_state();
        let outcome = apply_turn(
            &mut state,
            Team::Red,
            "THINGS",
            2,
            &guesses(&["APPLE", "FOREST", "RIVER"]),
        );

        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.stopped_reason, StoppedReason::Wrong);
        assert!(!outcome.game_over);
        assert_eq!(outcome.winner, None);
        // The third guess was never applied
        assert!(!state.revealed[1]);
    }

    #[test]
    fn test_limit_caps_guesses_at_number_plus_one() {
        let mut state = red_state();
        let outcome = apply_turn(
            &mut state,
            Team::Red,
            "STUFF",
            2,
            &guesses(&["APPLE", "RIVER", "MOON", "TRAIN"]),
        );

        assert_eq!(outcome.max_allowed, 3);
        assert_eq!(outcome.applied.len(), 3);
        assert!(outcome
            .applied
            .iter()
            .all(|a| a.card_type == CardType::Red));
        assert_eq!(outcome.stopped_reason, StoppedReason::Limit);
        assert!(!outcome.game_over);
    }

    #[test]
    fn test_accidental_opponent_completion_ends_game() {
        let mut state = red_state();
        // Reveal all blue cards but one
        for idx in 9..16 {
            state.revealed[idx] = true;
        }
        assert_eq!(state.remaining(Team::Blue), 1);

        let outcome = apply_turn(&mut state, Team::Red, "WATER", 1, &guesses(&["MIRROR"]));

        assert_eq!(outcome.stopped_reason, StoppedReason::Wrong);
        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(Team::Blue));
        assert_eq!(outcome.loser, Some(Team::Red));
    }

    #[test]
    fn test_team_completion_wins() {
        let mut state = red_state();
        for idx in 0..8 {
            state.revealed[idx] = true;
        }
        assert_eq!(state.remaining(Team::Red), 1);

        let outcome = apply_turn(&mut state, Team::Red, "LIGHT", 1, &guesses(&["CANDLE"]));

        assert!(outcome.game_over);
        assert_eq!(outcome.winner, Some(Team::Red));
        assert_eq!(outcome.stopped_reason, StoppedReason::Stop);
    }

    #[test]
    fn test_empty_guess_list_is_stop() {
        let mut state = red_state();
        let outcome = apply_turn(&mut state, Team::Red, "SILENCE", 1, &[]);

        assert_eq!(outcome.stopped_reason, StoppedReason::Stop);
        assert!(outcome.applied.is_empty());
        assert!(!outcome.game_over);
    }

    #[test]
    fn test_repeat_guess_is_invalid() {
        let mut state = red_state();
        let outcome = apply_turn(
            &mut state,
            Team::Red,
            "FRUIT",
            2,
            &guesses(&["APPLE", "apple "]),
        );

        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.stopped_reason, StoppedReason::InvalidOrRepeat);
    }

    #[test]
    fn test_off_board_guess_is_invalid() {
        let mut state = red_state();
        let outcome = apply_turn(&mut state, Team::Red, "FRUIT", 1, &guesses(&["BANANA"]));

        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.stopped_reason, StoppedReason::InvalidOrRepeat);
    }

    #[test]
    fn test_already_revealed_guess_is_invalid() {
        let mut state = red_state();
        state.revealed[0] = true;
        let outcome = apply_turn(&mut state, Team::Red, "FRUIT", 1, &guesses(&["APPLE"]));

        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.stopped_reason, StoppedReason::InvalidOrRepeat);
    }

    #[test]
    fn test_guesses_normalised_before_lookup() {
        let mut state = red_state();
        let outcome = apply_turn(&mut state, Team::Red, "FRUIT", 1, &guesses(&["  apple "]));

        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied[0].word, "APPLE");
        assert!(state.revealed[0]);
    }

    #[test]
    fn test_applied_never_exceeds_max_allowed() {
        let mut state = red_state();
        let all_red = guesses(&["APPLE", "RIVER", "MOON", "TRAIN", "PIANO", "SHARK"]);
        let outcome = apply_turn(&mut state, Team::Red, "EVERYTHING", 3, &all_red);

        assert!(outcome.applied.len() as u32 <= outcome.max_allowed);
    }

    #[test]
    fn test_reveals_are_monotone() {
        let mut state = red_state();
        let before = state.revealed.clone();
        apply_turn(&mut state, Team::Red, "STUFF", 2, &guesses(&["APPLE", "OCEAN"]));

        for (b, a) in before.iter().zip(&state.revealed) {
            assert!(!b || *a, "a revealed card was un-revealed");
        }
    }
}
