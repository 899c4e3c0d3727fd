//! Fixed utility scoring of a turn outcome.
//!
//! Used only to rank candidate clues during evaluation rollouts; there is
//! no learned critic and no win/loss bonus at this layer.

use serde::Deserialize;

use crate::game::rules::TurnOutcome;
use crate::game::types::CardType;

/// Per-reveal weights. Injectable to support shaping experiments.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UtilityWeights {
    pub correct: f64,
    pub opponent: f64,
    pub neutral: f64,
    pub assassin: f64,
}

impl Default for UtilityWeights {
    fn default() -> Self {
        Self {
            correct: 1.0,
            opponent: -1.0,
            neutral: -0.3,
            assassin: -10.0,
        }
    }
}

/// Sum of per-reveal weights over everything the turn actually revealed.
pub fn turn_utility(outcome: &TurnOutcome, weights: &UtilityWeights) -> f64 {
    outcome
        .applied
        .iter()
        .map(|applied| {
            if applied.card_type.is_team(outcome.team) {
                weights.correct
            } else {
                match applied.card_type {
                    CardType::Assassin => weights.assassin,
                    CardType::Neutral => weights.neutral,
                    CardType::Red | CardType::Blue => weights.opponent,
                }
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rules::{AppliedGuess, StoppedReason};
    use crate::game::types::Team;

    fn outcome(team: Team, reveals: &[(&str, CardType)]) -> TurnOutcome {
        TurnOutcome {
            team,
            clue: "TEST".to_string(),
            number: reveals.len() as u32,
            max_allowed: reveals.len() as u32 + 1,
            guesses: reveals.iter().map(|(w, _)| w.to_string()).collect(),
            applied: reveals
                .iter()
                .enumerate()
                .map(|(i, (w, t))| AppliedGuess {
                    word: w.to_string(),
                    index: i,
                    card_type: *t,
                })
                .collect(),
            stopped_reason: StoppedReason::Stop,
            game_over: false,
            winner: None,
            loser: None,
        }
    }

    #[test]
    fn test_default_weights() {
        let weights = UtilityWeights::default();
        let o = outcome(
            Team::Red,
            &[
                ("A", CardType::Red),
                ("B", CardType::Red),
                ("C", CardType::Neutral),
            ],
        );
        assert!((turn_utility(&o, &weights) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_assassin_dominates() {
        let weights = UtilityWeights::default();
        let o = outcome(Team::Blue, &[("A", CardType::Blue), ("B", CardType::Assassin)]);
        assert!((turn_utility(&o, &weights) - (-9.0)).abs() < 1e-9);
    }

    #[test]
    fn test_opponent_card_is_opponent_weight_for_either_team() {
        let weights = UtilityWeights::default();
        let o = outcome(Team::Blue, &[("A", CardType::Red)]);
        assert_eq!(turn_utility(&o, &weights), -1.0);
    }

    #[test]
    fn test_empty_turn_scores_zero() {
        let o = outcome(Team::Red, &[]);
        assert_eq!(turn_utility(&o, &UtilityWeights::default()), 0.0);
    }

    #[test]
    fn test_custom_weights_injectable() {
        let weights = UtilityWeights {
            correct: 2.0,
            opponent: -0.5,
            neutral: 0.0,
            assassin: -100.0,
        };
        let o = outcome(Team::Red, &[("A", CardType::Red), ("B", CardType::Blue)]);
        assert!((turn_utility(&o, &weights) - 1.5).abs() < 1e-9);
    }
}
