//! Board representation and the newline-delimited board file format.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::types::{CardType, Team};
use crate::{BenchError, Result};

/// A 5x5 Codenames board, immutable once validated.
///
/// `words` and `key` are parallel sequences of length 25 in row-major
/// order. The key distribution is 9 cards for the starting team, 8 for the
/// opponent, 7 neutrals and 1 assassin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub board_id: String,
    pub words: Vec<String>,
    pub key: Vec<CardType>,
    pub starting_team: Team,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Board {
    /// Check the structural invariants of a board.
    ///
    /// Lengths must be 25/25, words unique, and the key must carry the
    /// standard {9, 8, 7, 1} distribution for the starting team.
    pub fn validate(&self) -> Result<()> {
        if self.words.len() != 25 || self.key.len() != 25 {
            return Err(BenchError::Config(format!(
                "board {}: expected 25 words and 25 key entries, got {}/{}",
                self.board_id,
                self.words.len(),
                self.key.len()
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for w in &self.words {
            if !seen.insert(w.as_str()) {
                return Err(BenchError::Config(format!(
                    "board {}: duplicate word {}",
                    self.board_id, w
                )));
            }
        }

        let count = |t: CardType| self.key.iter().filter(|&&k| k == t).count();
        let starting = self.starting_team.card_type();
        let other = self.starting_team.opponent().card_type();
        if count(starting) != 9
            || count(other) != 8
            || count(CardType::Neutral) != 7
            || count(CardType::Assassin) != 1
        {
            return Err(BenchError::Config(format!(
                "board {}: bad key distribution (starting={} other={} neutral={} assassin={})",
                self.board_id,
                count(starting),
                count(other),
                count(CardType::Neutral),
                count(CardType::Assassin)
            )));
        }

        Ok(())
    }
}

/// Read and validate boards from a newline-delimited JSON file.
pub fn read_boards_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<Board>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut boards = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let board: Board = serde_json::from_str(&line)
            .map_err(|e| BenchError::Config(format!("malformed board record: {}", e)))?;
        board.validate()?;
        boards.push(board);
    }

    Ok(boards)
}

/// Write boards as one JSON record per line.
pub fn write_boards_jsonl<P: AsRef<Path>>(path: P, boards: &[Board]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for board in boards {
        serde_json::to_writer(&mut writer, board)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Deterministic 25-word board for rules/engine tests.
    ///
    /// Key layout: indices 0..9 RED, 9..17 BLUE, 17..24 NEUTRAL, 24 ASSASSIN.
    pub fn fixture_board() -> Board {
        let words: Vec<String> = [
            "APPLE", "RIVER", "MOON", "TRAIN", "PIANO", "SHARK", "CLOUD", "BRIDGE", "CANDLE",
            "TIGER", "OCEAN", "STONE", "WHEEL", "GARDEN", "SILVER", "EAGLE", "MIRROR", "FOREST",
            "LADDER", "BUTTON", "CASTLE", "PENCIL", "ROCKET", "ANCHOR", "VIOLIN",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let mut key = Vec::with_capacity(25);
        key.extend(std::iter::repeat(CardType::Red).take(9));
        key.extend(std::iter::repeat(CardType::Blue).take(8));
        key.extend(std::iter::repeat(CardType::Neutral).take(7));
        key.push(CardType::Assassin);

        Board {
            board_id: "fixture-000001".to_string(),
            words,
            key,
            starting_team: Team::Red,
            seed: Some(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::fixture_board;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fixture_board_is_valid() {
        fixture_board().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_short_board() {
        let mut board = fixture_board();
        board.words.pop();
        board.key.pop();
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_word() {
        let mut board = fixture_board();
        board.words[1] = board.words[0].clone();
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_distribution() {
        let mut board = fixture_board();
        // Turn the assassin into a ninth blue card
        board.key[24] = CardType::Blue;
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_jsonl_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("boards.jsonl");

        let boards = vec![fixture_board()];
        write_boards_jsonl(&path, &boards)?;
        let loaded = read_boards_jsonl(&path)?;

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].board_id, "fixture-000001");
        assert_eq!(loaded[0].words, boards[0].words);
        assert_eq!(loaded[0].starting_team, Team::Red);
        Ok(())
    }
}
