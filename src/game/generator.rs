//! Seeded board generation from a wordlist.

use rand::prelude::*;

use crate::game::board::Board;
use crate::game::types::{CardType, Team};
use crate::{BenchError, Result};

/// Generate one board: 25 distinct words sampled from the wordlist, a
/// random starting team and the standard shuffled key distribution
/// (9 starting / 8 other / 7 neutral / 1 assassin).
pub fn generate_board(rng: &mut StdRng, wordlist: &[String], board_id: &str) -> Result<Board> {
    if wordlist.len() < 25 {
        return Err(BenchError::Wordlist(format!(
            "need at least 25 unique words to lay a board, got {}",
            wordlist.len()
        )));
    }

    let words: Vec<String> = wordlist.choose_multiple(rng, 25).cloned().collect();

    let starting_team = *[Team::Red, Team::Blue].choose(rng).unwrap();

    let mut key: Vec<CardType> = Vec::with_capacity(25);
    key.extend(std::iter::repeat(starting_team.card_type()).take(9));
    key.extend(std::iter::repeat(starting_team.opponent().card_type()).take(8));
    key.extend(std::iter::repeat(CardType::Neutral).take(7));
    key.push(CardType::Assassin);
    key.shuffle(rng);

    Ok(Board {
        board_id: board_id.to_string(),
        words,
        key,
        starting_team,
        seed: None,
    })
}

/// Generate `num_boards` boards with ids `{id_prefix}-NNNNNN`, all drawn
/// from one seeded RNG so a (wordlist, seed) pair reproduces the file.
pub fn generate_boards(
    wordlist: &[String],
    num_boards: usize,
    seed: u64,
    id_prefix: &str,
) -> Result<Vec<Board>> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut boards = Vec::with_capacity(num_boards);
    for i in 0..num_boards {
        let mut board = generate_board(&mut rng, wordlist, &format!("{}-{:06}", id_prefix, i))?;
        board.seed = Some(seed);
        boards.push(board);
    }
    Ok(boards)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wordlist() -> Vec<String> {
        (0..60).map(|i| format!("WORD{}", i)).collect()
    }

    #[test]
    fn test_generated_board_satisfies_invariants() {
        let boards = generate_boards(&wordlist(), 20, 7, "board").unwrap();
        assert_eq!(boards.len(), 20);

        for board in &boards {
            board.validate().unwrap();
            assert_eq!(board.words.len(), 25);
            let unique: std::collections::HashSet<_> = board.words.iter().collect();
            assert_eq!(unique.len(), 25);
        }
    }

    #[test]
    fn test_same_seed_reproduces_boards() {
        let a = generate_boards(&wordlist(), 5, 42, "board").unwrap();
        let b = generate_boards(&wordlist(), 5, 42, "board").unwrap();

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.words, y.words);
            assert_eq!(x.key, y.key);
            assert_eq!(x.starting_team, y.starting_team);
        }
    }

    #[test]
    fn test_short_wordlist_rejected() {
        let short: Vec<String> = (0..10).map(|i| format!("W{}", i)).collect();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_board(&mut rng, &short, "x").is_err());
    }
}
