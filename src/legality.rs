//! Rule-based clue legality gate.
//!
//! A clue survives when it is a plausible single English token and has no
//! lexical overlap with any board word: no exact match, no substring in
//! either direction, no trivial +S plural variant.

use std::sync::LazyLock;

use regex::Regex;

use crate::agent::spymaster::Candidate;

/// Clues that read as meta-instructions rather than associations.
const BANNED_CLUES: [&str; 13] = [
    "NONE", "NIL", "ZERO", "STOP", "PASS", "SKIP", "LEFT", "RIGHT", "TOP", "BOTTOM", "FIRST",
    "SECOND", "THIRD",
];

static SINGLE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z']{0,31}$").unwrap());

/// Why a candidate was rejected. `Display` is the log string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    NotSingleWord,
    NoLetters,
    BannedMetaWord,
    MatchesBoardWord(String),
    SubstringOverlap(String),
    PluralVariant(String),
    BadNumber,
    NumberLtOne,
    NumberGtRemaining(usize),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "empty"),
            RejectReason::NotSingleWord => write!(f, "not_single_word"),
            RejectReason::NoLetters => write!(f, "no_letters"),
            RejectReason::BannedMetaWord => write!(f, "banned_meta_word"),
            RejectReason::MatchesBoardWord(w) => write!(f, "matches_board_word:{}", w),
            RejectReason::SubstringOverlap(w) => write!(f, "substring_overlap:{}", w),
            RejectReason::PluralVariant(w) => write!(f, "plural_variant:{}", w),
            RejectReason::BadNumber => write!(f, "bad_number"),
            RejectReason::NumberLtOne => write!(f, "number_lt_1"),
            RejectReason::NumberGtRemaining(rem) => write!(f, "number_gt_remaining({})", rem),
        }
    }
}

/// Strip to letters only and uppercase, for strict overlap checks.
pub fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase()
}

fn is_single_word(clue: &str) -> bool {
    SINGLE_WORD_RE.is_match(clue.trim())
}

/// Check one clue against the board. `Ok(())` means legal.
pub fn is_legal_clue(clue: &str, board_words: &[String]) -> std::result::Result<(), RejectReason> {
    let clue_raw = clue.trim();
    if clue_raw.is_empty() {
        return Err(RejectReason::Empty);
    }

    if !is_single_word(clue_raw) {
        return Err(RejectReason::NotSingleWord);
    }

    let clue_norm = normalize_token(clue_raw);
    if clue_norm.is_empty() {
        return Err(RejectReason::NoLetters);
    }

    if BANNED_CLUES.contains(&clue_norm.as_str()) {
        return Err(RejectReason::BannedMetaWord);
    }

    for w_raw in board_words {
        let w_norm = normalize_token(w_raw);
        if clue_norm == w_norm {
            return Err(RejectReason::MatchesBoardWord(w_raw.clone()));
        }
        if !w_norm.is_empty() && (w_norm.contains(&clue_norm) || clue_norm.contains(&w_norm)) {
            return Err(RejectReason::SubstringOverlap(w_raw.clone()));
        }
        if format!("{}S", clue_norm) == w_norm || format!("{}S", w_norm) == clue_norm {
            return Err(RejectReason::PluralVariant(w_raw.clone()));
        }
    }

    Ok(())
}

/// Partition candidates into legal and rejected, preserving input order.
/// Legal candidates come back with their clue trimmed.
pub fn filter_legal_clues(
    candidates: Vec<Candidate>,
    board_words: &[String],
) -> (Vec<Candidate>, Vec<(Candidate, RejectReason)>) {
    let mut legal = Vec::new();
    let mut rejected = Vec::new();

    for mut cand in candidates {
        cand.clue = cand.clue.trim().to_string();
        match is_legal_clue(&cand.clue, board_words) {
            Ok(()) => legal.push(cand),
            Err(reason) => rejected.push((cand, reason)),
        }
    }

    (legal, rejected)
}

/// Second pass: keep only candidates whose number is an integer in
/// `[1, min(9, remaining_for_team)]`.
pub fn filter_number_range(
    candidates: Vec<Candidate>,
    remaining_for_team: usize,
) -> (Vec<Candidate>, Vec<(Candidate, RejectReason)>) {
    let cap = remaining_for_team.min(9) as i64;
    let mut kept = Vec::new();
    let mut rejected = Vec::new();

    for cand in candidates {
        match cand.number {
            None => rejected.push((cand, RejectReason::BadNumber)),
            Some(n) if n < 1 => rejected.push((cand, RejectReason::NumberLtOne)),
            Some(n) if n > cap => {
                rejected.push((cand, RejectReason::NumberGtRemaining(remaining_for_team)))
            }
            Some(_) => kept.push(cand),
        }
    }

    (kept, rejected)
}
