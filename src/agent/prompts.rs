//! Prompt registry for the spymaster and guesser models.
//!
//! The spymaster sees the full key, partitioned into its own words, the
//! opponent's, neutrals, the assassin and already-revealed cards. The
//! guesser only ever sees the word lists and the clue.

use crate::game::state::GameState;
use crate::game::types::{CardType, Team};
use crate::llm::ChatMessage;
use crate::{BenchError, Result};

struct SpymasterContext {
    team: String,
    unrevealed_all: String,
    your_words: String,
    opp_words: String,
    neutral_words: String,
    assassin_words: String,
    revealed_words: String,
    remaining_yours: usize,
    remaining_opp: usize,
}

struct GuesserContext {
    unrevealed: String,
    revealed: String,
    clue: String,
    number: u32,
    max_allowed: u32,
}

fn fmt_words(words: &[String]) -> String {
    if words.is_empty() {
        "(none)".to_string()
    } else {
        words.join(", ")
    }
}

fn spymaster_context(state: &GameState, team: Team) -> SpymasterContext {
    let mut yours = Vec::new();
    let mut opp = Vec::new();
    let mut neutral = Vec::new();
    let mut assassin = Vec::new();
    let mut already = Vec::new();
    let mut unrevealed_all = Vec::new();

    for ((word, &card), &revealed) in state
        .words()
        .iter()
        .zip(state.key())
        .zip(&state.revealed)
    {
        if revealed {
            already.push(format!("{}({})", word, card));
            continue;
        }
        unrevealed_all.push(word.clone());
        if card.is_team(team) {
            yours.push(word.clone());
        } else if card == CardType::Neutral {
            neutral.push(word.clone());
        } else if card == CardType::Assassin {
            assassin.push(word.clone());
        } else {
            opp.push(word.clone());
        }
    }

    SpymasterContext {
        team: team.to_string(),
        remaining_yours: yours.len(),
        remaining_opp: opp.len(),
        unrevealed_all: fmt_words(&unrevealed_all),
        your_words: fmt_words(&yours),
        opp_words: fmt_words(&opp),
        neutral_words: fmt_words(&neutral),
        assassin_words: fmt_words(&assassin),
        revealed_words: fmt_words(&already),
    }
}

/// Build the input items for one spymaster call.
pub fn spymaster_messages(
    prompt_id: &str,
    state: &GameState,
    team: Team,
) -> Result<Vec<ChatMessage>> {
    let ctx = spymaster_context(state, team);
    let (system, user) = match prompt_id {
        "spymaster_v1" => spymaster_v1(&ctx),
        "spymaster_v2" => spymaster_v2(&ctx),
        other => {
            return Err(BenchError::Config(format!(
                "unknown spymaster prompt_id: {}",
                other
            )))
        }
    };
    Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
}

/// Build the input items for one guesser call.
pub fn guesser_messages(
    prompt_id: &str,
    state: &GameState,
    clue: &str,
    number: u32,
    max_allowed: u32,
) -> Result<Vec<ChatMessage>> {
    let unrevealed = state.unrevealed_words();
    let revealed: Vec<String> = state
        .words()
        .iter()
        .zip(&state.revealed)
        .filter(|(_, &r)| r)
        .map(|(w, _)| w.clone())
        .collect();

    let ctx = GuesserContext {
        unrevealed: fmt_words(&unrevealed),
        revealed: fmt_words(&revealed),
        clue: clue.to_string(),
        number,
        max_allowed,
    };

    let (system, user) = match prompt_id {
        "guesser_v1" => guesser_v1(&ctx),
        "guesser_v2" => guesser_v2(&ctx),
        other => {
            return Err(BenchError::Config(format!(
                "unknown guesser prompt_id: {}",
                other
            )))
        }
    };
    Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
}

// -----------------------
// Prompt implementations
// -----------------------

fn spymaster_v1(ctx: &SpymasterContext) -> (String, String) {
    let system = "You are an expert CODENAMES SPYMASTER.\n\
        You know which unrevealed board words belong to your team, the opponent, neutrals, and the assassin.\n\
        Your job: output a SINGLE-WORD clue and a number.\n\n\
        Rules / constraints:\n\
        - Clue must be ONE word (no spaces).\n\
        - Do NOT use any board word as the clue.\n\
        - Avoid clues that could point to the assassin or opponent words.\n\
        - Prefer clues that link 2-3 of your words safely; be conservative if risk is high.\n\n\
        Return ONLY the JSON required by the schema."
        .to_string();

    let user = format!(
        "TEAM: {}\nUnrevealed words: {}\n\n\
         Your unrevealed words ({}): {}\n\
         Opponent unrevealed words ({}): {}\n\
         Neutral unrevealed words: {}\n\
         ASSASSIN unrevealed words: {}\n\n\
         Already revealed: {}\n\n\
         Pick the best safe clue and number for this turn.",
        ctx.team,
        ctx.unrevealed_all,
        ctx.remaining_yours,
        ctx.your_words,
        ctx.remaining_opp,
        ctx.opp_words,
        ctx.neutral_words,
        ctx.assassin_words,
        ctx.revealed_words,
    );
    (system, user)
}

fn spymaster_v2(ctx: &SpymasterContext) -> (String, String) {
    let system = "You are CODENAMES SPYMASTER (high precision).\n\
        You must output a single-word clue and an integer number.\n\n\
        Goal: maximize correct guesses this turn while minimizing risk.\n\
        Hard rules:\n\
        - One word clue (letters only; no spaces, no hyphens if avoidable).\n\
        - Never output a board word as the clue.\n\
        - Never intentionally bait the assassin.\n\
        - Number should usually be <= 4 unless the board is extremely safe.\n\n\
        Return ONLY JSON per the schema. No extra text."
        .to_string();

    let user = format!(
        "TEAM: {}\nYOUR WORDS: {}\nOPPONENT WORDS: {}\nNEUTRALS: {}\nASSASSIN: {}\n\
         ALREADY REVEALED: {}\n\n\
         Choose a clue that best connects a subset of YOUR WORDS while being far from the assassin and opponent words.",
        ctx.team,
        ctx.your_words,
        ctx.opp_words,
        ctx.neutral_words,
        ctx.assassin_words,
        ctx.revealed_words,
    );
    (system, user)
}

fn guesser_v1(ctx: &GuesserContext) -> (String, String) {
    let system = "You are a CODENAMES GUESSER.\n\
        You only see the board words and the spymaster's clue + number.\n\
        You must propose an ordered list of guesses (0 to MAX_ALLOWED guesses).\n\n\
        Guidelines:\n\
        - Guess only from the unrevealed board words.\n\
        - You may return fewer than MAX_ALLOWED guesses to stop early.\n\
        - Be cautious: if uncertain, stop rather than guessing randomly.\n\n\
        Return ONLY JSON that matches the provided schema."
        .to_string();

    let user = format!(
        "UNREVEALED WORDS: {}\nREVEALED WORDS: {}\n\n\
         CLUE: {}\nNUMBER: {}\nMAX_ALLOWED_GUESSES_THIS_TURN: {}\n\n\
         Provide the ordered list of guesses you would attempt now.",
        ctx.unrevealed, ctx.revealed, ctx.clue, ctx.number, ctx.max_allowed,
    );
    (system, user)
}

fn guesser_v2(ctx: &GuesserContext) -> (String, String) {
    let system = "You are a CODENAMES GUESSER (conservative stop policy).\n\
        Return an ordered list of guesses you would attempt now.\n\n\
        Rules:\n\
        - Only choose from the unrevealed words.\n\
        - Stop early unless you are confident.\n\
        - Prefer 1-2 high-confidence guesses over using the full limit.\n\n\
        Return ONLY JSON per schema."
        .to_string();

    let user = format!(
        "UNREVEALED: {}\nCLUE: {}  NUMBER: {}  MAX_ALLOWED: {}\nOutput guesses now.",
        ctx.unrevealed, ctx.clue, ctx.number, ctx.max_allowed,
    );
    (system, user)
}
