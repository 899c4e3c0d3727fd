//! The turn engine: everything one team does in one turn.
//!
//! Pipeline: generate K candidate clues, gate them through the legality
//! and number-range filters (falling back to a single safe candidate when
//! nothing survives), evaluate each survivor with G guesser rollouts
//! replayed on state copies, aggregate the rollout utilities into a
//! selection score, pick the winner, run the real guesser once and apply
//! its guesses to the live state.
//!
//! All LLM calls of one turn are independent and run as concurrent tasks;
//! the client's semaphore bounds how many are actually in flight. The live
//! state is only mutated at the very end, in APPLY.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::agent::config::AgentConfig;
use crate::agent::guesser::run_guesser;
use crate::agent::spymaster::{
    fallback_candidate, generate_candidates, Candidate, RejectedCandidate,
};
use crate::evaluation::aggregate::{aggregate_score, mean, pstdev};
use crate::evaluation::scoring::{turn_utility, UtilityWeights};
use crate::game::rules::{apply_turn, TurnOutcome};
use crate::game::state::GameState;
use crate::game::types::Team;
use crate::legality::{filter_legal_clues, filter_number_range};
use crate::llm::client::OpenAiResponsesClient;
use crate::Result;

/// One guesser rollout against a state copy.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvalSample {
    pub guesses: Vec<String>,
    pub confidences: Vec<f64>,
    pub outcome: TurnOutcome,
    pub utility: f64,
}

/// A candidate with its rollout statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateEvaluation {
    pub candidate: Candidate,
    pub samples: Vec<CandidateEvalSample>,
    pub mean_utility: f64,
    pub std_utility: f64,
    pub selection_score: f64,
}

/// Summary of the winning candidate for the turn log.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenCandidate {
    pub clue: String,
    pub number: u32,
    pub mean_utility: f64,
    pub std_utility: f64,
    pub selection_score: f64,
}

/// Full audit record of one team-turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnLog {
    pub team: Team,
    pub generated_candidates: usize,
    pub legal_candidates: usize,
    pub rejected_candidates: Vec<RejectedCandidate>,
    pub candidate_evaluations: Vec<CandidateEvaluation>,
    pub chosen: ChosenCandidate,
    pub actual_guesses: Vec<String>,
    pub actual_outcome: TurnOutcome,
}

/// Per-team turn orchestrator. Owns nothing mutable: the live state is
/// borrowed per turn, the client is shared.
pub struct TurnEngine {
    cfg: AgentConfig,
    client: Arc<OpenAiResponsesClient>,
    weights: UtilityWeights,
}

impl TurnEngine {
    pub fn new(cfg: AgentConfig, client: Arc<OpenAiResponsesClient>) -> Self {
        Self::with_weights(cfg, client, UtilityWeights::default())
    }

    pub fn with_weights(
        cfg: AgentConfig,
        client: Arc<OpenAiResponsesClient>,
        weights: UtilityWeights,
    ) -> Self {
        Self {
            cfg,
            client,
            weights,
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.cfg.name
    }

    /// Play one turn for `team`, mutating `state` through the rules engine
    /// at APPLY time only.
    pub async fn take_turn(&self, state: &mut GameState, team: Team) -> Result<TurnLog> {
        // GEN
        let (proposals, mut rejected) =
            generate_candidates(&self.cfg.spymaster, &self.client, state, team).await?;
        let generated_candidates = proposals.len();
        log::debug!(
            "{} generated {} candidates ({} rejected at generation)",
            team,
            generated_candidates,
            rejected.len()
        );

        // LEGAL: clue legality, then number range against the remaining count
        let (legal, rejected_legality) = filter_legal_clues(proposals, state.words());
        rejected.extend(
            rejected_legality
                .into_iter()
                .map(|(c, r)| RejectedCandidate::from_candidate(c, r.to_string())),
        );

        let (mut final_legal, rejected_number) =
            filter_number_range(legal, state.remaining(team));
        rejected.extend(
            rejected_number
                .into_iter()
                .map(|(c, r)| RejectedCandidate::from_candidate(c, r.to_string())),
        );

        // FALLBACK
        if final_legal.is_empty() {
            let fallback = fallback_candidate(&self.cfg.spymaster, &self.client, state, team).await;
            log::warn!(
                "{} had no legal candidates, falling back to {} {}",
                team,
                fallback.clue,
                fallback.number.unwrap_or(1)
            );
            rejected.push(RejectedCandidate {
                clue: Some(fallback.clue.clone()),
                number: fallback.number,
                reason: "no_legal_candidates_fallback_used".to_string(),
                error: None,
                raw: fallback.raw.clone(),
            });
            final_legal.push(fallback);
        }
        let legal_candidates = final_legal.len();

        // EVAL: order-preserving truncation, then G rollouts per candidate
        let max_eval = match self.cfg.selection.max_eval_candidates {
            Some(n) if n > 0 => n.min(final_legal.len()),
            _ => final_legal.len(),
        };
        let eval_candidates = &final_legal[..max_eval];

        let evaluations: Vec<CandidateEvaluation> = join_all(
            eval_candidates
                .iter()
                .map(|cand| self.evaluate_candidate(state, team, cand)),
        )
        .await
        .into_iter()
        .collect::<Result<_>>()?;

        // PICK
        let best = &evaluations[pick_best(&evaluations)];
        let clue = best.candidate.clue.clone();
        let number = best.candidate.number.unwrap_or(1) as u32;
        let chosen = ChosenCandidate {
            clue: clue.clone(),
            number,
            mean_utility: best.mean_utility,
            std_utility: best.std_utility,
            selection_score: best.selection_score,
        };
        log::info!(
            "{} chose clue {} {} (score {:.3} over {} candidates)",
            team,
            chosen.clue,
            chosen.number,
            chosen.selection_score,
            evaluations.len()
        );

        // PLAY: the real guesser, at the agent's guesser temperature
        let guess_set = run_guesser(
            &self.cfg.guesser,
            &self.client,
            state,
            &clue,
            number,
            self.cfg.guesser.temperature,
            self.cfg.guesser.top_p,
        )
        .await?;

        // APPLY
        let actual_outcome = apply_turn(state, team, &clue, number, &guess_set.guesses);
        log::info!(
            "{} revealed {} card(s), stopped by {}",
            team,
            actual_outcome.applied.len(),
            actual_outcome.stopped_reason
        );

        Ok(TurnLog {
            team,
            generated_candidates,
            legal_candidates,
            rejected_candidates: rejected,
            candidate_evaluations: evaluations,
            chosen,
            actual_guesses: guess_set.guesses,
            actual_outcome,
        })
    }

    /// G rollouts of the guesser on copies of `state`, scored and reduced
    /// to a selection score. A rollout call failure aborts the turn.
    async fn evaluate_candidate(
        &self,
        state: &GameState,
        team: Team,
        candidate: &Candidate,
    ) -> Result<CandidateEvaluation> {
        let g = self.cfg.selection.eval_samples_per_candidate.max(1);
        let number = candidate.number.unwrap_or(1) as u32;

        let rollouts = (0..g).map(|_| async move {
            let guess_set = run_guesser(
                &self.cfg.guesser,
                &self.client,
                state,
                &candidate.clue,
                number,
                self.cfg.selection.eval_temperature,
                self.cfg.selection.eval_top_p,
            )
            .await?;

            let mut sim = state.copy();
            let outcome = apply_turn(&mut sim, team, &candidate.clue, number, &guess_set.guesses);
            let utility = turn_utility(&outcome, &self.weights);

            Ok(CandidateEvalSample {
                guesses: guess_set.guesses,
                confidences: guess_set.confidences,
                outcome,
                utility,
            })
        });

        let samples: Vec<CandidateEvalSample> =
            join_all(rollouts).await.into_iter().collect::<Result<_>>()?;

        let utilities: Vec<f64> = samples.iter().map(|s| s.utility).collect();
        let scored = if utilities.is_empty() {
            vec![0.0]
        } else {
            utilities
        };

        Ok(CandidateEvaluation {
            candidate: candidate.clone(),
            mean_utility: mean(&scored),
            std_utility: pstdev(&scored),
            selection_score: aggregate_score(
                &scored,
                self.cfg.selection.aggregate,
                self.cfg.selection.lambda_std,
            ),
            samples,
        })
    }
}

/// Index of the best evaluation: highest selection score, ties broken by
/// higher mean, then lower stdev, then earlier index.
pub fn pick_best(evaluations: &[CandidateEvaluation]) -> usize {
    let mut best = 0;
    for i in 1..evaluations.len() {
        if beats(&evaluations[i], &evaluations[best]) {
            best = i;
        }
    }
    best
}

fn beats(a: &CandidateEvaluation, b: &CandidateEvaluation) -> bool {
    match cmp_f64(a.selection_score, b.selection_score) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match cmp_f64(a.mean_utility, b.mean_utility) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => cmp_f64(a.std_utility, b.std_utility) == Ordering::Less,
        },
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
