//! Reduction of rollout utilities to a single selection score.
//!
//! The aggregation mode encodes the agent's risk attitude:
//! - `mean`: risk-neutral
//! - `mean_minus_lambda_std`: penalise high-variance clues
//! - `p10`: judge a clue by its near-worst-case rollout

use serde::Deserialize;

/// Selection-score aggregation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    Mean,
    #[default]
    MeanMinusLambdaStd,
    P10,
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two samples.
pub fn pstdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Reduce a sample of utilities to the selection score. An empty sample is
/// treated as the single utility 0.0.
pub fn aggregate_score(utilities: &[f64], mode: AggregateMode, lambda_std: f64) -> f64 {
    let utilities = if utilities.is_empty() {
        &[0.0][..]
    } else {
        utilities
    };

    match mode {
        AggregateMode::Mean => mean(utilities),
        AggregateMode::MeanMinusLambdaStd => mean(utilities) - lambda_std * pstdev(utilities),
        AggregateMode::P10 => {
            let mut sorted = utilities.to_vec();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let idx = (0.1 * (sorted.len() - 1) as f64).floor() as usize;
            sorted[idx]
        }
    }
}
