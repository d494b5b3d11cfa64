//! The scoring engine.
//!
//! Scores are a deterministic weighted-sum heuristic, not Bayesian
//! inference: a condition's probability is the share of its declared weight
//! budget covered by positive findings, and its confidence is an
//! evidence-coverage ratio. Both are 0-100. The functions here are pure —
//! no state, no I/O — and safe to call concurrently on shared inputs.

use crate::catalog::ConditionDefinition;
use crate::finding::Findings;

/// Result of scoring one condition against a finding set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    /// Sum of weights for positive findings.
    pub raw_score: u32,
    /// Sum of all declared weights for the condition.
    pub max_score: u32,
    /// Normalised score in [0, 100] after adjustment rules.
    pub probability: f64,
    /// Evidence-coverage heuristic in [0, 100].
    pub confidence: f64,
}

/// Scores a single condition.
///
/// `raw_score` sums the weights of the condition's findings that are
/// positive in the finding set; findings the condition does not weight are
/// ignored, and absent findings carry no penalty. The base probability
/// `raw / max * 100` is then passed through the condition's adjustment rules
/// in declaration order — each positive trigger multiplies the running
/// probability and applies its own cap — before the final cap at 100.
///
/// `confidence` is the ratio of positive findings across the entire set to
/// the number of findings this condition weights, capped at 100. It measures
/// how much evidence was available relative to what the condition expects —
/// deliberately not a statistical confidence interval.
///
/// The condition must come from a validated catalog (non-empty weights);
/// see [`crate::catalog::Catalog::validate`].
pub fn score_condition(findings: &Findings, condition: &ConditionDefinition) -> ScoreResult {
    let max_score = condition.max_score();

    let raw_score: u32 = condition
        .weights
        .iter()
        .filter(|entry| findings.is_positive(entry.finding.as_str()))
        .map(|entry| entry.points)
        .sum();

    let mut probability = if max_score == 0 {
        // Unreachable for validated catalogs; guards the division.
        0.0
    } else {
        (f64::from(raw_score) / f64::from(max_score)) * 100.0
    };

    for adjustment in &condition.adjustments {
        if findings.is_positive(adjustment.trigger.as_str()) {
            probability = (probability * adjustment.multiplier).min(adjustment.cap);
        }
    }
    let probability = probability.min(100.0);

    let expected = condition.weights.len().max(1);
    let confidence = ((findings.positive_count() as f64 / expected as f64) * 100.0).min(100.0);

    ScoreResult {
        raw_score,
        max_score,
        probability,
        confidence,
    }
}
