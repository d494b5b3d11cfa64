//! Differential ranking.
//!
//! Applies the scoring engine across a full condition catalog and produces
//! the ranked list of candidate diagnoses. An empty result means the
//! findings did not clear the relevance threshold for any condition —
//! "insufficient data", a normal outcome the caller must present as such.

use crate::catalog::Catalog;
use crate::finding::Findings;
use crate::recommend::{assess_referral, treatment_steps};
use crate::scoring::score_condition;
use ddx_types::{Identifier, Label};
use std::cmp::Ordering;

/// Default relevance threshold: conditions scoring at or below this
/// probability are excluded from the differential.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 10.0;

/// One ranked candidate diagnosis.
///
/// Created fresh on every ranking run and never persisted by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisCandidate {
    pub condition_id: Identifier,
    pub display_name: Label,
    /// Normalised score in [0, 100].
    pub probability: f64,
    /// Evidence-coverage heuristic in [0, 100].
    pub confidence: f64,
    /// One entry per positive weighted finding, in catalog declaration order.
    pub supporting_reasons: Vec<String>,
    pub treatment: Vec<String>,
    pub referral: Option<String>,
}

/// Ranks every catalog condition against the findings.
///
/// Conditions are included only when `probability > threshold`. The result
/// is sorted by descending probability; equal probabilities keep catalog
/// declaration order (the sort is stable). An empty vector means no
/// condition cleared the threshold — insufficient data, not an error.
pub fn rank_differential(
    findings: &Findings,
    catalog: &Catalog,
    threshold: f64,
) -> Vec<DiagnosisCandidate> {
    let mut candidates: Vec<DiagnosisCandidate> = catalog
        .conditions
        .iter()
        .filter_map(|condition| {
            let score = score_condition(findings, condition);
            if score.probability <= threshold {
                return None;
            }

            Some(DiagnosisCandidate {
                condition_id: condition.id.clone(),
                display_name: condition.display_name.clone(),
                probability: score.probability,
                confidence: score.confidence,
                supporting_reasons: supporting_reasons(findings, catalog, condition),
                treatment: treatment_steps(condition, findings),
                referral: assess_referral(condition, score.probability, findings)
                    .map(|r| r.message),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });

    candidates
}

/// Renders the supporting reasons for a condition: one display string per
/// positive weighted finding, "label (weight: w)". Findings without a
/// registry label fall back to the raw identifier.
fn supporting_reasons(
    findings: &Findings,
    catalog: &Catalog,
    condition: &crate::catalog::ConditionDefinition,
) -> Vec<String> {
    condition
        .weights
        .iter()
        .filter(|entry| findings.is_positive(entry.finding.as_str()))
        .map(|entry| {
            let label = catalog
                .finding_label(entry.finding.as_str())
                .map(Label::as_str)
                .unwrap_or_else(|| entry.finding.as_str());
            format!("{} (weight: {})", label, entry.points)
        })
        .collect()
}
