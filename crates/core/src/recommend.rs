//! Treatment and referral resolution.
//!
//! Given a scored candidate, this module derives the treatment steps,
//! imaging and follow-up suggestions, and the referral disposition. Referral
//! urgency is decided by a fixed priority order in which emergency red-flag
//! findings are checked first, so they override whatever the top condition's
//! own urgency tier would say.

use crate::catalog::{Catalog, ConditionDefinition, TreatmentProtocol};
use crate::differential::DiagnosisCandidate;
use crate::error::ConfigResult;
use crate::finding::Findings;

/// Finding identifiers that force an emergency-department referral when
/// positive, regardless of the top-ranked condition.
pub const REFERRAL_RED_FLAGS: [&str; 2] = ["cannot_weight_bear", "severe_deformation"];

/// Urgency tier of a referral recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralUrgency {
    /// Immediate emergency-department presentation.
    Emergency,
    /// Expedited specialist review.
    Urgent,
    /// Routine review within a bounded window.
    Routine,
}

/// A referral recommendation with its urgency tier.
#[derive(Debug, Clone, PartialEq)]
pub struct Referral {
    pub urgency: ReferralUrgency,
    pub message: String,
}

/// Everything the resolver derives for a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    pub treatment: Vec<String>,
    pub referral: Option<Referral>,
    pub imaging: Vec<String>,
    pub follow_up: Vec<String>,
}

/// Selects the treatment steps for a condition.
///
/// Phased protocols pick acute or chronic using the condition's declared
/// phase-selector finding; absent or negative selector means acute.
pub fn treatment_steps(condition: &ConditionDefinition, findings: &Findings) -> Vec<String> {
    match &condition.treatment {
        TreatmentProtocol::Fixed { steps } => steps.clone(),
        TreatmentProtocol::Phased {
            phase_finding,
            acute,
            chronic,
        } => {
            if findings.is_positive(phase_finding.as_str()) {
                chronic.clone()
            } else {
                acute.clone()
            }
        }
    }
}

/// Evaluates the referral policy for a condition at a given probability.
///
/// Priority order, first match wins:
/// 1. any emergency red-flag finding positive — emergency department,
///    independent of the condition's own urgency (property of the policy:
///    a low-urgency top condition still yields an emergency referral)
/// 2. condition flagged urgent with probability above 70 — urgent referral
/// 3. grade-II-pattern condition id with probability above 60 — routine
///    consultation within a week
/// 4. otherwise no referral
pub fn assess_referral(
    condition: &ConditionDefinition,
    probability: f64,
    findings: &Findings,
) -> Option<Referral> {
    if REFERRAL_RED_FLAGS
        .iter()
        .any(|flag| findings.is_positive(flag))
    {
        return Some(Referral {
            urgency: ReferralUrgency::Emergency,
            message: "Emergency department referral".to_owned(),
        });
    }

    if condition.urgent && probability > 70.0 {
        return Some(Referral {
            urgency: ReferralUrgency::Urgent,
            message: "Urgent orthopaedic referral".to_owned(),
        });
    }

    if condition.id.as_str().ends_with("grade_2") && probability > 60.0 {
        return Some(Referral {
            urgency: ReferralUrgency::Routine,
            message: "Orthopaedic consultation within one week".to_owned(),
        });
    }

    None
}

/// Resolves the full recommendation set for a ranked candidate.
///
/// # Errors
///
/// Returns `ConfigError::UnknownCondition` if the candidate's condition id
/// is not in the catalog — candidates must come from the same catalog they
/// are resolved against.
pub fn resolve_recommendations(
    candidate: &DiagnosisCandidate,
    catalog: &Catalog,
    findings: &Findings,
) -> ConfigResult<Recommendations> {
    let condition = catalog.condition(&candidate.condition_id)?;

    Ok(Recommendations {
        treatment: treatment_steps(condition, findings),
        referral: assess_referral(condition, candidate.probability, findings),
        imaging: condition.imaging.clone(),
        follow_up: condition.follow_up.clone(),
    })
}
