//! # DDX Catalogs
//!
//! Bundled condition catalogs and question banks for the diagnostic engine.
//! The YAML sources are compiled into the binary with `include_str!`, so a
//! deployment carries its clinical content without a data directory; the
//! loaders still run full catalog validation on every call.
//!
//! Sites that maintain their own catalogs can bypass this crate entirely and
//! use [`Catalog::from_file`] on their own YAML.

use ddx_core::{AssessmentWorkflow, Catalog, ConfigResult, QuestionSet};

const ANKLE_CATALOG: &str = include_str!("../catalogs/ankle.yaml");
const KNEE_CATALOG: &str = include_str!("../catalogs/knee.yaml");
const ANKLE_QUESTIONS: &str = include_str!("../catalogs/ankle_questions.yaml");
const KNEE_QUESTIONS: &str = include_str!("../catalogs/knee_questions.yaml");

/// Loads and validates the bundled ankle condition catalog.
///
/// # Errors
///
/// Returns a `ConfigError` if the bundled YAML fails validation; that only
/// happens when the bundled data itself is broken, so callers usually treat
/// it as fatal at startup.
pub fn ankle_catalog() -> ConfigResult<Catalog> {
    Catalog::from_yaml(ANKLE_CATALOG)
}

/// Loads and validates the bundled knee condition catalog.
///
/// # Errors
///
/// See [`ankle_catalog`].
pub fn knee_catalog() -> ConfigResult<Catalog> {
    Catalog::from_yaml(KNEE_CATALOG)
}

/// Loads the bundled ankle question banks.
///
/// # Errors
///
/// Returns a `ConfigError` for malformed YAML.
pub fn ankle_questions() -> ConfigResult<QuestionSet> {
    QuestionSet::from_yaml(ANKLE_QUESTIONS)
}

/// Loads the bundled knee question banks.
///
/// # Errors
///
/// Returns a `ConfigError` for malformed YAML.
pub fn knee_questions() -> ConfigResult<QuestionSet> {
    QuestionSet::from_yaml(KNEE_QUESTIONS)
}

/// An assessment workflow backed by the bundled ankle content.
///
/// # Errors
///
/// Returns a `ConfigError` if the bundled content fails to load.
pub fn ankle_workflow() -> ConfigResult<AssessmentWorkflow> {
    Ok(AssessmentWorkflow::new(ankle_catalog()?, ankle_questions()?))
}

/// An assessment workflow backed by the bundled knee content.
///
/// # Errors
///
/// Returns a `ConfigError` if the bundled content fails to load.
pub fn knee_workflow() -> ConfigResult<AssessmentWorkflow> {
    Ok(AssessmentWorkflow::new(knee_catalog()?, knee_questions()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddx_core::{rank_differential, AssessmentMode, Findings, TreatmentProtocol};
    use ddx_types::Identifier;
    use std::collections::BTreeSet;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).expect("valid identifier")
    }

    fn recorded(ids: &[&str]) -> Findings {
        let mut findings = Findings::new();
        for finding in ids {
            findings.record(id(finding), true).expect("records");
        }
        findings
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_bundled_catalogs_pass_validation() {
        let ankle = ankle_catalog().expect("ankle catalog loads");
        assert_eq!(ankle.module.as_str(), "Ankle");
        assert_eq!(ankle.conditions.len(), 5);
        assert_eq!(ankle.rules.len(), 2);

        let knee = knee_catalog().expect("knee catalog loads");
        assert_eq!(knee.module.as_str(), "Knee");
        assert_eq!(knee.conditions.len(), 5);
        assert_eq!(knee.rules.len(), 1);
    }

    #[test]
    fn test_bundled_question_banks_load_for_both_modes() {
        let ankle = ankle_questions().expect("ankle questions load");
        assert!(!ankle.for_mode(AssessmentMode::Clinician).is_empty());
        assert!(!ankle.for_mode(AssessmentMode::Patient).is_empty());

        let knee = knee_questions().expect("knee questions load");
        assert!(!knee.for_mode(AssessmentMode::Clinician).is_empty());
        assert!(!knee.for_mode(AssessmentMode::Patient).is_empty());
    }

    #[test]
    fn test_grade_one_sprain_presentation() {
        // Classic mild inversion injury: 10 of 14 grade-I points positive.
        let catalog = ankle_catalog().expect("loads");
        let findings = recorded(&[
            "mechanism_inversion",
            "lateral_pain",
            "mild_swelling",
            "can_weight_bear",
        ]);

        let ranked = rank_differential(&findings, &catalog, 10.0);
        let top = ranked.first().expect("at least one candidate");
        assert_eq!(top.condition_id.as_str(), "lateral_ankle_sprain_grade_1");
        assert_close(top.probability, 100.0 * 10.0 / 14.0);
        assert!(top.referral.is_none());
        assert_eq!(top.supporting_reasons.len(), 4);
        assert!(top.treatment[0].starts_with("RICE"));
    }

    #[test]
    fn test_lone_thompson_test_is_adjusted() {
        // An isolated positive Thompson test: 8/27 raw, boosted x1.3.
        let catalog = ankle_catalog().expect("loads");
        let findings = recorded(&["thompson_positive"]);

        let ranked = rank_differential(&findings, &catalog, 10.0);
        let achilles = ranked
            .iter()
            .find(|c| c.condition_id.as_str() == "achilles_rupture")
            .expect("achilles rupture in differential");
        assert_close(achilles.probability, 100.0 * 8.0 / 27.0 * 1.3);
    }

    #[test]
    fn test_full_achilles_presentation_hits_the_cap() {
        let catalog = ankle_catalog().expect("loads");
        let findings = recorded(&[
            "thompson_positive",
            "posterior_pain",
            "pop_sensation",
            "palpable_gap",
            "heel_raise_impossible",
            "plantarflexion_weakness",
        ]);

        let ranked = rank_differential(&findings, &catalog, 10.0);
        let top = ranked.first().expect("candidate");
        assert_eq!(top.condition_id.as_str(), "achilles_rupture");
        assert_eq!(top.probability, 95.0);
        assert_eq!(top.referral.as_deref(), Some("Urgent orthopaedic referral"));
    }

    #[test]
    fn test_weight_bearing_failure_escalates_to_emergency() {
        // A severe sprain with inability to bear weight: the red-flag
        // finding outranks the condition's own urgency tier.
        let catalog = ankle_catalog().expect("loads");
        let findings = recorded(&[
            "mechanism_inversion",
            "lateral_pain",
            "severe_swelling",
            "cannot_weight_bear",
            "anterior_drawer_3",
            "talar_tilt_3",
        ]);

        let ranked = rank_differential(&findings, &catalog, 10.0);
        let top = ranked.first().expect("candidate");
        assert_eq!(top.condition_id.as_str(), "lateral_ankle_sprain_grade_3");
        assert_close(top.probability, 80.0);
        assert_eq!(
            top.referral.as_deref(),
            Some("Emergency department referral")
        );
    }

    #[test]
    fn test_ottawa_positive_presentation_triggers_radiography() {
        let workflow = ankle_workflow().expect("loads");
        let mut session = workflow.begin(AssessmentMode::Clinician);
        session.review_red_flags(&BTreeSet::new());
        session
            .record_finding(id("unable_to_bear_weight"), true)
            .expect("records");
        session
            .record_finding(id("tender_lateral_malleolus"), true)
            .expect("records");

        let result = session.diagnose().expect("diagnoses");
        let ottawa = result
            .rule_outcomes
            .iter()
            .find(|o| o.rule == "Ottawa Ankle Rules")
            .expect("ottawa outcome present");
        assert!(ottawa.positive);
        assert_eq!(ottawa.outcome, "Ankle radiography indicated");

        // The foot rule shares the weight-bearing criterion.
        let foot = result
            .rule_outcomes
            .iter()
            .find(|o| o.rule == "Ottawa Foot Rules")
            .expect("foot outcome present");
        assert!(foot.positive);
    }

    #[test]
    fn test_acl_presentation_ranks_first_in_knee() {
        let catalog = knee_catalog().expect("loads");
        let findings = recorded(&[
            "non_contact_pivot_mechanism",
            "pop_sensation",
            "immediate_swelling",
            "lachman_positive",
        ]);

        let ranked = rank_differential(&findings, &catalog, 10.0);
        let top = ranked.first().expect("candidate");
        assert_eq!(top.condition_id.as_str(), "acl_rupture");
        // 17/25 raw, urgent and above 70 -> urgent referral.
        assert_close(top.probability, 68.0);
        assert!(top.referral.is_none());
    }

    #[test]
    fn test_patellofemoral_treatment_follows_the_phase_selector() {
        let catalog = knee_catalog().expect("loads");
        let condition = catalog
            .condition(&id("patellofemoral_pain"))
            .expect("condition present");
        assert!(matches!(
            condition.treatment,
            TreatmentProtocol::Phased { .. }
        ));

        let chronic = recorded(&[
            "anterior_knee_pain",
            "stairs_difficulty",
            "patella_compression_positive",
            "chronic_onset",
        ]);
        let ranked = rank_differential(&chronic, &catalog, 10.0);
        let pfps = ranked
            .iter()
            .find(|c| c.condition_id.as_str() == "patellofemoral_pain")
            .expect("in differential");
        assert!(pfps.treatment[0].starts_with("Physiotherapy"));

        let acute = recorded(&[
            "anterior_knee_pain",
            "stairs_difficulty",
            "patella_compression_positive",
        ]);
        let ranked = rank_differential(&acute, &catalog, 10.0);
        let pfps = ranked
            .iter()
            .find(|c| c.condition_id.as_str() == "patellofemoral_pain")
            .expect("in differential");
        assert_eq!(pfps.treatment[0], "Relative rest and activity modification");
    }

    #[test]
    fn test_pittsburgh_rule_fires_on_age_criterion() {
        let workflow = knee_workflow().expect("loads");
        let mut session = workflow.begin(AssessmentMode::Clinician);
        session.review_red_flags(&BTreeSet::new());
        session.record_finding(id("age_criteria"), true).expect("records");

        let result = session.diagnose().expect("diagnoses");
        assert_eq!(result.rule_outcomes.len(), 1);
        assert!(result.rule_outcomes[0].positive);
        assert_eq!(result.rule_outcomes[0].outcome, "Knee radiography indicated");
    }

    #[test]
    fn test_question_ids_and_choice_values_are_registry_findings() {
        // Questions that share an id with a registry finding feed the scorer
        // directly; the rest (pain scales, mechanism pickers) are routed by
        // the UI. Every choice option that names a weighted finding must
        // exist in the registry, or the answer would score a silent zero.
        for (catalog, questions) in [
            (ankle_catalog().expect("loads"), ankle_questions().expect("loads")),
            (knee_catalog().expect("loads"), knee_questions().expect("loads")),
        ] {
            let weighted: BTreeSet<&str> = catalog
                .conditions
                .iter()
                .flat_map(|c| c.weights.iter().map(|w| w.finding.as_str()))
                .collect();
            let registry: BTreeSet<&str> =
                catalog.findings.iter().map(|f| f.id.as_str()).collect();

            for mode in [AssessmentMode::Clinician, AssessmentMode::Patient] {
                for question in questions.for_mode(mode) {
                    if weighted.contains(question.id.as_str()) {
                        assert!(registry.contains(question.id.as_str()));
                    }
                    if let ddx_core::workflow::QuestionKind::Choice { options } = &question.kind {
                        for option in options {
                            if weighted.contains(option.value.as_str()) {
                                assert!(
                                    registry.contains(option.value.as_str()),
                                    "option {} missing from registry",
                                    option.value
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}
