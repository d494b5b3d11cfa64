//! Clinical decision rules.
//!
//! Rules like the Ottawa Ankle Rules are screening instruments, not
//! diagnoses: any single met criterion makes the rule positive and triggers
//! its positive outcome text (typically an imaging indication). They run
//! alongside the differential and are surfaced with it, but contribute
//! nothing to condition probabilities.

use crate::catalog::Catalog;
use crate::finding::Findings;
use ddx_types::{Identifier, Label};

/// One criterion of a clinical decision rule.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RuleCriterion {
    pub description: String,
    pub finding: Identifier,
}

/// A clinical decision rule, e.g. "Ottawa Ankle Rules".
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClinicalRule {
    pub name: Label,
    pub description: String,
    pub criteria: Vec<RuleCriterion>,
    pub outcome_positive: String,
    pub outcome_negative: String,
    pub sensitivity: f64,
    pub specificity: f64,
}

/// Outcome of evaluating one rule against a finding set.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub rule: String,
    pub positive: bool,
    /// Outcome text matching the result.
    pub outcome: String,
    /// Descriptions of the criteria that were met.
    pub met_criteria: Vec<String>,
}

/// Evaluates every rule in the catalog against the findings.
///
/// A rule is positive when at least one criterion's finding is positive.
pub fn evaluate_rules(findings: &Findings, catalog: &Catalog) -> Vec<RuleOutcome> {
    catalog
        .rules
        .iter()
        .map(|rule| {
            let met_criteria: Vec<String> = rule
                .criteria
                .iter()
                .filter(|criterion| findings.is_positive(criterion.finding.as_str()))
                .map(|criterion| criterion.description.clone())
                .collect();

            let positive = !met_criteria.is_empty();
            RuleOutcome {
                rule: rule.name.to_string(),
                positive,
                outcome: if positive {
                    rule.outcome_positive.clone()
                } else {
                    rule.outcome_negative.clone()
                },
                met_criteria,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).expect("valid identifier")
    }

    fn catalog_with_ottawa_rule() -> Catalog {
        Catalog::from_yaml(
            r#"
module: Ankle
findings:
  - { id: unable_to_bear_weight, label: "Unable to bear weight for four steps" }
  - { id: tender_lateral_malleolus, label: "Tenderness over the distal fibula" }
  - { id: lateral_pain, label: "Lateral ankle pain" }
rules:
  - name: "Ottawa Ankle Rules"
    description: "Indications for ankle radiography"
    criteria:
      - description: "Unable to bear weight immediately and now"
        finding: unable_to_bear_weight
      - description: "Bone tenderness over the distal 6cm of the fibula"
        finding: tender_lateral_malleolus
    outcome_positive: "Ankle radiography indicated"
    outcome_negative: "Ankle radiography probably unnecessary"
    sensitivity: 0.99
    specificity: 0.40
conditions:
  - id: lateral_ankle_sprain_grade_1
    display_name: "Lateral ankle sprain - grade I"
    weights:
      - { finding: lateral_pain, points: 3 }
    treatment:
      steps: ["RICE protocol"]
"#,
        )
        .expect("valid catalog")
    }

    #[test]
    fn test_any_met_criterion_makes_rule_positive() {
        let catalog = catalog_with_ottawa_rule();
        let mut findings = Findings::new();
        findings.record(id("tender_lateral_malleolus"), true).expect("records");

        let outcomes = evaluate_rules(&findings, &catalog);
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].positive);
        assert_eq!(outcomes[0].outcome, "Ankle radiography indicated");
        assert_eq!(outcomes[0].met_criteria.len(), 1);
    }

    #[test]
    fn test_rule_negative_without_met_criteria() {
        let catalog = catalog_with_ottawa_rule();
        let mut findings = Findings::new();
        findings.record(id("lateral_pain"), true).expect("records");

        let outcomes = evaluate_rules(&findings, &catalog);
        assert!(!outcomes[0].positive);
        assert_eq!(outcomes[0].outcome, "Ankle radiography probably unnecessary");
        assert!(outcomes[0].met_criteria.is_empty());
    }
}
