//! Condition catalogs: the declarative scoring configuration.
//!
//! A catalog describes one anatomical module (ankle, knee, ...) as data: a
//! closed registry of recognised findings, a red-flag checklist, clinical
//! decision rules, and the condition definitions the scoring engine runs
//! against. Catalogs are YAML files loaded once at startup and validated
//! eagerly — a catalog that fails validation loads nothing, so a broken
//! condition definition can never silently narrow the differential.
//!
//! What used to be per-condition branching in the engine ("if achilles
//! rupture and Thompson positive, boost the score") is expressed here as an
//! explicit adjustment rule on the condition entry instead.

use crate::error::{ConfigError, ConfigResult};
use crate::rules::ClinicalRule;
use ddx_types::{Identifier, Label};
use std::collections::BTreeSet;
use std::path::Path;

/// A recognised finding in a module's registry: identifier plus the
/// human-readable label used when rendering supporting reasons.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FindingSpec {
    pub id: Identifier,
    pub label: Label,
}

/// One entry in a condition's weight mapping.
///
/// Entries are kept as an ordered list (not a map) so that supporting
/// reasons render in the order the catalog declares them.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WeightEntry {
    pub finding: Identifier,
    pub points: u32,
}

/// A deterministic post-hoc score adjustment.
///
/// When the trigger finding is positive, the base probability is multiplied
/// by `multiplier` and capped at `cap`. Rules apply sequentially in
/// declaration order; the global cap of 100 applies last. This models highly
/// specific findings — e.g. a positive Thompson test boosting an Achilles
/// rupture score by x1.3, capped at 95.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AdjustmentRule {
    pub trigger: Identifier,
    pub multiplier: f64,
    #[serde(default = "default_adjustment_cap")]
    pub cap: f64,
}

fn default_adjustment_cap() -> f64 {
    100.0
}

/// Treatment steps for a condition.
///
/// Most conditions carry a single fixed protocol. Some differ by phase
/// (acute vs chronic); those name the finding that selects the phase, so the
/// selection is explicit per-condition data rather than engine logic.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TreatmentProtocol {
    Fixed {
        steps: Vec<String>,
    },
    Phased {
        /// Finding whose positive value selects the chronic protocol.
        phase_finding: Identifier,
        acute: Vec<String>,
        chronic: Vec<String>,
    },
}

impl TreatmentProtocol {
    /// The phase-selector finding, when the protocol is phased.
    pub fn phase_finding(&self) -> Option<&Identifier> {
        match self {
            TreatmentProtocol::Fixed { .. } => None,
            TreatmentProtocol::Phased { phase_finding, .. } => Some(phase_finding),
        }
    }
}

/// A single candidate diagnosis definition.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConditionDefinition {
    pub id: Identifier,
    pub display_name: Label,
    /// Conditions requiring expedited referral review.
    #[serde(default)]
    pub urgent: bool,
    pub weights: Vec<WeightEntry>,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentRule>,
    pub treatment: TreatmentProtocol,
    /// Imaging suggestions surfaced with the recommendations.
    #[serde(default)]
    pub imaging: Vec<String>,
    /// Follow-up suggestions surfaced with the recommendations.
    #[serde(default)]
    pub follow_up: Vec<String>,
}

impl ConditionDefinition {
    /// Sum of all declared weights — the maximum achievable raw score.
    pub fn max_score(&self) -> u32 {
        self.weights.iter().map(|w| w.points).sum()
    }
}

/// A complete condition catalog for one anatomical module.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    /// Module display name, e.g. "Ankle".
    pub module: Label,
    /// Closed registry of recognised findings for this module.
    pub findings: Vec<FindingSpec>,
    /// Emergency-indicator checklist for the red-flag gate.
    #[serde(default)]
    pub red_flags: Vec<Label>,
    /// Clinical decision rules (e.g. Ottawa Ankle Rules).
    #[serde(default)]
    pub rules: Vec<ClinicalRule>,
    /// Condition definitions in declaration order. Order is significant:
    /// equal-probability candidates rank in this order.
    pub conditions: Vec<ConditionDefinition>,
}

impl Catalog {
    /// Parses and validates a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for malformed YAML or any validation failure;
    /// see [`Catalog::validate`].
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        tracing::info!(
            module = %catalog.module,
            conditions = catalog.conditions.len(),
            findings = catalog.findings.len(),
            "loaded condition catalog"
        );
        Ok(catalog)
    }

    /// Reads, parses, and validates a catalog from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_yaml(&contents)
    }

    /// Validates catalog invariants.
    ///
    /// Fails fast on the first problem found:
    /// - duplicate finding ids in the registry
    /// - duplicate condition ids
    /// - a condition with an empty weight mapping (its maximum score would
    ///   be undefined)
    /// - zero weights or duplicate weight entries
    /// - weights, adjustment triggers, or phase-selector findings that are
    ///   not in the registry (typos would otherwise score a silent zero)
    /// - adjustment multipliers that are not positive, or caps outside
    ///   (0, 100]
    /// - clinical-rule criteria referencing unregistered findings
    pub fn validate(&self) -> ConfigResult<()> {
        let mut registry: BTreeSet<&str> = BTreeSet::new();
        for spec in &self.findings {
            if !registry.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicateRegistryFinding(spec.id.clone()));
            }
        }

        let mut condition_ids: BTreeSet<&str> = BTreeSet::new();
        for condition in &self.conditions {
            if !condition_ids.insert(condition.id.as_str()) {
                return Err(ConfigError::DuplicateCondition(condition.id.clone()));
            }

            if condition.weights.is_empty() {
                return Err(ConfigError::EmptyWeights(condition.id.clone()));
            }

            let mut weighted: BTreeSet<&str> = BTreeSet::new();
            for entry in &condition.weights {
                if entry.points == 0 {
                    return Err(ConfigError::NonPositiveWeight {
                        condition: condition.id.clone(),
                        finding: entry.finding.clone(),
                    });
                }
                if !weighted.insert(entry.finding.as_str()) {
                    return Err(ConfigError::DuplicateWeight {
                        condition: condition.id.clone(),
                        finding: entry.finding.clone(),
                    });
                }
                if !registry.contains(entry.finding.as_str()) {
                    return Err(ConfigError::UnrecognisedFinding {
                        condition: condition.id.clone(),
                        finding: entry.finding.clone(),
                    });
                }
            }

            for adjustment in &condition.adjustments {
                if !registry.contains(adjustment.trigger.as_str()) {
                    return Err(ConfigError::UnrecognisedFinding {
                        condition: condition.id.clone(),
                        finding: adjustment.trigger.clone(),
                    });
                }
                if adjustment.multiplier <= 0.0 {
                    return Err(ConfigError::InvalidAdjustmentMultiplier {
                        condition: condition.id.clone(),
                        multiplier: adjustment.multiplier,
                    });
                }
                if adjustment.cap <= 0.0 || adjustment.cap > 100.0 {
                    return Err(ConfigError::InvalidAdjustmentCap {
                        condition: condition.id.clone(),
                        cap: adjustment.cap,
                    });
                }
            }

            if let Some(phase_finding) = condition.treatment.phase_finding() {
                if !registry.contains(phase_finding.as_str()) {
                    return Err(ConfigError::UnrecognisedFinding {
                        condition: condition.id.clone(),
                        finding: phase_finding.clone(),
                    });
                }
            }
        }

        for rule in &self.rules {
            for criterion in &rule.criteria {
                if !registry.contains(criterion.finding.as_str()) {
                    return Err(ConfigError::UnrecognisedRuleFinding {
                        rule: rule.name.to_string(),
                        finding: criterion.finding.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Looks up a condition by id.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCondition` for ids not in this catalog.
    pub fn condition(&self, id: &Identifier) -> ConfigResult<&ConditionDefinition> {
        self.conditions
            .iter()
            .find(|c| c.id == *id)
            .ok_or_else(|| ConfigError::UnknownCondition(id.clone()))
    }

    /// The display label for a registered finding, if known.
    pub fn finding_label(&self, id: &str) -> Option<&Label> {
        self.findings
            .iter()
            .find(|spec| spec.id.as_str() == id)
            .map(|spec| &spec.label)
    }
}
