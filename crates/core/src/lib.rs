//! # DDX Core
//!
//! Diagnostic scoring and differential-diagnosis engine for musculoskeletal
//! injury assessment.
//!
//! The engine maps a flat set of clinical findings (interview answers and
//! physical test results) onto a ranked differential diagnosis with
//! probability and confidence scores, supporting reasons, treatment
//! protocols, and referral urgency. Scoring is a deterministic weighted-sum
//! heuristic driven entirely by declarative per-module condition catalogs —
//! there is no per-condition branching in the engine itself.
//!
//! The core is a pure in-process library: it performs no I/O beyond loading
//! catalog files at startup, owns no long-lived state, and is safe to call
//! concurrently on shared read-only inputs. UI rendering, session
//! persistence, and static content banks are external collaborators.
//!
//! **No API concerns**: HTTP servers, storage schemas, or service interfaces
//! belong to the surrounding system, not this crate.

pub mod catalog;
pub mod differential;
pub mod error;
pub mod finding;
pub mod recommend;
pub mod red_flags;
pub mod rules;
pub mod scoring;
pub mod workflow;

pub use catalog::{AdjustmentRule, Catalog, ConditionDefinition, TreatmentProtocol, WeightEntry};
pub use differential::{rank_differential, DiagnosisCandidate, DEFAULT_RELEVANCE_THRESHOLD};
pub use error::{ConfigError, ConfigResult, SessionError, SessionResult};
pub use finding::{FindingValue, Findings};
pub use recommend::{
    resolve_recommendations, Recommendations, Referral, ReferralUrgency, REFERRAL_RED_FLAGS,
};
pub use red_flags::{check_red_flags, AssessmentMode, GateDisposition, RedFlagGate, RedFlagReport};
pub use rules::{evaluate_rules, ClinicalRule, RuleOutcome};
pub use scoring::{score_condition, ScoreResult};
pub use workflow::{AssessmentWorkflow, DifferentialResult, QuestionSet, Session};
