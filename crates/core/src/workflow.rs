//! The assessment workflow.
//!
//! A workflow is composed from data — a condition catalog and a question
//! set — rather than subclassed per anatomical module. It stamps out
//! [`Session`] values that own all mutable per-assessment state (mode,
//! current step, recorded findings, the red-flag gate); the engine functions
//! themselves stay pure. Sessions are passed explicitly through each
//! transition; there is no ambient shared state, so concurrent sessions
//! need no locking.

use crate::catalog::Catalog;
use crate::differential::{rank_differential, DiagnosisCandidate, DEFAULT_RELEVANCE_THRESHOLD};
use crate::error::{ConfigResult, SessionError, SessionResult};
use crate::finding::{FindingValue, Findings};
use crate::red_flags::{AssessmentMode, GateDisposition, RedFlagGate};
use crate::rules::{evaluate_rules, RuleOutcome};
use ddx_types::{Identifier, Label};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The linear steps of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentStep {
    RedFlags,
    Interview,
    PhysicalExam,
    ClinicalRules,
    Diagnosis,
    Complete,
}

impl AssessmentStep {
    fn next(self) -> Self {
        match self {
            AssessmentStep::RedFlags => AssessmentStep::Interview,
            AssessmentStep::Interview => AssessmentStep::PhysicalExam,
            AssessmentStep::PhysicalExam => AssessmentStep::ClinicalRules,
            AssessmentStep::ClinicalRules => AssessmentStep::Diagnosis,
            AssessmentStep::Diagnosis | AssessmentStep::Complete => AssessmentStep::Complete,
        }
    }
}

/// How a question is answered. The UI renders these; the core only cares
/// that answers land in the finding set under the question's id.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    YesNo,
    Scale {
        min: i32,
        max: i32,
    },
    Choice {
        options: Vec<QuestionOption>,
    },
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuestionOption {
    pub value: Identifier,
    pub text: Label,
}

/// One interview or examination question.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: Identifier,
    pub text: Label,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Question banks per audience. Patients get plain-language questions;
/// clinicians get the full interview and examination banks.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub clinician: Vec<Question>,
    #[serde(default)]
    pub patient: Vec<Question>,
}

impl QuestionSet {
    /// Parses a question set from YAML.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The bank matching the session mode.
    pub fn for_mode(&self, mode: AssessmentMode) -> &[Question] {
        match mode {
            AssessmentMode::Clinician => &self.clinician,
            AssessmentMode::Patient => &self.patient,
        }
    }
}

/// The full output of a diagnostic run.
///
/// `candidates` may be empty — that is the "insufficient data" outcome, a
/// normal value the caller must present explicitly rather than as a blank
/// screen. Red flags raised during the session travel alongside the
/// differential so clinician-mode results surface them prominently.
#[derive(Debug, Clone)]
pub struct DifferentialResult {
    pub candidates: Vec<DiagnosisCandidate>,
    pub red_flags: Vec<String>,
    pub rule_outcomes: Vec<RuleOutcome>,
}

impl DifferentialResult {
    /// True when no condition cleared the relevance threshold.
    pub fn is_insufficient_data(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The top-ranked candidate, if any.
    pub fn top(&self) -> Option<&DiagnosisCandidate> {
        self.candidates.first()
    }
}

/// An assessment workflow for one anatomical module.
///
/// Holds only shared read-only configuration; every mutable bit of state
/// lives in the [`Session`] values it creates.
#[derive(Debug, Clone)]
pub struct AssessmentWorkflow {
    catalog: Arc<Catalog>,
    questions: Arc<QuestionSet>,
}

impl AssessmentWorkflow {
    pub fn new(catalog: Catalog, questions: QuestionSet) -> Self {
        Self {
            catalog: Arc::new(catalog),
            questions: Arc::new(questions),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The question bank for the given mode.
    pub fn questions(&self, mode: AssessmentMode) -> &[Question] {
        self.questions.for_mode(mode)
    }

    /// Starts a new session at the red-flag step.
    pub fn begin(&self, mode: AssessmentMode) -> Session {
        Session {
            catalog: Arc::clone(&self.catalog),
            mode,
            step: AssessmentStep::RedFlags,
            findings: Findings::new(),
            gate: RedFlagGate::new(self.catalog.red_flags.clone()),
        }
    }
}

/// One diagnostic session: the single owner of mutable assessment state.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    mode: AssessmentMode,
    step: AssessmentStep,
    findings: Findings,
    gate: RedFlagGate,
}

impl Session {
    pub fn mode(&self) -> AssessmentMode {
        self.mode
    }

    pub fn step(&self) -> AssessmentStep {
        self.step
    }

    pub fn findings(&self) -> &Findings {
        &self.findings
    }

    pub fn gate(&self) -> &RedFlagGate {
        &self.gate
    }

    /// Reviews the red-flag checklist and returns the resulting disposition.
    pub fn review_red_flags(&mut self, checked: &BTreeSet<String>) -> GateDisposition {
        self.gate.review(checked);
        let disposition = self.gate.disposition(self.mode);
        if !matches!(disposition, GateDisposition::Halt { .. })
            && self.step == AssessmentStep::RedFlags
        {
            self.step = self.step.next();
        }
        disposition
    }

    /// Explicitly continues past a patient-mode red-flag halt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToOverride` when no flags are raised.
    pub fn override_red_flags(&mut self) -> SessionResult<()> {
        if !self.gate.override_and_continue() {
            return Err(SessionError::NothingToOverride);
        }
        if self.step == AssessmentStep::RedFlags {
            self.step = self.step.next();
        }
        Ok(())
    }

    /// Whether the session is halted by unoverridden red flags.
    pub fn is_halted(&self) -> bool {
        matches!(
            self.gate.disposition(self.mode),
            GateDisposition::Halt { .. }
        )
    }

    /// Records an observed finding.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::HaltedByRedFlags` while a patient-mode halt is
    /// in effect, and `SessionError::FindingAlreadyRecorded` when the
    /// finding was already observed — findings are append-only.
    pub fn record_finding(
        &mut self,
        id: Identifier,
        value: impl Into<FindingValue>,
    ) -> SessionResult<()> {
        if self.is_halted() {
            return Err(SessionError::HaltedByRedFlags);
        }
        self.findings.record(id, value)
    }

    /// Advances to the next assessment step.
    pub fn advance(&mut self) -> AssessmentStep {
        self.step = self.step.next();
        self.step
    }

    /// Runs the diagnostic engine over the session findings with the
    /// default relevance threshold.
    pub fn diagnose(&mut self) -> SessionResult<DifferentialResult> {
        self.diagnose_with_threshold(DEFAULT_RELEVANCE_THRESHOLD)
    }

    /// Runs the diagnostic engine with a caller-chosen threshold (display
    /// layers sometimes filter harder, e.g. at 20).
    pub fn diagnose_with_threshold(&mut self, threshold: f64) -> SessionResult<DifferentialResult> {
        if self.is_halted() {
            return Err(SessionError::HaltedByRedFlags);
        }

        let candidates = rank_differential(&self.findings, &self.catalog, threshold);
        let rule_outcomes = evaluate_rules(&self.findings, &self.catalog);
        self.step = AssessmentStep::Complete;

        Ok(DifferentialResult {
            candidates,
            red_flags: self.gate.flagged_items().to_vec(),
            rule_outcomes,
        })
    }

    /// Exports the recorded findings as JSON for persistence collaborators.
    pub fn export_findings_json(&self) -> SessionResult<String> {
        self.findings.to_json()
    }
}
