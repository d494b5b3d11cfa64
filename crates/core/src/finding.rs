//! Finding sets: the flat mapping of observed clinical facts.
//!
//! A finding is an identifier paired with an observed value — predominantly
//! boolean ("present/absent"), occasionally numeric (pain intensity 0-10) or
//! textual. Findings are produced once per diagnostic session and are
//! immutable once recorded; later assessment steps only add new findings.

use crate::error::{SessionError, SessionResult};
use ddx_types::Identifier;
use std::collections::BTreeMap;

/// An observed value for a single finding.
///
/// A single truthiness rule applies everywhere a finding contributes to a
/// score: `true` booleans, non-zero numbers, and non-empty text are positive.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FindingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FindingValue {
    /// Whether this value counts as a positive (present) finding.
    pub fn is_positive(&self) -> bool {
        match self {
            FindingValue::Bool(b) => *b,
            FindingValue::Number(n) => *n != 0.0,
            FindingValue::Text(s) => !s.is_empty(),
        }
    }
}

impl From<bool> for FindingValue {
    fn from(value: bool) -> Self {
        FindingValue::Bool(value)
    }
}

impl From<f64> for FindingValue {
    fn from(value: f64) -> Self {
        FindingValue::Number(value)
    }
}

impl From<i32> for FindingValue {
    fn from(value: i32) -> Self {
        FindingValue::Number(f64::from(value))
    }
}

impl From<&str> for FindingValue {
    fn from(value: &str) -> Self {
        FindingValue::Text(value.to_owned())
    }
}

/// An append-only set of recorded findings for one diagnostic session.
///
/// Scoring treats this as a read-only snapshot; all mutation happens through
/// [`record`](Findings::record), which refuses to overwrite an existing
/// finding. Findings a condition does not weight are simply ignored by the
/// scoring engine — recording extra facts is always safe.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Findings {
    entries: BTreeMap<Identifier, FindingValue>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new finding.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::FindingAlreadyRecorded` if the finding has
    /// already been recorded — findings are immutable once observed.
    pub fn record(&mut self, id: Identifier, value: impl Into<FindingValue>) -> SessionResult<()> {
        if self.entries.contains_key(&id) {
            return Err(SessionError::FindingAlreadyRecorded(id));
        }
        self.entries.insert(id, value.into());
        Ok(())
    }

    /// Returns the recorded value for a finding, if any.
    pub fn get(&self, id: &str) -> Option<&FindingValue> {
        self.entries.get(id)
    }

    /// Whether the finding is recorded and positive.
    pub fn is_positive(&self, id: &str) -> bool {
        self.get(id).is_some_and(FindingValue::is_positive)
    }

    /// Number of positive findings across the entire set.
    ///
    /// This feeds the evidence-coverage confidence heuristic.
    pub fn positive_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_positive()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all recorded findings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Identifier, &FindingValue)> {
        self.entries.iter()
    }

    /// Exports the recorded findings as pretty-printed JSON.
    ///
    /// Intended for hand-off to persistence or reporting collaborators; the
    /// core itself never stores anything.
    pub fn to_json(&self) -> SessionResult<String> {
        serde_json::to_string_pretty(&self.entries).map_err(SessionError::FindingsSerialization)
    }
}

impl FromIterator<(Identifier, FindingValue)> for Findings {
    fn from_iter<T: IntoIterator<Item = (Identifier, FindingValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
