//! The red-flag gate.
//!
//! Before any interview or scoring, the workflow presents a fixed checklist
//! of emergency indicators (visible deformity, open wound, pulselessness,
//! and so on, per module catalog). Any checked item moves the gate from
//! `Clear` to `Flagged` — terminal within the session. What happens next
//! depends on who is assessing: patient mode halts with an emergency-care
//! message unless the user explicitly overrides (the override is logged,
//! never silent); clinician mode is advisory and the flags travel alongside
//! the differential instead.
//!
//! The gate is orthogonal to scoring: flagged items never feed probability.

use ddx_types::Label;
use std::collections::BTreeSet;

/// Who is running the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentMode {
    Clinician,
    Patient,
}

/// Result of the functional red-flag check.
#[derive(Debug, Clone, PartialEq)]
pub struct RedFlagReport {
    pub flagged: bool,
    /// The checked items, in checklist order where known.
    pub items: Vec<String>,
}

/// Checks a set of ticked checklist items.
///
/// Any non-empty set flags. Items are reported verbatim; the caller's
/// checklist is authoritative.
pub fn check_red_flags(checked_items: &BTreeSet<String>) -> RedFlagReport {
    RedFlagReport {
        flagged: !checked_items.is_empty(),
        items: checked_items.iter().cloned().collect(),
    }
}

/// Gate state: `Clear` until any checklist item is ticked, then `Flagged`
/// for the rest of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Clear,
    Flagged {
        items: Vec<String>,
        /// Set when a patient explicitly chose to continue despite the
        /// flags. Recorded, never implied.
        overridden: bool,
    },
}

/// What the workflow should do after reviewing the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDisposition {
    /// No flags raised; continue normally.
    Proceed,
    /// Patient mode with unoverridden flags: stop and present this message.
    Halt { message: String },
    /// Clinician mode with flags: continue, but surface these prominently.
    Advisory { items: Vec<String> },
}

/// The per-session red-flag gate.
#[derive(Debug, Clone)]
pub struct RedFlagGate {
    checklist: Vec<Label>,
    state: GateState,
}

impl RedFlagGate {
    /// Creates a gate for the given module checklist.
    pub fn new(checklist: Vec<Label>) -> Self {
        Self {
            checklist,
            state: GateState::Clear,
        }
    }

    /// The checklist to present to the user.
    pub fn checklist(&self) -> &[Label] {
        &self.checklist
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self.state, GateState::Flagged { .. })
    }

    /// Records the ticked checklist items.
    ///
    /// Items not on the checklist are ignored (the checklist is closed).
    /// Once flagged the gate stays flagged; reviewing again can only add
    /// items, and never resets a recorded override.
    pub fn review(&mut self, checked: &BTreeSet<String>) -> &GateState {
        // Checklist order is preserved: ticked items are collected by
        // walking the checklist, not the caller's set.
        let ticked: Vec<String> = self
            .checklist
            .iter()
            .filter(|item| checked.contains(item.as_str()))
            .map(|item| item.to_string())
            .collect();

        if let GateState::Flagged { items, .. } = &mut self.state {
            for item in ticked {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        } else if !ticked.is_empty() {
            self.state = GateState::Flagged {
                items: ticked,
                overridden: false,
            };
        }

        &self.state
    }

    /// How the workflow should proceed for the given mode.
    pub fn disposition(&self, mode: AssessmentMode) -> GateDisposition {
        match &self.state {
            GateState::Clear => GateDisposition::Proceed,
            GateState::Flagged { items, overridden } => match mode {
                AssessmentMode::Clinician => GateDisposition::Advisory {
                    items: items.clone(),
                },
                AssessmentMode::Patient => {
                    if *overridden {
                        GateDisposition::Advisory {
                            items: items.clone(),
                        }
                    } else {
                        GateDisposition::Halt {
                            message:
                                "Red flags detected. Seek urgent medical care or go to the emergency department."
                                    .to_owned(),
                        }
                    }
                }
            },
        }
    }

    /// Records an explicit decision to continue despite raised flags.
    ///
    /// Returns `false` (and does nothing) when no flags are raised. The
    /// override is logged so it is never silent.
    pub fn override_and_continue(&mut self) -> bool {
        match &mut self.state {
            GateState::Clear => false,
            GateState::Flagged { items, overridden } => {
                *overridden = true;
                tracing::warn!(
                    items = ?items,
                    "red-flag halt explicitly overridden; assessment continues"
                );
                true
            }
        }
    }

    /// The raised items, empty when clear.
    pub fn flagged_items(&self) -> &[String] {
        match &self.state {
            GateState::Clear => &[],
            GateState::Flagged { items, .. } => items,
        }
    }
}
