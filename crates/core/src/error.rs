use ddx_types::Identifier;

/// Errors raised while loading or validating a condition catalog.
///
/// All of these are fatal: a catalog that fails validation loads nothing, so
/// a broken condition definition can never produce a plausible-looking but
/// wrong differential.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read catalog file: {0}")]
    FileRead(std::io::Error),
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("condition '{0}' declares an empty weight mapping")]
    EmptyWeights(Identifier),
    #[error("condition '{condition}' declares a zero weight for finding '{finding}'")]
    NonPositiveWeight {
        condition: Identifier,
        finding: Identifier,
    },
    #[error("duplicate condition id '{0}'")]
    DuplicateCondition(Identifier),
    #[error("condition '{condition}' lists finding '{finding}' more than once")]
    DuplicateWeight {
        condition: Identifier,
        finding: Identifier,
    },
    #[error("duplicate finding '{0}' in the catalog finding registry")]
    DuplicateRegistryFinding(Identifier),
    #[error("condition '{condition}' references finding '{finding}' which is not in the catalog finding registry")]
    UnrecognisedFinding {
        condition: Identifier,
        finding: Identifier,
    },
    #[error("clinical rule '{rule}' references finding '{finding}' which is not in the catalog finding registry")]
    UnrecognisedRuleFinding { rule: String, finding: Identifier },
    #[error("condition '{condition}' declares an adjustment with multiplier {multiplier}; multipliers must be positive")]
    InvalidAdjustmentMultiplier {
        condition: Identifier,
        multiplier: f64,
    },
    #[error("condition '{condition}' declares an adjustment with cap {cap}; caps must be in (0, 100]")]
    InvalidAdjustmentCap { condition: Identifier, cap: f64 },
    #[error("unknown condition id '{0}'")]
    UnknownCondition(Identifier),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised by the assessment workflow.
///
/// These signal misuse of a session, not clinical outcomes: an empty
/// differential is a normal return value, never an error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("finding '{0}' has already been recorded in this session")]
    FindingAlreadyRecorded(Identifier),
    #[error("session is halted by red flags; the patient must override explicitly to continue")]
    HaltedByRedFlags,
    #[error("red-flag override requested but no red flags are raised")]
    NothingToOverride,
    #[error("failed to serialize findings: {0}")]
    FindingsSerialization(serde_json::Error),
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;
