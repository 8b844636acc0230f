//! Common error infrastructure for combat-core.
//!
//! The simulation itself never fails: pool starvation, missing targets and
//! stale references are absorbed locally as no-ops. Errors only exist at the
//! setup boundary, where malformed stage or party input is rejected before
//! the first tick.

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input; rejecting it leaves no partial state behind.
    Validation,

    /// Unexpected inconsistency between collaborating inputs.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while assembling a [`crate::Battle`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("party must contain at least one member")]
    EmptyParty,

    #[error("party has {count} members, at most {max} may be fielded")]
    PartyTooLarge { count: usize, max: usize },

    #[error("stage '{stage}' has no playable waves")]
    EmptyStage { stage: String },

    #[error("party member '{member}' has non-positive max hp")]
    InvalidMemberHp { member: String },

    #[error("enemy template '{enemy}' has non-positive max hp")]
    InvalidEnemyHp { enemy: String },
}

impl CombatError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParty => "SETUP_EMPTY_PARTY",
            Self::PartyTooLarge { .. } => "SETUP_PARTY_TOO_LARGE",
            Self::EmptyStage { .. } => "SETUP_EMPTY_STAGE",
            Self::InvalidMemberHp { .. } => "SETUP_INVALID_MEMBER_HP",
            Self::InvalidEnemyHp { .. } => "SETUP_INVALID_ENEMY_HP",
        }
    }
}
