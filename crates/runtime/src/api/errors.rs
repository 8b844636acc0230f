//! Unified error types surfaced by the runtime API.
use combat_core::{CombatError, ErrorSeverity, SetupError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("tick interval must be positive")]
    ZeroTickInterval,

    #[error("battle still running after {ticks} ticks")]
    TickBudgetExhausted { ticks: u64 },
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(err) => err.severity(),
            Self::ZeroTickInterval => ErrorSeverity::Validation,
            Self::TickBudgetExhausted { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(err) => err.error_code(),
            Self::ZeroTickInterval => "RUNTIME_ZERO_TICK",
            Self::TickBudgetExhausted { .. } => "RUNTIME_TICK_BUDGET",
        }
    }
}
