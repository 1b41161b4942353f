use thiserror::Error;

use crate::types::TeamId;

/// Error type raised by a controller implementation. The engine wraps it in
/// [`BattleError::ControllerFault`] together with the offending team and
/// halts the battle without committing the rest of the turn.
pub type ControllerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("attribute budget exceeded for '{tag}': {total} points allocated, budget is {budget}")]
    AttributeBudgetExceeded {
        tag: String,
        total: u32,
        budget: u32,
    },

    #[error("invalid battle configuration: {0}")]
    Configuration(String),

    #[error("controller fault ({team}): {source}")]
    ControllerFault {
        team: TeamId,
        source: ControllerError,
    },
}

pub type Result<T> = std::result::Result<T, BattleError>;
