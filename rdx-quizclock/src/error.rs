//! The error taxonomy surfaced by the Quizclock engine.
//!
//! Only errors a caller can act on are represented here. Corrupt leaderboard
//! storage and stale timer or answer events are recovered inside the engine
//! and never reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    /// The question set is empty, so no quiz can be rendered.
    #[error("the question bank is empty")]
    EmptyQuestionBank,

    /// A question record failed validation while building the bank.
    #[error("question #{index} is malformed: {reason}")]
    MalformedQuestion { index: usize, reason: String },

    /// A player name was empty or longer than the allowed length.
    #[error("player name must be 1 to {max} characters, got {len}")]
    InvalidName { len: usize, max: usize },

    /// `CountdownTimer::start` was called while the timer was still ticking.
    #[error("countdown timer is already running")]
    TimerAlreadyRunning,

    /// A duration or interval that must be positive was zero.
    #[error("{field} must be greater than zero")]
    InvalidDuration { field: &'static str },

    /// The configuration sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl QuizError {
    /// Returns `true` for configuration errors that prevent a quiz from ever starting.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QuizError::EmptyQuestionBank
                | QuizError::MalformedQuestion { .. }
                | QuizError::InvalidDuration { .. }
                | QuizError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
