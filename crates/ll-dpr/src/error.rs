//! Error types for the DPR engine.

/// Errors that can occur while loading creatures or parsing dice.
#[derive(Debug, thiserror::Error)]
pub enum LoreError {
    /// A dice expression could not be parsed.
    #[error("invalid dice expression '{expr}': {reason}")]
    InvalidDice {
        /// The expression as written.
        expr: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A creature looked up by name does not exist in the bestiary.
    #[error("unknown creature: {0}")]
    UnknownCreature(String),

    /// The bestiary JSON is malformed.
    #[error("invalid bestiary: {0}")]
    InvalidBestiary(#[from] serde_json::Error),

    /// A group of creatures was empty where at least one was required.
    #[error("empty group: {0}")]
    EmptyGroup(String),
}

/// Convenience result type for DPR operations.
pub type LoreResult<T> = Result<T, LoreError>;
