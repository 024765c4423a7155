//! Error taxonomy for the protocol engine
//!
//! Validation failures are not errors; they are a [`SubmitResult::Rejected`]
//! outcome carrying the unchanged instruction so the caller can retry.
//! Everything here is fatal for the current call and leaves the previously
//! persisted session untouched.
//!
//! [`SubmitResult::Rejected`]: crate::types::SubmitResult::Rejected

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A session cannot be started without a problem statement
    #[error("problem statement must not be empty")]
    EmptyProblem,

    /// The session id does not resolve to a persisted document
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session already validated step 60 and is read-only
    #[error("session {0} is already completed")]
    SessionCompleted(String),

    /// The instruction provider failed; no partial state was committed
    #[error("instruction provider failed for step {step}")]
    Provider {
        step: u32,
        #[source]
        source: anyhow::Error,
    },

    /// The session store failed; no partial state was committed
    #[error("session store failure")]
    Storage(#[source] anyhow::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
