// Update-handling error taxonomy.
//
// Absent records (unknown codeword, no active session) are not errors;
// they surface as Option::None and get a user-facing reply. Errors here
// are the genuinely unexpected cases.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum BotError {
    /// The session/cache store failed; the interaction is aborted.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Outbound delivery failed after any local recovery.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type BotResult<T> = Result<T, BotError>;
