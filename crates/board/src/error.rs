//! Error types for message board operations.

use thiserror::Error;

/// Failure reported by a [`crate::MessageStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// No further message ids can be handed out.
    #[error("Message ids exhausted")]
    IdsExhausted,
}

/// Main error type for page handlers.
///
/// Invalid form input is not an error: it comes back as
/// [`crate::AddOutcome::Invalid`] so the page can be shown again.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The message store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
