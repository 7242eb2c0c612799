use std::fmt::Display;

use crate::editing::{AnchorError, EditError};

/// Shown when a failure carries no message of its own
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Errors raised while setting up a stream. Failures of the stream itself are written into the
/// document instead.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StreamError {
    #[error(transparent)]
    Anchor(#[from] AnchorError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("Continuation prefix {0:?} must end in a single-byte character other than a line break")]
    InvalidPrefix(String),
}

/// Display text for any error, never empty
pub fn display_message<E: Display + ?Sized>(error: &E) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
