//! Call-signaling error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoipError {
    /// The payload violates the call-signaling wire format.
    ///
    /// The string names the invariant that failed (missing field,
    /// contradictory action/payload pairing, invalid SDP type, ...).
    #[error("malformed call message: {0}")]
    BadMessage(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoipError {
    pub fn bad_message(cause: impl Into<String>) -> Self {
        Self::BadMessage(cause.into())
    }

    /// Whether this error reports a malformed payload rather than a sink failure.
    pub fn is_bad_message(&self) -> bool {
        matches!(self, Self::BadMessage(_))
    }
}

impl From<serde_json::Error> for VoipError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::BadMessage(format!("invalid json: {err}"))
        }
    }
}

pub type Result<T, E = VoipError> = std::result::Result<T, E>;
