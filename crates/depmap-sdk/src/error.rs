//! Error types for the Depmap SDK.

use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// The server rejected a submission as invalid (re-prompt and retry)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session id is not known to the server; the interview must be
    /// restarted from identity submission
    #[error("Unknown session - restart the interview")]
    UnknownSession,

    /// Client and server cursors disagree; re-fetch authoritative state
    /// and retry
    #[error("Pair mismatch: {0}")]
    PairMismatch(String),

    /// Any other rejection reported by the server
    #[error("Server rejected request ({kind}): {message}")]
    Rejected {
        /// Machine-readable error kind from the server
        kind: String,
        /// Human-readable message from the server
        message: String,
    },

    /// Connection error (network, DNS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Server-side failure or unclassifiable HTTP error
    #[error("Server error: {0}")]
    Server(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// `answer` was called with no pair under the cursor
    #[error("No question is pending")]
    NoPendingQuestion,
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            SdkError::Connection(e.to_string())
        } else if e.is_decode() {
            SdkError::Decode(e.to_string())
        } else {
            SdkError::Server(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(e.to_string())
    }
}
