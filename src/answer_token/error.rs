use thiserror::Error;

/// Failures inside the answer-token codec.
///
/// `issue` surfaces these to the caller. `verify` only uses them to log why
/// a token was rejected before collapsing them to `false`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token must have exactly two '.'-separated segments")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("base64 decode failed: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MAC key rejected")]
    MacKey,

    #[error("encrypted answer is shorter than a nonce")]
    Truncated,

    #[error("answer encryption failed")]
    Encrypt,

    #[error("answer decryption failed")]
    Decrypt,

    #[error("decrypted answer is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),

    #[error("numeric answer must be finite, got {0}")]
    NonFiniteAnswer(f64),
}

pub type Result<T> = std::result::Result<T, TokenError>;
