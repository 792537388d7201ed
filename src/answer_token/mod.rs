//! Answer-token protocol.
//!
//! | Module    | Purpose |
//! |-----------|---------|
//! | `answer`  | `CanonicalAnswer` tagged union, normalisation, numeric formatting |
//! | `context` | `CryptoContext`: raw HMAC secret + Argon2id-derived encryption key |
//! | `codec`   | `issue` / `verify` and the opaque `AnswerToken` |
//! | `error`   | `TokenError` |
//!
//! Issuing encrypts the canonical answer and signs the whole payload; the
//! client only ever sees the opaque token. Verification needs nothing but the
//! token and the context, so any process holding the same secret can check
//! an answer.

pub mod answer;
pub mod codec;
pub mod context;
pub mod error;

pub use answer::{format_number, normalize, CanonicalAnswer};
pub use codec::{issue, verify, AnswerToken};
pub use context::{CryptoContext, KdfParams};
pub use error::TokenError;
