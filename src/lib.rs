//! # adaptive_practice
//!
//! A stateless maths practice problem generator with tamper-proof answer tokens.
//!
//! Each call produces a randomised problem for one curriculum topic: the text
//! to show, a worked list of hint steps, and an opaque token that holds the
//! encrypted correct answer. The server keeps no per-problem state; checking a
//! learner's answer only needs the token and the process secret.
//!
//! ## How it works
//!
//! 1. Load a [`CodecConfig`] (`HMAC_SECRET` plus optional KDF cost settings)
//!    and derive a [`CryptoContext`] once at start-up.
//! 2. Build a [`ProblemRequest`] with a topic, level, language and optional
//!    [`SelectionConstraints`] (mastered variations to skip, hide concept
//!    questions).
//! 3. Call [`generate`]. The engine picks a variation from the level's pool,
//!    draws numbers, writes bilingual text, and seals the canonical answer
//!    with [`issue`].
//! 4. When the learner answers, call [`verify`] with their raw input and the
//!    token. Forged or malformed tokens simply verify as `false`.
//!
//! ## Key features
//!
//! - **Deterministic**: `rng_seed: Some(u64)` reproduces the same problem text,
//!   hints and variation. Token bytes still differ because every token gets a
//!   fresh nonce.
//! - **Adaptive**: a learner who hides concept questions and has excluded a
//!   topic's foundational variation is served the next level up.
//! - **Variation keys**: every problem reports the `variation_key` it was
//!   built from; [`generate_by_variation`] asks for that sub-skill again.
//!
//! ## Quick start
//!
//! ```rust
//! use adaptive_practice::{
//!     generate, verify, CryptoContext, KdfParams, Lang, ProblemRequest, Topic,
//! };
//!
//! let params = KdfParams { memory_kib: 8, iterations: 1, parallelism: 1 };
//! let ctx = CryptoContext::derive(b"a-long-enough-test-secret", params).unwrap();
//!
//! let problem = generate(&ctx, ProblemRequest {
//!     level: 2,
//!     lang: Lang::En,
//!     rng_seed: Some(42),
//!     ..ProblemRequest::new(Topic::Percent)
//! }).unwrap();
//!
//! println!("{}: {}", problem.subject_id, problem.presentation.description);
//! let answer = problem.hints.last().and_then(|h| h.formula.clone()).unwrap();
//! assert!(verify(&ctx, &answer, problem.token.as_str()));
//! ```

pub mod answer_token;
pub mod config;
pub mod practice_engine;

// Convenience re-exports so callers can use `adaptive_practice::generate`
// directly without reaching into `practice_engine::`.
pub use answer_token::{
    issue, normalize, verify, AnswerToken, CanonicalAnswer, CryptoContext, KdfParams, TokenError,
};
pub use config::{CodecConfig, ConfigError};
pub use practice_engine::{
    generate, generate_by_variation, AnswerShape, Figure, HintStep, Lang, ProblemDescriptor,
    ProblemMeta, ProblemRequest, RenderPayload, SelectionConstraints, Topic, VariationKind,
    VariationRequest,
};

#[cfg(test)]
mod tests;
