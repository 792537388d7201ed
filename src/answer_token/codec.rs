//! Issue and verify answer tokens.
//!
//! Token layout: `base64url(payload_json) "." base64url(hmac_sha256(secret, encoded_payload))`.
//!
//! The payload carries the subject id, the tolerance, the issue time, and
//! the answer encrypted with ChaCha20-Poly1305 under the derived key
//! (`nonce || ciphertext`). The MAC is checked before anything is decoded
//! or decrypted.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, Key, KeyInit, Nonce};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use super::answer::{normalize, parse_finite, CanonicalAnswer};
use super::context::CryptoContext;
use super::error::{Result, TokenError};

type HmacSha256 = Hmac<Sha256>;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 12;

/// Opaque, signed, self-contained answer token handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerToken(String);

impl AnswerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AnswerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AnswerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AnswerToken {
    fn from(s: String) -> Self {
        AnswerToken(s)
    }
}

impl FromStr for AnswerToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(AnswerToken(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    #[serde(rename = "sid")]
    subject_id: String,
    #[serde(rename = "ans")]
    encrypted_answer: String,
    #[serde(rename = "tol")]
    tolerance: f64,
    #[serde(rename = "iat")]
    issued_at: i64,
}

/// Encrypt `answer` and wrap it in a signed token.
///
/// `tolerance` is the allowed absolute deviation for numeric submissions;
/// pass `0.0` for exact answers.
pub fn issue(
    ctx: &CryptoContext,
    subject_id: &str,
    answer: &CanonicalAnswer,
    tolerance: f64,
) -> Result<AnswerToken> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(TokenError::InvalidTolerance(tolerance));
    }
    if let CanonicalAnswer::Numeric(v) = answer {
        if !v.is_finite() {
            return Err(TokenError::NonFiniteAnswer(*v));
        }
    }

    let plaintext = serde_json::to_vec(answer)?;
    let payload = TokenPayload {
        subject_id: subject_id.to_string(),
        encrypted_answer: URL_SAFE_NO_PAD.encode(encrypt(ctx, &plaintext)?),
        tolerance,
        issued_at: Utc::now().timestamp(),
    };

    let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?);
    let mac = URL_SAFE_NO_PAD.encode(sign(ctx, encoded.as_bytes())?);
    Ok(AnswerToken(format!("{encoded}.{mac}")))
}

/// Check a learner's raw answer against a token.
///
/// Never fails: malformed, forged, or undecryptable tokens all yield `false`.
pub fn verify(ctx: &CryptoContext, raw_answer: &str, token: &str) -> bool {
    match check(ctx, raw_answer, token) {
        Ok(correct) => correct,
        Err(e) => {
            debug!(error = %e, "rejected answer token");
            false
        }
    }
}

fn check(ctx: &CryptoContext, raw_answer: &str, token: &str) -> Result<bool> {
    let (encoded, mac) = split_token(token)?;

    // Signature strictly before any decoding of the payload.
    let tag = URL_SAFE_NO_PAD.decode(mac)?;
    let mut verifier = new_mac(ctx)?;
    verifier.update(encoded.as_bytes());
    verifier
        .verify_slice(&tag)
        .map_err(|_| TokenError::BadSignature)?;

    let payload: TokenPayload = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(encoded)?)?;
    if !payload.tolerance.is_finite() || payload.tolerance < 0.0 {
        return Err(TokenError::InvalidTolerance(payload.tolerance));
    }

    let plaintext = decrypt(ctx, &URL_SAFE_NO_PAD.decode(&payload.encrypted_answer)?)?;
    let answer: CanonicalAnswer = serde_json::from_str(&plaintext)?;

    Ok(answers_match(&answer, raw_answer, payload.tolerance))
}

/// Compare a submission with the canonical answer under the normalisation
/// and tolerance policy.
///
/// Numeric answers are compared against the issued `f64` itself, never
/// against its display rounding.
pub(crate) fn answers_match(answer: &CanonicalAnswer, raw_answer: &str, tolerance: f64) -> bool {
    let expected = normalize(&answer.canonical_string());
    let submitted = normalize(&answer.canonicalize_submission(raw_answer));

    let expected_value = match answer {
        CanonicalAnswer::Numeric(v) => Some(*v),
        _ if tolerance > 0.0 => parse_finite(&expected),
        _ => None,
    };
    if let (Some(a), Some(b)) = (expected_value, parse_finite(&submitted)) {
        return within_tolerance(a, b, tolerance);
    }
    expected == submitted
}

/// Relative slack absorbing binary rounding of decimal inputs.
const FLOAT_SLACK: f64 = 1e-12;

/// `|a - b| <= tolerance`, inclusive at the decimal boundary.
fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= tolerance + FLOAT_SLACK * scale
}

fn split_token(token: &str) -> Result<(&str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(payload), Some(mac), None) if !payload.is_empty() && !mac.is_empty() => {
            Ok((payload, mac))
        }
        _ => Err(TokenError::Malformed),
    }
}

fn new_mac(ctx: &CryptoContext) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(ctx.mac_secret()).map_err(|_| TokenError::MacKey)
}

fn sign(ctx: &CryptoContext, data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = new_mac(ctx)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn encrypt(ctx: &CryptoContext, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(ctx.encryption_key()));
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| TokenError::Encrypt)?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn decrypt(ctx: &CryptoContext, sealed: &[u8]) -> Result<String> {
    if sealed.len() < NONCE_LEN {
        return Err(TokenError::Truncated);
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(ctx.encryption_key()));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| TokenError::Decrypt)?;
    Ok(String::from_utf8(plaintext)?)
}
