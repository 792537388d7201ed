//! Codec configuration loaded from the environment.
//!
//! | Variable                  | Required | Meaning |
//! |---------------------------|----------|---------|
//! | `HMAC_SECRET`             | yes      | Token secret; at least 16 bytes |
//! | `ANSWER_KDF_MEMORY_KIB`   | no       | Argon2id memory cost |
//! | `ANSWER_KDF_ITERATIONS`   | no       | Argon2id passes |
//! | `ANSWER_KDF_PARALLELISM`  | no       | Argon2id lanes |
//!
//! A missing secret is a hard error. There is no fallback value.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::answer_token::KdfParams;

pub const SECRET_VAR: &str = "HMAC_SECRET";
pub const KDF_MEMORY_VAR: &str = "ANSWER_KDF_MEMORY_KIB";
pub const KDF_ITERATIONS_VAR: &str = "ANSWER_KDF_ITERATIONS";
pub const KDF_PARALLELISM_VAR: &str = "ANSWER_KDF_PARALLELISM";

/// Shortest secret accepted for signing tokens.
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingSecret(&'static str),

    #[error("{var} must be at least {min} bytes, got {len}")]
    WeakSecret { var: &'static str, len: usize, min: usize },

    #[error("{var} has invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("key derivation failed: {0}")]
    Kdf(String),
}

#[derive(Clone)]
pub struct CodecConfig {
    secret: Zeroizing<Vec<u8>>,
    pub kdf: KdfParams,
}

impl CodecConfig {
    pub fn new(secret: impl Into<Vec<u8>>, kdf: KdfParams) -> Result<Self, ConfigError> {
        let secret = Zeroizing::new(secret.into());
        validate_secret(&secret)?;
        Ok(Self { secret, kdf })
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret(SECRET_VAR))?;

        let defaults = KdfParams::default();
        let kdf = KdfParams {
            memory_kib: parse_u32(&lookup, KDF_MEMORY_VAR)?.unwrap_or(defaults.memory_kib),
            iterations: parse_u32(&lookup, KDF_ITERATIONS_VAR)?.unwrap_or(defaults.iterations),
            parallelism: parse_u32(&lookup, KDF_PARALLELISM_VAR)?.unwrap_or(defaults.parallelism),
        };

        Self::new(secret.into_bytes(), kdf)
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("secret", &"<redacted>")
            .field("kdf", &self.kdf)
            .finish()
    }
}

pub(crate) fn validate_secret(secret: &[u8]) -> Result<(), ConfigError> {
    if secret.is_empty() {
        return Err(ConfigError::MissingSecret(SECRET_VAR));
    }
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::WeakSecret {
            var: SECRET_VAR,
            len: secret.len(),
            min: MIN_SECRET_LEN,
        });
    }
    Ok(())
}

fn parse_u32<F>(lookup: &F, var: &'static str) -> Result<Option<u32>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
