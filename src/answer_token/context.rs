//! Process-wide key material for the answer-token codec.
//!
//! Built once at start-up and shared read-only by every `issue`/`verify`
//! call. The encryption key is derived from the secret with Argon2id over a
//! fixed salt, so every process holding the same secret derives the same key.
//! The raw secret itself keys the HMAC; the two keys are never interchanged.

use std::fmt;

use argon2::{Algorithm, Argon2, Params, Version};
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{validate_secret, CodecConfig, ConfigError};

/// Length of the derived ChaCha20-Poly1305 key.
pub const KEY_LEN: usize = 32;

/// Application salt for key derivation. Changing it invalidates every issued token.
const KDF_SALT: &[u8] = b"adaptive-practice/answer-token/v1";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Immutable key material passed into [`issue`](super::issue) and
/// [`verify`](super::verify).
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CryptoContext {
    mac_secret: Vec<u8>,
    encryption_key: [u8; KEY_LEN],
}

impl CryptoContext {
    /// Derive the context from loaded configuration. Runs the KDF, so call
    /// once per process.
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        Self::derive(config.secret(), config.kdf)
    }

    /// Validate `secret` and derive the encryption key from it.
    pub fn derive(secret: &[u8], params: KdfParams) -> Result<Self, ConfigError> {
        validate_secret(secret)?;
        let encryption_key = derive_encryption_key(secret, params)?;
        info!(
            memory_kib = params.memory_kib,
            iterations = params.iterations,
            parallelism = params.parallelism,
            "derived answer encryption key"
        );
        Ok(Self {
            mac_secret: secret.to_vec(),
            encryption_key,
        })
    }

    /// Build a context around an already known encryption key, skipping the KDF.
    ///
    /// Intended for tests and for deployments that provision the key directly.
    pub fn with_encryption_key(secret: impl Into<Vec<u8>>, encryption_key: [u8; KEY_LEN]) -> Self {
        Self {
            mac_secret: secret.into(),
            encryption_key,
        }
    }

    pub(crate) fn mac_secret(&self) -> &[u8] {
        &self.mac_secret
    }

    pub(crate) fn encryption_key(&self) -> &[u8; KEY_LEN] {
        &self.encryption_key
    }
}

impl fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoContext")
            .field("mac_secret", &"<redacted>")
            .field("encryption_key", &"<redacted>")
            .finish()
    }
}

fn derive_encryption_key(secret: &[u8], params: KdfParams) -> Result<[u8; KEY_LEN], ConfigError> {
    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| ConfigError::Kdf(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(secret, KDF_SALT, &mut key)
        .map_err(|e| ConfigError::Kdf(e.to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest legal cost so the KDF stays fast in tests.
    const CHEAP: KdfParams = KdfParams { memory_kib: 8, iterations: 1, parallelism: 1 };

    #[test]
    fn derivation_is_deterministic_per_secret() {
        let a = CryptoContext::derive(b"first-secret-0123456789", CHEAP).unwrap();
        let b = CryptoContext::derive(b"first-secret-0123456789", CHEAP).unwrap();
        let c = CryptoContext::derive(b"other-secret-0123456789", CHEAP).unwrap();
        assert_eq!(a.encryption_key(), b.encryption_key());
        assert_ne!(a.encryption_key(), c.encryption_key());
    }

    #[test]
    fn encryption_key_differs_from_mac_secret() {
        let ctx = CryptoContext::derive(b"0123456789abcdef0123456789abcdef", CHEAP).unwrap();
        assert_eq!(ctx.mac_secret(), b"0123456789abcdef0123456789abcdef");
        assert_ne!(&ctx.encryption_key()[..], ctx.mac_secret());
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = CryptoContext::derive(b"short", CHEAP).unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret { len: 5, .. }));
    }

    #[test]
    fn invalid_params_surface_as_kdf_error() {
        let bad = KdfParams { memory_kib: 8, iterations: 0, parallelism: 1 };
        let err = CryptoContext::derive(b"a-perfectly-fine-secret", bad).unwrap_err();
        assert!(matches!(err, ConfigError::Kdf(_)));
    }

    #[test]
    fn debug_output_redacts_keys() {
        let ctx = CryptoContext::with_encryption_key(b"visible-secret-xyz".to_vec(), [9u8; KEY_LEN]);
        let shown = format!("{ctx:?}");
        assert!(!shown.contains("visible-secret-xyz"));
        assert!(shown.contains("redacted"));
    }
}
