//! Password reset tokens.
//!
//! The caller receives 20 random bytes as hex; only an HMAC-SHA256 of those
//! bytes, keyed with the server secret, is stored.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes in a reset token.
pub const RESET_TOKEN_BYTES: usize = 20;

/// A freshly generated reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    /// Hex form handed to the user.
    pub token: String,
    /// Hex digest to store.
    pub digest: String,
}

/// Generates a random reset token and its stored digest.
pub fn generate(secret: &str) -> Result<ResetToken, AuthError> {
    let bytes: [u8; RESET_TOKEN_BYTES] = rand::random();
    Ok(ResetToken {
        token: hex::encode(bytes),
        digest: digest_bytes(secret, &bytes)?,
    })
}

/// Computes the stored digest for a hex token taken from a URL.
pub fn digest(secret: &str, token: &str) -> Result<String, AuthError> {
    let bytes = hex::decode(token).map_err(|_| AuthError::MalformedResetToken)?;
    digest_bytes(secret, &bytes)
}

fn digest_bytes(secret: &str, bytes: &[u8]) -> Result<String, AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| AuthError::Signing(e.to_string()))?;
    mac.update(bytes);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
