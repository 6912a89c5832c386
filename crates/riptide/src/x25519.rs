//! X25519 Diffie-Hellman key agreement.
//!
//! A thin typed layer over the Montgomery ladder in `riptide-curve`.
//! Secret scalars and shared secrets wipe themselves on drop; public keys
//! are plain copyable bytes.

use riptide_core::ct;
use riptide_curve::montgomery;
use zeroize::Zeroize;

use crate::error::Error;
use crate::random;

/// Length of secret keys, public keys, and shared secrets.
pub const KEY_BYTES: usize = 32;

/// An X25519 secret scalar.
#[derive(Clone)]
pub struct SecretKey([u8; KEY_BYTES]);

impl SecretKey {
    /// Generate a fresh random secret key.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails at first seeding of the
    /// global generator.
    #[must_use]
    pub fn generate() -> Self {
        Self(random::random_bytes())
    }

    /// Wrap caller-provided scalar bytes.
    ///
    /// Clamping happens inside the ladder, so any 32 bytes are a valid
    /// secret key.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw scalar bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// An X25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; KEY_BYTES]);

impl PublicKey {
    /// Wrap caller-provided public key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw point encoding.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl From<&SecretKey> for PublicKey {
    /// Derive the public key `[secret] * basepoint`.
    fn from(secret: &SecretKey) -> Self {
        Self(montgomery::scalar_mul_base(&secret.0))
    }
}

/// A shared secret produced by [`diffie_hellman`].
pub struct SharedSecret([u8; KEY_BYTES]);

impl SharedSecret {
    /// The raw shared secret bytes.
    ///
    /// Feed these through the KDF before use as a symmetric key; the raw
    /// ladder output is a curve point coordinate, not a uniform key.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Compute the shared secret between `secret` and `peer`.
///
/// # Errors
///
/// [`Error::WeakPublicKey`] if the result is all zeros, which happens
/// exactly when `peer` is a small-order or otherwise degenerate point.
/// Rejecting instead of passing the zeros through is this library's fixed
/// policy: a predictable "shared" secret is worse than a failed agreement.
pub fn diffie_hellman(secret: &SecretKey, peer: &PublicKey) -> Result<SharedSecret, Error> {
    let shared = montgomery::scalar_mul(&secret.0, &peer.0);
    if ct::ct_eq(&shared, &[0u8; KEY_BYTES]) {
        return Err(Error::WeakPublicKey);
    }
    Ok(SharedSecret(shared))
}
