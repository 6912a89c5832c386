//! Error types for the Riptide constructions.
//!
//! Only *expected, recoverable* outcomes are errors: failed authentication,
//! degenerate peer keys, malformed untrusted inputs. Caller misuse (an
//! out-of-range digest length, an oversized context) is a contract
//! violation and asserts instead — it indicates a programming error, not an
//! environmental condition, and no caller can meaningfully recover from it.

use thiserror::Error;

/// Recoverable failures surfaced by the constructions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An authentication tag did not match.
    ///
    /// Carries no detail on where the mismatch occurred; the comparison is
    /// constant-time and the failure is deliberately opaque.
    #[error("authentication failed")]
    Authentication,

    /// The peer's public key produced an all-zero shared secret.
    ///
    /// Small-order and other degenerate curve points collapse the shared
    /// secret to zeros; accepting them silently would let an active peer
    /// force a predictable key. Riptide rejects them.
    #[error("peer public key produces an all-zero shared secret")]
    WeakPublicKey,

    /// Ciphertext shorter than the authentication tag.
    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    TruncatedCiphertext {
        /// Length of the rejected ciphertext.
        len: usize,
        /// Minimum length a well-formed ciphertext can have.
        min: usize,
    },
}
