//! Eight-byte context tags for domain separation within a construction.

/// A short label separating unrelated uses of the same key or construction.
///
/// Contexts are not secret and need not be random; `b"userauth"` and
/// `b"filekeys"` in two call sites is exactly the intended use. Two hashes
/// (or subkeys, or ciphertexts) made under different contexts are unrelated
/// even with identical keys and inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context([u8; Context::BYTES]);

impl Context {
    /// Context length in bytes.
    pub const BYTES: usize = 8;

    /// Build a context from exactly eight bytes.
    #[must_use]
    pub const fn new(bytes: [u8; Context::BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a context from up to eight bytes, zero-padding on the right.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is longer than eight bytes; truncating a caller's
    /// label silently would merge domains that were meant to be distinct.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() <= Context::BYTES,
            "context must be at most {} bytes, got {}",
            Context::BYTES,
            bytes.len()
        );
        let mut padded = [0u8; Context::BYTES];
        padded[..bytes.len()].copy_from_slice(bytes);
        Self(padded)
    }

    /// The raw context bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Context::BYTES] {
        &self.0
    }
}

impl From<[u8; Context::BYTES]> for Context {
    fn from(bytes: [u8; Context::BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<&[u8; Context::BYTES]> for Context {
    fn from(bytes: &[u8; Context::BYTES]) -> Self {
        Self(*bytes)
    }
}
