//! Generic and keyed hashing with caller-chosen output length.
//!
//! Hashing is the duplex engine run in hash mode: the context and optional
//! key are absorbed as framed segments ahead of the message, then the
//! digest is squeezed. Output is XOF-like — requesting a longer digest of
//! the same input extends the shorter one.

use riptide_core::{Domain, Duplex};

use crate::context::Context;

/// Shortest permitted digest.
pub const MIN_DIGEST_BYTES: usize = 16;

/// Longest permitted digest.
pub const MAX_DIGEST_BYTES: usize = 65535;

/// Conventional digest length.
pub const DIGEST_BYTES: usize = 32;

/// Hash key length in bytes.
pub const KEY_BYTES: usize = 32;

/// Incremental hashing state.
///
/// ```
/// use riptide::{Context, hash::Hasher};
///
/// let mut hasher = Hasher::new(Context::from_slice(b"docs"));
/// hasher.update(b"chunk one");
/// hasher.update(b"chunk two");
/// let digest: [u8; 32] = hasher.finalize();
/// ```
#[derive(Clone)]
pub struct Hasher {
    duplex: Duplex,
}

impl Hasher {
    /// Start an unkeyed hash under `context`.
    #[must_use]
    pub fn new(context: Context) -> Self {
        let mut duplex = Duplex::new(Domain::Hash);
        duplex.absorb(context.as_bytes());
        duplex.end();
        Self { duplex }
    }

    /// Start a keyed hash under `context`.
    ///
    /// Keyed and unkeyed digests of identical input are unrelated, as are
    /// digests under different keys.
    #[must_use]
    pub fn new_keyed(context: Context, key: &[u8; KEY_BYTES]) -> Self {
        let mut duplex = Duplex::new_keyed(Domain::Hash, key);
        duplex.absorb(context.as_bytes());
        duplex.end();
        Self { duplex }
    }

    /// Absorb more message bytes.
    ///
    /// Split points carry no meaning; `update(a); update(b)` equals
    /// `update(ab)`.
    pub fn update(&mut self, data: &[u8]) {
        self.duplex.absorb(data);
    }

    /// Squeeze the digest into `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out.len()` is outside
    /// [`MIN_DIGEST_BYTES`]`..=`[`MAX_DIGEST_BYTES`].
    pub fn finalize_into(mut self, out: &mut [u8]) {
        assert!(
            (MIN_DIGEST_BYTES..=MAX_DIGEST_BYTES).contains(&out.len()),
            "digest length {} outside {MIN_DIGEST_BYTES}..={MAX_DIGEST_BYTES}",
            out.len()
        );
        self.duplex.squeeze(out);
    }

    /// Squeeze a fixed-size digest.
    ///
    /// # Panics
    ///
    /// Panics if `N` is outside [`MIN_DIGEST_BYTES`]`..=`[`MAX_DIGEST_BYTES`].
    #[must_use]
    pub fn finalize<const N: usize>(self) -> [u8; N] {
        let mut out = [0u8; N];
        self.finalize_into(&mut out);
        out
    }
}

/// Hash `message` under `context` into an `out_len`-byte digest.
///
/// # Panics
///
/// Panics if `out_len` is outside [`MIN_DIGEST_BYTES`]`..=`[`MAX_DIGEST_BYTES`].
#[must_use]
pub fn hash(message: &[u8], context: Context, out_len: usize) -> Vec<u8> {
    let mut hasher = Hasher::new(context);
    hasher.update(message);
    let mut out = vec![0u8; out_len];
    hasher.finalize_into(&mut out);
    out
}

/// Hash `message` under `context` and `key` into an `out_len`-byte digest.
///
/// # Panics
///
/// Panics if `out_len` is outside [`MIN_DIGEST_BYTES`]`..=`[`MAX_DIGEST_BYTES`].
#[must_use]
pub fn hash_keyed(message: &[u8], context: Context, key: &[u8; KEY_BYTES], out_len: usize) -> Vec<u8> {
    let mut hasher = Hasher::new_keyed(context, key);
    hasher.update(message);
    let mut out = vec![0u8; out_len];
    hasher.finalize_into(&mut out);
    out
}

/// Hash `message` under `context` into the conventional 32-byte digest.
#[must_use]
pub fn digest(message: &[u8], context: Context) -> [u8; DIGEST_BYTES] {
    let mut hasher = Hasher::new(context);
    hasher.update(message);
    hasher.finalize()
}
