//! Deterministic Edwards-curve signatures.
//!
//! The scheme is Ed25519-shaped, with the duplex hash (sign domain,
//! 64-byte output) in place of SHA-512 and an 8-byte context bound into
//! both the nonce and the challenge. Signing uses no per-call randomness:
//! the nonce is derived from the secret prefix and the message, so the
//! same `(key, context, message)` always yields the same signature.

use riptide_core::{Domain, Duplex, ct};
use riptide_curve::edwards::Point;
use riptide_curve::{montgomery, scalar};
use zeroize::Zeroize;

use crate::context::Context;
use crate::random;

/// Seed length in bytes.
pub const SEED_BYTES: usize = 32;

/// Public key length in bytes.
pub const PUBLIC_KEY_BYTES: usize = 32;

/// Secret key length in bytes (seed and public key halves).
pub const SECRET_KEY_BYTES: usize = 64;

/// Signature length in bytes.
pub const SIGNATURE_BYTES: usize = 64;

/// A signing secret key: the 32-byte seed with the public key appended.
#[derive(Clone)]
pub struct SecretKey([u8; SECRET_KEY_BYTES]);

impl SecretKey {
    /// Wrap caller-provided secret key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SECRET_KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw secret key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SECRET_KEY_BYTES] {
        &self.0
    }

    fn seed(&self) -> [u8; SEED_BYTES] {
        let mut seed = [0u8; SEED_BYTES];
        seed.copy_from_slice(&self.0[..SEED_BYTES]);
        seed
    }

    fn public_bytes(&self) -> [u8; PUBLIC_KEY_BYTES] {
        let mut public = [0u8; PUBLIC_KEY_BYTES];
        public.copy_from_slice(&self.0[SEED_BYTES..]);
        public
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A signature verification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTES]);

impl PublicKey {
    /// Wrap caller-provided public key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw point encoding.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTES] {
        &self.0
    }
}

/// A detached 64-byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    /// Wrap caller-provided signature bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    /// The raw signature bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }
}

/// A signing keypair.
pub struct Keypair {
    /// The secret half; wipes itself on drop.
    pub secret: SecretKey,
    /// The public half.
    pub public: PublicKey,
}

impl Keypair {
    /// Generate a keypair from a fresh random seed.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails at first seeding of the
    /// global generator.
    #[must_use]
    pub fn generate() -> Self {
        let mut seed: [u8; SEED_BYTES] = random::random_bytes();
        let keypair = Self::from_seed(&seed);
        seed.zeroize();
        keypair
    }

    /// Derive a keypair deterministically from a seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_BYTES]) -> Self {
        let mut scalar_bytes = expand_scalar(seed);
        let public = Point::scalar_mul_base(&scalar_bytes).compress();
        scalar_bytes.zeroize();

        let mut secret = [0u8; SECRET_KEY_BYTES];
        secret[..SEED_BYTES].copy_from_slice(seed);
        secret[SEED_BYTES..].copy_from_slice(&public);

        Self { secret: SecretKey(secret), public: PublicKey(public) }
    }
}

/// 64-byte hash of framed segments under the sign domain.
fn sign_hash(segments: &[&[u8]]) -> [u8; 64] {
    let mut duplex = Duplex::new(Domain::Sign);
    for segment in segments {
        duplex.absorb(segment);
        duplex.end();
    }
    duplex.squeeze_array()
}

/// Expand a seed into the clamped secret scalar half.
fn expand_scalar(seed: &[u8; SEED_BYTES]) -> [u8; 32] {
    let mut expanded = sign_hash(&[b"expand", seed]);
    let mut scalar_bytes = [0u8; 32];
    scalar_bytes.copy_from_slice(&expanded[..32]);
    expanded.zeroize();
    montgomery::clamp(&mut scalar_bytes);
    scalar_bytes
}

fn expand_prefix(seed: &[u8; SEED_BYTES]) -> [u8; 32] {
    let mut expanded = sign_hash(&[b"expand", seed]);
    let mut prefix = [0u8; 32];
    prefix.copy_from_slice(&expanded[32..]);
    expanded.zeroize();
    prefix
}

/// Sign `message` under `context`.
pub fn sign(secret: &SecretKey, context: Context, message: &[u8]) -> Signature {
    let mut seed = secret.seed();
    let public = secret.public_bytes();

    let mut prefix = expand_prefix(&seed);
    let mut nonce_wide = sign_hash(&[b"nonce", context.as_bytes(), &prefix, message]);
    prefix.zeroize();
    let mut nonce = scalar::reduce_wide(&nonce_wide);
    nonce_wide.zeroize();

    let commitment = Point::scalar_mul_base(&nonce).compress();

    let challenge_wide =
        sign_hash(&[b"challenge", context.as_bytes(), &commitment, &public, message]);
    let challenge = scalar::reduce_wide(&challenge_wide);

    let mut scalar_bytes = expand_scalar(&seed);
    let s = scalar::mul_add(&challenge, &scalar_bytes, &nonce);
    scalar_bytes.zeroize();
    nonce.zeroize();
    seed.zeroize();

    let mut signature = [0u8; SIGNATURE_BYTES];
    signature[..32].copy_from_slice(&commitment);
    signature[32..].copy_from_slice(&s);
    Signature(signature)
}

/// Verify `signature` over `message` under `context`.
///
/// Returns `false` for invalid signatures, non-canonical scalar halves,
/// and public keys that are not curve points. Runtime does not depend on
/// where a mismatch occurs; the final comparison is constant-time.
#[must_use]
pub fn verify(
    public: &PublicKey,
    context: Context,
    message: &[u8],
    signature: &Signature,
) -> bool {
    let bytes = signature.as_bytes();
    let mut commitment = [0u8; 32];
    commitment.copy_from_slice(&bytes[..32]);
    let mut s = [0u8; 32];
    s.copy_from_slice(&bytes[32..]);

    if !scalar::is_canonical(&s) {
        return false;
    }
    let Some(negated_key) = Point::decompress_negate(public.as_bytes()) else {
        return false;
    };

    let challenge_wide =
        sign_hash(&[b"challenge", context.as_bytes(), &commitment, public.as_bytes(), message]);
    let challenge = scalar::reduce_wide(&challenge_wide);

    // [s]B - [challenge]A must reproduce the commitment
    let check = Point::scalar_mul_base(&s).add(&negated_key.scalar_mul(&challenge));
    ct::ct_eq(&check.compress(), &commitment)
}
