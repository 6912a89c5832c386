//! Deriving many independent subkeys from one master key.
//!
//! `derive_subkey(master, context, id, out)` is deterministic and, for a
//! fixed `(master, context)`, distinct ids yield independent subkeys — the
//! permutation's diffusion carries that guarantee, nothing is checked at
//! runtime. The requested length is bound into the derivation, so a 32-byte
//! and a 64-byte subkey under the same id are unrelated, unlike plain hash
//! output.

use riptide_core::{Domain, Duplex};

use crate::context::Context;
use crate::random;

/// Master key length in bytes.
pub const KEY_BYTES: usize = 32;

/// Shortest permitted subkey.
pub const MIN_SUBKEY_BYTES: usize = 16;

/// Longest permitted subkey.
pub const MAX_SUBKEY_BYTES: usize = 65535;

/// Generate a fresh random master key.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
#[must_use]
pub fn generate_key() -> [u8; KEY_BYTES] {
    random::random_bytes()
}

/// Derive the subkey `subkey_id` for `(master, context)` into `out`.
///
/// # Panics
///
/// Panics if `out.len()` is outside
/// [`MIN_SUBKEY_BYTES`]`..=`[`MAX_SUBKEY_BYTES`].
pub fn derive_subkey(master: &[u8; KEY_BYTES], context: Context, subkey_id: u64, out: &mut [u8]) {
    assert!(
        (MIN_SUBKEY_BYTES..=MAX_SUBKEY_BYTES).contains(&out.len()),
        "subkey length {} outside {MIN_SUBKEY_BYTES}..={MAX_SUBKEY_BYTES}",
        out.len()
    );

    let mut duplex = Duplex::new_keyed(Domain::Kdf, master);
    duplex.absorb(context.as_bytes());
    duplex.end();
    duplex.absorb(&subkey_id.to_le_bytes());
    duplex.absorb(&(out.len() as u64).to_le_bytes());
    duplex.end();
    duplex.squeeze(out);
}

/// Derive a fixed-size subkey.
///
/// # Panics
///
/// Panics if `N` is outside [`MIN_SUBKEY_BYTES`]`..=`[`MAX_SUBKEY_BYTES`].
#[must_use]
pub fn derive_subkey_array<const N: usize>(
    master: &[u8; KEY_BYTES],
    context: Context,
    subkey_id: u64,
) -> [u8; N] {
    let mut out = [0u8; N];
    derive_subkey(master, context, subkey_id, &mut out);
    out
}
