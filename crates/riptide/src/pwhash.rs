//! Memory- and compute-hard password hashing.
//!
//! Low-entropy passwords get stretched through a deliberately expensive
//! schedule: a duplex seeded with `(params, salt, password)` fills a
//! caller-sized array of 64-byte blocks, then runs `passes` sweeps that
//! fold pairs of blocks back through the duplex and overwrite them. The
//! partner-block schedule depends only on loop counters, never on secret
//! data, so no memory access is secret-indexed.
//!
//! Two interfaces: [`derive`] for protocols that manage their own salt and
//! parameters, and the [`create`]/[`verify`] pair which packs everything
//! into an opaque 128-byte blob suitable for a credential store.

use riptide_core::{Domain, Duplex, ct};
use zeroize::Zeroize;

use crate::random;

/// Salt length in bytes.
pub const SALT_BYTES: usize = 16;

/// Derived key length in bytes.
pub const KEY_BYTES: usize = 32;

/// Stored verifier blob length in bytes.
pub const STORED_BYTES: usize = 128;

/// Minimum accepted number of passes.
pub const MIN_PASSES: u64 = 1;

/// Minimum accepted memory, in KiB.
pub const MIN_MEMORY_KIB: u32 = 8;

const BLOCK_BYTES: usize = 64;
const MAGIC: [u8; 4] = *b"rpw1";

// Bounds applied when parsing untrusted stored blobs, so a forged blob
// cannot turn verification into an allocation or cpu bomb.
const MAX_PASSES: u64 = 1 << 16;
const MAX_MEMORY_KIB: u64 = 1 << 20;

/// Difficulty parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    passes: u64,
    memory_kib: u32,
}

impl Params {
    /// A sensible default for interactive logins: 8 MiB, 3 passes.
    pub const RECOMMENDED: Self = Self { passes: 3, memory_kib: 8192 };

    /// Build parameters, clamping up to the documented minimums
    /// ([`MIN_PASSES`], [`MIN_MEMORY_KIB`]).
    #[must_use]
    pub fn new(passes: u64, memory_kib: u32) -> Self {
        Self {
            passes: passes.max(MIN_PASSES),
            memory_kib: memory_kib.max(MIN_MEMORY_KIB),
        }
    }

    /// Number of mixing sweeps over the memory.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    /// Memory footprint in KiB.
    #[must_use]
    pub const fn memory_kib(&self) -> u32 {
        self.memory_kib
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::RECOMMENDED
    }
}

/// Data-independent partner schedule; counters only, never block contents.
fn partner_index(index: usize, pass: u64, block_count: usize) -> usize {
    index
        .wrapping_mul(0x9e37_79b9)
        .wrapping_add((pass as usize).wrapping_mul(0x85eb_ca6b))
        % block_count
}

/// Derive a 32-byte key from `password` and `salt` at the given cost.
#[must_use]
pub fn derive(password: &[u8], salt: &[u8; SALT_BYTES], params: &Params) -> [u8; KEY_BYTES] {
    let block_count = params.memory_kib as usize * 1024 / BLOCK_BYTES;

    let mut duplex = Duplex::new(Domain::Pwhash);
    duplex.absorb(&params.passes.to_le_bytes());
    duplex.absorb(&u64::from(params.memory_kib).to_le_bytes());
    duplex.end();
    duplex.absorb(salt);
    duplex.end();
    duplex.absorb(password);
    duplex.end();

    let mut blocks = vec![[0u8; BLOCK_BYTES]; block_count];
    for block in &mut blocks {
        duplex.squeeze(block);
    }

    for pass in 0..params.passes {
        for index in 0..block_count {
            let partner = partner_index(index, pass, block_count);
            duplex.absorb(&blocks[partner]);
            duplex.absorb(&blocks[index]);
            duplex.end();
            duplex.squeeze(&mut blocks[index]);
        }
    }

    duplex.absorb(&blocks[block_count - 1]);
    duplex.end();
    let key = duplex.squeeze_array();

    for block in &mut blocks {
        block.zeroize();
    }
    key
}

/// Hash `password` into an opaque 128-byte blob for storage.
///
/// The blob embeds the parameters and a random salt, so [`verify`] needs
/// nothing but the password and the blob.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
#[must_use]
pub fn create(password: &[u8], params: &Params) -> [u8; STORED_BYTES] {
    let salt: [u8; SALT_BYTES] = random::random_bytes();
    let verifier = derive(password, &salt, params);

    let mut stored = [0u8; STORED_BYTES];
    stored[..4].copy_from_slice(&MAGIC);
    stored[4..12].copy_from_slice(&params.passes.to_le_bytes());
    stored[12..20].copy_from_slice(&u64::from(params.memory_kib).to_le_bytes());
    stored[20..20 + SALT_BYTES].copy_from_slice(&salt);
    stored[36..36 + KEY_BYTES].copy_from_slice(&verifier);
    stored
}

fn parse(stored: &[u8; STORED_BYTES]) -> Option<(Params, [u8; SALT_BYTES], [u8; KEY_BYTES])> {
    if stored[..4] != MAGIC {
        return None;
    }

    let mut passes_bytes = [0u8; 8];
    passes_bytes.copy_from_slice(&stored[4..12]);
    let passes = u64::from_le_bytes(passes_bytes);

    let mut memory_bytes = [0u8; 8];
    memory_bytes.copy_from_slice(&stored[12..20]);
    let memory_kib = u64::from_le_bytes(memory_bytes);

    if !(MIN_PASSES..=MAX_PASSES).contains(&passes) {
        return None;
    }
    if !(u64::from(MIN_MEMORY_KIB)..=MAX_MEMORY_KIB).contains(&memory_kib) {
        return None;
    }
    if stored[36 + KEY_BYTES..].iter().any(|&byte| byte != 0) {
        return None;
    }

    let mut salt = [0u8; SALT_BYTES];
    salt.copy_from_slice(&stored[20..20 + SALT_BYTES]);
    let mut verifier = [0u8; KEY_BYTES];
    verifier.copy_from_slice(&stored[36..36 + KEY_BYTES]);

    Some((Params { passes, memory_kib: memory_kib as u32 }, salt, verifier))
}

/// Check `password` against a blob produced by [`create`].
///
/// Malformed blobs verify false; the verifier comparison is
/// constant-time.
#[must_use]
pub fn verify(password: &[u8], stored: &[u8; STORED_BYTES]) -> bool {
    let Some((params, salt, verifier)) = parse(stored) else {
        return false;
    };

    let mut recomputed = derive(password, &salt, &params);
    let matches = ct::ct_eq(&recomputed, &verifier);
    recomputed.zeroize();
    matches
}
