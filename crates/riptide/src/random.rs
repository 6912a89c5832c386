//! Reseedable random generator over the duplex engine.
//!
//! A [`Generator`] is a keyed duplex in generator mode: seed in, squeeze
//! out. After a configurable number of output bytes it ratchets, so a later
//! compromise of the state cannot reconstruct earlier output. Production
//! code normally goes through the process-wide generator behind
//! [`fill_random`]; deterministic tests construct their own via
//! [`Generator::from_seed`].
//!
//! # Security
//!
//! The OS entropy read uses getrandom (`/dev/urandom` on Linux,
//! `BCryptGenRandom` on Windows). A generator without functioning OS
//! entropy cannot operate securely, so failure at seeding panics rather
//! than degrading.

use std::sync::{Mutex, OnceLock};

use riptide_core::{Domain, Duplex};
use zeroize::Zeroize;

/// Seed length in bytes.
pub const SEED_BYTES: usize = 32;

/// Output bytes between automatic ratchets unless overridden.
pub const DEFAULT_RATCHET_INTERVAL: usize = 4096;

/// Smallest accepted ratchet interval.
pub const MIN_RATCHET_INTERVAL: usize = 64;

/// A reseedable deterministic generator over the duplex engine.
pub struct Generator {
    duplex: Duplex,
    since_ratchet: usize,
    ratchet_interval: usize,
}

impl Generator {
    /// Seed a generator from OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails; RNG failure is unrecoverable
    /// and continuing would compromise every construction built on top.
    #[must_use]
    pub fn from_os_entropy() -> Self {
        let mut seed = [0u8; SEED_BYTES];
        fill_from_os(&mut seed);
        let generator = Self::from_seed(&seed);
        seed.zeroize();
        generator
    }

    /// Seed a generator deterministically.
    ///
    /// Identical seeds produce identical output streams; meant for tests
    /// and reproducible simulations, not production keys.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_BYTES]) -> Self {
        Self {
            duplex: Duplex::new_keyed(Domain::Random, seed),
            since_ratchet: 0,
            ratchet_interval: DEFAULT_RATCHET_INTERVAL,
        }
    }

    /// Override the automatic ratchet interval.
    ///
    /// Values below [`MIN_RATCHET_INTERVAL`] are clamped up to it.
    #[must_use]
    pub fn with_ratchet_interval(mut self, interval: usize) -> Self {
        self.ratchet_interval = interval.max(MIN_RATCHET_INTERVAL);
        self
    }

    /// Fill `out` with generator output.
    ///
    /// Ratchets automatically every `ratchet_interval` output bytes.
    pub fn fill(&mut self, out: &mut [u8]) {
        let mut remaining = out;
        while !remaining.is_empty() {
            let budget = self.ratchet_interval - self.since_ratchet;
            let take = remaining.len().min(budget);
            let (chunk, rest) = remaining.split_at_mut(take);
            self.duplex.squeeze(chunk);
            self.since_ratchet += take;
            remaining = rest;

            if self.since_ratchet == self.ratchet_interval {
                self.ratchet();
            }
        }
    }

    /// Generate a fixed-size array of output.
    #[must_use]
    pub fn generate<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.fill(&mut out);
        out
    }

    /// A uniformly random `u32`.
    #[must_use]
    pub fn random_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.generate())
    }

    /// A uniformly random value in `0..bound`, without modulo bias.
    ///
    /// Returns 0 when `bound` is 0 or 1.
    #[must_use]
    pub fn random_uniform(&mut self, bound: u32) -> u32 {
        if bound < 2 {
            return 0;
        }
        // Rejection sampling: discard draws from the biased tail
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let draw = self.random_u32();
            if draw >= threshold {
                return draw % bound;
            }
        }
    }

    /// Irreversibly mix the state forward.
    ///
    /// Output produced before the ratchet cannot be reconstructed from
    /// state captured after it.
    pub fn ratchet(&mut self) {
        self.duplex.ratchet();
        self.since_ratchet = 0;
    }

    /// Mix fresh OS entropy into the state and ratchet.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails.
    pub fn reseed(&mut self) {
        let mut seed = [0u8; SEED_BYTES];
        fill_from_os(&mut seed);
        self.duplex.absorb(&seed);
        self.duplex.end();
        seed.zeroize();
        self.ratchet();
    }
}

#[allow(clippy::expect_used)]
fn fill_from_os(buffer: &mut [u8]) {
    getrandom::fill(buffer)
        .expect("invariant: OS RNG failure is unrecoverable - cannot operate securely without it");
}

static GLOBAL: OnceLock<Mutex<Generator>> = OnceLock::new();

fn global() -> &'static Mutex<Generator> {
    GLOBAL.get_or_init(|| Mutex::new(Generator::from_os_entropy()))
}

/// Fill `out` from the process-wide generator.
///
/// Lazily seeds the generator from OS entropy on first use; concurrent
/// callers serialize on an internal mutex.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding.
pub fn fill_random(out: &mut [u8]) {
    match global().lock() {
        Ok(mut generator) => generator.fill(out),
        // A panic while holding the lock cannot leave the generator in a
        // partially written state; keep serving
        Err(poisoned) => poisoned.into_inner().fill(out),
    }
}

/// A fixed-size array from the process-wide generator.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding.
#[must_use]
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut out = [0u8; N];
    fill_random(&mut out);
    out
}

/// Mix fresh OS entropy into the process-wide generator.
///
/// # Panics
///
/// Panics if the OS entropy source fails.
pub fn reseed_global() {
    match global().lock() {
        Ok(mut generator) => generator.reseed(),
        Err(poisoned) => poisoned.into_inner().reseed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Generator::from_seed(&[7u8; 32]);
        let mut b = Generator::from_seed(&[7u8; 32]);

        assert_eq!(a.generate::<64>(), b.generate::<64>());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Generator::from_seed(&[1u8; 32]);
        let mut b = Generator::from_seed(&[2u8; 32]);

        assert_ne!(a.generate::<32>(), b.generate::<32>());
    }

    #[test]
    fn stream_is_chunking_invariant() {
        let mut whole = Generator::from_seed(&[9u8; 32]);
        let mut pieces = Generator::from_seed(&[9u8; 32]);

        let big = whole.generate::<96>();
        let first = pieces.generate::<33>();
        let second = pieces.generate::<63>();

        assert_eq!(&big[..33], &first);
        assert_eq!(&big[33..], &second);
    }

    #[test]
    fn ratchet_interval_is_honored_across_chunk_sizes() {
        // Outputs must agree regardless of how reads straddle the ratchet
        let mut a = Generator::from_seed(&[3u8; 32]).with_ratchet_interval(64);
        let mut b = Generator::from_seed(&[3u8; 32]).with_ratchet_interval(64);

        let whole = a.generate::<200>();
        let mut split = Vec::new();
        for _ in 0..25 {
            split.extend_from_slice(&b.generate::<8>());
        }

        assert_eq!(&whole[..], &split[..]);
    }

    #[test]
    fn ratchet_breaks_forward_equality() {
        let mut plain = Generator::from_seed(&[4u8; 32]);
        let mut ratcheted = Generator::from_seed(&[4u8; 32]);

        ratcheted.ratchet();

        assert_ne!(plain.generate::<32>(), ratcheted.generate::<32>());
    }

    #[test]
    fn past_output_unreachable_after_ratchet() {
        // Attacker model: state captured after the ratchet. A fresh clone
        // of the post-ratchet generator must not reproduce earlier output.
        let mut generator = Generator::from_seed(&[5u8; 32]);
        let early = generator.generate::<32>();
        generator.ratchet();

        // The captured state continues the stream, but nothing it emits
        // reproduces the pre-ratchet output
        let later = generator.generate::<256>();
        assert!(
            later.windows(32).all(|window| window != early),
            "pre-ratchet output reappeared after the ratchet"
        );
    }

    #[test]
    fn interval_clamps_to_minimum() {
        let mut generator = Generator::from_seed(&[6u8; 32]).with_ratchet_interval(1);
        // Would ratchet every byte if unclamped; just exercise it
        let out = generator.generate::<128>();
        assert_ne!(out, [0u8; 128]);
    }

    #[test]
    fn uniform_draws_stay_in_bounds() {
        let mut generator = Generator::from_seed(&[8u8; 32]);
        for bound in [1u32, 2, 3, 7, 100, 1000] {
            for _ in 0..50 {
                assert!(generator.random_uniform(bound) < bound.max(1));
            }
        }
    }

    #[test]
    fn uniform_zero_bound_is_zero() {
        let mut generator = Generator::from_seed(&[8u8; 32]);
        assert_eq!(generator.random_uniform(0), 0);
    }

    #[test]
    fn global_generator_produces_distinct_draws() {
        let a: [u8; 32] = random_bytes();
        let b: [u8; 32] = random_bytes();
        assert_ne!(a, b, "consecutive draws must differ");
    }

    #[test]
    fn global_reseed_keeps_serving() {
        let before: [u8; 16] = random_bytes();
        reseed_global();
        let after: [u8; 16] = random_bytes();
        assert_ne!(before, after);
    }
}
