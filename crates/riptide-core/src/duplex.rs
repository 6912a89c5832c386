//! Sponge/duplex engine over the Gimli permutation.
//!
//! A [`Duplex`] absorbs arbitrary-length input and squeezes arbitrary-length
//! output through the 16-byte rate, keeping the 32-byte capacity hidden.
//! Input is organized into *segments*: a sequence of [`absorb`](Duplex::absorb)
//! calls closed by [`end`](Duplex::end). Segment framing is what makes
//! `(key, context, message)` style input sequences prefix-free, so no two
//! distinct sequences can collide by concatenation.
//!
//! # Call order
//!
//! `absorb`, `end`, `squeeze`, and `ratchet` may be interleaved freely; the
//! engine inserts the padding permutation when switching from absorbing to
//! squeezing and a plain permutation when switching back. Squeezing from a
//! freshly initialized, unkeyed duplex is well-formed (it hashes the empty
//! input) — constructions that require a key enforce that through their own
//! types, not here.

use zeroize::Zeroize;

use crate::gimli::{self, STATE_WORDS};

/// Bytes of state exposed to absorb/squeeze per permutation call.
pub const RATE: usize = 16;

/// Format version folded into every initialization block.
const VERSION: u8 = 1;

/// Padding byte XORed at the segment boundary.
const PAD_SEGMENT: u8 = 0x1f;

/// Padding byte XORed into the final rate byte at a segment boundary.
const PAD_BLOCK: u8 = 0x80;

/// Domain-separation tag, one per construction.
///
/// The tag is folded into the initialization block, so two duplexes seeded
/// with different domains are unrelated even under identical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Domain {
    /// Generic and keyed hashing.
    Hash = 0x01,
    /// The reseedable random generator.
    Random = 0x02,
    /// Subkey derivation.
    Kdf = 0x03,
    /// Secret-box keystream and mac-key derivation.
    SecretBox = 0x04,
    /// Secret-box authentication tags.
    SecretBoxMac = 0x05,
    /// Signature hashing.
    Sign = 0x06,
    /// Key-exchange transcripts.
    Kx = 0x07,
    /// Password hashing.
    Pwhash = 0x08,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Squeezing,
}

/// A domain-separated sponge/duplex over the Gimli permutation.
#[derive(Clone)]
pub struct Duplex {
    words: [u32; STATE_WORDS],
    pos: usize,
    phase: Phase,
}

impl Duplex {
    /// Create an unkeyed duplex for `domain`.
    ///
    /// The initial state absorbs a full framing block — ASCII tag, format
    /// version, domain byte, keyed flag — so every (domain, keyed) pair
    /// starts from an unrelated state.
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self::init(domain, false)
    }

    /// Create a duplex for `domain` keyed with a 32-byte secret.
    ///
    /// The key is absorbed as its own framed segment directly after the
    /// initialization block.
    #[must_use]
    pub fn new_keyed(domain: Domain, key: &[u8; 32]) -> Self {
        let mut duplex = Self::init(domain, true);
        duplex.absorb(key);
        duplex.end();
        duplex
    }

    fn init(domain: Domain, keyed: bool) -> Self {
        let mut duplex =
            Self { words: [0u32; STATE_WORDS], pos: 0, phase: Phase::Absorbing };

        let mut block = [0u8; RATE];
        block[..7].copy_from_slice(b"riptide");
        block[7] = VERSION;
        block[8] = domain as u8;
        block[9] = u8::from(keyed);
        duplex.absorb(&block);
        // A full rate block, so the permutation already ran and pos is 0

        duplex
    }

    /// XOR `input` into the rate, permuting at every block boundary.
    pub fn absorb(&mut self, input: &[u8]) {
        if self.phase == Phase::Squeezing {
            self.permute();
            self.phase = Phase::Absorbing;
        }

        for &byte in input {
            self.xor_byte(self.pos, byte);
            self.pos += 1;
            if self.pos == RATE {
                self.permute();
            }
        }
    }

    /// Close the current input segment.
    ///
    /// Applies the deterministic segment padding and permutes, making the
    /// absorbed sequence prefix-free. Calling `end` twice in a row is
    /// well-defined (an empty segment) but never done by the constructions.
    pub fn end(&mut self) {
        if self.phase == Phase::Squeezing {
            self.permute();
            self.phase = Phase::Absorbing;
        }

        self.xor_byte(self.pos, PAD_SEGMENT);
        self.xor_byte(RATE - 1, PAD_BLOCK);
        self.permute();
    }

    /// Fill `out` with squeezed bytes.
    ///
    /// The first squeeze after absorbing closes the pending segment; only
    /// rate bytes are ever copied out.
    pub fn squeeze(&mut self, out: &mut [u8]) {
        if self.phase == Phase::Absorbing {
            self.end();
            self.phase = Phase::Squeezing;
        }

        for byte in out.iter_mut() {
            if self.pos == RATE {
                self.permute();
            }
            *byte = self.byte_at(self.pos);
            self.pos += 1;
        }
    }

    /// Squeeze a fixed-size array.
    #[must_use]
    pub fn squeeze_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.squeeze(&mut out);
        out
    }

    /// Irreversibly mix the state forward.
    ///
    /// Permutes and then erases the rate. Sixteen bytes of state are
    /// destroyed, so a later capture of the full state cannot be rolled
    /// back across the ratchet to recover earlier output.
    pub fn ratchet(&mut self) {
        self.permute();
        for word in &mut self.words[..RATE / 4] {
            *word = 0;
        }
        self.phase = Phase::Absorbing;
        debug_assert_eq!(self.pos, 0);
    }

    fn permute(&mut self) {
        gimli::permute(&mut self.words);
        self.pos = 0;
    }

    fn xor_byte(&mut self, index: usize, byte: u8) {
        debug_assert!(index < RATE);
        let shift = (index % 4) * 8;
        self.words[index / 4] ^= u32::from(byte) << shift;
    }

    fn byte_at(&self, index: usize) -> u8 {
        debug_assert!(index < RATE);
        let shift = (index % 4) * 8;
        (self.words[index / 4] >> shift) as u8
    }
}

impl Drop for Duplex {
    fn drop(&mut self) {
        self.words.zeroize();
    }
}
