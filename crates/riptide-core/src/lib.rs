//! Riptide permutation core and duplex engine
//!
//! Everything symmetric in Riptide is a mode of use of one 48-byte
//! permutation. This crate holds that permutation ([`gimli`]), the
//! sponge/duplex engine built on it ([`duplex`]), and the branchless
//! comparison helper the higher layers use for tag checks ([`ct`]).
//!
//! # Construction
//!
//! The engine splits the 48-byte state into a 16-byte *rate* (the only part
//! inputs and outputs ever touch) and a 32-byte *capacity* that stays
//! hidden for the lifetime of the state:
//!
//! ```text
//! init(domain, key?) ──► absorb ──► end ──► ... ──► squeeze ──► ratchet
//!        │                 │                            │
//!        ▼                 ▼                            ▼
//!   framing block    XOR into rate                copy out of rate
//!   (tag, version,   permute at block             permute between
//!    domain, keyed)  boundaries                   blocks
//! ```
//!
//! Each construction (hash, random, kdf, secretbox, sign, kx, pwhash) seeds
//! the state with a distinct [`duplex::Domain`] byte, so identical inputs
//! under different constructions never produce related outputs.
//!
//! # Security
//!
//! - The permutation runs a fixed round schedule with no secret-dependent
//!   branches or table indices.
//! - `squeeze` only ever reads the rate; capacity bytes cannot reach output.
//! - `ratchet` destroys 16 bytes of state after a permutation, so captured
//!   state cannot be rolled back to recover earlier outputs.
//! - Duplex state is zeroized on drop.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ct;
pub mod duplex;
pub mod gimli;

pub use duplex::{Domain, Duplex, RATE};
pub use gimli::{STATE_BYTES, STATE_WORDS};
