//! Curve25519 arithmetic for Riptide.
//!
//! One field layer serves two curve shapes: the Montgomery form drives
//! X25519 key agreement ([`montgomery`]), the twisted Edwards form drives
//! signatures ([`edwards`] plus the group-order scalar arithmetic in
//! [`scalar`]). Nothing in this crate knows about keys, wire formats, or
//! protocols; it exposes raw group operations over 32-byte encodings.
//!
//! # Security
//!
//! All scalar-dependent control flow is branchless: the ladders run a fixed
//! 255/256 iterations and use masked conditional swaps, field elements are
//! reduced with fixed carry chains, and the final canonical reduction
//! selects between candidates by mask rather than branch. Decompression and
//! verification-side checks operate on public data and may branch.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod edwards;
pub mod field;
pub mod montgomery;
pub mod scalar;
