//! Riptide: one permutation, every construction.
//!
//! A minimal-footprint cryptographic library in which hashing, random
//! generation, key derivation, authenticated encryption, and password
//! hashing are all modes of use of a single 48-byte permutation, and
//! X25519, signing, and key exchange share one hand-written Curve25519
//! layer.
//!
//! ```text
//! permutation core (riptide-core)
//!        │
//!   duplex engine ──► random ─► hash ─► kdf ─► secretbox ─► pwhash
//!                                 │               │
//! curve arithmetic (riptide-curve)│               │
//!        │                        ▼               ▼
//!        ├──► x25519 ─────────► kx (N / NK / KK / XX handshakes)
//!        └──► sign
//! ```
//!
//! # Domain separation
//!
//! Every construction seeds the duplex with its own domain tag, and an
//! 8-byte [`Context`] further separates call sites within a construction.
//! Identical inputs under different constructions, contexts, or keys
//! produce unrelated outputs.
//!
//! # Error model
//!
//! Expected failures — bad tags, degenerate peer keys, truncated inputs —
//! come back as [`Error`] values (or `false` from the verify functions).
//! Caller misuse that the type system cannot rule out, such as an
//! out-of-range digest length, asserts. OS entropy failure at first use of
//! the global generator panics: nothing in this library can operate
//! securely without it.
//!
//! # Key hygiene
//!
//! Secret-bearing types (`SecretKey`s, [`kx::SessionKey`], generator and
//! duplex state) wipe themselves on drop, and internal scratch secrets are
//! wiped on every exit path. Callers own their key buffers; nothing is
//! retained across calls.
//!
//! # Quick start
//!
//! ```
//! use riptide::{Context, secretbox};
//!
//! let key = secretbox::generate_key();
//! let nonce = secretbox::random_nonce();
//! let context = Context::from_slice(b"example");
//!
//! let ciphertext = secretbox::encrypt(&key, context, &nonce, b"hello");
//! let plaintext = secretbox::decrypt(&key, context, &nonce, &ciphertext)?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), riptide::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod context;
mod error;

pub mod hash;
pub mod kdf;
pub mod kx;
pub mod pwhash;
pub mod random;
pub mod secretbox;
pub mod sign;
pub mod x25519;

pub use context::Context;
pub use error::Error;
