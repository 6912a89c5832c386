//! Authenticated encryption keyed by a symmetric key, nonce, and context.
//!
//! The construction is two duplex passes. A keyed duplex over
//! `(key, context, nonce)` first squeezes a one-message mac key, ratchets,
//! then squeezes the keystream; a second duplex keyed with the mac key
//! absorbs the ciphertext body and squeezes the 16-byte tag appended to the
//! message. Decryption recomputes the tag over the received body and
//! compares constant-time *before* any keystream touches the ciphertext —
//! a mismatch returns [`Error::Authentication`] and nothing else.
//!
//! Nonces must be unique per `(key, context)`; the library cannot detect
//! reuse. Use [`random_nonce`] unless a protocol supplies a counter.

use riptide_core::{Domain, Duplex, ct};
use zeroize::Zeroize;

use crate::context::Context;
use crate::error::Error;
use crate::random;

/// Key length in bytes.
pub const KEY_BYTES: usize = 32;

/// Nonce length in bytes.
pub const NONCE_BYTES: usize = 20;

/// Authentication tag length in bytes.
pub const TAG_BYTES: usize = 16;

/// Generate a fresh random key.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
#[must_use]
pub fn generate_key() -> [u8; KEY_BYTES] {
    random::random_bytes()
}

/// Generate a random nonce.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
#[must_use]
pub fn random_nonce() -> [u8; NONCE_BYTES] {
    random::random_bytes()
}

/// Per-message state: the mac key and the duplex positioned to emit
/// keystream.
fn message_keys(
    key: &[u8; KEY_BYTES],
    context: Context,
    nonce: &[u8; NONCE_BYTES],
) -> ([u8; 32], Duplex) {
    let mut duplex = Duplex::new_keyed(Domain::SecretBox, key);
    duplex.absorb(context.as_bytes());
    duplex.end();
    duplex.absorb(nonce);
    duplex.end();

    let mac_key = duplex.squeeze_array::<32>();
    duplex.ratchet();
    (mac_key, duplex)
}

fn compute_tag(mac_key: &[u8; 32], body: &[u8]) -> [u8; TAG_BYTES] {
    let mut mac = Duplex::new_keyed(Domain::SecretBoxMac, mac_key);
    mac.absorb(body);
    mac.squeeze_array()
}

/// Encrypt and authenticate `plaintext`.
///
/// Returns `plaintext.len() + `[`TAG_BYTES`] bytes: the ciphertext body
/// with the tag appended.
#[must_use]
pub fn encrypt(
    key: &[u8; KEY_BYTES],
    context: Context,
    nonce: &[u8; NONCE_BYTES],
    plaintext: &[u8],
) -> Vec<u8> {
    let (mut mac_key, mut stream) = message_keys(key, context, nonce);

    let mut out = vec![0u8; plaintext.len() + TAG_BYTES];
    let (body, tag_slot) = out.split_at_mut(plaintext.len());
    stream.squeeze(body);
    for (cipher_byte, plain_byte) in body.iter_mut().zip(plaintext.iter()) {
        *cipher_byte ^= plain_byte;
    }

    tag_slot.copy_from_slice(&compute_tag(&mac_key, body));
    mac_key.zeroize();
    out
}

/// Verify and decrypt `ciphertext`.
///
/// # Errors
///
/// - [`Error::TruncatedCiphertext`] if `ciphertext` is shorter than the tag
/// - [`Error::Authentication`] if the tag does not match; no plaintext is
///   produced and no mismatch detail is revealed
pub fn decrypt(
    key: &[u8; KEY_BYTES],
    context: Context,
    nonce: &[u8; NONCE_BYTES],
    ciphertext: &[u8],
) -> Result<Vec<u8>, Error> {
    if ciphertext.len() < TAG_BYTES {
        return Err(Error::TruncatedCiphertext { len: ciphertext.len(), min: TAG_BYTES });
    }
    let (body, received_tag) = ciphertext.split_at(ciphertext.len() - TAG_BYTES);

    let (mut mac_key, mut stream) = message_keys(key, context, nonce);
    let expected_tag = compute_tag(&mac_key, body);
    mac_key.zeroize();

    if !ct::ct_eq(&expected_tag, received_tag) {
        return Err(Error::Authentication);
    }

    let mut plaintext = vec![0u8; body.len()];
    stream.squeeze(&mut plaintext);
    for (plain_byte, cipher_byte) in plaintext.iter_mut().zip(body.iter()) {
        *plain_byte ^= cipher_byte;
    }
    Ok(plaintext)
}
