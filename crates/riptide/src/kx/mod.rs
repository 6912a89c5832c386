//! Authenticated key exchange over a duplex transcript.
//!
//! Four fixed handshake patterns, each a small state machine per role:
//!
//! - [`n`]: one packet; anonymous client to a known server
//! - [`nk`]: two packets; anonymous client, server confirms possession
//! - [`kk`]: two packets; both statics known in advance, mutual auth
//! - [`xx`]: three packets; nothing known in advance, statics exchanged
//!   encrypted, mutual auth
//!
//! Every step folds the exchanged ephemerals, the relevant Diffie-Hellman
//! results, and (where the pattern takes one) a pre-shared key into a
//! single duplex transcript; the 16-byte tags carried by each packet
//! authenticate the whole transcript so far. Any tag mismatch or
//! degenerate peer key is fatal to the handshake instance — there is no
//! retry path and no downgrade. Completion yields directional
//! [`SessionKeys`]; the initiator's `tx` is the responder's `rx`.
//!
//! Handshake states hold only the ephemeral secret they generated; static
//! keys are passed back in by the caller at the step that needs them and
//! are never retained.

use riptide_core::{Domain, Duplex, ct};
use zeroize::Zeroize;

use crate::error::Error;
use crate::x25519;

pub mod kk;
pub mod n;
pub mod nk;
pub mod xx;

/// Public key length in bytes.
pub const PUBLIC_KEY_BYTES: usize = x25519::KEY_BYTES;

/// Secret key length in bytes.
pub const SECRET_KEY_BYTES: usize = x25519::KEY_BYTES;

/// Session key length in bytes.
pub const SESSION_KEY_BYTES: usize = 32;

/// Pre-shared key length in bytes.
pub const PSK_BYTES: usize = 32;

/// Transcript tag length in bytes.
pub const TAG_BYTES: usize = 16;

/// Keypair seed length in bytes.
pub const SEED_BYTES: usize = 32;

/// An optional pre-shared key, folded into the transcript when present.
pub type Psk = [u8; PSK_BYTES];

/// A static or ephemeral key-exchange keypair.
pub struct Keypair {
    /// The secret half; wipes itself on drop.
    pub secret: x25519::SecretKey,
    /// The public half.
    pub public: x25519::PublicKey,
}

impl Keypair {
    /// Generate a fresh random keypair.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails at first seeding of the
    /// global generator.
    #[must_use]
    pub fn generate() -> Self {
        let secret = x25519::SecretKey::generate();
        let public = x25519::PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Derive a keypair deterministically from a seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_BYTES]) -> Self {
        let mut duplex = Duplex::new(Domain::Kx);
        duplex.absorb(b"keygen");
        duplex.end();
        duplex.absorb(seed);
        duplex.end();
        let mut scalar = duplex.squeeze_array::<SECRET_KEY_BYTES>();

        let secret = x25519::SecretKey::from_bytes(scalar);
        scalar.zeroize();
        let public = x25519::PublicKey::from(&secret);
        Self { secret, public }
    }
}

/// One directional session key.
pub struct SessionKey([u8; SESSION_KEY_BYTES]);

impl SessionKey {
    /// The raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_KEY_BYTES] {
        &self.0
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// The directional key pair a completed handshake produces.
pub struct SessionKeys {
    /// Key for receiving from the peer.
    pub rx: SessionKey,
    /// Key for transmitting to the peer.
    pub tx: SessionKey,
}

/// The shared handshake transcript: a duplex in kx mode that every
/// exchanged value and derived secret is folded into, in a fixed order
/// both roles replay identically.
pub(crate) struct Transcript {
    duplex: Duplex,
}

impl Transcript {
    /// Start a transcript for the named pattern.
    pub(crate) fn new(pattern: &'static [u8]) -> Self {
        let mut duplex = Duplex::new(Domain::Kx);
        duplex.absorb(pattern);
        duplex.end();
        Self { duplex }
    }

    /// Fold a labelled value into the transcript.
    pub(crate) fn mix(&mut self, label: &'static [u8], data: &[u8]) {
        self.duplex.absorb(label);
        self.duplex.end();
        self.duplex.absorb(data);
        self.duplex.end();
    }

    /// Fold the pre-shared key, or zeros when the caller has none.
    ///
    /// Mixing the absent case too keeps the schedules of psk and no-psk
    /// runs aligned while still deriving unrelated keys.
    pub(crate) fn mix_psk(&mut self, psk: Option<&Psk>) {
        self.mix(b"psk", psk.map_or(&[0u8; PSK_BYTES], |psk| psk));
    }

    /// Compute a Diffie-Hellman share and fold it into the transcript.
    pub(crate) fn mix_dh(
        &mut self,
        label: &'static [u8],
        secret: &x25519::SecretKey,
        public: &x25519::PublicKey,
    ) -> Result<(), Error> {
        let shared = x25519::diffie_hellman(secret, public)?;
        self.mix(label, shared.as_bytes());
        Ok(())
    }

    /// Squeeze a transcript tag.
    pub(crate) fn tag(&mut self) -> [u8; TAG_BYTES] {
        self.duplex.squeeze_array()
    }

    /// Squeeze the expected tag and compare against the received one.
    pub(crate) fn verify_tag(&mut self, received: &[u8; TAG_BYTES]) -> Result<(), Error> {
        let expected = self.tag();
        if ct::ct_eq(&expected, received) { Ok(()) } else { Err(Error::Authentication) }
    }

    /// Encrypt a 32-byte public key under the transcript keystream.
    ///
    /// Output is the ciphertext with a 16-byte tag over the transcript
    /// including that ciphertext.
    pub(crate) fn encrypt_key(
        &mut self,
        plaintext: &[u8; PUBLIC_KEY_BYTES],
    ) -> [u8; PUBLIC_KEY_BYTES + TAG_BYTES] {
        let keystream = self.duplex.squeeze_array::<PUBLIC_KEY_BYTES>();
        let mut out = [0u8; PUBLIC_KEY_BYTES + TAG_BYTES];
        for i in 0..PUBLIC_KEY_BYTES {
            out[i] = plaintext[i] ^ keystream[i];
        }
        self.mix(b"enc", &out[..PUBLIC_KEY_BYTES]);
        let tag = self.tag();
        out[PUBLIC_KEY_BYTES..].copy_from_slice(&tag);
        out
    }

    /// Decrypt a key encrypted by [`encrypt_key`](Self::encrypt_key).
    pub(crate) fn decrypt_key(
        &mut self,
        ciphertext: &[u8; PUBLIC_KEY_BYTES + TAG_BYTES],
    ) -> Result<x25519::PublicKey, Error> {
        let keystream = self.duplex.squeeze_array::<PUBLIC_KEY_BYTES>();
        let (body, tag) = ciphertext.split_at(PUBLIC_KEY_BYTES);
        self.mix(b"enc", body);
        self.verify_tag(&read_tag(tag))?;

        let mut plaintext = [0u8; PUBLIC_KEY_BYTES];
        for i in 0..PUBLIC_KEY_BYTES {
            plaintext[i] = body[i] ^ keystream[i];
        }
        Ok(x25519::PublicKey::from_bytes(plaintext))
    }

    /// Finish the handshake, deriving the directional session keys.
    ///
    /// The first squeezed key flows responder-to-initiator, the second
    /// initiator-to-responder; `initiator` selects which ends up as `rx`.
    pub(crate) fn split(mut self, initiator: bool) -> SessionKeys {
        self.duplex.ratchet();
        let first = SessionKey(self.duplex.squeeze_array());
        let second = SessionKey(self.duplex.squeeze_array());
        if initiator {
            SessionKeys { rx: first, tx: second }
        } else {
            SessionKeys { rx: second, tx: first }
        }
    }
}

/// Read a public key out of a packet slice.
pub(crate) fn read_public(bytes: &[u8]) -> x25519::PublicKey {
    let mut out = [0u8; PUBLIC_KEY_BYTES];
    out.copy_from_slice(&bytes[..PUBLIC_KEY_BYTES]);
    x25519::PublicKey::from_bytes(out)
}

/// Read a transcript tag out of a packet slice.
pub(crate) fn read_tag(bytes: &[u8]) -> [u8; TAG_BYTES] {
    let mut out = [0u8; TAG_BYTES];
    out.copy_from_slice(&bytes[..TAG_BYTES]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_seed_is_deterministic() {
        let a = Keypair::from_seed(&[3u8; 32]);
        let b = Keypair::from_seed(&[3u8; 32]);
        assert_eq!(a.public, b.public);
        assert_eq!(a.secret.as_bytes(), b.secret.as_bytes());
    }

    #[test]
    fn from_seed_separates_seeds() {
        let a = Keypair::from_seed(&[3u8; 32]);
        let b = Keypair::from_seed(&[4u8; 32]);
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn seed_is_not_used_as_scalar_directly() {
        let seed = [7u8; 32];
        let keypair = Keypair::from_seed(&seed);
        assert_ne!(keypair.secret.as_bytes(), &seed);
    }

    #[test]
    fn transcript_roles_agree() {
        let mut initiator = Transcript::new(b"test");
        let mut responder = Transcript::new(b"test");

        initiator.mix(b"e", &[1u8; 32]);
        responder.mix(b"e", &[1u8; 32]);

        let tag = initiator.tag();
        responder.verify_tag(&tag).unwrap();

        let keys_i = initiator.split(true);
        let keys_r = responder.split(false);
        assert_eq!(keys_i.tx.as_bytes(), keys_r.rx.as_bytes());
        assert_eq!(keys_i.rx.as_bytes(), keys_r.tx.as_bytes());
        assert_ne!(keys_i.tx.as_bytes(), keys_i.rx.as_bytes());
    }

    #[test]
    fn transcript_tag_rejects_divergence() {
        let mut initiator = Transcript::new(b"test");
        let mut responder = Transcript::new(b"test");

        initiator.mix(b"e", &[1u8; 32]);
        responder.mix(b"e", &[2u8; 32]);

        let tag = initiator.tag();
        assert_eq!(responder.verify_tag(&tag), Err(Error::Authentication));
    }

    #[test]
    fn encrypt_key_roundtrips_between_roles() {
        let mut sender = Transcript::new(b"test");
        let mut receiver = Transcript::new(b"test");
        sender.mix(b"k", &[9u8; 32]);
        receiver.mix(b"k", &[9u8; 32]);

        let secret_key = [0x77u8; 32];
        let ciphertext = sender.encrypt_key(&secret_key);
        let recovered = receiver.decrypt_key(&ciphertext).unwrap();
        assert_eq!(recovered.as_bytes(), &secret_key);
    }

    #[test]
    fn encrypt_key_hides_plaintext() {
        let mut sender = Transcript::new(b"test");
        sender.mix(b"k", &[9u8; 32]);
        let ciphertext = sender.encrypt_key(&[0u8; 32]);
        assert!(ciphertext[..32].iter().any(|&b| b != 0));
    }

    #[test]
    fn tampered_encrypted_key_is_rejected() {
        let mut sender = Transcript::new(b"test");
        let mut receiver = Transcript::new(b"test");

        let mut ciphertext = sender.encrypt_key(&[0x77u8; 32]);
        ciphertext[5] ^= 1;
        assert_eq!(receiver.decrypt_key(&ciphertext), Err(Error::Authentication));
    }

    #[test]
    fn psk_changes_the_transcript() {
        let mut without = Transcript::new(b"test");
        let mut with = Transcript::new(b"test");
        without.mix_psk(None);
        with.mix_psk(Some(&[5u8; 32]));

        assert_ne!(without.tag(), with.tag());
    }

    #[test]
    fn absent_psk_matches_zero_psk_schedule_but_not_value() {
        // Schedules align; a zero psk and no psk are the same by design
        let mut none = Transcript::new(b"test");
        let mut zeros = Transcript::new(b"test");
        none.mix_psk(None);
        zeros.mix_psk(Some(&[0u8; 32]));
        assert_eq!(none.tag(), zeros.tag());
    }
}
