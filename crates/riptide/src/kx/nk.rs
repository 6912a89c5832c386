//! The NK pattern: anonymous client, known server, server confirmation.
//!
//! Like [`n`](super::n) the client must know the server's static key in
//! advance, but the server answers with its own ephemeral, so the client
//! only derives session keys after proof that the server holds the static
//! secret. Two 48-byte packets.

use super::{Keypair, PUBLIC_KEY_BYTES, Psk, SessionKeys, TAG_BYTES, Transcript, read_public, read_tag};
use crate::error::Error;
use crate::x25519;

/// Size of the initiator's packet.
pub const PACKET1_BYTES: usize = PUBLIC_KEY_BYTES + TAG_BYTES;

/// Size of the responder's packet.
pub const PACKET2_BYTES: usize = PUBLIC_KEY_BYTES + TAG_BYTES;

/// Initiator state between packet 1 and packet 2.
pub struct Initiator {
    transcript: Transcript,
    ephemeral: Keypair,
}

fn transcript(psk: Option<&Psk>, server: &x25519::PublicKey) -> Transcript {
    let mut transcript = Transcript::new(b"nk");
    transcript.mix_psk(psk);
    transcript.mix(b"rs", server.as_bytes());
    transcript
}

/// Client side, step 1: produce packet 1 and the waiting state.
///
/// # Errors
///
/// [`Error::WeakPublicKey`] if `server` is a degenerate curve point.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
pub fn initiate(
    server: &x25519::PublicKey,
    psk: Option<&Psk>,
) -> Result<(Initiator, [u8; PACKET1_BYTES]), Error> {
    let ephemeral = Keypair::generate();

    let mut transcript = transcript(psk, server);
    transcript.mix(b"e", ephemeral.public.as_bytes());
    transcript.mix_dh(b"es", &ephemeral.secret, server)?;
    let tag = transcript.tag();

    let mut packet = [0u8; PACKET1_BYTES];
    packet[..PUBLIC_KEY_BYTES].copy_from_slice(ephemeral.public.as_bytes());
    packet[PUBLIC_KEY_BYTES..].copy_from_slice(&tag);

    Ok((Initiator { transcript, ephemeral }, packet))
}

/// Server side: verify packet 1, produce packet 2 and the session keys.
///
/// # Errors
///
/// - [`Error::Authentication`] if packet 1 does not match this server/psk
/// - [`Error::WeakPublicKey`] on degenerate keys
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
pub fn respond(
    packet1: &[u8; PACKET1_BYTES],
    server: &Keypair,
    psk: Option<&Psk>,
) -> Result<(SessionKeys, [u8; PACKET2_BYTES]), Error> {
    let client_ephemeral = read_public(packet1);
    let tag1 = read_tag(&packet1[PUBLIC_KEY_BYTES..]);

    let mut transcript = transcript(psk, &server.public);
    transcript.mix(b"e", client_ephemeral.as_bytes());
    transcript.mix_dh(b"es", &server.secret, &client_ephemeral)?;
    transcript.verify_tag(&tag1)?;

    let ephemeral = Keypair::generate();
    transcript.mix(b"e", ephemeral.public.as_bytes());
    transcript.mix_dh(b"ee", &ephemeral.secret, &client_ephemeral)?;
    let tag2 = transcript.tag();

    let mut packet = [0u8; PACKET2_BYTES];
    packet[..PUBLIC_KEY_BYTES].copy_from_slice(ephemeral.public.as_bytes());
    packet[PUBLIC_KEY_BYTES..].copy_from_slice(&tag2);

    Ok((transcript.split(false), packet))
}

impl Initiator {
    /// Client side, step 2: verify packet 2 and derive the session keys.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if packet 2 does not authenticate the
    ///   server
    /// - [`Error::WeakPublicKey`] on degenerate keys
    pub fn finish(self, packet2: &[u8; PACKET2_BYTES]) -> Result<SessionKeys, Error> {
        let mut transcript = self.transcript;
        let server_ephemeral = read_public(packet2);
        let tag2 = read_tag(&packet2[PUBLIC_KEY_BYTES..]);

        transcript.mix(b"e", server_ephemeral.as_bytes());
        transcript.mix_dh(b"ee", &self.ephemeral.secret, &server_ephemeral)?;
        transcript.verify_tag(&tag2)?;

        Ok(transcript.split(true))
    }
}
