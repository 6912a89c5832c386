//! The N pattern: one packet from an anonymous client to a known server.
//!
//! The client knows the server's static public key ahead of time, sends a
//! single 48-byte packet, and both sides hold session keys immediately.
//! The server learns nothing about the client's identity; client
//! authentication, when needed, rides on the optional pre-shared key.

use super::{Keypair, Psk, PUBLIC_KEY_BYTES, SessionKeys, TAG_BYTES, Transcript, read_public, read_tag};
use crate::error::Error;
use crate::x25519;

/// Size of the single handshake packet.
pub const PACKET_BYTES: usize = PUBLIC_KEY_BYTES + TAG_BYTES;

fn transcript(
    psk: Option<&Psk>,
    server: &x25519::PublicKey,
    ephemeral: &x25519::PublicKey,
) -> Transcript {
    let mut transcript = Transcript::new(b"n");
    transcript.mix_psk(psk);
    transcript.mix(b"rs", server.as_bytes());
    transcript.mix(b"e", ephemeral.as_bytes());
    transcript
}

/// Client side: produce the packet and the session keys in one step.
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
) -> Result<([u8; PACKET_BYTES], SessionKeys), Error> {
    let ephemeral = Keypair::generate();

    let mut transcript = transcript(psk, server, &ephemeral.public);
    transcript.mix_dh(b"es", &ephemeral.secret, server)?;
    let tag = transcript.tag();

    let mut packet = [0u8; PACKET_BYTES];
    packet[..PUBLIC_KEY_BYTES].copy_from_slice(ephemeral.public.as_bytes());
    packet[PUBLIC_KEY_BYTES..].copy_from_slice(&tag);

    Ok((packet, transcript.split(true)))
}

/// Server side: consume the packet and derive the session keys.
///
/// # Errors
///
/// - [`Error::WeakPublicKey`] if the client ephemeral is degenerate
/// - [`Error::Authentication`] if the tag does not match (wrong server
///   key, wrong psk, or a tampered packet)
pub fn respond(
    packet: &[u8; PACKET_BYTES],
    server: &Keypair,
    psk: Option<&Psk>,
) -> Result<SessionKeys, Error> {
    let ephemeral = read_public(packet);
    let tag = read_tag(&packet[PUBLIC_KEY_BYTES..]);

    let mut transcript = transcript(psk, &server.public, &ephemeral);
    transcript.mix_dh(b"es", &server.secret, &ephemeral)?;
    transcript.verify_tag(&tag)?;

    Ok(transcript.split(false))
}
