//! The XX pattern: mutual authentication with nothing shared in advance.
//!
//! Neither side knows the other's static key beforehand. Statics travel
//! inside the handshake, encrypted under the transcript keystream once
//! enough Diffie-Hellman material has accumulated, so a passive observer
//! learns neither identity. Three packets; both sides learn the peer's
//! static public key on completion and can pin it for later KK handshakes.

use super::{Keypair, PUBLIC_KEY_BYTES, Psk, SessionKeys, TAG_BYTES, Transcript, read_public, read_tag};
use crate::error::Error;
use crate::x25519;

/// Size of the initiator's first packet.
pub const PACKET1_BYTES: usize = PUBLIC_KEY_BYTES + TAG_BYTES;

/// Size of the responder's packet.
pub const PACKET2_BYTES: usize = PUBLIC_KEY_BYTES + (PUBLIC_KEY_BYTES + TAG_BYTES) + TAG_BYTES;

/// Size of the initiator's final packet.
pub const PACKET3_BYTES: usize = (PUBLIC_KEY_BYTES + TAG_BYTES) + TAG_BYTES;

/// Initiator state between packet 1 and packet 2.
pub struct Initiator {
    transcript: Transcript,
    ephemeral: Keypair,
}

/// Responder state between packet 2 and packet 3.
pub struct Responder {
    transcript: Transcript,
    ephemeral: Keypair,
}

/// Client side, step 1: produce packet 1 and the waiting state.
///
/// # Panics
///
/// Panics if the OS entropy source fails at first seeding of the global
/// generator.
#[must_use]
pub fn initiate(psk: Option<&Psk>) -> (Initiator, [u8; PACKET1_BYTES]) {
    let ephemeral = Keypair::generate();

    let mut transcript = Transcript::new(b"xx");
    transcript.mix_psk(psk);
    transcript.mix(b"e", ephemeral.public.as_bytes());
    let tag = transcript.tag();

    let mut packet = [0u8; PACKET1_BYTES];
    packet[..PUBLIC_KEY_BYTES].copy_from_slice(ephemeral.public.as_bytes());
    packet[PUBLIC_KEY_BYTES..].copy_from_slice(&tag);

    (Initiator { transcript, ephemeral }, packet)
}

/// Server side, step 2: verify packet 1, produce packet 2 and the waiting
/// state. The server's static travels encrypted inside packet 2.
///
/// # Errors
///
/// - [`Error::Authentication`] if packet 1 is malformed for this psk
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
) -> Result<(Responder, [u8; PACKET2_BYTES]), Error> {
    let client_ephemeral = read_public(packet1);
    let tag1 = read_tag(&packet1[PUBLIC_KEY_BYTES..]);

    let mut transcript = Transcript::new(b"xx");
    transcript.mix_psk(psk);
    transcript.mix(b"e", client_ephemeral.as_bytes());
    transcript.verify_tag(&tag1)?;

    let ephemeral = Keypair::generate();
    transcript.mix(b"e", ephemeral.public.as_bytes());
    transcript.mix_dh(b"ee", &ephemeral.secret, &client_ephemeral)?;
    let encrypted_static = transcript.encrypt_key(server.public.as_bytes());
    transcript.mix_dh(b"se", &server.secret, &client_ephemeral)?;
    let tag2 = transcript.tag();

    let mut packet = [0u8; PACKET2_BYTES];
    packet[..PUBLIC_KEY_BYTES].copy_from_slice(ephemeral.public.as_bytes());
    packet[PUBLIC_KEY_BYTES..PUBLIC_KEY_BYTES + encrypted_static.len()]
        .copy_from_slice(&encrypted_static);
    packet[PUBLIC_KEY_BYTES + encrypted_static.len()..].copy_from_slice(&tag2);

    Ok((Responder { transcript, ephemeral }, packet))
}

impl Initiator {
    /// Client side, step 3: verify packet 2, learn the server's static,
    /// produce packet 3 and the session keys.
    ///
    /// `client` is the static keypair this side authenticates with; it is
    /// not retained.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if packet 2 fails authentication
    /// - [`Error::WeakPublicKey`] on degenerate keys
    pub fn finish(
        self,
        client: &Keypair,
        packet2: &[u8; PACKET2_BYTES],
    ) -> Result<(SessionKeys, x25519::PublicKey, [u8; PACKET3_BYTES]), Error> {
        let mut transcript = self.transcript;
        let server_ephemeral = read_public(packet2);
        let mut encrypted_static = [0u8; PUBLIC_KEY_BYTES + TAG_BYTES];
        encrypted_static.copy_from_slice(
            &packet2[PUBLIC_KEY_BYTES..PUBLIC_KEY_BYTES * 2 + TAG_BYTES],
        );
        let tag2 = read_tag(&packet2[PUBLIC_KEY_BYTES * 2 + TAG_BYTES..]);

        transcript.mix(b"e", server_ephemeral.as_bytes());
        transcript.mix_dh(b"ee", &self.ephemeral.secret, &server_ephemeral)?;
        let server_static = transcript.decrypt_key(&encrypted_static)?;
        transcript.mix_dh(b"se", &self.ephemeral.secret, &server_static)?;
        transcript.verify_tag(&tag2)?;

        let encrypted_client = transcript.encrypt_key(client.public.as_bytes());
        transcript.mix_dh(b"es", &client.secret, &server_ephemeral)?;
        let tag3 = transcript.tag();

        let mut packet = [0u8; PACKET3_BYTES];
        packet[..encrypted_client.len()].copy_from_slice(&encrypted_client);
        packet[encrypted_client.len()..].copy_from_slice(&tag3);

        Ok((transcript.split(true), server_static, packet))
    }
}

impl Responder {
    /// Server side, step 4: verify packet 3, learn the client's static,
    /// and derive the session keys.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if packet 3 fails authentication
    /// - [`Error::WeakPublicKey`] on degenerate keys
    pub fn finish(
        self,
        packet3: &[u8; PACKET3_BYTES],
    ) -> Result<(SessionKeys, x25519::PublicKey), Error> {
        let mut transcript = self.transcript;
        let mut encrypted_client = [0u8; PUBLIC_KEY_BYTES + TAG_BYTES];
        encrypted_client.copy_from_slice(&packet3[..PUBLIC_KEY_BYTES + TAG_BYTES]);
        let tag3 = read_tag(&packet3[PUBLIC_KEY_BYTES + TAG_BYTES..]);

        let client_static = transcript.decrypt_key(&encrypted_client)?;
        transcript.mix_dh(b"es", &self.ephemeral.secret, &client_static)?;
        transcript.verify_tag(&tag3)?;

        Ok((transcript.split(false), client_static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Keypair {
        Keypair::from_seed(&[0x11u8; 32])
    }

    fn server() -> Keypair {
        Keypair::from_seed(&[0x22u8; 32])
    }

    #[test]
    fn handshake_completes_and_reveals_statics() {
        let client = client();
        let server = server();

        let (state_i, packet1) = initiate(None);
        let (state_r, packet2) = respond(&packet1, &server, None).unwrap();
        let (client_keys, learned_server, packet3) = state_i.finish(&client, &packet2).unwrap();
        let (server_keys, learned_client) = state_r.finish(&packet3).unwrap();

        assert_eq!(learned_server, server.public);
        assert_eq!(learned_client, client.public);
        assert_eq!(client_keys.tx.as_bytes(), server_keys.rx.as_bytes());
        assert_eq!(client_keys.rx.as_bytes(), server_keys.tx.as_bytes());
    }

    #[test]
    fn psk_handshake_completes() {
        let client = client();
        let server = server();
        let psk = [0x33u8; 32];

        let (state_i, packet1) = initiate(Some(&psk));
        let (state_r, packet2) = respond(&packet1, &server, Some(&psk)).unwrap();
        let (client_keys, _, packet3) = state_i.finish(&client, &packet2).unwrap();
        let (server_keys, _) = state_r.finish(&packet3).unwrap();

        assert_eq!(client_keys.tx.as_bytes(), server_keys.rx.as_bytes());
    }

    #[test]
    fn psk_mismatch_fails_at_first_packet() {
        let server = server();
        let (_, packet1) = initiate(Some(&[1u8; 32]));
        assert!(matches!(
            respond(&packet1, &server, Some(&[2u8; 32])),
            Err(Error::Authentication)
        ));
    }

    #[test]
    fn statics_are_not_sent_in_clear() {
        let server = server();
        let (_, packet1) = initiate(None);
        let (_, packet2) = respond(&packet1, &server, None).unwrap();

        let window = PUBLIC_KEY_BYTES..PUBLIC_KEY_BYTES * 2;
        assert_ne!(&packet2[window], server.public.as_bytes());
    }

    #[test]
    fn tampered_packet2_fails() {
        let client = client();
        let server = server();

        let (state_i, packet1) = initiate(None);
        let (_, packet2) = respond(&packet1, &server, None).unwrap();

        let mut tampered = packet2;
        tampered[50] ^= 1;
        assert!(state_i.finish(&client, &tampered).is_err());
    }

    #[test]
    fn tampered_packet3_fails() {
        let client = client();
        let server = server();

        let (state_i, packet1) = initiate(None);
        let (state_r, packet2) = respond(&packet1, &server, None).unwrap();
        let (_, _, packet3) = state_i.finish(&client, &packet2).unwrap();

        let mut tampered = packet3;
        tampered[10] ^= 1;
        assert!(state_r.finish(&tampered).is_err());
    }

    #[test]
    fn packet_sizes_match_the_wire_contract() {
        assert_eq!(PACKET1_BYTES, 48);
        assert_eq!(PACKET2_BYTES, 96);
        assert_eq!(PACKET3_BYTES, 64);
    }

    #[test]
    fn sessions_are_fresh_across_handshakes() {
        let client = client();
        let server = server();

        let run = || {
            let (state_i, packet1) = initiate(None);
            let (state_r, packet2) = respond(&packet1, &server, None).unwrap();
            let (keys, _, packet3) = state_i.finish(&client, &packet2).unwrap();
            state_r.finish(&packet3).unwrap();
            keys
        };

        let first = run();
        let second = run();
        assert_ne!(first.tx.as_bytes(), second.tx.as_bytes());
    }
}
