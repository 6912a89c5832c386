//! X25519 scalar multiplication on the Montgomery form.

use zeroize::Zeroize;

use crate::field::Fe;

/// The u-coordinate of the generator.
pub const BASEPOINT_U: [u8; 32] = {
    let mut u = [0u8; 32];
    u[0] = 9;
    u
};

const A24: u32 = 121_665;

/// Clamp a 32-byte scalar in place per the X25519 contract.
///
/// Clears the low cofactor bits and the top bit, sets bit 254.
pub fn clamp(scalar: &mut [u8; 32]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}

/// Multiply the point with u-coordinate `point` by `scalar`.
///
/// The scalar is clamped internally; the internal copy is wiped before
/// returning. The ladder runs a fixed 255 iterations with masked swaps, so
/// timing is independent of the scalar.
#[must_use]
pub fn scalar_mul(scalar: &[u8; 32], point: &[u8; 32]) -> [u8; 32] {
    let mut s = *scalar;
    clamp(&mut s);

    let x1 = Fe::from_bytes(point);
    let mut x2 = Fe::one();
    let mut z2 = Fe::zero();
    let mut x3 = x1;
    let mut z3 = Fe::one();

    let mut swap = 0u8;
    for i in (0..255).rev() {
        let bit = (s[i / 8] >> (i % 8)) & 1;
        swap ^= bit;
        Fe::cswap(&mut x2, &mut x3, swap);
        Fe::cswap(&mut z2, &mut z3, swap);
        swap = bit;

        let a = x2.add(&z2);
        let aa = a.square();
        let b = x2.sub(&z2);
        let bb = b.square();
        let e = aa.sub(&bb);
        let c = x3.add(&z3);
        let d = x3.sub(&z3);
        let da = d.mul(&a);
        let cb = c.mul(&b);

        x3 = da.add(&cb).square();
        z3 = da.sub(&cb).square().mul(&x1);
        x2 = aa.mul(&bb);
        z2 = e.mul(&aa.add(&e.mul_small(A24)));
    }
    Fe::cswap(&mut x2, &mut x3, swap);
    Fe::cswap(&mut z2, &mut z3, swap);

    s.zeroize();
    x2.mul(&z2.invert()).to_bytes()
}

/// Multiply the generator by `scalar`.
#[must_use]
pub fn scalar_mul_base(scalar: &[u8; 32]) -> [u8; 32] {
    scalar_mul(scalar, &BASEPOINT_U)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(hex_str: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut out).unwrap();
        out
    }

    #[test]
    fn rfc7748_vector_one() {
        let scalar = decode("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
        let point = decode("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let expected = decode("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");

        assert_eq!(scalar_mul(&scalar, &point), expected);
    }

    #[test]
    fn rfc7748_vector_two() {
        let scalar = decode("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
        let point = decode("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let expected = decode("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");

        assert_eq!(scalar_mul(&scalar, &point), expected);
    }

    #[test]
    fn rfc7748_iterated_once() {
        let expected = decode("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079");
        assert_eq!(scalar_mul(&BASEPOINT_U, &BASEPOINT_U), expected);
    }

    #[test]
    fn rfc7748_iterated_thousand() {
        let mut k = BASEPOINT_U;
        let mut u = BASEPOINT_U;
        for _ in 0..1000 {
            let result = scalar_mul(&k, &u);
            u = k;
            k = result;
        }

        let expected = decode("684cf59ba83309552800ef566f2f4d3c1c3887c49360e3875f2eb94d99532c51");
        assert_eq!(k, expected);
    }

    #[test]
    fn rfc7748_diffie_hellman_pair() {
        let alice_sk = decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
        let bob_sk = decode("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");

        let alice_pk = scalar_mul_base(&alice_sk);
        let bob_pk = scalar_mul_base(&bob_sk);
        assert_eq!(
            alice_pk,
            decode("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a")
        );
        assert_eq!(
            bob_pk,
            decode("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f")
        );

        let shared_ab = scalar_mul(&alice_sk, &bob_pk);
        let shared_ba = scalar_mul(&bob_sk, &alice_pk);
        let expected = decode("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");
        assert_eq!(shared_ab, expected);
        assert_eq!(shared_ba, expected);
    }

    #[test]
    fn zero_point_yields_zero_secret() {
        // Small-order input: the ladder maps it to all zeros; policy
        // decisions live in the caller
        let scalar = [0x42u8; 32];
        assert_eq!(scalar_mul(&scalar, &[0u8; 32]), [0u8; 32]);
    }

    #[test]
    fn clamping_is_applied() {
        let mut unclamped = [0xffu8; 32];
        let result_raw = scalar_mul(&unclamped, &BASEPOINT_U);
        clamp(&mut unclamped);
        let result_clamped = scalar_mul(&unclamped, &BASEPOINT_U);

        assert_eq!(result_raw, result_clamped);
    }
}
