//! GF(2^255 - 19) in radix-2^51.
//!
//! Field elements are five 64-bit limbs of 51 bits each; products go
//! through `u128` and are folded back with the `19 * carry` identity.
//! Additions and subtractions re-establish the loose limb bound with a
//! fixed carry sweep, so every element stays well inside the headroom the
//! multiplier needs.

const MASK_51: u64 = 0x0007_ffff_ffff_ffff;

/// Bias added before subtraction so limbs never underflow.
///
/// Limb zero uses `2 * (2^51 - 19)`, the rest `2 * (2^51 - 1)`; together
/// they add `2 * p`, which vanishes modulo p.
const SUB_PAD_0: u64 = 0x000f_ffff_ffff_ffda;
const SUB_PAD: u64 = 0x000f_ffff_ffff_fffe;

/// An element of GF(2^255 - 19).
#[derive(Clone, Copy, Debug)]
pub struct Fe([u64; 5]);

impl Fe {
    /// The additive identity.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0, 0, 0, 0, 0])
    }

    /// The multiplicative identity.
    #[must_use]
    pub const fn one() -> Self {
        Self([1, 0, 0, 0, 0])
    }

    /// Decode a little-endian 32-byte string.
    ///
    /// Bit 255 is ignored, as every 25519 encoding requires.
    #[must_use]
    pub fn from_bytes(s: &[u8; 32]) -> Self {
        let window = |range: core::ops::Range<usize>| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&s[range]);
            u64::from_le_bytes(buf)
        };

        Self([
            window(0..8) & MASK_51,
            (window(6..14) >> 3) & MASK_51,
            (window(12..20) >> 6) & MASK_51,
            (window(19..27) >> 1) & MASK_51,
            (window(24..32) >> 12) & MASK_51,
        ])
    }

    /// Encode to the canonical little-endian 32-byte string.
    ///
    /// Fully reduces modulo p first; the final subtract-p-or-not choice is
    /// made by mask, not branch, since the value may be secret.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 32] {
        let mut h = self.0;

        for _ in 0..2 {
            let mut carry = h[0] >> 51;
            h[0] &= MASK_51;
            for i in 1..5 {
                h[i] += carry;
                carry = h[i] >> 51;
                h[i] &= MASK_51;
            }
            h[0] += 19 * carry;
        }

        // Add 19 and watch the top carry: it overflows exactly when the
        // value is >= p, in which case the wrapped candidate is the
        // canonical form.
        let mut candidate = [0u64; 5];
        let mut carry = 19u64;
        for i in 0..5 {
            let sum = h[i] + carry;
            candidate[i] = sum & MASK_51;
            carry = sum >> 51;
        }
        let keep_original = carry.wrapping_sub(1);

        for i in 0..5 {
            h[i] = (h[i] & keep_original) | (candidate[i] & !keep_original);
        }

        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&(h[0] | (h[1] << 51)).to_le_bytes());
        out[8..16].copy_from_slice(&((h[1] >> 13) | (h[2] << 38)).to_le_bytes());
        out[16..24].copy_from_slice(&((h[2] >> 26) | (h[3] << 25)).to_le_bytes());
        out[24..32].copy_from_slice(&((h[3] >> 39) | (h[4] << 12)).to_le_bytes());
        out
    }

    fn carry_sweep(h: &mut [u64; 5]) {
        let mut carry = h[0] >> 51;
        h[0] &= MASK_51;
        for i in 1..5 {
            h[i] += carry;
            carry = h[i] >> 51;
            h[i] &= MASK_51;
        }
        h[0] += 19 * carry;
        let carry = h[0] >> 51;
        h[0] &= MASK_51;
        h[1] += carry;
    }

    /// Field addition.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut h = [0u64; 5];
        for i in 0..5 {
            h[i] = self.0[i] + other.0[i];
        }
        Self::carry_sweep(&mut h);
        Self(h)
    }

    /// Field subtraction.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut h = [0u64; 5];
        h[0] = self.0[0] + SUB_PAD_0 - other.0[0];
        for i in 1..5 {
            h[i] = self.0[i] + SUB_PAD - other.0[i];
        }
        Self::carry_sweep(&mut h);
        Self(h)
    }

    /// Field multiplication.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let f: [u128; 5] = [
            u128::from(self.0[0]),
            u128::from(self.0[1]),
            u128::from(self.0[2]),
            u128::from(self.0[3]),
            u128::from(self.0[4]),
        ];
        let g: [u128; 5] = [
            u128::from(other.0[0]),
            u128::from(other.0[1]),
            u128::from(other.0[2]),
            u128::from(other.0[3]),
            u128::from(other.0[4]),
        ];
        let g19: [u128; 5] = [0, g[1] * 19, g[2] * 19, g[3] * 19, g[4] * 19];

        let h = [
            f[0] * g[0] + f[1] * g19[4] + f[2] * g19[3] + f[3] * g19[2] + f[4] * g19[1],
            f[0] * g[1] + f[1] * g[0] + f[2] * g19[4] + f[3] * g19[3] + f[4] * g19[2],
            f[0] * g[2] + f[1] * g[1] + f[2] * g[0] + f[3] * g19[4] + f[4] * g19[3],
            f[0] * g[3] + f[1] * g[2] + f[2] * g[1] + f[3] * g[0] + f[4] * g19[4],
            f[0] * g[4] + f[1] * g[3] + f[2] * g[2] + f[3] * g[1] + f[4] * g[0],
        ];

        let mask = u128::from(MASK_51);
        let mut out = [0u64; 5];
        let mut carry: u128 = 0;
        for i in 0..5 {
            let d = h[i] + carry;
            out[i] = (d & mask) as u64;
            carry = d >> 51;
        }
        let d = u128::from(out[0]) + carry * 19;
        out[0] = (d & mask) as u64;
        out[1] += (d >> 51) as u64;
        Self(out)
    }

    /// Field squaring.
    #[must_use]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// `n` successive squarings.
    #[must_use]
    fn sqn(&self, n: u32) -> Self {
        let mut t = self.square();
        for _ in 1..n {
            t = t.square();
        }
        t
    }

    /// Multiply by a small constant (fits the ladder's 121665).
    #[must_use]
    pub fn mul_small(&self, n: u32) -> Self {
        let n = u128::from(n);
        let mask = u128::from(MASK_51);
        let mut out = [0u64; 5];
        let mut carry: u128 = 0;
        for i in 0..5 {
            let d = u128::from(self.0[i]) * n + carry;
            out[i] = (d & mask) as u64;
            carry = d >> 51;
        }
        let d = u128::from(out[0]) + carry * 19;
        out[0] = (d & mask) as u64;
        out[1] += (d >> 51) as u64;
        Self(out)
    }

    /// Shared ladder for the two Fermat exponentiations: returns
    /// `(self^(2^250 - 1), self^11)`.
    fn pow_250_1(&self) -> (Self, Self) {
        let z2 = self.square();
        let z8 = z2.sqn(2);
        let z9 = self.mul(&z8);
        let z11 = z2.mul(&z9);
        let z_5_0 = z11.square().mul(&z9);
        let z_10_0 = z_5_0.sqn(5).mul(&z_5_0);
        let z_20_0 = z_10_0.sqn(10).mul(&z_10_0);
        let z_40_0 = z_20_0.sqn(20).mul(&z_20_0);
        let z_50_0 = z_40_0.sqn(10).mul(&z_10_0);
        let z_100_0 = z_50_0.sqn(50).mul(&z_50_0);
        let z_200_0 = z_100_0.sqn(100).mul(&z_100_0);
        let z_250_0 = z_200_0.sqn(50).mul(&z_50_0);
        (z_250_0, z11)
    }

    /// Multiplicative inverse via Fermat: `self^(p - 2)`.
    ///
    /// Zero maps to zero, which the ladder callers rely on.
    #[must_use]
    pub fn invert(&self) -> Self {
        let (z_250_0, z11) = self.pow_250_1();
        z_250_0.sqn(5).mul(&z11)
    }

    /// `self^((p - 5) / 8)`, the square-root helper for decompression.
    #[must_use]
    pub fn pow_p58(&self) -> Self {
        let (z_250_0, _) = self.pow_250_1();
        z_250_0.sqn(2).mul(self)
    }

    /// Branchless swap of two elements when `swap` is 1.
    pub fn cswap(a: &mut Self, b: &mut Self, swap: u8) {
        let mask = 0u64.wrapping_sub(u64::from(swap));
        for i in 0..5 {
            let t = mask & (a.0[i] ^ b.0[i]);
            a.0[i] ^= t;
            b.0[i] ^= t;
        }
    }

    /// Parity of the canonical encoding (the Edwards "sign" bit).
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.to_bytes()[0] & 1 == 1
    }

    /// Whether this is the zero element (canonical comparison).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.to_bytes() == [0u8; 32]
    }

    /// Canonical equality. Not constant-time; callers only compare public
    /// values (decompression checks).
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::zero().sub(self)
    }
}
