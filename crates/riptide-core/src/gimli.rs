//! The Gimli permutation over a 48-byte state.
//!
//! 24 rounds of a confusion/diffusion network over twelve 32-bit words,
//! viewed as a 3x4 matrix of 96-bit columns. Each round applies a
//! non-linear SP-box to every column; every second round a linear swap
//! shuffles the top row, and every fourth round a constant is injected.
//!
//! # Security
//!
//! The round schedule is fixed and the word operations (rotates, shifts,
//! AND/OR/XOR) are constant-time on every target we care about. Nothing in
//! here branches on, or indexes memory by, state contents.

/// Number of 32-bit words in the permutation state.
pub const STATE_WORDS: usize = 12;

/// Size of the permutation state in bytes.
pub const STATE_BYTES: usize = 48;

/// Number of rounds applied by [`permute`].
pub const ROUNDS: u32 = 24;

const ROUND_CONSTANT: u32 = 0x9e37_7900;

/// Apply the full 24-round permutation in place.
pub fn permute(state: &mut [u32; STATE_WORDS]) {
    let mut round = ROUNDS;
    while round > 0 {
        for column in 0..4 {
            let x = state[column].rotate_left(24);
            let y = state[4 + column].rotate_left(9);
            let z = state[8 + column];

            state[8 + column] = x ^ (z << 1) ^ ((y & z) << 2);
            state[4 + column] = y ^ x ^ ((x | z) << 1);
            state[column] = z ^ y ^ ((x & y) << 3);
        }

        match round & 3 {
            0 => {
                // Small swap plus round constant injection
                state.swap(0, 1);
                state.swap(2, 3);
                state[0] ^= ROUND_CONSTANT | round;
            },
            2 => {
                // Big swap
                state.swap(0, 2);
                state.swap(1, 3);
            },
            _ => {},
        }

        round -= 1;
    }
}

/// Apply the permutation to a 48-byte little-endian view of the state.
pub fn permute_bytes(bytes: &mut [u8; STATE_BYTES]) {
    let mut words = [0u32; STATE_WORDS];
    for (i, word) in words.iter_mut().enumerate() {
        let mut chunk = [0u8; 4];
        chunk.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
        *word = u32::from_le_bytes(chunk);
    }

    permute(&mut words);

    for (i, word) in words.iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
}
