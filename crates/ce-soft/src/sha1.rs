// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! SHA-1 single-block compression (FIPS 180-4)

use zeroize::Zeroize;

use crate::BLOCK_LEN;

/// SHA-1 initial digest state (FIPS 180-4 §5.3.1).
pub const SHA1_IV: [u32; 5] = [
    0x6745_2301,
    0xefcd_ab89,
    0x98ba_dcfe,
    0x1032_5476,
    0xc3d2_e1f0,
];

/// Round constants, one per 20-round group.
const K: [u32; 4] = [0x5a82_7999, 0x6ed9_eba1, 0x8f1b_bcdc, 0xca62_c1d6];

/// Compress one 64-byte block into `state`.
///
/// Words are loaded big-endian per FIPS 180-4. Scratch state is wiped
/// before returning.
pub fn compress(state: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 80];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for i in 16..80 {
        w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
    }

    let mut regs = *state;
    for i in 0..80 {
        let [a, b, c, d, e] = regs;
        let (f, k) = match i / 20 {
            0 => ((b & c) | (!b & d), K[0]),
            1 => (b ^ c ^ d, K[1]),
            2 => ((b & c) | (b & d) | (c & d), K[2]),
            _ => (b ^ c ^ d, K[3]),
        };
        let t = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(w[i]);
        regs = [t, a, b.rotate_left(30), c, d];
    }

    for (s, r) in state.iter_mut().zip(regs.iter()) {
        *s = s.wrapping_add(*r);
    }

    w.zeroize();
    regs.zeroize();
}

/// One-shot SHA-1 over `data`.
#[must_use]
pub fn digest(data: &[u8]) -> [u8; 20] {
    let mut state = SHA1_IV;
    let mut block = [0u8; BLOCK_LEN];

    let mut chunks = data.chunks_exact(BLOCK_LEN);
    for chunk in &mut chunks {
        block.copy_from_slice(chunk);
        compress(&mut state, &block);
    }

    let rem = chunks.remainder();
    block = [0u8; BLOCK_LEN];
    block[..rem.len()].copy_from_slice(rem);
    block[rem.len()] = 0x80;
    if rem.len() + 9 > BLOCK_LEN {
        compress(&mut state, &block);
        block = [0u8; BLOCK_LEN];
    }
    let bits = (data.len() as u64) * 8;
    block[BLOCK_LEN - 8..].copy_from_slice(&bits.to_be_bytes());
    compress(&mut state, &block);

    let mut out = [0u8; 20];
    for (i, word) in state.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
    block.zeroize();
    state.zeroize();
    out
}
