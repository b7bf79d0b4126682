// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! SM3 single-block compression (GB/T 32905-2016)

use zeroize::Zeroize;

use crate::BLOCK_LEN;

/// SM3 initial digest state (GB/T 32905-2016 §4.1).
pub const SM3_IV: [u32; 8] = [
    0x7380_166f,
    0x4914_b2b9,
    0x1724_42d7,
    0xda8a_0600,
    0xa96f_30bc,
    0x1631_38aa,
    0xe38d_ee4d,
    0xb0fb_0e4e,
];

const T0: u32 = 0x79cc_4519;
const T1: u32 = 0x7a87_9d8a;

#[inline]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

#[inline]
fn ff(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

#[inline]
fn gg(j: usize, x: u32, y: u32, z: u32) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

/// Compress one 64-byte block into `state`.
///
/// Words are loaded big-endian per the standard. Scratch state is wiped
/// before returning.
pub fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 68];
    let mut wp = [0u32; 64];
    for (i, chunk) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for i in 16..68 {
        w[i] = p1(w[i - 16] ^ w[i - 9] ^ w[i - 3].rotate_left(15))
            ^ w[i - 13].rotate_left(7)
            ^ w[i - 6];
    }
    for i in 0..64 {
        wp[i] = w[i] ^ w[i + 4];
    }

    let mut regs = *state;
    for j in 0..64 {
        let [a, b, c, d, e, f, g, h] = regs;
        let t = if j < 16 { T0 } else { T1 };
        let ss1 = a
            .rotate_left(12)
            .wrapping_add(e)
            .wrapping_add(t.rotate_left((j % 32) as u32))
            .rotate_left(7);
        let ss2 = ss1 ^ a.rotate_left(12);
        let tt1 = ff(j, a, b, c)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(wp[j]);
        let tt2 = gg(j, e, f, g)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add(w[j]);
        regs = [
            tt1,
            a,
            b.rotate_left(9),
            c,
            p0(tt2),
            e,
            f.rotate_left(19),
            g,
        ];
    }

    for (s, r) in state.iter_mut().zip(regs.iter()) {
        *s ^= *r;
    }

    w.zeroize();
    wp.zeroize();
    regs.zeroize();
}

/// One-shot SM3 over `data`.
#[must_use]
pub fn digest(data: &[u8]) -> [u8; 32] {
    let mut state = SM3_IV;
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

    let mut out = [0u8; 32];
    for (i, word) in state.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
    block.zeroize();
    state.zeroize();
    out
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use ::sm3::{Digest, Sm3};

    #[test]
    fn test_sm3_abc() {
        // GB/T 32905-2016 Appendix A example 1.
        let d = digest(b"abc");
        assert_eq!(
            d,
            [
                0x66, 0xc7, 0xf0, 0xf4, 0x62, 0xee, 0xed, 0xd9, 0xd1, 0xf2, 0xd4, 0x6b, 0xdc,
                0x10, 0xe4, 0xe2, 0x41, 0x67, 0xc4, 0x87, 0x5c, 0xf2, 0xf7, 0xa2, 0x29, 0x7d,
                0xa0, 0x2b, 0x8f, 0x4b, 0xa8, 0xe0,
            ]
        );
    }

    #[test]
    fn test_sm3_64_byte_message() {
        // GB/T 32905-2016 Appendix A example 2: "abcd" repeated 16 times.
        let mut msg = [0u8; 64];
        for (i, b) in msg.iter_mut().enumerate() {
            *b = b"abcd"[i % 4];
        }
        let d = digest(&msg);
        assert_eq!(
            d,
            [
                0xde, 0xbe, 0x9f, 0xf9, 0x22, 0x75, 0xb8, 0xa1, 0x38, 0x60, 0x48, 0x89, 0xc1,
                0x8e, 0x5a, 0x4d, 0x6f, 0xdb, 0x70, 0xe5, 0x38, 0x7e, 0x57, 0x65, 0x29, 0x3d,
                0xcb, 0xa3, 0x9c, 0x0c, 0x57, 0x32,
            ]
        );
    }

    #[test]
    fn test_sm3_matches_oracle_across_lengths() {
        let data: std::vec::Vec<u8> = (0..257).map(|i| (i * 7 + 1) as u8).collect();
        for len in [0usize, 1, 55, 56, 63, 64, 65, 119, 128, 257] {
            let ours = digest(&data[..len]);
            let theirs = Sm3::digest(&data[..len]);
            assert_eq!(ours[..], theirs[..], "length {len}");
        }
    }
}
