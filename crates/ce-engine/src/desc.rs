// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Engine descriptor
//!
//! Fixed-layout command record consumed by the hardware in one shot:
//!
//! ```text
//! control(32) | alg-select(32) | next(64) | src(64) | dst(64) |
//! len(64) | key-or-dest-len(256) | iv(128)
//! ```
//!
//! 22 little-endian 32-bit words. `next` is always zero — the engine is
//! driven single-shot, descriptor chaining is not used. The 256-bit key
//! field is a union: key bytes for ciphers, destination length for the
//! base64 transcoder, unused otherwise.

use zeroize::Zeroize;

/// Descriptor size in 32-bit words
pub const DESC_WORDS: usize = 22;

/// Maximum explicit key length the descriptor can carry, in bytes
pub const DESC_KEY_MAX: usize = 32;

/// Tagged rendering of the descriptor's 256-bit key field
///
/// The meaning depends on the algorithm category; it is never
/// reinterpreted raw.
#[derive(Clone)]
pub enum KeyField {
    /// Field unused (hashes, bypass, secure-key ciphers)
    None,
    /// Explicit cipher key bytes
    Key {
        /// Key material, zero padded to the field width
        bytes: [u8; DESC_KEY_MAX],
        /// Significant key length in bytes
        len: usize,
    },
    /// Destination length for the base64 transcoder
    DestLen(u64),
}

impl KeyField {
    /// Build an explicit-key field from a validated key slice.
    #[must_use]
    pub fn from_key(key: &[u8]) -> Self {
        let mut bytes = [0u8; DESC_KEY_MAX];
        bytes[..key.len()].copy_from_slice(key);
        Self::Key {
            bytes,
            len: key.len(),
        }
    }
}

impl Zeroize for KeyField {
    fn zeroize(&mut self) {
        if let Self::Key { bytes, .. } = self {
            bytes.zeroize();
        }
        *self = Self::None;
    }
}

/// One hardware command
///
/// A transient value: built, written to the descriptor window,
/// triggered, and discarded. Never retained past one trigger.
pub struct EngineDescriptor {
    /// Control word
    pub ctrl: u32,
    /// Algorithm selector (direction bit OR-ed in for ciphers)
    pub selector: u32,
    /// Next-descriptor pointer, always 0
    pub next: u64,
    /// Source physical address
    pub src: u64,
    /// Destination physical address
    pub dst: u64,
    /// Payload length in bytes; always an exact multiple of the active
    /// algorithm's block length — the hardware never sees padding
    pub len: u64,
    /// Key-or-destination-length union
    pub key: KeyField,
    /// IV bytes (low `iv_len` bytes significant)
    pub iv: [u8; 16],
}

impl EngineDescriptor {
    /// Serialize into the 22-word register image.
    #[must_use]
    pub fn to_words(&self) -> [u32; DESC_WORDS] {
        let mut w = [0u32; DESC_WORDS];
        w[0] = self.ctrl;
        w[1] = self.selector;
        w[2] = self.next as u32;
        w[3] = (self.next >> 32) as u32;
        w[4] = self.src as u32;
        w[5] = (self.src >> 32) as u32;
        w[6] = self.dst as u32;
        w[7] = (self.dst >> 32) as u32;
        w[8] = self.len as u32;
        w[9] = (self.len >> 32) as u32;
        match &self.key {
            KeyField::None => {}
            KeyField::Key { bytes, .. } => {
                for (i, chunk) in bytes.chunks_exact(4).enumerate() {
                    w[10 + i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                }
            }
            KeyField::DestLen(dlen) => {
                w[10] = *dlen as u32;
                w[11] = (*dlen >> 32) as u32;
            }
        }
        for (i, chunk) in self.iv.chunks_exact(4).enumerate() {
            w[18 + i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        w
    }
}

impl Drop for EngineDescriptor {
    fn drop(&mut self) {
        // Key material must not linger on the stack.
        self.key.zeroize();
    }
}
