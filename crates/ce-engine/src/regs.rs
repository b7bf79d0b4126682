// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Engine register map
//!
//! The engine exposes a single-shot command interface: software writes a
//! 22-word descriptor image into the descriptor window, pulses the
//! trigger bit, and busy-polls the status register. Completion and error
//! flags are write-1-to-clear. Chained-mode ciphers leave their updated
//! IV in the IV readback window; hash operations exchange running digest
//! state through the digest window.

/// Engine control register
pub const CE_CTRL: usize = 0x0000;
/// Engine status register (read), write-1-to-clear
pub const CE_STATUS: usize = 0x0004;
/// Interrupt status register, write-1-to-clear mirror of `CE_STATUS`
pub const CE_INTR: usize = 0x0008;

/// Descriptor register window base (22 words)
pub const CE_DESC_BASE: usize = 0x0010;
/// IV readback window base (4 words)
pub const CE_IV_BASE: usize = 0x0070;
/// Digest state window base (8 words, read/write)
pub const CE_DIGEST_BASE: usize = 0x0080;

/// Total register window size in bytes
pub const CE_WINDOW_LEN: usize = 0x00A0;

// CE_CTRL bits
/// Start executing the descriptor currently in the window
pub const CTRL_TRIGGER: u32 = 1 << 0;

// CE_STATUS / CE_INTR bits
/// Descriptor completed
pub const STATUS_DONE: u32 = 1 << 0;
/// Descriptor aborted with an error
pub const STATUS_ERR: u32 = 1 << 1;
/// Engine busy
pub const STATUS_BUSY: u32 = 1 << 2;

// Descriptor control-word bits
/// Raise the completion interrupt line on done
pub const DESC_CTRL_INT_EN: u32 = 1 << 0;
/// One-hot key select: explicit key bytes from the descriptor
pub const DESC_CTRL_KEYSEL_SOFT: u32 = 1 << 4;
/// One-hot key select: device-resident secure key
pub const DESC_CTRL_KEYSEL_SECURE: u32 = 1 << 5;
/// Key-select field mask
pub const DESC_CTRL_KEYSEL_MASK: u32 = 0x3 << 4;
/// Block-cipher operation
pub const DESC_CTRL_CIPHER: u32 = 1 << 8;
/// Hash operation
pub const DESC_CTRL_HASH: u32 = 1 << 9;
/// Transcode (base64) operation
pub const DESC_CTRL_TRANSCODE: u32 = 1 << 10;
/// Pass-through copy, no algorithm involved
pub const DESC_CTRL_BYPASS: u32 = 1 << 11;

// Algorithm selector word
/// Direction bit: encrypt (ciphers) / encode (transcode)
pub const ALG_SEL_ENCRYPT: u32 = 1 << 0;
/// Shift for the mode field (bits 7:4)
pub const ALG_SEL_MODE_SHIFT: u32 = 4;
/// Shift for the algorithm id field (bits 15:8)
pub const ALG_SEL_ID_SHIFT: u32 = 8;

// Mode field values
/// Electronic codebook
pub const MODE_ECB: u32 = 0x0;
/// Cipher block chaining
pub const MODE_CBC: u32 = 0x1;
/// Counter
pub const MODE_CTR: u32 = 0x2;
/// Output feedback
pub const MODE_OFB: u32 = 0x3;

// Algorithm id field values
/// DES
pub const ID_DES: u32 = 0x01;
/// Triple DES (EDE, three keys)
pub const ID_TDES: u32 = 0x02;
/// AES with a 128-bit key
pub const ID_AES128: u32 = 0x03;
/// AES with a 192-bit key
pub const ID_AES192: u32 = 0x04;
/// AES with a 256-bit key
pub const ID_AES256: u32 = 0x05;
/// SM4
pub const ID_SM4: u32 = 0x06;
/// SHA-1
pub const ID_SHA1: u32 = 0x10;
/// SHA-256
pub const ID_SHA256: u32 = 0x11;
/// SM3
pub const ID_SM3: u32 = 0x12;
/// Base64 transcoder
pub const ID_BASE64: u32 = 0x20;

/// Build an algorithm selector value from id and mode fields.
#[must_use]
pub const fn selector(id: u32, mode: u32) -> u32 {
    (id << ALG_SEL_ID_SHIFT) | (mode << ALG_SEL_MODE_SHIFT)
}
