// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Algorithm tables
//!
//! The hardware supports a closed, enumerable set of algorithms; there
//! is no plugin registration. Every algorithm maps to one immutable
//! [`AlgorithmRecord`] in a process-wide table holding its control-word
//! template, selector value, and the hardware-dictated length constants.

use crate::regs::{
    selector, DESC_CTRL_CIPHER, DESC_CTRL_HASH, DESC_CTRL_INT_EN, DESC_CTRL_KEYSEL_SOFT,
    DESC_CTRL_TRANSCODE, ID_AES128, ID_AES192, ID_AES256, ID_BASE64, ID_DES, ID_SHA1, ID_SHA256,
    ID_SM3, ID_SM4, ID_TDES, MODE_CBC, MODE_CTR, MODE_ECB, MODE_OFB,
};

/// Closed algorithm enumeration
///
/// The discriminant doubles as the index into [`ALGORITHM_TABLE`] and
/// the bit position in the per-instance enable mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum Algorithm {
    DesEcb = 0,
    DesCbc,
    DesCtr,
    TdesEcb,
    TdesCbc,
    TdesCtr,
    Aes128Ecb,
    Aes128Cbc,
    Aes128Ctr,
    Aes192Ecb,
    Aes192Cbc,
    Aes192Ctr,
    Aes256Ecb,
    Aes256Cbc,
    Aes256Ctr,
    Sm4Ecb,
    Sm4Cbc,
    Sm4Ctr,
    Sm4Ofb,
    Sha1,
    Sha256,
    Sm3,
    Base64,
}

/// Number of supported algorithms
pub const ALGORITHM_COUNT: usize = 23;

/// Operation category an algorithm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgCategory {
    /// Block cipher
    Cipher,
    /// Cryptographic hash
    Hash,
    /// Base64 transcoder
    Transcode,
}

/// Immutable per-algorithm hardware parameters
///
/// All lengths are hardware-dictated constants, not design choices.
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmRecord {
    /// Control-word template for the descriptor
    pub ctrl: u32,
    /// Algorithm selector value (direction bit not included)
    pub selector: u32,
    /// Operation category
    pub category: AlgCategory,
    /// Minimum processing granularity in bytes
    pub block_len: usize,
    /// Key length in bytes (0 for hashes and transcode)
    pub key_len: usize,
    /// IV length in bytes (0 for ECB, hashes, transcode)
    pub iv_len: usize,
    /// Digest length in bytes (0 for ciphers and transcode)
    pub digest_len: usize,
    /// Running digest state size in 32-bit words (hashes only)
    pub state_words: usize,
}

const fn cipher(sel: u32, block_len: usize, key_len: usize, iv_len: usize) -> AlgorithmRecord {
    AlgorithmRecord {
        ctrl: DESC_CTRL_CIPHER | DESC_CTRL_KEYSEL_SOFT | DESC_CTRL_INT_EN,
        selector: sel,
        category: AlgCategory::Cipher,
        block_len,
        key_len,
        iv_len,
        digest_len: 0,
        state_words: 0,
    }
}

const fn hash(sel: u32, digest_len: usize, state_words: usize) -> AlgorithmRecord {
    AlgorithmRecord {
        ctrl: DESC_CTRL_HASH | DESC_CTRL_INT_EN,
        selector: sel,
        category: AlgCategory::Hash,
        block_len: ce_soft::BLOCK_LEN,
        key_len: 0,
        iv_len: 0,
        digest_len,
        state_words,
    }
}

/// Process-wide algorithm table, populated once, never mutated.
pub static ALGORITHM_TABLE: [AlgorithmRecord; ALGORITHM_COUNT] = [
    cipher(selector(ID_DES, MODE_ECB), 8, 8, 0),
    cipher(selector(ID_DES, MODE_CBC), 8, 8, 8),
    cipher(selector(ID_DES, MODE_CTR), 8, 8, 8),
    cipher(selector(ID_TDES, MODE_ECB), 8, 24, 0),
    cipher(selector(ID_TDES, MODE_CBC), 8, 24, 8),
    cipher(selector(ID_TDES, MODE_CTR), 8, 24, 8),
    cipher(selector(ID_AES128, MODE_ECB), 16, 16, 0),
    cipher(selector(ID_AES128, MODE_CBC), 16, 16, 16),
    cipher(selector(ID_AES128, MODE_CTR), 16, 16, 16),
    cipher(selector(ID_AES192, MODE_ECB), 16, 24, 0),
    cipher(selector(ID_AES192, MODE_CBC), 16, 24, 16),
    cipher(selector(ID_AES192, MODE_CTR), 16, 24, 16),
    cipher(selector(ID_AES256, MODE_ECB), 16, 32, 0),
    cipher(selector(ID_AES256, MODE_CBC), 16, 32, 16),
    cipher(selector(ID_AES256, MODE_CTR), 16, 32, 16),
    cipher(selector(ID_SM4, MODE_ECB), 16, 16, 0),
    cipher(selector(ID_SM4, MODE_CBC), 16, 16, 16),
    cipher(selector(ID_SM4, MODE_CTR), 16, 16, 16),
    cipher(selector(ID_SM4, MODE_OFB), 16, 16, 16),
    hash(selector(ID_SHA1, MODE_ECB), 20, 5),
    hash(selector(ID_SHA256, MODE_ECB), 32, 8),
    hash(selector(ID_SM3, MODE_ECB), 32, 8),
    AlgorithmRecord {
        ctrl: DESC_CTRL_TRANSCODE | DESC_CTRL_INT_EN,
        selector: selector(ID_BASE64, MODE_ECB),
        category: AlgCategory::Transcode,
        block_len: 1,
        key_len: 0,
        iv_len: 0,
        digest_len: 0,
        state_words: 0,
    },
];

impl Algorithm {
    /// Index into [`ALGORITHM_TABLE`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit in the per-instance enable mask
    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << (self as usize)
    }

    /// Enable-mask bit for every supported algorithm
    pub const ALL_MASK: u32 = (1 << ALGORITHM_COUNT) - 1;

    /// The algorithm's table record
    #[must_use]
    pub const fn record(self) -> &'static AlgorithmRecord {
        &ALGORITHM_TABLE[self as usize]
    }

    /// Operation category
    #[must_use]
    pub const fn category(self) -> AlgCategory {
        self.record().category
    }

    /// Block length in bytes
    #[must_use]
    pub const fn block_len(self) -> usize {
        self.record().block_len
    }

    /// Key length in bytes
    #[must_use]
    pub const fn key_len(self) -> usize {
        self.record().key_len
    }

    /// IV length in bytes
    #[must_use]
    pub const fn iv_len(self) -> usize {
        self.record().iv_len
    }

    /// Digest length in bytes
    #[must_use]
    pub const fn digest_len(self) -> usize {
        self.record().digest_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_algorithm() {
        assert_eq!(ALGORITHM_TABLE.len(), ALGORITHM_COUNT);
        assert_eq!(Algorithm::Base64.index(), ALGORITHM_COUNT - 1);
    }

    #[test]
    fn test_hardware_length_constants() {
        assert_eq!(Algorithm::DesCbc.block_len(), 8);
        assert_eq!(Algorithm::TdesCtr.key_len(), 24);
        assert_eq!(Algorithm::Aes128Cbc.block_len(), 16);
        assert_eq!(Algorithm::Aes192Ecb.key_len(), 24);
        assert_eq!(Algorithm::Aes256Ctr.key_len(), 32);
        assert_eq!(Algorithm::Sm4Ofb.iv_len(), 16);
        assert_eq!(Algorithm::Sha1.digest_len(), 20);
        assert_eq!(Algorithm::Sha256.digest_len(), 32);
        assert_eq!(Algorithm::Sm3.digest_len(), 32);
        assert_eq!(Algorithm::Sha1.block_len(), 64);
    }

    #[test]
    fn test_ecb_records_carry_no_iv() {
        for alg in [
            Algorithm::DesEcb,
            Algorithm::TdesEcb,
            Algorithm::Aes128Ecb,
            Algorithm::Aes192Ecb,
            Algorithm::Aes256Ecb,
            Algorithm::Sm4Ecb,
        ] {
            assert_eq!(alg.iv_len(), 0);
        }
    }

    #[test]
    fn test_selectors_are_unique() {
        for (i, a) in ALGORITHM_TABLE.iter().enumerate() {
            for b in &ALGORITHM_TABLE[i + 1..] {
                assert_ne!(a.selector, b.selector);
            }
        }
    }
}
