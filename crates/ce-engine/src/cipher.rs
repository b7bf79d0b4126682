// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Streaming block cipher interface
//!
//! A [`CipherRequest`] carries the negotiated algorithm, direction, key
//! selection and running chaining IV across calls. Each call gathers the
//! source scatter list through the staging region in burst-sized chunks,
//! executes one descriptor per chunk, and reads the updated IV back so
//! the next chunk (or the next call) continues the chain. A block is
//! never split across two chunks.

use zeroize::Zeroize;

use crate::alg::{AlgCategory, Algorithm};
use crate::desc::{EngineDescriptor, KeyField};
use crate::engine::{CryptoEngine, TriggerOp, BURST_LEN};
use crate::error::{EngineError, EngineResult};
use crate::regs::ALG_SEL_ENCRYPT;
use crate::scatter::{plan_chunks, total_len, total_len_mut, SinkCursor, SourceCursor};
use crate::traits::{DmaRegion, RegisterBus, SecureKeyStore};

/// Cipher direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Plaintext in, ciphertext out
    Encrypt,
    /// Ciphertext in, plaintext out
    Decrypt,
}

/// Key selection for a cipher request
#[derive(Clone, Copy)]
pub enum CipherKey<'k> {
    /// Explicit key bytes, carried in the descriptor
    Bytes(&'k [u8]),
    /// Device-resident secure key, selected by control-word flag
    Secure,
}

/// One cipher conversation
///
/// Holds the chaining IV between calls; a request that has seen a
/// failure is poisoned and rejects further use.
pub struct CipherRequest<'k> {
    alg: Algorithm,
    dir: Direction,
    key: CipherKey<'k>,
    iv: [u8; 16],
    poisoned: bool,
}

impl<'k> CipherRequest<'k> {
    /// Validate and build a request.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when `alg` is not a cipher;
    /// `InvalidRequest` when the key or IV length does not match the
    /// algorithm.
    pub fn new(
        alg: Algorithm,
        dir: Direction,
        key: CipherKey<'k>,
        iv: &[u8],
    ) -> EngineResult<Self> {
        let rec = alg.record();
        if rec.category != AlgCategory::Cipher {
            return Err(EngineError::UnsupportedAlgorithm);
        }
        if let CipherKey::Bytes(k) = key {
            if k.len() != rec.key_len {
                return Err(EngineError::InvalidRequest);
            }
        }
        if iv.len() != rec.iv_len {
            return Err(EngineError::InvalidRequest);
        }
        let mut iv_buf = [0u8; 16];
        iv_buf[..iv.len()].copy_from_slice(iv);
        Ok(Self {
            alg,
            dir,
            key,
            iv: iv_buf,
            poisoned: false,
        })
    }

    /// Algorithm bound to this request.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.alg
    }

    /// Direction bound to this request.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.dir
    }

    /// Current chaining IV (empty for ECB).
    ///
    /// After a call returns, this is the IV the next call will continue
    /// from.
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv[..self.alg.iv_len()]
    }
}

impl Drop for CipherRequest<'_> {
    fn drop(&mut self) {
        self.iv.zeroize();
    }
}

impl<B: RegisterBus, R: DmaRegion, S: SecureKeyStore> CryptoEngine<B, R, S> {
    /// Process one cipher call over scatter lists.
    ///
    /// `src` and `dst` must carry the same total byte count, an exact
    /// multiple of the algorithm's block length. Fragment boundaries are
    /// independent of block boundaries on both sides. On success the
    /// request's chaining IV has advanced past the processed bytes.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when the algorithm is masked off;
    /// `BlockAlignment` when the total is not block aligned;
    /// `InvalidRequest` when the totals differ, the request is poisoned,
    /// or the call would exceed the per-call chunk budget;
    /// `SecureKeyUnavailable` when the secure key is selected but not
    /// provisioned; `Timeout` on poll budget exhaustion. Any failure
    /// poisons the request.
    pub fn cipher(
        &mut self,
        req: &mut CipherRequest<'_>,
        src: &[&[u8]],
        dst: &mut [&mut [u8]],
    ) -> EngineResult<()> {
        self.check_enabled(req.alg)?;
        if req.poisoned {
            return Err(EngineError::InvalidRequest);
        }
        let rec = req.alg.record();
        let total = total_len(src);
        if total % rec.block_len != 0 {
            return Err(EngineError::BlockAlignment);
        }
        if total_len_mut(dst) != total {
            return Err(EngineError::InvalidRequest);
        }
        if matches!(req.key, CipherKey::Secure) && !self.secure_key_available() {
            return Err(EngineError::SecureKeyUnavailable);
        }
        if total == 0 {
            return Ok(());
        }

        let plan = plan_chunks(total, rec.block_len, BURST_LEN, false)?;
        let selector = rec.selector
            | match req.dir {
                Direction::Encrypt => ALG_SEL_ENCRYPT,
                Direction::Decrypt => 0,
            };
        let chained = rec.iv_len > 0;
        let addr = self.staging_addr();
        let mut src_cur = SourceCursor::new(src);
        let mut dst_cur = SinkCursor::new(dst);

        for &chunk in &plan {
            src_cur.gather_into(self.staging(), 0, chunk);
            let desc = EngineDescriptor {
                ctrl: rec.ctrl,
                selector,
                next: 0,
                src: addr,
                dst: addr,
                len: chunk as u64,
                key: match req.key {
                    CipherKey::Bytes(k) => KeyField::from_key(k),
                    CipherKey::Secure => KeyField::None,
                },
                iv: req.iv,
            };
            let op = TriggerOp {
                desc,
                state: None,
                state_words: 0,
                state_swapped: false,
                iv_out: chained.then_some(&mut req.iv),
            };
            if let Err(e) = self.build_and_trigger(op) {
                req.poisoned = true;
                return Err(e);
            }
            dst_cur.scatter_from(self.staging(), 0, chunk);
        }
        Ok(())
    }
}
