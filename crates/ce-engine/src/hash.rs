// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Incremental hashing
//!
//! The hardware hash pipeline compresses whole 64-byte blocks against
//! the digest state registers; it never pads. A [`HashContext`] carries
//! the running state, the total byte count, and an unaligned tail
//! between calls. Bulk updates stage full blocks through the burst
//! region, one descriptor per chunk, exchanging the state registers
//! around each trigger. Finalization pads and compresses the last one
//! or two blocks on the CPU via `ce-soft`.
//!
//! SM3 state crosses the digest register window byte-swapped; the
//! context flags the swap and the trigger path compensates on both
//! writes and reads, so `state` is always held in natural word order.

use zeroize::Zeroize;

use ce_soft::{sha1_compress, sha256_compress, sm3_compress, BLOCK_LEN, SHA1_IV, SHA256_IV, SM3_IV};

use crate::alg::Algorithm;
use crate::desc::{EngineDescriptor, KeyField};
use crate::engine::{CryptoEngine, TriggerOp, BURST_LEN};
use crate::error::{EngineError, EngineResult};
use crate::scatter::{plan_chunks, total_len, SourceCursor};
use crate::traits::{DmaRegion, RegisterBus, SecureKeyStore};

/// One digest computation in progress
///
/// Contexts are plain values: they can be parked, moved across engine
/// instances, and serialized with [`export`](Self::export) /
/// [`import`](Self::import). A context that has been finalized or has
/// seen a failure rejects further use.
pub struct HashContext {
    alg: Algorithm,
    state: [u32; 8],
    total: u64,
    pending: [u8; BLOCK_LEN],
    pending_len: usize,
    finalized: bool,
    poisoned: bool,
}

impl HashContext {
    /// Start a digest computation.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when `alg` is not a hash.
    pub fn new(alg: Algorithm) -> EngineResult<Self> {
        let mut state = [0u32; 8];
        match alg {
            Algorithm::Sha1 => state[..5].copy_from_slice(&SHA1_IV),
            Algorithm::Sha256 => state = SHA256_IV,
            Algorithm::Sm3 => state = SM3_IV,
            _ => return Err(EngineError::UnsupportedAlgorithm),
        }
        Ok(Self {
            alg,
            state,
            total: 0,
            pending: [0; BLOCK_LEN],
            pending_len: 0,
            finalized: false,
            poisoned: false,
        })
    }

    /// Algorithm bound to this context.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.alg
    }

    /// Total bytes absorbed so far.
    #[must_use]
    pub const fn total_len(&self) -> u64 {
        self.total
    }

    /// Serialized size of this context in bytes.
    #[must_use]
    pub fn export_len(&self) -> usize {
        self.alg.record().state_words * 4 + 8 + self.pending_len
    }

    /// Serialize the context: state words (big endian), total byte
    /// count (big endian), then the unaligned tail.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` when the context is finalized or poisoned;
    /// `NullOutput` when `out` is too short. Returns the bytes written.
    pub fn export(&self, out: &mut [u8]) -> EngineResult<usize> {
        if self.finalized || self.poisoned {
            return Err(EngineError::InvalidRequest);
        }
        let words = self.alg.record().state_words;
        let need = self.export_len();
        if out.len() < need {
            return Err(EngineError::NullOutput);
        }
        for (i, word) in self.state[..words].iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        out[words * 4..words * 4 + 8].copy_from_slice(&self.total.to_be_bytes());
        out[words * 4 + 8..need].copy_from_slice(&self.pending[..self.pending_len]);
        Ok(need)
    }

    /// Reconstruct a context from [`export`](Self::export) output.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when `alg` is not a hash;
    /// `InvalidRequest` when the blob length does not match the encoded
    /// total.
    pub fn import(alg: Algorithm, data: &[u8]) -> EngineResult<Self> {
        let mut ctx = Self::new(alg)?;
        let words = alg.record().state_words;
        if data.len() < words * 4 + 8 {
            return Err(EngineError::InvalidRequest);
        }
        let mut total_buf = [0u8; 8];
        total_buf.copy_from_slice(&data[words * 4..words * 4 + 8]);
        let total = u64::from_be_bytes(total_buf);
        let pending_len = (total % BLOCK_LEN as u64) as usize;
        if data.len() != words * 4 + 8 + pending_len {
            return Err(EngineError::InvalidRequest);
        }
        for (i, word) in ctx.state[..words].iter_mut().enumerate() {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&data[i * 4..i * 4 + 4]);
            *word = u32::from_be_bytes(buf);
        }
        ctx.total = total;
        ctx.pending[..pending_len].copy_from_slice(&data[words * 4 + 8..]);
        ctx.pending_len = pending_len;
        Ok(ctx)
    }

    fn state_swapped(&self) -> bool {
        self.alg == Algorithm::Sm3
    }

    fn compress(&mut self, block: &[u8; BLOCK_LEN]) {
        match self.alg {
            Algorithm::Sha1 => {
                let mut s = [0u32; 5];
                s.copy_from_slice(&self.state[..5]);
                sha1_compress(&mut s, block);
                self.state[..5].copy_from_slice(&s);
            }
            Algorithm::Sha256 => sha256_compress(&mut self.state, block),
            Algorithm::Sm3 => sm3_compress(&mut self.state, block),
            // The constructor admits hash algorithms only.
            _ => unreachable!(),
        }
    }
}

impl Drop for HashContext {
    fn drop(&mut self) {
        self.state.zeroize();
        self.pending.zeroize();
    }
}

impl<B: RegisterBus, R: DmaRegion, S: SecureKeyStore> CryptoEngine<B, R, S> {
    /// Absorb bytes into a digest computation.
    ///
    /// Full blocks run through the hardware; a trailing partial block
    /// is buffered in the context until more data or finalization
    /// arrives.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when the algorithm is masked off;
    /// `InvalidRequest` when the context is finalized or poisoned, or
    /// when the call would exceed the per-call chunk budget;
    /// `Timeout` on poll budget exhaustion. Any failure past validation
    /// poisons the context.
    pub fn hash_update(&mut self, ctx: &mut HashContext, src: &[&[u8]]) -> EngineResult<()> {
        self.check_enabled(ctx.alg)?;
        if ctx.poisoned || ctx.finalized {
            return Err(EngineError::InvalidRequest);
        }
        let total = total_len(src);
        let mut remaining = total;
        let mut cur = SourceCursor::new(src);

        if ctx.pending_len > 0 {
            let want = (BLOCK_LEN - ctx.pending_len).min(remaining);
            let copied = cur.copy_to(&mut ctx.pending[ctx.pending_len..ctx.pending_len + want]);
            ctx.pending_len += copied;
            remaining -= copied;
            if ctx.pending_len == BLOCK_LEN {
                let block = ctx.pending;
                let segs: [&[u8]; 1] = [&block];
                let mut block_cur = SourceCursor::new(&segs);
                if let Err(e) = self.hash_bulk(ctx, &mut block_cur, BLOCK_LEN) {
                    ctx.poisoned = true;
                    return Err(e);
                }
                ctx.pending_len = 0;
            }
        }

        let bulk = remaining - remaining % BLOCK_LEN;
        if bulk > 0 {
            if let Err(e) = self.hash_bulk(ctx, &mut cur, bulk) {
                ctx.poisoned = true;
                return Err(e);
            }
            remaining -= bulk;
        }

        if remaining > 0 {
            let copied = cur.copy_to(&mut ctx.pending[..remaining]);
            debug_assert_eq!(copied, remaining);
            ctx.pending_len = remaining;
        }
        ctx.total += total as u64;
        Ok(())
    }

    /// Absorb whole blocks, rejecting unaligned input outright.
    ///
    /// For callers that guarantee block-aligned framing and want the
    /// violation surfaced instead of buffered.
    ///
    /// # Errors
    ///
    /// `BlockAlignment` when the total is not a block multiple;
    /// otherwise as [`hash_update`](Self::hash_update).
    pub fn hash_update_blocks(&mut self, ctx: &mut HashContext, src: &[&[u8]]) -> EngineResult<()> {
        if total_len(src) % BLOCK_LEN != 0 {
            self.check_enabled(ctx.alg)?;
            return Err(EngineError::BlockAlignment);
        }
        self.hash_update(ctx, src)
    }

    /// Pad, compress the tail in software, and emit the digest.
    ///
    /// The context is consumed logically: further updates or a second
    /// finalization are rejected. Returns the digest length written.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when the algorithm is masked off;
    /// `InvalidRequest` when the context is finalized or poisoned;
    /// `NullOutput` when `out` is shorter than the digest.
    pub fn hash_finalize(&mut self, ctx: &mut HashContext, out: &mut [u8]) -> EngineResult<usize> {
        self.check_enabled(ctx.alg)?;
        if ctx.poisoned || ctx.finalized {
            return Err(EngineError::InvalidRequest);
        }
        let rec = ctx.alg.record();
        if out.len() < rec.digest_len {
            return Err(EngineError::NullOutput);
        }

        let bit_len = ctx.total.wrapping_mul(8);
        let mut block = [0u8; BLOCK_LEN];
        block[..ctx.pending_len].copy_from_slice(&ctx.pending[..ctx.pending_len]);
        block[ctx.pending_len] = 0x80;
        if ctx.pending_len + 9 <= BLOCK_LEN {
            block[BLOCK_LEN - 8..].copy_from_slice(&bit_len.to_be_bytes());
            ctx.compress(&block);
        } else {
            // Length does not fit; the padding spills into a second block.
            ctx.compress(&block);
            let mut spill = [0u8; BLOCK_LEN];
            spill[BLOCK_LEN - 8..].copy_from_slice(&bit_len.to_be_bytes());
            ctx.compress(&spill);
        }

        for (i, chunk) in out[..rec.digest_len].chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&ctx.state[i].to_be_bytes());
        }
        ctx.finalized = true;
        Ok(rec.digest_len)
    }

    fn hash_bulk(
        &mut self,
        ctx: &mut HashContext,
        cur: &mut SourceCursor<'_, '_>,
        run: usize,
    ) -> EngineResult<()> {
        debug_assert_eq!(run % BLOCK_LEN, 0);
        let rec = ctx.alg.record();
        let addr = self.staging_addr();
        let swapped = ctx.state_swapped();
        let plan = plan_chunks(run, BLOCK_LEN, BURST_LEN, false)?;
        for &chunk in &plan {
            cur.gather_into(self.staging(), 0, chunk);
            let desc = EngineDescriptor {
                ctrl: rec.ctrl,
                selector: rec.selector,
                next: 0,
                src: addr,
                dst: 0,
                len: chunk as u64,
                key: KeyField::None,
                iv: [0; 16],
            };
            let op = TriggerOp {
                desc,
                state: Some(&mut ctx.state),
                state_words: rec.state_words,
                state_swapped: swapped,
                iv_out: None,
            };
            self.build_and_trigger(op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_seeds_standard_ivs() {
        let ctx = HashContext::new(Algorithm::Sha1).unwrap();
        assert_eq!(ctx.state[..5], SHA1_IV);
        assert_eq!(ctx.state[5..], [0; 3]);
        let ctx = HashContext::new(Algorithm::Sm3).unwrap();
        assert_eq!(ctx.state, SM3_IV);
    }

    #[test]
    fn test_rejects_non_hash_algorithm() {
        assert_eq!(
            HashContext::new(Algorithm::Aes128Cbc).err(),
            Some(EngineError::UnsupportedAlgorithm)
        );
        assert_eq!(
            HashContext::new(Algorithm::Base64).err(),
            Some(EngineError::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
        ctx.total = 67;
        ctx.pending_len = 3;
        ctx.pending[..3].copy_from_slice(b"abc");
        ctx.state[0] = 0xdead_beef;

        let mut blob = [0u8; 64];
        let n = ctx.export(&mut blob).unwrap();
        assert_eq!(n, 8 * 4 + 8 + 3);

        let back = HashContext::import(Algorithm::Sha256, &blob[..n]).unwrap();
        assert_eq!(back.state, ctx.state);
        assert_eq!(back.total, 67);
        assert_eq!(back.pending[..3], *b"abc");
        assert_eq!(back.pending_len, 3);
    }

    #[test]
    fn test_import_rejects_inconsistent_length() {
        let ctx = HashContext::new(Algorithm::Sha1).unwrap();
        let mut blob = [0u8; 64];
        let n = ctx.export(&mut blob).unwrap();
        assert_eq!(n, 5 * 4 + 8);
        // Trailing byte contradicts the encoded total of zero.
        assert_eq!(
            HashContext::import(Algorithm::Sha1, &blob[..n + 1]).err(),
            Some(EngineError::InvalidRequest)
        );
        assert_eq!(
            HashContext::import(Algorithm::Sha1, &blob[..n - 1]).err(),
            Some(EngineError::InvalidRequest)
        );
    }

    #[test]
    fn test_export_refuses_short_buffer() {
        let ctx = HashContext::new(Algorithm::Sm3).unwrap();
        let mut blob = [0u8; 16];
        assert_eq!(ctx.export(&mut blob).err(), Some(EngineError::NullOutput));
    }

    #[test]
    fn test_software_tail_matches_one_shot() {
        // Padded-tail compression alone must reproduce the one-shot
        // digest for short messages.
        let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
        ctx.pending[..3].copy_from_slice(b"abc");
        ctx.pending_len = 3;
        ctx.total = 3;
        let bit_len = ctx.total * 8;
        let mut block = [0u8; BLOCK_LEN];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[56..].copy_from_slice(&bit_len.to_be_bytes());
        ctx.compress(&block);
        let mut digest = [0u8; 32];
        for (i, chunk) in digest.chunks_exact_mut(4).enumerate() {
            chunk.copy_from_slice(&ctx.state[i].to_be_bytes());
        }
        assert_eq!(digest, ce_soft::sha256::digest(b"abc"));
    }
}
