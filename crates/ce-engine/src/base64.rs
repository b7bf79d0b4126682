// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Base64 transcoder
//!
//! The transcoder is the one algorithm whose output length differs from
//! its input length, so its descriptors carry the destination length in
//! the key field instead of key material. Chunks are cut at a boundary
//! divisible by both the 3-byte encode quantum and the 4-byte decode
//! quantum, which keeps `=` padding confined to the final chunk.

use crate::alg::Algorithm;
use crate::desc::{EngineDescriptor, KeyField};
use crate::engine::{CryptoEngine, TriggerOp};
use crate::error::{EngineError, EngineResult};
use crate::regs::ALG_SEL_ENCRYPT;
use crate::scatter::{plan_chunks, total_len, total_len_mut, SinkCursor, SourceCursor};
use crate::traits::{DmaRegion, RegisterBus, SecureKeyStore};

/// Transcode chunk bound: a multiple of 3 and of 4, with room for the
/// expanded encode output alongside the source in one staging burst.
const B64_CHUNK: usize = 1536;

/// Staging offset of the transcode output area.
const B64_DST_OFF: usize = 2048;

/// Transcode direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transcode {
    /// Binary in, base64 text out
    Encode,
    /// Base64 text in, binary out
    Decode,
}

/// Encoded length of `n` source bytes, padding included.
#[must_use]
pub const fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Trailing `=` count of a logical base64 stream, at most 2.
fn tail_padding(src: &[&[u8]]) -> usize {
    let mut pad = 0;
    for seg in src.iter().rev() {
        for &b in seg.iter().rev() {
            if b != b'=' || pad == 2 {
                return pad;
            }
            pad += 1;
        }
    }
    pad
}

impl<B: RegisterBus, R: DmaRegion, S: SecureKeyStore> CryptoEngine<B, R, S> {
    /// Transcode one scatter list into another. Returns bytes written.
    ///
    /// Encode accepts any source length; decode requires a multiple of
    /// 4 and honors trailing `=` padding. The destination must hold the
    /// full output.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` when base64 is masked off;
    /// `BlockAlignment` when a decode source is not a multiple of 4;
    /// `NullOutput` when the destination is too small;
    /// `InvalidRequest` when the hardware rejects the text or the call
    /// exceeds the per-call chunk budget; `Timeout` on poll budget
    /// exhaustion.
    pub fn base64(
        &mut self,
        op: Transcode,
        src: &[&[u8]],
        dst: &mut [&mut [u8]],
    ) -> EngineResult<usize> {
        self.check_enabled(Algorithm::Base64)?;
        let rec = Algorithm::Base64.record();
        let total = total_len(src);
        let (out_total, align, ragged) = match op {
            Transcode::Encode => (encoded_len(total), 3, true),
            Transcode::Decode => {
                if total % 4 != 0 {
                    return Err(EngineError::BlockAlignment);
                }
                (total / 4 * 3 - tail_padding(src), 4, false)
            }
        };
        if total_len_mut(dst) < out_total {
            return Err(EngineError::NullOutput);
        }
        if total == 0 {
            return Ok(0);
        }

        let plan = plan_chunks(total, align, B64_CHUNK, ragged)?;
        let selector = rec.selector
            | match op {
                Transcode::Encode => ALG_SEL_ENCRYPT,
                Transcode::Decode => 0,
            };
        let addr = self.staging_addr();
        let mut src_cur = SourceCursor::new(src);
        let mut dst_cur = SinkCursor::new(dst);
        let mut produced = 0;

        for (i, &chunk) in plan.iter().enumerate() {
            let last = i == plan.len() - 1;
            let out_chunk = match op {
                Transcode::Encode => encoded_len(chunk),
                // Only the final chunk can carry padding.
                Transcode::Decode if last => out_total - produced,
                Transcode::Decode => chunk / 4 * 3,
            };
            src_cur.gather_into(self.staging(), 0, chunk);
            let desc = EngineDescriptor {
                ctrl: rec.ctrl,
                selector,
                next: 0,
                src: addr,
                dst: addr + B64_DST_OFF as u64,
                len: chunk as u64,
                key: KeyField::DestLen(out_chunk as u64),
                iv: [0; 16],
            };
            self.build_and_trigger(TriggerOp::plain(desc))?;
            dst_cur.scatter_from(self.staging(), B64_DST_OFF, out_chunk);
            produced += out_chunk;
        }
        debug_assert_eq!(produced, out_total);
        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_groups_of_three() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1), 4);
        assert_eq!(encoded_len(2), 4);
        assert_eq!(encoded_len(3), 4);
        assert_eq!(encoded_len(4), 8);
        assert_eq!(encoded_len(1536), 2048);
    }

    #[test]
    fn test_tail_padding_counts_at_most_two() {
        assert_eq!(tail_padding(&[b"Zg=="]), 2);
        assert_eq!(tail_padding(&[b"Zm8="]), 1);
        assert_eq!(tail_padding(&[b"Zm9v"]), 0);
        assert_eq!(tail_padding(&[]), 0);
        // Padding split across fragments still counts.
        assert_eq!(tail_padding(&[b"Zg=", b"="]), 2);
    }

    #[test]
    fn test_chunk_bound_is_dual_aligned() {
        assert_eq!(B64_CHUNK % 3, 0);
        assert_eq!(B64_CHUNK % 4, 0);
        assert!(B64_DST_OFF + encoded_len(B64_CHUNK) <= crate::engine::BURST_LEN);
    }
}
