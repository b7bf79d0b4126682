// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Scatter-list walking and chunk planning
//!
//! Requests arrive as sequences of non-contiguous fragments. The engine
//! walks source and destination lists in lock-step through the staging
//! region, one bounded burst at a time; a block is never split across
//! two chunks.

use heapless::Vec;

use crate::error::{EngineError, EngineResult};
use crate::traits::DmaRegion;

/// Upper bound on descriptor triggers per processing call.
pub(crate) const MAX_CHUNKS: usize = 256;

/// Total byte count of a source scatter list.
pub(crate) fn total_len(segs: &[&[u8]]) -> usize {
    segs.iter().map(|s| s.len()).sum()
}

/// Total byte count of a destination scatter list.
pub(crate) fn total_len_mut(segs: &[&mut [u8]]) -> usize {
    segs.iter().map(|s| s.len()).sum()
}

/// Split `total` bytes into chunk lengths.
///
/// Every chunk is a multiple of `align` and at most `cap` bytes; when
/// `ragged_tail` is set the final chunk may be shorter than `align`
/// (base64 encode tails). `total` itself must already be aligned
/// otherwise.
pub(crate) fn plan_chunks(
    total: usize,
    align: usize,
    cap: usize,
    ragged_tail: bool,
) -> EngineResult<Vec<usize, MAX_CHUNKS>> {
    debug_assert!(cap >= align && cap % align == 0);
    if !ragged_tail && total % align != 0 {
        return Err(EngineError::InvalidRequest);
    }
    let mut plan = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        let chunk = if remaining >= cap {
            cap
        } else if remaining % align == 0 || ragged_tail {
            remaining
        } else {
            return Err(EngineError::InvalidRequest);
        };
        plan.push(chunk).map_err(|_| EngineError::InvalidRequest)?;
        remaining -= chunk;
    }
    Ok(plan)
}

/// Read cursor over a source scatter list
pub(crate) struct SourceCursor<'a, 'b> {
    segs: &'a [&'b [u8]],
    idx: usize,
    off: usize,
}

impl<'a, 'b> SourceCursor<'a, 'b> {
    pub(crate) fn new(segs: &'a [&'b [u8]]) -> Self {
        Self { segs, idx: 0, off: 0 }
    }

    /// Gather `len` bytes into `region` starting at `region_off`.
    ///
    /// The caller guarantees `len` bytes remain.
    pub(crate) fn gather_into<R: DmaRegion>(&mut self, region: &mut R, region_off: usize, len: usize) {
        let mut done = 0;
        while done < len {
            let seg = self.segs[self.idx];
            let avail = seg.len() - self.off;
            if avail == 0 {
                self.idx += 1;
                self.off = 0;
                continue;
            }
            let take = avail.min(len - done);
            region.copy_in(region_off + done, &seg[self.off..self.off + take]);
            self.off += take;
            done += take;
        }
    }

    /// Copy up to `out.len()` bytes into `out`; returns bytes copied.
    pub(crate) fn copy_to(&mut self, out: &mut [u8]) -> usize {
        let mut done = 0;
        while done < out.len() && self.idx < self.segs.len() {
            let seg = self.segs[self.idx];
            let avail = seg.len() - self.off;
            if avail == 0 {
                self.idx += 1;
                self.off = 0;
                continue;
            }
            let take = avail.min(out.len() - done);
            out[done..done + take].copy_from_slice(&seg[self.off..self.off + take]);
            self.off += take;
            done += take;
        }
        done
    }
}

/// Write cursor over a destination scatter list
pub(crate) struct SinkCursor<'a, 'b> {
    segs: &'a mut [&'b mut [u8]],
    idx: usize,
    off: usize,
}

impl<'a, 'b> SinkCursor<'a, 'b> {
    pub(crate) fn new(segs: &'a mut [&'b mut [u8]]) -> Self {
        Self { segs, idx: 0, off: 0 }
    }

    /// Scatter `len` bytes out of `region` starting at `region_off`.
    ///
    /// The caller guarantees `len` bytes of destination capacity remain.
    pub(crate) fn scatter_from<R: DmaRegion>(&mut self, region: &R, region_off: usize, len: usize) {
        let mut done = 0;
        while done < len {
            let seg = &mut *self.segs[self.idx];
            let avail = seg.len() - self.off;
            if avail == 0 {
                self.idx += 1;
                self.off = 0;
                continue;
            }
            let take = avail.min(len - done);
            region.copy_out(region_off + done, &mut seg[self.off..self.off + take]);
            self.off += take;
            done += take;
        }
    }
}
