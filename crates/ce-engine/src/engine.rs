// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Descriptor builder and register interface
//!
//! One engine instance accepts exactly one in-flight descriptor.
//! Triggering and waiting are synchronous: [`CryptoEngine::build_and_trigger`]
//! returns only after the operation completes or the bounded poll budget
//! is exhausted. All operations take `&mut self` — the exclusive borrow
//! is the instance lock; callers that share an engine across threads
//! wrap it in their own mutex.

use core::hint::spin_loop;

use crate::alg::Algorithm;
use crate::desc::{EngineDescriptor, KeyField};
use crate::error::{EngineError, EngineResult};
use crate::regs::{
    CE_CTRL, CE_DESC_BASE, CE_DIGEST_BASE, CE_INTR, CE_IV_BASE, CE_STATUS, CTRL_TRIGGER,
    DESC_CTRL_BYPASS, DESC_CTRL_CIPHER, DESC_CTRL_KEYSEL_MASK, DESC_CTRL_KEYSEL_SECURE,
    STATUS_DONE, STATUS_ERR,
};
use crate::traits::{DmaRegion, RegisterBus, SecureKeyStore};

/// Staging region size: one hardware burst, in bytes.
///
/// A multiple of every supported block length.
pub const BURST_LEN: usize = 4096;

/// Busy-poll retry budget per descriptor.
///
/// Exhaustion is terminal; the engine needs a platform-driven reset
/// afterwards.
pub const POLL_RETRY_BUDGET: u32 = 100_000;

/// One resolved hardware operation, consumed by one trigger
pub struct TriggerOp<'a> {
    /// Descriptor to execute
    pub desc: EngineDescriptor,
    /// Digest state window exchange: written before the trigger, read
    /// back after completion
    pub state: Option<&'a mut [u32; 8]>,
    /// Significant digest state words
    pub state_words: usize,
    /// Digest registers hold byte-swapped words (SM3 readback quirk)
    pub state_swapped: bool,
    /// Updated chaining IV readback destination
    pub iv_out: Option<&'a mut [u8; 16]>,
}

impl<'a> TriggerOp<'a> {
    /// An operation exchanging neither digest state nor IV.
    #[must_use]
    pub fn plain(desc: EngineDescriptor) -> Self {
        Self {
            desc,
            state: None,
            state_words: 0,
            state_swapped: false,
            iv_out: None,
        }
    }
}

/// Hardware crypto engine instance
pub struct CryptoEngine<B: RegisterBus, R: DmaRegion, S: SecureKeyStore> {
    bus: B,
    staging: R,
    keys: S,
    enabled: u32,
}

impl<B: RegisterBus, R: DmaRegion, S: SecureKeyStore> CryptoEngine<B, R, S> {
    /// Create an engine over a register bus, a pre-mapped staging region
    /// of at least [`BURST_LEN`] bytes, and the secure key store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the staging region is too small.
    pub fn new(bus: B, staging: R, keys: S) -> EngineResult<Self> {
        if staging.len() < BURST_LEN {
            return Err(EngineError::InvalidRequest);
        }
        Ok(Self {
            bus,
            staging,
            keys,
            enabled: Algorithm::ALL_MASK,
        })
    }

    /// Restrict the usable algorithm set (models fused-off algorithms).
    pub fn set_enabled_mask(&mut self, mask: u32) {
        self.enabled = mask & Algorithm::ALL_MASK;
    }

    /// Current algorithm enable mask.
    #[must_use]
    pub const fn enabled_mask(&self) -> u32 {
        self.enabled
    }

    /// Whether the device-resident secure key is usable.
    #[must_use]
    pub fn secure_key_available(&self) -> bool {
        self.keys.secure_key_available()
    }

    /// Borrow the underlying register bus.
    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    pub(crate) fn check_enabled(&self, alg: Algorithm) -> EngineResult<()> {
        if self.enabled & alg.mask() == 0 {
            return Err(EngineError::UnsupportedAlgorithm);
        }
        Ok(())
    }

    pub(crate) fn staging(&mut self) -> &mut R {
        &mut self.staging
    }

    pub(crate) fn staging_addr(&self) -> u64 {
        self.staging.phys_addr()
    }

    /// Raw engine status.
    #[must_use]
    pub fn read_status(&self) -> u32 {
        self.bus.read32(CE_STATUS)
    }

    /// Acknowledge completion/error flags (write-1-to-clear, idempotent).
    pub fn clear_interrupt(&mut self) {
        self.bus.write32(CE_INTR, STATUS_DONE | STATUS_ERR);
    }

    /// Write the descriptor, trigger the engine, and await completion.
    ///
    /// When the descriptor is a cipher without explicit key bytes, the
    /// control word's one-hot key-select field is rewritten to select
    /// the device-resident secure key; the two modes are mutually
    /// exclusive.
    ///
    /// # Errors
    ///
    /// `SecureKeyUnavailable` when the secure key is selected but not
    /// provisioned; `Timeout` when the poll budget is exhausted;
    /// `InvalidRequest` when the hardware flags the descriptor.
    pub fn build_and_trigger(&mut self, op: TriggerOp<'_>) -> EngineResult<()> {
        let TriggerOp {
            mut desc,
            state,
            state_words,
            state_swapped,
            iv_out,
        } = op;

        if desc.ctrl & DESC_CTRL_CIPHER != 0 && matches!(desc.key, KeyField::None) {
            if !self.keys.secure_key_available() {
                return Err(EngineError::SecureKeyUnavailable);
            }
            desc.ctrl = (desc.ctrl & !DESC_CTRL_KEYSEL_MASK) | DESC_CTRL_KEYSEL_SECURE;
        }

        if let Some(state) = &state {
            for (i, word) in state[..state_words].iter().enumerate() {
                let reg = if state_swapped { word.swap_bytes() } else { *word };
                self.bus.write32(CE_DIGEST_BASE + i * 4, reg);
            }
        }

        for (i, word) in desc.to_words().iter().enumerate() {
            self.bus.write32(CE_DESC_BASE + i * 4, *word);
        }

        self.bus.write32(CE_CTRL, CTRL_TRIGGER);
        let status = self.wait_done()?;
        self.clear_interrupt();
        if status & STATUS_ERR != 0 {
            return Err(EngineError::InvalidRequest);
        }

        if let Some(iv_out) = iv_out {
            for i in 0..4 {
                let word = self.bus.read32(CE_IV_BASE + i * 4);
                iv_out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
            }
        }

        if let Some(state) = state {
            for (i, word) in state[..state_words].iter_mut().enumerate() {
                let reg = self.bus.read32(CE_DIGEST_BASE + i * 4);
                *word = if state_swapped { reg.swap_bytes() } else { reg };
            }
        }

        Ok(())
    }

    /// Pass-through engine copy between two device-visible addresses.
    ///
    /// Bypasses the algorithm tables entirely: a DMA-copy primitive,
    /// not a security primitive.
    ///
    /// # Errors
    ///
    /// `Timeout` when the poll budget is exhausted; `InvalidRequest`
    /// when the hardware flags the descriptor.
    pub fn raw_copy(&mut self, dst: u64, src: u64, len: usize) -> EngineResult<()> {
        let desc = EngineDescriptor {
            ctrl: DESC_CTRL_BYPASS,
            selector: 0,
            next: 0,
            src,
            dst,
            len: len as u64,
            key: KeyField::None,
            iv: [0; 16],
        };
        self.build_and_trigger(TriggerOp::plain(desc))
    }

    fn wait_done(&self) -> EngineResult<u32> {
        let mut budget = POLL_RETRY_BUDGET;
        while budget > 0 {
            let status = self.bus.read32(CE_STATUS);
            if status & STATUS_DONE != 0 {
                return Ok(status);
            }
            budget -= 1;
            spin_loop();
        }
        Err(EngineError::Timeout)
    }
}
