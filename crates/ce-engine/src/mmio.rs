// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Memory-mapped register bus
//!
//! Volatile access to a real engine register window. The platform layer
//! owns discovery, clocking and reset; this type only performs the raw
//! accesses.

use core::ptr::{read_volatile, write_volatile};

use crate::regs::CE_WINDOW_LEN;
use crate::traits::RegisterBus;

/// Register bus backed by a memory-mapped engine window
pub struct MmioBus {
    base: *mut u32,
}

impl MmioBus {
    /// Create a bus over the register window at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the virtual address of a mapped, word-aligned
    /// engine register window of at least [`CE_WINDOW_LEN`] bytes, and
    /// must remain mapped for the lifetime of the bus.
    #[must_use]
    pub const unsafe fn new(base: *mut u32) -> Self {
        Self { base }
    }
}

// The window is a device resource; moving the handle between threads is
// fine, concurrent use is prevented by the engine's exclusive borrow.
unsafe impl Send for MmioBus {}

impl RegisterBus for MmioBus {
    fn read32(&self, offset: usize) -> u32 {
        debug_assert!(offset < CE_WINDOW_LEN && offset % 4 == 0);
        // SAFETY: the constructor contract guarantees a mapped window of
        // CE_WINDOW_LEN bytes; volatile read is required for MMIO.
        unsafe { read_volatile(self.base.add(offset / 4)) }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        debug_assert!(offset < CE_WINDOW_LEN && offset % 4 == 0);
        // SAFETY: as above; volatile write is required for MMIO.
        unsafe { write_volatile(self.base.add(offset / 4), value) }
    }
}
