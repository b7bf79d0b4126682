// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Collaborator traits
//!
//! The engine core is written against three narrow seams so the same
//! streaming logic drives real hardware and the register-accurate
//! simulator:
//!
//! - [`RegisterBus`]: 32-bit access to the engine's register window
//! - [`DmaRegion`] / [`DmaProvider`]: contiguous, coherent,
//!   device-visible staging memory; the core only ever consumes
//!   (physical address, length) pairs
//! - [`SecureKeyStore`]: the device-resident key capability; its
//!   contents are never read by this core

/// 32-bit register access at byte offsets within the engine window
pub trait RegisterBus {
    /// Read the register at `offset`.
    fn read32(&self, offset: usize) -> u32;

    /// Write the register at `offset`.
    fn write32(&mut self, offset: usize, value: u32);
}

/// A contiguous, device-visible memory region
///
/// Coherence between CPU-side copies and device accesses is guaranteed
/// by the provider for the duration of an operation.
pub trait DmaRegion {
    /// Physical address as seen by the engine.
    fn phys_addr(&self) -> u64;

    /// Region length in bytes.
    fn len(&self) -> usize;

    /// Whether the region is zero sized.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `data` into the region at `offset`.
    fn copy_in(&mut self, offset: usize, data: &[u8]);

    /// Copy `out.len()` bytes out of the region at `offset`.
    fn copy_out(&self, offset: usize, out: &mut [u8]);
}

/// Allocator of [`DmaRegion`]s
pub trait DmaProvider {
    /// Region type produced by this provider.
    type Region: DmaRegion;

    /// Allocate a coherent region of at least `len` bytes.
    ///
    /// Returns `None` when the provider cannot satisfy the request.
    fn alloc(&mut self, len: usize) -> Option<Self::Region>;
}

/// Device-resident secure key capability
pub trait SecureKeyStore {
    /// Whether a secure key is provisioned and usable.
    ///
    /// The key itself is selected via a descriptor control-word flag and
    /// never crosses this interface.
    fn secure_key_available(&self) -> bool;
}
