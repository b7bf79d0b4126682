// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Register-accurate engine simulator
//!
//! Backs the full [`RegisterBus`] / [`DmaRegion`] / [`SecureKeyStore`]
//! seam with an in-process model: a register window, a flat guest
//! memory, and a descriptor executor that runs synchronously inside the
//! trigger write. Cipher results come from the RustCrypto block
//! implementations, hash results from `ce-soft`, so the simulator
//! doubles as the correctness oracle for the streaming layer.
//!
//! Test-only fault hooks: [`SimMachine::set_hang`] suppresses the done
//! flag to exercise the poll budget, and the trigger counter proves
//! that rejected requests never touch the hardware.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use ce_soft::{sha1_compress, sha256_compress, sm3_compress, BLOCK_LEN};

use crate::regs::{
    CE_CTRL, CE_DESC_BASE, CE_DIGEST_BASE, CE_INTR, CE_IV_BASE, CE_STATUS, CE_WINDOW_LEN,
    CTRL_TRIGGER, DESC_CTRL_BYPASS, DESC_CTRL_CIPHER, DESC_CTRL_HASH, DESC_CTRL_KEYSEL_SECURE,
    DESC_CTRL_TRANSCODE, ID_AES128, ID_AES192, ID_AES256, ID_DES, ID_SHA1, ID_SHA256, ID_SM3,
    ID_SM4, ID_TDES, MODE_CBC, MODE_CTR, MODE_ECB, MODE_OFB, STATUS_DONE, STATUS_ERR,
};
use crate::traits::{DmaProvider, DmaRegion, RegisterBus, SecureKeyStore};

const B64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Guest memory reserved below the allocation watermark.
const ALLOC_BASE: usize = 0x1000;

struct SimCore {
    regs: [u32; CE_WINDOW_LEN / 4],
    mem: Vec<u8>,
    next_alloc: usize,
    secure_key: Option<[u8; 32]>,
    triggers: u64,
    hang: bool,
}

impl SimCore {
    fn new(mem_len: usize) -> Self {
        Self {
            regs: [0; CE_WINDOW_LEN / 4],
            mem: vec![0; mem_len],
            next_alloc: ALLOC_BASE,
            secure_key: None,
            triggers: 0,
            hang: false,
        }
    }

    fn desc_word(&self, i: usize) -> u32 {
        self.regs[CE_DESC_BASE / 4 + i]
    }

    fn desc_u64(&self, i: usize) -> u64 {
        u64::from(self.desc_word(i)) | (u64::from(self.desc_word(i + 1)) << 32)
    }

    fn trigger(&mut self) {
        self.triggers += 1;
        if self.hang {
            return;
        }
        let mut status = STATUS_DONE;
        if self.execute().is_err() {
            status |= STATUS_ERR;
        }
        self.regs[CE_STATUS / 4] = status;
    }

    fn execute(&mut self) -> Result<(), ()> {
        let ctrl = self.desc_word(0);
        let sel = self.desc_word(1);
        let src = self.desc_u64(4) as usize;
        let dst = self.desc_u64(6) as usize;
        let len = self.desc_u64(8) as usize;

        if ctrl & DESC_CTRL_BYPASS != 0 {
            let data = self.read_mem(src, len)?;
            return self.write_mem(dst, &data);
        }
        if ctrl & DESC_CTRL_CIPHER != 0 {
            return self.execute_cipher(ctrl, sel, src, dst, len);
        }
        if ctrl & DESC_CTRL_HASH != 0 {
            return self.execute_hash(sel, src, len);
        }
        if ctrl & DESC_CTRL_TRANSCODE != 0 {
            return self.execute_transcode(sel, src, dst, len);
        }
        Err(())
    }

    fn read_mem(&self, addr: usize, len: usize) -> Result<Vec<u8>, ()> {
        self.mem.get(addr..addr + len).map(<[u8]>::to_vec).ok_or(())
    }

    fn write_mem(&mut self, addr: usize, data: &[u8]) -> Result<(), ()> {
        self.mem
            .get_mut(addr..addr + data.len())
            .map(|m| m.copy_from_slice(data))
            .ok_or(())
    }

    fn key_bytes(&self, ctrl: u32) -> Result<[u8; 32], ()> {
        if ctrl & DESC_CTRL_KEYSEL_SECURE != 0 {
            return self.secure_key.ok_or(());
        }
        let mut key = [0u8; 32];
        for i in 0..8 {
            key[i * 4..i * 4 + 4].copy_from_slice(&self.desc_word(10 + i).to_le_bytes());
        }
        Ok(key)
    }

    fn iv_bytes(&self) -> [u8; 16] {
        let mut iv = [0u8; 16];
        for i in 0..4 {
            iv[i * 4..i * 4 + 4].copy_from_slice(&self.desc_word(18 + i).to_le_bytes());
        }
        iv
    }

    fn store_iv(&mut self, iv: &[u8; 16]) {
        for i in 0..4 {
            let mut w = [0u8; 4];
            w.copy_from_slice(&iv[i * 4..i * 4 + 4]);
            self.regs[CE_IV_BASE / 4 + i] = u32::from_le_bytes(w);
        }
    }

    fn execute_cipher(
        &mut self,
        ctrl: u32,
        sel: u32,
        src: usize,
        dst: usize,
        len: usize,
    ) -> Result<(), ()> {
        let id = (sel >> 8) & 0xff;
        let mode = (sel >> 4) & 0xf;
        let encrypt = sel & 1 != 0;
        let key = self.key_bytes(ctrl)?;
        let model = BlockModel::new(id, &key)?;
        let bl = model.block_len();
        if len % bl != 0 {
            return Err(());
        }
        let mut data = self.read_mem(src, len)?;
        let mut iv = self.iv_bytes();
        match mode {
            MODE_ECB => {
                for block in data.chunks_exact_mut(bl) {
                    if encrypt {
                        model.encrypt(block);
                    } else {
                        model.decrypt(block);
                    }
                }
            }
            MODE_CBC => {
                for block in data.chunks_exact_mut(bl) {
                    if encrypt {
                        for (b, v) in block.iter_mut().zip(&iv) {
                            *b ^= v;
                        }
                        model.encrypt(block);
                        iv[..bl].copy_from_slice(block);
                    } else {
                        let mut ct = [0u8; 16];
                        ct[..bl].copy_from_slice(block);
                        model.decrypt(block);
                        for (b, v) in block.iter_mut().zip(&iv) {
                            *b ^= v;
                        }
                        iv = ct;
                    }
                }
            }
            MODE_CTR => {
                for block in data.chunks_exact_mut(bl) {
                    let mut ks = [0u8; 16];
                    ks[..bl].copy_from_slice(&iv[..bl]);
                    model.encrypt(&mut ks[..bl]);
                    for (b, k) in block.iter_mut().zip(&ks) {
                        *b ^= k;
                    }
                    increment_be(&mut iv[..bl]);
                }
            }
            MODE_OFB => {
                for block in data.chunks_exact_mut(bl) {
                    model.encrypt(&mut iv[..bl]);
                    for (b, k) in block.iter_mut().zip(&iv) {
                        *b ^= k;
                    }
                }
            }
            _ => return Err(()),
        }
        self.write_mem(dst, &data)?;
        self.store_iv(&iv);
        Ok(())
    }

    fn execute_hash(&mut self, sel: u32, src: usize, len: usize) -> Result<(), ()> {
        let id = (sel >> 8) & 0xff;
        if len % BLOCK_LEN != 0 {
            return Err(());
        }
        let data = self.read_mem(src, len)?;
        let swapped = id == ID_SM3;
        let mut state = [0u32; 8];
        for (i, word) in state.iter_mut().enumerate() {
            let reg = self.regs[CE_DIGEST_BASE / 4 + i];
            *word = if swapped { reg.swap_bytes() } else { reg };
        }
        for chunk in data.chunks_exact(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            match id {
                ID_SHA1 => {
                    let mut s = [0u32; 5];
                    s.copy_from_slice(&state[..5]);
                    sha1_compress(&mut s, &block);
                    state[..5].copy_from_slice(&s);
                }
                ID_SHA256 => sha256_compress(&mut state, &block),
                ID_SM3 => sm3_compress(&mut state, &block),
                _ => return Err(()),
            }
        }
        for (i, word) in state.iter().enumerate() {
            let reg = if swapped { word.swap_bytes() } else { *word };
            self.regs[CE_DIGEST_BASE / 4 + i] = reg;
        }
        Ok(())
    }

    fn execute_transcode(&mut self, sel: u32, src: usize, dst: usize, len: usize) -> Result<(), ()> {
        let encode = sel & 1 != 0;
        let dest_len = self.desc_u64(10) as usize;
        let data = self.read_mem(src, len)?;
        let out = if encode {
            base64_encode(&data)
        } else {
            base64_decode(&data)?
        };
        if out.len() != dest_len {
            return Err(());
        }
        self.write_mem(dst, &out)
    }
}

fn increment_be(counter: &mut [u8]) {
    for b in counter.iter_mut().rev() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}

fn base64_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len().div_ceil(3) * 4);
    for group in data.chunks(3) {
        let mut buf = [0u8; 3];
        buf[..group.len()].copy_from_slice(group);
        let v = (u32::from(buf[0]) << 16) | (u32::from(buf[1]) << 8) | u32::from(buf[2]);
        let syms = [
            B64_ALPHABET[(v >> 18) as usize & 0x3f],
            B64_ALPHABET[(v >> 12) as usize & 0x3f],
            B64_ALPHABET[(v >> 6) as usize & 0x3f],
            B64_ALPHABET[v as usize & 0x3f],
        ];
        let keep = group.len() + 1;
        out.extend_from_slice(&syms[..keep]);
        out.resize(out.len() + 4 - keep, b'=');
    }
    out
}

fn base64_decode(text: &[u8]) -> Result<Vec<u8>, ()> {
    if text.len() % 4 != 0 {
        return Err(());
    }
    let pad = text.iter().rev().take(2).take_while(|&&b| b == b'=').count();
    let body = &text[..text.len() - pad];
    if body.iter().any(|&b| b == b'=') {
        return Err(());
    }
    let mut out = Vec::with_capacity(text.len() / 4 * 3);
    let mut acc = 0u32;
    let mut bits = 0;
    for &b in body {
        let v = B64_ALPHABET.iter().position(|&a| a == b).ok_or(())?;
        acc = (acc << 6) | v as u32;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Ok(out)
}

enum BlockModel {
    Des(des::Des),
    Tdes(des::TdesEde3),
    Aes128(aes::Aes128),
    Aes192(aes::Aes192),
    Aes256(aes::Aes256),
    Sm4(sm4::Sm4),
}

impl BlockModel {
    fn new(id: u32, key: &[u8; 32]) -> Result<Self, ()> {
        let model = match id {
            ID_DES => Self::Des(des::Des::new_from_slice(&key[..8]).map_err(|_| ())?),
            ID_TDES => Self::Tdes(des::TdesEde3::new_from_slice(&key[..24]).map_err(|_| ())?),
            ID_AES128 => Self::Aes128(aes::Aes128::new_from_slice(&key[..16]).map_err(|_| ())?),
            ID_AES192 => Self::Aes192(aes::Aes192::new_from_slice(&key[..24]).map_err(|_| ())?),
            ID_AES256 => Self::Aes256(aes::Aes256::new_from_slice(key).map_err(|_| ())?),
            ID_SM4 => Self::Sm4(sm4::Sm4::new_from_slice(&key[..16]).map_err(|_| ())?),
            _ => return Err(()),
        };
        Ok(model)
    }

    fn block_len(&self) -> usize {
        match self {
            Self::Des(_) | Self::Tdes(_) => 8,
            _ => 16,
        }
    }

    fn encrypt(&self, block: &mut [u8]) {
        match self {
            Self::Des(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Tdes(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes128(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Sm4(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
        }
    }

    fn decrypt(&self, block: &mut [u8]) {
        match self {
            Self::Des(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Tdes(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes128(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Sm4(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
        }
    }
}

/// Handle to a simulated engine instance
///
/// Clones of the bus, DMA provider and key store all share one core.
pub struct SimMachine {
    core: Rc<RefCell<SimCore>>,
}

impl SimMachine {
    /// Create a machine with `mem_len` bytes of guest memory.
    #[must_use]
    pub fn new(mem_len: usize) -> Self {
        Self {
            core: Rc::new(RefCell::new(SimCore::new(mem_len))),
        }
    }

    /// Register bus view of the machine.
    #[must_use]
    pub fn bus(&self) -> SimBus {
        SimBus {
            core: Rc::clone(&self.core),
        }
    }

    /// DMA provider view of the machine.
    #[must_use]
    pub fn dma(&self) -> SimDma {
        SimDma {
            core: Rc::clone(&self.core),
        }
    }

    /// Secure key store view of the machine.
    #[must_use]
    pub fn key_store(&self) -> SimKeys {
        SimKeys {
            core: Rc::clone(&self.core),
        }
    }

    /// Provision or clear the device-resident key (zero padded to the
    /// fuse width).
    pub fn set_secure_key(&self, key: Option<&[u8]>) {
        self.core.borrow_mut().secure_key = key.map(|k| {
            let mut buf = [0u8; 32];
            buf[..k.len()].copy_from_slice(k);
            buf
        });
    }

    /// Suppress the done flag on future triggers.
    pub fn set_hang(&self, hang: bool) {
        self.core.borrow_mut().hang = hang;
    }

    /// Number of descriptors triggered so far.
    #[must_use]
    pub fn trigger_count(&self) -> u64 {
        self.core.borrow().triggers
    }
}

/// [`RegisterBus`] over a [`SimMachine`]
pub struct SimBus {
    core: Rc<RefCell<SimCore>>,
}

impl RegisterBus for SimBus {
    fn read32(&self, offset: usize) -> u32 {
        self.core.borrow().regs[offset / 4]
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut core = self.core.borrow_mut();
        match offset {
            CE_CTRL if value & CTRL_TRIGGER != 0 => core.trigger(),
            CE_INTR => {
                let cleared = value & (STATUS_DONE | STATUS_ERR);
                core.regs[CE_STATUS / 4] &= !cleared;
            }
            _ => core.regs[offset / 4] = value,
        }
    }
}

/// [`DmaProvider`] over a [`SimMachine`]
pub struct SimDma {
    core: Rc<RefCell<SimCore>>,
}

impl DmaProvider for SimDma {
    type Region = SimRegion;

    fn alloc(&mut self, len: usize) -> Option<Self::Region> {
        let mut core = self.core.borrow_mut();
        let base = core.next_alloc;
        let end = base.checked_add(len)?;
        if end > core.mem.len() {
            return None;
        }
        core.next_alloc = (end + 63) & !63;
        Some(SimRegion {
            core: Rc::clone(&self.core),
            base,
            len,
        })
    }
}

/// [`DmaRegion`] carved out of simulated guest memory
pub struct SimRegion {
    core: Rc<RefCell<SimCore>>,
    base: usize,
    len: usize,
}

impl DmaRegion for SimRegion {
    fn phys_addr(&self) -> u64 {
        self.base as u64
    }

    fn len(&self) -> usize {
        self.len
    }

    fn copy_in(&mut self, offset: usize, data: &[u8]) {
        debug_assert!(offset + data.len() <= self.len);
        let mut core = self.core.borrow_mut();
        let base = self.base;
        core.mem[base + offset..base + offset + data.len()].copy_from_slice(data);
    }

    fn copy_out(&self, offset: usize, out: &mut [u8]) {
        debug_assert!(offset + out.len() <= self.len);
        let core = self.core.borrow();
        out.copy_from_slice(&core.mem[self.base + offset..self.base + offset + out.len()]);
    }
}

/// [`SecureKeyStore`] over a [`SimMachine`]
pub struct SimKeys {
    core: Rc<RefCell<SimCore>>,
}

impl SecureKeyStore for SimKeys {
    fn secure_key_available(&self) -> bool {
        self.core.borrow().secure_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_model_vectors() {
        assert_eq!(base64_encode(b""), b"");
        assert_eq!(base64_encode(b"f"), b"Zg==");
        assert_eq!(base64_encode(b"fo"), b"Zm8=");
        assert_eq!(base64_encode(b"foo"), b"Zm9v");
        assert_eq!(base64_encode(b"foobar"), b"Zm9vYmFy");
        assert_eq!(base64_decode(b"Zm9vYg==").unwrap(), b"foob");
        assert_eq!(base64_decode(b"Zm9v").unwrap(), b"foo");
        assert!(base64_decode(b"Zm9").is_err());
        assert!(base64_decode(b"Zm!v").is_err());
        assert!(base64_decode(b"Z=9v").is_err());
    }

    #[test]
    fn test_counter_increment_carries() {
        let mut ctr = [0u8, 0, 0, 0xff];
        increment_be(&mut ctr);
        assert_eq!(ctr, [0, 0, 1, 0]);
        let mut ctr = [0xffu8; 4];
        increment_be(&mut ctr);
        assert_eq!(ctr, [0; 4]);
    }

    #[test]
    fn test_dma_alloc_bumps_and_bounds() {
        let machine = SimMachine::new(0x3000);
        let mut dma = machine.dma();
        let a = dma.alloc(100).unwrap();
        let b = dma.alloc(100).unwrap();
        assert!(b.phys_addr() >= a.phys_addr() + 100);
        assert!(dma.alloc(0x10000).is_none());
    }

    #[test]
    fn test_region_copies_round_trip() {
        let machine = SimMachine::new(0x3000);
        let mut region = machine.dma().alloc(64).unwrap();
        region.copy_in(8, b"hello");
        let mut back = [0u8; 5];
        region.copy_out(8, &mut back);
        assert_eq!(&back, b"hello");
    }
}
