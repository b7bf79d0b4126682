// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Driver core for the CE descriptor-based crypto engine
//!
//! The CE engine executes one fixed-format descriptor at a time:
//! block ciphers (DES, 3DES, AES, SM4), hashes (SHA-1, SHA-256, SM3)
//! and a base64 transcoder, all over device-visible memory. This crate
//! provides the streaming layer on top: chunked IV-chained cipher
//! calls, incremental hashing with a software-padded tail, and the
//! transcoder's length bookkeeping.
//!
//! Hardware access goes through three narrow traits ([`RegisterBus`],
//! [`DmaRegion`], [`SecureKeyStore`]); [`MmioBus`] drives a real
//! register window, and the `sim` feature provides a register-accurate
//! in-process model for tests.

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_panics_doc)]

#[cfg(feature = "std")]
extern crate std;

pub mod alg;
pub mod base64;
pub mod cipher;
pub mod desc;
pub mod engine;
pub mod error;
pub mod hash;
pub mod mmio;
pub mod regs;
mod scatter;
#[cfg(feature = "sim")]
pub mod sim;
pub mod traits;

pub use alg::{AlgCategory, Algorithm, AlgorithmRecord, ALGORITHM_COUNT, ALGORITHM_TABLE};
pub use base64::{encoded_len, Transcode};
pub use cipher::{CipherKey, CipherRequest, Direction};
pub use desc::{EngineDescriptor, KeyField, DESC_KEY_MAX, DESC_WORDS};
pub use engine::{CryptoEngine, TriggerOp, BURST_LEN, POLL_RETRY_BUDGET};
pub use error::{EngineError, EngineResult};
pub use hash::HashContext;
pub use mmio::MmioBus;
pub use traits::{DmaProvider, DmaRegion, RegisterBus, SecureKeyStore};

#[cfg(feature = "sim")]
pub use sim::{SimBus, SimDma, SimKeys, SimMachine, SimRegion};
