// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! Software block-compression primitives for the CE crypto engine
//!
//! The hardware hash pipeline only accepts whole, unpadded blocks. The
//! final one or two padded blocks of every digest are therefore always
//! compressed in software, using the primitives in this crate. Each
//! module exposes the algorithm's standard initial vector, a bit-exact
//! single-block compression function, and a one-shot `digest` helper so
//! the crate can double as a correctness oracle for the hardware path.
//!
//! # Security
//!
//! Message schedules and working registers hold message-derived data;
//! every compression function scrubs its scratch state before
//! returning.

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::cast_possible_truncation)]

pub mod sha1;
pub mod sha256;
pub mod sm3;

/// Block length shared by SHA-1, SHA-256 and SM3, in bytes.
pub const BLOCK_LEN: usize = 64;

pub use sha1::{SHA1_IV, compress as sha1_compress};
pub use sha256::{SHA256_IV, compress as sha256_compress};
pub use sm3::{SM3_IV, compress as sm3_compress};
