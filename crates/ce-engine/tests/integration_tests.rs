// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Arcvale Semiconductor

//! End-to-end tests driving the streaming layer against the simulated
//! engine backend.

use ce_engine::{
    Algorithm, CipherKey, CipherRequest, CryptoEngine, Direction, DmaProvider, DmaRegion,
    EngineError, HashContext, SimBus, SimKeys, SimMachine, SimRegion, Transcode, BURST_LEN,
};
use sha1::Sha1;
use sha2::{Digest, Sha256};

type SimEngine = CryptoEngine<SimBus, SimRegion, SimKeys>;

fn machine() -> SimMachine {
    SimMachine::new(0x10_0000)
}

fn engine(m: &SimMachine) -> SimEngine {
    let staging = m.dma().alloc(BURST_LEN).unwrap();
    CryptoEngine::new(m.bus(), staging, m.key_store()).unwrap()
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

fn unhex(s: &str) -> Vec<u8> {
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn cipher_one(
    m: &SimMachine,
    alg: Algorithm,
    dir: Direction,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> Vec<u8> {
    let mut eng = engine(m);
    let mut req = CipherRequest::new(alg, dir, CipherKey::Bytes(key), iv).unwrap();
    let mut out = vec![0u8; data.len()];
    eng.cipher(&mut req, &[data], &mut [&mut out]).unwrap();
    out
}

fn hash_one(m: &SimMachine, alg: Algorithm, data: &[u8]) -> Vec<u8> {
    let mut eng = engine(m);
    let mut ctx = HashContext::new(alg).unwrap();
    eng.hash_update(&mut ctx, &[data]).unwrap();
    let mut out = [0u8; 32];
    let n = eng.hash_finalize(&mut ctx, &mut out).unwrap();
    out[..n].to_vec()
}

fn soft_digest(alg: Algorithm, data: &[u8]) -> Vec<u8> {
    match alg {
        Algorithm::Sha1 => ce_soft::sha1::digest(data).to_vec(),
        Algorithm::Sha256 => ce_soft::sha256::digest(data).to_vec(),
        Algorithm::Sm3 => ce_soft::sm3::digest(data).to_vec(),
        _ => unreachable!(),
    }
}

// ==========================================================================
// Ciphers
// ==========================================================================

#[test]
fn test_aes128_zero_vector() {
    // FIPS-197 appendix: AES-128 of the zero block under the zero key.
    // CBC with a zero IV degenerates to ECB for the first block.
    let m = machine();
    let ct = cipher_one(
        &m,
        Algorithm::Aes128Cbc,
        Direction::Encrypt,
        &[0u8; 16],
        &[0u8; 16],
        &[0u8; 16],
    );
    assert_eq!(
        ct,
        [
            0x66, 0xe9, 0x4b, 0xd4, 0xef, 0x8a, 0x2c, 0x3b, 0x88, 0x4c, 0xfa, 0x59, 0xca, 0x34,
            0x2b, 0x2e
        ]
    );
}

#[test]
fn test_aes128_cbc_nist_vector() {
    // NIST SP 800-38A F.2.1 (encrypt) / F.2.2 (decrypt), four blocks.
    let m = machine();
    let key = unhex("2b7e151628aed2a6abf7158809cf4f3c");
    let iv = unhex("000102030405060708090a0b0c0d0e0f");
    let pt = unhex(
        "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51\
         30c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
    );
    let ct = unhex(
        "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2\
         73bed6b8e3c1743b7116e69e222295163ff1caa1681fac09120eca307586e1a7",
    );
    assert_eq!(
        cipher_one(&m, Algorithm::Aes128Cbc, Direction::Encrypt, &key, &iv, &pt),
        ct
    );
    assert_eq!(
        cipher_one(&m, Algorithm::Aes128Cbc, Direction::Decrypt, &key, &iv, &ct),
        pt
    );
}

#[test]
fn test_aes128_ctr_nist_vector() {
    // NIST SP 800-38A F.5.1 (encrypt) / F.5.2 (decrypt), four blocks.
    let m = machine();
    let key = unhex("2b7e151628aed2a6abf7158809cf4f3c");
    let ctr = unhex("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
    let pt = unhex(
        "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51\
         30c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
    );
    let ct = unhex(
        "874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff\
         5ae4df3edbd5d35e5b4f09020db03eab1e031dda2fbe03d1792170a0f3009cee",
    );
    assert_eq!(
        cipher_one(&m, Algorithm::Aes128Ctr, Direction::Encrypt, &key, &ctr, &pt),
        ct
    );
    assert_eq!(
        cipher_one(&m, Algorithm::Aes128Ctr, Direction::Decrypt, &key, &ctr, &ct),
        pt
    );
}

#[test]
fn test_sm4_published_vector() {
    // GB/T 32907-2016 appendix A example 1, single block.
    let m = machine();
    let key = unhex("0123456789abcdeffedcba9876543210");
    let pt = unhex("0123456789abcdeffedcba9876543210");
    let ct = unhex("681edf34d206965e86b3e94f536e4246");
    assert_eq!(
        cipher_one(&m, Algorithm::Sm4Ecb, Direction::Encrypt, &key, &[], &pt),
        ct
    );
    assert_eq!(
        cipher_one(&m, Algorithm::Sm4Ecb, Direction::Decrypt, &key, &[], &ct),
        pt
    );
}

#[test]
fn test_des_published_vector() {
    let m = machine();
    let key = unhex("133457799bbcdff1");
    let pt = unhex("0123456789abcdef");
    let ct = unhex("85e813540f0ab405");
    assert_eq!(
        cipher_one(&m, Algorithm::DesEcb, Direction::Encrypt, &key, &[], &pt),
        ct
    );
    assert_eq!(
        cipher_one(&m, Algorithm::DesEcb, Direction::Decrypt, &key, &[], &ct),
        pt
    );
}

#[test]
fn test_cipher_round_trips() {
    let m = machine();
    let cases = [
        (Algorithm::DesEcb, 8usize, 0usize),
        (Algorithm::DesCbc, 8, 8),
        (Algorithm::DesCtr, 8, 8),
        (Algorithm::TdesCbc, 24, 8),
        (Algorithm::TdesCtr, 24, 8),
        (Algorithm::Aes128Ecb, 16, 0),
        (Algorithm::Aes128Cbc, 16, 16),
        (Algorithm::Aes192Ctr, 24, 16),
        (Algorithm::Aes256Cbc, 32, 16),
        (Algorithm::Aes256Ctr, 32, 16),
        (Algorithm::Sm4Ecb, 16, 0),
        (Algorithm::Sm4Cbc, 16, 16),
        (Algorithm::Sm4Ctr, 16, 16),
        (Algorithm::Sm4Ofb, 16, 16),
    ];
    for (alg, key_len, iv_len) in cases {
        let key = pattern(key_len);
        let iv = pattern(iv_len);
        let pt = pattern(alg.block_len() * 5);
        let ct = cipher_one(&m, alg, Direction::Encrypt, &key, &iv, &pt);
        assert_ne!(ct, pt, "{alg:?} produced identity output");
        let back = cipher_one(&m, alg, Direction::Decrypt, &key, &iv, &ct);
        assert_eq!(back, pt, "{alg:?} round trip failed");
        // The reverse order must also hold.
        let dec = cipher_one(&m, alg, Direction::Decrypt, &key, &iv, &pt);
        let re = cipher_one(&m, alg, Direction::Encrypt, &key, &iv, &dec);
        assert_eq!(re, pt, "{alg:?} reverse round trip failed");
    }
}

#[test]
fn test_cbc_split_calls_continue_the_chain() {
    let m = machine();
    let key = pattern(16);
    let iv = pattern(16);
    let pt = pattern(16 * 4);

    let whole = cipher_one(&m, Algorithm::Aes128Cbc, Direction::Encrypt, &key, &iv, &pt);

    let mut eng = engine(&m);
    let mut req =
        CipherRequest::new(Algorithm::Aes128Cbc, Direction::Encrypt, CipherKey::Bytes(&key), &iv)
            .unwrap();
    let mut lo = vec![0u8; 32];
    let mut hi = vec![0u8; 32];
    eng.cipher(&mut req, &[&pt[..32]], &mut [&mut lo]).unwrap();
    eng.cipher(&mut req, &[&pt[32..]], &mut [&mut hi]).unwrap();
    assert_eq!([lo, hi].concat(), whole);
    // The chain IV after the last block is the last ciphertext block.
    assert_eq!(req.iv(), &whole[48..]);
}

#[test]
fn test_ctr_spans_multiple_bursts() {
    let m = machine();
    let key = pattern(32);
    let iv = pattern(16);
    let pt = pattern(BURST_LEN * 2 + 64);

    let whole = cipher_one(&m, Algorithm::Aes256Ctr, Direction::Encrypt, &key, &iv, &pt);

    // Splitting at odd block boundaries must not change the stream.
    let mut eng = engine(&m);
    let mut req =
        CipherRequest::new(Algorithm::Aes256Ctr, Direction::Encrypt, CipherKey::Bytes(&key), &iv)
            .unwrap();
    let mut parts = Vec::new();
    for piece in pt.chunks(1040) {
        let mut out = vec![0u8; piece.len()];
        eng.cipher(&mut req, &[piece], &mut [&mut out]).unwrap();
        parts.extend_from_slice(&out);
    }
    assert_eq!(parts, whole);
}

#[test]
fn test_scatter_fragments_match_contiguous() {
    let m = machine();
    let key = pattern(16);
    let iv = pattern(16);
    let pt = pattern(16 * 7);

    let whole = cipher_one(&m, Algorithm::Sm4Cbc, Direction::Encrypt, &key, &iv, &pt);

    // Fragment boundaries land mid-block on both sides.
    let mut eng = engine(&m);
    let mut req =
        CipherRequest::new(Algorithm::Sm4Cbc, Direction::Encrypt, CipherKey::Bytes(&key), &iv)
            .unwrap();
    let (mut a, mut b, mut c) = (vec![0u8; 5], vec![0u8; 60], vec![0u8; 47]);
    eng.cipher(
        &mut req,
        &[&pt[..13], &pt[13..13], &pt[13..90], &pt[90..]],
        &mut [&mut a, &mut b, &mut c],
    )
    .unwrap();
    assert_eq!([a, b, c].concat(), whole);
}

#[test]
fn test_misaligned_cipher_total_is_rejected_before_hardware() {
    let m = machine();
    let mut eng = engine(&m);
    let key = pattern(16);
    let mut req =
        CipherRequest::new(Algorithm::Aes128Ecb, Direction::Encrypt, CipherKey::Bytes(&key), &[])
            .unwrap();
    let mut out = vec![0u8; 20];
    assert_eq!(
        eng.cipher(&mut req, &[&pattern(20)], &mut [&mut out]),
        Err(EngineError::BlockAlignment)
    );
    assert_eq!(m.trigger_count(), 0);
    // Alignment failures do not poison the request.
    let mut out = vec![0u8; 16];
    eng.cipher(&mut req, &[&pattern(16)], &mut [&mut out]).unwrap();
}

#[test]
fn test_mismatched_scatter_totals_are_rejected() {
    let m = machine();
    let mut eng = engine(&m);
    let key = pattern(16);
    let mut req =
        CipherRequest::new(Algorithm::Aes128Ecb, Direction::Encrypt, CipherKey::Bytes(&key), &[])
            .unwrap();
    let mut out = vec![0u8; 32];
    assert_eq!(
        eng.cipher(&mut req, &[&pattern(16)], &mut [&mut out]),
        Err(EngineError::InvalidRequest)
    );
    assert_eq!(m.trigger_count(), 0);
}

#[test]
fn test_masked_algorithm_is_rejected() {
    let m = machine();
    let mut eng = engine(&m);
    eng.set_enabled_mask(Algorithm::ALL_MASK & !Algorithm::Sm4Cbc.mask());
    let key = pattern(16);
    let mut req =
        CipherRequest::new(Algorithm::Sm4Cbc, Direction::Encrypt, CipherKey::Bytes(&key), &pattern(16))
            .unwrap();
    let mut out = vec![0u8; 16];
    assert_eq!(
        eng.cipher(&mut req, &[&pattern(16)], &mut [&mut out]),
        Err(EngineError::UnsupportedAlgorithm)
    );
    assert_eq!(m.trigger_count(), 0);
}

// ==========================================================================
// Secure key
// ==========================================================================

#[test]
fn test_secure_key_rejected_when_not_provisioned() {
    let m = machine();
    let mut eng = engine(&m);
    assert!(!eng.secure_key_available());
    let mut req = CipherRequest::new(
        Algorithm::Aes256Cbc,
        Direction::Encrypt,
        CipherKey::Secure,
        &[0u8; 16],
    )
    .unwrap();
    let mut out = vec![0u8; 16];
    assert_eq!(
        eng.cipher(&mut req, &[&[0u8; 16]], &mut [&mut out]),
        Err(EngineError::SecureKeyUnavailable)
    );
    // Rejection happens before any register or descriptor traffic.
    assert_eq!(m.trigger_count(), 0);
}

#[test]
fn test_secure_key_path_matches_explicit_key() {
    let m = machine();
    let key = pattern(32);
    m.set_secure_key(Some(&key));
    let iv = pattern(16);
    let pt = pattern(16 * 3);

    let explicit = cipher_one(&m, Algorithm::Aes256Cbc, Direction::Encrypt, &key, &iv, &pt);

    let mut eng = engine(&m);
    let mut req =
        CipherRequest::new(Algorithm::Aes256Cbc, Direction::Encrypt, CipherKey::Secure, &iv)
            .unwrap();
    let mut out = vec![0u8; pt.len()];
    eng.cipher(&mut req, &[&pt], &mut [&mut out]).unwrap();
    assert_eq!(out, explicit);
}

// ==========================================================================
// Hashing
// ==========================================================================

#[test]
fn test_sha256_published_vectors() {
    let m = machine();
    let empty = hash_one(&m, Algorithm::Sha256, b"");
    assert_eq!(
        empty,
        [
            0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f,
            0xb9, 0x24, 0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b,
            0x78, 0x52, 0xb8, 0x55
        ]
    );
    let abc = hash_one(&m, Algorithm::Sha256, b"abc");
    assert_eq!(
        abc,
        [
            0xba, 0x78, 0x16, 0xbf, 0x8f, 0x01, 0xcf, 0xea, 0x41, 0x41, 0x40, 0xde, 0x5d, 0xae,
            0x22, 0x23, 0xb0, 0x03, 0x61, 0xa3, 0x96, 0x17, 0x7a, 0x9c, 0xb4, 0x10, 0xff, 0x61,
            0xf2, 0x00, 0x15, 0xad
        ]
    );
}

#[test]
fn test_hash_boundary_lengths_match_software() {
    let m = machine();
    for alg in [Algorithm::Sha1, Algorithm::Sha256, Algorithm::Sm3] {
        for len in [0usize, 1, 55, 56, 63, 64, 65, 119, 128, BURST_LEN, BURST_LEN + 1] {
            let data = pattern(len);
            assert_eq!(
                hash_one(&m, alg, &data),
                soft_digest(alg, &data),
                "{alg:?} length {len}"
            );
        }
    }
}

#[test]
fn test_hash_split_updates_match_one_shot() {
    let m = machine();
    let data = pattern(300);
    for split in [0usize, 1, 30, 63, 64, 65, 128, 299, 300] {
        let mut eng = engine(&m);
        let mut ctx = HashContext::new(Algorithm::Sm3).unwrap();
        eng.hash_update(&mut ctx, &[&data[..split]]).unwrap();
        eng.hash_update(&mut ctx, &[&data[split..]]).unwrap();
        let mut out = [0u8; 32];
        eng.hash_finalize(&mut ctx, &mut out).unwrap();
        assert_eq!(out.to_vec(), soft_digest(Algorithm::Sm3, &data), "split {split}");
    }
}

#[test]
fn test_hash_scatter_fragments() {
    let m = machine();
    let data = pattern(200);
    let mut eng = engine(&m);
    let mut ctx = HashContext::new(Algorithm::Sha1).unwrap();
    eng.hash_update(&mut ctx, &[&data[..7], &[], &data[7..99], &data[99..]])
        .unwrap();
    let mut out = [0u8; 20];
    let n = eng.hash_finalize(&mut ctx, &mut out).unwrap();
    assert_eq!(n, 20);
    assert_eq!(out.to_vec(), soft_digest(Algorithm::Sha1, &data));
}

#[test]
fn test_hash_matches_external_oracle() {
    let m = machine();
    let data = pattern(10_000);
    assert_eq!(
        hash_one(&m, Algorithm::Sha256, &data),
        Sha256::digest(&data).to_vec()
    );
    assert_eq!(
        hash_one(&m, Algorithm::Sha1, &data),
        Sha1::digest(&data).to_vec()
    );
}

#[test]
fn test_oversized_hash_update_is_rejected_before_hardware() {
    // One call is bounded by the chunk budget; the rejection happens
    // during planning, before any descriptor is written.
    let m = machine();
    let mut eng = engine(&m);
    let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
    let data = vec![0u8; BURST_LEN * 256 + 64];
    assert_eq!(
        eng.hash_update(&mut ctx, &[&data]),
        Err(EngineError::InvalidRequest)
    );
    assert_eq!(m.trigger_count(), 0);
}

#[test]
fn test_context_export_import_resumes() {
    let m = machine();
    let data = pattern(500);
    for split in [0usize, 64, 100, 127, 128, 500] {
        let mut eng = engine(&m);
        let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
        eng.hash_update(&mut ctx, &[&data[..split]]).unwrap();
        let mut blob = [0u8; 128];
        let n = ctx.export(&mut blob).unwrap();

        let mut resumed = HashContext::import(Algorithm::Sha256, &blob[..n]).unwrap();
        let mut eng2 = engine(&m);
        eng2.hash_update(&mut resumed, &[&data[split..]]).unwrap();
        let mut out = [0u8; 32];
        eng2.hash_finalize(&mut resumed, &mut out).unwrap();
        assert_eq!(out.to_vec(), soft_digest(Algorithm::Sha256, &data), "split {split}");
    }
}

#[test]
fn test_finalized_context_rejects_reuse() {
    let m = machine();
    let mut eng = engine(&m);
    let mut ctx = HashContext::new(Algorithm::Sha1).unwrap();
    let mut out = [0u8; 20];
    eng.hash_finalize(&mut ctx, &mut out).unwrap();
    assert_eq!(
        eng.hash_update(&mut ctx, &[b"more"]),
        Err(EngineError::InvalidRequest)
    );
    assert_eq!(
        eng.hash_finalize(&mut ctx, &mut out),
        Err(EngineError::InvalidRequest)
    );
    let mut blob = [0u8; 64];
    assert_eq!(ctx.export(&mut blob), Err(EngineError::InvalidRequest));
}

#[test]
fn test_short_digest_buffer_is_rejected() {
    let m = machine();
    let mut eng = engine(&m);
    let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
    let mut out = [0u8; 31];
    assert_eq!(
        eng.hash_finalize(&mut ctx, &mut out),
        Err(EngineError::NullOutput)
    );
    // The context stays usable after a buffer-size rejection.
    let mut out = [0u8; 32];
    eng.hash_finalize(&mut ctx, &mut out).unwrap();
}

#[test]
fn test_update_blocks_rejects_unaligned_total() {
    let m = machine();
    let mut eng = engine(&m);
    let mut ctx = HashContext::new(Algorithm::Sha256).unwrap();
    assert_eq!(
        eng.hash_update_blocks(&mut ctx, &[&pattern(100)]),
        Err(EngineError::BlockAlignment)
    );
    assert_eq!(m.trigger_count(), 0);
    eng.hash_update_blocks(&mut ctx, &[&pattern(128)]).unwrap();
    let mut out = [0u8; 32];
    eng.hash_finalize(&mut ctx, &mut out).unwrap();
    assert_eq!(out.to_vec(), soft_digest(Algorithm::Sha256, &pattern(128)));
}

// ==========================================================================
// Base64
// ==========================================================================

#[test]
fn test_base64_vectors() {
    let m = machine();
    let mut eng = engine(&m);
    let cases: [(&[u8], &[u8]); 5] = [
        (b"", b""),
        (b"f", b"Zg=="),
        (b"fo", b"Zm8="),
        (b"foo", b"Zm9v"),
        (b"foobar", b"Zm9vYmFy"),
    ];
    for (plain, text) in cases {
        let mut enc = vec![0u8; text.len()];
        let n = eng.base64(Transcode::Encode, &[plain], &mut [&mut enc]).unwrap();
        assert_eq!(&enc[..n], text);

        let mut dec = vec![0u8; plain.len()];
        let n = eng.base64(Transcode::Decode, &[text], &mut [&mut dec]).unwrap();
        assert_eq!(&dec[..n], plain);
    }
}

#[test]
fn test_base64_multi_chunk_round_trip() {
    let m = machine();
    let mut eng = engine(&m);
    let data = pattern(5000);
    let mut enc = vec![0u8; ce_engine::encoded_len(5000)];
    let n = eng.base64(Transcode::Encode, &[&data], &mut [&mut enc]).unwrap();
    assert_eq!(n, enc.len());

    let mut dec = vec![0u8; 5000];
    let n = eng
        .base64(Transcode::Decode, &[&enc[..]], &mut [&mut dec])
        .unwrap();
    assert_eq!(n, 5000);
    assert_eq!(dec, data);
}

#[test]
fn test_base64_decode_rejects_unaligned_input() {
    let m = machine();
    let mut eng = engine(&m);
    let mut out = vec![0u8; 8];
    assert_eq!(
        eng.base64(Transcode::Decode, &[b"Zm9vY"], &mut [&mut out]),
        Err(EngineError::BlockAlignment)
    );
    assert_eq!(m.trigger_count(), 0);
}

#[test]
fn test_base64_short_destination_is_rejected() {
    let m = machine();
    let mut eng = engine(&m);
    let mut out = vec![0u8; 3];
    assert_eq!(
        eng.base64(Transcode::Encode, &[b"foo"], &mut [&mut out]),
        Err(EngineError::NullOutput)
    );
    assert_eq!(m.trigger_count(), 0);
}

#[test]
fn test_base64_invalid_text_surfaces_hardware_error() {
    let m = machine();
    let mut eng = engine(&m);
    let mut out = vec![0u8; 3];
    assert_eq!(
        eng.base64(Transcode::Decode, &[b"Zm!v"], &mut [&mut out]),
        Err(EngineError::InvalidRequest)
    );
}

// ==========================================================================
// Engine plumbing
// ==========================================================================

#[test]
fn test_raw_copy_moves_bytes() {
    let m = machine();
    let mut eng = engine(&m);
    let mut dma = m.dma();
    let mut a = dma.alloc(256).unwrap();
    let b = dma.alloc(256).unwrap();
    let data = pattern(256);
    a.copy_in(0, &data);
    eng.raw_copy(b.phys_addr(), a.phys_addr(), 256).unwrap();
    let mut back = vec![0u8; 256];
    b.copy_out(0, &mut back);
    assert_eq!(back, data);
}

#[test]
fn test_timeout_poisons_the_request() {
    let m = machine();
    let mut eng = engine(&m);
    let key = pattern(16);
    let mut req =
        CipherRequest::new(Algorithm::Aes128Cbc, Direction::Encrypt, CipherKey::Bytes(&key), &pattern(16))
            .unwrap();
    let mut out = vec![0u8; 16];

    m.set_hang(true);
    assert_eq!(
        eng.cipher(&mut req, &[&pattern(16)], &mut [&mut out]),
        Err(EngineError::Timeout)
    );
    m.set_hang(false);
    assert_eq!(
        eng.cipher(&mut req, &[&pattern(16)], &mut [&mut out]),
        Err(EngineError::InvalidRequest)
    );
}

#[test]
fn test_undersized_staging_region_is_rejected() {
    let m = machine();
    let staging = m.dma().alloc(BURST_LEN - 1).unwrap();
    assert!(matches!(
        CryptoEngine::new(m.bus(), staging, m.key_store()),
        Err(EngineError::InvalidRequest)
    ));
}
