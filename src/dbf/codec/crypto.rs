//! The SIX/SX stream cipher used to obfuscate DBF record payloads.
//!
//! This is a faithful port of the Harbour `hb_sxEnCrypt`/`hb_sxDeCrypt`
//! routines: a keystream generator fused with a per-byte rotation. Output
//! is bit-identical to the reference implementation and round-trips against
//! files it produced.
//!
//! All arithmetic is specified over unsigned 32-bit and 16-bit integers
//! with wrap-around semantics, so every multiply and add below is an
//! explicit `wrapping_*` operation. Intermediate products exceed 2^32 for
//! many seeds; masking after the fact would not be equivalent.
//!
//! The cipher is a pure byte-stream transform: no padding, no alignment,
//! no envelope, and output length always equals input length.

use log::trace;

use super::key::SxKey;

const RND_MUL1: u32 = 0xDE6D;
const RND_MUL2: u32 = 0x278D;

/// Per-stream cipher state.
///
/// Inherently sequential: the round key carries forward byte to byte, so a
/// single stream must be processed in order. State is created per transform
/// and discarded; chunked processing just keeps one state across chunks.
pub(crate) struct SxCipher {
    seed: u32,
    round_key: u16,
    key: [u8; 8],
    /// Index of the next 16-bit key window, cycling 0..=6. The window at 6
    /// spans key bytes 6 and 7; index 7 is never a starting position.
    key_idx: usize,
}

impl SxCipher {
    pub(crate) fn new(key: &SxKey) -> Self {
        let key = *key.as_bytes();
        let (seed, round_key) = init_seed(&key);
        Self {
            seed,
            round_key,
            key,
            key_idx: 0,
        }
    }

    /// Encrypt bytes in order, advancing the keystream per byte.
    pub(crate) fn encrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            let shift = (self.round_key & 0x07) as u32;
            *byte = byte.rotate_right(shift).wrapping_add(self.round_key as u8);
            self.advance();
        }
    }

    /// Decrypt bytes in order; exact inverse of [`encrypt`](Self::encrypt).
    pub(crate) fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            let shift = (self.round_key & 0x07) as u32;
            *byte = byte.wrapping_sub(self.round_key as u8).rotate_left(shift);
            self.advance();
        }
    }

    fn advance(&mut self) {
        let (seed, round_key) = next_seed(self.seed, &self.key, self.key_idx);
        self.seed = seed;
        self.round_key = round_key;
        self.key_idx += 1;
        if self.key_idx == 7 {
            self.key_idx = 0;
        }
    }
}

/// Seed initialization.
///
/// # Algorithm
/// Seven rounds over key windows 0..=6 (the window at 6 reads key bytes 6
/// and 7, folding the whole key in):
/// 1. Swap the halves of the 32-bit seed.
/// 2. Multiply by 17, wrapping.
/// 3. Add the little-endian 16-bit key window, wrapping.
///
/// The low bit is then forced on, the low half becomes the first round key,
/// and the returned seed has its halves swapped once more.
fn init_seed(key: &[u8; 8]) -> (u32, u16) {
    let mut seed: u32 = 0;
    for i in 0..7 {
        seed = seed
            .rotate_left(16)
            .wrapping_mul(17)
            .wrapping_add(key_window(key, i) as u32);
    }
    seed |= 1;
    let round_key = seed as u16;
    (seed.rotate_left(16), round_key)
}

/// One keystream step: a 16x16 multiply-with-carry update of the seed.
///
/// The new high half, forced odd, plus the key window at `key_idx` (modulo
/// 2^16) becomes the next round key.
fn next_seed(seed: u32, key: &[u8; 8], key_idx: usize) -> (u32, u16) {
    let seed_lo = seed & 0xFFFF;
    let seed_hi = seed >> 16;

    let t1 = RND_MUL1.wrapping_mul(seed_lo);
    let t2 = RND_MUL2.wrapping_mul(seed_lo).wrapping_add(t1 >> 16);
    let new_lo = t1 as u16;

    let t1 = RND_MUL1.wrapping_mul(seed_hi);
    let new_hi = t1.wrapping_add(t2) as u16;

    let new_seed = ((new_hi as u32) << 16) | new_lo as u32;
    let round_key = (new_hi | 1).wrapping_add(key_window(key, key_idx));
    (new_seed, round_key)
}

/// Little-endian 16-bit read at `index`; valid for `index <= 6`.
#[inline]
fn key_window(key: &[u8; 8], index: usize) -> u16 {
    u16::from_le_bytes([key[index], key[index + 1]])
}

/// Encrypt a byte run in place.
pub fn encrypt_in_place(key: &SxKey, data: &mut [u8]) {
    trace!("SX-encrypting {} bytes in place", data.len());
    SxCipher::new(key).encrypt(data);
}

/// Decrypt a byte run in place.
pub fn decrypt_in_place(key: &SxKey, data: &mut [u8]) {
    trace!("SX-decrypting {} bytes in place", data.len());
    SxCipher::new(key).decrypt(data);
}

/// Encrypt into a fresh buffer, leaving the input untouched.
pub fn encrypt(key: &SxKey, data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    encrypt_in_place(key, &mut out);
    out
}

/// Decrypt into a fresh buffer, leaving the input untouched.
pub fn decrypt(key: &SxKey, data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    decrypt_in_place(key, &mut out);
    out
}
