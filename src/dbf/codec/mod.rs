//! Codec layer: key normalization, the SX stream cipher, and code-page
//! resolution.
//!
//! # Submodules
//!
//! - [`key`]: 8-byte key material normalization
//! - [`crypto`]: the Harbour-compatible SIX/SX stream cipher
//! - [`codepage`]: language-driver byte → code page → text encoding

pub mod codepage;
pub mod crypto;
pub mod key;
