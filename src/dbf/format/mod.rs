//! File format layer for DBF tables.
//!
//! # Module Organization
//!
//! - [`header`]: the 32-byte fixed header, field descriptors, payload
//!   carving and patch-back serialization
//! - [`record`]: typed decoding of fixed-width records
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌──────────────────┐
//! │  Fixed header    │ ← header::parse()
//! ├──────────────────┤
//! │  Field           │
//! │  descriptors     │
//! │  + 0x0D          │
//! ├──────────────────┤
//! │  Record payload  │ ← header::payload_slice(),
//! │  (optionally     │   record::decode()
//! │   SX-encrypted)  │
//! ├──────────────────┤
//! │  0x1A (optional) │   preserved verbatim
//! └──────────────────┘
//! ```

pub mod header;
pub mod record;
