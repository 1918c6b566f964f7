//! # sxdbf
//!
//! Codec and transformation pipeline for xBase-family table files ("DBF")
//! whose record payload may be obfuscated with the Harbour-compatible
//! SIX/SX stream cipher.
//!
//! The crate is pure and synchronous: no file I/O happens inside it, and a
//! single call transforms one in-memory buffer. Reading and writing files,
//! locating the per-tenant table directory, and memo-file resolution are
//! the caller's business.
//!
//! ## Example
//!
//! ```no_run
//! use sxdbf::{transform, SxKey, TransformMode};
//!
//! # fn run(file_bytes: &[u8]) -> sxdbf::Result<()> {
//! let key = SxKey::from_text("hunter2!");
//! let outcome = transform(file_bytes, &key, TransformMode::Decrypt, true)?;
//! println!("{}", outcome.status);
//! for record in outcome.records.unwrap_or_default() {
//!     if let Some(fields) = record.fields() {
//!         println!("{:?}", fields.values);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The cipher round-trips bit-exactly against payloads produced by the
//! reference Harbour `hb_sxEnCrypt`/`hb_sxDeCrypt` routines, and the
//! pipeline preserves every header byte it does not explicitly retag,
//! trailing EOF marker included.

pub mod dbf;

pub use dbf::codec::{codepage, crypto};
pub use dbf::{
    transform, DbfError, DbfHeader, DecodedRecord, FieldDescriptor, FieldKind, FieldValue,
    LastUpdate, RecordFields, Result, SxKey, TransformMode, TransformOutcome, STATUS_ENCRYPTED,
    STATUS_PLAIN,
};
