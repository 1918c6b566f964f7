//! Core DBF codec module.
//!
//! Parses xBase-family DBF table buffers, transforms SX-encrypted record
//! payloads in either direction, and decodes records into typed values.

pub mod codec;
pub mod format;
pub mod pipeline;
pub mod types;
pub mod utils;

pub use codec::key::SxKey;
pub use pipeline::transform;
pub use types::error::{DbfError, Result};
pub use types::models::{
    DbfHeader, DecodedRecord, FieldDescriptor, FieldKind, FieldValue, LastUpdate, RecordFields,
    TransformMode, TransformOutcome, STATUS_ENCRYPTED, STATUS_PLAIN,
};
