//! Custom error types for the sxdbf crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Header-level errors are fatal to a pipeline invocation; recoverable
/// field parse issues never surface here (they become `None` values on the
/// decoded record instead). The cipher itself has no failure mode.
#[derive(Debug, Error)]
pub enum DbfError {
    /// The buffer is structurally invalid as a DBF header.
    #[error("Malformed DBF header: {0}")]
    MalformedHeader(String),

    /// The declared record region extends past the end of the buffer.
    #[error("Payload out of range: need {needed} bytes, buffer holds {available}")]
    PayloadOutOfRange { needed: u64, available: u64 },

    /// `replace_payload` was handed a replacement of the wrong size.
    #[error("Replacement payload size mismatch: expected {expected} bytes, got {found}")]
    ReplaceSizeMismatch { expected: usize, found: usize },

    /// A record index at or past the table's record count.
    #[error("Record index {index} out of range (table holds {count} records)")]
    RecordIndexOutOfRange { index: u32, count: u32 },
}

/// A convenience `Result` type alias using the crate's `DbfError` type.
pub type Result<T> = std::result::Result<T, DbfError>;
