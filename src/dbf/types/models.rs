//! Core data structures for the DBF table format.
//!
//! This module defines the fundamental types used throughout the library:
//! - Header and field-descriptor metadata
//! - Typed field values and decoded records
//! - Transformation modes and the pipeline result bundle

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

/// Status byte of a plain (unencrypted) dBASE III table.
pub const STATUS_PLAIN: u8 = 0x03;
/// Status byte of an SX-encrypted table.
pub const STATUS_ENCRYPTED: u8 = 0x06;

/// The table's last-update stamp from header offsets 1-3.
///
/// The year byte is an offset: values >= 80 count from 1900, values below
/// count from 2000. Month and day are stored raw and may be zero in tables
/// that were never written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastUpdate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl LastUpdate {
    /// Decode from the three raw header bytes.
    pub fn from_bytes(raw: [u8; 3]) -> Self {
        let year = if raw[0] >= 80 {
            1900 + raw[0] as u16
        } else {
            2000 + raw[0] as u16
        };
        Self {
            year,
            month: raw[1],
            day: raw[2],
        }
    }

    /// Encode back to the three raw header bytes, reversing the year offset.
    pub fn to_bytes(self) -> [u8; 3] {
        let year_byte = if self.year >= 2000 {
            (self.year - 2000) as u8
        } else {
            (self.year - 1900) as u8
        };
        [year_byte, self.month, self.day]
    }

    /// The stamp as a calendar date, or `None` when month/day are not a
    /// valid calendar combination (e.g. a zeroed header).
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
    }
}

/// Parsed fixed-width DBF header.
///
/// Read-only after construction; the reserved header bytes are not modeled
/// here and are carried through verbatim in the owning buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbfHeader {
    /// Table variant / encryption state (offset 0).
    pub status: u8,
    /// Last-update stamp (offsets 1-3).
    pub last_update: LastUpdate,
    /// Number of records in the table (offsets 4-7, little-endian).
    pub record_count: u32,
    /// Total header size including descriptors and terminator (offsets 8-9).
    pub header_len: u16,
    /// Size of each record including the deletion marker (offsets 10-11).
    pub record_len: u16,
    /// Language-driver (code page) byte (offset 29).
    pub language_driver: u8,
}

impl DbfHeader {
    /// Whether the payload is marked SX-encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.status == STATUS_ENCRYPTED
    }

    /// Total payload size in bytes.
    pub fn payload_len(&self) -> u64 {
        self.record_count as u64 * self.record_len as u64
    }
}

/// Column type of a field descriptor.
///
/// Unknown type bytes are passed through as `Character` so the raw content
/// stays reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Character,
    Numeric,
    Float,
    Logical,
    Date,
    Memo,
}

impl FieldKind {
    /// Map the descriptor type byte onto a kind.
    pub fn from_code(code: u8) -> Self {
        match code {
            b'N' => Self::Numeric,
            b'F' => Self::Float,
            b'L' => Self::Logical,
            b'D' => Self::Date,
            b'M' => Self::Memo,
            _ => Self::Character,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Character => "character",
            Self::Numeric => "numeric",
            Self::Float => "float",
            Self::Logical => "logical",
            Self::Date => "date",
            Self::Memo => "memo",
        };
        f.write_str(name)
    }
}

/// One column of the table, parsed from a 32-byte descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Trimmed ASCII field name (bytes 0-10 of the descriptor).
    pub name: String,
    pub kind: FieldKind,
    /// Field width in bytes within a record.
    pub length: u8,
    pub decimal_places: u8,
    /// Byte offset of this field inside a record. The first field starts at
    /// 1, right after the deletion marker.
    pub offset_in_record: usize,
}

/// A single decoded field value.
///
/// `None` covers both blank content and recoverable parse failures; the
/// distinction is carried on [`RecordFields::issues`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Character(String),
    /// `N` field with zero decimal places.
    Integer(i64),
    /// `N` field with a declared decimal fraction.
    Decimal(f64),
    /// `F` field.
    Float(f64),
    Logical(bool),
    Date(NaiveDate),
    /// Raw trimmed memo-pointer text; the memo file is never dereferenced.
    Memo(String),
    None,
}

/// The typed values of one live (undeleted) record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordFields {
    /// Field name -> decoded value.
    pub values: HashMap<String, FieldValue>,
    /// Names of fields whose raw content failed to parse and fell back to
    /// [`FieldValue::None`].
    pub issues: Vec<String>,
}

impl RecordFields {
    /// Convenience lookup by field name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }
}

/// The result of decoding one record slot.
///
/// A deleted row is a sentinel, distinguishable from a present-but-empty
/// record; its raw bytes stay reachable through the raw-record accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRecord {
    Deleted,
    Row(RecordFields),
}

impl DecodedRecord {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// The field map of a live row, or `None` for the deleted sentinel.
    pub fn fields(&self) -> Option<&RecordFields> {
        match self {
            Self::Row(fields) => Some(fields),
            Self::Deleted => None,
        }
    }
}

/// Direction of a pipeline transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Decrypt,
    Encrypt,
}

/// Everything a pipeline invocation produces.
///
/// `bytes` is a fresh buffer; the caller's input is never aliased or
/// mutated. `records` is populated only for decrypt runs that asked for
/// record decoding.
#[derive(Debug)]
pub struct TransformOutcome {
    pub bytes: Vec<u8>,
    pub header: DbfHeader,
    pub fields: Vec<FieldDescriptor>,
    pub records: Option<Vec<DecodedRecord>>,
    /// Human-readable summary of what the transformation did.
    pub status: String,
}
