//! Typed decoding of fixed-width records from a plain (decrypted) payload.
//!
//! Each record is `record_len` bytes: a one-byte deletion marker followed
//! by the fields at the offsets derived while parsing the descriptors.
//! Field content that fails to parse is recovered locally as a `None`
//! value with the field name noted on the record; it never aborts the
//! caller.

use encoding_rs::Encoding;
use log::trace;

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{
    DbfHeader, DecodedRecord, FieldDescriptor, FieldKind, FieldValue, RecordFields,
};
use crate::dbf::utils;

/// Deletion marker of a live row.
pub const RECORD_LIVE: u8 = 0x20;
/// Deletion marker of a deleted row.
pub const RECORD_DELETED: u8 = 0x2A;

/// Borrow the raw bytes of one record, deleted rows included.
///
/// # Errors
/// [`DbfError::RecordIndexOutOfRange`] for `index >= record_count`;
/// [`DbfError::PayloadOutOfRange`] when the payload slice is shorter than
/// the header declares.
pub fn raw<'a>(payload: &'a [u8], header: &DbfHeader, index: u32) -> Result<&'a [u8]> {
    if index >= header.record_count {
        return Err(DbfError::RecordIndexOutOfRange {
            index,
            count: header.record_count,
        });
    }
    let record_len = header.record_len as usize;
    let start = index as usize * record_len;
    let end = start + record_len;
    if end > payload.len() {
        return Err(DbfError::PayloadOutOfRange {
            needed: end as u64,
            available: payload.len() as u64,
        });
    }
    Ok(&payload[start..end])
}

/// Decode one record into typed field values.
///
/// A row whose deletion marker is `0x2A` yields [`DecodedRecord::Deleted`]
/// without touching the field bytes.
pub fn decode(
    payload: &[u8],
    header: &DbfHeader,
    fields: &[FieldDescriptor],
    index: u32,
    encoding: Option<&'static Encoding>,
) -> Result<DecodedRecord> {
    let record = raw(payload, header, index)?;
    if record[0] == RECORD_DELETED {
        trace!("Record {} carries the deletion marker", index);
        return Ok(DecodedRecord::Deleted);
    }

    let mut decoded = RecordFields::default();
    for field in fields {
        let start = field.offset_in_record;
        let bytes = &record[start..start + field.length as usize];
        let value = decode_field(field, bytes, encoding);
        if value.is_none() {
            decoded.issues.push(field.name.clone());
        }
        decoded
            .values
            .insert(field.name.clone(), value.unwrap_or(FieldValue::None));
    }
    Ok(DecodedRecord::Row(decoded))
}

/// Decode every record in the table in order.
pub fn decode_all(
    payload: &[u8],
    header: &DbfHeader,
    fields: &[FieldDescriptor],
    encoding: Option<&'static Encoding>,
) -> Result<Vec<DecodedRecord>> {
    (0..header.record_count)
        .map(|index| decode(payload, header, fields, index, encoding))
        .collect()
}

/// Interpret one field's raw bytes.
///
/// `Some(value)` is a successful decode (including the blank-content
/// policies); a plain `None` marks a recoverable parse issue the caller
/// annotates on the record.
fn decode_field(
    field: &FieldDescriptor,
    bytes: &[u8],
    encoding: Option<&'static Encoding>,
) -> Option<FieldValue> {
    match field.kind {
        FieldKind::Character => Some(FieldValue::Character(utils::decode_text(
            utils::trim_field(bytes),
            encoding,
        ))),
        FieldKind::Memo => Some(FieldValue::Memo(ascii_trimmed(bytes))),
        FieldKind::Numeric => {
            let text = ascii_trimmed(bytes);
            if text.is_empty() {
                return Some(FieldValue::None);
            }
            if field.decimal_places > 0 {
                text.parse::<f64>().ok().map(FieldValue::Decimal)
            } else {
                text.parse::<i64>().ok().map(FieldValue::Integer)
            }
        }
        FieldKind::Float => {
            let text = ascii_trimmed(bytes);
            if text.is_empty() {
                return Some(FieldValue::None);
            }
            text.parse::<f64>().ok().map(FieldValue::Float)
        }
        FieldKind::Logical => match bytes.first().copied() {
            Some(b'T' | b't' | b'Y' | b'y') => Some(FieldValue::Logical(true)),
            Some(b'F' | b'f' | b'N' | b'n') => Some(FieldValue::Logical(false)),
            Some(b'?' | b' ' | 0) | None => Some(FieldValue::None),
            Some(_) => None,
        },
        FieldKind::Date => {
            let text = ascii_trimmed(bytes);
            if text.is_empty() {
                return Some(FieldValue::None);
            }
            parse_date(&text).map(FieldValue::Date)
        }
    }
}

/// Eight ASCII digits `YYYYMMDD` to a calendar date.
fn parse_date(text: &str) -> Option<chrono::NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = text[..4].parse().ok()?;
    let month: u32 = text[4..6].parse().ok()?;
    let day: u32 = text[6..8].parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, month, day)
}

/// ASCII view of numeric/date content, trimmed of padding on both sides.
fn ascii_trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == ' ' || c == '\0')
        .to_string()
}
