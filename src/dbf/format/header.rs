//! DBF header and field-descriptor codec.
//!
//! Header layout (xBase level 3 / Harbour subset):
//!
//! ```text
//! offset  size  meaning
//!   0       1   status byte (0x03 plain, 0x06 SX-encrypted)
//!   1       3   last update (YY, MM, DD)
//!   4       4   record count (u32 LE)
//!   8       2   header length (u16 LE)
//!  10       2   record length (u16 LE)
//!  12      16   reserved / transaction / encryption flags
//!  28       1   MDX flag
//!  29       1   language driver
//!  30       2   reserved
//!  32    32*n   field descriptors
//!  32+32*n  1   0x0D terminator
//!  ...          record payload: record_count * record_length bytes
//!  last     1   optional 0x1A EOF marker
//! ```
//!
//! Reserved bytes are never modeled; parsing only reads the scalar fields
//! above, and serialization patches them back into the caller's buffer so
//! everything else is carried through verbatim.

use std::ops::Range;

use log::{debug, trace};

use crate::dbf::types::error::{DbfError, Result};
use crate::dbf::types::models::{DbfHeader, FieldDescriptor, FieldKind, LastUpdate};
use crate::dbf::utils;

/// Size of the fixed base header.
pub const BASE_HEADER_LEN: usize = 32;
/// Size of one field descriptor.
pub const FIELD_DESCRIPTOR_LEN: usize = 32;
/// Byte closing the field-descriptor array.
pub const HEADER_TERMINATOR: u8 = 0x0D;
/// Optional end-of-file marker after the payload.
pub const EOF_MARKER: u8 = 0x1A;

/// Parse the fixed header and field-descriptor array from a file buffer.
///
/// # Errors
/// Returns [`DbfError::MalformedHeader`] when the buffer is shorter than
/// the base header, the declared lengths are implausible, the descriptor
/// array does not terminate with `0x0D` inside the declared header, or the
/// descriptor widths are inconsistent with the record length.
pub fn parse(buffer: &[u8]) -> Result<(DbfHeader, Vec<FieldDescriptor>)> {
    if buffer.len() < BASE_HEADER_LEN {
        return Err(DbfError::MalformedHeader(format!(
            "buffer holds {} bytes, base header needs {}",
            buffer.len(),
            BASE_HEADER_LEN
        )));
    }

    let header = DbfHeader {
        status: buffer[0],
        last_update: LastUpdate::from_bytes([buffer[1], buffer[2], buffer[3]]),
        record_count: utils::read_u32_le(buffer, 4),
        header_len: utils::read_u16_le(buffer, 8),
        record_len: utils::read_u16_le(buffer, 10),
        language_driver: buffer[29],
    };
    trace!(
        "Header scalars: status={:#04x}, records={}, header_len={}, record_len={}, driver={:#04x}",
        header.status,
        header.record_count,
        header.header_len,
        header.record_len,
        header.language_driver
    );

    // At least the base header plus the terminator.
    if (header.header_len as usize) < BASE_HEADER_LEN + 1 {
        return Err(DbfError::MalformedHeader(format!(
            "declared header length {} is below the {}-byte minimum",
            header.header_len,
            BASE_HEADER_LEN + 1
        )));
    }
    if header.record_len == 0 {
        return Err(DbfError::MalformedHeader(
            "declared record length is zero".to_string(),
        ));
    }
    if buffer.len() < header.header_len as usize {
        return Err(DbfError::MalformedHeader(format!(
            "buffer holds {} bytes, declared header length is {}",
            buffer.len(),
            header.header_len
        )));
    }

    let fields = parse_descriptors(buffer, &header)?;

    // The deletion marker plus all field widths must tile a record exactly.
    let widths: usize = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();
    if widths != header.record_len as usize {
        return Err(DbfError::MalformedHeader(format!(
            "field widths sum to {} but record length is {}",
            widths, header.record_len
        )));
    }

    debug!(
        "Parsed header: {} fields, {} records of {} bytes",
        fields.len(),
        header.record_count,
        header.record_len
    );
    Ok((header, fields))
}

/// Walk the 32-byte descriptors until the terminator.
fn parse_descriptors(buffer: &[u8], header: &DbfHeader) -> Result<Vec<FieldDescriptor>> {
    let limit = header.header_len as usize;
    let mut fields = Vec::new();
    let mut pos = BASE_HEADER_LEN;
    let mut offset_in_record = 1usize; // first field follows the deletion marker

    loop {
        if pos >= limit {
            return Err(DbfError::MalformedHeader(format!(
                "descriptor array missing 0x0D terminator within {} header bytes",
                limit
            )));
        }
        if buffer[pos] == HEADER_TERMINATOR {
            break;
        }
        if pos + FIELD_DESCRIPTOR_LEN > limit {
            return Err(DbfError::MalformedHeader(format!(
                "field descriptor at offset {} overruns the declared header",
                pos
            )));
        }

        let raw = &buffer[pos..pos + FIELD_DESCRIPTOR_LEN];
        let descriptor = parse_descriptor(raw, offset_in_record);
        trace!(
            "Field '{}': kind={}, length={}, decimals={}, offset={}",
            descriptor.name,
            descriptor.kind,
            descriptor.length,
            descriptor.decimal_places,
            descriptor.offset_in_record
        );
        offset_in_record += descriptor.length as usize;
        fields.push(descriptor);
        pos += FIELD_DESCRIPTOR_LEN;
    }

    Ok(fields)
}

fn parse_descriptor(raw: &[u8], offset_in_record: usize) -> FieldDescriptor {
    // Name: bytes 0-10, NUL-terminated or padded.
    let name_bytes = &raw[..11];
    let name_end = name_bytes.iter().position(|&b| b == 0).unwrap_or(11);
    let name = String::from_utf8_lossy(&name_bytes[..name_end])
        .trim()
        .to_string();

    FieldDescriptor {
        name,
        kind: FieldKind::from_code(raw[11]),
        length: raw[16],
        decimal_places: raw[17],
        offset_in_record,
    }
}

/// The byte range holding all records.
///
/// # Errors
/// Returns [`DbfError::PayloadOutOfRange`] when the declared record region
/// extends past the buffer.
pub fn payload_range(buffer: &[u8], header: &DbfHeader) -> Result<Range<usize>> {
    let start = header.header_len as u64;
    let end = start + header.payload_len();
    if end > buffer.len() as u64 {
        return Err(DbfError::PayloadOutOfRange {
            needed: end,
            available: buffer.len() as u64,
        });
    }
    Ok(start as usize..end as usize)
}

/// Borrow the record payload out of a file buffer.
pub fn payload_slice<'a>(buffer: &'a [u8], header: &DbfHeader) -> Result<&'a [u8]> {
    let range = payload_range(buffer, header)?;
    Ok(&buffer[range])
}

/// Return a copy of `buffer` with the payload range overwritten.
///
/// Everything outside the payload range (header, reserved bytes, trailing
/// EOF marker) is carried through byte-exactly.
///
/// # Errors
/// Returns [`DbfError::ReplaceSizeMismatch`] when the replacement does not
/// match the payload range length.
pub fn replace_payload(buffer: &[u8], new_payload: &[u8], header: &DbfHeader) -> Result<Vec<u8>> {
    let range = payload_range(buffer, header)?;
    if new_payload.len() != range.len() {
        return Err(DbfError::ReplaceSizeMismatch {
            expected: range.len(),
            found: new_payload.len(),
        });
    }
    let mut out = buffer.to_vec();
    out[range].copy_from_slice(new_payload);
    Ok(out)
}

/// Write the status byte at offset 0.
///
/// The pipeline uses this to flip between plain (0x03) and SX-encrypted
/// (0x06); any other value is written verbatim.
pub fn set_status(buffer: &mut [u8], status: u8) {
    buffer[0] = status;
}

/// Patch the parsed scalar fields back into a header buffer.
///
/// Writes the status byte, last-update stamp, record count, and the two
/// length fields at their fixed offsets. Every other header byte, the
/// descriptors included, is left untouched.
pub fn patch(buffer: &mut [u8], header: &DbfHeader) -> Result<()> {
    if buffer.len() < BASE_HEADER_LEN {
        return Err(DbfError::MalformedHeader(format!(
            "buffer holds {} bytes, base header needs {}",
            buffer.len(),
            BASE_HEADER_LEN
        )));
    }
    buffer[0] = header.status;
    buffer[1..4].copy_from_slice(&header.last_update.to_bytes());
    utils::write_u32_le(buffer, 4, header.record_count);
    utils::write_u16_le(buffer, 8, header.header_len);
    utils::write_u16_le(buffer, 10, header.record_len);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbf::types::models::STATUS_PLAIN;

    /// Build a minimal table buffer: NAME C(4), QTY N(3), one record.
    pub(crate) fn sample_buffer() -> Vec<u8> {
        let field_count = 2;
        let header_len = BASE_HEADER_LEN + field_count * FIELD_DESCRIPTOR_LEN + 1;
        let record_len = 1 + 4 + 3;
        let mut buf = vec![0u8; header_len + record_len + 1];

        buf[0] = STATUS_PLAIN;
        buf[1] = 99; // 1999
        buf[2] = 12;
        buf[3] = 31;
        utils::write_u32_le(&mut buf, 4, 1);
        utils::write_u16_le(&mut buf, 8, header_len as u16);
        utils::write_u16_le(&mut buf, 10, record_len as u16);
        buf[29] = 0x03; // windows-1252

        let mut pos = BASE_HEADER_LEN;
        for (name, kind, len) in [("NAME", b'C', 4u8), ("QTY", b'N', 3u8)] {
            buf[pos..pos + name.len()].copy_from_slice(name.as_bytes());
            buf[pos + 11] = kind;
            buf[pos + 16] = len;
            pos += FIELD_DESCRIPTOR_LEN;
        }
        buf[pos] = HEADER_TERMINATOR;

        let payload = b" Ada  42";
        buf[header_len..header_len + record_len].copy_from_slice(payload);
        buf[header_len + record_len] = EOF_MARKER;
        buf
    }

    #[test]
    fn parses_sample_header() {
        let buf = sample_buffer();
        let (header, fields) = parse(&buf).unwrap();

        assert_eq!(header.status, STATUS_PLAIN);
        assert_eq!(header.record_count, 1);
        assert_eq!(header.record_len, 8);
        assert_eq!(header.last_update.year, 1999);
        assert_eq!(
            header.last_update.to_naive_date(),
            chrono::NaiveDate::from_ymd_opt(1999, 12, 31)
        );
        assert_eq!(header.language_driver, 0x03);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "NAME");
        assert_eq!(fields[0].kind, FieldKind::Character);
        assert_eq!(fields[0].offset_in_record, 1);
        assert_eq!(fields[1].name, "QTY");
        assert_eq!(fields[1].kind, FieldKind::Numeric);
        assert_eq!(fields[1].offset_in_record, 5);
    }

    #[test]
    fn last_update_year_convention() {
        assert_eq!(LastUpdate::from_bytes([99, 1, 2]).year, 1999);
        assert_eq!(LastUpdate::from_bytes([80, 1, 2]).year, 1980);
        assert_eq!(LastUpdate::from_bytes([23, 1, 2]).year, 2023);
        assert_eq!(LastUpdate::from_bytes([79, 1, 2]).year, 2079);
        // Encode reverses the offset.
        assert_eq!(LastUpdate::from_bytes([99, 1, 2]).to_bytes(), [99, 1, 2]);
        assert_eq!(LastUpdate::from_bytes([23, 1, 2]).to_bytes(), [23, 1, 2]);
    }

    #[test]
    fn rejects_short_buffer() {
        assert!(matches!(
            parse(&[0u8; 20]),
            Err(DbfError::MalformedHeader(_))
        ));
    }

    #[test]
    fn rejects_zero_record_length() {
        let mut buf = sample_buffer();
        utils::write_u16_le(&mut buf, 10, 0);
        assert!(matches!(parse(&buf), Err(DbfError::MalformedHeader(_))));
    }

    #[test]
    fn rejects_missing_terminator() {
        let mut buf = sample_buffer();
        let terminator_pos = BASE_HEADER_LEN + 2 * FIELD_DESCRIPTOR_LEN;
        buf[terminator_pos] = 0x00;
        assert!(matches!(parse(&buf), Err(DbfError::MalformedHeader(_))));
    }

    #[test]
    fn rejects_inconsistent_field_widths() {
        let mut buf = sample_buffer();
        buf[BASE_HEADER_LEN + 16] = 5; // NAME width 4 -> 5
        assert!(matches!(parse(&buf), Err(DbfError::MalformedHeader(_))));
    }

    #[test]
    fn payload_carving_and_replacement_round_trip() {
        let buf = sample_buffer();
        let (header, _) = parse(&buf).unwrap();

        let payload = payload_slice(&buf, &header).unwrap();
        assert_eq!(payload, b" Ada  42");

        let rebuilt = replace_payload(&buf, payload, &header).unwrap();
        assert_eq!(rebuilt, buf);
    }

    #[test]
    fn replacement_size_is_enforced() {
        let buf = sample_buffer();
        let (header, _) = parse(&buf).unwrap();
        assert!(matches!(
            replace_payload(&buf, b"short", &header),
            Err(DbfError::ReplaceSizeMismatch { expected: 8, found: 5 })
        ));
    }

    #[test]
    fn payload_past_buffer_is_rejected() {
        let buf = sample_buffer();
        let (header, _) = parse(&buf).unwrap();
        let truncated = &buf[..header.header_len as usize + 3];
        assert!(matches!(
            payload_slice(truncated, &header),
            Err(DbfError::PayloadOutOfRange { .. })
        ));
    }

    #[test]
    fn patch_writes_scalars_only() {
        let mut buf = sample_buffer();
        let (mut header, _) = parse(&buf).unwrap();
        header.status = 0x06;
        header.record_count = 7;

        let before = buf.clone();
        patch(&mut buf, &header).unwrap();

        assert_eq!(buf[0], 0x06);
        assert_eq!(utils::read_u32_le(&buf, 4), 7);
        // Reserved region and descriptors untouched.
        assert_eq!(&buf[12..], &before[12..]);
    }
}
