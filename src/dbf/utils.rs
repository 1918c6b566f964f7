//! Low-level byte and text helpers shared across the codec.

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::Encoding;

/// Read a little-endian u16 at `offset`.
///
/// # Panics
/// Panics if the slice is shorter than `offset + 2`. Callers validate
/// buffer bounds before reaching for fixed header offsets.
pub fn read_u16_le(buffer: &[u8], offset: usize) -> u16 {
    LittleEndian::read_u16(&buffer[offset..offset + 2])
}

/// Read a little-endian u32 at `offset`.
pub fn read_u32_le(buffer: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&buffer[offset..offset + 4])
}

/// Write a little-endian u16 at `offset`.
pub fn write_u16_le(buffer: &mut [u8], offset: usize, value: u16) {
    LittleEndian::write_u16(&mut buffer[offset..offset + 2], value);
}

/// Write a little-endian u32 at `offset`.
pub fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) {
    LittleEndian::write_u32(&mut buffer[offset..offset + 4], value);
}

/// Decode field bytes to text.
///
/// Uses the resolved encoding when one is available; otherwise falls back
/// to a single-byte Latin-1 identity mapping so arbitrary bytes never fail
/// to decode. Both paths are deterministic.
pub fn decode_text(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    match encoding {
        Some(enc) => {
            let (text, _, _) = enc.decode(bytes);
            text.into_owned()
        }
        None => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Right-trim trailing spaces and NUL padding from raw field bytes.
pub fn trim_field(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}
