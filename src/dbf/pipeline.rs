//! Whole-file transformation pipeline.
//!
//! Orchestrates `parse header → carve payload → transform via the SX
//! cipher → retag the status byte`, optionally decoding records after a
//! decrypt. The caller's buffer is cloned up front and never mutated;
//! header-level failures abort before any output buffer exists.

use log::{debug, info};

use crate::dbf::codec::{codepage, crypto, key::SxKey};
use crate::dbf::format::{header, record};
use crate::dbf::types::error::Result;
use crate::dbf::types::models::{
    TransformMode, TransformOutcome, STATUS_ENCRYPTED, STATUS_PLAIN,
};

/// Transform a whole DBF file buffer.
///
/// # Behavior
/// - `Decrypt` on a table marked `0x06`: the payload is deciphered in the
///   output buffer and the status byte becomes `0x03`.
/// - `Decrypt` on a table already marked `0x03`: pass-through, no cipher
///   run; the status message mentions "already plain".
/// - `Decrypt` on any other status byte: pass-through, the byte is
///   preserved rather than interpreted.
/// - `Encrypt`: the payload is enciphered (whatever the current marking)
///   and the status byte becomes `0x06`.
///
/// `decode_records` only takes effect on decrypt runs whose output payload
/// is plain; encrypt runs never decode.
///
/// # Errors
/// Header-level errors ([`MalformedHeader`](crate::DbfError::MalformedHeader),
/// [`PayloadOutOfRange`](crate::DbfError::PayloadOutOfRange)) abort with no
/// output buffer.
pub fn transform(
    file_bytes: &[u8],
    key: &SxKey,
    mode: TransformMode,
    decode_records: bool,
) -> Result<TransformOutcome> {
    info!(
        "Transforming {} byte buffer ({:?})",
        file_bytes.len(),
        mode
    );

    let mut bytes = file_bytes.to_vec();
    let (mut dbf_header, fields) = header::parse(&bytes)?;
    let payload_range = header::payload_range(&bytes, &dbf_header)?;
    let payload_len = payload_range.len();

    let status = match mode {
        TransformMode::Encrypt => {
            crypto::encrypt_in_place(key, &mut bytes[payload_range]);
            dbf_header.status = STATUS_ENCRYPTED;
            header::set_status(&mut bytes, STATUS_ENCRYPTED);
            format!(
                "encrypted {} records ({} payload bytes)",
                dbf_header.record_count, payload_len
            )
        }
        TransformMode::Decrypt => match dbf_header.status {
            STATUS_ENCRYPTED => {
                crypto::decrypt_in_place(key, &mut bytes[payload_range]);
                dbf_header.status = STATUS_PLAIN;
                header::set_status(&mut bytes, STATUS_PLAIN);
                format!(
                    "decrypted {} records ({} payload bytes)",
                    dbf_header.record_count, payload_len
                )
            }
            STATUS_PLAIN => {
                debug!("Status byte already 0x03, skipping cipher");
                "already plain, payload untouched".to_string()
            }
            other => {
                debug!("Status byte {:#04x} is not SX-encrypted, passing through", other);
                format!("status byte {:#04x} is not SX-encrypted, payload untouched", other)
            }
        },
    };

    let records = if decode_records
        && mode == TransformMode::Decrypt
        && dbf_header.status == STATUS_PLAIN
    {
        let encoding = codepage::encoding_for_driver(dbf_header.language_driver);
        let payload = header::payload_slice(&bytes, &dbf_header)?;
        Some(record::decode_all(payload, &dbf_header, &fields, encoding)?)
    } else {
        None
    };

    info!("Transformation done: {}", status);
    Ok(TransformOutcome {
        bytes,
        header: dbf_header,
        fields,
        records,
        status,
    })
}
