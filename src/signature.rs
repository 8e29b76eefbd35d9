//! Four-character provider and table codes
//!
//! Firmware table providers and many ACPI table identifiers are 32-bit
//! values whose byte representation is four ASCII characters. This module
//! converts between the packed integer form and the human-readable code,
//! and names the provider signatures the OS query surface serves.
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

use crate::error::FirmwareTableError;

/// ACPI firmware table provider ('ACPI')
pub const ACPI: u32 = 0x4143_5049;
/// Raw firmware table provider ('FIRM')
pub const FIRM: u32 = 0x4649_524D;
/// SMBIOS firmware table provider ('RSMB')
pub const RSMB: u32 = 0x5253_4D42;

/// Provider signatures the OS query surface is known to serve.
pub const KNOWN_PROVIDERS: [u32; 3] = [ACPI, FIRM, RSMB];

/// Packs a four-character ASCII code into its 32-bit form.
///
/// The first character lands in the most significant byte, so
/// `code_to_signature("ACPI")` is `0x4143_5049`.
///
/// # Errors
///
/// Returns [`FirmwareTableError::InvalidCode`] if the input is empty, not
/// exactly 4 bytes long, contains non-ASCII characters, or contains a NUL
/// byte.
pub fn code_to_signature(code: &str) -> Result<u32, FirmwareTableError> {
    let bytes = code.as_bytes();
    if bytes.len() != 4 || bytes.iter().any(|&b| !b.is_ascii() || b == 0) {
        return Err(FirmwareTableError::InvalidCode { code: String::from(code) });
    }
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Unpacks a 32-bit signature into its four-character code.
///
/// Never fails. Bytes outside the printable range are emitted as their raw
/// character value with no escaping; the result mirrors the table's own
/// encoding, not a sanitized display form.
pub fn signature_to_code(value: u32) -> String {
    ascii_string(&value.to_be_bytes())
}

/// Decodes bytes as raw characters, one per byte.
///
/// Non-printable bytes pass through as their raw character value; this is
/// the decoding used for every ASCII-ish field in a firmware table.
pub(crate) fn ascii_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
