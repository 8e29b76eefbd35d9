//! ACPI table decoding
//!
//! This module decodes a raw firmware table buffer fetched from the ACPI
//! provider into the fixed 36-byte description header plus an opaque
//! payload, validates the whole-table checksum, and provides offset-based
//! typed readers over the payload for ad-hoc field inspection.
//!
//! Decoding is a pure transform: no state is kept between calls and the
//! decoded view never changes after construction.
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

use zerocopy::FromBytes;
use zerocopy_derive::*;

use crate::{error::FirmwareTableError, signature::ascii_string};

/// Length of the fixed header common to ACPI description tables.
pub const ACPI_HEADER_LEN: usize = 36;

/// The fixed 36-byte header common to ACPI description tables.
/// Equivalent to EFI_ACPI_DESCRIPTION_HEADER.
///
/// Multi-byte fields are little-endian, the ACPI wire encoding.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct AcpiTableHeader {
    /// Table's own four-character identity, independent of how the provider
    /// encodes identifiers
    pub signature: [u8; 4],
    /// Declared total table length in bytes, header included
    pub length: u32,
    /// Format revision
    pub revision: u8,
    /// Byte chosen so the whole table sums to zero mod 256
    pub checksum: u8,
    /// Manufacturer identifier
    pub oem_id: [u8; 6],
    /// Manufacturer table identifier
    pub oem_table_id: [u8; 8],
    /// Manufacturer revision
    pub oem_revision: u32,
    /// Tool that created the table
    pub creator_id: [u8; 4],
    /// Creator tool revision
    pub creator_revision: u32,
}

/// Decoded, read-only view of one ACPI table.
///
/// Constructed from a raw buffer via [`AcpiTable::parse`]. The view owns a
/// private copy of the payload, so it stays valid after the buffer it was
/// built from is discarded. Checksum validity is computed once at
/// construction and is advisory; a failed checksum never blocks access to
/// the other fields.
pub struct AcpiTable {
    header: AcpiTableHeader,
    checksum_is_valid: bool,
    payload: Vec<u8>,
}

impl AcpiTable {
    /// Decodes a raw table buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareTableError::MalformedTable`] if `data` is shorter
    /// than the mandatory 36-byte header. Any longer buffer decodes; a bad
    /// checksum only clears [`AcpiTable::checksum_is_valid`].
    pub fn parse(data: &[u8]) -> Result<Self, FirmwareTableError> {
        let (header, payload) = AcpiTableHeader::read_from_prefix(data)
            .map_err(|_| FirmwareTableError::MalformedTable { length: data.len() })?;

        Ok(Self { header, checksum_is_valid: table_sum_is_zero(data), payload: payload.to_vec() })
    }

    /// The header's four-character signature, bytes passed through as raw
    /// character values.
    pub fn signature(&self) -> String {
        ascii_string(&self.header.signature)
    }

    /// Declared total table length in bytes.
    pub fn length(&self) -> u32 {
        self.header.length
    }

    /// Format revision.
    pub fn revision(&self) -> u8 {
        self.header.revision
    }

    /// The stored checksum byte.
    pub fn checksum(&self) -> u8 {
        self.header.checksum
    }

    /// Whether the unsigned byte sum of the original buffer is zero mod 256.
    pub fn checksum_is_valid(&self) -> bool {
        self.checksum_is_valid
    }

    /// Manufacturer identifier.
    pub fn oem_id(&self) -> String {
        ascii_string(&self.header.oem_id)
    }

    /// Manufacturer table identifier.
    pub fn oem_table_id(&self) -> String {
        ascii_string(&self.header.oem_table_id)
    }

    /// Manufacturer revision.
    pub fn oem_revision(&self) -> u32 {
        self.header.oem_revision
    }

    /// Tool that created the table.
    pub fn creator_id(&self) -> String {
        ascii_string(&self.header.creator_id)
    }

    /// Creator tool revision.
    pub fn creator_revision(&self) -> u32 {
        self.header.creator_revision
    }

    /// The table-specific data following the header, opaque to this layer.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Reads one payload byte. `index` 0 is byte 36 of the original buffer.
    pub fn payload_u8(&self, index: usize) -> Result<u8, FirmwareTableError> {
        self.payload_slice(index, 1).map(|bytes| bytes[0])
    }

    /// Reads a little-endian `u16` from the payload.
    pub fn payload_u16(&self, index: usize) -> Result<u16, FirmwareTableError> {
        self.payload_slice(index, 2).map(|bytes| u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian `u32` from the payload.
    pub fn payload_u32(&self, index: usize) -> Result<u32, FirmwareTableError> {
        self.payload_slice(index, 4).map(|bytes| u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a little-endian `u64` from the payload.
    pub fn payload_u64(&self, index: usize) -> Result<u64, FirmwareTableError> {
        self.payload_slice(index, 8).map(|bytes| {
            u64::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]])
        })
    }

    /// Reads `length` payload bytes as raw characters.
    pub fn payload_string(&self, index: usize, length: usize) -> Result<String, FirmwareTableError> {
        self.payload_slice(index, length).map(ascii_string)
    }

    fn payload_slice(&self, index: usize, width: usize) -> Result<&[u8], FirmwareTableError> {
        index
            .checked_add(width)
            .and_then(|end| self.payload.get(index..end))
            .ok_or(FirmwareTableError::OutOfRange { offset: index, width, payload_length: self.payload.len() })
    }
}

/// ACPI tables self-verify: the unsigned byte sum of the entire table,
/// wrapping at 8 bits, is zero for an intact table.
fn table_sum_is_zero(data: &[u8]) -> bool {
    data.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte)) == 0
}
