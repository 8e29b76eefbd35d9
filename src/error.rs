//! Error types for firmware table operations
//!
//! This module defines the error types returned by the firmware table
//! provider and the ACPI table decoder.
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

use core::fmt;

use crate::acpi_table::ACPI_HEADER_LEN;

/// Identifies which OS firmware table call failed, and at which step of the
/// size-then-fill protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation {
    /// Size probe of the table identifier enumeration call
    EnumerateSize,
    /// Fill round of the table identifier enumeration call
    EnumerateFill,
    /// Size probe of the single-table query call
    GetTableSize,
    /// Fill round of the single-table query call
    GetTableFill,
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryOperation::EnumerateSize => "table enumeration size probe",
            QueryOperation::EnumerateFill => "table enumeration fill",
            QueryOperation::GetTableSize => "table query size probe",
            QueryOperation::GetTableFill => "table query fill",
        };
        f.write_str(name)
    }
}

/// Firmware table operation errors
///
/// This enum represents all errors that can occur while converting
/// four-character codes, querying the OS firmware table surface, and
/// decoding ACPI tables. A table with a bad checksum is NOT an error; it is
/// reported through [`AcpiTable::checksum_is_valid`](crate::AcpiTable::checksum_is_valid)
/// on the success path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareTableError {
    /// A four-character code conversion was given input that is not exactly
    /// 4 ASCII characters
    InvalidCode {
        /// The rejected input
        code: String,
    },
    /// The underlying OS firmware table query reported failure
    OsQuery {
        /// Which call failed, and at which step
        operation: QueryOperation,
        /// Raw OS error code for diagnostics
        error_code: u32,
    },
    /// A buffer presented for ACPI parsing is shorter than the mandatory
    /// 36-byte header
    MalformedTable {
        /// Actual buffer length
        length: usize,
    },
    /// A payload read's offset plus width exceeds the payload's length
    OutOfRange {
        /// Requested offset, relative to payload start
        offset: usize,
        /// Requested read width in bytes
        width: usize,
        /// Actual payload length
        payload_length: usize,
    },
}

impl fmt::Display for FirmwareTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FirmwareTableError::InvalidCode { code } => {
                write!(f, "'{}' is not a four-character ASCII code", code)
            }
            FirmwareTableError::OsQuery { operation, error_code } => {
                write!(f, "{} failed with OS error {}", operation, error_code)
            }
            FirmwareTableError::MalformedTable { length } => {
                write!(f, "{}-byte buffer is shorter than the {}-byte ACPI header", length, ACPI_HEADER_LEN)
            }
            FirmwareTableError::OutOfRange { offset, width, payload_length } => {
                write!(
                    f,
                    "{}-byte read at payload offset {} exceeds the {}-byte payload",
                    width, offset, payload_length
                )
            }
        }
    }
}

impl std::error::Error for FirmwareTableError {}
