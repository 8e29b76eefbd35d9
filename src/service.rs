//! Firmware table provider service
//!
//! This module defines the public service trait for firmware table access
//! and the provider that implements the OS's size-then-fill query protocol
//! over a [`FirmwareTableSource`] port.
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

use crate::{
    error::{FirmwareTableError, QueryOperation},
    os::FirmwareTableSource,
};

#[cfg(windows)]
use crate::os::SystemFirmwareTables;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// OS error code reported when a destination buffer is too small; surfaced
/// when a table outgrows its probed size between the two query rounds.
const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// Object-safe trait for firmware table access.
///
/// This trait defines the two firmware table operations so that callers can
/// hold a `dyn FirmwareTables`, enabling mocking and testing of the layers
/// above the provider.
///
/// Providers and identifiers are the resolved `u32` forms; converting
/// four-character codes is [`crate::signature`]'s job.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait FirmwareTables {
    /// Enumerates the table identifiers currently available under a
    /// provider.
    ///
    /// A recognized provider with no tables yields an empty vector, not an
    /// error. Identifiers are only meaningful within the queried provider,
    /// and only reflect system state at call time.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareTableError::OsQuery`] if either round of the OS
    /// call reports failure.
    fn enumerate_tables(&self, provider: u32) -> Result<Vec<u32>, FirmwareTableError>;

    /// Fetches the raw bytes of one table.
    ///
    /// The returned buffer is a snapshot owned by the caller; nothing is
    /// cached and nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`FirmwareTableError::OsQuery`] if either round of the OS
    /// call reports failure. A (provider, identifier) pair the OS does not
    /// recognize surfaces the same way, with the OS's own error code.
    fn get_table(&self, provider: u32, table_id: u32) -> Result<Vec<u8>, FirmwareTableError>;
}

/// Firmware table provider over a [`FirmwareTableSource`] port.
///
/// Implements the size-then-fill protocol the OS query surface requires:
/// one probe call with an empty destination to discover the required size,
/// one fill call into an allocated buffer of that size. There is a single
/// round of size discovery; if a table changes size between the two calls
/// the fill round fails rather than returning truncated data.
///
/// The provider holds no state beyond its port, so independent requests may
/// run concurrently without locking.
pub struct FirmwareTableProvider<S: FirmwareTableSource> {
    source: S,
}

impl<S: FirmwareTableSource> FirmwareTableProvider<S> {
    /// Creates a provider over the given port.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[cfg(windows)]
impl FirmwareTableProvider<SystemFirmwareTables> {
    /// Creates a provider over the live OS query surface.
    pub fn system() -> Self {
        Self::new(SystemFirmwareTables)
    }
}

impl<S: FirmwareTableSource> FirmwareTables for FirmwareTableProvider<S> {
    fn enumerate_tables(&self, provider: u32) -> Result<Vec<u32>, FirmwareTableError> {
        let size = self.source.enumerate(provider, &mut []).map_err(|error_code| {
            log::error!("Table enumeration size probe failed for provider {:#010x}: OS error {}", provider, error_code);
            FirmwareTableError::OsQuery { operation: QueryOperation::EnumerateSize, error_code }
        })?;

        if size == 0 {
            // Recognized provider, zero tables.
            log::debug!("Provider {:#010x} reports no tables", provider);
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; size as usize];
        let written = self.source.enumerate(provider, &mut buffer).map_err(|error_code| {
            log::error!("Table enumeration fill failed for provider {:#010x}: OS error {}", provider, error_code);
            FirmwareTableError::OsQuery { operation: QueryOperation::EnumerateFill, error_code }
        })?;

        if written as usize > buffer.len() {
            log::error!("Table list for provider {:#010x} grew past the probed {} bytes", provider, size);
            return Err(FirmwareTableError::OsQuery {
                operation: QueryOperation::EnumerateFill,
                error_code: ERROR_INSUFFICIENT_BUFFER,
            });
        }
        buffer.truncate(written as usize);

        let table_ids: Vec<u32> =
            buffer.chunks_exact(4).map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])).collect();
        log::trace!("Provider {:#010x} reports {} table identifier(s)", provider, table_ids.len());
        Ok(table_ids)
    }

    fn get_table(&self, provider: u32, table_id: u32) -> Result<Vec<u8>, FirmwareTableError> {
        let size = self.source.get(provider, table_id, &mut []).map_err(|error_code| {
            log::error!(
                "Table query size probe failed for provider {:#010x}, table {:#010x}: OS error {}",
                provider,
                table_id,
                error_code
            );
            FirmwareTableError::OsQuery { operation: QueryOperation::GetTableSize, error_code }
        })?;

        if size == 0 {
            // A table is never empty; a zero-size success leaves nothing to
            // return and is reported like any other failed query.
            log::error!("Table query size probe returned zero for provider {:#010x}, table {:#010x}", provider, table_id);
            return Err(FirmwareTableError::OsQuery { operation: QueryOperation::GetTableSize, error_code: 0 });
        }

        let mut buffer = vec![0u8; size as usize];
        let written = self.source.get(provider, table_id, &mut buffer).map_err(|error_code| {
            log::error!(
                "Table query fill failed for provider {:#010x}, table {:#010x}: OS error {}",
                provider,
                table_id,
                error_code
            );
            FirmwareTableError::OsQuery { operation: QueryOperation::GetTableFill, error_code }
        })?;

        if written as usize > buffer.len() {
            log::error!(
                "Table {:#010x} under provider {:#010x} grew past the probed {} bytes",
                table_id,
                provider,
                size
            );
            return Err(FirmwareTableError::OsQuery {
                operation: QueryOperation::GetTableFill,
                error_code: ERROR_INSUFFICIENT_BUFFER,
            });
        }
        buffer.truncate(written as usize);

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{os::MockFirmwareTableSource, signature};

    fn provider_over(source: MockFirmwareTableSource) -> FirmwareTableProvider<MockFirmwareTableSource> {
        FirmwareTableProvider::new(source)
    }

    #[test]
    fn test_enumerate_tables_decodes_little_endian_identifiers() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_enumerate().times(2).returning(|provider, buffer| {
            assert_eq!(provider, signature::ACPI);
            if buffer.is_empty() {
                return Ok(8);
            }
            buffer[..4].copy_from_slice(&[0x01, 0x00, 0x00, 0x00]);
            buffer[4..8].copy_from_slice(&[0xEF, 0xBE, 0xAD, 0xDE]);
            Ok(8)
        });

        let table_ids = provider_over(source).enumerate_tables(signature::ACPI).unwrap();
        assert_eq!(table_ids, vec![1, 0xDEAD_BEEF]);
    }

    #[test]
    fn test_enumerate_tables_with_zero_tables_is_empty_not_error() {
        let mut source = MockFirmwareTableSource::new();
        // One probe call, zero size, no fill round.
        source.expect_enumerate().times(1).returning(|_, buffer| {
            assert!(buffer.is_empty());
            Ok(0)
        });

        let table_ids = provider_over(source).enumerate_tables(signature::FIRM).unwrap();
        assert!(table_ids.is_empty());
    }

    #[test]
    fn test_enumerate_tables_size_probe_failure() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_enumerate().times(1).returning(|_, _| Err(87));

        let result = provider_over(source).enumerate_tables(0x1234_5678);
        assert_eq!(
            result,
            Err(FirmwareTableError::OsQuery { operation: QueryOperation::EnumerateSize, error_code: 87 })
        );
    }

    #[test]
    fn test_enumerate_tables_fill_failure() {
        let mut source = MockFirmwareTableSource::new();
        source
            .expect_enumerate()
            .times(2)
            .returning(|_, buffer| if buffer.is_empty() { Ok(8) } else { Err(6) });

        let result = provider_over(source).enumerate_tables(signature::RSMB);
        assert_eq!(
            result,
            Err(FirmwareTableError::OsQuery { operation: QueryOperation::EnumerateFill, error_code: 6 })
        );
    }

    #[test]
    fn test_get_table_returns_fetched_bytes() {
        let table: Vec<u8> = (0u8..40).collect();
        let expected = table.clone();

        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(2).returning(move |provider, table_id, buffer| {
            assert_eq!(provider, signature::ACPI);
            assert_eq!(table_id, 0x4D53_444D);
            if buffer.is_empty() {
                return Ok(table.len() as u32);
            }
            buffer.copy_from_slice(&table);
            Ok(table.len() as u32)
        });

        let bytes = provider_over(source).get_table(signature::ACPI, 0x4D53_444D).unwrap();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_get_table_missing_table_is_a_query_failure() {
        // The OS reports an unknown (provider, table) pair as a failed call;
        // there is no distinguished not-found outcome.
        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(1).returning(|_, _, _| Err(1));

        let result = provider_over(source).get_table(signature::ACPI, 0);
        assert_eq!(result, Err(FirmwareTableError::OsQuery { operation: QueryOperation::GetTableSize, error_code: 1 }));
    }

    #[test]
    fn test_get_table_zero_size_probe_is_a_query_failure() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(1).returning(|_, _, _| Ok(0));

        let result = provider_over(source).get_table(signature::ACPI, 0x5444_5344);
        assert_eq!(result, Err(FirmwareTableError::OsQuery { operation: QueryOperation::GetTableSize, error_code: 0 }));
    }

    #[test]
    fn test_get_table_fill_failure() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(2).returning(|_, _, buffer| if buffer.is_empty() { Ok(64) } else { Err(31) });

        let result = provider_over(source).get_table(signature::RSMB, 0);
        assert_eq!(result, Err(FirmwareTableError::OsQuery { operation: QueryOperation::GetTableFill, error_code: 31 }));
    }

    #[test]
    fn test_get_table_that_grows_between_rounds_fails_instead_of_truncating() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(2).returning(|_, _, buffer| if buffer.is_empty() { Ok(36) } else { Ok(64) });

        let result = provider_over(source).get_table(signature::ACPI, 0x5041_4346);
        assert_eq!(
            result,
            Err(FirmwareTableError::OsQuery { operation: QueryOperation::GetTableFill, error_code: 122 })
        );
    }

    #[test]
    fn test_get_table_that_shrinks_between_rounds_is_truncated_to_written() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_get().times(2).returning(|_, _, buffer| {
            if buffer.is_empty() {
                return Ok(40);
            }
            buffer[..36].copy_from_slice(&[0xAA; 36]);
            Ok(36)
        });

        let bytes = provider_over(source).get_table(signature::ACPI, 0x5041_4346).unwrap();
        assert_eq!(bytes.len(), 36);
        assert!(bytes.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_provider_is_usable_as_trait_object() {
        let mut source = MockFirmwareTableSource::new();
        source.expect_enumerate().times(1).returning(|_, _| Ok(0));

        let provider: Box<dyn FirmwareTables> = Box::new(provider_over(source));
        assert_eq!(provider.enumerate_tables(signature::ACPI).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_firmware_tables_trait_is_mockable() {
        // Callers above the provider hold a dyn FirmwareTables and can be
        // tested without any query protocol underneath.
        let mut tables = MockFirmwareTables::new();
        tables.expect_enumerate_tables().times(1).returning(|_| Ok(vec![0x5041_4346]));
        tables.expect_get_table().times(1).returning(|_, _| Ok(vec![0u8; 36]));

        let tables: Box<dyn FirmwareTables> = Box::new(tables);
        let ids = tables.enumerate_tables(signature::ACPI).unwrap();
        assert_eq!(ids, vec![0x5041_4346]);
        assert_eq!(tables.get_table(signature::ACPI, ids[0]).unwrap().len(), 36);
    }
}
