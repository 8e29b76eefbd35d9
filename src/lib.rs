//! Firmware Table Access
//!
//! Enumerates and fetches the platform firmware description tables (ACPI,
//! SMBIOS, raw firmware) that the operating system exposes through its
//! firmware table query surface, and decodes ACPI tables into a validated,
//! structured view.
//!
//! The crate has two layers:
//!
//! - [`FirmwareTableProvider`] talks to the OS query surface. Given a 4-byte
//!   provider signature it enumerates the table identifiers available under
//!   that provider and fetches the raw bytes of one table. The OS binding is
//!   isolated behind the [`FirmwareTableSource`] port so that everything
//!   above it can be exercised against canned byte sequences.
//! - [`AcpiTable`] parses a raw buffer fetched from the `ACPI` provider into
//!   the fixed 36-byte description header plus an opaque payload, validates
//!   the whole-table checksum, and exposes offset-based typed readers over
//!   the payload.
//!
//! Presentation concerns (argument parsing, hex dumps, saving tables to
//! disk) live outside this crate and consume the raw bytes and decoded
//! fields it returns.
//!
//! ## Examples
//!
//! ```ignore
//! use firmware_tables::{AcpiTable, FirmwareTableProvider, FirmwareTables, signature};
//!
//! let provider = FirmwareTableProvider::system();
//! for table_id in provider.enumerate_tables(signature::ACPI)? {
//!     let bytes = provider.get_table(signature::ACPI, table_id)?;
//!     let table = AcpiTable::parse(&bytes)?;
//!     log::info!(
//!         "{} rev {} ({} payload bytes, checksum ok: {})",
//!         table.signature(),
//!         table.revision(),
//!         table.payload().len(),
//!         table.checksum_is_valid()
//!     );
//! }
//! ```
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

pub mod acpi_table;
pub mod error;
pub mod os;
pub mod service;
pub mod signature;

pub use acpi_table::{ACPI_HEADER_LEN, AcpiTable, AcpiTableHeader};
pub use error::{FirmwareTableError, QueryOperation};
pub use os::FirmwareTableSource;
#[cfg(windows)]
pub use os::SystemFirmwareTables;
pub use service::{FirmwareTableProvider, FirmwareTables};
