//! Operating system firmware table bindings
//!
//! This module is the only place that touches the OS firmware table query
//! surface. The two native calls are re-expressed as the narrow
//! [`FirmwareTableSource`] port so that the provider protocol and the ACPI
//! decoder can be exercised against canned byte sequences with no OS
//! dependency.
//!
//! The live binding is FFI code tested via integration, not unit tests.
//!
//! ## License
//!
//! Copyright (c) Microsoft Corporation.
//!
//! SPDX-License-Identifier: Apache-2.0
//!

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// Port over the OS firmware table query surface.
///
/// Each method performs exactly one native call. The OS convention is
/// "query twice": a call with an empty destination discovers the required
/// size, a second call with an allocated destination fills it. An empty
/// `buffer` is therefore the size probe.
///
/// `Ok(n)` is the native return value, the required or written byte count.
/// `Err(code)` carries the raw OS error code when the native call reports
/// failure. `Ok(0)` means the call succeeded with nothing to return, which
/// is how a recognized provider with zero tables is distinguished from a
/// failed call.
///
/// Implementations must be safe for concurrent invocation; the provider
/// performs no serialization of its own.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait FirmwareTableSource {
    /// One round of the table identifier enumeration call.
    fn enumerate(&self, provider: u32, buffer: &mut [u8]) -> Result<u32, u32>;

    /// One round of the single-table query call.
    fn get(&self, provider: u32, table_id: u32, buffer: &mut [u8]) -> Result<u32, u32>;
}

#[cfg(windows)]
mod ffi {
    // Firmware table access functions from sysinfoapi.h. Both return the
    // required or written byte count and report failure by returning zero
    // with the thread error code set.
    #[link(name = "kernel32")]
    extern "system" {
        pub fn EnumSystemFirmwareTables(
            firmware_table_provider_signature: u32,
            firmware_table_enum_buffer: *mut u8,
            buffer_size: u32,
        ) -> u32;

        pub fn GetSystemFirmwareTable(
            firmware_table_provider_signature: u32,
            firmware_table_id: u32,
            firmware_table_buffer: *mut u8,
            buffer_size: u32,
        ) -> u32;

        pub fn GetLastError() -> u32;
    }
}

/// Live OS implementation of [`FirmwareTableSource`].
///
/// Stateless; the underlying calls are thread-safe per the OS contract, so
/// one value may be shared freely across threads.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFirmwareTables;

#[cfg(windows)]
impl SystemFirmwareTables {
    fn destination(buffer: &mut [u8]) -> *mut u8 {
        // The size probe passes a null destination, matching the documented
        // calling convention.
        if buffer.is_empty() { core::ptr::null_mut() } else { buffer.as_mut_ptr() }
    }

    fn native_result(count: u32) -> Result<u32, u32> {
        if count != 0 {
            return Ok(count);
        }
        // SAFETY: GetLastError reads thread-local state and is always safe
        // to call.
        match unsafe { ffi::GetLastError() } {
            0 => Ok(0),
            code => Err(code),
        }
    }
}

#[cfg(windows)]
impl FirmwareTableSource for SystemFirmwareTables {
    fn enumerate(&self, provider: u32, buffer: &mut [u8]) -> Result<u32, u32> {
        let size = buffer.len() as u32;
        // SAFETY: the destination pointer is either null with a zero size or
        // points at `size` writable bytes.
        let count = unsafe { ffi::EnumSystemFirmwareTables(provider, Self::destination(buffer), size) };
        Self::native_result(count)
    }

    fn get(&self, provider: u32, table_id: u32, buffer: &mut [u8]) -> Result<u32, u32> {
        let size = buffer.len() as u32;
        // SAFETY: the destination pointer is either null with a zero size or
        // points at `size` writable bytes.
        let count = unsafe { ffi::GetSystemFirmwareTable(provider, table_id, Self::destination(buffer), size) };
        Self::native_result(count)
    }
}
