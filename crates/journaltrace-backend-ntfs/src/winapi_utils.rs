//! Low-level Windows API utilities.
//!
//! This module contains helper functions for working with Windows APIs.
//! All handle acquisition for the backend goes through here.

use crate::error::NtfsError;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, GetLastError, HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_GENERIC_READ, FILE_SHARE_DELETE, FILE_SHARE_READ,
    FILE_SHARE_WRITE, OPEN_EXISTING,
};

// Win32 error codes the control dialogue distinguishes.
pub const ERROR_ACCESS_DENIED: u32 = 5;
pub const ERROR_HANDLE_EOF: u32 = 38;
pub const ERROR_JOURNAL_DELETE_IN_PROGRESS: u32 = 1178;
pub const ERROR_JOURNAL_NOT_ACTIVE: u32 = 1179;

/// RAII wrapper for a Windows HANDLE.
///
/// Automatically closes the handle when dropped.
pub struct SafeHandle(HANDLE);

// Volume handles are not tied to the thread that opened them.
unsafe impl Send for SafeHandle {}

impl SafeHandle {
    /// Get the raw handle value.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }

    fn is_valid(&self) -> bool {
        self.0 != INVALID_HANDLE_VALUE && self.0 .0 != ptr::null_mut()
    }
}

impl Drop for SafeHandle {
    fn drop(&mut self) {
        if self.is_valid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Convert a Rust string to a null-terminated wide string (UTF-16).
pub fn to_wide_string(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// The raw device path for a drive letter, e.g. `\\.\C:`.
pub fn device_path(letter: char) -> String {
    format!("\\\\.\\{}:", letter.to_ascii_uppercase())
}

/// Open a volume as a raw device, read-only and sharing everything.
///
/// Journal control calls need nothing more than read access; sharing
/// everything keeps the scan from interfering with live filesystem use.
pub fn open_volume(letter: char) -> Result<SafeHandle, NtfsError> {
    let wide_path = to_wide_string(&device_path(letter));

    // SAFETY: A well-formed call into a documented API; the returned handle
    // is wrapped in SafeHandle for cleanup.
    let handle = unsafe {
        CreateFileW(
            PCWSTR(wide_path.as_ptr()),
            FILE_GENERIC_READ.0,
            FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            None,
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL,
            None,
        )
    };

    match handle {
        Ok(h) if h != INVALID_HANDLE_VALUE && !h.0.is_null() => Ok(SafeHandle(h)),
        _ => {
            let code = unsafe { GetLastError().0 };
            if code == ERROR_ACCESS_DENIED {
                Err(NtfsError::AccessDenied { drive: letter })
            } else {
                Err(NtfsError::VolumeOpen {
                    drive: letter,
                    code,
                })
            }
        }
    }
}
