//! # JournalTrace Windows NTFS Backend
//!
//! This crate provides the Windows-specific half of the scanner: the raw
//! volume handles and the `DeviceIoControl` dialogue behind
//! `journaltrace_core::scan::VolumeScanner`. It uses:
//!
//! - **FSCTL_ENUM_USN_DATA** to stream every in-use MFT record
//! - **FSCTL_QUERY_USN_JOURNAL** / **FSCTL_READ_USN_JOURNAL** for the live
//!   journal range
//!
//! ## Architecture
//!
//! All Windows API calls and unsafe code are isolated here:
//!
//! - `winapi_utils.rs`: handle RAII and low-level wrappers
//! - `handles.rs`: the per-scan volume handle registry
//! - `volume.rs`: NTFS volume discovery
//! - `mft.rs`: MFT enumeration into the path resolver
//! - `journal.rs`: journal metadata probe and record streaming
//! - `scanner.rs`: the `VolumeScanner` implementation
//!
//! ## Permissions
//!
//! Opening a volume for journal access requires elevation. A refused open
//! maps to the fatal not-elevated error; everything else is per-volume.

#[cfg(windows)]
mod handles;
#[cfg(windows)]
mod journal;
#[cfg(windows)]
mod mft;
#[cfg(windows)]
mod scanner;
#[cfg(windows)]
mod volume;
#[cfg(windows)]
mod winapi_utils;

#[cfg(windows)]
pub use scanner::NtfsScanner;

#[cfg(not(windows))]
mod stub;

#[cfg(not(windows))]
pub use stub::NtfsScanner;

/// Error types specific to the NTFS backend
pub mod error;
pub use error::NtfsError;
