//! Stub implementation for non-Windows platforms.

use journaltrace_core::decode::PathMode;
use journaltrace_core::error::{Result, ScanError};
use journaltrace_core::resolver::PathResolver;
use journaltrace_core::scan::VolumeScanner;
use journaltrace_core::types::{ChangeEntry, DriveInfo, JournalHeader};
use std::sync::atomic::AtomicBool;

/// Stub NTFS scanner for non-Windows platforms.
///
/// This allows dependents to compile everywhere; every operation fails
/// with a clear error.
pub struct NtfsScanner;

impl NtfsScanner {
    pub fn new() -> Self {
        NtfsScanner
    }

    pub fn with_mode(_mode: PathMode) -> Self {
        NtfsScanner
    }
}

impl Default for NtfsScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported() -> ScanError {
    ScanError::Backend {
        reason: "NTFS scanning is only available on Windows".to_string(),
    }
}

impl VolumeScanner for NtfsScanner {
    fn available_drives(&mut self) -> Result<Vec<DriveInfo>> {
        Err(unsupported())
    }

    fn journal_header(&mut self, _drive: char) -> Result<JournalHeader> {
        Err(unsupported())
    }

    fn index_volume(
        &mut self,
        _drive: char,
        _header: &JournalHeader,
        _active: &AtomicBool,
    ) -> Result<PathResolver> {
        Err(unsupported())
    }

    fn read_journal(
        &mut self,
        _drive: char,
        _header: &JournalHeader,
        _resolver: &PathResolver,
        _active: &AtomicBool,
    ) -> Result<Vec<ChangeEntry>> {
        Err(unsupported())
    }
}
