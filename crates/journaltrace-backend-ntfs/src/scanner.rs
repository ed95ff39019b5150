//! The `VolumeScanner` implementation for NTFS.

use crate::handles::HandleRegistry;
use crate::journal;
use crate::mft;
use crate::volume;
use journaltrace_core::decode::PathMode;
use journaltrace_core::error::Result;
use journaltrace_core::resolver::PathResolver;
use journaltrace_core::scan::VolumeScanner;
use journaltrace_core::types::{ChangeEntry, DriveInfo, JournalHeader};
use std::sync::atomic::AtomicBool;

/// NTFS volume scanner.
///
/// Owns the per-scan handle registry: handles open lazily per volume and
/// close when the scanner is dropped, on every exit path. One scanner
/// serves one scan session; build a fresh one per run.
pub struct NtfsScanner {
    handles: HandleRegistry,
    mode: PathMode,
}

impl NtfsScanner {
    /// Scanner for the primary pipeline (full path resolution).
    pub fn new() -> Self {
        Self::with_mode(PathMode::Accurate)
    }

    /// Scanner with an explicit path-assembly mode.
    pub fn with_mode(mode: PathMode) -> Self {
        NtfsScanner {
            handles: HandleRegistry::new(),
            mode,
        }
    }
}

impl Default for NtfsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeScanner for NtfsScanner {
    fn available_drives(&mut self) -> Result<Vec<DriveInfo>> {
        Ok(volume::available_drives())
    }

    fn journal_header(&mut self, drive: char) -> Result<JournalHeader> {
        let handle = self.handles.get(drive)?;
        Ok(journal::query_journal(handle, drive)?)
    }

    fn index_volume(
        &mut self,
        drive: char,
        header: &JournalHeader,
        active: &AtomicBool,
    ) -> Result<PathResolver> {
        let handle = self.handles.get(drive)?;
        Ok(mft::build_path_resolver(handle, drive, header, active))
    }

    fn read_journal(
        &mut self,
        drive: char,
        header: &JournalHeader,
        resolver: &PathResolver,
        active: &AtomicBool,
    ) -> Result<Vec<ChangeEntry>> {
        let mode = self.mode;
        let handle = self.handles.get(drive)?;
        Ok(journal::read_journal(
            handle, drive, header, resolver, mode, active,
        ))
    }
}
