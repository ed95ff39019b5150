//! The control API exposed to a UI host.
//!
//! [`ScanController`] is the long-lived object behind the host's buttons:
//! it starts a scan on a dedicated worker thread, stops it cooperatively,
//! and owns the result buffer between runs. A fresh scanner is built for
//! every run so volume handles never outlive the scan that opened them.

use crate::error::Result;
use crate::export;
use crate::scan::{ScanSession, VolumeScanner};
use crate::sink::UiSink;
use crate::types::{ChangeEntry, DriveInfo, ScanResult, VolumeSummary};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::error;

type ScannerFactory = dyn Fn() -> Box<dyn VolumeScanner> + Send + Sync;

/// Scan lifecycle and result-buffer owner.
pub struct ScanController {
    factory: Arc<ScannerFactory>,
    active: Arc<AtomicBool>,
    results: Arc<Mutex<ScanResult>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    volume_filter: Vec<char>,
}

impl ScanController {
    /// `factory` builds one scanner per run; it is called on the worker
    /// thread so handle acquisition happens off the caller's thread.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn VolumeScanner> + Send + Sync + 'static,
    {
        ScanController {
            factory: Arc::new(factory),
            active: Arc::new(AtomicBool::new(false)),
            results: Arc::new(Mutex::new(ScanResult::default())),
            worker: Mutex::new(None),
            volume_filter: Vec::new(),
        }
    }

    /// Restrict scans to the given drive letters (empty = all volumes).
    pub fn with_volume_filter(mut self, volumes: Vec<char>) -> Self {
        self.volume_filter = volumes;
        self
    }

    /// Enumerate scannable volumes without starting a scan.
    pub fn available_drives(&self) -> Result<Vec<DriveInfo>> {
        let mut scanner = (self.factory)();
        scanner.available_drives()
    }

    /// Whether a scan is currently in flight.
    pub fn is_scanning(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Start a scan delivering through `sink`. Returns false when a scan is
    /// already in flight.
    pub fn start_scan(&self, sink: Arc<dyn UiSink>) -> bool {
        if self
            .active
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }
        // The previous worker has observed the cleared flag; join it before
        // reusing the slot.
        self.reap_worker();

        let factory = Arc::clone(&self.factory);
        let active = Arc::clone(&self.active);
        let results = Arc::clone(&self.results);
        let volume_filter = self.volume_filter.clone();

        let spawned = std::thread::Builder::new()
            .name("journal-scan".to_string())
            .spawn(move || {
                let session = ScanSession::new(factory(), active).with_volume_filter(volume_filter);
                let outcome = session.run(sink.as_ref());
                *results.lock() = outcome;
            });

        match spawned {
            Ok(handle) => {
                *self.worker.lock() = Some(handle);
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to spawn scan worker");
                self.active.store(false, Ordering::Relaxed);
                false
            }
        }
    }

    /// Request cooperative cancellation of the in-flight scan.
    pub fn stop_scan(&self) -> bool {
        self.active.store(false, Ordering::Relaxed);
        true
    }

    /// Block until the worker (if any) has finished and its results are
    /// stored. `scan_complete` on the sink fires slightly before the buffer
    /// is published; call this before reading results after that signal.
    pub fn wait(&self) {
        self.reap_worker();
    }

    fn reap_worker(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    /// Snapshot of the last run's entries.
    pub fn results(&self) -> Vec<ChangeEntry> {
        self.results.lock().entries.clone()
    }

    /// Snapshot of the last run's per-volume summaries.
    pub fn summaries(&self) -> Vec<VolumeSummary> {
        self.results.lock().summaries.clone()
    }

    /// Discard the result buffer.
    pub fn clear_results(&self) -> bool {
        *self.results.lock() = ScanResult::default();
        true
    }

    /// Export the result buffer as CSV. With no path given, writes
    /// `journal_trace_<stamp>.csv` in the working directory.
    pub fn export_results(&self, path: Option<&Path>) -> Result<PathBuf> {
        let results = self.results.lock();
        export::write_csv(&results.entries, path)
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
        if let Some(handle) = self.worker.get_mut().take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PathResolver;
    use crate::sink::{RecordingSink, SinkEvent};
    use crate::types::{JournalHeader, RenameType};

    fn header() -> JournalHeader {
        JournalHeader {
            journal_id: 1,
            first_usn: 0,
            next_usn: 10,
            lowest_valid_usn: 0,
            max_usn: i64::MAX,
            max_size: 0,
            allocation_delta: 0,
        }
    }

    fn entry(usn: i64) -> ChangeEntry {
        ChangeEntry {
            usn,
            name: "f".to_string(),
            path: "C:\\f".to_string(),
            timestamp: None,
            reason: "FILE_CREATE".to_string(),
            attributes: "NORMAL".to_string(),
            is_directory: false,
            file_reference: 1,
            parent_file_reference: 5,
            original_name: "f".to_string(),
            is_rename: false,
            rename_type: RenameType::None,
        }
    }

    /// Scanner that optionally parks inside the volume loop until released.
    struct GatedScanner {
        gate: Option<crossbeam_channel::Receiver<()>>,
    }

    impl VolumeScanner for GatedScanner {
        fn available_drives(&mut self) -> Result<Vec<DriveInfo>> {
            Ok(vec![DriveInfo::ntfs_fixed('C', "Test".to_string(), 0, 0)])
        }

        fn journal_header(&mut self, _drive: char) -> Result<JournalHeader> {
            if let Some(gate) = &self.gate {
                let _ = gate.recv();
            }
            Ok(header())
        }

        fn index_volume(
            &mut self,
            drive: char,
            _header: &JournalHeader,
            _active: &std::sync::atomic::AtomicBool,
        ) -> Result<PathResolver> {
            Ok(PathResolver::new(drive))
        }

        fn read_journal(
            &mut self,
            _drive: char,
            _header: &JournalHeader,
            _resolver: &PathResolver,
            _active: &std::sync::atomic::AtomicBool,
        ) -> Result<Vec<ChangeEntry>> {
            Ok(vec![entry(1), entry(2)])
        }
    }

    #[test]
    fn test_scan_lifecycle() {
        let controller = ScanController::new(|| Box::new(GatedScanner { gate: None }));
        let sink = Arc::new(RecordingSink::new());

        assert!(controller.start_scan(sink.clone()));
        controller.wait();

        assert!(!controller.is_scanning());
        assert_eq!(controller.results().len(), 2);
        assert_eq!(controller.summaries().len(), 1);
        let events = sink.events();
        assert_eq!(*events.last().unwrap(), SinkEvent::ScanComplete);

        assert!(controller.clear_results());
        assert!(controller.results().is_empty());
    }

    #[test]
    fn test_second_start_is_refused_while_running() {
        let (release, gate) = crossbeam_channel::bounded(1);
        let controller = ScanController::new(move || {
            Box::new(GatedScanner {
                gate: Some(gate.clone()),
            })
        });

        assert!(controller.start_scan(Arc::new(RecordingSink::new())));
        assert!(!controller.start_scan(Arc::new(RecordingSink::new())));

        release.send(()).unwrap();
        controller.wait();
        assert!(!controller.is_scanning());
    }

    #[test]
    fn test_stop_scan_cancels_cooperatively() {
        let (release, gate) = crossbeam_channel::bounded(1);
        let controller = ScanController::new(move || {
            Box::new(GatedScanner {
                gate: Some(gate.clone()),
            })
        });
        let sink = Arc::new(RecordingSink::new());

        assert!(controller.start_scan(sink.clone()));
        assert!(controller.stop_scan());
        release.send(()).unwrap();
        controller.wait();

        // The run still completed its protocol
        let events = sink.events();
        assert_eq!(*events.last().unwrap(), SinkEvent::ScanComplete);
    }

    #[test]
    fn test_available_drives_without_scan() {
        let controller = ScanController::new(|| Box::new(GatedScanner { gate: None }));
        let drives = controller.available_drives().unwrap();
        assert_eq!(drives.len(), 1);
        assert_eq!(drives[0].letter, 'C');
        assert!(!controller.is_scanning());
    }

    #[test]
    fn test_export_results_writes_csv() {
        let controller = ScanController::new(|| Box::new(GatedScanner { gate: None }));
        assert!(controller.start_scan(Arc::new(RecordingSink::new())));
        controller.wait();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let written = controller.export_results(Some(&target)).unwrap();
        assert_eq!(written, target);

        let contents = std::fs::read_to_string(&target).unwrap();
        assert!(contents.starts_with("USN,Name,Path,Timestamp,Reason"));
        assert_eq!(contents.lines().count(), 3);
    }
}
