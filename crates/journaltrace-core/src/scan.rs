//! The per-run scan pipeline.
//!
//! [`ScanSession`] owns one scan from discovery to delivery. The volume
//! I/O itself sits behind the [`VolumeScanner`] trait so the pipeline —
//! progress reporting, per-volume error policy, aggregation, cancellation,
//! and the sink protocol — is exercised the same way on every platform.
//!
//! ## Ordering guarantees
//!
//! Within one volume, entries are appended in the order the journal read
//! produced them (strictly increasing USN). Across volumes, the final
//! buffer respects discovery order.

use crate::error::Result;
use crate::resolver::PathResolver;
use crate::sink::{escape_message, UiSink};
use crate::types::{format_gb, ChangeEntry, DriveInfo, JournalHeader, ScanResult, VolumeSummary};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Per-volume operations a scan needs from its platform backend.
///
/// Implementations own the volume handles; dropping the scanner must
/// release them. The `active` flag is checked at the top of every
/// device-control iteration, so a cleared flag stops the in-progress call
/// loop and returns whatever was gathered.
pub trait VolumeScanner: Send {
    /// All fixed NTFS volumes eligible for scanning, in discovery order.
    fn available_drives(&mut self) -> Result<Vec<DriveInfo>>;

    /// Query the live journal header for one volume.
    fn journal_header(&mut self, drive: char) -> Result<JournalHeader>;

    /// Enumerate the volume's MFT into a resolved path cache.
    fn index_volume(
        &mut self,
        drive: char,
        header: &JournalHeader,
        active: &AtomicBool,
    ) -> Result<PathResolver>;

    /// Stream the live journal range, enriching each record as it arrives.
    fn read_journal(
        &mut self,
        drive: char,
        header: &JournalHeader,
        resolver: &PathResolver,
        active: &AtomicBool,
    ) -> Result<Vec<ChangeEntry>>;
}

impl<T: VolumeScanner + ?Sized> VolumeScanner for Box<T> {
    fn available_drives(&mut self) -> Result<Vec<DriveInfo>> {
        (**self).available_drives()
    }

    fn journal_header(&mut self, drive: char) -> Result<JournalHeader> {
        (**self).journal_header(drive)
    }

    fn index_volume(
        &mut self,
        drive: char,
        header: &JournalHeader,
        active: &AtomicBool,
    ) -> Result<PathResolver> {
        (**self).index_volume(drive, header, active)
    }

    fn read_journal(
        &mut self,
        drive: char,
        header: &JournalHeader,
        resolver: &PathResolver,
        active: &AtomicBool,
    ) -> Result<Vec<ChangeEntry>> {
        (**self).read_journal(drive, header, resolver, active)
    }
}

/// One scan run: scanner, cancellation flag, and the pipeline that drives
/// them. Dropping the session (normally or early) drops the scanner and
/// with it every volume handle.
pub struct ScanSession<S> {
    scanner: S,
    active: Arc<AtomicBool>,
    volume_filter: Vec<char>,
}

impl<S: VolumeScanner> ScanSession<S> {
    /// The flag is the single point of cancellation: the owner keeps a
    /// clone and clears it to stop the scan.
    pub fn new(scanner: S, active: Arc<AtomicBool>) -> Self {
        ScanSession {
            scanner,
            active,
            volume_filter: Vec::new(),
        }
    }

    /// Restrict the scan to the given drive letters (empty = all volumes).
    pub fn with_volume_filter(mut self, volumes: Vec<char>) -> Self {
        self.volume_filter = volumes;
        self
    }

    /// Run the scan to completion, delivering through `sink`.
    ///
    /// `scan_complete` fires on every path, and the flag is cleared before
    /// it does.
    pub fn run(mut self, sink: &dyn UiSink) -> ScanResult {
        let result = self.run_inner(sink);
        self.active.store(false, Ordering::Relaxed);
        sink.scan_complete();
        result
    }

    fn run_inner(&mut self, sink: &dyn UiSink) -> ScanResult {
        sink.clear_all_results();

        let mut drives = match self.scanner.available_drives() {
            Ok(drives) => drives,
            Err(err) => {
                sink.show_error(&escape_message(&format!("Scan failed: {err}")));
                return ScanResult::default();
            }
        };
        if !self.volume_filter.is_empty() {
            drives.retain(|drive| {
                self.volume_filter
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(&drive.letter))
            });
        }
        if drives.is_empty() {
            sink.show_error("No NTFS drives found!");
            return ScanResult::default();
        }

        let mut result = ScanResult::default();
        let mut unique_files = 0usize;
        let mut unique_dirs = 0usize;
        let total = drives.len();

        for (i, drive) in drives.iter().enumerate() {
            if !self.active.load(Ordering::Relaxed) {
                break;
            }
            let letter = drive.letter;

            let percent = (i * 40 / total + 10) as u8;
            sink.update_status(&format!("Indexing {letter}:..."), percent, 0, "Indexing...", "0/0");

            match self.scan_volume(letter, sink, i, total) {
                Ok((entries, summary)) => {
                    let files: HashSet<&str> = entries
                        .iter()
                        .filter(|e| !e.is_directory)
                        .map(|e| e.name.as_str())
                        .collect();
                    let dirs: HashSet<&str> = entries
                        .iter()
                        .filter(|e| e.is_directory)
                        .map(|e| e.name.as_str())
                        .collect();
                    unique_files += files.len();
                    unique_dirs += dirs.len();

                    info!(
                        drive = %letter,
                        entries = summary.entry_count,
                        journal_size = %summary.journal_size,
                        "Volume scan finished"
                    );
                    result.entries.extend(entries);
                    result.summaries.push(summary);
                }
                Err(err) if err.is_fatal() => {
                    sink.show_error(&escape_message(&err.to_string()));
                    break;
                }
                Err(err) => {
                    warn!(drive = %letter, error = %err, "Skipping volume");
                    sink.show_error(&format!("Drive {letter}: {}", escape_message(&err.to_string())));
                }
            }
        }

        self.deliver(sink, &result, total, unique_files, unique_dirs);
        result
    }

    fn scan_volume(
        &mut self,
        letter: char,
        sink: &dyn UiSink,
        index: usize,
        total: usize,
    ) -> Result<(Vec<ChangeEntry>, VolumeSummary)> {
        let header = self.scanner.journal_header(letter)?;
        let resolver = self.scanner.index_volume(letter, &header, &self.active)?;

        let percent = ((2 * index + 1) * 20 / total + 50) as u8;
        sink.update_status(&format!("Reading {letter}:..."), percent, 0, "Reading...", "0/0");

        let entries = self
            .scanner
            .read_journal(letter, &header, &resolver, &self.active)?;

        let summary = VolumeSummary {
            drive: letter,
            first_usn: header.first_usn,
            next_usn: header.next_usn,
            max_usn: header.max_usn,
            journal_size: format_gb(header.max_size),
            entry_count: entries.len(),
        };
        Ok((entries, summary))
    }

    fn deliver(
        &self,
        sink: &dyn UiSink,
        result: &ScanResult,
        drive_count: usize,
        unique_files: usize,
        unique_dirs: usize,
    ) {
        if result.entries.is_empty() {
            sink.update_status("No entries found", 100, 0, "N/A", "0/0");
            return;
        }

        let count = result.entries.len();
        let tally = format!("{unique_files}/{unique_dirs}");
        sink.update_status(
            &format!("Loading {count} entries..."),
            90,
            count,
            "Processing...",
            &tally,
        );

        match serde_json::to_string(&result.entries) {
            Ok(json) => sink.load_all_entries(&json),
            Err(err) => {
                sink.show_error(&escape_message(&format!("Scan failed: {err}")));
                return;
            }
        }

        let oldest = result
            .entries
            .iter()
            .filter_map(|e| e.timestamp)
            .min()
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        sink.update_status(
            &format!("Complete - {count} entries from {drive_count} drives"),
            100,
            count,
            &oldest,
            &tally,
        );
    }
}
