//! Error types for JournalTrace scans.
//!
//! Library-level errors use `thiserror`; the CLI wraps them with `anyhow` at
//! the top level. The variants mirror the failure modes callers handle
//! differently: a missing privilege aborts the whole run, while a missing
//! journal only skips one volume.

use thiserror::Error;

/// Result type alias using ScanError
pub type Result<T> = std::result::Result<T, ScanError>;

/// Failure modes of a journal scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A volume open was refused; the process is not elevated. Fatal to the run.
    #[error("Access Denied - Run as Administrator!")]
    NotElevated,

    /// The change journal is not active on this volume. The volume is skipped.
    #[error("USN Journal not active on this drive")]
    JournalInactive { drive: char },

    /// A volume could not be opened for a reason other than privileges.
    #[error("Could not open drive {drive}: Error {code}")]
    VolumeOpenFailed { drive: char, code: u32 },

    /// A device-control call failed outside the tolerated end-of-data path.
    #[error("{operation} failed (Error {code})")]
    ControlCall { operation: String, code: u32 },

    /// The scanning backend is unavailable on this platform.
    #[error("scan backend unavailable: {reason}")]
    Backend { reason: String },

    /// Configuration file parsing failed
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export failed
    #[error("export error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization to the UI sink failed
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    /// Returns true if this error must abort the whole run rather than a
    /// single volume.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::NotElevated)
    }
}
