//! Core data types for JournalTrace.
//!
//! The shapes here are the public contract between the engine, the UI sink
//! and the CSV export: serialized field names follow the sink's JSON
//! conventions (camelCase), and the raw 64-bit file references are carried
//! unmasked so downstream correlation keeps the reuse sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask selecting the MFT record index out of a 64-bit file reference.
///
/// The high 16 bits are a reuse sequence; only the low 48 bits identify the
/// record. Path resolution keys on the masked index.
pub const FILE_INDEX_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// MFT record index of the volume root directory.
pub const ROOT_FILE_INDEX: u64 = 5;

/// Extract the 48-bit record index from a raw file reference.
pub fn file_index(reference: u64) -> u64 {
    reference & FILE_INDEX_MASK
}

/// Which half of a rename pair a journal record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenameType {
    Old,
    New,
    None,
}

impl fmt::Display for RenameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameType::Old => write!(f, "old"),
            RenameType::New => write!(f, "new"),
            RenameType::None => write!(f, "none"),
        }
    }
}

/// One enriched change-journal record.
///
/// Field order matches the JSON contract consumed by the UI sink.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    /// Monotonic-per-journal cursor of this record
    pub usn: i64,

    /// Trailing path component from the record
    pub name: String,

    /// Full path via the volume's path cache, or the drive root fallback
    pub path: String,

    /// Record time, or None when the on-disk filetime was zero or invalid
    #[serde(serialize_with = "crate::filetime::serialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    /// `" | "`-joined names of the set reason bits
    pub reason: String,

    /// `", "`-joined names of the set attribute bits; empty in fast mode
    pub attributes: String,

    pub is_directory: bool,

    /// Raw 64-bit reference, reuse sequence included
    pub file_reference: u64,

    /// Raw 64-bit parent reference, reuse sequence included
    pub parent_file_reference: u64,

    /// Equals `name`; placeholder for downstream rename pairing
    pub original_name: String,

    pub is_rename: bool,

    pub rename_type: RenameType,
}

/// Parsed `USN_JOURNAL_DATA_V0` header: the journal's current incarnation.
///
/// `journal_id` must accompany every journal read against the same volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalHeader {
    pub journal_id: u64,
    pub first_usn: i64,
    pub next_usn: i64,
    pub lowest_valid_usn: i64,
    pub max_usn: i64,
    pub max_size: u64,
    pub allocation_delta: u64,
}

/// Per-volume scan summary captured from the initial journal header.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary {
    pub drive: char,
    pub first_usn: i64,
    pub next_usn: i64,
    pub max_usn: i64,
    pub journal_size: String,
    pub entry_count: usize,
}

/// A discovered NTFS volume, in the shape the UI's drive picker expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveInfo {
    pub letter: char,
    pub name: String,
    pub label: String,
    pub format: String,
    pub root: String,
    pub total_free: String,
    pub total_size: String,
    #[serde(rename = "type")]
    pub drive_type: String,
    pub is_ready: bool,
}

impl DriveInfo {
    /// Build the record for a fixed NTFS volume.
    pub fn ntfs_fixed(letter: char, label: String, total_bytes: u64, free_bytes: u64) -> Self {
        let root = format!("{letter}:\\");
        DriveInfo {
            letter,
            name: root.clone(),
            label,
            format: "NTFS".to_string(),
            root,
            total_free: format_gb(free_bytes),
            total_size: format_gb(total_bytes),
            drive_type: "Fixed".to_string(),
            is_ready: true,
        }
    }
}

/// Format a byte count the way the drive picker displays capacities.
pub fn format_gb(bytes: u64) -> String {
    format!("{:.1}GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// The flat, insertion-ordered output of one scan run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub entries: Vec<ChangeEntry>,
    pub summaries: Vec<VolumeSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_index_masking() {
        assert_eq!(file_index(0x0001_0000_0000_002A), 0x2A);
        assert_eq!(file_index(0xFFFF_0000_0000_0005), 5);
        assert_eq!(file_index(42), 42);
    }

    #[test]
    fn test_rename_type_display() {
        assert_eq!(RenameType::Old.to_string(), "old");
        assert_eq!(RenameType::New.to_string(), "new");
        assert_eq!(RenameType::None.to_string(), "none");
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(0), "0.0GB");
        assert_eq!(format_gb(1024 * 1024 * 1024), "1.0GB");
        assert_eq!(format_gb(16 * 1024 * 1024 * 1024 + 512 * 1024 * 1024), "16.5GB");
    }

    #[test]
    fn test_change_entry_json_field_names() {
        let entry = ChangeEntry {
            usn: 100,
            name: "a.txt".to_string(),
            path: "C:\\dir\\a.txt".to_string(),
            timestamp: None,
            reason: "FILE_CREATE".to_string(),
            attributes: "NORMAL".to_string(),
            is_directory: false,
            file_reference: 0x0001_0000_0000_00C8,
            parent_file_reference: 0x64,
            original_name: "a.txt".to_string(),
            is_rename: false,
            rename_type: RenameType::None,
        };

        let value = serde_json::to_value(&entry).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "attributes",
                "fileReference",
                "isDirectory",
                "isRename",
                "name",
                "originalName",
                "parentFileReference",
                "path",
                "reason",
                "renameType",
                "timestamp",
                "usn",
            ]
        );
        assert_eq!(object["renameType"], "none");
        assert!(object["timestamp"].is_null());
        // Unmasked 64-bit reference survives serialization
        assert_eq!(object["fileReference"].as_u64(), Some(0x0001_0000_0000_00C8));
    }

    #[test]
    fn test_drive_info_json_shape() {
        let info = DriveInfo::ntfs_fixed('C', "System".to_string(), 0, 0);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["letter"], "C");
        assert_eq!(value["format"], "NTFS");
        assert_eq!(value["type"], "Fixed");
        assert_eq!(value["isReady"], true);
        assert_eq!(value["root"], "C:\\");
        assert_eq!(value["totalFree"], "0.0GB");
    }

    #[test]
    fn test_volume_summary_json_shape() {
        let summary = VolumeSummary {
            drive: 'D',
            first_usn: 1,
            next_usn: 2,
            max_usn: 3,
            journal_size: "0.5GB".to_string(),
            entry_count: 7,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["drive"], "D");
        assert_eq!(value["firstUsn"], 1);
        assert_eq!(value["journalSize"], "0.5GB");
        assert_eq!(value["entryCount"], 7);
    }
}
