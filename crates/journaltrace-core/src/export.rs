//! CSV projection of the result buffer.
//!
//! The export is a pure projection: one row per entry, columns fixed by the
//! downstream tooling that consumes these traces. The `Details` column is
//! reserved and always empty.

use crate::error::Result;
use crate::filetime::format_timestamp;
use crate::types::ChangeEntry;
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Column header row, in emission order.
pub const CSV_COLUMNS: [&str; 13] = [
    "USN",
    "Name",
    "Path",
    "Timestamp",
    "Reason",
    "IsDirectory",
    "Attributes",
    "OriginalName",
    "IsRename",
    "RenameType",
    "FileReference",
    "ParentFileReference",
    "Details",
];

/// Default export filename, stamped with the local time.
pub fn default_filename() -> String {
    format!("journal_trace_{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Write `entries` to `path`, or to a default-named file in the working
/// directory. Returns the path written.
pub fn write_csv(entries: &[ChangeEntry], path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_filename()),
    };

    let mut writer = csv::Writer::from_path(&path)?;
    write_entries(&mut writer, entries)?;
    writer.flush()?;

    info!(path = %path.display(), rows = entries.len(), "Exported CSV");
    Ok(path)
}

/// Write the header row and one row per entry to an open writer.
pub fn write_entries<W: Write>(writer: &mut csv::Writer<W>, entries: &[ChangeEntry]) -> Result<()> {
    writer.write_record(CSV_COLUMNS)?;

    for entry in entries {
        let usn = entry.usn.to_string();
        let timestamp = entry
            .timestamp
            .map(|ts| format_timestamp(&ts))
            .unwrap_or_default();
        let is_directory = entry.is_directory.to_string();
        let is_rename = entry.is_rename.to_string();
        let rename_type = entry.rename_type.to_string();
        let file_reference = entry.file_reference.to_string();
        let parent_file_reference = entry.parent_file_reference.to_string();

        writer.write_record([
            usn.as_str(),
            entry.name.as_str(),
            entry.path.as_str(),
            timestamp.as_str(),
            entry.reason.as_str(),
            is_directory.as_str(),
            entry.attributes.as_str(),
            entry.original_name.as_str(),
            is_rename.as_str(),
            rename_type.as_str(),
            file_reference.as_str(),
            parent_file_reference.as_str(),
            "",
        ])?;
    }
    Ok(())
}
