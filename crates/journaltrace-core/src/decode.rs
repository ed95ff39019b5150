//! Change-record enrichment.
//!
//! Stateless transformation of a raw version-2 record plus the volume's
//! path cache into the enriched entry the UI and the export consume.

use crate::filetime::filetime_to_datetime;
use crate::flags;
use crate::record::RawChangeRecord;
use crate::resolver::{join_path, PathResolver};
use crate::types::{ChangeEntry, RenameType};

/// How entry paths are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    /// Join the resolved parent path with the record name (the default).
    #[default]
    Accurate,
    /// Prefix the record name with the drive root and skip attribute
    /// decoding. Kept as a contract for low-latency runs.
    Fast,
}

/// Enrich one raw record into a [`ChangeEntry`].
pub fn enrich(raw: RawChangeRecord, resolver: &PathResolver, mode: PathMode) -> ChangeEntry {
    let (path, attributes) = match mode {
        PathMode::Accurate => (
            join_path(resolver.path_of(raw.parent_file_reference), &raw.name),
            flags::attributes_string(raw.attributes),
        ),
        PathMode::Fast => (format!("{}{}", resolver.root(), raw.name), String::new()),
    };

    let rename_type = flags::rename_type(raw.reason);

    ChangeEntry {
        usn: raw.usn,
        name: raw.name.clone(),
        path,
        timestamp: filetime_to_datetime(raw.timestamp),
        reason: flags::reason_string(raw.reason),
        attributes,
        is_directory: raw.attributes & flags::FILE_ATTRIBUTE_DIRECTORY != 0,
        file_reference: raw.file_reference,
        parent_file_reference: raw.parent_file_reference,
        original_name: raw.name,
        is_rename: rename_type != RenameType::None,
        rename_type,
    }
}
