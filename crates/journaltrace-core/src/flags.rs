//! Reason and attribute bitmask tables.
//!
//! Change records carry two 32-bit bitfields: the reason mask describing what
//! happened to the file, and the standard file-attribute mask. Both are
//! expanded into the fixed human-readable vocabulary the UI and the CSV
//! export display. Unknown bits are dropped without error.

use crate::types::RenameType;

/// Reason bit signalling the final close of the change set.
pub const USN_REASON_CLOSE: u32 = 0x8000_0000;

/// Attribute bit marking a directory record.
pub const FILE_ATTRIBUTE_DIRECTORY: u32 = 0x10;

// Masks used for rename-pair labeling. Distinct from the RENAME_*_NAME
// reason-table bits; downstream consumers match on these values.
pub const RENAME_OLD_BIT: u32 = 0x0001_0000;
pub const RENAME_NEW_BIT: u32 = 0x0002_0000;

/// Named reason bits, in ascending bit order.
const REASON_FLAGS: [(u32, &str); 23] = [
    (0x0000_0001, "DATA_OVERWRITE"),
    (0x0000_0002, "DATA_EXTEND"),
    (0x0000_0004, "DATA_TRUNCATION"),
    (0x0000_0010, "NAMED_DATA_OVERWRITE"),
    (0x0000_0020, "NAMED_DATA_EXTEND"),
    (0x0000_0040, "NAMED_DATA_TRUNCATION"),
    (0x0000_0100, "FILE_CREATE"),
    (0x0000_0200, "FILE_DELETE"),
    (0x0000_0400, "EA_CHANGE"),
    (0x0000_0800, "SECURITY_CHANGE"),
    (0x0000_1000, "RENAME_OLD_NAME"),
    (0x0000_2000, "RENAME_NEW_NAME"),
    (0x0000_4000, "INDEXABLE_CHANGE"),
    (0x0000_8000, "BASIC_INFO_CHANGE"),
    (0x0001_0000, "HARD_LINK_CHANGE"),
    (0x0002_0000, "COMPRESSION_CHANGE"),
    (0x0004_0000, "ENCRYPTION_CHANGE"),
    (0x0008_0000, "OBJECT_ID_CHANGE"),
    (0x0010_0000, "REPARSE_POINT_CHANGE"),
    (0x0020_0000, "STREAM_CHANGE"),
    (0x0040_0000, "TRANSACTED_CHANGE"),
    (0x0080_0000, "INTEGRITY_CHANGE"),
    (USN_REASON_CLOSE, "CLOSE"),
];

/// Named attribute bits, in ascending bit order.
const ATTRIBUTE_FLAGS: [(u32, &str); 13] = [
    (0x0000_0001, "READONLY"),
    (0x0000_0002, "HIDDEN"),
    (0x0000_0004, "SYSTEM"),
    (FILE_ATTRIBUTE_DIRECTORY, "DIRECTORY"),
    (0x0000_0020, "ARCHIVE"),
    (0x0000_0080, "NORMAL"),
    (0x0000_0100, "TEMPORARY"),
    (0x0000_0200, "SPARSE_FILE"),
    (0x0000_0400, "REPARSE_POINT"),
    (0x0000_0800, "COMPRESSED"),
    (0x0000_1000, "OFFLINE"),
    (0x0000_2000, "NOT_CONTENT_INDEXED"),
    (0x0000_4000, "ENCRYPTED"),
];

/// Expand a reason mask into `" | "`-joined flag names.
///
/// A mask with no known bits set yields `"UNKNOWN"`.
pub fn reason_string(mask: u32) -> String {
    let names: Vec<&str> = REASON_FLAGS
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    if names.is_empty() {
        "UNKNOWN".to_string()
    } else {
        names.join(" | ")
    }
}

/// Expand an attribute mask into `", "`-joined flag names.
///
/// A mask with no known bits set yields `"NORMAL"`.
pub fn attributes_string(mask: u32) -> String {
    let names: Vec<&str> = ATTRIBUTE_FLAGS
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    if names.is_empty() {
        "NORMAL".to_string()
    } else {
        names.join(", ")
    }
}

/// Label which half of a rename pair this reason mask represents.
///
/// When both bits are set the old half wins; well-formed journals set at
/// most one of the two on a single record.
pub fn rename_type(reason: u32) -> RenameType {
    if reason & RENAME_OLD_BIT != 0 {
        RenameType::Old
    } else if reason & RENAME_NEW_BIT != 0 {
        RenameType::New
    } else {
        RenameType::None
    }
}

/// Look up the bit value for a reason flag name.
pub fn reason_bit(name: &str) -> Option<u32> {
    REASON_FLAGS
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(bit, _)| *bit)
}

/// The union of all named reason bits.
pub fn known_reason_mask() -> u32 {
    REASON_FLAGS.iter().fold(0, |acc, (bit, _)| acc | bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_string_in_table_order() {
        assert_eq!(
            reason_string(0x0000_0100 | USN_REASON_CLOSE),
            "FILE_CREATE | CLOSE"
        );
        assert_eq!(reason_string(0x03), "DATA_OVERWRITE | DATA_EXTEND");
    }

    #[test]
    fn test_reason_string_unknown() {
        assert_eq!(reason_string(0), "UNKNOWN");
        // Bits outside the table are dropped; alone they read as unknown
        assert_eq!(reason_string(0x0100_0000), "UNKNOWN");
        assert_eq!(reason_string(0x0100_0000 | 0x0000_0200), "FILE_DELETE");
    }

    #[test]
    fn test_attributes_string() {
        assert_eq!(attributes_string(0), "NORMAL");
        assert_eq!(attributes_string(0x10 | 0x20), "DIRECTORY, ARCHIVE");
        assert_eq!(attributes_string(0x01), "READONLY");
    }

    #[test]
    fn test_rename_labeling() {
        assert_eq!(rename_type(RENAME_OLD_BIT), RenameType::Old);
        assert_eq!(rename_type(RENAME_NEW_BIT), RenameType::New);
        // Old wins when both bits are present
        assert_eq!(rename_type(RENAME_OLD_BIT | RENAME_NEW_BIT), RenameType::Old);
        assert_eq!(rename_type(0), RenameType::None);
        assert_eq!(rename_type(USN_REASON_CLOSE), RenameType::None);
    }

    #[test]
    fn test_reason_bit_lookup() {
        assert_eq!(reason_bit("FILE_CREATE"), Some(0x100));
        assert_eq!(reason_bit("CLOSE"), Some(USN_REASON_CLOSE));
        assert_eq!(reason_bit("NOT_A_FLAG"), None);
    }

    #[test]
    fn test_known_reason_mask_covers_table() {
        let mask = known_reason_mask();
        assert_eq!(mask & 0x0000_0100, 0x0000_0100);
        assert_eq!(mask & USN_REASON_CLOSE, USN_REASON_CLOSE);
        assert_eq!(mask & 0x0100_0000, 0);
    }
}
