//! NTFS volume discovery.
//!
//! Walks the logical-drive bitmask and keeps every fixed drive whose
//! filesystem reports NTFS. Volumes that fail their information query are
//! silently ignored; they cannot be scanned anyway.

use crate::winapi_utils::to_wide_string;
use journaltrace_core::types::DriveInfo;
use std::mem::MaybeUninit;
use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Storage::FileSystem::{
    GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW,
};

// DRIVE_FIXED constant value (3)
const DRIVE_FIXED: u32 = 3;

/// Enumerate all fixed NTFS volumes, in drive-letter order.
pub fn available_drives() -> Vec<DriveInfo> {
    let mut drives = Vec::new();
    let mut bits = unsafe { GetLogicalDrives() };

    for letter in 'A'..='Z' {
        if bits & 1 == 1 {
            if let Some(info) = probe_drive(letter) {
                drives.push(info);
            }
        }
        bits >>= 1;
    }

    debug!(count = drives.len(), "Enumerated NTFS volumes");
    drives
}

fn probe_drive(letter: char) -> Option<DriveInfo> {
    let root = format!("{letter}:\\");
    let wide_root = to_wide_string(&root);

    let drive_type = unsafe { GetDriveTypeW(PCWSTR(wide_root.as_ptr())) };
    if drive_type != DRIVE_FIXED {
        return None;
    }

    let mut volume_name = [0u16; 256];
    let mut serial_number = 0u32;
    let mut max_component_length = 0u32;
    let mut fs_flags = 0u32;
    let mut fs_name = [0u16; 32];

    let result = unsafe {
        GetVolumeInformationW(
            PCWSTR(wide_root.as_ptr()),
            Some(&mut volume_name),
            Some(&mut serial_number),
            Some(&mut max_component_length),
            Some(&mut fs_flags),
            Some(&mut fs_name),
        )
    };
    if result.is_err() {
        return None;
    }

    if !utf16_str(&fs_name).eq_ignore_ascii_case("NTFS") {
        return None;
    }

    // Capacity is cosmetic; a failed query just reports zero
    let mut total_bytes = MaybeUninit::<u64>::uninit();
    let mut free_bytes = MaybeUninit::<u64>::uninit();
    let space_result = unsafe {
        GetDiskFreeSpaceExW(
            PCWSTR(wide_root.as_ptr()),
            None,
            Some(total_bytes.as_mut_ptr()),
            Some(free_bytes.as_mut_ptr()),
        )
    };
    let (total, free) = if space_result.is_ok() {
        unsafe { (total_bytes.assume_init(), free_bytes.assume_init()) }
    } else {
        (0, 0)
    };

    let label = {
        let label = utf16_str(&volume_name);
        if label.is_empty() {
            "Local Disk".to_string()
        } else {
            label
        }
    };

    debug!(drive = %letter, label = %label, "Found NTFS volume");
    Some(DriveInfo::ntfs_fixed(letter, label, total, free))
}

fn utf16_str(buffer: &[u16]) -> String {
    let len = buffer
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}
