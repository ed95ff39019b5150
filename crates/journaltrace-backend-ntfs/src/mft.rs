//! MFT enumeration into the path resolver.
//!
//! `FSCTL_ENUM_USN_DATA` iterates the whole Master File Table in large
//! batches. Each payload leads with the next start index to request; the
//! packed records behind it each contribute one `(parent, name)` link to
//! the volume's path resolver.

use crate::winapi_utils::{SafeHandle, ERROR_HANDLE_EOF};
use journaltrace_core::record::{lead_u64, MftEnumWalker};
use journaltrace_core::resolver::PathResolver;
use journaltrace_core::types::JournalHeader;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use windows::Win32::Foundation::GetLastError;
use windows::Win32::System::Ioctl::FSCTL_ENUM_USN_DATA;
use windows::Win32::System::IO::DeviceIoControl;

const ENUM_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Enumerate every in-use MFT record on the volume and resolve the
/// resulting parent links into full paths.
///
/// A failed control call other than end-of-data closes the enumeration
/// early; the links gathered so far still resolve.
pub fn build_path_resolver(
    handle: &SafeHandle,
    drive: char,
    header: &JournalHeader,
    active: &AtomicBool,
) -> PathResolver {
    let mut resolver = PathResolver::new(drive);
    let mut buffer = vec![0u8; ENUM_BUFFER_SIZE];
    let mut start_index = 0u64;

    while active.load(Ordering::Relaxed) {
        let input = pack_enum_input(start_index, header.next_usn);
        let mut bytes_returned = 0u32;

        let result = unsafe {
            DeviceIoControl(
                handle.as_raw(),
                FSCTL_ENUM_USN_DATA,
                Some(input.as_ptr() as *const _),
                input.len() as u32,
                Some(buffer.as_mut_ptr() as *mut _),
                buffer.len() as u32,
                Some(&mut bytes_returned),
                None,
            )
        };

        if result.is_err() {
            let code = unsafe { GetLastError().0 };
            if code != ERROR_HANDLE_EOF {
                warn!(drive = %drive, code, "MFT enumeration ended early");
            }
            break;
        }

        let payload = &buffer[..bytes_returned as usize];
        if payload.len() <= 8 {
            break;
        }
        let Some(next_index) = lead_u64(payload) else {
            break;
        };

        for link in MftEnumWalker::new(payload) {
            resolver.record(link.file_index, link.parent_index, link.name);
        }

        if next_index == 0 {
            break;
        }
        start_index = next_index;
    }

    resolver.resolve_all();
    debug!(drive = %drive, links = resolver.link_count(), "Indexed MFT records");
    resolver
}

/// Pack an `MFT_ENUM_DATA_V0` input buffer, little-endian.
///
/// The USN window is `[0, next_usn]`: every record indexed as of the
/// initial journal query.
fn pack_enum_input(start_index: u64, high_usn: i64) -> [u8; 24] {
    let mut buf = [0u8; 24];
    buf[0..8].copy_from_slice(&start_index.to_le_bytes());
    buf[16..24].copy_from_slice(&high_usn.to_le_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_input_layout() {
        let input = pack_enum_input(0x1122_3344_5566_7788, 0x0102_0304_0506_0708);
        assert_eq!(&input[0..8], &0x1122_3344_5566_7788u64.to_le_bytes());
        assert_eq!(&input[8..16], &[0u8; 8]);
        assert_eq!(&input[16..24], &0x0102_0304_0506_0708i64.to_le_bytes());
    }
}
