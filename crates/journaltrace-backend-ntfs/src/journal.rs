//! Journal metadata probe and record streaming.
//!
//! `FSCTL_QUERY_USN_JOURNAL` returns the journal's current incarnation;
//! its id must accompany every `FSCTL_READ_USN_JOURNAL` call. Reads walk
//! the live USN range in large batches: the first 8 bytes of each payload
//! carry the next start USN, the rest is a packed record stream handed to
//! the core walkers.

use crate::error::NtfsError;
use crate::winapi_utils::{
    SafeHandle, ERROR_ACCESS_DENIED, ERROR_HANDLE_EOF, ERROR_JOURNAL_DELETE_IN_PROGRESS,
    ERROR_JOURNAL_NOT_ACTIVE,
};
use journaltrace_core::decode::{enrich, PathMode};
use journaltrace_core::record::{lead_i64, parse_journal_header, UsnWalker, JOURNAL_HEADER_LEN};
use journaltrace_core::resolver::PathResolver;
use journaltrace_core::types::{ChangeEntry, JournalHeader};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};
use windows::Win32::Foundation::GetLastError;
use windows::Win32::System::Ioctl::{FSCTL_QUERY_USN_JOURNAL, FSCTL_READ_USN_JOURNAL};
use windows::Win32::System::IO::DeviceIoControl;

const READ_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Query the live journal header for a volume. Idempotent and
/// side-effect free.
pub fn query_journal(handle: &SafeHandle, drive: char) -> Result<JournalHeader, NtfsError> {
    let mut buffer = [0u8; JOURNAL_HEADER_LEN];
    let mut bytes_returned = 0u32;

    let result = unsafe {
        DeviceIoControl(
            handle.as_raw(),
            FSCTL_QUERY_USN_JOURNAL,
            None,
            0,
            Some(buffer.as_mut_ptr() as *mut _),
            buffer.len() as u32,
            Some(&mut bytes_returned),
            None,
        )
    };

    if result.is_err() {
        let code = unsafe { GetLastError().0 };
        return Err(match code {
            ERROR_ACCESS_DENIED => NtfsError::AccessDenied { drive },
            ERROR_JOURNAL_NOT_ACTIVE | ERROR_JOURNAL_DELETE_IN_PROGRESS => {
                NtfsError::JournalNotActive { drive }
            }
            _ => NtfsError::device_control("FSCTL_QUERY_USN_JOURNAL"),
        });
    }

    let header = parse_journal_header(&buffer[..bytes_returned as usize]).ok_or(
        NtfsError::DeviceControl {
            function: "FSCTL_QUERY_USN_JOURNAL",
            code: 0,
            message: "short journal header".to_string(),
        },
    )?;

    debug!(
        drive = %drive,
        journal_id = header.journal_id,
        first_usn = header.first_usn,
        next_usn = header.next_usn,
        "Queried USN journal"
    );
    Ok(header)
}

/// Stream the live USN range, enriching each version-2 record as it
/// arrives. Entries come back in journal order (strictly increasing USN).
///
/// A failed control call other than end-of-data closes the stream early;
/// whatever was gathered is returned.
pub fn read_journal(
    handle: &SafeHandle,
    drive: char,
    header: &JournalHeader,
    resolver: &PathResolver,
    mode: PathMode,
    active: &AtomicBool,
) -> Vec<ChangeEntry> {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut entries = Vec::new();
    // Clamped to the start of the live range for determinism
    let mut start_usn = header.first_usn;

    while active.load(Ordering::Relaxed) {
        let input = pack_read_input(start_usn, header.journal_id);
        let mut bytes_returned = 0u32;

        let result = unsafe {
            DeviceIoControl(
                handle.as_raw(),
                FSCTL_READ_USN_JOURNAL,
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
                warn!(drive = %drive, code, "Journal read ended early");
            }
            break;
        }

        let payload = &buffer[..bytes_returned as usize];
        if payload.len() <= 8 {
            break;
        }
        let Some(next_usn) = lead_i64(payload) else {
            break;
        };

        for raw in UsnWalker::new(payload) {
            entries.push(enrich(raw, resolver, mode));
        }

        // Fixed point: the journal is exhausted for this call
        if next_usn == 0 || next_usn == start_usn {
            break;
        }
        start_usn = next_usn;
    }

    debug!(drive = %drive, entries = entries.len(), "Journal read complete");
    entries
}

/// Pack a `READ_USN_JOURNAL_DATA_V0` input buffer, little-endian.
fn pack_read_input(start_usn: i64, journal_id: u64) -> [u8; 40] {
    let mut buf = [0u8; 40];
    buf[0..8].copy_from_slice(&start_usn.to_le_bytes());
    // Reason mask: everything; return-only-on-close, timeout and
    // bytes-to-wait-for stay zero so exhausted reads return immediately.
    buf[8..12].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
    buf[32..40].copy_from_slice(&journal_id.to_le_bytes());
    buf
}
