//! Error types for the NTFS backend.

use journaltrace_core::ScanError;
use thiserror::Error;

/// Errors raised by the raw volume dialogue.
#[derive(Error, Debug)]
pub enum NtfsError {
    /// A volume open was refused; the process is not elevated
    #[error("access denied opening volume {drive}:")]
    AccessDenied { drive: char },

    /// A volume open failed for another reason
    #[error("could not open volume {drive}: error {code}")]
    VolumeOpen { drive: char, code: u32 },

    /// The change journal is not active on the volume
    #[error("USN journal not active on volume {drive}:")]
    JournalNotActive { drive: char },

    /// A device-control call failed outside its end-of-data path
    #[error("{function} failed with code {code}: {message}")]
    DeviceControl {
        function: &'static str,
        code: u32,
        message: String,
    },
}

impl NtfsError {
    /// Capture the last Win32 error for a failed device-control call.
    #[cfg(windows)]
    pub fn device_control(function: &'static str) -> Self {
        use windows::Win32::Foundation::GetLastError;

        let code = unsafe { GetLastError().0 };
        NtfsError::DeviceControl {
            function,
            code,
            message: format_win32_error(code),
        }
    }
}

impl From<NtfsError> for ScanError {
    fn from(err: NtfsError) -> Self {
        match err {
            NtfsError::AccessDenied { .. } => ScanError::NotElevated,
            NtfsError::VolumeOpen { drive, code } => ScanError::VolumeOpenFailed { drive, code },
            NtfsError::JournalNotActive { drive } => ScanError::JournalInactive { drive },
            NtfsError::DeviceControl { function, code, .. } => ScanError::ControlCall {
                operation: function.to_string(),
                code,
            },
        }
    }
}

/// Format a Win32 error code to a human-readable message
#[cfg(windows)]
fn format_win32_error(code: u32) -> String {
    use windows::core::PWSTR;
    use windows::Win32::System::Diagnostics::Debug::{
        FormatMessageW, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
    };

    let mut buffer = [0u16; 512];
    let len = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            None,
            code,
            0,
            PWSTR(buffer.as_mut_ptr()),
            buffer.len() as u32,
            None,
        )
    };

    if len == 0 {
        return format!("Unknown error ({})", code);
    }

    String::from_utf16_lossy(&buffer[..len as usize])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_preserves_failure_class() {
        let err: ScanError = NtfsError::AccessDenied { drive: 'C' }.into();
        assert!(err.is_fatal());

        let err: ScanError = NtfsError::JournalNotActive { drive: 'D' }.into();
        assert!(matches!(err, ScanError::JournalInactive { drive: 'D' }));
        assert!(!err.is_fatal());

        let err: ScanError = NtfsError::VolumeOpen { drive: 'E', code: 2 }.into();
        assert!(matches!(err, ScanError::VolumeOpenFailed { drive: 'E', code: 2 }));

        let err: ScanError = NtfsError::DeviceControl {
            function: "FSCTL_READ_USN_JOURNAL",
            code: 87,
            message: "bad parameter".to_string(),
        }
        .into();
        assert!(matches!(err, ScanError::ControlCall { code: 87, .. }));
    }
}
