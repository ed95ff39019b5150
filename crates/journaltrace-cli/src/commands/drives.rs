//! The `drives` command: list scannable NTFS volumes.

use crate::OutputFormat;
use journaltrace_backend_ntfs::NtfsScanner;
use journaltrace_core::scan::VolumeScanner;

pub fn run(output: OutputFormat) -> anyhow::Result<()> {
    let mut scanner = NtfsScanner::new();
    let drives = scanner.available_drives()?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&drives)?),
        OutputFormat::Text => {
            if drives.is_empty() {
                println!("No NTFS drives found");
            }
            for drive in &drives {
                println!(
                    "{}:  {:<20} {} free of {}",
                    drive.letter, drive.label, drive.total_free, drive.total_size
                );
            }
        }
    }
    Ok(())
}
