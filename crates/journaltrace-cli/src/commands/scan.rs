//! The `scan` command: run a full journal scan with console progress.

use anyhow::{bail, Context};
use journaltrace_backend_ntfs::NtfsScanner;
use journaltrace_core::decode::PathMode;
use journaltrace_core::sink::{ChannelSink, SinkEvent};
use journaltrace_core::{Config, ScanController};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub fn run(config: Config, fast: bool, output: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let mode = if fast || config.scan.fast_mode {
        PathMode::Fast
    } else {
        PathMode::Accurate
    };

    let controller = ScanController::new(move || Box::new(NtfsScanner::with_mode(mode)))
        .with_volume_filter(config.scan.volumes.clone());
    let (sink, events) = ChannelSink::new();

    if !controller.start_scan(Arc::new(sink)) {
        bail!("a scan is already in progress");
    }

    let mut errors = 0usize;
    for event in events {
        match event {
            SinkEvent::UpdateStatus {
                message, percent, ..
            } => info!(percent, "{message}"),
            SinkEvent::ShowError { message } => {
                errors += 1;
                error!("{message}");
            }
            SinkEvent::ScanComplete => break,
            SinkEvent::ClearAllResults | SinkEvent::LoadAllEntries { .. } => {}
        }
    }
    controller.wait();

    let entries = controller.results();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for summary in controller.summaries() {
            info!(
                drive = %summary.drive,
                entries = summary.entry_count,
                first_usn = summary.first_usn,
                next_usn = summary.next_usn,
                journal_size = %summary.journal_size,
                "Volume summary"
            );
        }
        println!("{} change entries collected", entries.len());
    }

    if let Some(path) = output {
        let target = if path.is_relative() {
            match &config.export.directory {
                Some(directory) => directory.join(&path),
                None => path,
            }
        } else {
            path
        };
        let written = controller
            .export_results(Some(&target))
            .context("CSV export failed")?;
        println!("Exported {} entries to {}", entries.len(), written.display());
    }

    if errors > 0 && entries.is_empty() {
        bail!("scan finished with errors and no entries");
    }
    Ok(())
}
