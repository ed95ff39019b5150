//! The UI egress contract.
//!
//! The engine talks to its presentation layer exclusively through
//! [`UiSink`]. The sink is assumed to serialise delivery onto its own UI
//! thread; the engine only guarantees call order. Error messages pass
//! through [`escape_message`] so they stay single-line and safe to embed in
//! a scripting channel.

use parking_lot::Mutex;

/// The five calls a presentation layer receives from a scan.
pub trait UiSink: Send + Sync {
    /// Invoked once at scan start, before any other call.
    fn clear_all_results(&self);

    /// Coarse progress. `percent` is 0-100; `files_over_dirs` is a
    /// `files/dirs` tally string.
    fn update_status(
        &self,
        message: &str,
        percent: u8,
        entry_count: usize,
        secondary: &str,
        files_over_dirs: &str,
    );

    /// A fatal or per-volume error, already escaped to a single line.
    fn show_error(&self, message: &str);

    /// The one batched delivery: a JSON array of change entries.
    fn load_all_entries(&self, entries_json: &str);

    /// Invoked exactly once, unconditionally, at run end.
    fn scan_complete(&self);
}

/// Collapse a message to a single line safe for the sink's scripting channel.
pub fn escape_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for ch in message.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

/// One recorded sink invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    ClearAllResults,
    UpdateStatus {
        message: String,
        percent: u8,
        entry_count: usize,
        secondary: String,
        files_over_dirs: String,
    },
    ShowError {
        message: String,
    },
    LoadAllEntries {
        entries_json: String,
    },
    ScanComplete,
}

/// Sink that records every call, for tests and diagnostics.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls received so far, in order.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }
}

impl UiSink for RecordingSink {
    fn clear_all_results(&self) {
        self.events.lock().push(SinkEvent::ClearAllResults);
    }

    fn update_status(
        &self,
        message: &str,
        percent: u8,
        entry_count: usize,
        secondary: &str,
        files_over_dirs: &str,
    ) {
        self.events.lock().push(SinkEvent::UpdateStatus {
            message: message.to_string(),
            percent,
            entry_count,
            secondary: secondary.to_string(),
            files_over_dirs: files_over_dirs.to_string(),
        });
    }

    fn show_error(&self, message: &str) {
        self.events.lock().push(SinkEvent::ShowError {
            message: message.to_string(),
        });
    }

    fn load_all_entries(&self, entries_json: &str) {
        self.events.lock().push(SinkEvent::LoadAllEntries {
            entries_json: entries_json.to_string(),
        });
    }

    fn scan_complete(&self) {
        self.events.lock().push(SinkEvent::ScanComplete);
    }
}

/// Sink that forwards every call over a channel, for hosts that consume
/// progress on another thread.
pub struct ChannelSink {
    sender: crossbeam_channel::Sender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, crossbeam_channel::Receiver<SinkEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (ChannelSink { sender }, receiver)
    }
}

impl UiSink for ChannelSink {
    fn clear_all_results(&self) {
        let _ = self.sender.send(SinkEvent::ClearAllResults);
    }

    fn update_status(
        &self,
        message: &str,
        percent: u8,
        entry_count: usize,
        secondary: &str,
        files_over_dirs: &str,
    ) {
        let _ = self.sender.send(SinkEvent::UpdateStatus {
            message: message.to_string(),
            percent,
            entry_count,
            secondary: secondary.to_string(),
            files_over_dirs: files_over_dirs.to_string(),
        });
    }

    fn show_error(&self, message: &str) {
        let _ = self.sender.send(SinkEvent::ShowError {
            message: message.to_string(),
        });
    }

    fn load_all_entries(&self, entries_json: &str) {
        let _ = self.sender.send(SinkEvent::LoadAllEntries {
            entries_json: entries_json.to_string(),
        });
    }

    fn scan_complete(&self) {
        let _ = self.sender.send(SinkEvent::ScanComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_message() {
        assert_eq!(escape_message("plain"), "plain");
        assert_eq!(escape_message("it's"), "it\\'s");
        assert_eq!(escape_message("a\\b"), "a\\\\b");
        assert_eq!(escape_message("two\nlines\r"), "two lines ");
        assert_eq!(escape_message("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let sink = RecordingSink::new();
        sink.clear_all_results();
        sink.update_status("Working", 50, 0, "", "0/0");
        sink.scan_complete();

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], SinkEvent::ClearAllResults);
        assert!(matches!(
            events[1],
            SinkEvent::UpdateStatus { percent: 50, .. }
        ));
        assert_eq!(events[2], SinkEvent::ScanComplete);
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, receiver) = ChannelSink::new();
        sink.show_error("boom");
        sink.scan_complete();

        assert_eq!(
            receiver.try_recv().unwrap(),
            SinkEvent::ShowError {
                message: "boom".to_string()
            }
        );
        assert_eq!(receiver.try_recv().unwrap(), SinkEvent::ScanComplete);
    }
}
