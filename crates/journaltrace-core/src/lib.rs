//! # JournalTrace Core Library
//!
//! This crate provides the journal ingestion and path-resolution engine for
//! the JournalTrace forensic scanner. It is designed to be platform-agnostic:
//! the raw device-control dialogue lives behind the [`scan::VolumeScanner`]
//! trait, while everything that operates on bytes and records — the on-disk
//! record walkers, the reason/attribute tables, the path resolver, the
//! enrichment pipeline, and the scan orchestrator — lives here and is fully
//! testable on any host.
//!
//! ## Architecture
//!
//! - **Types** (`types`): change entries, journal headers, volume summaries
//! - **Record** (`record`): little-endian walkers over raw control-call payloads
//! - **Flags** (`flags`): reason and attribute bitmask tables
//! - **Resolver** (`resolver`): file-reference → full-path cache
//! - **Decode** (`decode`): raw record enrichment
//! - **Scan** (`scan`): the per-volume pipeline and orchestrator
//! - **Controller** (`controller`): the control API exposed to a UI host
//! - **Sink** (`sink`): the UI egress contract
//! - **Export** (`export`): CSV projection of the result buffer
//! - **Config** (`config`): configuration management

pub mod config;
pub mod controller;
pub mod decode;
pub mod error;
pub mod export;
pub mod filetime;
pub mod flags;
pub mod record;
pub mod resolver;
pub mod scan;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use controller::ScanController;
pub use decode::PathMode;
pub use error::{Result, ScanError};
pub use resolver::PathResolver;
pub use scan::{ScanSession, VolumeScanner};
pub use sink::{ChannelSink, RecordingSink, SinkEvent, UiSink};
pub use types::{ChangeEntry, DriveInfo, JournalHeader, RenameType, ScanResult, VolumeSummary};
