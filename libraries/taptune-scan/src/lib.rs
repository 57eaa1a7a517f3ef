//! TapTune - Scan Pipeline
//!
//! The tag-to-playback pipeline for TapTune.
//!
//! This crate provides:
//! - Scan history (bounded, newest-first, persisted as a unit)
//! - Tag-reader session state machine (support, scan, permission state)
//! - Scan dispatcher (decode, resolve, classify, record, play)
//! - A channel-driven scan service guaranteeing one-at-a-time processing
//!
//! # Architecture
//!
//! `taptune-scan` is completely platform-agnostic:
//! - No NFC plugin bindings (provided via the `TagReader` trait)
//! - No storage engine (provided via the `HistoryStore` trait)
//! - No playback transport (provided via the `PlaybackSink` trait)
//!
//! Handle commands and reader callbacks are funneled into a single
//! consumer task, so tag reads are processed to completion one at a time
//! however the underlying plugin delivers them.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taptune_catalog::CatalogSnapshot;
//! use taptune_core::ContentDescriptor;
//! use taptune_scan::{MemoryHistoryStore, ScanConfig, ScanService};
//! # use taptune_core::{PlaybackSink, ReaderError, ReaderEvent, TagReader};
//! # use async_trait::async_trait;
//! # struct NoReader;
//! # #[async_trait]
//! # impl TagReader for NoReader {
//! #     async fn is_supported(&self) -> Result<bool, ReaderError> { Ok(false) }
//! #     async fn start_scan(
//! #         &self,
//! #         _events: tokio::sync::mpsc::Sender<ReaderEvent>,
//! #     ) -> Result<(), ReaderError> { Err(ReaderError::Unsupported) }
//! #     async fn stop_scan(&self) -> Result<(), ReaderError> { Ok(()) }
//! # }
//! # struct NoSink;
//! # #[async_trait]
//! # impl PlaybackSink for NoSink {
//! #     async fn play(&self, _d: &ContentDescriptor) -> taptune_core::Result<()> { Ok(()) }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(CatalogSnapshot::from_descriptors(vec![
//!     ContentDescriptor::local("jazz", "Blue in Green", "/audio/jazz.mp3"),
//! ]));
//!
//! let (handle, _task) = ScanService::spawn(
//!     Arc::new(NoReader),
//!     catalog,
//!     Arc::new(NoSink),
//!     Arc::new(MemoryHistoryStore::new()),
//!     ScanConfig::default(),
//! );
//!
//! handle.simulate_scan("jazz").await?;
//! let history = handle.history().await?;
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod error;
mod events;
mod history;
mod service;
mod session;
mod store;
pub mod types;

// Public exports
pub use dispatcher::ScanDispatcher;
pub use error::{Result, ScanError};
pub use events::ScanEvent;
pub use history::{ScanHistory, DEFAULT_HISTORY_CAPACITY};
pub use service::{ScanHandle, ScanService};
pub use session::{
    PermissionState, ReaderSession, ScanState, SessionPhase, SessionSnapshot, SupportState,
};
pub use store::{HistoryStore, MemoryHistoryStore};
pub use types::ScanConfig;
