//! TapTune Core
//!
//! Platform-agnostic core types, traits, and error handling for TapTune.
//!
//! TapTune turns physical NFC tags into playback triggers: a tag carries a
//! small NDEF payload, the payload resolves to a piece of content, and the
//! content is handed to whatever playback transport the platform provides.
//! This crate defines the shared vocabulary for that pipeline.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ContentDescriptor`, `ContentKind`, `ScanRecord`
//! - **Reader Types**: `TagPayload`, `ReaderEvent`, `ReaderError`
//! - **Platform Traits**: `Catalog`, `TagReader`, `PlaybackSink`
//! - **Error Handling**: Unified `TapError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use taptune_core::types::{ContentDescriptor, ContentKind};
//!
//! let descriptor = ContentDescriptor::youtube(
//!     "yt-demo",
//!     "Demo Video",
//!     "https://www.youtube.com/watch?v=demo",
//! );
//!
//! assert_eq!(descriptor.kind, ContentKind::Youtube);
//! assert_eq!(
//!     descriptor.primary_url(),
//!     Some("https://www.youtube.com/watch?v=demo"),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TapError};
pub use reader::{NdefMessage, NdefRecord, ReaderError, ReaderEvent, TagPayload, TagReader};
pub use traits::{Catalog, PlaybackSink};
pub use types::{ContentDescriptor, ContentKind, ScanRecord};
