//! TapTune Catalog
//!
//! Catalog resolution and URL classification for TapTune.
//!
//! This crate provides:
//! - `CatalogSnapshot`: an immutable, id-keyed view of the content catalog,
//!   loadable from the JSON files the companion app exports
//! - `classify`: the heuristic fallback that turns an unrecognized tag
//!   string into a transient YouTube/Spotify descriptor
//!
//! Resolution order is fixed: the catalog is consulted first, the
//! classifier only when the catalog has no entry. Classifier descriptors
//! are never written back into a catalog.
//!
//! # Example
//!
//! ```rust
//! use taptune_catalog::{classify, CatalogSnapshot};
//! use taptune_core::{ContentDescriptor, ContentKind};
//!
//! let snapshot = CatalogSnapshot::from_descriptors(vec![
//!     ContentDescriptor::local("jazz", "Blue in Green", "/audio/jazz.mp3"),
//! ]);
//!
//! assert!(snapshot.resolve("jazz").is_some());
//! assert!(snapshot.resolve("unknown").is_none());
//!
//! let fallback = classify("https://youtu.be/abc123").unwrap();
//! assert_eq!(fallback.kind, ContentKind::Youtube);
//! ```

mod classifier;
mod error;
mod snapshot;

pub use classifier::classify;
pub use error::{CatalogError, Result};
pub use snapshot::CatalogSnapshot;
