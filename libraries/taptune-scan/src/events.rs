//! Scan pipeline events
//!
//! Broadcast to observers (UI, logging, shell integrations) as the
//! pipeline processes tags. Events are a one-way feed; dropping or
//! lagging a receiver never stalls the pipeline.

use serde::{Deserialize, Serialize};
use taptune_core::{ContentDescriptor, ContentKind};

use crate::session::SessionSnapshot;

/// Events emitted by the scan pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScanEvent {
    /// The reader session state changed
    SessionChanged {
        /// New session snapshot
        session: SessionSnapshot,
    },

    /// A scanned tag resolved to playable content
    NowPlaying {
        /// Resolved content
        descriptor: ContentDescriptor,
    },

    /// The scan history changed
    HistoryChanged {
        /// Number of retained records
        length: usize,
    },

    /// A tag decoded to text that nothing could resolve
    Unrecognized {
        /// Decoded tag text
        text: String,
    },

    /// A tag was read but its payload yielded no usable text
    DecodeFailed,

    /// External content should be opened by the embedding shell
    ExternalLink {
        /// URL to open
        url: String,

        /// Kind of content behind the link
        kind: ContentKind,
    },

    /// A non-fatal pipeline error
    Error {
        /// Human-readable description
        message: String,
    },
}
