//! Tag reader seam
//!
//! Platform NFC bindings implement [`TagReader`] and push [`ReaderEvent`]s
//! into the channel handed to `start_scan`. The core never talks to NFC
//! hardware directly; everything arrives through this seam, which keeps the
//! scan pipeline testable with scripted readers.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// A single NDEF record as delivered by a platform binding
///
/// Only the payload bytes matter to the decoder; type and id fields vary by
/// platform and are dropped at the binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    /// Raw record payload
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Wrap raw payload bytes in a record
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// An NDEF message: an ordered list of records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefMessage {
    /// Records in wire order
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Build a message from records
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }
}

/// What a platform binding hands over for one tag read
///
/// Platforms disagree on how much envelope they preserve. Some deliver the
/// first record's raw bytes, some a whole record or message, and some the
/// full read event with every message on the tag. All shapes funnel into
/// the same decoder, which only ever looks at the first record of the first
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagPayload {
    /// Raw payload bytes of a single record
    Bytes(Vec<u8>),
    /// A single record
    Record(NdefRecord),
    /// A single message
    Message(NdefMessage),
    /// A full read event carrying every message found on the tag
    Read {
        /// Messages in tag order
        messages: Vec<NdefMessage>,
    },
}

/// Errors surfaced by platform tag readers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    /// The device has no NFC capability
    #[error("tag reading not supported on this device")]
    Unsupported,

    /// The permission prompt is still pending a user decision
    #[error("tag reading permission not yet granted")]
    PermissionPending,

    /// The user denied the tag-reading permission
    #[error("tag reading permission denied")]
    PermissionDenied,

    /// A scan session is already active
    ///
    /// Some platforms keep the reader armed at all times and report a start
    /// request this way. It is not a failure; the session treats it as an
    /// active scan.
    #[error("a scan session is already active")]
    AlreadyScanning,

    /// The platform stopped the scan session (tag lost, session timeout)
    #[error("scan session stopped by the platform")]
    Stopped,

    /// Any other platform-specific failure
    #[error("reader failure: {0}")]
    Platform(String),
}

impl ReaderError {
    /// Create a platform error
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }
}

/// Events emitted by an active scan session
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// A tag was read
    Read(TagPayload),
    /// The reader reported an error mid-session
    Failed(ReaderError),
}

/// Platform NFC capability
///
/// `start_scan` registers the event channel and resolves once the platform
/// has acknowledged the session (or refused it). `stop_scan` must tear the
/// event path down before returning so no stale read arrives afterwards;
/// dropping the sender is the expected mechanism.
#[async_trait]
pub trait TagReader: Send + Sync {
    /// Whether this device can read tags at all
    async fn is_supported(&self) -> Result<bool, ReaderError>;

    /// Start a scan session, delivering events into `events`
    ///
    /// A reader answering [`ReaderError::AlreadyScanning`] must still adopt
    /// `events` as its delivery channel; the caller treats the session as
    /// active and listens on it.
    async fn start_scan(&self, events: mpsc::Sender<ReaderEvent>) -> Result<(), ReaderError>;

    /// Stop the active scan session, releasing the event channel
    async fn stop_scan(&self) -> Result<(), ReaderError>;
}
