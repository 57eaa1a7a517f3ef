/// Core traits for TapTune
use crate::error::Result;
use crate::types::ContentDescriptor;
use async_trait::async_trait;

/// Read-only content catalog
///
/// The catalog is an external collection keyed by descriptor id. The scan
/// pipeline only ever reads it; editing happens elsewhere.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Look up a descriptor by id
    ///
    /// `Ok(None)` means the id is unknown, which is an expected outcome and
    /// distinct from a lookup failure.
    async fn get_by_id(&self, id: &str) -> Result<Option<ContentDescriptor>>;

    /// List every descriptor in the catalog
    async fn list_all(&self) -> Result<Vec<ContentDescriptor>>;
}

/// Playback transport
///
/// Implementations receive a resolved descriptor and make it audible: a
/// local audio element, a native player bridge, or a console logger in
/// tests. Transport control (pause, seek, volume) stays behind this seam.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    /// Start playing the given content
    async fn play(&self, descriptor: &ContentDescriptor) -> Result<()>;
}
