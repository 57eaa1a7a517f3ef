/// Content domain types
use crate::error::{Result, TapError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a piece of content lives and how it should be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Bundled or locally hosted audio, played in-process
    Local,
    /// A Spotify track or album, handed off to the Spotify app/site
    Spotify,
    /// A YouTube video, handed off to the YouTube app/site
    Youtube,
    /// A newsletter or article link, opened in a browser
    Newsletter,
}

impl ContentKind {
    /// Whether playback happens outside the app (handed to an external URL)
    pub fn is_external(self) -> bool {
        !matches!(self, Self::Local)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Spotify => "spotify",
            Self::Youtube => "youtube",
            Self::Newsletter => "newsletter",
        };
        write!(f, "{name}")
    }
}

/// A playable piece of content
///
/// Descriptors come from the catalog or are synthesized by the URL
/// classifier. Exactly one of the four URL fields is set, and it is the one
/// matching `kind`; [`ContentDescriptor::validate`] checks the invariant for
/// descriptors built from external data. Serialized field names match the
/// catalog JSON exported by the companion mobile app (`albumArt`,
/// `audioUrl`, `type`, ...), so existing catalog files load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDescriptor {
    /// Stable identifier, unique within a catalog
    pub id: String,

    /// Display title
    pub title: String,

    /// Artist or author
    pub artist: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Album art URL or asset path
    pub album_art: Option<String>,

    /// Playable audio URL (kind `local`)
    pub audio_url: Option<String>,

    /// Spotify URL (kind `spotify`)
    pub spotify_url: Option<String>,

    /// YouTube URL (kind `youtube`)
    pub youtube_url: Option<String>,

    /// Newsletter URL (kind `newsletter`)
    pub newsletter_url: Option<String>,

    /// Display duration, e.g. "3:45"
    pub duration: Option<String>,

    /// Content kind, deciding which URL field is authoritative
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl ContentDescriptor {
    fn bare(id: impl Into<String>, title: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
            description: None,
            album_art: None,
            audio_url: None,
            spotify_url: None,
            youtube_url: None,
            newsletter_url: None,
            duration: None,
            kind,
        }
    }

    /// Create a local-audio descriptor
    pub fn local(
        id: impl Into<String>,
        title: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::bare(id, title, ContentKind::Local);
        descriptor.audio_url = Some(audio_url.into());
        descriptor
    }

    /// Create a Spotify descriptor
    pub fn spotify(
        id: impl Into<String>,
        title: impl Into<String>,
        spotify_url: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::bare(id, title, ContentKind::Spotify);
        descriptor.spotify_url = Some(spotify_url.into());
        descriptor
    }

    /// Create a YouTube descriptor
    pub fn youtube(
        id: impl Into<String>,
        title: impl Into<String>,
        youtube_url: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::bare(id, title, ContentKind::Youtube);
        descriptor.youtube_url = Some(youtube_url.into());
        descriptor
    }

    /// Create a newsletter descriptor
    pub fn newsletter(
        id: impl Into<String>,
        title: impl Into<String>,
        newsletter_url: impl Into<String>,
    ) -> Self {
        let mut descriptor = Self::bare(id, title, ContentKind::Newsletter);
        descriptor.newsletter_url = Some(newsletter_url.into());
        descriptor
    }

    /// The URL matching this descriptor's kind
    pub fn primary_url(&self) -> Option<&str> {
        match self.kind {
            ContentKind::Local => self.audio_url.as_deref(),
            ContentKind::Spotify => self.spotify_url.as_deref(),
            ContentKind::Youtube => self.youtube_url.as_deref(),
            ContentKind::Newsletter => self.newsletter_url.as_deref(),
        }
    }

    /// Check the one-URL-per-kind invariant
    ///
    /// Descriptors built through the kind constructors always pass; this is
    /// for descriptors deserialized from catalog files.
    pub fn validate(&self) -> Result<()> {
        let set_count = [
            self.audio_url.is_some(),
            self.spotify_url.is_some(),
            self.youtube_url.is_some(),
            self.newsletter_url.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if set_count != 1 {
            return Err(TapError::invalid_input(format!(
                "descriptor '{}' must carry exactly one content URL, found {set_count}",
                self.id
            )));
        }
        if self.primary_url().is_none() {
            return Err(TapError::invalid_input(format!(
                "descriptor '{}' URL does not match its '{}' kind",
                self.id, self.kind
            )));
        }
        Ok(())
    }
}

/// One entry in the scan history
///
/// The descriptor is an owned snapshot taken at scan time. Later catalog
/// edits never alter history entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique record identifier
    pub id: String,

    /// Scan time as Unix milliseconds
    pub timestamp: i64,

    /// The content that was resolved for this scan
    pub descriptor: ContentDescriptor,
}

impl ScanRecord {
    /// Create a record for a scan that resolved to `descriptor`, stamped now
    pub fn new(descriptor: ContentDescriptor) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            descriptor,
        }
    }
}
