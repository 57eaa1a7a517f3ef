//! Heuristic URL classifier
//!
//! Last-resort resolution for decoded tag text with no catalog entry. The
//! rules are deliberately narrow: recognize YouTube and Spotify links by
//! substring, synthesize a transient descriptor, and refuse everything
//! else so the caller can report an unrecognized tag instead of guessing.

use chrono::Utc;
use taptune_core::ContentDescriptor;
use tracing::debug;

/// Artist label attached to every classifier-synthesized descriptor
pub const SCANNED_ARTIST: &str = "Scanned from NFC";

const YOUTUBE_TITLE: &str = "YouTube Video";
const SPOTIFY_TITLE: &str = "Spotify Track";

// Placeholder artwork, matching what the companion app shows for
// hand-entered YouTube/Spotify entries.
const YOUTUBE_ART: &str = "https://images.unsplash.com/photo-1611162616305-c69b3fa7fbe0";
const SPOTIFY_ART: &str = "https://images.unsplash.com/photo-1614613535308-eb5fbd3d2c17";

/// Classify decoded tag text as a YouTube or Spotify link
///
/// YouTube is tested first (`youtube.com` or `youtu.be` substrings), then
/// Spotify (`spotify.com`). Anything else is `None` and must be treated as
/// an unrecognized tag; playback is never attempted for it.
///
/// Synthesized ids are `url_` plus a millisecond timestamp, a namespace no
/// catalog id uses. The descriptor only ever lives in scan history.
pub fn classify(text: &str) -> Option<ContentDescriptor> {
    let id = format!("url_{}", Utc::now().timestamp_millis());

    let mut descriptor = if text.contains("youtube.com") || text.contains("youtu.be") {
        ContentDescriptor::youtube(id, YOUTUBE_TITLE, text)
    } else if text.contains("spotify.com") {
        ContentDescriptor::spotify(id, SPOTIFY_TITLE, text)
    } else {
        debug!(%text, "text matched no classifier rule");
        return None;
    };

    descriptor.artist = Some(SCANNED_ARTIST.to_string());
    descriptor.description = Some(text.to_string());
    descriptor.album_art = Some(
        match descriptor.kind {
            taptune_core::ContentKind::Youtube => YOUTUBE_ART,
            _ => SPOTIFY_ART,
        }
        .to_string(),
    );
    Some(descriptor)
}
