/// Console playback transport
use async_trait::async_trait;
use taptune_core::{ContentDescriptor, PlaybackSink};

/// Playback sink that announces content on stdout
///
/// The console has no audio stack; announcing the resolved content is its
/// whole playback surface.
pub struct ConsolePlayback;

#[async_trait]
impl PlaybackSink for ConsolePlayback {
    async fn play(&self, descriptor: &ContentDescriptor) -> taptune_core::Result<()> {
        match &descriptor.artist {
            Some(artist) => println!(
                "Now playing: {} by {} ({})",
                descriptor.title, artist, descriptor.kind
            ),
            None => println!("Now playing: {} ({})", descriptor.title, descriptor.kind),
        }
        if let Some(url) = descriptor.primary_url() {
            println!("  {url}");
        }
        Ok(())
    }
}
