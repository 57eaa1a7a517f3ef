/// Catalog loading for the console
use crate::config::CatalogSettings;
use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use taptune_catalog::CatalogSnapshot;
use taptune_core::ContentDescriptor;

/// Load the configured catalog file, or the built-in demo catalog
pub fn load(settings: &CatalogSettings) -> anyhow::Result<CatalogSnapshot> {
    match &settings.path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open catalog file {}", path.display()))?;
            CatalogSnapshot::from_json_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse catalog file {}", path.display()))
        }
        None => Ok(demo_catalog()),
    }
}

/// The catalog bundled with the companion mobile app
///
/// Useful out of the box: `taptune simulate jazz` works without any
/// catalog file.
pub fn demo_catalog() -> CatalogSnapshot {
    CatalogSnapshot::from_descriptors(vec![
        describe(
            ContentDescriptor::local(
                "totoro",
                "My Neighbor Totoro - Lullaby",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
            ),
            "Joe Hisaishi",
            "Peaceful lullaby from the beloved Studio Ghibli film",
            "3:45",
        ),
        describe(
            ContentDescriptor::spotify(
                "podcast1",
                "The Daily - Morning Briefing",
                "https://open.spotify.com/episode/3kxYzDQ1xqXrJmq8GZG7Gf",
            ),
            "The New York Times",
            "Today's most important stories in 20 minutes",
            "20:15",
        ),
        describe(
            ContentDescriptor::local(
                "marcos",
                "Meditations - Book 1",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
            ),
            "Marcus Aurelius",
            "Timeless wisdom from the Roman Emperor",
            "45:30",
        ),
        describe(
            ContentDescriptor::spotify(
                "chill",
                "Lo-fi Beats to Relax",
                "https://open.spotify.com/playlist/37i9dQZF1DWWQRwui0ExPn",
            ),
            "Various Artists",
            "Perfect background music for studying or working",
            "2:15:00",
        ),
        describe(
            ContentDescriptor::local(
                "jazz",
                "Blue in Green",
                "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
            ),
            "Miles Davis",
            "Classic jazz from Kind of Blue",
            "5:37",
        ),
        describe(
            ContentDescriptor::youtube(
                "youtube1",
                "Video de Prueba",
                "https://www.youtube.com/watch?v=hPrDqHFQdZo",
            ),
            "YouTube",
            "Video de prueba para NFC",
            "3:30",
        ),
        describe(
            ContentDescriptor::spotify(
                "spotify1",
                "Canción de Prueba",
                "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp",
            ),
            "Spotify",
            "Canción de prueba para NFC",
            "4:20",
        ),
        describe(
            ContentDescriptor::local(
                "marcopolo",
                "Marco Aurelio - Meditaciones",
                "/audio/marco-polo.m4a",
            ),
            "Marco Aurelio",
            "Sabiduría estoica del emperador romano",
            "45:30",
        ),
    ])
}

fn describe(
    mut descriptor: ContentDescriptor,
    artist: &str,
    description: &str,
    duration: &str,
) -> ContentDescriptor {
    descriptor.artist = Some(artist.to_string());
    descriptor.description = Some(description.to_string());
    descriptor.duration = Some(duration.to_string());
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use taptune_core::ContentKind;

    #[test]
    fn demo_catalog_is_fully_valid() {
        // from_descriptors drops invalid entries, so a full count proves
        // every entry passed validation
        let catalog = demo_catalog();
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn demo_catalog_covers_every_content_kind_but_newsletter() {
        let catalog = demo_catalog();
        assert_eq!(catalog.resolve("jazz").map(|d| d.kind), Some(ContentKind::Local));
        assert_eq!(
            catalog.resolve("chill").map(|d| d.kind),
            Some(ContentKind::Spotify)
        );
        assert_eq!(
            catalog.resolve("youtube1").map(|d| d.kind),
            Some(ContentKind::Youtube)
        );
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let settings = CatalogSettings {
            path: Some("does-not-exist.json".into()),
        };
        assert!(load(&settings).is_err());
    }
}
