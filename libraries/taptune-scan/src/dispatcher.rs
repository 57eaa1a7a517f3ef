//! Scan dispatch pipeline
//!
//! Turns raw tag payloads into playback: decode the payload, resolve the
//! text against the catalog, fall back to the URL classifier, then record
//! the scan and hand the content to the playback sink. The dispatcher is
//! single-threaded by construction; the service wraps it in a task and
//! serializes commands through a channel.

use std::sync::Arc;

use taptune_catalog::classify;
use taptune_core::{Catalog, ContentDescriptor, PlaybackSink, Result, ScanRecord, TagPayload};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::events::ScanEvent;
use crate::history::ScanHistory;
use crate::store::HistoryStore;
use crate::types::ScanConfig;

/// Resolution and playback pipeline behind the scan service
pub struct ScanDispatcher {
    catalog: Arc<dyn Catalog>,
    sink: Arc<dyn PlaybackSink>,
    store: Arc<dyn HistoryStore>,
    history: ScanHistory,
    current: Option<ContentDescriptor>,
    auto_open_links: bool,
    events: broadcast::Sender<ScanEvent>,
}

impl ScanDispatcher {
    /// Create a dispatcher with an empty history
    pub fn new(
        catalog: Arc<dyn Catalog>,
        sink: Arc<dyn PlaybackSink>,
        store: Arc<dyn HistoryStore>,
        config: &ScanConfig,
        events: broadcast::Sender<ScanEvent>,
    ) -> Self {
        Self {
            catalog,
            sink,
            store,
            history: ScanHistory::new(config.history_capacity),
            current: None,
            auto_open_links: config.auto_open_links,
            events,
        }
    }

    /// Restore history from the store
    ///
    /// A missing, unreadable, or corrupt stored history starts the
    /// session with an empty one; scanning must not be blocked by a bad
    /// persistence layer.
    pub async fn load_history(&mut self) {
        let json = match self.store.load().await {
            Ok(Some(json)) => json,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "failed to load scan history, starting empty");
                return;
            }
        };
        match ScanHistory::from_json(&json, self.history.capacity()) {
            Ok(history) => {
                info!(records = history.len(), "restored scan history");
                self.history = history;
            }
            Err(err) => {
                warn!(error = %err, "stored scan history is corrupt, starting empty");
            }
        }
    }

    /// Process one tag read end to end
    ///
    /// Every failure mode ends in an event rather than an error: the
    /// payload came from hardware, so there is no caller to propagate to.
    pub async fn handle_tag_read(&mut self, payload: &TagPayload) {
        let Some(text) = taptune_ndef::decode(payload) else {
            warn!("tag read produced no decodable text");
            self.emit(ScanEvent::DecodeFailed);
            return;
        };

        match self.catalog.get_by_id(&text).await {
            Ok(Some(descriptor)) => {
                info!(id = %descriptor.id, "tag matched catalog entry");
                self.record_and_play(descriptor).await;
            }
            Ok(None) => match classify(&text) {
                Some(descriptor) => {
                    info!(kind = %descriptor.kind, "tag classified as external link");
                    self.record_and_play(descriptor).await;
                }
                None => {
                    warn!(%text, "tag matched neither catalog nor classifier");
                    self.emit(ScanEvent::Unrecognized { text });
                }
            },
            // Do not guess while the catalog is unavailable; the tag may
            // well be catalogued.
            Err(err) => {
                warn!(error = %err, "catalog lookup failed");
                self.emit(ScanEvent::Error {
                    message: format!("catalog lookup failed: {err}"),
                });
            }
        }
    }

    /// Run a catalog entry through the pipeline as if its tag were scanned
    ///
    /// Unlike a hardware read, an unknown id is simply reported back to
    /// the caller; the classifier never runs for simulated scans.
    pub async fn simulate_scan(&mut self, id: &str) -> Result<Option<ContentDescriptor>> {
        match self.catalog.get_by_id(id).await? {
            Some(descriptor) => {
                info!(%id, "simulated scan resolved");
                self.record_and_play(descriptor.clone()).await;
                Ok(Some(descriptor))
            }
            None => {
                warn!(%id, "simulated scan found no catalog entry");
                Ok(None)
            }
        }
    }

    /// Play a catalog entry directly, without recording a scan
    ///
    /// Direct playback is a browsing action, not a scan, so it never
    /// touches the history.
    pub async fn play(&mut self, id: &str) -> Result<Option<ContentDescriptor>> {
        match self.catalog.get_by_id(id).await? {
            Some(descriptor) => {
                self.start_playback(descriptor.clone()).await;
                Ok(Some(descriptor))
            }
            None => {
                warn!(%id, "no catalog entry to play");
                Ok(None)
            }
        }
    }

    /// Drop all history, in memory and in the store
    pub async fn clear_history(&mut self) {
        self.history.clear();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear stored scan history");
        }
        self.emit(ScanEvent::HistoryChanged { length: 0 });
    }

    /// All retained scan records, newest first
    pub fn history_records(&self) -> Vec<ScanRecord> {
        self.history.iter().cloned().collect()
    }

    /// Number of retained scan records
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The most recently played content, if any
    pub fn current(&self) -> Option<ContentDescriptor> {
        self.current.clone()
    }

    async fn record_and_play(&mut self, descriptor: ContentDescriptor) {
        self.history.record(ScanRecord::new(descriptor.clone()));
        self.persist_history().await;
        self.emit(ScanEvent::HistoryChanged {
            length: self.history.len(),
        });
        self.start_playback(descriptor).await;
    }

    async fn start_playback(&mut self, descriptor: ContentDescriptor) {
        self.current = Some(descriptor.clone());
        self.emit(ScanEvent::NowPlaying {
            descriptor: descriptor.clone(),
        });

        if let Err(err) = self.sink.play(&descriptor).await {
            warn!(error = %err, id = %descriptor.id, "playback sink rejected content");
            self.emit(ScanEvent::Error {
                message: format!("playback failed: {err}"),
            });
        }

        if self.auto_open_links && descriptor.kind.is_external() {
            if let Some(url) = descriptor.primary_url() {
                self.emit(ScanEvent::ExternalLink {
                    url: url.to_string(),
                    kind: descriptor.kind,
                });
            }
        }
    }

    /// Persistence failures are logged and swallowed; losing history on
    /// restart is preferable to failing the scan that caused it.
    async fn persist_history(&mut self) {
        match self.history.to_json() {
            Ok(json) => {
                if let Err(err) = self.store.save(&json).await {
                    warn!(error = %err, "failed to persist scan history");
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to serialize scan history");
            }
        }
    }

    fn emit(&self, event: ScanEvent) {
        // Send only fails with no live receivers, which is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use taptune_catalog::CatalogSnapshot;
    use taptune_core::{ContentKind, TapError};
    use crate::store::MemoryHistoryStore;

    struct RecordingSink {
        plays: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                plays: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                plays: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn played(&self) -> Vec<String> {
            self.plays.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaybackSink for RecordingSink {
        async fn play(&self, descriptor: &ContentDescriptor) -> Result<()> {
            self.plays.lock().unwrap().push(descriptor.id.clone());
            if self.fail {
                return Err(TapError::playback("output device lost"));
            }
            Ok(())
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl Catalog for FailingCatalog {
        async fn get_by_id(&self, _id: &str) -> Result<Option<ContentDescriptor>> {
            Err(TapError::catalog("catalog offline"))
        }

        async fn list_all(&self) -> Result<Vec<ContentDescriptor>> {
            Err(TapError::catalog("catalog offline"))
        }
    }

    fn test_catalog() -> Arc<CatalogSnapshot> {
        Arc::new(CatalogSnapshot::from_descriptors(vec![
            ContentDescriptor::local("jazz", "Jazz Hour", "/audio/jazz.mp3"),
            ContentDescriptor::spotify("focus", "Focus Beats", "https://open.spotify.com/playlist/f"),
        ]))
    }

    struct Fixture {
        dispatcher: ScanDispatcher,
        sink: Arc<RecordingSink>,
        store: Arc<MemoryHistoryStore>,
        events: broadcast::Receiver<ScanEvent>,
    }

    fn fixture_with(catalog: Arc<dyn Catalog>, sink: Arc<RecordingSink>) -> Fixture {
        let store = Arc::new(MemoryHistoryStore::new());
        let (tx, events) = broadcast::channel(32);
        let dispatcher = ScanDispatcher::new(
            catalog,
            sink.clone(),
            store.clone(),
            &ScanConfig::default(),
            tx,
        );
        Fixture {
            dispatcher,
            sink,
            store,
            events,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(test_catalog(), Arc::new(RecordingSink::new()))
    }

    fn drain(events: &mut broadcast::Receiver<ScanEvent>) -> Vec<ScanEvent> {
        let mut collected = Vec::new();
        while let Ok(event) = events.try_recv() {
            collected.push(event);
        }
        collected
    }

    #[tokio::test]
    async fn catalog_hit_records_and_plays() {
        let mut fx = fixture();
        let payload = TagPayload::Bytes(b"\x02enjazz".to_vec());

        fx.dispatcher.handle_tag_read(&payload).await;

        assert_eq!(fx.sink.played(), ["jazz"]);
        assert_eq!(fx.dispatcher.history_len(), 1);
        assert_eq!(
            fx.dispatcher.current().map(|d| d.id),
            Some("jazz".to_string())
        );

        let events = drain(&mut fx.events);
        assert!(matches!(
            events[0],
            ScanEvent::HistoryChanged { length: 1 }
        ));
        assert!(matches!(&events[1], ScanEvent::NowPlaying { descriptor } if descriptor.id == "jazz"));
        // Local content never opens externally
        assert!(!events
            .iter()
            .any(|e| matches!(e, ScanEvent::ExternalLink { .. })));

        // The scan reached the store
        assert!(fx.store.load().await.unwrap().unwrap().contains("jazz"));
    }

    #[tokio::test]
    async fn classifier_fallback_emits_external_link() {
        let mut fx = fixture();
        let payload = TagPayload::Bytes(b"\x01youtube.com/watch?v=abc".to_vec());

        fx.dispatcher.handle_tag_read(&payload).await;

        assert_eq!(fx.dispatcher.history_len(), 1);
        let events = drain(&mut fx.events);
        assert!(events.iter().any(|e| matches!(
            e,
            ScanEvent::ExternalLink { url, kind: ContentKind::Youtube }
                if url == "http://www.youtube.com/watch?v=abc"
        )));
    }

    #[tokio::test]
    async fn unrecognized_text_leaves_history_untouched() {
        let mut fx = fixture();
        let payload = TagPayload::Bytes(b"\x02ennot-in-catalog".to_vec());

        fx.dispatcher.handle_tag_read(&payload).await;

        assert_eq!(fx.dispatcher.history_len(), 0);
        assert!(fx.sink.played().is_empty());
        let events = drain(&mut fx.events);
        assert_eq!(
            events,
            [ScanEvent::Unrecognized {
                text: "not-in-catalog".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn undecodable_payload_reports_decode_failure() {
        let mut fx = fixture();
        let payload = TagPayload::Bytes(vec![0x04, 0xFF, 0xFE]);

        fx.dispatcher.handle_tag_read(&payload).await;

        let events = drain(&mut fx.events);
        assert_eq!(events, [ScanEvent::DecodeFailed]);
        assert_eq!(fx.dispatcher.history_len(), 0);
    }

    #[tokio::test]
    async fn catalog_error_reports_without_guessing() {
        let mut fx = fixture_with(Arc::new(FailingCatalog), Arc::new(RecordingSink::new()));
        // Would classify as YouTube if the classifier were consulted
        let payload = TagPayload::Bytes(b"\x04youtube.com/watch?v=abc".to_vec());

        fx.dispatcher.handle_tag_read(&payload).await;

        assert_eq!(fx.dispatcher.history_len(), 0);
        let events = drain(&mut fx.events);
        assert!(matches!(&events[0], ScanEvent::Error { message } if message.contains("catalog")));
    }

    #[tokio::test]
    async fn simulate_scan_is_catalog_only() {
        let mut fx = fixture();

        let hit = fx.dispatcher.simulate_scan("focus").await.unwrap();
        assert_eq!(hit.map(|d| d.id), Some("focus".to_string()));
        assert_eq!(fx.dispatcher.history_len(), 1);

        // A URL that the classifier would accept still misses
        let miss = fx
            .dispatcher
            .simulate_scan("https://youtu.be/abc")
            .await
            .unwrap();
        assert!(miss.is_none());
        assert_eq!(fx.dispatcher.history_len(), 1);
    }

    #[tokio::test]
    async fn play_does_not_record_history() {
        let mut fx = fixture();

        let played = fx.dispatcher.play("jazz").await.unwrap();
        assert_eq!(played.map(|d| d.id), Some("jazz".to_string()));

        assert_eq!(fx.dispatcher.history_len(), 0);
        assert_eq!(fx.sink.played(), ["jazz"]);
        assert_eq!(
            fx.dispatcher.current().map(|d| d.id),
            Some("jazz".to_string())
        );

        let events = drain(&mut fx.events);
        assert!(events
            .iter()
            .any(|e| matches!(e, ScanEvent::NowPlaying { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ScanEvent::HistoryChanged { .. })));
    }

    #[tokio::test]
    async fn sink_failure_still_records_the_scan() {
        let mut fx = fixture_with(test_catalog(), Arc::new(RecordingSink::failing()));

        fx.dispatcher.simulate_scan("jazz").await.unwrap();

        assert_eq!(fx.dispatcher.history_len(), 1);
        let events = drain(&mut fx.events);
        assert!(matches!(&events[2], ScanEvent::Error { message } if message.contains("playback")));
    }

    #[tokio::test]
    async fn clear_history_empties_memory_and_store() {
        let mut fx = fixture();
        fx.dispatcher.simulate_scan("jazz").await.unwrap();
        assert!(fx.store.load().await.unwrap().is_some());
        drain(&mut fx.events);

        fx.dispatcher.clear_history().await;

        assert_eq!(fx.dispatcher.history_len(), 0);
        assert_eq!(fx.store.load().await.unwrap(), None);
        let events = drain(&mut fx.events);
        assert_eq!(events, [ScanEvent::HistoryChanged { length: 0 }]);
    }

    #[tokio::test]
    async fn load_history_restores_persisted_scans() {
        let mut fx = fixture();
        fx.dispatcher.simulate_scan("jazz").await.unwrap();
        fx.dispatcher.simulate_scan("focus").await.unwrap();
        let stored = fx.store.load().await.unwrap().unwrap();

        let store = Arc::new(MemoryHistoryStore::with_value(stored));
        let (tx, _rx) = broadcast::channel(8);
        let mut dispatcher = ScanDispatcher::new(
            test_catalog(),
            Arc::new(RecordingSink::new()),
            store,
            &ScanConfig::default(),
            tx,
        );
        dispatcher.load_history().await;

        let records = dispatcher.history_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].descriptor.id, "focus");
        assert_eq!(records[1].descriptor.id, "jazz");
    }

    #[tokio::test]
    async fn corrupt_stored_history_starts_empty() {
        let store = Arc::new(MemoryHistoryStore::with_value("{broken"));
        let (tx, _rx) = broadcast::channel(8);
        let mut dispatcher = ScanDispatcher::new(
            test_catalog(),
            Arc::new(RecordingSink::new()),
            store,
            &ScanConfig::default(),
            tx,
        );

        dispatcher.load_history().await;
        assert_eq!(dispatcher.history_len(), 0);
    }
}
