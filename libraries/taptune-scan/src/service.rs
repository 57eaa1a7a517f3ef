//! Channel-driven scan service
//!
//! Owns the dispatcher and the reader session behind a single consumer
//! task. Handles send commands over an mpsc channel and reader events
//! arrive on their own channel; the task folds both into one serialized
//! stream, so every tag read is processed to completion before the next
//! input is looked at, no matter how the platform delivers callbacks.

use std::sync::Arc;

use taptune_core::{
    Catalog, ContentDescriptor, PlaybackSink, ReaderError, ReaderEvent, ScanRecord, TagReader,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dispatcher::ScanDispatcher;
use crate::error::{Result, ScanError};
use crate::events::ScanEvent;
use crate::session::{ReaderSession, ScanState, SessionSnapshot};
use crate::store::HistoryStore;
use crate::types::ScanConfig;

/// Commands accepted by the service task
enum ScanCommand {
    StartScan(oneshot::Sender<SessionSnapshot>),
    StopScan(oneshot::Sender<SessionSnapshot>),
    Simulate {
        id: String,
        reply: oneshot::Sender<taptune_core::Result<Option<ContentDescriptor>>>,
    },
    Play {
        id: String,
        reply: oneshot::Sender<taptune_core::Result<Option<ContentDescriptor>>>,
    },
    ClearHistory(oneshot::Sender<()>),
    GetHistory(oneshot::Sender<Vec<ScanRecord>>),
    GetCurrent(oneshot::Sender<Option<ContentDescriptor>>),
    GetSession(oneshot::Sender<SessionSnapshot>),
    PermissionChanged(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// One input drawn from either service channel
enum Input {
    Command(Option<ScanCommand>),
    Reader(Option<ReaderEvent>),
}

/// Cloneable handle to a running scan service
///
/// All methods go through the service's command channel, so results
/// reflect the state after every previously submitted command. Methods
/// fail with [`ScanError::ServiceStopped`] once the service task is gone.
#[derive(Clone)]
pub struct ScanHandle {
    commands: mpsc::Sender<ScanCommand>,
    events: broadcast::Sender<ScanEvent>,
}

impl ScanHandle {
    /// Subscribe to pipeline events
    ///
    /// Only events emitted after this call are delivered; a slow
    /// subscriber loses the oldest events rather than stalling the
    /// pipeline.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanEvent> {
        self.events.subscribe()
    }

    /// Start (or re-arm) scanning; returns the resulting session state
    pub async fn start_scan(&self) -> Result<SessionSnapshot> {
        self.request(ScanCommand::StartScan).await
    }

    /// Stop scanning; returns the resulting session state
    pub async fn stop_scan(&self) -> Result<SessionSnapshot> {
        self.request(ScanCommand::StopScan).await
    }

    /// Run a catalog entry through the scan pipeline without hardware
    ///
    /// Returns the resolved descriptor, or `None` if the id is not in
    /// the catalog.
    pub async fn simulate_scan(&self, id: &str) -> Result<Option<ContentDescriptor>> {
        let outcome = self
            .request(|reply| ScanCommand::Simulate {
                id: id.to_string(),
                reply,
            })
            .await?;
        Ok(outcome?)
    }

    /// Play a catalog entry directly, without recording a scan
    pub async fn play(&self, id: &str) -> Result<Option<ContentDescriptor>> {
        let outcome = self
            .request(|reply| ScanCommand::Play {
                id: id.to_string(),
                reply,
            })
            .await?;
        Ok(outcome?)
    }

    /// Drop all scan history, in memory and in the store
    pub async fn clear_history(&self) -> Result<()> {
        self.request(ScanCommand::ClearHistory).await
    }

    /// All retained scan records, newest first
    pub async fn history(&self) -> Result<Vec<ScanRecord>> {
        self.request(ScanCommand::GetHistory).await
    }

    /// The most recently played content, if any
    pub async fn current(&self) -> Result<Option<ContentDescriptor>> {
        self.request(ScanCommand::GetCurrent).await
    }

    /// Current reader session state
    pub async fn session(&self) -> Result<SessionSnapshot> {
        self.request(ScanCommand::GetSession).await
    }

    /// Tell the service reader permissions may have changed
    ///
    /// Clears a remembered denial so the next [`ScanHandle::start_scan`]
    /// asks the platform again.
    pub async fn permission_changed(&self) -> Result<SessionSnapshot> {
        self.request(ScanCommand::PermissionChanged).await
    }

    /// Stop the service task
    pub async fn shutdown(&self) {
        // An already-stopped service is fine
        let _ = self.commands.send(ScanCommand::Shutdown).await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ScanCommand,
    ) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| ScanError::ServiceStopped)?;
        response.await.map_err(|_| ScanError::ServiceStopped)
    }
}

/// The scan service task
///
/// Created with [`ScanService::spawn`]; interact with it through the
/// returned [`ScanHandle`].
pub struct ScanService {
    reader: Arc<dyn TagReader>,
    dispatcher: ScanDispatcher,
    session: ReaderSession,
    events: broadcast::Sender<ScanEvent>,
    reader_events: Option<mpsc::Receiver<ReaderEvent>>,
    reader_capacity: usize,
}

impl ScanService {
    /// Spawn the service task
    ///
    /// On startup the task restores persisted history, probes reader
    /// support, and arms a scan when the probe allows it. Commands sent
    /// through the handle are processed after that startup sequence. The
    /// task runs until [`ScanHandle::shutdown`] or until every handle is
    /// dropped.
    pub fn spawn(
        reader: Arc<dyn TagReader>,
        catalog: Arc<dyn Catalog>,
        sink: Arc<dyn PlaybackSink>,
        store: Arc<dyn HistoryStore>,
        config: ScanConfig,
    ) -> (ScanHandle, JoinHandle<()>) {
        let (commands, inbox) = mpsc::channel(config.command_capacity);
        let (events, _) = broadcast::channel(config.event_capacity);

        let service = Self {
            reader,
            dispatcher: ScanDispatcher::new(catalog, sink, store, &config, events.clone()),
            session: ReaderSession::new(),
            events: events.clone(),
            reader_events: None,
            reader_capacity: config.command_capacity,
        };

        let task = tokio::spawn(service.run(inbox));
        (ScanHandle { commands, events }, task)
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<ScanCommand>) {
        self.dispatcher.load_history().await;

        let before = self.session.snapshot();
        self.session.apply_probe(self.reader.is_supported().await);
        self.emit_session_if_changed(&before);
        if self.session.can_start() {
            self.start_scan().await;
        } else {
            info!(phase = ?self.session.snapshot().phase(), "scan not auto-started");
        }

        loop {
            let input = tokio::select! {
                command = inbox.recv() => Input::Command(command),
                event = next_reader_event(&mut self.reader_events) => Input::Reader(event),
            };

            match input {
                Input::Command(None) => break,
                Input::Command(Some(command)) => {
                    if !self.handle_command(command).await {
                        break;
                    }
                }
                Input::Reader(Some(event)) => self.handle_reader_event(event).await,
                Input::Reader(None) => self.reader_channel_closed(),
            }
        }

        debug!("scan service stopping");
        if self.session.snapshot().scan == ScanState::Scanning {
            if let Err(err) = self.reader.stop_scan().await {
                debug!(error = %err, "reader stop during shutdown failed");
            }
        }
    }

    /// Returns `false` when the service should stop
    async fn handle_command(&mut self, command: ScanCommand) -> bool {
        match command {
            ScanCommand::StartScan(reply) => {
                self.start_scan().await;
                let _ = reply.send(self.session.snapshot());
            }
            ScanCommand::StopScan(reply) => {
                self.stop_scan().await;
                let _ = reply.send(self.session.snapshot());
            }
            ScanCommand::Simulate { id, reply } => {
                let _ = reply.send(self.dispatcher.simulate_scan(&id).await);
            }
            ScanCommand::Play { id, reply } => {
                let _ = reply.send(self.dispatcher.play(&id).await);
            }
            ScanCommand::ClearHistory(reply) => {
                self.dispatcher.clear_history().await;
                let _ = reply.send(());
            }
            ScanCommand::GetHistory(reply) => {
                let _ = reply.send(self.dispatcher.history_records());
            }
            ScanCommand::GetCurrent(reply) => {
                let _ = reply.send(self.dispatcher.current());
            }
            ScanCommand::GetSession(reply) => {
                let _ = reply.send(self.session.snapshot());
            }
            ScanCommand::PermissionChanged(reply) => {
                let before = self.session.snapshot();
                self.session.permission_changed();
                self.emit_session_if_changed(&before);
                let _ = reply.send(self.session.snapshot());
            }
            ScanCommand::Shutdown => return false,
        }
        true
    }

    async fn start_scan(&mut self) {
        if !self.session.can_start() {
            debug!(phase = ?self.session.snapshot().phase(), "ignoring start request");
            return;
        }

        let before = self.session.snapshot();
        let (sender, receiver) = mpsc::channel(self.reader_capacity);
        let outcome = self.reader.start_scan(sender).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "reader failed to start");
        }
        self.session.apply_start_outcome(outcome);
        if self.session.snapshot().scan == ScanState::Scanning {
            info!("scan armed");
            self.reader_events = Some(receiver);
        }
        self.emit_session_if_changed(&before);
    }

    async fn stop_scan(&mut self) {
        let before = self.session.snapshot();
        if let Err(err) = self.reader.stop_scan().await {
            warn!(error = %err, "reader failed to stop");
        }
        // Idle either way; a reader that cannot stop is not kept armed
        self.session.apply_stop();
        self.reader_events = None;
        self.emit_session_if_changed(&before);
    }

    async fn handle_reader_event(&mut self, event: ReaderEvent) {
        match event {
            ReaderEvent::Read(payload) => {
                // Reads can be queued from before a stop; never act on them
                if self.session.snapshot().scan != ScanState::Scanning {
                    debug!("ignoring tag read outside an active scan");
                    return;
                }
                self.dispatcher.handle_tag_read(&payload).await;
            }
            ReaderEvent::Failed(err) => {
                warn!(error = %err, "reader reported an error");
                let before = self.session.snapshot();
                self.session.apply_reader_error(&err);
                self.emit_session_if_changed(&before);
                self.emit(ScanEvent::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    /// The reader dropped its event sender, which ends the scan
    fn reader_channel_closed(&mut self) {
        self.reader_events = None;
        if self.session.snapshot().scan == ScanState::Scanning {
            debug!("reader closed its event channel");
            let before = self.session.snapshot();
            self.session.apply_reader_error(&ReaderError::Stopped);
            self.emit_session_if_changed(&before);
        }
    }

    fn emit_session_if_changed(&self, before: &SessionSnapshot) {
        let now = self.session.snapshot();
        if now != *before {
            self.emit(ScanEvent::SessionChanged { session: now });
        }
    }

    fn emit(&self, event: ScanEvent) {
        // Send only fails with no live receivers, which is fine
        let _ = self.events.send(event);
    }
}

async fn next_reader_event(
    events: &mut Option<mpsc::Receiver<ReaderEvent>>,
) -> Option<ReaderEvent> {
    match events {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}
