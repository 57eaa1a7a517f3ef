/// Scripted tag readers for the console
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use taptune_core::{ReaderError, ReaderEvent, TagPayload, TagReader};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Delay before each scripted read
///
/// Keeps output readable and gives a subscriber attached right after
/// startup time to see the first event.
const READ_INTERVAL: Duration = Duration::from_millis(250);

/// Tag reader driven by hex-encoded payload lines
///
/// Each non-empty line of the script is one tag read: the line is decoded
/// from hex into the raw NDEF payload bytes. Blank lines and lines starting
/// with `#` are skipped; a line that is not valid hex reports a reader
/// failure and the script continues. When the script runs out, the event
/// channel closes and the scan session ends.
pub struct ScriptedTagReader {
    source: ScriptSource,
    session: Mutex<Option<JoinHandle<()>>>,
}

enum ScriptSource {
    File(PathBuf),
    Stdin,
}

impl ScriptedTagReader {
    /// Read tag payloads from a script file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ScriptSource::File(path.into()),
            session: Mutex::new(None),
        }
    }

    /// Read tag payloads from standard input
    pub fn from_stdin() -> Self {
        Self {
            source: ScriptSource::Stdin,
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TagReader for ScriptedTagReader {
    async fn is_supported(&self) -> Result<bool, ReaderError> {
        Ok(true)
    }

    /// Start feeding the script; restarting replays it from the top
    async fn start_scan(&self, events: mpsc::Sender<ReaderEvent>) -> Result<(), ReaderError> {
        let mut session = self.session.lock().await;
        if let Some(previous) = session.take() {
            previous.abort();
        }

        let task = match &self.source {
            ScriptSource::File(path) => {
                let file = File::open(path).await.map_err(|error| {
                    ReaderError::platform(format!("cannot open {}: {error}", path.display()))
                })?;
                tokio::spawn(feed_lines(BufReader::new(file), events))
            }
            ScriptSource::Stdin => {
                tokio::spawn(feed_lines(BufReader::new(tokio::io::stdin()), events))
            }
        };

        *session = Some(task);
        Ok(())
    }

    async fn stop_scan(&self) -> Result<(), ReaderError> {
        if let Some(task) = self.session.lock().await.take() {
            task.abort();
        }
        Ok(())
    }
}

async fn feed_lines<R>(source: R, events: mpsc::Sender<ReaderEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = source.lines();
    let mut line_number = 0usize;

    loop {
        // Pace the feed; a subscriber attached right after startup must not
        // miss the first read
        tokio::time::sleep(READ_INTERVAL).await;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                let failure = ReaderError::platform(format!("script read failed: {error}"));
                let _ = events.send(ReaderEvent::Failed(failure)).await;
                break;
            }
        };
        line_number += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event = match hex::decode(line) {
            Ok(bytes) => ReaderEvent::Read(TagPayload::Bytes(bytes)),
            Err(error) => ReaderEvent::Failed(ReaderError::platform(format!(
                "line {line_number}: invalid hex: {error}"
            ))),
        };
        if events.send(event).await.is_err() {
            break;
        }
    }
}

/// Reader for commands that never touch tag hardware
pub struct NullTagReader;

#[async_trait]
impl TagReader for NullTagReader {
    async fn is_supported(&self) -> Result<bool, ReaderError> {
        Ok(false)
    }

    async fn start_scan(&self, _events: mpsc::Sender<ReaderEvent>) -> Result<(), ReaderError> {
        Err(ReaderError::Unsupported)
    }

    async fn stop_scan(&self) -> Result<(), ReaderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_read(event: Option<ReaderEvent>) -> Vec<u8> {
        match event {
            Some(ReaderEvent::Read(TagPayload::Bytes(bytes))) => bytes,
            other => panic!("expected a tag read, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn feeds_hex_lines_as_reads() {
        let script = "# well-known text record for 'jazz'\n02656e6a617a7a\n\n02656e78\n";
        let (sender, mut events) = mpsc::channel(8);

        feed_lines(script.as_bytes(), sender).await;

        assert_eq!(expect_read(events.recv().await), b"\x02enjazz");
        assert_eq!(expect_read(events.recv().await), b"\x02enx");
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_hex_reports_a_failure_and_continues() {
        let script = "not hex at all\n02656e6a617a7a\n";
        let (sender, mut events) = mpsc::channel(8);

        feed_lines(script.as_bytes(), sender).await;

        match events.recv().await {
            Some(ReaderEvent::Failed(ReaderError::Platform(message))) => {
                assert!(message.contains("line 1"), "unexpected message: {message}");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
        assert_eq!(expect_read(events.recv().await), b"\x02enjazz");
    }

    #[tokio::test(start_paused = true)]
    async fn file_script_feeds_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.txt");
        std::fs::write(&path, "02656e6a617a7a\n").unwrap();

        let reader = ScriptedTagReader::from_file(&path);
        assert_eq!(reader.is_supported().await, Ok(true));

        let (sender, mut events) = mpsc::channel(8);
        reader.start_scan(sender).await.unwrap();

        assert_eq!(expect_read(events.recv().await), b"\x02enjazz");
        // Script exhausted: the channel closes
        assert!(events.recv().await.is_none());

        reader.stop_scan().await.unwrap();
    }

    #[tokio::test]
    async fn missing_script_file_fails_start() {
        let reader = ScriptedTagReader::from_file("no-such-script.txt");
        let (sender, _events) = mpsc::channel(1);

        assert!(matches!(
            reader.start_scan(sender).await,
            Err(ReaderError::Platform(_))
        ));
    }

    #[tokio::test]
    async fn null_reader_reports_unsupported() {
        let reader = NullTagReader;
        assert_eq!(reader.is_supported().await, Ok(false));

        let (sender, _events) = mpsc::channel(1);
        assert_eq!(
            reader.start_scan(sender).await,
            Err(ReaderError::Unsupported)
        );
    }
}
