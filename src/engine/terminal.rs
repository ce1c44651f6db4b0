//! Terminal-backed recognition engine
//!
//! Lines typed into the terminal play the role of speech:
//! - `text` is a final transcript
//! - `~text` is an interim transcript
//! - `!code` makes the engine report the error `code` (e.g. `!not-allowed`)
//!   and end, as a real engine does
//!
//! Like a continuous speech engine, capture ends by itself after a stretch of
//! silence (no input) and must be restarted by the owner. Lines typed while
//! no capture is running are discarded when the next one starts.

use super::{
    EngineEvent, EngineEventSink, EngineFactory, EngineSettings, RecognitionEngine, SessionId,
    TranscriptSegment,
};
use crate::assistant::AssistantEvent;
use crate::error::RecognitionError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Shared source of "spoken" lines
#[derive(Debug, Clone)]
pub struct TerminalFeed {
    lines: Arc<Mutex<UnboundedReceiver<String>>>,
}

impl TerminalFeed {
    /// Create a feed and the sender that pushes lines into it
    pub fn new() -> (UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                lines: Arc::new(Mutex::new(rx)),
            },
        )
    }
}

/// Parse one typed line into the event it stands for
pub fn parse_line(line: &str) -> Option<EngineEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(code) = line.strip_prefix('!') {
        return Some(EngineEvent::Error(RecognitionError::from_code(code)));
    }
    if let Some(text) = line.strip_prefix('~') {
        return Some(EngineEvent::Result(vec![TranscriptSegment::interim(
            text.trim(),
        )]));
    }
    Some(EngineEvent::Result(vec![TranscriptSegment::final_text(
        line,
    )]))
}

pub struct TerminalEngineFactory {
    feed: TerminalFeed,
    events: UnboundedSender<AssistantEvent>,
    silence_timeout: Duration,
}

impl TerminalEngineFactory {
    pub fn new(
        feed: TerminalFeed,
        events: UnboundedSender<AssistantEvent>,
        silence_timeout: Duration,
    ) -> Self {
        Self {
            feed,
            events,
            silence_timeout,
        }
    }
}

impl EngineFactory for TerminalEngineFactory {
    fn is_available(&self) -> bool {
        true
    }

    fn create(
        &mut self,
        session: SessionId,
        settings: EngineSettings,
    ) -> Box<dyn RecognitionEngine> {
        debug!(
            "Creating terminal engine for session {} ({})",
            session, settings.language_tag
        );
        Box::new(TerminalEngine {
            sink: EngineEventSink::new(session, self.events.clone()),
            feed: self.feed.clone(),
            settings,
            silence_timeout: self.silence_timeout,
            task: None,
        })
    }
}

pub struct TerminalEngine {
    sink: EngineEventSink,
    feed: TerminalFeed,
    settings: EngineSettings,
    silence_timeout: Duration,
    task: Option<JoinHandle<()>>,
}

impl TerminalEngine {
    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl RecognitionEngine for TerminalEngine {
    fn start(&mut self) -> Result<(), RecognitionError> {
        if self.is_running() {
            return Err(RecognitionError::AlreadyStarted);
        }

        let sink = self.sink.clone();
        let feed = self.feed.clone();
        let silence = self.silence_timeout;
        let tag = self.settings.language_tag.clone();

        self.task = Some(tokio::spawn(async move {
            capture(&sink, &feed, silence, &tag).await;
            sink.emit(EngineEvent::End);
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                task.abort();
                self.sink.emit(EngineEvent::End);
            }
        }
    }
}

impl Drop for TerminalEngine {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn capture(sink: &EngineEventSink, feed: &TerminalFeed, silence: Duration, tag: &str) {
    let mut lines = feed.lines.lock().await;

    // Lines typed while nothing was listening were never heard
    let mut dropped = 0;
    while lines.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        debug!("Discarded {} line(s) typed before capture started", dropped);
    }

    info!("🎙️ Terminal capture started ({}) - type to speak", tag);
    if !sink.emit(EngineEvent::Start) {
        return;
    }
    loop {
        let line = match tokio::time::timeout(silence, lines.recv()).await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(_) => {
                debug!("Silence timeout on session {}", sink.session());
                return;
            }
        };

        let Some(event) = parse_line(&line) else {
            continue;
        };
        let is_error = matches!(event, EngineEvent::Error(_));
        if !sink.emit(event) || is_error {
            return;
        }
    }
}
