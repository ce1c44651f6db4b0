//! Speech Recognition Engine boundary
//!
//! The assistant drives a continuous, interim-result-emitting recognizer
//! through [`RecognitionEngine`]. Engines report back asynchronously by
//! posting [`EngineEvent`]s tagged with the [`SessionId`] they were created
//! for, so events from a superseded session can be told apart.
//!
//! Backends:
//! - Terminal: typed lines stand in for speech (see [`terminal`])

pub mod terminal;

use crate::assistant::AssistantEvent;
use crate::error::RecognitionError;
use crate::language::Language;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

pub use terminal::{TerminalEngine, TerminalEngineFactory, TerminalFeed};

/// Identity token of one recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an engine instance is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Recognition locale, e.g. `zh-TW` or `en`
    pub language_tag: String,
    /// Keep capturing across utterances
    pub continuous: bool,
    /// Report provisional results while the user speaks
    pub interim_results: bool,
}

impl EngineSettings {
    pub fn for_language(lang: Language) -> Self {
        Self {
            language_tag: lang.engine_tag().to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// One alternative of a recognition result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub text: String,
    pub is_final: bool,
}

impl TranscriptSegment {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// Callbacks an engine fires, in the order it fires them.
///
/// `End` always comes last, after any terminal `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Capture actually started
    Start,
    /// New results since the last event
    Result(Vec<TranscriptSegment>),
    Error(RecognitionError),
    /// Capture stopped, requested or not
    End,
}

/// A live speech capture engine
pub trait RecognitionEngine: Send {
    /// Request capture start. Fails if the engine is already running or the
    /// platform refuses.
    fn start(&mut self) -> Result<(), RecognitionError>;

    /// Request capture halt. The engine still fires `End` afterwards.
    fn stop(&mut self);
}

/// Creates engines; also answers whether speech capture exists at all
pub trait EngineFactory: Send {
    /// Whether the platform offers speech recognition
    fn is_available(&self) -> bool;

    /// Build a fresh engine for `session`
    fn create(&mut self, session: SessionId, settings: EngineSettings)
        -> Box<dyn RecognitionEngine>;
}

/// Sending half used by engines to report events for their session
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    session: SessionId,
    tx: UnboundedSender<AssistantEvent>,
}

impl EngineEventSink {
    pub fn new(session: SessionId, tx: UnboundedSender<AssistantEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Post an event; returns false once the assistant loop is gone
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.tx
            .send(AssistantEvent::Engine {
                session: self.session,
                event,
            })
            .is_ok()
    }
}
