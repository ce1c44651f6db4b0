//! Recognition Session
//!
//! One lifecycle of a continuous speech engine. The session keeps its own
//! intent flag (`active`) because the engine's notion of "running" lags
//! behind: start is requested long before the engine confirms it, and the
//! engine stops itself after silence. `active` is the single source of truth
//! for "should this session be listening right now".
//!
//! A session is bound to one language for its whole life. Switching languages
//! means discarding it and creating a new one.

use crate::engine::{RecognitionEngine, SessionId, TranscriptSegment};
use crate::error::RecognitionError;
use crate::language::Language;
use std::fmt;
use tracing::debug;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Created, or stopped on request
    #[default]
    Idle,
    /// Start requested, engine has not confirmed yet
    Starting,
    /// Engine confirmed capture
    Listening,
    /// Engine ended on its own; a restart is scheduled
    Restarting,
    /// Unrecoverable error
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "Idle"),
            SessionPhase::Starting => write!(f, "Starting"),
            SessionPhase::Listening => write!(f, "Listening"),
            SessionPhase::Restarting => write!(f, "Restarting"),
            SessionPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// What a result event produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptUpdate {
    /// Final text; supersedes any interim text of the same event
    Final(String),
    Interim(String),
    Empty,
}

pub struct RecognitionSession {
    id: SessionId,
    language: Language,
    active: bool,
    phase: SessionPhase,
    engine: Box<dyn RecognitionEngine>,
    released: bool,
    interim_text: String,
    final_text: String,
}

impl fmt::Debug for RecognitionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecognitionSession")
            .field("id", &self.id)
            .field("language", &self.language)
            .field("active", &self.active)
            .field("phase", &self.phase)
            .finish()
    }
}

impl RecognitionSession {
    pub fn new(id: SessionId, language: Language, engine: Box<dyn RecognitionEngine>) -> Self {
        Self {
            id,
            language,
            active: false,
            phase: SessionPhase::Idle,
            engine,
            released: false,
            interim_text: String::new(),
            final_text: String::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn interim_text(&self) -> &str {
        &self.interim_text
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    /// Mark the session active, then ask the engine to start
    pub fn begin(&mut self) -> Result<(), RecognitionError> {
        self.active = true;
        self.phase = SessionPhase::Starting;
        debug!("Session {} starting ({})", self.id, self.language);
        self.engine.start()
    }

    /// Engine confirmed capture
    pub fn on_start(&mut self) {
        if self.active {
            self.phase = SessionPhase::Listening;
        }
    }

    /// Fold the segments of a result event into interim and final text
    pub fn on_result(&mut self, segments: &[TranscriptSegment]) -> TranscriptUpdate {
        if !self.active {
            return TranscriptUpdate::Empty;
        }

        let mut interim = String::new();
        let mut final_text = String::new();
        let mut has_final = false;
        for segment in segments {
            if segment.is_final {
                has_final = true;
                final_text.push_str(&segment.text);
            } else {
                interim.push_str(&segment.text);
            }
        }

        if has_final {
            // A final result closes the utterance; blank ones are dropped
            self.interim_text.clear();
            if final_text.trim().is_empty() {
                return TranscriptUpdate::Empty;
            }
            self.final_text = final_text.clone();
            return TranscriptUpdate::Final(final_text);
        }

        self.interim_text = interim;
        if self.interim_text.is_empty() {
            TranscriptUpdate::Empty
        } else {
            TranscriptUpdate::Interim(self.interim_text.clone())
        }
    }

    /// Engine ended. Returns true when the end was not requested and the
    /// engine must be restarted.
    pub fn on_end(&mut self) -> bool {
        if self.active {
            self.phase = SessionPhase::Restarting;
            true
        } else {
            if self.phase != SessionPhase::Failed {
                self.phase = SessionPhase::Idle;
            }
            false
        }
    }

    /// Start the engine again after an unrequested end
    pub fn restart(&mut self) -> Result<(), RecognitionError> {
        if !self.active {
            return Ok(());
        }
        self.phase = SessionPhase::Starting;
        debug!("Session {} restarting", self.id);
        self.engine.start()
    }

    /// Clear intent first, then halt the engine
    pub fn stop(&mut self) {
        self.active = false;
        self.phase = SessionPhase::Idle;
        self.release();
    }

    /// Unrecoverable error: clear intent and release the engine
    pub fn fail(&mut self) {
        self.active = false;
        self.phase = SessionPhase::Failed;
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.engine.stop();
        }
    }
}

impl Drop for RecognitionSession {
    fn drop(&mut self) {
        self.active = false;
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        starts: usize,
        stops: usize,
        fail_start: bool,
    }

    struct FakeEngine(Arc<Mutex<Calls>>);

    impl RecognitionEngine for FakeEngine {
        fn start(&mut self) -> Result<(), RecognitionError> {
            let mut calls = self.0.lock().unwrap();
            calls.starts += 1;
            if calls.fail_start {
                Err(RecognitionError::AlreadyStarted)
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) {
            self.0.lock().unwrap().stops += 1;
        }
    }

    fn session() -> (RecognitionSession, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let engine = Box::new(FakeEngine(Arc::clone(&calls)));
        (
            RecognitionSession::new(SessionId(1), Language::En, engine),
            calls,
        )
    }

    #[test]
    fn test_begin_sets_intent_before_confirmation() {
        let (mut session, calls) = session();
        session.begin().unwrap();
        assert!(session.is_active());
        assert_eq!(session.phase(), SessionPhase::Starting);
        assert_eq!(calls.lock().unwrap().starts, 1);

        session.on_start();
        assert_eq!(session.phase(), SessionPhase::Listening);
    }

    #[test]
    fn test_final_supersedes_interim() {
        let (mut session, _) = session();
        session.begin().unwrap();

        let update = session.on_result(&[TranscriptSegment::interim("go to")]);
        assert_eq!(update, TranscriptUpdate::Interim("go to".into()));

        let update = session.on_result(&[
            TranscriptSegment::final_text("go to contact"),
            TranscriptSegment::interim(" and"),
        ]);
        assert_eq!(update, TranscriptUpdate::Final("go to contact".into()));
        assert_eq!(session.interim_text(), "");
        assert_eq!(session.final_text(), "go to contact");
    }

    #[test]
    fn test_interim_segments_are_joined() {
        let (mut session, _) = session();
        session.begin().unwrap();
        let update = session.on_result(&[
            TranscriptSegment::interim("open "),
            TranscriptSegment::interim("history"),
        ]);
        assert_eq!(update, TranscriptUpdate::Interim("open history".into()));
    }

    #[test]
    fn test_end_restarts_only_when_active() {
        let (mut session, calls) = session();
        session.begin().unwrap();
        assert!(session.on_end());
        assert_eq!(session.phase(), SessionPhase::Restarting);
        session.restart().unwrap();
        assert_eq!(calls.lock().unwrap().starts, 2);

        session.stop();
        assert!(!session.on_end());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_blank_final_drops_the_cycle() {
        let (mut session, _) = session();
        session.begin().unwrap();
        let update = session.on_result(&[
            TranscriptSegment::final_text("  "),
            TranscriptSegment::interim("hist"),
        ]);
        assert_eq!(update, TranscriptUpdate::Empty);
        assert_eq!(session.interim_text(), "");
        assert_eq!(session.final_text(), "");
    }

    #[test]
    fn test_engine_released_once() {
        let (mut session, calls) = session();
        session.begin().unwrap();
        session.stop();
        session.stop();
        drop(session);
        assert_eq!(calls.lock().unwrap().stops, 1);
    }

    #[test]
    fn test_drop_releases_engine() {
        let (mut session, calls) = session();
        calls.lock().unwrap().fail_start = true;
        assert!(session.begin().is_err());
        drop(session);
        assert_eq!(calls.lock().unwrap().stops, 1);
    }

    #[test]
    fn test_results_ignored_after_stop() {
        let (mut session, _) = session();
        session.begin().unwrap();
        session.stop();
        let update = session.on_result(&[TranscriptSegment::final_text("history")]);
        assert_eq!(update, TranscriptUpdate::Empty);
    }
}
