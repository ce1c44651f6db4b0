//! Voice Assistant
//!
//! The navigation/language state machine. Every input (user clicks, engine
//! callbacks, fired timers) arrives as an [`AssistantEvent`] and goes through
//! [`VoiceAssistant::handle`], the single transition function. Nothing here
//! blocks or sleeps; delays are requested from a [`Scheduler`].
//!
//! Exactly one [`RecognitionSession`] is current at a time. Engine events and
//! restart timers carry the id of the session that produced them and are
//! dropped when that session is no longer current, so a superseded session
//! can never resurrect itself.

mod dispatch;
pub mod state;
pub mod timers;

pub use state::{CommandEcho, Feedback, HelpPanel, StatusMessage, VoiceAssistantState};
pub use timers::{Scheduler, Timer};

use crate::config::Timings;
use crate::engine::{EngineEvent, EngineFactory, EngineSettings, SessionId};
use crate::error::RecognitionError;
use crate::interpreter::interpret;
use crate::keywords::KeywordTables;
use crate::language::Language;
use crate::navigation::{LanguageSwitcher, Navigator};
use crate::session::{RecognitionSession, SessionPhase, TranscriptUpdate};
use timers::{bump, Tickets};
use tracing::{debug, error, info, warn};

/// Inputs to the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// Toggle button: start when idle, stop when listening
    Toggle,
    StartListening,
    StopListening,
    /// Help panel closed by the user
    CloseHelp,
    /// The page switched language on its own (language selector)
    UiLanguageChanged(Language),
    Engine {
        session: SessionId,
        event: EngineEvent,
    },
    Timer(Timer),
    /// Stop listening and leave the event loop
    Shutdown,
}

pub struct VoiceAssistant {
    timings: Timings,
    tables: KeywordTables,
    engines: Box<dyn EngineFactory>,
    navigator: Box<dyn Navigator>,
    language: Box<dyn LanguageSwitcher>,
    scheduler: Box<dyn Scheduler>,
    session: Option<RecognitionSession>,
    next_session: u64,
    state: VoiceAssistantState,
    tickets: Tickets,
}

impl VoiceAssistant {
    pub fn new(
        engines: Box<dyn EngineFactory>,
        navigator: Box<dyn Navigator>,
        language: Box<dyn LanguageSwitcher>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            timings: Timings::default(),
            tables: KeywordTables::builtin(),
            engines,
            navigator,
            language,
            scheduler,
            session: None,
            next_session: 1,
            state: VoiceAssistantState::default(),
            tickets: Tickets::default(),
        }
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_keyword_tables(mut self, tables: KeywordTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn state(&self) -> &VoiceAssistantState {
        &self.state
    }

    pub fn keyword_tables(&self) -> &KeywordTables {
        &self.tables
    }

    pub fn current_language(&self) -> Language {
        self.language.current_language()
    }

    /// Whether speech capture exists on this platform
    pub fn is_available(&self) -> bool {
        self.engines.is_available()
    }

    /// Intent flag of the current session
    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id())
    }

    pub fn session_phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(|s| s.phase())
    }

    pub fn session_language(&self) -> Option<Language> {
        self.session.as_ref().map(|s| s.language())
    }

    /// Apply one event
    pub fn handle(&mut self, event: AssistantEvent) {
        match event {
            AssistantEvent::Toggle => {
                if self.is_active() {
                    self.stop();
                } else {
                    self.start();
                }
            }
            AssistantEvent::StartListening => self.start(),
            AssistantEvent::StopListening | AssistantEvent::Shutdown => self.stop(),
            AssistantEvent::CloseHelp => self.dismiss_help(),
            AssistantEvent::UiLanguageChanged(lang) => self.on_ui_language_changed(lang),
            AssistantEvent::Engine { session, event } => self.on_engine_event(session, event),
            AssistantEvent::Timer(timer) => self.on_timer(timer),
        }
    }

    /// Start listening in the current UI language
    pub fn start(&mut self) {
        let lang = self.language.current_language();
        self.start_session(lang);
    }

    /// Stop listening. Clears intent before the engine is asked to halt and
    /// cancels a pending language rebuild. No-op when nothing is listening.
    pub fn stop(&mut self) {
        bump(&mut self.tickets.rebuild);
        let Some(mut session) = self.session.take() else {
            return;
        };
        session.stop();
        info!("🛑 Stopped listening (session {})", session.id());
        self.state.listening = false;
        self.hide_status();
    }

    /// The one routine that creates sessions, for user starts and language
    /// rebuilds alike.
    fn start_session(&mut self, lang: Language) {
        if self.is_active() {
            debug!("Already listening, start ignored");
            return;
        }
        if !self.engines.is_available() {
            debug!("Speech recognition not available, start ignored");
            return;
        }

        // Only an inactive leftover can remain here; release it first so two
        // engines never coexist.
        self.session = None;

        let id = SessionId(self.next_session);
        self.next_session += 1;
        let engine = self
            .engines
            .create(id, EngineSettings::for_language(lang));
        let mut session = RecognitionSession::new(id, lang, engine);

        self.dismiss_help();
        self.state.listening = true;
        self.show_status(StatusMessage::listening());

        let started = session.begin();
        self.session = Some(session);
        match started {
            Ok(()) => info!("🎙️ Listening (session {}, {})", id, lang),
            Err(e) => {
                error!("❌ Could not start recognition: {}", e);
                self.fail_session();
            }
        }
    }

    /// Unrecoverable error: drop the session, clear intent, hide status
    fn fail_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.fail();
        }
        self.state.listening = false;
        self.hide_status();
        self.show_feedback(Feedback::Error);
    }

    fn current_session_mut(&mut self, id: SessionId) -> Option<&mut RecognitionSession> {
        self.session.as_mut().filter(|s| s.id() == id)
    }

    fn on_engine_event(&mut self, id: SessionId, event: EngineEvent) {
        if self.current_session_mut(id).is_none() {
            debug!("Ignoring {:?} from stale session {}", event, id);
            return;
        }

        match event {
            EngineEvent::Start => {
                let active = match self.current_session_mut(id) {
                    Some(session) => {
                        session.on_start();
                        session.is_active()
                    }
                    None => false,
                };
                if active {
                    self.state.listening = true;
                    self.show_status(StatusMessage::listening());
                }
            }
            EngineEvent::Result(segments) => {
                let update = match self.current_session_mut(id) {
                    Some(session) => session.on_result(&segments),
                    None => TranscriptUpdate::Empty,
                };
                match update {
                    TranscriptUpdate::Final(text) => {
                        info!("📝 Heard: '{}'", text);
                        self.show_status(StatusMessage::Recognized(text.clone()));
                        self.handle_transcript(&text);
                    }
                    TranscriptUpdate::Interim(text) => {
                        self.show_status(StatusMessage::Listening {
                            interim: Some(text),
                        });
                    }
                    TranscriptUpdate::Empty => {}
                }
            }
            EngineEvent::Error(err) => self.on_engine_error(err),
            EngineEvent::End => {
                let restart = match self.current_session_mut(id) {
                    Some(session) => session.on_end(),
                    None => false,
                };
                if restart {
                    debug!("Session {} ended unexpectedly, restarting", id);
                    self.scheduler
                        .schedule(self.timings.restart_delay, Timer::Restart(id));
                } else {
                    debug!("Session {} ended", id);
                    self.session = None;
                }
            }
        }
    }

    fn on_engine_error(&mut self, err: RecognitionError) {
        if err.is_fatal() {
            warn!("🚫 Recognition not permitted: {}", err);
            self.fail_session();
        } else {
            // Intent is untouched: the End that follows restarts the engine.
            warn!("⚠️ Recognition error: {}", err);
            self.show_status(StatusMessage::Error);
            self.show_feedback(Feedback::Error);
        }
    }

    fn on_ui_language_changed(&mut self, lang: Language) {
        let bound = match self.session.as_ref() {
            Some(session) if session.is_active() => session.language(),
            _ => return,
        };
        if bound != lang {
            info!("🌐 UI language is now {}, rebuilding recognition", lang);
            self.rebuild_session(lang);
        }
    }

    /// Tear the current session down and schedule a new one in `lang`.
    /// Sessions are never re-tagged in place.
    fn rebuild_session(&mut self, lang: Language) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
        self.state.listening = false;
        self.hide_status();

        let ticket = bump(&mut self.tickets.rebuild);
        self.scheduler.schedule(
            self.timings.language_settle,
            Timer::Rebuild {
                language: lang,
                ticket,
            },
        );
    }

    fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Restart(id) => {
                let result = match self.current_session_mut(id) {
                    Some(session) if session.is_active() => session.restart(),
                    _ => {
                        debug!("Dropping restart for stale session {}", id);
                        return;
                    }
                };
                if let Err(e) = result {
                    error!("❌ Failed to restart recognition: {}", e);
                    self.fail_session();
                }
            }
            Timer::Rebuild { language, ticket } => {
                if ticket != self.tickets.rebuild {
                    debug!("Language rebuild cancelled");
                    return;
                }
                // The page may have switched again while this timer was pending
                let current = self.language.current_language();
                if current != language {
                    debug!("Rebuild requested for {}, UI is now {}", language, current);
                }
                self.start_session(current);
            }
            Timer::OpenHelp { ticket } => {
                if ticket == self.tickets.help {
                    self.open_help();
                }
            }
            Timer::HideStatus { ticket } => {
                if ticket == self.tickets.status {
                    if self.is_active() {
                        self.state.status = Some(StatusMessage::listening());
                    } else {
                        self.state.status = None;
                    }
                }
            }
            Timer::HideEcho { ticket } => {
                if ticket == self.tickets.echo {
                    self.state.command_echo = None;
                }
            }
            Timer::HideFeedback { ticket } => {
                if ticket == self.tickets.feedback {
                    self.state.feedback = None;
                }
            }
        }
    }

    fn handle_transcript(&mut self, transcript: &str) {
        let lang = self.language.current_language();
        match interpret(transcript, lang, &self.tables) {
            Some(command) => self.dispatch(command),
            None => self.dispatch_unknown(transcript),
        }
    }

    fn show_status(&mut self, status: StatusMessage) {
        let ticket = bump(&mut self.tickets.status);
        if status.is_transient() {
            self.scheduler
                .schedule(self.timings.status_hide, Timer::HideStatus { ticket });
        }
        self.state.status = Some(status);
    }

    fn hide_status(&mut self) {
        bump(&mut self.tickets.status);
        self.state.status = None;
    }

    fn show_echo(&mut self, echo: CommandEcho) {
        let ticket = bump(&mut self.tickets.echo);
        self.scheduler
            .schedule(self.timings.echo_hide, Timer::HideEcho { ticket });
        self.state.command_echo = Some(echo);
    }

    fn show_feedback(&mut self, feedback: Feedback) {
        let ticket = bump(&mut self.tickets.feedback);
        self.scheduler
            .schedule(self.timings.feedback_hide, Timer::HideFeedback { ticket });
        self.state.feedback = Some(feedback);
    }

    fn open_help(&mut self) {
        let lang = self.language.current_language();
        let phrases = self
            .tables
            .table_for(lang)
            .map(|table| table.help_phrases())
            .unwrap_or_default();
        self.state.help = Some(HelpPanel {
            language: lang,
            phrases,
            languages: Language::ALL.to_vec(),
        });
    }

    /// Close help and cancel a pending delayed opening
    fn dismiss_help(&mut self) {
        bump(&mut self.tickets.help);
        self.state.help = None;
    }
}
