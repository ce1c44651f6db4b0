#![allow(dead_code)]

pub mod mock_engine;

use mock_engine::MockEngineFactory;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voicenav::assistant::{AssistantEvent, Scheduler, Timer, VoiceAssistant};
use voicenav::engine::{EngineEvent, SessionId, TranscriptSegment};
use voicenav::language::Language;
use voicenav::navigation::{LanguageSwitcher, Navigator, Section};

/// Scheduler that only records; tests fire timers by hand
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pending: Arc<Mutex<Vec<(Duration, Timer)>>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> Vec<(Duration, Timer)> {
        self.pending.lock().unwrap().clone()
    }

    /// Remove and return every pending timer matching `pred`
    pub fn take_where(&self, pred: impl Fn(&Timer) -> bool) -> Vec<Timer> {
        let mut pending = self.pending.lock().unwrap();
        let mut taken = Vec::new();
        pending.retain(|(_, timer)| {
            if pred(timer) {
                taken.push(*timer);
                false
            } else {
                true
            }
        });
        taken
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer) {
        self.pending.lock().unwrap().push((delay, timer));
    }
}

/// Navigator that records every section it was asked to show
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub visited: Arc<Mutex<Vec<Section>>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<Section> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, section: Section) {
        self.visited.lock().unwrap().push(section);
    }
}

/// Language collaborator that records every change request
#[derive(Clone)]
pub struct RecordingLanguage {
    current: Arc<Mutex<Language>>,
    pub changes: Arc<Mutex<Vec<Language>>>,
}

impl RecordingLanguage {
    pub fn new(lang: Language) -> Self {
        Self {
            current: Arc::new(Mutex::new(lang)),
            changes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn changes(&self) -> Vec<Language> {
        self.changes.lock().unwrap().clone()
    }

    /// Change the page language without going through the assistant
    pub fn set(&self, lang: Language) {
        *self.current.lock().unwrap() = lang;
    }
}

impl LanguageSwitcher for RecordingLanguage {
    fn current_language(&self) -> Language {
        *self.current.lock().unwrap()
    }

    fn change_language(&mut self, language: Language) {
        self.changes.lock().unwrap().push(language);
        *self.current.lock().unwrap() = language;
    }
}

/// An assistant wired to recording collaborators
pub struct Harness {
    pub assistant: VoiceAssistant,
    pub engines: MockEngineFactory,
    pub navigator: RecordingNavigator,
    pub language: RecordingLanguage,
    pub scheduler: ManualScheduler,
}

impl Harness {
    pub fn new(lang: Language) -> Self {
        Self::with_factory(lang, MockEngineFactory::new())
    }

    pub fn with_factory(lang: Language, engines: MockEngineFactory) -> Self {
        let navigator = RecordingNavigator::default();
        let language = RecordingLanguage::new(lang);
        let scheduler = ManualScheduler::default();
        let assistant = VoiceAssistant::new(
            Box::new(engines.clone()),
            Box::new(navigator.clone()),
            Box::new(language.clone()),
            Box::new(scheduler.clone()),
        );
        Self {
            assistant,
            engines,
            navigator,
            language,
            scheduler,
        }
    }

    pub fn send(&mut self, event: AssistantEvent) {
        self.assistant.handle(event);
    }

    /// Deliver an engine event on behalf of `session`
    pub fn engine(&mut self, session: SessionId, event: EngineEvent) {
        self.send(AssistantEvent::Engine { session, event });
    }

    /// Start listening and confirm the engine came up
    pub fn start_listening(&mut self) -> SessionId {
        self.send(AssistantEvent::StartListening);
        let id = self.assistant.session_id().expect("no session after start");
        self.engine(id, EngineEvent::Start);
        id
    }

    pub fn say(&mut self, text: &str) {
        let id = self.assistant.session_id().expect("not listening");
        self.engine(
            id,
            EngineEvent::Result(vec![TranscriptSegment::final_text(text)]),
        );
    }

    /// Fire every pending timer matching `pred`, once
    pub fn fire(&mut self, pred: impl Fn(&Timer) -> bool) -> usize {
        let timers = self.scheduler.take_where(pred);
        let count = timers.len();
        for timer in timers {
            self.send(AssistantEvent::Timer(timer));
        }
        count
    }

    pub fn fire_restarts(&mut self) -> usize {
        self.fire(|t| matches!(t, Timer::Restart(_)))
    }

    pub fn fire_rebuilds(&mut self) -> usize {
        self.fire(|t| matches!(t, Timer::Rebuild { .. }))
    }

    pub fn fire_help(&mut self) -> usize {
        self.fire(|t| matches!(t, Timer::OpenHelp { .. }))
    }

    pub fn fire_hides(&mut self) -> usize {
        self.fire(|t| {
            matches!(
                t,
                Timer::HideStatus { .. } | Timer::HideEcho { .. } | Timer::HideFeedback { .. }
            )
        })
    }
}
