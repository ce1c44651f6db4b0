//! Mock Recognition Engine for Testing
//!
//! Records every engine the assistant creates and every start/stop it issues.

use std::sync::{Arc, Mutex};
use voicenav::engine::{EngineFactory, EngineSettings, RecognitionEngine, SessionId};
use voicenav::error::RecognitionError;

/// What happened to one created engine
#[derive(Debug, Clone)]
pub struct EngineRecord {
    pub session: SessionId,
    pub settings: EngineSettings,
    pub starts: usize,
    pub stops: usize,
}

impl EngineRecord {
    /// Started and never released
    pub fn is_live(&self) -> bool {
        self.starts > 0 && self.stops == 0
    }
}

#[derive(Default)]
struct FactoryState {
    available: bool,
    engines: Vec<EngineRecord>,
    fail_next_start: Option<RecognitionError>,
}

/// Factory handing out [`MockEngine`]s; clones share the same records
#[derive(Clone)]
pub struct MockEngineFactory {
    state: Arc<Mutex<FactoryState>>,
}

impl MockEngineFactory {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FactoryState {
                available: true,
                ..Default::default()
            })),
        }
    }

    /// A platform without speech recognition
    pub fn unavailable() -> Self {
        let factory = Self::new();
        factory.state.lock().unwrap().available = false;
        factory
    }

    /// Make the next `start()` on any engine fail with `err`
    pub fn fail_next_start(&self, err: RecognitionError) {
        self.state.lock().unwrap().fail_next_start = Some(err);
    }

    pub fn engines(&self) -> Vec<EngineRecord> {
        self.state.lock().unwrap().engines.clone()
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().engines.len()
    }

    pub fn live_engines(&self) -> Vec<EngineRecord> {
        self.engines().into_iter().filter(|e| e.is_live()).collect()
    }
}

impl EngineFactory for MockEngineFactory {
    fn is_available(&self) -> bool {
        self.state.lock().unwrap().available
    }

    fn create(
        &mut self,
        session: SessionId,
        settings: EngineSettings,
    ) -> Box<dyn RecognitionEngine> {
        let mut state = self.state.lock().unwrap();
        state.engines.push(EngineRecord {
            session,
            settings,
            starts: 0,
            stops: 0,
        });
        Box::new(MockEngine {
            state: self.state.clone(),
            index: state.engines.len() - 1,
        })
    }
}

pub struct MockEngine {
    state: Arc<Mutex<FactoryState>>,
    index: usize,
}

impl RecognitionEngine for MockEngine {
    fn start(&mut self) -> Result<(), RecognitionError> {
        let mut state = self.state.lock().unwrap();
        if let Some(err) = state.fail_next_start.take() {
            return Err(err);
        }
        state.engines[self.index].starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.state.lock().unwrap().engines[self.index].stops += 1;
    }
}
