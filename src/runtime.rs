//! Assistant event loop
//!
//! Owns the [`VoiceAssistant`] on a single task and feeds it user, engine and
//! timer events from one channel. Timers become tokio sleeps that post the
//! timer back into the same channel, so every mutation happens on this loop.

use crate::assistant::{AssistantEvent, Scheduler, Timer, VoiceAssistant};
use crate::i18n::Catalog;
use crate::presenter::{self, View};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, info};

pub type EventSender = UnboundedSender<AssistantEvent>;

/// Create the channel every event source posts into
pub fn event_channel() -> (EventSender, UnboundedReceiver<AssistantEvent>) {
    mpsc::unbounded_channel()
}

/// [`Scheduler`] backed by tokio timers
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: EventSender,
}

impl TokioScheduler {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(AssistantEvent::Timer(timer));
        });
    }
}

pub struct AssistantRuntime {
    assistant: VoiceAssistant,
    events: UnboundedReceiver<AssistantEvent>,
    catalog: Catalog,
    views: watch::Sender<View>,
}

impl AssistantRuntime {
    pub fn new(
        assistant: VoiceAssistant,
        events: UnboundedReceiver<AssistantEvent>,
        catalog: Catalog,
    ) -> Self {
        let view = render(&assistant, &catalog);
        let (views, _) = watch::channel(view);
        Self {
            assistant,
            events,
            catalog,
            views,
        }
    }

    /// Receiver of rendered views; updated after every event that changes one
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.views.subscribe()
    }

    /// Run until [`AssistantEvent::Shutdown`] or until every sender is gone.
    /// Returns the assistant for inspection.
    pub async fn run(mut self) -> VoiceAssistant {
        info!("✅ Voice assistant ready");
        while let Some(event) = self.events.recv().await {
            debug!("Event: {:?}", event);
            let shutdown = event == AssistantEvent::Shutdown;
            self.assistant.handle(event);

            let view = render(&self.assistant, &self.catalog);
            self.views.send_if_modified(|current| {
                if *current == view {
                    false
                } else {
                    *current = view;
                    true
                }
            });

            if shutdown {
                break;
            }
        }
        info!("👋 Voice assistant stopped");
        self.assistant
    }
}

fn render(assistant: &VoiceAssistant, catalog: &Catalog) -> View {
    presenter::render(
        assistant.state(),
        catalog,
        assistant.current_language(),
        assistant.is_available(),
    )
}
