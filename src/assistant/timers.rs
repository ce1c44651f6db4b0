//! Delayed work requested by the assistant
//!
//! The assistant never sleeps. It asks a [`Scheduler`] to hand a [`Timer`]
//! back after a delay and re-validates it when it fires: restart timers carry
//! the session id, the others carry a ticket that is invalidated whenever the
//! thing they would touch changes in between.

use crate::engine::SessionId;
use crate::language::Language;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Restart the engine of a session that ended on its own
    Restart(SessionId),
    /// Build the session for a freshly switched language
    Rebuild { language: Language, ticket: u64 },
    OpenHelp { ticket: u64 },
    HideStatus { ticket: u64 },
    HideEcho { ticket: u64 },
    HideFeedback { ticket: u64 },
}

/// Delivers timers back to the assistant's event loop
pub trait Scheduler: Send {
    fn schedule(&mut self, delay: Duration, timer: Timer);
}

/// Current ticket per cancellable timer kind
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Tickets {
    pub status: u64,
    pub echo: u64,
    pub feedback: u64,
    pub help: u64,
    pub rebuild: u64,
}

/// Invalidate outstanding timers of one kind and return the new ticket
pub(crate) fn bump(ticket: &mut u64) -> u64 {
    *ticket = ticket.wrapping_add(1);
    *ticket
}
