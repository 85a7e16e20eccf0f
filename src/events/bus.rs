//! Event Bus - outbox between the tuning session and its collaborators
//!
//! The session emits shop events and renderer requests to the bus:
//! - The showroom drains pending events and applies visual requests
//! - Drained events move to `processed` until the SQLite logger stores them
//!
//! Nothing in the session waits on a consumer; every emit is fire-and-forget.

use super::types::GarageEvent;

/// Timestamped event for the event bus
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Time in milliseconds since session start
    pub time_ms: u32,
    /// The event data
    pub event: GarageEvent,
}

/// Ordered outbox of garage events
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    /// Events emitted and not yet consumed
    pending: Vec<BusEvent>,

    /// Events that have been consumed (for logging)
    processed: Vec<BusEvent>,

    /// Current elapsed time in milliseconds (for timestamping)
    elapsed_ms: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the elapsed time (called each frame)
    pub fn update_time(&mut self, elapsed_secs: f32) {
        self.elapsed_ms = (elapsed_secs * 1000.0) as u32;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: GarageEvent) {
        self.pending.push(BusEvent {
            time_ms: self.elapsed_ms,
            event,
        });
    }

    /// Emit multiple events at once
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = GarageEvent>) {
        let time_ms = self.elapsed_ms;
        self.pending
            .extend(events.into_iter().map(|event| BusEvent { time_ms, event }));
    }

    /// Drain pending events, moving them to processed
    pub fn drain(&mut self) -> Vec<BusEvent> {
        let events = std::mem::take(&mut self.pending);
        self.processed.extend(events.iter().cloned());
        events
    }

    /// Take processed events as (time_ms, GarageEvent) tuples for the logger
    pub fn take_processed(&mut self) -> Vec<(u32, GarageEvent)> {
        std::mem::take(&mut self.processed)
            .into_iter()
            .map(|e| (e.time_ms, e.event))
            .collect()
    }

    /// Check if the bus has any pending events
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
