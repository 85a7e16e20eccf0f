//! Garage event log
//!
//! Provides the outbox the tuning session writes to, a compact text format
//! for events, and SQLite storage for session audit trails.

mod bus;
mod format;
mod sqlite_logger;
mod types;

pub use bus::{BusEvent, EventBus};
pub use format::{parse_event, serialize_event};
pub use sqlite_logger::{
    SessionRow, SqliteEventLogger, flush_events_to_sqlite, list_sessions, load_session_events,
};
pub use types::GarageEvent;
