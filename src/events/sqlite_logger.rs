//! SQLite Event Logger - audit trail for tuning sessions
//!
//! Every garage event flows through this logger into SQLite so a session's
//! previews, purchases and rejections can be inspected afterwards.

use bevy::prelude::*;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;

use super::format::{parse_event, serialize_event};
use super::types::GarageEvent;
use crate::shop::PurchaseFlow;

/// Resource for logging events to SQLite
///
/// The database connection is wrapped in a Mutex so the logger can live in a
/// Bevy resource.
#[derive(Resource)]
pub struct SqliteEventLogger {
    conn: Mutex<Connection>,
    session_id: String,
}

/// Row of the sessions table
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: String,
    pub created_at: String,
    pub session_type: String,
    pub event_count: u64,
}

impl SqliteEventLogger {
    /// Open (or create) the database at `db_path` and start a new session
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `session_type` - Type of session (e.g., "showroom", "scenario")
    pub fn new(db_path: &Path, session_type: &str) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            let _ = std::fs::create_dir_all(parent);
        }

        let conn = Connection::open(db_path)?;

        // Parallel scenario runs open the same file; wait on locks before switching to WAL
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        init_schema(&conn)?;
        let session_id = create_session(&conn, session_type)?;
        info!("Logging garage session {} to {}", session_id, db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            session_id,
        })
    }

    /// Logger backed by an in-memory database
    pub fn in_memory(session_type: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        let session_id = create_session(&conn, session_type)?;
        Ok(Self {
            conn: Mutex::new(conn),
            session_id,
        })
    }

    /// Log a single event
    pub fn log_event(&self, time_ms: u32, event: &GarageEvent) {
        self.log_events(&[(time_ms, event.clone())]);
    }

    /// Log multiple events in one transaction
    pub fn log_events(&self, events: &[(u32, GarageEvent)]) {
        if events.is_empty() {
            return;
        }

        let mut conn = match self.conn.lock() {
            Ok(c) => c,
            Err(_) => return,
        };

        let tx = match conn.transaction() {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Failed to begin event transaction: {}", e);
                return;
            }
        };

        for (time_ms, event) in events {
            let data = serialize_event(*time_ms, event);
            let event_type = event.type_code();

            if let Err(e) = tx.execute(
                "INSERT INTO events (session_id, time_ms, event_type, data) VALUES (?1, ?2, ?3, ?4)",
                params![self.session_id, time_ms, event_type, data],
            ) {
                // Dropping the transaction rolls it back
                warn!("Failed to log event: {}", e);
                return;
            }
        }

        if let Err(e) = tx.commit() {
            warn!("Failed to commit events: {}", e);
        }
    }

    /// Get the session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get event count for the current session
    pub fn event_count(&self) -> Option<u64> {
        let conn = self.conn.lock().ok()?;
        conn.query_row(
            "SELECT COUNT(*) FROM events WHERE session_id = ?1",
            params![self.session_id],
            |row| row.get(0),
        )
        .ok()
    }

    /// Events logged for the current session, oldest first
    pub fn session_events(&self) -> Result<Vec<(u32, GarageEvent)>, String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        load_session_events(&conn, &self.session_id)
    }
}

/// Initialize the database schema
fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            session_type TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY,
            session_id TEXT REFERENCES sessions(id),
            time_ms INTEGER NOT NULL,
            event_type TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_events_session ON events(session_id);
        CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
        "#,
    )?;
    Ok(())
}

/// Create a new session and return its ID
fn create_session(conn: &Connection, session_type: &str) -> Result<String, rusqlite::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO sessions (id, created_at, session_type) VALUES (?1, ?2, ?3)",
        params![id, created_at, session_type],
    )?;

    Ok(id)
}

/// All sessions in a database, newest first
pub fn list_sessions(conn: &Connection) -> Result<Vec<SessionRow>, String> {
    let mut stmt = conn
        .prepare(
            r#"SELECT s.id, s.created_at, s.session_type,
                      (SELECT COUNT(*) FROM events e WHERE e.session_id = s.id)
               FROM sessions s ORDER BY s.created_at DESC"#,
        )
        .map_err(|e| format!("Failed to query sessions: {}", e))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                created_at: row.get(1)?,
                session_type: row.get(2)?,
                event_count: row.get(3)?,
            })
        })
        .map_err(|e| format!("Failed to query sessions: {}", e))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to read session row: {}", e))
}

/// Load and decode a session's events, oldest first
///
/// Times come from the `time_ms` column; the `T:` prefix in `data` wraps
/// every 100 s.
pub fn load_session_events(
    conn: &Connection,
    session_id: &str,
) -> Result<Vec<(u32, GarageEvent)>, String> {
    let mut stmt = conn
        .prepare("SELECT time_ms, data FROM events WHERE session_id = ?1 ORDER BY id")
        .map_err(|e| format!("Failed to query events: {}", e))?;

    let rows = stmt
        .query_map(params![session_id], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| format!("Failed to query events: {}", e))?;

    let mut events = Vec::new();
    for row in rows {
        let (time_ms, line) = row.map_err(|e| format!("Failed to read event row: {}", e))?;
        match parse_event(&line) {
            Some((_, event)) => events.push((time_ms, event)),
            None => warn!("Skipping unparseable event line: {}", line),
        }
    }
    Ok(events)
}

/// System to flush drained session events to SQLite
pub fn flush_events_to_sqlite(
    mut flow: ResMut<PurchaseFlow>,
    logger: Option<Res<SqliteEventLogger>>,
) {
    let events = flow.events_mut().take_processed();
    let Some(logger) = logger else {
        return;
    };
    if !events.is_empty() {
        logger.log_events(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{ColorOption, TuningCategory, TuningOption, VisualRequest};

    #[test]
    fn test_log_and_reload_events() {
        let logger = SqliteEventLogger::in_memory("test").unwrap();

        logger.log_event(100, &GarageEvent::CategoryOpened {
            category: TuningCategory::Color,
        });
        logger.log_events(&[
            (150, GarageEvent::OptionPreviewed {
                option: TuningOption::Color(ColorOption::Red),
                price: 10_000,
            }),
            (150, GarageEvent::Visual(VisualRequest::SetPaint {
                rgb: ColorOption::Red.rgb(),
            })),
            (400, GarageEvent::PurchaseConfirmed {
                option: TuningOption::Color(ColorOption::Red),
                price: 10_000,
                budget: 140_000,
            }),
        ]);

        assert_eq!(logger.event_count(), Some(4));

        let events = logger.session_events().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].0, 100);
        assert_eq!(events[3].1.name(), "PurchaseConfirmed");
    }

    #[test]
    fn test_list_sessions() {
        let logger = SqliteEventLogger::in_memory("scenario").unwrap();
        logger.log_event(0, &GarageEvent::AllPartsTuned);

        let conn = logger.conn.lock().unwrap();
        let sessions = list_sessions(&conn).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, logger.session_id());
        assert_eq!(sessions[0].session_type, "scenario");
        assert_eq!(sessions[0].event_count, 1);
    }

    #[test]
    fn test_reload_keeps_times_past_100_seconds() {
        let logger = SqliteEventLogger::in_memory("showroom").unwrap();
        logger.log_event(105_000, &GarageEvent::AllPartsTuned);
        logger.log_event(250_340, &GarageEvent::SessionReset { budget: 150_000 });

        let events = logger.session_events().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], (105_000, GarageEvent::AllPartsTuned));
        assert_eq!(events[1], (250_340, GarageEvent::SessionReset { budget: 150_000 }));
    }

    #[test]
    fn test_file_logger_opens_twice() {
        let path = std::env::temp_dir().join(format!(
            "garage_logger_{}.db",
            uuid::Uuid::new_v4()
        ));

        let first = SqliteEventLogger::new(&path, "scenario").unwrap();
        let second = SqliteEventLogger::new(&path, "scenario").unwrap();
        first.log_event(10, &GarageEvent::AllPartsTuned);
        second.log_event(20, &GarageEvent::SessionReset { budget: 150_000 });

        assert_eq!(first.event_count(), Some(1));
        assert_eq!(second.event_count(), Some(1));
        assert_ne!(first.session_id(), second.session_id());

        drop(first);
        drop(second);
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }
}
