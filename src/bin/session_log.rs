//! Session Log Tool - inspect garage sessions stored in SQLite
//!
//! Usage:
//!   cargo run --bin session-log                          # List sessions in db/garage.db
//!   cargo run --bin session-log -- db/scenarios.db       # List sessions in another db
//!   cargo run --bin session-log -- --latest              # Print the newest session
//!   cargo run --bin session-log -- --session <ID> --raw  # Print stored lines verbatim

use std::path::PathBuf;

use garage::events::{GarageEvent, list_sessions, load_session_events, serialize_event};
use garage::settings::SESSION_DB_FILE;
use rusqlite::{Connection, OpenFlags};

fn main() {
    let config = LogConfig::from_args();

    if config.show_help {
        print_help();
        return;
    }

    if !config.db_path.exists() {
        println!("No database at {}", config.db_path.display());
        println!("\nRun the showroom (without --no-log) to record a session:");
        println!("  cargo run");
        std::process::exit(1);
    }

    let conn = match Connection::open_with_flags(&config.db_path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to open {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };

    let sessions = match list_sessions(&conn) {
        Ok(sessions) => sessions,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let selected = if config.latest {
        sessions.first().map(|s| s.id.clone())
    } else {
        config.session.clone()
    };

    let Some(session_id) = selected else {
        println!("{} sessions in {}\n", sessions.len(), config.db_path.display());
        for s in &sessions {
            println!(
                "  {}  {}  {:<24} {:>5} events",
                s.id, s.created_at, s.session_type, s.event_count
            );
        }
        return;
    };

    let events = match load_session_events(&conn, &session_id) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if events.is_empty() {
        println!("No events for session {}", session_id);
        return;
    }

    println!("Session {}\n", session_id);
    for (time_ms, event) in &events {
        if config.raw {
            println!("{}", serialize_event(*time_ms, event));
        } else if !event.is_visual() || config.visuals {
            println!("  {:>7.2}s  {}", *time_ms as f32 / 1000.0, describe(event));
        }
    }

    print_summary(&events);
}

fn describe(event: &GarageEvent) -> String {
    match event {
        GarageEvent::SessionStart { timestamp, .. } => format!("session started at {}", timestamp),
        GarageEvent::Config(config) => format!(
            "config: budget {}, max speed {}, power {}",
            config.starting_budget, config.baseline.max_speed, config.baseline.power
        ),
        GarageEvent::SessionReset { budget } => format!("reset (budget {})", budget),
        GarageEvent::CategoryOpened { category } => format!("opened {}", category),
        GarageEvent::OptionPreviewed { option, price } => {
            format!("preview {} ({})", option, price)
        }
        GarageEvent::PreviewCancelled { option } => format!("cancel {}", option),
        GarageEvent::PurchaseConfirmed { option, price, budget } => {
            format!("BOUGHT {} for {} -> {} left", option, price, budget)
        }
        GarageEvent::PurchaseRejected { option, price, budget } => {
            format!("REJECTED {} ({} > {})", option, price, budget)
        }
        GarageEvent::AllPartsTuned => "all parts tuned".to_string(),
        GarageEvent::Visual(request) => format!("visual {:?}", request),
    }
}

fn print_summary(events: &[(u32, GarageEvent)]) {
    let mut bought = 0;
    let mut rejected = 0;
    let mut spent = 0u64;
    for (_, event) in events {
        match event {
            GarageEvent::PurchaseConfirmed { price, .. } => {
                bought += 1;
                spent += price;
            }
            GarageEvent::PurchaseRejected { .. } => rejected += 1,
            GarageEvent::SessionReset { .. } => {
                bought = 0;
                spent = 0;
            }
            _ => {}
        }
    }
    println!(
        "\n{} events, {} purchases ({} spent), {} rejected",
        events.len(),
        bought,
        spent,
        rejected
    );
}

/// Configuration for the session log tool
struct LogConfig {
    db_path: PathBuf,
    session: Option<String>,
    latest: bool,
    raw: bool,
    visuals: bool,
    show_help: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(SESSION_DB_FILE),
            session: None,
            latest: false,
            raw: false,
            visuals: false,
            show_help: false,
        }
    }
}

impl LogConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--session" | "-s" => {
                    if i + 1 < args.len() {
                        config.session = Some(args[i + 1].clone());
                        i += 1;
                    }
                }
                "--latest" | "-l" => config.latest = true,
                "--raw" => config.raw = true,
                "--visuals" => config.visuals = true,
                "--help" | "-h" => config.show_help = true,
                arg if !arg.starts_with('-') => {
                    // Positional argument: db path
                    config.db_path = PathBuf::from(arg);
                }
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Session Log Tool - inspect recorded garage sessions

USAGE:
    cargo run --bin session-log -- [DB_PATH] [OPTIONS]

ARGUMENTS:
    DB_PATH             SQLite database path (default: {})

OPTIONS:
    --session, -s <ID>  Print one session's events
    --latest, -l        Print the newest session
    --raw               Print stored lines in compact format
    --visuals           Include renderer requests in the listing
    --help, -h          Show this help
"#,
        SESSION_DB_FILE
    );
}
