//! Garage - preview and buy car upgrades, then take the car for a drive
//!
//! Main entry point: argument parsing, config/logger setup and app wiring.

use bevy::prelude::*;
use std::path::PathBuf;

use garage::{
    BACKGROUND_COLOR, GARAGE_CONFIG_FILE, GaragePlugin, GarageConfig, PurchaseFlow,
    SESSION_DB_FILE, SqliteEventLogger,
};

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let arg_value = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    };

    let config_path = arg_value("--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(GARAGE_CONFIG_FILE));
    let db_path = arg_value("--log-db")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SESSION_DB_FILE));
    let no_log = args.iter().any(|a| a == "--no-log");

    // Load garage config (uses defaults if file doesn't exist)
    let mut config = GarageConfig::load_or_default(&config_path);

    // Write defaults on first run so the file exists for editing
    if !config_path.exists()
        && let Err(e) = config.save(&config_path)
    {
        warn!("Failed to save initial config: {}", e);
    }

    // --budget overrides the config for this run only
    if let Some(budget) = arg_value("--budget").and_then(|s| s.parse::<u64>().ok()) {
        config.starting_budget = budget;
    }

    let flow = PurchaseFlow::from_config(&config);

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Garage".into(),
            ..default()
        }),
        ..default()
    }))
    .insert_resource(ClearColor(BACKGROUND_COLOR))
    .insert_resource(config)
    .insert_resource(flow);

    if !no_log {
        match SqliteEventLogger::new(&db_path, "showroom") {
            Ok(logger) => {
                app.insert_resource(logger);
            }
            Err(e) => warn!("Session logging disabled: {}", e),
        }
    }

    app.add_plugins(GaragePlugin).run();
}
