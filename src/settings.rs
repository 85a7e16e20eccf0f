//! Garage configuration
//!
//! Loads the car's physics baseline, the starting budget and the shop price
//! table from a garage.json file in the config directory. Missing fields fall
//! back to the defaults in `constants.rs`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::STARTING_BUDGET;
use crate::shop::PriceTable;
use crate::tuning::PhysicsBaseline;

/// Path to the garage config file
pub const GARAGE_CONFIG_FILE: &str = "config/garage.json";

/// Default SQLite database for session audit logs
pub const SESSION_DB_FILE: &str = "db/garage.db";

fn default_budget() -> u64 {
    STARTING_BUDGET
}

/// Everything a tuning session is built from
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarageConfig {
    #[serde(default)]
    pub baseline: PhysicsBaseline,
    #[serde(default = "default_budget")]
    pub starting_budget: u64,
    #[serde(default)]
    pub prices: PriceTable,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self {
            baseline: PhysicsBaseline::default(),
            starting_budget: default_budget(),
            prices: PriceTable::default(),
        }
    }
}

impl GarageConfig {
    /// Load from the default path, or return defaults if it is missing or invalid
    pub fn load() -> Self {
        Self::load_or_default(Path::new(GARAGE_CONFIG_FILE))
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(config) => {
                info!("Loaded garage config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject baselines the physics collaborator cannot use
    pub fn validate(&self) -> Result<(), String> {
        let b = &self.baseline;
        let fields = [
            ("max_speed", b.max_speed),
            ("acceleration", b.acceleration),
            ("power", b.power),
            ("mass", b.mass),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("baseline.{} must be positive, got {}", name, value));
            }
        }
        if !b.drag_coefficient.is_finite() || b.drag_coefficient < 0.0 {
            return Err(format!(
                "baseline.drag_coefficient must be non-negative, got {}",
                b.drag_coefficient
            ));
        }
        Ok(())
    }

    /// Save config to `path`, creating the directory if needed
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        info!("Saved garage config to {}", path.display());
        Ok(())
    }
}
