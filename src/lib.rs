//! Garage - vehicle tuning with a budget-gated shop, built with Bevy
//!
//! This crate provides the tuning state machine, the purchase flow, the
//! session event log and the showroom systems organized into modules.

// Core modules
pub mod constants;
pub mod error;
pub mod events;
pub mod settings;
pub mod testing;

// Garage logic modules
pub mod drive;
pub mod shop;
pub mod showroom;
pub mod tuning;

// Re-export commonly used types for convenience
pub use constants::*;
pub use drive::{CarBody, CarVelocity, engine_impulse, hold_parked, limit_velocity};
pub use error::TuningError;
pub use events::{BusEvent, EventBus, GarageEvent, SqliteEventLogger};
pub use settings::{GARAGE_CONFIG_FILE, GarageConfig, SESSION_DB_FILE};
pub use shop::{
    Budget, FlowPhase, PendingPurchase, PriceTable, PurchaseFlow, PurchaseLedger, Receipt,
};
pub use showroom::GaragePlugin;
pub use tuning::{
    ColorOption, DerivedPhysics, DerivedView, DisplayStats, EngineOption, PhysicsBaseline, Rgb,
    TuningCategory, TuningOption, TuningSelection, TuningState, VisualRequest, WheelOption,
};
