//! Tuning module - car tuning selection, physics derivation and previews
//!
//! The selection model and derivation are pure; `TuningState` owns the
//! preview/confirm/cancel protocol and queues visual requests for the renderer.

mod physics;
mod state;
mod types;

pub use physics::{DerivedPhysics, DisplayStats, PhysicsBaseline, derive};
pub use state::{DerivedView, PreviewState, TuningState, VisualDescriptor, VisualRequest};
pub use types::{
    ColorOption, EngineOption, Rgb, TuningCategory, TuningOption, TuningSelection, WheelOption,
};
