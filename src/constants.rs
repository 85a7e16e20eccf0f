//! Tunable constants for the garage
//!
//! Baseline car physics, tuning multipliers, shop defaults and showroom
//! animation values all live here for easy tweaking.

use bevy::prelude::*;

// =============================================================================
// BASELINE CAR PHYSICS (SI-like units)
// =============================================================================

pub const BASE_MAX_SPEED: f32 = 60.0; // m/s
pub const BASE_ACCELERATION: f32 = 8.0; // m/s²
pub const BASE_POWER: f32 = 8000.0; // N
pub const BASE_MASS: f32 = 1200.0; // kg
pub const BASE_DRAG: f32 = 0.3; // Linear damping

// =============================================================================
// WHEEL TUNING (acceleration multiplier, absolute drag coefficient)
// =============================================================================

pub const WHEELS_BASIC_ACCEL: f32 = 1.05;
pub const WHEELS_BASIC_DRAG: f32 = 0.27;
pub const WHEELS_STREET_ACCEL: f32 = 1.10;
pub const WHEELS_STREET_DRAG: f32 = 0.25;
pub const WHEELS_SPORT_ACCEL: f32 = 1.15;
pub const WHEELS_SPORT_DRAG: f32 = 0.15;

// =============================================================================
// ENGINE TUNING (max speed multiplier, power multiplier)
// =============================================================================

pub const ENGINE_BASIC_SPEED: f32 = 1.10;
pub const ENGINE_BASIC_POWER: f32 = 1.20;
pub const ENGINE_STREET_SPEED: f32 = 1.15;
pub const ENGINE_STREET_POWER: f32 = 1.30;
pub const ENGINE_SPORT_SPEED: f32 = 1.25;
pub const ENGINE_SPORT_POWER: f32 = 1.40;

// =============================================================================
// DISPLAY CONVERSIONS
// =============================================================================

pub const MS_TO_KMH: f32 = 3.6; // m/s -> km/h
pub const SPRINT_TARGET_KMH: f32 = 100.0; // 0-100 km/h sprint
pub const POWER_PER_HORSEPOWER: f32 = 10.0; // Game units per displayed "hp"

// =============================================================================
// SHOP
// =============================================================================

pub const STARTING_BUDGET: u64 = 150_000;

pub const PRICE_COLOR_RED: u64 = 10_000;
pub const PRICE_COLOR_ORANGE: u64 = 10_000;
pub const PRICE_COLOR_MATTE_BLACK: u64 = 10_000;

pub const PRICE_WHEELS_BASIC: u64 = 5_000;
pub const PRICE_WHEELS_STREET: u64 = 15_000;
pub const PRICE_WHEELS_SPORT: u64 = 25_000;

pub const PRICE_ENGINE_BASIC: u64 = 10_000;
pub const PRICE_ENGINE_STREET: u64 = 20_000;
pub const PRICE_ENGINE_SPORT: u64 = 35_000;

// =============================================================================
// SHOWROOM ANIMATION
// =============================================================================

pub const SHAKE_SWINGS: usize = 3; // Left/right swings before settling
pub const SHAKE_STEP_SECS: f32 = 0.10; // Duration of each half swing
pub const SHAKE_TILT_DEG: f32 = 1.0; // First swing amplitude
pub const SHAKE_FADE: f32 = 0.7; // Amplitude multiplier per swing

pub const WHEEL_SWAP_SECS: f32 = 0.5; // Slide-in + full spin duration
pub const WHEEL_SWAP_OFFSET: f32 = 0.5; // Lateral start offset of the new wheel
pub const WHEEL_SWAP_MAX_DELAY: f32 = 0.1; // Random per-wheel start delay

// =============================================================================
// SHOWROOM LAYOUT
// =============================================================================

pub const CAR_BODY_SIZE: (f32, f32, f32) = (1.8, 0.6, 4.0);
pub const WHEEL_RADIUS: f32 = 0.35;
pub const WHEEL_WIDTH: f32 = 0.25;
/// Wheel mount positions relative to the car body (x, y, z)
pub const WHEEL_MOUNTS: [(f32, f32, f32); 4] = [
    (-0.95, -0.3, 1.3),
    (0.95, -0.3, 1.3),
    (-0.95, -0.3, -1.3),
    (0.95, -0.3, -1.3),
];

pub const WHEEL_COLORS: [(f32, f32, f32); 4] = [
    (0.55, 0.55, 0.55), // Stock - plain steel
    (0.25, 0.25, 0.28), // Basic
    (0.80, 0.80, 0.85), // Street - polished
    (0.85, 0.65, 0.20), // Sport - gold
];
pub const WHEEL_RADIUS_SCALE: [f32; 4] = [1.0, 1.0, 1.05, 1.1];

pub const CAMERA_POSITION: Vec3 = Vec3::new(6.0, 4.0, 8.0);
pub const BACKGROUND_COLOR: Color = Color::srgb(0.12, 0.12, 0.14);
pub const FLOOR_SIZE: f32 = 40.0;

// =============================================================================
// SHOWROOM UI / DRIVING
// =============================================================================

pub const MESSAGE_SECS: f32 = 2.5; // How long shop messages stay on the HUD
pub const TRACK_HALF_LENGTH: f32 = 60.0; // Car wraps back to the start past this
