//! Physics baseline, derived physics and the display conversion
//!
//! Derived values are always computed fresh from the baseline. Multipliers
//! never stack on top of a previously derived value.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::tuning::types::{EngineOption, TuningSelection, WheelOption};

/// Stock car physics, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsBaseline {
    pub max_speed: f32,
    pub acceleration: f32,
    pub power: f32,
    pub mass: f32,
    pub drag_coefficient: f32,
}

impl Default for PhysicsBaseline {
    fn default() -> Self {
        Self {
            max_speed: BASE_MAX_SPEED,
            acceleration: BASE_ACCELERATION,
            power: BASE_POWER,
            mass: BASE_MASS,
            drag_coefficient: BASE_DRAG,
        }
    }
}

/// Effective physics for a selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedPhysics {
    pub max_speed: f32,
    pub acceleration: f32,
    pub power: f32,
    pub drag_coefficient: f32,
}

impl From<&PhysicsBaseline> for DerivedPhysics {
    fn from(base: &PhysicsBaseline) -> Self {
        Self {
            max_speed: base.max_speed,
            acceleration: base.acceleration,
            power: base.power,
            drag_coefficient: base.drag_coefficient,
        }
    }
}

/// Player-facing numbers shown in the shop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayStats {
    pub speed_kmh: i32,
    /// 0-100 km/h time, one decimal with a trailing "s"
    pub zero_to_hundred: String,
    pub horse_power: i32,
}

impl DerivedPhysics {
    pub fn display_stats(&self) -> DisplayStats {
        DisplayStats {
            speed_kmh: (self.max_speed * MS_TO_KMH).round() as i32,
            zero_to_hundred: format!(
                "{:.1}s",
                SPRINT_TARGET_KMH / (MS_TO_KMH * self.acceleration)
            ),
            horse_power: (self.power / POWER_PER_HORSEPOWER).round() as i32,
        }
    }
}

/// (acceleration multiplier, drag override). `None` keeps the baseline drag.
fn wheel_factors(option: WheelOption) -> (f32, Option<f32>) {
    match option {
        WheelOption::Stock => (1.0, None),
        WheelOption::Basic => (WHEELS_BASIC_ACCEL, Some(WHEELS_BASIC_DRAG)),
        WheelOption::Street => (WHEELS_STREET_ACCEL, Some(WHEELS_STREET_DRAG)),
        WheelOption::Sport => (WHEELS_SPORT_ACCEL, Some(WHEELS_SPORT_DRAG)),
    }
}

/// (max speed multiplier, power multiplier)
fn engine_factors(option: EngineOption) -> (f32, f32) {
    match option {
        EngineOption::Stock => (1.0, 1.0),
        EngineOption::Basic => (ENGINE_BASIC_SPEED, ENGINE_BASIC_POWER),
        EngineOption::Street => (ENGINE_STREET_SPEED, ENGINE_STREET_POWER),
        EngineOption::Sport => (ENGINE_SPORT_SPEED, ENGINE_SPORT_POWER),
    }
}

/// Pure derivation of effective physics. Paint has no physics effect.
pub fn derive(base: &PhysicsBaseline, selection: &TuningSelection) -> DerivedPhysics {
    let (accel_mult, drag) = wheel_factors(selection.wheels);
    let (speed_mult, power_mult) = engine_factors(selection.engine);

    DerivedPhysics {
        max_speed: base.max_speed * speed_mult,
        acceleration: base.acceleration * accel_mult,
        power: base.power * power_mult,
        drag_coefficient: drag.unwrap_or(base.drag_coefficient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::types::{ColorOption, TuningOption};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_stock_equals_baseline() {
        let base = PhysicsBaseline::default();
        let derived = derive(&base, &TuningSelection::default());
        assert_eq!(derived, DerivedPhysics::from(&base));
    }

    #[test]
    fn test_engine_sport() {
        let base = PhysicsBaseline::default();
        let selection = TuningSelection::default().with(TuningOption::Engine(EngineOption::Sport));
        let derived = derive(&base, &selection);

        assert!(approx(derived.max_speed, 75.0));
        assert!(approx(derived.power, 11200.0));
        // Wheels untouched
        assert!(approx(derived.acceleration, 8.0));
        assert!(approx(derived.drag_coefficient, 0.3));
    }

    #[test]
    fn test_wheel_table() {
        let base = PhysicsBaseline::default();
        let cases = [
            (WheelOption::Stock, 8.0, 0.3),
            (WheelOption::Basic, 8.4, 0.27),
            (WheelOption::Street, 8.8, 0.25),
            (WheelOption::Sport, 9.2, 0.15),
        ];
        for (wheels, accel, drag) in cases {
            let derived = derive(&base, &TuningSelection::default().with(TuningOption::Wheels(wheels)));
            assert!(approx(derived.acceleration, accel), "{:?} accel {}", wheels, derived.acceleration);
            assert!(approx(derived.drag_coefficient, drag), "{:?} drag", wheels);
            assert!(approx(derived.max_speed, 60.0));
        }
    }

    #[test]
    fn test_categories_compound_independently() {
        let base = PhysicsBaseline::default();
        let selection = TuningSelection {
            wheels: WheelOption::Street,
            color: ColorOption::Red,
            engine: EngineOption::Basic,
        };
        let derived = derive(&base, &selection);
        assert!(approx(derived.acceleration, 8.8));
        assert!(approx(derived.max_speed, 66.0));
        assert!(approx(derived.power, 9600.0));
    }

    #[test]
    fn test_derive_is_repeatable() {
        let base = PhysicsBaseline::default();
        let selection = TuningSelection::default().with(TuningOption::Wheels(WheelOption::Sport));
        let first = derive(&base, &selection);
        for _ in 0..10 {
            assert_eq!(derive(&base, &selection), first);
        }
    }

    #[test]
    fn test_color_has_no_physics_effect() {
        let base = PhysicsBaseline::default();
        for color in ColorOption::ALL {
            let derived = derive(&base, &TuningSelection::default().with(TuningOption::Color(color)));
            assert_eq!(derived, DerivedPhysics::from(&base));
        }
    }

    #[test]
    fn test_display_stats_stock() {
        let stats = DerivedPhysics::from(&PhysicsBaseline::default()).display_stats();
        assert_eq!(stats.speed_kmh, 216);
        assert_eq!(stats.zero_to_hundred, "3.5s");
        assert_eq!(stats.horse_power, 800);
    }

    #[test]
    fn test_display_stats_engine_sport() {
        let base = PhysicsBaseline::default();
        let selection = TuningSelection::default().with(TuningOption::Engine(EngineOption::Sport));
        let stats = derive(&base, &selection).display_stats();
        assert_eq!(stats.speed_kmh, 270);
        assert_eq!(stats.horse_power, 1120);
        // Engine kits leave acceleration alone
        assert_eq!(stats.zero_to_hundred, "3.5s");
    }

    #[test]
    fn test_display_stats_sprint_time_tracks_acceleration() {
        let physics = DerivedPhysics {
            max_speed: 60.0,
            acceleration: 6.0,
            power: 8000.0,
            drag_coefficient: 0.3,
        };
        assert_eq!(physics.display_stats().zero_to_hundred, "4.6s");
    }
}
