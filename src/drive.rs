//! Engine force and speed limiting against a rigid body
//!
//! The tuning core only hands out numbers. Whatever simulates the car body
//! implements `CarBody`, and these helpers turn derived physics into
//! impulses and velocity clamps.

use bevy::prelude::*;

use crate::tuning::DerivedPhysics;

/// Minimal rigid-body surface the drive helpers need
pub trait CarBody {
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn apply_impulse(&mut self, impulse: Vec3);
}

/// Impulse for one engine push along `forward`
pub fn engine_impulse(physics: &DerivedPhysics, forward: Vec3) -> Vec3 {
    forward.normalize_or_zero() * physics.power * physics.acceleration
}

/// Clamp the body's speed to `max_speed`, keeping its direction.
/// Returns true if the velocity was changed.
pub fn limit_velocity(body: &mut impl CarBody, max_speed: f32) -> bool {
    let velocity = body.linear_velocity();
    if velocity.length() <= max_speed {
        return false;
    }
    body.set_linear_velocity(velocity.normalize_or_zero() * max_speed);
    true
}

/// Pin a car that is not allowed to drive yet
pub fn hold_parked(body: &mut impl CarBody) {
    if body.linear_velocity() != Vec3::ZERO {
        body.set_linear_velocity(Vec3::ZERO);
    }
}

/// Velocity + mass body used by the showroom (no external physics engine)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CarVelocity {
    pub velocity: Vec3,
    pub mass: f32,
}

impl CarVelocity {
    pub fn new(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass,
        }
    }
}

impl CarBody for CarVelocity {
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{EngineOption, PhysicsBaseline, TuningOption, TuningSelection, derive};

    #[test]
    fn test_engine_impulse_uses_power_and_acceleration() {
        let physics = DerivedPhysics::from(&PhysicsBaseline::default());
        let impulse = engine_impulse(&physics, Vec3::new(0.0, 0.0, -2.0));
        assert!((impulse.z + 8000.0 * 8.0).abs() < 0.01);
        assert_eq!(impulse.x, 0.0);
    }

    #[test]
    fn test_engine_impulse_tracks_tuning() {
        let base = PhysicsBaseline::default();
        let sport = derive(
            &base,
            &TuningSelection::default().with(TuningOption::Engine(EngineOption::Sport)),
        );
        let impulse = engine_impulse(&sport, Vec3::Z);
        assert!((impulse.z - 11200.0 * 8.0).abs() < 0.1);
    }

    #[test]
    fn test_limit_velocity() {
        let mut body = CarVelocity::new(1200.0);
        body.set_linear_velocity(Vec3::new(30.0, 0.0, 40.0));

        assert!(limit_velocity(&mut body, 25.0));
        assert!((body.linear_velocity().length() - 25.0).abs() < 0.001);
        assert!((body.linear_velocity().x - 15.0).abs() < 0.001);

        assert!(!limit_velocity(&mut body, 60.0));
        assert!((body.linear_velocity().length() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_impulse_divides_by_mass() {
        let mut body = CarVelocity::new(1000.0);
        body.apply_impulse(Vec3::new(0.0, 0.0, 5000.0));
        assert!((body.velocity.z - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_hold_parked() {
        let mut body = CarVelocity::new(1200.0);
        body.apply_impulse(Vec3::X * 1200.0);
        hold_parked(&mut body);
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
    }
}
