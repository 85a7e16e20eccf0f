//! Test drive once every category is tuned

use bevy::prelude::*;

use crate::constants::TRACK_HALF_LENGTH;
use crate::drive::{CarBody, CarVelocity, engine_impulse, hold_parked, limit_velocity};
use crate::shop::PurchaseFlow;

use super::scene::ShowroomCar;

/// Runs in FixedUpdate. The car stays parked until the build is complete.
pub fn drive_car(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    flow: Res<PurchaseFlow>,
    mut cars: Query<(&mut Transform, &mut CarVelocity), With<ShowroomCar>>,
) {
    let dt = time.delta_secs();
    let physics = flow.tuning().derived();

    for (mut transform, mut body) in &mut cars {
        if !flow.ready_to_ride() {
            hold_parked(body.as_mut());
            continue;
        }

        if keyboard.pressed(KeyCode::ArrowUp) {
            let forward = transform.forward().as_vec3();
            body.apply_impulse(engine_impulse(physics, forward) * dt);
        }

        let drag = (1.0 - physics.drag_coefficient * dt).max(0.0);
        let velocity = body.linear_velocity() * drag;
        body.set_linear_velocity(velocity);
        limit_velocity(body.as_mut(), physics.max_speed);

        transform.translation += body.linear_velocity() * dt;
        if transform.translation.length() > TRACK_HALF_LENGTH {
            transform.translation = Vec3::ZERO;
        }
    }
}
