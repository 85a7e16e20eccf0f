//! Applies session events to the scene and runs the keyframe animations

use bevy::math::curve::{Curve, EaseFunction};
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::*;
use crate::drive::CarVelocity;
use crate::events::GarageEvent;
use crate::shop::PurchaseFlow;
use crate::tuning::VisualRequest;

use super::hud::ShopMessage;
use super::scene::{CarBodyMesh, CarPaint, ShowroomCar, WheelVariant, rgb_color, wheel_rest_rotation};

/// Body roll in progress
#[derive(Component, Default)]
pub struct BodyShake {
    pub elapsed: f32,
}

/// Newly installed wheel sliding onto its mount
#[derive(Component)]
pub struct WheelSwap {
    pub elapsed: f32,
    pub delay: f32,
}

/// Roll target at the end of keyframe `i`: alternating swings that fade,
/// then back to level
fn shake_keyframe(i: usize) -> f32 {
    if i >= SHAKE_SWINGS * 2 {
        return 0.0;
    }
    let amplitude = SHAKE_TILT_DEG.to_radians() * SHAKE_FADE.powi((i / 2) as i32);
    if i % 2 == 0 { -amplitude } else { amplitude }
}

/// Body roll (radians) `t` seconds into a shake, `None` once it has settled
pub fn shake_roll(t: f32) -> Option<f32> {
    let keyframes = SHAKE_SWINGS * 2 + 1;
    if t < 0.0 || t >= SHAKE_STEP_SECS * keyframes as f32 {
        return None;
    }

    let index = ((t / SHAKE_STEP_SECS) as usize).min(keyframes - 1);
    let progress = (t - index as f32 * SHAKE_STEP_SECS) / SHAKE_STEP_SECS;
    let from = if index == 0 { 0.0 } else { shake_keyframe(index - 1) };
    let to = shake_keyframe(index);
    let ease = if index == keyframes - 1 {
        EaseFunction::QuadraticOut
    } else {
        EaseFunction::SineInOut
    };
    Some(from + (to - from) * ease.sample_clamped(progress))
}

/// Lateral offset and spin angle of a swapping wheel, `None` once seated
pub fn wheel_swap_pose(elapsed: f32, delay: f32, side: f32) -> Option<(f32, f32)> {
    let t = elapsed - delay;
    if t < 0.0 {
        return Some((side * WHEEL_SWAP_OFFSET, 0.0));
    }
    if t >= WHEEL_SWAP_SECS {
        return None;
    }
    let p = EaseFunction::BackOut.sample_clamped(t / WHEEL_SWAP_SECS);
    Some((side * WHEEL_SWAP_OFFSET * (1.0 - p), TAU * p))
}

/// Drain the session's outbox and turn it into scene changes and HUD messages.
/// Drained events stay in the bus's processed list for the SQLite flush.
pub fn process_garage_events(
    mut commands: Commands,
    mut flow: ResMut<PurchaseFlow>,
    paint: Res<CarPaint>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut message: ResMut<ShopMessage>,
    bodies: Query<Entity, With<CarBodyMesh>>,
    mut wheels: Query<(Entity, &WheelVariant, &mut Visibility, &mut Transform)>,
    mut cars: Query<(&mut Transform, &mut CarVelocity), (With<ShowroomCar>, Without<WheelVariant>)>,
) {
    if !flow.events().has_pending() {
        return;
    }

    let mut rng = rand::thread_rng();
    for bus_event in flow.events_mut().drain() {
        match bus_event.event {
            GarageEvent::Visual(VisualRequest::SetPaint { rgb }) => {
                if let Some(material) = materials.get_mut(&paint.0) {
                    material.base_color = rgb_color(rgb);
                }
            }
            GarageEvent::Visual(VisualRequest::ShakeBody) => {
                for body in &bodies {
                    commands.entity(body).insert(BodyShake::default());
                }
            }
            GarageEvent::Visual(VisualRequest::SwapWheels { wheels: installed }) => {
                let mesh = installed.mesh_id();
                for (entity, variant, mut visibility, mut transform) in &mut wheels {
                    if variant.mesh == mesh {
                        *visibility = Visibility::Inherited;
                        transform.translation.x = variant.side * WHEEL_SWAP_OFFSET;
                        transform.rotation = wheel_rest_rotation();
                        commands.entity(entity).insert(WheelSwap {
                            elapsed: 0.0,
                            delay: rng.gen_range(0.0..WHEEL_SWAP_MAX_DELAY),
                        });
                    } else {
                        *visibility = Visibility::Hidden;
                        transform.translation.x = 0.0;
                        commands.entity(entity).remove::<WheelSwap>();
                    }
                }
            }
            GarageEvent::PurchaseConfirmed { option, budget, .. } => {
                message.show(format!("Bought {} ({} left)", option, budget));
            }
            GarageEvent::PurchaseRejected { price, budget, .. } => {
                message.show(format!("Not enough money! ({} > {})", price, budget));
            }
            GarageEvent::AllPartsTuned => {
                message.show("All parts tuned, let's ride! (hold Up)".to_string());
            }
            GarageEvent::SessionReset { .. } => {
                for (mut transform, mut body) in &mut cars {
                    *transform = Transform::default();
                    body.velocity = Vec3::ZERO;
                }
                message.show("Back to stock".to_string());
            }
            _ => {}
        }
    }
}

pub fn animate_body_shake(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut BodyShake)>,
) {
    for (entity, mut transform, mut shake) in &mut query {
        shake.elapsed += time.delta_secs();
        match shake_roll(shake.elapsed) {
            Some(roll) => transform.rotation = Quat::from_rotation_z(roll),
            None => {
                transform.rotation = Quat::IDENTITY;
                commands.entity(entity).remove::<BodyShake>();
            }
        }
    }
}

pub fn animate_wheel_swap(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &WheelVariant, &mut Transform, &mut WheelSwap)>,
) {
    for (entity, variant, mut transform, mut swap) in &mut query {
        swap.elapsed += time.delta_secs();
        match wheel_swap_pose(swap.elapsed, swap.delay, variant.side) {
            Some((offset, spin)) => {
                transform.translation.x = offset;
                transform.rotation = wheel_rest_rotation() * Quat::from_rotation_y(spin);
            }
            None => {
                transform.translation.x = 0.0;
                transform.rotation = wheel_rest_rotation();
                commands.entity(entity).remove::<WheelSwap>();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_starts_level_and_settles() {
        assert_eq!(shake_roll(0.0), Some(0.0));
        assert_eq!(shake_roll(SHAKE_STEP_SECS * 7.0), None);
        assert_eq!(shake_roll(-0.1), None);

        let end = shake_roll(SHAKE_STEP_SECS * 7.0 - 0.0001).unwrap();
        assert!(end.abs() < 0.001);
    }

    #[test]
    fn test_shake_swings_fade() {
        let tilt = SHAKE_TILT_DEG.to_radians();
        let first = shake_roll(SHAKE_STEP_SECS).unwrap();
        let second = shake_roll(SHAKE_STEP_SECS * 3.0).unwrap();
        assert!((first + tilt).abs() < 0.0001, "first swing {}", first);
        assert!((second + tilt * SHAKE_FADE).abs() < 0.0001, "second swing {}", second);

        // Never rolls past the first swing
        for i in 0..70 {
            let roll = shake_roll(i as f32 * 0.01).unwrap_or(0.0);
            assert!(roll.abs() <= tilt * 1.0001);
        }
    }

    #[test]
    fn test_wheel_swap_pose() {
        assert_eq!(wheel_swap_pose(0.05, 0.08, -1.0), Some((-WHEEL_SWAP_OFFSET, 0.0)));

        let (offset, spin) = wheel_swap_pose(0.0, 0.0, 1.0).unwrap();
        assert!((offset - WHEEL_SWAP_OFFSET).abs() < 0.0001);
        assert!(spin.abs() < 0.0001);

        assert_eq!(wheel_swap_pose(WHEEL_SWAP_SECS + 0.1, 0.05, 1.0), None);
    }
}
