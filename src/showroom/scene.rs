//! Showroom scene: floor, camera, lights and the primitive car

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::constants::*;
use crate::drive::CarVelocity;
use crate::shop::PurchaseFlow;
use crate::tuning::{Rgb, WheelOption};

/// Root of the car; carries the simulated body
#[derive(Component)]
pub struct ShowroomCar;

/// Painted body mesh; the shake animation rolls this entity
#[derive(Component)]
pub struct CarBodyMesh;

/// One wheel variant under a wheel mount. Only the installed variant is visible.
#[derive(Component, Debug, Clone, Copy)]
pub struct WheelVariant {
    /// Mesh id of the wheel option this variant renders
    pub mesh: &'static str,
    /// -1.0 for left-side mounts, 1.0 for right
    pub side: f32,
}

/// Handle to the body paint so visual requests can recolor it
#[derive(Resource)]
pub struct CarPaint(pub Handle<StandardMaterial>);

pub fn rgb_color(rgb: Rgb) -> Color {
    Color::srgb_u8(rgb.r, rgb.g, rgb.b)
}

/// Resting rotation of a wheel cylinder (axle along x)
pub fn wheel_rest_rotation() -> Quat {
    Quat::from_rotation_z(FRAC_PI_2)
}

fn wheel_index(option: WheelOption) -> usize {
    WheelOption::ALL
        .iter()
        .position(|w| *w == option)
        .unwrap_or(0)
}

/// Spawn the showroom and a car matching the session's current look
pub fn spawn_showroom(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    flow: Res<PurchaseFlow>,
) {
    let view = flow.tuning().view();

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(FLOOR_SIZE, FLOOR_SIZE))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.3, 0.32))),
        Transform::from_xyz(0.0, -WHEEL_RADIUS - 0.3, 0.0),
    ));

    let paint = materials.add(StandardMaterial {
        base_color: rgb_color(view.visual.paint),
        perceptual_roughness: 0.4,
        ..default()
    });
    commands.insert_resource(CarPaint(paint.clone()));

    let (bw, bh, bl) = CAR_BODY_SIZE;
    let body_mesh = meshes.add(Cuboid::new(bw, bh, bl));

    // One mesh + material per wheel variant, shared by all four mounts
    let variants: Vec<(WheelOption, Handle<Mesh>, Handle<StandardMaterial>)> = WheelOption::ALL
        .iter()
        .map(|&option| {
            let i = wheel_index(option);
            let (r, g, b) = WHEEL_COLORS[i];
            (
                option,
                meshes.add(Cylinder::new(WHEEL_RADIUS * WHEEL_RADIUS_SCALE[i], WHEEL_WIDTH)),
                materials.add(Color::srgb(r, g, b)),
            )
        })
        .collect();

    commands
        .spawn((
            ShowroomCar,
            CarVelocity::new(flow.tuning().baseline().mass),
            Transform::default(),
            Visibility::default(),
            Name::new("car"),
        ))
        .with_children(|car| {
            car.spawn((
                CarBodyMesh,
                Mesh3d(body_mesh),
                MeshMaterial3d(paint),
                Transform::default(),
                Name::new("body"),
            ));

            for (mount_index, &(x, y, z)) in WHEEL_MOUNTS.iter().enumerate() {
                let side = if x < 0.0 { -1.0 } else { 1.0 };
                car.spawn((
                    Transform::from_xyz(x, y, z),
                    Visibility::default(),
                    Name::new(format!("wheel_mount_{}", mount_index)),
                ))
                .with_children(|mount| {
                    for (option, mesh, material) in &variants {
                        let visibility = if option.mesh_id() == view.visual.wheel_mesh() {
                            Visibility::Inherited
                        } else {
                            Visibility::Hidden
                        };
                        mount.spawn((
                            WheelVariant {
                                mesh: option.mesh_id(),
                                side,
                            },
                            Mesh3d(mesh.clone()),
                            MeshMaterial3d(material.clone()),
                            Transform::from_rotation(wheel_rest_rotation()),
                            visibility,
                            Name::new(option.mesh_id()),
                        ));
                    }
                });
            }
        });

    info!("Showroom ready ({} wheel variants per mount)", variants.len());
}
