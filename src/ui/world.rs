//! World setup systems for camera, lighting, ground, track and road

use bevy::prelude::*;

use super::components::{Ground, MainCamera, SimWorldResource};

const RAIL_GAUGE: f32 = 1.2;

/// System to setup the world environment (ground, lighting, camera)
pub fn setup_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
) {
    let world = &sim_world.0;
    let camera = world.camera_rig.camera;

    // Chase camera matching the simulation's projection parameters
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: camera.fov_y.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_xyz(camera.eye.x, camera.eye.y, camera.eye.z).looking_at(
            Vec3::new(camera.target.x, camera.target.y, camera.target.z),
            Vec3::Y,
        ),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let rules = world.traffic.rules();
    let road_length = rules.wrap_end - rules.wrap_start;
    let road_center = (rules.wrap_start + rules.wrap_end) / 2.0;

    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(road_length + 200.0, 120.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(road_center, 0.0, -10.0),
    ));

    // Rails over the drivable track
    let (start, end) = world.train.track_bounds();
    let track_length = end - start + 20.0;
    let rail_material = materials.add(Color::srgb(0.45, 0.45, 0.5));
    for side in [-1.0, 1.0] {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(track_length, 0.1, 0.1))),
            MeshMaterial3d(rail_material.clone()),
            Transform::from_xyz((start + end) / 2.0, 0.15, side * RAIL_GAUGE / 2.0),
        ));
    }

    // Road under both lanes
    let lane_center = (rules.forward_lane_z + rules.backward_lane_z) / 2.0;
    let road_width = (rules.forward_lane_z - rules.backward_lane_z).abs() + 4.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(road_length, 0.02, road_width))),
        MeshMaterial3d(materials.add(Color::srgb(0.2, 0.2, 0.2))),
        Transform::from_xyz(road_center, 0.01, lane_center),
    ));

    // Stop line
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.4, 0.03, road_width))),
        MeshMaterial3d(materials.add(Color::WHITE)),
        Transform::from_xyz(rules.stop_line_x, 0.02, lane_center),
    ));
}
