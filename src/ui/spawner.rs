//! Systems for spawning visual entities from simulation state

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::components::{
    EntityMappings, LightLamp, SimSynced, SimWorldResource, SmokePuff, TrainBody, TrainWheel,
    VehicleLink, SMOKE_POOL_SIZE,
};
use crate::simulation::{
    Direction, LightPhase, SimVehicle, SimWorld, VehicleType, CHIMNEY_OFFSET, LABEL_Z,
};

/// System to create initial visual entities from simulation state
pub fn spawn_initial_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim_world: Res<SimWorldResource>,
    mut mappings: ResMut<EntityMappings>,
) {
    let world = &sim_world.0;

    spawn_train(&mut commands, &mut meshes, &mut materials, world);
    for vehicle in &world.traffic.vehicles {
        spawn_vehicle_visual(&mut commands, &mut meshes, &mut materials, vehicle, &mut mappings);
    }
    spawn_traffic_light(&mut commands, &mut meshes, &mut materials, world);
    spawn_station_poles(&mut commands, &mut meshes, &mut materials, world);
    spawn_smoke_pool(&mut commands, &mut meshes, &mut materials);
}

fn spawn_train(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &SimWorld,
) {
    let body_color = Color::srgb(0.8, 0.15, 0.15);
    let trim_color = Color::srgb(0.1, 0.1, 0.1);

    commands
        .spawn((
            SimSynced,
            TrainBody,
            Transform::from_xyz(world.train.position, 0.0, 0.0),
            Visibility::default(),
        ))
        .with_children(|parent| {
            // Boiler and cab
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(4.0, 1.4, 1.4))),
                MeshMaterial3d(materials.add(body_color)),
                Transform::from_xyz(0.0, 1.2, 0.0),
            ));
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(1.4, 1.2, 1.5))),
                MeshMaterial3d(materials.add(body_color)),
                Transform::from_xyz(-1.3, 2.4, 0.0),
            ));
            // Chimney
            parent.spawn((
                Mesh3d(meshes.add(Cylinder::new(0.2, 0.8))),
                MeshMaterial3d(materials.add(trim_color)),
                Transform::from_xyz(CHIMNEY_OFFSET.x, CHIMNEY_OFFSET.y - 0.6, 0.0),
            ));

            let wheel_mesh = meshes.add(Cylinder::new(0.4, 0.2));
            let wheel_material = materials.add(trim_color);
            for x in [-1.2, 0.0, 1.2] {
                for z in [-0.75, 0.75] {
                    parent.spawn((
                        TrainWheel,
                        Mesh3d(wheel_mesh.clone()),
                        MeshMaterial3d(wheel_material.clone()),
                        Transform::from_xyz(x, 0.4, z)
                            .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
                    ));
                }
            }
        });
}

/// Spawn a single road vehicle visual
pub fn spawn_vehicle_visual(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    vehicle: &SimVehicle,
    mappings: &mut ResMut<EntityMappings>,
) {
    let (length, height, width, color) = match vehicle.vehicle_type {
        VehicleType::Car => (2.0, 0.8, 1.0, Color::srgb(0.2, 0.4, 0.8)),
        VehicleType::Bike => (1.0, 0.6, 0.3, Color::srgb(0.9, 0.7, 0.1)),
    };
    let heading = match vehicle.direction {
        Direction::Forward => 0.0,
        Direction::Backward => std::f32::consts::PI,
    };

    let entity = commands
        .spawn((
            SimSynced,
            VehicleLink(vehicle.id),
            Mesh3d(meshes.add(Cuboid::new(length, height, width))),
            MeshMaterial3d(materials.add(color)),
            Transform::from_xyz(vehicle.x, height / 2.0, vehicle.lane_z)
                .with_rotation(Quat::from_rotation_y(heading)),
        ))
        .id();
    mappings.vehicles.insert(vehicle.id, entity);
}

fn spawn_traffic_light(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &SimWorld,
) {
    const POLE_HEIGHT: f32 = 4.0;
    let position = world.traffic_light.position;

    commands
        .spawn((
            SimSynced,
            Mesh3d(meshes.add(Cylinder::new(0.1, POLE_HEIGHT))),
            MeshMaterial3d(materials.add(Color::srgb(0.3, 0.3, 0.3))),
            Transform::from_xyz(position.x, POLE_HEIGHT / 2.0, position.z),
        ))
        .with_children(|parent| {
            let lamp_mesh = meshes.add(Sphere::new(0.25));
            for (index, phase) in LightPhase::ALL.iter().enumerate() {
                let color = lamp_color(*phase);
                parent.spawn((
                    LightLamp(*phase),
                    Mesh3d(lamp_mesh.clone()),
                    // One material per lamp so intensities change independently
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: color,
                        emissive: LinearRgba::from(color) * world.traffic_light.intensity(*phase),
                        ..default()
                    })),
                    Transform::from_xyz(0.0, POLE_HEIGHT / 2.0 - index as f32 * 0.6, 0.3),
                ));
            }
        });
}

/// Display colour of a traffic light lamp
pub fn lamp_color(phase: LightPhase) -> Color {
    match phase {
        LightPhase::Red => Color::srgb(1.0, 0.1, 0.1),
        LightPhase::Yellow => Color::srgb(1.0, 0.8, 0.1),
        LightPhase::Green => Color::srgb(0.1, 1.0, 0.2),
    }
}

fn spawn_station_poles(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world: &SimWorld,
) {
    let pole_mesh = meshes.add(Cylinder::new(0.15, 5.0));
    let pole_material = materials.add(Color::srgb(0.9, 0.9, 0.9));

    for station in world.route.stations() {
        commands.spawn((
            SimSynced,
            Mesh3d(pole_mesh.clone()),
            MeshMaterial3d(pole_material.clone()),
            Transform::from_xyz(station.x, 2.5, LABEL_Z),
        ));
    }
}

fn spawn_smoke_pool(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    let puff_mesh = meshes.add(Sphere::new(0.3));
    for index in 0..SMOKE_POOL_SIZE {
        commands.spawn((
            SmokePuff(index),
            Mesh3d(puff_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.85, 0.85, 0.85, 0.0),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::default(),
            Visibility::Hidden,
        ));
    }
}
