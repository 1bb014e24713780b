//! Systems for syncing Bevy entities with simulation state
//!
//! These only read the simulation; positions flow one way, from `SimWorld`
//! into transforms and UI nodes.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::components::{
    ControlButton, EntityMappings, HudText, LightLamp, MainCamera, NavButton, ProgressFill,
    SimWorldResource, SmokePuff, StationLabel, StationPanel, TrainBody, TrainWheel, VehicleLink,
};
use super::hud::{BUTTON_ACTIVE, BUTTON_IDLE};
use super::spawner::lamp_color;
use crate::simulation::{Control, Viewport};

/// System to run simulation tick, once per fixed 60 Hz step
pub fn tick_simulation(mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick();
}

/// Keep the simulation's label projection in step with the window size
pub fn update_viewport(windows: Query<&Window>, mut sim_world: ResMut<SimWorldResource>) {
    let Some(window) = windows.iter().next() else {
        return;
    };
    let viewport = Viewport {
        width: window.width(),
        height: window.height(),
    };
    if sim_world.0.viewport != viewport {
        sim_world.0.viewport = viewport;
    }
}

/// System to sync the train body sway and wheel spin
pub fn sync_train(
    sim_world: Res<SimWorldResource>,
    mut body_query: Query<&mut Transform, With<TrainBody>>,
    mut wheel_query: Query<&mut Transform, (With<TrainWheel>, Without<TrainBody>)>,
) {
    let pose = sim_world.0.train_pose();

    for mut transform in body_query.iter_mut() {
        transform.translation = Vec3::new(pose.x, pose.bob, 0.0);
        transform.rotation = Quat::from_rotation_x(pose.roll);
    }
    for mut transform in wheel_query.iter_mut() {
        transform.rotation =
            Quat::from_rotation_z(pose.wheel_rotation) * Quat::from_rotation_x(FRAC_PI_2);
    }
}

/// System to sync road vehicle visuals from simulation state
pub fn sync_vehicles(
    sim_world: Res<SimWorldResource>,
    mappings: Res<EntityMappings>,
    mut vehicle_query: Query<&mut Transform, With<VehicleLink>>,
) {
    for vehicle in &sim_world.0.traffic.vehicles {
        let Some(&entity) = mappings.vehicles.get(&vehicle.id) else {
            continue;
        };
        if let Ok(mut transform) = vehicle_query.get_mut(entity) {
            transform.translation.x = vehicle.x;
            transform.translation.z = vehicle.lane_z;
        }
    }
}

/// System to light the active traffic light lamp and dim the others
pub fn sync_lights(
    sim_world: Res<SimWorldResource>,
    lamp_query: Query<(&LightLamp, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let light = &sim_world.0.traffic_light;
    for (lamp, material_handle) in lamp_query.iter() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.emissive = LinearRgba::from(lamp_color(lamp.0)) * light.intensity(lamp.0);
        }
    }
}

/// System to move pooled smoke puffs onto live particles
pub fn sync_smoke(
    sim_world: Res<SimWorldResource>,
    mut puff_query: Query<(
        &SmokePuff,
        &mut Transform,
        &mut Visibility,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let world = &sim_world.0;
    let train_x = world.train.position;

    for (puff, mut transform, mut visibility, material_handle) in puff_query.iter_mut() {
        match world.smoke.particles.get(puff.0) {
            Some(particle) => {
                transform.translation = Vec3::new(
                    train_x + particle.offset.x,
                    particle.offset.y,
                    particle.offset.z,
                );
                transform.scale = Vec3::splat(particle.scale);
                *visibility = Visibility::Visible;
                if let Some(material) = materials.get_mut(&material_handle.0) {
                    material.base_color = Color::srgba(0.85, 0.85, 0.85, particle.opacity());
                }
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// System to place the Bevy camera where the simulation's rig is
pub fn sync_camera(
    sim_world: Res<SimWorldResource>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let camera = sim_world.0.camera_rig.camera;
    let eye = Vec3::new(camera.eye.x, camera.eye.y, camera.eye.z);
    let target = Vec3::new(camera.target.x, camera.target.y, camera.target.z);

    for mut transform in camera_query.iter_mut() {
        *transform = Transform::from_translation(eye).looking_at(target, Vec3::Y);
    }
}

/// System to update the progress bar and readout texts
pub fn sync_hud(
    sim_world: Res<SimWorldResource>,
    mut text_query: Query<(&HudText, &mut Text, &mut TextColor)>,
    mut fill_query: Query<&mut Node, With<ProgressFill>>,
) {
    let world = &sim_world.0;
    let ui = &world.last_report.ui;

    for mut node in fill_query.iter_mut() {
        node.width = Val::Percent(ui.progress);
    }

    for (field, mut text, mut color) in text_query.iter_mut() {
        match field {
            HudText::Gear => {
                **text = ui.gear_label.clone();
                color.0 = if ui.gear_shifting {
                    BUTTON_ACTIVE
                } else {
                    Color::srgb(0.9, 0.9, 0.9)
                };
            }
            HudText::Speed => {
                **text = format!("Speed: {:.2}", world.train.speed);
            }
            HudText::Autopilot => {
                **text = match &ui.autopilot_station {
                    Some(station) => format!("Autopilot: {}", station),
                    None => "Autopilot: off".to_string(),
                };
            }
            HudText::Light => {
                **text = format!("Light: {:?}", world.traffic_light.phase);
            }
        }
    }
}

/// System to show the parked station's panel and highlight its nav link
pub fn sync_station_panels(
    sim_world: Res<SimWorldResource>,
    mut panel_query: Query<(&StationPanel, &mut Visibility)>,
    mut nav_query: Query<(&NavButton, &mut BackgroundColor)>,
) {
    let parked = sim_world.0.last_report.ui.parked_station.as_deref();

    for (panel, mut visibility) in panel_query.iter_mut() {
        *visibility = if parked == Some(panel.0.as_str()) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
    for (button, mut background) in nav_query.iter_mut() {
        background.0 = if parked == Some(button.0.as_str()) {
            BUTTON_ACTIVE
        } else {
            BUTTON_IDLE
        };
    }
}

/// System to position floating station labels over their projected anchors
pub fn sync_labels(
    sim_world: Res<SimWorldResource>,
    mut label_query: Query<(&StationLabel, &mut Node, &mut TextColor, &mut Visibility)>,
) {
    let labels = &sim_world.0.last_report.ui.labels;

    for (label, mut node, mut color, mut visibility) in label_query.iter_mut() {
        let placement = labels.iter().find(|p| p.station_id == label.0);
        match placement.and_then(|p| p.screen.map(|screen| (screen, p.opacity))) {
            Some(((x, y), opacity)) => {
                node.left = Val::Px(x);
                node.top = Val::Px(y);
                color.0 = Color::srgba(1.0, 1.0, 1.0, opacity);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// System to highlight held controls and the horn flash
pub fn sync_control_buttons(
    sim_world: Res<SimWorldResource>,
    mut button_query: Query<(&ControlButton, &mut BackgroundColor), Without<NavButton>>,
) {
    let world = &sim_world.0;
    for (button, mut background) in button_query.iter_mut() {
        let lit = match button.0 {
            Control::Horn => world.last_report.ui.horn_active,
            control => world.input.is_held(control),
        };
        background.0 = if lit { BUTTON_ACTIVE } else { BUTTON_IDLE };
    }
}
