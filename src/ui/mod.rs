//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads state from `SimWorld` and renders it using Bevy's 3D graphics; input is
//! forwarded to the world as `InputEvent`s.

mod components;
mod hud;
mod input;
pub mod spawner;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimWorldResource};

use crate::simulation::FRAME_RATE;
use hud::setup_hud;
use input::{handle_control_buttons, handle_input, handle_nav_buttons};
use spawner::spawn_initial_visuals;
use sync::{
    sync_camera, sync_control_buttons, sync_hud, sync_labels, sync_lights, sync_smoke,
    sync_station_panels, sync_train, sync_vehicles, tick_simulation, update_viewport,
};
use world::setup_world;

/// Plugin to register all UI systems
pub struct TrainSimUIPlugin;

impl Plugin for TrainSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimWorldResource>()
            .init_resource::<EntityMappings>()
            .insert_resource(Time::<Fixed>::from_hz(FRAME_RATE as f64))
            .add_systems(
                Startup,
                (
                    setup_world,
                    spawn_initial_visuals.after(setup_world),
                    setup_hud,
                ),
            )
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    (handle_input, handle_control_buttons, handle_nav_buttons),
                    update_viewport,
                    (
                        sync_train,
                        sync_vehicles,
                        sync_lights,
                        sync_smoke,
                        sync_camera,
                        sync_hud,
                        sync_station_panels,
                        sync_labels,
                        sync_control_buttons,
                    ),
                )
                    .chain(),
            );
    }
}
