//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{Control, LightPhase, SimWorld, VehicleId};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

impl Default for SimWorldResource {
    fn default() -> Self {
        Self(SimWorld::new())
    }
}

/// Marker component for ground plane
#[derive(Component)]
pub struct Ground;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for entities synced from simulation
#[derive(Component)]
pub struct SimSynced;

/// The train body; children ride along with it
#[derive(Component)]
pub struct TrainBody;

#[derive(Component)]
pub struct TrainWheel;

/// Links a Bevy entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// One lamp of the traffic light
#[derive(Component)]
pub struct LightLamp(pub LightPhase);

/// Pooled smoke puff showing the particle at this index, hidden when unused
#[derive(Component)]
pub struct SmokePuff(pub usize);

/// Number of pooled smoke puff entities
pub const SMOKE_POOL_SIZE: usize = 96;

/// Screen-space label floating above a station
#[derive(Component)]
pub struct StationLabel(pub String);

/// Nav link that drives the train to a station
#[derive(Component)]
pub struct NavButton(pub String);

/// Content panel shown while parked at the station
#[derive(Component)]
pub struct StationPanel(pub String);

/// Press-and-hold on-screen control
#[derive(Component)]
pub struct ControlButton(pub Control);

/// Width of the progress bar fill follows the route progress
#[derive(Component)]
pub struct ProgressFill;

/// HUD text elements
#[derive(Component)]
pub enum HudText {
    Gear,
    Speed,
    Autopilot,
    Light,
}

/// Resource to track Bevy entities mapped to simulation entities
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub vehicles: HashMap<VehicleId, Entity>,
}
