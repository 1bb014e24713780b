//! Page UI state derived from the train
//!
//! Recomputed from scratch every frame from train position and speed; the
//! only remembered bit is whether the train has departed the first station.

use super::effects::{Effect, EffectQueue};
use super::projection::{Camera, Viewport};
use super::station::{Route, Station};
use super::train::SimTrain;
use super::types::Position;

/// A station dot lights up within this distance
pub const ACTIVE_RADIUS: f32 = 5.0;
/// A station counts as passed once the train is this far beyond it
pub const PASSED_MARGIN: f32 = 2.0;
/// Below this |speed| a train near a station is parked there
pub const PARKED_SPEED: f32 = 0.05;
/// Labels fade out completely at this distance from the train
pub const LABEL_FADE_DISTANCE: f32 = 50.0;
/// Distance from the first station at which the intro panel is marked departed
pub const DEPART_DISTANCE: f32 = 10.0;
/// Height of the floating station labels
pub const LABEL_HEIGHT: f32 = 6.0;
/// Labels float above the station poles, behind the track
pub const LABEL_Z: f32 = -3.0;

/// Progress along the route as a percentage in [0, 100]
pub fn progress_percent(position: f32, route: &Route) -> f32 {
    let (Some(first), span) = (route.first(), route.span()) else {
        return 0.0;
    };
    if span <= 0.0 {
        return 0.0;
    }
    ((position - first.x) / span * 100.0).clamp(0.0, 100.0)
}

/// Label opacity for a label at `label_x` seen from a train at `train_x`
pub fn label_opacity(train_x: f32, label_x: f32) -> f32 {
    (1.0 - (train_x - label_x).abs() / LABEL_FADE_DISTANCE).max(0.0)
}

/// Per-station flags driving the progress dots and content panels
#[derive(Debug, Clone, PartialEq)]
pub struct StationStatus {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub active: bool,
    pub passed: bool,
    pub parked: bool,
}

impl StationStatus {
    pub fn evaluate(station: &Station, position: f32, speed: f32) -> Self {
        let distance = (position - station.x).abs();
        let active = distance < ACTIVE_RADIUS;
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            x: station.x,
            active,
            passed: position > station.x + PASSED_MARGIN,
            parked: active && speed.abs() < PARKED_SPEED,
        }
    }
}

/// Where a floating station label goes on screen
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub station_id: String,
    pub text: String,
    /// Pixel coordinates, `None` when the label is off camera
    pub screen: Option<(f32, f32)>,
    pub opacity: f32,
}

/// Everything the page chrome shows for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiSnapshot {
    /// Progress bar width in percent
    pub progress: f32,
    pub stations: Vec<StationStatus>,
    /// Station whose content panel and nav link are shown
    pub parked_station: Option<String>,
    /// Page is focused on a station's content
    pub station_mode: bool,
    /// The intro panel of the first station has been left behind
    pub first_departed: bool,
    pub labels: Vec<LabelPlacement>,
    pub gear_label: String,
    pub gear_shifting: bool,
    pub horn_active: bool,
    /// Station the autopilot is heading to
    pub autopilot_station: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UiSync {
    first_departed: bool,
}

impl UiSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(
        &mut self,
        train: &SimTrain,
        route: &Route,
        camera: &Camera,
        viewport: Viewport,
        effects: &EffectQueue,
        autopilot_station: Option<&str>,
    ) -> UiSnapshot {
        let position = train.position;

        let stations: Vec<StationStatus> = route
            .stations()
            .iter()
            .map(|station| StationStatus::evaluate(station, position, train.speed))
            .collect();

        let parked_station = stations.iter().find(|s| s.parked).map(|s| s.id.clone());

        if let Some(first) = stations.first() {
            if first.parked {
                self.first_departed = false;
            } else if (position - first.x).abs() > DEPART_DISTANCE {
                self.first_departed = true;
            }
        }

        let labels = route
            .stations()
            .iter()
            .map(|station| {
                let anchor = Position::new(station.x, LABEL_HEIGHT, LABEL_Z);
                LabelPlacement {
                    station_id: station.id.clone(),
                    text: station.name.clone(),
                    screen: camera.to_screen(anchor, viewport),
                    opacity: label_opacity(position, station.x),
                }
            })
            .collect();

        UiSnapshot {
            progress: progress_percent(position, route),
            station_mode: parked_station.is_some(),
            parked_station,
            stations,
            first_departed: self.first_departed,
            labels,
            gear_label: train.gear_label(),
            gear_shifting: effects.is_active(Effect::GearShiftFlash),
            horn_active: effects.is_active(Effect::HornButtonFlash),
            autopilot_station: autopilot_station.map(str::to_string),
        }
    }
}
