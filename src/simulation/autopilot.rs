//! Station autopilot
//!
//! Drives the train towards a target position with a single-pole speed
//! filter, overriding manual input until it arrives or is cancelled.

use log::info;

use super::train::SimTrain;

/// Outcome of one autopilot frame
#[derive(Debug, Clone, PartialEq)]
pub enum AutopilotStep {
    /// Autopilot is not engaged; manual control applies
    Idle,
    /// Still approaching the target
    Driving,
    /// Snapped onto the target this frame and disengaged. Carries the
    /// station id the run was started for.
    Arrived(String),
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    target: Option<f32>,
    /// Id of the station being driven to, for reporting
    station: Option<String>,
    gain: f32,
    tolerance: f32,
}

impl Autopilot {
    pub fn new(gain: f32, tolerance: f32) -> Self {
        Self {
            target: None,
            station: None,
            gain,
            tolerance,
        }
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<f32> {
        self.target
    }

    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    /// Start driving towards a position
    pub fn engage(&mut self, station: &str, target: f32) {
        info!("autopilot engaged towards '{}' at x={:.1}", station, target);
        self.target = Some(target);
        self.station = Some(station.to_string());
    }

    /// Drop the current target. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.station = None;
        self.target.take().is_some()
    }

    /// Run one frame of the controller against the train
    pub fn step(&mut self, train: &mut SimTrain) -> AutopilotStep {
        let Some(target) = self.target else {
            return AutopilotStep::Idle;
        };

        let diff = target - train.position;
        if diff.abs() < self.tolerance {
            train.park_at(target);
            self.target = None;
            return AutopilotStep::Arrived(self.station.take().unwrap_or_default());
        }

        let desired = diff.signum() * train.max_speed();
        if !train.throttle_suspended() {
            train.speed += (desired - train.speed) * self.gain;
        }
        AutopilotStep::Driving
    }
}
