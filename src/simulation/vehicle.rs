//! Road vehicle movement logic
//!
//! Standalone implementation that doesn't depend on Bevy.

use super::config::TrafficConfig;
use super::types::{Direction, VehicleId, VehicleType};

/// Result of a vehicle update indicating what happened this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    /// Vehicle keeps driving in its lane
    Continue,
    /// Vehicle left the road and re-entered at the opposite end
    Wrapped,
}

/// A car or bike on one of the two road lanes
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
    pub direction: Direction,
    /// Lane offset across the road
    pub lane_z: f32,
    /// Position along the road axis
    pub x: f32,
    pub current_speed: f32,
    pub max_speed: f32,
    /// Speed the vehicle was steering towards on its last update
    pub target_speed: f32,
}

impl SimVehicle {
    pub fn new(
        id: VehicleId,
        vehicle_type: VehicleType,
        direction: Direction,
        lane_z: f32,
        x: f32,
        max_speed: f32,
    ) -> Self {
        Self {
            id,
            vehicle_type,
            direction,
            lane_z,
            x,
            current_speed: 0.0,
            max_speed,
            target_speed: max_speed,
        }
    }

    /// Whether the vehicle is in the stretch before the stop line where it
    /// must halt for a non-green light
    pub fn in_approach_window(&self, rules: &TrafficConfig) -> bool {
        let to_line = self.direction.forward_distance(self.x, rules.stop_line_x);
        to_line > 0.0 && to_line < rules.approach_window
    }

    /// Speed this vehicle wants this frame.
    ///
    /// `gap_ahead` is the forward distance to the nearest vehicle ahead in
    /// the same lane, if there is one.
    pub fn desired_speed(
        &self,
        light_is_green: bool,
        gap_ahead: Option<f32>,
        rules: &TrafficConfig,
    ) -> f32 {
        if !light_is_green && self.in_approach_window(rules) {
            return 0.0;
        }
        match gap_ahead {
            Some(gap) if gap < rules.safe_distance => 0.0,
            _ => self.max_speed,
        }
    }

    /// Move the current speed towards the target with asymmetric rates,
    /// never stepping past it
    pub fn approach_speed(&mut self, target: f32, rules: &TrafficConfig) {
        self.target_speed = target;
        if self.current_speed < target {
            self.current_speed = (self.current_speed + rules.accel_step).min(target);
        } else if self.current_speed > target {
            self.current_speed = (self.current_speed - rules.brake_step).max(target);
        }
    }

    /// Move along the lane and wrap around at the road ends
    pub fn advance(&mut self, rules: &TrafficConfig) -> VehicleUpdateResult {
        self.x += self.current_speed * self.direction.sign();

        let wrapped = match self.direction {
            Direction::Forward if self.x > rules.wrap_end => {
                self.x = rules.wrap_start;
                true
            }
            Direction::Backward if self.x < rules.wrap_start => {
                self.x = rules.wrap_end;
                true
            }
            _ => false,
        };

        if wrapped {
            self.current_speed = self.max_speed;
            VehicleUpdateResult::Wrapped
        } else {
            VehicleUpdateResult::Continue
        }
    }
}
