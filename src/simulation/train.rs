//! Train kinematics and the gearbox
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::debug;

use super::config::{ShiftPolicy, TrainConfig};
use super::input::Throttle;
use super::types::SPEED_EPSILON;

/// Reported when the gearbox changes gear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GearChange {
    pub from: u8,
    pub to: u8,
}

/// Gear for a given |speed|: one plus the number of ascending breakpoints
/// the speed exceeds, capped at the number of breakpoints.
pub fn gear_for_speed(speed: f32, breakpoints: &[f32]) -> u8 {
    let abs_speed = speed.abs();
    let exceeded = breakpoints
        .iter()
        .take_while(|&&limit| abs_speed > limit)
        .count();
    (exceeded + 1).min(breakpoints.len().max(1)) as u8
}

/// HUD label for a gear
pub fn gear_label(gear: u8) -> String {
    format!("D{gear}")
}

/// The train on its 1-D track
#[derive(Debug, Clone)]
pub struct SimTrain {
    /// Position along the track axis
    pub position: f32,
    /// Signed speed in units per frame
    pub speed: f32,
    pub gear: u8,
    pub is_shifting: bool,
    /// Frames left before the next shift can be detected
    pub shift_timer: u32,
    /// Accumulated wheel angle in radians
    pub wheel_rotation: f32,
    config: TrainConfig,
    track_start: f32,
    track_end: f32,
}

impl SimTrain {
    pub fn new(config: TrainConfig, track_start: f32, track_end: f32) -> Self {
        Self {
            position: 0.0_f32.clamp(track_start, track_end),
            speed: 0.0,
            gear: 1,
            is_shifting: false,
            shift_timer: 0,
            wheel_rotation: 0.0,
            config,
            track_start,
            track_end,
        }
    }

    pub fn max_speed(&self) -> f32 {
        self.config.max_speed
    }

    pub fn track_bounds(&self) -> (f32, f32) {
        (self.track_start, self.track_end)
    }

    pub fn gear_label(&self) -> String {
        gear_label(self.gear)
    }

    /// Whether throttle input is currently held back by a gear change
    pub fn throttle_suspended(&self) -> bool {
        self.config.shift_policy == ShiftPolicy::PauseThrottle && self.is_shifting
    }

    /// Detect gear changes from the current speed and run the shift cooldown.
    /// Returns the change if one was triggered this frame.
    pub fn update_gearbox(&mut self) -> Option<GearChange> {
        let target = gear_for_speed(self.speed, &self.config.gear_breakpoints);
        let mut change = None;

        if target != self.gear && !self.is_shifting && self.shift_timer == 0 {
            change = Some(GearChange {
                from: self.gear,
                to: target,
            });
            debug!("shifting {} -> {}", gear_label(self.gear), gear_label(target));
            self.gear = target;
            self.is_shifting = true;
            self.shift_timer = self.config.shift_cooldown_frames;
        }

        if self.is_shifting {
            self.shift_timer = self.shift_timer.saturating_sub(1);
            if self.shift_timer == 0 {
                self.is_shifting = false;
            }
        }

        change
    }

    /// Apply one frame of manual control to the speed
    pub fn apply_manual(&mut self, throttle: Throttle) {
        let throttle_ok = !self.throttle_suspended();
        let TrainConfig {
            acceleration,
            power_brake,
            reverse_threshold,
            friction,
            ..
        } = self.config;

        match throttle {
            Throttle::Forward => {
                // Throttling against a reversing train brakes first
                if self.speed < -reverse_threshold {
                    self.speed += power_brake;
                } else if throttle_ok {
                    self.speed += acceleration;
                }
            }
            Throttle::Reverse => {
                if self.speed > reverse_threshold {
                    self.speed -= power_brake;
                } else if throttle_ok {
                    self.speed -= acceleration;
                }
            }
            Throttle::Coast => self.speed *= friction,
        }
    }

    /// Clamp speed, move, and clamp position to the track
    pub fn integrate(&mut self) {
        let max_speed = self.config.max_speed;
        self.speed = self.speed.clamp(-max_speed, max_speed);
        if self.speed.abs() < SPEED_EPSILON {
            self.speed = 0.0;
        }

        self.position = (self.position + self.speed).clamp(self.track_start, self.track_end);
        self.wheel_rotation -= self.speed * 0.5;
    }

    /// Place the train at rest at a track position
    pub fn park_at(&mut self, position: f32) {
        self.position = position.clamp(self.track_start, self.track_end);
        self.speed = 0.0;
    }
}
