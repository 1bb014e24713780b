//! Traffic light logic for the road crossing
//!
//! A fixed-time cycle green → yellow → red → green, counted in frames.

use log::debug;

use super::config::LightConfig;
use super::types::Position;

/// Brightness of the lit lamp
pub const LAMP_ON: f32 = 1.0;
/// Brightness of an unlit lamp
pub const LAMP_DIM: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightPhase {
    Green,
    Yellow,
    Red,
}

impl LightPhase {
    pub fn next(self) -> LightPhase {
        match self {
            LightPhase::Green => LightPhase::Yellow,
            LightPhase::Yellow => LightPhase::Red,
            LightPhase::Red => LightPhase::Green,
        }
    }

    pub const ALL: [LightPhase; 3] = [LightPhase::Red, LightPhase::Yellow, LightPhase::Green];
}

/// Reported on the frame the light changes phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightTransition {
    pub from: LightPhase,
    pub to: LightPhase,
}

#[derive(Debug, Clone)]
pub struct SimTrafficLight {
    pub phase: LightPhase,
    /// Frames spent in the current phase
    pub timer: u32,
    pub position: Position,
    green_frames: u32,
    yellow_frames: u32,
    red_frames: u32,
}

impl SimTrafficLight {
    pub fn new(config: &LightConfig) -> Self {
        Self {
            phase: LightPhase::Green,
            timer: 0,
            position: Position::new(config.position_x, 0.0, config.position_z),
            green_frames: config.green_frames,
            yellow_frames: config.yellow_frames,
            red_frames: config.red_frames,
        }
    }

    /// How many frames a phase lasts
    pub fn duration(&self, phase: LightPhase) -> u32 {
        match phase {
            LightPhase::Green => self.green_frames,
            LightPhase::Yellow => self.yellow_frames,
            LightPhase::Red => self.red_frames,
        }
    }

    /// Frames in one full cycle
    pub fn cycle_length(&self) -> u32 {
        self.green_frames + self.yellow_frames + self.red_frames
    }

    pub fn is_green(&self) -> bool {
        self.phase == LightPhase::Green
    }

    /// Lamp brightness for the given phase's lamp
    pub fn intensity(&self, lamp: LightPhase) -> f32 {
        if lamp == self.phase {
            LAMP_ON
        } else {
            LAMP_DIM
        }
    }

    /// Advance one frame. Returns the transition if the phase changed.
    pub fn update(&mut self) -> Option<LightTransition> {
        self.timer += 1;
        if self.timer < self.duration(self.phase) {
            return None;
        }

        let transition = LightTransition {
            from: self.phase,
            to: self.phase.next(),
        };
        debug!("traffic light {:?} -> {:?}", transition.from, transition.to);
        self.phase = transition.to;
        self.timer = 0;
        Some(transition)
    }
}
