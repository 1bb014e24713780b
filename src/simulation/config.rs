//! Tunable constants for the simulation
//!
//! Every value has a default matching the shipped scene. A JSON file can
//! override any subset of fields; missing fields keep their defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::station::Station;

/// Whether a gear change holds back throttle for the shift cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPolicy {
    /// Throttle (manual acceleration and the autopilot approach) is suspended
    /// while shifting. The power brake still applies.
    #[default]
    PauseThrottle,
    /// Shifting is purely cosmetic.
    Ignore,
}

impl std::str::FromStr for ShiftPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pause" | "pause_throttle" => Ok(ShiftPolicy::PauseThrottle),
            "ignore" => Ok(ShiftPolicy::Ignore),
            other => bail!("unknown shift policy '{other}' (expected 'pause' or 'ignore')"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    /// Multiplicative speed decay per frame with no input
    pub friction: f32,
    /// Decrement applied when throttling against the current direction
    pub power_brake: f32,
    /// Speed beyond which the power brake kicks in instead of throttle
    pub reverse_threshold: f32,
    /// Upper |speed| bound of each gear, ascending
    pub gear_breakpoints: Vec<f32>,
    pub shift_cooldown_frames: u32,
    pub shift_policy: ShiftPolicy,
    /// Per-frame fraction of the speed error closed by the autopilot
    pub autopilot_gain: f32,
    /// Distance at which the autopilot snaps onto its target
    pub arrival_tolerance: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_speed: 1.5,
            acceleration: 0.04,
            friction: 0.96,
            power_brake: 0.15,
            reverse_threshold: 0.01,
            gear_breakpoints: vec![0.38, 0.75, 1.13, 2.0],
            shift_cooldown_frames: 15,
            shift_policy: ShiftPolicy::PauseThrottle,
            autopilot_gain: 0.05,
            arrival_tolerance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub start: f32,
    pub end: f32,
    pub stations: Vec<Station>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            start: -20.0,
            end: 600.0,
            stations: Station::default_route(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    pub vehicles_per_lane: usize,
    /// Chance that a newly created vehicle is a bike
    pub bike_probability: f32,
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
    /// Vehicles leaving past these bounds reappear at the opposite one
    pub wrap_start: f32,
    pub wrap_end: f32,
    pub stop_line_x: f32,
    pub approach_window: f32,
    pub safe_distance: f32,
    pub accel_step: f32,
    pub brake_step: f32,
    pub forward_lane_z: f32,
    pub backward_lane_z: f32,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            vehicles_per_lane: 15,
            bike_probability: 0.3,
            spawn_min_x: -50.0,
            spawn_max_x: 550.0,
            wrap_start: -100.0,
            wrap_end: 700.0,
            stop_line_x: 0.0,
            approach_window: 30.0,
            safe_distance: 12.0,
            accel_step: 0.01,
            brake_step: 0.02,
            forward_lane_z: -15.0,
            backward_lane_z: -21.0,
        }
    }
}

/// Frame counts each light phase lasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub green_frames: u32,
    pub yellow_frames: u32,
    pub red_frames: u32,
    pub position_x: f32,
    pub position_z: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            green_frames: 300,
            yellow_frames: 100,
            red_frames: 250,
            position_x: 0.0,
            position_z: -12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub idle_volume: f32,
    pub volume_cap: f32,
    pub volume_per_speed: f32,
    pub base_frequency: f32,
    pub frequency_per_speed: f32,
    /// Time constant of the parameter smoothing, in seconds
    pub smoothing_secs: f32,
    /// |speed| on the previous frame above which a stop counts as braking
    pub brake_from_speed: f32,
    /// |speed| below which the train counts as stopped for the screech
    pub brake_to_speed: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            idle_volume: 0.1,
            volume_cap: 0.2,
            volume_per_speed: 2.0,
            base_frequency: 150.0,
            frequency_per_speed: 1000.0,
            smoothing_secs: 0.1,
            brake_from_speed: 0.1,
            brake_to_speed: 0.01,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub train: TrainConfig,
    pub track: TrackConfig,
    pub traffic: TrafficConfig,
    pub light: LightConfig,
    pub audio: AudioConfig,
    /// Seed for reproducible runs. `None` uses the thread RNG.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Load a config from a JSON file, falling back to defaults for any
    /// field the file leaves out
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.track.start >= self.track.end {
            bail!(
                "track start ({}) must be below track end ({})",
                self.track.start,
                self.track.end
            );
        }
        if self.track.stations.len() < 2 {
            bail!("at least two stations are required");
        }
        if self
            .track
            .stations
            .windows(2)
            .any(|pair| pair[0].x >= pair[1].x)
        {
            bail!("stations must be ordered by strictly increasing position");
        }
        if self.train.max_speed <= 0.0 {
            bail!("train max speed must be positive");
        }
        if !(0.0..=1.0).contains(&self.train.friction) {
            bail!("train friction must be within [0, 1]");
        }
        if self.train.gear_breakpoints.is_empty()
            || self
                .train
                .gear_breakpoints
                .windows(2)
                .any(|pair| pair[0] >= pair[1])
        {
            bail!("gear breakpoints must be non-empty and strictly ascending");
        }
        if self.traffic.wrap_start >= self.traffic.wrap_end {
            bail!("traffic wrap bounds are inverted");
        }
        if self.traffic.spawn_min_x >= self.traffic.spawn_max_x {
            bail!(
                "traffic spawn range [{}, {}) is empty",
                self.traffic.spawn_min_x,
                self.traffic.spawn_max_x
            );
        }
        Ok(())
    }
}
