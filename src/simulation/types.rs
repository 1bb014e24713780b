//! Core types for the train simulation
//!
//! These are standalone types that don't depend on Bevy.

use serde::{Deserialize, Serialize};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for road vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub SimId);

/// Kind of road vehicle. Only affects visuals and the max speed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    /// Base max speed before the per-vehicle random factor is applied
    pub fn base_max_speed(self) -> f32 {
        match self {
            VehicleType::Car => 0.3,
            VehicleType::Bike => 0.45,
        }
    }
}

/// Direction of travel along the x axis. Each road lane has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Moving towards +x
    Forward,
    /// Moving towards -x
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// Distance from `from` to `to` measured along this direction of travel.
    /// Positive means `to` is ahead.
    pub fn forward_distance(self, from: f32, to: f32) -> f32 {
        (to - from) * self.sign()
    }
}

/// A 3D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Position) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Position) -> Position {
        Position {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(&self) -> Position {
        let len = self.length();
        if len > 0.0 {
            Position::new(self.x / len, self.y / len, self.z / len)
        } else {
            Position::default()
        }
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::AddAssign for Position {
    fn add_assign(&mut self, rhs: Position) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

/// Frames per second the simulation constants are tuned for
pub const FRAME_RATE: f32 = 60.0;

/// Seconds of simulated time per frame
pub const FRAME_SECS: f32 = 1.0 / FRAME_RATE;

/// Speeds below this are snapped to zero to stop asymptotic creep
pub const SPEED_EPSILON: f32 = 0.001;

/// Convert a wall-clock duration in milliseconds to whole frames
pub fn frames_for_millis(millis: u32) -> u32 {
    ((millis as f32 / 1000.0) * FRAME_RATE).round() as u32
}
