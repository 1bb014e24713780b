//! Train Simulation Library
//!
//! A train and road traffic simulation that can run independently or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
