//! Standalone train simulation module
//!
//! This module contains all the core simulation logic (train kinematics,
//! autopilot, road traffic, effects and UI state) that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod audio;
mod autopilot;
mod config;
mod effects;
mod input;
mod projection;
mod script;
mod smoke;
mod station;
mod traffic;
mod traffic_light;
mod train;
mod types;
mod ui_sync;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use audio::{
    engine_targets, AudioFeedback, AudioSink, BrakeDetector, EngineParams, ExpRamp, LogSink,
    Oscillator, SmoothedParam, SoundCue, Voice, Waveform,
};
#[allow(unused_imports)]
pub use autopilot::{Autopilot, AutopilotStep};
#[allow(unused_imports)]
pub use config::{
    AudioConfig, LightConfig, ShiftPolicy, SimConfig, TrackConfig, TrafficConfig, TrainConfig,
};
#[allow(unused_imports)]
pub use effects::{Effect, EffectQueue};
#[allow(unused_imports)]
pub use input::{AutopilotRequest, Control, FrameIntent, InputEvent, InputState, Throttle};
#[allow(unused_imports)]
pub use projection::{Camera, CameraRig, Viewport, FOLLOW_RATE};
#[allow(unused_imports)]
pub use script::InputScript;
#[allow(unused_imports)]
pub use smoke::{SmokeEmitter, SmokeParticle, BASE_OPACITY, CHIMNEY_OFFSET};
#[allow(unused_imports)]
pub use station::{Route, Station};
#[allow(unused_imports)]
pub use traffic::SimTraffic;
#[allow(unused_imports)]
pub use traffic_light::{LightPhase, LightTransition, SimTrafficLight, LAMP_DIM, LAMP_ON};
#[allow(unused_imports)]
pub use train::{gear_for_speed, gear_label, GearChange, SimTrain};
#[allow(unused_imports)]
pub use types::{
    frames_for_millis, Direction, Position, SimId, VehicleId, VehicleType, FRAME_RATE, FRAME_SECS,
    SPEED_EPSILON,
};
#[allow(unused_imports)]
pub use ui_sync::{
    label_opacity, progress_percent, LabelPlacement, StationStatus, UiSnapshot, UiSync,
    ACTIVE_RADIUS, DEPART_DISTANCE, LABEL_FADE_DISTANCE, LABEL_HEIGHT, LABEL_Z, PARKED_SPEED,
    PASSED_MARGIN,
};
#[allow(unused_imports)]
pub use vehicle::{SimVehicle, VehicleUpdateResult};
pub use world::{FrameReport, SimEvent, SimWorld, TrainPose};
