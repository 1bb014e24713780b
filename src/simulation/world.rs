//! Main simulation world that ties everything together
//!
//! This is the entry point for running the train simulation
//! without any Bevy dependencies.

use anyhow::Result;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::audio::{AudioFeedback, AudioSink, EngineParams, SoundCue};
use super::autopilot::{Autopilot, AutopilotStep};
use super::config::SimConfig;
use super::effects::{Effect, EffectQueue};
use super::input::{AutopilotRequest, InputEvent, InputState};
use super::projection::{CameraRig, Viewport};
use super::smoke::SmokeEmitter;
use super::station::Route;
use super::traffic::SimTraffic;
use super::traffic_light::{LightPhase, LightTransition, SimTrafficLight};
use super::train::{GearChange, SimTrain};
use super::types::{Direction, VehicleId, FRAME_SECS};
use super::ui_sync::{UiSnapshot, UiSync};
use super::vehicle::VehicleUpdateResult;

/// Discrete things that happened during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    GearChanged(GearChange),
    LightChanged(LightTransition),
    AutopilotEngaged(String),
    AutopilotCancelled,
    /// Autopilot reached the station with this id
    Arrived(String),
    Sound(SoundCue),
    VehicleWrapped(VehicleId),
}

/// Everything produced by one tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    /// Index of the frame this report belongs to
    pub frame: u64,
    pub ui: UiSnapshot,
    pub engine: EngineParams,
    pub events: Vec<SimEvent>,
}

impl FrameReport {
    pub fn has_sound(&self, cue: SoundCue) -> bool {
        self.events.contains(&SimEvent::Sound(cue))
    }
}

/// Cosmetic train body motion derived from speed and time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainPose {
    pub x: f32,
    /// Sideways rock around the track axis, radians
    pub roll: f32,
    /// Vertical bounce
    pub bob: f32,
    pub wheel_rotation: f32,
}

/// The main simulation world
#[derive(Debug)]
pub struct SimWorld {
    pub train: SimTrain,
    pub autopilot: Autopilot,
    pub traffic_light: SimTrafficLight,
    pub traffic: SimTraffic,
    pub smoke: SmokeEmitter,
    pub route: Route,
    pub camera_rig: CameraRig,
    pub viewport: Viewport,
    pub effects: EffectQueue,
    pub input: InputState,

    audio: AudioFeedback,
    ui_sync: UiSync,

    /// Report of the most recent tick
    pub last_report: FrameReport,

    /// Frames simulated so far
    pub frame: u64,

    /// Simulation time in seconds
    pub time: f32,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Self {
        let mut world = Self {
            train: SimTrain::new(config.train.clone(), config.track.start, config.track.end),
            autopilot: Autopilot::new(config.train.autopilot_gain, config.train.arrival_tolerance),
            traffic_light: SimTrafficLight::new(&config.light),
            traffic: SimTraffic::new(config.traffic.clone()),
            smoke: SmokeEmitter::new(),
            route: Route::new(config.track.stations.clone()),
            camera_rig: CameraRig::default(),
            viewport: Viewport::default(),
            effects: EffectQueue::new(),
            input: InputState::new(),
            audio: AudioFeedback::new(config.audio.clone()),
            ui_sync: UiSync::new(),
            last_report: FrameReport::default(),
            frame: 0,
            time: 0.0,
            rng,
        };

        match &mut world.rng {
            Some(rng) => world.traffic.populate(rng, 0),
            None => world.traffic.populate(&mut rand::rng(), 0),
        }
        world.last_report.ui = world.sync_ui();
        world
    }

    /// A world with the default scene and an unseeded RNG
    pub fn new() -> Self {
        Self::new_internal(SimConfig::default(), None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(SimConfig::default(), Some(StdRng::seed_from_u64(seed)))
    }

    /// Create a world from a validated configuration. The config's seed,
    /// if set, makes the run reproducible.
    pub fn from_config(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.seed.map(StdRng::seed_from_u64);
        Ok(Self::new_internal(config, rng))
    }

    /// Same as [`SimWorld::from_config`] but without road traffic, for
    /// scenarios that place vehicles by hand
    pub fn from_config_without_traffic(mut config: SimConfig) -> Result<Self> {
        config.traffic.vehicles_per_lane = 0;
        Self::from_config(config)
    }

    /// Queue an input event for the next tick
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue a drive to a station, rejecting unknown station ids immediately
    pub fn navigate(&mut self, station_id: &str) -> Result<()> {
        self.route.find(station_id)?;
        self.input.push(InputEvent::Navigate(station_id.to_string()));
        Ok(())
    }

    /// Attach an audio backend, e.g. after the first user gesture
    pub fn unlock_audio(&mut self, sink: Box<dyn AudioSink>) {
        self.audio.unlock(sink);
    }

    pub fn audio_available(&self) -> bool {
        self.audio.is_available()
    }

    fn apply_autopilot_request(&mut self, request: AutopilotRequest, events: &mut Vec<SimEvent>) {
        match request {
            AutopilotRequest::Keep => {}
            AutopilotRequest::Cancel => {
                if self.autopilot.cancel() {
                    info!("autopilot cancelled by manual input");
                    events.push(SimEvent::AutopilotCancelled);
                }
            }
            AutopilotRequest::Engage(id) => match self.route.find(&id) {
                Ok(station) => {
                    let (start, end) = self.train.track_bounds();
                    let target = station.x.clamp(start, end);
                    self.autopilot.engage(&id, target);
                    events.push(SimEvent::AutopilotEngaged(id));
                }
                Err(err) => warn!("ignoring navigation: {err:#}"),
            },
        }
    }

    fn sync_ui(&mut self) -> UiSnapshot {
        self.ui_sync.update(
            &self.train,
            &self.route,
            &self.camera_rig.camera,
            self.viewport,
            &self.effects,
            self.autopilot.station(),
        )
    }

    /// Main simulation tick: advance everything by one frame
    pub fn tick(&mut self) -> FrameReport {
        let mut events = Vec::new();

        // Input
        let intent = self.input.drain();
        self.apply_autopilot_request(intent.autopilot, &mut events);
        if intent.horn {
            self.audio.play(SoundCue::Whistle);
            self.effects.trigger(Effect::HornButtonFlash);
            events.push(SimEvent::Sound(SoundCue::Whistle));
        }

        // Traffic light, then the vehicles that obey it
        if let Some(transition) = self.traffic_light.update() {
            events.push(SimEvent::LightChanged(transition));
        }
        for (id, result) in self.traffic.update(self.traffic_light.is_green()) {
            if result == VehicleUpdateResult::Wrapped {
                events.push(SimEvent::VehicleWrapped(id));
            }
        }

        // Train
        if let Some(change) = self.train.update_gearbox() {
            self.effects.trigger(Effect::GearShiftFlash);
            events.push(SimEvent::GearChanged(change));
        }
        match self.autopilot.step(&mut self.train) {
            AutopilotStep::Idle => self.train.apply_manual(intent.throttle),
            AutopilotStep::Driving => {}
            AutopilotStep::Arrived(station) => {
                info!("arrived at '{}' (frame {})", station, self.frame);
                events.push(SimEvent::Arrived(station));
            }
        }
        self.train.integrate();

        let speed = self.train.speed;
        match &mut self.rng {
            Some(rng) => self.smoke.update(rng, speed),
            None => self.smoke.update(&mut rand::rng(), speed),
        }

        // Presentation state
        self.camera_rig.follow(self.train.position);
        let ui = self.sync_ui();
        let (engine, cues) = self.audio.update(speed, FRAME_SECS);
        events.extend(cues.into_iter().map(SimEvent::Sound));
        self.effects.tick();

        let report = FrameReport {
            frame: self.frame,
            ui,
            engine,
            events,
        };
        self.frame += 1;
        self.time += FRAME_SECS;
        self.last_report = report.clone();
        report
    }

    /// Run `frames` ticks and return the last report
    pub fn run(&mut self, frames: u64) -> FrameReport {
        for _ in 0..frames {
            self.tick();
        }
        self.last_report.clone()
    }

    /// Cosmetic sway and bounce for the train body at the current time
    pub fn train_pose(&self) -> TrainPose {
        let speed = self.train.speed.abs();
        let (roll, bob) = if speed > 0.01 {
            let ratio = speed / self.train.max_speed();
            let millis = self.time * 1000.0;
            (
                (millis * 0.005).sin() * 0.005 * ratio,
                (millis * 0.01).sin() * 0.002 * ratio,
            )
        } else {
            (0.0, 0.0)
        };
        TrainPose {
            x: self.train.position,
            roll,
            bob,
            wheel_rotation: self.train.wheel_rotation,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let ui = &self.last_report.ui;
        println!("=== Train Simulation Summary ===");
        println!("Frame: {} ({:.2}s)", self.frame, self.time);
        println!(
            "Train: x={:.2}, speed={:.3}, gear={}{}",
            self.train.position,
            self.train.speed,
            self.train.gear_label(),
            if self.train.is_shifting { " (shifting)" } else { "" }
        );
        match self.autopilot.station() {
            Some(station) => println!("Autopilot: driving to '{}'", station),
            None => println!("Autopilot: off"),
        }
        println!(
            "Progress: {:.1}%  Parked at: {}",
            ui.progress,
            ui.parked_station.as_deref().unwrap_or("-")
        );
        println!(
            "Traffic light: {:?} ({} frames in phase)",
            self.traffic_light.phase, self.traffic_light.timer
        );
        println!(
            "Vehicles: {} (stopped: {}, queued at light: {}, wraps: {})",
            self.traffic.vehicles.len(),
            self.traffic.stopped_count(),
            self.traffic.queued_at_light(),
            self.traffic.total_wraps
        );
        println!("Smoke particles: {}", self.smoke.particles.len());
        println!(
            "Engine: volume={:.3}, cutoff={:.0}Hz, audio={}",
            self.last_report.engine.volume,
            self.last_report.engine.frequency,
            if self.audio_available() { "on" } else { "off" }
        );
    }

    /// Draw the track and road as a strip in the terminal
    pub fn draw_map(&self) {
        const WIDTH: usize = 100;
        let rules = self.traffic.rules();
        let (min_x, max_x) = (rules.wrap_start, rules.wrap_end);

        let to_col = |x: f32| -> usize {
            let t = ((x - min_x) / (max_x - min_x)).clamp(0.0, 1.0);
            ((t * (WIDTH - 1) as f32).round() as usize).min(WIDTH - 1)
        };

        let mut backward_lane = vec!['-'; WIDTH];
        let mut forward_lane = vec!['-'; WIDTH];
        let mut signal = vec![' '; WIDTH];
        let mut track = vec!['='; WIDTH];

        for vehicle in &self.traffic.vehicles {
            let lane = match vehicle.direction {
                Direction::Forward => &mut forward_lane,
                Direction::Backward => &mut backward_lane,
            };
            lane[to_col(vehicle.x)] = match vehicle.direction {
                Direction::Forward => '>',
                Direction::Backward => '<',
            };
        }

        signal[to_col(self.traffic_light.position.x)] = match self.traffic_light.phase {
            LightPhase::Green => 'G',
            LightPhase::Yellow => 'Y',
            LightPhase::Red => 'R',
        };

        for station in self.route.stations() {
            track[to_col(station.x)] = '|';
        }
        track[to_col(self.train.position)] = 'T';

        println!("\n=== Track Map ===");
        println!("Legend: T=Train, |=Station, >/<=Vehicle, G/Y/R=Traffic light");
        println!();
        for row in [&backward_lane, &forward_lane, &signal, &track] {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
