//! Station UI state, audio feedback, effects and configuration tests

use std::sync::{Arc, Mutex};

use train_sim::simulation::{
    AudioSink, BrakeDetector, Control, EngineParams, InputEvent, InputScript, LightPhase,
    ShiftPolicy, SimConfig, SimEvent, SimWorld, SoundCue, Station,
};

fn quiet_world() -> SimWorld {
    let mut config = SimConfig::default();
    config.seed = Some(2);
    SimWorld::from_config_without_traffic(config).unwrap()
}

/// Audio backend that records every cue it is asked to play
#[derive(Clone, Default)]
struct RecordingSink {
    cues: Arc<Mutex<Vec<SoundCue>>>,
    engine: Arc<Mutex<Option<EngineParams>>>,
}

impl RecordingSink {
    fn count(&self, cue: SoundCue) -> usize {
        self.cues.lock().unwrap().iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for RecordingSink {
    fn set_engine(&mut self, params: EngineParams) {
        *self.engine.lock().unwrap() = Some(params);
    }

    fn play(&mut self, cue: SoundCue) {
        self.cues.lock().unwrap().push(cue);
    }
}

#[test]
fn test_parked_at_home_on_start() {
    let mut world = quiet_world();
    let ui = world.tick().ui;

    assert_eq!(ui.progress, 0.0);
    assert_eq!(ui.parked_station.as_deref(), Some("hero"));
    assert!(ui.station_mode);
    assert!(!ui.first_departed);
    assert_eq!(ui.gear_label, "D1");
    assert!(ui.stations[0].active && ui.stations[0].parked);
    assert!(ui.stations[1..].iter().all(|s| !s.active && !s.passed));
}

#[test]
fn test_progress_and_passed_flags() {
    let mut world = quiet_world();
    world.train.park_at(250.0);
    let ui = world.tick().ui;

    assert!((ui.progress - 50.0).abs() < 1e-4);
    let passed: Vec<&str> = ui
        .stations
        .iter()
        .filter(|s| s.passed)
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(passed, vec!["hero", "about", "skills"]);
    assert!(ui.parked_station.is_none());
    assert!(!ui.station_mode);

    world.train.park_at(-20.0);
    assert_eq!(world.tick().ui.progress, 0.0);
    world.train.park_at(600.0);
    assert_eq!(world.tick().ui.progress, 100.0);
}

#[test]
fn test_moving_through_station_is_not_parked() {
    let mut world = quiet_world();
    world.train.park_at(99.0);
    world.train.speed = 0.5;
    let ui = world.tick().ui;
    let about = &ui.stations[1];
    assert!(about.active);
    assert!(!about.parked);
    assert!(!ui.station_mode);
}

#[test]
fn test_departed_flag_is_sticky() {
    let mut world = quiet_world();
    assert!(!world.tick().ui.first_departed);

    world.train.park_at(150.0);
    assert!(world.tick().ui.first_departed);

    // Inside the departure distance but not parked: unchanged
    world.train.park_at(8.0);
    assert!(world.tick().ui.first_departed);

    world.train.park_at(0.0);
    assert!(!world.tick().ui.first_departed);
}

#[test]
fn test_station_labels_fade_with_distance() {
    let mut world = quiet_world();
    let ui = world.tick().ui;

    let hero = &ui.labels[0];
    assert_eq!(hero.station_id, "hero");
    assert_eq!(hero.opacity, 1.0);
    assert!(hero.screen.is_some());

    let contact = ui.labels.last().unwrap();
    assert_eq!(contact.opacity, 0.0);

    world.train.park_at(25.0);
    let ui = world.tick().ui;
    assert!((ui.labels[0].opacity - 0.5).abs() < 1e-4);
}

#[test]
fn test_gear_shift_flash_lasts_eighteen_frames() {
    let mut world = quiet_world();
    world.handle_input(InputEvent::Press(Control::Accelerate));

    let mut reports = Vec::new();
    let mut shift_frame = None;
    for frame in 0..80 {
        let report = world.tick();
        if shift_frame.is_none()
            && report
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::GearChanged(_)))
        {
            shift_frame = Some(frame);
        }
        reports.push(report);
    }

    let shift = shift_frame.expect("no gear change");
    assert!(!reports[shift - 1].ui.gear_shifting);
    assert!(reports[shift].ui.gear_shifting);
    assert_eq!(reports[shift].ui.gear_label, "D2");
    assert!(reports[shift + 17].ui.gear_shifting);
    assert!(!reports[shift + 18].ui.gear_shifting);
}

#[test]
fn test_horn_flash_and_whistle() {
    let mut world = quiet_world();
    world.handle_input(InputEvent::Press(Control::Horn));
    let report = world.tick();
    assert!(report.ui.horn_active);
    assert!(report.has_sound(SoundCue::Whistle));

    world.handle_input(InputEvent::Release(Control::Horn));
    for _ in 0..11 {
        assert!(world.tick().ui.horn_active);
    }
    assert!(!world.tick().ui.horn_active);
}

#[test]
fn test_horn_does_not_cancel_autopilot() {
    let mut world = quiet_world();
    world.navigate("skills").unwrap();
    world.tick();
    world.handle_input(InputEvent::Press(Control::Horn));
    let report = world.tick();
    assert!(world.autopilot.is_active());
    assert!(!report.events.contains(&SimEvent::AutopilotCancelled));
}

#[test]
fn test_audio_unlock_plays_whistle_once() {
    let mut world = quiet_world();
    assert!(!world.audio_available());

    let sink = RecordingSink::default();
    world.unlock_audio(Box::new(sink.clone()));
    world.unlock_audio(Box::new(sink.clone()));
    assert!(world.audio_available());
    assert_eq!(sink.count(SoundCue::Whistle), 1);

    world.handle_input(InputEvent::Press(Control::Horn));
    world.tick();
    assert_eq!(sink.count(SoundCue::Whistle), 2);
    assert!(sink.engine.lock().unwrap().is_some());
}

#[test]
fn test_brake_screech_on_autopilot_arrival() {
    let mut world = quiet_world();
    let sink = RecordingSink::default();
    world.unlock_audio(Box::new(sink.clone()));
    world.navigate("about").unwrap();

    let mut arrival = None;
    for _ in 0..1200 {
        let report = world.tick();
        if report.events.contains(&SimEvent::Arrived("about".to_string())) {
            arrival = Some(report);
            break;
        }
    }
    let report = arrival.expect("autopilot never arrived");
    assert!(report.has_sound(SoundCue::BrakeScreech));
    assert_eq!(sink.count(SoundCue::BrakeScreech), 1);

    // Standing still afterwards does not screech again
    for _ in 0..60 {
        assert!(!world.tick().has_sound(SoundCue::BrakeScreech));
    }
}

#[test]
fn test_brake_detector_edges() {
    let mut detector = BrakeDetector::new(0.1, 0.01);
    assert!(!detector.update(0.5));
    assert!(detector.update(0.0));
    assert!(!detector.update(0.0));
    assert!(!detector.update(0.05));
    assert!(!detector.update(0.0));
}

#[test]
fn test_engine_params_follow_speed() {
    let mut world = quiet_world();
    for _ in 0..60 {
        world.tick();
    }
    let idle = world.last_report.engine;
    assert!((idle.volume - 0.1).abs() < 1e-3);
    assert!((idle.frequency - 150.0).abs() < 1.0);

    world.handle_input(InputEvent::Press(Control::Accelerate));
    for _ in 0..200 {
        world.tick();
    }
    let fast = world.last_report.engine;
    assert!((fast.volume - 0.3).abs() < 1e-3);
    assert!((fast.frequency - 1650.0).abs() < 1.0);
}

#[test]
fn test_smoke_is_denser_when_moving() {
    let mut idle = quiet_world();
    idle.run(300);
    assert!(idle.smoke.particles.len() < 10);

    let mut moving = quiet_world();
    moving.handle_input(InputEvent::Press(Control::Brake));
    moving.run(300);
    assert!(moving.smoke.particles.len() > 10);

    for particle in &moving.smoke.particles {
        assert!(particle.life > 0.0 && particle.life <= 1.0);
        assert!(particle.opacity() <= 0.6);
    }
}

#[test]
fn test_light_transitions_reported() {
    let mut world = SimWorld::new_with_seed(4);
    let mut transitions = Vec::new();
    for _ in 0..650 {
        for event in world.tick().events {
            if let SimEvent::LightChanged(t) = event {
                transitions.push(t.to);
            }
        }
    }
    assert_eq!(
        transitions,
        vec![LightPhase::Yellow, LightPhase::Red, LightPhase::Green]
    );
}

#[test]
fn test_config_file_overrides_defaults() {
    let path = std::env::temp_dir().join(format!("train_sim_config_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "train": { "shift_policy": "ignore", "max_speed": 1.0 },
            "light": { "green_frames": 10 },
            "seed": 42
        }"#,
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.train.shift_policy, ShiftPolicy::Ignore);
    assert_eq!(config.train.max_speed, 1.0);
    assert_eq!(config.train.acceleration, 0.04);
    assert_eq!(config.light.green_frames, 10);
    assert_eq!(config.light.red_frames, 250);
    assert_eq!(config.seed, Some(42));

    let mut world = SimWorld::from_config(config).unwrap();
    world.run(10);
    assert_eq!(world.traffic_light.phase, LightPhase::Yellow);

    world.handle_input(InputEvent::Press(Control::Accelerate));
    world.run(100);
    assert!(world.train.speed <= 1.0);
}

#[test]
fn test_invalid_configs_rejected() {
    let mut config = SimConfig::default();
    config.track.stations = vec![Station::new("only", 0.0, "Only")];
    assert!(SimWorld::from_config(config).is_err());

    let mut config = SimConfig::default();
    config.track.start = 700.0;
    assert!(SimWorld::from_config(config).is_err());

    let mut config = SimConfig::default();
    config.traffic.spawn_min_x = 100.0;
    config.traffic.spawn_max_x = 100.0;
    let err = SimWorld::from_config(config).unwrap_err();
    assert!(err.to_string().contains("spawn range"));

    let missing = std::env::temp_dir().join("train_sim_missing_config.json");
    assert!(SimConfig::load(&missing).is_err());
}

#[test]
fn test_scripted_drive() {
    let script =
        InputScript::parse("0:navigate=resume, 100:press=accelerate, 101:release=accelerate")
            .unwrap();
    let mut world = quiet_world();
    let mut cancelled_at = None;

    for frame in 0..200 {
        for event in script.events_at(frame) {
            world.handle_input(event.clone());
        }
        if world.tick().events.contains(&SimEvent::AutopilotCancelled) {
            cancelled_at = Some(frame);
        }
    }
    assert_eq!(cancelled_at, Some(100));
    assert!(!world.autopilot.is_active());
    assert!(world.train.position > 0.0);
}
