//! Train kinematics, gearbox and autopilot validation tests

use train_sim::simulation::{
    Control, InputEvent, ShiftPolicy, SimConfig, SimEvent, SimWorld, Throttle,
};

fn quiet_world() -> SimWorld {
    let mut config = SimConfig::default();
    config.seed = Some(1);
    SimWorld::from_config_without_traffic(config).unwrap()
}

fn world_with_policy(policy: ShiftPolicy) -> SimWorld {
    let mut config = SimConfig::default();
    config.seed = Some(1);
    config.train.shift_policy = policy;
    SimWorld::from_config_without_traffic(config).unwrap()
}

/// Run until the autopilot reports an arrival, returning the frame count
fn run_until_arrival(world: &mut SimWorld, max_frames: u64) -> Option<(u64, String)> {
    for frame in 0..max_frames {
        let report = world.tick();
        for event in report.events {
            if let SimEvent::Arrived(station) = event {
                return Some((frame, station));
            }
        }
    }
    None
}

#[test]
fn test_world_starts_parked_at_home() {
    let world = quiet_world();
    assert_eq!(world.train.position, 0.0);
    assert_eq!(world.train.speed, 0.0);
    assert_eq!(world.train.gear, 1);
    assert!(!world.autopilot.is_active());
}

#[test]
fn test_idle_train_is_stable() {
    let mut world = quiet_world();
    for _ in 0..300 {
        world.tick();
        assert_eq!(world.train.position, 0.0);
        assert_eq!(world.train.speed, 0.0);
    }
}

#[test]
fn test_position_and_speed_stay_within_bounds() {
    let mut world = quiet_world();

    world.handle_input(InputEvent::Press(Control::Brake));
    for _ in 0..400 {
        world.tick();
        assert!(world.train.position >= -20.0);
        assert!(world.train.speed.abs() <= 1.5);
    }
    assert_eq!(world.train.position, -20.0);

    world.handle_input(InputEvent::Release(Control::Brake));
    world.handle_input(InputEvent::Press(Control::Accelerate));
    for _ in 0..1200 {
        world.tick();
        assert!(world.train.position <= 600.0);
        assert!(world.train.position >= -20.0);
        assert!(world.train.speed.abs() <= 1.5);
    }
    assert_eq!(world.train.position, 600.0);
}

#[test]
fn test_gears_ramp_monotonically_while_accelerating() {
    let mut world = quiet_world();
    world.handle_input(InputEvent::Press(Control::Accelerate));

    let mut last_gear = world.train.gear;
    let mut changes = Vec::new();
    for _ in 0..300 {
        let report = world.tick();
        assert!(world.train.gear >= last_gear, "gear went down while accelerating");
        assert!(world.train.gear <= 4);
        last_gear = world.train.gear;
        changes.extend(report.events.into_iter().filter_map(|event| match event {
            SimEvent::GearChanged(change) => Some(change),
            _ => None,
        }));
    }

    assert_eq!(world.train.gear, 4);
    assert_eq!(world.train.gear_label(), "D4");
    assert_eq!(changes.len(), 3);
    for change in changes {
        assert_eq!(change.to, change.from + 1);
    }
    assert!((world.train.speed - 1.5).abs() < 1e-6);
}

#[test]
fn test_pause_policy_holds_speed_while_shifting() {
    let mut world = world_with_policy(ShiftPolicy::PauseThrottle);
    world.handle_input(InputEvent::Press(Control::Accelerate));

    let mut speeds = Vec::new();
    let mut first_shift = None;
    for frame in 0..60 {
        let report = world.tick();
        speeds.push(world.train.speed);
        if first_shift.is_none()
            && report
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::GearChanged(_)))
        {
            first_shift = Some(frame);
        }
    }

    let shift = first_shift.expect("no gear change while accelerating");
    assert!(shift > 0);
    assert_eq!(speeds[shift], speeds[shift - 1]);
    assert_eq!(speeds[shift + 1], speeds[shift]);
}

#[test]
fn test_ignore_policy_keeps_accelerating_through_shifts() {
    let mut world = world_with_policy(ShiftPolicy::Ignore);
    world.handle_input(InputEvent::Press(Control::Accelerate));

    let mut last_speed = 0.0;
    for _ in 0..30 {
        world.tick();
        assert!(world.train.speed > last_speed);
        last_speed = world.train.speed;
    }
}

#[test]
fn test_power_brake_overrides_forward_motion() {
    let mut world = quiet_world();
    world.handle_input(InputEvent::Press(Control::Accelerate));
    for _ in 0..10 {
        world.tick();
    }
    let before = world.train.speed;
    assert!(before > 0.3);

    world.handle_input(InputEvent::Release(Control::Accelerate));
    world.handle_input(InputEvent::Press(Control::Brake));
    world.tick();
    assert!((before - world.train.speed - 0.15).abs() < 1e-5);

    for _ in 0..60 {
        world.tick();
    }
    assert!(world.train.speed < 0.0, "holding brake should reverse the train");
}

#[test]
fn test_coasting_applies_friction() {
    let mut world = quiet_world();
    world.handle_input(InputEvent::Press(Control::Accelerate));
    for _ in 0..5 {
        world.tick();
    }
    world.handle_input(InputEvent::Release(Control::Accelerate));
    let before = world.train.speed;
    world.tick();
    assert!((world.train.speed - before * 0.96).abs() < 1e-6);

    for _ in 0..600 {
        world.tick();
    }
    assert_eq!(world.train.speed, 0.0);
}

#[test]
fn test_manual_apply_is_direct() {
    let mut world = quiet_world();
    world.train.apply_manual(Throttle::Forward);
    assert!((world.train.speed - 0.04).abs() < 1e-6);
    world.train.apply_manual(Throttle::Coast);
    assert!((world.train.speed - 0.0384).abs() < 1e-6);
}

#[test]
fn test_autopilot_arrives_at_station() {
    let mut world = quiet_world();
    world.navigate("about").unwrap();

    let (frame, station) = run_until_arrival(&mut world, 1200).expect("autopilot never arrived");
    assert_eq!(station, "about");
    assert!(frame < 600, "arrival took {} frames", frame);
    assert_eq!(world.train.position, 100.0);
    assert_eq!(world.train.speed, 0.0);
    assert!(!world.autopilot.is_active());
}

#[test]
fn test_autopilot_converges_between_all_stations() {
    for policy in [ShiftPolicy::PauseThrottle, ShiftPolicy::Ignore] {
        let mut world = world_with_policy(policy);
        for id in ["contact", "skills", "projects", "hero"] {
            world.navigate(id).unwrap();
            let (_, station) = run_until_arrival(&mut world, 3000)
                .unwrap_or_else(|| panic!("no arrival at {id} with {policy:?}"));
            assert_eq!(station, id);
            let x = world.route.find(id).unwrap().x;
            assert_eq!(world.train.position, x);
        }
    }
}

#[test]
fn test_driving_input_cancels_autopilot_same_frame() {
    let mut world = quiet_world();
    world.navigate("projects").unwrap();
    for _ in 0..30 {
        world.tick();
    }
    assert!(world.autopilot.is_active());

    world.handle_input(InputEvent::Press(Control::Accelerate));
    let report = world.tick();

    assert!(report.events.contains(&SimEvent::AutopilotCancelled));
    assert!(!world.autopilot.is_active());
    assert!(world.autopilot.target().is_none());
    assert!(report.ui.autopilot_station.is_none());
}

#[test]
fn test_brake_takes_over_from_autopilot_immediately() {
    let mut world = quiet_world();
    world.navigate("projects").unwrap();
    for _ in 0..30 {
        world.tick();
    }
    let speed_before = world.train.speed;

    world.handle_input(InputEvent::Press(Control::Brake));
    world.tick();
    assert!(!world.autopilot.is_active());
    assert!(world.train.speed < speed_before);
}

#[test]
fn test_navigate_to_current_station_arrives_immediately() {
    let mut world = quiet_world();
    world.navigate("hero").unwrap();
    let report = world.tick();
    assert!(report.events.contains(&SimEvent::Arrived("hero".to_string())));
    assert_eq!(world.train.position, 0.0);
}

#[test]
fn test_unknown_station_is_rejected() {
    let mut world = quiet_world();
    assert!(world.navigate("nowhere").is_err());

    // Queued directly, the bad id is ignored at tick time
    world.handle_input(InputEvent::Navigate("nowhere".to_string()));
    let report = world.tick();
    assert!(!world.autopilot.is_active());
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::AutopilotEngaged(_))));
}

#[test]
fn test_train_pose_sways_only_when_moving() {
    let mut world = quiet_world();
    world.tick();
    let pose = world.train_pose();
    assert_eq!(pose.roll, 0.0);
    assert_eq!(pose.bob, 0.0);

    world.handle_input(InputEvent::Press(Control::Accelerate));
    for _ in 0..37 {
        world.tick();
    }
    let pose = world.train_pose();
    assert!(pose.roll != 0.0 || pose.bob != 0.0);
    assert!(pose.roll.abs() <= 0.005);
    assert!(pose.bob.abs() <= 0.002);
    assert!(pose.wheel_rotation < 0.0);
}
