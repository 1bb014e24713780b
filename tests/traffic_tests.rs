//! Traffic light and road vehicle validation tests

use train_sim::simulation::{
    Direction, LightConfig, LightPhase, SimId, SimTraffic, SimTrafficLight, SimWorld,
    TrafficConfig, VehicleId, VehicleType, VehicleUpdateResult, LAMP_DIM, LAMP_ON,
};

fn empty_traffic() -> SimTraffic {
    SimTraffic::new(TrafficConfig {
        vehicles_per_lane: 0,
        ..TrafficConfig::default()
    })
}

/// Add a vehicle already moving at its max speed and return its index
fn add_moving(traffic: &mut SimTraffic, id: usize, direction: Direction, x: f32) -> usize {
    let mut vehicle =
        traffic.vehicle_at(VehicleId(SimId(id)), VehicleType::Car, direction, x, 0.3);
    vehicle.current_speed = vehicle.max_speed;
    traffic.add_vehicle(vehicle);
    traffic.vehicles.len() - 1
}

#[test]
fn test_light_cycle_durations() {
    let mut light = SimTrafficLight::new(&LightConfig::default());
    assert_eq!(light.phase, LightPhase::Green);
    assert_eq!(light.cycle_length(), 650);

    let mut expect_transition = |frames: u32, from: LightPhase, to: LightPhase| {
        for _ in 1..frames {
            assert!(light.update().is_none());
            assert_eq!(light.phase, from);
        }
        let transition = light.update().expect("phase should change");
        assert_eq!(transition.from, from);
        assert_eq!(transition.to, to);
        assert_eq!(light.phase, to);
    };

    expect_transition(300, LightPhase::Green, LightPhase::Yellow);
    expect_transition(100, LightPhase::Yellow, LightPhase::Red);
    expect_transition(250, LightPhase::Red, LightPhase::Green);
}

#[test]
fn test_light_lamp_intensities() {
    let light = SimTrafficLight::new(&LightConfig::default());
    assert_eq!(light.intensity(LightPhase::Green), LAMP_ON);
    assert_eq!(light.intensity(LightPhase::Yellow), LAMP_DIM);
    assert_eq!(light.intensity(LightPhase::Red), LAMP_DIM);
    assert!(light.is_green());
}

#[test]
fn test_vehicle_stops_before_line_on_red() {
    for (direction, start_x) in [(Direction::Forward, -40.0), (Direction::Backward, 40.0)] {
        let mut traffic = empty_traffic();
        let index = add_moving(&mut traffic, 0, direction, start_x);

        let mut last_speed = f32::MAX;
        for _ in 0..400 {
            let was_in_window = traffic.vehicles[index].in_approach_window(traffic.rules());
            traffic.update(false);
            let vehicle = &traffic.vehicles[index];
            if was_in_window {
                // The frame's target comes from the position it started at
                assert_eq!(vehicle.target_speed, 0.0);
            }
            if vehicle.in_approach_window(traffic.rules()) {
                assert!(vehicle.current_speed <= last_speed, "speed rose while braking");
                assert!(vehicle.current_speed >= 0.0);
                last_speed = vehicle.current_speed;
            }
            // Never crosses the stop line
            assert!(direction.forward_distance(vehicle.x, 0.0) > 0.0);
        }

        let vehicle = &traffic.vehicles[index];
        assert_eq!(vehicle.current_speed, 0.0);
        assert!(vehicle.in_approach_window(traffic.rules()));
        assert_eq!(traffic.queued_at_light(), 1);
        assert_eq!(traffic.stopped_count(), 1);
    }
}

#[test]
fn test_vehicle_drives_through_on_green() {
    let mut traffic = empty_traffic();
    let index = add_moving(&mut traffic, 0, Direction::Forward, -40.0);
    for _ in 0..200 {
        traffic.update(true);
    }
    let vehicle = &traffic.vehicles[index];
    assert!(vehicle.x > 0.0);
    assert_eq!(vehicle.current_speed, vehicle.max_speed);
}

#[test]
fn test_stopped_vehicle_restarts_when_green() {
    let mut traffic = empty_traffic();
    let index = add_moving(&mut traffic, 0, Direction::Forward, -40.0);
    for _ in 0..200 {
        traffic.update(false);
    }
    assert_eq!(traffic.vehicles[index].current_speed, 0.0);

    traffic.update(true);
    assert!((traffic.vehicles[index].current_speed - 0.01).abs() < 1e-6);
}

#[test]
fn test_following_vehicle_targets_zero_inside_safe_distance() {
    let mut traffic = empty_traffic();
    let rear = add_moving(&mut traffic, 0, Direction::Forward, 100.0);
    let front = add_moving(&mut traffic, 1, Direction::Forward, 110.0);

    assert_eq!(traffic.gap_ahead(rear), Some(10.0));
    assert_eq!(traffic.gap_ahead(front), None);

    traffic.update(true);
    assert_eq!(traffic.vehicles[rear].target_speed, 0.0);
    assert_eq!(
        traffic.vehicles[front].target_speed,
        traffic.vehicles[front].max_speed
    );
    assert!(traffic.vehicles[rear].current_speed < traffic.vehicles[rear].max_speed);
}

#[test]
fn test_opposite_lane_does_not_block() {
    let mut traffic = empty_traffic();
    let forward = add_moving(&mut traffic, 0, Direction::Forward, 100.0);
    add_moving(&mut traffic, 1, Direction::Backward, 105.0);
    assert_eq!(traffic.gap_ahead(forward), None);
}

#[test]
fn test_wrap_resets_position_and_speed() {
    let mut traffic = empty_traffic();
    let forward = add_moving(&mut traffic, 0, Direction::Forward, 699.9);
    let backward = add_moving(&mut traffic, 1, Direction::Backward, -99.9);

    let results = traffic.update(true);
    assert!(results.iter().all(|(_, r)| *r == VehicleUpdateResult::Wrapped));
    assert_eq!(traffic.vehicles[forward].x, -100.0);
    assert_eq!(traffic.vehicles[backward].x, 700.0);
    assert_eq!(
        traffic.vehicles[forward].current_speed,
        traffic.vehicles[forward].max_speed
    );
    assert_eq!(traffic.total_wraps, 2);
}

#[test]
fn test_populated_traffic_layout() {
    let world = SimWorld::new_with_seed(5);
    let vehicles = &world.traffic.vehicles;
    assert_eq!(vehicles.len(), 30);

    for vehicle in vehicles {
        assert!(vehicle.x >= -50.0 && vehicle.x < 550.0);
        assert_eq!(vehicle.current_speed, 0.0);
        let base = vehicle.vehicle_type.base_max_speed();
        assert!(vehicle.max_speed >= base * 0.8 && vehicle.max_speed <= base * 1.2);
        match vehicle.direction {
            Direction::Forward => assert_eq!(vehicle.lane_z, -15.0),
            Direction::Backward => assert_eq!(vehicle.lane_z, -21.0),
        }
    }
    let forward = vehicles
        .iter()
        .filter(|v| v.direction == Direction::Forward)
        .count();
    assert_eq!(forward, 15);
}

#[test]
fn test_traffic_keeps_moving_in_world() {
    let mut world = SimWorld::new_with_seed(11);
    let start: Vec<f32> = world.traffic.vehicles.iter().map(|v| v.x).collect();
    world.run(650);

    assert_eq!(world.traffic_light.phase, LightPhase::Green);
    let moved = world
        .traffic
        .vehicles
        .iter()
        .zip(&start)
        .filter(|(v, x)| (v.x - **x).abs() > 1.0)
        .count();
    assert!(moved > 0);
    for vehicle in &world.traffic.vehicles {
        assert!(vehicle.x >= -100.0 && vehicle.x <= 700.0);
        assert!(vehicle.current_speed >= 0.0 && vehicle.current_speed <= vehicle.max_speed);
    }
}

#[test]
fn test_seeded_worlds_are_reproducible() {
    let mut a = SimWorld::new_with_seed(9);
    let mut b = SimWorld::new_with_seed(9);
    a.run(240);
    b.run(240);

    let xs = |w: &SimWorld| w.traffic.vehicles.iter().map(|v| v.x).collect::<Vec<_>>();
    assert_eq!(xs(&a), xs(&b));
    assert_eq!(a.smoke.particles.len(), b.smoke.particles.len());
}
