//! The road beside the track: two opposing lanes of vehicles
//!
//! Vehicles are updated in place, one after another, so a vehicle later in
//! the list sees the positions earlier vehicles already moved to this frame.

use ordered_float::OrderedFloat;
use rand::Rng;

use super::config::TrafficConfig;
use super::types::{Direction, SimId, VehicleId, VehicleType};
use super::vehicle::{SimVehicle, VehicleUpdateResult};

#[derive(Debug, Clone)]
pub struct SimTraffic {
    pub vehicles: Vec<SimVehicle>,
    rules: TrafficConfig,
    /// Total wrap-arounds since the start, for summaries
    pub total_wraps: usize,
}

impl SimTraffic {
    pub fn new(rules: TrafficConfig) -> Self {
        Self {
            vehicles: Vec::new(),
            rules,
            total_wraps: 0,
        }
    }

    pub fn rules(&self) -> &TrafficConfig {
        &self.rules
    }

    /// Create the configured number of vehicles in each lane at random
    /// positions. IDs are assigned from `first_id` upwards.
    pub fn populate<R: Rng>(&mut self, rng: &mut R, first_id: usize) {
        let mut next_id = first_id;
        for _ in 0..self.rules.vehicles_per_lane {
            for direction in [Direction::Forward, Direction::Backward] {
                let vehicle = self.random_vehicle(rng, VehicleId(SimId(next_id)), direction);
                self.vehicles.push(vehicle);
                next_id += 1;
            }
        }
    }

    fn random_vehicle<R: Rng>(
        &self,
        rng: &mut R,
        id: VehicleId,
        direction: Direction,
    ) -> SimVehicle {
        let vehicle_type = if rng.random::<f32>() < self.rules.bike_probability {
            VehicleType::Bike
        } else {
            VehicleType::Car
        };
        let x = rng.random_range(self.rules.spawn_min_x..self.rules.spawn_max_x);
        let max_speed = vehicle_type.base_max_speed() * rng.random_range(0.8..1.2);
        self.vehicle_at(id, vehicle_type, direction, x, max_speed)
    }

    /// Build a vehicle in the lane for `direction`
    pub fn vehicle_at(
        &self,
        id: VehicleId,
        vehicle_type: VehicleType,
        direction: Direction,
        x: f32,
        max_speed: f32,
    ) -> SimVehicle {
        let lane_z = match direction {
            Direction::Forward => self.rules.forward_lane_z,
            Direction::Backward => self.rules.backward_lane_z,
        };
        SimVehicle::new(id, vehicle_type, direction, lane_z, x, max_speed)
    }

    /// Add a vehicle directly
    pub fn add_vehicle(&mut self, vehicle: SimVehicle) {
        self.vehicles.push(vehicle);
    }

    /// Forward distance from vehicle `index` to the nearest vehicle strictly
    /// ahead of it in the same lane
    pub fn gap_ahead(&self, index: usize) -> Option<f32> {
        let me = self.vehicles.get(index)?;
        self.vehicles
            .iter()
            .enumerate()
            .filter(|(other_index, other)| *other_index != index && other.direction == me.direction)
            .map(|(_, other)| me.direction.forward_distance(me.x, other.x))
            .filter(|distance| *distance > 0.0)
            .min_by_key(|distance| OrderedFloat(*distance))
    }

    /// Update all vehicles for one frame
    pub fn update(&mut self, light_is_green: bool) -> Vec<(VehicleId, VehicleUpdateResult)> {
        let mut results = Vec::with_capacity(self.vehicles.len());

        for index in 0..self.vehicles.len() {
            let gap = self.gap_ahead(index);
            let vehicle = &mut self.vehicles[index];
            let target = vehicle.desired_speed(light_is_green, gap, &self.rules);
            vehicle.approach_speed(target, &self.rules);
            let result = vehicle.advance(&self.rules);
            if result == VehicleUpdateResult::Wrapped {
                self.total_wraps += 1;
            }
            results.push((vehicle.id, result));
        }

        results
    }

    /// Vehicles currently stopped or crawling
    pub fn stopped_count(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.current_speed < self.rules.accel_step)
            .count()
    }

    /// Vehicles sitting in the approach window of the stop line
    pub fn queued_at_light(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.in_approach_window(&self.rules))
            .count()
    }
}
