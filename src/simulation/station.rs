//! Stations along the track and the route they form

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A stop on the track. Each station owns one content panel on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub x: f32,
    pub name: String,
}

impl Station {
    pub fn new(id: &str, x: f32, name: &str) -> Self {
        Self {
            id: id.to_string(),
            x,
            name: name.to_string(),
        }
    }

    /// The portfolio's six sections, left to right
    pub fn default_route() -> Vec<Station> {
        vec![
            Station::new("hero", 0.0, "Home"),
            Station::new("about", 100.0, "About"),
            Station::new("skills", 200.0, "Skills"),
            Station::new("resume", 300.0, "Resume"),
            Station::new("projects", 400.0, "Projects"),
            Station::new("contact", 500.0, "Contact"),
        ]
    }
}

/// Ordered, immutable list of stations
#[derive(Debug, Clone)]
pub struct Route {
    stations: Vec<Station>,
}

impl Route {
    /// Stations must already be ordered by position (checked by config validation)
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn first(&self) -> Option<&Station> {
        self.stations.first()
    }

    pub fn last(&self) -> Option<&Station> {
        self.stations.last()
    }

    /// Find a station by its id
    pub fn find(&self, id: &str) -> Result<&Station> {
        self.stations
            .iter()
            .find(|s| s.id == id)
            .with_context(|| format!("no station with id '{id}'"))
    }

    /// Distance between the first and last station
    pub fn span(&self) -> f32 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.x - first.x,
            _ => 0.0,
        }
    }
}
