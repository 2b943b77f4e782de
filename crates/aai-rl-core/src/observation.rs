//! Observation representations and the telemetry they expose

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for observations from an environment
pub trait Observation: Clone + Debug + Send + Sync {
    /// Convert observation to a feature vector
    fn to_vec(&self) -> Vec<f64>;

    /// Get the shape of the observation
    fn shape(&self) -> Vec<usize>;
}

/// Agent health, velocity and position reported alongside each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Agent health
    pub health: f64,
    /// Velocity along x, y, z
    pub velocity: [f64; 3],
    /// Position along x, y, z
    pub position: [f64; 3],
}

impl Telemetry {
    /// Fixed-order row: health, vx, vy, vz, px, py, pz
    #[must_use]
    pub fn to_row(&self) -> [f64; 7] {
        let [vx, vy, vz] = self.velocity;
        let [px, py, pz] = self.position;
        [self.health, vx, vy, vz, px, py, pz]
    }
}

/// Observations that carry per-step telemetry
pub trait HasTelemetry {
    /// Telemetry for the observed agent
    fn telemetry(&self) -> Telemetry;
}

/// Observation produced by the AnimalAI simulator with ray casts enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AaiObservation {
    /// Raw ray-cast sensor vector, see [`crate::raycast::RayCastParser`]
    #[serde(default)]
    pub rays: Vec<f64>,
    /// Agent velocity
    pub velocity: [f64; 3],
    /// Agent position
    #[serde(default)]
    pub position: [f64; 3],
    /// Agent health
    #[serde(default)]
    pub health: f64,
}

impl Observation for AaiObservation {
    fn to_vec(&self) -> Vec<f64> {
        let mut data = Vec::with_capacity(self.rays.len() + 7);
        data.extend_from_slice(&self.rays);
        data.push(self.health);
        data.extend_from_slice(&self.velocity);
        data.extend_from_slice(&self.position);
        data
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.rays.len() + 7]
    }
}

impl HasTelemetry for AaiObservation {
    fn telemetry(&self) -> Telemetry {
        Telemetry {
            health: self.health,
            velocity: self.velocity,
            position: self.position,
        }
    }
}
