//! Simulator launch configuration
//!
//! The AnimalAI simulator runs as a separate process reached over a port.
//! Parallel workers must each get a distinct port and worker id; this module
//! only computes those assignments, it does not launch anything.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};

use aai_rl_core::{RLError, Result};

/// Port range start used when watching a single agent
pub const WATCH_PORT_BASE: u16 = 4000;

/// Width of the random watch port range
pub const WATCH_PORT_SPAN: u16 = 1000;

/// Largest worker id handed out at random
pub const MAX_WORKER_ID: u32 = 65_500;

/// Settings for one simulator instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Simulator executable
    pub file_name: PathBuf,
    /// Arena configuration (curriculum) file
    pub arenas_configurations: PathBuf,
    /// Simulator seed
    pub seed: u64,
    /// Port of worker zero
    pub base_port: u16,
    /// Worker id, offsets the port
    pub worker_id: u32,
    /// Render in real time for watching
    pub inference: bool,
    /// Provide camera observations
    pub use_camera: bool,
    /// Camera resolution in pixels
    pub resolution: u32,
    /// Provide ray-cast observations
    pub use_ray_casts: bool,
    /// Rays on each side of the centre ray
    pub rays_per_side: u32,
    /// Angular spread of the rays
    pub ray_max_degrees: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("env/AnimalAI"),
            arenas_configurations: PathBuf::from("configs/curriculum.yml"),
            seed: 123,
            base_port: 5000,
            worker_id: 0,
            inference: false,
            use_camera: false,
            resolution: 72,
            use_ray_casts: true,
            rays_per_side: 5,
            ray_max_degrees: 60,
        }
    }
}

impl SimulatorConfig {
    /// Configuration for ray-cast agents with `num_rays` total rays
    pub fn with_rays(mut self, num_rays: u32, max_degrees: u32) -> Result<Self> {
        if num_rays % 2 == 0 {
            return Err(RLError::Precondition(format!(
                "ray count must be odd, got {num_rays}"
            )));
        }
        self.use_ray_casts = true;
        self.rays_per_side = num_rays / 2;
        self.ray_max_degrees = max_degrees;
        Ok(self)
    }

    /// Total number of rays
    #[must_use]
    pub fn num_rays(&self) -> u32 {
        2 * self.rays_per_side + 1
    }

    /// Port the simulator listens on
    #[must_use]
    pub fn port(&self) -> u16 {
        self.base_port
    }

    /// Copy for worker `worker_id` on `base_port + worker_id`
    pub fn for_worker(&self, worker_id: u16) -> Result<Self> {
        let base_port = self.base_port.checked_add(worker_id).ok_or_else(|| {
            RLError::InvalidConfig(format!(
                "worker {worker_id} overflows port range from {}",
                self.base_port
            ))
        })?;
        Ok(Self {
            base_port,
            worker_id: u32::from(worker_id),
            ..self.clone()
        })
    }

    /// Configurations for `n` parallel workers with ids `1..=n`
    pub fn parallel(&self, n: u16) -> Result<Vec<Self>> {
        (1..=n).map(|worker_id| self.for_worker(worker_id)).collect()
    }

    /// Copy on a random port in `[4000, 5000]` with a random worker id.
    ///
    /// Used when watching a single agent so that a slowly exiting previous
    /// instance does not hold the port.
    pub fn with_random_port<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self {
            base_port: WATCH_PORT_BASE + rng.gen_range(0..=WATCH_PORT_SPAN),
            worker_id: rng.gen_range(0..=MAX_WORKER_ID),
            inference: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_parallel_workers_do_not_collide() {
        let configs = SimulatorConfig::default().parallel(5).unwrap();
        assert_eq!(configs.len(), 5);
        let ports: HashSet<u16> = configs.iter().map(SimulatorConfig::port).collect();
        assert_eq!(ports.len(), 5);
        assert_eq!(configs[0].base_port, 5001);
        assert_eq!(configs[0].worker_id, 1);
        assert_eq!(configs[4].base_port, 5005);
    }

    #[test]
    fn test_port_overflow_rejected() {
        let config = SimulatorConfig {
            base_port: u16::MAX,
            ..Default::default()
        };
        assert!(config.for_worker(1).is_err());
    }

    #[test]
    fn test_random_watch_port() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let config = SimulatorConfig::default().with_random_port(&mut rng);
            assert!((4000..=5000).contains(&config.base_port));
            assert!(config.worker_id <= MAX_WORKER_ID);
            assert!(config.inference);
        }
    }

    #[test]
    fn test_rays() {
        let config = SimulatorConfig::default().with_rays(11, 30).unwrap();
        assert_eq!(config.rays_per_side, 5);
        assert_eq!(config.num_rays(), 11);
        assert!(SimulatorConfig::default().with_rays(10, 30).is_err());
    }
}
