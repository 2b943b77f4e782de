//! Environments and wrappers for AnimalAI agents
//!
//! This crate provides:
//! - An episode logger writing per-step telemetry to CSV
//! - A trace replay environment for offline runs
//! - Simulator port and worker assignment

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod runner;
pub mod simulator;
pub mod trace;
pub mod wrappers;

// Re-export environments
pub use runner::run_episode;
pub use simulator::SimulatorConfig;
pub use trace::{TraceEnv, TraceEnvConfig, TraceRecord};
pub use wrappers::{EpisodeLogger, EpisodeLoggerConfig, EPISODE_LOG_HEADER};

// Re-export core types
pub use aai_rl_core::{Environment, Episode, Observation, Reward, Step};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{run_episode, EpisodeLogger, SimulatorConfig, TraceEnv};
    pub use aai_rl_core::prelude::*;
}
