//! Core action, observation, environment and agent types for AnimalAI agents
//!
//! This crate provides the shared abstractions used by the baseline agents,
//! the environment wrappers and the experiment tooling.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod agent;
pub mod environment;
pub mod error;
pub mod observation;
pub mod raycast;
pub mod reward;

// Re-export core traits and types
pub use action::{AaiAction, Action, ActionQueue, NUM_ACTIONS};
pub use agent::Agent;
pub use environment::{Environment, Episode, Step, StepInfo};
pub use error::{RLError, Result};
pub use observation::{AaiObservation, HasTelemetry, Observation, Telemetry};
pub use raycast::{ParsedRays, RayCastParser, RayObject};
pub use reward::Reward;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AaiAction, AaiObservation, Action, ActionQueue, Agent, Environment, Observation,
        Reward, Result, Step,
    };
}
