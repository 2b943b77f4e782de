//! Baseline agents for AnimalAI
//!
//! This crate provides the non-learning agents used as baselines:
//! - Random walkers alternating saccades and turns
//! - Biased random action agents
//! - A reactive Braitenberg vehicle driven by ray casts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod braitenberg;
pub mod random;
pub mod sampler;
pub mod walker;

// Re-export agents
pub use braitenberg::{BraitenbergAgent, BraitenbergConfig};
pub use random::{RandomActionAgent, RandomActionConfig};
pub use walker::{RandomWalker, RandomWalkerConfig};

// Re-export sampling
pub use sampler::{LengthDistribution, LengthSampler};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BraitenbergAgent, BraitenbergConfig, LengthDistribution, RandomActionAgent,
        RandomActionConfig, RandomWalker, RandomWalkerConfig,
    };
    pub use aai_rl_core::prelude::*;
}
