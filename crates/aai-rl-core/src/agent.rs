//! Agent traits

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::{Action, Observation, Step};

/// Core agent trait
///
/// Agents own their random source and whatever state they carry between
/// calls (queued actions, previous action), so acting takes `&mut self`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Observation type
    type Observation: Observation;
    /// Action type
    type Action: Action;
    /// Serializable configuration
    type Config: Serialize + DeserializeOwned + Send + Sync;

    /// Select an action given an observation
    async fn act(&mut self, observation: &Self::Observation) -> crate::Result<Self::Action>;

    /// Process a step from the environment
    async fn observe(&mut self, _step: &Step<Self::Observation>) -> crate::Result<()> {
        Ok(())
    }

    /// Forget per-episode state
    fn reset(&mut self) {}

    /// Current configuration
    fn config(&self) -> &Self::Config;

    /// Rebuild the agent from a configuration
    fn reconfigure(&mut self, config: Self::Config) -> crate::Result<()>;

    /// Save the agent configuration as JSON
    async fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self.config())?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Load the agent configuration from JSON
    async fn load(&mut self, path: &std::path::Path) -> crate::Result<()> {
        let json = tokio::fs::read_to_string(path).await?;
        let config = serde_json::from_str(&json)?;
        self.reconfigure(config)
    }
}
