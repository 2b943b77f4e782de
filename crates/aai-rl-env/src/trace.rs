//! Trace replay environment
//!
//! Replays steps recorded from the simulator as JSON lines, one object per
//! step: `{"observation": {...}, "reward": 0.0, "done": false}`. Actions are
//! accepted and ignored, which makes the environment useful for exercising
//! agents and wrappers without a simulator process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use aai_rl_core::{AaiAction, AaiObservation, Environment, RLError, Result, Reward, Step, StepInfo};

/// Trace environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEnvConfig {
    /// JSONL trace file
    pub trace_file: PathBuf,
    /// Start over from the first episode after the last one
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

/// One recorded step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Observation after the step
    pub observation: AaiObservation,
    /// Reward received
    #[serde(default)]
    pub reward: f64,
    /// Whether the episode ended on this step
    #[serde(default)]
    pub done: bool,
}

/// Environment replaying a recorded trace
pub struct TraceEnv {
    config: TraceEnvConfig,
    episodes: Vec<Vec<TraceRecord>>,
    episode: usize,
    cursor: usize,
}

impl TraceEnv {
    /// Load a trace file
    pub async fn new(config: TraceEnvConfig) -> Result<Self> {
        let records = Self::load_records(&config.trace_file).await?;
        Self::from_records(config, records)
    }

    /// Build from records already in memory
    pub fn from_records(config: TraceEnvConfig, records: Vec<TraceRecord>) -> Result<Self> {
        let mut episodes = Vec::new();
        let mut current = Vec::new();
        for record in records {
            let done = record.done;
            current.push(record);
            if done {
                episodes.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            // unterminated tail still counts as an episode
            if let Some(last) = current.last_mut() {
                last.done = true;
            }
            episodes.push(current);
        }
        if episodes.is_empty() {
            return Err(RLError::Environment(format!(
                "trace {} contains no steps",
                config.trace_file.display()
            )));
        }
        debug!(episodes = episodes.len(), "loaded trace");

        Ok(Self {
            config,
            episodes,
            episode: 0,
            cursor: 0,
        })
    }

    async fn load_records(path: &Path) -> Result<Vec<TraceRecord>> {
        let content = fs::read_to_string(path).await?;

        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(line)?);
            }
        }
        Ok(records)
    }

    /// Number of recorded episodes
    #[must_use]
    pub fn num_episodes(&self) -> usize {
        self.episodes.len()
    }

    fn current(&self) -> &[TraceRecord] {
        &self.episodes[self.episode]
    }
}

#[async_trait]
impl Environment for TraceEnv {
    type Observation = AaiObservation;
    type Action = AaiAction;

    async fn reset(&mut self) -> Result<(AaiObservation, StepInfo)> {
        if self.cursor > 0 {
            self.episode += 1;
            if self.episode == self.episodes.len() {
                if !self.config.looping {
                    return Err(RLError::Environment("trace exhausted".into()));
                }
                self.episode = 0;
            }
        }
        self.cursor = 0;

        let observation = self
            .current()
            .first()
            .map(|record| record.observation.clone())
            .unwrap_or_default();
        Ok((observation, StepInfo::default()))
    }

    async fn step(&mut self, _action: AaiAction) -> Result<Step<AaiObservation>> {
        let record = self
            .current()
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| RLError::Environment("step called after episode end".into()))?;
        self.cursor += 1;

        Ok(Step {
            observation: record.observation,
            reward: Reward(record.reward),
            done: record.done,
            truncated: false,
            info: StepInfo::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reward: f64, done: bool) -> TraceRecord {
        TraceRecord {
            observation: AaiObservation::default(),
            reward,
            done,
        }
    }

    fn config(looping: bool) -> TraceEnvConfig {
        TraceEnvConfig {
            trace_file: PathBuf::from("memory"),
            looping,
        }
    }

    #[test]
    fn test_splits_episodes() {
        let env = TraceEnv::from_records(
            config(true),
            vec![record(0.0, false), record(1.0, true), record(0.0, false)],
        )
        .unwrap();
        assert_eq!(env.num_episodes(), 2);
        assert!(env.episodes[1][0].done);
    }

    #[test]
    fn test_empty_trace_rejected() {
        assert!(TraceEnv::from_records(config(true), Vec::new()).is_err());
    }

    #[tokio::test]
    async fn test_replay_and_exhaustion() {
        let mut env =
            TraceEnv::from_records(config(false), vec![record(0.0, false), record(2.0, true)])
                .unwrap();
        env.reset().await.unwrap();
        assert!(!env.step(AaiAction::Noop).await.unwrap().done);
        let last = env.step(AaiAction::Noop).await.unwrap();
        assert!(last.done);
        approx::assert_relative_eq!(last.reward.0, 2.0);
        assert!(env.step(AaiAction::Noop).await.is_err());
        assert!(env.reset().await.is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        std::fs::write(
            &path,
            "{\"observation\":{\"velocity\":[0,0,1],\"health\":50},\"reward\":-0.1}\n\n\
             {\"observation\":{\"velocity\":[0,0,2]},\"reward\":1.0,\"done\":true}\n",
        )
        .unwrap();
        let mut env = TraceEnv::new(TraceEnvConfig {
            trace_file: path,
            looping: true,
        })
        .await
        .unwrap();
        let (first, _) = env.reset().await.unwrap();
        approx::assert_relative_eq!(first.health, 50.0);
        env.step(AaiAction::Forwards).await.unwrap();
        let step = env.step(AaiAction::Forwards).await.unwrap();
        assert!(step.done);
        approx::assert_relative_eq!(step.observation.velocity[2], 2.0);

        // loops back to the only episode
        env.reset().await.unwrap();
        assert!(!env.step(AaiAction::Noop).await.unwrap().done);
    }
}
