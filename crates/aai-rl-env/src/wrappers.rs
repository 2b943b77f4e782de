//! Environment wrappers
//!
//! Each wrapper owns its inner environment and forwards every method it does
//! not intercept.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info};

use aai_rl_core::{Environment, HasTelemetry, RLError, Result, Step, StepInfo};

/// Header row of every episode log
pub const EPISODE_LOG_HEADER: &str =
    "episode, step, reward, cumulative reward, done, health, vx, vy, vz, px, py, pz";

/// Episode logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeLoggerConfig {
    /// Run directory; logs go to `<log_dir>/episodes/`
    pub log_dir: PathBuf,
    /// Number of the first episode
    pub first_episode: u64,
    /// Number of the first step within each episode
    pub first_step: u64,
}

impl Default for EpisodeLoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            first_episode: 1,
            first_step: 1,
        }
    }
}

impl EpisodeLoggerConfig {
    /// Configuration logging under `log_dir`
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Default::default()
        }
    }
}

/// Wrapper writing one CSV row per step to a per-episode file.
///
/// Files are named `episode_<n>.csv`. The file for the next episode is
/// opened when its first step arrives, so a run of `E` complete episodes
/// leaves exactly `E` files behind. Every row is flushed as it is written,
/// so a logger dropped after an error keeps everything logged so far.
pub struct EpisodeLogger<E> {
    /// Inner environment
    pub env: E,
    dir: PathBuf,
    episode: u64,
    first_step: u64,
    step: u64,
    cumulative_reward: f64,
    file: Option<BufWriter<File>>,
}

impl<E> EpisodeLogger<E>
where
    E: Environment,
    E::Observation: HasTelemetry,
{
    /// Wrap `env`, creating the episodes directory and the first log file.
    ///
    /// Fails if the episodes directory already exists.
    pub async fn new(env: E, config: EpisodeLoggerConfig) -> Result<Self> {
        let dir = config.log_dir.join("episodes");
        if fs::try_exists(&dir).await? {
            return Err(RLError::InvalidConfig(format!(
                "episode log directory {} already exists",
                dir.display()
            )));
        }
        fs::create_dir_all(&dir).await?;
        info!(dir = %dir.display(), "logging episodes");

        let mut logger = Self {
            env,
            dir,
            episode: config.first_episode,
            first_step: config.first_step,
            step: config.first_step,
            cumulative_reward: 0.0,
            file: None,
        };
        logger.open_episode_log().await?;
        Ok(logger)
    }

    /// Directory holding the episode files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of the episode currently being logged
    #[must_use]
    pub fn episode(&self) -> u64 {
        self.episode
    }

    /// Path of the log file for episode `episode`
    #[must_use]
    pub fn episode_path(&self, episode: u64) -> PathBuf {
        self.dir.join(format!("episode_{episode}.csv"))
    }

    async fn open_episode_log(&mut self) -> Result<()> {
        let path = self.episode_path(self.episode);
        let mut file = BufWriter::new(File::create(&path).await?);
        file.write_all(EPISODE_LOG_HEADER.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        debug!(path = %path.display(), "opened episode log");
        self.file = Some(file);
        Ok(())
    }

    async fn close_episode_log(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.shutdown().await?;
        }
        Ok(())
    }

    fn row(&self, reward: f64, done: bool, telemetry: [f64; 7]) -> String {
        let telemetry: Vec<String> = telemetry.iter().map(ToString::to_string).collect();
        format!(
            "{}, {}, {}, {}, {}, {}\n",
            self.episode,
            self.step,
            reward,
            self.cumulative_reward,
            done,
            telemetry.join(", ")
        )
    }
}

#[async_trait]
impl<E> Environment for EpisodeLogger<E>
where
    E: Environment,
    E::Observation: HasTelemetry,
{
    type Observation = E::Observation;
    type Action = E::Action;

    async fn reset(&mut self) -> Result<(Self::Observation, StepInfo)> {
        self.env.reset().await
    }

    async fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>> {
        let step = self.env.step(action).await?;
        let done = step.is_last();
        self.cumulative_reward += step.reward.0;

        if self.file.is_none() {
            self.open_episode_log().await?;
        }
        let row = self.row(step.reward.0, done, step.observation.telemetry().to_row());
        if let Some(file) = self.file.as_mut() {
            file.write_all(row.as_bytes()).await?;
            file.flush().await?;
        }
        self.step += 1;

        if done {
            self.close_episode_log().await?;
            debug!(
                episode = self.episode,
                reward = self.cumulative_reward,
                "episode finished"
            );
            self.episode += 1;
            self.step = self.first_step;
            self.cumulative_reward = 0.0;
        }
        Ok(step)
    }

    async fn render(&self) -> Result<()> {
        self.env.render().await
    }

    async fn close(&mut self) -> Result<()> {
        self.close_episode_log().await?;
        self.env.close().await
    }
}
