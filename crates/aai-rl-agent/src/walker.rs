//! Random walker baseline
//!
//! The walker alternates two kinds of bursts. A saccade moves forwards
//! (positive length) or backwards (negative length) for `|n|` steps with a
//! stationary tick after each move to damp momentum. A turn rotates right
//! (positive) or left (negative) for `|n|` steps. Both lengths come from
//! configurable distributions; turns drawn from the normal or Cauchy
//! families can be correlated with the previous turn.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use aai_rl_core::{AaiAction, AaiObservation, ActionQueue, Agent, RLError, Result};

use crate::sampler::{warn_if_long, LengthDistribution, LengthSampler};

/// Random walker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalkerConfig {
    /// Maximum (or fixed) saccade length
    pub max_saccade_length: u32,
    /// Maximum (or fixed) number of turning steps
    pub max_angle_steps: u32,
    /// Saccade length distribution
    pub saccade: LengthDistribution,
    /// Turn length distribution
    pub angle: LengthDistribution,
    /// Pick the turn direction with a coin flip instead of always turning right
    pub randomise_turn: bool,
    /// Pull of the previous turn on the centre of the next one (normal, cauchy)
    pub angle_correlation: f64,
    /// Never move backwards
    pub forward_only: bool,
    /// Seed for the walker's random source; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RandomWalkerConfig {
    fn default() -> Self {
        Self {
            max_saccade_length: 10,
            max_angle_steps: 5,
            saccade: LengthDistribution::Fixed,
            angle: LengthDistribution::Fixed,
            randomise_turn: true,
            angle_correlation: 0.0,
            forward_only: false,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Saccade,
    Turn,
}

/// Random walker agent
pub struct RandomWalker {
    config: RandomWalkerConfig,
    saccade: LengthSampler,
    angle: LengthSampler,
    rng: StdRng,
    queue: ActionQueue,
    phase: Phase,
    previous_turn: f64,
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl RandomWalker {
    /// Create a walker, validating its distributions once
    pub fn new(config: RandomWalkerConfig) -> Result<Self> {
        if !config.angle_correlation.is_finite() {
            return Err(RLError::InvalidConfig("angle correlation must be finite".into()));
        }
        let saccade = LengthSampler::new(config.max_saccade_length, &config.saccade)?;
        let angle = LengthSampler::new(config.max_angle_steps, &config.angle)?.unscaled();
        let previous_turn = config.angle.location().unwrap_or_default();

        Ok(Self {
            rng: rng_from_seed(config.seed),
            saccade,
            angle,
            queue: ActionQueue::new(),
            phase: Phase::Saccade,
            previous_turn,
            config,
        })
    }

    /// Draw a saccade and expand it into move/stand ticks.
    ///
    /// A length of `n` yields `|n|` moves each followed by a no-op, plus one
    /// more no-op when `|n|` is odd.
    pub fn sample_saccade(&mut self) -> Result<ActionQueue> {
        let mut steps = self.saccade.draw_until(&mut self.rng, None, |n| n != 0)?;
        warn_if_long(steps);

        if self.config.forward_only {
            steps = steps.abs();
        }

        let primitive = if steps > 0 {
            AaiAction::Forwards
        } else {
            AaiAction::Backwards
        };
        let moves = usize::try_from(steps.unsigned_abs()).map_err(|_| {
            RLError::InvalidConfig(format!("saccade length {steps} does not fit in memory"))
        })?;

        let mut queue = ActionQueue::new();
        for _ in 0..moves {
            queue.push(primitive);
            queue.push(AaiAction::Noop);
        }
        if moves % 2 == 1 {
            queue.push(AaiAction::Noop);
        }
        Ok(queue)
    }

    /// Draw a turn given the previous signed turn length.
    ///
    /// Returns the queue and the signed length so callers can feed it back
    /// as `previous` for correlated sampling.
    pub fn sample_turn(&mut self, previous: f64) -> Result<(ActionQueue, i64)> {
        let steps = if self.angle.is_fixed() {
            let steps = i64::from(self.angle.max_len());
            self.signed(steps)
        } else if let Some(location) = self.angle.distribution().location() {
            let centre = self.config.angle_correlation * (previous - location);
            self.angle.draw_until(&mut self.rng, Some(centre), |n| n != 0)?
        } else {
            let magnitude = self.angle.draw_until(&mut self.rng, None, |n| n != 0)?;
            self.signed(magnitude)
        };
        warn_if_long(steps);

        let primitive = if steps > 0 {
            AaiAction::Right
        } else {
            AaiAction::Left
        };
        let turns = usize::try_from(steps.unsigned_abs()).map_err(|_| {
            RLError::InvalidConfig(format!("turn length {steps} does not fit in memory"))
        })?;
        Ok((ActionQueue::repeat(primitive, turns), steps))
    }

    fn signed(&mut self, magnitude: i64) -> i64 {
        if !self.config.randomise_turn || self.rng.gen_bool(0.5) {
            magnitude
        } else {
            -magnitude
        }
    }

    fn refill(&mut self) -> Result<()> {
        match self.phase {
            Phase::Saccade => {
                self.queue = self.sample_saccade()?;
                self.phase = Phase::Turn;
            }
            Phase::Turn => {
                let (queue, steps) = self.sample_turn(self.previous_turn)?;
                #[allow(clippy::cast_precision_loss)]
                {
                    self.previous_turn = steps as f64;
                }
                self.queue = queue;
                self.phase = Phase::Saccade;
            }
        }
        Ok(())
    }

    /// Next primitive action, sampling a new burst when the queue is drained
    pub fn next_action(&mut self) -> Result<AaiAction> {
        loop {
            if let Some(action) = self.queue.pop() {
                return Ok(action);
            }
            self.refill()?;
        }
    }
}

#[async_trait]
impl Agent for RandomWalker {
    type Observation = AaiObservation;
    type Action = AaiAction;
    type Config = RandomWalkerConfig;

    async fn act(&mut self, _observation: &Self::Observation) -> Result<Self::Action> {
        self.next_action()
    }

    fn reset(&mut self) {
        self.queue = ActionQueue::new();
        self.phase = Phase::Saccade;
        self.previous_turn = self.config.angle.location().unwrap_or_default();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn reconfigure(&mut self, config: Self::Config) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }
}
