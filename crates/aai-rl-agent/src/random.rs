//! Random action agent for baseline comparisons
//!
//! Picks one of the nine actions from the softmax of a bias vector, with an
//! optional pull towards (or ban on) repeating the previous action, then
//! repeats it for a run length drawn from a [`LengthDistribution`].

use async_trait::async_trait;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use aai_rl_core::{AaiAction, AaiObservation, ActionQueue, Agent, RLError, Result, NUM_ACTIONS};

use crate::sampler::{warn_if_long, LengthDistribution, LengthSampler};
use crate::walker::rng_from_seed;

/// Random action agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomActionConfig {
    /// Maximum (or fixed) run length
    pub max_step_length: u32,
    /// Run length distribution
    pub step_length: LengthDistribution,
    /// One bias per action; only relative differences matter after softmax
    pub action_biases: Vec<f64>,
    /// Probability of simply repeating the previous action
    pub prev_step_bias: f64,
    /// Never pick the previous action from the biased draw
    pub remove_prev_step: bool,
    /// Seed for the agent's random source; entropy when absent
    pub seed: Option<u64>,
}

impl Default for RandomActionConfig {
    fn default() -> Self {
        Self {
            max_step_length: 10,
            step_length: LengthDistribution::Fixed,
            action_biases: vec![1.0; NUM_ACTIONS],
            prev_step_bias: 0.0,
            remove_prev_step: false,
            seed: None,
        }
    }
}

impl RandomActionConfig {
    /// Check the numeric preconditions on biases and probabilities
    pub fn validate(&self) -> Result<()> {
        if self.action_biases.len() != NUM_ACTIONS {
            return Err(RLError::Precondition(format!(
                "You must provide biases for all nine (9) actions, got {}. A uniform distribution is [1,1,1,1,1,1,1,1,1]",
                self.action_biases.len()
            )));
        }
        if self.action_biases.iter().any(|b| !b.is_finite()) {
            return Err(RLError::Precondition("action biases must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.prev_step_bias) {
            return Err(RLError::Precondition(format!(
                "The bias towards the previous action must be a scalar value between 0 and 1, got {}",
                self.prev_step_bias
            )));
        }
        Ok(())
    }
}

/// Numerically stable softmax
#[must_use]
pub fn softmax(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Random action agent
pub struct RandomActionAgent {
    config: RandomActionConfig,
    sampler: LengthSampler,
    actions: WeightedIndex<f64>,
    /// `actions` with one entry zeroed, indexed by the excluded action
    actions_without: Vec<Option<WeightedIndex<f64>>>,
    rng: StdRng,
    queue: ActionQueue,
    previous: AaiAction,
}

impl RandomActionAgent {
    /// Create a new random action agent
    pub fn new(config: RandomActionConfig) -> Result<Self> {
        config.validate()?;
        let sampler = LengthSampler::new(config.max_step_length, &config.step_length)?;

        let probabilities = softmax(&config.action_biases);
        let actions = WeightedIndex::new(&probabilities)
            .map_err(|e| RLError::Precondition(format!("action biases: {e}")))?;
        let actions_without = (0..NUM_ACTIONS)
            .map(|excluded| {
                let mut weights = probabilities.clone();
                weights[excluded] = 0.0;
                WeightedIndex::new(&weights).ok()
            })
            .collect();

        Ok(Self {
            rng: rng_from_seed(config.seed),
            sampler,
            actions,
            actions_without,
            queue: ActionQueue::new(),
            previous: AaiAction::Noop,
            config,
        })
    }

    /// Pick the next action given the previous one.
    ///
    /// With probability `prev_step_bias` the previous action is kept.
    /// Otherwise an action is drawn from the softmaxed biases; with
    /// `remove_prev_step` the draw is conditioned on differing from
    /// `previous`.
    pub fn new_action(&mut self, previous: AaiAction) -> Result<AaiAction> {
        if self.config.prev_step_bias > 0.0 && self.rng.gen_bool(self.config.prev_step_bias) {
            return Ok(previous);
        }

        let index = if self.config.remove_prev_step {
            self.actions_without[previous.index()]
                .as_ref()
                .ok_or_else(|| {
                    RLError::Precondition(format!(
                        "no action other than {previous:?} has nonzero probability"
                    ))
                })?
                .sample(&mut self.rng)
        } else {
            self.actions.sample(&mut self.rng)
        };
        AaiAction::from_index(index)
    }

    /// Queue `action` for a freshly drawn, strictly positive run length
    pub fn run_length(&mut self, action: AaiAction) -> Result<ActionQueue> {
        let steps = self.sampler.draw_until(&mut self.rng, None, |n| n > 0)?;
        warn_if_long(steps);
        let steps = usize::try_from(steps).map_err(|_| {
            RLError::InvalidConfig(format!("run length {steps} does not fit in memory"))
        })?;
        Ok(ActionQueue::repeat(action, steps))
    }

    /// Next primitive action, choosing a new action and run when drained
    pub fn next_action(&mut self) -> Result<AaiAction> {
        loop {
            if let Some(action) = self.queue.pop() {
                return Ok(action);
            }
            let action = self.new_action(self.previous)?;
            self.queue = self.run_length(action)?;
            self.previous = action;
        }
    }
}

#[async_trait]
impl Agent for RandomActionAgent {
    type Observation = AaiObservation;
    type Action = AaiAction;
    type Config = RandomActionConfig;

    async fn act(&mut self, _observation: &Self::Observation) -> Result<Self::Action> {
        // Random agent ignores observations
        self.next_action()
    }

    fn reset(&mut self) {
        self.queue = ActionQueue::new();
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn reconfigure(&mut self, config: Self::Config) -> Result<()> {
        *self = Self::new(config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn agent(config: RandomActionConfig) -> RandomActionAgent {
        RandomActionAgent::new(RandomActionConfig {
            seed: Some(11),
            ..config
        })
        .unwrap()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);

        let uniform = softmax(&[1.0; NUM_ACTIONS]);
        for value in uniform {
            assert_relative_eq!(value, 1.0 / 9.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_preconditions() {
        let short = RandomActionConfig {
            action_biases: vec![1.0; 8],
            ..Default::default()
        };
        assert!(matches!(RandomActionAgent::new(short), Err(RLError::Precondition(_))));

        let bad_prob = RandomActionConfig {
            prev_step_bias: 1.5,
            ..Default::default()
        };
        assert!(matches!(RandomActionAgent::new(bad_prob), Err(RLError::Precondition(_))));

        let bad_tag: Result<LengthDistribution> = "zipf".parse();
        assert!(matches!(bad_tag, Err(RLError::InvalidConfig(_))));
    }

    #[test]
    fn test_full_retention_repeats_previous() {
        let mut a = agent(RandomActionConfig {
            prev_step_bias: 1.0,
            ..Default::default()
        });
        for _ in 0..50 {
            assert_eq!(a.new_action(AaiAction::Left).unwrap(), AaiAction::Left);
        }
    }

    #[test]
    fn test_remove_prev_step_never_repeats() {
        let mut biases = vec![0.0; NUM_ACTIONS];
        biases[AaiAction::Forwards.index()] = 10.0;
        let mut a = agent(RandomActionConfig {
            action_biases: biases,
            remove_prev_step: true,
            ..Default::default()
        });
        for _ in 0..500 {
            assert_ne!(a.new_action(AaiAction::Forwards).unwrap(), AaiAction::Forwards);
        }
    }

    #[test]
    fn test_strong_bias_dominates() {
        let mut biases = vec![0.0; NUM_ACTIONS];
        biases[AaiAction::BackwardsLeft.index()] = 50.0;
        let mut a = agent(RandomActionConfig {
            action_biases: biases,
            ..Default::default()
        });
        for _ in 0..100 {
            assert_eq!(a.new_action(AaiAction::Noop).unwrap(), AaiAction::BackwardsLeft);
        }
    }

    #[test]
    fn test_run_lengths_are_positive() {
        for tag in LengthDistribution::TAGS {
            let mut a = agent(RandomActionConfig {
                step_length: tag.parse().unwrap(),
                ..Default::default()
            });
            for _ in 0..50 {
                let queue = a.run_length(AaiAction::Right).unwrap();
                assert!(!queue.is_empty(), "{tag}");
                assert_eq!(queue.count_of(AaiAction::Right), queue.len());
            }
        }
    }

    #[tokio::test]
    async fn test_act_repeats_action_for_fixed_run() {
        let mut a = agent(RandomActionConfig {
            max_step_length: 4,
            ..Default::default()
        });
        let obs = AaiObservation::default();
        let mut actions = Vec::new();
        for _ in 0..8 {
            actions.push(a.act(&obs).await.unwrap());
        }
        assert!(actions[..4].iter().all(|x| *x == actions[0]));
        assert!(actions[4..].iter().all(|x| *x == actions[4]));
    }
}
