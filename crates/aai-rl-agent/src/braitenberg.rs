//! Braitenberg vehicle agent
//!
//! A purely reactive agent that heads for rewards seen on its ray casts,
//! backs away from negative rewards and steers around walls. It keeps one
//! piece of state, the previous action, so that turns started while stuck
//! or blocked are carried through.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use aai_rl_core::{
    AaiAction, AaiObservation, Agent, ParsedRays, RayCastParser, RayObject, Result,
};

use crate::walker::rng_from_seed;

/// Speed at or below which the agent counts as stuck on every axis
pub const STATIONARY_SPEED: f64 = 1.0;

/// Object kinds tracked by the agent, in row order
pub const TRACKED_OBJECTS: [RayObject; 6] = [
    RayObject::GoodGoal,
    RayObject::GoodGoalMulti,
    RayObject::BadGoal,
    RayObject::Immovable,
    RayObject::Movable,
    RayObject::Arena,
];

/// Braitenberg agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraitenbergConfig {
    /// Total number of rays; must be odd
    pub num_rays: usize,
    /// Angular spread of the rays, passed through to the simulator
    pub max_degrees: u32,
    /// Seed for left/right tie breaks
    pub seed: Option<u64>,
}

impl Default for BraitenbergConfig {
    fn default() -> Self {
        Self {
            num_rays: 11,
            max_degrees: 60,
            seed: None,
        }
    }
}

impl BraitenbergConfig {
    /// Rays on each side of the centre ray
    #[must_use]
    pub fn rays_per_side(&self) -> usize {
        self.num_rays / 2
    }
}

/// Reactive ray-cast agent
pub struct BraitenbergAgent {
    config: BraitenbergConfig,
    parser: RayCastParser,
    rng: StdRng,
    previous: AaiAction,
}

fn is_stationary(velocity: [f64; 3]) -> bool {
    velocity.iter().all(|v| v.abs() <= STATIONARY_SPEED)
}

fn is_forward_turn(action: AaiAction) -> bool {
    matches!(action, AaiAction::ForwardsLeft | AaiAction::ForwardsRight)
}

impl BraitenbergAgent {
    /// Create an agent; fails on an even ray count
    pub fn new(config: BraitenbergConfig) -> Result<Self> {
        let parser = RayCastParser::new(TRACKED_OBJECTS.to_vec(), config.num_rays)?;
        Ok(Self {
            rng: rng_from_seed(config.seed),
            parser,
            previous: AaiAction::Forwards,
            config,
        })
    }

    /// Previous action taken
    #[must_use]
    pub fn previous(&self) -> AaiAction {
        self.previous
    }

    fn forward_turn(&mut self) -> AaiAction {
        if is_forward_turn(self.previous) {
            self.previous
        } else if self.rng.gen_bool(0.5) {
            AaiAction::ForwardsLeft
        } else {
            AaiAction::ForwardsRight
        }
    }

    /// Choose an action from parsed rays and the current velocity
    pub fn decide(&mut self, rays: &ParsedRays, velocity: [f64; 3]) -> AaiAction {
        let action = if is_stationary(velocity) {
            self.forward_turn()
        } else if let Some(action) = Self::seek(rays, RayObject::GoodGoalMulti)
            .or_else(|| Self::seek(rays, RayObject::GoodGoal))
        {
            action
        } else if rays.ahead(RayObject::BadGoal) {
            AaiAction::Backwards
        } else if rays.left(RayObject::BadGoal) {
            AaiAction::Right
        } else if rays.right(RayObject::BadGoal) {
            AaiAction::Left
        } else if rays.ahead(RayObject::Immovable) {
            self.forward_turn()
        } else if rays.left(RayObject::Immovable) {
            AaiAction::ForwardsLeft
        } else if rays.right(RayObject::Immovable) {
            AaiAction::ForwardsRight
        } else {
            self.previous
        };

        trace!(?action, previous = ?self.previous, "braitenberg decision");
        self.previous = action;
        action
    }

    fn seek(rays: &ParsedRays, object: RayObject) -> Option<AaiAction> {
        if rays.ahead(object) {
            Some(AaiAction::Forwards)
        } else if rays.left(object) {
            Some(AaiAction::Left)
        } else if rays.right(object) {
            Some(AaiAction::Right)
        } else {
            None
        }
    }
}

#[async_trait]
impl Agent for BraitenbergAgent {
    type Observation = AaiObservation;
    type Action = AaiAction;
    type Config = BraitenbergConfig;

    async fn act(&mut self, observation: &Self::Observation) -> Result<Self::Action> {
        let rays = self.parser.parse(&observation.rays)?;
        Ok(self.decide(&rays, observation.velocity))
    }

    fn reset(&mut self) {
        self.previous = AaiAction::Forwards;
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
    use aai_rl_core::raycast::{NUM_OBJECT_TYPES, RAY_STRIDE};
    use aai_rl_core::RLError;

    const MOVING: [f64; 3] = [0.0, 0.0, 5.0];
    const STILL: [f64; 3] = [0.0, 0.0, 0.2];

    fn agent() -> BraitenbergAgent {
        BraitenbergAgent::new(BraitenbergConfig {
            num_rays: 3,
            seed: Some(5),
            ..Default::default()
        })
        .unwrap()
    }

    /// Three rays, left to right, seeing `hits` per object
    fn rays(hits: &[(RayObject, usize)]) -> ParsedRays {
        let mut rows = vec![vec![0.0; 3]; TRACKED_OBJECTS.len()];
        for (object, position) in hits {
            let row = TRACKED_OBJECTS.iter().position(|o| o == object).unwrap();
            rows[row][*position] = 0.5;
        }
        ParsedRays::from_rows(TRACKED_OBJECTS.to_vec(), rows).unwrap()
    }

    #[test]
    fn test_even_rays_rejected() {
        let result = BraitenbergAgent::new(BraitenbergConfig {
            num_rays: 4,
            ..Default::default()
        });
        assert!(matches!(result, Err(RLError::Precondition(_))));
    }

    #[test]
    fn test_seeks_good_goals() {
        let mut a = agent();
        assert_eq!(a.decide(&rays(&[(RayObject::GoodGoal, 1)]), MOVING), AaiAction::Forwards);
        assert_eq!(a.decide(&rays(&[(RayObject::GoodGoal, 0)]), MOVING), AaiAction::Left);
        assert_eq!(a.decide(&rays(&[(RayObject::GoodGoal, 2)]), MOVING), AaiAction::Right);
    }

    #[test]
    fn test_multi_goal_beats_goal() {
        let mut a = agent();
        let view = rays(&[(RayObject::GoodGoal, 0), (RayObject::GoodGoalMulti, 2)]);
        assert_eq!(a.decide(&view, MOVING), AaiAction::Right);
    }

    #[test]
    fn test_avoids_bad_goals() {
        let mut a = agent();
        assert_eq!(a.decide(&rays(&[(RayObject::BadGoal, 1)]), MOVING), AaiAction::Backwards);
        assert_eq!(a.decide(&rays(&[(RayObject::BadGoal, 0)]), MOVING), AaiAction::Right);
        assert_eq!(a.decide(&rays(&[(RayObject::BadGoal, 2)]), MOVING), AaiAction::Left);
    }

    #[test]
    fn test_stationary_turn_persists() {
        let mut a = agent();
        let first = a.decide(&rays(&[(RayObject::GoodGoal, 1)]), STILL);
        assert!(is_forward_turn(first));
        for _ in 0..10 {
            assert_eq!(a.decide(&rays(&[]), STILL), first);
        }
    }

    #[test]
    fn test_wall_handling() {
        let mut a = agent();
        assert_eq!(
            a.decide(&rays(&[(RayObject::Immovable, 0)]), MOVING),
            AaiAction::ForwardsLeft
        );
        assert_eq!(
            a.decide(&rays(&[(RayObject::Immovable, 2)]), MOVING),
            AaiAction::ForwardsRight
        );
        // blocked ahead keeps the turn already in progress
        assert_eq!(
            a.decide(&rays(&[(RayObject::Immovable, 1)]), MOVING),
            AaiAction::ForwardsRight
        );
    }

    #[test]
    fn test_nothing_seen_repeats_previous() {
        let mut a = agent();
        assert_eq!(a.decide(&rays(&[]), MOVING), AaiAction::Forwards);
        a.decide(&rays(&[(RayObject::GoodGoal, 0)]), MOVING);
        assert_eq!(a.decide(&rays(&[(RayObject::Arena, 1)]), MOVING), AaiAction::Left);
    }

    #[tokio::test]
    async fn test_act_parses_raw_rays() {
        let mut a = agent();
        // raw order: centre, right1, left1
        let mut raw = vec![0.0; 3 * RAY_STRIDE];
        for ray in 0..3 {
            raw[ray * RAY_STRIDE + NUM_OBJECT_TYPES] = 1.0;
        }
        raw[RAY_STRIDE + NUM_OBJECT_TYPES] = 0.0;
        raw[RAY_STRIDE + RayObject::GoodGoal as usize] = 1.0;
        raw[2 * RAY_STRIDE - 1] = 0.4;

        let obs = AaiObservation {
            rays: raw,
            velocity: MOVING,
            ..Default::default()
        };
        assert_eq!(a.act(&obs).await.unwrap(), AaiAction::Right);

        let bad = AaiObservation {
            rays: vec![0.0; 5],
            velocity: MOVING,
            ..Default::default()
        };
        assert!(matches!(a.act(&bad).await, Err(RLError::DimensionMismatch { .. })));
    }
}
