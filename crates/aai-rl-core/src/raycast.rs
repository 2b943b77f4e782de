//! Ray-cast sensor parsing
//!
//! The simulator's ray perception sensor emits, per ray, a one-hot vector
//! over the detectable object kinds, a "hit nothing" flag and the normalised
//! hit distance. Rays arrive centre first and then fan out alternating
//! right and left (`centre, right1, left1, right2, left2, ...`).
//! [`RayCastParser::parse`] regroups them into one left-to-right distance
//! row per tracked object kind.

use serde::{Deserialize, Serialize};

use crate::{RLError, Result};

/// Object kinds distinguished by the ray-cast sensor, in tag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayObject {
    /// Arena walls
    Arena = 0,
    /// Walls and ramps that cannot be pushed
    Immovable = 1,
    /// Pushable objects
    Movable = 2,
    /// Episode-ending reward
    GoodGoal = 3,
    /// Reward that does not end the episode
    GoodGoalMulti = 4,
    /// Negative reward
    BadGoal = 5,
}

/// Number of object tags per ray
pub const NUM_OBJECT_TYPES: usize = 6;

/// Floats per ray: one-hot tags, miss flag, distance
pub const RAY_STRIDE: usize = NUM_OBJECT_TYPES + 2;

/// Parses raw ray vectors for a fixed set of object kinds.
#[derive(Debug, Clone)]
pub struct RayCastParser {
    objects: Vec<RayObject>,
    num_rays: usize,
}

impl RayCastParser {
    /// Create a parser; `num_rays` must be odd (one centre ray plus pairs)
    pub fn new(objects: Vec<RayObject>, num_rays: usize) -> Result<Self> {
        if num_rays % 2 == 0 {
            return Err(RLError::Precondition(format!(
                "ray count must be odd, got {num_rays}"
            )));
        }
        Ok(Self { objects, num_rays })
    }

    /// Number of rays
    #[must_use]
    pub fn num_rays(&self) -> usize {
        self.num_rays
    }

    /// Raw-vector index of the ray at left-to-right position `position`
    fn raw_ray(&self, position: usize) -> usize {
        let half = (self.num_rays - 1) / 2;
        match position.cmp(&half) {
            std::cmp::Ordering::Less => 2 * (half - position),
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 2 * (position - half) - 1,
        }
    }

    /// Parse a raw ray vector into per-object distance rows
    pub fn parse(&self, raw: &[f64]) -> Result<ParsedRays> {
        let expected = self.num_rays * RAY_STRIDE;
        if raw.len() != expected {
            return Err(RLError::DimensionMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let mut distances = vec![vec![0.0; self.num_rays]; self.objects.len()];
        for position in 0..self.num_rays {
            let ray = &raw[self.raw_ray(position) * RAY_STRIDE..][..RAY_STRIDE];
            let distance = ray[RAY_STRIDE - 1];
            for (row, object) in self.objects.iter().enumerate() {
                if ray[*object as usize] > 0.0 {
                    distances[row][position] = distance;
                }
            }
        }

        Ok(ParsedRays {
            objects: self.objects.clone(),
            distances,
        })
    }
}

/// Left-to-right hit distances per tracked object; zero means not seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRays {
    objects: Vec<RayObject>,
    distances: Vec<Vec<f64>>,
}

impl ParsedRays {
    /// Build directly from distance rows (one per object, left to right)
    pub fn from_rows(objects: Vec<RayObject>, distances: Vec<Vec<f64>>) -> Result<Self> {
        if objects.len() != distances.len() {
            return Err(RLError::DimensionMismatch {
                expected: objects.len(),
                actual: distances.len(),
            });
        }
        if let Some(row) = distances.iter().find(|row| row.len() % 2 == 0) {
            return Err(RLError::Precondition(format!(
                "ray count must be odd, got {}",
                row.len()
            )));
        }
        Ok(Self { objects, distances })
    }

    fn row(&self, object: RayObject) -> Option<&[f64]> {
        self.objects
            .iter()
            .position(|o| *o == object)
            .map(|i| self.distances[i].as_slice())
    }

    /// Whether the centre ray sees `object`
    #[must_use]
    pub fn ahead(&self, object: RayObject) -> bool {
        self.row(object)
            .is_some_and(|row| row[(row.len() - 1) / 2] > 0.0)
    }

    /// Whether any ray left of centre sees `object`
    #[must_use]
    pub fn left(&self, object: RayObject) -> bool {
        self.row(object)
            .is_some_and(|row| row[..(row.len() - 1) / 2].iter().any(|d| *d > 0.0))
    }

    /// Whether any ray right of centre sees `object`
    #[must_use]
    pub fn right(&self, object: RayObject) -> bool {
        self.row(object)
            .is_some_and(|row| row[(row.len() - 1) / 2 + 1..].iter().any(|d| *d > 0.0))
    }

    /// Distance row for `object`, if tracked
    #[must_use]
    pub fn distances(&self, object: RayObject) -> Option<&[f64]> {
        self.row(object)
    }
}
