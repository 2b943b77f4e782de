//! Run-length distributions
//!
//! A [`LengthDistribution`] names a distribution family and its shape
//! parameters. [`LengthSampler`] compiles it once into a `rand_distr`
//! sampler and draws signed integer run lengths (truncated toward zero).

use rand::Rng;
use rand_distr::{Beta, Cauchy, Distribution, Gamma, Normal, Poisson, Weibull};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use aai_rl_core::{RLError, Result};

/// Run lengths above this magnitude are reported as likely to stall the agent
pub const LONG_RUN_WARNING: u64 = 100;

/// Upper bound on redraws in a rejection loop
pub const MAX_REDRAWS: usize = 10_000;

/// Largest configurable maximum for the families scaled by it, and the
/// magnitude beyond which draws from unbounded families are redrawn
pub const MAX_RUN_LENGTH: u64 = 1_000_000;

fn default_mu() -> f64 {
    5.0
}
fn default_sigma() -> f64 {
    1.0
}
fn default_shape() -> f64 {
    2.0
}
fn default_mode() -> f64 {
    5.0
}
fn default_kappa() -> f64 {
    9.0
}
fn default_theta() -> f64 {
    0.5
}
fn default_lambda() -> f64 {
    5.0
}

/// Distribution family used to draw run lengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum LengthDistribution {
    /// Always the configured maximum
    #[default]
    Fixed,
    /// Uniform integer in `[0, max]`
    Uniform,
    /// Normal with mean `mu` and standard deviation `sigma`
    Normal {
        /// Mean
        #[serde(default = "default_mu")]
        mu: f64,
        /// Standard deviation
        #[serde(default = "default_sigma")]
        sigma: f64,
    },
    /// Beta(alpha, beta) rescaled to `[0, max]`
    Beta {
        /// First shape parameter
        #[serde(default = "default_shape")]
        alpha: f64,
        /// Second shape parameter
        #[serde(default = "default_shape")]
        beta: f64,
    },
    /// Standard Cauchy shifted to `mode`
    Cauchy {
        /// Location
        #[serde(default = "default_mode")]
        mode: f64,
    },
    /// Gamma with shape `kappa` and scale `theta`
    Gamma {
        /// Shape
        #[serde(default = "default_kappa")]
        kappa: f64,
        /// Scale
        #[serde(default = "default_theta")]
        theta: f64,
    },
    /// Weibull with shape `alpha` and unit scale, rescaled by `max` unless
    /// the sampler is [`unscaled`](LengthSampler::unscaled)
    Weibull {
        /// Shape
        #[serde(default = "default_shape")]
        alpha: f64,
    },
    /// Poisson with rate `lambda`
    Poisson {
        /// Rate
        #[serde(default = "default_lambda")]
        lambda: f64,
    },
}

impl LengthDistribution {
    /// All recognised tags
    pub const TAGS: [&'static str; 8] = [
        "fixed", "uniform", "normal", "beta", "cauchy", "gamma", "weibull", "poisson",
    ];

    /// Tag naming this family
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            LengthDistribution::Fixed => "fixed",
            LengthDistribution::Uniform => "uniform",
            LengthDistribution::Normal { .. } => "normal",
            LengthDistribution::Beta { .. } => "beta",
            LengthDistribution::Cauchy { .. } => "cauchy",
            LengthDistribution::Gamma { .. } => "gamma",
            LengthDistribution::Weibull { .. } => "weibull",
            LengthDistribution::Poisson { .. } => "poisson",
        }
    }

    /// Location of the signed families (normal mean, cauchy mode)
    #[must_use]
    pub fn location(&self) -> Option<f64> {
        match self {
            LengthDistribution::Normal { mu, .. } => Some(*mu),
            LengthDistribution::Cauchy { mode } => Some(*mode),
            _ => None,
        }
    }
}

impl FromStr for LengthDistribution {
    type Err = RLError;

    /// Parse a tag into the family with its default parameters
    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "fixed" => Ok(LengthDistribution::Fixed),
            "uniform" => Ok(LengthDistribution::Uniform),
            "normal" => Ok(LengthDistribution::Normal {
                mu: default_mu(),
                sigma: default_sigma(),
            }),
            "beta" => Ok(LengthDistribution::Beta {
                alpha: default_shape(),
                beta: default_shape(),
            }),
            "cauchy" => Ok(LengthDistribution::Cauchy { mode: default_mode() }),
            "gamma" => Ok(LengthDistribution::Gamma {
                kappa: default_kappa(),
                theta: default_theta(),
            }),
            "weibull" => Ok(LengthDistribution::Weibull { alpha: default_shape() }),
            "poisson" => Ok(LengthDistribution::Poisson { lambda: default_lambda() }),
            other => Err(RLError::InvalidConfig(format!(
                "Distribution not recognised: {other:?} (expected one of {})",
                Self::TAGS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for LengthDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone)]
enum Kernel {
    Fixed,
    Uniform,
    Normal { location: f64, noise: Normal<f64> },
    Beta(Beta<f64>),
    Cauchy { location: f64, noise: Cauchy<f64> },
    Gamma(Gamma<f64>),
    Weibull(Weibull<f64>),
    Poisson(Poisson<f64>),
}

fn invalid(tag: &str, err: impl fmt::Display) -> RLError {
    RLError::InvalidConfig(format!("invalid {tag} parameters: {err}"))
}

/// Compiled run-length sampler
#[derive(Debug, Clone)]
pub struct LengthSampler {
    max_len: u32,
    distribution: LengthDistribution,
    kernel: Kernel,
    scale_weibull: bool,
}

impl LengthSampler {
    /// Compile `distribution` for run lengths bounded (where relevant) by `max_len`
    pub fn new(max_len: u32, distribution: &LengthDistribution) -> Result<Self> {
        let tag = distribution.tag();
        let kernel = match *distribution {
            LengthDistribution::Fixed => Kernel::Fixed,
            LengthDistribution::Uniform => Kernel::Uniform,
            LengthDistribution::Normal { mu, sigma } => {
                if !mu.is_finite() {
                    return Err(invalid(tag, "mean must be finite"));
                }
                Kernel::Normal {
                    location: mu,
                    noise: Normal::new(0.0, sigma).map_err(|e| invalid(tag, e))?,
                }
            }
            LengthDistribution::Beta { alpha, beta } => {
                Kernel::Beta(Beta::new(alpha, beta).map_err(|e| invalid(tag, e))?)
            }
            LengthDistribution::Cauchy { mode } => {
                if !mode.is_finite() {
                    return Err(invalid(tag, "mode must be finite"));
                }
                Kernel::Cauchy {
                    location: mode,
                    noise: Cauchy::new(0.0, 1.0).map_err(|e| invalid(tag, e))?,
                }
            }
            LengthDistribution::Gamma { kappa, theta } => {
                Kernel::Gamma(Gamma::new(kappa, theta).map_err(|e| invalid(tag, e))?)
            }
            LengthDistribution::Weibull { alpha } => {
                Kernel::Weibull(Weibull::new(1.0, alpha).map_err(|e| invalid(tag, e))?)
            }
            LengthDistribution::Poisson { lambda } => {
                Kernel::Poisson(Poisson::new(lambda).map_err(|e| invalid(tag, e))?)
            }
        };

        let scaled_by_max = matches!(
            kernel,
            Kernel::Fixed | Kernel::Uniform | Kernel::Beta(_) | Kernel::Weibull(_)
        );
        if scaled_by_max && max_len == 0 {
            return Err(RLError::InvalidConfig(format!(
                "maximum run length is 0, a {tag} draw can never be nonzero; try increasing it"
            )));
        }
        if scaled_by_max && u64::from(max_len) > MAX_RUN_LENGTH {
            return Err(RLError::InvalidConfig(format!(
                "maximum run length {max_len} exceeds {MAX_RUN_LENGTH}"
            )));
        }

        Ok(Self {
            max_len,
            distribution: distribution.clone(),
            kernel,
            scale_weibull: true,
        })
    }

    /// Draw Weibull lengths without rescaling by the maximum.
    ///
    /// Turns use the raw Weibull draw while saccades rescale it. Other
    /// families are unaffected.
    #[must_use]
    pub fn unscaled(mut self) -> Self {
        self.scale_weibull = false;
        self
    }

    /// Configured maximum run length
    #[must_use]
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Distribution this sampler was compiled from
    #[must_use]
    pub fn distribution(&self) -> &LengthDistribution {
        &self.distribution
    }

    /// Whether draws carry their own sign (normal, cauchy)
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self.kernel, Kernel::Normal { .. } | Kernel::Cauchy { .. })
    }

    /// Whether every draw is the same value
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self.kernel, Kernel::Fixed)
    }

    /// Whether every draw already lies in `[0, max]`
    fn is_bounded(&self) -> bool {
        matches!(self.kernel, Kernel::Fixed | Kernel::Uniform | Kernel::Beta(_))
    }

    /// One raw draw, truncated toward zero.
    ///
    /// `centre` replaces the configured location of the signed families.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, centre: Option<f64>) -> i64 {
        let max = f64::from(self.max_len);
        let value = match &self.kernel {
            Kernel::Fixed => return i64::from(self.max_len),
            Kernel::Uniform => return i64::from(rng.gen_range(0..=self.max_len)),
            Kernel::Normal { location, noise } => centre.unwrap_or(*location) + noise.sample(rng),
            Kernel::Beta(beta) => beta.sample(rng) * max,
            Kernel::Cauchy { location, noise } => centre.unwrap_or(*location) + noise.sample(rng),
            Kernel::Gamma(gamma) => gamma.sample(rng),
            Kernel::Weibull(weibull) if self.scale_weibull => weibull.sample(rng) * max,
            Kernel::Weibull(weibull) => weibull.sample(rng),
            Kernel::Poisson(poisson) => poisson.sample(rng),
        };
        truncate(value)
    }

    /// Redraw until `accept` holds, giving up after [`MAX_REDRAWS`] draws.
    ///
    /// Draws from unbounded families whose magnitude exceeds
    /// [`MAX_RUN_LENGTH`] are always redrawn.
    pub fn draw_until<R, F>(&self, rng: &mut R, centre: Option<f64>, accept: F) -> Result<i64>
    where
        R: Rng + ?Sized,
        F: Fn(i64) -> bool,
    {
        let attempts = if self.is_fixed() { 1 } else { MAX_REDRAWS };
        for _ in 0..attempts {
            let n = self.draw(rng, centre);
            if (self.is_bounded() || n.unsigned_abs() <= MAX_RUN_LENGTH) && accept(n) {
                return Ok(n);
            }
        }
        Err(RLError::SamplerExhausted { attempts })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    // `as` saturates and maps NaN to 0
    value.trunc() as i64
}

/// Log a warning for run lengths long enough to look like a stuck agent
pub fn warn_if_long(steps: i64) {
    if steps.unsigned_abs() > LONG_RUN_WARNING {
        warn!(
            steps,
            "The number of steps chosen is: {steps}. Try toggling distribution parameters as your agent might get stuck."
        );
    }
}
