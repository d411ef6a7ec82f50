//! Binary GA configuration.
//!
//! [`BgaConfig`] holds every parameter of the generation loop. Defaults
//! reproduce the classic interactive setup: 10 individuals, cut points
//! `(3, 6)`, 10% mutation, 2 replacements per generation.

use crate::encoding::Layout;
use crate::error::{Error, Result};

/// How crossover cut points are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CutPoints {
    /// The same `(p1, p2)` for every parent pair. Requires `p1 <= p2 <= L`.
    Fixed(usize, usize),

    /// A fresh sorted pair in `[0, L]` for every parent pair, drawn from
    /// the run's generator. Still reproducible under a fixed seed.
    RandomPerPair,
}

impl Default for CutPoints {
    fn default() -> Self {
        CutPoints::Fixed(3, 6)
    }
}

/// Survivor policy applied after offspring are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Keep the best `size - keep` current individuals and the best `keep`
    /// offspring. The population size never changes.
    #[default]
    Elitist,

    /// Keep the first `keep` current individuals and append the best `keep`
    /// offspring. The population resizes to `2 * keep` (fewer if either
    /// side is shorter than `keep`).
    SliceParity,
}

/// How initial variable values are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sampling {
    /// Uniform integer in `[ceil(low), floor(high)]`.
    #[default]
    Integer,

    /// Uniform real in `[low, high]`.
    Continuous,
}

/// Configuration for the binary GA.
///
/// # Builder Pattern
///
/// ```
/// use u_bitga::ga::{BgaConfig, CutPoints, Replacement};
///
/// let config = BgaConfig::default()
///     .with_population_size(20)
///     .with_cut_points(CutPoints::RandomPerPair)
///     .with_replacement(Replacement::Elitist)
///     .with_keep(4)
///     .with_seed(42);
/// assert_eq!(config.population_size, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgaConfig {
    /// Number of individuals. Must be even: crossover pairs neighbours.
    pub population_size: usize,

    /// Generations run by [`BgaRunner::run`](super::BgaRunner::run).
    pub max_generations: usize,

    pub cut_points: CutPoints,

    /// Fraction of all offspring bits toggled per generation (0.0–1.0).
    ///
    /// Toggles are drawn with replacement, so the number of distinct
    /// flipped bits is usually lower.
    pub mutation_rate: f64,

    /// Number of offspring admitted into the population per generation.
    pub keep: usize,

    pub replacement: Replacement,

    pub sampling: Sampling,

    /// Round phenotype values and costs to this many decimals.
    ///
    /// `Some(2)` matches two-decimal bookkeeping; `None` keeps full
    /// precision (the default).
    pub round_digits: Option<u32>,

    /// Generations without improvement of the best cost before stopping.
    ///
    /// Set to 0 to disable (the default).
    pub stagnation_limit: usize,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for BgaConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_generations: 100,
            cut_points: CutPoints::default(),
            mutation_rate: 0.1,
            keep: 2,
            replacement: Replacement::default(),
            sampling: Sampling::default(),
            round_digits: None,
            stagnation_limit: 0,
            seed: None,
        }
    }
}

impl BgaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_cut_points(mut self, cut_points: CutPoints) -> Self {
        self.cut_points = cut_points;
        self
    }

    /// Sets the mutation rate, clamped to `[0, 1]`.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep;
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_round_digits(mut self, digits: u32) -> Self {
        self.round_digits = Some(digits);
        self
    }

    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the configuration against a layout.
    pub fn validate(&self, layout: &Layout) -> Result<()> {
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if self.population_size % 2 != 0 {
            return Err(Error::SizeMismatch(format!(
                "population_size must be even for pairwise crossover, got {}",
                self.population_size
            )));
        }
        if self.max_generations == 0 {
            return Err(invalid("max_generations must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid("mutation_rate must be in [0, 1]"));
        }
        match self.replacement {
            Replacement::Elitist if self.keep > self.population_size => {
                return Err(Error::Resize {
                    keep: self.keep,
                    size: self.population_size,
                });
            }
            Replacement::SliceParity if self.keep == 0 => {
                return Err(invalid("keep must be at least 1 for slice replacement"));
            }
            _ => {}
        }
        if let CutPoints::Fixed(p1, p2) = self.cut_points {
            check_cut_points(p1, p2, layout.genome_len())?;
        }
        Ok(())
    }
}

/// Validates `p1 <= p2 <= genome_len`.
pub(crate) fn check_cut_points(p1: usize, p2: usize, genome_len: usize) -> Result<()> {
    if p1 > p2 || p2 > genome_len {
        return Err(Error::SizeMismatch(format!(
            "cut points ({p1}, {p2}) must satisfy p1 <= p2 <= {genome_len}"
        )));
    }
    Ok(())
}

fn invalid(msg: &str) -> Error {
    Error::Configuration(msg.into())
}
