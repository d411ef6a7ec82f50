//! Binary-encoded Genetic Algorithm.
//!
//! Individuals are fixed-length bit strings laid out by an
//! [`encoding::Layout`](crate::encoding::Layout); the cost function sees
//! the decoded real values. One generation is
//!
//! 1. [`crossover`]: two-point crossover of adjacent pairs, `2n` offspring
//! 2. [`mutate`]: a fixed budget of random bit toggles across all offspring
//! 3. [`replace`]: score offspring, merge with the current population
//!
//! # Key Types
//!
//! - [`Population`], [`Individual`], [`Genome`]: the data model
//! - [`CostFunction`]: the objective (minimized)
//! - [`Evaluator`]: decode + evaluate, shared by generation and replacement
//! - [`BgaConfig`]: operator parameters with documented defaults
//! - [`BgaRunner`]: runs the loop, or a single [`BgaRunner::step`]
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Haupt & Haupt (2004), *Practical Genetic Algorithms*

mod config;
mod crossover;
mod evaluate;
mod mutation;
mod population;
mod replacement;
mod runner;
mod types;

pub use config::{BgaConfig, CutPoints, Replacement, Sampling};
pub use crossover::{crossover, two_point};
pub use evaluate::Evaluator;
pub use mutation::{flip_count, mutate};
pub use population::generate;
pub use replacement::replace;
pub use runner::{BgaResult, BgaRunner};
pub use types::{CostFunction, Genome, Individual, Population};
