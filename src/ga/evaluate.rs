//! Genome scoring: decode, evaluate, optionally round.

use super::types::{CostFunction, Genome, Individual};
use crate::encoding::Layout;
use crate::error::Result;

/// Binds a cost function to a layout.
///
/// Scoring always goes through the layout, so a genome is decoded the same
/// way by the generator and by the replacement policy.
pub struct Evaluator<'a, F: ?Sized> {
    cost: &'a F,
    layout: &'a Layout,
    round_digits: Option<u32>,
}

impl<'a, F: CostFunction + ?Sized> Evaluator<'a, F> {
    pub fn new(cost: &'a F, layout: &'a Layout) -> Self {
        Self {
            cost,
            layout,
            round_digits: None,
        }
    }

    /// Rounds phenotype values and costs to `digits` decimals before
    /// storing them. `None` keeps full precision.
    pub fn with_round_digits(mut self, digits: Option<u32>) -> Self {
        self.round_digits = digits;
        self
    }

    pub fn layout(&self) -> &Layout {
        self.layout
    }

    /// Decodes and scores a genome. The returned rank is a placeholder
    /// until the individual joins a [`Population`](super::Population).
    pub fn score(&self, genome: Genome) -> Result<Individual> {
        let phenotype: Vec<f64> = self
            .layout
            .decode(&genome)?
            .into_iter()
            .map(|v| self.round(v))
            .collect();
        let cost = self.round(self.cost.cost(&phenotype));
        Ok(Individual {
            rank: 0,
            genome,
            phenotype,
            cost,
        })
    }

    fn round(&self, value: f64) -> f64 {
        match self.round_digits {
            Some(digits) => {
                let scale = 10f64.powi(digits as i32);
                (value * scale).round_ties_even() / scale
            }
            None => value,
        }
    }
}
