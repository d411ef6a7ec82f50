//! Initial population construction.

use super::config::Sampling;
use super::evaluate::Evaluator;
use super::types::{CostFunction, Population};
use crate::encoding::VariableRange;
use crate::error::{Error, Result};
use rand::Rng;
use tracing::{debug, instrument};

/// Builds a sorted, ranked initial population.
///
/// Each variable is sampled inside its range, then encoded and decoded so
/// the stored phenotype is the value the genome actually represents.
/// Sampling consumes `arity` draws per individual, in layout order.
#[instrument(level = "debug", skip_all, fields(size = population_size, genome_len = evaluator.layout().genome_len()))]
pub fn generate<F, R>(
    evaluator: &Evaluator<'_, F>,
    population_size: usize,
    sampling: Sampling,
    rng: &mut R,
) -> Result<Population>
where
    F: CostFunction + ?Sized,
    R: Rng,
{
    if population_size == 0 {
        return Err(Error::Configuration(
            "population_size must be at least 1".into(),
        ));
    }
    let layout = evaluator.layout();
    let samplers = layout
        .variables()
        .iter()
        .map(|v| Sampler::new(v.range, sampling))
        .collect::<Result<Vec<_>>>()?;

    let mut individuals = Vec::with_capacity(population_size);
    for _ in 0..population_size {
        let values: Vec<f64> = samplers.iter().map(|s| s.draw(rng)).collect();
        let genome = layout.encode(&values)?;
        individuals.push(evaluator.score(genome)?);
    }

    let population = Population::from_individuals(individuals);
    if let Some(best) = population.best() {
        debug!(best_cost = best.cost, "initial population generated");
    }
    Ok(population)
}

/// Per-variable sampling plan, resolved once before drawing.
enum Sampler {
    Integer(i64, i64),
    Continuous(f64, f64),
}

impl Sampler {
    fn new(range: VariableRange, sampling: Sampling) -> Result<Self> {
        match sampling {
            Sampling::Integer => range
                .integer_bounds()
                .map(|(lo, hi)| Sampler::Integer(lo, hi))
                .ok_or_else(|| {
                    Error::Configuration(format!(
                        "range {range} contains no integer to sample; use continuous sampling"
                    ))
                }),
            Sampling::Continuous => Ok(Sampler::Continuous(range.low(), range.high())),
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Sampler::Integer(lo, hi) => rng.random_range(lo..=hi) as f64,
            Sampler::Continuous(lo, hi) => rng.random_range(lo..=hi),
        }
    }
}
