//! Binary GA generation loop.
//!
//! [`BgaRunner`] orchestrates the evolutionary process:
//! generate → (crossover → mutate → replace) × generations.

use super::config::BgaConfig;
use super::crossover::crossover;
use super::evaluate::Evaluator;
use super::mutation::mutate;
use super::population::generate;
use super::replacement::replace;
use super::types::{CostFunction, Individual, Population};
use crate::encoding::Layout;
use crate::error::{Error, Result};
use crate::random::rng_from_seed;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, trace};

/// Result of a binary GA run.
#[derive(Debug, Clone)]
pub struct BgaResult {
    /// The best individual of the final population.
    pub best: Individual,

    /// The final population, sorted and ranked.
    pub population: Population,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run was terminated due to stagnation.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best cost of the initial population followed by the best cost at
    /// the end of each generation.
    pub cost_history: Vec<f64>,
}

/// Executes the binary GA.
///
/// # Usage
///
/// ```
/// use u_bitga::encoding::{Layout, VariableRange};
/// use u_bitga::ga::{BgaConfig, BgaRunner};
///
/// let layout = Layout::uniform(
///     vec![
///         VariableRange::new(10.0, 20.0).unwrap(),
///         VariableRange::new(-5.0, 7.0).unwrap(),
///     ],
///     4,
/// )
/// .unwrap();
/// let cost = |v: &[f64]| -v[0] * (v[1] / 2.0 - 10.0);
/// let config = BgaConfig::default().with_seed(42);
///
/// let result = BgaRunner::run(&cost, &layout, &config).unwrap();
/// assert_eq!(result.population.len(), 10);
/// ```
pub struct BgaRunner;

impl BgaRunner {
    /// Runs the GA for `config.max_generations` generations.
    pub fn run<F>(cost: &F, layout: &Layout, config: &BgaConfig) -> Result<BgaResult>
    where
        F: CostFunction + ?Sized,
    {
        Self::run_with_cancel(cost, layout, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the population reached so far.
    pub fn run_with_cancel<F>(
        cost: &F,
        layout: &Layout,
        config: &BgaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BgaResult>
    where
        F: CostFunction + ?Sized,
    {
        config.validate(layout)?;

        let mut rng = rng_from_seed(config.seed);
        let evaluator = Evaluator::new(cost, layout).with_round_digits(config.round_digits);

        let mut population = generate(
            &evaluator,
            config.population_size,
            config.sampling,
            &mut rng,
        )?;
        let mut best_cost = best_of(&population)?.cost;
        let mut cost_history = Vec::with_capacity(config.max_generations + 1);
        cost_history.push(best_cost);

        let mut stagnation_counter = 0usize;
        let mut stagnated = false;
        let mut cancelled = false;
        let mut generations = 0usize;

        for gen in 0..config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            population = Self::step(&evaluator, &population, config, &mut rng)?;
            generations = gen + 1;

            let gen_best = best_of(&population)?.cost;
            if gen_best < best_cost {
                best_cost = gen_best;
                stagnation_counter = 0;
            } else {
                stagnation_counter += 1;
            }
            cost_history.push(gen_best);
            trace!(generation = generations, best_cost = gen_best, "generation done");

            if config.stagnation_limit > 0 && stagnation_counter >= config.stagnation_limit {
                stagnated = true;
                break;
            }
        }

        let best = best_of(&population)?.clone();
        info!(
            generations,
            best_cost = best.cost,
            stagnated,
            cancelled,
            "binary GA finished"
        );
        Ok(BgaResult {
            best,
            population,
            generations,
            stagnated,
            cancelled,
            cost_history,
        })
    }

    /// Advances one generation: crossover, mutation, replacement.
    ///
    /// Works on copies; `population` is left untouched whether the step
    /// succeeds or fails, so callers commit the returned value explicitly.
    #[instrument(level = "debug", skip_all, fields(size = population.len()))]
    pub fn step<F, R>(
        evaluator: &Evaluator<'_, F>,
        population: &Population,
        config: &BgaConfig,
        rng: &mut R,
    ) -> Result<Population>
    where
        F: CostFunction + ?Sized,
        R: Rng,
    {
        let mut offspring = crossover(population, config.cut_points, rng)?;
        mutate(
            &mut offspring,
            evaluator.layout().genome_len(),
            config.mutation_rate,
            rng,
        )?;
        replace(
            evaluator,
            population,
            offspring,
            config.keep,
            config.replacement,
        )
    }
}

fn best_of(population: &Population) -> Result<&Individual> {
    population
        .best()
        .ok_or_else(|| Error::Configuration("population became empty".into()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::VariableRange;
    use crate::ga::{CutPoints, Replacement, Sampling};
    use crate::random::create_rng;

    fn xy_layout(bits: u32) -> Layout {
        Layout::uniform(
            vec![
                VariableRange::new(10.0, 20.0).unwrap(),
                VariableRange::new(-5.0, 7.0).unwrap(),
            ],
            bits,
        )
        .unwrap()
    }

    fn objective(v: &[f64]) -> f64 {
        -v[0] * (v[1] / 2.0 - 10.0)
    }

    #[test]
    fn test_scenario_converges_towards_optimum() {
        let layout = xy_layout(4);
        let config = BgaConfig::default()
            .with_max_generations(200)
            .with_seed(42);

        let result = BgaRunner::run(&objective, &layout, &config).unwrap();

        assert_eq!(result.generations, 200);
        assert_eq!(result.population.len(), 10);
        assert!(result.population.is_ordered());
        // Optimum is f(10, 7) = 65.
        assert!(
            result.best.cost <= 80.0,
            "expected cost <= 80 after 200 generations, got {}",
            result.best.cost
        );
        assert!(result.best.cost >= 65.0 - 1e-9);
    }

    #[test]
    fn test_elitist_history_is_monotone() {
        let layout = xy_layout(4);
        let config = BgaConfig::default()
            .with_max_generations(50)
            .with_seed(7);

        let result = BgaRunner::run(&objective, &layout, &config).unwrap();

        assert_eq!(result.cost_history.len(), 51);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost should never increase with elitism: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let layout = xy_layout(6);
        let config = BgaConfig::default()
            .with_population_size(12)
            .with_max_generations(30)
            .with_cut_points(CutPoints::RandomPerPair)
            .with_seed(1234);

        let a = BgaRunner::run(&objective, &layout, &config).unwrap();
        let b = BgaRunner::run(&objective, &layout, &config).unwrap();

        assert_eq!(a.population, b.population);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_identical_populations_every_generation() {
        let layout = xy_layout(4);
        let config = BgaConfig::default();
        let eval = Evaluator::new(&objective, &layout);
        let mut rng_a = create_rng(99);
        let mut rng_b = create_rng(99);

        let mut a = generate(&eval, 10, Sampling::Integer, &mut rng_a).unwrap();
        let mut b = generate(&eval, 10, Sampling::Integer, &mut rng_b).unwrap();
        assert_eq!(a, b);
        for _ in 0..20 {
            a = BgaRunner::step(&eval, &a, &config, &mut rng_a).unwrap();
            b = BgaRunner::step(&eval, &b, &config, &mut rng_b).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_step_keeps_population_sorted() {
        let layout = xy_layout(4);
        let config = BgaConfig::default();
        let eval = Evaluator::new(&objective, &layout);
        let mut rng = create_rng(3);
        let mut pop = generate(&eval, 10, Sampling::Integer, &mut rng).unwrap();
        for _ in 0..25 {
            pop = BgaRunner::step(&eval, &pop, &config, &mut rng).unwrap();
            assert_eq!(pop.len(), 10);
            assert!(pop.is_ordered());
        }
    }

    #[test]
    fn test_failed_step_leaves_population() {
        let layout = xy_layout(4);
        let eval = Evaluator::new(&objective, &layout);
        let mut rng = create_rng(3);
        let pop = generate(&eval, 10, Sampling::Integer, &mut rng).unwrap();
        let before = pop.clone();

        // Cut points beyond an 8-bit genome.
        let config = BgaConfig::default().with_cut_points(CutPoints::Fixed(3, 9));
        assert!(BgaRunner::step(&eval, &pop, &config, &mut rng).is_err());
        assert_eq!(pop, before);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let layout = xy_layout(4);
        let config = BgaConfig::default().with_population_size(7);
        assert!(matches!(
            BgaRunner::run(&objective, &layout, &config),
            Err(Error::SizeMismatch(_))
        ));
    }

    #[test]
    fn test_slice_parity_run_shrinks_population() {
        let layout = xy_layout(4);
        let config = BgaConfig::default()
            .with_replacement(Replacement::SliceParity)
            .with_max_generations(5)
            .with_seed(42);

        let result = BgaRunner::run(&objective, &layout, &config).unwrap();

        // keep = 2: two survivors plus two offspring after the first step.
        assert_eq!(result.population.len(), 4);
        assert!(result.population.is_ordered());
    }

    #[test]
    fn test_stagnation_termination() {
        let layout = xy_layout(2);
        let config = BgaConfig::default()
            .with_cut_points(CutPoints::Fixed(1, 3))
            .with_max_generations(1000)
            .with_stagnation_limit(10)
            .with_seed(42);

        let result = BgaRunner::run(&objective, &layout, &config).unwrap();

        // A 4-bit search space is exhausted long before 1000 generations.
        assert!(result.stagnated);
        assert!(result.generations < 1000);
        assert_eq!(result.cost_history.len(), result.generations + 1);
    }

    #[test]
    fn test_cancellation() {
        let layout = xy_layout(4);
        let config = BgaConfig::default()
            .with_max_generations(10_000)
            .with_seed(42);

        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            BgaRunner::run_with_cancel(&objective, &layout, &config, Some(cancel)).unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.cost_history.len(), 1);
    }

    #[test]
    fn test_round_digits_applied() {
        let layout = xy_layout(4);
        let config = BgaConfig::default()
            .with_round_digits(2)
            .with_max_generations(3)
            .with_seed(5);

        let result = BgaRunner::run(&objective, &layout, &config).unwrap();

        for ind in &result.population {
            for v in &ind.phenotype {
                assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6);
            }
        }
    }
}
