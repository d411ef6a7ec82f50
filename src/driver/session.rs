//! Driver-owned session state.
//!
//! A [`Session`] threads the objective, ranges, layout, population and
//! random generator through successive commands. The GA core never holds
//! any of it.

use super::command::Command;
use super::expr::Expression;
use crate::encoding::{Layout, VariableRange};
use crate::error::{Error, Result};
use crate::ga::{generate, BgaConfig, BgaRunner, Evaluator, Individual, Population};
use crate::random::{create_rng, rng_from_seed, GaRng};
use tracing::{info, instrument};

/// What a command changed, for the caller to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    FunctionSet,
    RangesSet,
    Populated,
    Evolved { generations: usize },
    Reseeded,
    Show,
    Quit,
}

/// Interactive optimization context.
///
/// Setting a new function or new ranges discards the current population,
/// whose costs or encoding would no longer match.
///
/// ```
/// use u_bitga::driver::Session;
/// use u_bitga::ga::BgaConfig;
///
/// let mut session = Session::new(BgaConfig::default().with_seed(42));
/// session.set_function(&["x", "y"], "-x * (y / 2 - 10)").unwrap();
/// session.set_ranges(&[(10.0, 20.0), (-5.0, 7.0)]).unwrap();
/// session.populate(10, 4).unwrap();
/// let best = session.evolve(50).unwrap();
/// assert_eq!(best.phenotype.len(), 2);
/// ```
pub struct Session {
    config: BgaConfig,
    rng: GaRng,
    objective: Option<Expression>,
    ranges: Option<Vec<VariableRange>>,
    layout: Option<Layout>,
    population: Option<Population>,
}

impl Session {
    pub fn new(config: BgaConfig) -> Self {
        let rng = rng_from_seed(config.seed);
        Self {
            config,
            rng,
            objective: None,
            ranges: None,
            layout: None,
            population: None,
        }
    }

    pub fn config(&self) -> &BgaConfig {
        &self.config
    }

    pub fn objective(&self) -> Option<&Expression> {
        self.objective.as_ref()
    }

    pub fn ranges(&self) -> Option<&[VariableRange]> {
        self.ranges.as_deref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// The current best individual, once a population exists.
    pub fn best(&self) -> Option<&Individual> {
        self.population.as_ref().and_then(Population::best)
    }

    /// Compiles and installs the objective.
    pub fn set_function<S: AsRef<str>>(&mut self, variables: &[S], body: &str) -> Result<&Expression> {
        let expression = Expression::compile(variables, body)?;
        self.population = None;
        Ok(self.objective.insert(expression))
    }

    /// Installs one `(low, high)` range per variable.
    pub fn set_ranges(&mut self, ranges: &[(f64, f64)]) -> Result<&[VariableRange]> {
        if ranges.is_empty() {
            return Err(Error::Configuration("at least one range is required".into()));
        }
        let ranges = ranges
            .iter()
            .map(|&(low, high)| VariableRange::new(low, high))
            .collect::<Result<Vec<_>>>()?;
        self.population = None;
        self.layout = None;
        Ok(self.ranges.insert(ranges))
    }

    /// Restarts the random generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = create_rng(seed);
    }

    /// Builds the initial population with `bits` per variable.
    #[instrument(level = "info", skip(self))]
    pub fn populate(&mut self, size: usize, bits: u32) -> Result<&Population> {
        let objective = self.objective.as_ref().ok_or_else(|| missing("a function"))?;
        let ranges = self.ranges.as_ref().ok_or_else(|| missing("ranges"))?;
        if objective.arity() != ranges.len() {
            return Err(Error::Configuration(format!(
                "function takes {} variables but {} ranges are set",
                objective.arity(),
                ranges.len()
            )));
        }

        let layout = Layout::uniform(ranges.clone(), bits)?;
        let config = self.config.clone().with_population_size(size);
        config.validate(&layout)?;

        let evaluator = Evaluator::new(objective, &layout).with_round_digits(config.round_digits);
        let mut rng = self.rng.clone();
        let population = generate(&evaluator, size, config.sampling, &mut rng)?;
        info!(size, bits, best_cost = population.best().map(|b| b.cost), "population ready");

        self.rng = rng;
        self.config = config;
        self.layout = Some(layout);
        Ok(self.population.insert(population))
    }

    /// Runs `generations` generation steps and returns the new best.
    ///
    /// All steps run on a working copy of the population and of the random
    /// generator; both are committed together only when every step
    /// succeeded, so a failed call leaves the seeded sequence where it was.
    #[instrument(level = "info", skip(self))]
    pub fn evolve(&mut self, generations: usize) -> Result<&Individual> {
        let objective = self.objective.as_ref().ok_or_else(|| missing("a function"))?;
        let layout = self.layout.as_ref().ok_or_else(|| missing("a population"))?;
        let current = self.population.as_ref().ok_or_else(|| missing("a population"))?;

        let evaluator =
            Evaluator::new(objective, layout).with_round_digits(self.config.round_digits);
        let mut rng = self.rng.clone();
        let mut next = current.clone();
        for _ in 0..generations {
            next = BgaRunner::step(&evaluator, &next, &self.config, &mut rng)?;
        }
        info!(
            generations,
            best_cost = next.best().map(|b| b.cost),
            "evolution finished"
        );

        self.rng = rng;
        let population = self.population.insert(next);
        population
            .best()
            .ok_or_else(|| Error::Configuration("population became empty".into()))
    }

    /// Applies one parsed directive.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        Ok(match command {
            Command::Function { variables, body } => {
                self.set_function(&variables, &body)?;
                Outcome::FunctionSet
            }
            Command::Ranges(ranges) => {
                self.set_ranges(&ranges)?;
                Outcome::RangesSet
            }
            Command::Populate { size, bits } => {
                self.populate(size, bits)?;
                Outcome::Populated
            }
            Command::Seed(seed) => {
                self.reseed(seed);
                Outcome::Reseeded
            }
            Command::Evolve { generations } => {
                self.evolve(generations)?;
                Outcome::Evolved { generations }
            }
            Command::Show => {
                if self.population.is_none() {
                    return Err(missing("a population"));
                }
                Outcome::Show
            }
            Command::Quit => Outcome::Quit,
        })
    }
}

fn missing(what: &str) -> Error {
    Error::Configuration(format!("{what} must be set first"))
}
