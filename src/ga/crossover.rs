//! Two-point crossover over adjacent parent pairs.
//!
//! Parents are paired by position, `(0, 1), (2, 3), …`. Since the
//! population is sorted by cost, each pair holds individuals of similar
//! quality. Every pair yields two children, so the offspring set is twice
//! the population size.
//!
//! # References
//!
//! - De Jong (1975), *An Analysis of the Behavior of a Class of Genetic
//!   Adaptive Systems* (multi-point crossover)

use super::config::{check_cut_points, CutPoints};
use super::types::{Genome, Population};
use crate::error::{Error, Result};
use rand::Rng;
use tracing::{instrument, trace};

/// Produces `2 × population.len()` offspring genomes.
///
/// `CutPoints::Fixed` draws nothing from `rng`; `CutPoints::RandomPerPair`
/// draws two loci per pair.
///
/// # Errors
/// - [`Error::SizeMismatch`] for an odd population, parents of different
///   lengths, or fixed cut points outside `p1 <= p2 <= L`.
#[instrument(level = "debug", skip_all, fields(parents = population.len()))]
pub fn crossover<R: Rng>(
    population: &Population,
    cut_points: CutPoints,
    rng: &mut R,
) -> Result<Vec<Genome>> {
    if population.len() % 2 != 0 {
        return Err(Error::SizeMismatch(format!(
            "crossover pairs neighbours and needs an even population, got {}",
            population.len()
        )));
    }

    let individuals = population.individuals();
    let mut offspring = Vec::with_capacity(individuals.len() * 2);
    for pair in individuals.chunks_exact(2) {
        let (a, b) = (&pair[0].genome, &pair[1].genome);
        if a.len() != b.len() {
            return Err(Error::SizeMismatch(format!(
                "parents at ranks {} and {} have {} and {} bits",
                pair[0].rank,
                pair[1].rank,
                a.len(),
                b.len()
            )));
        }
        let (p1, p2) = match cut_points {
            CutPoints::Fixed(p1, p2) => (p1, p2),
            CutPoints::RandomPerPair => random_cut_points(a.len(), rng),
        };
        trace!(p1, p2, "crossing pair");
        let (c1, c2) = two_point(a, b, p1, p2)?;
        offspring.push(c1);
        offspring.push(c2);
    }
    Ok(offspring)
}

/// Two-point crossover of one pair.
///
/// Child 1 is `a` with `[p1, p2)` taken from `b`; child 2 is the
/// complement.
///
/// ```
/// use u_bitga::ga::{two_point, Genome};
///
/// let a = Genome::from_bits(&[1, 1, 1, 1, 1, 1, 1, 1]);
/// let b = Genome::from_bits(&[0, 0, 0, 0, 0, 0, 0, 0]);
/// let (c1, c2) = two_point(&a, &b, 3, 6).unwrap();
/// assert_eq!(c1.to_string(), "11100011");
/// assert_eq!(c2.to_string(), "00011100");
/// ```
pub fn two_point(a: &Genome, b: &Genome, p1: usize, p2: usize) -> Result<(Genome, Genome)> {
    if a.len() != b.len() {
        return Err(Error::SizeMismatch(format!(
            "parents have {} and {} bits",
            a.len(),
            b.len()
        )));
    }
    check_cut_points(p1, p2, a.len())?;
    Ok((a.splice(b, p1, p2), b.splice(a, p1, p2)))
}

/// Sorted pair of loci in `[0, len]`.
fn random_cut_points<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..=len);
    let b = rng.random_range(0..=len);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
