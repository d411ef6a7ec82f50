//! Core data model of the binary GA.
//!
//! [`Genome`], [`Individual`] and [`Population`] are plain values. The
//! only invariant worth guarding, "sorted ascending by cost with
//! `rank == position`", is enforced by [`Population`]'s constructor.

use std::cmp::Ordering;
use std::fmt;

/// Objective to minimize.
///
/// Receives the decoded phenotype, one value per layout variable, in
/// layout order. Assumed pure: the engine may call it any number of times
/// with the same input and expects the same answer.
///
/// Closures implement it directly:
///
/// ```
/// use u_bitga::ga::CostFunction;
///
/// let f = |v: &[f64]| -v[0] * (v[1] / 2.0 - 10.0);
/// assert_eq!(f.cost(&[10.0, 7.0]), 65.0);
/// ```
pub trait CostFunction {
    fn cost(&self, phenotype: &[f64]) -> f64;
}

impl<F> CostFunction for F
where
    F: Fn(&[f64]) -> f64,
{
    fn cost(&self, phenotype: &[f64]) -> f64 {
        self(phenotype)
    }
}

/// Fixed-length bit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genome(Vec<bool>);

impl Genome {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Builds a genome from `0`/`1` literals; any non-zero byte is a set bit.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self(bits.iter().map(|&b| b != 0).collect())
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// The genome as `0`/`1` bytes.
    pub fn to_bits(&self) -> Vec<u8> {
        self.0.iter().map(|&b| u8::from(b)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Toggles the bit at `locus`.
    ///
    /// # Panics
    /// Panics if `locus >= self.len()`.
    pub fn flip(&mut self, locus: usize) {
        self.0[locus] = !self.0[locus];
    }

    /// Copy of `self` with `[p1, p2)` taken from `donor`.
    ///
    /// Caller guarantees equal lengths and `p1 <= p2 <= len`.
    pub(crate) fn splice(&self, donor: &Genome, p1: usize, p2: usize) -> Genome {
        let mut bits = Vec::with_capacity(self.0.len());
        bits.extend_from_slice(&self.0[..p1]);
        bits.extend_from_slice(&donor.0[p1..p2]);
        bits.extend_from_slice(&self.0[p2..]);
        Genome(bits)
    }
}

impl From<Vec<bool>> for Genome {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl AsRef<[bool]> for Genome {
    fn as_ref(&self) -> &[bool] {
        &self.0
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A scored candidate solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Position in the owning population. Not a stable identity.
    pub rank: usize,
    pub genome: Genome,
    /// Decoded variable values, in layout order.
    pub phenotype: Vec<f64>,
    pub cost: f64,
}

/// Individuals sorted ascending by cost, ranked by position.
///
/// Any NaN cost sorts after every number, whatever its sign bit; numbers
/// are ordered with [`f64::total_cmp`]. Sorting is stable.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Sorts `individuals` by cost and reassigns ranks.
    pub fn from_individuals(mut individuals: Vec<Individual>) -> Self {
        individuals.sort_by(compare_cost);
        for (rank, ind) in individuals.iter_mut().enumerate() {
            ind.rank = rank;
        }
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn get(&self, rank: usize) -> Option<&Individual> {
        self.individuals.get(rank)
    }

    /// The lowest-cost individual.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// True when costs are non-decreasing and every rank equals its position.
    pub fn is_ordered(&self) -> bool {
        self.individuals
            .windows(2)
            .all(|w| compare_cost(&w[0], &w[1]) != Ordering::Greater)
            && self
                .individuals
                .iter()
                .enumerate()
                .all(|(i, ind)| ind.rank == i)
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

fn compare_cost(a: &Individual, b: &Individual) -> Ordering {
    a.cost
        .is_nan()
        .cmp(&b.cost.is_nan())
        .then_with(|| a.cost.total_cmp(&b.cost))
}
