//! Bit-flip mutation over the whole offspring set.
//!
//! The operator does not visit every locus with probability `rate`.
//! Instead it computes a total toggle budget,
//! `round(rate × offspring × genome_len)`, and spends it on independent
//! uniform draws of `(offspring, locus)`. Draws may land on the same bit
//! twice, which restores it; the expected number of distinct changed bits
//! is therefore below the budget.

use super::types::Genome;
use crate::error::{Error, Result};
use rand::Rng;
use tracing::{debug, instrument};

/// Number of toggles for `offspring_count` genomes of `genome_len` bits.
///
/// Rounds half to even.
pub fn flip_count(rate: f64, offspring_count: usize, genome_len: usize) -> usize {
    (rate * offspring_count as f64 * genome_len as f64).round_ties_even() as usize
}

/// Toggles [`flip_count`] randomly chosen bits in place.
///
/// Each draw picks an offspring index, then a locus in `[0, genome_len)`.
/// Returns the number of toggles performed.
///
/// # Errors
/// - [`Error::Configuration`] if `rate` is not in `[0, 1]`.
/// - [`Error::SizeMismatch`] if any offspring is not `genome_len` bits
///   long; nothing is modified in that case.
#[instrument(level = "debug", skip_all, fields(offspring = offspring.len(), genome_len = genome_len, rate = rate))]
pub fn mutate<R: Rng>(
    offspring: &mut [Genome],
    genome_len: usize,
    rate: f64,
    rng: &mut R,
) -> Result<usize> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(Error::Configuration(format!(
            "mutation rate must be in [0, 1], got {rate}"
        )));
    }
    if let Some((i, g)) = offspring
        .iter()
        .enumerate()
        .find(|(_, g)| g.len() != genome_len)
    {
        return Err(Error::SizeMismatch(format!(
            "offspring {i} has {} bits, expected {genome_len}",
            g.len()
        )));
    }
    if offspring.is_empty() || genome_len == 0 {
        return Ok(0);
    }

    let flips = flip_count(rate, offspring.len(), genome_len);
    for _ in 0..flips {
        let child = rng.random_range(0..offspring.len());
        let locus = rng.random_range(0..genome_len);
        offspring[child].flip(locus);
    }
    debug!(flips, "offspring mutated");
    Ok(flips)
}
