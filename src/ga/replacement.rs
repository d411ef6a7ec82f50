//! Survivor selection: merge scored offspring into the population.

use super::config::Replacement;
use super::evaluate::Evaluator;
use super::types::{CostFunction, Genome, Population};
use crate::error::{Error, Result};
use tracing::{debug, instrument};

/// Scores `offspring` and builds the next population from `current`.
///
/// Offspring are decoded, evaluated and sorted ascending by cost first.
/// Then, depending on `policy`:
///
/// - [`Replacement::Elitist`]: the best `current.len() - keep` current
///   individuals plus the best `keep` offspring. Fails with
///   [`Error::Resize`] if `keep` exceeds either side.
/// - [`Replacement::SliceParity`]: the first `min(keep, current.len())`
///   current individuals plus the best `min(keep, offspring.len())`
///   offspring. The population size becomes the sum of the two.
///
/// The result is re-sorted and re-ranked. `current` is never modified.
#[instrument(level = "debug", skip_all, fields(current = current.len(), offspring = offspring.len(), keep = keep, policy = ?policy))]
pub fn replace<F>(
    evaluator: &Evaluator<'_, F>,
    current: &Population,
    offspring: Vec<Genome>,
    keep: usize,
    policy: Replacement,
) -> Result<Population>
where
    F: CostFunction + ?Sized,
{
    let size = current.len();
    if policy == Replacement::Elitist && (keep > size || keep > offspring.len()) {
        return Err(Error::Resize {
            keep,
            size: size.min(offspring.len()),
        });
    }

    let scored = offspring
        .into_iter()
        .map(|genome| evaluator.score(genome))
        .collect::<Result<Vec<_>>>()?;
    let scored = Population::from_individuals(scored).into_individuals();

    let survivors = match policy {
        Replacement::Elitist => size - keep,
        Replacement::SliceParity => keep.min(size),
    };
    let admitted = keep.min(scored.len());

    let mut next = Vec::with_capacity(survivors + admitted);
    next.extend_from_slice(&current.individuals()[..survivors]);
    next.extend(scored.into_iter().take(admitted));

    let next = Population::from_individuals(next);
    if let Some(best) = next.best() {
        debug!(size = next.len(), best_cost = best.cost, "population replaced");
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Layout, VariableRange};
    use crate::ga::Individual;

    /// One 4-bit variable on `[0, 15]`: the genome value is the cost.
    fn layout() -> Layout {
        Layout::uniform(vec![VariableRange::new(0.0, 15.0).unwrap()], 4).unwrap()
    }

    fn identity(v: &[f64]) -> f64 {
        v[0]
    }

    fn genome(level: u8) -> Genome {
        Genome::from_bits(&[(level >> 3) & 1, (level >> 2) & 1, (level >> 1) & 1, level & 1])
    }

    fn population(levels: &[u8]) -> Population {
        let individuals = levels
            .iter()
            .map(|&l| Individual {
                rank: 0,
                genome: genome(l),
                phenotype: vec![l as f64],
                cost: l as f64,
            })
            .collect();
        Population::from_individuals(individuals)
    }

    fn costs(pop: &Population) -> Vec<f64> {
        pop.iter().map(|i| i.cost).collect()
    }

    #[test]
    fn test_elitist_preserves_size() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[2, 4, 6, 8, 10, 12]);
        let offspring = vec![genome(9), genome(1), genome(15), genome(3)];

        let next = replace(&eval, &current, offspring, 2, Replacement::Elitist).unwrap();

        assert_eq!(next.len(), 6);
        assert_eq!(costs(&next), vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0]);
        assert!(next.is_ordered());
    }

    #[test]
    fn test_elitist_never_discards_the_best() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[0, 4, 6, 8]);
        let offspring = vec![genome(15), genome(14)];

        let next = replace(&eval, &current, offspring, 2, Replacement::Elitist).unwrap();

        assert_eq!(costs(&next), vec![0.0, 4.0, 14.0, 15.0]);
    }

    #[test]
    fn test_elitist_rejects_oversized_keep() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[2, 4]);

        let err = replace(&eval, &current, vec![genome(1); 4], 3, Replacement::Elitist)
            .unwrap_err();
        assert!(matches!(err, Error::Resize { keep: 3, .. }));

        let err = replace(&eval, &current, vec![genome(1)], 2, Replacement::Elitist)
            .unwrap_err();
        assert!(matches!(err, Error::Resize { keep: 2, .. }));
    }

    #[test]
    fn test_slice_parity_resizes() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[2, 4, 6, 8, 10, 12, 14, 15, 13, 11]);
        let offspring: Vec<Genome> = (0..20).map(|i| genome(i % 16)).collect();

        let next = replace(&eval, &current, offspring, 2, Replacement::SliceParity).unwrap();

        // Two survivors plus two offspring: the population shrank from 10 to 4.
        assert_eq!(next.len(), 4);
        assert_eq!(costs(&next), vec![0.0, 0.0, 2.0, 4.0]);
        assert!(next.is_ordered());
    }

    #[test]
    fn test_slice_parity_keep_beyond_size_grows() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[5, 6]);
        let offspring = vec![genome(1), genome(2), genome(3), genome(4)];

        let next = replace(&eval, &current, offspring, 3, Replacement::SliceParity).unwrap();

        assert_eq!(costs(&next), vec![1.0, 2.0, 3.0, 5.0, 6.0]);
    }

    #[test]
    fn test_slice_parity_half_keep_preserves_size() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[2, 4, 6, 8]);
        let offspring = vec![genome(7), genome(1), genome(9), genome(3)];

        let next = replace(&eval, &current, offspring, 2, Replacement::SliceParity).unwrap();

        assert_eq!(costs(&next), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_invalid_offspring_leaves_current_untouched() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[2, 4]);
        let before = current.clone();

        let result = replace(
            &eval,
            &current,
            vec![genome(1), Genome::from_bits(&[1, 0])],
            1,
            Replacement::Elitist,
        );

        assert!(matches!(result, Err(Error::SizeMismatch(_))));
        assert_eq!(current, before);
    }

    #[test]
    fn test_replacement_reranks() {
        let layout = layout();
        let eval = Evaluator::new(&identity, &layout);
        let current = population(&[3, 7]);
        let next = replace(&eval, &current, vec![genome(0), genome(9)], 1, Replacement::Elitist)
            .unwrap();
        let ranks: Vec<usize> = next.iter().map(|i| i.rank).collect();
        assert_eq!(ranks, vec![0, 1]);
        assert_eq!(costs(&next), vec![0.0, 3.0]);
    }
}
