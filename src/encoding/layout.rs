//! Genome layout: ordered per-variable segments.

use super::codec::{decode, encode, quantization_step, MAX_BITS};
use crate::error::{Error, Result};
use crate::ga::Genome;

/// Closed interval `[low, high]` a variable is searched in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableRange {
    low: f64,
    high: f64,
}

impl VariableRange {
    /// Creates a range. Both bounds must be finite with `low < high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(Error::Configuration(format!(
                "invalid range [{low}, {high}]: bounds must be finite with low < high"
            )));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    /// Smallest integer and largest integer inside the range, if any.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        let lo = self.low.ceil();
        let hi = self.high.floor();
        (lo <= hi).then_some((lo as i64, hi as i64))
    }
}

impl std::fmt::Display for VariableRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// One encoded variable: its range and segment width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    pub range: VariableRange,
    pub bits: u32,
}

impl Variable {
    pub fn new(range: VariableRange, bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_BITS {
            return Err(Error::Configuration(format!(
                "bit width must be in 1..={MAX_BITS}, got {bits}"
            )));
        }
        Ok(Self { range, bits })
    }

    /// Quantization step of this variable.
    pub fn step(&self) -> f64 {
        // Both invariants were checked on construction.
        quantization_step(self.range.low, self.range.high, self.bits).unwrap_or(f64::NAN)
    }
}

/// Maps a phenotype (one value per variable) to a genome and back.
///
/// Variable `k` occupies bits `[offset_k, offset_k + bits_k)` where the
/// offsets are the running sum of the preceding widths. With two variables
/// of width `m` this gives the classic `[0, m)` / `[m, 2m)` split.
///
/// ```
/// use u_bitga::encoding::{Layout, VariableRange};
///
/// let layout = Layout::uniform(
///     vec![
///         VariableRange::new(10.0, 20.0).unwrap(),
///         VariableRange::new(-5.0, 7.0).unwrap(),
///     ],
///     4,
/// )
/// .unwrap();
/// assert_eq!(layout.genome_len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    variables: Vec<Variable>,
}

impl Layout {
    /// Creates a layout from explicit per-variable widths.
    pub fn new(variables: Vec<Variable>) -> Result<Self> {
        if variables.is_empty() {
            return Err(Error::Configuration(
                "layout needs at least one variable".into(),
            ));
        }
        Ok(Self { variables })
    }

    /// Creates a layout where every variable uses the same width.
    pub fn uniform(ranges: Vec<VariableRange>, bits: u32) -> Result<Self> {
        let variables = ranges
            .into_iter()
            .map(|range| Variable::new(range, bits))
            .collect::<Result<Vec<_>>>()?;
        Self::new(variables)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of variables (phenotype arity).
    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    /// Total genome length `L`.
    pub fn genome_len(&self) -> usize {
        self.variables.iter().map(|v| v.bits as usize).sum()
    }

    /// Bit span of each variable, in order.
    pub fn segments(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        self.variables.iter().scan(0usize, |offset, v| {
            let start = *offset;
            *offset += v.bits as usize;
            Some(start..*offset)
        })
    }

    /// Encodes one value per variable and concatenates the segments.
    pub fn encode(&self, values: &[f64]) -> Result<Genome> {
        if values.len() != self.arity() {
            return Err(Error::SizeMismatch(format!(
                "layout has {} variables, got {} values",
                self.arity(),
                values.len()
            )));
        }
        let mut genome = Vec::with_capacity(self.genome_len());
        for (value, var) in values.iter().zip(&self.variables) {
            genome.extend(encode(*value, var.range.low, var.range.high, var.bits)?);
        }
        Ok(Genome::new(genome))
    }

    /// Splits a genome into its segments and decodes each one.
    pub fn decode(&self, genome: &Genome) -> Result<Vec<f64>> {
        if genome.len() != self.genome_len() {
            return Err(Error::SizeMismatch(format!(
                "layout expects {} bits, genome has {}",
                self.genome_len(),
                genome.len()
            )));
        }
        self.segments()
            .zip(&self.variables)
            .map(|(span, var)| {
                decode(&genome.bits()[span], var.range.low, var.range.high, var.bits)
            })
            .collect()
    }
}
