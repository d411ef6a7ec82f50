//! Error taxonomy shared by the encoder, the GA operators and the driver.
//!
//! Every failure is local and synchronous. Operators never retry and never
//! leave a population half-updated: they build new values from borrowed
//! state, so an `Err` always means the caller's state is untouched.

use crate::driver::ExprError;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Missing or invalid setup: no cost function or ranges yet, bad bit
    /// width, empty layout, rates out of bounds.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A value lies outside the range it is being encoded into.
    #[error("value {value} is outside the range [{low}, {high}]")]
    OutOfRange { value: f64, low: f64, high: f64 },

    /// Odd population for pairwise crossover, bad cut points, or a genome
    /// whose length disagrees with the layout.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Elitist replacement asked to keep more individuals than it can
    /// place without changing the population size.
    #[error("keep count {keep} cannot be applied to {size} individuals without resizing the population")]
    Resize { keep: usize, size: usize },

    /// The objective expression failed to compile.
    #[error(transparent)]
    Expression(#[from] ExprError),

    /// A driver directive could not be parsed.
    #[error("invalid command: {0}")]
    Command(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_out_of_range() {
        let err = Error::OutOfRange {
            value: 21.0,
            low: 10.0,
            high: 20.0,
        };
        assert_eq!(err.to_string(), "value 21 is outside the range [10, 20]");
    }

    #[test]
    fn test_display_resize() {
        let err = Error::Resize { keep: 12, size: 10 };
        assert!(err.to_string().contains("keep count 12"));
    }
}
