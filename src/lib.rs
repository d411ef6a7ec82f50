//! Binary-encoded genetic algorithm for low-dimensional real-valued
//! functions.
//!
//! Each variable is quantized onto a fixed-width unsigned integer grid over
//! its range and the bit strings are concatenated into one genome. The
//! crate provides:
//!
//! - [`encoding`]: quantization, encode/decode and the genome layout
//! - [`ga`]: population generation, two-point crossover, bit-flip
//!   mutation, replacement, and a runner that ties them together
//! - [`driver`]: a command parser, expression compiler and session used by
//!   the `bitga` binary
//! - [`random`]: seeded generators for reproducible runs
//!
//! # Example
//!
//! ```
//! use u_bitga::encoding::{Layout, VariableRange};
//! use u_bitga::ga::{BgaConfig, BgaRunner};
//!
//! let layout = Layout::uniform(
//!     vec![
//!         VariableRange::new(10.0, 20.0).unwrap(),
//!         VariableRange::new(-5.0, 7.0).unwrap(),
//!     ],
//!     4,
//! )
//! .unwrap();
//! let cost = |v: &[f64]| -v[0] * (v[1] / 2.0 - 10.0);
//! let config = BgaConfig::default().with_seed(42).with_max_generations(50);
//!
//! let result = BgaRunner::run(&cost, &layout, &config).unwrap();
//! assert!(result.best.cost <= result.cost_history[0]);
//! ```

pub mod driver;
pub mod encoding;
pub mod error;
pub mod ga;
pub mod random;

pub use error::{Error, Result};
