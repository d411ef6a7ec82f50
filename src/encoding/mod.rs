//! Real-value ↔ bit-string encoding.
//!
//! - [`encode`] / [`decode`]: one variable, one segment
//! - [`Layout`]: a genome as the concatenation of per-variable segments
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 3 (binary parameter coding)
//! - Haupt & Haupt (2004), *Practical Genetic Algorithms*, ch. 2

mod codec;
mod layout;

pub use codec::{decode, encode, quantization_step, MAX_BITS};
pub use layout::{Layout, Variable, VariableRange};
