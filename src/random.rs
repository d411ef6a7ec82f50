//! Seeded random number generation.
//!
//! Every randomized operator takes `&mut R where R: Rng`; this module only
//! decides which concrete generator the runner and the session hand out.
//! ChaCha8 is portable and stable across platforms and releases, so a
//! seed reproduces the same sequence of populations everywhere.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The generator used by [`BgaRunner`](crate::ga::BgaRunner) and
/// [`Session`](crate::driver::Session).
pub type GaRng = ChaCha8Rng;

/// Creates a generator from a fixed seed.
pub fn create_rng(seed: u64) -> GaRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> GaRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
