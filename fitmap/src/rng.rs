use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The random number generator used by searches
/// built from the command line.
pub type SearchRng = StdRng;

/// Returns a generator seeded with `seed`, for
/// reproducible searches, or from system entropy
/// if no seed is given.
///
/// # Examples
/// ```
/// use fitmap::rng;
/// use rand::Rng;
///
/// let a: u64 = rng::seeded(Some(7)).gen();
/// let b: u64 = rng::seeded(Some(7)).gen();
/// assert_eq!(a, b);
/// ```
pub fn seeded(seed: Option<u64>) -> SearchRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Bernoulli trial with probability `p`.
pub fn chance<R: Rng>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}
