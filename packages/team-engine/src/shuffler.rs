//! shuffler.rs: Unbiased permutation of a roster slice
//!
//! Fisher-Yates run backwards over a copy: for i = n-1 down to 1, draw
//! j uniformly from [0, i] and swap. With a uniform source every one of the
//! n! orderings is equally likely. The caller's slice is never touched.

use rand::Rng;

/// Return a uniformly random permutation of `items`.
///
/// Randomness comes from the injected `rng`, so callers can pass a seeded
/// `StdRng` for reproducible draws.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}
