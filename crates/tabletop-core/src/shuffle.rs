//! Fisher-Yates shuffle over an injected random source.

use rand::Rng;

/// Shuffle `items` in place into a uniformly random permutation.
///
/// Walks `i` from the last index down to 1, swapping position `i` with a
/// position drawn uniformly from `0..=i`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
