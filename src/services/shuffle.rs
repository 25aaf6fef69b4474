use rand::Rng;

/// Returns a uniformly shuffled copy of `items`; the input is left untouched.
///
/// Fisher-Yates over the copy, walking from the last index down to 1 and
/// swapping each slot with a uniformly drawn index in `[0, i]`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}
