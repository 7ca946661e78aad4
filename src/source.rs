//! Value generators used to populate and refill the grid.
//!
//! Everything random in the engine goes through [`ValueSource`], so tests and
//! replays can swap the RNG for a fixed script.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Produces cell values and other bounded indices.
pub trait ValueSource {
    /// Returns an index in `0..bound`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Returns a value in `0..alphabet_size`.
    fn next_value(&mut self, alphabet_size: u8) -> u8 {
        // The index is below `alphabet_size`, so it always fits.
        self.next_index(usize::from(alphabet_size)) as u8
    }
}

impl<S: ValueSource + ?Sized> ValueSource for &mut S {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// Uniformly random source backed by any [`Rng`].
#[derive(Clone, Debug)]
pub struct RandomSource<R = SmallRng> {
    rng: R,
}

impl<R: Rng> RandomSource<R> {
    /// Wraps an existing generator.
    pub fn new(rng: R) -> Self {
        RandomSource { rng }
    }
}

impl RandomSource<SmallRng> {
    /// Creates a reproducible source. The same seed always yields the same values.
    pub fn seeded(seed: u64) -> Self {
        RandomSource::new(SmallRng::seed_from_u64(seed))
    }

    /// Creates a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        RandomSource::new(SmallRng::from_entropy())
    }
}

impl<R: Rng> ValueSource for RandomSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Replays a fixed list of numbers, wrapping around at the end.
///
/// Each number is reduced modulo the requested bound, so a script written for
/// one alphabet stays valid for any other.
///
/// # Examples
///
/// ```
/// use tile_cascade::source::{SequenceSource, ValueSource};
/// let mut source = SequenceSource::new(vec![4, 1]);
/// assert_eq!(source.next_value(6), 4);
/// assert_eq!(source.next_value(6), 1);
/// assert_eq!(source.next_value(3), 1); // 4 % 3, wrapped around
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceSource {
    values: Vec<usize>,
    position: usize,
}

impl SequenceSource {
    /// Creates a source cycling through `values`. An empty list always yields 0.
    pub fn new(values: Vec<usize>) -> Self {
        SequenceSource {
            values,
            position: 0,
        }
    }

    /// Number of values handed out so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl ValueSource for SequenceSource {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value % bound
    }
}
