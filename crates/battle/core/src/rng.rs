//! Deterministic random number generation for battle resolution.
//!
//! Every random decision in a battle (crit rolls, damage variance, shuffles)
//! flows through a single [`BattleRng`] seeded from the encounter seed. The
//! generator state is one 32-bit integer, which is the entire contract the
//! save layer needs to resume a battle mid-sequence.
//!
//! # Determinism
//!
//! All derived operations in [`RandomSource`] are default methods written
//! purely in terms of [`RandomSource::next_f64`], so any implementation
//! inherits bit-identical sequences for identical seeds.

/// Source of uniformly distributed floats in `[0, 1)` plus derived helpers.
pub trait RandomSource {
    /// Returns the next float in `[0, 1)` and advances the state.
    fn next_f64(&mut self) -> f64;

    /// Integer in `[min, max]` inclusive. Swapped bounds are normalised.
    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        // i128 keeps a full i64 span from overflowing
        let (lo, hi) = (i128::from(lo), i128::from(hi));
        let span = (hi - lo + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i128;
        (lo + offset).min(hi) as i64
    }

    /// Float in `[min, max)`.
    fn float_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Bernoulli trial succeeding with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// In-place Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next_f64() * (i + 1) as f64).floor() as usize;
            slice.swap(i, j.min(i));
        }
    }

    /// Uniformly picks one element, `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        items.get(index.min(items.len() - 1))
    }

    /// Samples `n` distinct elements without replacement.
    ///
    /// `n` larger than the slice returns a shuffled copy of everything.
    fn pick_n<T: Clone>(&mut self, items: &[T], n: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        self.shuffle(&mut pool);
        pool.truncate(n);
        pool
    }

    /// Cumulative-weight selection.
    ///
    /// Negative weights count as zero. When float rounding leaves the roll
    /// past the last cumulative bound, the last item is returned.
    fn weighted_pick<'a, T>(
        &mut self,
        items: &'a [T],
        weight: impl Fn(&T) -> f64,
    ) -> Option<&'a T> {
        let last = items.last()?;
        let total: f64 = items.iter().map(|item| weight(item).max(0.0)).sum();
        let roll = self.next_f64() * total;

        let mut cumulative = 0.0;
        for item in items {
            cumulative += weight(item).max(0.0);
            if roll < cumulative {
                return Some(item);
            }
        }
        Some(last)
    }
}

/// Mulberry32 generator.
///
/// Not cryptographic. The mix constants and wrapping arithmetic are fixed:
/// changing them breaks resume of persisted battles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRng {
    state: u32,
}

impl BattleRng {
    /// Golden-ratio increment added to the state on every step.
    const INCREMENT: u32 = 0x6D2B_79F5;

    /// 2^32, maps a `u32` output into `[0, 1)`.
    const SCALE: f64 = 4_294_967_296.0;

    /// Creates a generator from a battle seed.
    pub fn new(seed: i32) -> Self {
        Self { state: seed as u32 }
    }

    /// Resumes a generator from a persisted [`BattleRng::state`].
    pub fn from_state(state: i32) -> Self {
        Self::new(state)
    }

    /// Current internal state, suitable for persistence.
    pub fn state(&self) -> i32 {
        self.state as i32
    }

    /// Advances the state and returns the raw 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl RandomSource for BattleRng {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / Self::SCALE
    }
}
