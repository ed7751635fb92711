//! Stratified sample positions over the unit light rectangle.

use penumbra_math::Vec2;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sampling::gen_f32;

/// Cached jittered-grid offsets in [0, 1)^2.
///
/// The grid has `ceil(sqrt(n))` cells per side with one jittered sample per
/// cell; the samples are shuffled and truncated to `n`, so any prefix of the
/// list is still spread over the rectangle. The list is rebuilt only when the
/// requested count changes.
#[derive(Debug, Clone, Default)]
pub struct StratifiedOffsets {
    offsets: Vec<Vec2>,
    regenerations: u32,
}

impl StratifiedOffsets {
    pub fn new(count: usize, rng: &mut dyn RngCore) -> Self {
        let mut cache = Self::default();
        cache.ensure(count, rng);
        cache
    }

    /// Make sure the cache holds exactly `count` offsets.
    ///
    /// Returns `true` if the list was regenerated.
    pub fn ensure(&mut self, count: usize, rng: &mut dyn RngCore) -> bool {
        if count == self.offsets.len() && self.regenerations > 0 {
            return false;
        }

        self.offsets = generate(count, rng);
        self.regenerations += 1;
        log::debug!(
            "Regenerated {} stratified light offsets (regeneration #{})",
            count,
            self.regenerations
        );
        true
    }

    pub fn offsets(&self) -> &[Vec2] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// How many times the list has been (re)built.
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }
}

fn generate(count: usize, rng: &mut dyn RngCore) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let side = (count as f64).sqrt().ceil() as usize;
    let cell = 1.0 / side as f32;

    let mut offsets = Vec::with_capacity(side * side);
    for j in 0..side {
        for i in 0..side {
            let jitter = Vec2::new(gen_f32(rng), gen_f32(rng));
            offsets.push((Vec2::new(i as f32, j as f32) + jitter) * cell);
        }
    }

    offsets.shuffle(rng);
    offsets.truncate(count);
    offsets
}
