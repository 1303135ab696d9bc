//! 2D sample patterns over the unit square, used to pick points on area lights.
//!
//! Every sampler precomputes its points when it is built and is immutable
//! afterwards, so a single instance can be shared by any number of lights and
//! render threads. Callers pick a point by passing its index explicitly.

use crate::DefaultRng;
use glam::{vec2, Vec2};
use itertools::iproduct;
use rand::prelude::*;

/// A fixed set of points in `[0, 1)²`.
pub trait Sampler: std::fmt::Debug + Send + Sync {
    /// How many points a caller has to average over to integrate with this sampler.
    fn num_samples(&self) -> usize;

    /// The point for `index`. Indices wrap around `num_samples`.
    fn sample(&self, index: usize) -> Vec2;
}

/// Shared storage for the precomputed patterns below.
#[derive(Clone, Debug)]
struct SampleSet {
    samples: Vec<Vec2>,
}

impl SampleSet {
    fn new(samples: Vec<Vec2>) -> Self {
        debug_assert!(!samples.is_empty());
        Self { samples }
    }

    fn get(&self, index: usize) -> Vec2 {
        self.samples[index % self.samples.len()]
    }
}

/// Cell centers of a `k × k` grid. Deterministic, aliases on hard shadow edges.
#[derive(Clone, Debug)]
pub struct RegularSampler {
    set: SampleSet,
}

impl RegularSampler {
    /// `per_axis` is the square root of the number of samples, clamped to at least 1.
    pub fn new(per_axis: usize) -> Self {
        let k = per_axis.max(1);
        let inv = 1.0 / k as f32;
        let samples = iproduct!(0..k, 0..k)
            .map(|(j, i)| vec2((i as f32 + 0.5) * inv, (j as f32 + 0.5) * inv))
            .collect();

        Self {
            set: SampleSet::new(samples),
        }
    }
}

impl Sampler for RegularSampler {
    fn num_samples(&self) -> usize {
        self.set.samples.len()
    }

    fn sample(&self, index: usize) -> Vec2 {
        self.set.get(index)
    }
}

/// One jittered point in each cell of a `k × k` grid.
#[derive(Clone, Debug)]
pub struct StratifiedSampler {
    set: SampleSet,
}

impl StratifiedSampler {
    pub fn new(per_axis: usize, seed: u64) -> Self {
        let k = per_axis.max(1);
        let inv = 1.0 / k as f32;
        let mut rng = DefaultRng::seed_from_u64(seed);
        let samples = iproduct!(0..k, 0..k)
            .map(|(j, i)| {
                let u = (i as f32 + rng.gen::<f32>()) * inv;
                let v = (j as f32 + rng.gen::<f32>()) * inv;
                // Rounding can push the last cell onto 1.0
                vec2(u.min(ONE_MINUS_EPS), v.min(ONE_MINUS_EPS))
            })
            .collect();

        Self {
            set: SampleSet::new(samples),
        }
    }
}

impl Sampler for StratifiedSampler {
    fn num_samples(&self) -> usize {
        self.set.samples.len()
    }

    fn sample(&self, index: usize) -> Vec2 {
        self.set.get(index)
    }
}

/// `k²` independent uniform points.
#[derive(Clone, Debug)]
pub struct RandomSampler {
    set: SampleSet,
}

impl RandomSampler {
    pub fn new(per_axis: usize, seed: u64) -> Self {
        let k = per_axis.max(1);
        let mut rng = DefaultRng::seed_from_u64(seed);
        let samples = (0..k * k)
            .map(|_| vec2(rng.gen::<f32>(), rng.gen::<f32>()))
            .collect();

        Self {
            set: SampleSet::new(samples),
        }
    }
}

impl Sampler for RandomSampler {
    fn num_samples(&self) -> usize {
        self.set.samples.len()
    }

    fn sample(&self, index: usize) -> Vec2 {
        self.set.get(index)
    }
}

const ONE_MINUS_EPS: f32 = 1.0 - f32::EPSILON;

#[cfg(test)]
mod tests {
    use super::*;

    fn in_unit_square(p: Vec2) -> bool {
        p.x >= 0.0 && p.x < 1.0 && p.y >= 0.0 && p.y < 1.0
    }

    #[test]
    fn per_axis_count_is_squared() {
        assert_eq!(RegularSampler::new(3).num_samples(), 9);
        assert_eq!(StratifiedSampler::new(4, 1).num_samples(), 16);
        assert_eq!(RandomSampler::new(2, 1).num_samples(), 4);
    }

    #[test]
    fn zero_per_axis_still_yields_one_sample() {
        let sampler = RegularSampler::new(0);
        assert_eq!(sampler.num_samples(), 1);
        let p = sampler.sample(0);
        assert!((p.x - 0.5).abs() < 1e-6);
        assert!((p.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn samples_stay_in_unit_square() {
        let stratified = StratifiedSampler::new(8, 42);
        let random = RandomSampler::new(8, 42);
        for s in 0..64 {
            assert!(in_unit_square(stratified.sample(s)));
            assert!(in_unit_square(random.sample(s)));
        }
    }

    #[test]
    fn stratified_puts_one_point_in_each_cell() {
        let k = 4;
        let sampler = StratifiedSampler::new(k, 3);
        let mut seen = vec![false; k * k];
        for s in 0..sampler.num_samples() {
            let p = sampler.sample(s);
            let cell = (p.y * k as f32) as usize * k + (p.x * k as f32) as usize;
            assert!(!seen[cell]);
            seen[cell] = true;
        }
        assert!(seen.iter().all(|&c| c));
    }

    #[test]
    fn indices_wrap_around() {
        let sampler = RandomSampler::new(2, 9);
        assert_eq!(sampler.sample(1), sampler.sample(5));
    }

    #[test]
    fn same_seed_same_pattern() {
        let a = StratifiedSampler::new(3, 11);
        let b = StratifiedSampler::new(3, 11);
        for s in 0..9 {
            assert_eq!(a.sample(s), b.sample(s));
        }
    }
}
