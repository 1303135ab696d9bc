//! Light sources. Every kind answers the same two questions for a shading
//! point: what does one sample of this light deliver, and how many samples
//! does it take to integrate it.

mod area;
mod point;

pub use area::*;
pub use point::*;

use glam::Vec3;

/// Distances at or below this are treated as "the point is on the light".
pub const MIN_LIGHT_DISTANCE: f32 = 1e-6;

/// What one light sample delivers to a shading point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Unit vector from the shading point toward the sampled point on the light
    pub direction: Vec3,
    /// Distance from the shading point to the sampled point
    pub distance: f32,
    /// Radiance arriving at the shading point, already attenuated
    pub radiance: Vec3,
}

pub trait Light: std::fmt::Debug + Send + Sync {
    /// Evaluates sample number `sample` of this light as seen from `point`.
    /// Returns `None` when the sample contributes nothing.
    fn illuminate(&self, point: Vec3, sample: usize) -> Option<LightSample>;

    /// Number of samples a caller must draw and average to integrate this light.
    fn num_samples(&self) -> usize;

    /// Lights that do not cast shadows skip the occlusion test.
    fn casts_shadow(&self) -> bool {
        true
    }
}
