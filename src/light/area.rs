use super::{Light, LightSample, PointLight};
use crate::sampler::Sampler;
use glam::Vec3;
use std::{fmt, sync::Arc};

/// A parallelogram emitter spanned by two edges from a corner.
///
/// Each sample picks a point on the surface and treats it as a point light.
/// The result is reweighted by the emitter area and by the cosine between the
/// emitter normal and the direction back to the shading point, so averaging
/// `num_samples` of them integrates the light over its surface. Only the side
/// the normal points to emits.
#[derive(Clone)]
pub struct AreaLight {
    base: PointLight,
    origin: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    normal: Vec3,
    area: f32,
    sampler: Arc<dyn Sampler>,
}

impl AreaLight {
    /// The emitting side is the one `edge1 × edge2` points to.
    pub fn new(
        intensity: Vec3,
        origin: Vec3,
        edge1: Vec3,
        edge2: Vec3,
        sampler: Arc<dyn Sampler>,
    ) -> Self {
        let normal = edge1.cross(edge2);
        let area = normal.length();
        // A collapsed light keeps a zero normal and never emits
        let normal = if area > 0.0 && area.is_finite() {
            normal / area
        } else {
            Vec3::zero()
        };

        Self {
            base: PointLight::new(origin, intensity),
            origin,
            edge1,
            edge2,
            normal,
            area,
            sampler,
        }
    }

    /// Builds the light from the corners of the quad, in order around its edge.
    /// `p2` is implied by the other three.
    pub fn from_corners(
        intensity: Vec3,
        p0: Vec3,
        p1: Vec3,
        _p2: Vec3,
        p3: Vec3,
        sampler: Arc<dyn Sampler>,
    ) -> Self {
        Self::new(intensity, p0, p1 - p0, p3 - p0, sampler)
    }

    pub fn without_shadow(mut self) -> Self {
        self.base.casts_shadow = false;
        self
    }

    /// The surface is flat, so the normal is the same everywhere.
    pub fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn intensity(&self) -> Vec3 {
        self.base.intensity
    }
}

impl Light for AreaLight {
    fn illuminate(&self, point: Vec3, sample: usize) -> Option<LightSample> {
        let uv = self.sampler.sample(sample);
        let position = self.origin + uv.x * self.edge1 + uv.y * self.edge2;
        let sample = self.base.at(position).sample_from(point)?;

        let norm_cos = -sample.direction.dot(self.normal) / sample.distance;
        if norm_cos > 0.0 && norm_cos.is_finite() {
            Some(LightSample {
                radiance: self.area * norm_cos * sample.radiance,
                ..sample
            })
        } else {
            None
        }
    }

    fn num_samples(&self) -> usize {
        self.sampler.num_samples()
    }

    fn casts_shadow(&self) -> bool {
        self.base.casts_shadow
    }
}

impl fmt::Debug for AreaLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AreaLight")
            .field("intensity", &self.base.intensity)
            .field("origin", &self.origin)
            .field("edge1", &self.edge1)
            .field("edge2", &self.edge2)
            .field("area", &self.area)
            .field("samples", &self.sampler.num_samples())
            .finish()
    }
}
