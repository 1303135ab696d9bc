use super::{Light, LightSample, MIN_LIGHT_DISTANCE};
use glam::Vec3;

/// An omnidirectional point light with inverse-square falloff.
#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Vec3,
    pub casts_shadow: bool,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Vec3) -> Self {
        Self {
            position,
            intensity,
            casts_shadow: true,
        }
    }

    pub fn without_shadow(mut self) -> Self {
        self.casts_shadow = false;
        self
    }

    /// The same light moved to `position`.
    pub fn at(&self, position: Vec3) -> Self {
        Self { position, ..*self }
    }

    /// Direction, distance and attenuated intensity toward this light from `point`.
    pub fn sample_from(&self, point: Vec3) -> Option<LightSample> {
        let to_light = self.position - point;
        let distance = to_light.length();

        if !distance.is_finite() || distance <= MIN_LIGHT_DISTANCE {
            return None;
        }

        Some(LightSample {
            direction: to_light / distance,
            distance,
            radiance: self.intensity / (distance * distance),
        })
    }
}

impl Light for PointLight {
    fn illuminate(&self, point: Vec3, _sample: usize) -> Option<LightSample> {
        self.sample_from(point)
    }

    fn num_samples(&self) -> usize {
        1
    }

    fn casts_shadow(&self) -> bool {
        self.casts_shadow
    }
}
