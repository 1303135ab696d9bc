use super::Shader;
use crate::{scene::Scene, Hit, Ray};
use glam::Vec3;

/// Unlit constant color.
#[derive(Clone, Copy, Debug)]
pub struct FlatShader {
    pub color: Vec3,
}

impl FlatShader {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl Shader for FlatShader {
    fn shade(&self, _scene: &Scene, _ray: &Ray, _hit: &Hit) -> Vec3 {
        self.color
    }
}
