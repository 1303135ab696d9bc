use crate::{primitives::AABB, shader::Shader, Hit, Intersect, Ray};
use glam::Vec3;
use std::sync::Arc;

/// A primitive placed in the scene with the shader that colors it.
/// Primitives can be shared between instances, only translation is supported.
#[derive(Clone)]
pub struct Instance {
    primitive: Arc<dyn Intersect>,
    shader: Arc<dyn Shader>,
    translation: Vec3,
}

impl Instance {
    pub fn new(primitive: Arc<dyn Intersect>, shader: Arc<dyn Shader>) -> Self {
        Self {
            primitive,
            shader,
            translation: Vec3::zero(),
        }
    }

    pub fn translated(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    fn local_ray(&self, ray: Ray) -> Ray {
        Ray::new(ray.origin - self.translation, ray.direction)
    }
}

impl Intersect for Instance {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        self.primitive
            .intersection(self.local_ray(ray), t_min, t_max)
            .map(|mut hit| {
                hit.shader = Some(self.shader.clone());
                hit.point += self.translation;
                hit
            })
    }

    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.primitive
            .has_intersection(self.local_ray(ray), t_min, t_max)
    }

    fn bounds(&self) -> Option<AABB> {
        self.primitive.bounds().map(|mut b| {
            b.min += self.translation;
            b.max += self.translation;

            b
        })
    }
}
