use crate::shader::Shader;
use glam::{vec3, Vec3};
use std::sync::Arc;

/// The ray data type
#[derive(Clone, Copy, Debug, Default)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let inv_direction = vec3(
            1.0 / direction.x,
            1.0 / direction.y,
            1.0 / direction.z,
        );

        Self {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at_parameter(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// Everything a shader needs to know about where a ray hit a surface.
///
/// `normal` is the geometric normal of the primitive, it is not flipped toward
/// the incoming ray. Shaders decide which side they light.
#[derive(Clone, Debug)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub shader: Option<Arc<dyn Shader>>,
}
