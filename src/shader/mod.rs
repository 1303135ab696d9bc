//! Surface shaders. A shader turns a ray/surface intersection into a color.

mod flat;
mod phong;

pub use flat::*;
pub use phong::*;

use crate::{scene::Scene, Hit, Ray};
use glam::Vec3;

/// Computes the color leaving a surface along `ray`.
///
/// The scene is borrowed per call, so a shader can be shared by many
/// instances without keeping the scene alive.
pub trait Shader: std::fmt::Debug + Send + Sync {
    fn shade(&self, scene: &Scene, ray: &Ray, hit: &Hit) -> Vec3;
}

// Reflect vector v around normal n
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
