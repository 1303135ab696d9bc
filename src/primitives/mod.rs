//! This module is full of primitives that all impl Intersection

mod aabb;
mod instance;
mod quad;
mod sphere;

pub use aabb::*;
pub use instance::*;
pub use quad::*;
pub use sphere::*;

use crate::ray::{Hit, Ray};

/// Computes whether a ray intersects a primitive
pub trait Intersect: Send + Sync {
    /// Computes the closest intersection between the ray and the primitive in `(t_min, t_max)`
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit>;

    /// Computes whether there is any intersection between the ray and the primitive in
    /// `(t_min, t_max)`. Could be cheaper than "intersection".
    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.intersection(ray, t_min, t_max).is_some()
    }

    /// Generate a bounds for the primitive
    fn bounds(&self) -> Option<AABB>;
}
