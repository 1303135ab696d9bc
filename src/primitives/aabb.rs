use crate::{bvh::Axis, Hit, Intersect, Ray};
use glam::{vec3, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

/// The empty box, so that folding with `union` starts from nothing.
impl Default for AABB {
    fn default() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    // Create a union AABB of two AABBs that surrounds both of them
    pub fn union(self, other: AABB) -> Self {
        AABB::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn point_union(self, other: Vec3) -> Self {
        AABB::new(self.min.min(other), self.max.max(other))
    }

    /// Grows flat sides to `delta` so a planar primitive still has a volume to hit.
    pub fn padded(self, delta: f32) -> Self {
        let extent = self.max - self.min;
        let pad = |e: f32| if e < delta { 0.5 * delta } else { 0.0 };
        let pad = vec3(pad(extent.x), pad(extent.y), pad(extent.z));

        AABB::new(self.min - pad, self.max + pad)
    }

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    // Returns the axis which has greatest extent
    pub fn max_extent(&self) -> Axis {
        let extent = self.max - self.min;

        if extent.x > extent.y && extent.x > extent.z {
            Axis::X
        } else if extent.y > extent.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn surface_area(&self) -> f32 {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }
}

impl Intersect for AABB {
    fn intersection(&self, _ray: Ray, _t_min: f32, _t_max: f32) -> Option<Hit> {
        None
    }

    // Slab test, taken from tavianator.com
    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        let t1 = (self.min - ray.origin) * ray.inv_direction;
        let t2 = (self.max - ray.origin) * ray.inv_direction;

        // X
        let tmin = f32::min(t1.x, t2.x);
        let tmax = f32::max(t2.x, t1.x);

        // Y
        let tmin = f32::max(tmin, f32::min(t1.y, t2.y));
        let tmax = f32::min(tmax, f32::max(t1.y, t2.y));

        // Z
        let tmin = f32::max(tmin, f32::min(t1.z, t2.z));
        let tmax = f32::min(tmax, f32::max(t1.z, t2.z));

        f32::min(tmax, t_max) >= f32::max(tmin, t_min)
    }

    fn bounds(&self) -> Option<AABB> {
        Some(*self)
    }
}
