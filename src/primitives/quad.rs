use crate::{primitives::AABB, Hit, Intersect, Ray};
use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1e-8;

/// A parallelogram `corner + a·u + b·v` with `a, b ∈ [0, 1]`.
/// Its normal is `u × v` normalized.
#[derive(Clone, Debug)]
pub struct Quad {
    corner: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
    // n / (n·n), maps a point in the plane back to (a, b)
    w: Vec3,
}

impl Quad {
    pub fn new(corner: Vec3, u: Vec3, v: Vec3) -> Self {
        let n = u.cross(v);
        let nn = n.dot(n);
        let (normal, w) = if nn > 0.0 {
            (n / nn.sqrt(), n / nn)
        } else {
            (Vec3::zero(), Vec3::zero())
        };

        Self {
            corner,
            u,
            v,
            normal,
            w,
        }
    }
}

impl Intersect for Quad {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = self.normal.dot(self.corner - ray.origin) / denom;
        if !(t_min < t && t < t_max) {
            return None;
        }

        let point = ray.point_at_parameter(t);
        let planar = point - self.corner;
        let a = self.w.dot(planar.cross(self.v));
        let b = self.w.dot(self.u.cross(planar));
        if !(0.0..=1.0).contains(&a) || !(0.0..=1.0).contains(&b) {
            return None;
        }

        Some(Hit {
            t,
            point,
            normal: self.normal,
            shader: None,
        })
    }

    fn bounds(&self) -> Option<AABB> {
        let b = AABB::default()
            .point_union(self.corner)
            .point_union(self.corner + self.u)
            .point_union(self.corner + self.v)
            .point_union(self.corner + self.u + self.v);

        Some(b.padded(1e-4))
    }
}
