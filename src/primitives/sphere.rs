use crate::{primitives::AABB, Hit, Intersect, Ray};
use glam::{vec3, Vec3};

#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Both roots of the ray/sphere quadratic, nearest first.
    fn roots(&self, ray: Ray) -> Option<(f32, f32)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - a * c;

        if discriminant > 0.0 && a > 0.0 {
            let sqrt_d = f32::sqrt(discriminant);
            Some(((-b - sqrt_d) / a, (-b + sqrt_d) / a))
        } else {
            None
        }
    }
}

impl Intersect for Sphere {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> Option<Hit> {
        let (t_1, t_2) = self.roots(ray)?;

        for &t in &[t_1, t_2] {
            if t_min < t && t < t_max {
                let point = ray.point_at_parameter(t);

                return Some(Hit {
                    t,
                    point,
                    normal: (point - self.center) / self.radius,
                    shader: None,
                });
            }
        }

        None
    }

    fn has_intersection(&self, ray: Ray, t_min: f32, t_max: f32) -> bool {
        self.roots(ray)
            .map(|(t_1, t_2)| (t_min < t_1 && t_1 < t_max) || (t_min < t_2 && t_2 < t_max))
            .unwrap_or(false)
    }

    fn bounds(&self) -> Option<AABB> {
        Some(AABB::new(
            self.center - vec3(self.radius, self.radius, self.radius),
            self.center + vec3(self.radius, self.radius, self.radius),
        ))
    }
}
