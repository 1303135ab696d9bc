use crate::{
    bvh::BVH,
    light::{Light, LightSample},
    primitives::Instance,
    Hit, Intersect, Ray,
};
use glam::Vec3;
use std::sync::Arc;

/// Offset keeping rays from hitting the surface they start on
pub const RAY_EPSILON: f32 = 1e-4;

/// Geometry and lights to be rendered.
pub struct Scene {
    world: BVH<Instance>,
    /// Shading visits lights in this order
    lights: Vec<Arc<dyn Light>>,
    background: Vec3,
}

impl Scene {
    pub fn new(geometry: Vec<Instance>, lights: Vec<Arc<dyn Light>>) -> Self {
        Self {
            world: BVH::new(geometry),
            lights,
            background: Vec3::zero(),
        }
    }

    /// Color returned for rays that escape the scene
    pub fn with_background(mut self, background: Vec3) -> Self {
        self.background = background;
        self
    }

    pub fn lights(&self) -> &[Arc<dyn Light>] {
        &self.lights
    }

    pub fn num_primitives(&self) -> usize {
        self.world.len()
    }

    /// Closest surface along the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        self.world.intersection(*ray, RAY_EPSILON, std::f32::INFINITY)
    }

    /// Whether anything blocks the segment from `point` to the sampled light position.
    pub fn occluded(&self, point: Vec3, sample: &LightSample) -> bool {
        let shadow = Ray::new(point, sample.direction);
        self.world
            .has_intersection(shadow, RAY_EPSILON, sample.distance - RAY_EPSILON)
    }

    /// Color seen along the ray, the background when it hits nothing.
    pub fn radiance(&self, ray: &Ray) -> Vec3 {
        match self.intersect(ray) {
            Some(hit) => match &hit.shader {
                Some(shader) => shader.shade(self, ray, &hit),
                // If we somehow hit something without a shader
                None => Vec3::zero(),
            },
            None => self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        light::PointLight,
        primitives::{Quad, Sphere},
        shader::FlatShader,
    };
    use glam::vec3;

    fn flat(color: Vec3) -> Arc<FlatShader> {
        Arc::new(FlatShader::new(color))
    }

    #[test]
    fn lights_keep_insertion_order() {
        let lights: Vec<Arc<dyn Light>> = vec![
            Arc::new(PointLight::new(vec3(1.0, 0.0, 0.0), Vec3::one())),
            Arc::new(PointLight::new(vec3(2.0, 0.0, 0.0), Vec3::one())),
        ];
        let scene = Scene::new(Vec::new(), lights);

        let xs = scene
            .lights()
            .iter()
            .map(|l| l.illuminate(Vec3::zero(), 0).unwrap().distance)
            .collect::<Vec<_>>();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn escaped_rays_see_the_background() {
        let scene = Scene::new(Vec::new(), Vec::new()).with_background(vec3(0.1, 0.2, 0.3));
        let ray = Ray::new(Vec3::zero(), vec3(0.0, 1.0, 0.0));

        assert_eq!(scene.radiance(&ray), vec3(0.1, 0.2, 0.3));
    }

    #[test]
    fn hit_surfaces_use_their_shader() {
        let sphere = Instance::new(Arc::new(Sphere::new(Vec3::zero(), 1.0)), flat(vec3(1.0, 0.0, 0.0)))
            .translated(vec3(0.0, 0.0, 5.0));
        let scene = Scene::new(vec![sphere], Vec::new());
        let ray = Ray::new(Vec3::zero(), vec3(0.0, 0.0, 1.0));

        assert_eq!(scene.radiance(&ray), vec3(1.0, 0.0, 0.0));
    }

    #[test]
    fn occlusion_only_counts_blockers_before_the_light() {
        let blocker = Instance::new(
            Arc::new(Quad::new(vec3(-1.0, -1.0, 2.0), vec3(2.0, 0.0, 0.0), vec3(0.0, 2.0, 0.0))),
            flat(Vec3::one()),
        );
        let scene = Scene::new(vec![blocker], Vec::new());
        let up = |distance| LightSample {
            direction: vec3(0.0, 0.0, 1.0),
            distance,
            radiance: Vec3::one(),
        };

        assert!(scene.occluded(Vec3::zero(), &up(3.0)));
        assert!(!scene.occluded(Vec3::zero(), &up(1.5)));
        // Blocker sits behind the shading point
        assert!(!scene.occluded(vec3(0.0, 0.0, 2.5), &up(3.0)));
    }
}
