use super::{reflect, FlatShader, Shader};
use crate::{scene::Scene, Hit, Ray};
use glam::Vec3;

/// Classic (unnormalized) Phong shading under every light in the scene.
///
/// Each light is integrated by averaging over all of its samples, and every
/// sample facing the surface is shadow tested. An occluded sample loses its
/// diffuse and its specular term together. The result is clamped to at most 1
/// per channel.
#[derive(Clone, Copy, Debug)]
pub struct PhongShader {
    flat: FlatShader,
    /// ambient coefficient
    pub ka: f32,
    /// diffuse reflection coefficient
    pub kd: f32,
    /// specular reflection coefficient
    pub ks: f32,
    /// shininess exponent
    pub ke: f32,
}

impl PhongShader {
    pub fn new(color: Vec3, ka: f32, kd: f32, ks: f32, ke: f32) -> Self {
        Self {
            flat: FlatShader::new(color),
            ka,
            kd,
            ks,
            ke,
        }
    }
}

impl Shader for PhongShader {
    fn shade(&self, scene: &Scene, ray: &Ray, hit: &Hit) -> Vec3 {
        // Light the side the ray came from
        let mut normal = hit.normal;
        if normal.dot(ray.direction) > 0.0 {
            normal = -normal;
        }

        let reflected = reflect(ray.direction, normal).normalize();

        // Ambient light is white
        let color = self.flat.shade(scene, ray, hit);
        let mut result = self.ka * color;

        let point = ray.point_at_parameter(hit.t);
        let diffuse_color = self.kd * color;
        // White highlight
        let specular_color = self.ks * Vec3::one();

        for light in scene.lights() {
            let num_samples = light.num_samples();
            if num_samples == 0 {
                continue;
            }

            let mut sample_light = Vec3::zero();
            for s in 0..num_samples {
                let sample = match light.illuminate(point, s) {
                    Some(sample) => sample,
                    None => continue,
                };

                // diffuse term
                let cos_light_normal = sample.direction.dot(normal);
                if cos_light_normal > 0.0 {
                    if light.casts_shadow() && scene.occluded(point, &sample) {
                        continue;
                    }

                    sample_light += diffuse_color * cos_light_normal * sample.radiance;
                }

                // specular term
                let cos_light_reflect = sample.direction.dot(reflected);
                if cos_light_reflect > 0.0 {
                    sample_light +=
                        specular_color * cos_light_reflect.powf(self.ke) * sample.radiance;
                }
            }

            result += sample_light / num_samples as f32;
        }

        result.min(Vec3::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        light::{AreaLight, Light, LightSample, PointLight},
        primitives::{Instance, Quad},
        sampler::{Sampler, StratifiedSampler},
    };
    use glam::{vec2, vec3, Vec2};
    use std::sync::Arc;

    /// Returns the same point for every index.
    #[derive(Debug)]
    struct FixedSampler {
        point: Vec2,
        count: usize,
    }

    impl Sampler for FixedSampler {
        fn num_samples(&self) -> usize {
            self.count
        }

        fn sample(&self, _index: usize) -> Vec2 {
            self.point
        }
    }

    #[derive(Debug)]
    struct Unsampled;

    impl Light for Unsampled {
        fn illuminate(&self, _point: Vec3, _sample: usize) -> Option<LightSample> {
            Some(LightSample {
                direction: vec3(0.0, 0.0, 1.0),
                distance: 1.0,
                radiance: Vec3::one(),
            })
        }

        fn num_samples(&self) -> usize {
            0
        }
    }

    fn close(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    /// A ray coming straight down onto the origin, with the hit it produced.
    fn straight_down() -> (Ray, Hit) {
        let ray = Ray::new(vec3(0.0, 0.0, 1.0), vec3(0.0, 0.0, -1.0));
        let hit = Hit {
            t: 1.0,
            point: Vec3::zero(),
            normal: vec3(0.0, 0.0, 1.0),
            shader: None,
        };
        (ray, hit)
    }

    /// Downward facing square light of side `2h` centered at height `d`.
    fn ceiling_light(h: f32, d: f32, intensity: Vec3, sampler: Arc<dyn Sampler>) -> Arc<dyn Light> {
        Arc::new(AreaLight::new(
            intensity,
            vec3(-h, -h, d),
            vec3(0.0, 2.0 * h, 0.0),
            vec3(2.0 * h, 0.0, 0.0),
            sampler,
        ))
    }

    fn center(count: usize) -> Arc<dyn Sampler> {
        Arc::new(FixedSampler {
            point: vec2(0.5, 0.5),
            count,
        })
    }

    #[test]
    fn no_lights_gives_ambient() {
        let color = vec3(0.2, 0.4, 0.6);
        let shader = PhongShader::new(color, 0.5, 0.7, 0.3, 10.0);
        let scene = Scene::new(Vec::new(), Vec::new());
        let (ray, hit) = straight_down();

        assert_eq!(shader.shade(&scene, &ray, &hit), 0.5 * color);
    }

    #[test]
    fn result_is_clamped_to_one() {
        let shader = PhongShader::new(vec3(0.9, 0.5, 0.1), 2.0, 2.0, 2.0, 1.0);
        let light = ceiling_light(1.0, 0.5, Vec3::splat(100.0), Arc::new(StratifiedSampler::new(3, 1)));
        let scene = Scene::new(Vec::new(), vec![light]);
        let (ray, hit) = straight_down();

        let c = shader.shade(&scene, &ray, &hit);
        assert!(c.x <= 1.0 && c.y <= 1.0 && c.z <= 1.0);
        assert_eq!(c, Vec3::one());
    }

    #[test]
    fn fully_occluded_light_gives_ambient() {
        let color = vec3(0.3, 0.6, 0.9);
        let shader = PhongShader::new(color, 0.2, 0.8, 1.0, 4.0);
        let blocker = Instance::new(
            Arc::new(Quad::new(vec3(-5.0, -5.0, 1.0), vec3(10.0, 0.0, 0.0), vec3(0.0, 10.0, 0.0))),
            Arc::new(shader),
        );
        let light = ceiling_light(1.0, 2.0, Vec3::splat(5.0), Arc::new(StratifiedSampler::new(4, 7)));
        let scene = Scene::new(vec![blocker], vec![light]);

        // Start below the blocker so only the shadow rays cross it
        let ray = Ray::new(vec3(0.0, 0.0, 0.5), vec3(0.0, 0.0, -1.0));
        let hit = Hit {
            t: 0.5,
            point: Vec3::zero(),
            normal: vec3(0.0, 0.0, 1.0),
            shader: None,
        };

        assert_eq!(shader.shade(&scene, &ray, &hit), 0.2 * color);
    }

    #[test]
    fn lights_without_shadows_ignore_blockers() {
        let shader = PhongShader::new(Vec3::one(), 0.0, 0.5, 0.0, 1.0);
        let blocker = Instance::new(
            Arc::new(Quad::new(vec3(-5.0, -5.0, 1.0), vec3(10.0, 0.0, 0.0), vec3(0.0, 10.0, 0.0))),
            Arc::new(shader),
        );
        let light: Arc<dyn Light> =
            Arc::new(PointLight::new(vec3(0.0, 0.0, 2.0), Vec3::one()).without_shadow());
        let scene = Scene::new(vec![blocker], vec![light]);
        let (ray, hit) = straight_down();

        // kd * cos * I / d² = 0.5 * 1 * 1/4
        assert!(close(shader.shade(&scene, &ray, &hit), Vec3::splat(0.125), 1e-6));
    }

    #[test]
    fn diffuse_follows_the_area_law() {
        let shader = PhongShader::new(Vec3::one(), 0.0, 0.5, 0.0, 1.0);
        let (ray, hit) = straight_down();

        let shade = |h: f32| {
            let scene = Scene::new(Vec::new(), vec![ceiling_light(h, 2.0, Vec3::one(), center(1))]);
            shader.shade(&scene, &ray, &hit)
        };

        // area / d³ * kd, with area = (2h)²
        let small = shade(0.01);
        let expected = 0.5 * 4.0e-4 / 8.0;
        assert!((small.x - expected).abs() < 1e-9);

        let large = shade(0.02);
        assert!((large.x / small.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn averaging_does_not_depend_on_sample_count() {
        let shader = PhongShader::new(vec3(0.8, 0.6, 0.4), 0.1, 0.6, 0.3, 8.0);
        let ray = Ray::new(vec3(1.0, 0.0, 1.0), vec3(-1.0, 0.0, -1.0).normalize());
        let hit = Hit {
            t: 2.0f32.sqrt(),
            point: Vec3::zero(),
            normal: vec3(0.0, 0.0, 1.0),
            shader: None,
        };

        let shade = |count: usize| {
            let sampler = Arc::new(FixedSampler {
                point: vec2(0.3, 0.8),
                count,
            });
            let scene = Scene::new(Vec::new(), vec![ceiling_light(0.5, 1.5, Vec3::splat(2.0), sampler)]);
            shader.shade(&scene, &ray, &hit)
        };

        let one = shade(1);
        assert!(one.x > 0.1 && one.x < 1.0);
        assert!(close(one, shade(2), 1e-6));
        assert!(close(one, shade(16), 1e-6));
    }

    #[test]
    fn back_facing_normal_is_flipped() {
        let shader = PhongShader::new(vec3(0.5, 0.7, 0.2), 0.1, 0.6, 0.4, 5.0);
        let light = ceiling_light(0.5, 2.0, Vec3::splat(3.0), Arc::new(StratifiedSampler::new(3, 5)));
        let scene = Scene::new(Vec::new(), vec![light]);
        let ray = Ray::new(vec3(1.0, 0.0, 1.0), vec3(-1.0, 0.0, -1.0).normalize());

        let hit = |normal| Hit {
            t: 2.0f32.sqrt(),
            point: Vec3::zero(),
            normal,
            shader: None,
        };

        let front = shader.shade(&scene, &ray, &hit(vec3(0.0, 0.0, 1.0)));
        let back = shader.shade(&scene, &ray, &hit(vec3(0.0, 0.0, -1.0)));

        assert!(front.x > 0.1);
        assert!(close(front, back, 1e-6));
    }

    #[test]
    fn light_below_the_surface_contributes_nothing() {
        let color = vec3(0.4, 0.4, 0.4);
        let shader = PhongShader::new(color, 0.25, 1.0, 1.0, 2.0);
        let light: Arc<dyn Light> = Arc::new(PointLight::new(vec3(0.0, 0.0, -2.0), Vec3::splat(10.0)));
        let scene = Scene::new(Vec::new(), vec![light]);
        let (ray, hit) = straight_down();

        assert_eq!(shader.shade(&scene, &ray, &hit), 0.25 * color);
    }

    #[test]
    fn specular_highlight_is_white() {
        // Only the highlight: ks * cos^ke * I / d² = 1 * 1 * 0.5 / 1
        let shader = PhongShader::new(vec3(1.0, 0.0, 0.0), 0.0, 0.0, 1.0, 3.0);
        let light: Arc<dyn Light> = Arc::new(PointLight::new(vec3(0.0, 0.0, 1.0), Vec3::splat(0.5)));
        let scene = Scene::new(Vec::new(), vec![light]);
        let (ray, hit) = straight_down();

        assert!(close(shader.shade(&scene, &ray, &hit), Vec3::splat(0.5), 1e-6));
    }

    #[test]
    fn lights_without_samples_are_skipped() {
        let color = vec3(0.5, 0.5, 0.5);
        let shader = PhongShader::new(color, 0.5, 1.0, 1.0, 1.0);
        let scene = Scene::new(Vec::new(), vec![Arc::new(Unsampled) as Arc<dyn Light>]);
        let (ray, hit) = straight_down();

        assert_eq!(shader.shade(&scene, &ray, &hit), 0.5 * color);
    }

    #[test]
    fn lights_add_up_in_order() {
        let shader = PhongShader::new(Vec3::one(), 0.0, 0.5, 0.0, 1.0);
        let (ray, hit) = straight_down();
        let light = |z: f32| -> Arc<dyn Light> { Arc::new(PointLight::new(vec3(0.0, 0.0, z), Vec3::one())) };

        let a = shader.shade(&Scene::new(Vec::new(), vec![light(2.0)]), &ray, &hit);
        let b = shader.shade(&Scene::new(Vec::new(), vec![light(4.0)]), &ray, &hit);
        let both = shader.shade(&Scene::new(Vec::new(), vec![light(2.0), light(4.0)]), &ray, &hit);

        assert!(close(both, a + b, 1e-6));
    }
}
