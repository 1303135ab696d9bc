use crate::{camera::Camera, config::ImageConfig, scene::Scene, DefaultRng};
use glam::Vec3;
use log::info;
use rand::prelude::*;
use rayon::prelude::*;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

pub const COLOR_CHANNELS: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Camera rays per pixel
    pub samples: usize,
    pub gamma: f32,
    pub seed: u64,
}

impl From<&ImageConfig> for RenderSettings {
    fn from(image: &ImageConfig) -> Self {
        Self {
            width: image.width,
            height: image.height,
            samples: image.samples,
            gamma: image.gamma,
            seed: image.seed,
        }
    }
}

/// Renders the scene into a top-row-first RGB8 buffer. Rows are rendered in parallel.
pub fn render(settings: &RenderSettings, camera: &Camera, scene: &Scene) -> Vec<u8> {
    let width = settings.width as usize;
    let height = settings.height as usize;
    let samples = settings.samples.max(1);

    let mut buffer = vec![0u8; width * height * COLOR_CHANNELS];
    let ray_count = AtomicU64::new(0);
    let start = Instant::now();

    info!(
        "Rendering {}x{} with {} samples per pixel",
        width, height, samples
    );

    buffer
        .par_chunks_mut(width * COLOR_CHANNELS)
        .rev()
        .enumerate()
        .for_each(|(y, row)| {
            // Seeded per row so renders are reproducible whatever the thread count
            let mut rng = DefaultRng::seed_from_u64(settings.seed.wrapping_add(y as u64));
            row.chunks_mut(COLOR_CHANNELS)
                .enumerate()
                .for_each(|(x, pixel)| {
                    let mut out = Vec3::zero();

                    // Antialiasing via multisampling
                    for _ in 0..samples {
                        let u = (rng.gen::<f32>() + x as f32) / width as f32;
                        let v = (rng.gen::<f32>() + y as f32) / height as f32;

                        let ray = camera.ray(u, v, &mut rng);
                        out += scene.radiance(&ray);
                    }

                    out /= samples as f32;
                    pixel.copy_from_slice(&to_rgb8(out, settings.gamma));
                });

            ray_count.fetch_add((width * samples) as u64, Ordering::Relaxed);
        });

    let duration = start.elapsed();
    let rays = ray_count.load(Ordering::Relaxed) as f64 / 1_000_000.0;
    info!(
        "Time elapsed: {:.2?}, camera rays: {:.2}M, rays per second: {:.2}M",
        duration,
        rays,
        rays / duration.as_secs_f64().max(std::f64::EPSILON)
    );

    buffer
}

/// Gamma corrects a linear color and converts it from [0, 1] to [0, 255].
pub fn to_rgb8(color: Vec3, gamma: f32) -> [u8; 3] {
    let channel = |c: f32| (255.99 * c.max(0.0).min(1.0).powf(1.0 / gamma)) as u8;

    [channel(color.x), channel(color.y), channel(color.z)]
}
