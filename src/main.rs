use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::{vec3, Vec3};
use log::{debug, info, LevelFilter};
use softlight::{
    camera::Camera,
    config::{Config, SamplerKind},
    light::{AreaLight, Light, PointLight},
    logger::init_logger,
    primitives::{Instance, Quad, Sphere},
    render::{render, RenderSettings},
    sampler::{RandomSampler, RegularSampler, Sampler, StratifiedSampler},
    scene::Scene,
    shader::{FlatShader, PhongShader, Shader},
};
use std::{path::PathBuf, sync::Arc};

/// Log levels that can be picked on the command line
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "softlight")]
#[command(about = "Renders a Phong shaded scene lit by a soft area light")]
struct Args {
    /// TOML render settings, defaults are used when left out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// Output PNG, overrides the config file
    #[arg(short, long)]
    output: Option<String>,
}

fn build_sampler(config: &Config) -> Arc<dyn Sampler> {
    let light = &config.area_light;
    // Offset so the light pattern doesn't follow the pixel jitter
    let seed = config.image.seed ^ 0x5eed;

    match light.sampler {
        SamplerKind::Regular => Arc::new(RegularSampler::new(light.samples_per_axis)),
        SamplerKind::Stratified => Arc::new(StratifiedSampler::new(light.samples_per_axis, seed)),
        SamplerKind::Random => Arc::new(RandomSampler::new(light.samples_per_axis, seed)),
    }
}

fn build_lights(config: &Config) -> Vec<Arc<dyn Light>> {
    let area = &config.area_light;
    let [p0, p1, p2, p3] = area.corners;
    let mut area_light = AreaLight::from_corners(
        Vec3::from(area.intensity),
        Vec3::from(p0),
        Vec3::from(p1),
        Vec3::from(p2),
        Vec3::from(p3),
        build_sampler(config),
    );
    if !area.casts_shadow {
        area_light = area_light.without_shadow();
    }
    debug!("{:?}", area_light);

    let mut lights: Vec<Arc<dyn Light>> = vec![Arc::new(area_light)];
    lights.extend(config.point_lights.iter().map(|light| {
        Arc::new(PointLight::new(
            Vec3::from(light.position),
            Vec3::from(light.intensity),
        )) as Arc<dyn Light>
    }));

    lights
}

// A floor with a few spheres under the light
fn build_scene(config: &Config) -> Scene {
    let phong = config.phong;
    let material = |color: Vec3| -> Arc<dyn Shader> {
        Arc::new(PhongShader::new(color, phong.ka, phong.kd, phong.ks, phong.ke))
    };

    let mut instances = Vec::new();

    let floor = Arc::new(Quad::new(
        vec3(-6.0, 0.0, 6.0),
        vec3(12.0, 0.0, 0.0),
        vec3(0.0, 0.0, -12.0),
    ));
    instances.push(Instance::new(floor, material(vec3(0.8, 0.8, 0.8))));

    let unit_sphere = Arc::new(Sphere::new(Vec3::zero(), 1.0));
    instances.push(Instance::new(unit_sphere.clone(), material(vec3(0.9, 0.3, 0.2))).translated(vec3(0.0, 1.0, 0.0)));
    instances.push(Instance::new(unit_sphere, material(vec3(0.2, 0.5, 0.9))).translated(vec3(-2.5, 1.0, -1.0)));

    let small = Arc::new(Sphere::new(Vec3::zero(), 0.5));
    instances.push(Instance::new(small.clone(), material(vec3(0.3, 0.8, 0.3))).translated(vec3(2.2, 0.5, 1.0)));
    // An unlit marker, to show where the flat shader ends up
    instances.push(
        Instance::new(small, Arc::new(FlatShader::new(vec3(1.0, 0.9, 0.6)))).translated(vec3(2.5, 0.5, -2.0)),
    );

    Scene::new(instances, build_lights(config)).with_background(config.background())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    if let Some(output) = args.output {
        config.image.output = output;
    }

    let settings = RenderSettings::from(&config.image);
    let camera = Camera::new(
        Vec3::from(config.camera.eye),
        Vec3::from(config.camera.target),
        Vec3::from(config.camera.up),
        config.camera.fov,
        settings.width as f32 / settings.height as f32,
        config.camera.aperture,
    );
    let scene = build_scene(&config);
    debug!(
        "Scene has {} primitives and {} lights",
        scene.num_primitives(),
        scene.lights().len()
    );

    let buffer = render(&settings, &camera, &scene);

    image::save_buffer(
        &config.image.output,
        &buffer,
        settings.width,
        settings.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to save image: {}", config.image.output))?;
    info!("Saved {}", config.image.output);

    Ok(())
}
