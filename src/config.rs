//! Render settings read from a TOML file. Every field has a default, so an
//! empty file (or no file at all) renders the built in scene.

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub image: ImageConfig,
    pub camera: CameraConfig,
    pub area_light: AreaLightConfig,
    pub point_lights: Vec<PointLightConfig>,
    pub phong: PhongConfig,
    pub background: Background,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    /// Camera rays per pixel
    pub samples: usize,
    pub gamma: f32,
    pub output: String,
    pub seed: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            samples: 4,
            gamma: 2.2,
            output: "output.png".to_string(),
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aperture: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 3.0, 9.0],
            target: [0.0, 0.8, 0.0],
            up: [0.0, 1.0, 0.0],
            fov: 35.0,
            aperture: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    Regular,
    Stratified,
    Random,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AreaLightConfig {
    pub intensity: [f32; 3],
    /// Corners in order around the quad. The lit side is the one
    /// `(p1 - p0) × (p3 - p0)` points to.
    pub corners: [[f32; 3]; 4],
    pub sampler: SamplerKind,
    /// Square root of the number of samples
    pub samples_per_axis: usize,
    pub casts_shadow: bool,
}

impl Default for AreaLightConfig {
    fn default() -> Self {
        Self {
            intensity: [12.0, 12.0, 12.0],
            corners: [
                [-1.0, 4.0, -1.0],
                [1.0, 4.0, -1.0],
                [1.0, 4.0, 1.0],
                [-1.0, 4.0, 1.0],
            ],
            sampler: SamplerKind::Stratified,
            samples_per_axis: 4,
            casts_shadow: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    pub position: [f32; 3],
    pub intensity: [f32; 3],
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct PhongConfig {
    pub ka: f32,
    pub kd: f32,
    pub ks: f32,
    pub ke: f32,
}

impl Default for PhongConfig {
    fn default() -> Self {
        Self {
            ka: 0.1,
            kd: 0.7,
            ks: 0.3,
            ke: 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(transparent)]
pub struct Background(pub [f32; 3]);

impl Default for Background {
    fn default() -> Self {
        Background([0.05, 0.05, 0.08])
    }
}

impl Config {
    /// Reads and validates the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.image.width > 0 && self.image.height > 0,
            "image size must be positive, got {}x{}",
            self.image.width,
            self.image.height
        );
        ensure!(self.image.samples > 0, "image.samples must be at least 1");
        ensure!(self.image.gamma > 0.0, "image.gamma must be positive");
        ensure!(
            self.area_light.samples_per_axis > 0,
            "area_light.samples_per_axis must be at least 1"
        );
        ensure!(self.camera.fov > 0.0 && self.camera.fov < 180.0, "camera.fov must be in (0, 180)");

        Ok(())
    }

    pub fn background(&self) -> Vec3 {
        Vec3::from(self.background.0)
    }
}
