//! Direct illumination for a ray tracer: Phong shading with soft shadows
//! from Monte-Carlo sampled area lights.

pub mod bvh;
pub mod camera;
pub mod config;
pub mod light;
pub mod logger;
pub mod primitives;
pub mod ray;
pub mod render;
pub mod sampler;
pub mod scene;
pub mod shader;

pub use crate::{
    primitives::Intersect,
    ray::{Hit, Ray},
};

pub type DefaultRng = rand_xoshiro::Xoshiro256Plus;
