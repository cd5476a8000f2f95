//! Ember renderer - progressive CPU path tracing
//!
//! A Monte Carlo path tracer over a small set of analytic primitives,
//! instancing transforms and participating media. Images are split into a
//! grid of buckets and filled in progressively by interleaving per-bucket
//! pixel traversal patterns. Independent render units stream packed pixels
//! out over a channel.

mod sampling;
mod perlin;
mod texture;
mod hittable;
mod material;
mod sphere;
mod rect;
mod cuboid;
mod transform;
mod medium;
mod bvh;
mod camera;
mod renderer;
mod bucket;
mod pattern;
mod schedule;
mod error;
pub mod scenes;
mod job;
mod worker;

pub use sampling::{
    gen_f64, gen_range, random_in_unit_disk, random_in_unit_sphere, random_unit_vector,
    random_vec3,
};
pub use perlin::Perlin;
pub use texture::{
    CheckerTexture, ImageData, ImageTexture, NoiseTexture, SolidColor, Texture, DEBUG_COLOR,
};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use sphere::{MovingSphere, Sphere};
pub use rect::{AxisRect, Plane};
pub use cuboid::Cuboid;
pub use transform::{RotateY, Translate};
pub use medium::ConstantMedium;
pub use bvh::BvhNode;
pub use camera::Camera;
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render_pixel, sky_gradient, Background,
    RenderConfig, T_MIN,
};
pub use bucket::{generate_buckets, Bucket};
pub use pattern::{Pattern, PixelSequence, SWEEP_NAMES};
pub use schedule::RenderSchedule;
pub use error::{BvhError, RenderError};
pub use scenes::{Scene, ScenePreset};
pub use job::{RenderJob, RenderedPixel, ResultBatch};
pub use worker::{launch, RenderUnit};

/// Re-export the math types used throughout the public API
pub use ember_math::{Aabb, Color, Interval, Point3, Ray, Vec3};
