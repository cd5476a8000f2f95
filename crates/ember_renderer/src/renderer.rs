//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Emission added at every bounce
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::sampling::gen_f64;
use crate::{Camera, Hittable};
use ember_math::{Color, Interval, Ray};
use rand::RngCore;

/// Minimum ray parameter; keeps scattered rays from re-hitting their origin.
pub const T_MIN: f64 = 0.001;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// A constant color (black for scenes lit only by emitters)
    Solid(Color),
    /// White at the horizon blending to light blue overhead
    SkyGradient,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Color returned when a ray doesn't hit anything
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f64::INFINITY)) else {
        return background.color(ray);
    };

    // Get emission from material (for lights)
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    // Try to scatter the ray
    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            // Ray scattered - continue tracing
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => {
            // Ray was absorbed - just return emission
            emission
        }
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGB.
///
/// Out-of-range and NaN channels saturate instead of wrapping.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * Interval::UNIT.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b]
}

/// Render a single pixel with multi-sampling.
///
/// `(x, y)` is in math convention: `y = 0` is the bottom row. Each sample
/// is jittered uniformly inside the pixel. Returns the mean sample color.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    (x, y): (u32, u32),
    (width, height): (u32, u32),
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let s = (x as f64 + gen_f64(rng)) / width as f64;
        let t = (y as f64 + gen_f64(rng)) / height as f64;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, &config.background, rng);
    }

    // Average the samples
    pixel_color / samples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, Lambertian, Sphere};
    use ember_math::{Point3, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_sky_gradient() {
        // Straight up is the full blue, straight down pure white
        let up = sky_gradient(&Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 3.0, 0.0)));
        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);

        let down = sky_gradient(&Ray::new_simple(Point3::ZERO, Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(down, Color::ONE);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-2.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb_clamps() {
        assert_eq!(color_to_rgb(Color::new(4.0, -1.0, 0.25)), [255, 0, 127]);
        assert_eq!(color_to_rgb(Color::new(1.0, 0.0, f64::NAN)), [255, 0, 0]);
        assert_eq!(color_to_rgb(Color::splat(1e300)), [255, 255, 255]);
    }

    #[test]
    fn test_ray_color_depth_zero_is_black() {
        let world = Sphere::new(Point3::ZERO, 1.0, Arc::new(Lambertian::new(Color::ONE)));
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let color = ray_color(&ray, &world, 0, &Background::SkyGradient, &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_ray_color_miss_is_background() {
        let world = Sphere::new(Point3::ZERO, 1.0, Arc::new(Lambertian::new(Color::ONE)));
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let solid = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(ray_color(&ray, &world, 5, &solid, &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_render_pixel() {
        // Create a simple scene with one sphere
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(
            Point3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        ));
        let mut rng = StdRng::seed_from_u64(42);
        let world = BvhNode::new(vec![sphere], 0.0, 1.0, &mut rng).expect("sphere is bounded");

        let mut camera = Camera::new().with_aspect_ratio(1.0);
        camera.initialize();

        let config = RenderConfig {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Background::Solid(Color::new(0.5, 0.7, 1.0)),
        };

        // Render center pixel (should hit the sphere)
        let color = render_pixel(&camera, &world, (5, 5), (10, 10), &config, &mut rng);

        // Sphere absorbs at least half of each bounce, so it is darker than the sky
        assert!(color.length() > 0.0);
        assert!(color.z < 0.5 + 1e-12);
    }
}
