//! Constant-density participating medium (smoke, fog).

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::texture::Texture;
use crate::Material;
use ember_math::{Aabb, Color, Interval, Ray, Vec3};
use std::sync::Arc;

/// Gap between the entry hit and the search for the exit hit.
const EXIT_EPSILON: f64 = 0.0001;

/// A volume of uniform density bounded by a closed, convex hittable.
#[derive(Clone)]
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::new(albedo)))
    }

    pub fn textured(boundary: Arc<dyn Hittable>, density: f64, albedo: Arc<dyn Texture>) -> Self {
        Self::with_phase(boundary, density, Arc::new(Isotropic::textured(albedo)))
    }

    fn with_phase(
        boundary: Arc<dyn Hittable>,
        density: f64,
        phase_function: Arc<dyn Material>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Entry and exit of the boundary along the whole line
        let entry = self.boundary.hit(ray, Interval::UNIVERSE)?;
        let exit = self
            .boundary
            .hit(ray, Interval::new(entry.t + EXIT_EPSILON, f64::INFINITY))?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * rand::random::<f64>().ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;

        // Scattering inside a volume has no surface orientation
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &*self.phase_function,
            t,
            u: 0.0,
            v: 0.0,
            front_face: true,
        })
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
