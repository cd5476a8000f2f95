//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// Record of a ray-object intersection.
///
/// Lives only for the duration of one query; the material is borrowed from
/// the scene, which outlives every query.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// Surface coordinates
    pub u: f64,
    pub v: f64,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against
    /// the ray.
    pub fn new(
        ray: &Ray,
        t: f64,
        outward_normal: Vec3,
        (u, v): (f64, f64),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            u,
            v,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection of `ray` with parameter inside `ray_t`
    /// (inclusive), or `None` on a miss.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Box enclosing the object for every instant in `[time0, time1]`.
    ///
    /// `None` marks an unbounded object, which the BVH refuses.
    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb>;
}

/// A list of hittable objects searched linearly.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Add an object, wrapping it in an `Arc`.
    pub fn push<H: Hittable + 'static>(&mut self, object: H) {
        self.objects.push(Arc::new(object));
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Take the objects out, e.g. to build a BVH over them.
    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box(time0, time1)?;

        objects.try_fold(first, |acc, object| {
            object
                .bounding_box(time0, time1)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use ember_math::Color;

    fn sphere_at(z: f64) -> Sphere {
        Sphere::new(
            Point3::new(0.0, 0.0, z),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )
    }

    #[test]
    fn test_list_returns_nearest_hit() {
        let mut list = HittableList::new();
        list.push(sphere_at(-5.0));
        list.push(sphere_at(-2.0));
        list.push(sphere_at(-8.0));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = list
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray should hit");

        assert!((rec.t - 1.5).abs() < 1e-9);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_list_bounding_box() {
        let mut list = HittableList::new();
        assert!(list.bounding_box(0.0, 1.0).is_none());

        list.push(sphere_at(-5.0));
        list.push(sphere_at(-2.0));
        let bbox = list.bounding_box(0.0, 1.0).expect("spheres are bounded");

        assert_eq!(bbox.min, Point3::new(-0.5, -0.5, -5.5));
        assert_eq!(bbox.max, Point3::new(0.5, 0.5, -1.5));
    }

    #[test]
    fn test_set_face_normal_from_inside() {
        let material = Lambertian::new(Color::ONE);
        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);
        let rec = HitRecord::new(&ray, 1.0, Vec3::X, (0.0, 0.0), &material);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
        assert_eq!(rec.p, Point3::new(1.0, 0.0, 0.0));
    }
}
