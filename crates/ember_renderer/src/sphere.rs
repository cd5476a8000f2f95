//! Sphere primitives for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::f64::consts::PI;
use std::sync::Arc;

/// A static sphere.
#[derive(Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(self.center, self.radius, &*self.material, ray, ray_t)
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox)
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
#[derive(Clone)]
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f64,
    time1: f64,
    radius: f64,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        (center0, center1): (Point3, Point3),
        (time0, time1): (f64, f64),
        radius: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`. Extrapolates outside the keyframes; a zero-length
    /// keyframe interval pins the sphere at `center0`.
    pub fn center(&self, time: f64) -> Point3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            &*self.material,
            ray,
            ray_t,
        )
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        let c0 = self.center(time0);
        let c1 = self.center(time1);
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}

/// Quadratic ray/sphere test shared by both sphere kinds.
fn hit_sphere<'a>(
    center: Point3,
    radius: f64,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = ray.origin() - center;
    let a = ray.direction().length_squared();
    let half_b = oc.dot(ray.direction());
    let c = oc.length_squared() - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.contains(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.contains(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        sphere_uv(outward_normal),
        material,
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// u: angle around the Y axis from X=-1, v: angle from Y=-1 to Y=+1.
fn sphere_uv(p: Point3) -> (f64, f64) {
    let theta = (-p.y).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::Color;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn unbounded() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let rec = sphere.hit(&ray, unbounded()).expect("should hit");
        assert!((rec.t - 0.5).abs() < 1e-9);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, unbounded()).is_none());
    }

    #[test]
    fn test_sphere_far_root_from_inside() {
        let sphere = Sphere::new(Point3::ZERO, 2.0, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::X);

        let rec = sphere.hit(&ray, unbounded()).expect("inside hits the shell");
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
    }

    #[test]
    fn test_sphere_interval_is_inclusive() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.hit(&ray, Interval::new(0.0, 0.5)).is_some());
        assert!(sphere.hit(&ray, Interval::new(0.0, 0.49)).is_none());
    }

    #[test]
    fn test_sphere_matches_bisected_root() {
        let mut rng = StdRng::seed_from_u64(17);
        let center = Point3::new(0.3, -0.2, -4.0);
        let radius = 1.3;
        let sphere = Sphere::new(center, radius, gray());

        let mut hits = 0;
        for _ in 0..500 {
            let target = center
                + Vec3::new(
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                );
            let ray = Ray::new_simple(Point3::ZERO, target);
            let Some(rec) = sphere.hit(&ray, unbounded()) else {
                continue;
            };
            hits += 1;

            // Signed distance to the surface: positive at the origin (outside),
            // non-positive at the chord midpoint, so the entry root lies between
            let f = |t: f64| (ray.at(t) - center).length() - radius;
            let t_mid = (center - ray.origin()).dot(ray.direction()) / ray.direction().length_squared();
            let (mut lo, mut hi) = (0.0, t_mid);
            assert!(f(lo) > 0.0 && f(hi) <= 0.0);
            for _ in 0..200 {
                let mid = 0.5 * (lo + hi);
                if f(mid) > 0.0 {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            assert!((rec.t - hi).abs() < 1e-6, "quadratic {} vs bisected {}", rec.t, hi);
        }
        assert!(hits > 50);
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = sphere_uv(Vec3::new(1.0, 0.0, 0.0));
        assert!((u - 0.5).abs() < 1e-9);
        assert!((v - 0.5).abs() < 1e-9);

        let (_, v) = sphere_uv(Vec3::new(0.0, 1.0, 0.0));
        assert!((v - 1.0).abs() < 1e-9);

        let (u, _) = sphere_uv(Vec3::new(0.0, 0.0, 1.0));
        assert!((u - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_moving_sphere_center() {
        let sphere = MovingSphere::new(
            (Point3::ZERO, Point3::new(0.0, 2.0, 0.0)),
            (0.0, 1.0),
            0.5,
            gray(),
        );
        assert_eq!(sphere.center(0.5), Point3::new(0.0, 1.0, 0.0));

        // Hit follows the ray's time
        let ray = Ray::new(Point3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.5);
        let rec = sphere.hit(&ray, unbounded()).expect("center is at y=1");
        assert!((rec.t - 4.5).abs() < 1e-9);

        let early = Ray::new(Point3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(sphere.hit(&early, unbounded()).is_none());
    }

    #[test]
    fn test_moving_sphere_zero_interval() {
        let sphere = MovingSphere::new(
            (Point3::ZERO, Point3::ONE),
            (0.5, 0.5),
            1.0,
            gray(),
        );
        assert_eq!(sphere.center(0.9), Point3::ZERO);
    }

    #[test]
    fn test_moving_sphere_bounding_box() {
        let sphere = MovingSphere::new(
            (Point3::ZERO, Point3::new(4.0, 0.0, 0.0)),
            (0.0, 1.0),
            1.0,
            gray(),
        );
        let bbox = sphere.bounding_box(0.0, 1.0).expect("spheres are bounded");
        assert_eq!(bbox.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max, Point3::new(5.0, 1.0, 1.0));
    }
}
