//! Instance transforms wrapping another hittable.

use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, RotationY, Vec3};
use std::sync::Arc;

/// Moves a child object by a fixed offset.
#[derive(Clone)]
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let moved = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        // The child already oriented the normal against the ray, which
        // translation does not change
        let mut rec = self.object.hit(&moved, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// Rotates a child object about the world Y axis.
#[derive(Clone)]
pub struct RotateY {
    object: Arc<dyn Hittable>,
    rotation: RotationY,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees (counter-clockwise seen from +Y).
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        Self {
            object,
            rotation: RotationY::from_degrees(angle),
        }
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // World space to object space
        let rotated = Ray::new(
            self.rotation.invert(ray.origin()),
            self.rotation.invert(ray.direction()),
            ray.time(),
        );

        let mut rec = self.object.hit(&rotated, ray_t)?;

        // Object space back to world space; a rigid rotation keeps the
        // normal facing against the ray
        rec.p = self.rotation.apply(rec.p);
        rec.normal = self.rotation.apply(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| self.rotation.apply_aabb(&bbox))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuboid::Cuboid;
    use crate::material::Lambertian;
    use crate::Sphere;
    use ember_math::{Color, Point3};

    fn unbounded() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    fn unit_box() -> Arc<dyn Hittable> {
        Arc::new(Cuboid::new(
            Point3::ZERO,
            Point3::ONE,
            Arc::new(Lambertian::new(Color::ONE)),
        ))
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere = Sphere::new(Point3::ZERO, 1.0, Arc::new(Lambertian::new(Color::ONE)));
        let moved = Translate::new(Arc::new(sphere), Vec3::new(0.0, 0.0, -5.0));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = moved.hit(&ray, unbounded()).expect("sphere moved onto the ray");

        assert!((rec.t - 4.0).abs() < 1e-12);
        assert!((rec.p - Point3::new(0.0, 0.0, -4.0)).length() < 1e-12);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_translate_bounding_box() {
        let moved = Translate::new(unit_box(), Vec3::new(265.0, 0.0, 295.0));
        let bbox = moved.bounding_box(0.0, 1.0).expect("boxes are bounded");
        assert_eq!(bbox.min, Point3::new(265.0, 0.0, 295.0));
        assert_eq!(bbox.max, Point3::new(266.0, 1.0, 296.0));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // A box on +x rotated 90 degrees lands on -z
        let slab: Arc<dyn Hittable> = Arc::new(Cuboid::new(
            Point3::new(2.0, -1.0, -1.0),
            Point3::new(3.0, 1.0, 1.0),
            Arc::new(Lambertian::new(Color::ONE)),
        ));
        let rotated = RotateY::new(slab, 90.0);

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = rotated.hit(&ray, unbounded()).expect("rotated box is on -z");
        assert!((rec.t - 2.0).abs() < 1e-9);
        assert!((rec.p - Point3::new(0.0, 0.0, -2.0)).length() < 1e-9);
        assert!((rec.normal - Vec3::Z).length() < 1e-9);

        // The unmoved location is now empty
        let old = Ray::new_simple(Point3::ZERO, Vec3::X);
        assert!(rotated.hit(&old, unbounded()).is_none());
    }

    #[test]
    fn test_rotate_y_keeps_face_from_inside() {
        let rotated = RotateY::new(
            Arc::new(Sphere::new(Point3::ZERO, 2.0, Arc::new(Lambertian::new(Color::ONE)))),
            37.0,
        );
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let rec = rotated.hit(&ray, unbounded()).expect("inside hits the shell");

        assert!(!rec.front_face);
        assert!(rec.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_rotate_y_bounding_box_contains_rotated_corners() {
        let rotated = RotateY::new(unit_box(), 45.0);
        let bbox = rotated.bounding_box(0.0, 1.0).expect("boxes are bounded");

        let diag = 2f64.sqrt();
        assert!((bbox.max.x - diag).abs() < 1e-9);
        assert!(bbox.min.x.abs() < 1e-9);
        assert!((bbox.min.z + diag / 2.0).abs() < 1e-9);
        assert!((bbox.max.z - diag / 2.0).abs() < 1e-9);
        assert_eq!(bbox.min.y, 0.0);
        assert_eq!(bbox.max.y, 1.0);
    }
}
