//! Axis-aligned box built from six rectangles.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::rect::AxisRect;
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray};
use std::sync::Arc;

/// A closed box spanning `p0..p1`, all faces sharing one material.
#[derive(Clone)]
pub struct Cuboid {
    bbox: Aabb,
    sides: HittableList,
}

impl Cuboid {
    pub fn new(p0: Point3, p1: Point3, material: Arc<dyn Material>) -> Self {
        let bbox = Aabb::from_points(p0, p1);
        let (min, max) = (bbox.min, bbox.max);

        let mut sides = HittableList::new();
        sides.push(AxisRect::xy(min.x, max.x, min.y, max.y, max.z, material.clone()));
        sides.push(AxisRect::xy(min.x, max.x, min.y, max.y, min.z, material.clone()));

        sides.push(AxisRect::xz(min.x, max.x, min.z, max.z, max.y, material.clone()));
        sides.push(AxisRect::xz(min.x, max.x, min.z, max.z, min.y, material.clone()));

        sides.push(AxisRect::yz(min.y, max.y, min.z, max.z, max.x, material.clone()));
        sides.push(AxisRect::yz(min.y, max.y, min.z, max.z, min.x, material));

        Self { bbox, sides }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        self.sides.hit(ray, ray_t)
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_math::{Color, Vec3};

    fn white_box() -> Cuboid {
        Cuboid::new(
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, -1.0, -1.0),
            Arc::new(Lambertian::new(Color::splat(0.73))),
        )
    }

    #[test]
    fn test_cuboid_nearest_face() {
        let cuboid = white_box();
        let ray = Ray::new_simple(Point3::new(0.2, 0.3, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = cuboid
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("ray passes through the box");
        assert!((rec.t - 9.0).abs() < 1e-12);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_cuboid_exit_face_from_inside() {
        let cuboid = white_box();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(-1.0, 0.0, 0.0));

        let rec = cuboid
            .hit(&ray, Interval::new(0.001, f64::INFINITY))
            .expect("every direction leaves the box");
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::X);
    }

    #[test]
    fn test_cuboid_bounding_box_orders_corners() {
        let bbox = white_box().bounding_box(0.0, 1.0).expect("boxes are bounded");
        assert_eq!(bbox.min, Point3::splat(-1.0));
        assert_eq!(bbox.max, Point3::splat(1.0));
    }
}
