//! Axis-aligned rectangles.

use crate::hittable::{HitRecord, Hittable};
use crate::Material;
use ember_math::{Aabb, Interval, Point3, Ray, Vec3};
use std::sync::Arc;

/// Half-thickness given to the bounding box along the plane's normal.
const PLANE_PADDING: f64 = 0.0001;

/// Orientation of an [`AxisRect`], named by the two axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at constant z
    Xy,
    /// Spans x and z at constant y
    Xz,
    /// Spans y and z at constant x
    Yz,
}

impl Plane {
    /// Indices of the (a, b, normal) axes.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle `[a0, a1] x [b0, b1]` lying in a plane `normal_axis = k`.
///
/// The outward normal always points toward the positive normal axis.
#[derive(Clone)]
pub struct AxisRect {
    plane: Plane,
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    k: f64,
    material: Arc<dyn Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f64, f64),
        (b0, b1): (f64, f64),
        k: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    /// Rectangle `[x0, x1] x [y0, y1]` at `z = k`.
    pub fn xy(x0: f64, x1: f64, y0: f64, y1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xy, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle `[x0, x1] x [z0, z1]` at `y = k`.
    pub fn xz(x0: f64, x1: f64, z0: f64, z1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Xz, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle `[y0, y1] x [z0, z1]` at `x = k`.
    pub fn yz(y0: f64, y1: f64, z0: f64, z1: f64, k: f64, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::Yz, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

impl Hittable for AxisRect {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (a_axis, b_axis, n_axis) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // A ray parallel to the plane gives an infinite or NaN t, which
        // the interval rejects
        let t = (self.k - origin[n_axis]) / direction[n_axis];
        if !ray_t.contains(t) {
            return None;
        }

        let a = origin[a_axis] + t * direction[a_axis];
        let b = origin[b_axis] + t * direction[b_axis];
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        let mut outward_normal = Vec3::ZERO;
        outward_normal[n_axis] = 1.0;

        let u = (a - self.a0) / (self.a1 - self.a0);
        let v = (b - self.b0) / (self.b1 - self.b0);

        Some(HitRecord::new(
            ray,
            t,
            outward_normal,
            (u, v),
            &*self.material,
        ))
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let (a_axis, b_axis, n_axis) = self.plane.axes();
        let mut min = Point3::ZERO;
        let mut max = Point3::ZERO;

        min[a_axis] = self.a0;
        max[a_axis] = self.a1;
        min[b_axis] = self.b0;
        max[b_axis] = self.b1;
        min[n_axis] = self.k - PLANE_PADDING;
        max[n_axis] = self.k + PLANE_PADDING;

        Some(Aabb::from_points(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DiffuseLight;
    use ember_math::Color;

    fn light() -> Arc<dyn Material> {
        Arc::new(DiffuseLight::new(Color::splat(4.0)))
    }

    fn unbounded() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let rect = AxisRect::xy(0.0, 2.0, 0.0, 4.0, -3.0, light());
        let ray = Ray::new_simple(Point3::new(0.5, 3.0, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = rect.hit(&ray, unbounded()).expect("inside the rectangle");
        assert!((rec.t - 3.0).abs() < 1e-12);
        assert!((rec.u - 0.25).abs() < 1e-12);
        assert!((rec.v - 0.75).abs() < 1e-12);
        // Ray travels toward -z, so the +z outward normal faces it
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_xz_rect_from_below() {
        let rect = AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 5.0, light());
        let ray = Ray::new_simple(Point3::ZERO, Vec3::Y);

        let rec = rect.hit(&ray, unbounded()).expect("straight up hits");
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Y);
        assert_eq!(rec.p, Point3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_yz_rect_outside_bounds() {
        let rect = AxisRect::yz(0.0, 1.0, 0.0, 1.0, 2.0, light());
        let ray = Ray::new_simple(Point3::new(0.0, 1.5, 0.5), Vec3::X);
        assert!(rect.hit(&ray, unbounded()).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let rect = AxisRect::xz(-1.0, 1.0, -1.0, 1.0, 0.0, light());

        // In the plane: 0/0 is NaN
        let in_plane = Ray::new_simple(Point3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!(rect.hit(&in_plane, unbounded()).is_none());

        // Above the plane: infinite t
        let above = Ray::new_simple(Point3::new(-5.0, 1.0, 0.0), Vec3::X);
        assert!(rect.hit(&above, unbounded()).is_none());
    }

    #[test]
    fn test_rect_bounding_box_is_padded() {
        let rect = AxisRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, light());
        let bbox = rect.bounding_box(0.0, 1.0).expect("rectangles are bounded");

        assert_eq!(bbox.min, Point3::new(555.0 - PLANE_PADDING, 0.0, 0.0));
        assert_eq!(bbox.max, Point3::new(555.0 + PLANE_PADDING, 555.0, 555.0));

        let ray = Ray::new_simple(Point3::new(0.0, 200.0, 300.0), Vec3::X);
        assert!(bbox.hit(&ray, unbounded()));
    }
}
