// Vector and rotation utilities for ray tracing.
//
// Extends glam::DVec3 with the optics helpers the materials need, and
// provides the fixed-angle Y rotation used by instanced geometry.

use crate::{Aabb, Point3, Vec3};

/// Extension trait for DVec3 to provide scattering utilities
pub trait Vec3Ext {
    /// True if every component is within 1e-8 of zero.
    fn near_zero(&self) -> bool;

    /// Mirror this vector about the normal `n`.
    fn reflect(&self, n: Vec3) -> Vec3;

    /// Refract this unit vector through a surface with normal `n`.
    /// `etai_over_etat` is the ratio of refractive indices.
    fn refract(&self, n: Vec3, etai_over_etat: f64) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    fn reflect(&self, n: Vec3) -> Vec3 {
        *self - 2.0 * self.dot(n) * n
    }

    fn refract(&self, n: Vec3, etai_over_etat: f64) -> Vec3 {
        let cos_theta = (-*self).dot(n).min(1.0);
        let r_out_perp = etai_over_etat * (*self + cos_theta * n);
        let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
        r_out_perp + r_out_parallel
    }
}

/// A fixed rotation about the +Y axis.
///
/// `apply` rotates by +θ (object space to world space) and `invert` by -θ,
/// so `invert(apply(p)) == p` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationY {
    sin_theta: f64,
    cos_theta: f64,
}

impl RotationY {
    pub fn from_degrees(angle: f64) -> Self {
        let radians = angle.to_radians();
        Self {
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
        }
    }

    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    pub fn invert(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Box enclosing the 8 rotated corners of `aabb`.
    pub fn apply_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();
        let mut min = Point3::splat(f64::INFINITY);
        let mut max = Point3::splat(f64::NEG_INFINITY);

        for corner in corners {
            let rotated = self.apply(corner);
            min = min.min(rotated);
            max = max.max(rotated);
        }

        Aabb::new(min, max)
    }
}
