// Re-export glam for convenience
pub use glam;
pub use glam::DVec3;

// Ember math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{RotationY, Vec3Ext};

/// Three-component f64 vector used throughout the renderer.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;

/// Linear RGB color. Components are nominally in [0, 1] but may exceed
/// that range for emitters.
pub type Color = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_vec3_accumulate() {
        let mut sum = Color::ZERO;
        sum += Color::new(0.5, 0.25, 1.0);
        sum += Color::new(0.5, 0.25, 1.0);
        sum *= 0.5;
        assert_eq!(sum, Color::new(0.5, 0.25, 1.0));
    }
}
