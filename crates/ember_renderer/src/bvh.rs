//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's hittables. Each level splits its span on
//! a randomly chosen axis at the median, so construction is O(n log^2 n)
//! and nearest-hit queries are O(log n) expected.

use crate::error::BvhError;
use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Internal BVH node with two children.
///
/// Leaves are the scene objects themselves; a span of one object stores it
/// as both children.
#[derive(Clone)]
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    /// Build a BVH over `objects`, bounding them over `[time0, time1]`.
    pub fn new(
        mut objects: Vec<Arc<dyn Hittable>>,
        time0: f64,
        time1: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, BvhError> {
        if objects.is_empty() {
            return Err(BvhError::Empty);
        }

        // Boxes are needed by every level of the sort; check them once up front
        let mut boxed = objects
            .drain(..)
            .map(|object| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (object, bbox))
                    .ok_or(BvhError::MissingBoundingBox)
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("Building BVH over {} objects", boxed.len());
        Ok(Self::build(&mut boxed, rng))
    }

    /// Recursive BVH construction.
    ///
    /// Sort the span by box minimum on a random axis, split in half,
    /// recurse.
    fn build(objects: &mut [(Arc<dyn Hittable>, Aabb)], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let key = |entry: &(Arc<dyn Hittable>, Aabb)| entry.1.min[axis];

        let (left, right, left_box, right_box) = match objects.len() {
            1 => {
                let (only, bbox) = &objects[0];
                (only.clone(), only.clone(), *bbox, *bbox)
            }
            2 => {
                let (a, b) = (&objects[0], &objects[1]);
                let (first, second) = if key(a) <= key(b) { (a, b) } else { (b, a) };
                (first.0.clone(), second.0.clone(), first.1, second.1)
            }
            _ => {
                objects.sort_unstable_by(|a, b| key(a).total_cmp(&key(b)));

                // Split at midpoint
                let (lower, upper) = objects.split_at_mut(objects.len() / 2);
                let left = Self::build(lower, rng);
                let right = Self::build(upper, rng);
                let (left_box, right_box) = (left.bbox, right.bbox);
                let left: Arc<dyn Hittable> = Arc::new(left);
                let right: Arc<dyn Hittable> = Arc::new(right);
                (left, right, left_box, right_box)
            }
        };

        Self {
            left,
            right,
            bbox: Aabb::surrounding(&left_box, &right_box),
        }
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t);

        // Only check right up to closest hit
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, ray_t.with_max(right_max));

        hit_right.or(hit_left)
    }

    fn bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(self.bbox)
    }
}
