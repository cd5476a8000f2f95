//! Round-robin scheduling of bucket pixel sequences.

use crate::bucket::{generate_buckets, Bucket};
use crate::pattern::{Pattern, PixelSequence};
use rand::RngCore;

/// Interleaves the pixel sequences of every bucket.
///
/// Each call to `next` takes one pixel from every bucket that still has
/// pixels and retires exhausted buckets. Over the whole run every pixel of
/// the image is produced exactly once.
#[derive(Debug, Clone)]
pub struct RenderSchedule {
    pattern: Pattern,
    sequences: Vec<PixelSequence>,
}

impl RenderSchedule {
    /// Build the schedule for a `width x height` image split into a
    /// `rows x cols` grid. [`Pattern::Random`] is resolved once here so all
    /// buckets share the chosen pattern.
    pub fn new(
        width: u32,
        height: u32,
        rows: u32,
        cols: u32,
        pattern: Pattern,
        rng: &mut dyn RngCore,
    ) -> Self {
        let pattern = pattern.resolve(rng);
        let buckets = if pattern.is_whole_image() {
            if width == 0 || height == 0 {
                Vec::new()
            } else {
                vec![Bucket::whole(width, height)]
            }
        } else {
            generate_buckets(width, height, rows, cols)
        };

        log::debug!(
            "Scheduling {}x{} image as {} buckets with pattern {}",
            width,
            height,
            buckets.len(),
            pattern
        );

        let sequences = buckets
            .iter()
            .map(|bucket| pattern.sequence(bucket, rng))
            .collect();

        Self { pattern, sequences }
    }

    /// The concrete pattern in use.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Number of buckets that still have pixels.
    pub fn active_buckets(&self) -> usize {
        self.sequences.len()
    }

    /// Pixels not yet produced.
    pub fn remaining(&self) -> usize {
        self.sequences.iter().map(|seq| seq.size_hint().0).sum()
    }
}

impl Iterator for RenderSchedule {
    type Item = Vec<(u32, u32)>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.sequences.is_empty() {
            let mut tick = Vec::with_capacity(self.sequences.len());
            self.sequences.retain_mut(|seq| match seq.next() {
                Some(pixel) => {
                    tick.push(pixel);
                    true
                }
                None => false,
            });

            if !tick.is_empty() {
                return Some(tick);
            }
        }

        None
    }
}
