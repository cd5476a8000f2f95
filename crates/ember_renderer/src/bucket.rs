//! Grid division of the image into buckets.
//!
//! Each bucket is driven by its own pixel sequence; the schedule
//! interleaves them so the whole frame fills in progressively.

/// A rectangular region of the image to render.
///
/// Covers the half-open ranges `x..x + width` and `y..y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's minimum corner
    pub x: u32,
    /// Y coordinate of bucket's minimum corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in generation order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// A single bucket covering the whole image.
    pub fn whole(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height, 0)
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Largest x inside the bucket.
    pub fn max_x(&self) -> u32 {
        self.x + self.width.saturating_sub(1)
    }

    /// Largest y inside the bucket.
    pub fn max_y(&self) -> u32 {
        self.y + self.height.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Divide a `width x height` image into a `rows x cols` grid.
///
/// Row and column counts are clamped to `1..=height` and `1..=width`. Every
/// bucket has size `ceil(width / cols) x ceil(height / rows)` except along
/// the last row and column, which are clipped to the image. Buckets tile
/// the image without overlap, so fewer than `rows * cols` may come back.
pub fn generate_buckets(width: u32, height: u32, rows: u32, cols: u32) -> Vec<Bucket> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let cols = cols.clamp(1, width);
    let rows = rows.clamp(1, height);
    let bucket_width = width.div_ceil(cols);
    let bucket_height = height.div_ceil(rows);

    let mut buckets = Vec::new();
    let mut index = 0;

    // Generate grid of buckets
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_width.min(width - x);
            let bh = bucket_height.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_width;
        }
        y += bucket_height;
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_pixels(buckets: &[Bucket]) -> u64 {
        buckets.iter().map(|b| b.pixel_count()).sum()
    }

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 2, 2);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        assert_eq!(total_pixels(&buckets), 128 * 128);
        assert!(buckets.iter().all(|b| b.width == 64 && b.height == 64));
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 50, 3, 3);
        assert_eq!(buckets.len(), 9);
        assert_eq!(total_pixels(&buckets), 100 * 50);

        // ceil(100 / 3) = 34, so the last column is 32 wide
        assert_eq!(buckets[0].width, 34);
        assert_eq!(buckets[2].width, 32);
        assert_eq!(buckets[8].height, 16);
    }

    #[test]
    fn test_rows_and_cols_are_independent() {
        // One row of four columns
        let buckets = generate_buckets(40, 10, 1, 4);
        assert_eq!(buckets.len(), 4);
        assert!(buckets.iter().all(|b| b.width == 10 && b.height == 10));
    }

    #[test]
    fn test_grid_clamped_to_image() {
        let buckets = generate_buckets(3, 2, 10, 0);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0], Bucket::new(0, 0, 3, 1, 0));
        assert_eq!(buckets[1], Bucket::new(0, 1, 3, 1, 1));
    }

    #[test]
    fn test_ceil_can_reduce_bucket_count() {
        // ceil(10 / 4) = 3 leaves only four columns of 3, 3, 3, 1
        let buckets = generate_buckets(10, 1, 1, 4);
        assert_eq!(buckets.len(), 4);

        // ceil(5 / 4) = 2 gives only three columns
        let buckets = generate_buckets(5, 1, 1, 4);
        assert_eq!(buckets.len(), 3);
        assert_eq!(total_pixels(&buckets), 5);
    }

    #[test]
    fn test_empty_image() {
        assert!(generate_buckets(0, 10, 2, 2).is_empty());
        assert!(Bucket::whole(0, 4).is_empty());
    }
}
