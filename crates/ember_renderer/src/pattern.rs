//! Pixel traversal patterns.
//!
//! A pattern turns a [`Bucket`] into a finite, lazily produced sequence of
//! pixel coordinates that visits every pixel of the bucket exactly once.

use crate::bucket::Bucket;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::Deserialize;
use std::fmt;

/// The eight directional sweep names, in selection order.
pub const SWEEP_NAMES: [&str; 8] = [
    "left-up-row",
    "right-up-row",
    "left-down-row",
    "right-down-row",
    "left-up-col",
    "right-up-col",
    "left-down-col",
    "right-down-col",
];

/// Order in which pixels of each bucket are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Pattern {
    /// Uniformly shuffled order
    RandomPoints,
    /// Clockwise spiral from the bucket edge toward its center
    OutsideIn,
    /// Row or column sweep from one corner
    Sweep {
        /// Start at the maximum x and walk toward smaller x
        from_right: bool,
        /// Walk y upward from the minimum y
        downward: bool,
        /// Finish each row before moving to the next
        row_major: bool,
    },
    /// Column-major sweep of the whole image from the minimum corner
    #[default]
    Raster,
    /// Picks one of the other patterns when the job starts
    Random,
}

impl Pattern {
    /// Parse a pattern name (case-insensitive). Unknown names fall back to
    /// [`Pattern::Raster`].
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "random-points" => Pattern::RandomPoints,
            "outside-in" => Pattern::OutsideIn,
            "random" => Pattern::Random,
            "raster" => Pattern::Raster,
            sweep if SWEEP_NAMES.contains(&sweep) => Pattern::Sweep {
                from_right: sweep.contains("right"),
                downward: sweep.contains("down"),
                row_major: sweep.contains("row"),
            },
            other => {
                log::warn!("Unknown render pattern {:?}, falling back to raster", other);
                Pattern::Raster
            }
        }
    }

    /// Resolve [`Pattern::Random`] into a concrete pattern: a third of the
    /// time random points, a third outside-in, and otherwise one of the
    /// eight sweeps. Concrete patterns resolve to themselves.
    pub fn resolve(self, rng: &mut dyn RngCore) -> Self {
        if self != Pattern::Random {
            return self;
        }

        match rng.gen_range(0..3) {
            0 => Pattern::RandomPoints,
            1 => Pattern::OutsideIn,
            _ => {
                let name = SWEEP_NAMES[rng.gen_range(0..SWEEP_NAMES.len())];
                Pattern::parse(name)
            }
        }
    }

    /// True if the pattern ignores the grid and covers the image as one
    /// bucket.
    pub fn is_whole_image(&self) -> bool {
        matches!(self, Pattern::Raster)
    }

    /// Lazily enumerate the pixels of `bucket`.
    ///
    /// [`Pattern::Random`] is resolved here, so resolve it beforehand if
    /// every bucket should share one pattern.
    pub fn sequence(&self, bucket: &Bucket, rng: &mut dyn RngCore) -> PixelSequence {
        match self.resolve(rng) {
            Pattern::RandomPoints => PixelSequence::Shuffled(Shuffled::new(bucket, rng)),
            Pattern::OutsideIn => PixelSequence::Spiral(Spiral::new(bucket)),
            Pattern::Sweep {
                from_right,
                downward,
                row_major,
            } => PixelSequence::Sweep(Sweep::new(bucket, from_right, downward, row_major)),
            Pattern::Raster | Pattern::Random => {
                PixelSequence::Sweep(Sweep::new(bucket, false, true, false))
            }
        }
    }
}

impl From<String> for Pattern {
    fn from(name: String) -> Self {
        Pattern::parse(&name)
    }
}

impl From<&str> for Pattern {
    fn from(name: &str) -> Self {
        Pattern::parse(name)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::RandomPoints => write!(f, "random-points"),
            Pattern::OutsideIn => write!(f, "outside-in"),
            Pattern::Raster => write!(f, "raster"),
            Pattern::Random => write!(f, "random"),
            Pattern::Sweep {
                from_right,
                downward,
                row_major,
            } => write!(
                f,
                "{}-{}-{}",
                if *from_right { "right" } else { "left" },
                if *downward { "down" } else { "up" },
                if *row_major { "row" } else { "col" },
            ),
        }
    }
}

/// A finite pixel sequence for one bucket.
#[derive(Debug, Clone)]
pub enum PixelSequence {
    Shuffled(Shuffled),
    Spiral(Spiral),
    Sweep(Sweep),
}

impl Iterator for PixelSequence {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            PixelSequence::Shuffled(seq) => seq.next(),
            PixelSequence::Spiral(seq) => seq.next(),
            PixelSequence::Sweep(seq) => seq.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            PixelSequence::Shuffled(seq) => seq.size_hint(),
            PixelSequence::Spiral(seq) => seq.size_hint(),
            PixelSequence::Sweep(seq) => seq.size_hint(),
        }
    }
}

/// Every pixel of a bucket in uniformly random order.
#[derive(Debug, Clone)]
pub struct Shuffled {
    points: Vec<(u32, u32)>,
}

impl Shuffled {
    pub fn new(bucket: &Bucket, rng: &mut dyn RngCore) -> Self {
        let mut points = Vec::with_capacity(bucket.pixel_count() as usize);
        for y in bucket.y..bucket.y + bucket.height {
            for x in bucket.x..bucket.x + bucket.width {
                points.push((x, y));
            }
        }
        points.shuffle(rng);
        Self { points }
    }
}

impl Iterator for Shuffled {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        self.points.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.points.len(), Some(self.points.len()))
    }
}

/// Row or column sweep driven by a running index.
#[derive(Debug, Clone)]
pub struct Sweep {
    bucket: Bucket,
    from_right: bool,
    downward: bool,
    row_major: bool,
    index: u64,
}

impl Sweep {
    pub fn new(bucket: &Bucket, from_right: bool, downward: bool, row_major: bool) -> Self {
        Self {
            bucket: *bucket,
            from_right,
            downward,
            row_major,
            index: 0,
        }
    }

    fn remaining(&self) -> u64 {
        self.bucket.pixel_count() - self.index
    }
}

impl Iterator for Sweep {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        let width = self.bucket.width as u64;
        let height = self.bucket.height as u64;
        let (col, row) = if self.row_major {
            (self.index % width, self.index / width)
        } else {
            (self.index / height, self.index % height)
        };
        self.index += 1;

        let (col, row) = (col as u32, row as u32);
        let x = if self.from_right {
            self.bucket.max_x() - col
        } else {
            self.bucket.x + col
        };
        let y = if self.downward {
            self.bucket.y + row
        } else {
            self.bucket.max_y() - row
        };

        Some((x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

/// Clockwise spiral that starts at the `(min x, max y)` corner and peels
/// one ring per lap until the center is reached.
#[derive(Debug, Clone)]
pub struct Spiral {
    x: i64,
    y: i64,
    direction: Direction,
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
    remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    PlusX,
    MinusY,
    MinusX,
    PlusY,
}

impl Direction {
    fn step(self, x: i64, y: i64) -> (i64, i64) {
        match self {
            Direction::PlusX => (x + 1, y),
            Direction::MinusY => (x, y - 1),
            Direction::MinusX => (x - 1, y),
            Direction::PlusY => (x, y + 1),
        }
    }

    fn turn(self) -> Self {
        match self {
            Direction::PlusX => Direction::MinusY,
            Direction::MinusY => Direction::MinusX,
            Direction::MinusX => Direction::PlusY,
            Direction::PlusY => Direction::PlusX,
        }
    }
}

impl Spiral {
    pub fn new(bucket: &Bucket) -> Self {
        let min_x = bucket.x as i64;
        let max_y = bucket.max_y() as i64;
        Self {
            x: min_x,
            y: max_y,
            direction: Direction::PlusX,
            min_x,
            max_x: bucket.max_x() as i64,
            min_y: bucket.y as i64,
            max_y,
            remaining: bucket.pixel_count(),
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Move to the next unvisited pixel, retiring the finished side of the
    /// ring whenever the walk hits the current boundary.
    fn advance(&mut self) {
        for _ in 0..4 {
            let (nx, ny) = self.direction.step(self.x, self.y);
            if self.contains(nx, ny) {
                self.x = nx;
                self.y = ny;
                return;
            }

            match self.direction {
                Direction::PlusX => self.max_y -= 1,
                Direction::MinusY => self.max_x -= 1,
                Direction::MinusX => self.min_y += 1,
                Direction::PlusY => self.min_x += 1,
            }
            self.direction = self.direction.turn();
        }
    }
}

impl Iterator for Spiral {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let current = (self.x as u32, self.y as u32);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}
