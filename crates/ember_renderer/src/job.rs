//! Render job configuration and streamed result messages.

use crate::pattern::Pattern;
use crate::texture::ImageData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn one() -> i64 {
    1
}

fn default_scene() -> i64 {
    7
}

fn clamp_count(count: i64) -> u32 {
    count.clamp(1, u32::MAX as i64) as u32
}

/// Configuration message that starts a render unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    /// Grid rows; values below 1 are treated as 1
    #[serde(default = "one")]
    pub num_rows: i64,
    /// Grid columns; values below 1 are treated as 1
    #[serde(default = "one")]
    pub num_cols: i64,
    #[serde(default)]
    pub pattern: Pattern,
    #[serde(default = "default_scene")]
    pub scene_selector: i64,
    /// Decoded images keyed by asset name
    #[serde(default)]
    pub auxiliary_image_data: HashMap<String, ImageData>,

    // Overrides of the preset's settings
    #[serde(default)]
    pub samples_per_pixel: Option<u32>,
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Image width; the height follows the scene's aspect ratio
    #[serde(default)]
    pub image_width: Option<u32>,
    /// Accumulate ticks until at least this many pixels are pending before
    /// sending a batch. 0 sends after every tick.
    #[serde(default)]
    pub min_batch_pixels: usize,
}

impl RenderJob {
    pub fn new(scene_selector: i64) -> Self {
        Self {
            num_rows: 1,
            num_cols: 1,
            pattern: Pattern::default(),
            scene_selector,
            auxiliary_image_data: HashMap::new(),
            samples_per_pixel: None,
            max_depth: None,
            image_width: None,
            min_batch_pixels: 0,
        }
    }

    pub fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.num_rows = rows.into();
        self.num_cols = cols.into();
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = Some(samples_per_pixel);
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = Some(width);
        self
    }

    pub fn with_min_batch_pixels(mut self, pixels: usize) -> Self {
        self.min_batch_pixels = pixels;
        self
    }

    pub fn with_image(mut self, name: impl Into<String>, image: ImageData) -> Self {
        self.auxiliary_image_data.insert(name.into(), image);
        self
    }

    /// Grid rows, at least 1.
    pub fn rows(&self) -> u32 {
        clamp_count(self.num_rows)
    }

    /// Grid columns, at least 1.
    pub fn cols(&self) -> u32 {
        clamp_count(self.num_cols)
    }
}

impl Default for RenderJob {
    fn default() -> Self {
        Self::new(default_scene())
    }
}

/// One finished pixel: coordinates in math convention (`y = 0` is the
/// bottom row) and its packed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPixel {
    pub x: u32,
    pub y: u32,
    pub rgb: [u8; 3],
}

/// A batch of pixels streamed out of a render unit.
///
/// The final batch of a unit carries `done = true` and no pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBatch {
    /// Which job of a launch produced this batch
    pub unit_id: usize,
    pub image_width: u32,
    pub image_height: u32,
    pub pixels: Vec<RenderedPixel>,
    pub done: bool,
}

impl ResultBatch {
    /// Terminal message for a unit.
    pub fn finished(unit_id: usize, image_width: u32, image_height: u32) -> Self {
        Self {
            unit_id,
            image_width,
            image_height,
            pixels: Vec::new(),
            done: true,
        }
    }
}
