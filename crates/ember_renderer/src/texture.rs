//! Textures: map surface coordinates and hit points to colors.

use crate::perlin::{Perlin, DEFAULT_POINT_COUNT, DEFAULT_TURBULENCE_DEPTH};
use ember_math::{Color, Interval, Point3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Color returned by an image texture with no usable pixel data.
pub const DEBUG_COLOR: Color = Color::new(1.0, 0.0, 0.0);

/// Trait for anything that can be sampled for a color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.color
    }
}

/// Solid (3-D) checker pattern switching between two sub-textures on the
/// sign of `sin(10x)·sin(10y)·sin(10z)`.
#[derive(Clone)]
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    const FREQUENCY: f64 = 10.0;

    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    /// Checker between two solid colors.
    pub fn from_colors(even: Color, odd: Color) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let sines = (Self::FREQUENCY * p.x).sin()
            * (Self::FREQUENCY * p.y).sin()
            * (Self::FREQUENCY * p.z).sin();

        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Decoded RGBA8 image handed over by the asset loader.
///
/// Pixels are row-major, top row first, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    const BYTES_PER_PIXEL: usize = 4;

    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// True if the buffer holds every pixel the dimensions promise.
    pub fn is_complete(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() >= self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    /// RGB of pixel (i, j) scaled to [0, 1], or `None` if out of range.
    fn pixel(&self, i: usize, j: usize) -> Option<Color> {
        let offset = (j * self.width as usize + i) * Self::BYTES_PER_PIXEL;
        let px = self.data.get(offset..offset + 3)?;
        let scale = 1.0 / 255.0;
        Some(Color::new(
            scale * px[0] as f64,
            scale * px[1] as f64,
            scale * px[2] as f64,
        ))
    }
}

/// Nearest-neighbour image lookup.
#[derive(Debug, Clone, Default)]
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        if !image.is_complete() {
            log::warn!(
                "Image texture {}x{} has {} bytes; sampling will return the debug color",
                image.width,
                image.height,
                image.data.len()
            );
        }
        Self { image: Some(image) }
    }

    /// A texture with nothing bound; always samples to [`DEBUG_COLOR`].
    pub fn unbound() -> Self {
        Self { image: None }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        let Some(image) = self.image.as_deref().filter(|img| img.is_complete()) else {
            return DEBUG_COLOR;
        };

        // Clamp to [0,1] x [1,0]; v flips to image row order
        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let width = image.width as usize;
        let height = image.height as usize;
        let i = ((u * width as f64) as usize).min(width - 1);
        let j = ((v * height as f64) as usize).min(height - 1);

        image.pixel(i, j).unwrap_or(DEBUG_COLOR)
    }
}

/// Marble-like bands driven by Perlin turbulence.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self::with_perlin(Perlin::new(DEFAULT_POINT_COUNT, rng), scale)
    }

    pub fn with_perlin(noise: Perlin, scale: f64) -> Self {
        Self { noise, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let turb = self.noise.turbulence(p, DEFAULT_TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
    }
}
