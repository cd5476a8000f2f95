//! Ember command line renderer.
//!
//! Launches one render unit per job, collects the streamed pixel batches
//! and writes each finished image as a PNG.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ember_renderer::{launch, ImageData, Pattern, RenderJob};
use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Progressive CPU path tracer", long_about = None)]
struct Args {
    /// JSON file holding one render job or an array of jobs
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scene selector (1-9; anything else picks the Cornell smoke scene)
    #[arg(long, default_value_t = 7)]
    scene: i64,

    /// Bucket grid rows
    #[arg(long, default_value_t = 1)]
    rows: u32,

    /// Bucket grid columns
    #[arg(long, default_value_t = 1)]
    cols: u32,

    /// Traversal pattern, e.g. raster, random, outside-in, left-up-row
    #[arg(long, default_value = "raster")]
    pattern: String,

    /// Samples per pixel (overrides the scene)
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounce depth (overrides the scene)
    #[arg(long)]
    depth: Option<u32>,

    /// Image width in pixels (overrides the scene)
    #[arg(long)]
    width: Option<u32>,

    /// Minimum pixels per result batch
    #[arg(long, default_value_t = 0)]
    batch: usize,

    /// Image asset as name=path, e.g. earthmap=earthmap.jpg
    #[arg(long = "image", value_name = "NAME=PATH")]
    images: Vec<String>,

    /// Output PNG path; several jobs get an index suffix
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Bound the result channel to this many batches
    #[arg(long)]
    channel_capacity: Option<usize>,
}

impl Args {
    fn jobs(&self) -> Result<Vec<RenderJob>> {
        let mut jobs = match &self.config {
            Some(path) => load_jobs(path)?,
            None => vec![RenderJob::new(self.scene)
                .with_grid(self.rows, self.cols)
                .with_pattern(Pattern::parse(&self.pattern))
                .with_min_batch_pixels(self.batch)],
        };

        let images = self
            .images
            .iter()
            .map(|asset| load_image(asset))
            .collect::<Result<Vec<_>>>()?;

        for job in &mut jobs {
            if self.config.is_none() {
                job.samples_per_pixel = self.samples;
                job.max_depth = self.depth;
                job.image_width = self.width;
            }
            for (name, data) in &images {
                job.auxiliary_image_data
                    .insert(name.clone(), data.clone());
            }
        }

        Ok(jobs)
    }
}

fn load_jobs(path: &Path) -> Result<Vec<RenderJob>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;

    let jobs = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        _ => vec![serde_json::from_value(value)?],
    };
    Ok(jobs)
}

fn load_image(asset: &str) -> Result<(String, ImageData)> {
    let Some((name, path)) = asset.split_once('=') else {
        bail!("Image asset must be given as name=path, got '{}'", asset);
    };

    let rgba = image::open(path)
        .with_context(|| format!("Failed to load image {}", path))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded image '{}' ({}x{}) from {}", name, width, height, path);

    Ok((name.to_string(), ImageData::new(width, height, rgba.into_raw())))
}

fn output_path(base: &Path, index: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "render".to_string());
    let ext = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    base.with_file_name(format!("{}-{}.{}", stem, index, ext))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let jobs = args.jobs()?;
    let count = jobs.len();
    if count == 0 {
        bail!("No render jobs given");
    }

    let start = Instant::now();
    let receiver = launch(jobs, args.channel_capacity).context("Failed to start render")?;

    let mut images: HashMap<usize, RgbImage> = HashMap::new();
    let mut finished = 0;

    for batch in receiver.iter() {
        let image = images
            .entry(batch.unit_id)
            .or_insert_with(|| RgbImage::new(batch.image_width, batch.image_height));

        // Rendered rows count up from the bottom, image rows from the top
        for pixel in &batch.pixels {
            let row = image.height() - 1 - pixel.y;
            image.put_pixel(pixel.x, row, Rgb(pixel.rgb));
        }

        if batch.done {
            finished += 1;
            let path = output_path(&args.output, batch.unit_id, count);
            image
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            log::info!("Saved {}", path.display());
        }
    }

    if finished < count {
        bail!("{} of {} renders did not finish", count - finished, count);
    }

    log::info!("Rendered {} image(s) in {:.2}s", count, start.elapsed().as_secs_f64());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_suffix() {
        let base = Path::new("out/render.png");
        assert_eq!(output_path(base, 0, 1), PathBuf::from("out/render.png"));
        assert_eq!(output_path(base, 2, 3), PathBuf::from("out/render-2.png"));
    }

    #[test]
    fn test_cli_builds_single_job() {
        let args = Args::parse_from([
            "ember", "--scene", "6", "--rows", "2", "--cols", "3", "--pattern", "outside-in",
            "--samples", "4", "--width", "64",
        ]);
        let jobs = args.jobs().expect("no files to read");

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].scene_selector, 6);
        assert_eq!((jobs[0].rows(), jobs[0].cols()), (2, 3));
        assert_eq!(jobs[0].pattern, Pattern::OutsideIn);
        assert_eq!(jobs[0].samples_per_pixel, Some(4));
        assert_eq!(jobs[0].image_width, Some(64));
        assert_eq!(jobs[0].max_depth, None);
    }

    #[test]
    fn test_bad_image_asset() {
        assert!(load_image("no-separator").is_err());
    }
}
