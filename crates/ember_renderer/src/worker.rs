//! Render units and the launcher that runs them concurrently.
//!
//! A render unit owns its scene and schedule. It renders one tick of
//! pixels at a time and streams the packed results out as [`ResultBatch`]
//! messages, finishing with a batch marked `done`. Units share nothing, so
//! any number of them can run side by side.

use crate::error::RenderError;
use crate::job::{RenderJob, RenderedPixel, ResultBatch};
use crate::renderer::{color_to_rgb, render_pixel};
use crate::scenes::{Scene, ScenePreset};
use crate::schedule::RenderSchedule;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;

/// One independent rendering job.
pub struct RenderUnit {
    id: usize,
    scene: Scene,
    schedule: RenderSchedule,
    min_batch_pixels: usize,
}

impl RenderUnit {
    /// Build the scene and schedule described by `job`.
    pub fn new(id: usize, job: RenderJob) -> Result<Self, RenderError> {
        Self::with_rng(id, job, &mut rand::thread_rng())
    }

    /// Like [`RenderUnit::new`] with the random source used for scene
    /// construction and scheduling supplied by the caller.
    pub fn with_rng(id: usize, job: RenderJob, rng: &mut dyn RngCore) -> Result<Self, RenderError> {
        let preset = ScenePreset::from_selector(job.scene_selector);
        let mut scene = preset.build(&job.auxiliary_image_data, rng)?;

        if let Some(samples) = job.samples_per_pixel {
            scene.config.samples_per_pixel = samples;
        }
        if let Some(depth) = job.max_depth {
            scene.config.max_depth = depth;
        }
        if let Some(width) = job.image_width {
            scene.image_width = width;
        }

        let width = scene.image_width;
        let height = scene.image_height();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage);
        }

        let schedule =
            RenderSchedule::new(width, height, job.rows(), job.cols(), job.pattern, rng);

        log::info!(
            "Unit {}: {:?} at {}x{}, {} spp, depth {}, pattern {}",
            id,
            preset,
            width,
            height,
            scene.config.samples_per_pixel,
            scene.config.max_depth,
            schedule.pattern()
        );

        Ok(Self {
            id,
            scene,
            schedule,
            min_batch_pixels: job.min_batch_pixels,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// `(width, height)` of the image this unit renders.
    pub fn image_size(&self) -> (u32, u32) {
        (self.scene.image_width, self.scene.image_height())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Render every scheduled pixel, handing batches to `emit`.
    ///
    /// Stops early when `emit` returns `false`. The last batch delivered
    /// after a full run is empty and marked `done`. Returns the number of
    /// pixels rendered.
    pub fn run<F>(self, mut emit: F) -> usize
    where
        F: FnMut(ResultBatch) -> bool,
    {
        let RenderUnit {
            id,
            scene,
            schedule,
            min_batch_pixels,
        } = self;
        let (width, height) = (scene.image_width, scene.image_height());
        let total = schedule.remaining();
        let start = Instant::now();
        let mut rng = rand::thread_rng();

        let mut rendered = 0;
        let mut pending = Vec::new();
        let mut next_report = total / 10;

        let batch = |pixels: Vec<RenderedPixel>| ResultBatch {
            unit_id: id,
            image_width: width,
            image_height: height,
            pixels,
            done: false,
        };

        for tick in schedule {
            for (x, y) in tick {
                let color = render_pixel(
                    &scene.camera,
                    scene.world.as_ref(),
                    (x, y),
                    (width, height),
                    &scene.config,
                    &mut rng,
                );
                pending.push(RenderedPixel {
                    x,
                    y,
                    rgb: color_to_rgb(color),
                });
            }

            if pending.len() >= min_batch_pixels {
                rendered += pending.len();
                log::trace!("Unit {}: flushing {} pixels", id, pending.len());
                if !emit(batch(std::mem::take(&mut pending))) {
                    log::debug!("Unit {}: receiver gone after {} pixels", id, rendered);
                    return rendered;
                }
            }

            if rendered >= next_report && rendered < total {
                log::debug!("Unit {}: {}/{} pixels", id, rendered, total);
                next_report = rendered + (total / 10).max(1);
            }
        }

        if !pending.is_empty() {
            rendered += pending.len();
            if !emit(batch(pending)) {
                log::debug!("Unit {}: receiver gone after {} pixels", id, rendered);
                return rendered;
            }
        }

        log::info!(
            "Unit {}: rendered {} pixels in {:.2}s",
            id,
            rendered,
            start.elapsed().as_secs_f64()
        );
        emit(ResultBatch::finished(id, width, height));
        rendered
    }

    /// Run the unit, sending its batches over `sender`.
    pub fn run_to(self, sender: &Sender<ResultBatch>) -> usize {
        self.run(|batch| sender.send(batch).is_ok())
    }
}

/// Start one render unit per job and return the channel their batches
/// arrive on.
///
/// Scenes are built before this returns, so configuration errors surface
/// here. The units then run on a dedicated thread pool with one thread per
/// job. `capacity` bounds the channel; `None` leaves it unbounded. The
/// channel disconnects once every unit has finished, and dropping the
/// receiver stops the units at their next send.
pub fn launch(
    jobs: Vec<RenderJob>,
    capacity: Option<usize>,
) -> Result<Receiver<ResultBatch>, RenderError> {
    let units = jobs
        .into_iter()
        .enumerate()
        .map(|(id, job)| RenderUnit::new(id, job))
        .collect::<Result<Vec<_>, _>>()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(units.len().max(1))
        .thread_name(|i| format!("ember-unit-{}", i))
        .build()?;

    let (sender, receiver) = match capacity {
        Some(capacity) => bounded(capacity),
        None => unbounded(),
    };

    log::info!("Launching {} render units", units.len());

    std::thread::spawn(move || {
        pool.install(|| {
            units
                .into_par_iter()
                .for_each_with(sender, |sender, unit| {
                    unit.run_to(sender);
                });
        });
        log::debug!("All render units finished");
    });

    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn tiny_job(scene: i64) -> RenderJob {
        RenderJob::new(scene)
            .with_quality(1, 2)
            .with_image_width(8)
            .with_grid(2, 2)
    }

    #[test]
    fn test_unit_applies_overrides() {
        let mut rng = StdRng::seed_from_u64(1);
        let unit = RenderUnit::with_rng(3, tiny_job(2), &mut rng).expect("valid job");

        assert_eq!(unit.id(), 3);
        assert_eq!(unit.scene().config.samples_per_pixel, 1);
        assert_eq!(unit.scene().config.max_depth, 2);
        // 16:9 at 8 wide
        assert_eq!(unit.image_size(), (8, 4));
    }

    #[test]
    fn test_zero_width_rejected() {
        let job = tiny_job(2).with_image_width(0);
        assert!(matches!(
            RenderUnit::new(0, job),
            Err(RenderError::EmptyImage)
        ));
    }

    #[test]
    fn test_run_covers_image_then_done() {
        let mut rng = StdRng::seed_from_u64(2);
        let job = tiny_job(9).with_pattern(Pattern::RandomPoints);
        let unit = RenderUnit::with_rng(0, job, &mut rng).expect("valid job");
        let (width, height) = unit.image_size();

        let mut batches = Vec::new();
        let rendered = unit.run(|batch| {
            batches.push(batch);
            true
        });

        assert_eq!(rendered, (width * height) as usize);
        let last = batches.last().expect("at least the done batch");
        assert!(last.done);
        assert!(last.pixels.is_empty());
        assert_eq!(batches.iter().filter(|b| b.done).count(), 1);

        let seen: HashSet<_> = batches
            .iter()
            .flat_map(|b| b.pixels.iter().map(|p| (p.x, p.y)))
            .collect();
        assert_eq!(seen.len(), rendered);
    }

    #[test]
    fn test_min_batch_pixels_groups_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        // 4 buckets give ticks of 4 pixels
        let job = tiny_job(9)
            .with_pattern(Pattern::OutsideIn)
            .with_min_batch_pixels(10);
        let unit = RenderUnit::with_rng(0, job, &mut rng).expect("valid job");

        let mut sizes = Vec::new();
        unit.run(|batch| {
            if !batch.done {
                sizes.push(batch.pixels.len());
            }
            true
        });

        let (last, full) = sizes.split_last().expect("some batches");
        assert!(full.iter().all(|&n| n >= 10));
        assert!(*last > 0);
    }

    #[test]
    fn test_run_stops_when_emit_refuses() {
        let mut rng = StdRng::seed_from_u64(4);
        let unit = RenderUnit::with_rng(0, tiny_job(9), &mut rng).expect("valid job");

        let mut calls = 0;
        let rendered = unit.run(|_| {
            calls += 1;
            false
        });

        assert_eq!(calls, 1);
        assert!(rendered > 0 && rendered < 32);
    }

    #[test]
    fn test_launch_streams_every_unit() {
        let jobs = vec![tiny_job(9), tiny_job(2).with_pattern(Pattern::Random)];
        let receiver = launch(jobs, Some(4)).expect("launch succeeds");

        let mut pixels = [0usize; 2];
        let mut done = [false; 2];
        for batch in receiver.iter() {
            assert!(!done[batch.unit_id], "no batches after done");
            pixels[batch.unit_id] += batch.pixels.len();
            done[batch.unit_id] |= batch.done;
        }

        assert_eq!(done, [true, true]);
        assert_eq!(pixels, [32, 32]);
    }

    #[test]
    fn test_launch_reports_config_errors() {
        let jobs = vec![tiny_job(9), tiny_job(9).with_image_width(0)];
        assert!(matches!(launch(jobs, None), Err(RenderError::EmptyImage)));
    }
}
