//! Sampler Integrator

use super::*;
use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;
use crate::report_stats;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::Bump;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Width and height of the square image tiles handed to worker threads.
pub const TILE_SIZE: Int = 16;

/// Common data for sampler integrators.
pub struct SamplerIntegratorData {
    /// Sampler responsible for choosing points on the image plane from which
    /// to trace rays and for supplying sample positions used by integrators.
    pub sampler: ArcSampler,

    /// The camera.
    pub camera: ArcCamera,

    /// Pixel bounds for the image.
    pub pixel_bounds: Bounds2i,

    /// Maximum number of scattering events.
    pub max_depth: usize,

    /// Rendering options.
    pub options: ArcOptions,

    /// Set to stop rendering. Workers poll it between paths.
    pub abort: Arc<AtomicBool>,
}

impl SamplerIntegratorData {
    /// Create a new `SamplerIntegratorData`.
    ///
    /// * `max_depth`    - Maximum number of scattering events.
    /// * `camera`       - The camera.
    /// * `sampler`      - Sampler responsible for choosing point on image plane
    ///                    from which to trace rays.
    /// * `pixel_bounds` - Pixel bounds for the image.
    /// * `options`      - Rendering options.
    pub fn new(
        max_depth: usize,
        camera: ArcCamera,
        sampler: ArcSampler,
        pixel_bounds: Bounds2i,
        options: ArcOptions,
    ) -> Self {
        Self {
            camera,
            max_depth,
            sampler,
            pixel_bounds,
            options,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true once rendering has been asked to stop.
    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }
}

/// Implements the basis of a rendering process driven by a stream of samples
/// from a `Sampler`. Each sample identifies a point on the image plane at
/// which we compute the light arriving from the scene.
pub trait SamplerIntegrator: Send + Sync {
    /// Returns the common data.
    fn get_data(&self) -> &SamplerIntegratorData;

    /// Preprocess the scene.
    ///
    /// * `scene` - The scene.
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - Scratch memory for the path.
    /// * `depth`   - The starting depth.
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump, depth: usize) -> Spectrum;

    /// Render the scene into the camera's film.
    ///
    /// * `scene` - The scene.
    fn render_samples(&self, scene: &Scene) {
        let data = self.get_data();

        // Compute the tiles covering the part of the image we render.
        let film = data.camera.get_film();
        let bounds = film.get_sample_bounds().intersect(&data.pixel_bounds);
        if bounds.is_empty() {
            warn!("Pixel bounds {:?} do not overlap the image. Nothing to render.", data.pixel_bounds);
            return;
        }
        let tiles = image_tiles(&bounds);

        let n_threads = data.options.threads();
        info!(
            "Rendering {} tiles with {} threads, {} samples per pixel",
            tiles.len(),
            n_threads,
            data.sampler.samples_per_pixel()
        );

        let progress = create_progress_bar(tiles.len() as u64, data.options.quiet);
        progress.set_message("Rendering scene");

        std::thread::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<Bounds2i>(n_threads);

            // Spawn worker threads.
            for worker in 0..n_threads {
                let rx = rx.clone();
                let progress = &progress;
                scope.spawn(move || {
                    let mut sampler = data.sampler.clone_sampler(worker as u64);
                    let mut arena = Bump::new();
                    for tile in rx.iter() {
                        if !data.aborted() {
                            self.render_tile(&tile, scene, &mut sampler, &mut arena);
                        }
                        progress.inc(1);
                    }
                    report_stats!();
                });
            }
            drop(rx);

            // Send work. Workers only exit once the channel closes.
            for tile in tiles {
                if tx.send(tile).is_err() {
                    break;
                }
            }
        });

        if data.aborted() {
            progress.abandon_with_message("Render aborted");
            warn!("Rendering aborted");
        } else {
            progress.finish_with_message("Render complete");
            info!("Rendering finished");
        }
    }

    /// Render every sample of the pixels in an image tile.
    ///
    /// * `tile`    - The tile.
    /// * `scene`   - The scene.
    /// * `sampler` - The worker's sampler.
    /// * `arena`   - The worker's scratch memory.
    fn render_tile(&self, tile: &Bounds2i, scene: &Scene, sampler: &mut dyn Sampler, arena: &mut Bump) {
        let data = self.get_data();
        let film = data.camera.get_film();
        let spp = sampler.samples_per_pixel();

        debug!("Starting image tile {:?}", tile);
        for pixel in tile.iter() {
            for sample_index in 0..spp {
                if data.aborted() {
                    return;
                }

                sampler.start_pixel_sample(&pixel, sample_index);
                let camera_sample = sampler.get_camera_sample(&pixel);
                let mut l = match data.camera.generate_ray(&camera_sample) {
                    Some((mut ray, weight)) if weight > 0.0 => {
                        self.li(&mut ray, scene, sampler, arena, 0) * weight
                    }
                    _ => Spectrum::ZERO,
                };
                arena.reset();

                // Issue warning if unexpected radiance value returned.
                if l.has_nans() {
                    error!(
                        "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
                        pixel.x, pixel.y, sample_index
                    );
                    l = Spectrum::ZERO;
                } else if l.y() < -1e-5 {
                    error!(
                        "Negative luminance value, {}, returned for pixel ({}, {}), sample {}. Setting to black.",
                        l.y(),
                        pixel.x,
                        pixel.y,
                        sample_index
                    );
                    l = Spectrum::ZERO;
                } else if l.y().is_infinite() {
                    error!(
                        "Infinite luminance value returned for pixel ({}, {}), sample {}. Setting to black.",
                        pixel.x, pixel.y, sample_index
                    );
                    l = Spectrum::ZERO;
                }

                film.add_sample(&pixel, &l);
            }
        }
        debug!("Finished image tile {:?}", tile);
    }
}

/// Splits bounds into square tiles of `TILE_SIZE` pixels, clipped to the
/// bounds.
///
/// * `bounds` - The bounds.
pub fn image_tiles(bounds: &Bounds2i) -> Vec<Bounds2i> {
    let mut tiles = vec![];
    let mut y0 = bounds.p_min.y;
    while y0 < bounds.p_max.y {
        let y1 = min(y0 + TILE_SIZE, bounds.p_max.y);
        let mut x0 = bounds.p_min.x;
        while x0 < bounds.p_max.x {
            let x1 = min(x0 + TILE_SIZE, bounds.p_max.x);
            tiles.push(Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1)));
            x0 = x1;
        }
        y0 = y1;
    }
    tiles
}

/// Returns a progress bar counting tiles. It is hidden in quiet mode.
///
/// * `len`   - Number of tiles.
/// * `quiet` - Hide the bar.
pub fn create_progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    progress.set_style(style);
    progress
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_cover_bounds_exactly_once() {
        let bounds = Bounds2i::new(Point2i::new(3, 1), Point2i::new(40, 20));
        let tiles = image_tiles(&bounds);
        assert_eq!(tiles.len(), 3 * 2);

        let covered: i32 = tiles.iter().map(|t| t.area()).sum();
        assert_eq!(covered, bounds.area());
        assert!(tiles.iter().all(|t| !t.is_empty()));
        assert!(tiles
            .iter()
            .all(|t| t.p_max.x - t.p_min.x <= TILE_SIZE && t.p_max.y - t.p_min.y <= TILE_SIZE));
    }

    #[test]
    fn empty_bounds_have_no_tiles() {
        let bounds = Bounds2i::new(Point2i::new(4, 4), Point2i::new(4, 9));
        assert!(image_tiles(&bounds).is_empty());
    }
}
