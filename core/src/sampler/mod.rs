//! Sampler

use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;

/// Sampler trait provides a stream of uniform sample values in [0, 1) for
/// each pixel sample.
pub trait Sampler {
    /// Returns the number of samples generated for each pixel.
    fn samples_per_pixel(&self) -> usize;

    /// Generates a new instance of an initial `Sampler` for use by a rendering
    /// thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send>;

    /// Resets the sample stream for the given pixel and sample index.
    ///
    /// * `p`            - The pixel.
    /// * `sample_index` - Index of the sample within the pixel.
    fn start_pixel_sample(&mut self, p: &Point2i, sample_index: usize);

    /// Returns the sample value for the next dimension of the current sample
    /// vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current
    /// sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns the next `n` dimensions of the current sample vector.
    ///
    /// * `n` - Number of dimensions.
    fn get_nd(&mut self, n: usize) -> Vec<Float> {
        (0..n).map(|_| self.get_1d()).collect()
    }

    /// Returns a `CameraSample` for the given pixel.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(
            p_raster.x as Float + film_sample.x,
            p_raster.y as Float + film_sample.y,
        );
        let time = self.get_1d();
        CameraSample::new(p_film, time)
    }
}

// Implement `Sampler` so the boxed samplers returned by `clone_sampler()` can
// be passed where `&mut dyn Sampler` is expected.
impl<S: Sampler + ?Sized> Sampler for Box<S> {
    #[inline]
    fn samples_per_pixel(&self) -> usize {
        (**self).samples_per_pixel()
    }

    #[inline]
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler + Send> {
        (**self).clone_sampler(seed)
    }

    #[inline]
    fn start_pixel_sample(&mut self, p: &Point2i, sample_index: usize) {
        (**self).start_pixel_sample(p, sample_index);
    }

    #[inline]
    fn get_1d(&mut self) -> Float {
        (**self).get_1d()
    }

    #[inline]
    fn get_2d(&mut self) -> Point2f {
        (**self).get_2d()
    }

    #[inline]
    fn get_nd(&mut self, n: usize) -> Vec<Float> {
        (**self).get_nd(n)
    }

    #[inline]
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        (**self).get_camera_sample(p_raster)
    }
}

/// Atomic reference counted `Sampler` prototype.
pub type ArcSampler = std::sync::Arc<dyn Sampler + Send + Sync>;
