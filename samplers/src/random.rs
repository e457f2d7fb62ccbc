//! Random Sampler.

use strata_core::geometry::*;
use strata_core::hash::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::rng::*;
use strata_core::sampler::*;

/// Number of random values reserved for each pixel sample.
const SAMPLE_STRIDE: i64 = 65536;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
/// Each pixel sample draws from its own stream so results do not depend on
/// which thread renders a pixel.
#[derive(Clone)]
pub struct RandomSampler {
    /// Number of samples to generate for each pixel.
    pub samples_per_pixel: usize,

    /// Seed mixed into every pixel stream.
    pub seed: u64,

    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Seed mixed into every pixel stream.
    pub fn new(samples_per_pixel: usize, seed: u64) -> Self {
        Self {
            samples_per_pixel: max(1, samples_per_pixel),
            seed,
            rng: RNG::default(),
        }
    }
}

impl Sampler for RandomSampler {
    /// Returns the number of samples generated for each pixel.
    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    /// Returns a copy for a rendering thread. Pixel streams only depend on the
    /// pixel, the sample index and the original seed.
    ///
    /// * `_seed` - Unused.
    fn clone_sampler(&self, _seed: u64) -> Box<dyn Sampler + Send> {
        Box::new(self.clone())
    }

    /// Selects the stream for a pixel and skips to the sample's values.
    ///
    /// * `p`            - The pixel.
    /// * `sample_index` - Index of the sample within the pixel.
    fn start_pixel_sample(&mut self, p: &Point2i, sample_index: usize) {
        let pixel_hash = HashBuffer::new()
            .u64(p.x as u64)
            .u64(p.y as u64)
            .u64(self.seed)
            .finish();
        self.rng.set_sequence(pixel_hash, mix_bits(self.seed));
        self.rng.advance(sample_index as i64 * SAMPLE_STRIDE);
    }

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f {
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f::new(x, y)
    }
}

impl From<(&ParamSet, &Options)> for RandomSampler {
    /// Create a `RandomSampler` from given parameter set and options.
    ///
    /// * `p` - A tuple containing parameter set and options.
    fn from(p: (&ParamSet, &Options)) -> Self {
        let (params, options) = p;
        let mut samples_per_pixel = params.find_one_int("pixelsamples", 16);
        if samples_per_pixel < 1 {
            warn!("pixelsamples {} is not positive. Using 1.", samples_per_pixel);
            samples_per_pixel = 1;
        }
        if options.quick_render {
            samples_per_pixel = max(1, samples_per_pixel / 4);
        }
        let seed = params.find_one_int("seed", options.seed);
        Self::new(samples_per_pixel as usize, seed as u64)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(sampler: &mut RandomSampler, p: Point2i, index: usize) -> Vec<Float> {
        sampler.start_pixel_sample(&p, index);
        sampler.get_nd(8)
    }

    #[test]
    fn pixel_samples_are_reproducible() {
        let mut a = RandomSampler::new(4, 7);
        let mut b = a.clone();
        let p = Point2i::new(3, 5);

        // Interleaving other pixels does not change the values.
        let first = draw(&mut a, p, 2);
        let _ = draw(&mut b, Point2i::new(0, 0), 0);
        assert_eq!(first, draw(&mut b, p, 2));
    }

    #[test]
    fn streams_differ_between_pixels_samples_and_seeds() {
        let mut s = RandomSampler::new(4, 7);
        let p = Point2i::new(3, 5);
        let base = draw(&mut s, p, 0);
        assert_ne!(base, draw(&mut s, p, 1));
        assert_ne!(base, draw(&mut s, Point2i::new(4, 5), 0));

        let mut other = RandomSampler::new(4, 8);
        assert_ne!(base, draw(&mut other, p, 0));
    }

    #[test]
    fn quick_render_quarters_sample_count() {
        let mut params = ParamSet::new();
        params.add_int("pixelsamples", &[64]);
        let quick = Options::new(0, 1, true, true, None);
        assert_eq!(RandomSampler::from((&params, &quick)).samples_per_pixel, 16);

        params.add_int("pixelsamples", &[2]);
        assert_eq!(RandomSampler::from((&params, &quick)).samples_per_pixel, 1);
    }

    #[test]
    fn values_are_in_unit_interval() {
        let mut s = RandomSampler::new(1, 0);
        s.start_pixel_sample(&Point2i::new(1, 1), 0);
        for _ in 0..1000 {
            let v = s.get_1d();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
