//! Film

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::RwLock;

/// Pixel data.
#[derive(Copy, Clone, Default)]
pub struct Pixel {
    /// Stores the running sums of spectral pixel contributions using XYZ colors.
    pub xyz: [Float; 3],

    /// Holds the sum of filter weight values for the sample contributions to
    /// the pixel.
    pub filter_weight_sum: Float,
}

/// Models the sensing device in a simulated camera. Samples are reconstructed
/// with a box filter covering one pixel.
pub struct Film {
    /// The overall image resolution in pixels.
    pub full_resolution: Point2i,

    /// Filename of output image.
    pub filename: String,

    /// Scale factor for pixel values.
    pub scale: Float,

    /// Stores the image pixels.
    pixels: RwLock<Vec<Pixel>>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution` - The overall image resolution in pixels.
    /// * `filename`   - Filename of output image.
    /// * `scale`      - Scale factor for pixel values.
    pub fn new(resolution: &Point2i, filename: &str, scale: Float) -> Self {
        let n = max(0, resolution.x) as usize * max(0, resolution.y) as usize;
        Self {
            full_resolution: *resolution,
            filename: filename.to_string(),
            scale,
            pixels: RwLock::new(vec![Pixel::default(); n]),
        }
    }

    /// Returns the area to be sampled for the image.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i::new(0, 0), self.full_resolution)
    }

    /// Returns the offset of a pixel in the pixel buffer.
    ///
    /// * `p` - The pixel.
    fn get_pixel_offset(&self, p: &Point2i) -> usize {
        (p.y * self.full_resolution.x + p.x) as usize
    }

    /// Adds a radiance sample to a pixel. Samples outside the image are
    /// ignored.
    ///
    /// * `p` - The pixel.
    /// * `l` - The radiance sample.
    pub fn add_sample(&self, p: &Point2i, l: &Spectrum) {
        if p.x < 0 || p.y < 0 || p.x >= self.full_resolution.x || p.y >= self.full_resolution.y {
            return;
        }

        let xyz = rgb_to_xyz(&l.to_rgb());
        let offset = self.get_pixel_offset(p);

        // A poisoned lock only means another worker panicked; keep accumulating.
        let mut pixels = match self.pixels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let pixel = &mut pixels[offset];
        for i in 0..3 {
            pixel.xyz[i] += xyz[i];
        }
        pixel.filter_weight_sum += 1.0;
    }

    /// Returns the final linear RGB values of the image, row major.
    pub fn get_rgb(&self) -> Vec<[Float; 3]> {
        let pixels = match self.pixels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        pixels
            .iter()
            .map(|pixel| {
                let mut rgb = xyz_to_rgb(&pixel.xyz);
                for v in rgb.iter_mut() {
                    if pixel.filter_weight_sum != 0.0 {
                        *v = max(0.0, *v / pixel.filter_weight_sum);
                    }
                    *v *= self.scale;
                }
                rgb
            })
            .collect()
    }

    /// Returns the image as gamma corrected 8-bit sRGB values, row major.
    pub fn to_srgb8(&self) -> Vec<u8> {
        self.get_rgb()
            .iter()
            .flat_map(|rgb| rgb.iter().map(|v| clamp(255.0 * gamma_correct(*v) + 0.5, 0.0, 255.0) as u8))
            .collect()
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn samples_are_averaged() {
        let film = Film::new(&Point2i::new(2, 2), "test.png", 1.0);
        let p = Point2i::new(1, 0);
        film.add_sample(&p, &Spectrum::new(0.25));
        film.add_sample(&p, &Spectrum::new(0.75));
        film.add_sample(&Point2i::new(5, 5), &Spectrum::new(100.0));

        let rgb = film.get_rgb();
        assert_eq!(rgb.len(), 4);
        for c in rgb[1].iter() {
            assert!(approx_eq!(Float, *c, 0.5, epsilon = 1e-3));
        }
        assert_eq!(rgb[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn srgb_output_is_clamped() {
        let film = Film::new(&Point2i::new(1, 1), "test.png", 1.0);
        film.add_sample(&Point2i::new(0, 0), &Spectrum::new(10.0));
        assert_eq!(film.to_srgb8(), vec![255, 255, 255]);
    }
}
