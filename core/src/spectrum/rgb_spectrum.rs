//! RGB Spectrum.

use super::*;
use crate::pbrt::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// Number of RGB samples.
pub const RGB_SAMPLES: usize = 3;

/// Spectral quantity stored as linear RGB coefficients.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct RGBSpectrum {
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Spectrum with all values set to 0.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// Spectrum with all values set to 1.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Create a new `RGBSpectrum` with a constant value in each channel.
    ///
    /// * `v` - Constant value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a new `RGBSpectrum` from RGB coefficients.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub const fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if any channel is infinite.
    pub fn has_infs(&self) -> bool {
        self.c.iter().any(|v| v.is_infinite())
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns the maximum channel value.
    pub fn max_component_value(&self) -> Float {
        self.c[1..].iter().fold(self.c[0], |m, v| max(m, *v))
    }

    /// Returns the average of the channels.
    pub fn average(&self) -> Float {
        self.c.iter().sum::<Float>() / RGB_SAMPLES as Float
    }

    /// Returns the luminance.
    pub fn y(&self) -> Float {
        rgb_to_xyz(&self.c)[1]
    }

    /// Applies `f` to each channel.
    ///
    /// * `f` - Function to apply.
    pub fn map<F: Fn(Float) -> Float>(&self, f: F) -> Self {
        Self {
            c: [f(self.c[0]), f(self.c[1]), f(self.c[2])],
        }
    }

    /// Takes the square root of all channels.
    pub fn sqrt(&self) -> Self {
        self.map(|v| v.sqrt())
    }

    /// Sets channel values `v` to `e^v`.
    pub fn exp(&self) -> Self {
        self.map(|v| v.exp())
    }

    /// Clamps the channels to `[low, high]`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        self.map(|v| clamp(v, low, high))
    }

    /// Divides channel-wise, returning zero where the divisor is zero.
    ///
    /// * `d` - The divisor.
    pub fn safe_div(&self, d: &Self) -> Self {
        Self {
            c: [
                if d.c[0] != 0.0 { self.c[0] / d.c[0] } else { 0.0 },
                if d.c[1] != 0.0 { self.c[1] / d.c[1] } else { 0.0 },
                if d.c[2] != 0.0 { self.c[2] / d.c[2] } else { 0.0 },
            ],
        }
    }
}

impl From<Float> for RGBSpectrum {
    /// Create a new `RGBSpectrum` with a constant value in each channel.
    ///
    /// * `v` - Constant value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl From<[Float; 3]> for RGBSpectrum {
    /// Create a new `RGBSpectrum` from RGB coefficients.
    ///
    /// * `c` - RGB coefficients.
    fn from(c: [Float; 3]) -> Self {
        Self { c }
    }
}

macro_rules! spectrum_binop {
    ($tr: ident, $f: ident, $tra: ident, $fa: ident, $op: tt) => {
        impl $tr for RGBSpectrum {
            type Output = Self;

            fn $f(self, other: Self) -> Self::Output {
                Self {
                    c: [
                        self.c[0] $op other.c[0],
                        self.c[1] $op other.c[1],
                        self.c[2] $op other.c[2],
                    ],
                }
            }
        }

        impl $tr<Float> for RGBSpectrum {
            type Output = Self;

            fn $f(self, f: Float) -> Self::Output {
                Self {
                    c: [self.c[0] $op f, self.c[1] $op f, self.c[2] $op f],
                }
            }
        }

        impl $tra for RGBSpectrum {
            fn $fa(&mut self, other: Self) {
                *self = *self $op other;
            }
        }

        impl $tra<Float> for RGBSpectrum {
            fn $fa(&mut self, f: Float) {
                *self = *self $op f;
            }
        }
    };
}

spectrum_binop!(Add, add, AddAssign, add_assign, +);
spectrum_binop!(Sub, sub, SubAssign, sub_assign, -);
spectrum_binop!(Mul, mul, MulAssign, mul_assign, *);
spectrum_binop!(Div, div, DivAssign, div_assign, /);

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales the channels of a `RGBSpectrum`.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> Self::Output {
        s * self
    }
}

impl Neg for RGBSpectrum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|v| -v)
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl fmt::Debug for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn arithmetic_is_channel_wise() {
        let a = RGBSpectrum::from_rgb(1.0, 2.0, 3.0);
        let b = RGBSpectrum::from_rgb(2.0, 2.0, 0.0);
        assert_eq!((a * b).to_rgb(), [2.0, 4.0, 0.0]);
        assert_eq!((a + b).to_rgb(), [3.0, 4.0, 3.0]);
        assert_eq!(a.safe_div(&b).to_rgb(), [0.5, 1.0, 0.0]);
        assert_eq!(a.max_component_value(), 3.0);
        assert!(approx_eq!(f32, a.average(), 2.0, ulps = 2));
        assert!(RGBSpectrum::ZERO.is_black());
        assert!(!(a / 0.0).is_black());
    }

    #[test]
    fn white_has_unit_luminance() {
        assert!(approx_eq!(f32, RGBSpectrum::ONE.y(), 1.0, epsilon = 1e-4));
    }
}
