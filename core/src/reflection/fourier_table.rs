//! Fourier BSDF Table

use crate::interpolation::*;
use crate::pbrt::*;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};

/// The first 8 bytes of a tabulated BSDF file: `SCATFUN` followed by version `0x01`.
pub const FOURIER_TABLE_HEADER: [u8; 8] = *b"SCATFUN\x01";

/// Measured scattering data stored as Fourier series in the azimuth
/// difference, tabulated over pairs of zenith angle cosines.
#[derive(Clone, Debug)]
pub struct FourierBSDFTable {
    /// Relative index of refraction across the surface.
    pub eta: Float,

    /// Maximum Fourier order over all direction pairs.
    pub m_max: usize,

    /// Number of spectral channels. 1 for monochromatic data, 3 for
    /// luminance, red and blue.
    pub n_channels: usize,

    /// Zenith angle cosines in increasing order.
    pub mu: Vec<Float>,

    /// Fourier order for each (μi, μo) pair.
    pub m: Vec<usize>,

    /// Coefficients for all pairs.
    pub a: Vec<Float>,

    /// Offset into `a` of the coefficients of each pair.
    pub a_offset: Vec<usize>,

    /// First coefficient of each pair.
    pub a0: Vec<Float>,

    /// Per-row CDFs over μi used for importance sampling.
    pub cdf: Vec<Float>,

    /// `1/i` for i in `[0, m_max)`.
    pub recip: Vec<Float>,
}

/// Maps an I/O failure to a descriptive message.
///
/// * `what` - What was being read.
fn read_error(what: &str) -> impl Fn(std::io::Error) -> String + '_ {
    move |err| format!("Error reading {}. {}.", what, err)
}

/// Reads `count` little-endian `i32` values.
///
/// * `reader` - The source.
/// * `count`  - Number of values.
/// * `what`   - Description for error messages.
fn read_i32_vec<R: Read>(reader: &mut R, count: usize, what: &str) -> Result<Vec<i32>, String> {
    let mut buffer = vec![0_i32; count];
    reader
        .read_i32_into::<LittleEndian>(&mut buffer)
        .map_err(read_error(what))?;
    Ok(buffer)
}

/// Reads `count` little-endian `f32` values.
///
/// * `reader` - The source.
/// * `count`  - Number of values.
/// * `what`   - Description for error messages.
fn read_f32_vec<R: Read>(reader: &mut R, count: usize, what: &str) -> Result<Vec<Float>, String> {
    let mut buffer = vec![0.0_f32; count];
    reader
        .read_f32_into::<LittleEndian>(&mut buffer)
        .map_err(read_error(what))?;
    Ok(buffer)
}

/// Converts a count read from the file.
///
/// * `v`    - The value.
/// * `what` - Description for error messages.
fn to_count(v: i32, what: &str) -> Result<usize, String> {
    usize::try_from(v).map_err(|_| format!("Invalid {} {}.", what, v))
}

impl FourierBSDFTable {
    /// Loads a table from a binary file.
    ///
    /// * `path` - The path to the file.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let file = File::open(path).map_err(|err| format!("Could not open {}. {}", path, err))?;
        Self::from_reader(&mut BufReader::new(file)).map_err(|err| format!("{}: {}", path, err))
    }

    /// Loads a table from any byte source.
    ///
    /// * `reader` - The source.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, String> {
        let mut header = [0_u8; 8];
        reader.read_exact(&mut header).map_err(read_error("header"))?;
        if header != FOURIER_TABLE_HEADER {
            return Err(format!(
                "Invalid header '{}'. Expected '{}'.",
                String::from_utf8_lossy(&header),
                String::from_utf8_lossy(&FOURIER_TABLE_HEADER),
            ));
        }

        let fields = read_i32_vec(reader, 9, "table dimensions")?;
        let flags = fields[0];
        let n_mu = to_count(fields[1], "zenith count")?;
        let n_coeffs = to_count(fields[2], "coefficient count")?;
        let m_max = to_count(fields[3], "maximum order")?;
        let n_channels = to_count(fields[4], "channel count")?;
        let n_bases = fields[5];
        let eta = reader.read_f32::<LittleEndian>().map_err(read_error("eta"))?;
        let _unused = read_i32_vec(reader, 4, "reserved fields")?;

        // Only uniform monochromatic and RGB tables are supported.
        if flags != 1 || (n_channels != 1 && n_channels != 3) || n_bases != 1 {
            return Err(String::from("Unsupported BSDF file format"));
        }
        if n_mu < 2 {
            return Err(format!("Expected at least 2 zenith samples, found {}", n_mu));
        }

        let n_pairs = n_mu * n_mu;
        let mu = read_f32_vec(reader, n_mu, "zenith cosines")?;
        let cdf = read_f32_vec(reader, n_pairs, "CDF")?;
        let offset_and_length = read_i32_vec(reader, n_pairs * 2, "coefficient offsets")?;
        let a = read_f32_vec(reader, n_coeffs, "coefficients")?;

        let mut a0 = vec![0.0; n_pairs];
        let mut a_offset = vec![0_usize; n_pairs];
        let mut m = vec![0_usize; n_pairs];
        for i in 0..n_pairs {
            let offset = to_count(offset_and_length[2 * i], "coefficient offset")?;
            let length = to_count(offset_and_length[2 * i + 1], "coefficient length")?;
            if length > m_max || offset + length * n_channels > n_coeffs {
                return Err(format!("Coefficient range {}+{} out of bounds", offset, length));
            }

            a_offset[i] = offset;
            m[i] = length;
            a0[i] = if length > 0 { a[offset] } else { 0.0 };
        }

        let recip = (0..m_max).map(|i| 1.0 / i as Float).collect();

        Ok(Self {
            eta,
            m_max,
            n_channels,
            mu,
            m,
            a,
            a_offset,
            a0,
            cdf,
            recip,
        })
    }

    /// Returns the order and coefficients for a pair of offsets into `mu`.
    ///
    /// * `offset_i` - Offset for the incident direction.
    /// * `offset_o` - Offset for the outgoing direction.
    pub fn get_ak(&self, offset_i: usize, offset_o: usize) -> (usize, &[Float]) {
        let offset = offset_o * self.mu.len() + offset_i;
        (self.m[offset], &self.a[self.a_offset[offset]..])
    }

    /// Returns Catmull-Rom weights and the index offset for a zenith cosine.
    ///
    /// * `cos_theta` - The zenith angle cosine.
    pub fn get_weights_and_offset(&self, cos_theta: Float) -> Option<([Float; 4], isize)> {
        catmull_rom_weights(&self.mu, cos_theta)
    }

    /// Accumulates the interpolated Fourier coefficients for a direction
    /// pair. Returns the coefficients laid out channel by channel with stride
    /// `m_max`, and the largest order used.
    ///
    /// * `mu_i`     - Incident zenith cosine.
    /// * `mu_o`     - Outgoing zenith cosine.
    /// * `channels` - Number of channels to accumulate.
    pub fn interpolate_ak(&self, mu_i: Float, mu_o: Float, channels: usize) -> Option<(Vec<Float>, usize)> {
        let (weights_i, offset_i) = self.get_weights_and_offset(mu_i)?;
        let (weights_o, offset_o) = self.get_weights_and_offset(mu_o)?;

        let mut ak = vec![0.0; self.m_max * channels];
        let mut m_max = 0;
        for (b, wt_o) in weights_o.iter().enumerate() {
            for (a, wt_i) in weights_i.iter().enumerate() {
                let weight = wt_i * wt_o;
                if weight == 0.0 {
                    continue;
                }

                let (m, ap) = self.get_ak((offset_i + a as isize) as usize, (offset_o + b as isize) as usize);
                m_max = max(m_max, m);
                for c in 0..channels {
                    for k in 0..m {
                        ak[c * self.m_max + k] += weight * ap[c * m + k];
                    }
                }
            }
        }
        Some((ak, m_max))
    }
}

// ---- Tests ----

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    /// Serializes a monochromatic table holding one constant coefficient for
    /// every direction pair.
    pub(crate) fn constant_table_bytes(value: Float, eta: Float) -> Vec<u8> {
        let mu: [Float; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];
        let n_mu = mu.len();
        let (row_cdf, _) = integrate_catmull_rom(&mu, &[value; 5]);

        let mut bytes = FOURIER_TABLE_HEADER.to_vec();
        for v in [1, n_mu as i32, (n_mu * n_mu) as i32, 1, 1, 1, 0, 0, 0] {
            bytes.write_i32::<LittleEndian>(v).unwrap();
        }
        bytes.write_f32::<LittleEndian>(eta).unwrap();
        for _ in 0..4 {
            bytes.write_i32::<LittleEndian>(0).unwrap();
        }
        for v in mu {
            bytes.write_f32::<LittleEndian>(v).unwrap();
        }
        for _ in 0..n_mu {
            for v in row_cdf.iter() {
                bytes.write_f32::<LittleEndian>(*v).unwrap();
            }
        }
        for i in 0..n_mu * n_mu {
            bytes.write_i32::<LittleEndian>(i as i32).unwrap();
            bytes.write_i32::<LittleEndian>(1).unwrap();
        }
        for _ in 0..n_mu * n_mu {
            bytes.write_f32::<LittleEndian>(value).unwrap();
        }
        bytes
    }

    #[test]
    fn reads_table_from_bytes() {
        let bytes = constant_table_bytes(0.25, 1.0);
        let table = FourierBSDFTable::from_reader(&mut bytes.as_slice()).unwrap();
        assert_eq!(table.mu.len(), 5);
        assert_eq!(table.m_max, 1);
        assert_eq!(table.n_channels, 1);
        assert_eq!(table.a0, vec![0.25; 25]);
        assert_eq!(table.eta, 1.0);

        let (ak, m) = table.interpolate_ak(0.3, -0.7, 1).unwrap();
        assert_eq!(m, 1);
        assert!((ak[0] - 0.25).abs() < 1e-5);
        assert!(table.interpolate_ak(1.5, 0.0, 1).is_none());
    }

    #[test]
    fn rejects_bad_header() {
        let mut bytes = constant_table_bytes(0.25, 1.0);
        bytes[0] = b'X';
        let err = FourierBSDFTable::from_reader(&mut bytes.as_slice()).unwrap_err();
        assert!(err.starts_with("Invalid header"));
    }

    #[test]
    fn rejects_truncated_data() {
        let bytes = constant_table_bytes(0.25, 1.0);
        let truncated = &bytes[..bytes.len() - 8];
        assert!(FourierBSDFTable::from_reader(&mut &truncated[..]).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = FourierBSDFTable::from_file("/nonexistent/table.bsdf").unwrap_err();
        assert!(err.starts_with("Could not open"));
    }
}
