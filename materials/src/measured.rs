//! Measured Material

use strata_core::interaction::*;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::reflection::*;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};

lazy_static! {
    /// Caches BSDF table data by file path.
    static ref BSDF_TABLES: Mutex<HashMap<String, Arc<FourierBSDFTable>>> = Mutex::new(HashMap::new());
}

/// Materials using measured or synthetic BSDF data tabulated into a Fourier
/// basis in the azimuth difference.
#[derive(Clone, Debug)]
pub struct MeasuredMaterial {
    /// Stores the measured Fourier BSDF data.
    bsdf_table: Arc<FourierBSDFTable>,
}

impl MeasuredMaterial {
    /// Create a new `MeasuredMaterial` from a loaded table.
    ///
    /// * `bsdf_table` - The tabulated BSDF.
    pub fn new(bsdf_table: Arc<FourierBSDFTable>) -> Self {
        Self { bsdf_table }
    }

    /// Loads a table from a file, reusing previously loaded tables.
    ///
    /// * `path` - Path to the Fourier BSDF data file.
    pub fn load(path: &str) -> Result<Self, String> {
        let mut tables = BSDF_TABLES.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(table) = tables.get(path) {
            return Ok(Self::new(Arc::clone(table)));
        }

        let table = Arc::new(FourierBSDFTable::from_file(path)?);
        info!(
            "Loaded measured BSDF {}: {} channels, {} zenith angles, eta {}",
            path,
            table.n_channels,
            table.mu.len(),
            table.eta
        );
        tables.insert(path.to_string(), Arc::clone(&table));
        Ok(Self::new(table))
    }
}

impl Material for MeasuredMaterial {
    fn compute_scattering_functions<'scene>(
        &self,
        si: &SurfaceInteraction<'scene>,
        _mode: TransportMode,
    ) -> ScatteringFunctions<'scene> {
        let bxdf = MeasuredBxDF::new(Arc::clone(&self.bsdf_table));
        ScatteringFunctions::surface(BSDF::new(si, BxDF::from(bxdf), Some(self.bsdf_table.eta)))
    }
}

impl TryFrom<&ParamSet> for MeasuredMaterial {
    type Error = String;

    /// Loads the table named by the `filename` parameter.
    ///
    /// * `params` - Parameter set.
    fn try_from(params: &ParamSet) -> Result<Self, Self::Error> {
        let path = params.find_one_string("filename", String::new());
        if path.is_empty() {
            return Err(String::from("Measured material requires a \"filename\" parameter."));
        }
        Self::load(&path)
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_filename_is_an_error() {
        assert!(MeasuredMaterial::try_from(&ParamSet::new()).is_err());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let mut params = ParamSet::new();
        params.add_string("filename", &[String::from("/nonexistent/table.bsdf")]);
        let err = MeasuredMaterial::try_from(&params).expect_err("file does not exist");
        assert!(err.contains("/nonexistent/table.bsdf"));
    }
}
