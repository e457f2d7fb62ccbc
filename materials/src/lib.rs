//! Materials

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod coated_conductor;
mod coated_diffuse;
mod common;
mod conductor;
mod dielectric;
mod hair;
mod matte;
mod measured;
mod subsurface;
mod thin_dielectric;

// Re-export
pub use coated_conductor::*;
pub use coated_diffuse::*;
pub use conductor::*;
pub use dielectric::*;
pub use hair::*;
pub use matte::*;
pub use measured::*;
pub use subsurface::*;
pub use thin_dielectric::*;

use std::convert::TryFrom;
use std::sync::Arc;
use strata_core::material::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;

/// Creates a material by name. `interface` returns `None`; such surfaces only
/// delimit participating media. Unknown names and measured tables that fail
/// to load are reported and replaced with a matte material.
///
/// * `name`    - Material name.
/// * `params`  - Parameter set.
/// * `options` - Rendering options.
pub fn create_material(name: &str, params: &ParamSet, options: &Options) -> Option<ArcMaterial> {
    let material: ArcMaterial = match name {
        "interface" | "" | "none" => return None,
        "matte" | "diffuse" => Arc::new(MatteMaterial::from(params)),
        "coateddiffuse" => Arc::new(CoatedDiffuseMaterial::from((params, options))),
        "coatedconductor" => Arc::new(CoatedConductorMaterial::from((params, options))),
        "conductor" => Arc::new(ConductorMaterial::from(params)),
        "dielectric" => Arc::new(DielectricMaterial::from((params, options))),
        "thindielectric" => Arc::new(ThinDielectricMaterial::from((params, options))),
        "hair" => Arc::new(HairMaterial::from((params, options))),
        "measured" => match MeasuredMaterial::try_from(params) {
            Ok(material) => Arc::new(material),
            Err(err) => {
                options.error(&format!("{} Using \"matte\".", err));
                Arc::new(MatteMaterial::from(params))
            }
        },
        "subsurface" => Arc::new(SubsurfaceMaterial::from((params, options))),
        _ => {
            options.error(&format!("Material \"{}\" unknown. Using \"matte\".", name));
            Arc::new(MatteMaterial::from(params))
        }
    };
    debug!("Created material \"{}\"", name);
    Some(material)
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_has_no_material() {
        let options = Options::new(0, 1, true, false, None);
        assert!(create_material("interface", &ParamSet::new(), &options).is_none());
    }

    #[test]
    fn every_named_material_is_created() {
        let options = Options::new(0, 1, true, false, None);
        for name in [
            "matte",
            "coateddiffuse",
            "coatedconductor",
            "conductor",
            "dielectric",
            "thindielectric",
            "hair",
            "subsurface",
            "measured",
            "velvet",
        ] {
            assert!(create_material(name, &ParamSet::new(), &options).is_some(), "{}", name);
        }
    }
}
