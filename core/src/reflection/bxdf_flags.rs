//! BxDF flags and transport mode.

use bitflags::bitflags;
use std::ops::Not;

bitflags! {
    /// Capabilities of a scattering distribution.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BxDFFlags: u8 {
        const REFLECTION = 0b00000001;
        const TRANSMISSION = 0b00000010;
        const DIFFUSE = 0b00000100;
        const GLOSSY = 0b00001000;
        const SPECULAR = 0b00010000;

        const DIFFUSE_REFLECTION = Self::DIFFUSE.bits() | Self::REFLECTION.bits();
        const DIFFUSE_TRANSMISSION = Self::DIFFUSE.bits() | Self::TRANSMISSION.bits();
        const GLOSSY_REFLECTION = Self::GLOSSY.bits() | Self::REFLECTION.bits();
        const GLOSSY_TRANSMISSION = Self::GLOSSY.bits() | Self::TRANSMISSION.bits();
        const SPECULAR_REFLECTION = Self::SPECULAR.bits() | Self::REFLECTION.bits();
        const SPECULAR_TRANSMISSION = Self::SPECULAR.bits() | Self::TRANSMISSION.bits();
        const ALL = Self::DIFFUSE.bits()
            | Self::GLOSSY.bits()
            | Self::SPECULAR.bits()
            | Self::REFLECTION.bits()
            | Self::TRANSMISSION.bits();
    }
}

impl BxDFFlags {
    /// Returns true if there is a reflective lobe.
    pub fn is_reflective(&self) -> bool {
        self.contains(Self::REFLECTION)
    }

    /// Returns true if there is a transmissive lobe.
    pub fn is_transmissive(&self) -> bool {
        self.contains(Self::TRANSMISSION)
    }

    /// Returns true if there is a diffuse lobe.
    pub fn is_diffuse(&self) -> bool {
        self.contains(Self::DIFFUSE)
    }

    /// Returns true if there is a glossy lobe.
    pub fn is_glossy(&self) -> bool {
        self.contains(Self::GLOSSY)
    }

    /// Returns true if there is a delta lobe.
    pub fn is_specular(&self) -> bool {
        self.contains(Self::SPECULAR)
    }

    /// Returns true if there is a lobe that is not a delta distribution.
    pub fn is_non_specular(&self) -> bool {
        self.intersects(Self::DIFFUSE | Self::GLOSSY)
    }
}

bitflags! {
    /// Restricts sampling to reflection and/or transmission lobes.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BxDFReflTransFlags: u8 {
        const REFLECTION = 0b01;
        const TRANSMISSION = 0b10;
        const ALL = Self::REFLECTION.bits() | Self::TRANSMISSION.bits();
    }
}

impl Default for BxDFReflTransFlags {
    fn default() -> Self {
        Self::ALL
    }
}

/// Indicates whether radiance or importance is carried along a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Paths started at the camera.
    Radiance,

    /// Paths started at a light source.
    Importance,
}

impl Default for TransportMode {
    fn default() -> Self {
        Self::Radiance
    }
}

impl Not for TransportMode {
    type Output = Self;

    /// Returns the adjoint mode.
    fn not(self) -> Self::Output {
        match self {
            Self::Radiance => Self::Importance,
            Self::Importance => Self::Radiance,
        }
    }
}

// ---- Tests ----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_queries() {
        let f = BxDFFlags::GLOSSY_REFLECTION | BxDFFlags::TRANSMISSION;
        assert!(f.is_reflective());
        assert!(f.is_transmissive());
        assert!(f.is_glossy());
        assert!(f.is_non_specular());
        assert!(!f.is_specular());
        assert!(!BxDFFlags::SPECULAR_REFLECTION.is_non_specular());
        assert!(BxDFFlags::empty().is_empty());
    }

    #[test]
    fn transport_mode_flips() {
        assert_eq!(!TransportMode::Radiance, TransportMode::Importance);
        assert_eq!(!!TransportMode::Radiance, TransportMode::Radiance);
    }
}
