//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
#[macro_use]
pub mod geometry;
pub mod bssrdf;
pub mod camera;
pub mod film;
pub mod hash;
pub mod integrator;
pub mod interaction;
pub mod interpolation;
pub mod light;
pub mod light_distrib;
pub mod material;
pub mod medium;
pub mod microfacet;
pub mod paramset;
pub mod pbrt;
pub mod primitive;
pub mod primitives;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
pub mod stats;
