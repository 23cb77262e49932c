//! Per-fragment Blinn-Phong lighting.
//!
//! This module is the CPU reference for `render/shaders/lit_mesh.wgsl`. Both
//! evaluate the same formula over the same inputs:
//!
//! - a diffuse color source sampled at the fragment's texture coordinate
//! - a [`Material`] (ambient/diffuse/specular colors + shininess)
//! - a [`LightSet`] of point lights
//! - an explicit eye position
//! - an [`AmbientMode`]
//!
//! Everything here is pure and allocation-free per fragment.

mod ambient;
mod blinn_phong;
mod light;
mod material;
mod sampler;

pub use ambient::AmbientMode;
pub use blinn_phong::{blinn_phong_terms, BlinnPhong, Fragment};
pub use light::{Attenuation, LightSet, PointLight, MAX_LIGHTS};
pub use material::Material;
pub use sampler::{AddressMode, DiffuseSource, FilterMode, ImageSampler, SamplerConfig, SolidColor};
