//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! build them lazily from the first `RenderCtx` they see.
//!
//! Convention:
//! - world space is right-handed, +Y up
//! - shading happens in linear color; the surface is sRGB when available

mod ctx;
mod lit_mesh;
pub mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use lit_mesh::{LitFrame, LitMeshRenderer};

/// WGSL source of the lit mesh pipeline (vertex + Blinn-Phong fragment stage).
pub const LIT_MESH_WGSL: &str = include_str!("shaders/lit_mesh.wgsl");
