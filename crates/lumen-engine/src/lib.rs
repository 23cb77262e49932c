//! Lumen engine crate.
//!
//! Blinn-Phong lighting (a CPU reference evaluator and the matching WGSL
//! pipeline), scene data, and the platform + GPU runtime that drives them.

pub mod core;
pub mod device;
pub mod input;
pub mod lighting;
pub mod logging;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
