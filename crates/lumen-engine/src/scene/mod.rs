//! CPU-side scene data: camera, meshes, models and diffuse textures.
//!
//! Nothing here touches the GPU; `render` uploads these types.

mod camera;
mod error;
mod mesh;
mod model;
mod texture;

pub use camera::Camera;
pub use error::LoadError;
pub use mesh::{Mesh, Vertex};
pub use model::{Model, ModelMaterial};
pub use texture::{srgb_to_linear, TextureImage};
