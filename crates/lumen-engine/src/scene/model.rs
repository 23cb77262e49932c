use std::path::Path;

use glam::{Vec2, Vec3};

use crate::lighting::{Material, SamplerConfig};

use super::{LoadError, Mesh, TextureImage, Vertex};

/// Material slot of a model: shading parameters plus an optional diffuse map.
///
/// A slot without a texture is shaded against plain white.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMaterial {
    pub name: String,
    pub material: Material,
    pub diffuse_texture: Option<TextureImage>,
    pub sampler: SamplerConfig,
}

impl Default for ModelMaterial {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            material: Material::default(),
            diffuse_texture: None,
            sampler: SamplerConfig::default(),
        }
    }
}

/// Meshes and the materials they reference.
///
/// Invariant: every `mesh.material` indexes into `materials`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<ModelMaterial>,
}

impl Model {
    /// Textured unit cube used when no model file is given.
    pub fn fallback() -> Self {
        let texture = TextureImage::checkerboard(256, 8, [230, 230, 230, 255], [60, 90, 160, 255]);
        Self {
            meshes: vec![Mesh::cube()],
            materials: vec![ModelMaterial {
                name: "checker".to_string(),
                diffuse_texture: Some(texture),
                ..Default::default()
            }],
        }
    }

    /// Loads a Wavefront OBJ file and its MTL library.
    ///
    /// Faces are triangulated and re-indexed so each vertex carries one
    /// position/normal/texcoord triple. A missing or unreadable MTL file, or an
    /// undecodable diffuse map, is logged and replaced by defaults rather than
    /// failing the whole load.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (obj_models, obj_materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| LoadError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut materials: Vec<ModelMaterial> = match obj_materials {
            Ok(mtls) => mtls.iter().map(|m| load_material(m, base_dir)).collect(),
            Err(e) => {
                log::warn!("{}: material library unavailable ({e}); using defaults", path.display());
                Vec::new()
            }
        };

        // Meshes without a usable material id share one default slot.
        let mut default_slot: Option<usize> = None;
        let mut meshes = Vec::with_capacity(obj_models.len());

        for m in obj_models {
            let material = match m.mesh.material_id.filter(|&id| id < materials.len()) {
                Some(id) => id,
                None => *default_slot.get_or_insert_with(|| {
                    materials.push(ModelMaterial::default());
                    materials.len() - 1
                }),
            };
            let mesh = convert_mesh(m.name, &m.mesh, material);
            log::debug!(
                "{}: mesh '{}' with {} triangles",
                path.display(),
                mesh.name,
                mesh.triangle_count()
            );
            meshes.push(mesh);
        }

        log::info!(
            "loaded {} ({} meshes, {} materials)",
            path.display(),
            meshes.len(),
            materials.len()
        );

        Ok(Self { meshes, materials })
    }
}

fn load_material(mtl: &tobj::Material, base_dir: &Path) -> ModelMaterial {
    let diffuse_texture = mtl
        .diffuse_texture
        .as_deref()
        .filter(|name| !name.is_empty())
        .and_then(|name| {
            let tex_path = base_dir.join(name);
            match TextureImage::load(&tex_path) {
                Ok(img) => Some(img),
                Err(e) => {
                    log::warn!("material '{}': {e}; using white", mtl.name);
                    None
                }
            }
        });

    ModelMaterial {
        name: mtl.name.clone(),
        material: Material::from_mtl(mtl),
        diffuse_texture,
        sampler: SamplerConfig::default(),
    }
}

fn convert_mesh(name: String, mesh: &tobj::Mesh, material: usize) -> Mesh {
    let count = mesh.positions.len() / 3;
    let has_normals = mesh.normals.len() == mesh.positions.len();
    let has_uvs = mesh.texcoords.len() / 2 == count;

    let vertices = (0..count)
        .map(|i| {
            let position = Vec3::new(
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            );
            let normal = if has_normals {
                Vec3::new(mesh.normals[3 * i], mesh.normals[3 * i + 1], mesh.normals[3 * i + 2])
            } else {
                Vec3::ZERO
            };
            // OBJ puts v = 0 at the bottom; wgpu textures start at the top row.
            let tex_coord = if has_uvs {
                Vec2::new(mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1])
            } else {
                Vec2::ZERO
            };
            Vertex::new(position, normal, tex_coord)
        })
        .collect();

    let mut out = Mesh {
        name,
        vertices,
        indices: mesh.indices.clone(),
        material,
    };
    if !has_normals {
        out.recompute_normals();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lumen-model-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
v 0 0 0
v 1 0 0
v 1 0 -1
v 0 0 -1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl shiny
f 1/1 2/2 3/3 4/4
";

    const QUAD_MTL: &str = "\
newmtl shiny
Ka 0.1 0.1 0.1
Kd 0.8 0.2 0.2
Ks 1.0 1.0 1.0
Ns 64
";

    #[test]
    fn loads_obj_with_mtl() {
        let dir = scratch_dir("mtl");
        std::fs::write(dir.join("quad.obj"), QUAD_OBJ).expect("write obj");
        std::fs::write(dir.join("quad.mtl"), QUAD_MTL).expect("write mtl");

        let model = Model::load_obj(dir.join("quad.obj")).expect("load");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.materials.len(), 1);

        let mat = &model.materials[0];
        assert_eq!(mat.name, "shiny");
        assert_eq!(mat.material.diffuse, Vec3::new(0.8, 0.2, 0.2));
        assert_eq!(mat.material.shininess, 64.0);
        assert!(mat.diffuse_texture.is_none());

        let mesh = &model.meshes[0];
        assert_eq!(mesh.material, 0);
        // Quad triangulated into two triangles.
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn flips_v_and_generates_normals() {
        let dir = scratch_dir("flip");
        std::fs::write(dir.join("quad.obj"), QUAD_OBJ).expect("write obj");
        std::fs::write(dir.join("quad.mtl"), QUAD_MTL).expect("write mtl");

        let model = Model::load_obj(dir.join("quad.obj")).expect("load");
        let mesh = &model.meshes[0];

        let origin = mesh
            .vertices
            .iter()
            .find(|v| v.position == [0.0, 0.0, 0.0])
            .expect("origin vertex");
        assert_eq!(origin.tex_coord, [0.0, 1.0]);

        // The quad lies in the XZ plane wound CCW seen from +Y.
        for v in &mesh.vertices {
            assert!((Vec3::from(v.normal) - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn missing_mtl_falls_back_to_default_material() {
        let dir = scratch_dir("nomtl");
        let obj = QUAD_OBJ.replace("mtllib quad.mtl\n", "").replace("usemtl shiny\n", "");
        std::fs::write(dir.join("bare.obj"), obj).expect("write obj");

        let model = Model::load_obj(dir.join("bare.obj")).expect("load");
        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.materials[0], ModelMaterial::default());
        assert_eq!(model.meshes[0].material, 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Model::load_obj("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, LoadError::Obj { .. }));
    }

    #[test]
    fn fallback_is_textured_cube() {
        let model = Model::fallback();
        assert_eq!(model.meshes.len(), 1);
        assert!(model.materials[0].diffuse_texture.is_some());
        assert!(model.meshes.iter().all(|m| m.material < model.materials.len()));
    }
}
