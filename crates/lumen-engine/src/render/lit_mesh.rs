use anyhow::{ensure, Result};
use wgpu::util::DeviceExt;

use crate::device::DEPTH_FORMAT;
use crate::lighting::{AmbientMode, LightSet};
use crate::render::{RenderCtx, RenderTarget, LIT_MESH_WGSL};
use crate::scene::{Camera, Model, ModelMaterial, TextureImage, Vertex};

use super::uniforms::{min_binding_size, CameraUniform, LightsUniform, MaterialUniform};

/// Per-frame inputs of the lit mesh pass.
#[derive(Debug, Copy, Clone)]
pub struct LitFrame<'a> {
    pub camera: &'a Camera,
    pub lights: &'a LightSet,
    pub ambient: AmbientMode,
}

/// Draws an uploaded [`Model`] with Blinn-Phong shading.
///
/// Bind groups:
/// - 0: camera (`view_proj`, `eye`), written every frame
/// - 1: diffuse texture + sampler, per material
/// - 2: material uniform, per material
/// - 3: lights, written every frame
#[derive(Default)]
pub struct LitMeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    layouts: Option<Layouts>,

    camera_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,
    lights_ubo: Option<wgpu::Buffer>,
    lights_bind_group: Option<wgpu::BindGroup>,

    meshes: Vec<GpuMesh>,
    materials: Vec<GpuMaterial>,
}

struct Layouts {
    camera: wgpu::BindGroupLayout,
    texture: wgpu::BindGroupLayout,
    material: wgpu::BindGroupLayout,
    lights: wgpu::BindGroupLayout,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material: usize,
}

struct GpuMaterial {
    texture_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
}

impl LitMeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `model`, replacing any previously uploaded one.
    ///
    /// Materials without a diffuse map get a 1x1 white texture so the shader
    /// always has something to sample.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, model: &Model) -> Result<()> {
        for mesh in &model.meshes {
            ensure!(
                mesh.material < model.materials.len(),
                "mesh '{}' references material {} but the model has {}",
                mesh.name,
                mesh.material,
                model.materials.len()
            );
        }

        self.ensure_layouts(ctx);
        let Some(layouts) = self.layouts.as_ref() else { return Ok(()) };

        let materials: Vec<GpuMaterial> = model
            .materials
            .iter()
            .map(|m| upload_material(ctx, layouts, m))
            .collect();

        let meshes: Vec<GpuMesh> = model
            .meshes
            .iter()
            .filter(|m| !m.indices.is_empty())
            .map(|m| GpuMesh {
                vertex_buffer: ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("lumen mesh '{}' vbo", m.name)),
                    contents: bytemuck::cast_slice(&m.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("lumen mesh '{}' ibo", m.name)),
                    contents: bytemuck::cast_slice(&m.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: m.indices.len() as u32,
                material: m.material,
            })
            .collect();

        log::info!("uploaded {} meshes, {} materials", meshes.len(), materials.len());
        self.meshes = meshes;
        self.materials = materials;
        Ok(())
    }

    /// Draws the uploaded model into `target` (depth-tested, loads existing contents).
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &LitFrame<'_>) {
        self.ensure_layouts(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_frame_bindings(ctx);

        if self.meshes.is_empty() {
            return;
        }

        self.write_frame_uniforms(ctx, frame);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(camera_bg) = self.camera_bind_group.as_ref() else { return };
        let Some(lights_bg) = self.lights_bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen lit mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_bind_group(3, lights_bg, &[]);

        for mesh in &self.meshes {
            let Some(material) = self.materials.get(mesh.material) else { continue };
            rpass.set_bind_group(1, &material.texture_bind_group, &[]);
            rpass.set_bind_group(2, &material.material_bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn write_frame_uniforms(&self, ctx: &RenderCtx<'_>, frame: &LitFrame<'_>) {
        if let Some(ubo) = self.camera_ubo.as_ref() {
            ctx.queue
                .write_buffer(ubo, 0, bytemuck::bytes_of(&CameraUniform::from(frame.camera)));
        }
        if let Some(ubo) = self.lights_ubo.as_ref() {
            let lights = LightsUniform::new(frame.lights, frame.ambient);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&lights));
        }
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.layouts.is_some() {
            return;
        }

        let uniform_entry = |visibility, size| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: size,
            },
            count: None,
        };

        let camera = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen camera bgl"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                min_binding_size::<CameraUniform>(),
            )],
        });

        let texture = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen diffuse texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let material = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen material bgl"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::FRAGMENT,
                min_binding_size::<MaterialUniform>(),
            )],
        });

        let lights = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen lights bgl"),
            entries: &[uniform_entry(
                wgpu::ShaderStages::FRAGMENT,
                min_binding_size::<LightsUniform>(),
            )],
        });

        self.layouts = Some(Layouts {
            camera,
            texture,
            material,
            lights,
        });

        // Bind groups built against old layouts are invalid now.
        self.camera_bind_group = None;
        self.lights_bind_group = None;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen lit mesh shader"),
            source: wgpu::ShaderSource::Wgsl(LIT_MESH_WGSL.into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen lit mesh pipeline layout"),
            bind_group_layouts: &[
                &layouts.camera,
                &layouts.texture,
                &layouts.material,
                &layouts.lights,
            ],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen lit mesh pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("lit mesh pipeline built for {:?}", ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bind_group.is_some() && self.lights_bind_group.is_some() {
            return;
        }
        let Some(layouts) = self.layouts.as_ref() else { return };

        let camera_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen lights ubo"),
            size: std::mem::size_of::<LightsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.camera_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen camera bind group"),
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        }));
        self.lights_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen lights bind group"),
            layout: &layouts.lights,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: lights_ubo.as_entire_binding(),
            }],
        }));
        self.camera_ubo = Some(camera_ubo);
        self.lights_ubo = Some(lights_ubo);
    }
}

fn upload_material(ctx: &RenderCtx<'_>, layouts: &Layouts, m: &ModelMaterial) -> GpuMaterial {
    let white;
    let image = match m.diffuse_texture.as_ref() {
        Some(img) => img,
        None => {
            white = TextureImage::solid([255, 255, 255, 255]);
            &white
        }
    };

    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("lumen '{}' diffuse", m.name)),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: image.wgpu_format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler_label = format!("lumen '{}' sampler", m.name);
    let sampler = ctx.device.create_sampler(&m.sampler.descriptor(Some(&sampler_label)));

    let texture_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("lumen '{}' texture bind group", m.name)),
        layout: &layouts.texture,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    });

    let material_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("lumen '{}' material ubo", m.name)),
        contents: bytemuck::bytes_of(&MaterialUniform::from(&m.material)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let material_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("lumen '{}' material bind group", m.name)),
        layout: &layouts.material,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: material_ubo.as_entire_binding(),
        }],
    });

    GpuMaterial {
        texture_bind_group,
        material_bind_group,
    }
}
