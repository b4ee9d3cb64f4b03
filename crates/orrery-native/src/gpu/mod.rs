//! wgpu backend: owns every GPU object and replays frame plans.

pub mod model;
pub mod pipeline;
pub mod target;
pub mod texture;

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use orrery_engine::{
    FramePlan, Material, MeshData, MeshId, MeshSource, ModelInstance, PassTarget, ProgramId,
    Renderer, ResourceSet, TextureId, TextureLayout, TextureSource, Topology,
};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{FrameError, StartupError};
use pipeline::{PipelineCache, PipelineKey, Program, UNIFORM_SLOT};
use target::HdrTarget;
use texture::GpuTexture;

/// Vertex and index buffers for one mesh, plus what it samples by default.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    element_count: u32,
    topology: Topology,
    material: Material,
    /// Diffuse map named by the model file, used for slot 0 when nothing else is bound.
    diffuse: Option<GpuTexture>,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData, material: Material, diffuse: Option<GpuTexture>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = data.indices.as_ref().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex_buffer,
            index_buffer,
            element_count: data.element_count(),
            topology: data.topology,
            material,
            diffuse,
        }
    }
}

/// Where a texture slot's view comes from once a draw is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SlotSource {
    Texture(TextureId),
    HdrColor,
    ModelDiffuse(MeshId),
    Placeholder(TextureLayout),
}

type BindKey = (ProgramId, Vec<SlotSource>);

/// One draw after the prepare phase: everything the encoder needs.
struct PreparedDraw {
    pipeline: PipelineKey,
    mesh: MeshId,
    bindings: Option<BindKey>,
    uniform_offset: u32,
    instanced: bool,
    /// Range into the frame's instance buffer, or `0..1` for plain draws.
    instances: std::ops::Range<u32>,
}

pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    hdr: HdrTarget,

    programs: HashMap<ProgramId, Program>,
    meshes: HashMap<MeshId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    placeholder_2d: GpuTexture,
    placeholder_cube: GpuTexture,
    repeat_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,

    pipelines: PipelineCache,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    texture_groups: HashMap<BindKey, wgpu::BindGroup>,
}

fn uniform_buffer(device: &wgpu::Device, slots: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("uniform_slots"),
        size: slots.max(1) * UNIFORM_SLOT,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn uniform_group(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_slots"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(UNIFORM_SLOT),
            }),
        }],
    })
}

fn instance_buffer(device: &wgpu::Device, instances: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instances"),
        size: instances.max(1) * ModelInstance::STRIDE_BYTES as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Prefer a non-sRGB surface: shader output is written to the screen unconverted.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

fn color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: c[0] as f64,
        g: c[1] as f64,
        b: c[2] as f64,
        a: c[3] as f64,
    }
}

impl WgpuRenderer {
    pub async fn new(window: Arc<Window>, resources: &ResourceSet) -> Result<Self, StartupError> {
        resources.validate()?;
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(StartupError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("orrery_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps.formats).ok_or(StartupError::NoAdapter)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface {}x{} as {:?}", config.width, config.height, format);

        let hdr = HdrTarget::new(&device, config.width, config.height)?;

        let uniform_layout = pipeline::uniform_bind_group_layout(&device);
        let mut programs = HashMap::new();
        for desc in &resources.programs {
            programs.insert(desc.id, Program::new(&device, desc, &uniform_layout)?);
        }

        let mut textures = HashMap::new();
        for desc in &resources.textures {
            let gpu = match &desc.source {
                TextureSource::Image { path, flip_vertically } => {
                    texture::upload_2d(&device, &queue, desc.label, &texture::decode_or_blank(path, *flip_vertically))
                }
                TextureSource::Cubemap { faces } => {
                    texture::upload_cube(&device, &queue, desc.label, &texture::decode_cube_faces(faces))
                }
            };
            textures.insert(desc.id, gpu);
        }

        let mut meshes = HashMap::new();
        for desc in &resources.meshes {
            let mesh = match &desc.source {
                MeshSource::Static(data) => GpuMesh::upload(&device, desc.label, data, desc.material.clone(), None),
                MeshSource::Model { path } => {
                    let loaded = model::load_or_sphere(path);
                    let diffuse = loaded.diffuse.as_deref().map(|tex| {
                        texture::upload_2d(&device, &queue, desc.label, &texture::decode_or_blank(tex, true))
                    });
                    GpuMesh::upload(&device, desc.label, &loaded.mesh, desc.material.clone(), diffuse)
                }
            };
            meshes.insert(desc.id, mesh);
        }

        let uniform_buffer = uniform_buffer(&device, 16);
        let uniform_group = uniform_group(&device, &uniform_layout, &uniform_buffer);

        Ok(Self {
            placeholder_2d: texture::placeholder(&device, &queue, TextureLayout::Planar),
            placeholder_cube: texture::placeholder(&device, &queue, TextureLayout::Cube),
            repeat_sampler: texture::create_sampler(&device, "repeat", true),
            clamp_sampler: texture::create_sampler(&device, "clamp", false),
            pipelines: PipelineCache::new(format),
            instance_buffer: instance_buffer(&device, 256),
            texture_groups: HashMap::new(),
            uniform_layout,
            uniform_buffer,
            uniform_group,
            surface,
            device,
            queue,
            config,
            hdr,
            programs,
            meshes,
            textures,
        })
    }

    /// Re-apply the current surface configuration after `Lost`/`Outdated`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Decide where each texture slot of `program` comes from for `draw`.
    fn resolve_slots(
        &self,
        program: &Program,
        draw: &orrery_engine::DrawCommand,
        mesh: &GpuMesh,
    ) -> Result<Vec<SlotSource>, FrameError> {
        let mut slots = Vec::with_capacity(program.textures.len());
        for (slot, &layout) in program.textures.iter().enumerate() {
            let slot = slot as u32;
            let chosen = draw
                .texture_at(slot)
                .or_else(|| mesh.material.textures.iter().find(|(s, _)| *s == slot).map(|(_, t)| *t));

            let source = match chosen {
                Some(id) if id.is_render_target() => {
                    SlotSource::HdrColor.checked(TextureLayout::Planar, layout, draw.label)
                }
                Some(id) => {
                    let tex = self.textures.get(&id).ok_or(FrameError::Missing {
                        draw: draw.label,
                        what: "texture",
                        id: id.0,
                    })?;
                    SlotSource::Texture(id).checked(tex.layout, layout, draw.label)
                }
                None if slot == 0 && mesh.diffuse.is_some() => {
                    SlotSource::ModelDiffuse(draw.mesh).checked(TextureLayout::Planar, layout, draw.label)
                }
                None => SlotSource::Placeholder(layout),
            };
            slots.push(source);
        }
        Ok(slots)
    }

    fn view_for(&self, source: SlotSource) -> (&wgpu::TextureView, &wgpu::Sampler) {
        let placeholder = |layout| match layout {
            TextureLayout::Planar => (&self.placeholder_2d.view, &self.repeat_sampler),
            TextureLayout::Cube => (&self.placeholder_cube.view, &self.clamp_sampler),
        };
        match source {
            SlotSource::HdrColor => (&self.hdr.color_view, &self.clamp_sampler),
            SlotSource::Texture(id) => match self.textures.get(&id) {
                Some(tex) if tex.layout == TextureLayout::Cube => (&tex.view, &self.clamp_sampler),
                Some(tex) => (&tex.view, &self.repeat_sampler),
                None => placeholder(TextureLayout::Planar),
            },
            SlotSource::ModelDiffuse(mesh) => match self.meshes.get(&mesh).and_then(|m| m.diffuse.as_ref()) {
                Some(tex) => (&tex.view, &self.repeat_sampler),
                None => placeholder(TextureLayout::Planar),
            },
            SlotSource::Placeholder(layout) => placeholder(layout),
        }
    }

    fn prepare_bindings(&mut self, key: &BindKey) {
        if self.texture_groups.contains_key(key) {
            return;
        }
        let Some(layout) = self.programs.get(&key.0).and_then(|p| p.texture_layout.as_ref()) else {
            return;
        };
        let mut entries = Vec::with_capacity(key.1.len() * 2);
        for (slot, &source) in key.1.iter().enumerate() {
            let (view, sampler) = self.view_for(source);
            entries.push(wgpu::BindGroupEntry {
                binding: 2 * slot as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 2 * slot as u32 + 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }
        let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("textures"),
            layout,
            entries: &entries,
        });
        self.texture_groups.insert(key.clone(), group);
    }

    /// Build pipelines, bind groups, uniform bytes and instance data for the
    /// whole plan before any encoding starts.
    fn prepare(&mut self, plan: &FramePlan) -> Result<Vec<Vec<PreparedDraw>>, FrameError> {
        let mut uniform_bytes: Vec<u8> = Vec::new();
        let mut instances: Vec<ModelInstance> = Vec::new();
        let mut prepared = Vec::with_capacity(plan.passes().len());

        for pass in plan.passes() {
            let mut draws = Vec::with_capacity(pass.draws.len());
            for draw in &pass.draws {
                let missing = |what, id| FrameError::Missing { draw: draw.label, what, id };
                let program = self.programs.get(&draw.program).ok_or_else(|| missing("program", draw.program.0))?;
                let mesh = self.meshes.get(&draw.mesh).ok_or_else(|| missing("mesh", draw.mesh.0))?;

                let key = PipelineKey {
                    program: draw.program,
                    target: pass.target,
                    state: draw.state,
                    topology: mesh.topology,
                };
                let bindings = match program.texture_layout {
                    Some(_) => Some((draw.program, self.resolve_slots(program, draw, mesh)?)),
                    None => None,
                };

                let start = uniform_bytes.len();
                uniform_bytes.resize(start + UNIFORM_SLOT as usize, 0);
                program.uniforms.write(&plan.resolved_uniforms(draw), &mut uniform_bytes[start..])?;

                let instanced = program.instanced;
                let range = if instanced {
                    let first = instances.len() as u32;
                    instances.extend_from_slice(&draw.instances);
                    first..instances.len() as u32
                } else {
                    0..1
                };

                self.pipelines
                    .prepare(&self.device, program, key)
                    .map_err(|e| FrameError::Pipeline { draw: draw.label, reason: e.to_string() })?;
                if let Some(bindings) = &bindings {
                    self.prepare_bindings(bindings);
                }

                draws.push(PreparedDraw {
                    pipeline: key,
                    mesh: draw.mesh,
                    bindings,
                    uniform_offset: start as u32,
                    instanced,
                    instances: range,
                });
            }
            prepared.push(draws);
        }

        if uniform_bytes.len() as u64 > self.uniform_buffer.size() {
            let slots = (uniform_bytes.len() as u64 / UNIFORM_SLOT).next_power_of_two();
            self.uniform_buffer = uniform_buffer(&self.device, slots);
            self.uniform_group = uniform_group(&self.device, &self.uniform_layout, &self.uniform_buffer);
            log::debug!("Uniform buffer grown to {slots} slots");
        }
        if !uniform_bytes.is_empty() {
            self.queue.write_buffer(&self.uniform_buffer, 0, &uniform_bytes);
        }

        let instance_bytes: &[u8] = bytemuck::cast_slice(&instances);
        if instance_bytes.len() as u64 > self.instance_buffer.size() {
            self.instance_buffer = instance_buffer(&self.device, (instances.len() as u64).next_power_of_two());
            log::debug!("Instance buffer grown to {} matrices", instances.len());
        }
        if !instance_bytes.is_empty() {
            self.queue.write_buffer(&self.instance_buffer, 0, instance_bytes);
        }

        Ok(prepared)
    }
}

impl SlotSource {
    /// Fall back to a placeholder when the bound texture has the wrong shape.
    fn checked(self, actual: TextureLayout, expected: TextureLayout, draw: &str) -> Self {
        if actual == expected {
            self
        } else {
            log::warn!("Draw `{draw}` binds a {actual:?} texture to a {expected:?} slot; using a placeholder");
            SlotSource::Placeholder(expected)
        }
    }
}

impl Renderer for WgpuRenderer {
    type Error = FrameError;

    fn backend(&self) -> &'static str {
        "wgpu"
    }

    fn draw(&mut self, plan: &FramePlan) -> Result<(), FrameError> {
        let prepared = self.prepare(plan)?;

        let output = self.surface.get_current_texture()?;
        let screen_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        for (pass, draws) in plan.passes().iter().zip(&prepared) {
            let (view, depth) = match pass.target {
                PassTarget::Hdr => (&self.hdr.color_view, Some(&self.hdr.depth_view)),
                PassTarget::Screen => (&screen_view, None),
            };
            let depth_load = if pass.clears_depth() {
                wgpu::LoadOp::Clear(1.0)
            } else {
                wgpu::LoadOp::Load
            };
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(pass.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color(pass.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth.map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for draw in draws {
                // Every lookup below was checked while preparing.
                let (Some(pipeline), Some(mesh)) = (self.pipelines.get(&draw.pipeline), self.meshes.get(&draw.mesh)) else {
                    continue;
                };
                if draw.instances.is_empty() {
                    continue;
                }
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &self.uniform_group, &[draw.uniform_offset]);
                if let Some(group) = draw.bindings.as_ref().and_then(|k| self.texture_groups.get(k)) {
                    rpass.set_bind_group(1, group, &[]);
                }
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                if draw.instanced {
                    rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                }
                match &mesh.index_buffer {
                    Some(indices) => {
                        rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(0..mesh.element_count, 0, draw.instances.clone());
                    }
                    None => rpass.draw(0..mesh.element_count, draw.instances.clone()),
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        match HdrTarget::new(&self.device, width, height) {
            Ok(hdr) => self.hdr = hdr,
            Err(e) => log::error!("Keeping the {:?} HDR target: {e}", self.hdr.size()),
        }
        // Cached groups may point at the old HDR view.
        self.texture_groups.clear();
        log::debug!("Resized to {width}x{height}");
    }
}
