//! Shader programs and the render pipelines built from them.
//!
//! Binding model shared by every program:
//! - group 0, binding 0: the program's uniform block, one 512-byte slot per
//!   draw selected with a dynamic offset;
//! - group 1: texture slot `i` at binding `2i`, its sampler at `2i + 1`.
//!
//! Vertex inputs: location 0 position, 1 normal, 2 uv from the mesh buffer;
//! instanced programs add the model matrix columns at 3..=6.

use std::collections::HashMap;
use std::num::NonZeroU64;

use orrery_engine::{
    CullMode, DepthMode, DrawState, MeshVertex, ModelInstance, PassTarget, ProgramDesc, ProgramId,
    TextureLayout, Topology, UniformLayout,
};

use super::target::{DEPTH_FORMAT, HDR_FORMAT};
use crate::error::StartupError;

/// Bytes reserved per draw in the uniform buffer. Also a valid dynamic-offset
/// alignment on every adapter (the minimum limit is 256).
pub const UNIFORM_SLOT: u64 = 512;

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4];

pub fn vertex_buffers(instanced: bool) -> Vec<wgpu::VertexBufferLayout<'static>> {
    let mut buffers = vec![wgpu::VertexBufferLayout {
        array_stride: MeshVertex::STRIDE_BYTES as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRIBUTES,
    }];
    if instanced {
        buffers.push(wgpu::VertexBufferLayout {
            array_stride: ModelInstance::STRIDE_BYTES as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        });
    }
    buffers
}

pub fn uniform_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform_slot_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(UNIFORM_SLOT),
            },
            count: None,
        }],
    })
}

pub fn texture_entries(layouts: &[TextureLayout]) -> Vec<wgpu::BindGroupLayoutEntry> {
    layouts
        .iter()
        .enumerate()
        .flat_map(|(slot, layout)| {
            let view_dimension = match layout {
                TextureLayout::Planar => wgpu::TextureViewDimension::D2,
                TextureLayout::Cube => wgpu::TextureViewDimension::Cube,
            };
            let binding = 2 * slot as u32;
            [
                wgpu::BindGroupLayoutEntry {
                    binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: binding + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect()
}

/// Depth state for a draw. Screen passes have no depth attachment.
pub fn depth_stencil(target: PassTarget, depth: DepthMode) -> Option<wgpu::DepthStencilState> {
    if target == PassTarget::Screen {
        return None;
    }
    let (depth_write_enabled, depth_compare) = match depth {
        DepthMode::Less => (true, wgpu::CompareFunction::Less),
        DepthMode::LessEqualReadOnly => (false, wgpu::CompareFunction::LessEqual),
        DepthMode::Disabled => (false, wgpu::CompareFunction::Always),
    };
    Some(wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    })
}

pub fn cull_face(cull: CullMode) -> Option<wgpu::Face> {
    match cull {
        CullMode::None => None,
        CullMode::Back => Some(wgpu::Face::Back),
        CullMode::Front => Some(wgpu::Face::Front),
    }
}

pub fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

/// A compiled shader module with its uniform layout and bind group layouts.
pub struct Program {
    pub id: ProgramId,
    pub label: &'static str,
    pub uniforms: UniformLayout,
    pub textures: Vec<TextureLayout>,
    pub instanced: bool,
    pub texture_layout: Option<wgpu::BindGroupLayout>,
    module: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
}

impl Program {
    pub fn new(
        device: &wgpu::Device,
        desc: &ProgramDesc,
        uniform_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, StartupError> {
        let uniforms = desc.layout()?;
        if uniforms.size() as u64 > UNIFORM_SLOT {
            return Err(StartupError::Resource {
                label: desc.label.to_string(),
                reason: format!("uniform block of {} bytes exceeds the {UNIFORM_SLOT}-byte slot", uniforms.size()),
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        let texture_layout = (!desc.textures.is_empty()).then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.label),
                entries: &texture_entries(&desc.textures),
            })
        });
        let mut groups = vec![uniform_layout];
        groups.extend(texture_layout.as_ref());
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &groups,
            push_constant_ranges: &[],
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(StartupError::Resource {
                label: desc.label.to_string(),
                reason: err.to_string(),
            });
        }

        log::info!("Compiled program `{}` ({} uniform bytes)", desc.label, uniforms.size());
        Ok(Self {
            id: desc.id,
            label: desc.label,
            uniforms,
            textures: desc.textures.clone(),
            instanced: desc.instanced,
            texture_layout,
            module,
            pipeline_layout,
        })
    }
}

/// Everything that selects a distinct pipeline object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub program: ProgramId,
    pub target: PassTarget,
    pub state: DrawState,
    pub topology: Topology,
}

/// Pipelines built on first use and kept for the life of the renderer.
pub struct PipelineCache {
    surface_format: wgpu::TextureFormat,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

impl PipelineCache {
    pub fn new(surface_format: wgpu::TextureFormat) -> Self {
        Self {
            surface_format,
            pipelines: HashMap::new(),
        }
    }

    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    /// Build the pipeline for `key` unless it already exists.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        program: &Program,
        key: PipelineKey,
    ) -> Result<(), wgpu::Error> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }

        let format = match key.target {
            PassTarget::Hdr => HDR_FORMAT,
            PassTarget::Screen => self.surface_format,
        };
        let buffers = vertex_buffers(program.instanced);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label),
            layout: Some(&program.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.module,
                entry_point: Some("vs_main"),
                buffers: &buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: primitive_topology(key.topology),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: cull_face(key.state.cull),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: depth_stencil(key.target, key.state.depth),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(err);
        }

        log::debug!("Pipeline {:?} for `{}`", key, program.label);
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_buffer_matches_vertex_struct() {
        let buffers = vertex_buffers(false);
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].array_stride, 32);
        let offsets: Vec<_> = buffers[0].attributes.iter().map(|a| (a.shader_location, a.offset)).collect();
        assert_eq!(offsets, [(0, 0), (1, 12), (2, 24)]);
    }

    #[test]
    fn instanced_adds_matrix_columns() {
        let buffers = vertex_buffers(true);
        assert_eq!(buffers.len(), 2);
        assert_eq!(buffers[1].array_stride, 64);
        assert_eq!(buffers[1].step_mode, wgpu::VertexStepMode::Instance);
        let locations: Vec<_> = buffers[1].attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, [3, 4, 5, 6]);
        assert_eq!(buffers[1].attributes[3].offset, 48);
    }

    #[test]
    fn texture_slots_pair_view_and_sampler() {
        let entries = texture_entries(&[TextureLayout::Planar, TextureLayout::Cube]);
        let bindings: Vec<_> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, [0, 1, 2, 3]);
        match entries[2].ty {
            wgpu::BindingType::Texture { view_dimension, .. } => {
                assert_eq!(view_dimension, wgpu::TextureViewDimension::Cube)
            }
            other => panic!("expected texture, got {other:?}"),
        }
        assert!(matches!(entries[3].ty, wgpu::BindingType::Sampler(_)));
    }

    #[test]
    fn depth_modes() {
        assert!(depth_stencil(PassTarget::Screen, DepthMode::Less).is_none());

        let less = depth_stencil(PassTarget::Hdr, DepthMode::Less).unwrap();
        assert!(less.depth_write_enabled);
        assert_eq!(less.depth_compare, wgpu::CompareFunction::Less);

        let sky = depth_stencil(PassTarget::Hdr, DepthMode::LessEqualReadOnly).unwrap();
        assert!(!sky.depth_write_enabled);
        assert_eq!(sky.depth_compare, wgpu::CompareFunction::LessEqual);

        let off = depth_stencil(PassTarget::Hdr, DepthMode::Disabled).unwrap();
        assert_eq!(off.depth_compare, wgpu::CompareFunction::Always);
    }

    #[test]
    fn cull_and_topology() {
        assert_eq!(cull_face(CullMode::None), None);
        assert_eq!(cull_face(CullMode::Back), Some(wgpu::Face::Back));
        assert_eq!(cull_face(CullMode::Front), Some(wgpu::Face::Front));
        assert_eq!(primitive_topology(Topology::TriangleStrip), wgpu::PrimitiveTopology::TriangleStrip);
    }
}
