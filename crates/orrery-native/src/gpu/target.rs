use crate::error::StartupError;

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen floating-point color buffer with a matching depth buffer.
/// The scene renders here; the post pass samples the color attachment.
pub struct HdrTarget {
    _color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    _depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl HdrTarget {
    /// Build both attachments. Any validation error raised while doing so is
    /// returned instead of surfacing later as a panic.
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, StartupError> {
        let (width, height) = (width.max(1), height.max(1));
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hdr_color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("hdr_depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(StartupError::RenderTarget(err.to_string()));
        }
        log::debug!("HDR target {width}x{height}");

        Ok(Self {
            _color: color,
            color_view,
            _depth: depth,
            depth_view,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
