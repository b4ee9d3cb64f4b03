//! Texture decoding and upload.
//!
//! Decode failures never abort: the texture is replaced by a blank one of the
//! right shape and a warning names the file.

use std::path::Path;

use image::RgbaImage;
use orrery_engine::TextureLayout;

/// Color textures are sampled as raw values, without sRGB decoding.
pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BLANK_TEXEL: [u8; 4] = [0, 0, 0, 255];

/// Decoded RGBA8 pixels, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn from_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            rgba: img.into_raw(),
        }
    }

    /// Solid opaque black of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        let texels = (width.max(1) * height.max(1)) as usize;
        Self {
            width: width.max(1),
            height: height.max(1),
            rgba: BLANK_TEXEL.repeat(texels),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decode `path` to RGBA8, optionally flipping rows so the first row in
/// memory is the bottom of the picture.
pub fn decode(path: impl AsRef<Path>, flip_vertically: bool) -> Result<ImageData, image::ImageError> {
    let img = image::open(path)?;
    let img = if flip_vertically { img.flipv() } else { img };
    Ok(ImageData::from_image(img.to_rgba8()))
}

/// Decode `path`, or log a warning and return a 1×1 blank.
pub fn decode_or_blank(path: &str, flip_vertically: bool) -> ImageData {
    match decode(path, flip_vertically) {
        Ok(img) => {
            log::info!("Loaded texture {path} ({}x{})", img.width, img.height);
            img
        }
        Err(e) => {
            log::warn!("Could not load texture {path}: {e}");
            ImageData::blank(1, 1)
        }
    }
}

/// Decode six cube faces. All faces end up the size of the first good one;
/// a face that fails or disagrees is replaced by a blank of that size.
pub fn decode_cube_faces(faces: &[String; 6]) -> [ImageData; 6] {
    let decoded: Vec<Option<ImageData>> = faces
        .iter()
        .map(|path| match decode(path, false) {
            Ok(img) => {
                log::info!("Loaded cubemap face {path} ({}x{})", img.width, img.height);
                Some(img)
            }
            Err(e) => {
                log::warn!("Could not load cubemap face {path}: {e}");
                None
            }
        })
        .collect();
    uniform_faces(decoded)
}

fn uniform_faces(decoded: Vec<Option<ImageData>>) -> [ImageData; 6] {
    let (width, height) = decoded
        .iter()
        .flatten()
        .map(ImageData::size)
        .next()
        .unwrap_or((1, 1));

    let mut faces = decoded.into_iter().map(|face| match face {
        Some(img) if img.size() == (width, height) => img,
        Some(img) => {
            log::warn!(
                "Cubemap face is {}x{}, expected {width}x{height}; using a blank face",
                img.width,
                img.height
            );
            ImageData::blank(width, height)
        }
        None => ImageData::blank(width, height),
    });
    std::array::from_fn(|_| faces.next().unwrap_or_else(|| ImageData::blank(width, height)))
}

/// A GPU texture and the view shaders bind.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub layout: TextureLayout,
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, layer: u32, img: &ImageData) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
            aspect: wgpu::TextureAspect::All,
        },
        &img.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * img.width),
            rows_per_image: Some(img.height),
        },
        wgpu::Extent3d {
            width: img.width,
            height: img.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Upload a 2D texture.
pub fn upload_2d(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, img: &ImageData) -> GpuTexture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: img.width,
            height: img.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    write_layer(queue, &texture, 0, img);
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        texture,
        view,
        layout: TextureLayout::Planar,
    }
}

/// Upload six equally sized faces as a cube map.
pub fn upload_cube(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    faces: &[ImageData; 6],
) -> GpuTexture {
    let (width, height) = faces[0].size();
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (layer, face) in faces.iter().enumerate() {
        write_layer(queue, &texture, layer as u32, face);
    }
    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some(label),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    });
    GpuTexture {
        texture,
        view,
        layout: TextureLayout::Cube,
    }
}

/// Blank stand-in bound when a slot has nothing to show.
pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, layout: TextureLayout) -> GpuTexture {
    match layout {
        TextureLayout::Planar => upload_2d(device, queue, "placeholder_2d", &ImageData::blank(1, 1)),
        TextureLayout::Cube => {
            let faces = std::array::from_fn(|_| ImageData::blank(1, 1));
            upload_cube(device, queue, "placeholder_cube", &faces)
        }
    }
}

/// Linear sampler. Planar textures repeat; cube maps and render targets clamp.
pub fn create_sampler(device: &wgpu::Device, label: &str, repeat: bool) -> wgpu::Sampler {
    let address_mode = if repeat {
        wgpu::AddressMode::Repeat
    } else {
        wgpu::AddressMode::ClampToEdge
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}
