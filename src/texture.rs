use std::path::Path;

use crate::error::{PaddockError, Result};
use crate::gpu::GpuContext;

/// A GPU texture and the sampler it is read with.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler_label = format!("{label} Sampler");
        let sampler = gpu.device.create_sampler(&sampler_descriptor(&sampler_label));

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|source| PaddockError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::info!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self::from_rgba(gpu, &img, width, height, &path.display().to_string()))
    }

    /// Loads `path` if one is given, otherwise (or if loading fails) uses `fallback`.
    pub fn from_file_or(
        gpu: &GpuContext,
        path: Option<&Path>,
        fallback: impl FnOnce(&GpuContext) -> Self,
    ) -> Self {
        match path.map(|p| Self::from_file(gpu, p)) {
            Some(Ok(texture)) => texture,
            Some(Err(err)) => {
                log::warn!("{err}; using procedural texture");
                fallback(gpu)
            }
            None => fallback(gpu),
        }
    }

    /// Procedural grass for the ground (texture unit A).
    pub fn grass(gpu: &GpuContext, size: u32, seed: u32) -> Self {
        Self::from_rgba(gpu, &grass_pixels(size, seed), size, size, "Grass Texture")
    }

    /// Procedural horizon-to-zenith gradient for the skybox (texture unit B).
    pub fn sky(gpu: &GpuContext, size: u32) -> Self {
        Self::from_rgba(gpu, &sky_pixels(size), size, size, "Sky Texture")
    }
}

const GREENS: [[u8; 3]; 4] = [[86, 125, 70], [75, 115, 60], [95, 135, 75], [80, 120, 65]];

const HORIZON: [f32; 3] = [200.0, 225.0, 240.0];
const ZENITH: [f32; 3] = [70.0, 130.0, 210.0];

/// RGBA8 grass pixels, `size * size * 4` bytes.
pub fn grass_pixels(size: u32, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let base = GREENS[(hash(x, y, seed) % GREENS.len() as u32) as usize];
            let variation = (hash(x + 500, y + 500, seed) % 20) as i32 - 10;
            for channel in base {
                data.push((i32::from(channel) + variation).clamp(0, 255) as u8);
            }
            data.push(255);
        }
    }
    data
}

/// RGBA8 sky pixels: row 0 (the top of the image) is the zenith colour,
/// the last row is the horizon.
pub fn sky_pixels(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    let span = size.saturating_sub(1).max(1) as f32;
    for y in 0..size {
        let t = y as f32 / span;
        let row: Vec<u8> = (0..3)
            .map(|c| (ZENITH[c] + (HORIZON[c] - ZENITH[c]) * t).round() as u8)
            .collect();
        for _ in 0..size {
            data.extend_from_slice(&row);
            data.push(255);
        }
    }
    data
}

fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_add(x.wrapping_mul(374761393));
    h = h.wrapping_add(y.wrapping_mul(668265263));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

/// Repeating, linearly filtered sampling for both texture units.
fn sampler_descriptor(label: &str) -> wgpu::SamplerDescriptor<'_> {
    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_is_opaque_green_and_seeded() {
        let pixels = grass_pixels(16, 7);
        assert_eq!(pixels.len(), 16 * 16 * 4);
        for px in pixels.chunks_exact(4) {
            assert_eq!(px[3], 255);
            assert!(px[1] > px[0] && px[1] > px[2]);
        }
        assert_eq!(pixels, grass_pixels(16, 7));
        assert_ne!(pixels, grass_pixels(16, 8));
    }

    #[test]
    fn sky_fades_from_zenith_to_horizon() {
        let size = 8;
        let pixels = sky_pixels(size);
        assert_eq!(pixels.len(), (size * size * 4) as usize);

        let row_start = |y: u32| (y * size * 4) as usize;
        let top = &pixels[row_start(0)..row_start(0) + 4];
        let bottom = &pixels[row_start(size - 1)..row_start(size - 1) + 4];
        assert_eq!(top, &[70, 130, 210, 255]);
        assert_eq!(bottom, &[200, 225, 240, 255]);

        // Every row is a single colour.
        for y in 0..size {
            let row = &pixels[row_start(y)..row_start(y + 1)];
            assert!(row.chunks_exact(4).all(|px| px == &row[..4]));
        }
    }

    #[test]
    fn single_pixel_sky_is_zenith() {
        assert_eq!(sky_pixels(1), vec![70, 130, 210, 255]);
    }

    #[test]
    fn samplers_filter_linearly_and_repeat() {
        let desc = sampler_descriptor("sky");
        assert_eq!(desc.label, Some("sky"));
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.mipmap_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
    }
}
