//! GPU-side volume: the 3D scalar texture, the jitter noise texture and the
//! bounding cube they are drawn with.

use rand::Rng;
use volray_core::NormalizedVolume;

use crate::cube::CubeMesh;
use crate::error::{RenderError, RenderResult};

/// Fills a `width × height` single-channel noise image with uniform random
/// bytes.
pub fn noise_bytes<R: Rng>(rng: &mut R, width: u32, height: u32) -> Vec<u8> {
    let count = width as usize * height as usize;
    (0..count).map(|_| rng.gen::<u8>()).collect()
}

/// Creates the layout shared by every raycasting pipeline.
///
/// Binding 0 is the uniform block, 1 and 2 the volume texture and its
/// sampler, 3 and 4 the jitter texture and its sampler.
pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Raycast Bind Group Layout"),
        entries: &[
            // Uniforms
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            // Volume texture
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D3,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            // Jitter texture
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

struct TextureSlot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: wgpu::Extent3d,
}

impl Drop for TextureSlot {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Owns the volume and noise textures. Both are replaced wholesale: the old
/// texture is destroyed before the new one is allocated.
pub struct GpuVolumeResource {
    volume: Option<TextureSlot>,
    noise: Option<TextureSlot>,
    volume_sampler: wgpu::Sampler,
    noise_sampler: wgpu::Sampler,
    cube: CubeMesh,
    bind_group: Option<wgpu::BindGroup>,
}

impl GpuVolumeResource {
    pub fn new(device: &wgpu::Device) -> Self {
        let volume_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Volume Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let noise_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Jitter Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            volume: None,
            noise: None,
            volume_sampler,
            noise_sampler,
            cube: CubeMesh::new(device),
            bind_group: None,
        }
    }

    /// Uploads a normalized volume as an `R8Unorm` 3D texture.
    ///
    /// The volume is validated before the current texture is touched, so a
    /// rejected upload keeps the previous volume.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        volume: &NormalizedVolume,
    ) -> RenderResult<()> {
        let dimensions = volume.dimensions();
        if dimensions.min_element() == 0 {
            return Err(RenderError::EmptyVolume);
        }
        let limit = device.limits().max_texture_dimension_3d;
        if dimensions.max_element() > limit {
            return Err(RenderError::TextureTooLarge {
                dimensions: dimensions.to_array(),
                limit,
            });
        }

        self.bind_group = None;
        self.volume = None;

        let size = wgpu::Extent3d {
            width: dimensions.x,
            height: dimensions.y,
            depth_or_array_layers: dimensions.z,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Volume Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            volume.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(dimensions.x),
                rows_per_image: Some(dimensions.y),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("uploaded volume texture {dimensions}");
        self.volume = Some(TextureSlot {
            texture,
            view,
            size,
        });
        Ok(())
    }

    /// Replaces the jitter texture with fresh noise at the given pixel size.
    pub fn regenerate_noise(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
    ) {
        let width = width.max(1);
        let height = height.max(1);

        self.bind_group = None;
        self.noise = None;

        let data = noise_bytes(&mut rand::thread_rng(), width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Jitter Noise Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("regenerated {width}x{height} jitter noise");
        self.noise = Some(TextureSlot {
            texture,
            view,
            size,
        });
    }

    /// Rebuilds the bind group once both textures exist.
    pub fn bind(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
    ) {
        let (Some(volume), Some(noise)) = (&self.volume, &self.noise) else {
            self.bind_group = None;
            return;
        };

        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Raycast Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&volume.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.volume_sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&noise.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.noise_sampler),
                },
            ],
        }));
    }

    /// Whether a volume is uploaded and bound.
    pub fn is_ready(&self) -> bool {
        self.volume.is_some() && self.bind_group.is_some()
    }

    /// Size of the current noise texture.
    pub fn noise_size(&self) -> Option<(u32, u32)> {
        self.noise
            .as_ref()
            .map(|slot| (slot.size.width, slot.size.height))
    }

    /// Binds both textures and draws the bounding cube.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> RenderResult<()> {
        let bind_group = self.bind_group.as_ref().ok_or(RenderError::NotReady)?;
        render_pass.set_bind_group(0, bind_group, &[]);
        self.cube.draw(render_pass);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_size() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(noise_bytes(&mut rng, 17, 5).len(), 85);
        assert!(noise_bytes(&mut rng, 0, 5).is_empty());
    }

    #[test]
    fn test_noise_is_not_constant() {
        let mut rng = StdRng::seed_from_u64(42);
        let noise = noise_bytes(&mut rng, 64, 64);
        let first = noise[0];
        assert!(noise.iter().any(|&b| b != first));
        let mean = noise.iter().map(|&b| f64::from(b)).sum::<f64>() / noise.len() as f64;
        assert!((mean - 127.5).abs() < 10.0, "mean {mean}");
    }
}
