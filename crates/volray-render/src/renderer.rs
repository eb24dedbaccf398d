//! Raycast renderer: one pipeline per render mode over a shared volume.

use std::collections::HashMap;
use std::path::Path;

use bytemuck::Zeroable;
use glam::{UVec2, UVec3};
use wgpu::util::DeviceExt;
use volray_core::{NormalizedVolume, RenderMode, RenderState, VolumeGeometry};

use crate::cube::CubeMesh;
use crate::error::{RenderError, RenderResult};
use crate::frame::FrameTransforms;
use crate::shader::ShaderBuilder;
use crate::uniforms::RaycastUniforms;
use crate::volume_resource::{create_bind_group_layout, GpuVolumeResource};

/// Whether the renderer can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    /// No volume loaded yet; draw requests are rejected.
    Uninitialized,
    /// A volume is uploaded and every mode has a pipeline.
    Ready,
}

/// The volume currently shown, committed only after a successful upload.
#[derive(Debug, Clone, Copy)]
struct LoadedVolume {
    geometry: VolumeGeometry,
    range: (f64, f64),
    dimensions: UVec3,
}

pub struct RaycastRenderer {
    pipelines: HashMap<RenderMode, wgpu::RenderPipeline>,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    resource: GpuVolumeResource,
    loaded: Option<LoadedVolume>,
    viewport: UVec2,
}

impl RaycastRenderer {
    /// Builds the pipelines for every mode and an initial jitter texture
    /// for a `width × height` viewport (device pixels).
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        let bind_group_layout = create_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Raycast Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mut pipelines = HashMap::new();
        for mode in RenderMode::ALL {
            let pipeline = Self::create_pipeline(device, &pipeline_layout, target_format, mode)?;
            pipelines.insert(mode, pipeline);
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Raycast Uniform Buffer"),
            contents: bytemuck::cast_slice(&[RaycastUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let mut resource = GpuVolumeResource::new(device);
        let viewport = UVec2::new(width.max(1), height.max(1));
        resource.regenerate_noise(device, queue, viewport.x, viewport.y);

        Ok(Self {
            pipelines,
            bind_group_layout,
            uniform_buffer,
            resource,
            loaded: None,
            viewport,
        })
    }

    /// Compiles the program for `mode`. Validation errors raised while the
    /// module and pipeline are created are reported as shader failures.
    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        target_format: wgpu::TextureFormat,
        mode: RenderMode,
    ) -> RenderResult<wgpu::RenderPipeline> {
        let builder = ShaderBuilder::for_mode(mode);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = match builder.build_module(device) {
            Ok(shader) => shader,
            Err(error) => {
                let _ = pollster::block_on(device.pop_error_scope());
                return Err(error);
            }
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: builder.label(),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[CubeMesh::vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Both faces are drawn so the volume stays visible from inside the box
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompilationFailed(format!("{mode}: {error}")));
        }
        log::debug!("built {mode} pipeline");
        Ok(pipeline)
    }

    pub fn state(&self) -> RendererState {
        if self.loaded.is_some() && self.resource.is_ready() {
            RendererState::Ready
        } else {
            RendererState::Uninitialized
        }
    }

    /// Parses, normalizes and uploads the volume at `path`.
    ///
    /// Nothing is replaced unless every step succeeds; on error the
    /// previously loaded volume stays current.
    pub fn load_volume(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> RenderResult<()> {
        let raw = volray_core::read_volume(path)?;
        let normalized = volray_core::normalize(&raw);
        self.set_volume(device, queue, &normalized)
    }

    /// Uploads an already normalized volume.
    pub fn set_volume(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        volume: &NormalizedVolume,
    ) -> RenderResult<()> {
        self.resource.upload(device, queue, volume)?;
        self.resource
            .bind(device, &self.bind_group_layout, &self.uniform_buffer);

        self.loaded = Some(LoadedVolume {
            geometry: volume.geometry(),
            range: volume.range(),
            dimensions: volume.dimensions(),
        });
        Ok(())
    }

    /// Sets the viewport in device pixels and regenerates the jitter noise.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, width: u32, height: u32) {
        self.viewport = UVec2::new(width.max(1), height.max(1));
        self.resource
            .regenerate_noise(device, queue, self.viewport.x, self.viewport.y);
        self.resource
            .bind(device, &self.bind_group_layout, &self.uniform_buffer);
    }

    /// Records one frame into `encoder`: clears `target` to the background
    /// and raycasts the volume with the program of `state.mode`.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        state: &RenderState,
    ) -> RenderResult<()> {
        let Some(loaded) = self.loaded.filter(|_| self.resource.is_ready()) else {
            log::warn!("render requested before a volume was loaded");
            return Err(RenderError::NotReady);
        };
        let pipeline = self.pipelines.get(&state.mode).ok_or(RenderError::NotReady)?;

        let uniforms = self.uniforms(&loaded.geometry, state);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let background = state.background_color;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Raycast Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(background.x),
                        g: f64::from(background.y),
                        b: f64::from(background.z),
                        a: f64::from(state.background_alpha),
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        render_pass.set_pipeline(pipeline);
        self.resource.draw(&mut render_pass)
    }

    /// Uniforms the next frame would use for `state`.
    pub fn uniforms(&self, geometry: &VolumeGeometry, state: &RenderState) -> RaycastUniforms {
        let frame = FrameTransforms::new(state, geometry, self.viewport);
        RaycastUniforms::new(&frame, geometry, state, self.viewport)
    }

    /// Intensity range of the current volume, `(0, 0)` before any load.
    pub fn range(&self) -> (f64, f64) {
        self.loaded.map_or((0.0, 0.0), |loaded| loaded.range)
    }

    /// Voxel counts of the current volume, zero before any load.
    pub fn size(&self) -> UVec3 {
        self.loaded.map_or(UVec3::ZERO, |loaded| loaded.dimensions)
    }

    /// Geometric frame of the current volume.
    pub fn geometry(&self) -> Option<VolumeGeometry> {
        self.loaded.map(|loaded| loaded.geometry)
    }

    /// Viewport in device pixels.
    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Size of the jitter texture, which tracks the viewport.
    pub fn noise_size(&self) -> Option<(u32, u32)> {
        self.resource.noise_size()
    }

    /// Names of the available modes.
    pub fn modes(&self) -> Vec<&'static str> {
        RenderMode::names()
    }
}
