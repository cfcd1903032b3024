//! Main renderer managing wgpu state and rendering.

use crate::{
    camera::{CameraUniform, OrbitCamera},
    font::generate_font_atlas,
    mesh::Mesh,
    pipeline::{
        create_camera_bind_group_layout, create_overlay_bind_group_layout, create_overlay_pipeline,
        create_voxel_pipeline,
    },
    texture::DepthTexture,
    vertex::{InstanceData, OverlayVertex},
};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Initial instance slots. The buffer grows when a scene needs more.
pub const INITIAL_INSTANCES: usize = 16_384;

/// Background colour of the scene (space).
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    voxel_pipeline: wgpu::RenderPipeline,
    camera_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    camera_uniform: CameraUniform,

    depth_texture: DepthTexture,

    // Instance buffer for batched rendering
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    cube_mesh: Mesh,

    // Text overlay
    overlay_pipeline: wgpu::RenderPipeline,
    overlay_bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Create a new renderer for the given window.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Camera
        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group_layout = create_camera_bind_group_layout(&device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let voxel_pipeline = create_voxel_pipeline(&device, &config, &camera_bind_group_layout);
        let depth_texture = DepthTexture::new(&device, &config);

        let instance_capacity = INITIAL_INSTANCES.min(max_instances(&device));
        let instance_buffer = create_instance_buffer(&device, instance_capacity);
        let cube_mesh = Mesh::cube(&device);

        // --- Overlay (text) pipeline ---
        let overlay_bind_group_layout = create_overlay_bind_group_layout(&device);
        let overlay_pipeline = create_overlay_pipeline(&device, &config, &overlay_bind_group_layout);

        let (font_pixels, font_w, font_h) = generate_font_atlas();
        let font_texture = device.create_texture_with_data(
            &queue,
            &wgpu::TextureDescriptor {
                label: Some("Font Atlas"),
                size: wgpu::Extent3d {
                    width: font_w,
                    height: font_h,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &font_pixels,
        );
        let font_view = font_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let font_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let overlay_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Overlay Bind Group"),
            layout: &overlay_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&font_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&font_sampler),
                },
            ],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            voxel_pipeline,
            camera_bind_group,
            camera_buffer,
            camera_uniform,
            depth_texture,
            instance_buffer,
            instance_capacity,
            cube_mesh,
            overlay_pipeline,
            overlay_bind_group,
        })
    }

    /// Resize the surface and depth buffer. Zero-sized (minimised) windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config);
    }

    /// Reconfigure with the current size (after `SurfaceError::Lost`/`Outdated`).
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    pub fn update_camera(&mut self, camera: &OrbitCamera) {
        self.camera_uniform.update(camera);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Begin a new frame, returns the surface texture and a command encoder.
    pub fn begin_frame(&mut self) -> Result<(wgpu::SurfaceTexture, wgpu::CommandEncoder), RenderError> {
        let output = self.surface.get_current_texture()?;
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Ok((output, encoder))
    }

    /// Make room for `needed` instances, up to the device's buffer size limit.
    fn reserve_instances(&mut self, needed: usize) {
        let capacity = grown_instance_capacity(self.instance_capacity, needed, max_instances(&self.device));
        if capacity == self.instance_capacity {
            return;
        }
        log::info!("Growing instance buffer: {} -> {} slots", self.instance_capacity, capacity);
        self.instance_buffer = create_instance_buffer(&self.device, capacity);
        self.instance_capacity = capacity;
    }

    /// Clear to black and draw every voxel as an instanced unit cube.
    /// Only instances past the device's buffer limit are dropped, so callers put
    /// the backdrop last.
    pub fn render_voxels(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        instances: &[InstanceData],
    ) {
        self.reserve_instances(instances.len());
        let instance_count = instances.len().min(self.instance_capacity);
        if instance_count < instances.len() {
            log::warn!(
                "Dropping {} voxel instances over the {} slot device limit",
                instances.len() - instance_count,
                self.instance_capacity
            );
        }
        if instance_count > 0 {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..instance_count]),
            );
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Voxel Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.voxel_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.cube_mesh.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.cube_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.cube_mesh.num_indices, 0, 0..instance_count as u32);
    }

    /// Render screen-space text overlay. Call as the very last pass before end_frame.
    /// Takes pre-built overlay vertices and indices from an `OverlayTextBuilder`.
    pub fn render_overlay(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        vertices: &[OverlayVertex],
        indices: &[u32],
    ) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Overlay Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_pipeline(&self.overlay_pipeline);
        render_pass.set_bind_group(0, &self.overlay_bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
    }

    /// End frame and present.
    pub fn end_frame(&self, output: wgpu::SurfaceTexture, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

/// Largest instance count one buffer can hold on this device.
fn max_instances(device: &wgpu::Device) -> usize {
    (device.limits().max_buffer_size / std::mem::size_of::<InstanceData>() as u64) as usize
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (std::mem::size_of::<InstanceData>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Capacity after growing to fit `needed`: doubles from `current`, never above `limit`,
/// never shrinks.
pub fn grown_instance_capacity(current: usize, needed: usize, limit: usize) -> usize {
    if needed <= current {
        return current;
    }
    let mut capacity = current.max(1);
    while capacity < needed {
        capacity = capacity.saturating_mul(2);
    }
    capacity.min(limit).max(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_kept_when_scene_fits() {
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 9800, usize::MAX), INITIAL_INSTANCES);
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 0, usize::MAX), INITIAL_INSTANCES);
    }

    #[test]
    fn capacity_doubles_past_initial() {
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 16_800, usize::MAX), 32_768);
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 70_000, usize::MAX), 131_072);
    }

    #[test]
    fn capacity_capped_by_device_limit() {
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 100_000, 50_000), 50_000);
        assert_eq!(grown_instance_capacity(INITIAL_INSTANCES, 100_000, 1_000), INITIAL_INSTANCES);
    }
}
