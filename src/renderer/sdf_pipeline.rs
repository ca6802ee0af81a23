//! SDF-based WebGPU render pipeline
//!
//! Draws the whole frame in the fragment shader with signed distance fields:
//! one fullscreen triangle, everything else comes from uniform buffers.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::{Scene, dim_for};
use crate::consts::*;
use crate::sim::{GameState, tilt_degrees};

/// Maximum pipes uploaded per frame
const MAX_PIPES: usize = 8;
/// Maximum clouds uploaded per frame
const MAX_CLOUDS: usize = 16;
/// Maximum particles uploaded per frame (High preset cap)
const MAX_PARTICLES: usize = 192;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    play_size: [f32; 2],  // offset 8
    time: f32,            // offset 16
    ground_height: f32,   // offset 20
    bird_tilt: f32,       // offset 24 - radians, positive is nose down
    flash: f32,           // offset 28
    bird_pos: [f32; 2],   // offset 32 - top-left corner
    bird_size: [f32; 2],  // offset 40
    pipe_count: u32,      // offset 48
    cloud_count: u32,     // offset 52
    particle_count: u32,  // offset 56
    dim: f32,             // offset 60
    scroll: f32,          // offset 64 - ground scroll in px
    _pad: [u32; 3],       // pad to 80 bytes
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PipeData {
    x: f32,
    gap_top: f32,
    gap_bottom: f32,
    width: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CloudData {
    pos: [f32; 2],
    size: f32,
    opacity: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleData {
    pos: [f32; 2],
    size: f32,
    life: f32, // 0-1 remaining
    color: u32,
    _pad: [u32; 3], // 32-byte stride for uniform arrays
}

/// Renderer setup failures
#[derive(Debug)]
pub enum RendererError {
    Device(wgpu::RequestDeviceError),
    NoSurfaceFormat,
}

impl std::fmt::Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::Device(e) => write!(f, "failed to create device: {}", e),
            RendererError::NoSurfaceFormat => write!(f, "surface reports no formats"),
        }
    }
}

impl std::error::Error for RendererError {}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    pipes_buffer: wgpu::Buffer,
    clouds_buffer: wgpu::Buffer,
    particles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn array_buffer(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RendererError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(RendererError::Device)?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RendererError::NoSurfaceFormat)?;
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let pipes_buffer = array_buffer(
            &device,
            "pipes",
            std::mem::size_of::<PipeData>() * MAX_PIPES,
        );
        let clouds_buffer = array_buffer(
            &device,
            "clouds",
            std::mem::size_of::<CloudData>() * MAX_CLOUDS,
        );
        let particles_buffer = array_buffer(
            &device,
            "particles",
            std::mem::size_of::<ParticleData>() * MAX_PARTICLES,
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                uniform_entry(2),
                uniform_entry(3),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: pipes_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: clouds_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: particles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("Renderer ready ({}x{})", width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            pipes_buffer,
            clouds_buffer,
            particles_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the latest snapshot and draw one frame
    pub fn render(
        &mut self,
        state: &GameState,
        scene: &Scene,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame
        let elapsed = (time / 1000.0) as f32;

        let pipes = pipe_data(state);
        let clouds = cloud_data(scene);
        let particles = particle_data(scene);

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            play_size: [PLAY_WIDTH, PLAY_HEIGHT],
            time: elapsed,
            ground_height: GROUND_HEIGHT,
            bird_tilt: tilt_degrees(state.bird.velocity).to_radians(),
            flash: scene.flash,
            bird_pos: [state.bird.x, state.bird.y],
            bird_size: [state.bird.width, state.bird.height],
            pipe_count: state.pipes.len().min(MAX_PIPES) as u32,
            cloud_count: scene.clouds.len().min(MAX_CLOUDS) as u32,
            particle_count: scene.particles.len().min(MAX_PARTICLES) as u32,
            dim: dim_for(state.phase),
            scroll: (state.frame_count as f32 * PIPE_SPEED) % 24.0,
            _pad: [0; 3],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.pipes_buffer, 0, bytemuck::cast_slice(&pipes));
        self.queue
            .write_buffer(&self.clouds_buffer, 0, bytemuck::cast_slice(&clouds));
        self.queue
            .write_buffer(&self.particles_buffer, 0, bytemuck::cast_slice(&particles));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn pipe_data(state: &GameState) -> [PipeData; MAX_PIPES] {
    let mut data = [PipeData::zeroed(); MAX_PIPES];
    for (slot, pipe) in data.iter_mut().zip(&state.pipes) {
        *slot = PipeData {
            x: pipe.x,
            gap_top: pipe.gap_top,
            gap_bottom: pipe.gap_bottom,
            width: pipe.width,
        };
    }
    data
}

fn cloud_data(scene: &Scene) -> [CloudData; MAX_CLOUDS] {
    let mut data = [CloudData::zeroed(); MAX_CLOUDS];
    for (slot, cloud) in data.iter_mut().zip(&scene.clouds) {
        *slot = CloudData {
            pos: cloud.pos.to_array(),
            size: cloud.size,
            opacity: cloud.opacity,
        };
    }
    data
}

fn particle_data(scene: &Scene) -> Vec<ParticleData> {
    let mut data = vec![ParticleData::zeroed(); MAX_PARTICLES];
    for (slot, p) in data.iter_mut().zip(&scene.particles) {
        *slot = ParticleData {
            pos: p.pos.to_array(),
            size: p.size,
            life: p.life_ratio(),
            color: p.color,
            _pad: [0; 3],
        };
    }
    data
}
