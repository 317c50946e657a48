// Renderer module for the transform viewer

use std::sync::Arc;

use glam::Mat4;
use log::{error, info, trace, warn};
use wgpu::util::DeviceExt;
use wgpu::{Buffer, RenderPipeline};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::ModifiersState,
    window::{Window, WindowBuilder},
};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::geometry::{self, Shape, Vertex};
use crate::input;
use crate::session::{Reaction, Session};
use crate::ui::{self, Viewport};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const GRID_HALF_EXTENT: i32 = 20;
const AXIS_LENGTH: f32 = 4.0;
const OVERLAY_CAPACITY: usize = 64;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

// Uniform buffer structure for one draw
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    mvp: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl Uniforms {
    fn new(mvp: Mat4, normal: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
        }
    }
}

/// A uniform buffer and the bind group exposing it at binding 0.
struct UniformSlot {
    buffer: Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, uniforms: Uniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

/// Static vertex data resident on the GPU.
struct GpuMesh {
    buffer: Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Depth test settings for one pipeline.
struct DepthMode {
    write: bool,
    compare: wgpu::CompareFunction,
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    window: Arc<Window>,
    depth_view: wgpu::TextureView,
    scene_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    overlay_pipeline: RenderPipeline,
    shape_meshes: Vec<GpuMesh>,
    grid_mesh: GpuMesh,
    overlay_buffer: Buffer,
    overlay_vertex_count: u32,
    object_uniforms: UniformSlot,
    world_uniforms: UniformSlot,
    overlay_uniforms: UniformSlot,
    config: ViewerConfig,
    session: Session,
    modifiers: ModifiersState,
    cursor: (f32, f32),
}

impl Renderer {
    pub async fn new(event_loop: &EventLoop<()>, config: ViewerConfig) -> ViewerResult<Self> {
        // Create window with Arc for shared ownership
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.as_str())
                .with_inner_size(LogicalSize::new(800.0, 700.0))
                .build(event_loop)?,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::NoAdapter)?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Viewer Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits::default(),
                },
                None, // Trace path
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let (surface_format, present_mode, alpha_mode) = pick_surface_modes(&surface_caps)?;
        info!("Surface format {:?}", surface_format);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        let depth_view = create_depth_view(&device, surface_config.width, surface_config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label: &str, topology, depth: DepthMode| {
            create_pipeline(
                &device,
                &pipeline_layout,
                &shader,
                surface_format,
                label,
                topology,
                depth,
            )
        };
        let scene_pipeline = pipeline(
            "Scene Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            DepthMode {
                write: true,
                compare: wgpu::CompareFunction::Less,
            },
        );
        let line_pipeline = pipeline(
            "Grid Pipeline",
            wgpu::PrimitiveTopology::LineList,
            DepthMode {
                write: true,
                compare: wgpu::CompareFunction::Less,
            },
        );
        let overlay_pipeline = pipeline(
            "Overlay Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            DepthMode {
                write: false,
                compare: wgpu::CompareFunction::Always,
            },
        );

        let shape_meshes = Shape::ALL
            .iter()
            .map(|shape| {
                let vertices: Vec<Vertex> = shape.vertices().collect();
                GpuMesh::upload(&device, shape.label(), &vertices)
            })
            .collect();
        let grid_mesh = GpuMesh::upload(
            &device,
            "Grid",
            &geometry::grid_lines(GRID_HALF_EXTENT, AXIS_LENGTH),
        );
        let overlay_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Overlay Buffer"),
            size: (OVERLAY_CAPACITY * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let object_uniforms = UniformSlot::new(&device, &bind_group_layout, "Object Uniforms");
        let world_uniforms = UniformSlot::new(&device, &bind_group_layout, "World Uniforms");
        let overlay_uniforms = UniformSlot::new(&device, &bind_group_layout, "Overlay Uniforms");

        let session = Session::new(&config);
        window.set_title(&format!("{} - {}", config.title, session.status_line()));

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            window,
            depth_view,
            scene_pipeline,
            line_pipeline,
            overlay_pipeline,
            shape_meshes,
            grid_mesh,
            overlay_buffer,
            overlay_vertex_count: 0,
            object_uniforms,
            world_uniforms,
            overlay_uniforms,
            config,
            session,
            modifiers: ModifiersState::empty(),
            cursor: (0.0, 0.0),
        })
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> ViewerResult<()> {
        event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            if window_id != self.window.id() {
                return;
            }

            match event {
                WindowEvent::CloseRequested => target.exit(),
                WindowEvent::Resized(physical_size) => {
                    self.resize(physical_size);
                    self.window.request_redraw();
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    self.modifiers = modifiers.state();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(press) = input::key_press(&event, self.modifiers) {
                        let reaction = self.session.handle_key(press);
                        self.react(reaction, target);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    self.cursor = (position.x as f32, position.y as f32);
                    let reaction = self.session.handle_pointer_motion(self.cursor.0, self.cursor.1);
                    self.react(reaction, target);
                }
                WindowEvent::MouseInput { state, button, .. } => match button {
                    MouseButton::Left if state == ElementState::Pressed => {
                        let (x, y) = self.cursor;
                        let reaction = self.session.handle_click(x, y, self.viewport());
                        self.react(reaction, target);
                    }
                    MouseButton::Right => {
                        self.session
                            .handle_look_button(state == ElementState::Pressed);
                    }
                    _ => {}
                },
                WindowEvent::RedrawRequested => self.update_and_render(target),
                _ => {}
            }
        })?;
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.surface_config.width as f32,
            self.surface_config.height as f32,
        )
    }

    fn react(&self, reaction: Reaction, target: &EventLoopWindowTarget<()>) {
        match reaction {
            Reaction::Ignored => {}
            Reaction::Redraw => {
                self.window.set_title(&format!(
                    "{} - {}",
                    self.config.title,
                    self.session.status_line()
                ));
                self.window.request_redraw();
            }
            Reaction::Exit => {
                info!("Exit requested");
                target.exit();
            }
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    fn update_and_render(&mut self, target: &EventLoopWindowTarget<()>) {
        let viewport = self.viewport();
        let projection = Mat4::perspective_rh(
            self.config.fov_y_deg.to_radians(),
            viewport.aspect_ratio(),
            self.config.z_near,
            self.config.z_far,
        );
        let view = self.session.camera().view_matrix();

        // Object matrix arrives column-major from the session's adapter
        let model = Mat4::from_cols_array(&self.session.render_matrix());
        trace!("model matrix {:?}", model);

        self.object_uniforms.write(
            &self.queue,
            Uniforms::new(projection * view * model, normal_matrix(model)),
        );
        self.world_uniforms
            .write(&self.queue, Uniforms::new(projection * view, Mat4::IDENTITY));
        self.overlay_uniforms.write(
            &self.queue,
            Uniforms::new(
                Mat4::orthographic_rh(0.0, viewport.width, viewport.height, 0.0, -1.0, 1.0),
                Mat4::IDENTITY,
            ),
        );

        let buttons = ui::layout(viewport);
        let mut overlay = ui::overlay_vertices(&buttons, |action| self.session.is_selected(action));
        overlay.truncate(OVERLAY_CAPACITY);
        self.queue
            .write_buffer(&self.overlay_buffer, 0, bytemuck::cast_slice(&overlay));
        self.overlay_vertex_count = overlay.len() as u32;

        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.resize(self.window.inner_size());
                self.window.request_redraw();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Surface out of memory");
                target.exit();
            }
            Err(err) => warn!("Skipping frame: {}", err),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_bind_group(0, &self.world_uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.grid_mesh.buffer.slice(..));
            render_pass.draw(0..self.grid_mesh.vertex_count, 0..1);

            let mesh = &self.shape_meshes[self.session.shape().index()];
            render_pass.set_pipeline(&self.scene_pipeline);
            render_pass.set_bind_group(0, &self.object_uniforms.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.buffer.slice(..));
            render_pass.draw(0..mesh.vertex_count, 0..1);

            if self.overlay_vertex_count > 0 {
                render_pass.set_pipeline(&self.overlay_pipeline);
                render_pass.set_bind_group(0, &self.overlay_uniforms.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.overlay_buffer.slice(..));
                render_pass.draw(0..self.overlay_vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    topology: wgpu::PrimitiveTopology,
    depth: DepthMode,
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &VERTEX_ATTRIBUTES,
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Reflection flips winding, so both faces stay visible.
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth.write,
            depth_compare: depth.compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

/// Prefer an sRGB format; otherwise take the first of each capability.
fn pick_surface_modes(
    caps: &wgpu::SurfaceCapabilities,
) -> ViewerResult<(wgpu::TextureFormat, wgpu::PresentMode, wgpu::CompositeAlphaMode)> {
    let format = caps
        .formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| caps.formats.first().copied())
        .ok_or(ViewerError::UnsupportedSurface)?;
    let present_mode = caps
        .present_modes
        .first()
        .copied()
        .ok_or(ViewerError::UnsupportedSurface)?;
    let alpha_mode = caps
        .alpha_modes
        .first()
        .copied()
        .ok_or(ViewerError::UnsupportedSurface)?;
    Ok((format, present_mode, alpha_mode))
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Inverse-transpose for lighting normals. Shear can make the model
/// singular; fall back to the model itself then.
fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant().abs() > f32::EPSILON {
        model.inverse().transpose()
    } else {
        model
    }
}
