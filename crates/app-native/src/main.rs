use std::time::Instant;

use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use app_core::{
    command_for_key, BackendError, DrawGeometry, InputController, InputEvent, RenderBackend, Scene,
    Topology,
};
use glam::Vec2;

// Shared index-buffer budget across all curves in a frame.
const MAX_DRAW_SAMPLES: u32 = 60_000;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CurveParams {
    color: [f32; 4],
    resolution: [f32; 2],
    point_size: f32,
    time: f32,
    mode: u32,
    segments: u32,
    control_count: u32,
    shape_type: u32,
}

struct QueuedDraw {
    params: CurveParams,
    control_points: Vec<[f32; 2]>,
    sample_count: u32,
    topology: Topology,
}

/// Collects the scene's draw calls for one frame before GPU submission.
struct FrameQueue {
    resolution: [f32; 2],
    time: f32,
    calls: Vec<QueuedDraw>,
}

impl RenderBackend for FrameQueue {
    fn draw(&mut self, geometry: &DrawGeometry, topology: Topology) -> Result<(), BackendError> {
        if geometry.sample_count > MAX_DRAW_SAMPLES {
            return Err(BackendError::Capacity {
                requested: geometry.sample_count,
                capacity: MAX_DRAW_SAMPLES,
            });
        }
        self.calls.push(QueuedDraw {
            params: CurveParams {
                color: geometry.color,
                resolution: self.resolution,
                point_size: geometry.point_size,
                time: self.time,
                mode: geometry.mode.index(),
                segments: geometry.segments,
                control_count: geometry.control_points.len() as u32,
                shape_type: geometry.shape_type,
            },
            control_points: geometry.control_points.clone(),
            sample_count: geometry.sample_count,
            topology,
        });
        Ok(())
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    width: u32,
    height: u32,
    start: Instant,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("curves"),
            source: wgpu::ShaderSource::Wgsl(app_core::CURVES_WGSL.into()),
        });

        // Quad vertices for two triangles (sample-point glyphs)
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("curve_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("curve_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let color_target = wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        };

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(color_target.clone())],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        };
        let point_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("point_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_point"),
                buffers: &[quad_layout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_point"),
                targets: &[Some(color_target)],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            line_pipeline,
            point_pipeline,
            quad_vb,
            bind_group_layout,
            width: size.width.max(1),
            height: size.height.max(1),
            start: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.width = new_size.width;
        self.height = new_size.height;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut batch = FrameQueue {
            resolution: [self.width as f32, self.height as f32],
            time: self.start.elapsed().as_secs_f32(),
            calls: Vec::new(),
        };
        scene.render(&mut batch);

        // Per-call buffers must stay alive until submission.
        let mut bindings = Vec::with_capacity(batch.calls.len());
        for call in &batch.calls {
            let params_buf = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("curve_params"),
                    contents: bytemuck::bytes_of(&call.params),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
            let points_buf = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("control_points"),
                    contents: bytemuck::cast_slice(&call.control_points),
                    usage: wgpu::BufferUsages::STORAGE,
                });
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("curve_bg"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params_buf.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: points_buf.as_entire_binding(),
                    },
                ],
            });
            bindings.push((params_buf, points_buf, bind_group));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.04,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        for (call, (_, _, bind_group)) in batch.calls.iter().zip(&bindings) {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("curve"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            rpass.set_bind_group(0, bind_group, &[]);
            match call.topology {
                Topology::LineStrip => {
                    rpass.set_pipeline(&self.line_pipeline);
                    rpass.draw(0..call.sample_count, 0..1);
                }
                Topology::Points => {
                    rpass.set_pipeline(&self.point_pipeline);
                    rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                    rpass.draw(0..6, 0..call.sample_count);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn log_readout(scene: &Scene) {
    let r = scene.readout();
    log::info!(
        "curves: {} | mode: {} | velocity: {} | segments: {} | animating: {} | special: {}",
        r.curve_count,
        r.mode.name(),
        r.velocity,
        r.segments,
        r.animating,
        r.special_mode
    );
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = WindowBuilder::new()
        .with_title("Spline Sketchpad (native)")
        .build(&event_loop)
        .expect("window");

    let mut state = pollster::block_on(GpuState::new(&window)).expect("gpu");

    let mut scene = Scene::new(clock_seed());
    let mut controller = InputController::default();
    let mut cursor = Vec2::ZERO;
    let mut last_tick = Instant::now();
    log_readout(&scene);

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => state.resize(size),
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::CursorMoved { position, .. } => {
                    let x = (position.x as f32 / state.width as f32) * 2.0 - 1.0;
                    let y = -((position.y as f32 / state.height as f32) * 2.0 - 1.0);
                    cursor = Vec2::new(x, y);
                    controller.handle(&mut scene, InputEvent::PointerMove(cursor));
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    let pointer_event = match button_state {
                        ElementState::Pressed => InputEvent::PointerDown(cursor),
                        ElementState::Released => InputEvent::PointerUp(cursor),
                    };
                    controller.handle(&mut scene, pointer_event);
                    log_readout(&scene);
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state != ElementState::Pressed {
                        return;
                    }
                    let command = match &key_event.logical_key {
                        Key::Named(NamedKey::Space) => command_for_key(" "),
                        Key::Character(text) => command_for_key(text.as_str()),
                        _ => None,
                    };
                    if let Some(command) = command {
                        controller.handle(&mut scene, InputEvent::Key(command));
                        log_readout(&scene);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let elapsed_ms = last_tick.elapsed().as_secs_f32() * 1000.0;
                last_tick = Instant::now();
                scene.tick(elapsed_ms);
                match state.render(&mut scene) {
                    Ok(_) => state.window.request_redraw(),
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                    Err(_) => {}
                }
            }
            _ => {}
        })
        .unwrap();
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}
