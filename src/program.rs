use std::time::Instant;

use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::{
    config::AppConfig,
    context::RenderContext,
    error::{BootstrapError, EXIT_FAILURE, EXIT_SUCCESS},
    frame::{FrameState, Viewport},
    lifecycle::{FramePacing, LoopState},
    mesh::QuadMesh,
    pipeline::QuadPipeline,
    surface::{retry_after, SurfaceError, SurfaceRenderer},
    texture::{timer_seed, GpuTexture, NoiseTexture},
};

pub struct Program {
    event_loop: EventLoop<()>,
    renderer: QuadRenderer,
}

/// The one window and everything drawn into it.
struct QuadRenderer {
    render_ctx: RenderContext,
    surface: SurfaceRenderer,

    quad: QuadPipeline,
    mesh: QuadMesh,
    /// Owns the one noise texture for the life of the program; only the
    /// pipeline's bind group reads it.
    #[allow(dead_code)]
    noise: GpuTexture,

    tint: [f32; 3],
    pacing: FramePacing,
    state: LoopState,
    exit_code: i32,
    frames: u64,

    // Must outlive `surface`; fields drop in declaration order.
    window: winit::window::Window,
}

impl Program {
    pub async fn new(config: AppConfig) -> Result<Self, BootstrapError> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_inner_size(config.size)
            .with_title(config.title.clone())
            .build(&event_loop)
            .map_err(BootstrapError::Window)?;

        log::info!("created window {:?}", config.title);

        let (render_ctx, surface) = RenderContext::new(&window, &config).await?;
        let surface = SurfaceRenderer::new(surface, &window, &render_ctx);

        let seed = config.seed.unwrap_or_else(timer_seed);
        let noise = NoiseTexture::generate(seed).upload(&render_ctx);
        let mesh = QuadMesh::upload(&render_ctx);
        let quad = QuadPipeline::new(&render_ctx, surface.format(), &noise).await?;

        Ok(Self {
            event_loop,
            renderer: QuadRenderer {
                render_ctx,
                surface,
                quad,
                mesh,
                noise,
                tint: config.tint,
                pacing: config.pacing,
                state: LoopState::Running,
                exit_code: EXIT_SUCCESS,
                frames: 0,
                window,
            },
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            mut renderer,
        } = self;

        event_loop.run(move |event, _, control_flow| match event {
            Event::WindowEvent { event, window_id } if window_id == renderer.window.id() => {
                renderer.handle_window_event(&event);
            }

            Event::MainEventsCleared => {
                if renderer.state.is_running() {
                    renderer.window.request_redraw();
                    *control_flow = renderer.pacing.control_flow(Instant::now());
                } else {
                    control_flow.set_exit_with_code(renderer.exit_code);
                }
            }

            Event::RedrawRequested(window_id)
                if window_id == renderer.window.id() && renderer.state.is_running() =>
            {
                renderer.handle_redraw_request(control_flow);
            }

            Event::LoopDestroyed => {
                log::info!("shutting down after {} frames", renderer.frames);
            }

            _ => (),
        })
    }
}

impl QuadRenderer {
    fn handle_window_event(&mut self, event: &WindowEvent) {
        self.state = self.state.on_window_event(event);
    }

    fn handle_redraw_request(&mut self, control_flow: &mut ControlFlow) {
        let error = match self.draw() {
            Ok(_) => return,
            Err(error) => error,
        };

        match error {
            SurfaceError::Lost => log::debug!("surface lost, reconfigured"),
            SurfaceError::Outdated => self.surface.reconfigure(&self.render_ctx),
            SurfaceError::OutOfMemory => {
                log::error!("out of memory while acquiring the next frame");
                self.state = LoopState::Closing;
                self.exit_code = EXIT_FAILURE;
                control_flow.set_exit_with_code(EXIT_FAILURE);
            }
            ref e => log::warn!("skipping frame: {:?}", e),
        }

        // The frame was not presented; draw again before the loop blocks.
        if retry_after(&error) {
            self.window.request_redraw();
        }
    }

    fn draw(&mut self) -> Result<(), SurfaceError> {
        let frame = FrameState::new(self.window.inner_size());
        if frame.is_empty() {
            log::trace!("framebuffer has no area, skipping frame");
            return Ok(());
        }

        self.surface.ensure_size(frame.size, &self.render_ctx);

        let (device, queue) = self.render_ctx.get_device();
        self.quad.write_uniforms(queue, &frame, self.tint);

        let output = self.surface.get_current_texture(&self.render_ctx)?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("quad frame"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            let Viewport {
                x,
                y,
                width,
                height,
            } = frame.viewport;
            render_pass.set_viewport(x, y, width, height, 0.0, 1.0);

            self.quad.bind(&mut render_pass);
            self.mesh.draw(&mut render_pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frames += 1;
        log::trace!(
            "presented frame {} at {}x{}",
            self.frames,
            frame.size.width,
            frame.size.height
        );

        Ok(())
    }
}
