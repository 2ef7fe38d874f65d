//! Demo sketch hosting the gesso renderer in a winit window.
//!
//! Draws a handful of animated shapes with the persistent-canvas
//! ping-pong enabled, so moving geometry leaves trails behind.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use gesso_engine::coords::{Mat4, Vec3, Viewport};
use gesso_engine::device::{Gpu, GpuInit, SurfaceErrorAction};
use gesso_engine::logging::{init_logging, LoggingConfig};
use gesso_engine::paint::{Color, StrokeCap};
use gesso_engine::render::{RenderCtx, Renderer2D};
use gesso_engine::shape::{ArcMode, Shape, ShapeKind};

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        env_filter: Some("gesso_engine=info,gesso_sandbox=info,wgpu=warn".into()),
        ..Default::default()
    });

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = Sandbox::new();
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;
    Ok(())
}

struct Sandbox {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    renderer: Option<Renderer2D>,
    started: Instant,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            renderer: None,
            started: Instant::now(),
        }
    }

    fn render_ctx<'a>(window: &Window, gpu: &'a Gpu) -> RenderCtx<'a> {
        let scale = window.scale_factor() as f32;
        let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(scale as f64);
        RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            Viewport::new(logical.width as f32, logical.height as f32),
            scale,
        )
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu), Some(renderer)) =
            (self.window.as_ref(), self.gpu.as_mut(), self.renderer.as_mut())
        else {
            return;
        };

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                if gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                    log::error!("fatal surface error; exiting");
                    event_loop.exit();
                }
                return;
            }
        };

        let ctx = Self::render_ctx(window, gpu);
        let t = self.started.elapsed().as_secs_f32();
        let (w, h) = (ctx.viewport.width, ctx.viewport.height);

        renderer.begin_frame(&ctx, &mut frame.encoder);

        for shape in sketch(t, w, h) {
            if let Err(err) = renderer.render(&shape) {
                log::error!("shape rejected: {err}");
            }
        }

        renderer.end_frame(&ctx, &mut frame.encoder, &frame.view);

        window.pre_present_notify();
        gpu.submit(frame);
        window.request_redraw();
    }
}

impl ApplicationHandler for Sandbox {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("gesso sandbox")
            .with_inner_size(LogicalSize::new(900.0, 600.0));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let init = GpuInit {
            present_mode: wgpu::PresentMode::AutoVsync,
            ..Default::default()
        };
        let gpu = match Gpu::new_blocking(window.clone(), init) {
            Ok(gpu) => gpu,
            Err(err) => {
                log::error!("failed to initialize GPU: {err:#}");
                event_loop.exit();
                return;
            }
        };

        let ctx = Self::render_ctx(&window, &gpu);
        let mut renderer = Renderer2D::new(&ctx);
        renderer.set_background(Color::from_u8(18, 18, 24, 255));

        self.window = Some(window.clone());
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let (Some(window), Some(gpu), Some(renderer)) =
                    (self.window.as_ref(), self.gpu.as_mut(), self.renderer.as_mut())
                {
                    gpu.resize(new_size);
                    let ctx = Self::render_ctx(window, gpu);
                    renderer.reset_view(&ctx);
                }
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}

/// One frame's worth of shapes at time `t`, for a `w` x `h` canvas.
fn sketch(t: f32, w: f32, h: f32) -> Vec<Shape> {
    let mut shapes = Vec::new();

    // Orbiting quad. The persistent canvas turns its path into a trail.
    let (cx, cy) = (w * 0.5, h * 0.5);
    let orbit = 0.32 * h;
    let (ox, oy) = (cx + orbit * (t * 0.9).cos(), cy + orbit * (t * 0.9).sin());
    shapes.push(
        Shape::from_xy(
            ShapeKind::Quads,
            &[
                (ox - 16.0, oy - 16.0),
                (ox + 16.0, oy - 16.0),
                (ox + 16.0, oy + 16.0),
                (ox - 16.0, oy + 16.0),
            ],
        )
        .fill(Color::from_u8(240, 170, 60, 160))
        .stroke(Color::from_u8(255, 230, 190, 255))
        .stroke_weight(2.0),
    );

    // Sine wave across the canvas, stroked only.
    let wave: Vec<(f32, f32)> = (0..=60)
        .map(|i| {
            let x = w * i as f32 / 60.0;
            let y = cy + 40.0 * ((x * 0.02) + t * 2.0).sin();
            (x, y)
        })
        .collect();
    shapes.push(
        Shape::from_xy(ShapeKind::LineStrip, &wave)
            .no_fill()
            .stroke(Color::from_u8(90, 200, 250, 220))
            .stroke_weight(4.0)
            .stroke_cap(StrokeCap::Round),
    );

    // Spinning pie arc in the corner.
    shapes.push(
        Shape::arc(Vec3::xy(110.0, 110.0), 64.0, 64.0, t, t + 2.2, Some(ArcMode::Pie))
            .fill(Color::from_u8(150, 90, 220, 200))
            .stroke(Color::WHITE)
            .stroke_weight(1.5),
    );

    // A rotating pentagon with a triangular hole, via the tessellator.
    let ring = |n: usize, r: f32, phase: f32| -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = phase + std::f32::consts::TAU * i as f32 / n as f32;
                Vec3::xy(r * a.cos(), r * a.sin())
            })
            .collect()
    };
    shapes.push(
        Shape::new(ShapeKind::Polygon, ring(5, 70.0, 0.0))
            .contour(ring(3, 28.0, t))
            .fill(Color::from_u8(80, 190, 120, 230))
            .stroke(Color::from_u8(230, 255, 240, 255))
            .transform(
                Mat4::translation(w - 130.0, h - 130.0, 0.0) * Mat4::rotation_z(t * 0.4),
            ),
    );

    shapes
}
