use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::config::{INITIAL_VERTEX_CAPACITY, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::error::SurfaceError;
use crate::gpu::{GpuContext, RenderPipeline, ShapeBuffers};
use crate::render::ShapeBatch;
use crate::scheduler::FrameState;
use crate::session::{FrameOutcome, Session};
use crate::simulation::{DotGrid, Field, WaveField};
use crate::viewport::Viewport;

/// GPU resources behind one window
struct FieldSurface {
    gpu: GpuContext,
    buffers: ShapeBuffers,
    pipeline: RenderPipeline,
}

impl FieldSurface {
    fn new(window: Arc<Window>) -> Result<Self, SurfaceError> {
        let gpu = pollster::block_on(GpuContext::new(window))?;
        let buffers = ShapeBuffers::new(&gpu.device, INITIAL_VERTEX_CAPACITY);
        let pipeline = RenderPipeline::new(&gpu.device, gpu.format(), &buffers);
        Ok(Self {
            gpu,
            buffers,
            pipeline,
        })
    }

    fn present(&mut self, batch: &ShapeBatch, background: [f64; 4], viewport: Viewport) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.buffers
            .upload(&self.gpu.device, &self.gpu.queue, batch.vertices());
        self.buffers.update_view(
            &self.gpu.queue,
            viewport.width,
            viewport.height,
            self.gpu.format().is_srgb(),
        );

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });
        self.pipeline
            .draw(&mut encoder, &view, &self.buffers, background);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// One window hosting one field
struct FieldWindow {
    window: Arc<Window>,
    session: Session,
    /// None when no drawable surface could be acquired; the window stays static
    surface: Option<FieldSurface>,
    batch: ShapeBatch,
    occluded: bool,
    minimized: bool,
    fps_counter: FpsCounter,
}

impl FieldWindow {
    fn open(event_loop: &ActiveEventLoop, field: Box<dyn Field>) -> Option<Self> {
        let title = field.name();
        let window_attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::warn!("{}: failed to create window: {}", title, e);
                return None;
            }
        };

        let viewport = Viewport::from_size(window.inner_size(), window.scale_factor());
        let mut session = Session::new(field, viewport);

        let surface = match FieldSurface::new(window.clone()) {
            Ok(surface) => Some(surface),
            Err(e) => {
                log::warn!("{}: {}; animation disabled", title, e);
                session.teardown();
                None
            }
        };

        log::info!(
            "{}: window {:?} with {} agents",
            title,
            window.id(),
            session.agent_count()
        );

        let mut field_window = Self {
            window,
            session,
            surface,
            batch: ShapeBatch::with_capacity(INITIAL_VERTEX_CAPACITY),
            occluded: false,
            minimized: false,
            fps_counter: FpsCounter::new(),
        };
        if field_window.session.start() {
            field_window.window.request_redraw();
        }
        Some(field_window)
    }

    /// Physical size or scale factor changed
    fn resized(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let viewport = Viewport::from_size(size, scale_factor);
        self.minimized = viewport.is_empty();
        self.update_visibility();
        if !self.minimized {
            self.session.resize_requested(viewport, Instant::now());
        }
    }

    fn update_visibility(&mut self) {
        let visible = !self.occluded && !self.minimized;
        if self.session.set_visible(visible) {
            self.window.request_redraw();
        }
    }

    fn redraw(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match self.session.frame(&mut self.batch) {
            FrameOutcome::Hidden => return,
            // Host asked for a repaint while the loop sleeps
            FrameOutcome::Idle => self.session.repaint(&mut self.batch),
            FrameOutcome::Drawn(state) => {
                if state == FrameState::Scheduled {
                    self.window.request_redraw();
                }
                if let Some(fps) = self.fps_counter.tick() {
                    self.window.set_title(&format!(
                        "{} - {:.0} FPS - {} agents",
                        self.session.name(),
                        fps,
                        self.session.agent_count()
                    ));
                }
            }
        }

        let viewport = self.session.viewport();
        self.batch.apply_layer(self.session.layer(), viewport.height);
        surface.present(&self.batch, self.session.background(), viewport);
    }

    fn poll_resize(&mut self, now: Instant) {
        let Some(viewport) = self.session.poll_resize(now) else {
            return;
        };
        log::debug!(
            "{}: resized to {}x{}",
            self.session.name(),
            viewport.width,
            viewport.height
        );
        // The surface stays in physical pixels; the view uniform carries the logical size
        if let Some(surface) = self.surface.as_mut() {
            let size = self.window.inner_size();
            surface.gpu.resize(size.width, size.height);
        }
        self.window.request_redraw();
    }
}

impl Drop for FieldWindow {
    fn drop(&mut self) {
        self.session.teardown();
    }
}

/// Application state
pub struct App {
    windows: HashMap<WindowId, FieldWindow>,
    initialized: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            initialized: false,
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        if let Some(field_window) = self.windows.remove(&window_id) {
            log::info!("{}: closed", field_window.session.name());
        }
        if self.windows.is_empty() {
            log::info!("All fields closed, exiting...");
            event_loop.exit();
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        log::info!("Opening ambient fields...");

        let fields: [Box<dyn Field>; 2] = [Box::new(WaveField::new()), Box::new(DotGrid::new())];
        for field in fields {
            if let Some(field_window) = FieldWindow::open(event_loop, field) {
                self.windows.insert(field_window.window.id(), field_window);
            }
        }

        if self.windows.is_empty() {
            log::warn!("No field could be opened, exiting...");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close(event_loop, window_id);
                return;
            }
            _ => {}
        }

        let Some(field_window) = self.windows.get_mut(&window_id) else {
            return;
        };

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position: LogicalPosition<f32> =
                    position.to_logical(field_window.window.scale_factor());
                if field_window.session.pointer_moved(position.x, position.y) {
                    field_window.window.request_redraw();
                }
            }
            WindowEvent::CursorLeft { .. } => {
                field_window.session.pointer_left();
            }
            WindowEvent::Resized(new_size) => {
                let scale_factor = field_window.window.scale_factor();
                field_window.resized(new_size, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = field_window.window.inner_size();
                field_window.resized(size, scale_factor);
            }
            WindowEvent::Occluded(occluded) => {
                field_window.occluded = occluded;
                field_window.update_visibility();
            }
            WindowEvent::RedrawRequested => {
                field_window.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let mut next_deadline: Option<Instant> = None;

        for field_window in self.windows.values_mut() {
            field_window.poll_resize(now);
            if let Some(deadline) = field_window.session.resize_deadline() {
                next_deadline = Some(next_deadline.map_or(deadline, |d| d.min(deadline)));
            }
        }

        // Sleep until the next debounce expires; frames are driven by redraw requests
        match next_deadline {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Dropping each window tears its session down
        self.windows.clear();
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
