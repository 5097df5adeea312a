mod app;
mod config;
mod error;
mod gpu;
mod render;
mod scheduler;
mod session;
mod simulation;
mod viewport;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };

    // Redraws are requested per window; otherwise sleep until an event arrives
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
        std::process::exit(1);
    }
}
