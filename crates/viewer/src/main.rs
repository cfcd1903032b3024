//! Vavatch Orbital: a voxel scale comparison between a Culture Orbital and Earth.
//!
//! Built on wgpu + winit. The ring is regenerated as the scale slider moves and the
//! camera eases back to keep it framed.

mod config;
mod events;
mod render;
mod scale;
mod scene;
mod state;

use anyhow::Result;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::state::ViewerState;

/// Application handler for winit.
struct App {
    state: Option<ViewerState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = ViewerConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Vavatch Orbital")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(ViewerState::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                       VAVATCH ORBITAL                        ║");
    println!("╠══════════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                                   ║");
    println!("║    Left/Right  - Scale step     │  Shift      - Step x10      ║");
    println!("║    Home/End    - Visible/True   │  Drag bar   - Set scale     ║");
    println!("║    Left drag   - Orbit camera   │  Wheel      - Zoom          ║");
    println!("║    I           - Toggle info    │  Q          - Ask Ship Mind ║");
    println!("║    Escape      - Quit                                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");

    log::info!("Starting Vavatch Orbital scale comparison");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
