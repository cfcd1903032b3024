//! Window event handling for ViewerState.

use renderer::RenderError;
use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

use crate::state::ViewerState;

impl ViewerState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state, event.repeat);
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.cursor_inside {
                    self.input.process_cursor_position((position.x, position.y));
                } else {
                    self.input.warp_cursor((position.x, position.y));
                    self.cursor_inside = true;
                }
                false
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor_inside = false;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.process_scroll(delta);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                match self.render() {
                    Ok(()) => {}
                    Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        log::debug!("Surface lost or outdated, reconfiguring");
                        self.renderer.reconfigure();
                    }
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("Out of GPU memory, exiting");
                        self.running = false;
                    }
                    Err(e) => log::warn!("Frame skipped: {}", e),
                }
                self.renderer.window.request_redraw();
                !self.running
            }
            _ => false,
        }
    }
}
