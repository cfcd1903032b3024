//! Viewer state: scene, camera, slider and Ship Mind queries, advanced once per frame.

use anyhow::Result;
use engine_core::FrameClock;
use input::{InputState, ScaleJump};
use renderer::{InstanceData, OrbitCamera, RenderError, Renderer};
use shipmind::{QueryTracker, ShipMind};
use std::sync::Arc;
use winit::window::Window;

use crate::config::ViewerConfig;
use crate::render::overlay::{Hud, SliderLayout};
use crate::scale::{OrbitalStats, ScaleRatio};
use crate::scene::SceneComposer;

/// Orbit drag sensitivity at multiplier 1.0, radians per pixel.
const BASE_SENSITIVITY: f32 = 0.005;

pub struct ViewerState {
    pub renderer: Renderer,
    pub camera: OrbitCamera,
    pub input: InputState,
    pub clock: FrameClock,
    pub scene: SceneComposer,
    pub ratio: ScaleRatio,
    pub show_panel: bool,
    pub ship_mind: Arc<ShipMind>,
    pub queries: QueryTracker,
    pub stats: OrbitalStats,
    pub(crate) instances: Vec<InstanceData>,
    pub(crate) cursor_inside: bool,
    slider_drag: bool,
    pub running: bool,
}

impl ViewerState {
    pub async fn new(window: Arc<Window>, config: ViewerConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.vsync).await?;

        let ratio = ScaleRatio::VISIBLE;
        let scene = SceneComposer::new(&config, ratio.ring_radius());
        let instances = scene.instances();

        let mut camera = OrbitCamera::framing(ratio.ring_radius());
        camera.sensitivity = BASE_SENSITIVITY * config.sensitivity;
        let (width, height) = renderer.dimensions();
        camera.set_aspect(width, height);

        let ship_mind = Arc::new(ShipMind::from_config(&config.ship_mind));
        let stats = OrbitalStats::true_scale(config.ring_width);

        Ok(Self {
            renderer,
            camera,
            input: InputState::new(),
            clock: FrameClock::new(),
            scene,
            ratio,
            show_panel: true,
            ship_mind,
            queries: QueryTracker::new(),
            stats,
            instances,
            cursor_inside: false,
            slider_drag: false,
            running: true,
        })
    }

    /// Move the slider. Regenerates the ring and re-aims the camera when the value changes.
    pub fn set_ratio(&mut self, ratio: ScaleRatio) {
        if ratio == self.ratio {
            return;
        }
        self.ratio = ratio;
        let radius = ratio.ring_radius();
        if self.scene.set_ring_radius(radius) {
            self.instances = self.scene.instances();
        }
        self.camera.retarget_for_radius(radius);
        log::debug!(
            "Scale step {} -> ring radius {:.1} ({} land voxels)",
            ratio.steps(),
            radius,
            self.scene.ring().count(procgen::RingFeature::Land)
        );
    }

    /// Advance one frame: apply input, collect query results, ease the camera.
    pub fn update(&mut self) {
        self.clock.tick();
        let dt = self.clock.delta_seconds();

        if self.queries.poll() {
            log::info!("Ship Mind answer received");
        }

        if self.input.is_quit_pressed() {
            self.running = false;
        }
        if self.input.is_panel_toggle_pressed() {
            self.show_panel = !self.show_panel;
        }
        if self.input.is_query_pressed() && self.queries.issue(Arc::clone(&self.ship_mind)).is_some() {
            self.show_panel = true;
        }

        if let Some(jump) = self.input.scale_jump() {
            self.set_ratio(match jump {
                ScaleJump::Start => ScaleRatio::VISIBLE,
                ScaleJump::End => ScaleRatio::TRUE,
            });
        }
        let steps = self.input.scale_steps();
        if steps != 0 {
            self.set_ratio(self.ratio.stepped(steps));
        }

        self.update_pointer();
        self.camera.update(dt);
        self.input.begin_frame();
    }

    /// Left drag moves the slider if it started on the slider, otherwise orbits.
    fn update_pointer(&mut self) {
        let (width, height) = self.renderer.dimensions();
        let slider = SliderLayout::for_screen(width as f32, height as f32);
        let cursor = self.input.mouse_position();

        if self.input.is_mouse_pressed(input::MouseButton::Left) {
            self.slider_drag = slider.contains(cursor);
        }
        if self.input.is_drag_held() {
            if self.slider_drag {
                self.set_ratio(slider.ratio_at(cursor.x));
            } else {
                let delta = self.input.mouse_delta();
                self.camera.process_mouse(delta.x, delta.y);
            }
        } else {
            self.slider_drag = false;
        }

        let scroll = self.input.scroll_lines();
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }
    }

    pub fn hud(&self) -> Hud<'_> {
        Hud {
            ratio: self.ratio,
            show_panel: self.show_panel,
            loading: self.queries.is_loading(),
            info: self.queries.current(),
            stats: self.stats,
            fps: self.clock.fps(),
        }
    }

    pub fn render(&mut self) -> Result<(), RenderError> {
        crate::render::run(self)
    }
}
