//! Vertex types and layouts for rendering.

use crate::font::{FONT_COLS, FONT_ROWS, GLYPH_PX_H, GLYPH_PX_W};
use bytemuck::{Pod, Zeroable};
use engine_core::Rgb;
use glam::Mat4;

/// Mesh vertex with position, normal, and UV coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self { position, normal, tex_coords }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV/Tex coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Per-instance data for the voxel pipeline.
///
/// `color.w` selects shading: 1.0 is lit by the scene lights, 0.0 is emissive (stars).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Model matrix (4x4)
    pub model: [[f32; 4]; 4],
    /// Linear RGB plus shading flag
    pub color: [f32; 4],
}

impl InstanceData {
    /// Lit instance from a palette colour (converted to linear here).
    pub fn lit(model: Mat4, color: Rgb) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_linear().with_alpha(1.0),
        }
    }

    /// Unlit instance drawn at full palette colour.
    pub fn emissive(model: Mat4, color: Rgb) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.to_linear().with_alpha(0.0),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // Model matrix column 0
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 1
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 2
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Model matrix column 3
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Vertex for screen-space text / UI overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OverlayVertex {
    /// NDC position (x, y) in -1..1
    pub position: [f32; 2],
    /// UV into font atlas (negative x = solid color quad)
    pub tex_coords: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Builds screen-space overlay geometry: glyph quads and solid rectangles, in pixels.
pub struct OverlayTextBuilder {
    pub vertices: Vec<OverlayVertex>,
    pub indices: Vec<u32>,
    screen_w: f32,
    screen_h: f32,
}

impl OverlayTextBuilder {
    pub fn new(screen_w: f32, screen_h: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            screen_w: screen_w.max(1.0),
            screen_h: screen_h.max(1.0),
        }
    }

    /// Width in pixels of `text` at `scale`.
    pub fn text_width(text: &str, scale: f32) -> f32 {
        text.chars().count() as f32 * GLYPH_PX_W * scale
    }

    /// Height in pixels of one line of glyphs at `scale`.
    pub fn line_height(scale: f32) -> f32 {
        GLYPH_PX_H * scale
    }

    /// Convert pixel coords to NDC.
    fn px_to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        [
            (px / self.screen_w) * 2.0 - 1.0,
            1.0 - (py / self.screen_h) * 2.0,
        ]
    }

    fn push_quad(&mut self, x: f32, y: f32, w: f32, h: f32, uv: [f32; 4], color: [f32; 4]) {
        let tl = self.px_to_ndc(x, y);
        let br = self.px_to_ndc(x + w, y + h);
        let [u0, v0, u1, v1] = uv;
        let base = self.vertices.len() as u32;
        self.vertices.push(OverlayVertex { position: [tl[0], tl[1]], tex_coords: [u0, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], tl[1]], tex_coords: [u1, v0], color });
        self.vertices.push(OverlayVertex { position: [br[0], br[1]], tex_coords: [u1, v1], color });
        self.vertices.push(OverlayVertex { position: [tl[0], br[1]], tex_coords: [u0, v1], color });
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Add a solid-color rectangle. Coordinates in pixels.
    pub fn add_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        // uv x < 0 is the shader's solid-colour sentinel
        self.push_quad(x, y, w, h, [-1.0, -1.0, -1.0, -1.0], color);
    }

    /// Horizontal bar with a track and a fill covering `fraction` (clamped to 0..=1) of it.
    pub fn add_bar(&mut self, x: f32, y: f32, w: f32, h: f32, fraction: f32, track: [f32; 4], fill: [f32; 4]) {
        self.add_rect(x, y, w, h, track);
        let filled = w * fraction.clamp(0.0, 1.0);
        if filled > 0.0 {
            self.add_rect(x, y, filled, h, fill);
        }
    }

    /// Add a string at pixel position (x, y). `scale` = 1.0 means 6x8 pixel glyphs.
    /// Characters outside printable ASCII advance the cursor without drawing.
    pub fn add_text(&mut self, x: f32, y: f32, text: &str, scale: f32, color: [f32; 4]) {
        let gw = GLYPH_PX_W * scale;
        let gh = GLYPH_PX_H * scale;
        let mut cx = x;
        for ch in text.chars() {
            let code = ch as u32;
            if !(33..=127).contains(&code) {
                cx += gw;
                continue;
            }
            let idx = code - 32;
            let col = (idx % FONT_COLS) as f32;
            let row = (idx / FONT_COLS) as f32;
            let uv = [
                col / FONT_COLS as f32,
                row / FONT_ROWS as f32,
                (col + 1.0) / FONT_COLS as f32,
                (row + 1.0) / FONT_ROWS as f32,
            ];
            self.push_quad(cx, y, gw, gh, uv, color);
            cx += gw;
        }
    }

    /// Add text with a dark background behind it. Returns the height consumed.
    pub fn add_text_with_bg(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        scale: f32,
        text_color: [f32; 4],
        bg_color: [f32; 4],
    ) -> f32 {
        let gh = GLYPH_PX_H * scale;
        let padding = 2.0 * scale;
        let text_w = Self::text_width(text, scale);
        self.add_rect(x, y, text_w + padding * 2.0, gh + padding * 2.0, bg_color);
        self.add_text(x + padding, y + padding, text, scale, text_color);
        gh + padding * 2.0
    }
}
