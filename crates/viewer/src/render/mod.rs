//! Frame rendering: voxel pass, then the HUD overlay pass.

pub mod overlay;

use renderer::RenderError;

use crate::state::ViewerState;

/// Run all render passes. Called from `ViewerState::render()`.
pub fn run(state: &mut ViewerState) -> Result<(), RenderError> {
    let (output, mut encoder) = state.renderer.begin_frame()?;
    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    state.renderer.update_camera(&state.camera);
    state.renderer.render_voxels(&mut encoder, &view, &state.instances);

    let (width, height) = state.renderer.dimensions();
    let tb = overlay::build(&state.hud(), width as f32, height as f32);
    state.renderer.render_overlay(&mut encoder, &view, &tb.vertices, &tb.indices);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
