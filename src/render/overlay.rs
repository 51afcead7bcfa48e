//! Reference grid and frame-rate readout

use macroquad::color::Color;
use macroquad::models::draw_grid;
use macroquad::text::draw_text;
use macroquad::time::get_fps;

use crate::config::{FpsOverlaySettings, GridSettings};

/// Draw the ground-plane grid. Call inside the 3D camera.
pub fn draw_reference_grid(grid: &GridSettings) {
    if !grid.visible {
        return;
    }
    draw_grid(
        grid.slices,
        grid.spacing,
        Color::from_rgba(grid.axes_color[0], grid.axes_color[1], grid.axes_color[2], grid.axes_color[3]),
        Color::from_rgba(grid.line_color[0], grid.line_color[1], grid.line_color[2], grid.line_color[3]),
    );
}

/// Draw the FPS counter in screen space. Call after leaving the 3D camera.
pub fn draw_fps(overlay: &FpsOverlaySettings) {
    if !overlay.visible {
        return;
    }
    let fps = get_fps();
    let [r, g, b, a] = fps_color(fps);
    // draw_text positions the baseline, so shift down by the font size
    draw_text(
        &fps_label(fps),
        overlay.x,
        overlay.y + overlay.font_size,
        overlay.font_size,
        Color::from_rgba(r, g, b, a),
    );
}

pub(crate) fn fps_label(fps: i32) -> String {
    format!("{} FPS", fps)
}

/// Green when healthy, orange when dropping, red when struggling.
pub(crate) fn fps_color(fps: i32) -> [u8; 4] {
    if fps < 15 {
        [230, 41, 55, 255]
    } else if fps < 30 {
        [255, 161, 0, 255]
    } else {
        [0, 158, 47, 255]
    }
}
