use linefollow_core::{TrackLayout, TrackRect};
use macroquad::prelude::{Color, draw_rectangle};

use crate::robot::to_color;

fn fill_rect(rect: TrackRect, color: Color) {
    if rect.is_empty() {
        return;
    }
    draw_rectangle(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
        color,
    );
}

/// Draw the same rectangles the sensors sample, using vector primitives.
pub fn draw_track(layout: &TrackLayout) {
    fill_rect(layout.outer_rect(), to_color(layout.line_color));
    fill_rect(layout.inner_rect(), to_color(layout.background));
}
