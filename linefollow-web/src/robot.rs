use linefollow_core::{DebugOverlay, Pose, ROBOT_RADIUS, Rgb, robot_triangle};
use linefollow_core::color::{
    DEBUG_TEXT_COLOR, ROBOT_COLOR, SENSOR_ACTIVE_COLOR, SENSOR_PASSIVE_COLOR,
};
use macroquad::prelude::*;

pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.0, rgb.1, rgb.2, 255)
}

#[derive(Debug, Clone)]
pub struct RobotDrawConfig {
    pub radius: f32,
    pub marker_radius: f32,
    pub label_font_size: f32,
    pub label_gap: f32, // space between marker edge and label
    pub body_color: Color,
    pub active_color: Color,
    pub passive_color: Color,
    pub label_color: Color,
}

impl Default for RobotDrawConfig {
    fn default() -> Self {
        Self {
            radius: ROBOT_RADIUS,
            marker_radius: 6.0,
            label_font_size: 24.0,
            label_gap: 2.0,
            body_color: to_color(ROBOT_COLOR),
            active_color: to_color(SENSOR_ACTIVE_COLOR),
            passive_color: to_color(SENSOR_PASSIVE_COLOR),
            label_color: to_color(DEBUG_TEXT_COLOR),
        }
    }
}

pub fn draw_robot(pose: &Pose, config: &RobotDrawConfig) {
    let [nose, rear_left, rear_right] = robot_triangle(pose, config.radius);
    draw_triangle(
        vec2(nose[0], nose[1]),
        vec2(rear_left[0], rear_left[1]),
        vec2(rear_right[0], rear_right[1]),
        config.body_color,
    );
}

/// Draws sensor markers straight to the screen.
pub struct ScreenOverlay<'a> {
    pub config: &'a RobotDrawConfig,
}

impl DebugOverlay for ScreenOverlay<'_> {
    fn draw_marker(&mut self, position: [f32; 2], active: bool, label: &str) {
        let config = self.config;
        // Markers snap to whole pixels like the sampled positions do.
        let x = position[0].trunc();
        let y = position[1].trunc();
        let color = if active {
            config.active_color
        } else {
            config.passive_color
        };
        draw_circle(x, y, config.marker_radius, color);
        draw_text(
            label,
            x + config.marker_radius + config.label_gap,
            y - config.marker_radius,
            config.label_font_size,
            config.label_color,
        );
    }
}
