use crate::controller::Command;
use crate::pose::Pose;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.min(self.width - 1.0).max(0.0),
            y.min(self.height - 1.0).max(0.0),
        )
    }
}

/// Wraps any heading into `[0, 360)`.
pub fn normalize_heading(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0 in f32.
    if wrapped >= 360.0 || !wrapped.is_finite() {
        0.0
    } else {
        wrapped
    }
}

/// Turn first, then advance `speed` along the new heading, then clamp to the
/// world.
pub fn integrate(pose: &Pose, command: &Command, bounds: &WorldBounds) -> Pose {
    let heading = normalize_heading(pose.heading_degrees + command.turn_delta_degrees);
    let radians = heading.to_radians();
    let (x, y) = bounds.clamp(
        pose.x + radians.cos() * command.speed,
        pose.y + radians.sin() * command.speed,
    );
    Pose::new(x, y, heading)
}
