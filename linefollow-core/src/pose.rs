use serde::{Deserialize, Serialize};

pub const ROBOT_RADIUS: f32 = 15.0;
const REAR_CORNER_DEGREES: f32 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub heading_degrees: f32, // screen space: 0 faces +x, positive turns toward +y
}

impl Pose {
    pub fn new(x: f32, y: f32, heading_degrees: f32) -> Self {
        Self {
            x,
            y,
            heading_degrees,
        }
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Point `distance` away from the robot along `heading + offset_degrees`.
    pub fn project(&self, offset_degrees: f32, distance: f32) -> [f32; 2] {
        offset_point(self.position(), self.heading_degrees + offset_degrees, distance)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(112.5, 112.5, 0.0)
    }
}

pub fn offset_point(origin: [f32; 2], angle_degrees: f32, distance: f32) -> [f32; 2] {
    let radians = angle_degrees.to_radians();
    [
        origin[0] + radians.cos() * distance,
        origin[1] + radians.sin() * distance,
    ]
}

/// Nose and rear corners of the robot's triangle outline.
pub fn robot_triangle(pose: &Pose, radius: f32) -> [[f32; 2]; 3] {
    [
        pose.project(0.0, radius),
        pose.project(REAR_CORNER_DEGREES, radius),
        pose.project(-REAR_CORNER_DEGREES, radius),
    ]
}
