use crate::color::is_on_line;
use crate::pose::{Pose, offset_point};
use crate::track::TrackSurface;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

pub const SENSOR_COUNT: usize = 5;
pub const DEFAULT_FORWARD_DISTANCE: f32 = 20.0;
pub const DEFAULT_LATERAL_OFFSET: f32 = 15.0;
const FORWARD_SENSOR_REACH: f32 = 1.5;
const FORWARD_SENSOR_ANGLE: f32 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorName {
    Center,
    Left,
    Right,
    LeftForward,
    RightForward,
}

impl SensorName {
    pub const ALL: [SensorName; SENSOR_COUNT] = [
        SensorName::Center,
        SensorName::Left,
        SensorName::Right,
        SensorName::LeftForward,
        SensorName::RightForward,
    ];

    pub const fn index(self) -> usize {
        match self {
            SensorName::Center => 0,
            SensorName::Left => 1,
            SensorName::Right => 2,
            SensorName::LeftForward => 3,
            SensorName::RightForward => 4,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            SensorName::Center => "C",
            SensorName::Left => "L",
            SensorName::Right => "R",
            SensorName::LeftForward => "LF",
            SensorName::RightForward => "RF",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SensorName::Center => "center",
            SensorName::Left => "left",
            SensorName::Right => "right",
            SensorName::LeftForward => "left_forward",
            SensorName::RightForward => "right_forward",
        }
    }
}

impl fmt::Display for SensorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per sensor, indexed by `SensorName`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSet<T>(pub [T; SENSOR_COUNT]);

impl<T> SensorSet<T> {
    pub fn from_fn(f: impl FnMut(SensorName) -> T) -> Self {
        Self(SensorName::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SensorName, &T)> {
        SensorName::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(SensorName, &T) -> U) -> SensorSet<U> {
        SensorSet::from_fn(|name| f(name, &self[name]))
    }
}

impl<T> Index<SensorName> for SensorSet<T> {
    type Output = T;

    fn index(&self, name: SensorName) -> &T {
        &self.0[name.index()]
    }
}

impl<T> IndexMut<SensorName> for SensorSet<T> {
    fn index_mut(&mut self, name: SensorName) -> &mut T {
        &mut self.0[name.index()]
    }
}

/// Placement of a sensor relative to the robot: `forward` units along
/// `heading + angular_degrees`, then `lateral` units along `heading + 90`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorOffset {
    pub forward: f32,
    pub lateral: f32,
    pub angular_degrees: f32,
}

impl SensorOffset {
    pub fn new(forward: f32, lateral: f32, angular_degrees: f32) -> Self {
        Self {
            forward,
            lateral,
            angular_degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorGeometry {
    offsets: SensorSet<SensorOffset>,
}

impl SensorGeometry {
    /// Center sensor `forward` ahead, left/right sensors `lateral` to either
    /// side of it, and the two forward sensors 1.5x further out at +/-45
    /// degrees.
    pub fn new(forward: f32, lateral: f32) -> Self {
        let reach = forward * FORWARD_SENSOR_REACH;
        let offsets = SensorSet::from_fn(|name| match name {
            SensorName::Center => SensorOffset::new(forward, 0.0, 0.0),
            SensorName::Left => SensorOffset::new(forward, -lateral, 0.0),
            SensorName::Right => SensorOffset::new(forward, lateral, 0.0),
            SensorName::LeftForward => SensorOffset::new(reach, 0.0, FORWARD_SENSOR_ANGLE),
            SensorName::RightForward => SensorOffset::new(reach, 0.0, -FORWARD_SENSOR_ANGLE),
        });
        Self { offsets }
    }

    pub fn offset(&self, name: SensorName) -> SensorOffset {
        self.offsets[name]
    }

    pub fn position(&self, pose: &Pose, name: SensorName) -> [f32; 2] {
        let offset = self.offsets[name];
        let reach = pose.project(offset.angular_degrees, offset.forward);
        if offset.lateral == 0.0 {
            return reach;
        }
        offset_point(reach, pose.heading_degrees + 90.0, offset.lateral)
    }

    pub fn positions(&self, pose: &Pose) -> SensorSet<[f32; 2]> {
        SensorSet::from_fn(|name| self.position(pose, name))
    }
}

impl Default for SensorGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_FORWARD_DISTANCE, DEFAULT_LATERAL_OFFSET)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub position: [f32; 2],
    pub active: bool,
}

pub type SensorReadings = SensorSet<SensorReading>;

impl SensorSet<SensorReading> {
    pub fn is_active(&self, name: SensorName) -> bool {
        self[name].active
    }

    pub fn any_active(&self) -> bool {
        self.0.iter().any(|reading| reading.active)
    }

    pub fn active_flags(&self) -> SensorSet<bool> {
        self.map(|_, reading| reading.active)
    }
}

impl SensorSet<bool> {
    /// Readings at the origin with the given activity, for driving the
    /// controller without a surface.
    pub fn to_readings(&self) -> SensorReadings {
        self.map(|_, &active| SensorReading {
            position: [0.0, 0.0],
            active,
        })
    }
}

impl fmt::Display for SensorSet<SensorReading> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, reading)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, reading.active)?;
        }
        f.write_str("}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorArray {
    pub geometry: SensorGeometry,
    pub tolerance: u8,
}

impl SensorArray {
    pub fn new(geometry: SensorGeometry, tolerance: u8) -> Self {
        Self {
            geometry,
            tolerance,
        }
    }

    pub fn sense<S: TrackSurface + ?Sized>(&self, pose: &Pose, surface: &S) -> SensorReadings {
        let line = surface.line_color();
        SensorSet::from_fn(|name| {
            let position = self.geometry.position(pose, name);
            let sample = surface.sample_color(position[0], position[1]);
            SensorReading {
                position,
                active: is_on_line(sample, line, self.tolerance),
            }
        })
    }
}

impl Default for SensorArray {
    fn default() -> Self {
        Self::new(SensorGeometry::default(), crate::color::DEFAULT_TOLERANCE)
    }
}
