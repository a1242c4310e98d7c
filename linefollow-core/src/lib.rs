pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod kinematics;
pub mod pose;
pub mod sensor;
pub mod simulation;
pub mod track;

pub use color::{BLACK, Rgb, WHITE, is_on_line};
pub use config::SimConfig;
pub use controller::{Command, Controller, ControllerState, Decision, Mode, SteeringWeights};
pub use error::{Result, SimError};
pub use kinematics::{WorldBounds, integrate, normalize_heading};
pub use pose::{Pose, ROBOT_RADIUS, robot_triangle};
pub use sensor::{
    SensorArray, SensorGeometry, SensorName, SensorOffset, SensorReading, SensorReadings,
    SensorSet,
};
pub use simulation::{DebugOverlay, Simulation, Tick, marker_label};
pub use track::{TrackLayout, TrackRaster, TrackRect, TrackSurface};
