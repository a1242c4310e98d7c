use crate::config::SimConfig;
use crate::controller::{Command, Controller, ControllerState, Mode};
use crate::error::{Result, SimError};
use crate::kinematics::{WorldBounds, integrate};
use crate::pose::Pose;
use crate::sensor::{SensorArray, SensorReadings};
use crate::track::{TrackRaster, TrackSurface};

/// Receives per-tick sensor markers. Purely observational.
pub trait DebugOverlay {
    fn draw_marker(&mut self, position: [f32; 2], active: bool, label: &str);
}

pub fn marker_label(code: &str, active: bool) -> String {
    format!("{}:{}", code, if active { 'T' } else { 'F' })
}

/// What happened during one `Simulation::step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: u64,
    pub readings: SensorReadings,
    pub command: Command,
    pub mode: Mode,
    pub pose: Pose,
}

/// Headless driver: sense, decide and integrate once per `step`.
pub struct Simulation<S: TrackSurface> {
    surface: S,
    sensors: SensorArray,
    controller: Controller,
    bounds: WorldBounds,
    pose: Pose,
    state: ControllerState,
    tick: u64,
    last_readings: Option<SensorReadings>,
}

impl Simulation<TrackRaster> {
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.raster(),
            config.sensor_array(),
            config.controller(),
            config.bounds(),
            config.start,
        ))
    }
}

impl<S: TrackSurface> Simulation<S> {
    pub fn new(
        mut surface: S,
        sensors: SensorArray,
        controller: Controller,
        bounds: WorldBounds,
        start: Pose,
    ) -> Self {
        surface.draw_fixed_track();
        Self {
            surface,
            sensors,
            controller,
            bounds,
            pose: start,
            state: ControllerState::default(),
            tick: 0,
            last_readings: None,
        }
    }

    pub fn step(&mut self) -> Result<Tick> {
        if self.state.mode.is_terminal() {
            return Err(self.line_lost());
        }

        let readings = self.sensors.sense(&self.pose, &self.surface);
        let decision = self.controller.decide(self.state, &readings);
        self.state = decision.state;
        self.pose = integrate(&self.pose, &decision.command, &self.bounds);
        self.last_readings = Some(readings);
        self.tick += 1;

        if self.state.mode.is_terminal() {
            return Err(self.line_lost());
        }

        Ok(Tick {
            index: self.tick,
            readings,
            command: decision.command,
            mode: self.state.mode,
            pose: self.pose,
        })
    }

    /// Pushes the most recent tick's sensor markers to `overlay`.
    pub fn draw_overlay<O: DebugOverlay + ?Sized>(&self, overlay: &mut O) {
        let Some(readings) = &self.last_readings else {
            return;
        };
        for (name, reading) in readings.iter() {
            let label = marker_label(name.code(), reading.active);
            overlay.draw_marker(reading.position, reading.active, &label);
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_aborted(&self) -> bool {
        self.state.mode.is_terminal()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn last_readings(&self) -> Option<&SensorReadings> {
        self.last_readings.as_ref()
    }

    fn line_lost(&self) -> SimError {
        SimError::LineLostTimeout {
            ticks: self.state.lost_counter,
        }
    }
}
