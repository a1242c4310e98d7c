use linefollow_core::{Mode, SimConfig, SimError, Simulation, TrackRaster};
use log::info;

pub const DEFAULT_MAX_TICKS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Ran for the full tick budget.
    Completed,
    LineLost { ticks: u32 },
}

#[derive(Debug, Clone)]
pub struct TraceRun {
    pub ticks: u64,
    pub path: Vec<[f32; 2]>,
    pub searches: u32,
    pub outcome: TraceOutcome,
}

impl TraceRun {
    pub fn line_lost(&self) -> bool {
        matches!(self.outcome, TraceOutcome::LineLost { .. })
    }
}

/// Steps a fresh simulation for at most `max_ticks`, recording the robot's
/// position after every tick. Returns the final simulation for rendering.
pub fn run_headless(
    config: &SimConfig,
    max_ticks: u64,
) -> linefollow_core::Result<(Simulation<TrackRaster>, TraceRun)> {
    let mut sim = Simulation::from_config(config)?;
    let mut path = vec![config.start.position()];
    let mut searches = 0;
    let mut previous_mode = Mode::Following;
    let mut outcome = TraceOutcome::Completed;

    while sim.tick() < max_ticks {
        match sim.step() {
            Ok(tick) => {
                if tick.mode == Mode::Searching && previous_mode == Mode::Following {
                    searches += 1;
                }
                previous_mode = tick.mode;
                path.push(tick.pose.position());
            }
            Err(SimError::LineLostTimeout { ticks }) => {
                path.push(sim.pose().position());
                outcome = TraceOutcome::LineLost { ticks };
                break;
            }
            Err(other) => return Err(other),
        }
    }

    info!(
        "headless run finished after {} ticks ({} searches, {:?})",
        sim.tick(),
        searches,
        outcome
    );

    let run = TraceRun {
        ticks: sim.tick(),
        path,
        searches,
        outcome,
    };
    Ok((sim, run))
}
