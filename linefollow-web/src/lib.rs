use linefollow_core::{Mode, SimConfig, SimError, Simulation, Tick, TrackRaster};
use log::{error, info, warn};
use macroquad::prelude::*;

mod robot;
mod track_draw;

use crate::robot::{RobotDrawConfig, ScreenOverlay, draw_robot, to_color};
use crate::track_draw::draw_track;

pub const WINDOW_TITLE: &str = "Line-Following Robot";
pub const CONFIG_ENV_VAR: &str = "LINEFOLLOW_CONFIG";

const HUD_FONT_SIZE: f32 = 24.0;
const HUD_LINE_HEIGHT: f32 = 22.0;
// Catch-up limit after a long stall.
const MAX_STEPS_PER_FRAME: u32 = 8;

/// How the windowed run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Quit,
    LineLost(SimError),
    Failed(SimError),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Quit => 0,
            RunOutcome::Failed(_) => 1,
            RunOutcome::LineLost(_) => 2,
        }
    }
}

/// Reads the JSON file named by `LINEFOLLOW_CONFIG`, or falls back to the
/// defaults when the variable is unset.
pub fn load_config() -> linefollow_core::Result<SimConfig> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => {
            info!("loading configuration from {}", path);
            SimConfig::load(path)
        }
        Err(_) => Ok(SimConfig::default()),
    }
}

/// Window settings sized to the world of an already validated config.
pub fn window_conf_for(config: &SimConfig) -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_string(),
        window_width: i32::try_from(config.world_width).unwrap_or(i32::MAX),
        window_height: i32::try_from(config.world_height).unwrap_or(i32::MAX),
        window_resizable: false,
        ..Default::default()
    }
}

struct AppState {
    sim: Simulation<TrackRaster>,
    config: SimConfig,
    robot_draw: RobotDrawConfig,
    last_tick: Option<Tick>,
}

impl AppState {
    fn new(config: SimConfig) -> linefollow_core::Result<Self> {
        let sim = Simulation::from_config(&config)?;
        Ok(Self {
            sim,
            config,
            robot_draw: RobotDrawConfig::default(),
            last_tick: None,
        })
    }

    fn fixed_update(&mut self) -> linefollow_core::Result<()> {
        let tick = self.sim.step()?;
        self.last_tick = Some(tick);
        Ok(())
    }

    fn render(&self) {
        clear_background(to_color(self.config.track.background));
        draw_track(&self.config.track);
        draw_robot(self.sim.pose(), &self.robot_draw);
        self.sim.draw_overlay(&mut ScreenOverlay {
            config: &self.robot_draw,
        });
        self.render_hud();
    }

    fn render_hud(&self) {
        let state = self.sim.state();
        let mut lines = vec![
            format!("tick: {}", self.sim.tick()),
            format!("mode: {}", state.mode),
        ];
        if let Some(tick) = &self.last_tick {
            lines.push(format!(
                "turn: {:.2}  speed: {:.2}",
                tick.command.turn_delta_degrees, tick.command.speed
            ));
        }
        if state.mode == Mode::Searching {
            lines.push(format!(
                "search: {}/{}",
                state.lost_counter, self.config.search_timeout_ticks
            ));
        }

        for (i, line) in lines.iter().enumerate() {
            draw_text(
                line,
                10.0,
                HUD_LINE_HEIGHT * (i + 1) as f32,
                HUD_FONT_SIZE,
                self.robot_draw.label_color,
            );
        }
    }
}

pub async fn run(config: SimConfig) -> RunOutcome {
    let mut app = match AppState::new(config) {
        Ok(app) => app,
        Err(err) => {
            error!("cannot start simulation: {}", err);
            return RunOutcome::Failed(err);
        }
    };
    let step_seconds = app.config.tick_seconds();
    let mut accumulator = 0.0_f32;

    prevent_quit();
    info!("simulation started at {} Hz", app.config.tick_rate_hz);

    loop {
        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            info!("quit requested after {} ticks", app.sim.tick());
            return RunOutcome::Quit;
        }

        // Consume real elapsed time in fixed-size simulation steps.
        accumulator += get_frame_time();
        let mut steps = 0;
        while accumulator >= step_seconds {
            if steps == MAX_STEPS_PER_FRAME {
                warn!("simulation falling behind, dropping {:.3}s", accumulator);
                accumulator = 0.0;
                break;
            }
            if let Err(err) = app.fixed_update() {
                error!("{}, stopping simulation", err);
                return RunOutcome::LineLost(err);
            }
            accumulator -= step_seconds;
            steps += 1;
        }

        app.render();

        next_frame().await;
    }
}
