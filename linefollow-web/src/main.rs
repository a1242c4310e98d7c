use std::sync::OnceLock;

use linefollow_core::SimConfig;
use linefollow_web_lib::{RunOutcome, load_config, run, window_conf_for};
use macroquad::prelude::Conf;

static CONFIG: OnceLock<SimConfig> = OnceLock::new();

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

// Runs before the window opens.
fn window_conf() -> Conf {
    init_logging();
    match load_config() {
        Ok(config) => window_conf_for(CONFIG.get_or_init(|| config)),
        Err(err) => {
            log::error!("invalid configuration: {}", err);
            std::process::exit(RunOutcome::Failed(err).exit_code());
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = CONFIG.get_or_init(SimConfig::default).clone();
    let outcome = run(config).await;

    if !matches!(outcome, RunOutcome::Quit) {
        std::process::exit(outcome.exit_code());
    }
}
