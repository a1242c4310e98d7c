#![cfg(feature = "render")]

use std::error::Error;
use std::path::PathBuf;

use linefollow_core::SimConfig;
use linefollow_trace::render::render_trace;
use linefollow_trace::trace::{DEFAULT_MAX_TICKS, run_headless};

const USAGE: &str = "usage: linefollow-trace [OUTPUT.png] [CONFIG.json] [MAX_TICKS]";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("trace.png"));
    if output.as_os_str() == "-h" || output.as_os_str() == "--help" {
        println!("{}", USAGE);
        return Ok(());
    }
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let max_ticks = match args.next() {
        Some(value) => value
            .parse::<u64>()
            .map_err(|err| format!("invalid MAX_TICKS {:?}: {}\n{}", value, err, USAGE))?,
        None => DEFAULT_MAX_TICKS,
    };

    let (sim, run) = run_headless(&config, max_ticks)?;
    let image = render_trace(&sim, &run);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    image.save(&output)?;
    println!("wrote {}", output.display());

    if run.line_lost() {
        log::error!("line lost after {} ticks", run.ticks);
        std::process::exit(2);
    }
    Ok(())
}
