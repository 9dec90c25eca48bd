//! Position Events Demo
//!
//! Plays the part of a dependent add-on: registers the example areas, walks
//! the local player through them and tears everything down on exit.
//!
//! Run with: cargo run -p position_events_demo [config.toml]

mod areas;

use areas::{EXAMPLE_MAP, EXAMPLE_POLL};
use position_events::prelude::*;
use std::process::ExitCode;
use std::sync::Arc;

/// Scripted player path, one position per tick
const WALK: [(MapId, [f64; 3]); 10] = [
    (EXAMPLE_MAP, [30.0, 30.0, 20.0]),
    (EXAMPLE_MAP, [55.0, 60.0, 20.0]),
    (EXAMPLE_MAP, [30.0, 30.0, 20.0]),
    (EXAMPLE_MAP, [10.0, 2.0, 5.0]),
    (EXAMPLE_MAP, [-20.0, -20.0, 5.0]),
    (EXAMPLE_MAP, [-23.0, -26.0, 23.0]),
    (EXAMPLE_MAP, [100.0, 420.0, 10.0]),
    (EXAMPLE_MAP, [100.0, 420.0, 60.0]),
    (EXAMPLE_MAP, [55.0, 60.0, 20.0]),
    (EXAMPLE_MAP + 1, [55.0, 60.0, 20.0]),
];

fn load_config() -> Result<EngineConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    config.with_env_overrides()
}

fn run() -> Result<()> {
    let config = load_config()?;
    log::info!("Engine config: {:?}", config);

    let context = Arc::new(PositionEventsContext::new(config));
    let scope = context.owner_scope("PositionEventsExample");
    let handles = areas::register_example_areas(&scope)?;
    log::info!("Registered {} example areas", handles.len());

    for (tick, (map_id, position)) in WALK.iter().enumerate() {
        let data = PositionData::player(*map_id, Point3::from_array(*position));
        let report = context.update(&[data]);
        log::debug!("Tick {}: {} transition(s)", tick, report.fired());
        if let Err(e) = report.check() {
            log::warn!("Tick {}: {}", tick, e);
        }
        std::thread::sleep(EXAMPLE_POLL);
    }

    for fault in context.drain_faults() {
        log::warn!("Unhandled fault in {}: {}", fault.region, fault.error);
    }

    drop(scope);
    log::info!("Demo finished, {} area(s) left registered", context.region_count());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Demo failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
