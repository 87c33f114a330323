//! Command-line runner for the Tickworld simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `tickworld-config.yaml` (or `TICKWORLD_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Run a traced demonstration of the reflex agent
//! 4. Compare every vacuum agent class over seeded instances
//! 5. Print the report as JSON on stdout

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tickworld_core::config::SimulationConfig;
use tickworld_core::{
    AgentScore, Environment, EventLog, ObservedEvent, RunEndReason, SpatialEnvironment,
    TracingObserver, compare_agents,
};
use tickworld_vacuum::programs::LOCATION_A;
use tickworld_vacuum::{VacuumWorldBuilder, agent_factories, reflex_vacuum_agent};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the configuration file.
const CONFIG_ENV_VAR: &str = "TICKWORLD_CONFIG";

/// Configuration file used when `TICKWORLD_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "tickworld-config.yaml";

/// Outcome of the traced demonstration run.
#[derive(Debug, Serialize)]
struct DemoReport {
    steps_executed: u64,
    end_reason: RunEndReason,
    performance: i64,
    dirt_remaining: usize,
    events: Vec<ObservedEvent>,
}

/// Everything printed on stdout.
#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    width: i32,
    height: i32,
    steps: u64,
    instances: usize,
    demo: DemoReport,
    scores: Vec<AgentScore>,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or a run fails.
fn main() -> anyhow::Result<()> {
    // 1. Load configuration. This happens before logging starts so that
    //    `logging.level` can serve as the default filter.
    let config_path =
        std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = SimulationConfig::load_or_default(Path::new(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config = %config_path,
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        "tickworld-runner starting"
    );

    let builder = VacuumWorldBuilder::from_config(&config);

    // 3. Traced demonstration.
    let demo = run_demo(&builder, &config)?;
    info!(
        steps = demo.steps_executed,
        performance = demo.performance,
        dirt_remaining = demo.dirt_remaining,
        "Demonstration finished"
    );

    // 4. Comparison harness.
    let scores = compare_agents(
        builder.factory(),
        &agent_factories(),
        config.run.instances,
        config.run.steps,
        config.world.seed,
    )
    .context("comparing agents")?;

    // 5. Report.
    let report = Report {
        seed: config.world.seed,
        width: config.world.width,
        height: config.world.height,
        steps: config.run.steps,
        instances: config.run.instances,
        demo,
        scores,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("tickworld-runner finished");
    Ok(())
}

/// Run one reflex agent with a tracing observer and an event log attached.
fn run_demo(builder: &VacuumWorldBuilder, config: &SimulationConfig) -> anyhow::Result<DemoReport> {
    let mut env = builder
        .build(config.world.seed)
        .context("building demonstration world")?;
    let log = EventLog::new();
    env.add_observer(Box::new(TracingObserver));
    env.add_observer(Box::new(log.clone()));

    let start = env.interior().contains(&LOCATION_A).then_some(LOCATION_A);
    let agent = env.add_object(reflex_vacuum_agent(), start)?;
    let summary = env.run(config.run.demo_steps)?;

    let performance = env
        .world()
        .agent(agent)
        .map_or(0, tickworld_core::Agent::performance);
    Ok(DemoReport {
        steps_executed: summary.steps_executed,
        end_reason: summary.end_reason,
        performance,
        dirt_remaining: env.dirt_count(),
        events: log.events(),
    })
}
