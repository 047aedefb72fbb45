use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;

use segregation_engine::output::{self, OutputFormat};
use segregation_engine::simulation::validate_params;
use segregation_engine::{run_sweep, SegregationSimulation, SimParams, SimulationConfig};

/// Command-line arguments for the segregation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override output.format (json, bincode, messagepack)
    #[arg(short, long)]
    format: Option<String>,

    /// Override population.seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run the [sweep] thresholds instead of a single simulation
    #[arg(long)]
    sweep: bool,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Segregation Engine...");

    // --- Load Configuration ---
    let config = SimulationConfig::load(&args.config)?;
    let mut params = config.get_sim_params();
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    debug!("Simulation Parameters: {:#?}", params);

    if args.sweep {
        run_threshold_sweep(&config, params)
    } else {
        run_single(&config, params, args.format.as_deref())
    }
}

fn run_single(config: &SimulationConfig, params: SimParams, format_override: Option<&str>) -> Result<()> {
    // Building the run validates the configuration before anything touches the disk.
    let mut sim = SegregationSimulation::from_params(params).context("Invalid simulation configuration")?;

    let start_time = Instant::now();
    sim.run().context("Simulation aborted")?;
    let result = sim.into_result();
    info!(
        "> Iterations : {} ({}) in {:.3} s",
        result.iterations_run,
        if result.converged { "converged" } else { "iteration cap reached" },
        start_time.elapsed().as_secs_f64()
    );

    // --- Save Recorded Data ---
    let out = &config.output;
    if !out.save_history && !out.save_satisfaction {
        info!("Skipping output as per config.");
        return Ok(());
    }
    let dir = output::prepare_output_dir(&out.directory)?;
    if out.save_history {
        let format = OutputFormat::from_name(format_override.or(out.format.as_deref()).unwrap_or("json"));
        output::save_history(&result, &dir, &out.base_filename, format)?;
    } else {
        info!("Skipping history as per config (save_history is false).");
    }
    if out.save_satisfaction {
        output::save_satisfaction_csv(&result, &dir, &out.base_filename)?;
    }

    info!("Simulation Complete.");
    Ok(())
}

fn run_threshold_sweep(config: &SimulationConfig, params: SimParams) -> Result<()> {
    let Some(sweep) = &config.sweep else {
        anyhow::bail!("--sweep requires a [sweep] section with thresholds in the config file.");
    };

    // Every threshold is checked up front so a bad entry aborts before any run starts.
    for &threshold in &sweep.thresholds {
        validate_params(&SimParams { threshold, ..params.clone() })
            .with_context(|| format!("Invalid sweep threshold {}", threshold))?;
    }

    let base_seed = params.seed.unwrap_or_else(|| rand::rng().random());
    info!("Sweep base seed {}.", base_seed);

    let start_time = Instant::now();
    let points = run_sweep(&params, &sweep.thresholds, base_seed).context("Sweep aborted")?;
    info!("Sweep finished in {:.3} s.", start_time.elapsed().as_secs_f64());

    let dir = output::prepare_output_dir(Path::new(&config.output.directory))?;
    output::save_sweep_csv(&points, &dir, &config.output.base_filename)?;
    Ok(())
}
