use clap::{Parser, Subcommand};
use mrac_sim::{ScenarioConfig, run_loop};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "mrac-cli")]
#[command(about = "Model-reference adaptive control loop runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an adaptive-loop scenario
    Run {
        /// Path to a scenario YAML file (defaults to the nominal cubic-plant scenario)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the tick size in seconds
        #[arg(long)]
        dt: Option<f64>,
        /// Override the simulated horizon in seconds
        #[arg(long)]
        horizon: Option<f64>,
        /// Output CSV file for the per-tick series (t,y,yr,u,a_hat,b_hat)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario file without running it
    Validate {
        /// Path to the scenario YAML file
        config: PathBuf,
    },
    /// Write the default scenario to a YAML file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Simulation error: {0}")]
    Sim(#[from] mrac_sim::SimError),

    #[error("Scenario parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() -> Result<(), CliError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dt,
            horizon,
            output,
        } => cmd_run(config.as_deref(), dt, horizon, output.as_deref()),
        Commands::Validate { config } => cmd_validate(&config),
        Commands::InitConfig { path } => cmd_init_config(&path),
    }
}

fn load_scenario(path: Option<&Path>) -> Result<ScenarioConfig, CliError> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            tracing::debug!(path = %p.display(), "loaded scenario file");
            Ok(serde_yaml::from_str(&text)?)
        }
        None => Ok(ScenarioConfig::default()),
    }
}

fn cmd_run(
    config_path: Option<&Path>,
    dt: Option<f64>,
    horizon: Option<f64>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let mut config = load_scenario(config_path)?;
    if let Some(dt) = dt {
        config.dt = dt;
    }
    if let Some(horizon) = horizon {
        config.horizon = horizon;
    }

    let (mut plant, setup, opts) = config.build()?;
    let signal = config.signal;
    println!(
        "Running adaptive loop: dt = {:.4} s, horizon = {:.3} s ({} ticks)",
        opts.dt,
        opts.horizon,
        opts.tick_count()
    );

    let record = run_loop(&mut plant, config.y0, &setup, &|t| signal.eval(t), &opts)?;

    println!("✓ Run completed: {} ticks", record.ticks.len());
    if record.degenerate_ticks > 0 {
        println!(
            "  Degenerate ticks (u held at 0): {}",
            record.degenerate_ticks
        );
    }
    println!(
        "  Final tracking error: {:.6}",
        record.final_tracking_error()
    );
    println!(
        "  Final estimates: a_hat = {:.6}, b_hat = {:.6}",
        record.final_estimate.a_hat, record.final_estimate.b_hat
    );

    if let Some(path) = output {
        // Build CSV of the per-tick output tuple
        let mut csv = String::from("t,y,yr,u,a_hat,b_hat\n");
        for rec in &record.ticks {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                rec.t, rec.y, rec.yr, rec.u, rec.a_hat, rec.b_hat
            ));
        }
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} ticks to {}",
            record.ticks.len(),
            path.display()
        );
    }

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    println!("Validating scenario: {}", config_path.display());
    let config = load_scenario(Some(config_path))?;
    config.build()?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_init_config(path: &Path) -> Result<(), CliError> {
    let config = ScenarioConfig::default();
    let text = serde_yaml::to_string(&config).map_err(CliError::Parse)?;
    std::fs::write(path, text)?;
    println!("✓ Wrote default scenario to {}", path.display());
    Ok(())
}
