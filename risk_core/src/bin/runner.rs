use std::{env, path::PathBuf, process::ExitCode};

use tracing::{error, info};

use risk_core::{run_simulation, SimulationConfig, SyntheticRegionProvider};

/// Headless batch driver: run the configured scenario sweep and emit
/// one JSON line per simulation year state on stdout. Anything richer
/// (HTML reports, charts) consumes this stream downstream.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            error!(target: "risk::runner", %message, "configuration load failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        target: "risk::runner",
        start_year = config.start_year,
        end_year = config.end_year,
        pathways = config.pathways.len(),
        hazards = config.hazards.len(),
        seed = config.master_seed,
        "simulation starting"
    );

    let results = match run_simulation(&config, &SyntheticRegionProvider) {
        Ok(results) => results,
        Err(err) => {
            error!(target: "risk::runner", error = %err, "simulation rejected");
            return ExitCode::FAILURE;
        }
    };

    let mut emitted = 0usize;
    for result in &results {
        for year in &result.years {
            match serde_json::to_string(year) {
                Ok(line) => {
                    println!("{line}");
                    emitted += 1;
                }
                Err(err) => {
                    error!(target: "risk::runner", error = %err, "year state serialization failed");
                    return ExitCode::FAILURE;
                }
            }
        }
        info!(
            target: "risk::runner",
            scenario = result.scenario.as_str(),
            region = result.region.as_str(),
            years = result.years.len(),
            total_deaths = result.metrics.total_deaths,
            total_net_deaths = result.metrics.total_net_deaths,
            average_annual_loss = result.metrics.average_annual_loss,
            "combination complete"
        );
    }

    info!(target: "risk::runner", year_states = emitted, "simulation finished");
    ExitCode::SUCCESS
}

/// Configuration comes from the file named by `RISK_SIM_CONFIG` when
/// set, otherwise built-in defaults.
fn load_config() -> Result<SimulationConfig, String> {
    match env::var_os("RISK_SIM_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            SimulationConfig::from_file(&path).map_err(|err| err.to_string())
        }
        None => Ok(SimulationConfig::default()),
    }
}
