//! Core crate for the multi-hazard disaster risk simulation.
//!
//! Provides deterministic ECS systems that resolve a single simulation
//! year when [`run_year`] is invoked: climate resolution, stochastic
//! hazard generation, the exposure/damage/warning/response/recovery
//! cascade, and end-of-year state carry. [`run_simulation`] sweeps the
//! configured (scenario, region) combinations in parallel, each owning
//! its own headless app and region state.

pub mod climate;
pub mod config;
pub mod exposure;
pub mod governance;
pub mod hazard;
pub mod metrics;
pub mod recovery;
pub mod region;
pub mod response;
pub mod rng;
mod systems;
pub mod vulnerability;
pub mod warning;

use bevy::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub use climate::{
    climate_effects, interpolate, ClimateEffects, ClimatePathway, ClimateScenarioState,
    PathwayAnchors,
};
pub use config::{ConfigError, SimulationConfig};
pub use exposure::{compute_exposure, ExposureSnapshot};
pub use governance::GovernanceState;
pub use hazard::{
    generate_events, HazardCatalog, HazardCatalogHandle, HazardEvent, HazardKind,
};
pub use metrics::{
    CommunityMemory, EventRecord, SimulationHistory, SimulationMetrics, SimulationYearState,
    YearLedger,
};
pub use recovery::{project_recovery, FundingConfig, GovernanceConfig, RecoveryOutcome};
pub use region::{
    RegionProfile, RegionProvider, RegionSeed, RegionState, RegionStock, SyntheticRegionProvider,
};
pub use response::{simulate_response, ResponseOutcome, ResponseResources};
pub use systems::{
    ClimateAnchors, CurrentClimate, RunContext, SimulationYear, YearEvents,
};
pub use vulnerability::{assess_damage, DamageAssessment};
pub use warning::{simulate_warning, WarningCapability, WarningOutcome};

/// Completed time series for one (scenario, region) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRunResult {
    pub scenario: String,
    pub region: String,
    pub years: Vec<SimulationYearState>,
    pub metrics: SimulationMetrics,
}

/// Construct a headless [`App`] owning one (scenario, region) run.
///
/// Each [`run_year`] call resolves one simulation year through the
/// chained pipeline (climate → hazards → impact cascade → capture →
/// state carry).
pub fn build_headless_app(
    config: SimulationConfig,
    pathway_name: &str,
    seed: RegionSeed,
) -> App {
    let mut app = App::new();

    let pathway = ClimatePathway::from_name(pathway_name);
    let context = RunContext {
        scenario: pathway_name.to_string(),
        pathway,
        region: seed.profile.name.clone(),
        master_seed: config.master_seed,
    };
    let start_year = config.start_year;
    let governance = config.governance;

    app.insert_resource(HazardCatalogHandle::default())
        .insert_resource(ClimateAnchors::default())
        .insert_resource(context)
        .insert_resource(SimulationYear(start_year))
        .insert_resource(CurrentClimate::default())
        .insert_resource(YearEvents::default())
        .insert_resource(YearLedger::default())
        .insert_resource(SimulationHistory::default())
        .insert_resource(SimulationMetrics::default())
        .insert_resource(CommunityMemory::default())
        .insert_resource(RegionState {
            profile: seed.profile,
            stock: seed.stock,
        })
        .insert_resource(governance)
        .insert_resource(config)
        .add_plugins(MinimalPlugins)
        .add_systems(
            Update,
            (
                systems::resolve_climate,
                systems::generate_hazard_events,
                systems::run_impact_cascade,
                systems::capture_year_state,
                systems::advance_world,
            )
                .chain(),
        );

    app
}

/// Execute a single simulation year.
pub fn run_year(app: &mut App) {
    app.update();
}

/// Run one (scenario, region) combination over the configured year
/// range and extract its time series.
fn run_combination(
    config: &SimulationConfig,
    pathway_name: &str,
    seed: RegionSeed,
) -> ScenarioRunResult {
    let mut app = build_headless_app(config.clone(), pathway_name, seed);
    for _ in config.start_year..=config.end_year {
        run_year(&mut app);
    }

    let region = app.world.resource::<RunContext>().region.clone();
    let years = app.world.resource::<SimulationHistory>().years.clone();
    let metrics = *app.world.resource::<SimulationMetrics>();
    ScenarioRunResult {
        scenario: pathway_name.to_string(),
        region,
        years,
        metrics,
    }
}

/// Sweep every configured pathway over every provided region.
///
/// Combinations share no mutable state and run in parallel; years
/// within a combination run strictly in order. Configuration problems
/// (empty hazard list, inverted year range) are reported before any
/// work starts.
pub fn run_simulation(
    config: &SimulationConfig,
    provider: &dyn RegionProvider,
) -> Result<Vec<ScenarioRunResult>, ConfigError> {
    let catalog = HazardCatalog::builtin();
    config.validate(&catalog)?;

    let combinations: Vec<(String, RegionSeed)> = config
        .pathways
        .iter()
        .flat_map(|pathway| {
            provider
                .regions()
                .into_iter()
                .map(move |seed| (pathway.clone(), seed))
        })
        .collect();

    Ok(combinations
        .into_par_iter()
        .map(|(pathway, seed)| run_combination(config, &pathway, seed))
        .collect())
}
