use bevy::{ecs::system::SystemParam, prelude::*};
use tracing::info;

use crate::{
    climate::{interpolate, ClimatePathway, ClimateScenarioState, PathwayAnchors},
    config::SimulationConfig,
    exposure::compute_exposure,
    governance::GovernanceState,
    hazard::{roll_definition, HazardCatalogHandle, HazardEvent},
    metrics::{
        CommunityMemory, EventRecord, SimulationHistory, SimulationMetrics, SimulationYearState,
        YearLedger,
    },
    recovery::project_recovery,
    region::RegionState,
    response::simulate_response,
    rng::{stream_rng, StreamStage},
    vulnerability::assess_damage,
    warning::simulate_warning,
};

/// Identity of the (scenario, region) run this app instance owns.
#[derive(Resource, Debug, Clone)]
pub struct RunContext {
    pub scenario: String,
    pub pathway: ClimatePathway,
    pub region: String,
    pub master_seed: u64,
}

/// Calendar year the next update will resolve.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationYear(pub i32);

/// Climate anchor tables shared across systems.
#[derive(Resource, Debug, Clone, Default)]
pub struct ClimateAnchors(pub PathwayAnchors);

/// Climate state resolved for the current year.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentClimate(pub ClimateScenarioState);

/// Hazard events generated for the current year.
#[derive(Resource, Debug, Clone, Default)]
pub struct YearEvents(pub Vec<HazardEvent>);

pub fn resolve_climate(
    ctx: Res<RunContext>,
    year: Res<SimulationYear>,
    anchors: Res<ClimateAnchors>,
    mut climate: ResMut<CurrentClimate>,
) {
    climate.0 = interpolate(&anchors.0, ctx.pathway, year.0);
}

/// Roll every configured hazard definition for the year. Each
/// definition draws from its own stream keyed by its catalog index, so
/// adding a hazard to the catalog never perturbs the others' draws.
pub fn generate_hazard_events(
    config: Res<SimulationConfig>,
    catalog: Res<HazardCatalogHandle>,
    ctx: Res<RunContext>,
    year: Res<SimulationYear>,
    climate: Res<CurrentClimate>,
    mut events: ResMut<YearEvents>,
) {
    events.0.clear();
    for (index, def) in catalog.get().hazards.iter().enumerate() {
        if !config.hazards.iter().any(|id| id == &def.id) {
            continue;
        }
        let mut rng = stream_rng(
            ctx.master_seed,
            &ctx.scenario,
            &ctx.region,
            year.0,
            StreamStage::Hazard,
            index as u64,
        );
        let generated = roll_definition(def, year.0, &climate.0, &mut rng);
        for event in &generated {
            info!(
                target: "risk::hazard",
                scenario = ctx.scenario.as_str(),
                region = ctx.region.as_str(),
                year = event.year,
                hazard = event.kind.label(),
                month = event.month,
                return_period = event.return_period,
                intensity = event.intensity,
                "hazard event generated"
            );
        }
        events.0.extend(generated);
    }
}

#[derive(SystemParam)]
pub struct CascadeParams<'w> {
    pub config: Res<'w, SimulationConfig>,
    pub ctx: Res<'w, RunContext>,
    pub year: Res<'w, SimulationYear>,
    pub region: Res<'w, RegionState>,
    pub governance: Res<'w, GovernanceState>,
    pub memory: Res<'w, CommunityMemory>,
    pub events: Res<'w, YearEvents>,
    pub ledger: ResMut<'w, YearLedger>,
}

/// Run the full impact cascade for every event of the year: exposure →
/// damage → warning and response → recovery. Results land in the year
/// ledger for the capture system.
pub fn run_impact_cascade(mut params: CascadeParams) {
    let governance_config = params.governance.to_config();
    for (index, event) in params.events.0.iter().enumerate() {
        let channel = index as u64;
        let mut exposure_rng = stream_rng(
            params.ctx.master_seed,
            &params.ctx.scenario,
            &params.ctx.region,
            params.year.0,
            StreamStage::Exposure,
            channel,
        );
        let exposure = compute_exposure(
            &params.region.profile,
            &params.region.stock,
            event,
            &mut exposure_rng,
        );

        let mut damage_rng = stream_rng(
            params.ctx.master_seed,
            &params.ctx.scenario,
            &params.ctx.region,
            params.year.0,
            StreamStage::Damage,
            channel,
        );
        let damage = assess_damage(&exposure, event, &mut damage_rng);

        let mut warning_rng = stream_rng(
            params.ctx.master_seed,
            &params.ctx.scenario,
            &params.ctx.region,
            params.year.0,
            StreamStage::Warning,
            channel,
        );
        let warning = simulate_warning(
            event,
            &exposure,
            &params.config.warning,
            &params.region.profile,
            params.region.stock.urban_fraction,
            params.memory.experience,
            &mut warning_rng,
        );

        let response = simulate_response(
            event.kind,
            &damage,
            &params.config.response,
            &params.region.profile,
        );

        let recovery = project_recovery(
            &damage,
            &governance_config,
            &params.config.funding,
            &params.region.profile,
            event.month,
        );

        params.ledger.push(EventRecord {
            event: event.clone(),
            exposure_ratio: exposure.exposure_ratio,
            exposed_population: exposure.population,
            damage,
            warning,
            response,
            recovery,
        });
    }
}

/// Fold the year ledger into the retained time series, cumulative
/// metrics, and cross-year community memory.
pub fn capture_year_state(
    ctx: Res<RunContext>,
    year: Res<SimulationYear>,
    climate: Res<CurrentClimate>,
    region: Res<RegionState>,
    mut ledger: ResMut<YearLedger>,
    mut memory: ResMut<CommunityMemory>,
    mut history: ResMut<SimulationHistory>,
    mut metrics: ResMut<SimulationMetrics>,
) {
    let (records, totals) = ledger.drain_totals();
    memory.fold_year(&totals, &records);
    metrics.fold_year(&totals);

    info!(
        target: "risk::orchestrator",
        scenario = ctx.scenario.as_str(),
        region = ctx.region.as_str(),
        year = year.0,
        events = totals.events,
        deaths = totals.deaths,
        net_deaths = totals.net_deaths,
        direct_losses = totals.direct_losses,
        "year resolved"
    );

    history.years.push(SimulationYearState {
        scenario: ctx.scenario.clone(),
        region: ctx.region.clone(),
        year: year.0,
        climate: climate.0.clone(),
        population: region.stock.population,
        urban_fraction: region.stock.urban_fraction,
        resilience_index: memory.resilience_index,
        totals,
        events: records,
    });
}

/// End-of-year state carry: evolve the stock and governance, then move
/// the calendar forward.
pub fn advance_world(
    mut year: ResMut<SimulationYear>,
    mut region: ResMut<RegionState>,
    mut governance: ResMut<GovernanceState>,
) {
    region.stock.advance_year();
    governance.advance_year();
    year.0 += 1;
}
