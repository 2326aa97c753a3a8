use risk_core::{build_headless_app, run_year, SimulationConfig, SyntheticRegionProvider};
use risk_core::region::RegionProvider;
use risk_core::SimulationHistory;

#[test]
fn app_initializes_and_resolves_a_year() {
    let seed = SyntheticRegionProvider.regions().remove(0);
    let mut app = build_headless_app(SimulationConfig::default(), "intermediate", seed);
    // run a single year to ensure the schedule executes without panic
    run_year(&mut app);

    let history = app.world.resource::<SimulationHistory>();
    assert_eq!(history.years.len(), 1);
}
