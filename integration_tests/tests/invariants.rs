//! Whole-horizon sweep: every year state produced by a full default run
//! must satisfy the documented physical bounds.

use risk_core::{run_simulation, SimulationConfig, SyntheticRegionProvider};

#[test]
fn full_horizon_run_respects_all_bounds() {
    let config = SimulationConfig::default();
    let results = run_simulation(&config, &SyntheticRegionProvider).expect("default config valid");

    // three pathways over three synthetic regions
    assert_eq!(results.len(), 9);

    let mut total_events = 0u32;
    for result in &results {
        assert_eq!(
            result.years.len(),
            (config.end_year - config.start_year + 1) as usize
        );

        let mut previous_year = None;
        for state in &result.years {
            if let Some(previous) = previous_year {
                assert_eq!(state.year, previous + 1, "years must be contiguous");
            }
            previous_year = Some(state.year);

            assert!(state.population > 0.0);
            assert!((0.0..=1.0).contains(&state.urban_fraction));
            assert!((0.0..=1.0).contains(&state.resilience_index));
            assert!(state.totals.net_deaths <= state.totals.deaths);
            assert!(state.totals.direct_losses >= 0.0);
            assert!(state.totals.indirect_losses >= 0.0);

            total_events += state.totals.events;
            for record in &state.events {
                assert!((1..=12).contains(&record.event.month));
                assert!((0.0..=1.0).contains(&record.exposure_ratio));
                assert!(
                    record.damage.casualties.total() as f64 <= record.exposed_population + 1.0
                );
                assert!(record.warning.lives_saved <= record.warning.potential_fatalities);
                assert!(
                    record.response.additional_lives_saved <= record.damage.casualties.deaths
                );
                for sector in &record.recovery.sectors {
                    for window in sector.trajectory.windows(2) {
                        assert!(window[1] >= window[0] - 1e-12);
                    }
                }
            }
        }

        assert_eq!(
            result.metrics.years_simulated as usize,
            result.years.len()
        );
    }

    assert!(
        total_events > 0,
        "a 26-year national sweep should see hazard events"
    );
}

#[test]
fn severer_pathways_do_not_shrink_climate_forcing() {
    let config = SimulationConfig {
        start_year: 2050,
        end_year: 2050,
        ..SimulationConfig::default()
    };
    let results = run_simulation(&config, &SyntheticRegionProvider).expect("valid");

    let forcing = |pathway: &str| {
        results
            .iter()
            .find(|r| r.scenario == pathway)
            .map(|r| r.years[0].climate.temperature_increase)
            .expect("pathway present")
    };
    assert!(forcing("low") <= forcing("intermediate"));
    assert!(forcing("intermediate") <= forcing("high"));
}
