use criterion::{criterion_group, criterion_main, Criterion};

use risk_core::{build_headless_app, run_year, SimulationConfig, SyntheticRegionProvider};
use risk_core::region::RegionProvider;

fn bench_year_pipeline(c: &mut Criterion) {
    c.bench_function("run_26_years_one_region", |b| {
        b.iter(|| {
            let config = SimulationConfig::default();
            let seed = SyntheticRegionProvider.regions().remove(0);
            let mut app = build_headless_app(config, "high", seed);
            for _ in 2025..=2050 {
                run_year(&mut app);
            }
        });
    });
}

criterion_group!(benches, bench_year_pipeline);
criterion_main!(benches);
