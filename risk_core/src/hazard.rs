use std::{collections::HashSet, fs, io, path::Path, sync::Arc};

use bevy::prelude::Resource;
use rand::distributions::{Uniform, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma, LogNormal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::climate::{climate_effects, ClimateEffects, ClimateScenarioState};

pub const BUILTIN_HAZARD_CATALOG: &str = include_str!("data/hazard_catalog.json");

/// Coastal bathymetry amplification applied to cyclone storm surge.
const SURGE_AMPLIFICATION_FACTOR: f64 = 1.2;

/// Floor for the climate frequency multiplier so a strongly negative
/// adjustment can never drive occurrence probability negative.
const MIN_FREQUENCY_MULTIPLIER: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardKind {
    Flood,
    Cyclone,
    Earthquake,
    Landslide,
    Drought,
}

impl HazardKind {
    pub fn label(self) -> &'static str {
        match self {
            HazardKind::Flood => "flood",
            HazardKind::Cyclone => "cyclone",
            HazardKind::Earthquake => "earthquake",
            HazardKind::Landslide => "landslide",
            HazardKind::Drought => "drought",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintClass {
    Riverine,
    Coastal,
    Generic,
}

/// One hazard definition from the catalog: which return periods are
/// rolled each year, how intensity scales with return period, and how
/// occurrences distribute over the calendar.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HazardDefinition {
    pub id: String,
    pub kind: HazardKind,
    pub return_periods: Vec<f64>,
    /// `a` in `intensity = a * ln(return_period) + b`
    pub intensity_slope: f64,
    /// `b` in `intensity = a * ln(return_period) + b`
    pub intensity_intercept: f64,
    /// Relative monthly occurrence weights, January first. Not required
    /// to sum to one.
    pub season_weights: Vec<f64>,
    pub footprint_class: FootprintClass,
    pub sub_regions: Vec<String>,
}

impl Default for HazardDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: HazardKind::Flood,
            return_periods: Vec::new(),
            intensity_slope: 0.5,
            intensity_intercept: 1.0,
            season_weights: vec![1.0; 12],
            footprint_class: FootprintClass::Generic,
            sub_regions: Vec::new(),
        }
    }
}

impl HazardDefinition {
    /// Base intensity from the log-law. The logarithm argument is
    /// floored at 1 so degenerate return periods resolve to the
    /// intercept instead of a negative intensity.
    pub fn base_intensity(&self, return_period: f64) -> f64 {
        let ln_rp = return_period.max(1.0).ln();
        (self.intensity_slope * ln_rp + self.intensity_intercept).max(0.0)
    }

    /// Annual occurrence probability for one return-period bucket under
    /// the given climate adjustment, clamped to (0, 1].
    pub fn annual_probability(&self, return_period: f64, effects: ClimateEffects) -> f64 {
        let frequency_multiplier = (1.0 + effects.frequency_change).max(MIN_FREQUENCY_MULTIPLIER);
        ((1.0 / return_period.max(1.0)) * frequency_multiplier).min(1.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HazardCatalog {
    pub version: u32,
    pub hazards: Vec<HazardDefinition>,
}

impl HazardCatalog {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            Self::from_json_str(BUILTIN_HAZARD_CATALOG)
                .expect("builtin hazard catalog should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, HazardCatalogError> {
        let catalog: HazardCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self, HazardCatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| HazardCatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn definition(&self, id: &str) -> Option<&HazardDefinition> {
        self.hazards.iter().find(|entry| entry.id == id)
    }

    fn validate(&self) -> Result<(), HazardCatalogError> {
        let mut seen = HashSet::new();
        for def in &self.hazards {
            if !seen.insert(def.id.clone()) {
                return Err(HazardCatalogError::Duplicate { id: def.id.clone() });
            }
            if def.return_periods.is_empty() {
                return Err(HazardCatalogError::NoReturnPeriods { id: def.id.clone() });
            }
            if def.return_periods.iter().any(|rp| !rp.is_finite() || *rp < 1.0) {
                return Err(HazardCatalogError::BadReturnPeriod { id: def.id.clone() });
            }
            if def.season_weights.len() != 12
                || def.season_weights.iter().any(|w| !w.is_finite() || *w < 0.0)
                || def.season_weights.iter().sum::<f64>() <= 0.0
            {
                return Err(HazardCatalogError::BadSeasonWeights { id: def.id.clone() });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum HazardCatalogError {
    #[error("failed to parse hazard catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read hazard catalog from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("duplicate hazard id {id}")]
    Duplicate { id: String },
    #[error("hazard {id} has no return periods")]
    NoReturnPeriods { id: String },
    #[error("hazard {id} has a return period below one year")]
    BadReturnPeriod { id: String },
    #[error("hazard {id} needs twelve non-negative season weights")]
    BadSeasonWeights { id: String },
}

/// Shared handle so every system reads the same immutable catalog.
#[derive(Resource, Debug, Clone)]
pub struct HazardCatalogHandle(Arc<HazardCatalog>);

impl HazardCatalogHandle {
    pub fn new(catalog: Arc<HazardCatalog>) -> Self {
        Self(catalog)
    }

    pub fn get(&self) -> &HazardCatalog {
        &self.0
    }
}

impl Default for HazardCatalogHandle {
    fn default() -> Self {
        Self(HazardCatalog::builtin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodClass {
    Riverine,
    Flash,
}

/// Hazard-specific attributes derived at event creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardDetail {
    Flood {
        class: FloodClass,
        depth_m: f64,
        duration_days: f64,
    },
    Cyclone {
        wind_speed_kmh: f64,
        storm_surge_m: f64,
        rainfall_mm_per_hr: f64,
        duration_hours: f64,
    },
    Earthquake {
        magnitude: f64,
        focal_depth_km: f64,
    },
    Landslide {
        volume_m3: f64,
        slope_degrees: f64,
    },
    Drought {
        severity: f64,
        duration_months: f64,
    },
}

/// Spatial extent classification consumed by the exposure stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialFootprint {
    Riverine { affected_rivers: Vec<String> },
    Coastal { affected_segments: Vec<String> },
    Generic,
}

/// One stochastic hazard occurrence. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEvent {
    pub hazard_id: String,
    pub kind: HazardKind,
    pub year: i32,
    pub month: u32,
    pub return_period: f64,
    pub intensity: f64,
    pub detail: HazardDetail,
    pub footprint: SpatialFootprint,
}

/// Roll every return-period bucket of one definition for one year.
///
/// Buckets are independent Bernoulli trials, so a hazard can fire zero,
/// one, or several times in the same year at different severities.
pub fn roll_definition(
    def: &HazardDefinition,
    year: i32,
    climate: &ClimateScenarioState,
    rng: &mut ChaCha8Rng,
) -> Vec<HazardEvent> {
    let effects = climate_effects(def.kind, climate);
    let mut events = Vec::new();

    for &return_period in &def.return_periods {
        let probability = def.annual_probability(return_period, effects);
        if rng.gen::<f64>() >= probability {
            continue;
        }

        let month = sample_month(&def.season_weights, rng);
        let intensity =
            (def.base_intensity(return_period) * (1.0 + effects.intensity_change)).max(0.0);
        let detail = derive_detail(def.kind, intensity, month, rng);
        let footprint = derive_footprint(def, intensity);

        events.push(HazardEvent {
            hazard_id: def.id.clone(),
            kind: def.kind,
            year,
            month,
            return_period,
            intensity,
            detail,
            footprint,
        });
    }

    events
}

/// Generate this year's events for every definition in the catalog from
/// a single stream. The orchestrator instead derives one stream per
/// definition; this entry point serves callers driving the stages
/// directly.
pub fn generate_events(
    catalog: &HazardCatalog,
    year: i32,
    climate: &ClimateScenarioState,
    rng: &mut ChaCha8Rng,
) -> Vec<HazardEvent> {
    let mut events = Vec::new();
    for def in &catalog.hazards {
        events.extend(roll_definition(def, year, climate, rng));
    }
    events
}

fn sample_month(weights: &[f64], rng: &mut ChaCha8Rng) -> u32 {
    let index = WeightedIndex::new(weights.iter().copied())
        .expect("season weights validated at catalog load")
        .sample(rng);
    index as u32 + 1
}

fn derive_detail(kind: HazardKind, intensity: f64, month: u32, rng: &mut ChaCha8Rng) -> HazardDetail {
    match kind {
        HazardKind::Flood => {
            let class = if (6..=9).contains(&month) {
                FloodClass::Riverine
            } else {
                FloodClass::Flash
            };
            let duration_days = match class {
                FloodClass::Riverine => sample_gamma(5.0, 3.0, rng),
                FloodClass::Flash => sample_gamma(2.0, 1.0, rng),
            };
            HazardDetail::Flood {
                class,
                depth_m: intensity,
                duration_days,
            }
        }
        HazardKind::Cyclone => {
            let wind_speed_kmh = intensity;
            // 10*ln(wind) - 40 turns negative below ~55 km/h; floored.
            let rainfall_mm_per_hr = if wind_speed_kmh > 1.0 {
                (10.0 * wind_speed_kmh.ln() - 40.0).max(0.0)
            } else {
                0.0
            };
            HazardDetail::Cyclone {
                wind_speed_kmh,
                storm_surge_m: 0.05 * wind_speed_kmh * SURGE_AMPLIFICATION_FACTOR,
                rainfall_mm_per_hr,
                duration_hours: sample_gamma(2.0, 12.0, rng),
            }
        }
        HazardKind::Earthquake => HazardDetail::Earthquake {
            magnitude: intensity.min(9.0),
            focal_depth_km: sample_gamma(2.0, 10.0, rng),
        },
        HazardKind::Landslide => {
            let volume = LogNormal::new(1000.0_f64.ln(), 1.5)
                .expect("lognormal parameters are fixed and valid")
                .sample(rng);
            let slope = Uniform::new(25.0, 60.0).sample(rng);
            HazardDetail::Landslide {
                volume_m3: volume,
                slope_degrees: slope,
            }
        }
        HazardKind::Drought => HazardDetail::Drought {
            severity: intensity.clamp(0.0, 1.0),
            duration_months: sample_gamma(3.0, 2.0, rng),
        },
    }
}

fn sample_gamma(shape: f64, scale: f64, rng: &mut ChaCha8Rng) -> f64 {
    Gamma::new(shape, scale)
        .expect("gamma parameters are fixed and valid")
        .sample(rng)
        .max(0.0)
}

/// Severity widens the footprint: stronger events involve more of the
/// named river systems or coastal segments.
fn derive_footprint(def: &HazardDefinition, intensity: f64) -> SpatialFootprint {
    let affected = |thresholds: [f64; 2]| -> Vec<String> {
        let count = if intensity < thresholds[0] {
            1
        } else if intensity < thresholds[1] {
            2
        } else {
            def.sub_regions.len().max(1)
        };
        def.sub_regions.iter().take(count).cloned().collect()
    };

    match def.footprint_class {
        FootprintClass::Riverine => SpatialFootprint::Riverine {
            affected_rivers: affected([3.0, 4.0]),
        },
        FootprintClass::Coastal => SpatialFootprint::Coastal {
            affected_segments: affected([150.0, 170.0]),
        },
        FootprintClass::Generic => SpatialFootprint::Generic,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn test_rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn flood_def() -> HazardDefinition {
        HazardCatalog::builtin()
            .definition("riverine_flood")
            .cloned()
            .unwrap()
    }

    #[test]
    fn builtin_catalog_parses_and_validates() {
        let catalog = HazardCatalog::builtin();
        assert_eq!(catalog.hazards.len(), 5);
        assert!(catalog.definition("bay_cyclone").is_some());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "version": 1,
            "hazards": [
                {"id": "a", "kind": "flood", "return_periods": [10.0]},
                {"id": "a", "kind": "flood", "return_periods": [20.0]}
            ]
        }"#;
        assert!(matches!(
            HazardCatalog::from_json_str(json),
            Err(HazardCatalogError::Duplicate { .. })
        ));
    }

    #[test]
    fn sub_year_return_periods_are_rejected() {
        let json = r#"{
            "version": 1,
            "hazards": [{"id": "a", "kind": "flood", "return_periods": [0.5]}]
        }"#;
        assert!(matches!(
            HazardCatalog::from_json_str(json),
            Err(HazardCatalogError::BadReturnPeriod { .. })
        ));
    }

    #[test]
    fn annual_probability_stays_in_unit_interval() {
        let def = flood_def();
        for &rp in &[1.0, 2.0, 10.0, 100.0, 1000.0] {
            let p = def.annual_probability(rp, ClimateEffects::default());
            assert!(p > 0.0 && p <= 1.0, "p({rp}) = {p}");
        }
    }

    #[test]
    fn unit_return_period_always_fires() {
        let def = flood_def();
        let p = def.annual_probability(1.0, ClimateEffects::default());
        assert_eq!(p, 1.0);

        // even a strong negative frequency adjustment keeps p positive
        let p = def.annual_probability(
            1.0,
            ClimateEffects {
                intensity_change: 0.0,
                frequency_change: -2.0,
            },
        );
        assert!(p > 0.0);
    }

    #[test]
    fn degenerate_return_period_floors_at_intercept() {
        let def = flood_def();
        assert_eq!(def.base_intensity(1.0), def.intensity_intercept);
        assert_eq!(def.base_intensity(0.25), def.intensity_intercept);
    }

    #[test]
    fn cyclone_rainfall_floors_at_zero_for_weak_wind() {
        let mut rng = test_rng(7);
        let detail = derive_detail(HazardKind::Cyclone, 40.0, 5, &mut rng);
        match detail {
            HazardDetail::Cyclone {
                rainfall_mm_per_hr, ..
            } => assert_eq!(rainfall_mm_per_hr, 0.0),
            other => panic!("expected cyclone detail, got {other:?}"),
        }
    }

    #[test]
    fn events_carry_valid_months_and_non_negative_intensity() {
        let catalog = HazardCatalog::builtin();
        let climate = ClimateScenarioState::default();
        let mut rng = test_rng(11);

        let mut total = 0;
        for year in 2026..2056 {
            for event in generate_events(&catalog, year, &climate, &mut rng) {
                assert!((1..=12).contains(&event.month));
                assert!(event.intensity >= 0.0);
                assert_eq!(event.year, year);
                total += 1;
            }
        }
        // thirty years of five hazards should produce some occurrences
        assert!(total > 0);
    }

    #[test]
    fn monsoon_floods_class_as_riverine() {
        let mut rng = test_rng(3);
        match derive_detail(HazardKind::Flood, 2.5, 7, &mut rng) {
            HazardDetail::Flood { class, .. } => assert_eq!(class, FloodClass::Riverine),
            other => panic!("expected flood detail, got {other:?}"),
        }
        match derive_detail(HazardKind::Flood, 2.5, 2, &mut rng) {
            HazardDetail::Flood { class, .. } => assert_eq!(class, FloodClass::Flash),
            other => panic!("expected flood detail, got {other:?}"),
        }
    }

    #[test]
    fn footprint_widens_with_intensity() {
        let def = flood_def();
        let narrow = derive_footprint(&def, 2.0);
        let wide = derive_footprint(&def, 5.0);
        match (narrow, wide) {
            (
                SpatialFootprint::Riverine { affected_rivers: a },
                SpatialFootprint::Riverine { affected_rivers: b },
            ) => {
                assert_eq!(a.len(), 1);
                assert_eq!(b.len(), 3);
            }
            other => panic!("expected riverine footprints, got {other:?}"),
        }
    }

    #[test]
    fn identical_streams_generate_identical_events() {
        let catalog = HazardCatalog::builtin();
        let climate = ClimateScenarioState::default();
        let a = generate_events(&catalog, 2030, &climate, &mut test_rng(99));
        let b = generate_events(&catalog, 2030, &climate, &mut test_rng(99));
        assert_eq!(a, b);
    }
}
