use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hazard::HazardKind;

/// Baseline year: every climate parameter is zero here.
pub const BASELINE_YEAR: i32 = 2025;

const ANCHOR_YEARS: [i32; 3] = [2030, 2040, 2050];

/// Named long-term emissions trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimatePathway {
    Low,
    Intermediate,
    High,
}

impl ClimatePathway {
    pub fn label(self) -> &'static str {
        match self {
            ClimatePathway::Low => "low",
            ClimatePathway::Intermediate => "intermediate",
            ClimatePathway::High => "high",
        }
    }

    /// Resolve a pathway from its configured name. Unknown names fall
    /// back to the intermediate pathway; the fallback is logged so the
    /// substitution is never silent.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "low" => ClimatePathway::Low,
            "intermediate" => ClimatePathway::Intermediate,
            "high" => ClimatePathway::High,
            other => {
                warn!(
                    target: "risk::climate",
                    pathway = other,
                    fallback = "intermediate",
                    "unknown climate pathway, using fallback"
                );
                ClimatePathway::Intermediate
            }
        }
    }
}

/// Climate parameters projected for one decade anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecadeAnchor {
    pub temperature_increase: f64,
    /// [pre-monsoon, monsoon, post-monsoon, winter]
    pub precipitation_change: [f64; 4],
    pub sea_level_rise: f64,
    pub cyclone_intensity_factor: f64,
    pub drought_frequency_factor: f64,
    pub extreme_rainfall_factor: f64,
}

impl DecadeAnchor {
    const ZERO: DecadeAnchor = DecadeAnchor {
        temperature_increase: 0.0,
        precipitation_change: [0.0; 4],
        sea_level_rise: 0.0,
        cyclone_intensity_factor: 0.0,
        drought_frequency_factor: 0.0,
        extreme_rainfall_factor: 0.0,
    };

    fn lerp(a: &DecadeAnchor, b: &DecadeAnchor, t: f64) -> DecadeAnchor {
        let mix = |x: f64, y: f64| x + (y - x) * t;
        DecadeAnchor {
            temperature_increase: mix(a.temperature_increase, b.temperature_increase),
            precipitation_change: [
                mix(a.precipitation_change[0], b.precipitation_change[0]),
                mix(a.precipitation_change[1], b.precipitation_change[1]),
                mix(a.precipitation_change[2], b.precipitation_change[2]),
                mix(a.precipitation_change[3], b.precipitation_change[3]),
            ],
            sea_level_rise: mix(a.sea_level_rise, b.sea_level_rise),
            cyclone_intensity_factor: mix(a.cyclone_intensity_factor, b.cyclone_intensity_factor),
            drought_frequency_factor: mix(a.drought_frequency_factor, b.drought_frequency_factor),
            extreme_rainfall_factor: mix(a.extreme_rainfall_factor, b.extreme_rainfall_factor),
        }
    }
}

/// Per-pathway anchor tables for 2030 / 2040 / 2050.
///
/// Values follow published AR6-style national projections for a low,
/// intermediate, and high emissions pathway. Swapping this table out is
/// how the model is recalibrated for another territory or study.
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayAnchors {
    pub low: [DecadeAnchor; 3],
    pub intermediate: [DecadeAnchor; 3],
    pub high: [DecadeAnchor; 3],
}

impl Default for PathwayAnchors {
    fn default() -> Self {
        Self {
            low: [
                DecadeAnchor {
                    temperature_increase: 0.6,
                    precipitation_change: [0.03, 0.05, 0.02, -0.01],
                    sea_level_rise: 0.10,
                    cyclone_intensity_factor: 0.03,
                    drought_frequency_factor: 0.05,
                    extreme_rainfall_factor: 0.05,
                },
                DecadeAnchor {
                    temperature_increase: 0.8,
                    precipitation_change: [0.05, 0.07, 0.03, -0.02],
                    sea_level_rise: 0.18,
                    cyclone_intensity_factor: 0.05,
                    drought_frequency_factor: 0.08,
                    extreme_rainfall_factor: 0.07,
                },
                DecadeAnchor {
                    temperature_increase: 0.9,
                    precipitation_change: [0.06, 0.08, 0.04, -0.02],
                    sea_level_rise: 0.24,
                    cyclone_intensity_factor: 0.07,
                    drought_frequency_factor: 0.10,
                    extreme_rainfall_factor: 0.09,
                },
            ],
            intermediate: [
                DecadeAnchor {
                    temperature_increase: 0.8,
                    precipitation_change: [0.05, 0.08, 0.04, -0.02],
                    sea_level_rise: 0.12,
                    cyclone_intensity_factor: 0.05,
                    drought_frequency_factor: 0.10,
                    extreme_rainfall_factor: 0.07,
                },
                DecadeAnchor {
                    temperature_increase: 1.1,
                    precipitation_change: [0.08, 0.12, 0.06, -0.03],
                    sea_level_rise: 0.22,
                    cyclone_intensity_factor: 0.08,
                    drought_frequency_factor: 0.15,
                    extreme_rainfall_factor: 0.12,
                },
                DecadeAnchor {
                    temperature_increase: 1.4,
                    precipitation_change: [0.10, 0.15, 0.08, -0.05],
                    sea_level_rise: 0.32,
                    cyclone_intensity_factor: 0.12,
                    drought_frequency_factor: 0.20,
                    extreme_rainfall_factor: 0.18,
                },
            ],
            high: [
                DecadeAnchor {
                    temperature_increase: 1.0,
                    precipitation_change: [0.07, 0.11, 0.06, -0.04],
                    sea_level_rise: 0.15,
                    cyclone_intensity_factor: 0.08,
                    drought_frequency_factor: 0.15,
                    extreme_rainfall_factor: 0.10,
                },
                DecadeAnchor {
                    temperature_increase: 1.6,
                    precipitation_change: [0.12, 0.18, 0.09, -0.08],
                    sea_level_rise: 0.30,
                    cyclone_intensity_factor: 0.15,
                    drought_frequency_factor: 0.25,
                    extreme_rainfall_factor: 0.20,
                },
                DecadeAnchor {
                    temperature_increase: 2.2,
                    precipitation_change: [0.18, 0.25, 0.12, -0.12],
                    sea_level_rise: 0.45,
                    cyclone_intensity_factor: 0.25,
                    drought_frequency_factor: 0.35,
                    extreme_rainfall_factor: 0.30,
                },
            ],
        }
    }
}

impl PathwayAnchors {
    fn anchors(&self, pathway: ClimatePathway) -> &[DecadeAnchor; 3] {
        match pathway {
            ClimatePathway::Low => &self.low,
            ClimatePathway::Intermediate => &self.intermediate,
            ClimatePathway::High => &self.high,
        }
    }
}

/// Continuous climate parameter set for one (pathway, year) pair.
///
/// Deterministic given its inputs; no randomness enters climate
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateScenarioState {
    pub pathway: ClimatePathway,
    pub year: i32,
    pub temperature_increase: f64,
    pub precipitation_change: [f64; 4],
    pub sea_level_rise: f64,
    pub cyclone_intensity_factor: f64,
    pub drought_frequency_factor: f64,
    pub extreme_rainfall_factor: f64,
}

impl Default for ClimateScenarioState {
    fn default() -> Self {
        Self {
            pathway: ClimatePathway::Intermediate,
            year: BASELINE_YEAR,
            temperature_increase: 0.0,
            precipitation_change: [0.0; 4],
            sea_level_rise: 0.0,
            cyclone_intensity_factor: 0.0,
            drought_frequency_factor: 0.0,
            extreme_rainfall_factor: 0.0,
        }
    }
}

/// Interpolate climate parameters for a target year along a pathway.
///
/// Years at or before the baseline return the zero state. Years between
/// the baseline and 2030 blend linearly from zero to the 2030 anchor;
/// years between anchors blend on the fraction of the decade elapsed;
/// years past 2050 are clamped to the 2050 anchor.
pub fn interpolate(anchors: &PathwayAnchors, pathway: ClimatePathway, year: i32) -> ClimateScenarioState {
    let table = anchors.anchors(pathway);

    let resolved = if year <= BASELINE_YEAR {
        DecadeAnchor::ZERO
    } else if year <= ANCHOR_YEARS[0] {
        let t = f64::from(year - BASELINE_YEAR) / f64::from(ANCHOR_YEARS[0] - BASELINE_YEAR);
        DecadeAnchor::lerp(&DecadeAnchor::ZERO, &table[0], t)
    } else if year >= ANCHOR_YEARS[2] {
        table[2]
    } else {
        let idx = if year < ANCHOR_YEARS[1] { 0 } else { 1 };
        let lo = ANCHOR_YEARS[idx];
        let hi = ANCHOR_YEARS[idx + 1];
        let t = f64::from(year - lo) / f64::from(hi - lo);
        DecadeAnchor::lerp(&table[idx], &table[idx + 1], t)
    };

    ClimateScenarioState {
        pathway,
        year,
        temperature_increase: resolved.temperature_increase,
        precipitation_change: resolved.precipitation_change,
        sea_level_rise: resolved.sea_level_rise,
        cyclone_intensity_factor: resolved.cyclone_intensity_factor,
        drought_frequency_factor: resolved.drought_frequency_factor,
        extreme_rainfall_factor: resolved.extreme_rainfall_factor,
    }
}

/// Hazard-specific modulation derived from the climate state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimateEffects {
    pub intensity_change: f64,
    pub frequency_change: f64,
}

/// Map the climate state onto occurrence/intensity adjustments for one
/// hazard type.
///
/// Floods compound monsoon precipitation, extreme-rainfall
/// intensification, drainage congestion from sea-level rise, and a
/// snowmelt term; cyclones compound the direct intensity factor with a
/// sea-surface-temperature term (with a small frequency offset, since
/// warming tends to produce fewer but stronger storms); droughts key off
/// winter drying and evapotranspiration. Landslides follow the
/// extreme-rainfall signal. Earthquakes are not climate-modulated.
pub fn climate_effects(kind: HazardKind, state: &ClimateScenarioState) -> ClimateEffects {
    match kind {
        HazardKind::Flood => {
            let pre_monsoon = state.precipitation_change[0];
            let monsoon = state.precipitation_change[1];
            let precip = 0.3 * pre_monsoon + 0.7 * monsoon;
            let drainage = 0.5 * state.sea_level_rise;
            let snowmelt = 0.1 * state.temperature_increase;
            ClimateEffects {
                intensity_change: precip + state.extreme_rainfall_factor + drainage + snowmelt,
                frequency_change: 0.7 * state.extreme_rainfall_factor + 0.3 * precip,
            }
        }
        HazardKind::Cyclone => {
            let sst = 0.8 * state.temperature_increase / 2.0;
            ClimateEffects {
                intensity_change: state.cyclone_intensity_factor + sst,
                frequency_change: -0.05 + 0.1 * sst,
            }
        }
        HazardKind::Drought => {
            let winter = state.precipitation_change[3];
            let pre_monsoon = state.precipitation_change[0];
            let evapotranspiration = 0.15 * state.temperature_increase;
            ClimateEffects {
                intensity_change: -winter + evapotranspiration - 0.5 * pre_monsoon,
                frequency_change: state.drought_frequency_factor,
            }
        }
        HazardKind::Landslide => ClimateEffects {
            intensity_change: state.extreme_rainfall_factor,
            frequency_change: 0.5 * state.extreme_rainfall_factor,
        },
        HazardKind::Earthquake => ClimateEffects::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_year_is_exact() {
        let anchors = PathwayAnchors::default();
        let state = interpolate(&anchors, ClimatePathway::Intermediate, 2030);
        assert_eq!(state.temperature_increase, 0.8);
        assert_eq!(state.sea_level_rise, 0.12);
        assert_eq!(state.precipitation_change, [0.05, 0.08, 0.04, -0.02]);

        let state = interpolate(&anchors, ClimatePathway::High, 2050);
        assert_eq!(state.temperature_increase, 2.2);
        assert_eq!(state.cyclone_intensity_factor, 0.25);
    }

    #[test]
    fn mid_decade_lies_strictly_between_anchors() {
        let anchors = PathwayAnchors::default();
        let lo = interpolate(&anchors, ClimatePathway::Intermediate, 2030);
        let mid = interpolate(&anchors, ClimatePathway::Intermediate, 2035);
        let hi = interpolate(&anchors, ClimatePathway::Intermediate, 2040);

        assert!(mid.temperature_increase > lo.temperature_increase);
        assert!(mid.temperature_increase < hi.temperature_increase);
        assert!(mid.sea_level_rise > lo.sea_level_rise);
        assert!(mid.sea_level_rise < hi.sea_level_rise);
    }

    #[test]
    fn pre_anchor_years_blend_from_zero_baseline() {
        let anchors = PathwayAnchors::default();
        let baseline = interpolate(&anchors, ClimatePathway::High, BASELINE_YEAR);
        assert_eq!(baseline.temperature_increase, 0.0);
        assert_eq!(baseline.sea_level_rise, 0.0);

        let partial = interpolate(&anchors, ClimatePathway::High, 2027);
        assert!(partial.temperature_increase > 0.0);
        assert!(partial.temperature_increase < 1.0);
    }

    #[test]
    fn years_past_last_anchor_clamp() {
        let anchors = PathwayAnchors::default();
        let state = interpolate(&anchors, ClimatePathway::Low, 2070);
        let last = interpolate(&anchors, ClimatePathway::Low, 2050);
        assert_eq!(state.temperature_increase, last.temperature_increase);
    }

    #[test]
    fn pathway_severity_is_monotone_at_anchors() {
        let anchors = PathwayAnchors::default();
        for year in ANCHOR_YEARS {
            let low = interpolate(&anchors, ClimatePathway::Low, year);
            let mid = interpolate(&anchors, ClimatePathway::Intermediate, year);
            let high = interpolate(&anchors, ClimatePathway::High, year);

            assert!(low.temperature_increase <= mid.temperature_increase);
            assert!(mid.temperature_increase <= high.temperature_increase);
            assert!(low.sea_level_rise <= mid.sea_level_rise);
            assert!(mid.sea_level_rise <= high.sea_level_rise);
            assert!(low.cyclone_intensity_factor <= mid.cyclone_intensity_factor);
            assert!(mid.cyclone_intensity_factor <= high.cyclone_intensity_factor);
            assert!(low.drought_frequency_factor <= mid.drought_frequency_factor);
            assert!(mid.drought_frequency_factor <= high.drought_frequency_factor);
            assert!(low.extreme_rainfall_factor <= mid.extreme_rainfall_factor);
            assert!(mid.extreme_rainfall_factor <= high.extreme_rainfall_factor);
            // monsoon precipitation also strengthens with severity
            assert!(low.precipitation_change[1] <= mid.precipitation_change[1]);
            assert!(mid.precipitation_change[1] <= high.precipitation_change[1]);
        }
    }

    #[test]
    fn unknown_pathway_falls_back_to_intermediate() {
        assert_eq!(ClimatePathway::from_name("rcp9.9"), ClimatePathway::Intermediate);
        assert_eq!(ClimatePathway::from_name("HIGH"), ClimatePathway::High);
    }

    #[test]
    fn earthquakes_are_not_climate_modulated() {
        let anchors = PathwayAnchors::default();
        let state = interpolate(&anchors, ClimatePathway::High, 2050);
        let effects = climate_effects(HazardKind::Earthquake, &state);
        assert_eq!(effects.intensity_change, 0.0);
        assert_eq!(effects.frequency_change, 0.0);
    }
}
