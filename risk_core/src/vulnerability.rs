use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};
use serde::{Deserialize, Serialize};

use crate::{
    exposure::ExposureSnapshot,
    hazard::{HazardDetail, HazardEvent, HazardKind},
    region::{BuildingType, Crop, FacilityKind},
};

/// Damage-ratio curve over a hazard intensity measure.
///
/// `Power` evaluates `c * x^e` gated by an absolute threshold below
/// which damage is zero; `ShiftedPower` evaluates `c * (x - t)^e` above
/// the threshold, the usual wind-damage form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageCurve {
    Power {
        coefficient: f64,
        exponent: f64,
        cap: f64,
        threshold: f64,
    },
    ShiftedPower {
        coefficient: f64,
        exponent: f64,
        cap: f64,
        threshold: f64,
    },
}

impl DamageCurve {
    pub fn evaluate(&self, measure: f64) -> f64 {
        let ratio = match *self {
            DamageCurve::Power {
                coefficient,
                exponent,
                cap,
                threshold,
            } => {
                if measure < threshold {
                    0.0
                } else {
                    (coefficient * measure.max(0.0).powf(exponent)).min(cap)
                }
            }
            DamageCurve::ShiftedPower {
                coefficient,
                exponent,
                cap,
                threshold,
            } => {
                if measure <= threshold {
                    0.0
                } else {
                    (coefficient * (measure - threshold).powf(exponent)).min(cap)
                }
            }
        };
        ratio.clamp(0.0, 1.0)
    }
}

/// Building fragility entry: the damage curve plus the intensity at
/// which collapse (near-total loss) is expected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingFragility {
    pub curve: DamageCurve,
    pub collapse_threshold: f64,
}

/// Fragility of one building type against one hazard. Hazards without a
/// structural pathway (drought, landslide outside mapped slopes) have no
/// entry.
pub fn building_fragility(kind: HazardKind, building: BuildingType) -> Option<BuildingFragility> {
    use BuildingType::*;
    use DamageCurve::*;

    let fragility = match (kind, building) {
        (HazardKind::Flood, Rcc) => BuildingFragility {
            curve: Power {
                coefficient: 0.1,
                exponent: 1.25,
                cap: 0.9,
                threshold: 0.3,
            },
            collapse_threshold: 3.0,
        },
        (HazardKind::Flood, SemiPucca) => BuildingFragility {
            curve: Power {
                coefficient: 0.2,
                exponent: 1.5,
                cap: 0.95,
                threshold: 0.2,
            },
            collapse_threshold: 2.5,
        },
        (HazardKind::Flood, Kutcha) => BuildingFragility {
            curve: Power {
                coefficient: 0.3,
                exponent: 1.7,
                cap: 1.0,
                threshold: 0.1,
            },
            collapse_threshold: 2.0,
        },
        (HazardKind::Flood, Jhupri) => BuildingFragility {
            curve: Power {
                coefficient: 0.5,
                exponent: 2.0,
                cap: 1.0,
                threshold: 0.05,
            },
            collapse_threshold: 1.5,
        },
        (HazardKind::Cyclone, Rcc) => BuildingFragility {
            curve: ShiftedPower {
                coefficient: 0.0001,
                exponent: 2.0,
                cap: 0.9,
                threshold: 80.0,
            },
            collapse_threshold: 250.0,
        },
        (HazardKind::Cyclone, SemiPucca) => BuildingFragility {
            curve: ShiftedPower {
                coefficient: 0.0002,
                exponent: 2.0,
                cap: 0.95,
                threshold: 60.0,
            },
            collapse_threshold: 200.0,
        },
        (HazardKind::Cyclone, Kutcha) => BuildingFragility {
            curve: ShiftedPower {
                coefficient: 0.0004,
                exponent: 2.0,
                cap: 1.0,
                threshold: 40.0,
            },
            collapse_threshold: 150.0,
        },
        (HazardKind::Cyclone, Jhupri) => BuildingFragility {
            curve: ShiftedPower {
                coefficient: 0.0008,
                exponent: 2.0,
                cap: 1.0,
                threshold: 30.0,
            },
            collapse_threshold: 120.0,
        },
        (HazardKind::Earthquake, Rcc) => BuildingFragility {
            curve: Power {
                coefficient: 1.5,
                exponent: 1.8,
                cap: 0.9,
                threshold: 0.1,
            },
            collapse_threshold: 0.6,
        },
        (HazardKind::Earthquake, SemiPucca) => BuildingFragility {
            curve: Power {
                coefficient: 2.0,
                exponent: 1.5,
                cap: 0.95,
                threshold: 0.08,
            },
            collapse_threshold: 0.4,
        },
        (HazardKind::Earthquake, Kutcha) => BuildingFragility {
            curve: Power {
                coefficient: 2.5,
                exponent: 1.3,
                cap: 1.0,
                threshold: 0.05,
            },
            collapse_threshold: 0.3,
        },
        (HazardKind::Earthquake, Jhupri) => BuildingFragility {
            curve: Power {
                coefficient: 3.0,
                exponent: 1.2,
                cap: 1.0,
                threshold: 0.03,
            },
            collapse_threshold: 0.2,
        },
        _ => return None,
    };
    Some(fragility)
}

/// Functional category of critical infrastructure for fragility and
/// disruption lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfraCategory {
    Hospitals,
    Schools,
    Bridges,
    Embankments,
    Power,
    Telecom,
}

/// Cyclone shelters are hardened assets and carry no damage pathway.
pub fn facility_category(kind: FacilityKind) -> Option<InfraCategory> {
    match kind {
        FacilityKind::Hospitals => Some(InfraCategory::Hospitals),
        FacilityKind::PrimarySchools | FacilityKind::SecondarySchools => {
            Some(InfraCategory::Schools)
        }
        FacilityKind::PowerPlants => Some(InfraCategory::Power),
        FacilityKind::Bridges => Some(InfraCategory::Bridges),
        FacilityKind::EmbankmentKm => Some(InfraCategory::Embankments),
        FacilityKind::TelecomTowers => Some(InfraCategory::Telecom),
        FacilityKind::CycloneShelters => None,
    }
}

pub fn infrastructure_curve(kind: HazardKind, category: InfraCategory) -> Option<DamageCurve> {
    // (coefficient, exponent, cap, threshold, shifted)
    let params = match (kind, category) {
        (HazardKind::Flood, InfraCategory::Hospitals) => (0.15, 1.3, 0.8, 0.0, false),
        (HazardKind::Flood, InfraCategory::Schools) => (0.2, 1.5, 0.9, 0.0, false),
        // scour damage
        (HazardKind::Flood, InfraCategory::Bridges) => (0.05, 2.5, 0.7, 0.0, false),
        (HazardKind::Flood, InfraCategory::Embankments) => (0.1, 2.2, 1.0, 0.0, false),
        (HazardKind::Flood, InfraCategory::Power) => (0.25, 1.2, 0.95, 0.0, false),
        (HazardKind::Flood, InfraCategory::Telecom) => (0.2, 1.3, 0.9, 0.0, false),
        (HazardKind::Cyclone, InfraCategory::Hospitals) => (0.00007, 2.0, 0.7, 100.0, true),
        (HazardKind::Cyclone, InfraCategory::Schools) => (0.00009, 2.0, 0.8, 80.0, true),
        (HazardKind::Cyclone, InfraCategory::Bridges) => (0.00003, 2.0, 0.4, 120.0, true),
        // wave action, no threshold shift
        (HazardKind::Cyclone, InfraCategory::Embankments) => (0.00004, 1.5, 0.6, 0.0, false),
        (HazardKind::Cyclone, InfraCategory::Power) => (0.0001, 2.0, 0.9, 60.0, true),
        (HazardKind::Cyclone, InfraCategory::Telecom) => (0.00015, 2.0, 0.95, 70.0, true),
        (HazardKind::Earthquake, InfraCategory::Hospitals) => (1.3, 1.7, 0.9, 0.0, false),
        (HazardKind::Earthquake, InfraCategory::Schools) => (1.8, 1.5, 0.95, 0.0, false),
        (HazardKind::Earthquake, InfraCategory::Bridges) => (1.2, 1.8, 0.85, 0.0, false),
        // liquefaction
        (HazardKind::Earthquake, InfraCategory::Embankments) => (1.0, 1.6, 0.7, 0.0, false),
        (HazardKind::Earthquake, InfraCategory::Power) => (1.3, 1.4, 0.8, 0.0, false),
        (HazardKind::Earthquake, InfraCategory::Telecom) => (1.1, 1.5, 0.75, 0.0, false),
        _ => return None,
    };

    let (coefficient, exponent, cap, threshold, shifted) = params;
    Some(if shifted {
        DamageCurve::ShiftedPower {
            coefficient,
            exponent,
            cap,
            threshold,
        }
    } else {
        DamageCurve::Power {
            coefficient,
            exponent,
            cap,
            threshold,
        }
    })
}

/// Gamma (shape, scale) parameters for functional-disruption days, by
/// damage tier.
fn disruption_params(category: InfraCategory, damage_ratio: f64) -> (f64, f64) {
    use InfraCategory::*;
    let tier = if damage_ratio < 0.2 {
        0
    } else if damage_ratio < 0.5 {
        1
    } else {
        2
    };
    match category {
        Hospitals => [(2.0, 2.0), (5.0, 6.0), (10.0, 15.0)][tier],
        Schools => [(3.0, 5.0), (7.0, 7.0), (12.0, 15.0)][tier],
        Power => [(1.0, 1.0), (3.0, 2.0), (7.0, 5.0)][tier],
        Telecom => [(1.0, 1.0), (2.0, 2.0), (5.0, 3.0)][tier],
        Bridges | Embankments => [(1.0, 2.0), (4.0, 5.0), (8.0, 10.0)][tier],
    }
}

/// Crop damage functions. Flood damage depends on both depth and how
/// long water stands; cyclone damage is a thresholded linear function of
/// wind; drought scales with severity.
fn crop_damage_ratio(crop: Crop, event: &HazardEvent) -> f64 {
    let (flood_depth_coef, flood_duration_coef, wind_coef, wind_offset, wind_threshold, drought_coef) =
        match crop {
            Crop::Rice => (0.2, 0.05, 0.003, 0.15, 50.0, 0.8),
            Crop::Wheat => (0.3, 0.07, 0.0025, 0.1, 40.0, 0.7),
            Crop::Jute => (0.15, 0.04, 0.0035, 0.12, 45.0, 0.9),
            Crop::Vegetables => (0.35, 0.08, 0.004, 0.1, 35.0, 0.85),
            Crop::Aquaculture => (0.1, 0.02, 0.0015, 0.05, 60.0, 0.95),
        };

    let ratio = match &event.detail {
        HazardDetail::Flood {
            depth_m,
            duration_days,
            ..
        } => flood_depth_coef * depth_m + flood_duration_coef * duration_days,
        HazardDetail::Cyclone { wind_speed_kmh, .. } => {
            if *wind_speed_kmh > wind_threshold {
                wind_coef * wind_speed_kmh - wind_offset
            } else {
                0.0
            }
        }
        HazardDetail::Drought { severity, .. } => drought_coef * severity,
        // no crop-specific pathway; generic scalar model
        _ => (0.2 * hazard_measure(event)).min(0.9),
    };
    ratio.clamp(0.0, 1.0)
}

/// The scalar intensity measure each damage curve consumes.
pub fn hazard_measure(event: &HazardEvent) -> f64 {
    match &event.detail {
        HazardDetail::Flood { depth_m, .. } => *depth_m,
        HazardDetail::Cyclone { wind_speed_kmh, .. } => *wind_speed_kmh,
        // approximate peak ground acceleration from magnitude
        HazardDetail::Earthquake { magnitude, .. } => magnitude / 10.0,
        HazardDetail::Landslide { .. } => event.intensity,
        HazardDetail::Drought { severity, .. } => *severity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingDamage {
    pub building_type: BuildingType,
    pub exposed: u64,
    pub damage_ratio: f64,
    pub damaged: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureDamage {
    pub kind: FacilityKind,
    pub category: InfraCategory,
    pub exposed: u64,
    pub damage_ratio: f64,
    pub damaged: u64,
    pub disruption_days: f64,
    pub service_days_lost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropDamage {
    pub crop: Crop,
    pub exposed_ha: f64,
    pub damage_ratio: f64,
    pub damaged_ha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Casualties {
    pub deaths: u64,
    pub injuries: u64,
    pub displaced: u64,
}

impl Casualties {
    pub fn total(&self) -> u64 {
        self.deaths + self.injuries + self.displaced
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EconomicLoss {
    pub direct_losses: f64,
    pub indirect_losses: f64,
}

/// Full damage picture for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageAssessment {
    pub buildings: Vec<BuildingDamage>,
    pub overall_building_damage_ratio: f64,
    pub casualties: Casualties,
    pub exposed_population: f64,
    pub infrastructure: Vec<InfrastructureDamage>,
    pub agriculture: Vec<CropDamage>,
    pub economic: EconomicLoss,
}

/// Apply the fragility and casualty models to everything the event
/// exposes.
pub fn assess_damage(
    exposure: &ExposureSnapshot,
    event: &HazardEvent,
    rng: &mut ChaCha8Rng,
) -> DamageAssessment {
    let measure = hazard_measure(event);

    let mut buildings = Vec::new();
    let mut damaged_total = 0u64;
    for exposed in &exposure.buildings {
        let Some(fragility) = building_fragility(event.kind, exposed.building_type) else {
            continue;
        };
        let damage_ratio = fragility.curve.evaluate(measure);
        let damaged = ((exposed.count as f64) * damage_ratio) as u64;
        damaged_total += damaged;
        buildings.push(BuildingDamage {
            building_type: exposed.building_type,
            exposed: exposed.count,
            damage_ratio,
            damaged,
        });
    }
    let overall_building_damage_ratio = if exposure.buildings_total > 0 {
        (damaged_total as f64 / exposure.buildings_total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let casualties = casualty_counts(event, exposure.population, overall_building_damage_ratio);

    let mut infrastructure = Vec::new();
    let mut service_days_lost_total = 0.0;
    for exposed in &exposure.facilities {
        let Some(category) = facility_category(exposed.kind) else {
            continue;
        };
        let Some(curve) = infrastructure_curve(event.kind, category) else {
            continue;
        };
        let damage_ratio = curve.evaluate(measure);
        let damaged = ((exposed.count as f64) * damage_ratio) as u64;
        let (shape, scale) = disruption_params(category, damage_ratio);
        let disruption_days = Gamma::new(shape, scale)
            .expect("disruption tiers are fixed and valid")
            .sample(rng)
            .max(0.0);
        let service_days_lost = exposed.count as f64 * damage_ratio * disruption_days;
        service_days_lost_total += service_days_lost;
        infrastructure.push(InfrastructureDamage {
            kind: exposed.kind,
            category,
            exposed: exposed.count,
            damage_ratio,
            damaged,
            disruption_days,
            service_days_lost,
        });
    }

    let agriculture: Vec<CropDamage> = exposure
        .agriculture
        .iter()
        .map(|exposed| {
            let damage_ratio = crop_damage_ratio(exposed.crop, event);
            CropDamage {
                crop: exposed.crop,
                exposed_ha: exposed.area_ha,
                damage_ratio,
                damaged_ha: exposed.area_ha * damage_ratio,
            }
        })
        .collect();

    let direct_losses = buildings
        .iter()
        .map(|b| b.damaged as f64 * b.building_type.replacement_value() * b.damage_ratio)
        .sum::<f64>()
        + infrastructure
            .iter()
            .map(|i| i.damaged as f64 * i.kind.replacement_value() * i.damage_ratio)
            .sum::<f64>()
        + agriculture
            .iter()
            .map(|c| c.damaged_ha * c.crop.value_per_hectare() * c.damage_ratio)
            .sum::<f64>();

    let disruption_factor = service_days_lost_total / 100.0;
    let indirect_multiplier = (0.5 + 0.1 * disruption_factor).clamp(0.2, 3.0);
    let economic = EconomicLoss {
        direct_losses,
        indirect_losses: direct_losses * indirect_multiplier,
    };

    DamageAssessment {
        buildings,
        overall_building_damage_ratio,
        casualties,
        exposed_population: exposure.population,
        infrastructure,
        agriculture,
        economic,
    }
}

/// Casualty rates are hazard-specific nonlinear functions of intensity;
/// earthquake rates additionally scale with the overall building damage
/// ratio because collapse is the dominant cause of harm.
fn casualty_counts(event: &HazardEvent, population: f64, damage_ratio: f64) -> Casualties {
    let (fatality, injury, displacement) = match &event.detail {
        HazardDetail::Flood { depth_m, .. } => (
            0.0001 + 0.001 * depth_m.powi(2),
            0.001 + 0.005 * depth_m.powf(1.5),
            0.01 + 0.1 * depth_m,
        ),
        HazardDetail::Cyclone {
            wind_speed_kmh,
            storm_surge_m,
            ..
        } => (
            0.0001 * (wind_speed_kmh / 100.0).powi(2) + 0.001 * storm_surge_m.powi(2),
            0.001 * (wind_speed_kmh / 80.0).powf(1.8),
            0.005 * (wind_speed_kmh / 60.0).powf(1.5),
        ),
        HazardDetail::Earthquake { .. } => {
            let pga = hazard_measure(event);
            (
                0.001 * pga.powf(2.5) * damage_ratio,
                0.01 * pga.powi(2) * damage_ratio,
                0.05 * pga.powf(1.5) * damage_ratio,
            )
        }
        _ => {
            let measure = hazard_measure(event);
            (0.0001 * measure, 0.001 * measure, 0.01 * measure)
        }
    };

    let deaths = population * fatality.clamp(0.0, 1.0);
    let injuries = population * injury.clamp(0.0, 1.0);
    let displaced = population * displacement.clamp(0.0, 1.0);

    // deaths + injuries + displaced can never exceed the exposed
    // population; scale all three down proportionally when they would
    let total = deaths + injuries + displaced;
    let scale = if total > population && total > 0.0 {
        population / total
    } else {
        1.0
    };

    Casualties {
        deaths: (deaths * scale) as u64,
        injuries: (injuries * scale) as u64,
        displaced: (displaced * scale) as u64,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::exposure::compute_exposure;
    use crate::hazard::{FloodClass, SpatialFootprint};
    use crate::region::{RegionClass, RegionProfile, RegionStock};

    fn test_region() -> (RegionProfile, RegionStock) {
        (
            RegionProfile {
                name: "test".to_string(),
                class: RegionClass::Floodplain,
                literacy_rate: 0.7,
                electrification_rate: 0.9,
            },
            RegionStock::default(),
        )
    }

    fn flood_event(depth: f64) -> HazardEvent {
        HazardEvent {
            hazard_id: "riverine_flood".to_string(),
            kind: HazardKind::Flood,
            year: 2030,
            month: 7,
            return_period: 10.0,
            intensity: depth,
            detail: HazardDetail::Flood {
                class: FloodClass::Riverine,
                depth_m: depth,
                duration_days: 10.0,
            },
            footprint: SpatialFootprint::Riverine {
                affected_rivers: vec!["brahmaputra_jamuna".to_string()],
            },
        }
    }

    fn cyclone_event(wind: f64) -> HazardEvent {
        HazardEvent {
            hazard_id: "bay_cyclone".to_string(),
            kind: HazardKind::Cyclone,
            year: 2030,
            month: 5,
            return_period: 10.0,
            intensity: wind,
            detail: HazardDetail::Cyclone {
                wind_speed_kmh: wind,
                storm_surge_m: 0.05 * wind * 1.2,
                rainfall_mm_per_hr: 10.0,
                duration_hours: 24.0,
            },
            footprint: SpatialFootprint::Coastal {
                affected_segments: vec!["chittagong".to_string(), "khulna".to_string()],
            },
        }
    }

    #[test]
    fn rcc_flood_curve_matches_reference_point() {
        let fragility = building_fragility(HazardKind::Flood, BuildingType::Rcc).unwrap();
        let ratio = fragility.curve.evaluate(1.0);
        assert!((ratio - 0.1).abs() < 1e-9, "expected 0.1, got {ratio}");
        // below the onset threshold nothing is damaged
        assert_eq!(fragility.curve.evaluate(0.2), 0.0);
        // deep water saturates at the cap
        assert_eq!(fragility.curve.evaluate(10.0), 0.9);
    }

    #[test]
    fn kutcha_cyclone_collapse_is_near_total() {
        let fragility = building_fragility(HazardKind::Cyclone, BuildingType::Kutcha).unwrap();
        let at_collapse = fragility.curve.evaluate(fragility.collapse_threshold);
        assert!(at_collapse > 0.0);
        assert!(at_collapse <= 1.0);
        assert!(at_collapse > 0.9, "collapse threshold should mark near-total loss");
        assert_eq!(fragility.curve.evaluate(30.0), 0.0);
    }

    #[test]
    fn flood_scenario_damaged_counts_follow_curve() {
        let (profile, stock) = test_region();
        let event = flood_event(1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let exposure = compute_exposure(&profile, &stock, &event, &mut rng);
        let assessment = assess_damage(&exposure, &event, &mut rng);

        let rcc = assessment
            .buildings
            .iter()
            .find(|b| b.building_type == BuildingType::Rcc)
            .unwrap();
        assert!((rcc.damage_ratio - 0.1).abs() < 1e-9);
        let expected = (rcc.exposed as f64 * 0.1) as u64;
        assert!(rcc.damaged.abs_diff(expected) <= 1);
    }

    #[test]
    fn damage_ratios_and_counts_respect_bounds() {
        let (profile, stock) = test_region();
        let mut rng = ChaCha8Rng::seed_from_u64(33);
        for event in [flood_event(0.5), flood_event(4.0), cyclone_event(120.0), cyclone_event(220.0)]
        {
            let exposure = compute_exposure(&profile, &stock, &event, &mut rng);
            let assessment = assess_damage(&exposure, &event, &mut rng);

            assert!((0.0..=1.0).contains(&assessment.overall_building_damage_ratio));
            for b in &assessment.buildings {
                assert!((0.0..=1.0).contains(&b.damage_ratio));
                assert!(b.damaged <= b.exposed);
            }
            for i in &assessment.infrastructure {
                assert!((0.0..=1.0).contains(&i.damage_ratio));
                assert!(i.damaged <= i.exposed);
                assert!(i.disruption_days >= 0.0);
            }
            for c in &assessment.agriculture {
                assert!((0.0..=1.0).contains(&c.damage_ratio));
                assert!(c.damaged_ha <= c.exposed_ha);
            }
            assert!(
                assessment.casualties.total() as f64 <= assessment.exposed_population + 1.0
            );
            assert!(assessment.economic.direct_losses >= 0.0);
            let multiplier =
                assessment.economic.indirect_losses / assessment.economic.direct_losses.max(1.0);
            assert!(multiplier <= 3.0 + 1e-9);
        }
    }

    #[test]
    fn earthquake_casualties_scale_with_damage_ratio() {
        let event = HazardEvent {
            hazard_id: "plate_boundary_earthquake".to_string(),
            kind: HazardKind::Earthquake,
            year: 2030,
            month: 3,
            return_period: 100.0,
            intensity: 6.6,
            detail: HazardDetail::Earthquake {
                magnitude: 6.6,
                focal_depth_km: 15.0,
            },
            footprint: SpatialFootprint::Generic,
        };
        let light = casualty_counts(&event, 1_000_000.0, 0.1);
        let heavy = casualty_counts(&event, 1_000_000.0, 0.8);
        assert!(heavy.deaths > light.deaths);
        assert!(heavy.displaced > light.displaced);
    }

    #[test]
    fn drought_leaves_buildings_untouched_but_hits_crops() {
        let (profile, stock) = test_region();
        let event = HazardEvent {
            hazard_id: "seasonal_drought".to_string(),
            kind: HazardKind::Drought,
            year: 2032,
            month: 2,
            return_period: 10.0,
            intensity: 0.6,
            detail: HazardDetail::Drought {
                severity: 0.6,
                duration_months: 4.0,
            },
            footprint: SpatialFootprint::Generic,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        let exposure = compute_exposure(&profile, &stock, &event, &mut rng);
        let assessment = assess_damage(&exposure, &event, &mut rng);

        assert!(assessment.buildings.is_empty());
        assert_eq!(assessment.overall_building_damage_ratio, 0.0);
        let rice = assessment
            .agriculture
            .iter()
            .find(|c| c.crop == Crop::Rice)
            .unwrap();
        assert!((rice.damage_ratio - 0.48).abs() < 1e-9);
    }

    #[test]
    fn casualty_sum_caps_at_exposed_population() {
        // a deep flood over a small population forces the cap
        let event = flood_event(8.0);
        let casualties = casualty_counts(&event, 1_000.0, 0.9);
        assert!(casualties.total() <= 1_000);
    }
}
