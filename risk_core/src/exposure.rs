use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{
    hazard::{HazardEvent, HazardKind, SpatialFootprint},
    region::{
        BuildingType, Crop, FacilityKind, RegionProfile, RegionStock, BUILDING_TYPES, CROPS,
        FACILITY_KINDS,
    },
};

/// Number of major river systems / coastal segments the footprint count
/// is normalized against.
const FOOTPRINT_DENOMINATOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposedBuildings {
    pub building_type: BuildingType,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposedFacilities {
    pub kind: FacilityKind,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposedCrop {
    pub crop: Crop,
    pub area_ha: f64,
}

/// Everything inside a hazard footprint for one event. Derived fresh
/// each year from the stock; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureSnapshot {
    pub exposure_ratio: f64,
    pub population: f64,
    pub buildings: Vec<ExposedBuildings>,
    pub buildings_total: u64,
    pub facilities: Vec<ExposedFacilities>,
    pub agriculture: Vec<ExposedCrop>,
}

/// Map a footprint onto the fraction of regional assets it covers.
///
/// Riverine footprints normalize the affected river count into
/// [0.1, 0.5], coastal footprints into [0.1, 0.4]; hazards without a
/// meaningful overlay use a flat 10%.
pub fn exposure_ratio(footprint: &SpatialFootprint) -> f64 {
    match footprint {
        SpatialFootprint::Riverine { affected_rivers } => {
            (affected_rivers.len() as f64 / FOOTPRINT_DENOMINATOR).clamp(0.1, 0.5)
        }
        SpatialFootprint::Coastal { affected_segments } => {
            (affected_segments.len() as f64 / FOOTPRINT_DENOMINATOR).clamp(0.1, 0.4)
        }
        SpatialFootprint::Generic => 0.1,
    }
}

/// Estimate the population, building stock, critical facilities, and
/// cropland inside one event's footprint.
///
/// Facility counts carry a ±20% sampling jitter standing in for the
/// spatial overlay a GIS-backed provider would perform; every exposed
/// quantity is capped at the total stock.
pub fn compute_exposure(
    _profile: &RegionProfile,
    stock: &RegionStock,
    event: &HazardEvent,
    rng: &mut ChaCha8Rng,
) -> ExposureSnapshot {
    let ratio = exposure_ratio(&event.footprint);

    let population = stock.population * ratio;

    let exposed_building_total = stock.buildings_total * ratio;
    let buildings: Vec<ExposedBuildings> = BUILDING_TYPES
        .iter()
        .map(|&building_type| ExposedBuildings {
            building_type,
            count: (exposed_building_total * stock.building_mix.fraction(building_type)) as u64,
        })
        .collect();
    let buildings_total = buildings.iter().map(|b| b.count).sum();

    let facilities: Vec<ExposedFacilities> = FACILITY_KINDS
        .iter()
        .map(|&kind| {
            let total = stock.facilities.count(kind);
            let jitter = rng.gen_range(0.8..1.2);
            ExposedFacilities {
                kind,
                count: (total * ratio * jitter).min(total) as u64,
            }
        })
        .collect();

    let agriculture: Vec<ExposedCrop> = CROPS
        .iter()
        .map(|&crop| {
            let crop_ratio = (ratio * crop_multiplier(crop, event)).min(0.9);
            ExposedCrop {
                crop,
                area_ha: stock.crops.area(crop) * crop_ratio,
            }
        })
        .collect();

    ExposureSnapshot {
        exposure_ratio: ratio,
        population,
        buildings,
        buildings_total,
        facilities,
        agriculture,
    }
}

/// Rice paddies concentrate in floodplains and the coastal delta, so
/// their exposure runs above the regional baseline there.
fn crop_multiplier(crop: Crop, event: &HazardEvent) -> f64 {
    if crop != Crop::Rice {
        return 1.0;
    }
    match (&event.footprint, event.kind) {
        (SpatialFootprint::Riverine { .. }, HazardKind::Flood) => 1.5,
        (SpatialFootprint::Coastal { .. }, _) => 1.2,
        _ => 1.0,
    }
}
