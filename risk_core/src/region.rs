use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Broad physiographic classification used by exposure, warning, and
/// recovery lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionClass {
    Coastal,
    Floodplain,
    HaorBasin,
    BarindTract,
    HillTracts,
    CharLands,
    Urban,
}

impl RegionClass {
    /// Early-warning-system development level for the region class.
    pub fn ews_capacity(self) -> f64 {
        match self {
            RegionClass::Coastal => 0.8,
            RegionClass::Urban => 0.7,
            RegionClass::Floodplain => 0.6,
            RegionClass::HaorBasin => 0.5,
            RegionClass::BarindTract => 0.5,
            RegionClass::CharLands => 0.4,
            RegionClass::HillTracts => 0.4,
        }
    }

    /// Relative response-agency presence for the region class.
    pub fn response_capacity(self) -> f64 {
        match self {
            RegionClass::Coastal => 0.8,
            RegionClass::Urban => 0.7,
            RegionClass::Floodplain => 0.6,
            RegionClass::HaorBasin => 0.5,
            RegionClass::HillTracts => 0.4,
            RegionClass::BarindTract => 0.6,
            RegionClass::CharLands => 0.6,
        }
    }

    /// Recovery-speed multiplier for the region class.
    pub fn recovery_factor(self) -> f64 {
        match self {
            RegionClass::Coastal => 0.9,
            RegionClass::Urban => 1.1,
            RegionClass::Floodplain => 0.9,
            RegionClass::HaorBasin => 0.8,
            RegionClass::HillTracts => 0.8,
            RegionClass::CharLands => 0.7,
            RegionClass::BarindTract => 0.9,
        }
    }
}

/// Static descriptors for one simulated region. A production deployment
/// would back this with GIS-derived data; the pipeline only ever sees
/// this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub name: String,
    pub class: RegionClass,
    pub literacy_rate: f64,
    pub electrification_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Rcc,
    SemiPucca,
    Kutcha,
    Jhupri,
}

pub const BUILDING_TYPES: [BuildingType; 4] = [
    BuildingType::Rcc,
    BuildingType::SemiPucca,
    BuildingType::Kutcha,
    BuildingType::Jhupri,
];

impl BuildingType {
    pub fn replacement_value(self) -> f64 {
        match self {
            BuildingType::Rcc => 5_000_000.0,
            BuildingType::SemiPucca => 1_500_000.0,
            BuildingType::Kutcha => 500_000.0,
            BuildingType::Jhupri => 100_000.0,
        }
    }

    /// Monthly housing reconstruction rate. Lighter structures rebuild
    /// faster.
    pub fn monthly_recovery_rate(self) -> f64 {
        match self {
            BuildingType::Rcc => 0.10,
            BuildingType::SemiPucca => 0.08,
            BuildingType::Kutcha => 0.15,
            BuildingType::Jhupri => 0.20,
        }
    }
}

/// Building-type shares, kept summing to one as the mix shifts toward
/// engineered construction over the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingMix {
    pub rcc: f64,
    pub semi_pucca: f64,
    pub kutcha: f64,
    pub jhupri: f64,
}

impl Default for BuildingMix {
    fn default() -> Self {
        Self {
            rcc: 0.15,
            semi_pucca: 0.25,
            kutcha: 0.50,
            jhupri: 0.10,
        }
    }
}

impl BuildingMix {
    pub fn fraction(&self, building_type: BuildingType) -> f64 {
        match building_type {
            BuildingType::Rcc => self.rcc,
            BuildingType::SemiPucca => self.semi_pucca,
            BuildingType::Kutcha => self.kutcha,
            BuildingType::Jhupri => self.jhupri,
        }
    }

    pub fn sum(&self) -> f64 {
        self.rcc + self.semi_pucca + self.kutcha + self.jhupri
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityKind {
    Hospitals,
    PrimarySchools,
    SecondarySchools,
    PowerPlants,
    Bridges,
    EmbankmentKm,
    CycloneShelters,
    TelecomTowers,
}

pub const FACILITY_KINDS: [FacilityKind; 8] = [
    FacilityKind::Hospitals,
    FacilityKind::PrimarySchools,
    FacilityKind::SecondarySchools,
    FacilityKind::PowerPlants,
    FacilityKind::Bridges,
    FacilityKind::EmbankmentKm,
    FacilityKind::CycloneShelters,
    FacilityKind::TelecomTowers,
];

impl FacilityKind {
    pub fn replacement_value(self) -> f64 {
        match self {
            FacilityKind::Hospitals => 100_000_000.0,
            FacilityKind::PrimarySchools => 10_000_000.0,
            FacilityKind::SecondarySchools => 20_000_000.0,
            FacilityKind::PowerPlants => 5_000_000_000.0,
            FacilityKind::Bridges => 50_000_000.0,
            FacilityKind::EmbankmentKm => 10_000_000.0,
            FacilityKind::CycloneShelters => 20_000_000.0,
            FacilityKind::TelecomTowers => 5_000_000.0,
        }
    }
}

/// Critical-facility inventory, growing with public investment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacilityCounts {
    pub hospitals: f64,
    pub primary_schools: f64,
    pub secondary_schools: f64,
    pub power_plants: f64,
    pub bridges: f64,
    pub embankment_km: f64,
    pub cyclone_shelters: f64,
    pub telecom_towers: f64,
}

impl Default for FacilityCounts {
    fn default() -> Self {
        Self {
            hospitals: 620.0,
            primary_schools: 65_000.0,
            secondary_schools: 20_300.0,
            power_plants: 143.0,
            bridges: 4_700.0,
            embankment_km: 12_000.0,
            cyclone_shelters: 2_500.0,
            telecom_towers: 35_000.0,
        }
    }
}

impl FacilityCounts {
    pub fn count(&self, kind: FacilityKind) -> f64 {
        match kind {
            FacilityKind::Hospitals => self.hospitals,
            FacilityKind::PrimarySchools => self.primary_schools,
            FacilityKind::SecondarySchools => self.secondary_schools,
            FacilityKind::PowerPlants => self.power_plants,
            FacilityKind::Bridges => self.bridges,
            FacilityKind::EmbankmentKm => self.embankment_km,
            FacilityKind::CycloneShelters => self.cyclone_shelters,
            FacilityKind::TelecomTowers => self.telecom_towers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    Rice,
    Wheat,
    Jute,
    Vegetables,
    Aquaculture,
}

pub const CROPS: [Crop; 5] = [
    Crop::Rice,
    Crop::Wheat,
    Crop::Jute,
    Crop::Vegetables,
    Crop::Aquaculture,
];

impl Crop {
    /// Seasonal yield value per hectare.
    pub fn value_per_hectare(self) -> f64 {
        match self {
            Crop::Rice => 150_000.0,
            Crop::Wheat => 120_000.0,
            Crop::Jute => 200_000.0,
            Crop::Vegetables => 300_000.0,
            Crop::Aquaculture => 500_000.0,
        }
    }
}

/// Cultivated area by crop, in hectares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropAreas {
    pub rice_ha: f64,
    pub wheat_ha: f64,
    pub jute_ha: f64,
    pub vegetables_ha: f64,
    pub aquaculture_ha: f64,
}

impl Default for CropAreas {
    fn default() -> Self {
        Self {
            rice_ha: 11_000_000.0,
            wheat_ha: 350_000.0,
            jute_ha: 700_000.0,
            vegetables_ha: 900_000.0,
            aquaculture_ha: 830_000.0,
        }
    }
}

impl CropAreas {
    pub fn area(&self, crop: Crop) -> f64 {
        match crop {
            Crop::Rice => self.rice_ha,
            Crop::Wheat => self.wheat_ha,
            Crop::Jute => self.jute_ha,
            Crop::Vegetables => self.vegetables_ha,
            Crop::Aquaculture => self.aquaculture_ha,
        }
    }
}

/// Per-year snapshot of everything a hazard can expose. Mutated only by
/// the orchestrator between simulation years; read-only to every
/// pipeline stage within a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStock {
    pub population: f64,
    pub urban_fraction: f64,
    pub buildings_total: f64,
    pub building_mix: BuildingMix,
    pub facilities: FacilityCounts,
    pub crops: CropAreas,
}

impl Default for RegionStock {
    fn default() -> Self {
        Self {
            population: 169_000_000.0,
            urban_fraction: 0.39,
            buildings_total: 36_000_000.0,
            building_mix: BuildingMix::default(),
            facilities: FacilityCounts::default(),
            crops: CropAreas::default(),
        }
    }
}

impl RegionStock {
    /// Apply one year of deterministic demographic and asset evolution:
    /// population growth, urbanization, the building mix shifting toward
    /// RCC, agricultural shrinkage, and facility construction.
    ///
    /// Plausibility is asserted afterwards; a violation means the
    /// compounding formulas themselves are wrong, which is fatal.
    pub fn advance_year(&mut self) {
        self.population *= 1.01;
        self.buildings_total *= 1.01;
        self.urban_fraction = (self.urban_fraction + 0.005).min(0.65);

        let shift = (0.35 - self.building_mix.rcc).min(0.003).max(0.0);
        self.building_mix.rcc += shift;
        self.building_mix.kutcha = (self.building_mix.kutcha - shift / 2.0).max(0.0);
        self.building_mix.semi_pucca = (self.building_mix.semi_pucca - shift / 2.0).max(0.0);

        self.crops.rice_ha *= 1.0 - 0.002;
        self.crops.wheat_ha *= 1.0 - 0.001;
        self.crops.jute_ha *= 1.0 - 0.001;
        self.crops.vegetables_ha *= 1.0 - 0.001;
        self.crops.aquaculture_ha *= 1.0 - 0.001;

        self.facilities.cyclone_shelters += 50.0;
        self.facilities.hospitals += 10.0;
        self.facilities.telecom_towers += 1_000.0;

        self.assert_plausible();
    }

    /// State-corruption guard: drifting outside these bounds after
    /// repeated annual updates indicates a compounding-formula defect
    /// and must halt the run.
    pub fn assert_plausible(&self) {
        assert!(
            self.population.is_finite() && self.population > 0.0,
            "region population corrupted: {}",
            self.population
        );
        assert!(
            (0.0..=1.0).contains(&self.urban_fraction),
            "urban fraction out of range: {}",
            self.urban_fraction
        );
        let mix_sum = self.building_mix.sum();
        assert!(
            (mix_sum - 1.0).abs() < 1e-6,
            "building mix no longer sums to one: {mix_sum}"
        );
        for crop in CROPS {
            assert!(
                self.crops.area(crop) >= 0.0,
                "negative cultivated area for {crop:?}"
            );
        }
    }
}

/// Seed data for one (profile, stock) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSeed {
    pub profile: RegionProfile,
    pub stock: RegionStock,
}

/// Supplier of region data. The synthetic implementation stands in for
/// the GIS-backed provider the production system would wire up.
pub trait RegionProvider {
    fn regions(&self) -> Vec<RegionSeed>;
}

/// Synthetic national dataset split into three representative regions.
#[derive(Debug, Clone, Default)]
pub struct SyntheticRegionProvider;

impl SyntheticRegionProvider {
    fn scaled_stock(population_share: f64) -> RegionStock {
        let base = RegionStock::default();
        RegionStock {
            population: base.population * population_share,
            urban_fraction: base.urban_fraction,
            buildings_total: base.buildings_total * population_share,
            building_mix: base.building_mix,
            facilities: FacilityCounts {
                hospitals: base.facilities.hospitals * population_share,
                primary_schools: base.facilities.primary_schools * population_share,
                secondary_schools: base.facilities.secondary_schools * population_share,
                power_plants: base.facilities.power_plants * population_share,
                bridges: base.facilities.bridges * population_share,
                embankment_km: base.facilities.embankment_km * population_share,
                cyclone_shelters: base.facilities.cyclone_shelters * population_share,
                telecom_towers: base.facilities.telecom_towers * population_share,
            },
            crops: CropAreas {
                rice_ha: base.crops.rice_ha * population_share,
                wheat_ha: base.crops.wheat_ha * population_share,
                jute_ha: base.crops.jute_ha * population_share,
                vegetables_ha: base.crops.vegetables_ha * population_share,
                aquaculture_ha: base.crops.aquaculture_ha * population_share,
            },
        }
    }
}

impl RegionProvider for SyntheticRegionProvider {
    fn regions(&self) -> Vec<RegionSeed> {
        vec![
            RegionSeed {
                profile: RegionProfile {
                    name: "coastal_belt".to_string(),
                    class: RegionClass::Coastal,
                    literacy_rate: 0.70,
                    electrification_rate: 0.85,
                },
                stock: Self::scaled_stock(0.25),
            },
            RegionSeed {
                profile: RegionProfile {
                    name: "central_floodplain".to_string(),
                    class: RegionClass::Floodplain,
                    literacy_rate: 0.72,
                    electrification_rate: 0.90,
                },
                stock: Self::scaled_stock(0.55),
            },
            RegionSeed {
                profile: RegionProfile {
                    name: "metro_core".to_string(),
                    class: RegionClass::Urban,
                    literacy_rate: 0.85,
                    electrification_rate: 0.99,
                },
                stock: Self::scaled_stock(0.20),
            },
        ]
    }
}

/// The active (profile, stock) pair for one simulation run.
#[derive(Resource, Debug, Clone)]
pub struct RegionState {
    pub profile: RegionProfile,
    pub stock: RegionStock,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mix_sums_to_one() {
        assert!((BuildingMix::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn advance_preserves_invariants_over_decades() {
        let mut stock = RegionStock::default();
        let start_population = stock.population;
        for _ in 0..30 {
            stock.advance_year();
        }
        assert!(stock.population > start_population);
        assert!((stock.building_mix.sum() - 1.0).abs() < 1e-6);
        assert!(stock.building_mix.rcc <= 0.35 + 1e-9);
        assert!(stock.urban_fraction <= 0.65);
        assert!(stock.crops.rice_ha < CropAreas::default().rice_ha);
    }

    #[test]
    fn synthetic_provider_supplies_distinct_regions() {
        let seeds = SyntheticRegionProvider.regions();
        assert_eq!(seeds.len(), 3);
        for seed in &seeds {
            seed.stock.assert_plausible();
        }
        assert!(seeds.iter().any(|s| s.profile.class == RegionClass::Coastal));
    }
}
