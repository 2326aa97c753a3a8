use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    hazard::HazardKind,
    region::RegionProfile,
    vulnerability::DamageAssessment,
};

/// Share of remaining fatalities that search-and-rescue can avert.
const RESCUE_EFFECTIVENESS: f64 = 0.3;

/// Person-days of relief assumed per affected person.
const RELIEF_DAYS_PER_PERSON: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Rescue,
    Evacuation,
    Relief,
    Medical,
    Restoration,
}

pub const OPERATIONS: [OperationKind; 5] = [
    OperationKind::Rescue,
    OperationKind::Evacuation,
    OperationKind::Relief,
    OperationKind::Medical,
    OperationKind::Restoration,
];

/// Per-operation effectiveness scores, all in [0.05, 0.95].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationScores {
    pub rescue: f64,
    pub evacuation: f64,
    pub relief: f64,
    pub medical: f64,
    pub restoration: f64,
}

impl OperationScores {
    pub fn get(&self, operation: OperationKind) -> f64 {
        match operation {
            OperationKind::Rescue => self.rescue,
            OperationKind::Evacuation => self.evacuation,
            OperationKind::Relief => self.relief,
            OperationKind::Medical => self.medical,
            OperationKind::Restoration => self.restoration,
        }
    }

    fn set(&mut self, operation: OperationKind, value: f64) {
        match operation {
            OperationKind::Rescue => self.rescue = value,
            OperationKind::Evacuation => self.evacuation = value,
            OperationKind::Relief => self.relief = value,
            OperationKind::Medical => self.medical = value,
            OperationKind::Restoration => self.restoration = value,
        }
    }

    pub fn mean(&self) -> f64 {
        (self.rescue + self.evacuation + self.relief + self.medical + self.restoration) / 5.0
    }
}

/// Hazard-specific base effectiveness of each operation. Earthquakes are
/// the weakest case (little rescue experience, heavy transport
/// disruption); droughts give responders the most time.
fn base_effectiveness(kind: HazardKind) -> OperationScores {
    match kind {
        HazardKind::Flood => OperationScores {
            rescue: 0.7,
            evacuation: 0.6,
            relief: 0.6,
            medical: 0.5,
            restoration: 0.5,
        },
        HazardKind::Cyclone => OperationScores {
            rescue: 0.6,
            evacuation: 0.7,
            relief: 0.6,
            medical: 0.5,
            restoration: 0.4,
        },
        HazardKind::Landslide => OperationScores {
            rescue: 0.4,
            evacuation: 0.3,
            relief: 0.4,
            medical: 0.4,
            restoration: 0.5,
        },
        HazardKind::Earthquake => OperationScores {
            rescue: 0.3,
            evacuation: 0.4,
            relief: 0.5,
            medical: 0.4,
            restoration: 0.3,
        },
        HazardKind::Drought => OperationScores {
            rescue: 0.8,
            evacuation: 0.7,
            relief: 0.6,
            medical: 0.6,
            restoration: 0.4,
        },
    }
}

/// Scaling factor for transport disruption during response.
fn transport_disruption(kind: HazardKind) -> f64 {
    match kind {
        HazardKind::Flood => 0.7,
        HazardKind::Cyclone => 0.6,
        HazardKind::Earthquake => 0.8,
        HazardKind::Landslide => 0.7,
        HazardKind::Drought => 0.2,
    }
}

/// Composite inter-agency coordination score; equal weights across the
/// five coordination interfaces.
fn coordination_score() -> f64 {
    let inter_agency = 0.6;
    let govt_ngo = 0.5;
    let national_local = 0.5;
    let civil_military = 0.7;
    let international = 0.6;
    0.2 * (inter_agency + govt_ngo + national_local + civil_military + international)
}

/// Caller-supplied resource picture. Adequacy entries override the 0.6
/// planning default; capacities feed the provision ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseResources {
    pub rescue_adequacy: f64,
    pub evacuation_adequacy: f64,
    pub relief_adequacy: f64,
    pub medical_adequacy: f64,
    pub restoration_adequacy: f64,
    pub shelter_capacity_persons: f64,
    pub relief_person_days: f64,
    /// Treatable patient count; zero means "derive from affected".
    pub medical_capacity: f64,
}

impl Default for ResponseResources {
    fn default() -> Self {
        Self {
            rescue_adequacy: 0.6,
            evacuation_adequacy: 0.6,
            relief_adequacy: 0.6,
            medical_adequacy: 0.6,
            restoration_adequacy: 0.6,
            shelter_capacity_persons: 2_500_000.0,
            relief_person_days: 1_000_000.0,
            medical_capacity: 0.0,
        }
    }
}

impl ResponseResources {
    fn adequacy(&self, operation: OperationKind) -> f64 {
        match operation {
            OperationKind::Rescue => self.rescue_adequacy,
            OperationKind::Evacuation => self.evacuation_adequacy,
            OperationKind::Relief => self.relief_adequacy,
            OperationKind::Medical => self.medical_adequacy,
            OperationKind::Restoration => self.restoration_adequacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceConsumption {
    pub food_person_days: u64,
    pub water_liters: u64,
    pub medical_kits: u64,
    pub shelter_places_used: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseOutcome {
    pub effectiveness: OperationScores,
    pub gaps: OperationScores,
    pub coordination: f64,
    pub transport_disruption: f64,
    pub additional_lives_saved: u64,
    pub shelter_access_ratio: f64,
    pub relief_provision_ratio: f64,
    pub medical_service_ratio: f64,
    pub consumption: ResourceConsumption,
    pub overall_score: f64,
}

/// Model response operations against one damage assessment.
///
/// Effectiveness per operation is the hazard base rate modulated by a
/// weighted mix of regional capacity, resource adequacy, coordination,
/// and transport conditions; provision ratios compare capacity against
/// need derived from the casualty counts.
pub fn simulate_response(
    kind: HazardKind,
    damage: &DamageAssessment,
    resources: &ResponseResources,
    profile: &RegionProfile,
) -> ResponseOutcome {
    let affected = damage.casualties.total() as f64;
    let base = base_effectiveness(kind);
    let disruption = transport_disruption(kind);
    let coordination = coordination_score();
    let regional = profile.class.response_capacity();

    let mut effectiveness = OperationScores::default();
    let mut gaps = OperationScores::default();
    for operation in OPERATIONS {
        let adjusted = base.get(operation)
            * (0.4
                + 0.2 * regional
                + 0.2 * resources.adequacy(operation)
                + 0.1 * coordination
                + 0.1 * (1.0 - disruption));
        let clamped = adjusted.clamp(0.05, 0.95);
        effectiveness.set(operation, clamped);
        gaps.set(operation, (1.0 - clamped).max(0.0));
    }

    let additional_lives_saved = ((damage.casualties.deaths as f64
        * effectiveness.rescue
        * RESCUE_EFFECTIVENESS) as u64)
        .min(damage.casualties.deaths);

    let displaced = damage.casualties.displaced as f64;
    let shelter_access_ratio = (resources.shelter_capacity_persons / displaced.max(1.0)).min(1.0);

    let relief_need = affected * RELIEF_DAYS_PER_PERSON;
    let relief_provision_ratio = (resources.relief_person_days / relief_need.max(1.0)).min(1.0);

    let injured = damage.casualties.injuries as f64;
    let medical_capacity = if resources.medical_capacity > 0.0 {
        resources.medical_capacity
    } else {
        affected * 0.05
    };
    let medical_service_ratio = (medical_capacity / injured.max(1.0)).min(1.0);

    let consumption = ResourceConsumption {
        food_person_days: (affected * effectiveness.relief) as u64,
        water_liters: (affected * effectiveness.relief * 3.0) as u64,
        medical_kits: (affected * effectiveness.medical * 0.05) as u64,
        shelter_places_used: (affected * effectiveness.evacuation * 0.7) as u64,
    };

    let outcome = ResponseOutcome {
        effectiveness,
        gaps,
        coordination,
        transport_disruption: disruption,
        additional_lives_saved,
        shelter_access_ratio,
        relief_provision_ratio,
        medical_service_ratio,
        consumption,
        overall_score: effectiveness.mean(),
    };
    debug!(
        target: "risk::response",
        hazard = kind.label(),
        overall = outcome.overall_score,
        lives_saved = outcome.additional_lives_saved,
        "response simulated"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionClass;
    use crate::vulnerability::{Casualties, EconomicLoss};

    fn profile(class: RegionClass) -> RegionProfile {
        RegionProfile {
            name: "test".to_string(),
            class,
            literacy_rate: 0.7,
            electrification_rate: 0.9,
        }
    }

    fn assessment(deaths: u64, injuries: u64, displaced: u64) -> DamageAssessment {
        DamageAssessment {
            buildings: Vec::new(),
            overall_building_damage_ratio: 0.3,
            casualties: Casualties {
                deaths,
                injuries,
                displaced,
            },
            exposed_population: 1_000_000.0,
            infrastructure: Vec::new(),
            agriculture: Vec::new(),
            economic: EconomicLoss {
                direct_losses: 1.0e9,
                indirect_losses: 1.5e9,
            },
        }
    }

    #[test]
    fn effectiveness_stays_inside_clamp() {
        let damage = assessment(500, 5_000, 100_000);
        for kind in [
            HazardKind::Flood,
            HazardKind::Cyclone,
            HazardKind::Earthquake,
            HazardKind::Landslide,
            HazardKind::Drought,
        ] {
            let outcome = simulate_response(
                kind,
                &damage,
                &ResponseResources::default(),
                &profile(RegionClass::Coastal),
            );
            for operation in OPERATIONS {
                let score = outcome.effectiveness.get(operation);
                assert!((0.05..=0.95).contains(&score));
                assert!((outcome.gaps.get(operation) - (1.0 - score)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn additional_lives_saved_bounded_by_deaths() {
        let damage = assessment(100, 1_000, 50_000);
        let outcome = simulate_response(
            HazardKind::Cyclone,
            &damage,
            &ResponseResources::default(),
            &profile(RegionClass::Coastal),
        );
        assert!(outcome.additional_lives_saved <= 100);
        // rescue at 30% of an effectiveness < 1 can never clear all deaths
        assert!(outcome.additional_lives_saved < 100);
    }

    #[test]
    fn provision_ratios_cap_at_one() {
        let light = assessment(1, 10, 100);
        let outcome = simulate_response(
            HazardKind::Flood,
            &light,
            &ResponseResources::default(),
            &profile(RegionClass::Floodplain),
        );
        assert_eq!(outcome.shelter_access_ratio, 1.0);
        assert_eq!(outcome.relief_provision_ratio, 1.0);
        assert_eq!(outcome.medical_service_ratio, 1.0);
    }

    #[test]
    fn scarce_resources_lower_provision_ratios() {
        let heavy = assessment(2_000, 200_000, 4_000_000);
        let resources = ResponseResources {
            shelter_capacity_persons: 500_000.0,
            relief_person_days: 100_000.0,
            medical_capacity: 10_000.0,
            ..ResponseResources::default()
        };
        let outcome = simulate_response(
            HazardKind::Cyclone,
            &heavy,
            &resources,
            &profile(RegionClass::Coastal),
        );
        assert!(outcome.shelter_access_ratio < 1.0);
        assert!(outcome.relief_provision_ratio < 1.0);
        assert!(outcome.medical_service_ratio < 1.0);
    }

    #[test]
    fn remote_regions_respond_less_effectively() {
        let damage = assessment(500, 5_000, 100_000);
        let coastal = simulate_response(
            HazardKind::Flood,
            &damage,
            &ResponseResources::default(),
            &profile(RegionClass::Coastal),
        );
        let hills = simulate_response(
            HazardKind::Flood,
            &damage,
            &ResponseResources::default(),
            &profile(RegionClass::HillTracts),
        );
        assert!(coastal.overall_score > hills.overall_score);
    }
}
