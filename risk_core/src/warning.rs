use bitflags::bitflags;
use rand::distributions::WeightedIndex;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    exposure::ExposureSnapshot,
    hazard::{FloodClass, HazardDetail, HazardEvent, HazardKind},
    region::RegionProfile,
};

/// Share of would-be fatalities among evacuees that evacuation actually
/// prevents.
const EVACUATION_EFFECTIVENESS: f64 = 0.9;

const BASE_COMPLIANCE_RATE: f64 = 0.65;

bitflags! {
    /// Warning dissemination channels available to the system.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelFlags: u8 {
        const SIRENS = 1 << 0;
        const SMS = 1 << 1;
        const RADIO = 1 << 2;
        const TELEVISION = 1 << 3;
        const VOLUNTEERS = 1 << 4;
        const MOSQUE_ANNOUNCEMENTS = 1 << 5;
    }
}

impl Default for ChannelFlags {
    fn default() -> Self {
        ChannelFlags::all()
    }
}

impl serde::Serialize for ChannelFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> serde::Deserialize<'de> for ChannelFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(ChannelFlags::from_bits_truncate(bits))
    }
}

struct ChannelProfile {
    flag: ChannelFlags,
    coverage: f64,
    reliability: f64,
    comprehension: f64,
    /// Positive skews coverage urban, negative rural.
    urban_bias: f64,
    literacy_dependent: bool,
    electricity_dependent: bool,
    time_of_day_dependent: bool,
}

const CHANNEL_PROFILES: [ChannelProfile; 6] = [
    ChannelProfile {
        flag: ChannelFlags::SIRENS,
        coverage: 0.15,
        reliability: 0.80,
        comprehension: 0.95,
        urban_bias: 0.7,
        literacy_dependent: false,
        electricity_dependent: false,
        time_of_day_dependent: false,
    },
    ChannelProfile {
        flag: ChannelFlags::SMS,
        coverage: 0.70,
        reliability: 0.85,
        comprehension: 0.80,
        urban_bias: 0.6,
        literacy_dependent: true,
        electricity_dependent: false,
        time_of_day_dependent: false,
    },
    ChannelProfile {
        flag: ChannelFlags::RADIO,
        coverage: 0.85,
        reliability: 0.90,
        comprehension: 0.85,
        urban_bias: 0.2,
        literacy_dependent: false,
        electricity_dependent: false,
        time_of_day_dependent: false,
    },
    ChannelProfile {
        flag: ChannelFlags::TELEVISION,
        coverage: 0.60,
        reliability: 0.85,
        comprehension: 0.90,
        urban_bias: 0.5,
        literacy_dependent: false,
        electricity_dependent: true,
        time_of_day_dependent: false,
    },
    ChannelProfile {
        flag: ChannelFlags::VOLUNTEERS,
        coverage: 0.55,
        reliability: 0.75,
        comprehension: 0.95,
        urban_bias: -0.3,
        literacy_dependent: false,
        electricity_dependent: false,
        time_of_day_dependent: false,
    },
    ChannelProfile {
        flag: ChannelFlags::MOSQUE_ANNOUNCEMENTS,
        coverage: 0.90,
        reliability: 0.70,
        comprehension: 0.95,
        urban_bias: -0.1,
        literacy_dependent: false,
        electricity_dependent: false,
        time_of_day_dependent: true,
    },
];

/// How much a channel matters for a given hazard: sirens and volunteer
/// networks dominate cyclone warnings, radio carries flood bulletins,
/// slow-onset droughts lean on broadcast media.
fn channel_importance(kind: HazardKind, flag: ChannelFlags) -> f64 {
    match kind {
        HazardKind::Cyclone => {
            if flag == ChannelFlags::SIRENS || flag == ChannelFlags::VOLUNTEERS {
                1.0
            } else if flag == ChannelFlags::RADIO || flag == ChannelFlags::MOSQUE_ANNOUNCEMENTS {
                0.9
            } else if flag == ChannelFlags::SMS {
                0.8
            } else {
                0.7
            }
        }
        HazardKind::Flood => {
            if flag == ChannelFlags::RADIO {
                1.0
            } else if flag == ChannelFlags::VOLUNTEERS {
                0.9
            } else if flag == ChannelFlags::SMS || flag == ChannelFlags::MOSQUE_ANNOUNCEMENTS {
                0.8
            } else if flag == ChannelFlags::SIRENS {
                0.5
            } else {
                0.6
            }
        }
        HazardKind::Drought => {
            if flag == ChannelFlags::RADIO {
                1.0
            } else if flag == ChannelFlags::TELEVISION {
                0.8
            } else if flag == ChannelFlags::SMS || flag == ChannelFlags::VOLUNTEERS {
                0.7
            } else if flag == ChannelFlags::MOSQUE_ANNOUNCEMENTS {
                0.6
            } else {
                0.1
            }
        }
        _ => 0.7,
    }
}

/// (lead time, forecast skill) pairs. Skill is error reduction against
/// climatology.
const FLOOD_SKILL_DAYS: [(f64, f64); 5] =
    [(1.0, 0.85), (3.0, 0.70), (5.0, 0.55), (7.0, 0.40), (10.0, 0.25)];
const FLASH_FLOOD_SKILL_HOURS: [(f64, f64); 5] =
    [(1.0, 0.70), (3.0, 0.55), (6.0, 0.40), (12.0, 0.25), (24.0, 0.15)];
const CYCLONE_SKILL_HOURS: [(f64, f64); 5] = [
    (24.0, 0.80),
    (48.0, 0.70),
    (72.0, 0.55),
    (96.0, 0.45),
    (120.0, 0.35),
];
const DROUGHT_SKILL_MONTHS: [(f64, f64); 5] =
    [(0.5, 0.65), (1.0, 0.55), (2.0, 0.45), (3.0, 0.35), (6.0, 0.25)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadTimeUnit {
    Hours,
    Days,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadTime {
    pub value: f64,
    pub unit: LeadTimeUnit,
}

/// Community memory of recent warnings, adjusting future compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    None,
    FalseAlarm,
    MinorImpact,
    MajorImpact,
}

impl ExperienceLevel {
    fn compliance_factor(self) -> f64 {
        match self {
            ExperienceLevel::None => 0.9,
            ExperienceLevel::FalseAlarm => 0.7,
            ExperienceLevel::MinorImpact => 1.1,
            ExperienceLevel::MajorImpact => 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSpecificity {
    Generic,
    LocationSpecific,
    ImpactBased,
}

impl WarningSpecificity {
    fn compliance_factor(self) -> f64 {
        match self {
            WarningSpecificity::Generic => 0.8,
            WarningSpecificity::LocationSpecific => 1.0,
            WarningSpecificity::ImpactBased => 1.2,
        }
    }
}

/// Early-warning-system capability configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningCapability {
    pub channels: ChannelFlags,
    pub technology_level: f64,
    pub staff_training: f64,
    pub observation_network: f64,
    pub warning_threshold: f64,
    pub message_clarity: f64,
    pub message_consistency: f64,
    pub impact_based_forecasting: bool,
    pub location_specific_warnings: bool,
}

impl Default for WarningCapability {
    fn default() -> Self {
        Self {
            channels: ChannelFlags::all(),
            technology_level: 0.5,
            staff_training: 0.5,
            observation_network: 0.5,
            warning_threshold: 0.5,
            message_clarity: 0.5,
            message_consistency: 0.5,
            impact_based_forecasting: false,
            location_specific_warnings: true,
        }
    }
}

impl WarningCapability {
    fn specificity(&self) -> WarningSpecificity {
        if self.impact_based_forecasting {
            WarningSpecificity::ImpactBased
        } else if self.location_specific_warnings {
            WarningSpecificity::LocationSpecific
        } else {
            WarningSpecificity::Generic
        }
    }
}

/// Terminal phase of the warning state machine for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningPhase {
    /// No forecast system exists for this hazard type.
    NoWarningSystem,
    /// Forecast probability fell below the issuance threshold.
    BelowThreshold,
    Issued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningOutcome {
    pub phase: WarningPhase,
    pub lead_time: Option<LeadTime>,
    pub forecast_accuracy: f64,
    pub population_reached: u64,
    pub population_informed: u64,
    pub evacuation_rate: f64,
    pub evacuated: u64,
    pub potential_fatalities: u64,
    pub lives_saved: u64,
    pub effectiveness: f64,
}

impl WarningOutcome {
    fn silent(phase: WarningPhase, lead_time: Option<LeadTime>, accuracy: f64, potential: u64) -> Self {
        Self {
            phase,
            lead_time,
            forecast_accuracy: accuracy,
            population_reached: 0,
            population_informed: 0,
            evacuation_rate: 0.0,
            evacuated: 0,
            potential_fatalities: potential,
            lives_saved: 0,
            effectiveness: 0.0,
        }
    }
}

fn skill_table(event: &HazardEvent) -> Option<(&'static [(f64, f64)], LeadTimeUnit)> {
    match (&event.kind, &event.detail) {
        (HazardKind::Flood, HazardDetail::Flood { class, .. }) => match class {
            FloodClass::Riverine => Some((&FLOOD_SKILL_DAYS, LeadTimeUnit::Days)),
            FloodClass::Flash => Some((&FLASH_FLOOD_SKILL_HOURS, LeadTimeUnit::Hours)),
        },
        (HazardKind::Cyclone, _) => Some((&CYCLONE_SKILL_HOURS, LeadTimeUnit::Hours)),
        (HazardKind::Drought, _) => Some((&DROUGHT_SKILL_MONTHS, LeadTimeUnit::Months)),
        _ => None,
    }
}

fn sample_lead_time(event: &HazardEvent, unit: LeadTimeUnit, rng: &mut ChaCha8Rng) -> LeadTime {
    let (options, weights): (&[f64], &[f64]) = match (&event.kind, &event.detail) {
        (HazardKind::Flood, HazardDetail::Flood { class, duration_days, .. }) => match class {
            FloodClass::Riverine if *duration_days > 2.0 => {
                (&[5.0, 7.0, 10.0], &[0.3, 0.4, 0.3])
            }
            FloodClass::Riverine => (&[1.0, 3.0, 5.0], &[0.3, 0.4, 0.3]),
            FloodClass::Flash => (&[1.0, 3.0, 6.0], &[0.5, 0.3, 0.2]),
        },
        (HazardKind::Cyclone, _) => (&[48.0, 72.0, 96.0], &[0.3, 0.4, 0.3]),
        (HazardKind::Drought, _) => (&[0.5, 1.0, 2.0], &[0.3, 0.4, 0.3]),
        _ => (&[24.0], &[1.0]),
    };
    let index = WeightedIndex::new(weights.iter().copied())
        .expect("lead-time weights are fixed and valid")
        .sample(rng);
    LeadTime {
        value: options[index],
        unit,
    }
}

fn lead_time_compliance_factor(event: &HazardEvent, lead: LeadTime) -> f64 {
    let fast_onset = matches!(event.kind, HazardKind::Cyclone)
        || matches!(
            &event.detail,
            HazardDetail::Flood {
                class: FloodClass::Flash,
                ..
            }
        );
    let value = lead.value;
    let category_factor = if fast_onset {
        // hours
        if value < 3.0 {
            0.8
        } else if value < 12.0 {
            0.9
        } else if value < 48.0 {
            1.1
        } else {
            1.0
        }
    } else {
        // slower onset, native units
        if value < 0.125 {
            0.8
        } else if value < 0.5 {
            0.9
        } else if value < 2.0 {
            1.1
        } else {
            1.0
        }
    };
    category_factor
}

fn baseline_fatality_rate(event: &HazardEvent) -> f64 {
    let rate = match &event.detail {
        HazardDetail::Flood {
            class, depth_m, ..
        } => match class {
            FloodClass::Riverine => 0.0001 + 0.001 * depth_m.powi(2),
            FloodClass::Flash => 0.0005 + 0.002 * depth_m.powi(2),
        },
        HazardDetail::Cyclone {
            wind_speed_kmh,
            storm_surge_m,
            ..
        } => 0.0001 * (wind_speed_kmh / 100.0).powi(2) + 0.001 * storm_surge_m.powi(2),
        _ => 0.0001 * event.intensity,
    };
    rate.clamp(0.0, 1.0)
}

/// Run the warning state machine for one event: forecast, issuance,
/// dissemination, and population response.
pub fn simulate_warning(
    event: &HazardEvent,
    exposure: &ExposureSnapshot,
    capability: &WarningCapability,
    profile: &RegionProfile,
    urban_fraction: f64,
    experience: ExperienceLevel,
    rng: &mut ChaCha8Rng,
) -> WarningOutcome {
    let population = exposure.population;
    let potential_fatalities = (population * baseline_fatality_rate(event)) as u64;

    let Some((table, unit)) = skill_table(event) else {
        return WarningOutcome::silent(WarningPhase::NoWarningSystem, None, 0.0, potential_fatalities);
    };

    let lead_time = sample_lead_time(event, unit, rng);
    let base_skill = table
        .iter()
        .min_by(|a, b| {
            (a.0 - lead_time.value)
                .abs()
                .total_cmp(&(b.0 - lead_time.value).abs())
        })
        .map(|(_, skill)| *skill)
        .unwrap_or(0.1);

    let capability_factor = 0.7
        + 0.1 * capability.technology_level
        + 0.1 * capability.staff_training
        + 0.1 * capability.observation_network;
    let accuracy = (base_skill * capability_factor).clamp(0.1, 0.95);

    // issuance decision against a probabilistic forecast draw
    let forecast_probability = Beta::new(accuracy * 10.0, (1.0 - accuracy) * 10.0)
        .expect("accuracy clamp keeps beta parameters positive")
        .sample(rng);
    if forecast_probability < capability.warning_threshold {
        debug!(
            target: "risk::warning",
            hazard = event.kind.label(),
            forecast_probability,
            threshold = capability.warning_threshold,
            "warning withheld below threshold"
        );
        return WarningOutcome::silent(
            WarningPhase::BelowThreshold,
            Some(lead_time),
            accuracy,
            potential_fatalities,
        );
    }

    // dissemination across enabled channels; falling back to every
    // channel at reduced effectiveness when none is configured
    let (channels, effectiveness_factor) = if capability.channels.is_empty() {
        (ChannelFlags::all(), 0.7)
    } else {
        (capability.channels, 1.0)
    };

    let rural_fraction = 1.0 - urban_fraction;
    let mut unreached = 1.0;
    let mut comprehension_sum = 0.0;
    let mut comprehension_count = 0u32;
    for channel in CHANNEL_PROFILES.iter() {
        if !channels.contains(channel.flag) {
            continue;
        }
        let mut coverage = channel.coverage;
        if channel.literacy_dependent {
            coverage *= profile.literacy_rate;
        }
        if channel.electricity_dependent {
            coverage *= profile.electrification_rate;
        }
        let urban_coverage = (coverage * (1.0 + channel.urban_bias)).clamp(0.0, 1.0);
        let rural_coverage = (coverage * (1.0 - channel.urban_bias)).clamp(0.0, 1.0);
        let blended = urban_coverage * urban_fraction + rural_coverage * rural_fraction;

        let mut reliability = channel.reliability;
        if channel.time_of_day_dependent {
            reliability *= 0.9;
        }

        let effective = (blended
            * reliability
            * channel_importance(event.kind, channel.flag)
            * effectiveness_factor)
            .clamp(0.0, 1.0);
        unreached *= 1.0 - effective;

        comprehension_sum += channel.comprehension;
        comprehension_count += 1;
    }

    let union_coverage = 1.0 - unreached;
    let reached_fraction = (union_coverage * profile.class.ews_capacity()).clamp(0.0, 1.0);
    let population_reached = (population * reached_fraction) as u64;

    let avg_comprehension = if comprehension_count > 0 {
        comprehension_sum / f64::from(comprehension_count)
    } else {
        0.5
    };
    let comprehension = (avg_comprehension
        * (0.7 + 0.15 * capability.message_clarity + 0.15 * capability.message_consistency))
        .clamp(0.2, 0.95);
    let informed_fraction = reached_fraction * comprehension;
    let population_informed = (population * informed_fraction) as u64;

    let evacuation_rate = (BASE_COMPLIANCE_RATE
        * lead_time_compliance_factor(event, lead_time)
        * capability.specificity().compliance_factor()
        * experience.compliance_factor())
    .clamp(0.05, 0.95);
    let evacuated = (population_informed as f64 * evacuation_rate) as u64;

    let realized_response = informed_fraction * evacuation_rate;
    let lives_saved = ((potential_fatalities as f64 * realized_response * EVACUATION_EFFECTIVENESS)
        as u64)
        .min(potential_fatalities);

    WarningOutcome {
        phase: WarningPhase::Issued,
        lead_time: Some(lead_time),
        forecast_accuracy: accuracy,
        population_reached,
        population_informed,
        evacuation_rate,
        evacuated,
        potential_fatalities,
        lives_saved,
        effectiveness: if potential_fatalities > 0 {
            lives_saved as f64 / potential_fatalities as f64
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::exposure::compute_exposure;
    use crate::hazard::SpatialFootprint;
    use crate::region::{RegionClass, RegionStock};

    fn coastal_profile() -> RegionProfile {
        RegionProfile {
            name: "coastal_belt".to_string(),
            class: RegionClass::Coastal,
            literacy_rate: 0.7,
            electrification_rate: 0.85,
        }
    }

    fn cyclone_event() -> HazardEvent {
        HazardEvent {
            hazard_id: "bay_cyclone".to_string(),
            kind: HazardKind::Cyclone,
            year: 2031,
            month: 5,
            return_period: 20.0,
            intensity: 165.0,
            detail: HazardDetail::Cyclone {
                wind_speed_kmh: 165.0,
                storm_surge_m: 9.9,
                rainfall_mm_per_hr: 11.0,
                duration_hours: 20.0,
            },
            footprint: SpatialFootprint::Coastal {
                affected_segments: vec!["chittagong".to_string(), "khulna".to_string()],
            },
        }
    }

    fn quake_event() -> HazardEvent {
        HazardEvent {
            hazard_id: "plate_boundary_earthquake".to_string(),
            kind: HazardKind::Earthquake,
            year: 2031,
            month: 9,
            return_period: 100.0,
            intensity: 6.6,
            detail: HazardDetail::Earthquake {
                magnitude: 6.6,
                focal_depth_km: 12.0,
            },
            footprint: SpatialFootprint::Generic,
        }
    }

    fn exposure_for(event: &HazardEvent) -> ExposureSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        compute_exposure(&coastal_profile(), &RegionStock::default(), event, &mut rng)
    }

    #[test]
    fn lives_saved_never_exceed_potential_fatalities() {
        let event = cyclone_event();
        let exposure = exposure_for(&event);
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let outcome = simulate_warning(
                &event,
                &exposure,
                &WarningCapability::default(),
                &coastal_profile(),
                0.39,
                ExperienceLevel::MajorImpact,
                &mut rng,
            );
            assert!(outcome.lives_saved <= outcome.potential_fatalities);
            assert!((0.0..=1.0).contains(&outcome.effectiveness));
        }
    }

    #[test]
    fn unforecastable_hazards_produce_no_warning() {
        let event = quake_event();
        let exposure = exposure_for(&event);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let outcome = simulate_warning(
            &event,
            &exposure,
            &WarningCapability::default(),
            &coastal_profile(),
            0.39,
            ExperienceLevel::None,
            &mut rng,
        );
        assert_eq!(outcome.phase, WarningPhase::NoWarningSystem);
        assert_eq!(outcome.lives_saved, 0);
        assert_eq!(outcome.evacuated, 0);
    }

    #[test]
    fn accuracy_stays_inside_documented_clamp() {
        let event = cyclone_event();
        let exposure = exposure_for(&event);
        let mut capability = WarningCapability::default();
        capability.technology_level = 1.0;
        capability.staff_training = 1.0;
        capability.observation_network = 1.0;
        capability.warning_threshold = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let outcome = simulate_warning(
            &event,
            &exposure,
            &capability,
            &coastal_profile(),
            0.39,
            ExperienceLevel::None,
            &mut rng,
        );
        assert!(outcome.forecast_accuracy >= 0.1);
        assert!(outcome.forecast_accuracy <= 0.95);
        assert_eq!(outcome.phase, WarningPhase::Issued);
    }

    #[test]
    fn evacuation_rate_respects_compliance_clamp() {
        let event = cyclone_event();
        let exposure = exposure_for(&event);
        let mut capability = WarningCapability::default();
        capability.impact_based_forecasting = true;
        capability.warning_threshold = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let outcome = simulate_warning(
            &event,
            &exposure,
            &capability,
            &coastal_profile(),
            0.39,
            ExperienceLevel::MajorImpact,
            &mut rng,
        );
        assert!(outcome.evacuation_rate >= 0.05);
        assert!(outcome.evacuation_rate <= 0.95);
    }

    #[test]
    fn prior_impact_experience_raises_compliance() {
        let event = cyclone_event();
        let exposure = exposure_for(&event);
        let mut capability = WarningCapability::default();
        capability.warning_threshold = 0.0;

        let run = |experience| {
            let mut rng = ChaCha8Rng::seed_from_u64(23);
            simulate_warning(
                &event,
                &exposure,
                &capability,
                &coastal_profile(),
                0.39,
                experience,
                &mut rng,
            )
        };
        let jaded = run(ExperienceLevel::FalseAlarm);
        let seasoned = run(ExperienceLevel::MajorImpact);
        assert!(seasoned.evacuation_rate > jaded.evacuation_rate);
    }
}
