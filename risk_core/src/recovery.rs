use serde::{Deserialize, Serialize};

use crate::{
    region::RegionProfile,
    vulnerability::{DamageAssessment, InfraCategory},
};

/// Recovery funding needs exceed direct losses (build-back costs,
/// administration) but only partially cover indirect losses.
const DIRECT_LOSS_FUNDING_FACTOR: f64 = 1.5;
const INDIRECT_LOSS_FUNDING_FACTOR: f64 = 0.5;

/// Monthly recovery attenuation by calendar month; the monsoon stalls
/// reconstruction.
const SEASONAL_FACTORS: [f64; 12] = [0.9, 1.0, 1.1, 1.0, 0.9, 0.7, 0.6, 0.6, 0.7, 0.9, 1.0, 0.9];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Housing,
    Infrastructure,
    Livelihoods,
    SocialFabric,
}

pub const SECTORS: [Sector; 4] = [
    Sector::Housing,
    Sector::Infrastructure,
    Sector::Livelihoods,
    Sector::SocialFabric,
];

impl Sector {
    fn horizon_cap_months(self) -> u32 {
        match self {
            Sector::Housing => 60,
            Sector::Infrastructure => 72,
            Sector::Livelihoods => 60,
            Sector::SocialFabric => 84,
        }
    }
}

/// Shape of the baseline 0→1 recovery curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryShape {
    EarlyRapid,
    SShaped,
    LateRapid,
}

impl RecoveryShape {
    fn for_sector(sector: Sector) -> Self {
        match sector {
            Sector::Housing => RecoveryShape::EarlyRapid,
            Sector::Infrastructure | Sector::Livelihoods => RecoveryShape::SShaped,
            Sector::SocialFabric => RecoveryShape::LateRapid,
        }
    }

    fn evaluate(self, t: f64, horizon: f64) -> f64 {
        let x = (t / horizon).clamp(0.0, 1.0);
        match self {
            RecoveryShape::EarlyRapid => x.sqrt(),
            RecoveryShape::SShaped => 1.0 / (1.0 + (-10.0 * (x - 0.5)).exp()),
            RecoveryShape::LateRapid => x * x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl FundingLevel {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.2 {
            FundingLevel::VeryLow
        } else if ratio < 0.5 {
            FundingLevel::Low
        } else if ratio < 0.8 {
            FundingLevel::Medium
        } else if ratio < 1.0 {
            FundingLevel::High
        } else {
            FundingLevel::VeryHigh
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            FundingLevel::VeryLow => 0.6,
            FundingLevel::Low => 0.8,
            FundingLevel::Medium => 1.0,
            FundingLevel::High => 1.2,
            FundingLevel::VeryHigh => 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CoordinationLevel {
    fn multiplier(self) -> f64 {
        match self {
            CoordinationLevel::Poor => 0.7,
            CoordinationLevel::Fair => 0.9,
            CoordinationLevel::Good => 1.1,
            CoordinationLevel::Excellent => 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityLevel {
    Low,
    Medium,
    High,
}

impl CapacityLevel {
    fn multiplier(self) -> f64 {
        match self {
            CapacityLevel::Low => 0.8,
            CapacityLevel::Medium => 1.0,
            CapacityLevel::High => 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionLevel {
    High,
    Medium,
    Low,
}

impl CorruptionLevel {
    fn multiplier(self) -> f64 {
        match self {
            CorruptionLevel::High => 0.7,
            CorruptionLevel::Medium => 0.9,
            CorruptionLevel::Low => 1.1,
        }
    }
}

/// Governance quality inputs the projector consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub coordination: CoordinationLevel,
    pub planning_capacity: CapacityLevel,
    pub corruption: CorruptionLevel,
    pub community_engagement: CapacityLevel,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            coordination: CoordinationLevel::Fair,
            planning_capacity: CapacityLevel::Medium,
            corruption: CorruptionLevel::Medium,
            community_engagement: CapacityLevel::Medium,
        }
    }
}

impl GovernanceConfig {
    pub fn recovery_multiplier(&self) -> f64 {
        self.coordination.multiplier() * 0.3
            + self.planning_capacity.multiplier() * 0.3
            + self.corruption.multiplier() * 0.2
            + self.community_engagement.multiplier() * 0.2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BbbStrength {
    Weak,
    Moderate,
    Strong,
}

impl BbbStrength {
    fn improvement(self) -> f64 {
        match self {
            BbbStrength::Weak => 0.1,
            BbbStrength::Moderate => 0.2,
            BbbStrength::Strong => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BbbCapacity {
    Limited,
    Adequate,
    Strong,
}

impl BbbCapacity {
    fn multiplier(self) -> f64 {
        match self {
            BbbCapacity::Limited => 0.6,
            BbbCapacity::Adequate => 1.0,
            BbbCapacity::Strong => 1.3,
        }
    }
}

/// Recovery funding inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingConfig {
    /// Absolute funding made available; `None` assumes 70% of needs.
    pub total_funding: Option<f64>,
    pub bbb_policy_strength: BbbStrength,
    pub bbb_funding_allocation: BbbStrength,
    pub bbb_technical_capacity: BbbCapacity,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            total_funding: None,
            bbb_policy_strength: BbbStrength::Moderate,
            bbb_funding_allocation: BbbStrength::Moderate,
            bbb_technical_capacity: BbbCapacity::Adequate,
        }
    }
}

impl FundingConfig {
    pub fn bbb_improvement(&self) -> f64 {
        self.bbb_policy_strength.improvement()
            * self.bbb_funding_allocation.improvement()
            * self.bbb_technical_capacity.multiplier()
    }
}

/// Months to reach the standard recovery thresholds; `None` when the
/// trajectory never gets there.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoveryMilestones {
    pub to_30_pct: Option<u32>,
    pub to_50_pct: Option<u32>,
    pub to_70_pct: Option<u32>,
    pub to_90_pct: Option<u32>,
}

impl RecoveryMilestones {
    fn from_trajectory(trajectory: &[f64]) -> Self {
        let first_at = |threshold: f64| {
            trajectory
                .iter()
                .position(|&v| v >= threshold)
                .map(|month| month as u32)
        };
        Self {
            to_30_pct: first_at(0.3),
            to_50_pct: first_at(0.5),
            to_70_pct: first_at(0.7),
            to_90_pct: first_at(0.9),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoveryQuality {
    pub speed: f64,
    pub completeness: f64,
    pub quality: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecovery {
    pub sector: Sector,
    pub horizon_months: u32,
    /// Monthly recovered fractions, index 0 = event month, value 0.
    pub trajectory: Vec<f64>,
    pub milestones: RecoveryMilestones,
    pub quality: RecoveryQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    pub sectors: Vec<SectorRecovery>,
    pub funding_needs: f64,
    pub available_funding: f64,
    pub funding_ratio: f64,
    pub funding_level: FundingLevel,
    pub bbb_improvement: f64,
    pub aggregate_score: f64,
}

fn infrastructure_monthly_rate(category: InfraCategory) -> f64 {
    match category {
        InfraCategory::Bridges => 0.05,
        InfraCategory::Embankments => 0.06,
        InfraCategory::Hospitals => 0.07,
        InfraCategory::Schools => 0.08,
        InfraCategory::Power => 0.15,
        InfraCategory::Telecom => 0.12,
    }
}

/// Damage-weighted recovery horizon per sector, in months.
fn recovery_horizons(damage: &DamageAssessment) -> [(Sector, u32); 4] {
    let housing = {
        let mut damaged_total = 0.0;
        let mut weighted_rate = 0.0;
        for building in &damage.buildings {
            let count = building.damaged as f64;
            damaged_total += count;
            weighted_rate += count * building.building_type.monthly_recovery_rate();
        }
        horizon_from_rate(weighted_rate, damaged_total, Sector::Housing)
    };

    let infrastructure = {
        let mut damaged_total = 0.0;
        let mut weighted_rate = 0.0;
        for infra in &damage.infrastructure {
            let count = infra.damaged as f64;
            damaged_total += count;
            weighted_rate += count * infrastructure_monthly_rate(infra.category);
        }
        horizon_from_rate(weighted_rate, damaged_total, Sector::Infrastructure)
    };

    let livelihoods = {
        let direct = damage.economic.direct_losses;
        let indirect = damage.economic.indirect_losses;
        // direct losses recover faster than indirect ones
        let weighted_rate = direct * 0.12 + indirect * 0.08;
        horizon_from_rate(weighted_rate, direct + indirect, Sector::Livelihoods)
    };

    let social = {
        // deaths weigh most heavily on the social fabric
        let impact = damage.casualties.deaths as f64 * 5.0
            + damage.casualties.injuries as f64
            + damage.casualties.displaced as f64 * 0.5;
        let months = (impact / 1_000.0) as u32;
        (
            Sector::SocialFabric,
            months.min(Sector::SocialFabric.horizon_cap_months()),
        )
    };

    [housing, infrastructure, livelihoods, social]
}

fn horizon_from_rate(weighted_rate: f64, total: f64, sector: Sector) -> (Sector, u32) {
    if total <= 0.0 || weighted_rate <= 0.0 {
        return (sector, 0);
    }
    let average_rate = weighted_rate / total;
    let months = (1.0 / average_rate) as u32;
    (sector, months.min(sector.horizon_cap_months()))
}

/// Project per-sector monthly recovery trajectories for one event.
///
/// Each month's increment of the baseline shape is scaled by the funding,
/// governance, regional, and seasonal multipliers; the running total is
/// clamped to one, and the build-back-better bonus is applied to the
/// final state.
pub fn project_recovery(
    damage: &DamageAssessment,
    governance: &GovernanceConfig,
    funding: &FundingConfig,
    profile: &RegionProfile,
    event_month: u32,
) -> RecoveryOutcome {
    let funding_needs = damage.economic.direct_losses * DIRECT_LOSS_FUNDING_FACTOR
        + damage.economic.indirect_losses * INDIRECT_LOSS_FUNDING_FACTOR;
    let available_funding = funding
        .total_funding
        .unwrap_or(funding_needs * 0.7)
        .max(0.0);
    let funding_ratio = if funding_needs > 0.0 {
        available_funding / funding_needs
    } else {
        1.0
    };
    let funding_level = FundingLevel::from_ratio(funding_ratio);

    let funding_multiplier = funding_level.multiplier();
    let governance_multiplier = governance.recovery_multiplier();
    let regional_multiplier = profile.class.recovery_factor();
    let bbb_improvement = funding.bbb_improvement();

    let mut sectors = Vec::with_capacity(SECTORS.len());
    for (sector, horizon) in recovery_horizons(damage) {
        let trajectory = sector_trajectory(
            sector,
            horizon,
            event_month,
            funding_multiplier,
            governance_multiplier,
            regional_multiplier,
            bbb_improvement,
        );
        let milestones = RecoveryMilestones::from_trajectory(&trajectory);
        let quality = assess_quality(&trajectory, milestones, bbb_improvement);
        sectors.push(SectorRecovery {
            sector,
            horizon_months: horizon,
            trajectory,
            milestones,
            quality,
        });
    }

    let aggregate_score = if sectors.is_empty() {
        0.0
    } else {
        sectors.iter().map(|s| s.quality.overall).sum::<f64>() / sectors.len() as f64
    };

    RecoveryOutcome {
        sectors,
        funding_needs,
        available_funding,
        funding_ratio,
        funding_level,
        bbb_improvement,
        aggregate_score,
    }
}

fn sector_trajectory(
    sector: Sector,
    horizon: u32,
    event_month: u32,
    funding_multiplier: f64,
    governance_multiplier: f64,
    regional_multiplier: f64,
    bbb_improvement: f64,
) -> Vec<f64> {
    if horizon == 0 {
        // undamaged sector: already whole
        return vec![1.0];
    }

    let shape = RecoveryShape::for_sector(sector);
    let horizon_f = f64::from(horizon);
    let mut trajectory = Vec::with_capacity(horizon as usize + 1);
    trajectory.push(0.0);

    let mut previous_base = shape.evaluate(0.0, horizon_f);
    for step in 1..=horizon {
        let base = shape.evaluate(f64::from(step), horizon_f);
        let increment = (base - previous_base).max(0.0);
        previous_base = base;

        let month_index = ((event_month - 1 + step) % 12) as usize;
        let seasonal = SEASONAL_FACTORS[month_index];

        let scaled = increment
            * funding_multiplier
            * governance_multiplier
            * regional_multiplier
            * seasonal;
        let next = (trajectory.last().copied().unwrap_or(0.0) + scaled).min(1.0);
        trajectory.push(next);
    }

    if bbb_improvement > 0.0 {
        let last = trajectory.last().copied().unwrap_or(0.0);
        let boosted = (last * (1.0 + bbb_improvement)).min(1.0 + bbb_improvement);
        if let Some(slot) = trajectory.last_mut() {
            *slot = boosted.max(last);
        }
    }

    trajectory
}

fn assess_quality(
    trajectory: &[f64],
    milestones: RecoveryMilestones,
    bbb_improvement: f64,
) -> RecoveryQuality {
    // twelve months to halfway is treated as a good pace
    let speed = match milestones.to_50_pct {
        Some(month) => (12.0 / f64::from(month.max(1))).min(1.0),
        None => 0.0,
    };
    let completeness = trajectory.last().copied().unwrap_or(0.0).min(1.0);
    let quality = (completeness * (1.0 + bbb_improvement)).min(1.0);
    RecoveryQuality {
        speed,
        completeness,
        quality,
        overall: speed * 0.3 + completeness * 0.3 + quality * 0.4,
    }
}
