use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::{
    climate::ClimateScenarioState,
    hazard::{HazardEvent, HazardKind},
    recovery::RecoveryOutcome,
    response::ResponseOutcome,
    vulnerability::DamageAssessment,
    warning::{ExperienceLevel, WarningOutcome, WarningPhase},
};

/// Full impact chain for one hazard occurrence, as retained in the year
/// state for the report generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: HazardEvent,
    pub exposure_ratio: f64,
    pub exposed_population: f64,
    pub damage: DamageAssessment,
    pub warning: WarningOutcome,
    pub response: ResponseOutcome,
    pub recovery: RecoveryOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YearTotals {
    pub events: u32,
    pub deaths: u64,
    pub injuries: u64,
    pub displaced: u64,
    pub lives_saved_warning: u64,
    pub lives_saved_response: u64,
    /// Deaths remaining after warning and response interventions.
    pub net_deaths: u64,
    pub evacuated: u64,
    pub direct_losses: f64,
    pub indirect_losses: f64,
}

impl YearTotals {
    fn fold(&mut self, record: &EventRecord) {
        self.events += 1;
        self.deaths += record.damage.casualties.deaths;
        self.injuries += record.damage.casualties.injuries;
        self.displaced += record.damage.casualties.displaced;
        self.lives_saved_warning += record.warning.lives_saved;
        self.lives_saved_response += record.response.additional_lives_saved;
        self.evacuated += record.warning.evacuated;
        self.direct_losses += record.damage.economic.direct_losses;
        self.indirect_losses += record.damage.economic.indirect_losses;

        let averted = (record.warning.lives_saved + record.response.additional_lives_saved)
            .min(record.damage.casualties.deaths);
        self.net_deaths += record.damage.casualties.deaths - averted;
    }
}

/// Everything produced for one (scenario, region, year) tuple. Immutable
/// once captured; the determinism test compares these wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationYearState {
    pub scenario: String,
    pub region: String,
    pub year: i32,
    pub climate: ClimateScenarioState,
    pub population: f64,
    pub urban_fraction: f64,
    pub resilience_index: f64,
    pub totals: YearTotals,
    pub events: Vec<EventRecord>,
}

/// Scratch accumulation for the in-progress year, reset at year start.
#[derive(Resource, Debug, Clone, Default)]
pub struct YearLedger {
    pub records: Vec<EventRecord>,
}

impl YearLedger {
    pub fn push(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    pub fn drain_totals(&mut self) -> (Vec<EventRecord>, YearTotals) {
        let records = std::mem::take(&mut self.records);
        let mut totals = YearTotals::default();
        for record in &records {
            totals.fold(record);
        }
        (records, totals)
    }
}

/// Retained time series for one (scenario, region) run.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimulationHistory {
    pub years: Vec<SimulationYearState>,
}

/// Cumulative metrics across the whole run.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub years_simulated: u32,
    pub total_events: u32,
    pub total_deaths: u64,
    pub total_net_deaths: u64,
    pub total_displaced: u64,
    pub total_lives_saved: u64,
    pub total_direct_losses: f64,
    pub total_indirect_losses: f64,
    pub average_annual_loss: f64,
}

impl SimulationMetrics {
    pub fn fold_year(&mut self, totals: &YearTotals) {
        self.years_simulated += 1;
        self.total_events += totals.events;
        self.total_deaths += totals.deaths;
        self.total_net_deaths += totals.net_deaths;
        self.total_displaced += totals.displaced;
        self.total_lives_saved += totals.lives_saved_warning + totals.lives_saved_response;
        self.total_direct_losses += totals.direct_losses;
        self.total_indirect_losses += totals.indirect_losses;
        self.average_annual_loss =
            (self.total_direct_losses + self.total_indirect_losses) / f64::from(self.years_simulated);
    }
}

/// Cross-year community state: accumulated resilience from
/// build-back-better investment, and the warning-compliance memory of
/// recent impacts.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunityMemory {
    pub resilience_index: f64,
    pub experience: ExperienceLevel,
    pub years_since_event: u32,
}

impl Default for CommunityMemory {
    fn default() -> Self {
        Self {
            resilience_index: 0.40,
            experience: ExperienceLevel::None,
            years_since_event: 0,
        }
    }
}

impl CommunityMemory {
    /// Fold one completed year into community memory.
    ///
    /// Impact severity drives the compliance-experience level; warnings
    /// issued for years with negligible impact read as false alarms,
    /// which erode compliance until three quiet years pass. Recovery
    /// quality accrues into the resilience index.
    pub fn fold_year(&mut self, totals: &YearTotals, records: &[EventRecord]) {
        if totals.events == 0 {
            self.years_since_event = self.years_since_event.saturating_add(1);
            // false-alarm skepticism and event memories both fade
            if self.years_since_event >= 3 {
                self.experience = ExperienceLevel::None;
            }
            return;
        }

        self.years_since_event = 0;
        if totals.deaths > 1_000 || totals.displaced > 100_000 {
            self.experience = ExperienceLevel::MajorImpact;
        } else if totals.deaths > 0 || totals.displaced > 1_000 {
            self.experience = ExperienceLevel::MinorImpact;
        } else if records
            .iter()
            .any(|r| r.warning.phase == WarningPhase::Issued)
        {
            self.experience = ExperienceLevel::FalseAlarm;
        }

        let bbb_gain: f64 = records
            .iter()
            .map(|r| r.recovery.bbb_improvement)
            .sum::<f64>();
        self.resilience_index = (self.resilience_index + bbb_gain * 0.5).min(0.95);
    }
}

/// Convenience classifier used by summaries and tests.
pub fn deadliest_kind(records: &[EventRecord]) -> Option<HazardKind> {
    records
        .iter()
        .max_by_key(|r| r.damage.casualties.deaths)
        .map(|r| r.event.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(deaths: u64, displaced: u64, events: u32) -> YearTotals {
        YearTotals {
            events,
            deaths,
            displaced,
            ..YearTotals::default()
        }
    }

    #[test]
    fn metrics_accumulate_across_years() {
        let mut metrics = SimulationMetrics::default();
        metrics.fold_year(&YearTotals {
            events: 2,
            deaths: 100,
            net_deaths: 80,
            direct_losses: 1.0e9,
            indirect_losses: 2.0e9,
            ..YearTotals::default()
        });
        metrics.fold_year(&YearTotals::default());

        assert_eq!(metrics.years_simulated, 2);
        assert_eq!(metrics.total_events, 2);
        assert_eq!(metrics.total_deaths, 100);
        assert_eq!(metrics.total_net_deaths, 80);
        assert!((metrics.average_annual_loss - 1.5e9).abs() < 1.0);
    }

    #[test]
    fn major_impacts_register_in_memory() {
        let mut memory = CommunityMemory::default();
        memory.fold_year(&totals(5_000, 2_000_000, 1), &[]);
        assert_eq!(memory.experience, ExperienceLevel::MajorImpact);

        memory.fold_year(&totals(10, 5_000, 1), &[]);
        assert_eq!(memory.experience, ExperienceLevel::MinorImpact);
    }

    #[test]
    fn quiet_years_fade_experience() {
        let mut memory = CommunityMemory::default();
        memory.fold_year(&totals(5_000, 2_000_000, 1), &[]);
        for _ in 0..3 {
            memory.fold_year(&totals(0, 0, 0), &[]);
        }
        assert_eq!(memory.experience, ExperienceLevel::None);
    }

    #[test]
    fn resilience_index_is_capped() {
        let mut memory = CommunityMemory {
            resilience_index: 0.94,
            ..CommunityMemory::default()
        };
        memory.fold_year(&totals(10, 5_000, 1), &[]);
        assert!(memory.resilience_index <= 0.95);
    }
}
