use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::recovery::{CapacityLevel, CoordinationLevel, CorruptionLevel, GovernanceConfig};

/// Continuous governance-quality scores carried across simulation years.
///
/// Institutional capability improves slowly over the horizon while
/// corruption decays toward a floor; the recovery projector consumes the
/// categorical mapping of the current scores.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GovernanceState {
    pub coordination: f64,
    pub planning: f64,
    pub corruption: f64,
    pub engagement: f64,
}

impl Default for GovernanceState {
    fn default() -> Self {
        Self {
            coordination: 0.50,
            planning: 0.50,
            corruption: 0.60,
            engagement: 0.50,
        }
    }
}

impl GovernanceState {
    pub fn advance_year(&mut self) {
        self.coordination = (self.coordination + 0.010).min(0.90);
        self.planning = (self.planning + 0.005).min(0.90);
        self.corruption = (self.corruption - 0.005).max(0.20);
        self.engagement = (self.engagement + 0.005).min(0.90);
    }

    pub fn to_config(self) -> GovernanceConfig {
        GovernanceConfig {
            coordination: if self.coordination < 0.45 {
                CoordinationLevel::Poor
            } else if self.coordination < 0.60 {
                CoordinationLevel::Fair
            } else if self.coordination < 0.75 {
                CoordinationLevel::Good
            } else {
                CoordinationLevel::Excellent
            },
            planning_capacity: capacity_from_score(self.planning),
            corruption: if self.corruption > 0.55 {
                CorruptionLevel::High
            } else if self.corruption > 0.35 {
                CorruptionLevel::Medium
            } else {
                CorruptionLevel::Low
            },
            community_engagement: capacity_from_score(self.engagement),
        }
    }
}

fn capacity_from_score(score: f64) -> CapacityLevel {
    if score < 0.45 {
        CapacityLevel::Low
    } else if score < 0.70 {
        CapacityLevel::Medium
    } else {
        CapacityLevel::High
    }
}
