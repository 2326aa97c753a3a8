use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::{
    governance::GovernanceState,
    hazard::HazardCatalog,
    recovery::FundingConfig,
    response::ResponseResources,
    warning::WarningCapability,
};

/// Global configuration for one simulation batch.
///
/// `pathways` names the climate scenarios to sweep; `hazards` selects
/// catalog definitions by id. Loaded from JSON when the runner is given
/// a config file, otherwise built from these defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub master_seed: u64,
    pub pathways: Vec<String>,
    pub hazards: Vec<String>,
    pub warning: WarningCapability,
    pub response: ResponseResources,
    pub funding: FundingConfig,
    pub governance: GovernanceState,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_year: 2025,
            end_year: 2050,
            master_seed: 42,
            pathways: vec![
                "low".to_string(),
                "intermediate".to_string(),
                "high".to_string(),
            ],
            hazards: vec![
                "riverine_flood".to_string(),
                "bay_cyclone".to_string(),
                "plate_boundary_earthquake".to_string(),
                "hill_landslide".to_string(),
                "seasonal_drought".to_string(),
            ],
            warning: WarningCapability::default(),
            response: ResponseResources::default(),
            funding: FundingConfig::default(),
            governance: GovernanceState::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("end year {end} precedes start year {start}")]
    InvertedYearRange { start: i32, end: i32 },
    #[error("no climate pathways configured")]
    NoPathways,
    #[error("hazard list is empty")]
    EmptyHazardList,
    #[error("none of the configured hazards exist in the catalog")]
    NoUsableHazards,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Resolve the configured hazard ids against the catalog. Ids
    /// missing from the catalog are dropped with a warning; an empty
    /// result is a fatal configuration error reported before the run
    /// starts.
    pub fn resolve_hazards<'a>(
        &self,
        catalog: &'a HazardCatalog,
    ) -> Result<Vec<&'a crate::hazard::HazardDefinition>, ConfigError> {
        if self.hazards.is_empty() {
            return Err(ConfigError::EmptyHazardList);
        }
        let mut resolved = Vec::new();
        for id in &self.hazards {
            match catalog.definition(id) {
                Some(def) => resolved.push(def),
                None => warn!(
                    target: "risk::config",
                    hazard = id.as_str(),
                    "configured hazard missing from catalog, skipping"
                ),
            }
        }
        if resolved.is_empty() {
            return Err(ConfigError::NoUsableHazards);
        }
        Ok(resolved)
    }

    pub fn validate(&self, catalog: &HazardCatalog) -> Result<(), ConfigError> {
        if self.end_year < self.start_year {
            return Err(ConfigError::InvertedYearRange {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if self.pathways.is_empty() {
            return Err(ConfigError::NoPathways);
        }
        self.resolve_hazards(catalog).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_against_builtin_catalog() {
        let catalog = HazardCatalog::builtin();
        SimulationConfig::default().validate(&catalog).unwrap();
    }

    #[test]
    fn empty_hazard_list_is_fatal() {
        let catalog = HazardCatalog::builtin();
        let config = SimulationConfig {
            hazards: Vec::new(),
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(&catalog),
            Err(ConfigError::EmptyHazardList)
        ));
    }

    #[test]
    fn unknown_hazards_are_skipped_not_fatal() {
        let catalog = HazardCatalog::builtin();
        let config = SimulationConfig {
            hazards: vec!["riverine_flood".to_string(), "volcano".to_string()],
            ..SimulationConfig::default()
        };
        let resolved = config.resolve_hazards(&catalog).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn all_unknown_hazards_are_fatal() {
        let catalog = HazardCatalog::builtin();
        let config = SimulationConfig {
            hazards: vec!["volcano".to_string()],
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(&catalog),
            Err(ConfigError::NoUsableHazards)
        ));
    }

    #[test]
    fn inverted_year_range_is_fatal() {
        let catalog = HazardCatalog::builtin();
        let config = SimulationConfig {
            start_year: 2040,
            end_year: 2030,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(&catalog),
            Err(ConfigError::InvertedYearRange { .. })
        ));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = SimulationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
