//! config.rs: config.toml loading
//!
//! The file describes one default roster plus fairness settings. Fixed roles
//! are plain lists indexed by group (entry i → group i + 1) so the TOML stays
//! readable; they become [`FixedRoleLayer`]s on conversion.

use std::path::Path;

use serde::{Deserialize, Serialize};
use team_types::{Constraint, FixedRole, FixedRoleLayer, Roster};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::simulation::FairnessSettings;

const BUNDLED_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub roster: RosterConfig,
    #[serde(default)]
    pub simulation: FairnessSettings,
}

/// `[roster]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub team_count: u32,
    pub leads: Vec<String>,
    pub deputy_leads: Vec<String>,
    pub participants: Vec<String>,
    pub constraints: Vec<Constraint>,
}

impl RosterConfig {
    pub fn to_roster(&self) -> Roster {
        let mut roster = Roster::new(self.team_count).with_participants(self.participants.iter().cloned());
        for (role, names) in [(FixedRole::Lead, &self.leads), (FixedRole::DeputyLead, &self.deputy_leads)] {
            if names.is_empty() {
                continue;
            }
            let pairs = names.iter().enumerate().map(|(i, n)| (i as u32 + 1, n.clone()));
            roster = roster.with_layer(FixedRoleLayer::from_pairs(role, pairs));
        }
        roster.constraints = self.constraints.clone();
        roster
    }
}

impl EngineConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// The config.toml shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_CONFIG)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg = Self::parse(&raw)?;
        info!("📋 Loaded roster config from {}", path.display());
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to the bundled config.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::bundled(),
        }
    }

    pub fn roster(&self) -> Roster {
        self.roster.to_roster()
    }
}
