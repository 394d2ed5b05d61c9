//! error.rs: Engine error taxonomy
//!
//! The engine is pure computation, so the only failures are malformed
//! configuration. Out-of-range constraints are skipped by `assign`; they only
//! surface here through the strict validator.

use team_types::{FixedRole, GroupIndex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("team count must be a positive integer, got {0}")]
    InvalidTeamCount(u32),

    #[error("iteration count must be positive")]
    InvalidIterations,

    #[error("constraint for '{name}' targets group {team}, valid range is 1..={team_count}")]
    ConstraintOutOfRange {
        name: String,
        team: GroupIndex,
        team_count: u32,
    },

    #[error("constraint #{index} has a blank name")]
    BlankConstraintName { index: usize },

    #[error("{role:?} '{name}' is set for group {group}, valid range is 1..={team_count}")]
    FixedRoleOutOfRange {
        role: FixedRole,
        name: String,
        group: GroupIndex,
        team_count: u32,
    },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Fail fast on a zero group count.
pub(crate) fn ensure_team_count(team_count: u32) -> Result<()> {
    if team_count == 0 {
        return Err(EngineError::InvalidTeamCount(team_count));
    }
    Ok(())
}
