//! # team-engine
//!
//! Splits a roster into groups and checks that the random part of the split
//! is fair.
//!
//! - [`assign`]: fixed roles, then constraints, then a shuffled remainder
//!   dealt to the least-loaded group
//! - [`simulate`]: repeated shuffle-and-deal trials, tabulated per person
//! - [`check_uniformity`]: max deviation from the expected per-group share
//!
//! Every entry point is a pure function of its inputs plus an injected
//! `rand::Rng`; nothing is kept between calls.

pub mod assignment;
pub mod config;
pub mod error;
pub mod shuffler;
pub mod simulation;
pub mod uniformity;

pub use assignment::{assign, validate_strict};
pub use config::{EngineConfig, RosterConfig};
pub use error::{EngineError, Result};
pub use shuffler::shuffle;
pub use simulation::{
    run_fairness_check, simulate, simulation_pool, FairnessReport, FairnessSettings, PoolPolicy,
    DEFAULT_ITERATIONS,
};
pub use uniformity::{check_uniformity, check_uniformity_with_tolerance, DEFAULT_TOLERANCE_PCT};

pub use team_types;
