//! simulation.rs: Monte Carlo fairness check of the shuffle step
//!
//! Each trial shuffles the whole pool and deals it round-robin: shuffled
//! position k goes to group (k mod team_count) + 1. Plain round-robin is used
//! on purpose, so the table measures the shuffle alone and not the
//! least-loaded balancing done by `assign`.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use team_types::{is_blank, DistributionStats, GroupIndex, Roster, UniformityVerdict};
use tracing::{debug, info};

use crate::error::{ensure_team_count, Result};
use crate::shuffler::shuffle;
use crate::uniformity::{check_uniformity_with_tolerance, DEFAULT_TOLERANCE_PCT};

pub const DEFAULT_ITERATIONS: u64 = 2_000;

// ── Settings ──────────────────────────────────────────────────────────────────

/// Who enters the trial pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPolicy {
    /// Keep constrained people in the pool. Fixed-role holders are always out.
    pub include_constrained: bool,
}

/// `[simulation]` section of config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessSettings {
    pub iterations: u64,
    pub tolerance_pct: f64,
    pub include_constrained: bool,
}

impl Default for FairnessSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            tolerance_pct: DEFAULT_TOLERANCE_PCT,
            include_constrained: false,
        }
    }
}

impl FairnessSettings {
    pub fn pool_policy(&self) -> PoolPolicy {
        PoolPolicy { include_constrained: self.include_constrained }
    }
}

/// Everything the UI needs to render one fairness run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FairnessReport {
    pub team_count: u32,
    pub iterations: u64,
    pub pool: Vec<String>,
    pub statistics: DistributionStats,
    pub verdict: UniformityVerdict,
}

// ── Pool ──────────────────────────────────────────────────────────────────────

/// General participants eligible for the fairness trials, first occurrence
/// order, duplicates and blanks dropped.
///
/// With the default policy this is exactly who `assign` shuffles into the
/// groups. People whose fixed role or constraint points at a missing group
/// are shuffled there, so they stay in the pool.
pub fn simulation_pool(roster: &Roster, policy: PoolPolicy) -> Vec<String> {
    let fixed = roster.fixed_role_names();
    let pinned = roster.pinned_names();
    let mut seen = HashSet::new();

    roster
        .participants
        .iter()
        .map(String::as_str)
        .filter(|n| !is_blank(n) && !fixed.contains(n))
        .filter(|n| policy.include_constrained || !pinned.contains(n))
        .filter(|n| seen.insert(*n))
        .map(str::to_string)
        .collect()
}

// ── Trials ────────────────────────────────────────────────────────────────────

/// Run `iterations` shuffle-and-deal trials over `participants`.
///
/// Every row in the result covers groups `1..=team_count` and sums to
/// `iterations`. Repeated names are counted once.
pub fn simulate<R: Rng + ?Sized>(
    participants: &[String],
    team_count: u32,
    iterations: u64,
    rng: &mut R,
) -> Result<DistributionStats> {
    ensure_team_count(team_count)?;

    let mut seen = HashSet::new();
    let pool: Vec<&str> = participants
        .iter()
        .map(String::as_str)
        .filter(|n| seen.insert(*n))
        .collect();
    if pool.len() != participants.len() {
        debug!("Dropped {} repeated names from the trial pool", participants.len() - pool.len());
    }

    let teams = team_count as usize;
    let indices: Vec<usize> = (0..pool.len()).collect();
    let mut counts = vec![vec![0u64; teams]; pool.len()];

    for _ in 0..iterations {
        let order = shuffle(&indices, rng);
        for (k, &person) in order.iter().enumerate() {
            counts[person][k % teams] += 1;
        }
    }

    debug!("Ran {} trials over {} people and {} groups", iterations, pool.len(), team_count);

    Ok(pool
        .into_iter()
        .zip(counts)
        .map(|(name, row)| {
            let row: BTreeMap<GroupIndex, u64> = (1..=team_count).zip(row).collect();
            (name.to_string(), row)
        })
        .collect())
}

/// Pool → trials → verdict, with the knobs from `settings`.
pub fn run_fairness_check<R: Rng + ?Sized>(
    roster: &Roster,
    settings: &FairnessSettings,
    rng: &mut R,
) -> Result<FairnessReport> {
    let pool = simulation_pool(roster, settings.pool_policy());
    let statistics = simulate(&pool, roster.team_count, settings.iterations, rng)?;
    let verdict = check_uniformity_with_tolerance(
        &statistics,
        settings.iterations,
        roster.team_count,
        settings.tolerance_pct,
    )?;

    info!(
        "🎲 Fairness: {} people × {} trials → max deviation {:.2}% ({})",
        pool.len(),
        settings.iterations,
        verdict.max_deviation_pct,
        if verdict.is_uniform { "uniform" } else { "NOT uniform" }
    );

    Ok(FairnessReport {
        team_count: roster.team_count,
        iterations: settings.iterations,
        pool,
        statistics,
        verdict,
    })
}
