//! uniformity.rs: Verdict over a simulation table
//!
//! expected = iterations / team_count. For every (person, group) cell the
//! deviation is |count - expected| / expected × 100. The table is uniform when
//! the largest deviation is strictly below the tolerance (5 % by default).
//!
//! 5 % suits a few thousand trials over a few dozen people: tight enough to
//! flag a biased shuffle, loose enough for ordinary sampling noise. Smaller
//! runs need a wider tolerance.
//!
//! The expected share assumes the pool divides evenly by team_count. When it
//! does not, round-robin dealing gives the low-numbered groups one extra seat
//! per trial and the table reads as biased even for a perfect shuffle.

use team_types::{DistributionStats, UniformityVerdict, WorstCell};

use crate::error::{ensure_team_count, EngineError, Result};

pub const DEFAULT_TOLERANCE_PCT: f64 = 5.0;

/// Check `stats` against the default 5 % tolerance.
pub fn check_uniformity(
    stats: &DistributionStats,
    iterations: u64,
    team_count: u32,
) -> Result<UniformityVerdict> {
    check_uniformity_with_tolerance(stats, iterations, team_count, DEFAULT_TOLERANCE_PCT)
}

pub fn check_uniformity_with_tolerance(
    stats: &DistributionStats,
    iterations: u64,
    team_count: u32,
    tolerance_pct: f64,
) -> Result<UniformityVerdict> {
    ensure_team_count(team_count)?;
    if iterations == 0 {
        return Err(EngineError::InvalidIterations);
    }

    let expected = iterations as f64 / team_count as f64;
    let mut max_deviation = 0.0_f64;
    let mut worst: Option<WorstCell> = None;

    for (name, row) in stats {
        // Missing cells are groups the person never landed in.
        for group in 1..=team_count {
            let count = row.get(&group).copied().unwrap_or(0);
            let deviation = (count as f64 - expected).abs() / expected * 100.0;
            if worst.is_none() || deviation > max_deviation {
                max_deviation = deviation;
                worst = Some(WorstCell { name: name.clone(), group, count });
            }
        }
    }

    Ok(UniformityVerdict {
        is_uniform: max_deviation < tolerance_pct,
        max_deviation_pct: round2(max_deviation),
        expected_per_group: expected,
        worst_cell: worst,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
