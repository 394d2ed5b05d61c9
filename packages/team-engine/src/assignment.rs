//! assignment.rs: Places a roster into groups
//!
//! Order of placement:
//!   1. Fixed-role layers, group by group (lead before deputy when the layers
//!      are listed that way)
//!   2. In-range constraints, tagged `constrained`
//!   3. Everyone else: shuffled, then each dropped into the currently smallest
//!      group (lowest index wins ties)
//!
//! Step 3 evens out whatever imbalance the first two steps left, as far as the
//! pool allows. Who lands where stays uniformly random.
//!
//! Conflicts are resolved silently:
//! - a name holding a fixed role is never placed again, not by a constraint
//!   and not from the general pool
//! - only the first in-range constraint for a name is honored
//! - a name repeated in the general pool is placed once
//! - out-of-range constraints and fixed roles for missing groups are skipped;
//!   the person falls back to the random pool if they are listed there

use std::collections::HashSet;

use rand::Rng;
use team_types::{is_blank, GroupIndex, Role, Roster, TeamAssignment};
use tracing::{debug, warn};

use crate::error::{ensure_team_count, EngineError, Result};
use crate::shuffler::shuffle;

/// Assign every roster entry to exactly one group.
pub fn assign<R: Rng + ?Sized>(roster: &Roster, rng: &mut R) -> Result<TeamAssignment> {
    ensure_team_count(roster.team_count)?;
    let mut teams = TeamAssignment::with_empty_groups(roster.team_count);

    // 1. Fixed roles
    for group in 1..=roster.team_count {
        for layer in &roster.layers {
            if let Some(name) = layer.holder(group) {
                teams.push(group, name, layer.role.into());
            }
        }
    }
    for layer in &roster.layers {
        for (&group, name) in &layer.holders {
            if !roster.is_valid_group(group) && !is_blank(name) {
                warn!("{:?} '{}' set for missing group {}, ignored", layer.role, name, group);
            }
        }
    }

    // 2. Constraints. Only holders placed above count as fixed.
    let fixed = roster.fixed_role_names();
    let mut pinned: HashSet<&str> = HashSet::new();
    for c in &roster.constraints {
        let name = c.name.as_str();
        if is_blank(name) {
            continue;
        }
        if !roster.is_valid_group(c.team) {
            warn!(
                "Constraint '{}' → group {} out of range 1..={}, skipped",
                name, c.team, roster.team_count
            );
            continue;
        }
        if fixed.contains(name) {
            warn!("Constraint '{}' → group {} ignored: already holds a fixed role", name, c.team);
            continue;
        }
        if !pinned.insert(name) {
            debug!("Duplicate constraint for '{}' ignored", name);
            continue;
        }
        teams.push(c.team, name, Role::Constrained);
    }

    // 3. Random distribution of the remainder, repeated names once
    let mut seen: HashSet<&str> = HashSet::new();
    let remaining: Vec<&str> = roster
        .participants
        .iter()
        .map(String::as_str)
        .filter(|n| !is_blank(n) && !fixed.contains(n) && !pinned.contains(n))
        .filter(|n| seen.insert(*n))
        .collect();

    let shuffled = shuffle(&remaining, rng);
    for name in shuffled {
        let group = least_loaded(&teams);
        teams.push(group, name, Role::Member);
    }

    let sizes: Vec<usize> = teams.sizes().into_values().collect();
    debug!(
        "Assigned {} people into {} groups (sizes {:?})",
        teams.total_members(),
        roster.team_count,
        sizes
    );
    Ok(teams)
}

/// Smallest group by member count; the lowest index wins ties.
fn least_loaded(teams: &TeamAssignment) -> GroupIndex {
    let mut best = 1;
    let mut best_len = usize::MAX;
    for (&group, members) in &teams.groups {
        if members.len() < best_len {
            best = group;
            best_len = members.len();
        }
    }
    best
}

/// Strict pre-check for callers who want bad input rejected instead of
/// skipped. `assign` itself never calls this.
pub fn validate_strict(roster: &Roster) -> Result<()> {
    ensure_team_count(roster.team_count)?;

    for layer in &roster.layers {
        for (&group, name) in &layer.holders {
            if !is_blank(name) && !roster.is_valid_group(group) {
                return Err(EngineError::FixedRoleOutOfRange {
                    role: layer.role,
                    name: name.clone(),
                    group,
                    team_count: roster.team_count,
                });
            }
        }
    }

    for (index, c) in roster.constraints.iter().enumerate() {
        if is_blank(&c.name) {
            return Err(EngineError::BlankConstraintName { index });
        }
        if !roster.is_valid_group(c.team) {
            return Err(EngineError::ConstraintOutOfRange {
                name: c.name.clone(),
                team: c.team,
                team_count: roster.team_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use team_types::{FixedRole, FixedRoleLayer};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x7ea5)
    }

    fn three_team_roster() -> Roster {
        Roster::new(3)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(1, "A"), (2, "B"), (3, "C")]))
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::DeputyLead, [(1, "D"), (2, "E"), (3, "F")]))
            .with_participants(["G", "H", "I", "J", "K", "L"])
    }

    #[test]
    fn zero_teams_is_rejected() {
        let err = assign(&Roster::new(0), &mut rng()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTeamCount(0)));
    }

    #[test]
    fn fixed_roles_come_first_in_layer_order() {
        let teams = assign(&three_team_roster(), &mut rng()).unwrap();
        for group in 1..=3 {
            let members = teams.members(group);
            assert_eq!(members[0].role, Role::Lead);
            assert_eq!(members[1].role, Role::DeputyLead);
            assert_eq!(members.len(), 4);
        }
        assert_eq!(teams.members(2)[0].name, "B");
        assert_eq!(teams.members(3)[1].name, "F");
    }

    #[test]
    fn empty_pool_yields_only_fixed_roles() {
        let roster = Roster::new(4)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(1, "A"), (3, "C"), (4, "")]));
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.team_count(), 4);
        assert_eq!(teams.total_members(), 2);
        assert!(teams.members(2).is_empty());
        assert!(teams.members(4).is_empty());
    }

    #[test]
    fn least_loaded_fills_the_gap_first() {
        // Group 1 starts with 3 people, so every random member lands in 2 or 3.
        let roster = Roster::new(3)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(1, "A")]))
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::DeputyLead, [(1, "D")]))
            .with_constraint("X", 1)
            .with_participants(["P", "Q", "R", "S", "T", "U"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        let sizes: Vec<usize> = teams.sizes().into_values().collect();
        assert_eq!(sizes, vec![3, 3, 3]);
        assert_eq!(teams.members_with_role(Role::Member).iter().filter(|(g, _)| *g == 1).count(), 0);
    }

    #[test]
    fn ties_break_towards_the_lowest_group() {
        let roster = Roster::new(4).with_participants(["only"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.group_of("only"), Some(1));
    }

    #[test]
    fn out_of_range_constraint_is_skipped_not_lost() {
        let roster = Roster::new(2)
            .with_constraint("X", 5)
            .with_constraint("Y", 0)
            .with_participants(["X", "Z"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert!(teams.members_with_role(Role::Constrained).is_empty());
        assert_eq!(teams.occurrences("X"), 1);
        assert_eq!(teams.occurrences("Y"), 0);
        assert_eq!(teams.total_members(), 2);
    }

    #[test]
    fn fixed_role_for_missing_group_is_skipped_not_lost() {
        let roster = Roster::new(2)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(1, "A"), (5, "Z")]))
            .with_participants(["Z", "P", "Q"]);
        for seed in 0..10 {
            let teams = assign(&roster, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(teams.occurrences("Z"), 1);
            assert_eq!(teams.total_members(), 4);
            assert!(teams.members_with_role(Role::Member).iter().any(|(_, m)| m.name == "Z"));
        }
    }

    #[test]
    fn constraint_on_a_fixed_role_for_missing_group_still_pins() {
        let roster = Roster::new(2)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(3, "Z")]))
            .with_constraint("Z", 2)
            .with_participants(["Z", "P"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.occurrences("Z"), 1);
        assert_eq!(teams.group_of("Z"), Some(2));
        assert_eq!(teams.members(2)[0].role, Role::Constrained);
    }

    #[test]
    fn fixed_role_beats_constraint() {
        let roster = Roster::new(2)
            .with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(1, "A")]))
            .with_constraint("A", 2)
            .with_participants(["A", "B"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.occurrences("A"), 1);
        assert_eq!(teams.group_of("A"), Some(1));
        assert_eq!(teams.members(1)[0].role, Role::Lead);
    }

    #[test]
    fn repeated_participant_is_placed_once() {
        let roster = Roster::new(2).with_participants(["P", "Q", "P"]);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.occurrences("P"), 1);
        assert_eq!(teams.total_members(), 2);
    }

    #[test]
    fn first_constraint_wins_for_repeated_name() {
        let roster = Roster::new(3).with_constraint("X", 3).with_constraint("X", 1);
        let teams = assign(&roster, &mut rng()).unwrap();
        assert_eq!(teams.occurrences("X"), 1);
        assert_eq!(teams.group_of("X"), Some(3));
    }

    #[test]
    fn strict_validation_reports_bad_input() {
        let ok = three_team_roster().with_constraint("G", 2);
        assert!(validate_strict(&ok).is_ok());

        let bad_constraint = three_team_roster().with_constraint("G", 4);
        assert!(matches!(
            validate_strict(&bad_constraint),
            Err(EngineError::ConstraintOutOfRange { team: 4, team_count: 3, .. })
        ));

        let blank = three_team_roster().with_constraint(" ", 1);
        assert!(matches!(validate_strict(&blank), Err(EngineError::BlankConstraintName { index: 0 })));

        let bad_lead = Roster::new(2).with_layer(FixedRoleLayer::from_pairs(FixedRole::Lead, [(3, "A")]));
        assert!(matches!(
            validate_strict(&bad_lead),
            Err(EngineError::FixedRoleOutOfRange { group: 3, .. })
        ));
    }

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    proptest! {
        #[test]
        fn every_participant_placed_once_and_sizes_balanced(
            team_count in 1u32..8,
            pool in 0usize..40,
            seed in any::<u64>(),
        ) {
            let roster = Roster::new(team_count).with_participants(names("p", pool));
            let teams = assign(&roster, &mut StdRng::seed_from_u64(seed)).unwrap();

            prop_assert_eq!(teams.total_members(), pool);
            for name in &roster.participants {
                prop_assert_eq!(teams.occurrences(name), 1);
            }
            let sizes = teams.sizes();
            let max = sizes.values().max().copied().unwrap_or(0);
            let min = sizes.values().min().copied().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn coverage_counts_leads_deputies_and_pool(
            team_count in 1u32..6,
            pool in 0usize..30,
            seed in any::<u64>(),
        ) {
            let leads = FixedRoleLayer::from_pairs(
                FixedRole::Lead,
                (1..=team_count).map(|g| (g, format!("lead{g}"))),
            );
            let deputies = FixedRoleLayer::from_pairs(
                FixedRole::DeputyLead,
                (1..=team_count).filter(|g| g % 2 == 0).map(|g| (g, format!("dep{g}"))),
            );
            let n_deputies = deputies.names().count();
            let roster = Roster::new(team_count)
                .with_layer(leads)
                .with_layer(deputies)
                .with_participants(names("p", pool));
            let teams = assign(&roster, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(teams.total_members(), team_count as usize + n_deputies + pool);
        }
    }
}
