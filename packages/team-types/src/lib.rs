//! # team-types
//!
//! Shared records exchanged between the team-draw engine and its UI layer.
//!
//! These types are used by:
//! - `team-engine`: input roster, output assignments and fairness statistics
//! - `backend-rust`: JSON request/response bodies for the browser UI
//! - `team-draw` CLI: config-file roster and printed results
//!
//! ## Conventions
//!
//! - Groups are numbered from 1 to `team_count` inclusive.
//! - Participants are identified by display name only. Two entries with the
//!   same string are the same person.
//! - A blank (empty or whitespace-only) fixed-role name means "role absent".

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Group index in `[1, team_count]`.
pub type GroupIndex = u32;

/// Returns true for names that count as "no one".
pub fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

// ── Roles ─────────────────────────────────────────────────────────────────────

/// Tag attached to every placed participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Lead,
    DeputyLead,
    /// Pinned to a group by a constraint
    Constrained,
    /// Placed by the random distribution step
    Member,
}

/// Roles that can be pre-designated per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FixedRole {
    Lead,
    DeputyLead,
}

impl From<FixedRole> for Role {
    fn from(r: FixedRole) -> Self {
        match r {
            FixedRole::Lead => Role::Lead,
            FixedRole::DeputyLead => Role::DeputyLead,
        }
    }
}

// ── Roster input ──────────────────────────────────────────────────────────────

/// Pins a participant to a specific group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub team: GroupIndex,
}

impl Constraint {
    pub fn new(name: impl Into<String>, team: GroupIndex) -> Self {
        Self { name: name.into(), team }
    }
}

/// One layer of fixed roles: at most one holder per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedRoleLayer {
    pub role: FixedRole,
    /// group → holder name. Missing or blank entries leave the role empty.
    #[serde(default)]
    pub holders: BTreeMap<GroupIndex, String>,
}

impl FixedRoleLayer {
    pub fn new(role: FixedRole) -> Self {
        Self { role, holders: BTreeMap::new() }
    }

    /// Build a layer from `(group, name)` pairs.
    pub fn from_pairs<I, S>(role: FixedRole, pairs: I) -> Self
    where
        I: IntoIterator<Item = (GroupIndex, S)>,
        S: Into<String>,
    {
        Self {
            role,
            holders: pairs.into_iter().map(|(g, n)| (g, n.into())).collect(),
        }
    }

    /// Holder for `group`, if one is set and not blank.
    pub fn holder(&self, group: GroupIndex) -> Option<&str> {
        self.holders
            .get(&group)
            .map(String::as_str)
            .filter(|n| !is_blank(n))
    }

    /// All non-blank holder names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.holders.values().map(String::as_str).filter(|n| !is_blank(n))
    }
}

/// Caller-owned configuration for one assignment or simulation run.
///
/// The engine never keeps a roster between calls; the UI layer edits this
/// record and hands it over each time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub team_count: u32,
    /// Fixed-role layers, placed in order (e.g. leads, then deputy leads).
    #[serde(default)]
    pub layers: Vec<FixedRoleLayer>,
    /// General pool. May repeat fixed-role or constrained names; those are
    /// placed once only.
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Roster {
    pub fn new(team_count: u32) -> Self {
        Self { team_count, ..Default::default() }
    }

    pub fn with_layer(mut self, layer: FixedRoleLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn with_participants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_constraint(mut self, name: impl Into<String>, team: GroupIndex) -> Self {
        self.constraints.push(Constraint::new(name, team));
        self
    }

    /// Names holding a fixed role in an existing group, blanks ignored.
    ///
    /// Holders set for a group outside `1..=team_count` are not placed, so
    /// they are not listed here either.
    pub fn fixed_role_names(&self) -> BTreeSet<&str> {
        self.layers
            .iter()
            .flat_map(|layer| layer.holders.iter())
            .filter(|&(&group, name)| self.is_valid_group(group) && !is_blank(name))
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Names a constraint actually pins: blank names, out-of-range targets
    /// and fixed-role holders are left out.
    pub fn pinned_names(&self) -> BTreeSet<&str> {
        let fixed = self.fixed_role_names();
        self.constraints
            .iter()
            .filter(|c| self.is_valid_group(c.team))
            .map(|c| c.name.as_str())
            .filter(|n| !is_blank(n) && !fixed.contains(n))
            .collect()
    }

    pub fn is_valid_group(&self, group: GroupIndex) -> bool {
        (1..=self.team_count).contains(&group)
    }
}

// ── Assignment output ─────────────────────────────────────────────────────────

/// A participant placed in a group, with the reason they are there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberAssignment {
    pub name: String,
    pub role: Role,
}

/// Result of one assignment run: group → members in placement order.
///
/// Every group `1..=team_count` is present, even if empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamAssignment {
    pub groups: BTreeMap<GroupIndex, Vec<MemberAssignment>>,
}

impl TeamAssignment {
    pub fn with_empty_groups(team_count: u32) -> Self {
        Self {
            groups: (1..=team_count).map(|g| (g, Vec::new())).collect(),
        }
    }

    /// Append `name` to `group`. Returns false if the group does not exist.
    pub fn push(&mut self, group: GroupIndex, name: impl Into<String>, role: Role) -> bool {
        match self.groups.get_mut(&group) {
            Some(members) => {
                members.push(MemberAssignment { name: name.into(), role });
                true
            }
            None => false,
        }
    }

    pub fn team_count(&self) -> u32 {
        u32::try_from(self.groups.len()).unwrap_or(u32::MAX)
    }

    pub fn members(&self, group: GroupIndex) -> &[MemberAssignment] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_members(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Current member count per group.
    pub fn sizes(&self) -> BTreeMap<GroupIndex, usize> {
        self.groups.iter().map(|(&g, m)| (g, m.len())).collect()
    }

    /// First group containing `name`.
    pub fn group_of(&self, name: &str) -> Option<GroupIndex> {
        self.groups
            .iter()
            .find(|(_, members)| members.iter().any(|m| m.name == name))
            .map(|(&g, _)| g)
    }

    /// How many times `name` was placed across all groups.
    pub fn occurrences(&self, name: &str) -> usize {
        self.groups
            .values()
            .flat_map(|m| m.iter())
            .filter(|m| m.name == name)
            .count()
    }

    /// `(group, member)` pairs carrying `role`.
    pub fn members_with_role(&self, role: Role) -> Vec<(GroupIndex, &MemberAssignment)> {
        self.groups
            .iter()
            .flat_map(|(&g, members)| members.iter().map(move |m| (g, m)))
            .filter(|(_, m)| m.role == role)
            .collect()
    }
}

// ── Fairness statistics ───────────────────────────────────────────────────────

/// participant → group → number of trials that placed them there.
///
/// Every row has one entry per group, zero-filled, and sums to the trial count.
pub type DistributionStats = BTreeMap<String, BTreeMap<GroupIndex, u64>>;

/// Outcome of the uniformity check over a [`DistributionStats`] table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformityVerdict {
    pub is_uniform: bool,
    /// Largest |count - expected| / expected over all cells, percent, 2 decimals
    pub max_deviation_pct: f64,
    /// iterations / team_count
    pub expected_per_group: f64,
    /// Cell that produced the largest deviation (none for an empty table)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_cell: Option<WorstCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorstCell {
    pub name: String,
    pub group: GroupIndex,
    pub count: u64,
}
