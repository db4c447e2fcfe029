//! Bulk similarity matching.
//!
//! "Bulk" collapses HP and one defense into a single durability number:
//! `hp * defense / 804.76`. For each build the matcher scans the whole
//! record set once and tracks, independently for the physical and
//! special axes, the candidate whose bulk sits nearest the query's.
//!
//! The comparison is strictly less-than, so ties keep the candidate
//! encountered first in iteration order. That ordering is observable
//! output and must not change.

use serde::Serialize;

use super::formula::{derive_candidate, DerivedBuild, StatProfile};
use super::BaseStats;

/// Divisor folding a raw `hp * defense` product into the bulk scale.
pub const BULK_NORMALIZER: f64 = 804.76;

/// Bulk value of a derived HP/defense pair.
pub fn bulk(hp: u32, defense: u32) -> f64 {
    f64::from(hp) * f64::from(defense) / BULK_NORMALIZER
}

/// Best match on one bulk axis.
#[derive(Debug, Clone, Serialize)]
pub struct AxisMatch {
    /// Winning species name.
    pub name: String,
    /// The winner's bulk on this axis.
    pub bulk: f64,
    /// Absolute difference to the query's bulk.
    pub difference: f64,
    /// The winner's derived HP under the build's effort spread.
    pub hp: u32,
    /// The winner's derived defense stat on this axis.
    pub defense: u32,
}

/// Result of matching one build against the record set.
#[derive(Debug, Clone, Serialize)]
pub struct BuildMatch {
    /// The query's derived stats for this build.
    pub build: DerivedBuild,
    /// The query's physical bulk.
    pub physical_bulk: f64,
    /// The query's special bulk.
    pub special_bulk: f64,
    /// Closest candidate on the physical axis; `None` only for an empty
    /// record set.
    pub physical: Option<AxisMatch>,
    /// Closest candidate on the special axis.
    pub special: Option<AxisMatch>,
}

/// Scans `records` once and returns the closest match on each axis.
///
/// Candidates are derived under the build's effort spread with neutral
/// nature. Records missing from the cache are simply not in `records`;
/// absence shrinks the candidate pool and nothing else.
pub fn closest_match<'a, I>(build: &DerivedBuild, records: I) -> BuildMatch
where
    I: IntoIterator<Item = &'a BaseStats>,
{
    let evs = build.kind.ev_spread();
    let target_physical = bulk(build.hp, build.defense);
    let target_special = bulk(build.hp, build.sp_defense);

    let mut physical: Option<AxisMatch> = None;
    let mut special: Option<AxisMatch> = None;

    for record in records {
        let profile = StatProfile {
            hp: record.hp,
            defense: record.defense,
            sp_defense: record.sp_defense,
        };
        let (hp, defense, sp_defense) = derive_candidate(profile, evs);

        let candidate_physical = bulk(hp, defense);
        let diff = (target_physical - candidate_physical).abs();
        if physical.as_ref().map_or(true, |best| diff < best.difference) {
            physical = Some(AxisMatch {
                name: record.name.clone(),
                bulk: candidate_physical,
                difference: diff,
                hp,
                defense,
            });
        }

        let candidate_special = bulk(hp, sp_defense);
        let diff = (target_special - candidate_special).abs();
        if special.as_ref().map_or(true, |best| diff < best.difference) {
            special = Some(AxisMatch {
                name: record.name.clone(),
                bulk: candidate_special,
                difference: diff,
                hp,
                defense: sp_defense,
            });
        }
    }

    BuildMatch {
        build: build.clone(),
        physical_bulk: target_physical,
        special_bulk: target_special,
        physical,
        special,
    }
}
