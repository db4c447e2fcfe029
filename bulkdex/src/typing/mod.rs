//! Type effectiveness engine.
//!
//! Everything in this module is pure computation over a fixed 18-type
//! universe: defensive multiplier profiles, best-offense coverage
//! profiles, and the exhaustive search for defensive typings that
//! resist a whole offensive set.

pub mod analysis;
pub mod chart;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analysis::{
    analyze, defensive_profile, offensive_profile, resistant_combinations, DefensiveProfile,
    OffenseTag, OffensiveHit, OffensiveProfile, OffensiveType, TypeCombo, TypingQuery,
    TypingReport,
};
pub use chart::multiplier;

/// One of the eighteen types.
///
/// Declaration order is the canonical (alphabetical) universe order;
/// the derived `Ord` drives pair canonicalization and every exhaustive
/// enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeId {
    Bug,
    Dark,
    Dragon,
    Electric,
    Fairy,
    Fighting,
    Fire,
    Flying,
    Ghost,
    Grass,
    Ground,
    Ice,
    Normal,
    Poison,
    Psychic,
    Rock,
    Steel,
    Water,
}

impl TypeId {
    /// The full universe, in canonical order.
    pub const ALL: [TypeId; 18] = [
        TypeId::Bug,
        TypeId::Dark,
        TypeId::Dragon,
        TypeId::Electric,
        TypeId::Fairy,
        TypeId::Fighting,
        TypeId::Fire,
        TypeId::Flying,
        TypeId::Ghost,
        TypeId::Grass,
        TypeId::Ground,
        TypeId::Ice,
        TypeId::Normal,
        TypeId::Poison,
        TypeId::Psychic,
        TypeId::Rock,
        TypeId::Steel,
        TypeId::Water,
    ];

    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeId::Bug => "Bug",
            TypeId::Dark => "Dark",
            TypeId::Dragon => "Dragon",
            TypeId::Electric => "Electric",
            TypeId::Fairy => "Fairy",
            TypeId::Fighting => "Fighting",
            TypeId::Fire => "Fire",
            TypeId::Flying => "Flying",
            TypeId::Ghost => "Ghost",
            TypeId::Grass => "Grass",
            TypeId::Ground => "Ground",
            TypeId::Ice => "Ice",
            TypeId::Normal => "Normal",
            TypeId::Poison => "Poison",
            TypeId::Psychic => "Psychic",
            TypeId::Rock => "Rock",
            TypeId::Steel => "Steel",
            TypeId::Water => "Water",
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no known type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown type {0:?}")]
pub struct UnknownType(pub String);

impl FromStr for TypeId {
    type Err = UnknownType;

    /// Case-insensitive lookup by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeId::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownType(s.to_string()))
    }
}
