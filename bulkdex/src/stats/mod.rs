//! Base stats: the per-species record, its wire parsing, the in-game
//! stat formula, and the bulk similarity matcher.
//!
//! [`BaseStats`] is the one durable record per species. The cache in
//! [`cache`] owns the record set; [`formula`] and [`matcher`] are pure
//! computation over it.

mod cache;
pub mod formula;
pub mod matcher;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::{ProgressCallback, StatsCache, PROGRESS_STRIDE};

/// Durable store key prefix for per-species records.
pub const STATS_KEY_PREFIX: &str = "stats-";

/// Index of the HP entry in the detail document's stat list.
const HP_INDEX: usize = 0;
/// Index of the Defense entry in the detail document's stat list.
const DEFENSE_INDEX: usize = 2;
/// Index of the Special Defense entry in the detail document's stat list.
const SP_DEFENSE_INDEX: usize = 4;

/// The three defensive base values of one species.
///
/// Created on the first successful detail fetch, immutable thereafter,
/// persisted durably under [`BaseStats::store_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    /// Unique species name, matching the catalog entry.
    pub name: String,
    /// Base HP.
    pub hp: u16,
    /// Base Defense.
    pub defense: u16,
    /// Base Special Defense.
    pub sp_defense: u16,
}

impl BaseStats {
    /// Durable store key for a species' record.
    pub fn store_key(name: &str) -> String {
        format!("{STATS_KEY_PREFIX}{name}")
    }
}

/// Why a detail document could not be turned into a [`BaseStats`].
///
/// Parse failures are never retried; the species is skipped for the run.
#[derive(Debug, Error)]
pub enum DetailParseError {
    /// The document is not the expected JSON shape.
    #[error("malformed detail response")]
    Json(#[from] serde_json::Error),

    /// The stat list is too short to hold the three defensive entries.
    #[error("stat list has {len} entries, need at least {need}")]
    MissingStats {
        /// Entries present.
        len: usize,
        /// Entries required.
        need: usize,
    },
}

/// Wire shape of the species detail endpoint (only what we consume).
#[derive(Deserialize)]
struct DetailResponse {
    stats: Vec<StatSlot>,
}

#[derive(Deserialize)]
struct StatSlot {
    base_stat: u16,
}

/// Extracts a [`BaseStats`] from a species detail document.
///
/// The three defensive values sit at fixed positions in the stat list
/// (HP first, Defense third, Special Defense fifth).
pub fn parse_detail(name: &str, body: &[u8]) -> Result<BaseStats, DetailParseError> {
    let detail: DetailResponse = serde_json::from_slice(body)?;

    let need = SP_DEFENSE_INDEX + 1;
    if detail.stats.len() < need {
        return Err(DetailParseError::MissingStats {
            len: detail.stats.len(),
            need,
        });
    }

    Ok(BaseStats {
        name: name.to_string(),
        hp: detail.stats[HP_INDEX].base_stat,
        defense: detail.stats[DEFENSE_INDEX].base_stat,
        sp_defense: detail.stats[SP_DEFENSE_INDEX].base_stat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_body(values: &[u16]) -> Vec<u8> {
        let slots: Vec<String> = values
            .iter()
            .map(|v| format!(r#"{{"base_stat": {v}, "effort": 0}}"#))
            .collect();
        format!(r#"{{"name": "x", "stats": [{}]}}"#, slots.join(",")).into_bytes()
    }

    #[test]
    fn test_parse_detail_fixed_offsets() {
        let body = detail_body(&[35, 55, 40, 50, 50, 90]);
        let stats = parse_detail("pikachu", &body).unwrap();
        assert_eq!(
            stats,
            BaseStats {
                name: "pikachu".to_string(),
                hp: 35,
                defense: 40,
                sp_defense: 50,
            }
        );
    }

    #[test]
    fn test_parse_detail_short_stat_list() {
        let body = detail_body(&[35, 55, 40]);
        let err = parse_detail("pikachu", &body).unwrap_err();
        assert!(matches!(
            err,
            DetailParseError::MissingStats { len: 3, need: 5 }
        ));
    }

    #[test]
    fn test_parse_detail_malformed_json() {
        let err = parse_detail("pikachu", b"<!doctype html>").unwrap_err();
        assert!(matches!(err, DetailParseError::Json(_)));
    }

    #[test]
    fn test_store_key() {
        assert_eq!(BaseStats::store_key("mew"), "stats-mew");
    }
}
