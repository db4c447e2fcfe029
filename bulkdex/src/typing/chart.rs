//! The fixed attacker-to-defender multiplier chart.
//!
//! Single-type lookups take values in {0, 0.5, 1, 2}; multi-type
//! defenders multiply their per-type lookups, extending the range to
//! {0, 0.25, 0.5, 1, 2, 4}. A pair absent from the table is neutral.

use super::TypeId;

/// Damage multiplier of an attack of type `attacker` against a single
/// defending type `defender`. Pairs not listed are neutral (1.0).
pub fn multiplier(attacker: TypeId, defender: TypeId) -> f64 {
    use TypeId::*;

    match (attacker, defender) {
        (Normal, Rock | Steel) => 0.5,
        (Normal, Ghost) => 0.0,

        (Fire, Grass | Ice | Bug | Steel) => 2.0,
        (Fire, Water | Rock | Dragon) => 0.5,

        (Water, Fire | Ground | Rock) => 2.0,
        (Water, Water | Grass | Dragon) => 0.5,

        (Electric, Water | Flying) => 2.0,
        (Electric, Grass | Electric | Dragon) => 0.5,
        (Electric, Ground) => 0.0,

        (Grass, Water | Ground | Rock) => 2.0,
        (Grass, Fire | Grass | Poison | Flying | Bug | Dragon | Steel) => 0.5,

        (Ice, Grass | Ground | Flying | Dragon) => 2.0,
        (Ice, Fire | Water | Ice | Steel) => 0.5,

        (Fighting, Normal | Ice | Rock | Dark | Steel) => 2.0,
        (Fighting, Poison | Flying | Psychic | Bug | Fairy) => 0.5,
        (Fighting, Ghost) => 0.0,

        (Poison, Grass | Fairy) => 2.0,
        (Poison, Poison | Ground | Rock | Ghost) => 0.5,
        (Poison, Steel) => 0.0,

        (Ground, Fire | Electric | Poison | Rock | Steel) => 2.0,
        (Ground, Grass | Bug) => 0.5,
        (Ground, Flying) => 0.0,

        (Flying, Grass | Fighting | Bug) => 2.0,
        (Flying, Electric | Rock | Steel) => 0.5,

        (Psychic, Fighting | Poison) => 2.0,
        (Psychic, Psychic | Steel) => 0.5,
        (Psychic, Dark) => 0.0,

        (Bug, Grass | Psychic | Dark) => 2.0,
        (Bug, Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy) => 0.5,

        (Rock, Fire | Ice | Flying | Bug) => 2.0,
        (Rock, Fighting | Ground | Steel) => 0.5,

        (Ghost, Psychic | Ghost) => 2.0,
        (Ghost, Dark) => 0.5,
        (Ghost, Normal) => 0.0,

        (Dragon, Dragon) => 2.0,
        (Dragon, Steel) => 0.5,
        (Dragon, Fairy) => 0.0,

        (Dark, Psychic | Ghost) => 2.0,
        (Dark, Fighting | Dark | Fairy) => 0.5,

        (Steel, Ice | Rock | Fairy) => 2.0,
        (Steel, Fire | Water | Electric | Steel) => 0.5,

        (Fairy, Fighting | Dragon | Dark) => 2.0,
        (Fairy, Fire | Poison | Steel) => 0.5,

        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TypeId::*;

    #[test]
    fn test_known_super_effective_entries() {
        assert_eq!(multiplier(Water, Fire), 2.0);
        assert_eq!(multiplier(Electric, Water), 2.0);
        assert_eq!(multiplier(Fighting, Normal), 2.0);
        assert_eq!(multiplier(Fairy, Dragon), 2.0);
    }

    #[test]
    fn test_known_resisted_entries() {
        assert_eq!(multiplier(Fire, Water), 0.5);
        assert_eq!(multiplier(Grass, Flying), 0.5);
        assert_eq!(multiplier(Dark, Fairy), 0.5);
    }

    #[test]
    fn test_immunities() {
        assert_eq!(multiplier(Normal, Ghost), 0.0);
        assert_eq!(multiplier(Ghost, Normal), 0.0);
        assert_eq!(multiplier(Electric, Ground), 0.0);
        assert_eq!(multiplier(Ground, Flying), 0.0);
        assert_eq!(multiplier(Fighting, Ghost), 0.0);
        assert_eq!(multiplier(Poison, Steel), 0.0);
        assert_eq!(multiplier(Psychic, Dark), 0.0);
        assert_eq!(multiplier(Dragon, Fairy), 0.0);
    }

    #[test]
    fn test_unlisted_pairs_are_neutral() {
        assert_eq!(multiplier(Normal, Normal), 1.0);
        assert_eq!(multiplier(Water, Normal), 1.0);
        assert_eq!(multiplier(Dragon, Water), 1.0);
    }

    #[test]
    fn test_chart_is_asymmetric() {
        assert_eq!(multiplier(Water, Fire), 2.0);
        assert_eq!(multiplier(Fire, Water), 0.5);
    }

    #[test]
    fn test_single_lookup_domain() {
        for attacker in TypeId::ALL {
            for defender in TypeId::ALL {
                let m = multiplier(attacker, defender);
                assert!(
                    m == 0.0 || m == 0.5 || m == 1.0 || m == 2.0,
                    "unexpected multiplier {m} for {attacker} vs {defender}"
                );
            }
        }
    }

    #[test]
    fn test_non_neutral_entry_count() {
        let non_neutral = TypeId::ALL
            .iter()
            .flat_map(|a| TypeId::ALL.iter().map(move |d| multiplier(*a, *d)))
            .filter(|m| *m != 1.0)
            .count();
        assert_eq!(non_neutral, 119);
    }
}
