//! Defensive, offensive, and resistant-combination analysis.

use std::fmt;

use serde::Serialize;

use super::chart::multiplier;
use super::TypeId;

/// Why an offensive type is in the query's kit.
///
/// The tag never changes multiplier math; it only labels which source
/// won a matchup in the offensive profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OffenseTag {
    /// Same-type attack.
    Stab,
    /// Off-type coverage attack.
    Coverage,
}

impl OffenseTag {
    /// Short display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffenseTag::Stab => "STAB",
            OffenseTag::Coverage => "coverage",
        }
    }
}

impl fmt::Display for OffenseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged offensive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffensiveType {
    /// The attacking type.
    pub type_id: TypeId,
    /// Where it comes from.
    pub tag: OffenseTag,
}

/// Attacking types bucketed by the multiplier they achieve against a
/// defensive typing. Neutral attackers are omitted entirely.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefensiveProfile {
    /// Attackers hitting for 4x.
    pub x4: Vec<TypeId>,
    /// Attackers hitting for 2x.
    pub x2: Vec<TypeId>,
    /// Attackers resisted to 0.5x.
    pub x0_5: Vec<TypeId>,
    /// Attackers resisted to 0.25x.
    pub x0_25: Vec<TypeId>,
    /// Attackers with no effect.
    pub x0: Vec<TypeId>,
}

/// For every attacking type, multiply its lookup against each defending
/// type and bucket the product. Exactly-neutral attackers appear in no
/// bucket.
pub fn defensive_profile(defenders: &[TypeId]) -> DefensiveProfile {
    let mut profile = DefensiveProfile::default();

    for attacker in TypeId::ALL {
        let product: f64 = defenders
            .iter()
            .map(|defender| multiplier(attacker, *defender))
            .product();

        if product == 4.0 {
            profile.x4.push(attacker);
        } else if product == 2.0 {
            profile.x2.push(attacker);
        } else if product == 0.5 {
            profile.x0_5.push(attacker);
        } else if product == 0.25 {
            profile.x0_25.push(attacker);
        } else if product == 0.0 {
            profile.x0.push(attacker);
        }
    }

    profile
}

/// One defending type and the offensive type that handles it best.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OffensiveHit {
    /// The defending type.
    pub defender: TypeId,
    /// The offense achieving the best multiplier against it.
    pub best: OffensiveType,
    /// That best multiplier.
    pub multiplier: f64,
}

/// Defending types bucketed by the best multiplier any offense achieves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OffensiveProfile {
    /// Best multiplier is at least 2.
    pub super_effective: Vec<OffensiveHit>,
    /// Best multiplier is exactly 1.
    pub neutral: Vec<OffensiveHit>,
    /// Best multiplier is between 0 and 1 exclusive.
    pub resisted: Vec<OffensiveHit>,
    /// No offense has any effect.
    pub immune: Vec<OffensiveHit>,
}

/// For every defending type, pick the offense with the highest
/// multiplier. A tie keeps the offense listed first (strictly-greater
/// comparison), so kit order is a stable preference.
pub fn offensive_profile(offenses: &[OffensiveType]) -> OffensiveProfile {
    let mut profile = OffensiveProfile::default();

    for defender in TypeId::ALL {
        let mut best_multiplier = -1.0;
        let mut best: Option<OffensiveType> = None;
        for offense in offenses {
            let m = multiplier(offense.type_id, defender);
            if m > best_multiplier {
                best_multiplier = m;
                best = Some(*offense);
            }
        }
        let Some(best) = best else {
            continue;
        };

        let hit = OffensiveHit {
            defender,
            best,
            multiplier: best_multiplier,
        };
        if best_multiplier >= 2.0 {
            profile.super_effective.push(hit);
        } else if best_multiplier == 1.0 {
            profile.neutral.push(hit);
        } else if best_multiplier > 0.0 {
            profile.resisted.push(hit);
        } else {
            profile.immune.push(hit);
        }
    }

    profile
}

/// A defensive typing of one or two types, members in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCombo {
    /// The member types (one or two, ascending).
    pub members: Vec<TypeId>,
}

impl fmt::Display for TypeCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(|t| t.as_str()).collect();
        f.write_str(&names.join("/"))
    }
}

/// Finds every defensive typing that resists the whole offensive set.
///
/// All 18 singles and all 153 canonical pairs are evaluated. A typing
/// qualifies only if, for every offense, the product of lookups across
/// its members is strictly below 1; a single exactly-neutral matchup
/// disqualifies it.
pub fn resistant_combinations(offenses: &[OffensiveType]) -> Vec<TypeCombo> {
    let mut combos = Vec::with_capacity(171);
    for t1 in TypeId::ALL {
        combos.push(TypeCombo { members: vec![t1] });
        for t2 in TypeId::ALL {
            if t1 < t2 {
                combos.push(TypeCombo {
                    members: vec![t1, t2],
                });
            }
        }
    }

    combos
        .into_iter()
        .filter(|combo| {
            offenses.iter().all(|offense| {
                let product: f64 = combo
                    .members
                    .iter()
                    .map(|member| multiplier(offense.type_id, *member))
                    .product();
                product < 1.0
            })
        })
        .collect()
}

/// The typing selection of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingQuery {
    /// Primary type: defensive and same-type offensive.
    pub primary: TypeId,
    /// Optional secondary type: defensive and same-type offensive.
    /// Dropped entirely if it duplicates the primary.
    pub secondary: Option<TypeId>,
    /// Optional coverage type: offensive only, kept even when it
    /// duplicates another selection.
    pub coverage: Option<TypeId>,
}

impl TypingQuery {
    /// The defending types, deduplicated.
    pub fn defenders(&self) -> Vec<TypeId> {
        let mut defenders = vec![self.primary];
        if let Some(secondary) = self.secondary {
            if secondary != self.primary {
                defenders.push(secondary);
            }
        }
        defenders
    }

    /// The tagged offensive kit, in preference order.
    pub fn offenses(&self) -> Vec<OffensiveType> {
        let mut offenses = vec![OffensiveType {
            type_id: self.primary,
            tag: OffenseTag::Stab,
        }];
        if let Some(secondary) = self.secondary {
            if secondary != self.primary {
                offenses.push(OffensiveType {
                    type_id: secondary,
                    tag: OffenseTag::Stab,
                });
            }
        }
        if let Some(coverage) = self.coverage {
            offenses.push(OffensiveType {
                type_id: coverage,
                tag: OffenseTag::Coverage,
            });
        }
        offenses
    }
}

/// Full analysis output for one typing query.
#[derive(Debug, Clone, Serialize)]
pub struct TypingReport {
    /// The defending types analyzed.
    pub defenders: Vec<TypeId>,
    /// Incoming-damage buckets.
    pub defensive: DefensiveProfile,
    /// Outgoing-coverage buckets.
    pub offensive: OffensiveProfile,
    /// Typings resisting the whole offensive kit.
    pub resistant: Vec<TypeCombo>,
}

/// Runs all three analyses for a query.
pub fn analyze(query: &TypingQuery) -> TypingReport {
    let defenders = query.defenders();
    let offenses = query.offenses();

    TypingReport {
        defensive: defensive_profile(&defenders),
        offensive: offensive_profile(&offenses),
        resistant: resistant_combinations(&offenses),
        defenders,
    }
}
