#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster tactical decisions.
//!
//! Every monster phase the planner looks at the adventurers within
//! [`NEARBY_RANGE`] of each monster, picks one [`Tactic`] per monster and
//! orders the plans for execution: area attacks first, then by descending
//! monster level. Nothing is remembered between turns apart from the
//! cooldowns stored on the monsters themselves.

use std::cmp::Reverse;

use lair_defence_core::{AdventurerClass, AdventurerId, CellCoord, MonsterId, MonsterKind};
use lair_defence_system_combatants::{Adventurer, Monster};
use lair_defence_world::{query, Grid};
use tracing::debug;

/// Manhattan distance within which a monster notices adventurers.
pub const NEARBY_RANGE: u32 = 2;

const DAMAGE_WEIGHT: i64 = 2;
const DISTANCE_PENALTY: i64 = 5;
const CRITICAL_HEALTH: f64 = 0.3;
const CRITICAL_HEALTH_BONUS: i64 = 20;
const LOW_HEALTH: f64 = 0.5;
const LOW_HEALTH_BONUS: i64 = 10;

/// Observable facts about an adventurer near a monster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Identifier of the adventurer.
    pub id: AdventurerId,
    /// Class of the adventurer.
    pub class: AdventurerClass,
    /// Cell the adventurer occupies.
    pub position: CellCoord,
    /// Remaining health as a fraction of maximum health.
    pub health_fraction: f64,
    /// Damage of the adventurer's regular attack.
    pub damage: u32,
    /// Manhattan distance to the monster.
    pub distance: u32,
}

impl Candidate {
    /// Describes `adventurer` as seen from `monster`.
    #[must_use]
    pub fn observe(adventurer: &Adventurer, monster: CellCoord) -> Self {
        Self {
            id: adventurer.id(),
            class: adventurer.class(),
            position: adventurer.position(),
            health_fraction: adventurer.health_fraction(),
            damage: adventurer.damage(),
            distance: adventurer.position().manhattan_distance(monster),
        }
    }
}

/// Non-offensive actions a monster can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefensiveAction {
    /// Restore health.
    Regenerate,
    /// Halve incoming damage until the next phase.
    Brace,
}

/// What a monster does during the monster phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tactic {
    /// Hit a single adventurer.
    Attack {
        /// Adventurer to hit.
        target: AdventurerId,
    },
    /// Hit every adventurer within the area ability's range.
    AreaAttack {
        /// Adventurers in range, in roster order.
        targets: Vec<AdventurerId>,
    },
    /// Protect itself.
    Defensive(DefensiveAction),
    /// Raise a minion on an adjacent corridor cell.
    Summon {
        /// Cell the minion appears on.
        cell: CellCoord,
    },
    /// Do nothing this turn.
    Wait,
}

/// A monster's chosen tactic together with the facts that order it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedTactic {
    /// Acting monster.
    pub monster: MonsterId,
    /// Level of the acting monster.
    pub level: u32,
    /// Chosen tactic.
    pub tactic: Tactic,
}

/// Bonus a monster kind gives to attacking a particular class.
#[must_use]
pub const fn class_affinity(kind: MonsterKind, class: AdventurerClass) -> i64 {
    match (kind, class) {
        (MonsterKind::Goblin, AdventurerClass::Mage | AdventurerClass::Archer) => 10,
        (MonsterKind::Skeleton | MonsterKind::Troll, AdventurerClass::Warrior) => 5,
        (MonsterKind::Orc, AdventurerClass::Warrior) => 10,
        (MonsterKind::Golem, AdventurerClass::Rogue) => 10,
        (MonsterKind::Lich, AdventurerClass::Cleric) => 15,
        (MonsterKind::Dragon, AdventurerClass::Mage) => 10,
        (MonsterKind::Dragon, AdventurerClass::Cleric) => 5,
        _ => 0,
    }
}

/// `2·damage + lowHealthBonus + classAffinity − 5·distance`.
#[must_use]
pub fn threat_score(kind: MonsterKind, candidate: &Candidate) -> i64 {
    let low_health_bonus = if candidate.health_fraction < CRITICAL_HEALTH {
        CRITICAL_HEALTH_BONUS
    } else if candidate.health_fraction < LOW_HEALTH {
        LOW_HEALTH_BONUS
    } else {
        0
    };

    DAMAGE_WEIGHT * i64::from(candidate.damage)
        + low_health_bonus
        + class_affinity(kind, candidate.class)
        - DISTANCE_PENALTY * i64::from(candidate.distance)
}

/// Highest-threat candidate within `range`; ties keep the earlier candidate.
#[must_use]
pub fn pick_target(kind: MonsterKind, candidates: &[Candidate], range: u32) -> Option<&Candidate> {
    let mut best: Option<(&Candidate, i64)> = None;
    for candidate in candidates.iter().filter(|candidate| candidate.distance <= range) {
        let score = threat_score(kind, candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Chooses the tactic for one monster.
///
/// Overrides are checked in order: regeneration when hurt, waiting when
/// nobody is near, bracing when hurt, an area attack against two or more
/// targets, a summon when a corridor cell is free, and finally a regular
/// attack on the highest-threat target in range.
#[must_use]
pub fn decide_tactic(monster: &Monster, nearby: &[Candidate], grid: &Grid) -> Tactic {
    if monster.can_regenerate() {
        return Tactic::Defensive(DefensiveAction::Regenerate);
    }

    if nearby.is_empty() {
        return Tactic::Wait;
    }

    if monster.wants_to_brace() {
        return Tactic::Defensive(DefensiveAction::Brace);
    }

    if monster.area_ready() {
        let range = monster.area_range();
        let targets: Vec<AdventurerId> = nearby
            .iter()
            .filter(|candidate| candidate.distance <= range)
            .map(|candidate| candidate.id)
            .collect();
        if targets.len() >= 2 {
            return Tactic::AreaAttack { targets };
        }
    }

    if monster.summon_ready() {
        let occupied =
            |cell: &CellCoord| nearby.iter().any(|candidate| candidate.position == *cell);
        if let Some(cell) = query::free_path_neighbors(grid, monster.position())
            .into_iter()
            .find(|cell| !occupied(cell))
        {
            return Tactic::Summon { cell };
        }
    }

    if monster.can_attack() {
        if let Some(target) = pick_target(monster.kind(), nearby, monster.attack_range()) {
            return Tactic::Attack { target: target.id };
        }
    }

    Tactic::Wait
}

/// Sorts plans into execution order: area attacks, then descending level,
/// then ascending monster id.
pub fn execution_order(plans: &mut [PlannedTactic]) {
    plans.sort_by_key(|plan| {
        (
            !matches!(plan.tactic, Tactic::AreaAttack { .. }),
            Reverse(plan.level),
            plan.monster,
        )
    });
}

/// Plans the monster phase with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct TacticalPlanner {
    nearby: Vec<Candidate>,
}

impl TacticalPlanner {
    /// Creates a planner with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one plan per acting monster to `out`, in execution order.
    pub fn plan<'a, I>(
        &mut self,
        grid: &Grid,
        monsters: I,
        adventurers: &[Adventurer],
        out: &mut Vec<PlannedTactic>,
    )
    where
        I: IntoIterator<Item = &'a Monster>,
    {
        let start = out.len();
        for monster in monsters {
            if monster.is_dead() {
                continue;
            }

            self.nearby.clear();
            self.nearby.extend(
                adventurers
                    .iter()
                    .filter(|adventurer| !adventurer.is_dead())
                    .map(|adventurer| Candidate::observe(adventurer, monster.position()))
                    .filter(|candidate| candidate.distance <= NEARBY_RANGE),
            );

            let tactic = decide_tactic(monster, &self.nearby, grid);
            if tactic != Tactic::Wait {
                debug!(
                    monster = monster.id().get(),
                    kind = monster.kind().name(),
                    ?tactic,
                    "tactic chosen"
                );
            }
            out.push(PlannedTactic {
                monster: monster.id(),
                level: monster.level(),
                tactic,
            });
        }

        execution_order(&mut out[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_defence_core::Cell;

    fn candidate(
        id: u32,
        class: AdventurerClass,
        damage: u32,
        health_fraction: f64,
        distance: u32,
    ) -> Candidate {
        Candidate {
            id: AdventurerId::new(id),
            class,
            position: CellCoord::new(distance, 0),
            health_fraction,
            damage,
            distance,
        }
    }

    fn open_grid() -> Grid {
        let mut rows = vec![vec![Cell::Path; 5]; 5];
        rows[0][0] = Cell::Entrance;
        rows[4][4] = Cell::Boss;
        Grid::from_rows(rows, Vec::new()).expect("valid grid")
    }

    #[test]
    fn threat_combines_damage_health_affinity_and_distance() {
        let healthy = candidate(0, AdventurerClass::Warrior, 12, 1.0, 1);
        assert_eq!(threat_score(MonsterKind::Slime, &healthy), 19);
        assert_eq!(threat_score(MonsterKind::Orc, &healthy), 29);

        let wounded = candidate(1, AdventurerClass::Mage, 14, 0.4, 2);
        assert_eq!(threat_score(MonsterKind::Slime, &wounded), 28);
        let dying = candidate(2, AdventurerClass::Mage, 14, 0.1, 2);
        assert_eq!(threat_score(MonsterKind::Dragon, &dying), 48);
    }

    #[test]
    fn ties_go_to_the_earlier_candidate_and_range_filters() {
        let first = candidate(0, AdventurerClass::Rogue, 10, 1.0, 1);
        let second = candidate(1, AdventurerClass::Rogue, 10, 1.0, 1);
        let far = candidate(2, AdventurerClass::Warrior, 40, 1.0, 2);
        let pool = [first, second, far];

        assert_eq!(
            pick_target(MonsterKind::Slime, &pool, 1).map(|c| c.id),
            Some(AdventurerId::new(0))
        );
        assert_eq!(
            pick_target(MonsterKind::Slime, &pool, 2).map(|c| c.id),
            Some(AdventurerId::new(2))
        );
        assert!(pick_target(MonsterKind::Slime, &[], 2).is_none());
    }

    #[test]
    fn hurt_regenerators_heal_before_anything_else() {
        let grid = open_grid();
        let mut troll = Monster::new(MonsterId::new(1), MonsterKind::Troll, CellCoord::new(2, 2));
        let _ = troll.lose_health(60);
        let nearby = [candidate(0, AdventurerClass::Warrior, 12, 1.0, 1)];
        assert_eq!(
            decide_tactic(&troll, &nearby, &grid),
            Tactic::Defensive(DefensiveAction::Regenerate)
        );
        assert_eq!(
            decide_tactic(&troll, &[], &grid),
            Tactic::Defensive(DefensiveAction::Regenerate)
        );
    }

    #[test]
    fn area_attacks_need_two_targets() {
        let grid = open_grid();
        let golem = Monster::new(MonsterId::new(1), MonsterKind::Golem, CellCoord::new(2, 2));
        let one = [candidate(0, AdventurerClass::Warrior, 12, 1.0, 1)];
        assert_eq!(
            decide_tactic(&golem, &one, &grid),
            Tactic::Attack {
                target: AdventurerId::new(0)
            }
        );

        let two = [one[0], candidate(1, AdventurerClass::Mage, 14, 1.0, 2)];
        assert_eq!(
            decide_tactic(&golem, &two, &grid),
            Tactic::AreaAttack {
                targets: vec![AdventurerId::new(0), AdventurerId::new(1)]
            }
        );
    }

    #[test]
    fn liches_summon_onto_free_corridor_cells() {
        let grid = open_grid();
        let lich = Monster::new(MonsterId::new(1), MonsterKind::Lich, CellCoord::new(2, 2));
        let nearby = [Candidate {
            position: CellCoord::new(2, 1),
            ..candidate(0, AdventurerClass::Warrior, 12, 1.0, 1)
        }];
        assert_eq!(
            decide_tactic(&lich, &nearby, &grid),
            Tactic::Summon {
                cell: CellCoord::new(3, 2)
            }
        );
    }

    #[test]
    fn monsters_without_a_target_in_reach_wait() {
        let grid = open_grid();
        let orc = Monster::new(MonsterId::new(1), MonsterKind::Orc, CellCoord::new(2, 2));
        assert_eq!(decide_tactic(&orc, &[], &grid), Tactic::Wait);

        let out_of_reach = [candidate(0, AdventurerClass::Warrior, 12, 1.0, 2)];
        assert_eq!(decide_tactic(&orc, &out_of_reach, &grid), Tactic::Wait);

        let adjacent = [candidate(0, AdventurerClass::Warrior, 12, 1.0, 1)];
        assert_eq!(
            decide_tactic(&orc, &adjacent, &grid),
            Tactic::Attack {
                target: AdventurerId::new(0)
            }
        );
    }

    #[test]
    fn execution_puts_area_attacks_first_then_higher_levels() {
        let mut plans = vec![
            PlannedTactic {
                monster: MonsterId::new(1),
                level: 1,
                tactic: Tactic::Attack {
                    target: AdventurerId::new(0),
                },
            },
            PlannedTactic {
                monster: MonsterId::new(2),
                level: 8,
                tactic: Tactic::Wait,
            },
            PlannedTactic {
                monster: MonsterId::new(3),
                level: 5,
                tactic: Tactic::AreaAttack {
                    targets: vec![AdventurerId::new(0)],
                },
            },
            PlannedTactic {
                monster: MonsterId::new(0),
                level: 1,
                tactic: Tactic::Wait,
            },
        ];

        execution_order(&mut plans);
        let order: Vec<u32> = plans.iter().map(|plan| plan.monster.get()).collect();
        assert_eq!(order, vec![3, 2, 0, 1]);
    }
}
