use std::collections::BTreeSet;

use lair_defence_core::{
    AdventurerClass, AdventurerId, AdventurerSnapshot, Cell, CellCoord, DamageKind, MonsterId,
};
use lair_defence_system_pathfinding::PathFinder;
use lair_defence_world::{query, Grid};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::chance::{roll, MistakeModel};
use crate::damage::{strike, AttackOutcome, DamageOutcome, Mitigation};
use crate::tables::{level_scale, ClassProfile};

const HEALTH_PER_LEVEL: f64 = 0.15;
const DAMAGE_PER_LEVEL: f64 = 0.10;
const REWARD_PER_LEVEL: f64 = 0.20;
const EVOLVED_STATS: f64 = 1.25;
const EVOLVED_REWARD: f64 = 1.5;

/// What an adventurer intends to do with its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Fight a monster on the planned route within attack range.
    Engage {
        /// Monster to fight.
        monster: MonsterId,
        /// Cell the monster guards.
        cell: CellCoord,
        /// Route steps between the adventurer and the monster.
        distance: u32,
    },
    /// Enter an adjacent cell.
    Step {
        /// Cell to enter.
        target: CellCoord,
        /// The step is a random wander rather than the planned route.
        mistake: bool,
    },
    /// Hesitate for a turn.
    StandStill,
    /// No route to the boss exists from the current cell.
    NoRoute,
}

/// A member of the raiding party.
#[derive(Clone, Debug)]
pub struct Adventurer {
    id: AdventurerId,
    class: AdventurerClass,
    level: u32,
    evolved: bool,
    position: CellCoord,
    health: u32,
    max_health: u32,
    damage: u32,
    defense: u32,
    profile: ClassProfile,
    heal_cooldown: u32,
    route: Vec<CellCoord>,
    visited: BTreeSet<CellCoord>,
}

impl Adventurer {
    /// Creates an adventurer with the class's table values.
    #[must_use]
    pub fn new(id: AdventurerId, class: AdventurerClass, level: u32, position: CellCoord) -> Self {
        Self::from_profile(id, class, level, position, ClassProfile::for_class(class))
    }

    /// Creates an adventurer from explicit profile values.
    #[must_use]
    pub fn from_profile(
        id: AdventurerId,
        class: AdventurerClass,
        level: u32,
        position: CellCoord,
        profile: ClassProfile,
    ) -> Self {
        let level = level.max(1);
        let max_health = scaled(profile.health, level_scale(level, HEALTH_PER_LEVEL)).max(1);
        let mut visited = BTreeSet::new();
        let _ = visited.insert(position);

        Self {
            id,
            class,
            level,
            evolved: false,
            position,
            health: max_health,
            max_health,
            damage: scaled(profile.damage, level_scale(level, DAMAGE_PER_LEVEL)),
            defense: profile.defense + (level - 1) / 2,
            profile,
            heal_cooldown: 0,
            route: Vec::new(),
            visited,
        }
    }

    /// Marks the adventurer as evolved, boosting health, damage and reward.
    #[must_use]
    pub fn evolved(mut self) -> Self {
        if !self.evolved {
            self.evolved = true;
            self.max_health = scaled(self.max_health, EVOLVED_STATS);
            self.health = self.max_health;
            self.damage = scaled(self.damage, EVOLVED_STATS);
        }
        self
    }

    /// Identifier of the adventurer.
    #[must_use]
    pub const fn id(&self) -> AdventurerId {
        self.id
    }

    /// Class of the adventurer.
    #[must_use]
    pub const fn class(&self) -> AdventurerClass {
        self.class
    }

    /// Experience level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Whether the adventurer is evolved.
    #[must_use]
    pub const fn is_evolved(&self) -> bool {
        self.evolved
    }

    /// Cell currently occupied.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Damage of a regular attack before modifiers.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Flat armor.
    #[must_use]
    pub const fn defense(&self) -> u32 {
        self.defense
    }

    /// Class parameters the adventurer was built from.
    #[must_use]
    pub const fn profile(&self) -> &ClassProfile {
        &self.profile
    }

    /// Whether the adventurer has fallen.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Remaining health as a fraction of maximum health.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        f64::from(self.health) / f64::from(self.max_health.max(1))
    }

    /// Route steps at which monsters can be engaged.
    #[must_use]
    pub const fn attack_range(&self) -> u32 {
        self.profile.attack_range
    }

    /// Cached route from the current position, empty when stale.
    #[must_use]
    pub fn route(&self) -> &[CellCoord] {
        &self.route
    }

    /// Cells the adventurer has occupied.
    #[must_use]
    pub fn visited(&self) -> &BTreeSet<CellCoord> {
        &self.visited
    }

    /// Read-only copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> AdventurerSnapshot {
        AdventurerSnapshot {
            id: self.id,
            class: self.class,
            level: self.level,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            is_dead: self.is_dead(),
        }
    }

    /// Moves the adventurer, invalidating its cached route.
    pub fn set_position(&mut self, cell: CellCoord) {
        if cell != self.position {
            self.position = cell;
            self.route.clear();
        }
        let _ = self.visited.insert(cell);
    }

    /// Chooses the adventurer's next action.
    ///
    /// With the model's error chance the adventurer either hesitates or
    /// wanders to a random traversable neighbour, preferring cells it has not
    /// visited yet. Otherwise it follows its cached route toward the boss,
    /// engaging the first monster on the route within attack range.
    pub fn decide_next_action<R>(
        &mut self,
        grid: &Grid,
        finder: &mut PathFinder,
        mistakes: &MistakeModel,
        day: u32,
        rng: &mut R,
    ) -> Decision
    where
        R: Rng + ?Sized,
    {
        if roll(rng, mistakes.error_chance(self.level, day)) {
            return self.blunder(grid, mistakes, rng);
        }

        if self.route.first() != Some(&self.position) {
            self.route = finder
                .find_path(grid, self.position, grid.boss(), Some(self.class))
                .unwrap_or_default();
            debug!(
                adventurer = self.id.get(),
                class = self.class.name(),
                from = %self.position,
                steps = self.route.len().saturating_sub(1),
                "route planned"
            );
        }

        let Some(&next) = self.route.get(1) else {
            return Decision::NoRoute;
        };

        let reach = usize::try_from(self.attack_range().max(1)).unwrap_or(1);
        for (distance, cell) in self.route.iter().enumerate().skip(1).take(reach) {
            if let Some(Cell::Monster(monster)) = grid.get_cell(*cell) {
                return Decision::Engage {
                    monster,
                    cell: *cell,
                    distance: u32::try_from(distance).unwrap_or(u32::MAX),
                };
            }
        }

        Decision::Step {
            target: next,
            mistake: false,
        }
    }

    fn blunder<R>(&self, grid: &Grid, mistakes: &MistakeModel, rng: &mut R) -> Decision
    where
        R: Rng + ?Sized,
    {
        if roll(rng, mistakes.stand_still_share) {
            debug!(adventurer = self.id.get(), "hesitates");
            return Decision::StandStill;
        }

        let neighbors = query::traversable_neighbors(grid, self.position);
        let fresh: Vec<CellCoord> = neighbors
            .iter()
            .copied()
            .filter(|cell| !self.visited.contains(cell))
            .collect();
        let pool = if fresh.is_empty() { &neighbors } else { &fresh };

        match pool.choose(rng) {
            Some(&target) => {
                debug!(adventurer = self.id.get(), %target, "wanders off route");
                Decision::Step {
                    target,
                    mistake: true,
                }
            }
            None => Decision::StandStill,
        }
    }

    /// Rolls a regular attack.
    pub fn attack<R>(&self, rng: &mut R) -> AttackOutcome
    where
        R: Rng + ?Sized,
    {
        let (kind, power) = if self.profile.magic_attack {
            (DamageKind::Magic, self.profile.magic_power)
        } else {
            (DamageKind::Physical, 1.0)
        };
        let (damage, is_critical) = strike(
            rng,
            f64::from(self.damage) * power,
            self.profile.crit_chance,
            self.profile.crit_multiplier,
        );
        let effects = self
            .profile
            .on_hit
            .and_then(|on_hit| on_hit.roll(rng))
            .into_iter()
            .collect();

        AttackOutcome {
            damage,
            kind,
            is_critical,
            effects,
        }
    }

    /// Mitigates and applies incoming damage.
    pub fn take_damage<R>(&mut self, rng: &mut R, amount: u32, kind: DamageKind) -> DamageOutcome
    where
        R: Rng + ?Sized,
    {
        let mitigation = Mitigation {
            evasion: self.profile.evasion,
            physical_multiplier: self.profile.physical_multiplier,
            magic_multiplier: self.profile.magic_multiplier,
            armor: self.defense,
            damage_reduction: self.profile.damage_reduction,
            survival_chance: self.profile.last_stand,
        };
        mitigation.resolve(rng, &mut self.health, amount, kind)
    }

    /// Applies damage that bypasses mitigation, such as poison.
    pub fn lose_health(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Restores health up to the maximum and returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let restored = amount.min(self.max_health - self.health);
        self.health += restored;
        restored
    }

    /// Whether the healing ability is off cooldown.
    #[must_use]
    pub fn can_heal(&self) -> bool {
        self.profile.heal.is_some() && self.heal_cooldown == 0
    }

    /// Health restored by one heal at the adventurer's level.
    #[must_use]
    pub fn heal_amount(&self) -> u32 {
        self.profile.heal.map_or(0, |heal| {
            scaled(
                heal.amount,
                level_scale(self.level, DAMAGE_PER_LEVEL) * self.profile.magic_power,
            )
        })
    }

    /// Puts the healing ability on cooldown.
    pub fn start_heal_cooldown(&mut self) {
        if let Some(heal) = self.profile.heal {
            self.heal_cooldown = heal.cooldown;
        }
    }

    /// Advances ability cooldowns by one turn.
    pub fn tick_cooldowns(&mut self) {
        self.heal_cooldown = self.heal_cooldown.saturating_sub(1);
    }

    /// Disarm chance against a trap of equal level, if the class can disarm.
    #[must_use]
    pub fn disarm_chance(&self) -> Option<f64> {
        self.profile.disarm.map(|disarm| {
            disarm.base + disarm.per_level * f64::from(self.level.saturating_sub(1))
        })
    }

    /// Gold the defender earns for defeating this adventurer.
    #[must_use]
    pub fn gold_value(&self) -> f64 {
        self.reward_value(self.profile.gold_value)
    }

    /// Experience the defender earns for defeating this adventurer.
    #[must_use]
    pub fn experience_value(&self) -> f64 {
        self.reward_value(self.profile.experience_value)
    }

    fn reward_value(&self, base: u32) -> f64 {
        let evolved = if self.evolved { EVOLVED_REWARD } else { 1.0 };
        f64::from(base) * level_scale(self.level, REWARD_PER_LEVEL) * evolved
    }
}

pub(crate) fn scaled(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).round() as u32
}
