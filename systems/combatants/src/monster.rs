use lair_defence_core::{CellCoord, DamageKind, MonsterId, MonsterKind, MonsterSnapshot, ZoneKind};
use rand::Rng;

use crate::adventurer::scaled;
use crate::damage::{strike, AttackOutcome, DamageOutcome, Mitigation};
use crate::tables::{level_scale, KindProfile};

const HEALTH_PER_LEVEL: f64 = 0.15;
const DAMAGE_PER_LEVEL: f64 = 0.10;
const EVOLVED_STATS: f64 = 1.25;
const BRACED_REDUCTION: f64 = 0.5;

/// A defender placed on the grid.
#[derive(Clone, Debug)]
pub struct Monster {
    id: MonsterId,
    kind: MonsterKind,
    level: u32,
    evolved: bool,
    position: CellCoord,
    health: u32,
    max_health: u32,
    damage: u32,
    defense: u32,
    profile: KindProfile,
    cooldown: u32,
    special_cooldown: u32,
    bracing: bool,
    summons: u32,
}

impl Monster {
    /// Creates a monster at its kind's base level.
    #[must_use]
    pub fn new(id: MonsterId, kind: MonsterKind, position: CellCoord) -> Self {
        let profile = KindProfile::for_kind(kind);
        Self::from_profile(id, kind, profile.base_level, position, profile)
    }

    /// Creates a monster of the given level with the kind's table values.
    #[must_use]
    pub fn with_level(id: MonsterId, kind: MonsterKind, level: u32, position: CellCoord) -> Self {
        Self::from_profile(id, kind, level, position, KindProfile::for_kind(kind))
    }

    /// Creates a monster from explicit profile values. Stats scale with the
    /// levels above the profile's base level.
    #[must_use]
    pub fn from_profile(
        id: MonsterId,
        kind: MonsterKind,
        level: u32,
        position: CellCoord,
        profile: KindProfile,
    ) -> Self {
        let level = level.max(1);
        let above_base = level.saturating_sub(profile.base_level);
        let max_health =
            scaled(profile.health, level_scale(above_base + 1, HEALTH_PER_LEVEL)).max(1);

        Self {
            id,
            kind,
            level,
            evolved: false,
            position,
            health: max_health,
            max_health,
            damage: scaled(profile.damage, level_scale(above_base + 1, DAMAGE_PER_LEVEL)),
            defense: profile.defense + above_base / 2,
            profile,
            cooldown: 0,
            special_cooldown: 0,
            bracing: false,
            summons: 0,
        }
    }

    /// Marks the monster as evolved, boosting health and damage.
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

    /// Identifier of the monster.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Archetype of the monster.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Monster level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Whether the monster is evolved.
    #[must_use]
    pub const fn is_evolved(&self) -> bool {
        self.evolved
    }

    /// Cell the monster guards.
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

    /// Flat armor before zone bonuses.
    #[must_use]
    pub const fn defense(&self) -> u32 {
        self.defense
    }

    /// Kind parameters the monster was built from.
    #[must_use]
    pub const fn profile(&self) -> &KindProfile {
        &self.profile
    }

    /// Whether the monster has fallen.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Remaining health as a fraction of maximum health.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        f64::from(self.health) / f64::from(self.max_health.max(1))
    }

    /// Maximum distance of a regular attack.
    #[must_use]
    pub const fn attack_range(&self) -> u32 {
        self.profile.attack_range
    }

    /// Turns until the next regular attack.
    #[must_use]
    pub const fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Turns until the next special ability.
    #[must_use]
    pub const fn special_cooldown(&self) -> u32 {
        self.special_cooldown
    }

    /// Whether the monster is bracing against incoming damage.
    #[must_use]
    pub const fn is_bracing(&self) -> bool {
        self.bracing
    }

    /// Minions raised so far.
    #[must_use]
    pub const fn summons(&self) -> u32 {
        self.summons
    }

    /// Read-only copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> MonsterSnapshot {
        MonsterSnapshot {
            id: self.id,
            kind: self.kind,
            level: self.level,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
        }
    }

    /// Whether a regular attack is off cooldown.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.cooldown == 0
    }

    /// Rolls a regular attack and puts it on cooldown.
    pub fn attack<R>(&mut self, rng: &mut R, zone: Option<ZoneKind>) -> AttackOutcome
    where
        R: Rng + ?Sized,
    {
        let kind = if self.profile.magic_attack {
            DamageKind::Magic
        } else {
            DamageKind::Physical
        };
        let (damage, is_critical) = strike(
            rng,
            f64::from(self.damage) * zone_multiplier(zone),
            self.profile.crit_chance,
            self.profile.crit_multiplier,
        );
        let effects = self
            .profile
            .on_hit
            .and_then(|on_hit| on_hit.roll(rng))
            .into_iter()
            .collect();
        self.cooldown = self.profile.attack_speed;

        AttackOutcome {
            damage,
            kind,
            is_critical,
            effects,
        }
    }

    /// Whether the area attack is available.
    #[must_use]
    pub const fn area_ready(&self) -> bool {
        self.profile.area_attack.is_some() && self.special_cooldown == 0
    }

    /// Reach of the area attack, zero when the kind has none.
    #[must_use]
    pub fn area_range(&self) -> u32 {
        self.profile.area_attack.map_or(0, |area| area.range)
    }

    /// Rolls one area-attack hit per target and puts the ability on cooldown.
    pub fn area_attack<R>(
        &mut self,
        rng: &mut R,
        zone: Option<ZoneKind>,
        targets: usize,
    ) -> Vec<AttackOutcome>
    where
        R: Rng + ?Sized,
    {
        let Some(area) = self.profile.area_attack else {
            return Vec::new();
        };

        let base = f64::from(self.damage) * area.damage_multiplier * zone_multiplier(zone);
        let hits = (0..targets)
            .map(|_| AttackOutcome {
                damage: (base.round() as u32).max(1),
                kind: area.kind,
                is_critical: false,
                effects: area.on_hit.and_then(|on_hit| on_hit.roll(rng)).into_iter().collect(),
            })
            .collect();

        self.special_cooldown = area.cooldown;
        self.cooldown = self.profile.attack_speed;
        hits
    }

    /// Whether the monster is hurt enough and ready to regenerate.
    #[must_use]
    pub fn can_regenerate(&self) -> bool {
        !self.is_dead()
            && self.special_cooldown == 0
            && self
                .profile
                .regeneration
                .is_some_and(|regeneration| self.health_fraction() < regeneration.threshold)
    }

    /// Restores a fraction of maximum health and puts the ability on cooldown.
    pub fn regenerate(&mut self) -> u32 {
        let Some(regeneration) = self.profile.regeneration else {
            return 0;
        };
        self.special_cooldown = regeneration.cooldown;
        let amount = scaled(self.max_health, regeneration.fraction).max(1);
        self.heal(amount)
    }

    /// Whether the monster wants to brace this turn.
    #[must_use]
    pub fn wants_to_brace(&self) -> bool {
        !self.is_dead()
            && self
                .profile
                .brace_below
                .is_some_and(|threshold| self.health_fraction() < threshold)
    }

    /// Halves incoming damage until the monster's next phase.
    pub fn brace(&mut self) {
        self.bracing = true;
    }

    /// Whether the monster may raise another minion now.
    #[must_use]
    pub fn summon_ready(&self) -> bool {
        self.special_cooldown == 0
            && self
                .profile
                .summon
                .is_some_and(|summon| self.summons < summon.max_summons)
    }

    /// Records a raised minion and puts the ability on cooldown.
    pub fn record_summon(&mut self) {
        if let Some(summon) = self.profile.summon {
            self.summons += 1;
            self.special_cooldown = summon.cooldown;
        }
    }

    /// Start-of-phase bookkeeping: drops the brace and, unless a slow holds
    /// it back, advances both cooldowns.
    pub fn recover(&mut self, held_back: bool) {
        self.bracing = false;
        if !held_back {
            self.cooldown = self.cooldown.saturating_sub(1);
            self.special_cooldown = self.special_cooldown.saturating_sub(1);
        }
    }

    /// Mitigates and applies incoming damage.
    pub fn take_damage<R>(
        &mut self,
        rng: &mut R,
        amount: u32,
        kind: DamageKind,
        zone: Option<ZoneKind>,
    ) -> DamageOutcome
    where
        R: Rng + ?Sized,
    {
        let mitigation = Mitigation {
            evasion: self.profile.evasion,
            physical_multiplier: self.profile.physical_multiplier,
            magic_multiplier: self.profile.magic_multiplier,
            armor: self.defense + zone.map_or(0, ZoneKind::defense_bonus),
            damage_reduction: if self.bracing { BRACED_REDUCTION } else { 1.0 },
            survival_chance: self.profile.undead_resilience,
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
}

fn zone_multiplier(zone: Option<ZoneKind>) -> f64 {
    zone.map_or(1.0, ZoneKind::damage_multiplier)
}
