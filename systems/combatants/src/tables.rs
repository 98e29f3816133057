//! Archetype behaviour tables.
//!
//! Every archetype maps to a plain parameter struct plus a handful of
//! optional abilities. Adding an archetype means adding a table row, not a
//! new code path.

use lair_defence_core::{
    AdventurerClass, AppliedEffect, DamageKind, MonsterKind, StatusEffectKind, TrapEffect, TrapKind,
};
use rand::Rng;

use crate::chance::roll;

/// Status effect an attack may apply on hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OnHit {
    /// Probability that the effect lands.
    pub chance: f64,
    /// Effect applied when it lands.
    pub effect: AppliedEffect,
}

impl OnHit {
    const fn new(chance: f64, kind: StatusEffectKind, duration: u32, magnitude: f64) -> Self {
        Self {
            chance,
            effect: AppliedEffect::new(kind, duration, magnitude),
        }
    }

    /// Rolls the effect.
    pub fn roll<R>(&self, rng: &mut R) -> Option<AppliedEffect>
    where
        R: Rng + ?Sized,
    {
        roll(rng, self.chance).then_some(self.effect)
    }
}

/// Cleric healing ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealAbility {
    /// Health restored at level one.
    pub amount: u32,
    /// Maximum Manhattan distance to the ally.
    pub range: u32,
    /// Allies below this health fraction are eligible.
    pub threshold: f64,
    /// Turns between heals.
    pub cooldown: u32,
}

/// Rogue trap disarming ability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisarmAbility {
    /// Chance at level one against a trap of equal level.
    pub base: f64,
    /// Bonus per adventurer level above one.
    pub per_level: f64,
}

/// Numeric parameters of an adventurer class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassProfile {
    /// Level-one health.
    pub health: u32,
    /// Level-one damage.
    pub damage: u32,
    /// Level-one armor.
    pub defense: u32,
    /// Chance to dodge a hit.
    pub evasion: f64,
    /// Chance to land a critical strike.
    pub crit_chance: f64,
    /// Damage multiplier of a critical strike.
    pub crit_multiplier: f64,
    /// Attack travels as magic.
    pub magic_attack: bool,
    /// Damage multiplier applied to magic attacks.
    pub magic_power: f64,
    /// Distance in route steps at which monsters can be engaged.
    pub attack_range: u32,
    /// Multiplier on incoming physical damage.
    pub physical_multiplier: f64,
    /// Multiplier on incoming magic damage.
    pub magic_multiplier: f64,
    /// General incoming damage multiplier.
    pub damage_reduction: f64,
    /// Chance to survive a lethal hit at one health.
    pub last_stand: f64,
    /// Effect applied by the class's attacks.
    pub on_hit: Option<OnHit>,
    /// Ability to heal allies.
    pub heal: Option<HealAbility>,
    /// Ability to disarm traps.
    pub disarm: Option<DisarmAbility>,
    /// Gold awarded for defeating a level-one adventurer.
    pub gold_value: u32,
    /// Experience awarded for defeating a level-one adventurer.
    pub experience_value: u32,
}

impl ClassProfile {
    /// Table row for `class`.
    #[must_use]
    pub const fn for_class(class: AdventurerClass) -> Self {
        match class {
            AdventurerClass::Warrior => Self {
                health: 120,
                damage: 12,
                defense: 4,
                evasion: 0.05,
                crit_chance: 0.10,
                crit_multiplier: 1.5,
                magic_attack: false,
                magic_power: 1.0,
                attack_range: 1,
                physical_multiplier: 1.0,
                magic_multiplier: 1.1,
                damage_reduction: 0.9,
                last_stand: 0.15,
                on_hit: Some(OnHit::new(0.15, StatusEffectKind::Stunned, 1, 0.0)),
                heal: None,
                disarm: None,
                gold_value: 30,
                experience_value: 20,
            },
            AdventurerClass::Rogue => Self {
                health: 80,
                damage: 10,
                defense: 2,
                evasion: 0.20,
                crit_chance: 0.25,
                crit_multiplier: 2.0,
                magic_attack: false,
                magic_power: 1.0,
                attack_range: 1,
                physical_multiplier: 1.0,
                magic_multiplier: 1.0,
                damage_reduction: 1.0,
                last_stand: 0.0,
                on_hit: Some(OnHit::new(0.3, StatusEffectKind::Poisoned, 3, 2.0)),
                heal: None,
                disarm: Some(DisarmAbility {
                    base: 0.4,
                    per_level: 0.05,
                }),
                gold_value: 35,
                experience_value: 25,
            },
            AdventurerClass::Mage => Self {
                health: 60,
                damage: 14,
                defense: 1,
                evasion: 0.05,
                crit_chance: 0.10,
                crit_multiplier: 1.5,
                magic_attack: true,
                magic_power: 1.4,
                attack_range: 2,
                physical_multiplier: 1.2,
                magic_multiplier: 0.7,
                damage_reduction: 1.0,
                last_stand: 0.0,
                on_hit: Some(OnHit::new(0.25, StatusEffectKind::Burning, 2, 3.0)),
                heal: None,
                disarm: None,
                gold_value: 40,
                experience_value: 30,
            },
            AdventurerClass::Archer => Self {
                health: 70,
                damage: 11,
                defense: 2,
                evasion: 0.15,
                crit_chance: 0.20,
                crit_multiplier: 1.75,
                magic_attack: false,
                magic_power: 1.0,
                attack_range: 2,
                physical_multiplier: 1.0,
                magic_multiplier: 1.0,
                damage_reduction: 1.0,
                last_stand: 0.0,
                on_hit: Some(OnHit::new(0.2, StatusEffectKind::Slowed, 2, 0.5)),
                heal: None,
                disarm: None,
                gold_value: 35,
                experience_value: 25,
            },
            AdventurerClass::Cleric => Self {
                health: 90,
                damage: 8,
                defense: 3,
                evasion: 0.05,
                crit_chance: 0.05,
                crit_multiplier: 1.5,
                magic_attack: true,
                magic_power: 1.2,
                attack_range: 1,
                physical_multiplier: 1.0,
                magic_multiplier: 0.8,
                damage_reduction: 0.95,
                last_stand: 0.0,
                on_hit: None,
                heal: Some(HealAbility {
                    amount: 15,
                    range: 2,
                    threshold: 0.5,
                    cooldown: 3,
                }),
                disarm: None,
                gold_value: 45,
                experience_value: 30,
            },
        }
    }
}

/// Self-heal used by regenerating monsters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regeneration {
    /// Health fraction below which the monster regenerates.
    pub threshold: f64,
    /// Fraction of maximum health restored.
    pub fraction: f64,
    /// Turns between regenerations.
    pub cooldown: u32,
}

/// Attack that hits every adventurer within range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaAttack {
    /// Maximum Manhattan distance to a target.
    pub range: u32,
    /// Multiplier applied to the monster's damage.
    pub damage_multiplier: f64,
    /// Channel of the area damage.
    pub kind: DamageKind,
    /// Effect rolled separately for every target.
    pub on_hit: Option<OnHit>,
    /// Turns between uses.
    pub cooldown: u32,
}

/// Ability to raise minions on adjacent corridor cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SummonAbility {
    /// Archetype of the minion.
    pub minion: MonsterKind,
    /// Turns between summons.
    pub cooldown: u32,
    /// Lifetime cap on minions raised by one monster.
    pub max_summons: u32,
}

/// Numeric parameters of a monster kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindProfile {
    /// Health at the kind's base level.
    pub health: u32,
    /// Damage at the kind's base level.
    pub damage: u32,
    /// Armor at the kind's base level.
    pub defense: u32,
    /// Level the table values describe.
    pub base_level: u32,
    /// Turns between regular attacks.
    pub attack_speed: u32,
    /// Maximum Manhattan distance of a regular attack.
    pub attack_range: u32,
    /// Regular attacks travel as magic.
    pub magic_attack: bool,
    /// Chance to dodge a hit.
    pub evasion: f64,
    /// Chance to land a critical strike.
    pub crit_chance: f64,
    /// Damage multiplier of a critical strike.
    pub crit_multiplier: f64,
    /// Multiplier on incoming physical damage.
    pub physical_multiplier: f64,
    /// Multiplier on incoming magic damage.
    pub magic_multiplier: f64,
    /// Chance that undead resilience keeps the monster at one health.
    pub undead_resilience: f64,
    /// Effect applied by regular attacks.
    pub on_hit: Option<OnHit>,
    /// Health fraction below which the monster braces.
    pub brace_below: Option<f64>,
    /// Self-heal ability.
    pub regeneration: Option<Regeneration>,
    /// Area attack ability.
    pub area_attack: Option<AreaAttack>,
    /// Minion summoning ability.
    pub summon: Option<SummonAbility>,
}

impl KindProfile {
    /// Table row for `kind`.
    #[must_use]
    pub const fn for_kind(kind: MonsterKind) -> Self {
        let base = Self {
            health: 0,
            damage: 0,
            defense: 0,
            base_level: 1,
            attack_speed: 1,
            attack_range: 1,
            magic_attack: false,
            evasion: 0.0,
            crit_chance: 0.0,
            crit_multiplier: 1.5,
            physical_multiplier: 1.0,
            magic_multiplier: 1.0,
            undead_resilience: 0.0,
            on_hit: None,
            brace_below: None,
            regeneration: None,
            area_attack: None,
            summon: None,
        };

        match kind {
            MonsterKind::Slime => Self {
                health: 20,
                damage: 4,
                physical_multiplier: 0.9,
                magic_multiplier: 1.1,
                on_hit: Some(OnHit::new(0.25, StatusEffectKind::Slowed, 1, 0.5)),
                regeneration: Some(Regeneration {
                    threshold: 0.3,
                    fraction: 0.25,
                    cooldown: 3,
                }),
                ..base
            },
            MonsterKind::Goblin => Self {
                health: 30,
                damage: 7,
                defense: 1,
                evasion: 0.1,
                crit_chance: 0.1,
                brace_below: Some(0.3),
                ..base
            },
            MonsterKind::Skeleton => Self {
                health: 35,
                damage: 8,
                defense: 2,
                base_level: 2,
                physical_multiplier: 0.8,
                magic_multiplier: 1.5,
                undead_resilience: 0.3,
                ..base
            },
            MonsterKind::Orc => Self {
                health: 55,
                damage: 12,
                defense: 3,
                base_level: 3,
                crit_chance: 0.15,
                crit_multiplier: 1.75,
                on_hit: Some(OnHit::new(0.1, StatusEffectKind::Stunned, 1, 0.0)),
                ..base
            },
            MonsterKind::Troll => Self {
                health: 80,
                damage: 14,
                defense: 3,
                base_level: 4,
                attack_speed: 2,
                regeneration: Some(Regeneration {
                    threshold: 0.4,
                    fraction: 0.2,
                    cooldown: 2,
                }),
                ..base
            },
            MonsterKind::Golem => Self {
                health: 110,
                damage: 15,
                defense: 6,
                base_level: 5,
                attack_speed: 2,
                physical_multiplier: 0.7,
                magic_multiplier: 1.2,
                area_attack: Some(AreaAttack {
                    range: 2,
                    damage_multiplier: 0.8,
                    kind: DamageKind::Physical,
                    on_hit: Some(OnHit::new(0.3, StatusEffectKind::Stunned, 1, 0.0)),
                    cooldown: 3,
                }),
                ..base
            },
            MonsterKind::Lich => Self {
                health: 70,
                damage: 13,
                defense: 2,
                base_level: 6,
                attack_range: 2,
                magic_attack: true,
                magic_multiplier: 0.7,
                undead_resilience: 0.25,
                summon: Some(SummonAbility {
                    minion: MonsterKind::Skeleton,
                    cooldown: 4,
                    max_summons: 2,
                }),
                ..base
            },
            MonsterKind::Dragon => Self {
                health: 160,
                damage: 20,
                defense: 5,
                base_level: 8,
                attack_speed: 2,
                attack_range: 2,
                crit_chance: 0.1,
                physical_multiplier: 0.9,
                magic_multiplier: 0.8,
                area_attack: Some(AreaAttack {
                    range: 2,
                    damage_multiplier: 1.0,
                    kind: DamageKind::Magic,
                    on_hit: Some(OnHit::new(1.0, StatusEffectKind::Burning, 3, 4.0)),
                    cooldown: 3,
                }),
                ..base
            },
        }
    }

    /// Whether the kind has any ability that competes for its special cooldown.
    #[must_use]
    pub const fn has_special(&self) -> bool {
        self.regeneration.is_some() || self.area_attack.is_some() || self.summon.is_some()
    }
}

/// Numeric parameters of a trap kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrapProfile {
    /// Effect bundle produced when the trap fires.
    pub effect: TrapEffect,
    /// Damage at level one.
    pub damage: u32,
    /// Channel of the trap's damage.
    pub damage_kind: DamageKind,
    /// Activations before the trap is spent.
    pub uses: u32,
    /// Turns a triggered trap waits before it may rearm.
    pub rearm_time: u32,
    /// Chance that stepping on the armed trap sets it off.
    pub trigger_chance: f64,
    /// Chance per turn to rearm once the wait is over, at level one.
    pub reset_chance: f64,
    /// Status effect applied to the victim, if any.
    pub status: Option<AppliedEffect>,
    /// Radius of area traps.
    pub area_radius: u32,
    /// Radius within which drain traps heal monsters.
    pub drain_radius: u32,
}

impl TrapProfile {
    /// Table row for `kind`.
    #[must_use]
    pub const fn for_kind(kind: TrapKind) -> Self {
        let base = Self {
            effect: TrapEffect::Damage,
            damage: 0,
            damage_kind: DamageKind::Physical,
            uses: 1,
            rearm_time: 2,
            trigger_chance: 0.9,
            reset_chance: 0.6,
            status: None,
            area_radius: 0,
            drain_radius: 0,
        };

        match kind {
            TrapKind::Spike => Self {
                damage: 12,
                uses: 3,
                ..base
            },
            TrapKind::Snare => Self {
                effect: TrapEffect::Trap,
                damage: 4,
                uses: 2,
                rearm_time: 3,
                trigger_chance: 0.85,
                reset_chance: 0.5,
                status: Some(AppliedEffect::new(StatusEffectKind::Trapped, 2, 0.0)),
                ..base
            },
            TrapKind::TarPit => Self {
                effect: TrapEffect::Slow,
                damage: 2,
                uses: 4,
                rearm_time: 1,
                reset_chance: 0.7,
                status: Some(AppliedEffect::new(StatusEffectKind::Slowed, 3, 0.5)),
                ..base
            },
            TrapKind::PoisonDart => Self {
                effect: TrapEffect::Poison,
                damage: 5,
                uses: 3,
                status: Some(AppliedEffect::new(StatusEffectKind::Poisoned, 3, 4.0)),
                ..base
            },
            TrapKind::Explosive => Self {
                effect: TrapEffect::Area,
                damage: 20,
                trigger_chance: 0.95,
                reset_chance: 0.0,
                area_radius: 1,
                ..base
            },
            TrapKind::Boulder => Self {
                effect: TrapEffect::Crush,
                damage: 25,
                rearm_time: 4,
                trigger_chance: 0.8,
                reset_chance: 0.3,
                status: Some(AppliedEffect::new(StatusEffectKind::Stunned, 1, 0.0)),
                ..base
            },
            TrapKind::ArcaneGlyph => Self {
                effect: TrapEffect::Arcane,
                damage: 10,
                damage_kind: DamageKind::Magic,
                uses: 2,
                rearm_time: 3,
                trigger_chance: 0.85,
                reset_chance: 0.5,
                ..base
            },
            TrapKind::LifeDrain => Self {
                effect: TrapEffect::Drain,
                damage: 8,
                damage_kind: DamageKind::Magic,
                uses: 3,
                drain_radius: 2,
                ..base
            },
            TrapKind::SpiritWard => Self {
                effect: TrapEffect::Spiritual,
                damage: 10,
                damage_kind: DamageKind::Magic,
                uses: 2,
                rearm_time: 3,
                trigger_chance: 0.85,
                reset_chance: 0.5,
                status: Some(AppliedEffect::new(StatusEffectKind::Stunned, 1, 0.0)),
                ..base
            },
            TrapKind::FireRune => Self {
                effect: TrapEffect::Rune,
                damage: 8,
                damage_kind: DamageKind::Magic,
                uses: 3,
                status: Some(AppliedEffect::new(StatusEffectKind::Burning, 3, 4.0)),
                ..base
            },
        }
    }
}

/// Effects an arcane glyph picks from, uniformly.
pub const ARCANE_EFFECTS: [AppliedEffect; 4] = [
    AppliedEffect::new(StatusEffectKind::Slowed, 2, 0.5),
    AppliedEffect::new(StatusEffectKind::Stunned, 1, 0.0),
    AppliedEffect::new(StatusEffectKind::Burning, 2, 3.0),
    AppliedEffect::new(StatusEffectKind::Poisoned, 3, 3.0),
];

/// Multiplier that grows `value` by `per_level` for every level above one.
pub(crate) fn level_scale(level: u32, per_level: f64) -> f64 {
    1.0 + per_level * f64::from(level.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_trap_kind_maps_to_its_own_effect_tag() {
        let kinds = [
            (TrapKind::Spike, TrapEffect::Damage),
            (TrapKind::Snare, TrapEffect::Trap),
            (TrapKind::TarPit, TrapEffect::Slow),
            (TrapKind::PoisonDart, TrapEffect::Poison),
            (TrapKind::Explosive, TrapEffect::Area),
            (TrapKind::Boulder, TrapEffect::Crush),
            (TrapKind::ArcaneGlyph, TrapEffect::Arcane),
            (TrapKind::LifeDrain, TrapEffect::Drain),
            (TrapKind::SpiritWard, TrapEffect::Spiritual),
            (TrapKind::FireRune, TrapEffect::Rune),
        ];
        for (kind, effect) in kinds {
            assert_eq!(TrapProfile::for_kind(kind).effect, effect, "{}", kind.name());
        }
    }

    #[test]
    fn only_support_classes_carry_utility_abilities() {
        for class in AdventurerClass::ALL {
            let profile = ClassProfile::for_class(class);
            assert_eq!(profile.heal.is_some(), class == AdventurerClass::Cleric);
            assert_eq!(profile.disarm.is_some(), class == AdventurerClass::Rogue);
            assert_eq!(
                profile.attack_range > 1,
                class.is_ranged_or_caster() && class != AdventurerClass::Cleric
            );
        }
    }

    #[test]
    fn level_scale_starts_at_one() {
        assert_eq!(level_scale(1, 0.15), 1.0);
        assert_eq!(level_scale(0, 0.15), 1.0);
        assert!((level_scale(3, 0.1) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn summoners_raise_skeletons() {
        let lich = KindProfile::for_kind(MonsterKind::Lich);
        assert_eq!(lich.summon.map(|summon| summon.minion), Some(MonsterKind::Skeleton));
        assert!(lich.has_special());
        assert!(!KindProfile::for_kind(MonsterKind::Orc).has_special());
    }
}
