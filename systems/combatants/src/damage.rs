//! Damage mitigation pipeline shared by adventurers and monsters.

use lair_defence_core::{AppliedEffect, DamageKind};
use rand::Rng;

use crate::chance::roll;

/// Result of an offensive action before the target mitigates it.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackOutcome {
    /// Raw damage carried by the attack.
    pub damage: u32,
    /// Channel the damage travels through.
    pub kind: DamageKind,
    /// Whether the critical roll succeeded.
    pub is_critical: bool,
    /// Status effects the attack tries to apply on hit.
    pub effects: Vec<AppliedEffect>,
}

/// Result of [`Mitigation::resolve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Health actually lost.
    pub damage: u32,
    /// The hit was dodged entirely.
    pub evaded: bool,
    /// Health reached zero.
    pub is_dead: bool,
    /// A survival ability kept the target at one health.
    pub survived: bool,
}

/// Defensive parameters applied to incoming damage, in pipeline order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mitigation {
    /// Chance to negate the hit.
    pub evasion: f64,
    /// Multiplier applied to physical damage.
    pub physical_multiplier: f64,
    /// Multiplier applied to magic damage.
    pub magic_multiplier: f64,
    /// Flat reduction after the kind multiplier.
    pub armor: u32,
    /// General multiplier applied after armor.
    pub damage_reduction: f64,
    /// Chance to stay at one health when a hit would be lethal.
    pub survival_chance: f64,
}

impl Mitigation {
    /// Applies the pipeline to `amount` and subtracts the result from
    /// `health`.
    ///
    /// Order: evasion, kind multiplier, armor (never below one while armor is
    /// present), damage reduction, survival override.
    pub fn resolve<R>(
        &self,
        rng: &mut R,
        health: &mut u32,
        amount: u32,
        kind: DamageKind,
    ) -> DamageOutcome
    where
        R: Rng + ?Sized,
    {
        if amount == 0 || *health == 0 {
            return DamageOutcome {
                is_dead: *health == 0,
                ..DamageOutcome::default()
            };
        }

        if roll(rng, self.evasion) {
            return DamageOutcome {
                evaded: true,
                ..DamageOutcome::default()
            };
        }

        let multiplier = match kind {
            DamageKind::Physical => self.physical_multiplier,
            DamageKind::Magic => self.magic_multiplier,
        };
        let mut value = f64::from(amount) * multiplier.max(0.0);
        if self.armor > 0 {
            value = (value - f64::from(self.armor)).max(1.0);
        }
        value *= self.damage_reduction.max(0.0);

        let mut dealt = (value.round() as u32).min(*health);
        let mut survived = false;
        if dealt == *health && roll(rng, self.survival_chance) {
            dealt = health.saturating_sub(1);
            survived = true;
        }

        *health -= dealt;
        DamageOutcome {
            damage: dealt,
            evaded: false,
            is_dead: *health == 0,
            survived,
        }
    }
}

/// Applies a critical roll to `base` and rounds the result.
pub(crate) fn strike<R>(
    rng: &mut R,
    base: f64,
    crit_chance: f64,
    crit_multiplier: f64,
) -> (u32, bool)
where
    R: Rng + ?Sized,
{
    let is_critical = roll(rng, crit_chance);
    let value = if is_critical {
        base * crit_multiplier
    } else {
        base
    };
    ((value.max(0.0).round() as u32).max(1), is_critical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plain() -> Mitigation {
        Mitigation {
            evasion: 0.0,
            physical_multiplier: 1.0,
            magic_multiplier: 1.0,
            armor: 0,
            damage_reduction: 1.0,
            survival_chance: 0.0,
        }
    }

    #[test]
    fn armor_never_reduces_a_hit_below_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut health = 30;
        let armored = Mitigation { armor: 10, ..plain() };

        let outcome = armored.resolve(&mut rng, &mut health, 4, DamageKind::Physical);
        assert_eq!(outcome.damage, 1);
        assert_eq!(health, 29);
    }

    #[test]
    fn unarmored_targets_have_no_damage_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut health = 30;
        let immune = Mitigation {
            physical_multiplier: 0.0,
            ..plain()
        };

        let outcome = immune.resolve(&mut rng, &mut health, 12, DamageKind::Physical);
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.is_dead);
        assert_eq!(health, 30);

        let warded = Mitigation {
            damage_reduction: 0.2,
            ..plain()
        };
        let outcome = warded.resolve(&mut rng, &mut health, 2, DamageKind::Magic);
        assert_eq!(outcome.damage, 0);
        assert_eq!(health, 30);
    }

    #[test]
    fn kind_multiplier_applies_before_armor_and_reduction() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut health = 100;
        let weak_to_magic = Mitigation {
            magic_multiplier: 1.5,
            armor: 2,
            damage_reduction: 0.5,
            ..plain()
        };

        let outcome = weak_to_magic.resolve(&mut rng, &mut health, 10, DamageKind::Magic);
        assert_eq!(outcome.damage, 7);
        assert_eq!(health, 93);

        let outcome = weak_to_magic.resolve(&mut rng, &mut health, 10, DamageKind::Physical);
        assert_eq!(outcome.damage, 4);
    }

    #[test]
    fn evasion_negates_everything() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut health = 5;
        let nimble = Mitigation { evasion: 1.0, ..plain() };

        let outcome = nimble.resolve(&mut rng, &mut health, 50, DamageKind::Physical);
        assert!(outcome.evaded);
        assert_eq!(outcome.damage, 0);
        assert_eq!(health, 5);
    }

    #[test]
    fn survival_override_clamps_lethal_hits_to_one_health() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut health = 8;
        let stubborn = Mitigation { survival_chance: 1.0, ..plain() };

        let outcome = stubborn.resolve(&mut rng, &mut health, 50, DamageKind::Physical);
        assert!(outcome.survived);
        assert!(!outcome.is_dead);
        assert_eq!(health, 1);

        let mut health = 8;
        let outcome = plain().resolve(&mut rng, &mut health, 50, DamageKind::Physical);
        assert!(outcome.is_dead);
        assert_eq!(outcome.damage, 8);
    }

    #[test]
    fn critical_strikes_scale_the_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(strike(&mut rng, 10.0, 1.0, 1.5), (15, true));
        assert_eq!(strike(&mut rng, 10.4, 0.0, 1.5), (10, false));
    }
}
