use lair_defence_core::{AppliedEffect, CellCoord, DamageKind, TrapEffect, TrapId, TrapKind};
use rand::Rng;
use tracing::debug;

use crate::adventurer::{scaled, Adventurer};
use crate::chance::roll;
use crate::tables::{level_scale, TrapProfile, ARCANE_EFFECTS};

const DAMAGE_PER_LEVEL: f64 = 0.15;
const RESET_PER_LEVEL: f64 = 0.05;
const DISARM_PER_LEVEL_GAP: f64 = 0.1;
const DISARM_MIN: f64 = 0.05;
const DISARM_MAX: f64 = 0.95;

/// Lifecycle of a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapState {
    /// Ready to fire.
    Armed,
    /// Fired and waiting to rearm.
    Triggered,
    /// Permanently out of action, either spent or disarmed.
    Disarmed,
}

/// What happened when an adventurer stepped onto a trap.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerOutcome {
    /// The trap activated against the adventurer.
    pub success: bool,
    /// A use was consumed by this call.
    pub triggered: bool,
    /// The adventurer disarmed the trap.
    pub disarmed: bool,
    /// Damage dealt to the victim, and to every target of an area trap.
    pub damage: u32,
    /// Channel of the damage.
    pub damage_kind: DamageKind,
    /// Status effects applied to the victim.
    pub effects: Vec<AppliedEffect>,
    /// Radius around the trap that the damage reaches, zero for single-target traps.
    pub area_radius: u32,
    /// Radius within which monsters are healed by half the damage dealt.
    pub drain_radius: u32,
}

impl TriggerOutcome {
    fn inert(damage_kind: DamageKind) -> Self {
        Self {
            success: false,
            triggered: false,
            disarmed: false,
            damage: 0,
            damage_kind,
            effects: Vec::new(),
            area_radius: 0,
            drain_radius: 0,
        }
    }
}

/// A trap rigged on a corridor cell.
#[derive(Clone, Debug)]
pub struct Trap {
    id: TrapId,
    kind: TrapKind,
    level: u32,
    position: CellCoord,
    profile: TrapProfile,
    remaining_uses: u32,
    current_rearm_time: u32,
    state: TrapState,
}

impl Trap {
    /// Creates an armed trap with the kind's table values.
    #[must_use]
    pub fn new(id: TrapId, kind: TrapKind, level: u32, position: CellCoord) -> Self {
        Self::from_profile(id, kind, level, position, TrapProfile::for_kind(kind))
    }

    /// Creates an armed trap from explicit profile values.
    #[must_use]
    pub fn from_profile(
        id: TrapId,
        kind: TrapKind,
        level: u32,
        position: CellCoord,
        profile: TrapProfile,
    ) -> Self {
        Self {
            id,
            kind,
            level: level.max(1),
            position,
            remaining_uses: profile.uses,
            current_rearm_time: 0,
            state: if profile.uses == 0 {
                TrapState::Disarmed
            } else {
                TrapState::Armed
            },
            profile,
        }
    }

    /// Identifier of the trap.
    #[must_use]
    pub const fn id(&self) -> TrapId {
        self.id
    }

    /// Archetype of the trap.
    #[must_use]
    pub const fn kind(&self) -> TrapKind {
        self.kind
    }

    /// Trap level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Cell the trap rigs.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Kind parameters the trap was built from.
    #[must_use]
    pub const fn profile(&self) -> &TrapProfile {
        &self.profile
    }

    /// Activations left.
    #[must_use]
    pub const fn remaining_uses(&self) -> u32 {
        self.remaining_uses
    }

    /// Turns spent waiting to rearm.
    #[must_use]
    pub const fn current_rearm_time(&self) -> u32 {
        self.current_rearm_time
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TrapState {
        self.state
    }

    /// Whether the trap is waiting to rearm.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.state == TrapState::Triggered
    }

    /// Whether the trap is out of action for good.
    #[must_use]
    pub fn is_spent(&self) -> bool {
        self.state == TrapState::Disarmed
    }

    /// Damage the trap deals at its level.
    #[must_use]
    pub fn damage(&self) -> u32 {
        scaled(self.profile.damage, level_scale(self.level, DAMAGE_PER_LEVEL))
    }

    /// Chance that `adventurer` disarms this trap, if it can disarm at all.
    #[must_use]
    pub fn disarm_chance_for(&self, adventurer: &Adventurer) -> Option<f64> {
        adventurer.disarm_chance().map(|chance| {
            let gap = f64::from(self.level) - f64::from(adventurer.level());
            (chance - DISARM_PER_LEVEL_GAP * gap).clamp(DISARM_MIN, DISARM_MAX)
        })
    }

    /// Resolves an adventurer stepping onto the trap.
    ///
    /// A trap that is not armed, or has no uses left, does nothing. Otherwise
    /// an adventurer able to disarm gets one attempt; after that the trigger
    /// chance decides whether the trap fires. Firing consumes one use, and
    /// the last use leaves the trap disarmed.
    pub fn trigger<R>(&mut self, rng: &mut R, adventurer: &Adventurer) -> TriggerOutcome
    where
        R: Rng + ?Sized,
    {
        let mut outcome = TriggerOutcome::inert(self.profile.damage_kind);
        if self.state != TrapState::Armed || self.remaining_uses == 0 {
            return outcome;
        }

        if let Some(chance) = self.disarm_chance_for(adventurer) {
            if roll(rng, chance) {
                self.state = TrapState::Disarmed;
                debug!(trap = self.id.get(), adventurer = adventurer.id().get(), "trap disarmed");
                outcome.disarmed = true;
                return outcome;
            }
        }

        if !roll(rng, self.profile.trigger_chance) {
            return outcome;
        }

        self.remaining_uses -= 1;
        self.current_rearm_time = 0;
        self.state = if self.remaining_uses == 0 {
            TrapState::Disarmed
        } else {
            TrapState::Triggered
        };

        outcome.success = true;
        outcome.triggered = true;
        outcome.damage = self.damage();
        outcome.effects = match self.profile.effect {
            TrapEffect::Arcane => {
                let pick = rng.gen_range(0..ARCANE_EFFECTS.len());
                vec![ARCANE_EFFECTS[pick]]
            }
            _ => self.profile.status.into_iter().collect(),
        };
        if self.profile.effect == TrapEffect::Area {
            outcome.area_radius = self.profile.area_radius;
        }
        if self.profile.effect == TrapEffect::Drain {
            outcome.drain_radius = self.profile.drain_radius;
        }

        debug!(
            trap = self.id.get(),
            kind = self.kind.name(),
            uses_left = self.remaining_uses,
            "trap fired"
        );
        outcome
    }

    /// Advances the rearm timer of a triggered trap and returns whether it
    /// armed again this turn.
    pub fn update<R>(&mut self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        if self.state != TrapState::Triggered {
            return false;
        }

        self.current_rearm_time += 1;
        if self.current_rearm_time < self.profile.rearm_time {
            return false;
        }

        let chance = self.profile.reset_chance
            + RESET_PER_LEVEL * f64::from(self.level.saturating_sub(1));
        if roll(rng, chance) {
            self.state = TrapState::Armed;
            self.current_rearm_time = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_defence_core::{AdventurerClass, AdventurerId, StatusEffectKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn warrior() -> Adventurer {
        Adventurer::new(AdventurerId::new(0), AdventurerClass::Warrior, 1, CellCoord::new(0, 0))
    }

    fn certain(kind: TrapKind) -> TrapProfile {
        TrapProfile {
            trigger_chance: 1.0,
            reset_chance: 1.0,
            ..TrapProfile::for_kind(kind)
        }
    }

    #[test]
    fn snare_fires_once_per_arming_and_binds_the_victim() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut snare = Trap::from_profile(
            TrapId::new(1),
            TrapKind::Snare,
            1,
            CellCoord::new(1, 0),
            certain(TrapKind::Snare),
        );

        let first = snare.trigger(&mut rng, &warrior());
        assert!(first.success && first.triggered);
        assert_eq!(first.damage, 4);
        assert_eq!(first.effects, vec![AppliedEffect::new(StatusEffectKind::Trapped, 2, 0.0)]);
        assert_eq!(snare.remaining_uses(), 1);
        assert!(snare.is_triggered());

        let second = snare.trigger(&mut rng, &warrior());
        assert!(!second.success && !second.triggered);
        assert_eq!(snare.remaining_uses(), 1);
    }

    #[test]
    fn rearm_waits_for_the_full_rearm_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut spike = Trap::from_profile(
            TrapId::new(1),
            TrapKind::Spike,
            1,
            CellCoord::new(1, 0),
            certain(TrapKind::Spike),
        );
        let _ = spike.trigger(&mut rng, &warrior());

        assert!(!spike.update(&mut rng));
        assert_eq!(spike.current_rearm_time(), 1);
        assert!(spike.update(&mut rng));
        assert_eq!(spike.state(), TrapState::Armed);
        assert_eq!(spike.current_rearm_time(), 0);
        assert!(!spike.update(&mut rng));
    }

    #[test]
    fn last_use_leaves_the_trap_spent() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut bomb = Trap::from_profile(
            TrapId::new(1),
            TrapKind::Explosive,
            1,
            CellCoord::new(1, 0),
            certain(TrapKind::Explosive),
        );

        let outcome = bomb.trigger(&mut rng, &warrior());
        assert!(outcome.triggered);
        assert_eq!(outcome.area_radius, 1);
        assert_eq!(bomb.remaining_uses(), 0);
        assert!(bomb.is_spent());
        assert!(!bomb.update(&mut rng));
        assert!(!bomb.trigger(&mut rng, &warrior()).triggered);
    }

    #[test]
    fn failed_trigger_rolls_do_not_consume_uses() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let profile = TrapProfile {
            trigger_chance: 0.0,
            ..TrapProfile::for_kind(TrapKind::Spike)
        };
        let mut dud = Trap::from_profile(
            TrapId::new(1),
            TrapKind::Spike,
            1,
            CellCoord::new(1, 0),
            profile,
        );

        for _ in 0..5 {
            assert!(!dud.trigger(&mut rng, &warrior()).success);
        }
        assert_eq!(dud.remaining_uses(), 3);
        assert_eq!(dud.state(), TrapState::Armed);
    }

    #[test]
    fn disarm_chance_follows_the_level_gap_within_bounds() {
        let rogue = Adventurer::new(
            AdventurerId::new(0),
            AdventurerClass::Rogue,
            1,
            CellCoord::new(0, 0),
        );
        let even = Trap::new(TrapId::new(1), TrapKind::Spike, 1, CellCoord::new(1, 0));
        let tough = Trap::new(TrapId::new(2), TrapKind::Spike, 3, CellCoord::new(1, 0));
        let brutal = Trap::new(TrapId::new(3), TrapKind::Spike, 20, CellCoord::new(1, 0));

        assert!((even.disarm_chance_for(&rogue).unwrap_or_default() - 0.4).abs() < 1e-9);
        assert!((tough.disarm_chance_for(&rogue).unwrap_or_default() - 0.2).abs() < 1e-9);
        assert!((brutal.disarm_chance_for(&rogue).unwrap_or_default() - DISARM_MIN).abs() < 1e-9);
        assert_eq!(even.disarm_chance_for(&warrior()), None);
    }

    #[test]
    fn arcane_glyphs_pick_one_sub_effect() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut glyph = Trap::from_profile(
            TrapId::new(1),
            TrapKind::ArcaneGlyph,
            1,
            CellCoord::new(1, 0),
            certain(TrapKind::ArcaneGlyph),
        );
        let outcome = glyph.trigger(&mut rng, &warrior());
        assert_eq!(outcome.damage_kind, DamageKind::Magic);
        assert_eq!(outcome.effects.len(), 1);
        assert!(ARCANE_EFFECTS.contains(&outcome.effects[0]));
    }

    #[test]
    fn drain_traps_report_their_heal_radius() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut sigil = Trap::from_profile(
            TrapId::new(1),
            TrapKind::LifeDrain,
            2,
            CellCoord::new(1, 0),
            certain(TrapKind::LifeDrain),
        );
        let outcome = sigil.trigger(&mut rng, &warrior());
        assert_eq!(outcome.drain_radius, 2);
        assert_eq!(outcome.damage, 9);
    }
}
