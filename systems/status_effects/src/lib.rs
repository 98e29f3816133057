#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-combatant store of transient status effects.
//!
//! Each combatant carries at most one entry per [`StatusEffectKind`]. A
//! re-application extends the remaining duration (capped at
//! [`MAX_DURATION`]) and replaces the magnitude with the newer source.
//! [`StatusEffectBag::tick`] applies the per-turn consequence of every entry
//! and then shortens it by one turn, dropping entries that reach zero.

use std::collections::BTreeMap;

use lair_defence_core::{AppliedEffect, CombatantId, StatusEffectKind};
use tracing::trace;

/// Upper bound on the remaining duration of any single effect.
pub const MAX_DURATION: u32 = 10;

/// Remaining duration and strength of an effect on one combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveEffect {
    /// Turns left, always at least one while stored.
    pub duration: u32,
    /// Damage per tick for poison and burn, skip probability for slow.
    pub magnitude: f64,
}

/// What a single tick did to one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Damage dealt by poison and burn this tick.
    pub damage: u32,
    /// Whether a stun or trap keeps the combatant from acting this turn.
    pub blocked: bool,
    /// Skip probability when the combatant is slowed this turn.
    pub slowed: Option<f64>,
    /// Effects that ran out during this tick.
    pub expired: Vec<StatusEffectKind>,
}

/// Status effects keyed by combatant.
#[derive(Clone, Debug, Default)]
pub struct StatusEffectBag {
    effects: BTreeMap<CombatantId, BTreeMap<StatusEffectKind, ActiveEffect>>,
}

impl StatusEffectBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect, stacking with any existing entry of the same kind.
    ///
    /// Zero-duration effects are ignored.
    pub fn apply(&mut self, target: CombatantId, effect: AppliedEffect) {
        if effect.duration == 0 {
            return;
        }

        let entries = self.effects.entry(target).or_default();
        let entry = entries.entry(effect.kind).or_insert(ActiveEffect {
            duration: 0,
            magnitude: effect.magnitude,
        });
        entry.duration = entry
            .duration
            .saturating_add(effect.duration)
            .min(MAX_DURATION);
        entry.magnitude = effect.magnitude;

        trace!(
            %target,
            effect = effect.kind.name(),
            duration = entry.duration,
            magnitude = entry.magnitude,
            "status effect applied"
        );
    }

    /// Resolves one turn of every effect on `target`.
    ///
    /// Each stored effect applies its consequence, then loses one turn of
    /// duration; effects that reach zero are removed and listed in
    /// [`TickReport::expired`].
    pub fn tick(&mut self, target: CombatantId) -> TickReport {
        let mut report = TickReport::default();
        let Some(entries) = self.effects.get_mut(&target) else {
            return report;
        };

        let mut damage = 0.0_f64;
        for (kind, effect) in entries.iter_mut() {
            match kind {
                StatusEffectKind::Poisoned | StatusEffectKind::Burning => {
                    damage += effect.magnitude.max(0.0);
                }
                StatusEffectKind::Stunned | StatusEffectKind::Trapped => report.blocked = true,
                StatusEffectKind::Slowed => {
                    report.slowed = Some(effect.magnitude.clamp(0.0, 1.0));
                }
            }
            effect.duration = effect.duration.saturating_sub(1);
            if effect.duration == 0 {
                report.expired.push(*kind);
            }
        }

        entries.retain(|_, effect| effect.duration > 0);
        if entries.is_empty() {
            let _ = self.effects.remove(&target);
        }

        report.damage = damage.round() as u32;
        if !report.expired.is_empty() {
            trace!(%target, expired = ?report.expired, "status effects expired");
        }
        report
    }

    /// Current entry of `kind` on `target`.
    #[must_use]
    pub fn get(&self, target: CombatantId, kind: StatusEffectKind) -> Option<ActiveEffect> {
        self.effects
            .get(&target)
            .and_then(|entries| entries.get(&kind))
            .copied()
    }

    /// Reports whether `target` carries an effect of `kind`.
    #[must_use]
    pub fn has(&self, target: CombatantId, kind: StatusEffectKind) -> bool {
        self.get(target, kind).is_some()
    }

    /// Remaining duration of `kind` on `target`, zero when absent.
    #[must_use]
    pub fn remaining(&self, target: CombatantId, kind: StatusEffectKind) -> u32 {
        self.get(target, kind).map_or(0, |effect| effect.duration)
    }

    /// Every effect carried by `target` in kind order.
    pub fn active(
        &self,
        target: CombatantId,
    ) -> impl Iterator<Item = (StatusEffectKind, ActiveEffect)> + '_ {
        self.effects
            .get(&target)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(kind, effect)| (*kind, *effect)))
    }

    /// Drops every effect carried by `target`.
    pub fn clear(&mut self, target: CombatantId) {
        let _ = self.effects.remove(&target);
    }

    /// Combatants that carry at least one effect, in id order.
    pub fn affected(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.effects.keys().copied()
    }

    /// Reports whether no combatant carries any effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
