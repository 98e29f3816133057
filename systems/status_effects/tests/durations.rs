use lair_defence_core::{AdventurerId, AppliedEffect, CombatantId, StatusEffectKind};
use lair_defence_system_status_effects::{StatusEffectBag, MAX_DURATION};
use proptest::prelude::*;

const KINDS: [StatusEffectKind; 5] = [
    StatusEffectKind::Poisoned,
    StatusEffectKind::Burning,
    StatusEffectKind::Stunned,
    StatusEffectKind::Trapped,
    StatusEffectKind::Slowed,
];

fn effect_strategy() -> impl Strategy<Value = AppliedEffect> {
    (0usize..KINDS.len(), 0u32..8, 0.0f64..6.0).prop_map(|(kind, duration, magnitude)| {
        AppliedEffect::new(KINDS[kind], duration, magnitude)
    })
}

proptest! {
    #[test]
    fn durations_never_grow_between_ticks_and_expired_keys_stay_gone(
        effects in proptest::collection::vec(effect_strategy(), 1..6),
        ticks in 1usize..16,
    ) {
        let target = CombatantId::Adventurer(AdventurerId::new(0));
        let mut bag = StatusEffectBag::new();
        for effect in &effects {
            bag.apply(target, *effect);
        }

        let mut previous: Vec<u32> =
            KINDS.iter().map(|kind| bag.remaining(target, *kind)).collect();
        prop_assert!(previous.iter().all(|duration| *duration <= MAX_DURATION));

        for _ in 0..ticks {
            let report = bag.tick(target);
            let current: Vec<u32> =
                KINDS.iter().map(|kind| bag.remaining(target, *kind)).collect();

            for (index, kind) in KINDS.iter().enumerate() {
                if previous[index] > 0 {
                    prop_assert_eq!(current[index], previous[index] - 1);
                } else {
                    prop_assert_eq!(current[index], 0);
                }
                if current[index] == 0 {
                    prop_assert!(!bag.has(target, *kind));
                }
                prop_assert_eq!(
                    report.expired.contains(kind),
                    previous[index] == 1
                );
            }
            previous = current;
        }
    }
}
