use lair_defence_core::{AdventurerClass, AdventurerId, CellCoord, TrapId, TrapKind};
use lair_defence_system_combatants::tables::TrapProfile;
use lair_defence_system_combatants::{Adventurer, Trap, TrapState};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const KINDS: [TrapKind; 10] = [
    TrapKind::Spike,
    TrapKind::Snare,
    TrapKind::TarPit,
    TrapKind::PoisonDart,
    TrapKind::Explosive,
    TrapKind::Boulder,
    TrapKind::ArcaneGlyph,
    TrapKind::LifeDrain,
    TrapKind::SpiritWard,
    TrapKind::FireRune,
];

#[derive(Clone, Copy, Debug)]
enum Step {
    Trigger(usize),
    Update,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..AdventurerClass::ALL.len()).prop_map(Step::Trigger),
        Just(Step::Update),
    ]
}

proptest! {
    #[test]
    fn uses_never_increase_and_triggering_always_consumes_one(
        seed in any::<u64>(),
        kind in 0usize..KINDS.len(),
        level in 1u32..6,
        steps in proptest::collection::vec(step_strategy(), 1..40),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut trap = Trap::new(TrapId::new(0), KINDS[kind], level, CellCoord::new(1, 0));
        let party: Vec<Adventurer> = AdventurerClass::ALL
            .iter()
            .enumerate()
            .map(|(index, class)| {
                Adventurer::new(
                    AdventurerId::new(index as u32),
                    *class,
                    level,
                    CellCoord::new(0, 0),
                )
            })
            .collect();

        for step in steps {
            let before = trap.remaining_uses();
            match step {
                Step::Trigger(member) => {
                    let outcome = trap.trigger(&mut rng, &party[member]);
                    if outcome.triggered {
                        prop_assert_eq!(trap.remaining_uses(), before - 1);
                        prop_assert!(outcome.success);
                    } else {
                        prop_assert_eq!(trap.remaining_uses(), before);
                        prop_assert_eq!(outcome.damage, 0);
                    }
                    prop_assert!(!(outcome.triggered && outcome.disarmed));
                }
                Step::Update => {
                    let _ = trap.update(&mut rng);
                    prop_assert_eq!(trap.remaining_uses(), before);
                }
            }
            prop_assert!(trap.remaining_uses() <= before);
            if trap.remaining_uses() == 0 {
                prop_assert_eq!(trap.state(), TrapState::Disarmed);
            }
        }
    }
}

#[test]
fn single_use_snare_with_certain_trigger_is_spent_after_one_victim() {
    let profile = TrapProfile {
        uses: 1,
        trigger_chance: 1.0,
        ..TrapProfile::for_kind(TrapKind::Snare)
    };
    let mut snare =
        Trap::from_profile(TrapId::new(0), TrapKind::Snare, 1, CellCoord::new(1, 0), profile);
    let victim = Adventurer::new(
        AdventurerId::new(0),
        AdventurerClass::Warrior,
        1,
        CellCoord::new(1, 0),
    );
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let outcome = snare.trigger(&mut rng, &victim);
    assert!(outcome.triggered);
    assert_eq!(outcome.effects.len(), 1);
    assert_eq!(outcome.effects[0].duration, 2);
    assert!(snare.is_spent());
}

#[test]
fn a_disarmed_trap_never_fires_again() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let rogue = Adventurer::new(
        AdventurerId::new(0),
        AdventurerClass::Rogue,
        20,
        CellCoord::new(0, 0),
    );
    let mut spike = Trap::new(TrapId::new(0), TrapKind::Spike, 1, CellCoord::new(1, 0));

    let mut disarmed = false;
    for _ in 0..64 {
        let outcome = spike.trigger(&mut rng, &rogue);
        if outcome.disarmed {
            disarmed = true;
            break;
        }
        if spike.is_triggered() {
            while !spike.update(&mut rng) {}
        }
    }

    assert!(disarmed, "a level-20 rogue disarms at 95%");
    assert!(spike.is_spent());
    let outcome = spike.trigger(&mut rng, &rogue);
    assert!(!outcome.success && !outcome.triggered && !outcome.disarmed);
}
