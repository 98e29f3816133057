use lair_defence_core::{
    AdventurerClass, AdventurerId, BattleState, BattleStats, CellCoord, StructuresUsed,
};
use lair_defence_system_combatants::Adventurer;
use lair_defence_system_rewards::{RewardCalculator, RewardInput, RewardTuning};
use proptest::prelude::*;

fn wounded(class: AdventurerClass, level: u32, lost: u32) -> Adventurer {
    let mut adventurer = Adventurer::new(AdventurerId::new(0), class, level, CellCoord::new(0, 0));
    let _ = adventurer.lose_health(lost);
    adventurer
}

fn gold_for(adventurer: Adventurer, outcome: BattleState, turns: u32, day: u32) -> u64 {
    let party = [adventurer];
    RewardCalculator::default()
        .calculate(RewardInput {
            adventurers: &party,
            outcome,
            stats: BattleStats {
                turns,
                ..BattleStats::default()
            },
            structures: StructuresUsed { rooms: 1, halls: 0 },
            day,
        })
        .gold_reward
}

proptest! {
    #[test]
    fn share_never_drops_as_more_health_is_lost(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let tuning = RewardTuning::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tuning.contribution_share(low) <= tuning.contribution_share(high));
    }

    #[test]
    fn more_damage_taken_never_lowers_gold(
        class in 0usize..AdventurerClass::ALL.len(),
        level in 1u32..12,
        first in 0u32..400,
        second in 0u32..400,
        turns in 1u32..60,
        day in 0u32..20,
        defeat in any::<bool>(),
    ) {
        let class = AdventurerClass::ALL[class];
        let outcome = if defeat { BattleState::Defeat } else { BattleState::Victory };
        let (less, more) = if first <= second { (first, second) } else { (second, first) };

        let lighter = gold_for(wounded(class, level, less), outcome, turns, day);
        let heavier = gold_for(wounded(class, level, more), outcome, turns, day);
        prop_assert!(lighter <= heavier, "{lighter} > {heavier}");
    }
}
