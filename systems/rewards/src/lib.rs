#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Post-battle reward computation.
//!
//! Every adventurer contributes a share of its gold and experience value:
//! the full value when it died, a banded share of it when it escaped hurt.
//! The sum is then shaped by how quickly the battle ended, by the outcome,
//! and by the structures the defender built.

use lair_defence_core::{BattleResults, BattleState, BattleStats, StructuresUsed};
use lair_defence_system_combatants::Adventurer;
use serde::Deserialize;
use tracing::debug;

/// Tunable reward constants.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    /// Health-lost fraction from which the heavy band applies.
    pub heavy_loss: f64,
    /// Share awarded in the heavy band.
    pub heavy_share: f64,
    /// Health-lost fraction from which the moderate band applies.
    pub moderate_loss: f64,
    /// Share awarded in the moderate band.
    pub moderate_share: f64,
    /// Health-lost fraction from which the light band applies.
    pub light_loss: f64,
    /// Share awarded in the light band.
    pub light_share: f64,
    /// Largest efficiency bonus, earned by a battle that ends at once.
    pub efficiency_bonus: f64,
    /// Turn count at which the efficiency bonus has decayed to nothing.
    pub efficiency_turns: u32,
    /// Gold multiplier when the party reached the boss.
    pub defeat_gold: f64,
    /// Experience multiplier when the party reached the boss.
    pub defeat_experience: f64,
    /// Gold multiplier when every adventurer died.
    pub full_victory_gold: f64,
    /// Experience multiplier when every adventurer died.
    pub full_victory_experience: f64,
    /// Bonus per room zone on the grid.
    pub room_bonus: f64,
    /// Bonus per hall zone on the grid.
    pub hall_bonus: f64,
    /// Upper bound of the combined structure bonus.
    pub structure_cap: f64,
    /// Guaranteed gold on day zero.
    pub min_gold: u64,
    /// Guaranteed gold added per day.
    pub min_gold_per_day: u64,
    /// Guaranteed experience on day zero.
    pub min_experience: u64,
    /// Guaranteed experience added per day.
    pub min_experience_per_day: u64,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            heavy_loss: 0.7,
            heavy_share: 0.8,
            moderate_loss: 0.4,
            moderate_share: 0.5,
            light_loss: 0.2,
            light_share: 0.3,
            efficiency_bonus: 0.5,
            efficiency_turns: 30,
            defeat_gold: 0.5,
            defeat_experience: 0.6,
            full_victory_gold: 1.5,
            full_victory_experience: 1.3,
            room_bonus: 0.05,
            hall_bonus: 0.10,
            structure_cap: 0.5,
            min_gold: 10,
            min_gold_per_day: 5,
            min_experience: 5,
            min_experience_per_day: 3,
        }
    }
}

impl RewardTuning {
    /// Share of an adventurer's value awarded for the given fraction of
    /// health lost. A dead adventurer counts as having lost everything.
    #[must_use]
    pub fn contribution_share(&self, lost: f64) -> f64 {
        let lost = if lost.is_nan() { 0.0 } else { lost.clamp(0.0, 1.0) };
        if lost >= 1.0 {
            1.0
        } else if lost >= self.heavy_loss {
            self.heavy_share
        } else if lost >= self.moderate_loss {
            self.moderate_share
        } else if lost >= self.light_loss {
            self.light_share
        } else {
            lost
        }
    }

    /// Multiplier rewarding short battles.
    #[must_use]
    pub fn efficiency(&self, turns: u32) -> f64 {
        let span = f64::from(self.efficiency_turns.max(1));
        1.0 + self.efficiency_bonus * (1.0 - f64::from(turns) / span).max(0.0)
    }

    /// Multiplier granted by the rooms and halls on the grid.
    #[must_use]
    pub fn structure_multiplier(&self, structures: StructuresUsed) -> f64 {
        let bonus = self.room_bonus * f64::from(structures.rooms)
            + self.hall_bonus * f64::from(structures.halls);
        1.0 + bonus.min(self.structure_cap)
    }
}

/// Everything the calculator reads from a finished battle.
#[derive(Clone, Copy, Debug)]
pub struct RewardInput<'a> {
    /// The party as it stands at the end of the battle.
    pub adventurers: &'a [Adventurer],
    /// Terminal state of the battle.
    pub outcome: BattleState,
    /// Counters accumulated during the battle.
    pub stats: BattleStats,
    /// Zones present on the grid.
    pub structures: StructuresUsed,
    /// Campaign day the battle was fought on.
    pub day: u32,
}

/// Turns a finished battle into gold and experience.
#[derive(Clone, Copy, Debug, Default)]
pub struct RewardCalculator {
    tuning: RewardTuning,
}

impl RewardCalculator {
    /// Creates a calculator with the given constants.
    #[must_use]
    pub const fn new(tuning: RewardTuning) -> Self {
        Self { tuning }
    }

    /// Constants in use.
    #[must_use]
    pub const fn tuning(&self) -> &RewardTuning {
        &self.tuning
    }

    /// Gold and experience one adventurer contributes before battle-wide
    /// multipliers.
    #[must_use]
    pub fn contribution(&self, adventurer: &Adventurer) -> (f64, f64) {
        let lost = if adventurer.is_dead() {
            1.0
        } else {
            1.0 - adventurer.health_fraction()
        };
        let share = self.tuning.contribution_share(lost);
        (
            adventurer.gold_value() * share,
            adventurer.experience_value() * share,
        )
    }

    /// Computes the results of a finished battle.
    #[must_use]
    pub fn calculate(&self, input: RewardInput<'_>) -> BattleResults {
        let tuning = &self.tuning;
        let (mut gold, mut experience) = input
            .adventurers
            .iter()
            .map(|adventurer| self.contribution(adventurer))
            .fold((0.0, 0.0), |(gold, experience), (g, e)| (gold + g, experience + e));

        let efficiency = tuning.efficiency(input.stats.turns);
        gold *= efficiency;
        experience *= efficiency;

        let survived = input.adventurers.iter().filter(|a| !a.is_dead()).count();
        match input.outcome {
            BattleState::Defeat => {
                gold *= tuning.defeat_gold;
                experience *= tuning.defeat_experience;
            }
            BattleState::Victory if survived == 0 => {
                gold *= tuning.full_victory_gold;
                experience *= tuning.full_victory_experience;
            }
            _ => {}
        }

        let structures = tuning.structure_multiplier(input.structures);
        gold *= structures;
        experience *= structures;

        let day = u64::from(input.day);
        let gold_reward =
            (gold.round() as u64).max(tuning.min_gold + tuning.min_gold_per_day * day);
        let experience_reward = (experience.round() as u64)
            .max(tuning.min_experience + tuning.min_experience_per_day * day);

        debug!(
            gold = gold_reward,
            experience = experience_reward,
            efficiency,
            survived,
            "rewards computed"
        );

        BattleResults {
            gold_reward,
            experience_reward,
            adventurers_survived: u32::try_from(survived).unwrap_or(u32::MAX),
            total_adventurers: u32::try_from(input.adventurers.len()).unwrap_or(u32::MAX),
            efficiency,
            stats: input.stats,
            structures_used: input.structures,
        }
    }
}
