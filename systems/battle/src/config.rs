use lair_defence_system_combatants::MistakeModel;
use lair_defence_system_rewards::RewardTuning;
use serde::Deserialize;

/// Turn limit applied when none is configured.
pub const DEFAULT_MAX_TURNS: u32 = 200;

/// Knobs of a single battle.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Campaign day; later days make adventurers more careful and rewards larger.
    pub day: u32,
    /// Turns after which the defenders are declared to have held.
    pub max_turns: u32,
    /// How often adventurers stray from their route.
    pub mistakes: MistakeModel,
    /// Reward constants.
    pub rewards: RewardTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            day: 1,
            max_turns: DEFAULT_MAX_TURNS,
            mistakes: MistakeModel::default(),
            rewards: RewardTuning::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SimulationConfig = toml::from_str(
            "day = 4\n[mistakes]\nbase = 0.5\n[rewards]\nmin_gold = 99\n",
        )
        .expect("valid config");

        assert_eq!(config.day, 4);
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
        assert_eq!(config.mistakes.base, 0.5);
        assert_eq!(config.mistakes.floor, 0.05);
        assert_eq!(config.rewards.min_gold, 99);
        assert_eq!(config.rewards.defeat_gold, 0.5);
    }
}
