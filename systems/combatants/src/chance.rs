//! Probability helpers shared by every combatant.

use rand::Rng;
use serde::Deserialize;

/// Draws one Bernoulli trial.
///
/// Chances at or below zero never succeed and chances at or above one always
/// succeed; neither case consumes randomness.
pub fn roll<R>(rng: &mut R, chance: f64) -> bool
where
    R: Rng + ?Sized,
{
    if chance.is_nan() || chance <= 0.0 {
        return false;
    }
    if chance >= 1.0 {
        return true;
    }
    rng.gen_bool(chance)
}

/// Likelihood that an adventurer strays from its planned route.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MistakeModel {
    /// Error chance of a level-zero adventurer on day zero.
    pub base: f64,
    /// Reduction per adventurer level.
    pub per_level: f64,
    /// Reduction per elapsed day.
    pub per_day: f64,
    /// Lowest error chance regardless of level and day.
    pub floor: f64,
    /// Share of mistakes spent standing still instead of wandering.
    pub stand_still_share: f64,
}

impl MistakeModel {
    /// A model under which adventurers never stray.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            base: 0.0,
            per_level: 0.0,
            per_day: 0.0,
            floor: 0.0,
            stand_still_share: 0.0,
        }
    }

    /// Error chance for an adventurer of `level` on `day`.
    #[must_use]
    pub fn error_chance(&self, level: u32, day: u32) -> f64 {
        let chance = self.base - self.per_level * f64::from(level) - self.per_day * f64::from(day);
        chance.max(self.floor).clamp(0.0, 1.0)
    }
}

impl Default for MistakeModel {
    fn default() -> Self {
        Self {
            base: 0.3,
            per_level: 0.05,
            per_day: 0.02,
            floor: 0.05,
            stand_still_share: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn certain_and_impossible_rolls_skip_the_generator() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut untouched = ChaCha8Rng::seed_from_u64(7);

        assert!(!roll(&mut rng, 0.0));
        assert!(!roll(&mut rng, -1.0));
        assert!(!roll(&mut rng, f64::NAN));
        assert!(roll(&mut rng, 1.0));
        assert!(roll(&mut rng, 3.5));
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn error_chance_declines_with_level_and_day_down_to_the_floor() {
        let model = MistakeModel::default();
        assert!((model.error_chance(1, 0) - 0.25).abs() < 1e-9);
        assert!((model.error_chance(2, 3) - 0.14).abs() < 1e-9);
        assert!((model.error_chance(10, 10) - 0.05).abs() < 1e-9);
        assert_eq!(MistakeModel::disabled().error_chance(1, 0), 0.0);
    }
}
