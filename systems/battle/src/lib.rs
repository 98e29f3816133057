#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based battle engine.
//!
//! [`BattleContext`] bundles the grid, the party, the monster and trap
//! registries and the status effects. [`BattleSimulator`] owns a context and
//! resolves it turn by turn, appending [`lair_defence_core::Event`]s to a
//! queue the host drains at its own pace.

mod config;
mod context;
mod error;
mod pacing;
mod simulator;

pub use config::{SimulationConfig, DEFAULT_MAX_TURNS};
pub use context::BattleContext;
pub use error::{SimulationError, TurnFault};
pub use pacing::{AbortHandle, NoPacing, PacingHook, Pause, Phase};
pub use simulator::{BattleOutcome, BattleSimulator};
