#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combatant models for the battle engine.
//!
//! Adventurers, monsters and traps are plain structs built from archetype
//! tables in [`tables`]. Every method that rolls a probability takes the
//! caller's random source so battles replay exactly from a seed.

mod adventurer;
pub mod chance;
mod damage;
mod monster;
pub mod tables;
mod trap;

pub use adventurer::{Adventurer, Decision};
pub use chance::{roll, MistakeModel};
pub use damage::{AttackOutcome, DamageOutcome, Mitigation};
pub use monster::Monster;
pub use trap::{Trap, TrapState, TriggerOutcome};
