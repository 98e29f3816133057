use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Phases of a turn, in resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Status effects tick.
    StatusTick,
    /// Adventurers act in roster order.
    Adventurers,
    /// Monsters act in execution order.
    Monsters,
    /// Triggered traps try to rearm.
    Traps,
}

/// Points at which a host may slow the battle down for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pause {
    /// A phase finished.
    AfterPhase(Phase),
    /// An adventurer moved.
    AfterMove,
}

/// Host hook invoked at presentation points. It never influences the
/// outcome; a headless run uses [`NoPacing`].
pub trait PacingHook {
    /// Called once per pause point.
    fn pause(&mut self, pause: Pause);
}

/// Pacing hook that returns immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl PacingHook for NoPacing {
    fn pause(&mut self, _pause: Pause) {}
}

/// Shared flag through which a host asks a running battle to stop between
/// turns.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Creates a handle that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the battle to stop before its next turn.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Reports whether an abort was requested.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
