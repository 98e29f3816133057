use lair_defence_core::{AdventurerId, BattleState, CellCoord, MonsterId, TrapId};
use lair_defence_world::GridError;
use thiserror::Error;

/// Errors that keep a battle from being assembled or driven.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// The grid itself is malformed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The roster holds no adventurers.
    #[error("the roster is empty")]
    EmptyRoster,
    /// Two adventurers share an identifier.
    #[error("adventurer #{} appears twice in the roster", .0.get())]
    DuplicateAdventurer(AdventurerId),
    /// Two monsters share an identifier.
    #[error("monster #{} is registered twice", .0.get())]
    DuplicateMonster(MonsterId),
    /// Two traps share an identifier.
    #[error("trap #{} is registered twice", .0.get())]
    DuplicateTrap(TrapId),
    /// An adventurer stands on a cell it cannot occupy.
    #[error("adventurer #{} stands on non-traversable cell {cell}", .adventurer.get())]
    Misplaced {
        /// Offending adventurer.
        adventurer: AdventurerId,
        /// Cell it was placed on.
        cell: CellCoord,
    },
    /// A grid cell references a monster missing from the registry.
    #[error("cell {cell} references unknown monster #{}", .monster.get())]
    DanglingMonster {
        /// Referenced monster.
        monster: MonsterId,
        /// Referencing cell.
        cell: CellCoord,
    },
    /// A grid cell references a trap missing from the registry.
    #[error("cell {cell} references unknown trap #{}", .trap.get())]
    DanglingTrap {
        /// Referenced trap.
        trap: TrapId,
        /// Referencing cell.
        cell: CellCoord,
    },
    /// A registered monster's cell does not reference it.
    #[error("monster #{} is not placed at {cell}", .monster.get())]
    UnplacedMonster {
        /// Registered monster.
        monster: MonsterId,
        /// Position the monster claims.
        cell: CellCoord,
    },
    /// A registered trap's cell does not reference it.
    #[error("trap #{} is not placed at {cell}", .trap.get())]
    UnplacedTrap {
        /// Registered trap.
        trap: TrapId,
        /// Position the trap claims.
        cell: CellCoord,
    },
    /// No route joins the entrance and the boss.
    #[error("no path joins the entrance and the boss")]
    NoValidPath,
    /// The battle was already started.
    #[error("the battle has already started")]
    AlreadyStarted,
    /// Turns can only be resolved while the battle is in progress.
    #[error("the battle is not in progress (state {0:?})")]
    NotInProgress(BattleState),
}

/// Fault hit while resolving a turn. The turn is reported as an error event
/// and the battle carries on with the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TurnFault {
    /// A cell references a monster missing from the registry.
    #[error("cell {cell} references unknown monster #{}", .monster.get())]
    MissingMonster {
        /// Referenced monster.
        monster: MonsterId,
        /// Referencing cell.
        cell: CellCoord,
    },
    /// A cell references a trap missing from the registry.
    #[error("cell {cell} references unknown trap #{}", .trap.get())]
    MissingTrap {
        /// Referenced trap.
        trap: TrapId,
        /// Referencing cell.
        cell: CellCoord,
    },
    /// A tactic targets an adventurer missing from the roster.
    #[error("adventurer #{} is not in the roster", .0.get())]
    MissingAdventurer(AdventurerId),
}
