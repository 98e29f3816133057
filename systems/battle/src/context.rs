use std::collections::{BTreeMap, BTreeSet};

use lair_defence_core::{BattleState, BattleStats, Cell, MonsterId, TrapId, Zone};
use lair_defence_system_combatants::{Adventurer, Monster, Trap};
use lair_defence_system_status_effects::StatusEffectBag;
use lair_defence_world::Grid;

use crate::SimulationError;

/// Mutable aggregate of everything a battle touches.
///
/// The grid references monsters and traps by id; the registries own them.
/// Construction checks that both sides agree, so the simulator can treat a
/// missing entity as a runtime fault rather than a setup mistake.
#[derive(Clone, Debug)]
pub struct BattleContext {
    pub(crate) grid: Grid,
    pub(crate) adventurers: Vec<Adventurer>,
    pub(crate) monsters: BTreeMap<MonsterId, Monster>,
    pub(crate) traps: BTreeMap<TrapId, Trap>,
    pub(crate) effects: StatusEffectBag,
    pub(crate) turn: u32,
    pub(crate) state: BattleState,
    pub(crate) stats: BattleStats,
    next_monster: Option<u32>,
}

impl BattleContext {
    /// Assembles a battle from a validated grid and its entities.
    pub fn new(
        grid: Grid,
        adventurers: Vec<Adventurer>,
        monsters: Vec<Monster>,
        traps: Vec<Trap>,
    ) -> Result<Self, SimulationError> {
        if adventurers.is_empty() {
            return Err(SimulationError::EmptyRoster);
        }

        let mut ids = BTreeSet::new();
        for adventurer in &adventurers {
            if !ids.insert(adventurer.id()) {
                return Err(SimulationError::DuplicateAdventurer(adventurer.id()));
            }
            if !grid.is_traversable(adventurer.position()) {
                return Err(SimulationError::Misplaced {
                    adventurer: adventurer.id(),
                    cell: adventurer.position(),
                });
            }
        }

        let mut monster_registry = BTreeMap::new();
        for monster in monsters {
            let (id, cell) = (monster.id(), monster.position());
            if grid.get_cell(cell) != Some(Cell::Monster(id)) {
                return Err(SimulationError::UnplacedMonster { monster: id, cell });
            }
            if monster_registry.insert(id, monster).is_some() {
                return Err(SimulationError::DuplicateMonster(id));
            }
        }

        let mut trap_registry = BTreeMap::new();
        for trap in traps {
            let (id, cell) = (trap.id(), trap.position());
            if grid.get_cell(cell) != Some(Cell::Trap(id)) {
                return Err(SimulationError::UnplacedTrap { trap: id, cell });
            }
            if trap_registry.insert(id, trap).is_some() {
                return Err(SimulationError::DuplicateTrap(id));
            }
        }

        for (cell, content) in grid.iter() {
            match content {
                Cell::Monster(monster) if !monster_registry.contains_key(&monster) => {
                    return Err(SimulationError::DanglingMonster { monster, cell });
                }
                Cell::Trap(trap) if !trap_registry.contains_key(&trap) => {
                    return Err(SimulationError::DanglingTrap { trap, cell });
                }
                _ => {}
            }
        }

        let next_monster = monster_registry
            .keys()
            .next_back()
            .map_or(Some(0), |id: &MonsterId| id.get().checked_add(1));

        Ok(Self {
            grid,
            adventurers,
            monsters: monster_registry,
            traps: trap_registry,
            effects: StatusEffectBag::new(),
            turn: 0,
            state: BattleState::Preparation,
            stats: BattleStats::default(),
            next_monster,
        })
    }

    /// Builds the grid from rows of cells and assembles the battle.
    pub fn from_rows(
        rows: Vec<Vec<Cell>>,
        zones: Vec<Zone>,
        adventurers: Vec<Adventurer>,
        monsters: Vec<Monster>,
        traps: Vec<Trap>,
    ) -> Result<Self, SimulationError> {
        let grid = Grid::from_rows(rows, zones)?;
        Self::new(grid, adventurers, monsters, traps)
    }

    /// The battle grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The party in roster order, the fallen included.
    #[must_use]
    pub fn adventurers(&self) -> &[Adventurer] {
        &self.adventurers
    }

    /// Living monsters in id order.
    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// Looks up a living monster.
    #[must_use]
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    /// Traps still on the grid in id order.
    pub fn traps(&self) -> impl Iterator<Item = &Trap> {
        self.traps.values()
    }

    /// Looks up a trap still on the grid.
    #[must_use]
    pub fn trap(&self, id: TrapId) -> Option<&Trap> {
        self.traps.get(&id)
    }

    /// Active status effects.
    #[must_use]
    pub const fn effects(&self) -> &StatusEffectBag {
        &self.effects
    }

    /// Number of turns started so far.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Lifecycle state of the battle.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// Adventurers still standing.
    pub fn survivors(&self) -> impl Iterator<Item = &Adventurer> {
        self.adventurers.iter().filter(|adventurer| !adventurer.is_dead())
    }

    pub(crate) fn transition(&mut self, next: BattleState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            false
        }
    }

    /// Hands out a monster id never used in this battle, the slain included.
    /// Returns `None` once the id space is exhausted.
    pub(crate) fn allocate_monster_id(&mut self) -> Option<MonsterId> {
        let next = self.next_monster?;
        self.next_monster = next.checked_add(1);
        Some(MonsterId::new(next))
    }
}
