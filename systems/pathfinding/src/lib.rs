#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* path finding over the battle grid.
//!
//! Edge costs depend on the content of the cell being entered and on the
//! class of the mover, so different adventurers prefer different routes
//! through the same lair. Costs are stored in half-steps to keep the search
//! in integer arithmetic: a plain corridor costs two, the boss chamber one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use lair_defence_core::{AdventurerClass, Cell, CellCoord};
use lair_defence_world::Grid;
use tracing::{trace, warn};

/// Cost of entering a corridor or the entrance, in half-steps.
pub const PATH_COST: u32 = 2;
/// Cost of entering the boss chamber, in half-steps.
pub const BOSS_COST: u32 = 1;
/// Cost of entering a trapped cell for most movers.
pub const TRAP_COST: u32 = 10;
/// Cost of entering a trapped cell for rogues.
pub const ROGUE_TRAP_COST: u32 = 4;
/// Cost of entering a guarded cell for melee movers.
pub const MONSTER_COST: u32 = 16;
/// Cost of entering a guarded cell for ranged and caster movers.
pub const RANGED_MONSTER_COST: u32 = 6;

/// Per-mover pricing of the expensive cell types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalProfile {
    /// Cost of entering a trap cell.
    pub trap_cost: u32,
    /// Cost of entering a monster cell.
    pub monster_cost: u32,
}

impl TraversalProfile {
    /// Profile used when no mover is specified.
    pub const NEUTRAL: TraversalProfile = TraversalProfile {
        trap_cost: TRAP_COST,
        monster_cost: MONSTER_COST,
    };

    /// Derives the profile for an optional adventurer class.
    #[must_use]
    pub const fn for_mover(mover: Option<AdventurerClass>) -> Self {
        let Some(class) = mover else {
            return Self::NEUTRAL;
        };
        Self {
            trap_cost: if class.is_rogue() {
                ROGUE_TRAP_COST
            } else {
                TRAP_COST
            },
            monster_cost: if class.is_ranged_or_caster() {
                RANGED_MONSTER_COST
            } else {
                MONSTER_COST
            },
        }
    }

    /// Cost of entering a cell with the given content, or `None` when the
    /// cell cannot be entered.
    #[must_use]
    pub const fn edge_cost(&self, content: Cell) -> Option<u32> {
        match content {
            Cell::Empty => None,
            Cell::Path | Cell::Entrance => Some(PATH_COST),
            Cell::Boss => Some(BOSS_COST),
            Cell::Trap(_) => Some(self.trap_cost),
            Cell::Monster(_) => Some(self.monster_cost),
        }
    }
}

/// Ordered cells of a route together with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Cells from start to end, both inclusive.
    pub cells: Vec<CellCoord>,
    /// Sum of the edge costs along the route, in half-steps.
    pub cost: u32,
}

/// A* search with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct PathFinder {
    open: BinaryHeap<Reverse<OpenEntry>>,
    best: Vec<u32>,
    came_from: Vec<Option<usize>>,
    sequence: u64,
}

impl PathFinder {
    /// Creates a path finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the cheapest route from `start` to `end` for the given mover.
    ///
    /// Returns the cells from `start` to `end` inclusive, or `None` when
    /// either endpoint is outside the grid, not traversable, or unreachable.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        end: CellCoord,
        mover: Option<AdventurerClass>,
    ) -> Option<Vec<CellCoord>> {
        self.find_route(grid, start, end, mover)
            .map(|route| route.cells)
    }

    /// Like [`PathFinder::find_path`] but also reports the route cost.
    pub fn find_route(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        end: CellCoord,
        mover: Option<AdventurerClass>,
    ) -> Option<Route> {
        if !grid.contains(start) || !grid.contains(end) {
            warn!(%start, %end, "path request outside grid");
            return None;
        }
        if !grid.is_traversable(start) || !grid.is_traversable(end) {
            return None;
        }
        if start == end {
            return Some(Route {
                cells: vec![start],
                cost: 0,
            });
        }

        let width = usize::try_from(grid.width()).ok()?;
        let cell_count = width.checked_mul(usize::try_from(grid.height()).ok()?)?;
        self.prepare(cell_count);

        let profile = TraversalProfile::for_mover(mover);
        let start_index = index_of(width, start)?;
        let goal_index = index_of(width, end)?;

        self.best[start_index] = 0;
        self.push(start_index, 0, heuristic(start, end));

        while let Some(Reverse(entry)) = self.open.pop() {
            if entry.g > self.best[entry.index] {
                continue;
            }

            if entry.index == goal_index {
                let cells = self.reconstruct(width, goal_index);
                trace!(%start, %end, cost = entry.g, steps = cells.len(), "route found");
                return Some(Route {
                    cells,
                    cost: entry.g,
                });
            }

            let cell = coord_of(width, entry.index);
            for neighbor in grid.neighbors(cell) {
                let Some(step_cost) = grid
                    .get_cell(neighbor)
                    .and_then(|content| profile.edge_cost(content))
                else {
                    continue;
                };
                let Some(neighbor_index) = index_of(width, neighbor) else {
                    continue;
                };

                let tentative = entry.g.saturating_add(step_cost);
                if tentative >= self.best[neighbor_index] {
                    continue;
                }

                self.best[neighbor_index] = tentative;
                self.came_from[neighbor_index] = Some(entry.index);
                self.push(
                    neighbor_index,
                    tentative,
                    tentative.saturating_add(heuristic(neighbor, end)),
                );
            }
        }

        None
    }

    /// Reports whether the boss can be reached from the entrance.
    pub fn has_valid_path(&mut self, grid: &Grid) -> bool {
        self.find_path(grid, grid.entrance(), grid.boss(), None)
            .is_some()
    }

    fn prepare(&mut self, cell_count: usize) {
        self.open.clear();
        self.sequence = 0;
        self.best.clear();
        self.best.resize(cell_count, u32::MAX);
        self.came_from.clear();
        self.came_from.resize(cell_count, None);
    }

    fn push(&mut self, index: usize, g: u32, f: u32) {
        self.open.push(Reverse(OpenEntry {
            f,
            sequence: self.sequence,
            index,
            g,
        }));
        self.sequence = self.sequence.wrapping_add(1);
    }

    fn reconstruct(&self, width: usize, goal: usize) -> Vec<CellCoord> {
        let mut cells = vec![coord_of(width, goal)];
        let mut cursor = goal;
        while let Some(previous) = self.came_from.get(cursor).copied().flatten() {
            cells.push(coord_of(width, previous));
            cursor = previous;
        }
        cells.reverse();
        cells
    }
}

/// Convenience wrapper that allocates a fresh [`PathFinder`].
#[must_use]
pub fn has_valid_path(grid: &Grid) -> bool {
    PathFinder::new().has_valid_path(grid)
}

/// Open-set entry ordered by `f`, then by insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    f: u32,
    sequence: u64,
    index: usize,
    g: u32,
}

/// Admissible lower bound: every step costs at least [`PATH_COST`] except a
/// single step into the boss chamber.
fn heuristic(from: CellCoord, to: CellCoord) -> u32 {
    let distance = from.manhattan_distance(to);
    if distance == 0 {
        0
    } else {
        distance
            .saturating_mul(PATH_COST)
            .saturating_sub(PATH_COST - BOSS_COST)
    }
}

fn index_of(width: usize, cell: CellCoord) -> Option<usize> {
    let x = usize::try_from(cell.x()).ok()?;
    let y = usize::try_from(cell.y()).ok()?;
    y.checked_mul(width)?.checked_add(x)
}

fn coord_of(width: usize, index: usize) -> CellCoord {
    let x = u32::try_from(index % width).unwrap_or(u32::MAX);
    let y = u32::try_from(index / width).unwrap_or(u32::MAX);
    CellCoord::new(x, y)
}
