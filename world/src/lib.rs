#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle grid for Lair Defence.
//!
//! The [`Grid`] is a fixed-shape matrix of [`Cell`] values plus the zones
//! (rooms and halls) laid over it. Its shape never changes after
//! construction; the only mutation is [`Grid::set_cell`], which the battle
//! simulator uses when monsters die, traps are exhausted or minions are
//! summoned. Every other system receives `&Grid`.

mod navigation;

use std::collections::BTreeSet;

use lair_defence_core::{Cell, CellCoord, MonsterId, TrapId, Zone, ZoneKind};
use thiserror::Error;
use tracing::warn;

use crate::navigation::{index, neighbors};

/// Reasons a grid snapshot is rejected at construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height is zero.
    #[error("grid must have at least one row and one column")]
    Empty,
    /// The cell buffer does not match the declared dimensions.
    #[error("expected {expected} cells for the declared dimensions, found {actual}")]
    DimensionMismatch {
        /// Cells implied by `width × height`.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },
    /// Rows supplied to [`Grid::from_rows`] differ in length.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        actual: usize,
    },
    /// No entrance cell is present.
    #[error("grid has no entrance")]
    MissingEntrance,
    /// More than one entrance cell is present.
    #[error("grid has {count} entrances, expected exactly one")]
    MultipleEntrances {
        /// Number of entrance cells found.
        count: usize,
    },
    /// No boss cell is present.
    #[error("grid has no boss cell")]
    MissingBoss,
    /// More than one boss cell is present.
    #[error("grid has {count} boss cells, expected exactly one")]
    MultipleBosses {
        /// Number of boss cells found.
        count: usize,
    },
    /// A zone extends past the grid edge.
    #[error("{kind:?} anchored at {origin} extends beyond the grid")]
    ZoneOutOfBounds {
        /// Kind of the offending zone.
        kind: ZoneKind,
        /// Anchor of the offending zone.
        origin: CellCoord,
    },
    /// Two zones share at least one cell.
    #[error("zones anchored at {first} and {second} overlap")]
    OverlappingZones {
        /// Anchor of the earlier zone.
        first: CellCoord,
        /// Anchor of the later zone.
        second: CellCoord,
    },
    /// A monster is referenced from more than one cell.
    #[error("monster #{} is referenced by more than one cell", .0.get())]
    DuplicateMonster(MonsterId),
    /// A trap is referenced from more than one cell.
    #[error("trap #{} is referenced by more than one cell", .0.get())]
    DuplicateTrap(TrapId),
}

/// Validated battle grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    entrance: CellCoord,
    boss: CellCoord,
    zones: Vec<Zone>,
}

impl Grid {
    /// Builds a grid from a row-major cell buffer, enforcing every invariant.
    pub fn new(
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        zones: Vec<Zone>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let expected = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(GridError::DimensionMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let width_usize = usize::try_from(width).unwrap_or(usize::MAX);
        let coord_of = |offset: usize| {
            let x = u32::try_from(offset % width_usize).unwrap_or(u32::MAX);
            let y = u32::try_from(offset / width_usize).unwrap_or(u32::MAX);
            CellCoord::new(x, y)
        };

        let entrances: Vec<CellCoord> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Entrance)
            .map(|(offset, _)| coord_of(offset))
            .collect();
        let bosses: Vec<CellCoord> = cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Boss)
            .map(|(offset, _)| coord_of(offset))
            .collect();

        let entrance = match entrances.as_slice() {
            [] => return Err(GridError::MissingEntrance),
            [single] => *single,
            many => return Err(GridError::MultipleEntrances { count: many.len() }),
        };
        let boss = match bosses.as_slice() {
            [] => return Err(GridError::MissingBoss),
            [single] => *single,
            many => return Err(GridError::MultipleBosses { count: many.len() }),
        };

        let mut monsters = BTreeSet::new();
        let mut traps = BTreeSet::new();
        for cell in &cells {
            match *cell {
                Cell::Monster(id) if !monsters.insert(id) => {
                    return Err(GridError::DuplicateMonster(id));
                }
                Cell::Trap(id) if !traps.insert(id) => return Err(GridError::DuplicateTrap(id)),
                _ => {}
            }
        }

        validate_zones(width, height, &zones)?;

        Ok(Self {
            width,
            height,
            cells,
            entrance,
            boss,
            zones,
        })
    }

    /// Builds a grid from rows of cells, top row first.
    pub fn from_rows(rows: Vec<Vec<Cell>>, zones: Vec<Zone>) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let expected = first.len();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(GridError::RaggedRow {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
        }

        let width = u32::try_from(expected).map_err(|_| GridError::Empty)?;
        let height = u32::try_from(rows.len()).map_err(|_| GridError::Empty)?;
        let cells = rows.into_iter().flatten().collect();
        Self::new(width, height, cells, zones)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The single entrance cell.
    #[must_use]
    pub const fn entrance(&self) -> CellCoord {
        self.entrance
    }

    /// The single boss cell.
    #[must_use]
    pub const fn boss(&self) -> CellCoord {
        self.boss
    }

    /// Structures laid over the grid.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Returns the content of a cell, or `None` with a warning when the
    /// coordinate is outside the grid.
    #[must_use]
    pub fn get_cell(&self, cell: CellCoord) -> Option<Cell> {
        match self.offset(cell) {
            Some(offset) => self.cells.get(offset).copied(),
            None => {
                warn!(%cell, width = self.width, height = self.height, "cell query outside grid");
                None
            }
        }
    }

    /// Replaces the content of a cell.
    ///
    /// Out-of-bounds writes and writes that would add, move or erase the
    /// entrance or boss are ignored with a warning and return `false`.
    pub fn set_cell(&mut self, cell: CellCoord, content: Cell) -> bool {
        let Some(offset) = self.offset(cell) else {
            warn!(%cell, "cell update outside grid ignored");
            return false;
        };

        let Some(slot) = self.cells.get_mut(offset) else {
            return false;
        };

        let protected = matches!(*slot, Cell::Entrance | Cell::Boss)
            || matches!(content, Cell::Entrance | Cell::Boss);
        if protected && *slot != content {
            warn!(
                %cell,
                current = ?*slot,
                requested = ?content,
                "entrance and boss cells are fixed"
            );
            return false;
        }

        *slot = content;
        true
    }

    /// Reports whether movers may enter the cell. Out-of-bounds cells are not
    /// traversable.
    #[must_use]
    pub fn is_traversable(&self, cell: CellCoord) -> bool {
        self.offset(cell)
            .and_then(|offset| self.cells.get(offset))
            .is_some_and(|content| content.is_traversable())
    }

    /// In-bounds neighbours of a cell in north, east, south, west order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        neighbors(cell, self.width, self.height)
    }

    /// Zone containing the cell, if any.
    #[must_use]
    pub fn zone_at(&self, cell: CellCoord) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.rect().contains(cell))
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let offset = u64::try_from(offset).unwrap_or(u64::MAX);
            let width = u64::from(width);
            let x = u32::try_from(offset % width).unwrap_or(u32::MAX);
            let y = u32::try_from(offset / width).unwrap_or(u32::MAX);
            (CellCoord::new(x, y), *cell)
        })
    }

    fn offset(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        index(usize::try_from(self.width).ok()?, cell)
    }
}

fn validate_zones(width: u32, height: u32, zones: &[Zone]) -> Result<(), GridError> {
    for (position, zone) in zones.iter().enumerate() {
        let rect = zone.rect();
        let right = u64::from(rect.origin().x()) + u64::from(rect.size().width());
        let bottom = u64::from(rect.origin().y()) + u64::from(rect.size().height());
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(GridError::ZoneOutOfBounds {
                kind: zone.kind(),
                origin: zone.origin(),
            });
        }

        if let Some(earlier) = zones[..position]
            .iter()
            .find(|earlier| earlier.rect().intersects(&rect))
        {
            return Err(GridError::OverlappingZones {
                first: earlier.origin(),
                second: zone.origin(),
            });
        }
    }
    Ok(())
}

/// Query functions that provide read-only access to the grid.
pub mod query {
    use lair_defence_core::{Cell, CellCoord, MonsterId, StructuresUsed, TrapId, ZoneKind};

    use super::Grid;
    use crate::navigation::NavigationField;

    /// Traversable neighbours of a cell in north, east, south, west order.
    #[must_use]
    pub fn traversable_neighbors(grid: &Grid, cell: CellCoord) -> Vec<CellCoord> {
        grid.neighbors(cell)
            .filter(|neighbor| grid.is_traversable(*neighbor))
            .collect()
    }

    /// Every monster referenced by the grid with the cell it guards.
    #[must_use]
    pub fn monster_cells(grid: &Grid) -> Vec<(CellCoord, MonsterId)> {
        grid.iter()
            .filter_map(|(cell, content)| match content {
                Cell::Monster(id) => Some((cell, id)),
                _ => None,
            })
            .collect()
    }

    /// Every trap referenced by the grid with the cell it rigs.
    #[must_use]
    pub fn trap_cells(grid: &Grid) -> Vec<(CellCoord, TrapId)> {
        grid.iter()
            .filter_map(|(cell, content)| match content {
                Cell::Trap(id) => Some((cell, id)),
                _ => None,
            })
            .collect()
    }

    /// Plain path cells adjacent to `cell`, where a minion could be raised.
    #[must_use]
    pub fn free_path_neighbors(grid: &Grid, cell: CellCoord) -> Vec<CellCoord> {
        grid.neighbors(cell)
            .filter(|neighbor| grid.get_cell(*neighbor) == Some(Cell::Path))
            .collect()
    }

    /// Counts the rooms and halls laid over the grid.
    #[must_use]
    pub fn structures(grid: &Grid) -> StructuresUsed {
        grid.zones()
            .iter()
            .fold(StructuresUsed::default(), |mut used, zone| {
                match zone.kind() {
                    ZoneKind::Room => used.rooms += 1,
                    ZoneKind::Hall => used.halls += 1,
                }
                used
            })
    }

    /// Reports whether a 4-connected chain of traversable cells joins `from`
    /// and `to`, ignoring movement costs.
    #[must_use]
    pub fn is_connected(grid: &Grid, from: CellCoord, to: CellCoord) -> bool {
        if !grid.is_traversable(from) || !grid.is_traversable(to) {
            return false;
        }
        let mut field = NavigationField::default();
        field.rebuild_with(grid.width(), grid.height(), &[from], |cell| {
            !grid.is_traversable(cell)
        });
        field.distance(to).is_some()
    }

    /// Fewest steps between `from` and `to` over traversable cells.
    #[must_use]
    pub fn step_distance(grid: &Grid, from: CellCoord, to: CellCoord) -> Option<u32> {
        if !grid.is_traversable(from) {
            return None;
        }
        let mut field = NavigationField::default();
        field.rebuild_with(grid.width(), grid.height(), &[from], |cell| {
            !grid.is_traversable(cell)
        });
        field.distance(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lair_defence_core::{CellRect, CellRectSize};

    fn corridor() -> Grid {
        Grid::from_rows(
            vec![
                vec![Cell::Entrance, Cell::Path, Cell::Path, Cell::Boss],
                vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
            ],
            Vec::new(),
        )
        .expect("corridor is valid")
    }

    #[test]
    fn construction_locates_entrance_and_boss() {
        let grid = corridor();
        assert_eq!(grid.entrance(), CellCoord::new(0, 0));
        assert_eq!(grid.boss(), CellCoord::new(3, 0));
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn construction_rejects_missing_or_duplicate_endpoints() {
        let no_boss = Grid::from_rows(vec![vec![Cell::Entrance, Cell::Path]], Vec::new());
        assert_eq!(no_boss, Err(GridError::MissingBoss));

        let two_entrances = Grid::from_rows(
            vec![vec![Cell::Entrance, Cell::Entrance, Cell::Boss]],
            Vec::new(),
        );
        assert_eq!(two_entrances, Err(GridError::MultipleEntrances { count: 2 }));

        let empty = Grid::new(0, 3, Vec::new(), Vec::new());
        assert_eq!(empty, Err(GridError::Empty));
    }

    #[test]
    fn construction_rejects_ragged_rows_and_bad_buffers() {
        let ragged = Grid::from_rows(
            vec![vec![Cell::Entrance, Cell::Boss], vec![Cell::Empty]],
            Vec::new(),
        );
        assert!(matches!(ragged, Err(GridError::RaggedRow { row: 1, .. })));

        let short = Grid::new(2, 2, vec![Cell::Entrance, Cell::Boss], Vec::new());
        assert_eq!(
            short,
            Err(GridError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn construction_rejects_shared_entity_references() {
        let monster = MonsterId::new(4);
        let grid = Grid::from_rows(
            vec![vec![
                Cell::Entrance,
                Cell::Monster(monster),
                Cell::Monster(monster),
                Cell::Boss,
            ]],
            Vec::new(),
        );
        assert_eq!(grid, Err(GridError::DuplicateMonster(monster)));
    }

    #[test]
    fn zones_must_fit_and_stay_disjoint() {
        let mut rows = vec![vec![Cell::Path; 5]; 5];
        rows[0][0] = Cell::Entrance;
        rows[4][4] = Cell::Boss;

        let outside = Grid::from_rows(
            rows.clone(),
            vec![Zone::new(ZoneKind::Hall, CellCoord::new(3, 3))],
        );
        assert!(matches!(outside, Err(GridError::ZoneOutOfBounds { .. })));

        let overlapping = Grid::from_rows(
            rows.clone(),
            vec![
                Zone::new(ZoneKind::Hall, CellCoord::new(0, 0)),
                Zone::new(ZoneKind::Room, CellCoord::new(2, 2)),
            ],
        );
        assert!(matches!(overlapping, Err(GridError::OverlappingZones { .. })));

        let fine = Grid::from_rows(
            rows,
            vec![
                Zone::new(ZoneKind::Hall, CellCoord::new(0, 0)),
                Zone::new(ZoneKind::Room, CellCoord::new(3, 3)),
            ],
        )
        .expect("disjoint zones are valid");
        assert_eq!(
            fine.zone_at(CellCoord::new(4, 3)).map(Zone::kind),
            Some(ZoneKind::Room)
        );
        assert_eq!(
            fine.zone_at(CellCoord::new(1, 2)).map(Zone::rect),
            Some(CellRect::from_origin_and_size(
                CellCoord::new(0, 0),
                CellRectSize::new(3, 3)
            ))
        );
        assert!(fine.zone_at(CellCoord::new(3, 0)).is_none());
    }

    #[test]
    fn out_of_bounds_access_is_a_no_op() {
        let mut grid = corridor();
        let outside = CellCoord::new(10, 10);
        assert_eq!(grid.get_cell(outside), None);
        assert!(!grid.set_cell(outside, Cell::Path));
        assert!(!grid.is_traversable(outside));
    }

    #[test]
    fn set_cell_protects_entrance_and_boss() {
        let mut grid = corridor();
        assert!(!grid.set_cell(grid.boss(), Cell::Path));
        assert!(!grid.set_cell(CellCoord::new(1, 0), Cell::Boss));
        assert!(grid.set_cell(CellCoord::new(1, 0), Cell::Trap(TrapId::new(1))));
        assert_eq!(
            grid.get_cell(CellCoord::new(1, 0)),
            Some(Cell::Trap(TrapId::new(1)))
        );
        assert_eq!(grid.get_cell(grid.boss()), Some(Cell::Boss));
    }

    #[test]
    fn connectivity_matches_corridor_shape() {
        let mut grid = corridor();
        assert!(query::is_connected(&grid, grid.entrance(), grid.boss()));
        assert_eq!(
            query::step_distance(&grid, grid.entrance(), grid.boss()),
            Some(3)
        );

        assert!(grid.set_cell(CellCoord::new(2, 0), Cell::Empty));
        assert!(!query::is_connected(&grid, grid.entrance(), grid.boss()));
    }

    #[test]
    fn structures_count_rooms_and_halls() {
        let mut rows = vec![vec![Cell::Path; 6]; 3];
        rows[0][0] = Cell::Entrance;
        rows[2][5] = Cell::Boss;
        let grid = Grid::from_rows(
            rows,
            vec![
                Zone::new(ZoneKind::Room, CellCoord::new(0, 0)),
                Zone::new(ZoneKind::Hall, CellCoord::new(2, 0)),
            ],
        )
        .expect("valid grid");
        let used = query::structures(&grid);
        assert_eq!(used.rooms, 1);
        assert_eq!(used.halls, 1);
    }
}
