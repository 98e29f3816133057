use std::{error::Error, fmt};

use lair_defence_core::{
    AdventurerClass, AdventurerId, Cell, CellCoord, MonsterId, MonsterKind, TrapId, TrapKind, Zone,
    ZoneKind,
};
use lair_defence_system_battle::{BattleContext, SimulationError};
use lair_defence_system_combatants::{Adventurer, Monster, Trap};

/// Prefix marking a directive line.
const DIRECTIVE_PREFIX: char = '@';
/// Prefix marking a comment line.
const COMMENT_PREFIX: &str = "//";

/// Lair bundled with the binary, used when no layout file is given.
pub(crate) const DEMO_LAIR: &str = "\
// Two lanes into the boss chamber, guarded by a hall and a room.
@party warrior:3 rogue:2 mage:2 archer:2 cleric:3
@trap-level 2
@hall 4,1
@room 7,2
E.n..g..##
##.#...d.#
##s#...#L#
##.*.#G..#
####a###DB
";

/// Adventurer requested by a `@party` directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PartyMember {
    class: AdventurerClass,
    level: u32,
    evolved: bool,
}

/// Lair parsed from its ASCII description.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LairLayout {
    rows: Vec<Vec<Cell>>,
    zones: Vec<Zone>,
    party: Vec<PartyMember>,
    monsters: Vec<(MonsterId, MonsterKind, CellCoord)>,
    traps: Vec<(TrapId, TrapKind, CellCoord)>,
    trap_level: u32,
}

impl LairLayout {
    /// Parses a lair description.
    ///
    /// Lines starting with `@` are directives (`@party`, `@room`, `@hall`,
    /// `@trap-level`), lines starting with `//` are comments, and every other
    /// non-blank line is a map row drawn with the legend of [`tile`].
    pub(crate) fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut layout = Self {
            rows: Vec::new(),
            zones: Vec::new(),
            party: Vec::new(),
            monsters: Vec::new(),
            traps: Vec::new(),
            trap_level: 1,
        };

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim_end();
            if trimmed.trim().is_empty() || trimmed.trim_start().starts_with(COMMENT_PREFIX) {
                continue;
            }

            if let Some(directive) = trimmed.trim_start().strip_prefix(DIRECTIVE_PREFIX) {
                layout.apply_directive(line, directive)?;
            } else {
                layout.push_row(line, trimmed)?;
            }
        }

        if layout.rows.is_empty() {
            return Err(LayoutError::EmptyMap);
        }
        if layout.party.is_empty() {
            return Err(LayoutError::MissingParty);
        }
        Ok(layout)
    }

    /// Instantiates every entity and assembles the battle.
    pub(crate) fn into_context(self) -> Result<BattleContext, SimulationError> {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows: Vec<Vec<Cell>> = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        let entrance = rows
            .iter()
            .enumerate()
            .find_map(|(y, row)| {
                row.iter()
                    .position(|cell| *cell == Cell::Entrance)
                    .map(|x| CellCoord::new(coordinate(x), coordinate(y)))
            })
            .unwrap_or(CellCoord::new(0, 0));

        let party = self
            .party
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let adventurer = Adventurer::new(
                    AdventurerId::new(coordinate(index)),
                    member.class,
                    member.level,
                    entrance,
                );
                if member.evolved {
                    adventurer.evolved()
                } else {
                    adventurer
                }
            })
            .collect();
        let monsters = self
            .monsters
            .iter()
            .map(|(id, kind, cell)| Monster::new(*id, *kind, *cell))
            .collect();
        let traps = self
            .traps
            .iter()
            .map(|(id, kind, cell)| Trap::new(*id, *kind, self.trap_level, *cell))
            .collect();

        BattleContext::from_rows(rows, self.zones, party, monsters, traps)
    }

    fn apply_directive(&mut self, line: usize, directive: &str) -> Result<(), LayoutError> {
        let mut words = directive.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "party" => {
                for entry in words {
                    self.party.push(parse_member(line, entry)?);
                }
            }
            "room" | "hall" => {
                let kind = if name == "room" {
                    ZoneKind::Room
                } else {
                    ZoneKind::Hall
                };
                let anchor = words.next().unwrap_or_default();
                self.zones.push(Zone::new(kind, parse_anchor(line, anchor)?));
            }
            "trap-level" => {
                let value = words.next().unwrap_or_default();
                self.trap_level = parse_level(line, value)?;
            }
            other => {
                return Err(LayoutError::UnknownDirective {
                    line,
                    directive: other.to_owned(),
                });
            }
        }
        Ok(())
    }

    fn push_row(&mut self, line: usize, text: &str) -> Result<(), LayoutError> {
        let y = coordinate(self.rows.len());
        let mut row = Vec::with_capacity(text.len());
        for (x, symbol) in text.chars().enumerate() {
            let cell = CellCoord::new(coordinate(x), y);
            let content = match tile(symbol) {
                Some(Tile::Cell(content)) => content,
                Some(Tile::Monster(kind)) => {
                    let id = MonsterId::new(coordinate(self.monsters.len()));
                    self.monsters.push((id, kind, cell));
                    Cell::Monster(id)
                }
                Some(Tile::Trap(kind)) => {
                    let id = TrapId::new(coordinate(self.traps.len()));
                    self.traps.push((id, kind, cell));
                    Cell::Trap(id)
                }
                None => {
                    return Err(LayoutError::UnknownTile {
                        line,
                        column: x + 1,
                        symbol,
                    });
                }
            };
            row.push(content);
        }
        self.rows.push(row);
        Ok(())
    }
}

/// Content a map symbol stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Cell(Cell),
    Monster(MonsterKind),
    Trap(TrapKind),
}

/// Legend of the map rows.
fn tile(symbol: char) -> Option<Tile> {
    let tile = match symbol {
        'E' => Tile::Cell(Cell::Entrance),
        'B' => Tile::Cell(Cell::Boss),
        '.' => Tile::Cell(Cell::Path),
        '#' | ' ' => Tile::Cell(Cell::Empty),
        's' => Tile::Monster(MonsterKind::Slime),
        'g' => Tile::Monster(MonsterKind::Goblin),
        'k' => Tile::Monster(MonsterKind::Skeleton),
        'o' => Tile::Monster(MonsterKind::Orc),
        't' => Tile::Monster(MonsterKind::Troll),
        'G' => Tile::Monster(MonsterKind::Golem),
        'L' => Tile::Monster(MonsterKind::Lich),
        'D' => Tile::Monster(MonsterKind::Dragon),
        '^' => Tile::Trap(TrapKind::Spike),
        'n' => Tile::Trap(TrapKind::Snare),
        '~' => Tile::Trap(TrapKind::TarPit),
        'p' => Tile::Trap(TrapKind::PoisonDart),
        '*' => Tile::Trap(TrapKind::Explosive),
        'O' => Tile::Trap(TrapKind::Boulder),
        'a' => Tile::Trap(TrapKind::ArcaneGlyph),
        'd' => Tile::Trap(TrapKind::LifeDrain),
        'w' => Tile::Trap(TrapKind::SpiritWard),
        'r' => Tile::Trap(TrapKind::FireRune),
        _ => return None,
    };
    Some(tile)
}

const fn monster_symbol(kind: MonsterKind) -> char {
    match kind {
        MonsterKind::Slime => 's',
        MonsterKind::Goblin => 'g',
        MonsterKind::Skeleton => 'k',
        MonsterKind::Orc => 'o',
        MonsterKind::Troll => 't',
        MonsterKind::Golem => 'G',
        MonsterKind::Lich => 'L',
        MonsterKind::Dragon => 'D',
    }
}

const fn trap_symbol(kind: TrapKind) -> char {
    match kind {
        TrapKind::Spike => '^',
        TrapKind::Snare => 'n',
        TrapKind::TarPit => '~',
        TrapKind::PoisonDart => 'p',
        TrapKind::Explosive => '*',
        TrapKind::Boulder => 'O',
        TrapKind::ArcaneGlyph => 'a',
        TrapKind::LifeDrain => 'd',
        TrapKind::SpiritWard => 'w',
        TrapKind::FireRune => 'r',
    }
}

/// Draws the current lair with the map legend; living adventurers show as `@`.
pub(crate) fn render(context: &BattleContext) -> String {
    let grid = context.grid();
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = CellCoord::new(x, y);
            let symbol = if context.survivors().any(|adventurer| adventurer.position() == cell) {
                '@'
            } else {
                match grid.get_cell(cell) {
                    Some(Cell::Entrance) => 'E',
                    Some(Cell::Boss) => 'B',
                    Some(Cell::Path) => '.',
                    Some(Cell::Monster(id)) => context
                        .monster(id)
                        .map_or('?', |monster| monster_symbol(monster.kind())),
                    Some(Cell::Trap(id)) => context
                        .trap(id)
                        .map_or('?', |trap| trap_symbol(trap.kind())),
                    Some(Cell::Empty) | None => '#',
                }
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

fn parse_member(line: usize, entry: &str) -> Result<PartyMember, LayoutError> {
    let invalid = || LayoutError::InvalidMember {
        line,
        entry: entry.to_owned(),
    };
    let (body, evolved) = match entry.strip_suffix('!') {
        Some(body) => (body, true),
        None => (entry, false),
    };
    let (name, level) = body.split_once(':').unwrap_or((body, "1"));
    let class = AdventurerClass::ALL
        .into_iter()
        .find(|class| class.name().eq_ignore_ascii_case(name))
        .ok_or_else(invalid)?;
    let level = level.parse::<u32>().ok().filter(|level| *level > 0).ok_or_else(invalid)?;

    Ok(PartyMember {
        class,
        level,
        evolved,
    })
}

fn parse_anchor(line: usize, value: &str) -> Result<CellCoord, LayoutError> {
    let invalid = || LayoutError::InvalidAnchor {
        line,
        value: value.to_owned(),
    };
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<u32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(CellCoord::new(x, y))
}

fn parse_level(line: usize, value: &str) -> Result<u32, LayoutError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|level| *level > 0)
        .ok_or_else(|| LayoutError::InvalidLevel {
            line,
            value: value.to_owned(),
        })
}

fn coordinate(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

/// Errors raised while reading a lair description.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LayoutError {
    /// The description contains no map rows.
    EmptyMap,
    /// The description does not name any adventurer.
    MissingParty,
    /// A directive is not recognised.
    UnknownDirective {
        /// One-based line number.
        line: usize,
        /// Name of the directive.
        directive: String,
    },
    /// A map symbol is not part of the legend.
    UnknownTile {
        /// One-based line number.
        line: usize,
        /// One-based column.
        column: usize,
        /// Offending symbol.
        symbol: char,
    },
    /// A party entry is not `class[:level][!]`.
    InvalidMember {
        /// One-based line number.
        line: usize,
        /// Offending entry.
        entry: String,
    },
    /// A zone anchor is not `x,y`.
    InvalidAnchor {
        /// One-based line number.
        line: usize,
        /// Offending value.
        value: String,
    },
    /// A level is not a positive integer.
    InvalidLevel {
        /// One-based line number.
        line: usize,
        /// Offending value.
        value: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "lair description has no map rows"),
            Self::MissingParty => write!(f, "lair description has no @party directive"),
            Self::UnknownDirective { line, directive } => {
                write!(f, "line {line}: unknown directive '@{directive}'")
            }
            Self::UnknownTile {
                line,
                column,
                symbol,
            } => write!(f, "line {line}, column {column}: unknown map symbol '{symbol}'"),
            Self::InvalidMember { line, entry } => {
                write!(f, "line {line}: party entry '{entry}' is not class[:level][!]")
            }
            Self::InvalidAnchor { line, value } => {
                write!(f, "line {line}: zone anchor '{value}' is not x,y")
            }
            Self::InvalidLevel { line, value } => {
                write!(f, "line {line}: level '{value}' is not a positive integer")
            }
        }
    }
}

impl Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_lair_assembles() {
        let layout = LairLayout::parse(DEMO_LAIR).expect("demo parses");
        assert_eq!(layout.party.len(), 5);
        assert_eq!(layout.monsters.len(), 5);
        assert_eq!(layout.traps.len(), 4);
        assert_eq!(layout.trap_level, 2);

        let context = layout.into_context().expect("demo is consistent");
        assert_eq!(context.adventurers().len(), 5);
        assert_eq!(context.grid().zones().len(), 2);
        assert_eq!(context.grid().entrance(), CellCoord::new(0, 0));
    }

    #[test]
    fn party_entries_accept_levels_and_evolution() {
        let member = parse_member(1, "Mage:4!").expect("valid entry");
        assert_eq!(
            member,
            PartyMember {
                class: AdventurerClass::Mage,
                level: 4,
                evolved: true,
            }
        );
        assert_eq!(parse_member(1, "rogue").map(|member| member.level), Ok(1));
        assert!(parse_member(1, "bard:2").is_err());
        assert!(parse_member(1, "cleric:0").is_err());
    }

    #[test]
    fn short_rows_are_padded_with_walls() {
        let layout = LairLayout::parse("@party warrior\nE..B\nE\n").expect("parses");
        assert!(layout.into_context().is_err());

        let layout = LairLayout::parse("@party warrior\nE...\n#.B\n").expect("parses");
        let context = layout.into_context().expect("padded grid");
        assert_eq!(context.grid().width(), 4);
        assert_eq!(context.grid().get_cell(CellCoord::new(3, 1)), Some(Cell::Empty));
    }

    #[test]
    fn reports_where_the_description_goes_wrong() {
        assert_eq!(
            LairLayout::parse("@party warrior\nE.x.B\n"),
            Err(LayoutError::UnknownTile {
                line: 2,
                column: 3,
                symbol: 'x',
            })
        );
        assert_eq!(
            LairLayout::parse("@portal 1,1\nE.B\n"),
            Err(LayoutError::UnknownDirective {
                line: 1,
                directive: String::from("portal"),
            })
        );
        assert_eq!(LairLayout::parse("E.B\n"), Err(LayoutError::MissingParty));
        assert!(matches!(
            LairLayout::parse("@party warrior\n@room 4\nE.B\n"),
            Err(LayoutError::InvalidAnchor { line: 2, .. })
        ));
    }

    #[test]
    fn render_uses_the_legend() {
        let layout = LairLayout::parse("@party warrior\nE.g^B\n").expect("parses");
        let context = layout.into_context().expect("valid lair");
        assert_eq!(render(&context), "@.g^B\n");
    }
}
