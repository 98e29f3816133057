#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lair Defence battle engine.
//!
//! This crate defines the vocabulary that connects the authoritative grid,
//! the pure battle systems and any host adapter. The simulator mutates its
//! private battle context and broadcasts [`Event`] values describing what
//! happened; hosts only ever observe the read-only snapshots carried by those
//! events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the adjacent cell in the provided direction, if it does not
    /// underflow the coordinate space. Upper bounds are checked by the grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self.y.checked_sub(1).map(|y| CellCoord::new(self.x, y)),
            Direction::East => self.x.checked_add(1).map(|x| CellCoord::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| CellCoord::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| CellCoord::new(x, self.y)),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions used when enumerating neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Neighbour enumeration order shared by every system.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let x = u64::from(cell.x());
        let y = u64::from(cell.y());
        let left = u64::from(self.origin.x());
        let top = u64::from(self.origin.y());
        x >= left
            && y >= top
            && x < left + u64::from(self.size.width())
            && y < top + u64::from(self.size.height())
    }

    /// Reports whether two rectangles share at least one cell.
    #[must_use]
    pub fn intersects(&self, other: &CellRect) -> bool {
        let a_left = u64::from(self.origin.x());
        let a_top = u64::from(self.origin.y());
        let a_right = a_left + u64::from(self.size.width());
        let a_bottom = a_top + u64::from(self.size.height());
        let b_left = u64::from(other.origin.x());
        let b_top = u64::from(other.origin.y());
        let b_right = b_left + u64::from(other.size.width());
        let b_bottom = b_top + u64::from(other.size.height());

        a_left < b_right && b_left < a_right && a_top < b_bottom && b_top < a_bottom
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Named structures that grant bonuses to monsters standing inside them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Two by two chamber.
    Room,
    /// Three by three hall.
    Hall,
}

impl ZoneKind {
    /// Footprint occupied by the structure.
    #[must_use]
    pub const fn footprint(self) -> CellRectSize {
        match self {
            Self::Room => CellRectSize::new(2, 2),
            Self::Hall => CellRectSize::new(3, 3),
        }
    }

    /// Damage multiplier granted to monsters inside the zone.
    #[must_use]
    pub const fn damage_multiplier(self) -> f64 {
        match self {
            Self::Room => 1.2,
            Self::Hall => 1.3,
        }
    }

    /// Flat defense bonus granted to monsters inside the zone.
    #[must_use]
    pub const fn defense_bonus(self) -> u32 {
        match self {
            Self::Room => 0,
            Self::Hall => 2,
        }
    }
}

/// Structure anchored at an `{x, y}` origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    kind: ZoneKind,
    origin: CellCoord,
}

impl Zone {
    /// Creates a zone of the given kind anchored at the provided origin.
    #[must_use]
    pub const fn new(kind: ZoneKind, origin: CellCoord) -> Self {
        Self { kind, origin }
    }

    /// Kind of structure.
    #[must_use]
    pub const fn kind(&self) -> ZoneKind {
        self.kind
    }

    /// Upper-left anchor of the structure.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Region of cells covered by the zone.
    #[must_use]
    pub const fn rect(&self) -> CellRect {
        CellRect::from_origin_and_size(self.origin, self.kind.footprint())
    }
}

/// Unique identifier assigned to an adventurer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdventurerId(u32);

impl AdventurerId {
    /// Creates a new adventurer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrapId(u32);

impl TrapId {
    /// Creates a new trap identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of any entity that can carry status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CombatantId {
    /// An adventurer from the roster.
    Adventurer(AdventurerId),
    /// A monster placed on the grid.
    Monster(MonsterId),
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adventurer(id) => write!(f, "adventurer#{}", id.get()),
            Self::Monster(id) => write!(f, "monster#{}", id.get()),
        }
    }
}

/// Contents of a single grid cell.
///
/// [`Cell::Empty`] is the null cell: it is never traversable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Solid rock.
    #[default]
    Empty,
    /// Walkable corridor.
    Path,
    /// Where the adventurers enter the lair.
    Entrance,
    /// The boss chamber the adventurers try to reach.
    Boss,
    /// Corridor guarded by the referenced monster.
    Monster(MonsterId),
    /// Corridor rigged with the referenced trap.
    Trap(TrapId),
}

impl Cell {
    /// Reports whether movers may enter the cell.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Adventurer archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdventurerClass {
    /// Armoured melee fighter.
    Warrior,
    /// Evasive trap specialist.
    Rogue,
    /// Ranged spellcaster.
    Mage,
    /// Ranged marksman.
    Archer,
    /// Healer with holy magic.
    Cleric,
}

impl AdventurerClass {
    /// Every class in declaration order.
    pub const ALL: [AdventurerClass; 5] = [
        AdventurerClass::Warrior,
        AdventurerClass::Rogue,
        AdventurerClass::Mage,
        AdventurerClass::Archer,
        AdventurerClass::Cleric,
    ];

    /// Rogues read traps and pay less to walk over them.
    #[must_use]
    pub const fn is_rogue(self) -> bool {
        matches!(self, Self::Rogue)
    }

    /// Ranged and caster classes can engage monsters without closing in.
    #[must_use]
    pub const fn is_ranged_or_caster(self) -> bool {
        matches!(self, Self::Mage | Self::Archer | Self::Cleric)
    }

    /// Lower-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Rogue => "rogue",
            Self::Mage => "mage",
            Self::Archer => "archer",
            Self::Cleric => "cleric",
        }
    }
}

/// Monster archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Weak regenerating ooze.
    Slime,
    /// Cowardly skirmisher.
    Goblin,
    /// Undead soldier.
    Skeleton,
    /// Brutal melee bruiser.
    Orc,
    /// Large regenerating brute.
    Troll,
    /// Stone construct with an earthquake.
    Golem,
    /// Undead caster that raises skeletons.
    Lich,
    /// Fire-breathing apex monster.
    Dragon,
}

impl MonsterKind {
    /// Lower-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slime => "slime",
            Self::Goblin => "goblin",
            Self::Skeleton => "skeleton",
            Self::Orc => "orc",
            Self::Troll => "troll",
            Self::Golem => "golem",
            Self::Lich => "lich",
            Self::Dragon => "dragon",
        }
    }
}

/// Trap archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrapKind {
    /// Spring-loaded spikes.
    Spike,
    /// Net that pins the victim in place.
    Snare,
    /// Sticky tar that slows movement.
    TarPit,
    /// Poisoned darts.
    PoisonDart,
    /// Single-use blast hitting everyone nearby.
    Explosive,
    /// Rolling boulder that stuns.
    Boulder,
    /// Unstable glyph with a random arcane effect.
    ArcaneGlyph,
    /// Sigil that feeds nearby monsters.
    LifeDrain,
    /// Ward that shakes the victim's spirit.
    SpiritWard,
    /// Rune that sets the victim ablaze.
    FireRune,
}

impl TrapKind {
    /// Lower-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spike => "spike trap",
            Self::Snare => "snare",
            Self::TarPit => "tar pit",
            Self::PoisonDart => "poison dart trap",
            Self::Explosive => "explosive trap",
            Self::Boulder => "boulder trap",
            Self::ArcaneGlyph => "arcane glyph",
            Self::LifeDrain => "life drain sigil",
            Self::SpiritWard => "spirit ward",
            Self::FireRune => "fire rune",
        }
    }
}

/// Effect tag selecting the bundle a trap produces when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapEffect {
    /// Plain damage.
    Damage,
    /// Damage plus a trapped duration.
    Trap,
    /// Damage plus a slow.
    Slow,
    /// Damage plus poison.
    Poison,
    /// Damage to everyone around the trap.
    Area,
    /// Heavy damage plus a stun.
    Crush,
    /// Magic damage plus a random sub-effect.
    Arcane,
    /// Magic damage that heals nearby monsters.
    Drain,
    /// Magic damage plus a stun.
    Spiritual,
    /// Magic damage plus burning.
    Rune,
}

/// Damage channels used by mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Weapons, claws and falling rocks.
    Physical,
    /// Spells and curses.
    Magic,
}

/// Transient conditions tracked per combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusEffectKind {
    /// Loses `magnitude` health every tick.
    Poisoned,
    /// Loses `magnitude` health every tick.
    Burning,
    /// Cannot act.
    Stunned,
    /// Cannot act.
    Trapped,
    /// Skips movement or cooldown recovery with probability `magnitude`.
    Slowed,
}

impl StatusEffectKind {
    /// Lower-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Poisoned => "poisoned",
            Self::Burning => "burning",
            Self::Stunned => "stunned",
            Self::Trapped => "trapped",
            Self::Slowed => "slowed",
        }
    }
}

/// Status effect carried by an attack or trap, waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedEffect {
    /// Kind of effect.
    pub kind: StatusEffectKind,
    /// Number of ticks the effect lasts.
    pub duration: u32,
    /// Damage per tick for poison/burn, skip probability for slow, unused otherwise.
    pub magnitude: f64,
}

impl AppliedEffect {
    /// Creates a new effect descriptor.
    #[must_use]
    pub const fn new(kind: StatusEffectKind, duration: u32, magnitude: f64) -> Self {
        Self {
            kind,
            duration,
            magnitude,
        }
    }
}

/// Lifecycle of a battle. Terminal states never transition again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleState {
    /// The battle was assembled but not started.
    #[default]
    Preparation,
    /// Turns are being resolved.
    InProgress,
    /// The defenders held: every adventurer fell, or the turn limit ran out.
    Victory,
    /// An adventurer reached the boss.
    Defeat,
}

impl BattleState {
    /// Reports whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }

    /// Reports whether the transition to `next` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: BattleState) -> bool {
        matches!(
            (self, next),
            (Self::Preparation, Self::InProgress)
                | (Self::InProgress, Self::Victory)
                | (Self::InProgress, Self::Defeat)
        )
    }
}

/// Read-only copy of an adventurer's observable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventurerSnapshot {
    /// Identifier of the adventurer.
    pub id: AdventurerId,
    /// Class of the adventurer.
    pub class: AdventurerClass,
    /// Experience level.
    pub level: u32,
    /// Cell currently occupied.
    pub position: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Whether the adventurer has fallen.
    pub is_dead: bool,
}

/// Read-only copy of a monster's observable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    /// Identifier of the monster.
    pub id: MonsterId,
    /// Archetype of the monster.
    pub kind: MonsterKind,
    /// Monster level.
    pub level: u32,
    /// Cell guarded by the monster.
    pub position: CellCoord,
    /// Remaining health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
}

/// Counters accumulated while a battle runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Number of fully resolved turns.
    pub turns: u32,
    /// Monsters slain by adventurers or status effects.
    pub monsters_killed: u32,
    /// Adventurers slain.
    pub adventurers_killed: u32,
    /// Trap activations.
    pub traps_triggered: u32,
    /// Traps disarmed by adventurers.
    pub traps_disarmed: u32,
    /// Total damage dealt to adventurers.
    pub damage_to_adventurers: u64,
    /// Total damage dealt to monsters.
    pub damage_to_monsters: u64,
    /// Monsters raised during the battle.
    pub monsters_summoned: u32,
    /// Adventurer actions that were mistakes.
    pub mistakes: u32,
}

/// Structures present in the lair when the battle ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuresUsed {
    /// Number of rooms.
    pub rooms: u32,
    /// Number of halls.
    pub halls: u32,
}

/// Reward summary computed when a battle ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleResults {
    /// Gold awarded to the defender.
    pub gold_reward: u64,
    /// Experience awarded to the defender.
    pub experience_reward: u64,
    /// Adventurers still alive at the end.
    pub adventurers_survived: u32,
    /// Size of the roster.
    pub total_adventurers: u32,
    /// Turn-count multiplier applied to the rewards.
    pub efficiency: f64,
    /// Counters accumulated during the battle.
    pub stats: BattleStats,
    /// Structures that contributed a bonus.
    pub structures_used: StructuresUsed,
}

/// Events broadcast by the simulator, in the order they happened.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// The battle entered the in-progress state.
    BattleStart {
        /// Roster at the moment the battle started.
        adventurers: Vec<AdventurerSnapshot>,
        /// Monsters on the grid at the moment the battle started.
        monsters: Vec<MonsterSnapshot>,
    },
    /// A non-terminal turn finished.
    TurnComplete {
        /// One-based index of the turn.
        turn: u32,
        /// Human-readable log lines recorded during the turn.
        log: Vec<String>,
    },
    /// A grid cell changed content.
    CellUpdate {
        /// Cell that changed.
        cell: CellCoord,
        /// New content of the cell.
        content: Cell,
    },
    /// An adventurer moved between two cells.
    AdventurerMove {
        /// Adventurer state after the move.
        adventurer: AdventurerSnapshot,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// A monster was slain.
    MonsterDefeated {
        /// Cell the monster guarded.
        position: CellCoord,
        /// Monster state at the moment of death.
        monster: MonsterSnapshot,
    },
    /// An adventurer was slain.
    AdventurerDefeated {
        /// Adventurer state at the moment of death.
        adventurer: AdventurerSnapshot,
    },
    /// Terminal: the defenders held.
    Victory {
        /// Log lines of the final turn.
        log: Vec<String>,
        /// Reward summary.
        results: BattleResults,
    },
    /// Terminal: an adventurer reached the boss.
    Defeat {
        /// Log lines of the final turn.
        log: Vec<String>,
        /// Reward summary.
        results: BattleResults,
    },
    /// A turn hit a runtime fault; the battle continues with the next turn.
    Error {
        /// Turn during which the fault happened.
        turn: u32,
        /// Log lines recorded before the fault.
        log: Vec<String>,
        /// Description of the fault.
        error: String,
    },
}

impl Event {
    /// Reports whether the event ends the stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory { .. } | Self::Defeat { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn step_refuses_to_underflow() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North), None);
        assert_eq!(corner.step(Direction::West), None);
        assert_eq!(corner.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(corner.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn rect_containment_is_half_open() {
        let hall = Zone::new(ZoneKind::Hall, CellCoord::new(2, 2)).rect();
        assert!(hall.contains(CellCoord::new(2, 2)));
        assert!(hall.contains(CellCoord::new(4, 4)));
        assert!(!hall.contains(CellCoord::new(5, 4)));
        assert!(!hall.contains(CellCoord::new(1, 3)));
    }

    #[test]
    fn rect_intersection_detects_shared_cells_only() {
        let room = Zone::new(ZoneKind::Room, CellCoord::new(0, 0)).rect();
        let touching = Zone::new(ZoneKind::Room, CellCoord::new(2, 0)).rect();
        let overlapping = Zone::new(ZoneKind::Hall, CellCoord::new(1, 1)).rect();
        assert!(!room.intersects(&touching));
        assert!(room.intersects(&overlapping));
        assert!(overlapping.intersects(&room));
    }

    #[test]
    fn battle_state_transitions_are_one_directional() {
        assert!(BattleState::Preparation.can_transition_to(BattleState::InProgress));
        assert!(BattleState::InProgress.can_transition_to(BattleState::Defeat));
        assert!(BattleState::InProgress.can_transition_to(BattleState::Victory));
        assert!(!BattleState::Victory.can_transition_to(BattleState::InProgress));
        assert!(!BattleState::Defeat.can_transition_to(BattleState::Preparation));
        assert!(!BattleState::Preparation.can_transition_to(BattleState::Victory));
    }

    #[test]
    fn only_empty_cells_block_movement() {
        assert!(!Cell::Empty.is_traversable());
        assert!(Cell::Path.is_traversable());
        assert!(Cell::Boss.is_traversable());
        assert!(Cell::Monster(MonsterId::new(1)).is_traversable());
        assert!(Cell::Trap(TrapId::new(1)).is_traversable());
    }

    #[test]
    fn class_traits_drive_path_costs() {
        assert!(AdventurerClass::Rogue.is_rogue());
        assert!(!AdventurerClass::Warrior.is_ranged_or_caster());
        assert!(AdventurerClass::Mage.is_ranged_or_caster());
        assert!(AdventurerClass::Archer.is_ranged_or_caster());
    }

    #[test]
    fn events_serialize_with_camel_case_tags() {
        let event = Event::CellUpdate {
            cell: CellCoord::new(3, 4),
            content: Cell::Path,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"cellUpdate\""), "{json}");
        let restored: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, event);
    }
}
