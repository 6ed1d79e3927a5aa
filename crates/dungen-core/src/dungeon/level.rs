//! Level structure (dlevel_t from rm.h)

#[cfg(not(feature = "std"))]
use crate::compat::*;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr};

use super::rect::NhRect;
use super::{Cell, DLevel};
use crate::consts::{COLNO, ROWNO};
use crate::monster::{Monster, MonsterId, Player};
use crate::object::{Object, ObjectId, ObjectKind};

/// Create default cells grid, column-major: `cells[x][y]`
fn default_cells() -> Vec<Vec<Cell>> {
    vec![vec![Cell::stone(); ROWNO]; COLNO]
}

/// Engraving types (engrave.c)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EngravingType {
    /// Written in dust (easily erased)
    #[default]
    Dust = 0,
    /// Engraved (permanent)
    Engrave = 1,
    /// Burned (permanent)
    Burn = 2,
    /// Marked with a marker
    Mark = 3,
    /// Written in blood
    BloodStain = 4,
    /// Grave inscription
    Headstone = 5,
}

/// An engraving on the floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engraving {
    pub x: i8,
    pub y: i8,
    pub text: String,
    pub engr_type: EngravingType,
}

impl Engraving {
    pub fn new(x: i8, y: i8, text: String, engr_type: EngravingType) -> Self {
        Self {
            x,
            y,
            text,
            engr_type,
        }
    }
}

/// Level flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelFlags {
    pub fountain_count: u8,
    pub sink_count: u8,
    pub has_shop: bool,
    pub has_vault: bool,
    pub has_zoo: bool,
    pub has_court: bool,
    pub has_morgue: bool,
    pub has_beehive: bool,
    pub has_barracks: bool,
    pub has_temple: bool,
    pub has_swamp: bool,
    pub no_teleport: bool,
    pub graveyard: bool,
    pub arboreal: bool,
}

/// Trap types, with trap.h discriminants; random trap selection
/// rolls an index into this numbering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    FromRepr,
)]
#[repr(u8)]
pub enum TrapType {
    Arrow = 1,
    Dart = 2,
    RockFall = 3,
    Squeaky = 4,
    BearTrap = 5,
    LandMine = 6,
    RollingBoulder = 7,
    SleepingGas = 8,
    RustTrap = 9,
    FireTrap = 10,
    Pit = 11,
    SpikedPit = 12,
    Hole = 13,
    TrapDoor = 14,
    Teleport = 15,
    LevelTeleport = 16,
    MagicPortal = 17,
    Web = 18,
    Statue = 19,
    MagicTrap = 20,
    AntiMagic = 21,
    Polymorph = 22,
    VibratingSquare = 23,
}

/// Number of trap kinds plus one, the C TRAPNUM
pub const TRAPNUM: u32 = 24;

/// Trap on the level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    pub x: i8,
    pub y: i8,
    pub trap_type: TrapType,
    pub seen: bool,
    /// One-shot trap, deleted after triggering (vault teleporter, niche
    /// trapdoor)
    pub once: bool,
    /// Trap was set by the player
    pub madeby_u: bool,
    /// Destination for magic portals
    pub dst: Option<DLevel>,
}

/// Stairway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stairway {
    pub x: i8,
    pub y: i8,
    pub destination: DLevel,
    pub up: bool,
}

/// One doorway in the level door registry (doors[] in C)
///
/// Rooms reference a contiguous run of this list through
/// `first_door_idx`/`door_count`; the door state itself lives on the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub x: i8,
    pub y: i8,
}

/// Complete level structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Level identifier
    pub dlevel: DLevel,

    /// Map cells
    #[serde(default = "default_cells")]
    pub cells: Vec<Vec<Cell>>,

    /// Rooms, sorted by left edge
    pub rooms: Vec<super::Room>,

    /// Door registry
    pub doors: Vec<Door>,

    /// All objects on the floor
    pub objects: Vec<Object>,

    /// Buried objects
    pub buried_objects: Vec<Object>,

    /// All monsters on this level
    pub monsters: Vec<Monster>,

    /// Traps
    pub traps: Vec<Trap>,

    /// Engravings
    pub engravings: Vec<Engraving>,

    /// Stairways
    pub stairs: Vec<Stairway>,

    /// The player, when present on this level
    pub player: Option<Player>,

    /// Regions a teleport may not cross the border of
    pub tele_regions: Vec<NhRect>,

    /// Level flags
    pub flags: LevelFlags,

    /// Soft-failure diagnostics, drained by the caller
    pub diagnostics: Vec<String>,

    /// Monster occupancy by tile; long worms occupy one entry per segment
    #[serde(skip)]
    pub monster_grid: HashMap<(i8, i8), MonsterId>,

    /// Object ids by tile
    #[serde(skip)]
    pub object_grid: HashMap<(i8, i8), Vec<ObjectId>>,

    /// Next object ID to assign
    next_object_id: u32,

    /// Next monster ID to assign
    next_monster_id: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(DLevel::default())
    }
}

impl Level {
    /// Create a new all-stone level
    pub fn new(dlevel: DLevel) -> Self {
        Self {
            dlevel,
            cells: default_cells(),
            rooms: Vec::new(),
            doors: Vec::new(),
            objects: Vec::new(),
            buried_objects: Vec::new(),
            monsters: Vec::new(),
            traps: Vec::new(),
            engravings: Vec::new(),
            stairs: Vec::new(),
            player: None,
            tele_regions: Vec::new(),
            flags: LevelFlags::default(),
            diagnostics: Vec::new(),
            monster_grid: HashMap::new(),
            object_grid: HashMap::new(),
            next_object_id: 1,
            next_monster_id: 1,
        }
    }

    /// Record a soft failure (C impossible)
    ///
    /// Generation and relocation prefer degrading over panicking; the
    /// message channel is how callers learn something went sideways.
    pub fn impossible(&mut self, msg: impl Into<String>) {
        self.diagnostics.push(msg.into());
    }

    /// Drain pending diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<String> {
        core::mem::take(&mut self.diagnostics)
    }

    /// Rebuild the occupancy indexes after deserialization
    pub fn rebuild_indexes(&mut self) {
        self.monster_grid.clear();
        self.object_grid.clear();
        let entries: Vec<(MonsterId, i8, i8, Vec<(i8, i8)>)> = self
            .monsters
            .iter()
            .map(|m| (m.id, m.x, m.y, m.tail.clone()))
            .collect();
        for (id, x, y, tail) in entries {
            self.monster_grid.insert((x, y), id);
            for (tx, ty) in tail {
                self.monster_grid.insert((tx, ty), id);
            }
        }
        let objs: Vec<(ObjectId, i8, i8)> = self.objects.iter().map(|o| (o.id, o.x, o.y)).collect();
        for (id, x, y) in objs {
            self.object_grid.entry((x, y)).or_default().push(id);
        }
    }

    // ------------------------------------------------------------------
    // Monsters
    // ------------------------------------------------------------------

    /// Get monster at position (head or worm segment)
    pub fn monster_at(&self, x: i8, y: i8) -> Option<&Monster> {
        let id = *self.monster_grid.get(&(x, y))?;
        self.monster(id)
    }

    /// Get monster by ID
    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    /// Get mutable monster by ID
    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Add a monster to the level, indexing its head and tail tiles
    pub fn add_monster(&mut self, mut monster: Monster) -> MonsterId {
        let id = MonsterId(self.next_monster_id);
        self.next_monster_id += 1;
        monster.id = id;

        self.monster_grid.insert((monster.x, monster.y), id);
        for &(tx, ty) in &monster.tail {
            self.monster_grid.insert((tx, ty), id);
        }
        self.monsters.push(monster);
        id
    }

    /// Remove a monster from the level
    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        let idx = self.monsters.iter().position(|m| m.id == id)?;
        let monster = self.monsters.remove(idx);
        self.monster_grid.remove(&(monster.x, monster.y));
        for &(tx, ty) in &monster.tail {
            self.monster_grid.remove(&(tx, ty));
        }
        Some(monster)
    }

    /// Drop a monster's tiles from the occupancy index (it stays in the
    /// monster list); used while relocating
    pub(crate) fn clear_monster_tiles(&mut self, id: MonsterId) {
        if let Some(m) = self.monster(id) {
            let mut tiles = vec![(m.x, m.y)];
            tiles.extend(m.tail.iter().copied());
            for t in tiles {
                if self.monster_grid.get(&t) == Some(&id) {
                    self.monster_grid.remove(&t);
                }
            }
        }
    }

    /// Re-index a monster's current head and tail tiles
    pub(crate) fn index_monster_tiles(&mut self, id: MonsterId) {
        if let Some(m) = self.monster(id) {
            let mut tiles = vec![(m.x, m.y)];
            tiles.extend(m.tail.iter().copied());
            for t in tiles {
                self.monster_grid.insert(t, id);
            }
        }
    }

    // ------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------

    /// Get objects at position
    pub fn objects_at(&self, x: i8, y: i8) -> Vec<&Object> {
        self.object_grid
            .get(&(x, y))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.objects.iter().find(|o| o.id == *id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check for an object of the given kind at position (sobj_at)
    pub fn object_at(&self, kind: ObjectKind, x: i8, y: i8) -> bool {
        self.objects_at(x, y).iter().any(|o| o.kind == kind)
    }

    /// Add an object to the floor
    pub fn add_object(&mut self, mut object: Object, x: i8, y: i8) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.id = id;
        object.x = x;
        object.y = y;

        self.object_grid.entry((x, y)).or_default().push(id);
        self.objects.push(object);
        id
    }

    /// Add a buried object (not indexed; diggable minerals)
    pub fn bury_object(&mut self, mut object: Object, x: i8, y: i8) -> ObjectId {
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        object.id = id;
        object.x = x;
        object.y = y;
        self.buried_objects.push(object);
        id
    }

    // ------------------------------------------------------------------
    // Traps, stairs, engravings
    // ------------------------------------------------------------------

    /// Get trap at position
    pub fn trap_at(&self, x: i8, y: i8) -> Option<&Trap> {
        self.traps.iter().find(|t| t.x == x && t.y == y)
    }

    /// Get a mutable reference to a trap at position
    pub fn trap_at_mut(&mut self, x: i8, y: i8) -> Option<&mut Trap> {
        self.traps.iter_mut().find(|t| t.x == x && t.y == y)
    }

    /// Remove a trap at the given position (deltrap)
    pub fn remove_trap(&mut self, x: i8, y: i8) {
        self.traps.retain(|t| t.x != x || t.y != y);
    }

    /// Find upstairs
    pub fn find_upstairs(&self) -> Option<(i8, i8)> {
        self.stairs.iter().find(|s| s.up).map(|s| (s.x, s.y))
    }

    /// Find downstairs
    pub fn find_downstairs(&self) -> Option<(i8, i8)> {
        self.stairs.iter().find(|s| !s.up).map(|s| (s.x, s.y))
    }

    /// Get stairway at position
    pub fn stairway_at(&self, x: i8, y: i8) -> Option<&Stairway> {
        self.stairs.iter().find(|s| s.x == x && s.y == y)
    }

    /// Add an engraving, replacing any existing one on the tile
    pub fn engrave(&mut self, x: i8, y: i8, text: impl Into<String>, engr_type: EngravingType) {
        self.engravings.retain(|e| e.x != x || e.y != y);
        self.engravings.push(Engraving::new(x, y, text.into(), engr_type));
    }

    /// Get engraving at position
    pub fn engraving_at(&self, x: i8, y: i8) -> Option<&Engraving> {
        self.engravings.iter().find(|e| e.x == x && e.y == y)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// A tile generation treats as taken: trap, furniture, liquid
    /// (occupied in C)
    pub fn occupied(&self, x: i8, y: i8) -> bool {
        let typ = self.cells[x as usize][y as usize].typ;
        self.trap_at(x, y).is_some() || typ.is_furniture() || typ.is_liquid()
    }

    /// Check if position is walkable terrain
    pub fn is_walkable(&self, x: i8, y: i8) -> bool {
        crate::consts::isok(x, y) && self.cells[x as usize][y as usize].is_walkable()
    }
}
