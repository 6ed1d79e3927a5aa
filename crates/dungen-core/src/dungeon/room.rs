//! Room types and structures (mkroom.h, mkroom.c)

#[cfg(not(feature = "std"))]
use crate::compat::*;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{COLNO, MAX_SUBROOMS, ROOMOFFSET, ROWNO, SHARED};
use crate::rng::GameRng;

/// Room types matching C mkroom.h enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum RoomType {
    /// Ordinary room (OROOM = 0)
    #[default]
    Ordinary = 0,
    // Note: 1 is unused in C
    /// Throne room with king and retinue (COURT = 2)
    Court = 2,
    /// Swamp with pools and eels (SWAMP = 3)
    Swamp = 3,
    /// Secret vault with gold (VAULT = 4)
    Vault = 4,
    /// Bee hive with queen bee (BEEHIVE = 5)
    Beehive = 5,
    /// Morgue with undead (MORGUE = 6)
    Morgue = 6,
    /// Soldier barracks (BARRACKS = 7)
    Barracks = 7,
    /// Zoo with penned monsters (ZOO = 8)
    Zoo = 8,
    /// Temple with altar and priest (TEMPLE = 10)
    Temple = 10,
    /// Leprechaun treasure hall (LEPREHALL = 11)
    LeprechaunHall = 11,
    /// Cockatrice nest with statues (COCKNEST = 12)
    CockatriceNest = 12,
    /// Ant colony (ANTHOLE = 13)
    Anthole = 13,
    /// General store (SHOPBASE = 14)
    GeneralShop = 14,
    /// Armor shop (ARMORSHOP = 15)
    ArmorShop = 15,
    /// Scroll shop (SCROLLSHOP = 16)
    ScrollShop = 16,
    /// Potion shop (POTIONSHOP = 17)
    PotionShop = 17,
    /// Weapon shop (WEAPONSHOP = 18)
    WeaponShop = 18,
    /// Food shop (FOODSHOP = 19)
    FoodShop = 19,
    /// Ring shop (RINGSHOP = 20)
    RingShop = 20,
    /// Wand shop (WANDSHOP = 21)
    WandShop = 21,
    /// Tool shop (TOOLSHOP = 22)
    ToolShop = 22,
    /// Bookstore (BOOKSHOP = 23)
    BookShop = 23,
    /// Health food store (FODDERSHOP = 24)
    HealthFoodShop = 24,
    /// Candle shop (CANDLESHOP = 25)
    CandleShop = 25,
}

impl RoomType {
    /// Check if this is a shop type
    pub const fn is_shop(self) -> bool {
        (self as u8) >= RoomType::GeneralShop as u8
    }

    /// Check if this is a special room (non-ordinary, non-shop)
    pub const fn is_special(self) -> bool {
        !matches!(self, RoomType::Ordinary) && !self.is_shop()
    }

    /// Check if this room type's inhabitants start asleep
    pub const fn monsters_sleep(self) -> bool {
        matches!(
            self,
            RoomType::Court
                | RoomType::Beehive
                | RoomType::Morgue
                | RoomType::Barracks
                | RoomType::Zoo
                | RoomType::LeprechaunHall
                | RoomType::CockatriceNest
                | RoomType::Anthole
        )
    }
}

/// Rectangle representing a room
///
/// Coordinates describe the interior (floor) cells; the walls sit one cell
/// outside these bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// X coordinate of room interior (left edge)
    pub x: usize,
    /// Y coordinate of room interior (top edge)
    pub y: usize,
    /// Width of room interior
    pub width: usize,
    /// Height of room interior
    pub height: usize,
    /// Type of room
    pub room_type: RoomType,
    /// Whether the room is lit
    pub lit: bool,
    /// Number of doors in this room
    pub door_count: u8,
    /// Index of first door in the level's door registry
    pub first_door_idx: u8,
    /// Whether this room has irregular shape
    pub irregular: bool,
    /// Parent room index (if this is a subroom)
    pub parent: Option<usize>,
    /// Subroom indices
    pub subrooms: Vec<usize>,
}

impl Default for Room {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl Room {
    /// Create a new ordinary lit room
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            room_type: RoomType::Ordinary,
            lit: true,
            door_count: 0,
            first_door_idx: 0,
            irregular: false,
            parent: None,
            subrooms: Vec::new(),
        }
    }

    /// Create a room with a specific type and light state
    pub fn with_type(
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        room_type: RoomType,
        lit: bool,
    ) -> Self {
        Self {
            room_type,
            lit,
            ..Self::new(x, y, width, height)
        }
    }

    /// Check if this is a subroom
    pub fn is_subroom(&self) -> bool {
        self.parent.is_some()
    }

    /// Add a subroom index
    pub fn add_subroom(&mut self, subroom_idx: usize) {
        if self.subrooms.len() < MAX_SUBROOMS {
            self.subrooms.push(subroom_idx);
        }
    }

    /// Check if this room overlaps with another (with buffer)
    pub fn overlaps(&self, other: &Room, buffer: usize) -> bool {
        let x1 = self.x.saturating_sub(buffer);
        let y1 = self.y.saturating_sub(buffer);
        let x2 = self.x + self.width + buffer;
        let y2 = self.y + self.height + buffer;

        let ox1 = other.x.saturating_sub(buffer);
        let oy1 = other.y.saturating_sub(buffer);
        let ox2 = other.x + other.width + buffer;
        let oy2 = other.y + other.height + buffer;

        !(x2 <= ox1 || x1 >= ox2 || y2 <= oy1 || y1 >= oy2)
    }

    /// Get center point of room
    pub fn center(&self) -> (usize, usize) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if point is inside the room interior
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Get room area (interior cells)
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Check if room is a shop
    pub fn is_shop(&self) -> bool {
        self.room_type.is_shop()
    }

    /// Get interior bounds as (left, top, right, bottom), inclusive
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.x,
            self.y,
            self.x + self.width - 1,
            self.y + self.height - 1,
        )
    }

    /// Get bounds including walls as (left, top, right, bottom), inclusive
    pub fn wall_bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.x.saturating_sub(1),
            self.y.saturating_sub(1),
            self.x + self.width,
            self.y + self.height,
        )
    }
}

// ============================================================================
// Room query functions (mkroom.c)
// ============================================================================

/// Get a random X coordinate within a room (somex equivalent)
pub fn somex(room: &Room, rng: &mut GameRng) -> usize {
    room.x + rng.rn2(room.width as u32) as usize
}

/// Get a random Y coordinate within a room (somey equivalent)
pub fn somey(room: &Room, rng: &mut GameRng) -> usize {
    room.y + rng.rn2(room.height as u32) as usize
}

/// Check if coordinates are inside a room including its walls
/// (inside_room equivalent)
pub fn inside_room(room: &Room, x: usize, y: usize) -> bool {
    let (lx, ly, hx, hy) = room.wall_bounds();
    x >= lx && x <= hx && y >= ly && y <= hy
}

/// Get random coordinates within a room, avoiding walls and subrooms
/// (somexy equivalent)
///
/// Irregular rooms are resolved through the cell room numbers; regular
/// rooms with subrooms retry until a spot outside every subroom turns up.
pub fn somexy(
    room: &Room,
    room_index: usize,
    all_rooms: &[Room],
    level: &super::Level,
    rng: &mut GameRng,
) -> Option<(usize, usize)> {
    let roomno = room_index as u8 + ROOMOFFSET;

    if room.irregular {
        for _ in 0..100 {
            let x = somex(room, rng);
            let y = somey(room, rng);
            if !level.cells[x][y].edge && level.cells[x][y].room_number == roomno {
                return Some((x, y));
            }
        }
        // Exhaustive fallback
        for x in room.x..(room.x + room.width) {
            for y in room.y..(room.y + room.height) {
                if !level.cells[x][y].edge && level.cells[x][y].room_number == roomno {
                    return Some((x, y));
                }
            }
        }
        return None;
    }

    if room.subrooms.is_empty() {
        return Some((somex(room, rng), somey(room, rng)));
    }

    for _ in 0..100 {
        let x = somex(room, rng);
        let y = somey(room, rng);
        if level.cells[x][y].typ.is_wall() {
            continue;
        }
        let in_subroom = room
            .subrooms
            .iter()
            .any(|&sub| sub < all_rooms.len() && inside_room(&all_rooms[sub], x, y));
        if !in_subroom {
            return Some((x, y));
        }
    }
    None
}

/// Check if room contains the up staircase (has_upstairs equivalent)
pub fn has_upstairs(room: &Room, level: &super::Level) -> bool {
    level
        .stairs
        .iter()
        .any(|s| s.up && room.contains(s.x as usize, s.y as usize))
}

/// Check if room contains the down staircase (has_dnstairs equivalent)
pub fn has_dnstairs(room: &Room, level: &super::Level) -> bool {
    level
        .stairs
        .iter()
        .any(|s| !s.up && room.contains(s.x as usize, s.y as usize))
}

/// Pick an unused ordinary room (pick_room equivalent)
///
/// Walks the room list from a random start. Rooms with the up staircase
/// are never used; rooms with the down staircase are skipped 2 times in 3
/// unless `strict`, which rejects any staircase. Rooms with a single door
/// are preferred, others get a 1-in-5 chance.
pub fn pick_room(
    rooms: &[Room],
    level: &super::Level,
    strict: bool,
    rng: &mut GameRng,
) -> Option<usize> {
    if rooms.is_empty() {
        return None;
    }

    let start = rng.rn2(rooms.len() as u32) as usize;
    for i in 0..rooms.len() {
        let idx = (start + i) % rooms.len();
        let room = &rooms[idx];

        if room.room_type != RoomType::Ordinary {
            continue;
        }
        if strict {
            if has_upstairs(room, level) || has_dnstairs(room, level) {
                continue;
            }
        } else if has_upstairs(room, level)
            || (has_dnstairs(room, level) && rng.rn2(3) != 0)
        {
            continue;
        }
        if room.door_count == 1 || rng.one_in(5) {
            return Some(idx);
        }
    }
    None
}

/// Search for a room of a specific type (search_special equivalent)
pub fn search_special(rooms: &[Room], room_type: RoomType) -> Option<usize> {
    rooms
        .iter()
        .position(|room| room.parent.is_none() && room.room_type == room_type)
}

/// Get list of room indices at a coordinate (in_rooms equivalent)
///
/// Cells SHARED between rooms (doorways, common walls) report every
/// bordering room.
pub fn in_rooms(
    level: &super::Level,
    rooms: &[Room],
    x: usize,
    y: usize,
    type_wanted: Option<RoomType>,
) -> Vec<usize> {
    let mut result = Vec::new();
    if x >= COLNO || y >= ROWNO {
        return result;
    }

    let push_if_match = |result: &mut Vec<usize>, room_idx: usize| {
        if room_idx >= rooms.len() {
            return;
        }
        let room = &rooms[room_idx];
        let matches = match type_wanted {
            None => true,
            Some(wanted) if wanted.is_shop() => room.room_type.is_shop(),
            Some(wanted) => room.room_type == wanted,
        };
        if matches && !result.contains(&room_idx) {
            result.push(room_idx);
        }
    };

    match level.cells[x][y].room_number {
        n if n == SHARED => {
            for cx in x.saturating_sub(1)..=(x + 1).min(COLNO - 1) {
                for cy in y.saturating_sub(1)..=(y + 1).min(ROWNO - 1) {
                    let roomno = level.cells[cx][cy].room_number;
                    if roomno >= ROOMOFFSET {
                        push_if_match(&mut result, (roomno - ROOMOFFSET) as usize);
                    }
                }
            }
        }
        n if n >= ROOMOFFSET => push_if_match(&mut result, (n - ROOMOFFSET) as usize),
        _ => {}
    }
    result
}
