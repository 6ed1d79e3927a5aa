//! Map cell types (rm.h)

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Cell/terrain type
///
/// Discriminant order matters: the wall kinds occupy a contiguous range and
/// everything from `Door` up is accessible, mirroring the C macros
/// `IS_WALL`, `IS_ROCK` and `ACCESSIBLE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Stone = 0,
    VWall = 1,
    HWall = 2,
    TLCorner = 3,
    TRCorner = 4,
    BLCorner = 5,
    BRCorner = 6,
    CrossWall = 7,
    TUWall = 8,  // T-wall up
    TDWall = 9,  // T-wall down
    TLWall = 10, // T-wall left
    TRWall = 11, // T-wall right
    Tree = 12,
    SecretDoor = 13,
    SecretCorridor = 14,
    Pool = 15,
    Moat = 16,
    Water = 17,
    Lava = 18,
    IronBars = 19,
    Door = 20,
    Corridor = 21,
    Room = 22,
    Stairs = 23,
    Fountain = 24,
    Throne = 25,
    Sink = 26,
    Grave = 27,
    Altar = 28,
    Ice = 29,
    Air = 30,
    Cloud = 31,
}

impl CellType {
    /// Check if this is a wall type
    pub const fn is_wall(&self) -> bool {
        (*self as u8) >= 1 && (*self as u8) <= 11
    }

    /// Wall or solid stone (C IS_STWALL)
    pub const fn is_stone_or_wall(&self) -> bool {
        (*self as u8) <= 11
    }

    /// Anything diggable rock-like: stone, walls, trees, the secret
    /// kinds (C IS_ROCK)
    pub const fn is_rock(&self) -> bool {
        (*self as u8) < CellType::Pool as u8
    }

    /// Check if this is a door
    pub const fn is_door(&self) -> bool {
        matches!(self, CellType::Door | CellType::SecretDoor)
    }

    /// Check if this is passable (can walk through) - C ACCESSIBLE
    pub const fn is_passable(&self) -> bool {
        (*self as u8) >= CellType::Door as u8
    }

    /// Standing water (C is_pool)
    pub const fn is_pool(&self) -> bool {
        matches!(self, CellType::Pool | CellType::Moat | CellType::Water)
    }

    /// Check if this is a liquid type
    pub const fn is_liquid(&self) -> bool {
        matches!(
            self,
            CellType::Pool | CellType::Moat | CellType::Water | CellType::Lava
        )
    }

    /// Dungeon furniture: counts as occupied for placement purposes
    pub const fn is_furniture(&self) -> bool {
        matches!(
            self,
            CellType::Fountain
                | CellType::Throne
                | CellType::Sink
                | CellType::Grave
                | CellType::Altar
                | CellType::Stairs
        )
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Stone => ' ',
            CellType::VWall => '|',
            CellType::HWall => '-',
            CellType::TLCorner => '-',
            CellType::TRCorner => '-',
            CellType::BLCorner => '-',
            CellType::BRCorner => '-',
            CellType::CrossWall => '-',
            CellType::TUWall => '-',
            CellType::TDWall => '-',
            CellType::TLWall => '|',
            CellType::TRWall => '|',
            CellType::Tree => '#',
            CellType::SecretDoor => '#', // looks like wall
            CellType::SecretCorridor => '#',
            CellType::Pool => '}',
            CellType::Moat => '}',
            CellType::Water => '}',
            CellType::Lava => '}',
            CellType::IronBars => '#',
            CellType::Door => '+',
            CellType::Corridor => '#',
            CellType::Room => '.',
            CellType::Stairs => '>',
            CellType::Fountain => '{',
            CellType::Throne => '\\',
            CellType::Sink => '#',
            CellType::Grave => '|',
            CellType::Altar => '_',
            CellType::Ice => '.',
            CellType::Air => ' ',
            CellType::Cloud => '#',
        }
    }
}

bitflags! {
    /// Door state flags (doormask in rm.h)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorState: u8 {
        const NO_DOOR = 0x00;
        const BROKEN = 0x01;
        const OPEN = 0x02;
        const CLOSED = 0x04;
        const LOCKED = 0x08;
        const TRAPPED = 0x10;
    }
}

// Manual serde impl for DoorState
impl Serialize for DoorState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorState::from_bits_truncate(bits))
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Actual terrain type
    pub typ: CellType,

    /// Cell flags (door state for doors)
    pub flags: u8,

    /// Horizontal orientation (for walls and doors)
    pub horizontal: bool,

    /// Currently lit
    pub lit: bool,

    /// Room number (NO_ROOM, SHARED, or index + ROOMOFFSET)
    pub room_number: u8,

    /// Wall is a room edge
    pub edge: bool,

    /// Can dig here
    pub can_dig: bool,
}

impl Cell {
    /// Create a new stone cell
    pub const fn stone() -> Self {
        Self {
            typ: CellType::Stone,
            flags: 0,
            horizontal: false,
            lit: false,
            room_number: 0,
            edge: false,
            can_dig: true,
        }
    }

    /// Get door state from flags
    pub fn door_state(&self) -> DoorState {
        DoorState::from_bits_truncate(self.flags)
    }

    /// Set door state
    pub fn set_door_state(&mut self, state: DoorState) {
        self.flags = state.bits();
    }

    /// A door leaf that is shut (closed or locked)
    pub fn door_is_shut(&self) -> bool {
        self.typ == CellType::Door
            && self
                .door_state()
                .intersects(DoorState::CLOSED | DoorState::LOCKED)
    }

    /// Check if walkable
    pub fn is_walkable(&self) -> bool {
        if !self.typ.is_passable() {
            return false;
        }
        if self.typ == CellType::Door {
            return !self.door_is_shut();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_range() {
        assert!(CellType::VWall.is_wall());
        assert!(CellType::TRWall.is_wall());
        assert!(!CellType::Stone.is_wall());
        assert!(!CellType::Tree.is_wall());
        assert!(CellType::Stone.is_stone_or_wall());
        assert!(CellType::SecretDoor.is_rock());
        assert!(!CellType::Pool.is_rock());
    }

    #[test]
    fn test_accessible_range() {
        assert!(CellType::Door.is_passable());
        assert!(CellType::Room.is_passable());
        assert!(CellType::Ice.is_passable());
        assert!(!CellType::Pool.is_passable());
        assert!(!CellType::SecretCorridor.is_passable());
    }

    #[test]
    fn test_door_shut() {
        let mut cell = Cell::stone();
        cell.typ = CellType::Door;
        cell.set_door_state(DoorState::CLOSED);
        assert!(cell.door_is_shut());
        assert!(!cell.is_walkable());

        cell.set_door_state(DoorState::BROKEN);
        assert!(!cell.door_is_shut());
        assert!(cell.is_walkable());

        cell.set_door_state(DoorState::NO_DOOR);
        assert!(cell.is_walkable());
    }
}
