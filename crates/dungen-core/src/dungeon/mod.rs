//! Dungeon level generation (mklev.c, mkroom.c, rect.c, mkmaze.c)
//!
//! [`generate_level`] carves a complete level into an 80x21 cell grid:
//! random rooms from the free-rectangle pool, corridors joining them,
//! doors and hidden niches, an isolated treasure vault, at most one
//! themed special room, and finally furniture, traps, loot, and buried
//! minerals. Every random draw comes from the caller's
//! [`GameRng`](crate::GameRng), so a seed fully determines the level.
//!
//! [`verify_level`] checks the structural invariants of the result.

mod cell;
mod corridor;
mod dlevel;
mod door;
pub mod generation;
mod level;
mod mineral;
mod niche;
mod rect;
mod room;
mod special_rooms;
mod trap;
mod vault;
mod verify;

pub use cell::{Cell, CellType, DoorState};
pub use corridor::{dig_corridor, finddpos, join, makecorridors, RoomJoiner};
pub use dlevel::{level_difficulty, DLevel};
pub use door::{add_door, bydoor, dodoor, dosdoor, okdoor};
pub use generation::{
    add_room, bound_digging, check_room, create_room, fill_ordinary_room, generate_level,
    make_grave, makerooms, mkaltar, mkfount, mkgrave, mksink, mkstairs, topologize, GenContext,
    BLESSED_FOUNTAIN,
};
pub use level::{
    Door, Engraving, EngravingType, Level, LevelFlags, Stairway, Trap, TrapType, TRAPNUM,
};
pub use mineral::mineralize;
pub use niche::{make_niches, makeniche, place_niche};
pub use rect::{NhRect, RectManager};
pub use room::{
    has_dnstairs, has_upstairs, in_rooms, inside_room, pick_room, search_special, somex, somexy,
    somey, Room, RoomType,
};
pub use special_rooms::{
    align_to_mask, antholemon, courtmon, fill_zoo, make_special_room, mkgold, mkroom, mkshop,
    mkswamp, mktemple, mkzoo, morguemon, squadmon, AM_CHAOTIC, AM_LAWFUL, AM_NEUTRAL, AM_SHRINE,
};
pub use trap::{maketrap, mktrap};
pub use vault::{makevtele, mk_knox_portal, place_vault, KNOX_MAX_DEPTH, KNOX_MIN_DEPTH};
pub use verify::{verify_level, LevelCheckError};
